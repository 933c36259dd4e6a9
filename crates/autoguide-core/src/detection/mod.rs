pub mod centroid;
pub mod filters;
pub mod locator;
pub mod threshold;

pub use centroid::{marginal_sums, median_index};
pub use locator::{CentroidEstimate, DetectionLimits, StarLocator};
pub use threshold::{intensity_bounds, resolve_threshold};

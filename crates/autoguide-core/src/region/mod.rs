pub mod extract;
pub mod mask;
pub mod view;
pub mod window;

pub use extract::{Region, RegionExtractor};
pub use mask::DiskMask;
pub use view::{Projection, ViewState, ViewTransform, ZoomLevel};
pub use window::GuideWindow;

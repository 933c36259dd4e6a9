pub mod image_io;
pub mod ser;
pub mod synthetic;

pub use image_io::{load_frame, save_mask_png, ImageSequenceSource};
pub use ser::{SerFrameSource, SerReader};
pub use synthetic::{SimulatedSky, SkyModel, SyntheticStarSource};

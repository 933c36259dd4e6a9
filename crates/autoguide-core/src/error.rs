use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuideError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SER file: {0}")]
    InvalidSer(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame index {index} out of range (total: {total})")]
    FrameIndexOutOfRange { index: usize, total: usize },

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Mount link is closed")]
    LinkClosed,

    #[error("Mount link write timed out after {0} ms")]
    LinkTimeout(u64),
}

pub type Result<T> = std::result::Result<T, GuideError>;

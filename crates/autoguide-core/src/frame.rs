use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{GuideError, Result};

/// A single 8-bit RGB video frame.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width, 3)
    pub data: Array3<u8>,
    /// Optional per-frame metadata
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array3<u8>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != COLOR_CHANNEL_COUNT || h == 0 || w == 0 {
            return Err(GuideError::InvalidDimensions {
                width: w as u32,
                height: h as u32,
            });
        }
        Ok(Self {
            data,
            metadata: FrameMetadata::default(),
        })
    }

    /// Build an RGB frame by replicating a grayscale plane into all channels.
    pub fn from_gray(gray: &Array2<u8>) -> Result<Self> {
        let (h, w) = gray.dim();
        let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(r, c, _)| gray[[r, c]]);
        Self::new(data)
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn with_index(mut self, frame_index: usize) -> Self {
        self.metadata.frame_index = frame_index;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    pub frame_index: usize,
    pub timestamp_us: Option<u64>,
}

/// Camera parameters a frame source may expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraControl {
    Exposure,
    Gain,
    AutoGain,
    Gamma,
    Brightness,
    Contrast,
    FrameRate,
}

impl std::fmt::Display for CameraControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exposure => write!(f, "Exposure"),
            Self::Gain => write!(f, "Gain"),
            Self::AutoGain => write!(f, "Auto Gain"),
            Self::Gamma => write!(f, "Gamma"),
            Self::Brightness => write!(f, "Brightness"),
            Self::Contrast => write!(f, "Contrast"),
            Self::FrameRate => write!(f, "Frame Rate"),
        }
    }
}

/// Anything that can hand the guider successive frames.
///
/// Camera backends live outside this crate; recordings and synthetic
/// sources in [`crate::io`] implement it for replay and testing.
pub trait FrameSource {
    /// Acquire the next frame, or `None` when the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// Apply a camera control. Sources without hardware ignore controls.
    fn apply_control(&mut self, control: CameraControl, value: i32) -> Result<()> {
        tracing::debug!(%control, value, "Control not supported by frame source");
        Ok(())
    }

    /// Human-readable name for logs and summaries.
    fn name(&self) -> &str;
}

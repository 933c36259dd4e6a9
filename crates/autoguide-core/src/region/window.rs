use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CROP, MIN_CROP};

/// Square region analyzed each frame, in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideWindow {
    pub center_x: u32,
    pub center_y: u32,
    pub half_size: u32,
    pub circular_mask: bool,
}

impl GuideWindow {
    pub fn new(center_x: u32, center_y: u32, half_size: u32, circular_mask: bool) -> Self {
        Self {
            center_x,
            center_y,
            half_size,
            circular_mask,
        }
    }

    pub fn side(&self) -> usize {
        self.half_size as usize * 2
    }

    pub fn area(&self) -> usize {
        self.side() * self.side()
    }

    /// Top-left corner of the window.
    pub fn origin(&self) -> (u32, u32) {
        (
            self.center_x.saturating_sub(self.half_size),
            self.center_y.saturating_sub(self.half_size),
        )
    }

    /// Nearest window that lies fully inside an `extent_w x extent_h` area.
    ///
    /// The half-size is limited to the crop range and to half the smaller
    /// extent; the center is then moved inward as needed.
    pub fn clamped(&self, extent_w: u32, extent_h: u32) -> Self {
        let max_half = (extent_w.min(extent_h) / 2).min(MAX_CROP);
        let half = self.half_size.max(MIN_CROP).min(max_half);
        Self {
            center_x: self.center_x.clamp(half, extent_w - half),
            center_y: self.center_y.clamp(half, extent_h - half),
            half_size: half,
            circular_mask: self.circular_mask,
        }
    }
}

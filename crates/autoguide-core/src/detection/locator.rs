use ndarray::Array2;
use tracing::trace;

use crate::config::GuideConfig;
use crate::region::Region;

use super::centroid::{marginal_sums, median_index};
use super::filters::{bin_into, luminance_into, suppress_noise_into};
use super::threshold::{binarize_into, intensity_bounds, resolve_threshold};

/// Star position estimate for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CentroidEstimate {
    /// Signed offset from the window center, after axis inversion.
    pub dx: i32,
    pub dy: i32,
    pub total_lit_pixels: u32,
    /// `max - min` of the (binned) intensity region.
    pub intensity_range: u8,
    /// Threshold actually applied.
    pub threshold: f32,
    /// Median position inside the window, before inversion.
    pub column: usize,
    pub row: usize,
}

/// Bounds a centroid estimate must satisfy to count as a star.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionLimits {
    pub min_lit_pixels: u32,
    pub max_lit_pixels: u32,
    pub contrast_limit: u8,
}

impl DetectionLimits {
    /// A star lights fewer than `half_size²` pixels, a quarter of the window.
    /// Saturated or flat bright windows fill the disk mask and fail this.
    pub fn new(config: &GuideConfig, half_size: u32) -> Self {
        Self {
            min_lit_pixels: config.min_lit_pixels,
            max_lit_pixels: half_size.saturating_mul(half_size),
            contrast_limit: config.contrast_limit,
        }
    }
}

impl CentroidEstimate {
    /// Lit count strictly inside the limits and contrast above the limit.
    pub fn is_valid(&self, limits: &DetectionLimits) -> bool {
        self.total_lit_pixels > limits.min_lit_pixels
            && self.total_lit_pixels < limits.max_lit_pixels
            && self.intensity_range > limits.contrast_limit
    }
}

/// Scratch buffers sized to the window; reallocated only when the crop changes.
#[derive(Debug)]
struct Workspace {
    side: usize,
    gray: Array2<u8>,
    binned: Array2<u8>,
    mask: Array2<u8>,
    filtered: Array2<u8>,
}

impl Workspace {
    fn new(side: usize) -> Self {
        Self {
            side,
            gray: Array2::zeros((side, side)),
            binned: Array2::zeros((side, side)),
            mask: Array2::zeros((side, side)),
            filtered: Array2::zeros((side, side)),
        }
    }

    fn ensure(&mut self, side: usize) {
        if self.side != side {
            trace!(side, "Reallocating locator workspace");
            *self = Self::new(side);
        }
    }
}

/// Thresholds the guide window and estimates the star position.
#[derive(Debug)]
pub struct StarLocator {
    workspace: Workspace,
}

impl Default for StarLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl StarLocator {
    pub fn new() -> Self {
        Self {
            workspace: Workspace::new(0),
        }
    }

    /// Binary star mask of the last located frame.
    pub fn last_mask(&self) -> &Array2<u8> {
        &self.workspace.mask
    }

    /// Pipeline: luminance -> binning -> threshold -> noise suppression ->
    /// marginal sums -> median index -> axis inversion.
    pub fn locate(&mut self, region: &Region, config: &GuideConfig) -> CentroidEstimate {
        let side = region.side();
        let half = region.window.half_size as i32;
        let ws = &mut self.workspace;
        ws.ensure(side);

        luminance_into(&region.data, &mut ws.gray);

        let intensity = if config.binning > 0 {
            bin_into(&ws.gray, config.binning, &mut ws.binned);
            &ws.binned
        } else {
            &ws.gray
        };

        let (min, max) = intensity_bounds(intensity);
        let threshold = resolve_threshold(&config.threshold, min, max);
        let mut lit = binarize_into(intensity, threshold, &mut ws.mask);

        if config.noise_level > 0 {
            lit = suppress_noise_into(
                &ws.mask,
                config.noise_level,
                config.noise_occupancy,
                &mut ws.filtered,
            );
            std::mem::swap(&mut ws.mask, &mut ws.filtered);
        }

        let (columns, rows) = marginal_sums(&ws.mask);
        let column = median_index(&columns, lit);
        let row = median_index(&rows, lit);

        let mut dx = column as i32 - half;
        let mut dy = row as i32 - half;
        if config.ra.inverted {
            dx = -dx;
        }
        if config.dec.inverted {
            dy = -dy;
        }

        trace!(dx, dy, lit, min, max, threshold, "Located star");

        CentroidEstimate {
            dx,
            dy,
            total_lit_pixels: lit,
            intensity_range: max - min,
            threshold,
            column,
            row,
        }
    }
}

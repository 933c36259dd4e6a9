use ndarray::Array2;
use tracing::debug;

use crate::config::GuideConfig;
use crate::control::{preview_pulses, ControlParams, DriftController};
use crate::detection::{DetectionLimits, StarLocator};
use crate::frame::Frame;
use crate::region::{RegionExtractor, ViewState};

use super::types::FrameReport;

/// One frame of guiding: extract, locate, decide.
///
/// Holds the state that must survive between frames: the cached disk mask,
/// the locator buffers and the per-axis accumulators.
#[derive(Debug, Default)]
pub struct Guider {
    extractor: RegionExtractor,
    locator: StarLocator,
    controller: DriftController,
}

impl Guider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(&self) -> &DriftController {
        &self.controller
    }

    /// Binary star mask of the last processed frame.
    pub fn star_mask(&self) -> &Array2<u8> {
        self.locator.last_mask()
    }

    /// Drop accumulated drift on both axes.
    pub fn stop(&mut self) {
        self.controller.stop();
    }

    /// Process one frame. `view` is clamped in place to the frame.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        view: &mut ViewState,
        config: &GuideConfig,
    ) -> FrameReport {
        let window = view.clamp_to(frame.width(), frame.height(), config.crop, config.circular_mask);
        let region = self.extractor.extract(frame, &view.transform, &window);
        let estimate = self.locator.locate(&region, config);

        let limits = DetectionLimits::new(config, region.window.half_size);
        let valid = estimate.is_valid(&limits);

        let ms_per_pixel = view.transform.ms_per_pixel(config.scale_ms_per_pixel);
        let params = ControlParams::new(config, ms_per_pixel);
        let decision = self.controller.update(&estimate, valid, &params);
        let preview = preview_pulses(&estimate, valid, &params);

        debug!(
            frame = frame.metadata.frame_index,
            dx = estimate.dx,
            dy = estimate.dy,
            lit = estimate.total_lit_pixels,
            range = estimate.intensity_range,
            valid,
            "Frame processed"
        );

        FrameReport {
            frame_index: frame.metadata.frame_index,
            window: region.window,
            estimate,
            valid,
            decision,
            preview,
            ms_per_pixel,
            deadband_pixels: params.deadband_pixels(),
            star_mask: config.preview.then(|| self.locator.last_mask().clone()),
            sent: None,
            dropped: None,
        }
    }
}

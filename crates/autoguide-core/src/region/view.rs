//! Zoom and pan applied to the source frame before the guide window is cut.
//!
//! The source is resampled so that at zoom level 0 its width fills the
//! viewport; every further level enlarges it by the factors in
//! [`ZOOM_SCALES`]. Window coordinates are viewport coordinates.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, ZOOM_SCALES};

use super::window::GuideWindow;

/// Index into the zoom factor table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub const MAX: u8 = (ZOOM_SCALES.len() - 1) as u8;

    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    /// Display enlargement relative to level 0.
    pub fn factor(&self) -> f64 {
        ZOOM_SCALES[self.0.min(Self::MAX) as usize]
    }

    pub fn zoom_in(&self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    pub fn zoom_out(&self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

/// Mapping from source pixels to the viewport at one zoom/pan setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Viewport pixels per source pixel.
    pub scale: f64,
    /// Top-left of the viewport in resampled-image pixels.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Usable viewport extent (smaller than the viewport if the image is).
    pub width: u32,
    pub height: u32,
}

impl Projection {
    /// Source-space footprint `[x0, x1) x [y0, y1)` of viewport pixel `(u, v)`.
    pub fn footprint(&self, u: u32, v: u32) -> (f64, f64, f64, f64) {
        let x0 = (self.origin_x + u as f64) / self.scale;
        let y0 = (self.origin_y + v as f64) / self.scale;
        (x0, y0, x0 + 1.0 / self.scale, y0 + 1.0 / self.scale)
    }
}

/// Zoom level, pan offset and viewport size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: ZoomLevel,
    pub pan_x: f64,
    pub pan_y: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: ZoomLevel::default(),
            pan_x: 0.0,
            pan_y: 0.0,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl ViewTransform {
    /// Change zoom, keeping the panned point under the same relative spot.
    /// Returning to level 0 recenters the view.
    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        let ratio = zoom.factor() / self.zoom.factor();
        self.zoom = zoom;
        if zoom.level() == 0 {
            self.pan_x = 0.0;
            self.pan_y = 0.0;
        } else {
            self.pan_x *= ratio;
            self.pan_y *= ratio;
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Viewport pixels per source pixel for a source of the given width.
    pub fn resample_scale(&self, src_width: usize) -> f64 {
        if src_width == 0 {
            return 1.0;
        }
        self.viewport_width as f64 * self.zoom.factor() / src_width as f64
    }

    /// Largest pan magnitude along each axis that keeps the viewport on the image.
    fn pan_limits(&self, src_width: usize, src_height: usize) -> (f64, f64) {
        let scale = self.resample_scale(src_width);
        let spare_w = (src_width as f64 * scale - self.viewport_width as f64).max(0.0);
        let spare_h = (src_height as f64 * scale - self.viewport_height as f64).max(0.0);
        (spare_w / 2.0, spare_h / 2.0)
    }

    /// Clamp the pan offset so the viewport stays on the resampled image.
    pub fn clamp_pan(&mut self, src_width: usize, src_height: usize) {
        let (lim_x, lim_y) = self.pan_limits(src_width, src_height);
        self.pan_x = self.pan_x.clamp(-lim_x, lim_x);
        self.pan_y = self.pan_y.clamp(-lim_y, lim_y);
    }

    /// Project a source of the given size into the viewport.
    pub fn project(&self, src_width: usize, src_height: usize) -> Projection {
        let scale = self.resample_scale(src_width);
        let (lim_x, lim_y) = self.pan_limits(src_width, src_height);
        let pan_x = self.pan_x.clamp(-lim_x, lim_x);
        let pan_y = self.pan_y.clamp(-lim_y, lim_y);

        let scaled_w = src_width as f64 * scale;
        let scaled_h = src_height as f64 * scale;
        let width = self.viewport_width.min(scaled_w.floor() as u32);
        let height = self.viewport_height.min(scaled_h.floor() as u32);

        Projection {
            scale,
            origin_x: (scaled_w - width as f64) / 2.0 + pan_x,
            origin_y: (scaled_h - height as f64) / 2.0 + pan_y,
            width,
            height,
        }
    }

    /// Pulse milliseconds per viewport pixel for a plate scale given at level 0.
    pub fn ms_per_pixel(&self, scale_ms_per_pixel: u32) -> f64 {
        scale_ms_per_pixel as f64 / self.zoom.factor()
    }
}

/// Everything the operator can move between frames: zoom, pan and the
/// guide window position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub transform: ViewTransform,
    pub center_x: u32,
    pub center_y: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        let transform = ViewTransform::default();
        Self {
            center_x: transform.viewport_width / 2,
            center_y: transform.viewport_height / 2,
            transform,
        }
    }
}

impl ViewState {
    /// Clamp pan and window so the window is analyzable on a frame of this size.
    /// Returns the effective window.
    pub fn clamp_to(
        &mut self,
        src_width: usize,
        src_height: usize,
        crop: u32,
        circular_mask: bool,
    ) -> GuideWindow {
        self.transform.clamp_pan(src_width, src_height);
        let projection = self.transform.project(src_width, src_height);
        let window = GuideWindow::new(self.center_x, self.center_y, crop, circular_mask)
            .clamped(projection.width, projection.height);
        self.center_x = window.center_x;
        self.center_y = window.center_y;
        window
    }
}

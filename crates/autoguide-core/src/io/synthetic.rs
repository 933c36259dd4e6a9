//! A rendered star field whose position responds to guide pulses.
//!
//! [`SyntheticStarSource`] renders frames from a [`SimulatedSky`]; a
//! [`crate::link::SimulatedMount`] holding a clone of the same sky moves
//! the star when pulses arrive. Together they close the guiding loop
//! without hardware.

use std::sync::{Arc, Mutex, MutexGuard};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::{Frame, FrameSource};
use crate::protocol::{CorrectionPulse, Direction};

/// Star field parameters and current star position, in source pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyModel {
    pub width: usize,
    pub height: usize,
    pub background: u8,
    pub peak: u8,
    /// Gaussian sigma of the star profile.
    pub sigma: f64,
    pub star_x: f64,
    pub star_y: f64,
    /// Drift added after every rendered frame.
    pub drift_x: f64,
    pub drift_y: f64,
    /// Pulse milliseconds that move the star by one source pixel.
    pub mount_ms_per_pixel: f64,
}

impl Default for SkyModel {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            background: 12,
            peak: 220,
            sigma: 2.5,
            star_x: 320.0,
            star_y: 240.0,
            drift_x: 0.0,
            drift_y: 0.0,
            mount_ms_per_pixel: 100.0,
        }
    }
}

impl SkyModel {
    /// Render the current star position as a grayscale plane.
    pub fn render(&self) -> Array2<u8> {
        let two_sigma_sq = 2.0 * self.sigma * self.sigma;
        let amplitude = self.peak.saturating_sub(self.background) as f64;
        let bg = self.background as f64;
        Array2::from_shape_fn((self.height, self.width), |(row, col)| {
            let dx = col as f64 - self.star_x;
            let dy = row as f64 - self.star_y;
            let d2 = dx * dx + dy * dy;
            (bg + amplitude * (-d2 / two_sigma_sq).exp()).round().min(255.0) as u8
        })
    }

    /// Move the star the way a mount responds to `pulse`.
    ///
    /// The sensor is mounted so that east and north appear as -x and -y,
    /// the orientation the default inverted axes correct for.
    pub fn apply_pulse(&mut self, pulse: &CorrectionPulse) {
        if self.mount_ms_per_pixel <= 0.0 {
            return;
        }
        let shift = pulse.duration_ms as f64 / self.mount_ms_per_pixel;
        match pulse.direction {
            Direction::East => self.star_x -= shift,
            Direction::West => self.star_x += shift,
            Direction::North => self.star_y -= shift,
            Direction::South => self.star_y += shift,
        }
    }

    fn advance(&mut self) {
        self.star_x += self.drift_x;
        self.star_y += self.drift_y;
    }
}

/// Shared handle on a [`SkyModel`].
#[derive(Clone, Debug, Default)]
pub struct SimulatedSky {
    inner: Arc<Mutex<SkyModel>>,
}

impl SimulatedSky {
    pub fn new(model: SkyModel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(model)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SkyModel> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn position(&self) -> (f64, f64) {
        let sky = self.lock();
        (sky.star_x, sky.star_y)
    }

    pub fn set_position(&self, x: f64, y: f64) {
        let mut sky = self.lock();
        sky.star_x = x;
        sky.star_y = y;
    }

    pub fn apply_pulse(&self, pulse: &CorrectionPulse) {
        self.lock().apply_pulse(pulse);
    }

    pub fn snapshot(&self) -> SkyModel {
        self.lock().clone()
    }
}

/// Frame source rendering a [`SimulatedSky`].
pub struct SyntheticStarSource {
    sky: SimulatedSky,
    remaining: Option<usize>,
    index: usize,
}

impl SyntheticStarSource {
    /// `frames = None` renders forever.
    pub fn new(sky: SimulatedSky, frames: Option<usize>) -> Self {
        Self {
            sky,
            remaining: frames,
            index: 0,
        }
    }

    pub fn sky(&self) -> &SimulatedSky {
        &self.sky
    }
}

impl FrameSource for SyntheticStarSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return Ok(None);
            }
            *remaining -= 1;
        }
        let gray = {
            let mut sky = self.sky.lock();
            let gray = sky.render();
            sky.advance();
            gray
        };
        let frame = Frame::from_gray(&gray)?.with_index(self.index);
        self.index += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

//! Interval-averaged drift control with a dead-band.
//!
//! ```text
//!            guiding on              frame_count > interval
//!   Idle ───────────────► Accumulating ─────────────────────► Correcting
//!    ▲                         ▲                                   │
//!    │ guiding off /           └──── reset both axes ──────────────┘
//!    │ axis disabled
//! ```
//!
//! Each axis runs its own machine; a disabled axis stays `Idle` while the
//! other keeps guiding. When an interval completes both axes are reset.

use tracing::{debug, info};

use crate::config::{AxisConfig, GuideConfig};
use crate::detection::CentroidEstimate;
use crate::protocol::{CorrectionPulse, PulsePair};

use super::axis::{Axis, AxisPhase, AxisState};

/// Control inputs derived from one configuration snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlParams {
    pub guiding: bool,
    pub ra: AxisConfig,
    pub dec: AxisConfig,
    pub interval_frames: u32,
    pub min_correction_ms: u32,
    /// Pulse milliseconds per pixel of drift at the current zoom.
    pub ms_per_pixel: f64,
}

impl ControlParams {
    pub fn new(config: &GuideConfig, ms_per_pixel: f64) -> Self {
        Self {
            guiding: config.auto_guide,
            ra: config.ra,
            dec: config.dec,
            interval_frames: config.interval_frames,
            min_correction_ms: config.min_correction_ms,
            ms_per_pixel,
        }
    }

    /// Smallest drift, in pixels, that produces a pulse. Infinite when the
    /// plate scale is zero.
    pub fn deadband_pixels(&self) -> f64 {
        if self.ms_per_pixel > 0.0 {
            self.min_correction_ms as f64 / self.ms_per_pixel
        } else {
            f64::INFINITY
        }
    }

    fn axis(&self, axis: Axis) -> &AxisConfig {
        match axis {
            Axis::Ra => &self.ra,
            Axis::Dec => &self.dec,
        }
    }

    /// Pulse for a drift of `offset` pixels, or `None` inside the dead-band.
    /// A drift that rounds to a zero-length pulse gives `None` as well.
    fn pulse_for(&self, axis: Axis, offset: f64) -> Option<CorrectionPulse> {
        (offset.abs() > self.deadband_pixels())
            .then(|| CorrectionPulse::from_offset(axis, offset, self.ms_per_pixel))
            .filter(|pulse| !pulse.is_noop())
    }
}

/// Result for one axis on one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisOutcome {
    /// Phase the axis was in while this frame was processed.
    pub phase: AxisPhase,
    /// Interval-averaged drift, set when a correction was evaluated.
    pub mean_error: Option<f64>,
    pub pulse: Option<CorrectionPulse>,
}

/// What the controller decided for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CorrectionDecision {
    pub ra: AxisOutcome,
    pub dec: AxisOutcome,
}

impl CorrectionDecision {
    /// True when an interval completed on this frame.
    pub fn evaluated(&self) -> bool {
        self.ra.phase == AxisPhase::Correcting || self.dec.phase == AxisPhase::Correcting
    }

    pub fn has_pulse(&self) -> bool {
        self.ra.pulse.is_some() || self.dec.pulse.is_some()
    }

    pub fn pulses(&self) -> PulsePair {
        PulsePair::new(self.ra.pulse, self.dec.pulse)
    }
}

/// Per-axis accumulation state for a guiding session.
#[derive(Clone, Debug, Default)]
pub struct DriftController {
    ra: AxisState,
    dec: AxisState,
}

impl DriftController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Ra => &self.ra,
            Axis::Dec => &self.dec,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Ra => &mut self.ra,
            Axis::Dec => &mut self.dec,
        }
    }

    /// Drop all accumulated drift and return both axes to `Idle`.
    pub fn stop(&mut self) {
        for axis in [Axis::Ra, Axis::Dec] {
            let state = self.axis_mut(axis);
            state.reset();
            state.phase = AxisPhase::Idle;
        }
    }

    /// Advance the state machine by one frame.
    pub fn update(
        &mut self,
        estimate: &CentroidEstimate,
        valid: bool,
        params: &ControlParams,
    ) -> CorrectionDecision {
        if !params.guiding {
            if self.ra.phase != AxisPhase::Idle || self.dec.phase != AxisPhase::Idle {
                info!("Guiding disabled, resetting accumulators");
            }
            self.stop();
            return CorrectionDecision::default();
        }

        let offsets = [(Axis::Ra, estimate.dx), (Axis::Dec, estimate.dy)];
        let mut due = false;

        for (axis, offset) in offsets {
            let config = *params.axis(axis);
            let state = self.axis_mut(axis);
            state.apply_config(&config);

            if !state.enabled {
                state.reset();
                state.phase = AxisPhase::Idle;
                continue;
            }
            if state.phase == AxisPhase::Idle {
                debug!(%axis, "Axis guiding started");
                state.phase = AxisPhase::Accumulating;
            }
            if valid {
                state.accumulate(offset as f64);
            }
            if state.frame_count > params.interval_frames {
                state.phase = AxisPhase::Correcting;
                due = true;
            }
        }

        let mut decision = CorrectionDecision::default();
        for axis in [Axis::Ra, Axis::Dec] {
            let state = self.axis_mut(axis);
            let mut outcome = AxisOutcome {
                phase: state.phase,
                ..Default::default()
            };

            if due && state.enabled {
                outcome.phase = AxisPhase::Correcting;
                outcome.mean_error = state.mean_error();
                if valid {
                    outcome.pulse = outcome
                        .mean_error
                        .and_then(|err| params.pulse_for(axis, err));
                }
                debug!(
                    %axis,
                    mean_error = ?outcome.mean_error,
                    pulse = ?outcome.pulse,
                    "Interval complete"
                );
            }

            if due {
                state.reset();
                if state.enabled {
                    state.phase = AxisPhase::Accumulating;
                }
            }

            match axis {
                Axis::Ra => decision.ra = outcome,
                Axis::Dec => decision.dec = outcome,
            }
        }

        decision
    }
}

/// Single-frame correction that would be sent for this estimate.
/// Display only; the controller never transmits it.
pub fn preview_pulses(estimate: &CentroidEstimate, valid: bool, params: &ControlParams) -> PulsePair {
    if !valid {
        return PulsePair::default();
    }
    let ra = params
        .ra
        .enabled
        .then(|| params.pulse_for(Axis::Ra, estimate.dx as f64))
        .flatten();
    let dec = params
        .dec
        .enabled
        .then(|| params.pulse_for(Axis::Dec, estimate.dy as f64))
        .flatten();
    PulsePair::new(ra, dec)
}

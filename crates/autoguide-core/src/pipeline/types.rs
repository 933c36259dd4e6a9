use ndarray::Array2;

use crate::control::CorrectionDecision;
use crate::detection::CentroidEstimate;
use crate::error::GuideError;
use crate::protocol::{JogCommand, PulsePair, TelemetryRecord};
use crate::region::GuideWindow;

/// Everything computed for one frame.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub frame_index: usize,
    /// Window actually analyzed, after clamping.
    pub window: GuideWindow,
    pub estimate: CentroidEstimate,
    pub valid: bool,
    pub decision: CorrectionDecision,
    /// Single-frame correction for display. Never transmitted.
    pub preview: PulsePair,
    pub ms_per_pixel: f64,
    pub deadband_pixels: f64,
    /// Binary star mask, kept only when preview is enabled.
    pub star_mask: Option<Array2<u8>>,
    /// Correction written to the mount on this frame.
    pub sent: Option<PulsePair>,
    /// Correction decided but lost to a link failure.
    pub dropped: Option<PulsePair>,
}

/// Why [`crate::pipeline::Session::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    SourceExhausted,
    FrameLimit,
    Shutdown,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceExhausted => write!(f, "source exhausted"),
            Self::FrameLimit => write!(f, "frame limit reached"),
            Self::Shutdown => write!(f, "shutdown requested"),
        }
    }
}

/// Totals for a guiding run.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub frames: usize,
    pub valid_frames: usize,
    /// Intervals that completed and were evaluated.
    pub intervals: usize,
    pub corrections_sent: usize,
    pub corrections_dropped: usize,
    pub ra_ms_sent: u64,
    pub dec_ms_sent: u64,
    pub stop_reason: StopReason,
    pub last_report: Option<FrameReport>,
}

impl SessionSummary {
    pub(super) fn new() -> Self {
        Self {
            frames: 0,
            valid_frames: 0,
            intervals: 0,
            corrections_sent: 0,
            corrections_dropped: 0,
            ra_ms_sent: 0,
            dec_ms_sent: 0,
            stop_reason: StopReason::SourceExhausted,
            last_report: None,
        }
    }

    pub(super) fn record(&mut self, report: &FrameReport) {
        self.frames += 1;
        if report.valid {
            self.valid_frames += 1;
        }
        if report.decision.evaluated() {
            self.intervals += 1;
        }
        if let Some(pair) = report.sent {
            self.corrections_sent += 1;
            self.ra_ms_sent += pair.ra.duration_ms as u64;
            self.dec_ms_sent += pair.dec.duration_ms as u64;
        }
        if report.dropped.is_some() {
            self.corrections_dropped += 1;
        }
        self.last_report = Some(report.clone());
    }
}

/// Display-side hooks for a guiding session.
///
/// All methods have default no-op implementations.
pub trait GuideReporter: Send + Sync {
    /// A frame finished processing.
    fn frame_processed(&self, _report: &FrameReport) {}

    /// A correction event was written to the mount.
    fn pulses_sent(&self, _pulses: &PulsePair) {}

    /// A correction event could not be written and was discarded.
    fn pulse_dropped(&self, _pulses: &PulsePair, _error: &GuideError) {}

    /// A manual jog was written to the mount.
    fn jog_sent(&self, _jog: &JogCommand) {}

    /// A telemetry line arrived from the mount.
    fn telemetry(&self, _record: &TelemetryRecord) {}
}

pub struct NoOpReporter;
impl GuideReporter for NoOpReporter {}

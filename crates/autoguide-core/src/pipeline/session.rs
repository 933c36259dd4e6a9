use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;

use tracing::{info, warn};

use crate::config::GuideConfig;
use crate::error::{GuideError, Result};
use crate::frame::FrameSource;
use crate::link::{send_jog, send_pulses, MountLink};
use crate::protocol::{JogCommand, TelemetryRecord};
use crate::region::ViewState;

use super::guider::Guider;
use super::types::{FrameReport, GuideReporter, SessionSummary, StopReason};

/// Frame-synchronous guiding loop.
///
/// Each [`Session::step`] completes one acquire, extract, locate, control,
/// encode and transmit cycle before the next frame is requested.
/// Configuration and view changes made between steps apply to the next frame.
pub struct Session {
    source: Box<dyn FrameSource>,
    link: Option<Box<dyn MountLink>>,
    telemetry: Option<Receiver<TelemetryRecord>>,
    guider: Guider,
    config: GuideConfig,
    view: ViewState,
}

impl Session {
    pub fn new(source: Box<dyn FrameSource>, config: GuideConfig) -> Self {
        Self {
            source,
            link: None,
            telemetry: None,
            guider: Guider::new(),
            config: config.sanitized(),
            view: ViewState::default(),
        }
    }

    /// Without a link every stage still runs; nothing is transmitted.
    pub fn with_link(mut self, link: Box<dyn MountLink>) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_telemetry(mut self, telemetry: Receiver<TelemetryRecord>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GuideConfig {
        &mut self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn guider(&self) -> &Guider {
        &self.guider
    }

    pub fn has_link(&self) -> bool {
        self.link.is_some()
    }

    /// Process one frame. Returns `None` once the source is exhausted.
    pub fn step(&mut self, reporter: &dyn GuideReporter) -> Result<Option<FrameReport>> {
        let Some(frame) = self.source.next_frame()? else {
            return Ok(None);
        };

        let config = self.config.sanitized();
        let mut report = self.guider.process_frame(&frame, &mut self.view, &config);

        if report.decision.has_pulse() {
            let pulses = report.decision.pulses();
            match self.link.as_deref_mut() {
                Some(link) => match send_pulses(link, &pulses) {
                    Ok(()) => {
                        info!(%pulses, "Correction sent");
                        reporter.pulses_sent(&pulses);
                        report.sent = Some(pulses);
                    }
                    Err(e) => {
                        warn!(%pulses, error = %e, "Correction dropped");
                        reporter.pulse_dropped(&pulses, &e);
                        report.dropped = Some(pulses);
                    }
                },
                None => info!(%pulses, "Correction computed, no mount link"),
            }
        }

        self.drain_telemetry(reporter);
        reporter.frame_processed(&report);
        Ok(Some(report))
    }

    /// Step until the source ends, `max_frames` frames have been processed,
    /// or `shutdown` is set. The frame in progress always completes.
    /// The mount link is closed when the loop ends.
    pub fn run(
        &mut self,
        reporter: &dyn GuideReporter,
        shutdown: &AtomicBool,
        max_frames: Option<usize>,
    ) -> Result<SessionSummary> {
        info!(source = self.source.name(), "Guiding session started");
        let mut summary = SessionSummary::new();

        loop {
            if shutdown.load(Ordering::Relaxed) {
                summary.stop_reason = StopReason::Shutdown;
                break;
            }
            if max_frames.is_some_and(|max| summary.frames >= max) {
                summary.stop_reason = StopReason::FrameLimit;
                break;
            }
            match self.step(reporter)? {
                Some(report) => summary.record(&report),
                None => {
                    summary.stop_reason = StopReason::SourceExhausted;
                    break;
                }
            }
        }

        self.guider.stop();
        self.close_link();
        info!(
            frames = summary.frames,
            corrections = summary.corrections_sent,
            reason = %summary.stop_reason,
            "Guiding session ended"
        );
        Ok(summary)
    }

    /// Write a manual jog on the mount link.
    pub fn jog(&mut self, jog: &JogCommand, reporter: &dyn GuideReporter) -> Result<()> {
        let link = self.link.as_deref_mut().ok_or(GuideError::LinkClosed)?;
        send_jog(link, jog)?;
        info!(direction = %jog.direction, duration_ms = jog.duration_ms, "Jog sent");
        reporter.jog_sent(jog);
        Ok(())
    }

    fn drain_telemetry(&mut self, reporter: &dyn GuideReporter) {
        if let Some(rx) = &self.telemetry {
            for record in rx.try_iter() {
                reporter.telemetry(&record);
            }
        }
    }

    fn close_link(&mut self) {
        if let Some(link) = self.link.take() {
            info!(link = link.name(), "Closing mount link");
        }
    }
}

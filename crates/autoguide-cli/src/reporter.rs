use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use autoguide_core::error::GuideError;
use autoguide_core::pipeline::{FrameReport, GuideReporter};
use autoguide_core::protocol::{JogCommand, PulsePair, TelemetryRecord};

/// Progress bar plus a log line per correction event.
pub struct ConsoleReporter {
    pb: ProgressBar,
    show_telemetry: bool,
    sent: Style,
    dropped: Style,
    dim: Style,
}

impl ConsoleReporter {
    /// `total = None` shows a spinner instead of a bar.
    pub fn new(total: Option<usize>, show_telemetry: bool) -> anyhow::Result<Self> {
        let pb = match total {
            Some(n) => {
                let pb = ProgressBar::new(n as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{msg:32} [{bar:40}] {pos}/{len}")?
                        .progress_chars("=> "),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(ProgressStyle::default_spinner().template("{spinner} {pos} frames  {msg}")?);
                pb
            }
        };
        Ok(Self {
            pb,
            show_telemetry,
            sent: Style::new().green(),
            dropped: Style::new().red().bold(),
            dim: Style::new().dim(),
        })
    }

    pub fn finish(&self) {
        self.pb.finish_with_message("Done");
    }
}

impl GuideReporter for ConsoleReporter {
    fn frame_processed(&self, report: &FrameReport) {
        let msg = if report.valid {
            format!(
                "dx {:+4} dy {:+4} lit {:5}",
                report.estimate.dx, report.estimate.dy, report.estimate.total_lit_pixels
            )
        } else {
            "no star".to_string()
        };
        self.pb.set_message(msg);
        self.pb.inc(1);
    }

    fn pulses_sent(&self, pulses: &PulsePair) {
        self.pb
            .println(format!("  {} {}", self.sent.apply_to("sent"), pulses));
    }

    fn pulse_dropped(&self, pulses: &PulsePair, error: &GuideError) {
        self.pb.println(format!(
            "  {} {} ({})",
            self.dropped.apply_to("dropped"),
            pulses,
            error
        ));
    }

    fn jog_sent(&self, jog: &JogCommand) {
        self.pb.println(format!(
            "  {} {}",
            self.sent.apply_to("jog"),
            String::from_utf8_lossy(&jog.encode())
        ));
    }

    fn telemetry(&self, record: &TelemetryRecord) {
        if self.show_telemetry {
            self.pb
                .println(format!("  {}", self.dim.apply_to(format!("{record:?}"))));
        }
    }
}

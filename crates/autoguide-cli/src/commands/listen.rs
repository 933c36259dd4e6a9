use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use console::Style;

use autoguide_core::link::{spawn_listener, SerialLink};
use autoguide_core::protocol::TelemetryRecord;

use super::PortArgs;

#[derive(Args)]
pub struct ListenArgs {
    #[command(flatten)]
    pub port: PortArgs,

    /// Stop after this many seconds
    #[arg(long, default_value = "10")]
    pub seconds: u64,
}

pub fn run(args: &ListenArgs) -> Result<()> {
    let link = SerialLink::open(&args.port.port, args.port.baud, args.port.timeout())
        .with_context(|| format!("Failed to open mount port {}", args.port.port))?;
    let shutdown = Arc::new(AtomicBool::new(false));
    let (listener, rx) = spawn_listener(link.reader()?, Arc::clone(&shutdown));

    let tag = Style::new().cyan();
    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match rx.recv_timeout(remaining) {
            Ok(TelemetryRecord::Report { tag: t, value }) => {
                println!("{:<8}{}", tag.apply_to(t), value);
            }
            Ok(TelemetryRecord::Status(fields)) => {
                println!("{:<8}{}", tag.apply_to("status"), fields.join(" | "));
            }
            Ok(TelemetryRecord::Other(text)) => println!("{:<8}{}", "", text),
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                println!("Mount link closed");
                break;
            }
        }
    }

    shutdown.store(true, Ordering::Relaxed);
    listener.stop();
    Ok(())
}

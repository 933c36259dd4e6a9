use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use autoguide_core::consts::{DEFAULT_BAUD_RATE, DEFAULT_LINK_TIMEOUT_MS};
use autoguide_core::io::save_mask_png;
use autoguide_core::link::{spawn_listener, SerialLink};
use autoguide_core::pipeline::Session;

use crate::reporter::ConsoleReporter;
use crate::summary::{print_config_summary, print_session_summary};

use super::{open_source, GuideArgs};

#[derive(Args)]
pub struct RunArgs {
    /// Frames to guide from: SER file, directory of images, or one image
    pub input: PathBuf,

    #[command(flatten)]
    pub guide: GuideArgs,

    /// Serial port of the mount; without it corrections are only shown
    #[arg(long)]
    pub port: Option<String>,

    /// Line speed
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Bounded wait for each write, in milliseconds
    #[arg(long, default_value_t = DEFAULT_LINK_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Print mount telemetry while guiding
    #[arg(long)]
    pub telemetry: bool,

    /// Stop after this many frames
    #[arg(long)]
    pub frames: Option<usize>,

    /// Restart a SER recording when it ends
    #[arg(long = "loop")]
    pub looping: bool,

    /// Save the star mask of the last frame as PNG
    #[arg(long)]
    pub save_mask: Option<PathBuf>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = args.guide.load_config()?;
    config.preview |= args.save_mask.is_some();
    let view = args.guide.view();

    let source = open_source(&args.input, args.looping)?;
    let source_name = source.name().to_string();
    let shutdown = Arc::new(AtomicBool::new(false));

    let mut session = Session::new(source, config.clone()).with_view(view);
    let mut listener = None;

    if let Some(ref port) = args.port {
        let link = SerialLink::open(
            port,
            args.baud,
            std::time::Duration::from_millis(args.timeout_ms),
        )
        .with_context(|| format!("Failed to open mount port {port}"))?;
        if args.telemetry {
            let (handle, rx) = spawn_listener(link.reader()?, Arc::clone(&shutdown));
            listener = Some(handle);
            session = session.with_telemetry(rx);
        }
        session = session.with_link(Box::new(link));
    } else {
        warn!("No mount port given, corrections will not be transmitted");
    }

    print_config_summary(&config, &view, &source_name, args.port.as_deref());
    if !config.auto_guide {
        println!("  Guiding is off; pass --guide to send corrections.\n");
    }
    println!("  Press Enter to stop.\n");

    let stop = Arc::clone(&shutdown);
    std::thread::spawn(move || {
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).is_ok() {
            stop.store(true, Ordering::Relaxed);
        }
    });

    let reporter = ConsoleReporter::new(args.frames, args.telemetry)?;
    let summary = session.run(&reporter, &shutdown, args.frames)?;
    reporter.finish();

    shutdown.store(true, Ordering::Relaxed);
    if let Some(listener) = listener {
        listener.stop();
    }

    if let Some(ref path) = args.save_mask {
        save_mask_png(session.guider().star_mask(), path)
            .with_context(|| format!("Failed to save star mask {}", path.display()))?;
        println!("Star mask saved to {}", path.display());
    }

    print_session_summary(&summary);
    Ok(())
}

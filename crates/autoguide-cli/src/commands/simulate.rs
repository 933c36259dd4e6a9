use std::sync::atomic::AtomicBool;

use anyhow::Result;
use clap::Args;
use console::Style;

use autoguide_core::io::{SimulatedSky, SkyModel, SyntheticStarSource};
use autoguide_core::link::SimulatedMount;
use autoguide_core::pipeline::Session;

use crate::reporter::ConsoleReporter;
use crate::summary::{print_config_summary, print_session_summary};

use super::GuideArgs;

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub guide: GuideArgs,

    /// Frames to render
    #[arg(long, default_value = "200")]
    pub frames: usize,

    /// Initial star offset from the frame center, in pixels
    #[arg(long, default_value = "8.0", allow_hyphen_values = true)]
    pub offset_x: f64,

    #[arg(long, default_value = "-5.0", allow_hyphen_values = true)]
    pub offset_y: f64,

    /// Star drift per frame along x, in pixels
    #[arg(long, default_value = "0.2", allow_hyphen_values = true)]
    pub drift_x: f64,

    /// Star drift per frame along y, in pixels
    #[arg(long, default_value = "-0.1", allow_hyphen_values = true)]
    pub drift_y: f64,

    /// Gaussian sigma of the star, in pixels
    #[arg(long, default_value = "2.5")]
    pub sigma: f64,

    /// Pulse milliseconds that move the star one pixel
    #[arg(long, default_value = "100.0")]
    pub mount_ms_per_pixel: f64,
}

/// Close the loop against a rendered star and report how well it held.
pub fn run(args: &SimulateArgs) -> Result<()> {
    let mut config = args.guide.load_config()?;
    config.auto_guide = true;
    let view = args.guide.view();

    let model = SkyModel {
        sigma: args.sigma,
        drift_x: args.drift_x,
        drift_y: args.drift_y,
        mount_ms_per_pixel: args.mount_ms_per_pixel,
        ..SkyModel::default()
    };
    let (cx, cy) = (model.width as f64 / 2.0, model.height as f64 / 2.0);
    let sky = SimulatedSky::new(SkyModel {
        star_x: cx + args.offset_x,
        star_y: cy + args.offset_y,
        ..model
    });

    let source = SyntheticStarSource::new(sky.clone(), Some(args.frames));
    let mount = SimulatedMount::new(sky.clone());
    let mut session = Session::new(Box::new(source), config.clone())
        .with_view(view)
        .with_link(Box::new(mount));

    print_config_summary(&config, &view, "synthetic star", Some("simulated mount"));

    let reporter = ConsoleReporter::new(Some(args.frames), false)?;
    let summary = session.run(&reporter, &AtomicBool::new(false), None)?;
    reporter.finish();

    print_session_summary(&summary);

    let (x, y) = sky.position();
    let unguided_x = cx + args.offset_x + args.drift_x * args.frames as f64;
    let unguided_y = cy + args.offset_y + args.drift_y * args.frames as f64;
    let value = Style::new().bold().white();
    println!(
        "  Final star error   {}",
        value.apply_to(format!("{:+.2}, {:+.2} px", x - cx, y - cy))
    );
    println!(
        "  Unguided error     {}",
        value.apply_to(format!("{:+.2}, {:+.2} px", unguided_x - cx, unguided_y - cy))
    );
    println!();
    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::Style;

use autoguide_core::io::save_mask_png;
use autoguide_core::pipeline::{NoOpReporter, Session};

use crate::summary::print_config_summary;

use super::{open_source, GuideArgs};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// SER file, directory of images, or one image
    pub input: PathBuf,

    #[command(flatten)]
    pub guide: GuideArgs,

    /// Analyze at most this many frames
    #[arg(long)]
    pub frames: Option<usize>,

    /// Save the star mask of the last frame as PNG
    #[arg(long)]
    pub save_mask: Option<PathBuf>,
}

/// Print the star estimate and the single-frame correction for each frame.
pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let config = args.guide.load_config()?;
    let view = args.guide.view();
    let source = open_source(&args.input, false)?;
    let source_name = source.name().to_string();
    print_config_summary(&config, &view, &source_name, None);

    let mut session = Session::new(source, config).with_view(view);
    let valid_style = Style::new().green();
    let invalid_style = Style::new().dim().yellow();

    println!(
        "  {:>6}  {:>5} {:>5}  {:>6} {:>5}  {:<8} {}",
        "frame", "dx", "dy", "lit", "range", "star", "correction"
    );

    let mut processed = 0usize;
    let mut valid = 0usize;
    while args.frames.map_or(true, |max| processed < max) {
        let Some(report) = session.step(&NoOpReporter)? else {
            break;
        };
        processed += 1;
        let star = if report.valid {
            valid += 1;
            valid_style.apply_to("found")
        } else {
            invalid_style.apply_to("none")
        };
        println!(
            "  {:>6}  {:>+5} {:>+5}  {:>6} {:>5}  {:<8} {}",
            report.frame_index,
            report.estimate.dx,
            report.estimate.dy,
            report.estimate.total_lit_pixels,
            report.estimate.intensity_range,
            star,
            report.preview
        );
    }

    println!();
    println!("  {valid} of {processed} frames contain a usable star");

    if let Some(ref path) = args.save_mask {
        save_mask_png(session.guider().star_mask(), path)
            .with_context(|| format!("Failed to save star mask {}", path.display()))?;
        println!("  Star mask saved to {}", path.display());
    }

    Ok(())
}

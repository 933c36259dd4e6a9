pub mod analyze;
pub mod config;
pub mod jog;
pub mod listen;
pub mod run;
pub mod simulate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use autoguide_core::config::{GuideConfig, OccupancyRule, ThresholdPolicy};
use autoguide_core::consts::{DEFAULT_BAUD_RATE, DEFAULT_LINK_TIMEOUT_MS};
use autoguide_core::frame::FrameSource;
use autoguide_core::io::{load_frame, ImageSequenceSource, SerFrameSource};
use autoguide_core::region::{ViewState, ZoomLevel};

/// Guiding tunables shared by every guiding command.
#[derive(Args)]
pub struct GuideArgs {
    /// Guide config file (TOML); flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Guide window half-size in pixels (10-180)
    #[arg(long)]
    pub crop: Option<u32>,

    /// Fixed binarization level (1-255), 0 for automatic
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Pulse milliseconds per pixel of drift at zoom 0
    #[arg(long)]
    pub scale: Option<u32>,

    /// Dead-band as a pulse duration in milliseconds
    #[arg(long)]
    pub min_correction: Option<u32>,

    /// Frames averaged per correction
    #[arg(long)]
    pub interval: Option<u32>,

    /// Send corrections (off shows decisions only)
    #[arg(long)]
    pub guide: bool,

    /// Do not invert the RA offset
    #[arg(long)]
    pub no_invert_ra: bool,

    /// Do not invert the DEC offset
    #[arg(long)]
    pub no_invert_dec: bool,

    /// Disable RA corrections
    #[arg(long)]
    pub no_ra: bool,

    /// Disable DEC corrections
    #[arg(long)]
    pub no_dec: bool,

    /// Analyze the full square window instead of its inscribed disk
    #[arg(long)]
    pub square_window: bool,

    /// Binning level (0-3)
    #[arg(long)]
    pub binning: Option<u8>,

    /// Noise-suppression level (0-3)
    #[arg(long)]
    pub noise: Option<u8>,

    /// Noise suppression requires a (k+2)x(k+2) lit block
    #[arg(long)]
    pub padded_noise: bool,

    /// Minimum star contrast (max - min intensity)
    #[arg(long)]
    pub contrast_limit: Option<u8>,

    /// Zoom level (0-6)
    #[arg(long, default_value = "0")]
    pub zoom: u8,

    /// Guide window center in viewport pixels, as X,Y
    #[arg(long, value_parser = parse_point)]
    pub center: Option<(u32, u32)>,
}

fn parse_point(s: &str) -> std::result::Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y: {e}"))?;
    Ok((x, y))
}

impl GuideArgs {
    /// Config file (or defaults) with command-line overrides, sanitized.
    pub fn load_config(&self) -> Result<GuideConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str(&contents).context("Invalid guide config")?
            }
            None => GuideConfig::default(),
        };

        if let Some(crop) = self.crop {
            config.crop = crop;
        }
        if let Some(level) = self.threshold {
            config.threshold = ThresholdPolicy::from_level(level as i64);
        }
        if let Some(scale) = self.scale {
            config.scale_ms_per_pixel = scale;
        }
        if let Some(ms) = self.min_correction {
            config.min_correction_ms = ms;
        }
        if let Some(frames) = self.interval {
            config.interval_frames = frames;
        }
        if self.guide {
            config.auto_guide = true;
        }
        if self.no_invert_ra {
            config.ra.inverted = false;
        }
        if self.no_invert_dec {
            config.dec.inverted = false;
        }
        if self.no_ra {
            config.ra.enabled = false;
        }
        if self.no_dec {
            config.dec.enabled = false;
        }
        if self.square_window {
            config.circular_mask = false;
        }
        if let Some(level) = self.binning {
            config.binning = level;
        }
        if let Some(level) = self.noise {
            config.noise_level = level;
        }
        if self.padded_noise {
            config.noise_occupancy = OccupancyRule::Padded;
        }
        if let Some(limit) = self.contrast_limit {
            config.contrast_limit = limit;
        }

        Ok(config.sanitized())
    }

    pub fn view(&self) -> ViewState {
        let mut view = ViewState::default();
        view.transform.set_zoom(ZoomLevel::new(self.zoom));
        if let Some((x, y)) = self.center {
            view.center_x = x;
            view.center_y = y;
        }
        view
    }
}

/// Mount serial port settings.
#[derive(Args)]
pub struct PortArgs {
    /// Serial port of the mount controller
    #[arg(long)]
    pub port: String,

    /// Line speed
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Bounded wait for each write, in milliseconds
    #[arg(long, default_value_t = DEFAULT_LINK_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

impl PortArgs {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Open a recording: `.ser` file, directory of images, or a single image.
pub fn open_source(path: &Path, looping: bool) -> Result<Box<dyn FrameSource>> {
    if path.is_dir() {
        let source = ImageSequenceSource::from_dir(path)
            .with_context(|| format!("Failed to list images in {}", path.display()))?;
        if source.is_empty() {
            anyhow::bail!("No images found in {}", path.display());
        }
        return Ok(Box::new(source));
    }

    let is_ser = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ser"));
    if is_ser {
        let source = SerFrameSource::open(path, looping)
            .with_context(|| format!("Failed to open SER file {}", path.display()))?;
        return Ok(Box::new(source));
    }

    load_frame(path).with_context(|| format!("Failed to load image {}", path.display()))?;
    Ok(Box::new(ImageSequenceSource::from_paths(vec![path.to_path_buf()])))
}

/// Minimum window pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Fraction of the intensity range above the minimum used by the auto threshold.
pub const AUTO_THRESHOLD_FRACTION: f32 = 0.66;

/// Default guide window half-size in pixels.
pub const DEFAULT_CROP: u32 = 60;

/// Smallest allowed guide window half-size.
pub const MIN_CROP: u32 = 10;

/// Largest allowed guide window half-size.
pub const MAX_CROP: u32 = 180;

/// Default plate scale, milliseconds of guide pulse per pixel of drift.
pub const DEFAULT_SCALE_MS_PER_PIXEL: u32 = 100;

/// Default dead-band expressed as a pulse duration.
pub const DEFAULT_MIN_CORRECTION_MS: u32 = 100;

/// Upper bound for the configurable dead-band.
pub const MAX_MIN_CORRECTION_MS: u32 = 1000;

/// Default number of frames averaged before a correction is evaluated.
pub const DEFAULT_INTERVAL_FRAMES: u32 = 10;

/// Upper bound for the correction interval.
pub const MAX_INTERVAL_FRAMES: u32 = 100;

/// Largest binning and noise-suppression level.
pub const MAX_FILTER_LEVEL: u8 = 3;

/// Default minimum star contrast (max - min intensity) for a valid detection.
pub const DEFAULT_CONTRAST_LIMIT: u8 = 90;

/// A detection needs strictly more lit pixels than this.
pub const DEFAULT_MIN_LIT_PIXELS: u32 = 10;

/// Largest duration representable in the four-digit pulse field.
pub const MAX_PULSE_MS: u32 = 9999;

/// Duration used for manual jog commands.
pub const DEFAULT_JOG_MS: u32 = 250;

/// Length of one encoded pulse command (`:Mg` + direction + 4 digits).
pub const PULSE_COMMAND_LEN: usize = 8;

/// Default viewport the window coordinates refer to.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 640;

/// Default viewport height.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 362;

/// Display scale factor per zoom level, relative to a viewport-wide image.
/// Level 6 is the deepest zoom; the factor table stops there.
pub const ZOOM_SCALES: [f64; 7] = [1.0, 1.25, 1.5, 2.0, 2.531, 3.0, 4.047];

/// Default serial line speed of the mount controller.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Bounded wait for a single command write to the mount.
pub const DEFAULT_LINK_TIMEOUT_MS: u64 = 500;

mod common;

use autoguide_core::config::{AxisConfig, GuideConfig, ThresholdPolicy};
use autoguide_core::detection::{CentroidEstimate, DetectionLimits, StarLocator};
use autoguide_core::region::{GuideWindow, RegionExtractor, ViewTransform};

use common::frame_with_patches;

/// Viewport-sized frame so the default view maps pixels 1:1.
const WIDTH: usize = 640;
const HEIGHT: usize = 362;
const CX: u32 = 320;
const CY: u32 = 181;

fn plain_config() -> GuideConfig {
    GuideConfig {
        crop: 60,
        circular_mask: false,
        ra: AxisConfig {
            enabled: true,
            inverted: false,
        },
        dec: AxisConfig {
            enabled: true,
            inverted: false,
        },
        ..GuideConfig::default()
    }
}

/// Patch whose median boundary lands at `(dx, dy)` from the window center.
fn patch_at(dx: i32, dy: i32, size: usize) -> (usize, usize, usize, u8) {
    let half = size as i32 / 2;
    let left = (CX as i32 + dx - half) as usize;
    let top = (CY as i32 + dy - half) as usize;
    (left, top, size, 200)
}

fn locate_on(
    config: &GuideConfig,
    background: u8,
    patches: &[(usize, usize, usize, u8)],
) -> (CentroidEstimate, u32) {
    let frame = frame_with_patches(WIDTH, HEIGHT, background, patches);
    let mut extractor = RegionExtractor::new();
    let window = GuideWindow::new(CX, CY, config.crop, config.circular_mask);
    let region = extractor.extract(&frame, &ViewTransform::default(), &window);
    let mut locator = StarLocator::new();
    (locator.locate(&region, config), region.window.half_size)
}

fn locate(config: &GuideConfig, patches: &[(usize, usize, usize, u8)]) -> (CentroidEstimate, u32) {
    locate_on(config, 10, patches)
}

#[test]
fn test_patch_offset_scenario() {
    let config = plain_config();
    let (est, half) = locate(&config, &[patch_at(15, -8, 6)]);

    assert_eq!(half, 60);
    assert_eq!(est.total_lit_pixels, 36);
    assert!((est.dx - 15).abs() <= 1, "dx = {}", est.dx);
    assert!((est.dy + 8).abs() <= 1, "dy = {}", est.dy);
    assert_eq!(est.intensity_range, 190);

    let limits = DetectionLimits::new(&config, half);
    assert_eq!(limits.max_lit_pixels, 3600);
    assert!(est.is_valid(&limits));
}

#[test]
fn test_inversion_flips_sign() {
    let mut config = plain_config();
    let (plain, _) = locate(&config, &[patch_at(15, -8, 6)]);
    config.ra.inverted = true;
    config.dec.inverted = true;
    let (inverted, _) = locate(&config, &[patch_at(15, -8, 6)]);
    assert_eq!(inverted.dx, -plain.dx);
    assert_eq!(inverted.dy, -plain.dy);
    assert_eq!(inverted.column, plain.column);
}

#[test]
fn test_empty_window_is_invalid() {
    let config = plain_config();
    let (est, half) = locate(&config, &[]);
    // Flat region: everything is lit and there is no contrast.
    assert_eq!(est.intensity_range, 0);
    assert_eq!(est.total_lit_pixels, 120 * 120);
    assert!(!est.is_valid(&DetectionLimits::new(&config, half)));
}

#[test]
fn test_faint_star_fails_contrast() {
    let config = plain_config();
    let (left, top, size, _) = patch_at(0, 0, 6);
    let (est, half) = locate(&config, &[(left, top, size, 60)]);
    assert_eq!(est.intensity_range, 50);
    assert!(!est.is_valid(&DetectionLimits::new(&config, half)));
}

#[test]
fn test_tiny_star_fails_lit_count() {
    let config = plain_config();
    let (est, half) = locate(&config, &[patch_at(5, 5, 3)]);
    assert_eq!(est.total_lit_pixels, 9);
    assert!(!est.is_valid(&DetectionLimits::new(&config, half)));
}

#[test]
fn test_fixed_threshold_above_star_lights_nothing() {
    let mut config = plain_config();
    config.threshold = ThresholdPolicy::Fixed(250);
    let (est, _) = locate(&config, &[patch_at(15, -8, 6)]);
    assert_eq!(est.total_lit_pixels, 0);
    assert_eq!(est.column, 0);
}

#[test]
fn test_noise_suppression_drops_hot_pixel() {
    let mut config = plain_config();
    config.noise_level = 2;
    let star = patch_at(-10, 4, 6);
    let hot = (CX as usize + 40, CY as usize - 40, 1, 200);
    let (est, _) = locate(&config, &[star, hot]);
    // A 6x6 block keeps 5x5 positions at level 2.
    assert_eq!(est.total_lit_pixels, 25);
    assert!((est.dx + 10).abs() <= 1, "dx = {}", est.dx);
}

#[test]
fn test_binning_boosts_faint_star() {
    let mut config = plain_config();
    config.binning = 1;
    let (left, top, size, _) = patch_at(8, 8, 8);
    let (est, half) = locate(&config, &[(left, top, size, 60)]);
    // 2x2 sums inside the star saturate nothing; the unfilled border is 0.
    assert_eq!(est.intensity_range, 240);
    assert!(est.is_valid(&DetectionLimits::new(&config, half)));
}

#[test]
fn test_locator_reuses_buffers_across_crop_changes() {
    let frame = frame_with_patches(WIDTH, HEIGHT, 10, &[patch_at(3, 3, 6)]);
    let mut extractor = RegionExtractor::new();
    let mut locator = StarLocator::new();
    let view = ViewTransform::default();
    for crop in [60, 30, 60] {
        let mut config = plain_config();
        config.crop = crop;
        let region = extractor.extract(&frame, &view, &GuideWindow::new(CX, CY, crop, false));
        let est = locator.locate(&region, &config);
        assert_eq!(locator.last_mask().dim(), (crop as usize * 2, crop as usize * 2));
        assert_eq!(est.total_lit_pixels, 36);
    }
}

#[test]
fn test_saturated_window_is_invalid_with_disk_mask() {
    let config = GuideConfig::default();
    assert!(config.circular_mask);
    let (est, half) = locate_on(&config, 255, &[]);
    // Masked corners read 0, so the range is full scale; the lit disk is too large.
    assert_eq!(est.intensity_range, 255);
    assert!(est.total_lit_pixels > half * half);
    assert!(!est.is_valid(&DetectionLimits::new(&config, half)));
}

#[test]
fn test_flat_bright_background_is_invalid_with_disk_mask() {
    let config = GuideConfig::default();
    let (est, half) = locate_on(&config, 120, &[]);
    assert_eq!(est.intensity_range, 120);
    assert!(!est.is_valid(&DetectionLimits::new(&config, half)));
}

#[test]
fn test_star_is_valid_with_disk_mask() {
    let config = GuideConfig::default();
    let (est, half) = locate(&config, &[patch_at(6, -4, 6)]);
    assert_eq!(est.total_lit_pixels, 36);
    assert!(est.is_valid(&DetectionLimits::new(&config, half)));
}

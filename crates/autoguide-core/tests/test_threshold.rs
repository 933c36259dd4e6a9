use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};

use autoguide_core::config::ThresholdPolicy;
use autoguide_core::detection::threshold::binarize_into;
use autoguide_core::detection::{intensity_bounds, resolve_threshold};

#[test]
fn test_intensity_bounds() {
    let data = array![[10u8, 40], [200, 15]];
    assert_eq!(intensity_bounds(&data), (10, 200));
}

#[test]
fn test_intensity_bounds_empty() {
    let data = Array2::<u8>::zeros((0, 0));
    assert_eq!(intensity_bounds(&data), (0, 0));
}

#[test]
fn test_auto_threshold_formula() {
    for (min, max) in [(0u8, 255u8), (10, 200), (37, 38), (90, 90)] {
        let t = resolve_threshold(&ThresholdPolicy::Auto, min, max);
        let expected = min as f32 + 0.66 * (max as f32 - min as f32);
        assert_abs_diff_eq!(t, expected, epsilon = 1e-4);
    }
}

#[test]
fn test_fixed_threshold_ignores_bounds() {
    let t = resolve_threshold(&ThresholdPolicy::Fixed(120), 0, 255);
    assert_abs_diff_eq!(t, 120.0);
}

#[test]
fn test_binarize_inclusive() {
    let data = array![[99u8, 100], [101, 0]];
    let mut mask = Array2::<u8>::zeros((2, 2));
    let lit = binarize_into(&data, 100.0, &mut mask);
    assert_eq!(lit, 2);
    assert_eq!(mask, array![[0u8, 1], [1, 0]]);
}

#[test]
fn test_flat_region_lights_everything() {
    // min == max: the auto threshold equals the level, so every pixel passes.
    let data = Array2::from_elem((8, 8), 50u8);
    let (min, max) = intensity_bounds(&data);
    let t = resolve_threshold(&ThresholdPolicy::Auto, min, max);
    let mut mask = Array2::<u8>::zeros((8, 8));
    assert_eq!(binarize_into(&data, t, &mut mask), 64);
}

use ndarray::Array2;

use crate::config::ThresholdPolicy;
use crate::consts::AUTO_THRESHOLD_FRACTION;

/// Minimum and maximum intensity of a region. Empty regions give `(0, 0)`.
pub fn intensity_bounds(data: &Array2<u8>) -> (u8, u8) {
    if data.is_empty() {
        return (0, 0);
    }
    data.iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Effective binarization level for this frame.
pub fn resolve_threshold(policy: &ThresholdPolicy, min: u8, max: u8) -> f32 {
    match policy {
        ThresholdPolicy::Fixed(level) => *level as f32,
        ThresholdPolicy::Auto => {
            let (min, max) = (min as f32, max as f32);
            min + AUTO_THRESHOLD_FRACTION * (max - min)
        }
    }
}

/// Write `1` where `intensity >= threshold`, else `0`. Returns the lit count.
pub fn binarize_into(intensity: &Array2<u8>, threshold: f32, mask: &mut Array2<u8>) -> u32 {
    let mut lit = 0u32;
    ndarray::Zip::from(mask).and(intensity).for_each(|m, &v| {
        *m = u8::from(v as f32 >= threshold);
        lit += *m as u32;
    });
    lit
}

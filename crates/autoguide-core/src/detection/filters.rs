//! Pre- and post-threshold box filters.
//!
//! Both filters use a *trailing* window: the window for pixel `(r, c)`
//! ends at `(r, c)` and extends up and to the left. Pixels whose window
//! would leave the region are written as zero.

use ndarray::Array2;

use crate::config::OccupancyRule;
use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// BT.601 luminance of an RGB region, rounded to 8 bits.
pub fn luminance_into(rgb: &ndarray::Array3<u8>, gray: &mut Array2<u8>) {
    for ((row, col), g) in gray.indexed_iter_mut() {
        let r = rgb[[row, col, 0]] as f32;
        let gr = rgb[[row, col, 1]] as f32;
        let b = rgb[[row, col, 2]] as f32;
        *g = (LUMINANCE_R * r + LUMINANCE_G * gr + LUMINANCE_B * b)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
}

/// Sum of a trailing `side x side` window ending at `(row, col)`, or `None`
/// if the window does not fit.
fn trailing_sum(data: &Array2<u8>, row: usize, col: usize, side: usize) -> Option<u32> {
    if side == 0 || row + 1 < side || col + 1 < side {
        return None;
    }
    let mut sum = 0u32;
    for r in row + 1 - side..=row {
        for c in col + 1 - side..=col {
            sum += data[[r, c]] as u32;
        }
    }
    Some(sum)
}

/// Binning at level `n`: each pixel becomes the sum of the trailing
/// `(n+1) x (n+1)` window, saturated at 255.
pub fn bin_into(gray: &Array2<u8>, level: u8, out: &mut Array2<u8>) {
    let side = level as usize + 1;
    for ((row, col), o) in out.indexed_iter_mut() {
        *o = trailing_sum(gray, row, col, side).map_or(0, |s| s.min(255) as u8);
    }
}

/// Noise suppression at level `k`: a bit survives only if the trailing
/// window chosen by `rule` is fully lit. Returns the new lit count.
pub fn suppress_noise_into(
    mask: &Array2<u8>,
    level: u8,
    rule: OccupancyRule,
    out: &mut Array2<u8>,
) -> u32 {
    let side = rule.window_side(level);
    let needed = rule.min_count(level);
    let mut lit = 0u32;
    for ((row, col), o) in out.indexed_iter_mut() {
        *o = match trailing_sum(mask, row, col, side) {
            Some(count) if count >= needed => 1,
            _ => 0,
        };
        lit += *o as u32;
    }
    lit
}

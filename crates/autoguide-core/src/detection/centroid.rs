//! Median-index star position.
//!
//! The star position along an axis is where the cumulative marginal sum of
//! the binary mask first reaches half of the lit pixels. Unlike an
//! intensity-weighted mean, a single hot pixel moves it by at most one bin.

use ndarray::{Array2, Axis};

/// Column sums and row sums of a binary mask.
pub fn marginal_sums(mask: &Array2<u8>) -> (Vec<u32>, Vec<u32>) {
    let columns = mask
        .axis_iter(Axis(1))
        .map(|col| col.iter().map(|&v| v as u32).sum())
        .collect();
    let rows = mask
        .axis_iter(Axis(0))
        .map(|row| row.iter().map(|&v| v as u32).sum())
        .collect();
    (columns, rows)
}

/// Number of bins consumed before the cumulative sum reaches `total / 2`.
///
/// The result is the boundary coordinate of the median, in `0..=sums.len()`;
/// bins past the end are never read.
pub fn median_index(sums: &[u32], total: u32) -> usize {
    let mut cumulative = 0u64;
    let mut index = 0usize;
    while 2 * cumulative < total as u64 && index < sums.len() {
        cumulative += sums[index] as u64;
        index += 1;
    }
    index
}

//! Cut the guide window out of a frame.
//!
//! Each window pixel is mapped back through the view projection. When the
//! view shrinks the source, the source footprint is box-averaged; when it
//! enlarges, the nearest source sample is taken.

use ndarray::{Array3, ArrayViewMut2, Axis};
use rayon::prelude::*;

use crate::consts::{COLOR_CHANNEL_COUNT, PARALLEL_PIXEL_THRESHOLD};
use crate::frame::Frame;

use super::mask::DiskMask;
use super::view::{Projection, ViewTransform};
use super::window::GuideWindow;

/// RGB sub-image of the guide window, shape = (side, side, 3).
#[derive(Clone, Debug)]
pub struct Region {
    pub data: Array3<u8>,
    /// The window actually extracted, after clamping.
    pub window: GuideWindow,
}

impl Region {
    pub fn side(&self) -> usize {
        self.data.dim().0
    }
}

/// Extracts guide windows and caches the circular mask between frames.
#[derive(Debug, Default)]
pub struct RegionExtractor {
    disk: DiskMask,
}

impl RegionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract `window` from `frame` as seen through `view`.
    ///
    /// Out-of-range windows are clamped to the nearest valid position.
    pub fn extract(&mut self, frame: &Frame, view: &ViewTransform, window: &GuideWindow) -> Region {
        let projection = view.project(frame.width(), frame.height());
        let window = window.clamped(projection.width, projection.height);
        let side = window.side();
        let (x0, y0) = window.origin();

        let mut data = Array3::<u8>::zeros((side, side, COLOR_CHANNEL_COUNT));
        let fill = |row: usize, mut out: ArrayViewMut2<u8>| {
            for col in 0..side {
                let rgb = sample(frame, &projection, x0 + col as u32, y0 + row as u32);
                for ch in 0..COLOR_CHANNEL_COUNT {
                    out[[col, ch]] = rgb[ch];
                }
            }
        };

        if side * side >= PARALLEL_PIXEL_THRESHOLD {
            data.axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(row, out)| fill(row, out));
        } else {
            for (row, out) in data.axis_iter_mut(Axis(0)).enumerate() {
                fill(row, out);
            }
        }

        if window.circular_mask {
            let disk = self.disk.for_half_size(window.half_size);
            for ((row, col, _), v) in data.indexed_iter_mut() {
                if !disk[[row, col]] {
                    *v = 0;
                }
            }
        }

        Region { data, window }
    }
}

/// Color of viewport pixel `(u, v)`.
fn sample(frame: &Frame, projection: &Projection, u: u32, v: u32) -> [u8; COLOR_CHANNEL_COUNT] {
    let (w, h) = (frame.width(), frame.height());
    let (x0, y0, x1, y1) = projection.footprint(u, v);

    if projection.scale >= 1.0 {
        let sx = (((x0 + x1) / 2.0).floor().max(0.0) as usize).min(w - 1);
        let sy = (((y0 + y1) / 2.0).floor().max(0.0) as usize).min(h - 1);
        return [
            frame.data[[sy, sx, 0]],
            frame.data[[sy, sx, 1]],
            frame.data[[sy, sx, 2]],
        ];
    }

    let c0 = (x0.floor().max(0.0) as usize).min(w - 1);
    let r0 = (y0.floor().max(0.0) as usize).min(h - 1);
    let c1 = (x1.ceil() as usize).clamp(c0 + 1, w);
    let r1 = (y1.ceil() as usize).clamp(r0 + 1, h);

    let mut sums = [0u32; COLOR_CHANNEL_COUNT];
    for row in r0..r1 {
        for col in c0..c1 {
            for (ch, sum) in sums.iter_mut().enumerate() {
                *sum += frame.data[[row, col, ch]] as u32;
            }
        }
    }
    let count = ((r1 - r0) * (c1 - c0)) as u32;
    sums.map(|s| ((s + count / 2) / count) as u8)
}

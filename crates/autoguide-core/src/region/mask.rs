use ndarray::Array2;

/// Inscribed-disk mask for a square window, cached per window size.
#[derive(Clone, Debug)]
pub struct DiskMask {
    half_size: u32,
    mask: Array2<bool>,
}

impl DiskMask {
    pub fn new(half_size: u32) -> Self {
        Self {
            half_size,
            mask: build_disk(half_size),
        }
    }

    pub fn half_size(&self) -> u32 {
        self.half_size
    }

    /// Mask for the given half-size, regenerated only when the size changes.
    pub fn for_half_size(&mut self, half_size: u32) -> &Array2<bool> {
        if half_size != self.half_size {
            tracing::debug!(half_size, "Regenerating disk mask");
            self.half_size = half_size;
            self.mask = build_disk(half_size);
        }
        &self.mask
    }

    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }
}

impl Default for DiskMask {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Pixels whose centers lie within `half_size` of the window center.
fn build_disk(half_size: u32) -> Array2<bool> {
    let side = half_size as usize * 2;
    let radius = half_size as f64;
    Array2::from_shape_fn((side, side), |(row, col)| {
        let dy = row as f64 + 0.5 - radius;
        let dx = col as f64 + 0.5 - radius;
        dx * dx + dy * dy <= radius * radius
    })
}

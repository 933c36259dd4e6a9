use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};
use ndarray::{Array2, Array3};
use tracing::{info, warn};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{GuideError, Result};
use crate::frame::{Frame, FrameSource};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Load an image file as an 8-bit RGB frame.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let data = Array3::from_shape_vec(
        (h as usize, w as usize, COLOR_CHANNEL_COUNT),
        rgb.into_raw(),
    )
    .map_err(|_| GuideError::InvalidDimensions {
        width: w,
        height: h,
    })?;
    Frame::new(data)
}

/// Save a binary star mask as an 8-bit PNG (lit pixels white).
pub fn save_mask_png(mask: &Array2<u8>, path: &Path) -> Result<()> {
    let (h, w) = mask.dim();
    let mut img = GrayImage::new(w as u32, h as u32);
    for ((row, col), &v) in mask.indexed_iter() {
        let val = if v != 0 { 255 } else { 0 };
        img.put_pixel(col as u32, row as u32, Luma([val]));
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Plays a list of still images as consecutive frames.
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    name: String,
}

impl ImageSequenceSource {
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        let name = format!("{} images", paths.len());
        Self {
            paths,
            next: 0,
            name,
        }
    }

    /// Every supported image directly inside `dir`, in file-name order.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        paths.sort();
        info!(dir = %dir.display(), count = paths.len(), "Found image sequence");
        let mut source = Self::from_paths(paths);
        source.name = dir.display().to_string();
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        while let Some(path) = self.paths.get(self.next) {
            let index = self.next;
            self.next += 1;
            match load_frame(path) {
                Ok(frame) => return Ok(Some(frame.with_index(index))),
                Err(GuideError::ImageError(e)) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable image");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

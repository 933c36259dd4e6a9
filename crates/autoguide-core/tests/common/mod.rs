#![allow(dead_code)]

use ndarray::Array2;

use autoguide_core::detection::CentroidEstimate;
use autoguide_core::frame::Frame;
use autoguide_core::io::ser::SER_HEADER_SIZE;

/// Uniform grayscale plane with square bright patches.
///
/// Each patch is `(left, top, size, value)` in pixel coordinates.
pub fn gray_with_patches(
    width: usize,
    height: usize,
    background: u8,
    patches: &[(usize, usize, usize, u8)],
) -> Array2<u8> {
    let mut gray = Array2::from_elem((height, width), background);
    for &(left, top, size, value) in patches {
        for row in top..(top + size).min(height) {
            for col in left..(left + size).min(width) {
                gray[[row, col]] = value;
            }
        }
    }
    gray
}

/// RGB frame built from [`gray_with_patches`].
pub fn frame_with_patches(
    width: usize,
    height: usize,
    background: u8,
    patches: &[(usize, usize, usize, u8)],
) -> Frame {
    Frame::from_gray(&gray_with_patches(width, height, background, patches)).unwrap()
}

/// A valid-looking estimate with the given offsets.
pub fn estimate(dx: i32, dy: i32) -> CentroidEstimate {
    CentroidEstimate {
        dx,
        dy,
        total_lit_pixels: 36,
        intensity_range: 190,
        ..Default::default()
    }
}

/// Build a SER file header with configurable bit depth and color mode.
///
/// `color_id`: 0=MONO, 8=BAYER_RGGB, 100=RGB, 101=BGR
pub fn build_ser_header_full(
    width: u32,
    height: u32,
    bit_depth: u32,
    num_frames: usize,
    color_id: i32,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SER_HEADER_SIZE);

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID, ColorID, LittleEndian
    buf.extend_from_slice(&0i32.to_le_bytes());
    buf.extend_from_slice(&color_id.to_le_bytes());
    buf.extend_from_slice(&0i32.to_le_bytes());
    // Width, Height, PixelDepth, FrameCount
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    buf.extend_from_slice(&(num_frames as i32).to_le_bytes());
    // Observer (40 bytes)
    let mut observer = [0u8; 40];
    observer[..6].copy_from_slice(b"Guider");
    buf.extend_from_slice(&observer);
    // Instrument, Telescope (40 bytes each)
    buf.extend_from_slice(&[0u8; 40]);
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime, DateTimeUTC
    buf.extend_from_slice(&0u64.to_le_bytes());
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);
    buf
}

/// Complete SER file: header followed by the raw frame bytes.
pub fn build_ser(
    width: u32,
    height: u32,
    bit_depth: u32,
    color_id: i32,
    frames: &[Vec<u8>],
) -> Vec<u8> {
    let mut buf = build_ser_header_full(width, height, bit_depth, frames.len(), color_id);
    for frame in frames {
        buf.extend_from_slice(frame);
    }
    buf
}

/// Write a SER buffer to a temporary file and return the temp file handle.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_test_ser(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::NamedTempFile::new().expect("create temp file");
    f.write_all(data).expect("write SER data");
    f.flush().expect("flush");
    f
}

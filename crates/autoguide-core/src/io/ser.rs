//! Replay of SER video recordings as a frame source.

use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array3;
use tracing::info;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{GuideError, Result};
use crate::frame::{Frame, FrameMetadata, FrameSource};

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

const COLOR_ID_RGB: i32 = 100;
const COLOR_ID_BGR: i32 = 101;

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
}

impl SerHeader {
    /// Bytes per sample (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 {
            1
        } else {
            2
        }
    }

    /// Number of planes per pixel (1 for mono/Bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            COLOR_ID_RGB | COLOR_ID_BGR => COLOR_CHANNEL_COUNT,
            _ => 1,
        }
    }

    /// Total bytes per frame, or `None` if the header dimensions overflow.
    pub fn frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_sample() * self.planes_per_pixel())
    }

    /// Bytes of the header plus every frame, or `None` on overflow.
    fn data_end(&self) -> Option<usize> {
        self.frame_byte_size()?
            .checked_mul(self.frame_count as usize)?
            .checked_add(SER_HEADER_SIZE)
    }
}

/// Memory-mapped SER file reader.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
    frame_size: usize,
    data_end: usize,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(GuideError::InvalidSer("File too small for SER header".into()));
        }
        if &mmap[0..14] != SER_MAGIC {
            return Err(GuideError::InvalidSer("Missing LUCAM-RECORDER magic".into()));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;
        if header.pixel_depth == 0 || header.pixel_depth > 16 {
            return Err(GuideError::InvalidSer(format!(
                "Unsupported pixel depth {}",
                header.pixel_depth
            )));
        }

        let (frame_size, data_end) = match (header.frame_byte_size(), header.data_end()) {
            (Some(frame_size), Some(data_end)) => (frame_size, data_end),
            _ => return Err(GuideError::InvalidSer("Frame size overflow".into())),
        };
        if mmap.len() < data_end {
            return Err(GuideError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                data_end,
                mmap.len()
            )));
        }

        Ok(Self {
            mmap,
            header,
            frame_size,
            data_end,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(GuideError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.frame_size;
        Ok(&self.mmap[offset..offset + self.frame_size])
    }

    /// Read one frame as 8-bit RGB. Mono and Bayer data are replicated to
    /// all channels; deeper samples keep their top 8 bits.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let bps = self.header.bytes_per_sample();
        let planes = self.header.planes_per_pixel();
        let shift = self.header.pixel_depth.saturating_sub(8);
        let le = self.header.little_endian;

        let sample = |idx: usize| -> u8 {
            let v = if bps == 1 {
                raw[idx] as u16
            } else if le {
                u16::from_le_bytes([raw[idx], raw[idx + 1]])
            } else {
                u16::from_be_bytes([raw[idx], raw[idx + 1]])
            };
            (v >> shift).min(255) as u8
        };

        let bgr = self.header.color_id == COLOR_ID_BGR;
        let data = Array3::from_shape_fn((h, w, COLOR_CHANNEL_COUNT), |(row, col, ch)| {
            let pixel = (row * w + col) * planes;
            let plane = match (planes, bgr) {
                (1, _) => 0,
                (_, true) => COLOR_CHANNEL_COUNT - 1 - ch,
                (_, false) => ch,
            };
            sample((pixel + plane) * bps)
        });

        let mut frame = Frame::new(data)?;
        frame.metadata = FrameMetadata {
            frame_index: index,
            timestamp_us: self.read_timestamp(index),
        };
        Ok(frame)
    }

    /// Per-frame timestamp from the optional trailer.
    fn read_timestamp(&self, index: usize) -> Option<u64> {
        let offset = self.data_end.checked_add(index.checked_mul(8)?)?;
        let bytes = self.mmap.get(offset..offset.checked_add(8)?)?;
        Some(u64::from_le_bytes(bytes.try_into().ok()?))
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]);

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    if width == 0 || height == 0 {
        return Err(GuideError::InvalidDimensions { width, height });
    }

    // Most capture tools write 0 here for little-endian data.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
        observer: read_fixed_string(&buf[42..82]),
        instrument: read_fixed_string(&buf[82..122]),
        telescope: read_fixed_string(&buf[122..162]),
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// Plays a SER recording frame by frame, optionally looping.
pub struct SerFrameSource {
    reader: SerReader,
    name: String,
    next: usize,
    looping: bool,
}

impl SerFrameSource {
    pub fn open(path: &Path, looping: bool) -> Result<Self> {
        let reader = SerReader::open(path)?;
        info!(
            frames = reader.frame_count(),
            width = reader.header.width,
            height = reader.header.height,
            "Opened SER recording"
        );
        Ok(Self {
            reader,
            name: path.display().to_string(),
            next: 0,
            looping,
        })
    }

    pub fn reader(&self) -> &SerReader {
        &self.reader
    }
}

impl FrameSource for SerFrameSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.next >= self.reader.frame_count() {
            if !self.looping || self.reader.frame_count() == 0 {
                return Ok(None);
            }
            self.next = 0;
        }
        let frame = self.reader.read_frame(self.next)?;
        self.next += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

mod common;

use std::path::Path;

use autoguide_core::error::GuideError;
use autoguide_core::frame::{CameraControl, FrameSource};
use autoguide_core::io::{SerFrameSource, SerReader};

use common::{build_ser, build_ser_header_full, write_test_ser};

#[test]
fn test_parse_header_and_mono_frames() {
    let frames = vec![(0..12).collect::<Vec<u8>>(), vec![200u8; 12]];
    let file = write_test_ser(&build_ser(4, 3, 8, 0, &frames));

    let reader = SerReader::open(file.path()).unwrap();
    assert_eq!(reader.header.width, 4);
    assert_eq!(reader.header.height, 3);
    assert_eq!(reader.frame_count(), 2);
    assert_eq!(reader.header.observer, "Guider");

    let frame = reader.read_frame(0).unwrap();
    assert_eq!((frame.width(), frame.height()), (4, 3));
    // Mono samples are replicated to every channel.
    assert_eq!(frame.data[[1, 2, 0]], 6);
    assert_eq!(frame.data[[1, 2, 1]], 6);
    assert_eq!(frame.data[[1, 2, 2]], 6);
    assert_eq!(frame.metadata.frame_index, 0);

    let frame = reader.read_frame(1).unwrap();
    assert_eq!(frame.data[[2, 3, 1]], 200);
}

#[test]
fn test_16bit_keeps_high_byte() {
    let mut raw = Vec::new();
    for v in [0x1234u16, 0xFF00, 0x00FF, 0x8000] {
        raw.extend_from_slice(&v.to_le_bytes());
    }
    let file = write_test_ser(&build_ser(2, 2, 16, 0, &[raw]));
    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data[[0, 0, 0]], 0x12);
    assert_eq!(frame.data[[0, 1, 0]], 0xFF);
    assert_eq!(frame.data[[1, 0, 0]], 0x00);
    assert_eq!(frame.data[[1, 1, 0]], 0x80);
}

#[test]
fn test_12bit_scaled_to_8bit() {
    let mut raw = Vec::new();
    for v in [4095u16, 16] {
        raw.extend_from_slice(&v.to_le_bytes());
    }
    let file = write_test_ser(&build_ser(2, 1, 12, 0, &[raw]));
    let frame = SerReader::open(file.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data[[0, 0, 0]], 255);
    assert_eq!(frame.data[[0, 1, 0]], 1);
}

#[test]
fn test_rgb_and_bgr_order() {
    let pixel = vec![10u8, 20, 30];
    let rgb = write_test_ser(&build_ser(1, 1, 8, 100, &[pixel.clone()]));
    let bgr = write_test_ser(&build_ser(1, 1, 8, 101, &[pixel]));

    let frame = SerReader::open(rgb.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data.as_slice().unwrap(), &[10, 20, 30]);

    let frame = SerReader::open(bgr.path()).unwrap().read_frame(0).unwrap();
    assert_eq!(frame.data.as_slice().unwrap(), &[30, 20, 10]);
}

#[test]
fn test_frame_index_out_of_range() {
    let file = write_test_ser(&build_ser(2, 2, 8, 0, &[vec![0u8; 4]]));
    let reader = SerReader::open(file.path()).unwrap();
    assert!(matches!(
        reader.read_frame(3),
        Err(GuideError::FrameIndexOutOfRange { index: 3, total: 1 })
    ));
}

#[test]
fn test_rejects_bad_magic_and_truncation() {
    let mut data = build_ser(2, 2, 8, 0, &[vec![0u8; 4]]);
    data[0] = b'X';
    let file = write_test_ser(&data);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(GuideError::InvalidSer(_))
    ));

    let mut data = build_ser(2, 2, 8, 0, &[vec![0u8; 4], vec![0u8; 4]]);
    data.truncate(data.len() - 2);
    let file = write_test_ser(&data);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(GuideError::InvalidSer(_))
    ));
}

#[test]
fn test_rejects_oversized_header_dimensions() {
    // Per-frame size overflows.
    let data = build_ser(u32::MAX, u32::MAX, 16, 100, &[vec![0u8; 16]]);
    let file = write_test_ser(&data);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(GuideError::InvalidSer(_))
    ));

    // Frame size fits, total recording size does not.
    let mut data = build_ser_header_full(65_535, 65_535, 16, i32::MAX as usize, 100);
    data.extend_from_slice(&[0u8; 16]);
    let file = write_test_ser(&data);
    assert!(matches!(
        SerReader::open(file.path()),
        Err(GuideError::InvalidSer(_))
    ));
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        SerReader::open(Path::new("/nonexistent/capture.ser")),
        Err(GuideError::Io(_))
    ));
}

#[test]
fn test_frame_source_plays_once_or_loops() {
    let frames = vec![vec![1u8; 4], vec![2u8; 4]];
    let file = write_test_ser(&build_ser(2, 2, 8, 0, &frames));

    let mut once = SerFrameSource::open(file.path(), false).unwrap();
    assert_eq!(once.next_frame().unwrap().unwrap().data[[0, 0, 0]], 1);
    assert_eq!(once.next_frame().unwrap().unwrap().data[[0, 0, 0]], 2);
    assert!(once.next_frame().unwrap().is_none());

    let mut looping = SerFrameSource::open(file.path(), true).unwrap();
    let seen: Vec<u8> = (0..5)
        .map(|_| looping.next_frame().unwrap().unwrap().data[[0, 0, 0]])
        .collect();
    assert_eq!(seen, vec![1, 2, 1, 2, 1]);
}

#[test]
fn test_recording_ignores_camera_controls() {
    let file = write_test_ser(&build_ser(2, 2, 8, 0, &[vec![0u8; 4]]));
    let mut source = SerFrameSource::open(file.path(), false).unwrap();
    assert!(source.apply_control(CameraControl::Exposure, 2000).is_ok());
    assert!(source.next_frame().unwrap().is_some());
}

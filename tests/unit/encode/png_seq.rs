use super::*;
use crate::foundation::core::Rgba8Premul;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA::solid(
        Canvas::new(w, h),
        Rgba8Premul::from_straight_rgba(rgba[0], rgba[1], rgba[2], rgba[3]),
    )
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "motion-overlay-png-seq-{name}-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn file_names_are_zero_padded_to_four_digits() {
    assert_eq!(frame_file_name(0), "frame-0000.png");
    assert_eq!(frame_file_name(42), "frame-0042.png");
    assert_eq!(frame_file_name(12345), "frame-12345.png");
}

#[test]
fn frames_are_numbered_in_order_and_decode() {
    let mut sink = PngSequenceSink::new();
    for i in 0..3u8 {
        sink.add_frame(solid(4, 2, [i * 50, 0, 0, 255]), 100 + u32::from(i))
            .unwrap();
    }
    assert!(sink.finalize().unwrap().is_empty());

    let frames = sink.frames();
    assert_eq!(frames.len(), 3);
    let names = frames.iter().map(|f| f.file_name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["frame-0000.png", "frame-0001.png", "frame-0002.png"]);
    assert_eq!(frames[2].duration_ms, 102);

    let img = image::load_from_memory(&frames[2].png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(3, 1).0, [100, 0, 0, 255]);
}

#[test]
fn png_pixels_are_straight_alpha() {
    let mut sink = PngSequenceSink::new();
    sink.add_frame(solid(1, 1, [255, 255, 255, 128]), 100).unwrap();
    sink.finalize().unwrap();

    let img = image::load_from_memory(&sink.frames()[0].png).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 128]);
}

#[test]
fn write_to_dir_writes_one_file_per_frame() {
    let dir = scratch_dir("write");
    let mut sink = PngSequenceSink::new();
    for _ in 0..2 {
        sink.add_frame(solid(2, 2, [0, 0, 255, 255]), 100).unwrap();
    }
    assert!(sink.write_to_dir(&dir).is_err());
    assert!(!dir.exists());

    sink.finalize().unwrap();
    let written = sink.write_to_dir(&dir).unwrap();
    assert_eq!(written, [dir.join("frame-0000.png"), dir.join("frame-0001.png")]);
    for path in &written {
        assert_eq!(image::open(path).unwrap().width(), 2);
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn misuse_is_an_encoding_failure() {
    let mut empty = PngSequenceSink::new();
    assert!(matches!(
        empty.finalize(),
        Err(OverlayError::EncodingFailure(_))
    ));

    let mut sink = PngSequenceSink::new();
    sink.add_frame(solid(3, 3, [0, 0, 0, 255]), 100).unwrap();
    assert!(matches!(
        sink.add_frame(solid(2, 2, [0, 0, 0, 255]), 100),
        Err(OverlayError::EncodingFailure(_))
    ));
    sink.finalize().unwrap();
    assert!(matches!(
        sink.add_frame(solid(3, 3, [0, 0, 0, 255]), 100),
        Err(OverlayError::EncodingFailure(_))
    ));
    assert!(matches!(
        sink.finalize(),
        Err(OverlayError::EncodingFailure(_))
    ));
}

use super::*;
use crate::foundation::core::Canvas;

#[test]
fn in_memory_sink_keeps_order_and_durations() {
    let mut sink = InMemorySink::new();
    for (i, ms) in [30u32, 40, 50].into_iter().enumerate() {
        let mut f = FrameRGBA::new_transparent(Canvas::new(1, 1));
        f.data[0] = i as u8;
        sink.add_frame(f, ms).unwrap();
    }
    assert!(sink.finalize().unwrap().is_empty());
    assert!(sink.is_finalized());

    let got: Vec<(u8, u32)> = sink.frames().iter().map(|(f, ms)| (f.data[0], *ms)).collect();
    assert_eq!(got, vec![(0, 30), (1, 40), (2, 50)]);
}

#[test]
fn in_memory_sink_rejects_frames_after_finalize() {
    let mut sink = InMemorySink::new();
    sink.finalize().unwrap();
    assert!(matches!(
        sink.add_frame(FrameRGBA::new_transparent(Canvas::new(1, 1)), 10),
        Err(OverlayError::EncodingFailure(_))
    ));
}

#[test]
fn boxed_sinks_forward() {
    let mut sink: Box<dyn EncodeSink> = Box::new(InMemorySink::new());
    sink.add_frame(FrameRGBA::new_transparent(Canvas::new(1, 1)), 10)
        .unwrap();
    assert!(sink.finalize().unwrap().is_empty());
}

use super::*;
use crate::foundation::core::Resolution;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::whole(25).unwrap(),
    }
}

#[test]
fn in_memory_sink_captures_frames_in_order() {
    let frame = FrameRGB::solid(Resolution::new(2, 2).unwrap(), [1, 2, 3]).unwrap();
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame).unwrap();
    sink.push_frame(1, &frame).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(cfg()));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, 1);
    assert!(sink.is_finished());
}

#[test]
fn begin_resets_previous_capture() {
    let frame = FrameRGB::solid(Resolution::new(2, 2).unwrap(), [0, 0, 0]).unwrap();
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame).unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}

#[test]
fn push_before_begin_is_an_encode_error() {
    let frame = FrameRGB::solid(Resolution::new(2, 2).unwrap(), [0, 0, 0]).unwrap();
    let mut sink = InMemorySink::new();
    assert!(matches!(
        sink.push_frame(0, &frame),
        Err(FoldError::Encode(_))
    ));
}

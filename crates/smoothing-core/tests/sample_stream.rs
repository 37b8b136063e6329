use std::path::PathBuf;

use lmsmooth_common::config::SmoothingConfig;
use lmsmooth_landmark_model::frame::{FrameStream, LandmarkFrame, Observation};
use lmsmooth_landmark_model::landmark::NormalizedLandmarkList;
use lmsmooth_smoothing_core::SmoothingStage;

fn load_fixture_stream() -> FrameStream {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-stream")
        .join("frames.jsonl");

    FrameStream::load(path).expect("fixture stream should load")
}

fn normalized(frame: &LandmarkFrame) -> &NormalizedLandmarkList {
    match frame.observation.as_ref() {
        Some(Observation::Normalized { landmarks }) => landmarks,
        other => panic!("expected normalized landmarks, got {other:?}"),
    }
}

fn assert_close(a: &NormalizedLandmarkList, b: &NormalizedLandmarkList) {
    assert_eq!(a.len(), b.len());
    for (la, lb) in a.iter().zip(b.iter()) {
        assert!((la.x - lb.x).abs() < 1e-12, "{} vs {}", la.x, lb.x);
        assert!((la.y - lb.y).abs() < 1e-12, "{} vs {}", la.y, lb.y);
        assert!((la.z - lb.z).abs() < 1e-12, "{} vs {}", la.z, lb.z);
    }
}

fn smooth_fixture() -> (FrameStream, Vec<LandmarkFrame>, SmoothingStage) {
    let stream = load_fixture_stream();
    let mut stage = SmoothingStage::new(SmoothingConfig::default()).unwrap();
    let output = stream
        .frames
        .iter()
        .filter_map(|frame| stage.process(frame).expect("fixture frames should smooth"))
        .collect();
    (stream, output, stage)
}

#[test]
fn fixture_stream_is_valid() {
    let stream = load_fixture_stream();
    assert!(stream.header.is_some());
    assert_eq!(stream.frames.len(), 14);
    assert!(stream.validate().is_empty(), "{:?}", stream.validate());
}

#[test]
fn fixture_empty_frames_reset_and_are_dropped() {
    let (stream, output, stage) = smooth_fixture();

    assert_eq!(output.len(), 12);
    let stats = stage.stats();
    assert_eq!(stats.frames_in, 14);
    assert_eq!(stats.frames_out, 12);
    assert_eq!(stats.resets, 2);

    let expected_ts: Vec<u64> = stream
        .frames
        .iter()
        .filter(|f| f.has_landmarks())
        .map(|f| f.timestamp_us)
        .collect();
    let actual_ts: Vec<u64> = output.iter().map(|f| f.timestamp_us).collect();
    assert_eq!(actual_ts, expected_ts);
}

#[test]
fn fixture_output_stays_normalized() {
    let (stream, output, _) = smooth_fixture();

    for frame in &output {
        assert!(frame.observation.as_ref().is_some_and(Observation::is_normalized));
        assert_eq!(frame.image_size, stream.frames[0].image_size);
        for lm in normalized(frame).iter() {
            assert!((0.0..=1.0).contains(&lm.x));
            assert!((0.0..=1.0).contains(&lm.y));
            assert!(lm.visibility.is_some());
        }
    }
}

#[test]
fn fixture_first_frame_after_gap_passes_through() {
    let (stream, output, _) = smooth_fixture();

    assert_close(normalized(&output[0]), normalized(&stream.frames[0]));
    // Frames 6 and 7 are empty; frame 8 restarts tracking
    assert_eq!(output[6].timestamp_us, stream.frames[8].timestamp_us);
    assert_close(normalized(&output[6]), normalized(&stream.frames[8]));
}

#[test]
fn fixture_tracked_frames_are_smoothed() {
    let (stream, output, _) = smooth_fixture();

    let raw = normalized(&stream.frames[5]);
    let smoothed = normalized(&output[5]);
    let moved = raw
        .iter()
        .zip(smoothed.iter())
        .any(|(r, s)| (r.x - s.x).abs() > 1e-9 || (r.y - s.y).abs() > 1e-9);
    assert!(moved, "tracked frames should differ from raw input");
}

#[test]
fn fixture_smoothing_is_deterministic() {
    let (_, first, _) = smooth_fixture();
    let (_, second, _) = smooth_fixture();
    assert_eq!(first, second);
}

use super::*;

fn cfg(width: u32, height: u32, fps: Fps) -> SinkConfig {
    SinkConfig { width, height, fps }
}

#[test]
fn config_validation_catches_bad_values() {
    let fps = Fps::whole(30).unwrap();
    assert!(validate_sink_config(&cfg(0, 10, fps)).is_err());
    assert!(validate_sink_config(&cfg(11, 10, fps)).is_err());
    assert!(validate_sink_config(&cfg(10, 7, fps)).is_err());
    assert!(validate_sink_config(&cfg(10, 10, Fps { num: 0, den: 1 })).is_err());
    assert!(validate_sink_config(&cfg(10, 10, fps)).is_ok());
}

#[test]
fn args_stream_rgb24_and_encode_h264() {
    let opts = FfmpegSinkOpts::new("target/out.mp4");
    let args = ffmpeg_args(&cfg(64, 36, Fps::new(30000, 1001).unwrap()), &opts);
    let joined = args.join(" ");
    assert!(joined.starts_with("-y "));
    assert!(joined.contains("-f rawvideo -pix_fmt rgb24 -s 64x36 -r 30000/1001 -i pipe:0"));
    assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p -movflags +faststart"));
    assert_eq!(args.last().map(String::as_str), Some("target/out.mp4"));

    let keep = FfmpegSinkOpts {
        overwrite: false,
        ..FfmpegSinkOpts::new("x.mp4")
    };
    assert_eq!(ffmpeg_args(&cfg(2, 2, Fps::whole(25).unwrap()), &keep)[0], "-n");
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/never.mp4"));
    let frame = FrameRGB::new(2, 2, vec![0; 12]).unwrap();
    assert!(sink.push_frame(0, &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn odd_size_is_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/odd.mp4"));
    let err = sink.begin(cfg(3, 2, Fps::whole(25).unwrap())).unwrap_err();
    assert!(matches!(err, FoldError::Validation(_)));
}

#[test]
fn ensure_parent_dir_creates_directories() {
    let dir = std::env::temp_dir().join(format!("origami_parent_{}", std::process::id()));
    let file = dir.join("nested").join("out.mp4");
    ensure_parent_dir(&file).unwrap();
    assert!(dir.join("nested").is_dir());
    let _ = std::fs::remove_dir_all(&dir);
}

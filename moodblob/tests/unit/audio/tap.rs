use super::*;

#[test]
fn zero_sample_rate_is_rejected() {
    assert!(PcmTap::new(vec![0.0f32; 4], 0).unwrap_err().is_config());
}

#[test]
fn window_ends_at_playback_position() {
    let samples: Vec<f32> = (0..100).map(|i| i as f32).collect();
    let mut tap = PcmTap::new(samples, 10).unwrap();
    let mut out = [0.0f32; 4];

    let n = tap.read_window(Duration::from_secs(2), &mut out).unwrap();
    assert_eq!(n, 4);
    assert_eq!(out, [16.0, 17.0, 18.0, 19.0]);
}

#[test]
fn window_zero_fills_before_start_and_after_end() {
    let samples: Vec<f32> = (1..=10).map(|i| i as f32).collect();
    let mut tap = PcmTap::new(samples, 10).unwrap();
    let mut out = [9.0f32; 4];

    let n = tap.read_window(Duration::from_millis(200), &mut out).unwrap();
    assert_eq!(n, 2);
    assert_eq!(out, [0.0, 0.0, 1.0, 2.0]);

    let n = tap.read_window(Duration::from_secs(60), &mut out).unwrap();
    assert_eq!(n, 4);
    assert_eq!(out, [7.0, 8.0, 9.0, 10.0]);
}

#[test]
fn disconnected_tap_refuses_reads() {
    let mut tap = PcmTap::new(vec![0.5f32; 16], 8).unwrap();
    tap.disconnect();
    assert!(!tap.is_connected());
    let mut out = [0.0f32; 4];
    assert!(tap.read_window(Duration::ZERO, &mut out).is_err());
}

#[test]
fn wav_round_trip_downmixes_to_mono() {
    let dir = std::path::PathBuf::from("target").join("unit_audio_tap");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stereo.wav");

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..80 {
        w.write_sample(i16::MAX / 2).unwrap();
        w.write_sample(0i16).unwrap();
    }
    w.finalize().unwrap();

    let mut tap = PcmTap::open_wav(&path).unwrap();
    assert_eq!(tap.sample_rate(), 8000);
    assert!((tap.duration().as_secs_f64() - 0.01).abs() < 1e-9);
    let mut out = [0.0f32; 8];
    tap.read_window(Duration::from_millis(5), &mut out).unwrap();
    assert!(out.iter().all(|s| (s - 0.25).abs() < 1e-3));
}

#[test]
fn missing_wav_is_resource_error() {
    let err = PcmTap::open_wav(Path::new("target/definitely/not/here.wav")).unwrap_err();
    assert!(matches!(err, BlobError::Resource(_)));
}

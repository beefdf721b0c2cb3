use super::*;

#[test]
fn empty_json_gives_documented_defaults() {
    let cfg = BlobConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, BlobConfig::default());
    assert_eq!(cfg.radius, 50.0);
    assert_eq!(cfg.num_points, 36);
    assert_eq!(cfg.radius_bounds(), (40.0, 80.0));
}

#[test]
fn camel_case_fields_parse() {
    let cfg = BlobConfig::from_json_str(
        r##"{
            "shape": "star",
            "colors": ["#FF0000", "#0f0"],
            "radius": 80,
            "minRadius": 60,
            "maxRadius": 120,
            "noiseStrength": 4,
            "edgeNoiseStrength": 2,
            "numPoints": 3,
            "noiseOffsets": [{"x":1,"y":2},{"x":3,"y":4},{"x":5,"y":6}],
            "layers": 3,
            "audio": {"threshold": 200},
            "broadcast": {"everyNFrames": 2}
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.shape, ShapeProfile::Star);
    assert_eq!(cfg.radius_bounds(), (60.0, 120.0));
    assert_eq!(cfg.noise_offsets.as_ref().map(Vec::len), Some(3));
    assert_eq!(cfg.audio.threshold, 200.0);
    assert_eq!(cfg.broadcast.every_n_frames, 2);
    assert_eq!(cfg.palette().unwrap().len(), 2);
}

#[test]
fn unknown_fields_are_config_errors_and_malformed_json_is_serde() {
    assert!(
        BlobConfig::from_json_str(r#"{"radiuss": 3}"#)
            .unwrap_err()
            .is_config()
    );
    assert!(matches!(
        BlobConfig::from_json_str("{"),
        Err(BlobError::Serde(_))
    ));
    assert!(matches!(
        BlobConfig::from_json_str(r#"{"radius": 3"#),
        Err(BlobError::Serde(_))
    ));
    assert!(
        BlobConfig::from_json_str(r#"{"shape": "hexagon"}"#)
            .unwrap_err()
            .is_config()
    );
}

#[test]
fn validation_reports_every_problem() {
    let cfg = BlobConfig {
        num_points: 2,
        fluidity: -1.0,
        layers: 0,
        colors: Some(vec!["#zzzzzz".into()]),
        ..BlobConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.is_config());
    let msg = err.message();
    assert!(msg.contains("numPoints"));
    assert!(msg.contains("fluidity"));
    assert!(msg.contains("layers"));
    assert!(msg.contains("colors[0]"));
}

#[test]
fn mismatched_offsets_fail_fast() {
    let cfg = BlobConfig {
        num_points: 4,
        noise_offsets: Some(vec![NoiseOffset::default(); 3]),
        ..BlobConfig::default()
    };
    assert!(cfg.validate().unwrap_err().message().contains("noiseOffsets"));
}

#[test]
fn inverted_radius_bounds_are_rejected() {
    let cfg = BlobConfig {
        min_radius: Some(90.0),
        max_radius: Some(30.0),
        ..BlobConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn palette_precedence() {
    let preset = BlobConfig {
        color_preset: Some("nonexistent".into()),
        moods: Some(vec![MoodWeight::new("sad", 1.0)]),
        ..BlobConfig::default()
    };
    assert_eq!(preset.palette().unwrap(), ColorPalette::default_palette());

    let moods = BlobConfig {
        moods: Some(vec![MoodWeight::new("sad", 1.0)]),
        ..BlobConfig::default()
    };
    assert_eq!(moods.palette().unwrap(), ColorPalette::preset("blue"));

    let explicit = BlobConfig {
        colors: Some(vec!["#FF0000".into()]),
        color_preset: Some("blue".into()),
        ..BlobConfig::default()
    };
    assert_eq!(explicit.palette().unwrap().colors()[0].to_hex(), "#FF0000");

    assert_eq!(
        BlobConfig::default().palette().unwrap(),
        ColorPalette::default_palette()
    );
}

#[test]
fn randomized_is_seed_deterministic_and_valid() {
    let base = BlobConfig {
        colors: Some(vec!["#123456".into()]),
        ..BlobConfig::default()
    };
    let a = base.randomized(7);
    let b = base.randomized(7);
    assert_eq!(a, b);
    assert!(a.colors.is_none());
    assert!(a.color_preset.is_some());
    assert_eq!(a.noise_offsets.as_ref().map(Vec::len), Some(base.num_points));
    assert_eq!(a.radius, base.radius);
    a.validate().unwrap();
    assert_ne!(a.noise_offsets, base.randomized(8).noise_offsets);
}

#[test]
fn track_features_drive_motion_and_palette() {
    let features = TrackFeatures {
        danceability: Some(3.0),
        bpm: Some(120.0),
        moods: vec![MoodWeight::new("happy", 0.9)],
    };
    let cfg = BlobConfig {
        color_preset: Some("red".into()),
        ..BlobConfig::default()
    }
    .with_track_features(&features);
    assert_eq!(cfg.fluidity, 2.0);
    assert!(cfg.pulse_speed > 0.0);
    assert!(cfg.color_preset.is_none());
    assert_eq!(cfg.palette().unwrap(), ColorPalette::preset("yellow"));

    let untouched = BlobConfig::default().with_track_features(&TrackFeatures::default());
    assert_eq!(untouched, BlobConfig::default());
}

#[test]
fn from_path_reports_missing_file_as_resource_error() {
    let err = BlobConfig::from_path(Path::new("target/definitely/missing.json")).unwrap_err();
    assert!(matches!(err, BlobError::Resource(_)));
}

#[test]
fn base_pulse_above_audio_cap_is_rejected() {
    let cfg = BlobConfig {
        pulse_strength: 100.0,
        ..BlobConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.is_config());
    assert!(err.message().contains("maxPulseStrength"));

    let at_cap = BlobConfig {
        pulse_strength: cfg.audio.max_pulse_strength,
        ..BlobConfig::default()
    };
    assert!(at_cap.validate().is_ok());
}

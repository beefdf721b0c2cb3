use super::*;
use crate::broadcast::channel::MemoryBroadcaster;

fn scalars(radius: f64) -> FrameScalars {
    FrameScalars {
        radius,
        min_radius: 40.0,
        max_radius: 80.0,
        pulse_strength: 15.0,
        min_pulse: 15.0,
        max_pulse: 60.0,
    }
}

#[test]
fn size_maps_min_mid_max() {
    assert_eq!(scalars(40.0).size_percent(), 0.0);
    assert_eq!(scalars(60.0).size_percent(), 50.0);
    assert_eq!(scalars(80.0).size_percent(), 100.0);
    assert_eq!(scalars(10.0).size_percent(), 0.0);
    assert_eq!(scalars(1e9).size_percent(), 100.0);
}

#[test]
fn pulse_maps_relative_to_base_and_max() {
    let mut s = scalars(60.0);
    assert_eq!(s.pulse_percent(), 0.0);
    s.pulse_strength = 60.0;
    assert_eq!(s.pulse_percent(), 100.0);
}

#[test]
fn default_config_emits_size_only_every_frame() {
    let mut p = ParameterBroadcast::new(BroadcastConfig::default()).unwrap();
    let mut b = MemoryBroadcaster::new();
    let log = b.log();
    for frame in 0..3 {
        p.emit_frame(frame, &scalars(60.0), &mut b);
    }
    let log = log.borrow();
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|e| e.label == "sizeData" && e.value == 50.0));
    assert_eq!(p.latest_size(), Some(50.0));
    assert_eq!(p.latest_pulse(), None);
}

#[test]
fn cadence_and_pulse_label_are_honoured() {
    let cfg = BroadcastConfig {
        size_label: None,
        pulse_label: Some("pulse".into()),
        every_n_frames: 4,
    };
    let mut p = ParameterBroadcast::new(cfg).unwrap();
    let mut b = MemoryBroadcaster::new();
    let log = b.log();
    for frame in 0..10 {
        p.emit_frame(frame, &scalars(60.0), &mut b);
    }
    let labels: Vec<_> = log.borrow().iter().map(|e| e.label.clone()).collect();
    assert_eq!(labels, vec!["pulse", "pulse", "pulse"]);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = BroadcastConfig {
        every_n_frames: 0,
        ..BroadcastConfig::default()
    };
    assert!(ParameterBroadcast::new(cfg).unwrap_err().is_config());
    let cfg = BroadcastConfig {
        size_label: Some("  ".into()),
        ..BroadcastConfig::default()
    };
    assert!(cfg.validate().unwrap_err().is_config());
}

#[test]
fn config_parses_camel_case() {
    let cfg: BroadcastConfig =
        serde_json::from_str(r#"{"pulseLabel":"pulse","everyNFrames":2}"#).unwrap();
    assert_eq!(cfg.pulse_label.as_deref(), Some("pulse"));
    assert_eq!(cfg.size_label.as_deref(), Some("sizeData"));
    assert_eq!(cfg.every_n_frames, 2);
}

use super::*;
use std::f64::consts::{FRAC_PI_2, PI};

#[test]
fn round_is_the_unit_circle() {
    for i in 0..16 {
        let a = i as f64 / 16.0 * TAU;
        let v = ShapeProfile::Round.sample(a);
        assert!((v.hypot() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn oval_has_wider_major_axis() {
    let right = ShapeProfile::Oval.sample(0.0);
    let top = ShapeProfile::Oval.sample(FRAC_PI_2);
    assert!((right.x - 1.2).abs() < 1e-12);
    assert!((top.y - 0.8).abs() < 1e-12);
}

#[test]
fn star_spikes_at_zero_angle() {
    let tip = ShapeProfile::Star.sample(0.0);
    assert!((tip.x - 2.0).abs() < 1e-12);
    let valley = ShapeProfile::Star.sample(PI / 5.0);
    assert!(valley.hypot() < tip.hypot());
}

#[test]
fn every_profile_is_finite_and_periodic() {
    for p in ShapeProfile::ALL {
        for i in 0..72 {
            let a = i as f64 / 72.0 * TAU;
            let v = p.sample(a);
            assert!(v.x.is_finite() && v.y.is_finite(), "{p} at {a}");
            let w = p.sample(a + TAU);
            assert!((v - w).hypot() < 1e-9, "{p} not periodic at {a}");
        }
    }
}

#[test]
fn names_round_trip_and_unknown_is_config_error() {
    for p in ShapeProfile::ALL {
        assert_eq!(p.name().parse::<ShapeProfile>().unwrap(), p);
    }
    assert_eq!(" Flower ".parse::<ShapeProfile>().unwrap(), ShapeProfile::Flower);
    assert!("hexagon".parse::<ShapeProfile>().unwrap_err().is_config());
}

#[test]
fn serde_uses_lowercase_names() {
    let p: ShapeProfile = serde_json::from_str("\"droplet\"").unwrap();
    assert_eq!(p, ShapeProfile::Droplet);
    assert_eq!(
        serde_json::to_string(&ShapeProfile::Cloud).unwrap(),
        "\"cloud\""
    );
}

#[test]
fn random_pick_is_seed_stable() {
    let mut a = fastrand::Rng::with_seed(7);
    let mut b = fastrand::Rng::with_seed(7);
    assert_eq!(ShapeProfile::random(&mut a), ShapeProfile::random(&mut b));
}

#[test]
fn wavy_and_squish_differ_from_round() {
    let a = std::f64::consts::PI / 16.0;
    let round = ShapeProfile::Round.sample(a);
    let wavy = ShapeProfile::Wavy.sample(a);
    assert!((wavy.length() - 1.08).abs() < 1e-9);
    assert!((wavy.length() - round.length()).abs() > 0.05);

    let squish = ShapeProfile::Squish.sample(0.0);
    assert!((squish.x - 1.1).abs() < 1e-12);
    let squish = ShapeProfile::Squish.sample(std::f64::consts::FRAC_PI_2);
    assert!((squish.y - 0.85).abs() < 1e-12);
}

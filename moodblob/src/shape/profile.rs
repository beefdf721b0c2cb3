use std::f64::consts::TAU;
use std::str::FromStr;

use crate::foundation::core::Vec2;
use crate::foundation::error::{BlobError, BlobResult};

/// Named base silhouette. Each variant maps an angle in `[0, 2π)` to a unit-shape vector that the
/// contour generator scales by the (distorted) radius.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ShapeProfile {
    #[default]
    Round,
    Oval,
    Wavy,
    Squish,
    Star,
    Flower,
    Bubble,
    Cloud,
    Droplet,
}

impl ShapeProfile {
    /// Every known profile, in a stable order.
    pub const ALL: [ShapeProfile; 9] = [
        ShapeProfile::Round,
        ShapeProfile::Oval,
        ShapeProfile::Wavy,
        ShapeProfile::Squish,
        ShapeProfile::Star,
        ShapeProfile::Flower,
        ShapeProfile::Bubble,
        ShapeProfile::Cloud,
        ShapeProfile::Droplet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeProfile::Round => "round",
            ShapeProfile::Oval => "oval",
            ShapeProfile::Wavy => "wavy",
            ShapeProfile::Squish => "squish",
            ShapeProfile::Star => "star",
            ShapeProfile::Flower => "flower",
            ShapeProfile::Bubble => "bubble",
            ShapeProfile::Cloud => "cloud",
            ShapeProfile::Droplet => "droplet",
        }
    }

    /// Unit-shape vector at `angle` (radians). Pure; angles outside `[0, 2π)` wrap.
    pub fn sample(self, angle: f64) -> Vec2 {
        let a = angle.rem_euclid(TAU);
        let (s, c) = a.sin_cos();
        match self {
            ShapeProfile::Round => Vec2::new(c, s),
            ShapeProfile::Oval => Vec2::new(c * 1.2, s * 0.8),
            ShapeProfile::Wavy => {
                let ripple = 1.0 + (a * 8.0).sin() * 0.08;
                Vec2::new(c * ripple, s * ripple)
            }
            ShapeProfile::Squish => Vec2::new(c * 1.1, s * 0.85),
            ShapeProfile::Star => {
                let spikes = 1.5 + (a * 5.0).cos() * 0.5;
                Vec2::new(c * spikes, s * spikes)
            }
            ShapeProfile::Flower => {
                let petals = 1.0 + (a * 6.0).sin() * 0.3;
                Vec2::new(c * petals, s * petals)
            }
            ShapeProfile::Bubble => {
                let wobble = 1.0 + (a * 3.0).sin() * 0.2;
                Vec2::new(c * wobble, s * wobble)
            }
            ShapeProfile::Cloud => {
                let puff = 1.0 + (a * 4.0).sin() * 0.15 + (a * 6.0).cos() * 0.15;
                Vec2::new(c * puff, s * puff)
            }
            // The x and y axes use different angular factors, so the tip stretches downwards.
            ShapeProfile::Droplet => {
                let squeeze = 1.0 + s * 0.3;
                Vec2::new(c * squeeze, s * (1.0 + c * 0.5))
            }
        }
    }

    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }
}

impl FromStr for ShapeProfile {
    type Err = BlobError;

    fn from_str(s: &str) -> BlobResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == key)
            .ok_or_else(|| BlobError::config(format!("unknown shape profile \"{s}\"")))
    }
}

impl std::fmt::Display for ShapeProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/profile.rs"]
mod tests;

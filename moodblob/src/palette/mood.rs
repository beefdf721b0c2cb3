//! Palette and motion hints derived from track metadata (mood rankings, danceability, tempo).

use std::f64::consts::TAU;

use crate::palette::presets::ColorPalette;

/// Frame rate the per-frame motion increments are tuned for.
pub const REFERENCE_FPS: f64 = 60.0;

/// Mood label to preset key.
pub const MOOD_PRESETS: &[(&str, &str)] = &[
    ("happy", "yellow"),
    ("party", "pink"),
    ("sad", "blue"),
    ("relaxed", "green"),
    ("aggressive", "red"),
    ("electronic", "purple"),
    ("acoustic", "turquoise"),
    ("energetic", "orange"),
    ("calm", "white"),
    ("dark", "black"),
    ("neutral", "gray"),
    ("triumphant", "gold"),
    ("ecstatic", "rainbow"),
];

/// One ranked entry from the mood/metadata collaborator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MoodWeight {
    pub label: String,
    pub weight: f64,
}

impl MoodWeight {
    pub fn new(label: impl Into<String>, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }
}

/// Acoustic features of the current track, as supplied by the metadata collaborator.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TrackFeatures {
    pub danceability: Option<f64>,
    pub bpm: Option<f64>,
    pub moods: Vec<MoodWeight>,
}

/// Picks the preset of the highest-weighted recognized mood. Ties keep list order; an empty or
/// fully unrecognized list yields the default palette.
pub fn palette_from_moods(moods: &[MoodWeight]) -> ColorPalette {
    let mut best: Option<(&str, f64)> = None;
    for m in moods {
        if !m.weight.is_finite() {
            continue;
        }
        let Some(preset) = preset_for_mood(&m.label) else {
            continue;
        };
        if best.is_none_or(|(_, w)| m.weight > w) {
            best = Some((preset, m.weight));
        }
    }
    match best {
        Some((preset, _)) => ColorPalette::preset(preset),
        None => ColorPalette::default_palette(),
    }
}

pub fn preset_for_mood(label: &str) -> Option<&'static str> {
    let key = label.trim().to_ascii_lowercase();
    MOOD_PRESETS
        .iter()
        .find(|(mood, _)| *mood == key)
        .map(|(_, preset)| *preset)
}

/// Danceability (roughly 0..3) scaled into a fluidity factor in `[0, 2]`.
pub fn fluidity_from_danceability(danceability: f64) -> f64 {
    if !danceability.is_finite() {
        return 1.0;
    }
    (danceability / 1.5).clamp(0.0, 2.0)
}

/// Per-frame breathing phase increment giving one breath per bar (four beats).
pub fn pulse_speed_from_bpm(bpm: f64) -> Option<f64> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return None;
    }
    Some(TAU * (bpm / 60.0) / 4.0 / REFERENCE_FPS)
}

#[cfg(test)]
#[path = "../../tests/unit/palette/mood.rs"]
mod tests;

use std::path::Path;

use crate::audio::modulator::AudioConfig;
use crate::broadcast::mapping::BroadcastConfig;
use crate::contour::generator::MIN_POINTS;
use crate::field::noise::{NoiseField, NoiseOffset};
use crate::foundation::core::Point;
use crate::foundation::error::{BlobError, BlobResult};
use crate::palette::color::Color;
use crate::palette::mood::{
    MoodWeight, TrackFeatures, fluidity_from_danceability, palette_from_moods,
    pulse_speed_from_bpm,
};
use crate::palette::presets::ColorPalette;
use crate::shape::profile::ShapeProfile;

/// Upper bound on independently animated layers.
pub const MAX_LAYERS: usize = 8;

/// Recognized options for one blob instance. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BlobConfig {
    pub shape: ShapeProfile,
    /// Explicit palette; takes precedence over `color_preset` and `moods`.
    pub colors: Option<Vec<String>>,
    pub color_preset: Option<String>,
    /// Ranked mood list used as a palette source when no colors or preset are given.
    pub moods: Option<Vec<MoodWeight>>,
    /// Defaults to the canvas center.
    pub center: Option<Point>,
    pub radius: f64,
    /// Defaults to `0.8 * radius`.
    pub min_radius: Option<f64>,
    /// Defaults to `1.6 * radius`.
    pub max_radius: Option<f64>,
    pub noise_strength: f64,
    pub edge_noise_strength: f64,
    pub edge_softness: f64,
    pub pulse_speed: f64,
    pub pulse_strength: f64,
    pub fluidity: f64,
    pub num_points: usize,
    /// Initial phase seeds; drawn from `seed` when absent.
    pub noise_offsets: Option<Vec<NoiseOffset>>,
    pub noise_step: f64,
    pub layers: usize,
    pub orbit_radius: f64,
    pub orbit_speed: f64,
    pub layer_opacity: f64,
    pub seed: u64,
    pub audio: AudioConfig,
    pub broadcast: BroadcastConfig,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            shape: ShapeProfile::Round,
            colors: None,
            color_preset: None,
            moods: None,
            center: None,
            radius: 50.0,
            min_radius: None,
            max_radius: None,
            noise_strength: 10.0,
            edge_noise_strength: 5.0,
            edge_softness: 30.0,
            pulse_speed: 0.02,
            pulse_strength: 15.0,
            fluidity: 1.0,
            num_points: 36,
            noise_offsets: None,
            noise_step: 0.01,
            layers: 1,
            orbit_radius: 0.0,
            orbit_speed: 0.5,
            layer_opacity: 1.0,
            seed: 0,
            audio: AudioConfig::default(),
            broadcast: BroadcastConfig::default(),
        }
    }
}

impl BlobConfig {
    pub fn from_json_str(json: &str) -> BlobResult<Self> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| match e.classify() {
            serde_json::error::Category::Data => {
                BlobError::config(format!("invalid blob config: {e}"))
            }
            _ => BlobError::serde(format!("malformed blob config json: {e}")),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[tracing::instrument]
    pub fn from_path(path: &Path) -> BlobResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BlobError::resource(format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Effective `[min, max]` radius range.
    pub fn radius_bounds(&self) -> (f64, f64) {
        (
            self.min_radius.unwrap_or(self.radius * 0.8),
            self.max_radius.unwrap_or(self.radius * 1.6),
        )
    }

    /// Resolves the palette: explicit colors, then preset (unknown keys fall back to the default),
    /// then moods, then the default palette.
    pub fn palette(&self) -> BlobResult<ColorPalette> {
        if let Some(colors) = &self.colors {
            return ColorPalette::from_hex(colors);
        }
        if let Some(preset) = &self.color_preset {
            return Ok(ColorPalette::preset(preset));
        }
        if let Some(moods) = &self.moods {
            return Ok(palette_from_moods(moods));
        }
        Ok(ColorPalette::default_palette())
    }

    /// Reports every problem at once, one per line.
    pub fn validate(&self) -> BlobResult<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.num_points < MIN_POINTS {
            errors.push(format!(
                "numPoints: must be >= {MIN_POINTS}, got {}",
                self.num_points
            ));
        }
        if let Some(offsets) = &self.noise_offsets
            && let Err(e) = NoiseField::from_offsets(offsets.clone(), self.num_points)
        {
            errors.push(format!("noiseOffsets: {}", e.message()));
        }

        let non_negative = [
            ("noiseStrength", self.noise_strength),
            ("edgeNoiseStrength", self.edge_noise_strength),
            ("edgeSoftness", self.edge_softness),
            ("pulseSpeed", self.pulse_speed),
            ("pulseStrength", self.pulse_strength),
            ("fluidity", self.fluidity),
            ("noiseStep", self.noise_step),
            ("orbitRadius", self.orbit_radius),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                errors.push(format!("{name}: must be finite and >= 0, got {v}"));
            }
        }
        if !self.orbit_speed.is_finite() {
            errors.push("orbitSpeed: must be finite".to_owned());
        }
        if !(0.0..=1.0).contains(&self.layer_opacity) {
            errors.push(format!(
                "layerOpacity: must be in [0, 1], got {}",
                self.layer_opacity
            ));
        }

        if !self.radius.is_finite() || self.radius <= 0.0 {
            errors.push(format!("radius: must be finite and > 0, got {}", self.radius));
        }
        let (min, max) = self.radius_bounds();
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            errors.push(format!(
                "minRadius/maxRadius: need 0 < min <= max, got [{min}, {max}]"
            ));
        }

        if !(1..=MAX_LAYERS).contains(&self.layers) {
            errors.push(format!(
                "layers: must be in 1..={MAX_LAYERS}, got {}",
                self.layers
            ));
        }

        if let Some(colors) = &self.colors {
            if colors.is_empty() {
                errors.push("colors: must not be empty".to_owned());
            }
            for (i, c) in colors.iter().enumerate() {
                if let Err(e) = Color::from_hex(c) {
                    errors.push(format!("colors[{i}]: {}", e.message()));
                }
            }
        }

        if let Some(center) = self.center
            && (!center.x.is_finite() || !center.y.is_finite())
        {
            errors.push("center: must be finite".to_owned());
        }

        if let Err(e) = self.audio.validate() {
            errors.push(format!("audio: {}", e.message()));
        }
        if self.pulse_strength > self.audio.max_pulse_strength {
            errors.push(format!(
                "pulseStrength: must be <= audio.maxPulseStrength ({}), got {}",
                self.audio.max_pulse_strength, self.pulse_strength
            ));
        }
        if let Err(e) = self.broadcast.validate() {
            errors.push(format!("broadcast: {}", e.message()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BlobError::config(errors.join("\n")))
        }
    }

    /// A copy with a freshly drawn shape, color preset and phase seeds.
    pub fn randomized(&self, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let shape = ShapeProfile::random(&mut rng);
        let (preset, _) = ColorPalette::random_preset(&mut rng);
        let field = NoiseField::seeded(self.num_points, &mut rng);
        Self {
            shape,
            colors: None,
            color_preset: Some(preset.to_owned()),
            moods: None,
            noise_offsets: Some(field.offsets().to_vec()),
            seed,
            ..self.clone()
        }
    }

    /// Applies metadata-derived motion and palette hints. Explicit `colors` keep precedence over the
    /// mood list; a preset is replaced by it.
    pub fn with_track_features(mut self, features: &TrackFeatures) -> Self {
        if let Some(d) = features.danceability {
            self.fluidity = fluidity_from_danceability(d);
        }
        if let Some(speed) = features.bpm.and_then(pulse_speed_from_bpm) {
            self.pulse_speed = speed;
        }
        if !features.moods.is_empty() {
            self.color_preset = None;
            self.moods = Some(features.moods.clone());
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blob/config.rs"]
mod tests;

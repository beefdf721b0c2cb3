use std::f64::consts::TAU;

use crate::audio::modulator::Modulation;
use crate::blob::config::BlobConfig;
use crate::contour::generator::{ContourParams, generate, smooth_path};
use crate::field::noise::{DistortionParams, NoiseField};
use crate::foundation::core::{BezPath, Canvas, Point, Vec2};
use crate::foundation::error::BlobResult;
use crate::palette::presets::ColorPalette;
use crate::shape::profile::ShapeProfile;

/// Per-layer constants fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerState {
    /// Distortion phase shift for this layer.
    pub angle_offset: f64,
    /// Orbit phase around the blob center.
    pub orbit_phase: f64,
    pub palette: ColorPalette,
}

/// Geometry of one layer for the current frame.
#[derive(Clone, Debug)]
pub struct LayerContour {
    pub center: Point,
    pub points: Vec<Point>,
    pub path: BezPath,
}

/// Mutable animation state of one blob instance. Owned by the frame loop; the compositor only reads
/// it after `update` has returned.
#[derive(Clone, Debug)]
pub struct BlobState {
    config: BlobConfig,
    canvas: Canvas,
    center: Point,
    shape: ShapeProfile,
    palette: ColorPalette,
    base_radius: f64,
    radius: f64,
    min_radius: f64,
    max_radius: f64,
    base_pulse_strength: f64,
    pulse_strength: f64,
    radius_gain: f64,
    time: f64,
    field: NoiseField,
    layers: Vec<LayerState>,
    frame: u64,
}

impl BlobState {
    /// Validates `config` and seeds the phase accumulators. All configuration errors surface here.
    #[tracing::instrument(skip(config), fields(shape = %config.shape, points = config.num_points))]
    pub fn new(config: &BlobConfig, canvas: Canvas) -> BlobResult<Self> {
        config.validate()?;

        let field = match &config.noise_offsets {
            Some(offsets) => NoiseField::from_offsets(offsets.clone(), config.num_points)?,
            None => {
                let mut rng = fastrand::Rng::with_seed(config.seed);
                NoiseField::seeded(config.num_points, &mut rng)
            }
        };
        let palette = config.palette()?;
        let layers = (0..config.layers)
            .map(|i| {
                let phase = i as f64 * TAU / config.layers as f64;
                LayerState {
                    angle_offset: phase,
                    orbit_phase: phase,
                    palette: palette.rotated(i),
                }
            })
            .collect();
        let (min_radius, max_radius) = config.radius_bounds();

        Ok(Self {
            config: config.clone(),
            canvas,
            center: config.center.unwrap_or_else(|| canvas.center()),
            shape: config.shape,
            palette,
            base_radius: config.radius,
            radius: config.radius.clamp(min_radius, max_radius),
            min_radius,
            max_radius,
            base_pulse_strength: config.pulse_strength,
            pulse_strength: config.pulse_strength,
            radius_gain: config.audio.radius_gain,
            time: 0.0,
            field,
            layers,
            frame: 0,
        })
    }

    /// Advances one frame. Time and phase accumulators move by `fluidity`-scaled steps; audio
    /// modulation (when present) sets the pulse strength and grows the radius within bounds.
    pub fn update(&mut self, modulation: Option<Modulation>) {
        let fluidity = self.config.fluidity;
        self.time += self.config.pulse_speed * fluidity;
        self.field.advance(self.config.noise_step, fluidity);

        let target = match modulation {
            Some(m) => {
                self.pulse_strength = m.pulse_strength;
                self.base_radius * (1.0 + m.level.clamp(0.0, 1.0) * self.radius_gain)
            }
            None => {
                self.pulse_strength = self.base_pulse_strength;
                self.base_radius
            }
        };
        self.radius = target.clamp(self.min_radius, self.max_radius);
        self.frame += 1;
    }

    /// Replaces this state with one built from a re-randomized copy of its configuration.
    pub fn rerandomize(&mut self, seed: u64) -> BlobResult<()> {
        let config = self.config.randomized(seed);
        *self = Self::new(&config, self.canvas)?;
        tracing::debug!(seed, shape = %self.shape, "blob re-randomized");
        Ok(())
    }

    pub fn contour_params(&self, layer: usize) -> Option<ContourParams> {
        let l = self.layers.get(layer)?;
        Some(ContourParams {
            center: self.layer_center(l),
            radius: self.radius,
            shape: self.shape,
            time: self.time,
            angle_offset: l.angle_offset,
            distortion: DistortionParams {
                noise_strength: self.config.noise_strength,
                edge_noise_strength: self.config.edge_noise_strength,
                pulse_strength: self.pulse_strength,
                fluidity: self.config.fluidity,
            },
        })
    }

    /// Point rings and smoothed outlines for every layer, in layer order.
    pub fn contours(&self) -> BlobResult<Vec<LayerContour>> {
        let mut out = Vec::with_capacity(self.layers.len());
        for i in 0..self.layers.len() {
            let Some(params) = self.contour_params(i) else {
                continue;
            };
            let points = generate(&self.field, &params)?;
            let path = smooth_path(&points);
            out.push(LayerContour {
                center: params.center,
                points,
                path,
            });
        }
        Ok(out)
    }

    fn layer_center(&self, layer: &LayerState) -> Point {
        let r = self.config.orbit_radius;
        if r == 0.0 {
            return self.center;
        }
        let a = self.time * self.config.orbit_speed + layer.orbit_phase;
        self.center + Vec2::new(a.cos(), a.sin()) * r
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn shape(&self) -> ShapeProfile {
        self.shape
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn layers(&self) -> &[LayerState] {
        &self.layers
    }

    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn radius_bounds(&self) -> (f64, f64) {
        (self.min_radius, self.max_radius)
    }

    pub fn base_pulse_strength(&self) -> f64 {
        self.base_pulse_strength
    }

    pub fn pulse_strength(&self) -> f64 {
        self.pulse_strength
    }

    pub fn edge_softness(&self) -> f64 {
        self.config.edge_softness
    }

    pub fn layer_opacity(&self) -> f64 {
        self.config.layer_opacity
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    /// Number of completed updates.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blob/state.rs"]
mod tests;

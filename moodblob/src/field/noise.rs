use crate::foundation::error::{BlobError, BlobResult};

/// Span of the randomly seeded phase accumulators.
pub const OFFSET_SEED_SPAN: f64 = 1000.0;

/// Phase accumulator pair for one contour sample index.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NoiseOffset {
    pub x: f64,
    pub y: f64,
}

impl NoiseOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Scalar strengths feeding the distortion terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistortionParams {
    pub noise_strength: f64,
    pub edge_noise_strength: f64,
    pub pulse_strength: f64,
    pub fluidity: f64,
}

/// Radius offsets along the x and y projections of one sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distortion {
    pub dx: f64,
    pub dy: f64,
}

/// Distortion at one sample angle.
///
/// Phase noise, the time/angle ripple and the two-frequency angular term scale with `fluidity`;
/// the breathing term does not, but its phase comes from `time`, which only advances with fluidity.
pub fn distortion(angle: f64, time: f64, offset: NoiseOffset, p: &DistortionParams) -> Distortion {
    let noise_x = offset.x.sin() * p.noise_strength;
    let noise_y = offset.y.cos() * p.noise_strength;
    let ripple = (time * 2.0 + angle * 3.0).sin() * p.edge_noise_strength;
    let harmonic = ((angle * 4.0 + time).sin() + (angle * 7.0 + time).cos()) * p.noise_strength;
    let breathing = time.sin() * p.pulse_strength * (1.0 + (angle * 3.0).sin() * 0.4);

    let shared = (ripple + harmonic) * p.fluidity;
    Distortion {
        dx: noise_x * p.fluidity + shared + breathing,
        dy: noise_y * p.fluidity + shared + breathing,
    }
}

/// Per-sample phase accumulators for an N-point contour.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    offsets: Vec<NoiseOffset>,
}

impl NoiseField {
    /// Uses caller-supplied seeds; the length must equal the contour point count.
    pub fn from_offsets(offsets: Vec<NoiseOffset>, num_points: usize) -> BlobResult<Self> {
        if offsets.len() != num_points {
            return Err(BlobError::config(format!(
                "noiseOffsets has {} entries but numPoints is {num_points}",
                offsets.len()
            )));
        }
        if offsets.iter().any(|o| !o.x.is_finite() || !o.y.is_finite()) {
            return Err(BlobError::config("noiseOffsets must be finite"));
        }
        Ok(Self { offsets })
    }

    pub fn seeded(num_points: usize, rng: &mut fastrand::Rng) -> Self {
        let offsets = (0..num_points)
            .map(|_| NoiseOffset::new(rng.f64() * OFFSET_SEED_SPAN, rng.f64() * OFFSET_SEED_SPAN))
            .collect();
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn offsets(&self) -> &[NoiseOffset] {
        &self.offsets
    }

    /// Advances every accumulator by `step * fluidity` on both axes.
    pub fn advance(&mut self, step: f64, fluidity: f64) {
        let inc = step * fluidity;
        if inc == 0.0 {
            return;
        }
        for o in &mut self.offsets {
            o.x += inc;
            o.y += inc;
        }
    }

    pub fn get(&self, index: usize) -> BlobResult<NoiseOffset> {
        self.offsets.get(index).copied().ok_or_else(|| {
            BlobError::config(format!(
                "noise offset index {index} out of range ({} offsets)",
                self.offsets.len()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/noise.rs"]
mod tests;

use crate::broadcast::channel::Broadcaster;
use crate::foundation::error::{BlobError, BlobResult};
use crate::foundation::math::map_to_percent;

/// Which derived scalars are broadcast, under which labels, and how often.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BroadcastConfig {
    /// Label for the radius-derived size value; `None` disables it.
    pub size_label: Option<String>,
    /// Label for the pulse-strength-derived value; `None` disables it.
    pub pulse_label: Option<String>,
    /// Emit on every n-th frame (1 = every frame).
    pub every_n_frames: u32,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            size_label: Some("sizeData".to_owned()),
            pulse_label: None,
            every_n_frames: 1,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> BlobResult<()> {
        if self.every_n_frames == 0 {
            return Err(BlobError::config("broadcast.everyNFrames must be >= 1"));
        }
        for label in [&self.size_label, &self.pulse_label].into_iter().flatten() {
            if label.trim().is_empty() {
                return Err(BlobError::config("broadcast labels must be non-empty"));
            }
        }
        Ok(())
    }
}

/// Raw scalar state of one frame, with the ranges used to normalize it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameScalars {
    pub radius: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub pulse_strength: f64,
    pub min_pulse: f64,
    pub max_pulse: f64,
}

impl FrameScalars {
    /// Radius mapped into `0..=100`, rounded to the nearest integer.
    pub fn size_percent(&self) -> f64 {
        map_to_percent(self.radius, self.min_radius, self.max_radius).round()
    }

    /// Pulse strength mapped into `0..=100`, rounded to the nearest integer.
    pub fn pulse_percent(&self) -> f64 {
        map_to_percent(self.pulse_strength, self.min_pulse, self.max_pulse).round()
    }
}

/// Frame-gated emission of derived scalars. Remembers the last values it produced.
#[derive(Clone, Debug)]
pub struct ParameterBroadcast {
    cfg: BroadcastConfig,
    latest_size: Option<f64>,
    latest_pulse: Option<f64>,
}

impl ParameterBroadcast {
    pub fn new(cfg: BroadcastConfig) -> BlobResult<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            latest_size: None,
            latest_pulse: None,
        })
    }

    pub fn latest_size(&self) -> Option<f64> {
        self.latest_size
    }

    pub fn latest_pulse(&self) -> Option<f64> {
        self.latest_pulse
    }

    /// Emits the configured scalars for `frame` when it falls on the emission cadence.
    pub fn emit_frame(&mut self, frame: u64, scalars: &FrameScalars, out: &mut dyn Broadcaster) {
        if frame % u64::from(self.cfg.every_n_frames) != 0 {
            return;
        }
        if let Some(label) = &self.cfg.size_label {
            let v = scalars.size_percent();
            self.latest_size = Some(v);
            out.emit(label, v);
        }
        if let Some(label) = &self.cfg.pulse_label {
            let v = scalars.pulse_percent();
            self.latest_pulse = Some(v);
            out.emit(label, v);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/broadcast/mapping.rs"]
mod tests;

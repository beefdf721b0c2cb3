use std::time::Duration;

use crate::audio::analyzer::{AnalysisFrame, BeatDetector, SpectrumAnalyzer};
use crate::audio::tap::AudioTap;
use crate::foundation::error::{BlobError, BlobResult};

/// Tunables for audio-driven pulsing. Threshold and boost bounds have no canonical values; the
/// defaults were picked by ear.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AudioConfig {
    /// Energy (0..=255) above which a beat is signalled.
    pub threshold: f64,
    pub fft_size: usize,
    /// Number of low-frequency bins averaged into the energy value.
    pub bin_count: usize,
    /// Per-bin magnitude smoothing in `[0, 1)`.
    pub smoothing: f32,
    pub boost_min: f64,
    pub boost_max: f64,
    pub max_pulse_strength: f64,
    /// Fraction of the boost kept per analysis frame while no beat fires.
    pub pulse_decay: f64,
    /// Radius growth at full energy, relative to the base radius.
    pub radius_gain: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            threshold: 180.0,
            fft_size: 512,
            bin_count: 32,
            smoothing: 0.8,
            boost_min: 5.0,
            boost_max: 15.0,
            max_pulse_strength: 60.0,
            pulse_decay: 0.95,
            radius_gain: 0.6,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> BlobResult<()> {
        let finite = [
            ("threshold", self.threshold),
            ("boostMin", self.boost_min),
            ("boostMax", self.boost_max),
            ("maxPulseStrength", self.max_pulse_strength),
            ("pulseDecay", self.pulse_decay),
            ("radiusGain", self.radius_gain),
        ];
        for (name, v) in finite {
            if !v.is_finite() || v < 0.0 {
                return Err(BlobError::config(format!(
                    "audio.{name} must be finite and >= 0"
                )));
            }
        }
        if self.boost_min > self.boost_max {
            return Err(BlobError::config("audio.boostMin must be <= audio.boostMax"));
        }
        if self.pulse_decay > 1.0 {
            return Err(BlobError::config("audio.pulseDecay must be <= 1"));
        }
        // Builds and drops a throwaway analyser to validate the FFT parameters.
        SpectrumAnalyzer::new(self.fft_size, self.bin_count, self.smoothing).map(|_| ())
    }
}

/// Modulation scalars handed to the blob update for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modulation {
    pub pulse_strength: f64,
    /// Energy normalized to `[0, 1]`.
    pub level: f64,
    pub beat: bool,
}

type AnalysisListener = Box<dyn FnMut(&AnalysisFrame)>;

/// Taps an audio source, analyses it once per call to [`AudioModulator::analyze`], and turns beats
/// into pulse-strength boosts.
pub struct AudioModulator {
    cfg: AudioConfig,
    base_pulse: f64,
    pulse_strength: f64,
    detector: BeatDetector,
    rng: fastrand::Rng,
    tap: Option<Box<dyn AudioTap>>,
    analyzer: Option<SpectrumAnalyzer>,
    listener: Option<AnalysisListener>,
    frames_analyzed: u64,
}

impl std::fmt::Debug for AudioModulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioModulator")
            .field("base_pulse", &self.base_pulse)
            .field("pulse_strength", &self.pulse_strength)
            .field("frames_analyzed", &self.frames_analyzed)
            .finish()
    }
}

impl AudioModulator {
    pub fn new(cfg: AudioConfig, base_pulse: f64, seed: u64) -> BlobResult<Self> {
        cfg.validate()?;
        if !base_pulse.is_finite() || base_pulse < 0.0 {
            return Err(BlobError::config("pulseStrength must be finite and >= 0"));
        }
        // A beat only ever raises the pulse, so the base must sit under the cap.
        if base_pulse > cfg.max_pulse_strength {
            return Err(BlobError::config(format!(
                "pulseStrength {base_pulse} exceeds audio.maxPulseStrength {}",
                cfg.max_pulse_strength
            )));
        }
        let detector = BeatDetector::new(cfg.threshold);
        Ok(Self {
            cfg,
            base_pulse,
            pulse_strength: base_pulse,
            detector,
            rng: fastrand::Rng::with_seed(seed),
            tap: None,
            analyzer: None,
            listener: None,
            frames_analyzed: 0,
        })
    }

    /// Registers a callback invoked with every analysis result.
    pub fn on_analysis(&mut self, listener: impl FnMut(&AnalysisFrame) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Attaches to `tap` and allocates the analysis resources. Without a source nothing is allocated
    /// and a configuration error is returned.
    #[tracing::instrument(skip_all)]
    pub fn start(&mut self, tap: Option<Box<dyn AudioTap>>) -> BlobResult<()> {
        let Some(tap) = tap else {
            return Err(BlobError::config(
                "audio analysis requested but no audio source is attached",
            ));
        };
        if self.is_active() {
            self.stop();
        }
        let analyzer =
            SpectrumAnalyzer::new(self.cfg.fft_size, self.cfg.bin_count, self.cfg.smoothing)?;
        tracing::debug!(
            sample_rate = tap.sample_rate(),
            fft_size = self.cfg.fft_size,
            "audio analysis started"
        );
        self.tap = Some(tap);
        self.analyzer = Some(analyzer);
        self.detector.reset();
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.tap.is_some()
    }

    pub fn frames_analyzed(&self) -> u64 {
        self.frames_analyzed
    }

    pub fn pulse_strength(&self) -> f64 {
        self.pulse_strength
    }

    pub fn config(&self) -> &AudioConfig {
        &self.cfg
    }

    /// Runs one analysis frame at playback position `at`. Returns `None` while inactive.
    pub fn analyze(&mut self, at: Duration) -> BlobResult<Option<Modulation>> {
        let (Some(tap), Some(analyzer)) = (self.tap.as_mut(), self.analyzer.as_mut()) else {
            return Ok(None);
        };
        let (energy, rms) = analyzer.analyze_tap(tap.as_mut(), at)?;
        Ok(Some(self.apply(energy, rms)))
    }

    /// Feeds an externally measured energy (`0..=255`) through beat detection and pulse shaping.
    pub fn apply(&mut self, energy: f64, rms: f64) -> Modulation {
        let energy = if energy.is_finite() {
            energy.clamp(0.0, 255.0)
        } else {
            0.0
        };
        let beat = self.detector.detect(energy);
        if beat {
            let span = self.cfg.boost_max - self.cfg.boost_min;
            let boost = self.cfg.boost_min + self.rng.f64() * span;
            self.pulse_strength = (self.pulse_strength + boost).min(self.cfg.max_pulse_strength);
            tracing::debug!(energy, boost, pulse = self.pulse_strength, "beat");
        } else {
            self.pulse_strength =
                self.base_pulse + (self.pulse_strength - self.base_pulse) * self.cfg.pulse_decay;
        }

        let frame = AnalysisFrame { energy, rms, beat };
        self.frames_analyzed += 1;
        if let Some(listener) = self.listener.as_mut() {
            listener(&frame);
        }

        Modulation {
            pulse_strength: self.pulse_strength,
            level: energy / 255.0,
            beat,
        }
    }

    /// Releases the source connection and analysis buffers. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(mut tap) = self.tap.take() {
            tap.disconnect();
            tracing::debug!(frames = self.frames_analyzed, "audio analysis stopped");
        }
        self.analyzer = None;
        self.pulse_strength = self.base_pulse;
        self.detector.reset();
    }
}

impl Drop for AudioModulator {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/modulator.rs"]
mod tests;

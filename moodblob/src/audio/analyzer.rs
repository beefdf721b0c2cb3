//! Frequency-domain energy analysis and threshold beat detection.

use std::f32::consts::PI;
use std::sync::Arc;
use std::time::Duration;

use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::audio::tap::AudioTap;
use crate::foundation::error::{BlobError, BlobResult};

/// Decibel range mapped onto the 0..=255 byte scale of the frequency data.
pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;

/// One analysis result.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnalysisFrame {
    /// Mean byte-scaled magnitude over the bin window, `0..=255`.
    pub energy: f64,
    /// Time-domain RMS of the analysed window.
    pub rms: f64,
    /// True on the frame where energy crosses above the threshold.
    pub beat: bool,
}

/// FFT analyser holding its planned transform and scratch buffers.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    samples: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bin_count: usize,
    smoothing: f32,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, bin_count: usize, smoothing: f32) -> BlobResult<Self> {
        if fft_size < 64 || !fft_size.is_power_of_two() {
            return Err(BlobError::config(format!(
                "fftSize must be a power of two >= 64, got {fft_size}"
            )));
        }
        if bin_count == 0 || bin_count > fft_size / 2 {
            return Err(BlobError::config(format!(
                "binCount must be in 1..={}, got {bin_count}",
                fft_size / 2
            )));
        }
        if !(0.0..1.0).contains(&smoothing) {
            return Err(BlobError::config("smoothing must be in [0, 1)"));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let window = (0..fft_size).map(|i| hann_window(i, fft_size)).collect();

        Ok(Self {
            fft,
            window,
            samples: vec![0.0; fft_size],
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],
            bin_count,
            smoothing,
        })
    }

    pub fn fft_size(&self) -> usize {
        self.samples.len()
    }

    /// Reads the current window from `tap` and analyses it.
    pub fn analyze_tap(&mut self, tap: &mut dyn AudioTap, at: Duration) -> BlobResult<(f64, f64)> {
        tap.read_window(at, &mut self.samples)?;
        Ok(self.analyze_current())
    }

    /// Analyses `samples` (zero-padded or truncated to the FFT size). Returns `(energy, rms)`.
    pub fn analyze_samples(&mut self, samples: &[f32]) -> (f64, f64) {
        let n = self.samples.len();
        self.samples.fill(0.0);
        let take = samples.len().min(n);
        self.samples[..take].copy_from_slice(&samples[samples.len() - take..]);
        self.analyze_current()
    }

    fn analyze_current(&mut self) -> (f64, f64) {
        let n = self.samples.len();
        let rms = (self.samples.iter().map(|s| f64::from(*s).powi(2)).sum::<f64>() / n as f64)
            .sqrt();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            *slot = Complex::new(self.samples[i] * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buffer);

        // Smoothed magnitude per bin, then a byte-scaled decibel mapping averaged over the window.
        let mut sum = 0.0f64;
        for bin in 0..self.smoothed.len() {
            let mag = self.buffer[bin].norm() / n as f32;
            let s = self.smoothing * self.smoothed[bin] + (1.0 - self.smoothing) * mag;
            self.smoothed[bin] = if s.is_finite() { s } else { 0.0 };
            if bin < self.bin_count {
                sum += f64::from(decibels_to_byte(self.smoothed[bin]));
            }
        }
        (sum / self.bin_count as f64, rms)
    }
}

/// Hann window function for FFT analysis.
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

fn decibels_to_byte(mag: f32) -> f32 {
    if mag <= 0.0 {
        return 0.0;
    }
    let db = 20.0 * mag.log10();
    (255.0 * (db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS)).clamp(0.0, 255.0)
}

/// Rising-edge threshold detector over the rolling energy.
#[derive(Clone, Debug)]
pub struct BeatDetector {
    threshold: f64,
    above: bool,
}

impl BeatDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            above: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True when `energy` exceeds the threshold after having been at or below it.
    pub fn detect(&mut self, energy: f64) -> bool {
        let above = energy > self.threshold;
        let beat = above && !self.above;
        self.above = above;
        beat
    }

    pub fn reset(&mut self) {
        self.above = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/analyzer.rs"]
mod tests;

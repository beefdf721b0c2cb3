//! Audio-reactive pulsing: sample taps, spectral analysis, beat-driven modulation.

pub mod analyzer;
pub mod modulator;
pub mod tap;

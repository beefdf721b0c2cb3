//! Read-only taps on an already-playing audio signal.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::foundation::error::{BlobError, BlobResult};

/// Source of mono samples aligned with a playback clock. The engine never controls playback; it only
/// reads the most recent samples at the current position.
pub trait AudioTap {
    fn sample_rate(&self) -> u32;

    /// Fills `out` with the `out.len()` samples that end at playback position `at` and returns how many
    /// real samples were written. Positions before the start or past the end are zero-filled.
    fn read_window(&mut self, at: Duration, out: &mut [f32]) -> BlobResult<usize>;

    /// Releases the source connection. Called once on modulator teardown.
    fn disconnect(&mut self) {}
}

/// Decoded PCM held in memory, shared cheaply between taps.
#[derive(Clone, Debug)]
pub struct PcmTap {
    samples: Arc<[f32]>,
    sample_rate: u32,
    connected: bool,
}

impl PcmTap {
    pub fn new(samples: impl Into<Arc<[f32]>>, sample_rate: u32) -> BlobResult<Self> {
        if sample_rate == 0 {
            return Err(BlobError::config("audio sample rate must be > 0"));
        }
        Ok(Self {
            samples: samples.into(),
            sample_rate,
            connected: true,
        })
    }

    /// Decodes a WAV file and downmixes it to mono.
    #[tracing::instrument]
    pub fn open_wav(path: &Path) -> BlobResult<Self> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| BlobError::resource(format!("open wav '{}': {e}", path.display())))?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels.max(1));

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| BlobError::resource(format!("decode wav: {e}")))?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| BlobError::resource(format!("decode wav: {e}")))?
            }
        };

        let mono: Vec<f32> = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();
        tracing::debug!(
            samples = mono.len(),
            sample_rate = spec.sample_rate,
            channels,
            "decoded wav"
        );
        Self::new(mono, spec.sample_rate)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl AudioTap for PcmTap {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_window(&mut self, at: Duration, out: &mut [f32]) -> BlobResult<usize> {
        if !self.connected {
            return Err(BlobError::resource("audio tap is disconnected"));
        }
        out.fill(0.0);
        let end = (at.as_secs_f64() * f64::from(self.sample_rate)).round() as usize;
        let end = end.min(self.samples.len());
        let start = end.saturating_sub(out.len());
        let src = &self.samples[start..end];
        let dst_start = out.len() - src.len();
        out[dst_start..].copy_from_slice(src);
        Ok(src.len())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/tap.rs"]
mod tests;

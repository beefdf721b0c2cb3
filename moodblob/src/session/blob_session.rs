use crate::audio::modulator::{AudioModulator, Modulation};
use crate::audio::tap::AudioTap;
use crate::blob::config::BlobConfig;
use crate::blob::state::BlobState;
use crate::broadcast::channel::{Broadcaster, NullBroadcaster};
use crate::broadcast::mapping::{FrameScalars, ParameterBroadcast};
use crate::foundation::core::Canvas;
use crate::foundation::error::BlobResult;
use crate::palette::color::Color;
use crate::render::cpu::{Compositor, FrameRGBA};
use crate::schedule::scheduler::{FrameContext, FrameTask};
use crate::session::sink::{FrameSink, SinkConfig};

/// One animation session: owns the blob state and runs the per-frame pipeline
/// (audio analysis, state update, contour, composite, sink, broadcast).
pub struct BlobSession {
    state: BlobState,
    compositor: Compositor,
    modulator: Option<AudioModulator>,
    broadcaster: Box<dyn Broadcaster>,
    params: ParameterBroadcast,
    sink: Option<Box<dyn FrameSink>>,
    sink_open: bool,
    last_frame: Option<FrameRGBA>,
    last_modulation: Option<Modulation>,
}

impl BlobSession {
    /// Builds the state and compositor; every configuration error surfaces here.
    #[tracing::instrument(skip(config), fields(width = canvas.width, height = canvas.height))]
    pub fn new(config: &BlobConfig, canvas: Canvas) -> BlobResult<Self> {
        let state = BlobState::new(config, canvas)?;
        let compositor = Compositor::new(canvas)?;
        let params = ParameterBroadcast::new(config.broadcast.clone())?;
        Ok(Self {
            state,
            compositor,
            modulator: None,
            broadcaster: Box::new(NullBroadcaster),
            params,
            sink: None,
            sink_open: false,
            last_frame: None,
            last_modulation: None,
        })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.compositor = self.compositor.clone().with_background(color);
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn FrameSink>) -> Self {
        self.sink = Some(sink);
        self.sink_open = false;
        self
    }

    pub fn with_broadcaster(mut self, broadcaster: Box<dyn Broadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    /// Starts audio-driven pulsing from `tap`. With no source this is a configuration error and
    /// no analysis runs. Replaces (and releases) any previously attached source.
    pub fn attach_audio(&mut self, tap: Option<Box<dyn AudioTap>>) -> BlobResult<()> {
        self.detach_audio();
        let cfg = self.state.config();
        let mut modulator =
            AudioModulator::new(cfg.audio.clone(), cfg.pulse_strength, cfg.seed)?;
        modulator.start(tap)?;
        self.modulator = Some(modulator);
        Ok(())
    }

    /// Stops analysis and releases the source. Idempotent.
    pub fn detach_audio(&mut self) {
        if let Some(mut m) = self.modulator.take() {
            m.stop();
        }
        self.last_modulation = None;
    }

    pub fn audio(&self) -> Option<&AudioModulator> {
        self.modulator.as_ref()
    }

    pub fn audio_mut(&mut self) -> Option<&mut AudioModulator> {
        self.modulator.as_mut()
    }

    /// Swaps in a re-randomized blob (new shape, palette and phase seeds) in place.
    pub fn rerandomize(&mut self, seed: u64) -> BlobResult<()> {
        self.state.rerandomize(seed)
    }

    /// Flushes the sink, if any.
    pub fn finish(&mut self) -> BlobResult<()> {
        if let Some(sink) = &mut self.sink
            && self.sink_open
        {
            sink.end()?;
            self.sink_open = false;
        }
        Ok(())
    }

    pub fn state(&self) -> &BlobState {
        &self.state
    }

    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.last_frame.as_ref()
    }

    pub fn last_modulation(&self) -> Option<Modulation> {
        self.last_modulation
    }

    /// Most recent broadcast size value, for relays that resend the latest reading.
    pub fn latest_size(&self) -> Option<f64> {
        self.params.latest_size()
    }

    pub fn latest_pulse(&self) -> Option<f64> {
        self.params.latest_pulse()
    }

    fn scalars(&self) -> FrameScalars {
        let (min_radius, max_radius) = self.state.radius_bounds();
        let max_pulse = self
            .modulator
            .as_ref()
            .map_or(self.state.config().audio.max_pulse_strength, |m| {
                m.config().max_pulse_strength
            });
        FrameScalars {
            radius: self.state.radius(),
            min_radius,
            max_radius,
            pulse_strength: self.state.pulse_strength(),
            min_pulse: self.state.base_pulse_strength(),
            max_pulse,
        }
    }
}

impl FrameTask for BlobSession {
    fn update(&mut self, ctx: &FrameContext) -> BlobResult<()> {
        let modulation = match &mut self.modulator {
            Some(m) => m.analyze(ctx.elapsed)?,
            None => None,
        };
        self.last_modulation = modulation;
        self.state.update(modulation);
        Ok(())
    }

    fn render(&mut self, ctx: &FrameContext) -> BlobResult<()> {
        let frame = self.compositor.render_state(&self.state)?;

        if let Some(sink) = &mut self.sink {
            if !self.sink_open {
                let canvas = self.compositor.canvas();
                sink.begin(SinkConfig {
                    width: canvas.width,
                    height: canvas.height,
                })?;
                self.sink_open = true;
            }
            sink.push_frame(ctx.frame, &frame)?;
        }
        self.last_frame = Some(frame);

        let scalars = self.scalars();
        self.params
            .emit_frame(ctx.frame, &scalars, self.broadcaster.as_mut());
        Ok(())
    }
}

impl Drop for BlobSession {
    fn drop(&mut self) {
        self.detach_audio();
        if let Err(e) = self.finish() {
            tracing::warn!(error = %e, "frame sink did not close cleanly");
        }
    }
}

impl std::fmt::Debug for BlobSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobSession")
            .field("frame", &self.state.frame())
            .field("radius", &self.state.radius())
            .field("audio", &self.modulator.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/blob_session.rs"]
mod tests;

use std::path::{Path, PathBuf};

use crate::foundation::error::{BlobError, BlobResult};
use crate::render::composite::unpremultiply_in_place;
use crate::render::cpu::FrameRGBA;

/// Provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
}

/// Consumer of rendered frames. `push_frame` is called with strictly increasing indices.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> BlobResult<()>;
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> BlobResult<()>;
    fn end(&mut self) -> BlobResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in the order they were pushed.
    pub frames: Vec<(u64, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BlobResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> BlobResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> BlobResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Writes `<dir>/<prefix>_<idx:05>.png` per frame, converted to straight alpha.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    prefix: String,
    cfg: Option<SinkConfig>,
    written: u64,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "frame".to_owned(),
            cfg: None,
            written: 0,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn path_for(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("{}_{idx:05}.png", self.prefix))
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn begin(&mut self, cfg: SinkConfig) -> BlobResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            BlobError::resource(format!("create output dir '{}': {e}", self.dir.display()))
        })?;
        self.cfg = Some(cfg);
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> BlobResult<()> {
        if self.cfg.is_none() {
            return Err(BlobError::resource("png sink used before begin()"));
        }
        write_png(&self.path_for(idx), frame)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> BlobResult<()> {
        tracing::info!(frames = self.written, dir = %self.dir.display(), "png sequence written");
        Ok(())
    }
}

/// Saves one frame as PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> BlobResult<()> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_in_place(&mut data);
    }
    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| BlobError::resource(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/session/sink.rs"]
mod tests;

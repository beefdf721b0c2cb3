//! Moodblob is a procedural, audio-reactive "blob" animation engine.
//!
//! A blob is a closed contour sampled from a named base silhouette and deformed every frame by a
//! noise/distortion field. Frames are composited on the CPU from one or more gradient-filled
//! layers, optionally pulse in response to audio, and can stream derived scalars to a remote
//! listener.
//!
//! - Describe a blob with a [`BlobConfig`] (usually loaded from JSON)
//! - Create a [`BlobSession`] for a [`Canvas`]
//! - Drive it with a [`Scheduler`] over a [`RefreshSource`], collecting frames in a [`FrameSink`]
#![forbid(unsafe_code)]

mod foundation;

pub mod audio;
pub mod blob;
pub mod broadcast;
pub mod contour;
pub mod field;
pub mod palette;
pub mod render;
pub mod schedule;
pub mod session;
pub mod shape;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgba8Premul, Vec2};
pub use crate::foundation::error::{BlobError, BlobResult};
pub use crate::foundation::math::map_to_percent;

pub use crate::audio::modulator::{AudioConfig, AudioModulator, Modulation};
pub use crate::audio::tap::{AudioTap, PcmTap};
pub use crate::blob::config::BlobConfig;
pub use crate::blob::state::BlobState;
pub use crate::broadcast::channel::{Broadcaster, MemoryBroadcaster, NullBroadcaster};
pub use crate::broadcast::mapping::BroadcastConfig;
pub use crate::broadcast::ws::{WebSocketBroadcaster, WsOptions};
pub use crate::palette::color::Color;
pub use crate::palette::presets::ColorPalette;
pub use crate::render::cpu::{Compositor, FrameRGBA};
pub use crate::schedule::refresh::{FixedRate, ManualRefresh, RefreshSource, Unpaced};
pub use crate::schedule::scheduler::{FrameContext, FrameTask, Scheduler, SchedulerState};
pub use crate::session::blob_session::BlobSession;
pub use crate::session::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::shape::profile::ShapeProfile;

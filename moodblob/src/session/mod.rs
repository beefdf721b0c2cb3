//! Per-frame pipeline tying modulation, state, compositing, sinks and broadcast together.

/// [`blob_session::BlobSession`], the frame task driven by the scheduler.
pub mod blob_session;
/// Frame sinks (in-memory, PNG sequence).
pub mod sink;

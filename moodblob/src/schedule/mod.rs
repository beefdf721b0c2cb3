//! Frame loop driven by an explicit refresh source.

/// Timing sources: manual, fixed-rate and unpaced.
pub mod refresh;
/// The idle/running/stopped update-render loop.
pub mod scheduler;

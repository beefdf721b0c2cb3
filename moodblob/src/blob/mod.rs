//! Blob configuration surface and mutable animation state.

/// JSON configuration with defaults and validation.
pub mod config;
/// Per-instance animation state advanced once per frame.
pub mod state;

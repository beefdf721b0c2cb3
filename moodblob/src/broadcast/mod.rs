//! Best-effort emission of derived frame scalars to a remote listener.

/// The [`channel::Broadcaster`] interface plus null and in-memory implementations.
pub mod channel;
/// Scalar normalization and frame-gated emission.
pub mod mapping;
/// WebSocket transport with background reconnect.
pub mod ws;

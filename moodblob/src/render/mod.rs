//! CPU compositing of blob layers.
//!
//! Each layer outline is rasterized to a coverage mask with `vello_cpu`, filled with its radial
//! gradient, and summed into a shared buffer with additive blending. The sum is softened once and
//! added onto the background.

/// Separable gaussian edge softening.
pub mod blur;
/// Premultiplied RGBA8 pixel operations.
pub mod composite;
/// The [`cpu::Compositor`] and rendered frames.
pub mod cpu;
/// Radial gradients built from palettes.
pub mod gradient;

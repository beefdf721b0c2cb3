//! Colors, preset palettes and mood-driven palette selection.

/// Straight-alpha colors and hex parsing.
pub mod color;
/// Palette hints derived from track metadata.
pub mod mood;
/// Static preset table and [`presets::ColorPalette`].
pub mod presets;

//! Static color preset table and the palette type consumed by the compositor.

use crate::foundation::error::{BlobError, BlobResult};
use crate::palette::color::Color;

/// Key of the palette used whenever a requested preset is unknown.
pub const DEFAULT_PRESET: &str = "spotify";

/// Named presets, three stops each (deep, mid, light).
pub const COLOR_PRESETS: &[(&str, [&str; 3])] = &[
    ("spotify", ["#1DB954", "#1ED760", "#B3F2C9"]),
    ("red", ["#FF0000", "#FF2222", "#FF8888"]),
    ("orange", ["#FF6200", "#FF8C00", "#FFBB66"]),
    ("yellow", ["#FFB300", "#FFD700", "#FFF176"]),
    ("green", ["#2E7D32", "#4CAF50", "#A5D6A7"]),
    ("blue", ["#0D47A1", "#1E88E5", "#90CAF9"]),
    ("purple", ["#4A148C", "#9C27B0", "#CE93D8"]),
    ("white", ["#F5F5F5", "#FAFAFA", "#FFFFFF"]),
    ("gray", ["#424242", "#9E9E9E", "#EEEEEE"]),
    ("black", ["#000000", "#212121", "#757575"]),
    ("pink", ["#C2185B", "#FF4081", "#FF80AB"]),
    ("turquoise", ["#006064", "#00BCD4", "#80DEEA"]),
    ("gold", ["#B8860B", "#DAA520", "#FFD700"]),
    ("rainbow", ["#D50000", "#FF1744", "#FF616F"]),
];

/// Ordered color stops for one rendered layer. Never empty.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    pub fn new(colors: Vec<Color>) -> BlobResult<Self> {
        if colors.is_empty() {
            return Err(BlobError::config("palette must contain at least one color"));
        }
        Ok(Self { colors })
    }

    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> BlobResult<Self> {
        let colors = colors
            .iter()
            .map(|c| Color::from_hex(c.as_ref()))
            .collect::<BlobResult<Vec<_>>>()?;
        Self::new(colors)
    }

    /// Looks up a preset by key (case-insensitive). Unknown keys resolve to [`DEFAULT_PRESET`].
    pub fn preset(name: &str) -> Self {
        match lookup(name) {
            Some(p) => p,
            None => {
                tracing::debug!(preset = name, "unknown color preset, using default palette");
                Self::default_palette()
            }
        }
    }

    pub fn try_preset(name: &str) -> Option<Self> {
        lookup(name)
    }

    pub fn default_palette() -> Self {
        lookup(DEFAULT_PRESET).unwrap_or_else(|| Self {
            colors: vec![Color::rgba(1.0, 1.0, 1.0, 1.0)],
        })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The same stops, starting at `offset` and wrapping around.
    pub fn rotated(&self, offset: usize) -> Self {
        let mut colors = self.colors.clone();
        let n = colors.len();
        colors.rotate_left(offset % n);
        Self { colors }
    }

    pub fn random_preset(rng: &mut fastrand::Rng) -> (&'static str, Self) {
        let (name, _) = COLOR_PRESETS[rng.usize(..COLOR_PRESETS.len())];
        (name, Self::preset(name))
    }
}

fn lookup(name: &str) -> Option<ColorPalette> {
    let key = name.trim().to_ascii_lowercase();
    let (_, hexes) = COLOR_PRESETS.iter().find(|(k, _)| *k == key)?;
    // Table entries are compile-time literals; a parse failure here would be a table typo.
    ColorPalette::from_hex(hexes).ok()
}

#[cfg(test)]
#[path = "../../tests/unit/palette/presets.rs"]
mod tests;

use crate::foundation::core::{Point, Rgba8Premul};
use crate::foundation::error::{BlobError, BlobResult};
use crate::foundation::math::lerp;
use crate::palette::color::Color;
use crate::palette::presets::ColorPalette;

/// Gradient reach relative to the blob's base radius.
pub const GRADIENT_EXTENT: f64 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the radius, in `[0, 1]`.
    pub offset: f64,
    pub color: Color,
}

/// Radial gradient from a layer center out to `GRADIENT_EXTENT * radius`.
///
/// Palette colors are spread evenly from the center; the last stop sits on the rim and is always
/// fully transparent, so a single-color palette still yields two stops.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    center: Point,
    radius: f64,
    stops: Vec<GradientStop>,
}

impl RadialGradient {
    pub fn from_palette(
        center: Point,
        base_radius: f64,
        palette: &ColorPalette,
        opacity: f64,
    ) -> BlobResult<Self> {
        if !base_radius.is_finite() || base_radius <= 0.0 {
            return Err(BlobError::render(format!(
                "gradient radius must be > 0, got {base_radius}"
            )));
        }
        let opacity = opacity.clamp(0.0, 1.0);
        let colors = palette.colors();
        let n = colors.len() as f64;

        let mut stops: Vec<GradientStop> = colors
            .iter()
            .enumerate()
            .map(|(i, c)| GradientStop {
                offset: i as f64 / n,
                color: c.with_alpha(c.a * opacity),
            })
            .collect();
        let rim = colors.last().copied().unwrap_or(Color::TRANSPARENT);
        stops.push(GradientStop {
            offset: 1.0,
            color: rim.with_alpha(0.0),
        });

        Ok(Self {
            center,
            radius: base_radius * GRADIENT_EXTENT,
            stops,
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    /// Outer radius where the gradient reaches zero alpha.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Premultiplied color at `p`, interpolated in premultiplied space. Past the rim: transparent.
    pub fn sample(&self, p: Point) -> Rgba8Premul {
        let t = p.distance(self.center) / self.radius;
        if t >= 1.0 {
            return Rgba8Premul::transparent();
        }

        let upper = self
            .stops
            .iter()
            .position(|s| s.offset > t)
            .unwrap_or(self.stops.len() - 1);
        if upper == 0 {
            return self.stops[0].color.to_rgba8_premul();
        }
        let (a, b) = (&self.stops[upper - 1], &self.stops[upper]);
        let span = b.offset - a.offset;
        let f = if span > 0.0 { (t - a.offset) / span } else { 1.0 };

        let pa = premul(a.color);
        let pb = premul(b.color);
        let mix = |i: usize| (lerp(pa[i], pb[i], f).clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8Premul {
            r: mix(0),
            g: mix(1),
            b: mix(2),
            a: mix(3),
        }
    }
}

fn premul(c: Color) -> [f64; 4] {
    let a = c.a.clamp(0.0, 1.0);
    [c.r * a, c.g * a, c.b * a, a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/gradient.rs"]
mod tests;

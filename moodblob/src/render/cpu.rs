use crate::blob::state::BlobState;
use crate::foundation::core::{BezPath, Canvas, Point};
use crate::foundation::error::{BlobError, BlobResult};
use crate::palette::color::Color;
use crate::palette::presets::ColorPalette;
use crate::render::blur::gaussian_blur_premul;
use crate::render::composite::{PremulRgba8, fill, lighter, lighter_in_place, scale};
use crate::render::gradient::RadialGradient;

/// Edge blur standard deviation per unit of edge softness.
pub const SOFTNESS_TO_SIGMA: f64 = 0.2;

/// One rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// What the compositor needs to paint one layer.
#[derive(Clone, Copy, Debug)]
pub struct LayerPaint<'a> {
    pub path: &'a BezPath,
    pub center: Point,
    pub radius: f64,
    pub palette: &'a ColorPalette,
    pub opacity: f64,
}

/// CPU compositor: rasterizes each layer outline, fills it with its radial gradient, sums layers
/// with additive blending, softens the result once, and adds it onto the background.
#[derive(Clone)]
pub struct Compositor {
    canvas: Canvas,
    width: u16,
    height: u16,
    background: PremulRgba8,
    mask: vello_cpu::Pixmap,
    layers: Vec<u8>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("canvas", &self.canvas)
            .field("background", &self.background)
            .finish()
    }
}

impl Compositor {
    pub fn new(canvas: Canvas) -> BlobResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| BlobError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| BlobError::render("canvas height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            background: [0, 0, 0, 0],
            mask: vello_cpu::Pixmap::new(width, height),
            layers: vec![0; canvas.byte_len()],
        })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color.to_rgba8_premul().to_array();
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Paints every layer of `state` for its current frame. The outline follows the pulsed radius;
    /// the gradient stays anchored to the base radius.
    pub fn render_state(&mut self, state: &BlobState) -> BlobResult<FrameRGBA> {
        let contours = state.contours()?;
        let paints: Vec<LayerPaint<'_>> = contours
            .iter()
            .zip(state.layers())
            .map(|(c, l)| LayerPaint {
                path: &c.path,
                center: c.center,
                radius: state.base_radius(),
                palette: &l.palette,
                opacity: state.layer_opacity(),
            })
            .collect();
        self.render(&paints, state.edge_softness())
    }

    pub fn render(&mut self, layers: &[LayerPaint<'_>], edge_softness: f64) -> BlobResult<FrameRGBA> {
        self.layers.fill(0);
        for layer in layers {
            self.paint_layer(layer)?;
        }

        let sigma = edge_softness.max(0.0) * SOFTNESS_TO_SIGMA;
        let soft = gaussian_blur_premul(&self.layers, self.canvas, sigma)?;

        let mut data = vec![0u8; self.canvas.byte_len()];
        fill(&mut data, self.background);
        lighter_in_place(&mut data, &soft)?;

        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }

    fn paint_layer(&mut self, layer: &LayerPaint<'_>) -> BlobResult<()> {
        let gradient =
            RadialGradient::from_palette(layer.center, layer.radius, layer.palette, layer.opacity)?;

        self.mask.data_as_u8_slice_mut().fill(0);
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        ctx.fill_path(&bezpath_to_cpu(layer.path));
        ctx.flush();
        ctx.render_to_pixmap(&mut self.mask);

        let w = self.canvas.width as usize;
        let coverage = self.mask.data_as_u8_slice();
        for (i, (dst, cov)) in self
            .layers
            .chunks_exact_mut(4)
            .zip(coverage.chunks_exact(4))
            .enumerate()
        {
            let a = cov[3];
            if a == 0 {
                continue;
            }
            let p = Point::new((i % w) as f64 + 0.5, (i / w) as f64 + 0.5);
            let src = scale(gradient.sample(p).to_array(), a);
            let out = lighter([dst[0], dst[1], dst[2], dst[3]], src);
            dst.copy_from_slice(&out);
        }
        Ok(())
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let pt = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

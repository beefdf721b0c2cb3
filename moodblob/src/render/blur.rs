use crate::foundation::core::Canvas;
use crate::foundation::error::{BlobError, BlobResult};

/// Kernel half-width in standard deviations.
const KERNEL_SPAN_SIGMAS: f64 = 3.0;
/// Below this the kernel collapses to a single tap.
const MIN_SIGMA: f64 = 0.25;

/// Separable gaussian blur over a premultiplied RGBA8 buffer. Edges clamp.
pub fn gaussian_blur_premul(src: &[u8], canvas: Canvas, sigma: f64) -> BlobResult<Vec<u8>> {
    if src.len() != canvas.byte_len() {
        return Err(BlobError::render(format!(
            "blur expects {} bytes for {}x{}, got {}",
            canvas.byte_len(),
            canvas.width,
            canvas.height,
            src.len()
        )));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(BlobError::render(format!("blur sigma must be >= 0, got {sigma}")));
    }
    if sigma < MIN_SIGMA {
        return Ok(src.to_vec());
    }

    let max_extent = canvas.width.max(canvas.height) as usize;
    let radius = ((sigma * KERNEL_SPAN_SIGMAS).ceil() as usize).min(max_extent);
    let kernel = kernel_q16(radius, sigma);

    let (w, h) = (canvas.width as usize, canvas.height as usize);
    let mut tmp = vec![0u8; src.len()];
    let mut out = vec![0u8; src.len()];
    // Rows: step 1 pixel along a line of `w`; columns: step `w` pixels along a line of `h`.
    convolve(src, &mut tmp, &kernel, Axis { lines: h, len: w, line_stride: w, step: 1 });
    convolve(&tmp, &mut out, &kernel, Axis { lines: w, len: h, line_stride: 1, step: w });
    Ok(out)
}

/// Normalized weights in 16.16 fixed point, summing to exactly `1 << 16`.
fn kernel_q16(radius: usize, sigma: f64) -> Vec<u32> {
    let denom = 2.0 * sigma * sigma;
    let r = radius as i64;
    let raw: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();

    let mut weights: Vec<u32> = raw
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + (65536 - total)).clamp(0, 65536) as u32;
    weights
}

#[derive(Clone, Copy)]
struct Axis {
    lines: usize,
    len: usize,
    line_stride: usize,
    step: usize,
}

fn convolve(src: &[u8], dst: &mut [u8], kernel: &[u32], axis: Axis) {
    let radius = (kernel.len() / 2) as isize;
    let last = axis.len as isize - 1;
    for line in 0..axis.lines {
        let base = line * axis.line_stride;
        for i in 0..axis.len {
            let mut acc = [0u64; 4];
            for (k, &kw) in kernel.iter().enumerate() {
                let j = (i as isize + k as isize - radius).clamp(0, last) as usize;
                let px = (base + j * axis.step) * 4;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[px + c]);
                }
            }
            let px = (base + i * axis.step) * 4;
            for (c, a) in acc.iter().enumerate() {
                dst[px + c] = ((a + 32768) >> 16).min(255) as u8;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;

use crate::foundation::error::{BlobError, BlobResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// "Lighter" blend: channel-wise saturating sum, so overlaps brighten instead of occluding.
pub fn lighter(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    [
        dst[0].saturating_add(src[0]),
        dst[1].saturating_add(src[1]),
        dst[2].saturating_add(src[2]),
        dst[3].saturating_add(src[3]),
    ]
}

/// Scales every channel by `coverage / 255`.
pub fn scale(px: PremulRgba8, coverage: u8) -> PremulRgba8 {
    if coverage == 255 {
        return px;
    }
    let c = u16::from(coverage);
    px.map(|v| mul_div255_u8(u16::from(v), c))
}

pub fn lighter_in_place(dst: &mut [u8], src: &[u8]) -> BlobResult<()> {
    check_pair(dst, src, "lighter_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = lighter([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn fill(dst: &mut [u8], px: PremulRgba8) {
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

/// Converts premultiplied pixels to straight alpha, e.g. for PNG export.
pub fn unpremultiply_in_place(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn check_pair(dst: &[u8], src: &[u8], op: &str) -> BlobResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BlobError::render(format!(
            "{op} expects equal-length rgba8 buffers ({} vs {})",
            dst.len(),
            src.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;

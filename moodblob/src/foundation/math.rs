pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Linearly maps `value` from `[lo, hi]` onto `[0, 100]`, clamping at both ends.
///
/// A degenerate input range maps everything to 0.
pub fn map_to_percent(value: f64, lo: f64, hi: f64) -> f64 {
    if !value.is_finite() || !(hi - lo).is_finite() || hi <= lo {
        return 0.0;
    }
    ((value - lo) / (hi - lo) * 100.0).clamp(0.0, 100.0)
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

//! Byte and fixed-point arithmetic shared by the kernels.

/// One in 16.16 fixed point.
pub(crate) const FIXED_ONE: i32 = 0x1_0000;
/// One half in 16.16 fixed point.
pub(crate) const FIXED_HALF: i32 = 0x8000;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Scale every byte lane of a packed `0xAARRGGBB` value by `a / 256`.
///
/// This is the cheap lane multiply used for coverage; the blend kernels use
/// [`mul_div255_u16`] instead.
#[inline]
pub(crate) fn byte_mul(x: u32, a: u32) -> u32 {
    let mut t = (x & 0x00FF_00FF) * a;
    t = (t >> 8) & 0x00FF_00FF;
    let mut u = ((x >> 8) & 0x00FF_00FF) * a;
    u &= 0xFF00_FF00;
    t | u
}

/// Combine a per-row opacity with the painter opacity.
#[inline]
pub(crate) fn opacity_mul(row: u8, painter: u8) -> u8 {
    match row {
        0xFF => painter,
        0 => 0,
        _ => ((u32::from(painter) * (u32::from(row) + 1)) >> 8) as u8,
    }
}

/// Convert a floating opacity in `[0, 1]` to a byte.
///
/// Exact endpoints map exactly; everything between truncates.
pub fn opacity_to_u8(v: f32) -> u8 {
    if v >= 1.0 {
        0xFF
    } else if v <= 0.0 || v.is_nan() {
        0
    } else {
        (255.0 * v) as u8
    }
}

#[inline]
pub(crate) fn to_fixed(v: f64) -> i32 {
    let scaled = (v * f64::from(FIXED_ONE)).round();
    scaled.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

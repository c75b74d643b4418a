//! Format conversion kernels (no blending).

use super::format::{load16, load32, store16, store32};
use crate::foundation::math::mul_div255_u16;

/// Expand 5-6-5 to opaque `0xFFRRGGBB`, replicating high bits into the low ones.
#[inline]
pub const fn rgb16_to_rgb32(c: u16) -> u32 {
    let c = c as u32;
    let r = ((c << 8) & 0xF8_0000) | ((c << 3) & 0x07_0000);
    let g = ((c << 5) & 0x00_FC00) | ((c >> 1) & 0x00_0300);
    let b = ((c << 3) & 0x00_00F8) | ((c >> 2) & 0x00_0007);
    0xFF00_0000 | r | g | b
}

/// Truncate `0x..RRGGBB` to 5-6-5.
#[inline]
pub const fn rgb32_to_rgb16(c: u32) -> u16 {
    (((c >> 8) & 0xF800) | ((c >> 5) & 0x07E0) | ((c >> 3) & 0x001F)) as u16
}

/// Premultiply a straight `0xAARRGGBB` value with round-to-nearest.
#[inline]
pub fn premultiply(c: u32) -> u32 {
    let a = c >> 24;
    match a {
        0xFF => c,
        0 => 0,
        _ => {
            let m = |shift: u32| {
                u32::from(mul_div255_u16(((c >> shift) & 0xFF) as u16, a as u16))
            };
            a << 24 | m(16) << 16 | m(8) << 8 | m(0)
        }
    }
}

pub fn color_rgb16_rgb32(src: &[u8], out: &mut [u8], width: usize) {
    for i in 0..width {
        store32(out, i, rgb16_to_rgb32(load16(src, i)));
    }
}

pub fn color_rgb32_rgb16(src: &[u8], out: &mut [u8], width: usize) {
    for i in 0..width {
        store16(out, i, rgb32_to_rgb16(load32(src, i)));
    }
}

/// RGB32 with undefined alpha to premultiplied ARGB32 (alpha forced to `0xFF`).
pub fn color_rgb32_argb32p(src: &[u8], out: &mut [u8], width: usize) {
    for i in 0..width {
        store32(out, i, load32(src, i) | 0xFF00_0000);
    }
}

pub fn premultiply_argb32(src: &[u8], out: &mut [u8], width: usize) {
    for i in 0..width {
        store32(out, i, premultiply(load32(src, i)));
    }
}

/// RGB16 plus a separate alpha byte per pixel into premultiplied ARGB32.
pub fn color_rgba16_argb32p(src: &[u8], alpha: &[u8], out: &mut [u8], width: usize) {
    for i in 0..width {
        let rgb = rgb16_to_rgb32(load16(src, i)) & 0x00FF_FFFF;
        let straight = rgb | u32::from(alpha[i]) << 24;
        store32(out, i, premultiply(straight));
    }
}

/// Premultiplied ARGB32 words to `[r, g, b, a]` byte quadruples.
pub fn color_argb32p_rgba8(src: &[u8], out: &mut [u8], width: usize) {
    for i in 0..width {
        let p = load32(src, i);
        out[i * 4..i * 4 + 4].copy_from_slice(&[
            (p >> 16) as u8,
            (p >> 8) as u8,
            p as u8,
            (p >> 24) as u8,
        ]);
    }
}

/// `[r, g, b, a]` byte quadruples to ARGB32 words.
pub fn color_rgba8_argb32p(src: &[u8], out: &mut [u8], width: usize) {
    for i in 0..width {
        let px = &src[i * 4..i * 4 + 4];
        let v = u32::from(px[3]) << 24
            | u32::from(px[0]) << 16
            | u32::from(px[1]) << 8
            | u32::from(px[2]);
        store32(out, i, v);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/convert.rs"]
mod tests;

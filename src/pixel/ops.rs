//! Scanline blend kernels.
//!
//! All spans are raw pixel bytes in the formats named by the function. Widths are in pixels and
//! are not validated: callers clip first. In-place and copy variants are separate entry points;
//! the copy variants read `dest` and write the blended result to `out`.

use super::convert::{rgb16_to_rgb32, rgb32_to_rgb16};
use super::format::{load16, load32, store16, store32};
use crate::foundation::math::mul_div255_u16;

#[inline]
fn channel(v: u32, shift: u32) -> u16 {
    ((v >> shift) & 0xFF) as u16
}

#[inline]
fn lerp_channel(src: u16, dst: u16, opacity: u16, inv: u16) -> u32 {
    let v = mul_div255_u16(src, opacity) + mul_div255_u16(dst, inv);
    u32::from(v.min(255))
}

/// Premultiplied source-over into an opaque RGB32 pixel.
///
/// `opacity` scales the source (including its alpha) before compositing. The result alpha is
/// always `0xFF`, except that a zero effective opacity returns `dst` untouched.
#[inline]
pub fn over_argb32p_rgb32(dst: u32, src: u32, opacity: u8) -> u32 {
    let sa = src >> 24;
    if opacity == 0 {
        return dst;
    }
    if opacity == 0xFF {
        if sa == 0xFF {
            return src;
        }
        if src == 0 {
            return dst;
        }
    }
    let op = u16::from(opacity);
    let inv = 255 - mul_div255_u16(sa as u16, op);
    let r = lerp_channel(channel(src, 16), channel(dst, 16), op, inv);
    let g = lerp_channel(channel(src, 8), channel(dst, 8), op, inv);
    let b = lerp_channel(channel(src, 0), channel(dst, 0), op, inv);
    0xFF00_0000 | r << 16 | g << 8 | b
}

/// Premultiplied source-over into a 5-6-5 pixel, computed at 8 bits per channel.
#[inline]
pub fn over_argb32p_rgb16(dst: u16, src: u32, opacity: u8) -> u16 {
    if opacity == 0 {
        return dst;
    }
    if opacity == 0xFF {
        if src >> 24 == 0xFF {
            return rgb32_to_rgb16(src);
        }
        if src == 0 {
            return dst;
        }
    }
    rgb32_to_rgb16(over_argb32p_rgb32(rgb16_to_rgb32(dst), src, opacity))
}

/// Premultiplied source-over keeping a destination alpha channel.
#[inline]
pub fn over_argb32p_argb32p(dst: u32, src: u32, opacity: u8) -> u32 {
    if opacity == 0 {
        return dst;
    }
    let sa = src >> 24;
    if opacity == 0xFF {
        if sa == 0xFF {
            return src;
        }
        if src == 0 {
            return dst;
        }
    }
    let op = u16::from(opacity);
    let inv = 255 - mul_div255_u16(sa as u16, op);
    let a = lerp_channel(sa as u16, channel(dst, 24), op, inv);
    let r = lerp_channel(channel(src, 16), channel(dst, 16), op, inv);
    let g = lerp_channel(channel(src, 8), channel(dst, 8), op, inv);
    let b = lerp_channel(channel(src, 0), channel(dst, 0), op, inv);
    a << 24 | r << 16 | g << 8 | b
}

pub fn blend_argb32p_rgb32(dest: &mut [u8], src: &[u8], opacity: u8, width: usize) {
    if opacity == 0 {
        return;
    }
    for i in 0..width {
        let d = load32(dest, i);
        store32(dest, i, over_argb32p_rgb32(d, load32(src, i), opacity));
    }
}

pub fn blend_argb32p_rgb32_out(
    dest: &[u8],
    src: &[u8],
    opacity: u8,
    width: usize,
    out: &mut [u8],
) {
    for i in 0..width {
        store32(
            out,
            i,
            over_argb32p_rgb32(load32(dest, i), load32(src, i), opacity),
        );
    }
}

pub fn blend_argb32p_rgb16(dest: &mut [u8], src: &[u8], opacity: u8, width: usize) {
    if opacity == 0 {
        return;
    }
    for i in 0..width {
        let d = load16(dest, i);
        store16(dest, i, over_argb32p_rgb16(d, load32(src, i), opacity));
    }
}

pub fn blend_argb32p_rgb16_out(
    dest: &[u8],
    src: &[u8],
    opacity: u8,
    width: usize,
    out: &mut [u8],
) {
    for i in 0..width {
        store16(
            out,
            i,
            over_argb32p_rgb16(load16(dest, i), load32(src, i), opacity),
        );
    }
}

pub fn blend_argb32p_argb32p(dest: &mut [u8], src: &[u8], opacity: u8, width: usize) {
    if opacity == 0 {
        return;
    }
    for i in 0..width {
        let d = load32(dest, i);
        store32(dest, i, over_argb32p_argb32p(d, load32(src, i), opacity));
    }
}

pub fn blend_argb32p_argb32p_out(
    dest: &[u8],
    src: &[u8],
    opacity: u8,
    width: usize,
    out: &mut [u8],
) {
    for i in 0..width {
        store32(
            out,
            i,
            over_argb32p_argb32p(load32(dest, i), load32(src, i), opacity),
        );
    }
}

/// Blend an RGB16 source carrying a separate alpha byte per pixel. In place only.
///
/// The effective alpha of pixel `i` is `alpha[i] * opacity / 255`.
pub fn blend_rgba16_rgb16(
    dest: &mut [u8],
    src: &[u8],
    alpha: &[u8],
    opacity: u8,
    width: usize,
) {
    if opacity == 0 {
        return;
    }
    for i in 0..width {
        let a = mul_div255_u16(u16::from(alpha[i]), u16::from(opacity)) as u8;
        if a == 0 {
            continue;
        }
        let s = load16(src, i);
        if a == 0xFF {
            store16(dest, i, s);
            continue;
        }
        let d = load16(dest, i);
        let opaque = rgb16_to_rgb32(s);
        store16(dest, i, over_argb32p_rgb16(d, opaque, a));
    }
}

/// Blend one premultiplied colour over an RGB32 span.
pub fn blend_color_rgb32(dest: &mut [u8], color: u32, width: usize) {
    match color >> 24 {
        0 => {}
        0xFF => super::fill::memset_32(dest, color, width),
        _ => {
            for i in 0..width {
                let d = load32(dest, i);
                store32(dest, i, over_argb32p_rgb32(d, color, 0xFF));
            }
        }
    }
}

pub fn blend_color_rgb32_out(dest: &[u8], color: u32, width: usize, out: &mut [u8]) {
    for i in 0..width {
        store32(out, i, over_argb32p_rgb32(load32(dest, i), color, 0xFF));
    }
}

/// Blend one premultiplied colour over an RGB16 span.
pub fn blend_color_rgb16(dest: &mut [u8], color: u32, width: usize) {
    match color >> 24 {
        0 => {}
        0xFF => super::fill::memset_16(dest, rgb32_to_rgb16(color), width),
        _ => {
            for i in 0..width {
                let d = load16(dest, i);
                store16(dest, i, over_argb32p_rgb16(d, color, 0xFF));
            }
        }
    }
}

pub fn blend_color_rgb16_out(dest: &[u8], color: u32, width: usize, out: &mut [u8]) {
    for i in 0..width {
        store16(out, i, over_argb32p_rgb16(load16(dest, i), color, 0xFF));
    }
}

/// Blend one premultiplied colour over a premultiplied ARGB32 span.
pub fn blend_color_argb32p(dest: &mut [u8], color: u32, width: usize) {
    match color >> 24 {
        0 => {}
        0xFF => super::fill::memset_32(dest, color, width),
        _ => {
            for i in 0..width {
                let d = load32(dest, i);
                store32(dest, i, over_argb32p_argb32p(d, color, 0xFF));
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/ops.rs"]
mod tests;

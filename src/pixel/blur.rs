//! In-place exponential blur.
//!
//! Each row is filtered forwards then backwards with a one-pole IIR; columns follow. The
//! accumulator keeps 7 fractional bits and the smoothing factor is Q16.

use super::PixelFormat;
use super::convert::{rgb16_to_rgb32, rgb32_to_rgb16};
use super::format::{load16, load32, store16, store32};
use crate::image::ImageMut;

const ACC_BITS: u32 = 7;

/// Q16 smoothing factor for a blur radius in pixels.
pub fn blur_alpha(radius: u32) -> i32 {
    if radius == 0 {
        return 0;
    }
    let a = 1.0 - (-2.3 / (f64::from(radius) + 1.0)).exp();
    (a * 65536.0).round() as i32
}

fn read(data: &[u8], off: usize, format: PixelFormat) -> [i32; 4] {
    let v = match format {
        PixelFormat::Rgb16 => rgb16_to_rgb32(load16(&data[off..], 0)),
        _ => load32(&data[off..], 0),
    };
    [
        ((v >> 24) & 0xFF) as i32,
        ((v >> 16) & 0xFF) as i32,
        ((v >> 8) & 0xFF) as i32,
        (v & 0xFF) as i32,
    ]
}

fn write(data: &mut [u8], off: usize, format: PixelFormat, c: [i32; 4]) {
    let v = (c[0].clamp(0, 255) as u32) << 24
        | (c[1].clamp(0, 255) as u32) << 16
        | (c[2].clamp(0, 255) as u32) << 8
        | c[3].clamp(0, 255) as u32;
    match format {
        PixelFormat::Rgb16 => store16(&mut data[off..], 0, rgb32_to_rgb16(v)),
        PixelFormat::Rgb32 => store32(&mut data[off..], 0, v | 0xFF00_0000),
        _ => store32(&mut data[off..], 0, v),
    }
}

#[inline]
fn step_acc(acc: &mut [i32; 4], px: [i32; 4], alpha: i32) {
    for (a, p) in acc.iter_mut().zip(px) {
        let target = p << ACC_BITS;
        *a += (((target - *a) as i64 * i64::from(alpha)) >> 16) as i32;
    }
}

fn blur_line(
    data: &mut [u8],
    base: usize,
    step: usize,
    len: usize,
    format: PixelFormat,
    alpha: i32,
) {
    if len == 0 {
        return;
    }
    let mut acc = read(data, base, format).map(|c| c << ACC_BITS);
    for k in 0..len {
        let off = base + k * step;
        step_acc(&mut acc, read(data, off, format), alpha);
        write(data, off, format, acc.map(|c| c >> ACC_BITS));
    }
    for k in (0..len).rev() {
        let off = base + k * step;
        step_acc(&mut acc, read(data, off, format), alpha);
        write(data, off, format, acc.map(|c| c >> ACC_BITS));
    }
}

/// Blur `width x height` pixels starting at `data[0]`, rows `stride` bytes apart.
///
/// Straight ARGB is blurred channel-wise like the other 32-bit formats.
pub fn blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    format: PixelFormat,
    alpha: i32,
) {
    if alpha <= 0 || width == 0 || height == 0 {
        return;
    }
    let bpp = format.bytes_per_pixel();
    for y in 0..height {
        blur_line(data, y * stride, bpp, width, format, alpha);
    }
    for x in 0..width {
        blur_line(data, x * bpp, stride, height, format, alpha);
    }
}

/// Blur a whole view with the smoothing factor for `radius` pixels.
pub fn blur_radius(image: &mut ImageMut<'_>, radius: u32) {
    let (width, height, stride, format) = (
        image.width() as usize,
        image.height() as usize,
        image.stride(),
        image.format(),
    );
    blur(image.bits_mut(), width, height, stride, format, blur_alpha(radius));
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/blur.rs"]
mod tests;

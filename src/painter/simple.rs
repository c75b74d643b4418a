//! Unscaled row compositing for the raster path.

use crate::foundation::core::{IntPoint, IntRect};
use crate::foundation::math::opacity_mul;
use crate::image::{ImageMut, ImageRef};
use crate::pixel::PixelFormat;
use crate::pixel::format::{load16, store16};
use crate::routines::{BlendFn, Hazard, RoutineTable};

// Opaque sources blended with opacity are widened to ARGB32p this many pixels at a time.
const CHUNK: usize = 512;

pub(crate) type RowOpacity<'f> = Option<&'f dyn Fn(i32) -> u8>;

/// Effective opacity of destination row `y`.
#[inline]
pub(crate) fn row_alpha(opacity: u8, rows: RowOpacity<'_>, y: i32) -> u8 {
    match rows {
        Some(f) => opacity_mul(f(y), opacity),
        None => opacity,
    }
}

fn premultiplied_blend(routines: &RoutineTable, dst: PixelFormat) -> Option<BlendFn> {
    match dst {
        PixelFormat::Rgb16 => Some(routines.blend_argb32p_rgb16),
        PixelFormat::Rgb32 => Some(routines.blend_argb32p_rgb32),
        PixelFormat::Argb32Premultiplied => Some(routines.blend_argb32p_argb32p),
        PixelFormat::Argb32 => None,
    }
}

/// Whether [`blend_span`] handles `src` onto `dst`.
pub(crate) fn supports(dst: PixelFormat, src: PixelFormat) -> bool {
    dst.raster_index().is_some() && src.raster_index().is_some()
}

/// Slow combination drawn with a translucent opacity, if any.
pub(crate) fn hazard_for(dst: PixelFormat, src: PixelFormat) -> Option<Hazard> {
    match (src, dst) {
        (PixelFormat::Rgb16, PixelFormat::Rgb32) => Some(Hazard::BlendRgb16OverRgb32WithOpacity),
        (PixelFormat::Rgb16, PixelFormat::Rgb16) => Some(Hazard::BlendRgb16OverRgb16WithOpacity),
        _ => None,
    }
}

/// Composite `count` pixels of `src` onto `dst`.
///
/// `scratch` is grown on demand and holds the widened source of the opacity path. Returns
/// `false` without writing when the pair is unsupported.
#[allow(clippy::too_many_arguments)]
pub(crate) fn blend_span(
    routines: &RoutineTable,
    dst_format: PixelFormat,
    dst: &mut [u8],
    src_format: PixelFormat,
    src: &[u8],
    count: usize,
    opacity: u8,
    scratch: &mut Vec<u8>,
) -> bool {
    use PixelFormat::*;
    let Some(blend) = premultiplied_blend(routines, dst_format) else {
        return false;
    };
    if src_format == Argb32 {
        return false;
    }
    if opacity == 0 || count == 0 {
        return true;
    }
    if src_format == dst_format && src_format != Argb32Premultiplied && opacity == 0xFF {
        (routines.memcpy)(dst, src, count * src_format.bytes_per_pixel());
        return true;
    }
    if src_format == Argb32Premultiplied {
        blend(dst, src, opacity, count);
        return true;
    }
    if opacity == 0xFF
        && let Some(convert) = routines.converter(src_format, dst_format)
    {
        convert(src, dst, count);
        return true;
    }
    let Some(widen) = routines.converter(src_format, Argb32Premultiplied) else {
        return false;
    };
    if scratch.len() < CHUNK * 4 {
        scratch.resize(CHUNK * 4, 0);
    }
    let (sb, db) = (src_format.bytes_per_pixel(), dst_format.bytes_per_pixel());
    let mut done = 0;
    while done < count {
        let n = (count - done).min(CHUNK);
        widen(&src[done * sb..], scratch, n);
        blend(&mut dst[done * db..], scratch, opacity, n);
        done += n;
    }
    true
}

/// Composite `src`, placed with its top-left at `at`, into the part of `dst` covered by `rect`.
///
/// `rect` is in destination coordinates and already clipped to both images. `flipped` reads
/// source rows bottom-up.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_rows(
    routines: &RoutineTable,
    dst: &mut ImageMut<'_>,
    rect: IntRect,
    src: &ImageRef<'_>,
    at: IntPoint,
    flipped: bool,
    opacity: u8,
    rows: RowOpacity<'_>,
    scratch: &mut Vec<u8>,
) {
    let dst_format = dst.format();
    let sx = rect.x - at.x;
    let count = rect.width as usize;
    for dy in rect.y..rect.y + rect.height {
        let alpha = row_alpha(opacity, rows, dy);
        if alpha == 0 {
            continue;
        }
        let ly = dy - at.y;
        let sy = if flipped { src.height() - 1 - ly } else { ly };
        let s = src.row_from(sx, sy);
        let d = dst.row_from_mut(rect.x, dy);
        blend_span(
            routines,
            dst_format,
            d,
            src.format(),
            s,
            count,
            alpha,
            scratch,
        );
    }
}

// Weighted mix of two 5-6-5 pixels at 32 levels; `wl + wr == 32`.
#[inline]
fn mix565(left: u16, right: u16, wl: u32, wr: u32) -> u16 {
    const MASK: u32 = 0x07E0_F81F;
    let spread = |p: u16| (u32::from(p) | u32::from(p) << 16) & MASK;
    let v = ((spread(left) * wl + spread(right) * wr) >> 5) & MASK;
    (v | v >> 16) as u16
}

/// RGB16 onto RGB16 shifted right by a fraction of a pixel.
///
/// The image is placed at integer column `ix`; destination column `ix + k` mixes source pixels
/// `k - 1` and `k`, weighting the left one by `mul_inv / 32`. Missing neighbours past either
/// image edge read the existing destination pixel, so the footprint is one column wider than
/// the image. `rect` is that footprint clipped to the destination.
pub(crate) fn draw_rgb16_subpixel(
    dst: &mut ImageMut<'_>,
    rect: IntRect,
    src: &ImageRef<'_>,
    at: IntPoint,
    mul_inv: u32,
) {
    let mul = 32 - mul_inv;
    let w = src.width();
    for dy in rect.y..rect.y + rect.height {
        let s = src.row(dy - at.y);
        let d = dst.row_from_mut(rect.x, dy);
        for (i, c) in (rect.x..rect.x + rect.width).enumerate() {
            let k = c - at.x;
            let here = load16(d, i);
            let left = if k == 0 {
                here
            } else {
                load16(s, (k - 1) as usize)
            };
            let right = if k == w { here } else { load16(s, k as usize) };
            store16(d, i, mix565(left, right, mul_inv, mul));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/painter/simple.rs"]
mod tests;

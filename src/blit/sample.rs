//! Per-format pixel access for the blitter loops.
//!
//! Sources load as premultiplied `0xAARRGGBB`; destinations composite whole spans through the
//! routine table, so a blit and an unscaled draw run the same kernels and agree bit for bit.

use crate::pixel::convert::{rgb16_to_rgb32, rgb32_to_rgb16};
use crate::pixel::format::{load16, load32};
use crate::routines::RoutineTable;

pub(crate) trait SrcPixel {
    fn load(row: &[u8], i: usize) -> u32;
}

pub(crate) trait DstPixel {
    /// Blend `count` premultiplied pixels from `src` starting at pixel `at`.
    fn blend_row(
        routines: &RoutineTable,
        row: &mut [u8],
        at: usize,
        src: &[u8],
        opacity: u8,
        count: usize,
    );

    /// Cover `count` pixels starting at `at` with a premultiplied colour.
    fn fill_span(routines: &RoutineTable, row: &mut [u8], at: usize, color: u32, count: usize);
}

pub(crate) struct Rgb16Px;
pub(crate) struct Rgb32Px;
pub(crate) struct Argb32pPx;

impl SrcPixel for Rgb16Px {
    #[inline]
    fn load(row: &[u8], i: usize) -> u32 {
        rgb16_to_rgb32(load16(row, i))
    }
}

impl SrcPixel for Rgb32Px {
    #[inline]
    fn load(row: &[u8], i: usize) -> u32 {
        load32(row, i) | 0xFF00_0000
    }
}

impl SrcPixel for Argb32pPx {
    #[inline]
    fn load(row: &[u8], i: usize) -> u32 {
        load32(row, i)
    }
}

impl DstPixel for Rgb16Px {
    fn blend_row(
        routines: &RoutineTable,
        row: &mut [u8],
        at: usize,
        src: &[u8],
        opacity: u8,
        count: usize,
    ) {
        (routines.blend_argb32p_rgb16)(&mut row[at * 2..], src, opacity, count);
    }

    fn fill_span(routines: &RoutineTable, row: &mut [u8], at: usize, color: u32, count: usize) {
        let span = &mut row[at * 2..];
        if color >> 24 == 0xFF {
            (routines.memset_16)(span, rgb32_to_rgb16(color), count);
        } else {
            (routines.blend_color_rgb16)(span, color, count);
        }
    }
}

impl DstPixel for Rgb32Px {
    fn blend_row(
        routines: &RoutineTable,
        row: &mut [u8],
        at: usize,
        src: &[u8],
        opacity: u8,
        count: usize,
    ) {
        (routines.blend_argb32p_rgb32)(&mut row[at * 4..], src, opacity, count);
    }

    fn fill_span(routines: &RoutineTable, row: &mut [u8], at: usize, color: u32, count: usize) {
        let span = &mut row[at * 4..];
        if color >> 24 == 0xFF {
            (routines.memset_32)(span, color, count);
        } else {
            (routines.blend_color_rgb32)(span, color, count);
        }
    }
}

impl DstPixel for Argb32pPx {
    fn blend_row(
        routines: &RoutineTable,
        row: &mut [u8],
        at: usize,
        src: &[u8],
        opacity: u8,
        count: usize,
    ) {
        (routines.blend_argb32p_argb32p)(&mut row[at * 4..], src, opacity, count);
    }

    fn fill_span(routines: &RoutineTable, row: &mut [u8], at: usize, color: u32, count: usize) {
        let span = &mut row[at * 4..];
        if color >> 24 == 0xFF {
            (routines.memset_32)(span, color, count);
        } else {
            (routines.blend_color_argb32p)(span, color, count);
        }
    }
}

/// Weights of the four bilinear neighbours for 8-bit fractions `fx`, `fy`; they sum to 65536.
#[inline]
pub(crate) fn bilinear_weights(fx: u32, fy: u32) -> [u32; 4] {
    [
        (256 - fx) * (256 - fy),
        fx * (256 - fy),
        (256 - fx) * fy,
        fx * fy,
    ]
}

/// Weighted sum of four premultiplied pixels, channel by channel.
#[inline]
pub(crate) fn interpolate(px: [u32; 4], w: [u32; 4]) -> u32 {
    let mut out = 0u32;
    for shift in [0u32, 8, 16, 24] {
        let mut acc = 0u32;
        for k in 0..4 {
            acc += ((px[k] >> shift) & 0xFF) * w[k];
        }
        out |= (acc >> 16).min(255) << shift;
    }
    out
}

use super::FixedInverse;
use super::sample::{DstPixel, bilinear_weights};
use crate::foundation::core::{IntRect, IntSize};
use crate::foundation::math::{FIXED_HALF, byte_mul};
use crate::image::ImageMut;
use crate::routines::RoutineTable;

pub(super) fn solid<D: DstPixel>(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    area: IntRect,
    inv: &FixedInverse,
    size: IntSize,
    color: u32,
) {
    let (w, h) = (i64::from(size.width), i64::from(size.height));
    let right = area.x + area.width;
    for y in area.y..area.y + area.height {
        let (mut fx, mut fy) = inv.map(area.x, y);
        let mut span: Option<(i32, i32)> = None;
        for x in area.x..right {
            let hit = (0..w).contains(&(fx >> 16)) && (0..h).contains(&(fy >> 16));
            fx += inv.m11;
            fy += inv.m12;
            match (hit, span.as_mut()) {
                (true, Some(s)) => s.1 = x + 1,
                (true, None) => span = Some((x, x + 1)),
                (false, Some(_)) => break,
                (false, None) => {}
            }
        }
        if let Some((start, end)) = span {
            D::fill_span(
                routines,
                out.row_mut(y),
                start as usize,
                color,
                (end - start) as usize,
            );
        }
    }
}

/// Fraction of the bilinear footprint at `(fx, fy)` inside a `w x h` rectangle, out of 256.
fn coverage(fx: i64, fy: i64, w: i64, h: i64) -> u32 {
    let (px, py) = (fx >> 16, fy >> 16);
    let weights = bilinear_weights(((fx & 0xFFFF) >> 8) as u32, ((fy & 0xFFFF) >> 8) as u32);
    let taps = [(px, py), (px + 1, py), (px, py + 1), (px + 1, py + 1)];
    let mut sum = 0;
    for (k, (x, y)) in taps.into_iter().enumerate() {
        if x >= 0 && y >= 0 && x < w && y < h {
            sum += weights[k];
        }
    }
    sum >> 8
}

pub(super) fn antialiased<D: DstPixel>(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    area: IntRect,
    inv: &FixedInverse,
    size: IntSize,
    color: u32,
) {
    let (w, h) = (i64::from(size.width), i64::from(size.height));
    let half = i64::from(FIXED_HALF);
    let right = area.x + area.width;
    for y in area.y..area.y + area.height {
        let (mut fx, mut fy) = inv.map(area.x, y);
        fx -= half;
        fy -= half;
        let row = out.row_mut(y);
        let mut run: Option<i32> = None;
        for x in area.x..right {
            let cov = coverage(fx, fy, w, h);
            fx += inv.m11;
            fy += inv.m12;
            if cov >= 256 {
                run.get_or_insert(x);
                continue;
            }
            if let Some(start) = run.take() {
                D::fill_span(routines, row, start as usize, color, (x - start) as usize);
            }
            if cov > 0 {
                let px = byte_mul(color, cov).to_ne_bytes();
                D::blend_row(routines, row, x as usize, &px, 0xFF, 1);
            }
        }
        if let Some(start) = run {
            D::fill_span(routines, row, start as usize, color, (right - start) as usize);
        }
    }
}

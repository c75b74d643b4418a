use super::FixedInverse;
use super::sample::{DstPixel, SrcPixel, bilinear_weights, interpolate};
use crate::foundation::core::IntRect;
use crate::foundation::math::FIXED_HALF;
use crate::image::{ImageMut, ImageRef};
use crate::pixel::format::store32;
use crate::routines::RoutineTable;

const TILE_ROWS: i32 = 64;
const TILE_COLS: i32 = 32;

/// Visit `area` in tiles, calling `f(y, x0, x1)` for each tile row segment.
fn for_each_tile(area: IntRect, mut f: impl FnMut(i32, i32, i32)) {
    let (right, bottom) = (area.x + area.width, area.y + area.height);
    let mut ty = area.y;
    while ty < bottom {
        let ty_end = (ty + TILE_ROWS).min(bottom);
        let mut tx = area.x;
        while tx < right {
            let tx_end = (tx + TILE_COLS).min(right);
            for y in ty..ty_end {
                f(y, tx, tx_end);
            }
            tx = tx_end;
        }
        ty = ty_end;
    }
}

#[inline]
fn inside(x: i64, y: i64, w: i64, h: i64) -> bool {
    x >= 0 && y >= 0 && x < w && y < h
}

/// Premultiplied pixels sampled along one tile row, blended through the routine table.
///
/// The mapped image is convex, so the samples of a row form one contiguous run.
struct Span {
    start: Option<i32>,
    pixels: Vec<u8>,
    len: usize,
}

impl Span {
    fn new() -> Self {
        Self {
            start: None,
            pixels: vec![0; TILE_COLS as usize * 4],
            len: 0,
        }
    }

    fn reset(&mut self) {
        self.start = None;
        self.len = 0;
    }

    fn push(&mut self, x: i32, px: u32) {
        self.start.get_or_insert(x);
        store32(&mut self.pixels, self.len, px);
        self.len += 1;
    }

    fn flush<D: DstPixel>(&self, routines: &RoutineTable, row: &mut [u8], opacity: u8) {
        if let Some(x) = self.start {
            D::blend_row(routines, row, x as usize, &self.pixels, opacity, self.len);
        }
    }
}

pub(super) fn nearest<S: SrcPixel, D: DstPixel>(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    area: IntRect,
    inv: &FixedInverse,
    img: &ImageRef<'_>,
    opacity: u8,
) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let mut span = Span::new();
    for_each_tile(area, |y, x0, x1| {
        let (mut fx, mut fy) = inv.map(x0, y);
        span.reset();
        for x in x0..x1 {
            let (sx, sy) = (fx >> 16, fy >> 16);
            fx += inv.m11;
            fy += inv.m12;
            if !inside(sx, sy, w, h) {
                if span.start.is_some() {
                    break;
                }
                continue;
            }
            span.push(x, S::load(img.row(sy as i32), sx as usize));
        }
        span.flush::<D>(routines, out.row_mut(y), opacity);
    });
}

fn neighbours<S: SrcPixel>(img: &ImageRef<'_>, x: i64, y: i64) -> Option<[u32; 4]> {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let mut px = [0u32; 4];
    let mut any = false;
    for (k, (nx, ny)) in [(x, y), (x + 1, y), (x, y + 1), (x + 1, y + 1)]
        .into_iter()
        .enumerate()
    {
        if inside(nx, ny, w, h) {
            px[k] = S::load(img.row(ny as i32), nx as usize);
            any = true;
        }
    }
    any.then_some(px)
}

pub(super) fn bilinear<S: SrcPixel, D: DstPixel>(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    area: IntRect,
    inv: &FixedInverse,
    img: &ImageRef<'_>,
    opacity: u8,
) {
    let half = i64::from(FIXED_HALF);
    let mut span = Span::new();
    for_each_tile(area, |y, x0, x1| {
        let (mut fx, mut fy) = inv.map(x0, y);
        fx -= half;
        fy -= half;
        span.reset();
        for x in x0..x1 {
            let (px, py) = (fx >> 16, fy >> 16);
            let (dx, dy) = (((fx & 0xFFFF) >> 8) as u32, ((fy & 0xFFFF) >> 8) as u32);
            fx += inv.m11;
            fy += inv.m12;
            let Some(taps) = neighbours::<S>(img, px, py) else {
                if span.start.is_some() {
                    break;
                }
                continue;
            };
            span.push(x, interpolate(taps, bilinear_weights(dx, dy)));
        }
        span.flush::<D>(routines, out.row_mut(y), opacity);
    });
}

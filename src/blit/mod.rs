//! Affine image blitting and solid fills.
//!
//! Every destination pixel inside the transformed bounding box is mapped back through the inverse
//! matrix, held in 16.16 fixed point, and sampled at its centre. Nearest sampling takes the
//! containing source pixel; bilinear blends the four surrounding pixels and treats those outside
//! the image as transparent, so edges fade instead of stepping.
//!
//! The format pair is resolved once per call through const tables of monomorphised loops.

mod affine;
mod fill;
mod sample;
mod scale;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::core::{Affine, IntRect, IntSize};
use crate::foundation::error::GfxResult;
use crate::foundation::math::to_fixed;
use crate::image::{ImageMut, ImageRef};
use crate::pixel::PixelFormat;
use crate::routines::RoutineTable;
use sample::{Argb32pPx, Rgb16Px, Rgb32Px};

/// Inverse matrix in 16.16 fixed point, pre-offset to pixel centres.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FixedInverse {
    pub(crate) m11: i64,
    pub(crate) m12: i64,
    pub(crate) m21: i64,
    pub(crate) m22: i64,
    cx: i64,
    cy: i64,
}

impl FixedInverse {
    /// `None` for a singular or non-finite matrix.
    pub(crate) fn new(m: Affine) -> Option<Self> {
        let det = m.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let [a, b, c, d, e, f] = m.inverse().as_coeffs();
        Some(Self {
            m11: i64::from(to_fixed(a)),
            m12: i64::from(to_fixed(b)),
            m21: i64::from(to_fixed(c)),
            m22: i64::from(to_fixed(d)),
            cx: i64::from(to_fixed(0.5 * a + 0.5 * c + e)),
            cy: i64::from(to_fixed(0.5 * b + 0.5 * d + f)),
        })
    }

    /// Source position, in 16.16, of the centre of destination pixel `(x, y)`.
    #[inline]
    pub(crate) fn map(&self, x: i32, y: i32) -> (i64, i64) {
        let (x, y) = (i64::from(x), i64::from(y));
        (
            self.m11 * x + self.m21 * y + self.cx,
            self.m12 * x + self.m22 * y + self.cy,
        )
    }
}

/// `b == c == 0` and `a == d > 0`.
pub fn is_pure_scale(m: Affine) -> bool {
    let [a, b, c, d, _, _] = m.as_coeffs();
    b == 0.0 && c == 0.0 && a == d && a > 0.0
}

type BlitFn = fn(&RoutineTable, &mut ImageMut<'_>, IntRect, &FixedInverse, &ImageRef<'_>, u8);
type FillFn = fn(&RoutineTable, &mut ImageMut<'_>, IntRect, &FixedInverse, IntSize, u32);

// Indexed `[output][input]` by `PixelFormat::raster_index`.
const NEAREST: [[BlitFn; 3]; 3] = [
    [
        affine::nearest::<Rgb16Px, Rgb16Px>,
        affine::nearest::<Rgb32Px, Rgb16Px>,
        affine::nearest::<Argb32pPx, Rgb16Px>,
    ],
    [
        affine::nearest::<Rgb16Px, Rgb32Px>,
        affine::nearest::<Rgb32Px, Rgb32Px>,
        affine::nearest::<Argb32pPx, Rgb32Px>,
    ],
    [
        affine::nearest::<Rgb16Px, Argb32pPx>,
        affine::nearest::<Rgb32Px, Argb32pPx>,
        affine::nearest::<Argb32pPx, Argb32pPx>,
    ],
];

const BILINEAR: [[BlitFn; 3]; 3] = [
    [
        affine::bilinear::<Rgb16Px, Rgb16Px>,
        affine::bilinear::<Rgb32Px, Rgb16Px>,
        affine::bilinear::<Argb32pPx, Rgb16Px>,
    ],
    [
        affine::bilinear::<Rgb16Px, Rgb32Px>,
        affine::bilinear::<Rgb32Px, Rgb32Px>,
        affine::bilinear::<Argb32pPx, Rgb32Px>,
    ],
    [
        affine::bilinear::<Rgb16Px, Argb32pPx>,
        affine::bilinear::<Rgb32Px, Argb32pPx>,
        affine::bilinear::<Argb32pPx, Argb32pPx>,
    ],
];

const SCALED: [[BlitFn; 3]; 3] = [
    [
        scale::scaled::<Rgb16Px, Rgb16Px>,
        scale::scaled::<Rgb32Px, Rgb16Px>,
        scale::scaled::<Argb32pPx, Rgb16Px>,
    ],
    [
        scale::scaled::<Rgb16Px, Rgb32Px>,
        scale::scaled::<Rgb32Px, Rgb32Px>,
        scale::scaled::<Argb32pPx, Rgb32Px>,
    ],
    [
        scale::scaled::<Rgb16Px, Argb32pPx>,
        scale::scaled::<Rgb32Px, Argb32pPx>,
        scale::scaled::<Argb32pPx, Argb32pPx>,
    ],
];

const FILL: [FillFn; 3] = [
    fill::solid::<Rgb16Px>,
    fill::solid::<Rgb32Px>,
    fill::solid::<Argb32pPx>,
];

const FILL_AA: [FillFn; 3] = [
    fill::antialiased::<Rgb16Px>,
    fill::antialiased::<Rgb32Px>,
    fill::antialiased::<Argb32pPx>,
];

static UNSUPPORTED_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_unsupported(out: PixelFormat, src: Option<PixelFormat>) {
    if !UNSUPPORTED_WARNED.swap(true, Ordering::Relaxed) {
        tracing::warn!(?out, ?src, "affine blit has no kernel for this format pair");
    }
}

#[derive(Clone, Copy)]
enum Sampling {
    Nearest,
    Bilinear,
}

fn blit(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    clip: IntRect,
    m: Affine,
    img: &ImageRef<'_>,
    opacity: u8,
    sampling: Sampling,
) -> GfxResult<bool> {
    let (Some(o), Some(i)) = (out.format().raster_index(), img.format().raster_index()) else {
        warn_unsupported(out.format(), Some(img.format()));
        return Ok(false);
    };
    if opacity == 0 || img.is_empty() {
        return Ok(true);
    }
    let Some(inv) = FixedInverse::new(m) else {
        return Ok(true);
    };
    let mut bounds = img.rect().mapped_bounds(m);
    if matches!(sampling, Sampling::Bilinear) {
        bounds = bounds.inflated(1);
    }
    let area = bounds.intersect(clip).intersect(out.rect());
    if area.is_empty() {
        return Ok(true);
    }
    let kernel = match sampling {
        Sampling::Nearest if is_pure_scale(m) => SCALED[o][i],
        Sampling::Nearest => NEAREST[o][i],
        Sampling::Bilinear => BILINEAR[o][i],
    };
    kernel(routines, out, area, &inv, img, opacity);
    Ok(true)
}

/// Draw `img` through `m` with nearest sampling, restricted to `clip` in output coordinates.
///
/// Returns `Ok(false)` without touching `out` when the format pair has no kernel. A singular
/// matrix draws nothing.
#[tracing::instrument(skip_all)]
pub fn transform(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    clip: IntRect,
    m: Affine,
    img: &ImageRef<'_>,
    opacity: u8,
) -> GfxResult<bool> {
    blit(routines, out, clip, m, img, opacity, Sampling::Nearest)
}

/// [`transform`] with bilinear sampling.
#[tracing::instrument(skip_all)]
pub fn transform_bilinear(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    clip: IntRect,
    m: Affine,
    img: &ImageRef<'_>,
    opacity: u8,
) -> GfxResult<bool> {
    blit(routines, out, clip, m, img, opacity, Sampling::Bilinear)
}

fn fill_with(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    clip: IntRect,
    m: Affine,
    size: IntSize,
    color: u32,
    antialias: bool,
) -> GfxResult<bool> {
    let Some(o) = out.format().raster_index() else {
        warn_unsupported(out.format(), None);
        return Ok(false);
    };
    if color >> 24 == 0 || size.is_empty() {
        return Ok(true);
    }
    let Some(inv) = FixedInverse::new(m) else {
        return Ok(true);
    };
    let (table, margin) = if antialias {
        (&FILL_AA, 1)
    } else {
        (&FILL, 0)
    };
    let area = IntRect::from_size(size)
        .mapped_bounds(m)
        .inflated(margin)
        .intersect(clip)
        .intersect(out.rect());
    if !area.is_empty() {
        table[o](routines, out, area, &inv, size, color);
    }
    Ok(true)
}

/// Fill the rectangle `(0, 0, size)` mapped through `m` with a premultiplied colour.
#[tracing::instrument(skip_all)]
pub fn transform_fill(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    clip: IntRect,
    m: Affine,
    size: IntSize,
    color: u32,
) -> GfxResult<bool> {
    fill_with(routines, out, clip, m, size, color, false)
}

/// Anti-aliased [`transform_fill`]: edge pixels are weighted by how much of their bilinear
/// footprint lies inside the rectangle.
#[tracing::instrument(skip_all)]
pub fn transform_fill_bilinear(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    clip: IntRect,
    m: Affine,
    size: IntSize,
    color: u32,
) -> GfxResult<bool> {
    fill_with(routines, out, clip, m, size, color, true)
}

#[cfg(test)]
#[path = "../../tests/unit/blit/blit.rs"]
mod tests;

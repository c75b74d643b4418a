use super::Rotation;
use crate::foundation::core::IntRect;

/// Cut the inclusive range `[a.0, a.1]` to `[fit.0, fit.1]`, cutting the paired range `b` in
/// proportion. With `mirrored`, a cut at the start of `a` removes from the end of `b`.
fn cut_range(a: &mut (i32, i32), fit: (i32, i32), b: &mut (i32, i32), mirrored: bool) {
    let l1 = i64::from(a.1 - a.0 + 1);
    let l2 = i64::from(b.1 - b.0 + 1);
    let scaled = |n: i32| (i64::from(n) * l2 / l1.max(1)) as i32;

    if a.0 < fit.0 {
        let cut = scaled(fit.0 - a.0);
        if mirrored {
            b.1 -= cut;
        } else {
            b.0 += cut;
        }
        a.0 = fit.0;
    }
    if a.1 > fit.1 {
        let cut = scaled(a.1 - fit.1);
        if mirrored {
            b.0 += cut;
        } else {
            b.1 -= cut;
        }
        a.1 = fit.1;
    }
}

/// Fit both ranges of a pair to their own limits, each cut carried over to the other range.
fn cut_pair(
    a: &mut (i32, i32),
    fit_a: (i32, i32),
    b: &mut (i32, i32),
    fit_b: (i32, i32),
    mirrored: bool,
) {
    cut_range(a, fit_a, b, mirrored);
    cut_range(b, fit_b, a, mirrored);
}

/// Clip `src` to `src_area` and `dst` to `dst_area`, keeping the two rectangles in proportion
/// under `rotation`.
///
/// Both results are empty when either pair fails to meet or the cut inverts a range.
pub fn clip_rects(
    src: IntRect,
    src_area: IntRect,
    dst: IntRect,
    dst_area: IntRect,
    rotation: Rotation,
) -> (IntRect, IntRect) {
    let empty = (IntRect::default(), IntRect::default());
    let (src, dst) = (src.normalized(), dst.normalized());
    if !src.intersects(src_area) || !dst.intersects(dst_area) {
        return empty;
    }
    let mut sx = (src.left(), src.right());
    let mut sy = (src.top(), src.bottom());
    let mut dx = (dst.left(), dst.right());
    let mut dy = (dst.top(), dst.bottom());
    let fit_sx = (src_area.left(), src_area.right());
    let fit_sy = (src_area.top(), src_area.bottom());
    let fit_dx = (dst_area.left(), dst_area.right());
    let fit_dy = (dst_area.top(), dst_area.bottom());

    match rotation {
        Rotation::Rotate0 => {
            cut_pair(&mut sx, fit_sx, &mut dx, fit_dx, false);
            cut_pair(&mut sy, fit_sy, &mut dy, fit_dy, false);
        }
        Rotation::Rotate180 => {
            cut_pair(&mut sx, fit_sx, &mut dx, fit_dx, true);
            cut_pair(&mut sy, fit_sy, &mut dy, fit_dy, true);
        }
        Rotation::Rotate90 => {
            cut_pair(&mut sx, fit_sx, &mut dy, fit_dy, false);
            cut_pair(&mut dx, fit_dx, &mut sy, fit_sy, true);
        }
        Rotation::Rotate270 => {
            cut_pair(&mut sx, fit_sx, &mut dy, fit_dy, true);
            cut_pair(&mut dx, fit_dx, &mut sy, fit_sy, false);
        }
    }

    if sx.0 > sx.1 || sy.0 > sy.1 || dx.0 > dx.1 || dy.0 > dy.1 {
        return empty;
    }
    (
        IntRect::from_coords(sx.0, sy.0, sx.1, sy.1),
        IntRect::from_coords(dx.0, dy.0, dx.1, dy.1),
    )
}

/// Round left/top up to a multiple of `align` and right/bottom up to one less than a multiple.
pub fn aligned(rect: IntRect, align: i32) -> IntRect {
    if align <= 1 || rect.is_empty() {
        return rect;
    }
    let up = |v: i32| (v + align - 1).div_euclid(align) * align;
    let end = |v: i32| (v + align).div_euclid(align) * align - 1;
    IntRect::from_coords(
        up(rect.left()),
        up(rect.top()),
        end(rect.right()),
        end(rect.bottom()),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/plane/clip.rs"]
mod tests;

use super::FixedInverse;
use super::sample::{DstPixel, SrcPixel};
use crate::foundation::core::IntRect;
use crate::image::{ImageMut, ImageRef};
use crate::pixel::format::store32;
use crate::routines::RoutineTable;

/// Nearest resampling for a pure positive scale.
///
/// Source columns and rows are looked up from tables built with the same fixed-point inverse the
/// general loop steps through, so both paths pick the same source pixel everywhere.
pub(super) fn scaled<S: SrcPixel, D: DstPixel>(
    routines: &RoutineTable,
    out: &mut ImageMut<'_>,
    area: IntRect,
    inv: &FixedInverse,
    img: &ImageRef<'_>,
    opacity: u8,
) {
    let (w, h) = (i64::from(img.width()), i64::from(img.height()));
    let cols: Vec<i64> = (area.x..area.x + area.width)
        .map(|x| inv.map(x, 0).0 >> 16)
        .collect();
    let valid = |s: &i64| (0..w).contains(s);
    let (Some(first), Some(last)) = (cols.iter().position(valid), cols.iter().rposition(valid))
    else {
        return;
    };
    let cols = &cols[first..=last];
    let at = area.x as usize + first;

    let mut gathered = vec![0u8; cols.len() * 4];
    let mut gathered_row = None;
    for y in area.y..area.y + area.height {
        let sy = inv.map(0, y).1 >> 16;
        if !(0..h).contains(&sy) {
            continue;
        }
        if gathered_row != Some(sy) {
            let src = img.row(sy as i32);
            for (k, sx) in cols.iter().enumerate() {
                store32(&mut gathered, k, S::load(src, *sx as usize));
            }
            gathered_row = Some(sy);
        }
        D::blend_row(routines, out.row_mut(y), at, &gathered, opacity, cols.len());
    }
}

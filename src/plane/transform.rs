use std::cell::OnceCell;

use super::Rotation;
use super::clip::{aligned, clip_rects};
use super::format::{
    Assign, PlaneFormat, Reverse32, Rgb32To24, Rgb32To565, Rgb565To32, Same, Swap24,
};
use super::jumps::make_jumps_table;
use crate::foundation::core::IntRect;
use crate::foundation::error::{GfxError, GfxResult};

// Destination columns handled per pass in the transposing rotations.
const STRIP_COLUMNS: usize = 32;

/// Clipped geometry and jump tables derived from the current configuration.
#[derive(Clone, Debug, Default)]
struct Tables {
    src: IntRect,
    dst: IntRect,
    htable: Vec<i32>,
    vtable: Vec<i32>,
}

impl Tables {
    fn is_empty(&self) -> bool {
        self.src.is_empty() || self.dst.is_empty()
    }
}

/// Source coordinates for every destination row and column.
///
/// Without transposition destination column `x` reads source column `per_col[x]` of source row
/// `per_row[y]`. With it, `per_row[y]` is the source column and `per_col[x]` the source row.
struct Walk {
    dst: IntRect,
    per_row: Vec<i32>,
    per_col: Vec<i32>,
    transposed: bool,
}

// Column walk: sample at the current position, then advance.
fn positions(start: i32, table: &[i32], sign: i32) -> Vec<i32> {
    let mut pos = start;
    table
        .iter()
        .map(|step| {
            let here = pos;
            pos += sign * step;
            here
        })
        .collect()
}

// Row walk: advance first, so a downscale lands on the middle of each block.
fn advanced_positions(start: i32, table: &[i32], sign: i32) -> Vec<i32> {
    let mut pos = start;
    table
        .iter()
        .map(|step| {
            pos += sign * step;
            pos
        })
        .collect()
}

impl Walk {
    fn new(t: &Tables, rotation: Rotation) -> Self {
        let (s, h, v) = (t.src, t.htable.as_slice(), t.vtable.as_slice());
        let (per_row, per_col) = match rotation {
            Rotation::Rotate0 => (
                advanced_positions(s.top(), v, 1),
                positions(s.left(), h, 1),
            ),
            Rotation::Rotate180 => (
                advanced_positions(s.bottom(), v, -1),
                positions(s.right(), h, -1),
            ),
            Rotation::Rotate90 => (
                advanced_positions(s.left(), h, 1),
                positions(s.bottom(), v, -1),
            ),
            Rotation::Rotate270 => (
                advanced_positions(s.right(), h, -1),
                positions(s.top(), v, 1),
            ),
        };
        Self {
            dst: t.dst,
            per_row,
            per_col,
            transposed: rotation.is_transposing(),
        }
    }
}

type PlaneFn = fn(&Walk, &[u8], usize, &mut [u8], usize);

fn scale_plane<A: Assign>(
    walk: &Walk,
    src: &[u8],
    src_stride: usize,
    dst: &mut [u8],
    dst_stride: usize,
) {
    let d = walk.dst;
    let dst_left = d.left() as usize * A::DST;
    let dst_row = |y: usize| (d.top() as usize + y) * dst_stride + dst_left;

    if !walk.transposed {
        let cols: Vec<usize> = walk.per_col.iter().map(|&x| x as usize * A::SRC).collect();
        for (y, &sy) in walk.per_row.iter().enumerate() {
            let src_row = &src[sy as usize * src_stride..];
            let out = &mut dst[dst_row(y)..];
            for (x, &col) in cols.iter().enumerate() {
                A::assign(&src_row[col..col + A::SRC], &mut out[x * A::DST..]);
            }
        }
        return;
    }

    let rows: Vec<usize> = walk.per_col.iter().map(|&y| y as usize * src_stride).collect();
    let width = rows.len();
    let mut from = 0;
    while from < width {
        let to = (from + STRIP_COLUMNS).min(width);
        for (y, &sx) in walk.per_row.iter().enumerate() {
            let col = sx as usize * A::SRC;
            let out = &mut dst[dst_row(y)..];
            for x in from..to {
                let at = rows[x] + col;
                A::assign(&src[at..at + A::SRC], &mut out[x * A::DST..]);
            }
        }
        from = to;
    }
}

fn kernel_for(src: PlaneFormat, dst: PlaneFormat) -> Option<PlaneFn> {
    use PlaneFormat::*;
    let f: PlaneFn = match (src.canonical(), dst.canonical()) {
        (Rgb32, Rgb32) | (Bgr32, Bgr32) => scale_plane::<Same<4>>,
        (Rgb32, Bgr32) | (Bgr32, Rgb32) => scale_plane::<Reverse32>,
        (Rgb24, Rgb24) | (Bgr24, Bgr24) => scale_plane::<Same<3>>,
        (Rgb24, Bgr24) | (Bgr24, Rgb24) => scale_plane::<Swap24>,
        (Rgb565, Rgb565) | (Bgr565, Bgr565) => scale_plane::<Same<2>>,
        (Y8, Y8) | (Yuv420P, Yuv420P) | (Yv12, Yv12) => scale_plane::<Same<1>>,
        (Rgb32, Rgb565) => scale_plane::<Rgb32To565>,
        (Rgb565, Rgb32) => scale_plane::<Rgb565To32>,
        (Rgb32, Rgb24) => scale_plane::<Rgb32To24>,
        _ => return None,
    };
    Some(f)
}

fn check_len(
    what: &str,
    rect: IntRect,
    stride: usize,
    element: usize,
    len: usize,
) -> GfxResult<()> {
    if rect.left() < 0 || rect.top() < 0 {
        return Err(GfxError::geometry(format!(
            "{what} rect {rect:?} starts at a negative coordinate"
        )));
    }
    let need = rect.bottom() as usize * stride + (rect.right() as usize + 1) * element;
    if len < need {
        return Err(GfxError::geometry(format!(
            "{what} plane holds {len} bytes, {rect:?} at stride {stride} needs {need}"
        )));
    }
    Ok(())
}

/// Scales and rotates planes between a source and a destination rectangle.
///
/// Configure with the setters, then call one of the `transform_plane*` methods any number of
/// times. Clipping and jump tables are recomputed lazily after a setter runs.
#[derive(Clone, Debug)]
pub struct PlaneTransform {
    src_rect: IntRect,
    src_area: IntRect,
    src_stride: usize,
    dst_rect: IntRect,
    dst_area: IntRect,
    dst_stride: usize,
    rotation: Rotation,
    alignment: i32,
    tables: OnceCell<Tables>,
}

impl Default for PlaneTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaneTransform {
    pub fn new() -> Self {
        Self {
            src_rect: IntRect::default(),
            src_area: IntRect::default(),
            src_stride: 0,
            dst_rect: IntRect::default(),
            dst_area: IntRect::default(),
            dst_stride: 0,
            rotation: Rotation::Rotate0,
            alignment: 1,
            tables: OnceCell::new(),
        }
    }

    /// Source rectangle, the area of the source plane it may read, and the row stride in bytes.
    pub fn set_src_geometry(&mut self, rect: IntRect, clip: IntRect, stride: usize) {
        self.src_rect = rect.normalized();
        self.src_area = clip.normalized();
        self.src_stride = stride;
        self.tables = OnceCell::new();
    }

    pub fn set_dst_geometry(&mut self, rect: IntRect, clip: IntRect, stride: usize) {
        self.dst_rect = rect.normalized();
        self.dst_area = clip.normalized();
        self.dst_stride = stride;
        self.tables = OnceCell::new();
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.tables = OnceCell::new();
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Snap clipped rectangles to multiples of `align` pixels. Values below 1 mean 1.
    pub fn set_geometry_alignment(&mut self, align: i32) {
        self.alignment = align.max(1);
        self.tables = OnceCell::new();
    }

    fn tables(&self) -> &Tables {
        self.tables.get_or_init(|| {
            let (src, dst) = clip_rects(
                self.src_rect,
                self.src_area,
                self.dst_rect,
                self.dst_area,
                self.rotation,
            );
            // Alignment may round an edge outward; it never leaves the clip area.
            let src = aligned(src, self.alignment).intersect(self.src_area);
            let dst = aligned(dst, self.alignment).intersect(self.dst_area);
            if src.is_empty() || dst.is_empty() {
                return Tables::default();
            }
            let (sw, sh, dw, dh) = (src.width, src.height, dst.width, dst.height);
            let (htable, vtable) = if self.rotation.is_transposing() {
                (make_jumps_table(sw, dh), make_jumps_table(sh, dw))
            } else {
                (make_jumps_table(sw, dw), make_jumps_table(sh, dh))
            };
            Tables {
                src,
                dst,
                htable,
                vtable,
            }
        })
    }

    /// Source rectangle after clipping and alignment; empty when nothing will be copied.
    pub fn clipped_src_geometry(&self) -> IntRect {
        self.tables().src
    }

    pub fn clipped_dst_geometry(&self) -> IntRect {
        self.tables().dst
    }

    pub fn is_transformation_supported(&self, src: PlaneFormat, dst: PlaneFormat) -> bool {
        kernel_for(src, dst).is_some()
    }

    fn run(
        &self,
        kernel: PlaneFn,
        src: &[u8],
        src_element: usize,
        dst: &mut [u8],
        dst_element: usize,
    ) -> GfxResult<()> {
        let t = self.tables();
        if t.is_empty() {
            return Ok(());
        }
        check_len("source", t.src, self.src_stride, src_element, src.len())?;
        check_len("destination", t.dst, self.dst_stride, dst_element, dst.len())?;
        let walk = Walk::new(t, self.rotation);
        kernel(&walk, src, self.src_stride, dst, self.dst_stride);
        Ok(())
    }

    /// Transform `src` in `src_format` into `dst` in `dst_format`.
    ///
    /// `Ok(false)` when the pair has no kernel; `dst` is then untouched. An empty clipped
    /// geometry is `Ok(true)` without work.
    #[tracing::instrument(skip_all, fields(src = ?src_format, dst = ?dst_format))]
    pub fn transform_plane(
        &self,
        src: &[u8],
        src_format: PlaneFormat,
        dst: &mut [u8],
        dst_format: PlaneFormat,
    ) -> GfxResult<bool> {
        if self.tables().is_empty() {
            return Ok(true);
        }
        let Some(kernel) = kernel_for(src_format, dst_format) else {
            tracing::debug!("no plane kernel for this format pair");
            return Ok(false);
        };
        self.run(
            kernel,
            src,
            src_format.element_size(),
            dst,
            dst_format.element_size(),
        )?;
        Ok(true)
    }

    /// Same-layout transform of 8-bit elements.
    pub fn transform_plane_u8(&self, src: &[u8], dst: &mut [u8]) -> GfxResult<()> {
        self.run(scale_plane::<Same<1>>, src, 1, dst, 1)
    }

    pub fn transform_plane_u16(&self, src: &[u8], dst: &mut [u8]) -> GfxResult<()> {
        self.run(scale_plane::<Same<2>>, src, 2, dst, 2)
    }

    pub fn transform_plane_u24(&self, src: &[u8], dst: &mut [u8]) -> GfxResult<()> {
        self.run(scale_plane::<Same<3>>, src, 3, dst, 3)
    }

    pub fn transform_plane_u32(&self, src: &[u8], dst: &mut [u8]) -> GfxResult<()> {
        self.run(scale_plane::<Same<4>>, src, 4, dst, 4)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plane/transform.rs"]
mod tests;

//! Vector fallback: rasterise one draw with `vello_cpu`, then composite the result.

use std::sync::Arc;

use super::simple::{RowOpacity, blend_span, row_alpha};
use super::surface_pool::{SurfacePool, SurfacePoolOpts};
use crate::foundation::core::{Affine, IntRect, IntSize, Rgba8};
use crate::foundation::error::{GfxError, GfxResult};
use crate::image::{ImageMut, ImageRef};
use crate::pixel::PixelFormat;
use crate::routines::RoutineTable;

/// What a fallback draw fills `(0, 0, size)` with.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FallbackPaint<'p, 's> {
    Image(&'p ImageRef<'s>),
    Color(Rgba8),
}

enum Paint {
    Image(vello_cpu::Image),
    Color(vello_cpu::peniko::Color),
}

pub(crate) struct FallbackRenderer {
    ctx: Option<vello_cpu::RenderContext>,
    pool: SurfacePool,
    // One destination-width row of ARGB32p pixels.
    row: Vec<u8>,
    scratch: Vec<u8>,
}

impl FallbackRenderer {
    pub(crate) fn new() -> Self {
        Self {
            ctx: None,
            pool: SurfacePool::new(SurfacePoolOpts::default()),
            row: Vec::new(),
            scratch: Vec::new(),
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }

    /// Fill `(0, 0, size)` mapped through `m` with `paint` and composite it into `dest`.
    ///
    /// Only pixels inside `clips` (disjoint, destination coordinates) are written. Each row is
    /// blended at `row_alpha(opacity, rows, y)`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw(
        &mut self,
        routines: &RoutineTable,
        dest: &mut ImageMut<'_>,
        m: Affine,
        size: IntSize,
        paint: FallbackPaint<'_, '_>,
        clips: &[IntRect],
        opacity: u8,
        rows: RowOpacity<'_>,
    ) -> GfxResult<()> {
        if dest.format().raster_index().is_none() {
            return Err(GfxError::format(format!(
                "fallback cannot composite into {:?}",
                dest.format()
            )));
        }
        let bounds = clips
            .iter()
            .copied()
            .reduce(IntRect::union)
            .unwrap_or_default()
            .intersect(IntRect::from_size(size).mapped_bounds(m));
        if bounds.is_empty() || size.is_empty() {
            return Ok(());
        }

        let paint = match paint {
            FallbackPaint::Image(img) => Paint::Image(vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(image_to_pixmap(routines, img)?)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            }),
            FallbackPaint::Color(c) => {
                Paint::Color(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a))
            }
        };

        let mut pixmap = self.pool.take(bounds.width as u32, bounds.height as u32)?;
        pixmap.data_as_u8_slice_mut().fill(0);
        let (w, h) = (pixmap.width(), pixmap.height());
        let local = Affine::translate((-f64::from(bounds.x), -f64::from(bounds.y))) * m;
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(vello_cpu::kurbo::Affine::new(local.as_coeffs()));
            match paint {
                Paint::Image(image) => ctx.set_paint(image),
                Paint::Color(color) => ctx.set_paint(color),
            }
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(size.width),
                f64::from(size.height),
            ));
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        });

        self.composite(routines, dest, &pixmap, bounds, clips, opacity, rows);
        self.pool.give_back(pixmap);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn composite(
        &mut self,
        routines: &RoutineTable,
        dest: &mut ImageMut<'_>,
        pixmap: &vello_cpu::Pixmap,
        bounds: IntRect,
        clips: &[IntRect],
        opacity: u8,
        rows: RowOpacity<'_>,
    ) {
        let bytes = pixmap.data_as_u8_slice();
        let pitch = bounds.width as usize * 4;
        let format = dest.format();
        for clip in clips {
            let r = clip.intersect(bounds);
            if r.is_empty() {
                continue;
            }
            let count = r.width as usize;
            if self.row.len() < count * 4 {
                self.row.resize(count * 4, 0);
            }
            for y in r.y..r.y + r.height {
                let alpha = row_alpha(opacity, rows, y);
                if alpha == 0 {
                    continue;
                }
                let at = (y - bounds.y) as usize * pitch + (r.x - bounds.x) as usize * 4;
                (routines.color_rgba8_argb32p)(&bytes[at..], &mut self.row, count);
                blend_span(
                    routines,
                    format,
                    dest.row_from_mut(r.x, y),
                    PixelFormat::Argb32Premultiplied,
                    &self.row,
                    count,
                    alpha,
                    &mut self.scratch,
                );
            }
        }
    }
}

/// Premultiplied RGBA8 pixmap holding `img`.
fn image_to_pixmap(routines: &RoutineTable, img: &ImageRef<'_>) -> GfxResult<vello_cpu::Pixmap> {
    let w: u16 = img
        .width()
        .try_into()
        .map_err(|_| GfxError::fallback("image width exceeds u16"))?;
    let h: u16 = img
        .height()
        .try_into()
        .map_err(|_| GfxError::fallback("image height exceeds u16"))?;
    let convert = match img.format() {
        PixelFormat::Argb32Premultiplied => None,
        f => Some(
            routines
                .converter(f, PixelFormat::Argb32Premultiplied)
                .ok_or_else(|| GfxError::format(format!("no premultiplied form of {f:?}")))?,
        ),
    };

    let width = usize::from(w);
    let mut argb = vec![0u8; width * 4];
    let mut rgba = vec![0u8; width * 4];
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width * usize::from(h));
    for y in 0..img.height() {
        let row = img.row(y);
        let src = match convert {
            Some(convert) => {
                convert(row, &mut argb, width);
                &argb[..]
            }
            None => row,
        };
        (routines.color_argb32p_rgba8)(src, &mut rgba, width);
        for px in rgba.chunks_exact(4) {
            may_have_opacities |= px[3] != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            });
        }
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/painter/fallback.rs"]
mod tests;

//! The compositing façade.
//!
//! A [`GfxPainter`] borrows a destination buffer and draws images and colours into it, limited
//! to a [`ClipRegion`] and an optional user clip rectangle. RGB16 and RGB32 destinations use the
//! raster kernels directly. Every other destination, and every destination when the routine
//! table forces it, goes through a `vello_cpu` fallback that rasterises each draw into a scratch
//! pixmap and composites that.
//!
//! Draw calls return `()`. Unsupported format pairs log one warning and draw nothing.

mod clip;
mod fallback;
pub mod proxy;
mod simple;
mod surface_pool;

use std::sync::atomic::{AtomicBool, Ordering};

pub use clip::ClipRegion;
pub use proxy::{MainThreadProxy, ProxyOutcome, ProxyReceiver};

use crate::blit;
use crate::foundation::core::{Affine, IntPoint, IntRect, IntSize, Rgba8};
use crate::foundation::math::opacity_to_u8;
use crate::image::{ImageMut, ImageRef};
use crate::pixel::PixelFormat;
use crate::pixel::convert::rgb32_to_rgb16;
use crate::routines::RoutineTable;
use fallback::{FallbackPaint, FallbackRenderer};
use simple::row_alpha;

static UNSUPPORTED_SOURCE_WARNED: AtomicBool = AtomicBool::new(false);
static UNSUPPORTED_FLIP_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_once(flag: &AtomicBool, what: &str, dst: PixelFormat, src: PixelFormat) {
    if !flag.swap(true, Ordering::Relaxed) {
        tracing::warn!(?dst, ?src, "{what}: unsupported format pair");
    }
}

/// Row opacity callback: destination row in, opacity out.
pub type HorizontalOpacityFn<'a> = Box<dyn Fn(i32) -> u8 + 'a>;

pub struct GfxPainter<'a> {
    dest: ImageMut<'a>,
    routines: &'a RoutineTable,
    region: ClipRegion,
    user_clip: IntRect,
    opacity: u8,
    row_opacity: Option<HorizontalOpacityFn<'a>>,
    use_fallback: bool,
    fallback: Option<FallbackRenderer>,
    scratch: Vec<u8>,
}

impl<'a> GfxPainter<'a> {
    /// Painter over the whole of `dest`.
    pub fn new(dest: ImageMut<'a>, routines: &'a RoutineTable) -> Self {
        Self::with_region(dest, ClipRegion::Whole, routines)
    }

    /// Painter limited to `region`. An empty region means the whole buffer.
    pub fn with_region(dest: ImageMut<'a>, region: ClipRegion, routines: &'a RoutineTable) -> Self {
        let use_fallback = routines.force_fallback()
            || !matches!(dest.format(), PixelFormat::Rgb16 | PixelFormat::Rgb32);
        if dest.format() == PixelFormat::Argb32 {
            tracing::warn!("straight-alpha destinations only support clear and flip");
        }
        let region = if region.is_empty() {
            ClipRegion::Whole
        } else {
            region
        };
        Self {
            dest,
            routines,
            region,
            user_clip: IntRect::default(),
            opacity: 0xFF,
            row_opacity: None,
            use_fallback,
            fallback: None,
            scratch: Vec::new(),
        }
    }

    pub fn routines(&self) -> &'a RoutineTable {
        self.routines
    }

    pub fn format(&self) -> PixelFormat {
        self.dest.format()
    }

    pub fn size(&self) -> IntSize {
        self.dest.size()
    }

    pub fn rect(&self) -> IntRect {
        self.dest.rect()
    }

    /// `true` when draws go through the vector fallback.
    pub fn using_fallback(&self) -> bool {
        self.use_fallback
    }

    pub fn region(&self) -> &ClipRegion {
        &self.region
    }

    pub fn set_region(&mut self, region: ClipRegion) {
        self.region = if region.is_empty() {
            ClipRegion::Whole
        } else {
            region
        };
    }

    /// Bounding rectangle of the clip region within the buffer.
    pub fn clip_rect(&self) -> IntRect {
        match self.region.bounding_rect() {
            Some(r) => r.intersect(self.dest.rect()),
            None => self.dest.rect(),
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity_to_u8(opacity);
    }

    pub fn set_opacity_u8(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    pub fn opacity(&self) -> f32 {
        f32::from(self.opacity) / 255.0
    }

    pub fn opacity_u8(&self) -> u8 {
        self.opacity
    }

    /// Extra clip applied on top of the region. An empty rectangle removes it.
    pub fn set_user_clip_rect(&mut self, rect: IntRect) {
        self.user_clip = rect.normalized();
    }

    pub fn user_clip_rect(&self) -> IntRect {
        self.user_clip
    }

    /// Per-row opacity, combined with the painter opacity. Used for reflection fades.
    pub fn set_horizontal_opacity_function(&mut self, f: Option<HorizontalOpacityFn<'a>>) {
        self.row_opacity = f;
    }

    pub fn has_horizontal_opacity_function(&self) -> bool {
        self.row_opacity.is_some()
    }

    /// Disjoint destination rectangles covering `bounds ∩ region ∩ user clip ∩ buffer`.
    fn clip_rects(&self, bounds: IntRect) -> Vec<IntRect> {
        let mut b = bounds.intersect(self.dest.rect());
        if !self.user_clip.is_empty() {
            b = b.intersect(self.user_clip);
        }
        self.region.clipped_to(b)
    }

    fn draw_fallback(&mut self, m: Affine, size: IntSize, paint: FallbackPaint<'_, '_>) {
        let clips = self.clip_rects(IntRect::from_size(size).mapped_bounds(m));
        if clips.is_empty() {
            return;
        }
        let renderer = self.fallback.get_or_insert_with(FallbackRenderer::new);
        if let Err(e) = renderer.draw(
            self.routines,
            &mut self.dest,
            m,
            size,
            paint,
            &clips,
            self.opacity,
            self.row_opacity.as_deref(),
        ) {
            tracing::warn!(error = %e, "fallback draw skipped");
        }
    }

    fn draw_unscaled(&mut self, x: i32, y: i32, img: &ImageRef<'_>, flipped: bool) {
        if self.opacity == 0 || img.is_empty() {
            return;
        }
        if self.use_fallback {
            let h = f64::from(img.height());
            let m = if flipped {
                Affine::translate((f64::from(x), f64::from(y) + h))
                    * Affine::scale_non_uniform(1.0, -1.0)
            } else {
                Affine::translate((f64::from(x), f64::from(y)))
            };
            self.draw_fallback(m, img.size(), FallbackPaint::Image(img));
            return;
        }
        if !simple::supports(self.dest.format(), img.format()) {
            warn_once(
                &UNSUPPORTED_SOURCE_WARNED,
                "draw_image",
                self.dest.format(),
                img.format(),
            );
            return;
        }
        let clips = self.clip_rects(IntRect::new(x, y, img.width(), img.height()));
        if clips.is_empty() {
            return;
        }
        if (self.opacity != 0xFF || self.row_opacity.is_some())
            && let Some(hazard) = simple::hazard_for(self.dest.format(), img.format())
        {
            self.routines.hazards().report(hazard);
        }
        let at = IntPoint::new(x, y);
        for r in clips {
            simple::draw_rows(
                self.routines,
                &mut self.dest,
                r,
                img,
                at,
                flipped,
                self.opacity,
                self.row_opacity.as_deref(),
                &mut self.scratch,
            );
        }
    }

    /// Draw `img` unscaled with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, x: i32, y: i32, img: &ImageRef<'_>) {
        self.draw_unscaled(x, y, img, false);
    }

    /// Draw `img` upside down, occupying the same rectangle as [`GfxPainter::draw_image`].
    pub fn draw_image_flipped(&mut self, x: i32, y: i32, img: &ImageRef<'_>) {
        self.draw_unscaled(x, y, img, true);
    }

    /// Draw at a fractional horizontal position.
    ///
    /// Only RGB16 onto RGB16 at full opacity is interpolated (in 1/32 pixel steps); everything
    /// else is drawn at `x as i32`.
    pub fn draw_image_subpixel(&mut self, x: f64, y: i32, img: &ImageRef<'_>) {
        let interpolate = !self.use_fallback
            && self.opacity == 0xFF
            && self.row_opacity.is_none()
            && img.format() == PixelFormat::Rgb16
            && self.dest.format() == PixelFormat::Rgb16;
        if !interpolate {
            self.draw_image(x.floor() as i32, y, img);
            return;
        }
        let left = x.floor();
        let ix = left as i32;
        let mul_inv = (32.0 * (x - left)) as u32;
        if mul_inv == 0 || img.is_empty() {
            self.draw_image(ix, y, img);
            return;
        }
        let at = IntPoint::new(ix, y);
        for r in self.clip_rects(IntRect::new(ix, y, img.width() + 1, img.height())) {
            simple::draw_rgb16_subpixel(&mut self.dest, r, img, at, mul_inv);
        }
    }

    /// Draw `img` scaled to fill `target`.
    pub fn draw_image_rect(&mut self, target: IntRect, img: &ImageRef<'_>) {
        if img.is_empty() || target.is_empty() {
            return;
        }
        if target.size() == img.size() {
            self.draw_image(target.x, target.y, img);
            return;
        }
        let m = Affine::translate((f64::from(target.x), f64::from(target.y)))
            * Affine::scale_non_uniform(
                f64::from(target.width) / f64::from(img.width()),
                f64::from(target.height) / f64::from(img.height()),
            );
        self.draw_image_transformed(m, img, false);
    }

    /// Draw the `source` part of `img` scaled to fill `target`.
    pub fn draw_image_rect_source(&mut self, target: IntRect, img: &ImageRef<'_>, source: IntRect) {
        let sub = img.sub_image(source);
        self.draw_image_rect(target, &sub);
    }

    /// Draw `img` mapped through `m`; `smooth` selects bilinear sampling.
    ///
    /// The horizontal opacity function is not applied on the raster path.
    pub fn draw_image_transformed(&mut self, m: Affine, img: &ImageRef<'_>, smooth: bool) {
        if self.opacity == 0 || img.is_empty() {
            return;
        }
        if self.use_fallback {
            self.draw_fallback(m, img.size(), FallbackPaint::Image(img));
            return;
        }
        let [a, b, c, d, e, f] = m.as_coeffs();
        if a == 1.0 && b == 0.0 && c == 0.0 && d == 1.0 && e.fract() == 0.0 && f.fract() == 0.0 {
            self.draw_image(e as i32, f as i32, img);
            return;
        }
        let mut bounds = img.rect().mapped_bounds(m);
        if smooth {
            bounds = bounds.inflated(1);
        }
        for r in self.clip_rects(bounds) {
            let res = if smooth {
                blit::transform_bilinear(self.routines, &mut self.dest, r, m, img, self.opacity)
            } else {
                blit::transform(self.routines, &mut self.dest, r, m, img, self.opacity)
            };
            match res {
                Ok(true) => {}
                Ok(false) => return,
                Err(e) => {
                    tracing::warn!(error = %e, "transformed draw skipped");
                    return;
                }
            }
        }
    }

    /// Fill `rect` with a straight-alpha colour scaled by the painter opacity.
    pub fn fill_rect(&mut self, rect: IntRect, color: Rgba8) {
        let rect = rect.normalized();
        if color.with_opacity(self.opacity).a == 0 {
            return;
        }
        if self.use_fallback {
            let m = Affine::translate((f64::from(rect.x), f64::from(rect.y)));
            self.draw_fallback(m, rect.size(), FallbackPaint::Color(color));
            return;
        }
        let format = self.dest.format();
        for r in self.clip_rects(rect) {
            let count = r.width as usize;
            for y in r.y..r.y + r.height {
                let c = color.with_opacity(row_alpha(self.opacity, self.row_opacity.as_deref(), y));
                if c.a == 0 {
                    continue;
                }
                let row = self.dest.row_from_mut(r.x, y);
                let argb = c.to_argb32_premultiplied();
                match (format, c.a) {
                    (PixelFormat::Rgb16, 0xFF) => {
                        (self.routines.memset_16)(row, rgb32_to_rgb16(argb), count)
                    }
                    (PixelFormat::Rgb16, _) => (self.routines.blend_color_rgb16)(row, argb, count),
                    (_, 0xFF) => (self.routines.memset_32)(row, argb, count),
                    _ => (self.routines.blend_color_rgb32)(row, argb, count),
                }
            }
        }
    }

    /// Fill `(0, 0, size)` mapped through `m`; `smooth` anti-aliases the edges.
    pub fn fill_rect_transformed(&mut self, m: Affine, size: IntSize, color: Rgba8, smooth: bool) {
        let c = color.with_opacity(self.opacity);
        if c.a == 0 || size.is_empty() {
            return;
        }
        if self.use_fallback {
            self.draw_fallback(m, size, FallbackPaint::Color(color));
            return;
        }
        let argb = c.to_argb32_premultiplied();
        let mut bounds = IntRect::from_size(size).mapped_bounds(m);
        if smooth {
            bounds = bounds.inflated(1);
        }
        for r in self.clip_rects(bounds) {
            let res = if smooth {
                blit::transform_fill_bilinear(self.routines, &mut self.dest, r, m, size, argb)
            } else {
                blit::transform_fill(self.routines, &mut self.dest, r, m, size, argb)
            };
            if let Err(e) = res {
                tracing::warn!(error = %e, "transformed fill skipped");
                return;
            }
        }
    }

    /// Copy the clip region of this painter's buffer into `framebuffer`, offset by `origin`.
    ///
    /// `rect`, in this buffer's coordinates, limits the copy further; `None` copies every
    /// clip rectangle.
    #[tracing::instrument(skip_all)]
    pub fn flip(&self, framebuffer: &mut ImageMut<'_>, origin: IntPoint, rect: Option<IntRect>) {
        let src_format = self.dest.format();
        let dst_format = framebuffer.format();
        let convert = if src_format == dst_format {
            None
        } else {
            match self.routines.converter(src_format, dst_format) {
                Some(c) => Some(c),
                None => {
                    warn_once(&UNSUPPORTED_FLIP_WARNED, "flip", dst_format, src_format);
                    return;
                }
            }
        };
        let src = self.dest.as_ref();
        let limit = match rect {
            Some(r) => r.normalized().intersect(src.rect()),
            None => src.rect(),
        };
        for r in self.region.clipped_to(limit) {
            let t = r.translated(origin.x, origin.y).intersect(framebuffer.rect());
            if t.is_empty() {
                continue;
            }
            let count = t.width as usize;
            for y in t.y..t.y + t.height {
                let s = src.row_from(t.x - origin.x, y - origin.y);
                let d = framebuffer.row_from_mut(t.x, y);
                match convert {
                    Some(c) => c(s, d, count),
                    None => (self.routines.memcpy)(d, s, count * src_format.bytes_per_pixel()),
                }
            }
        }
    }

    /// Store the raw pixel `value` in every clipped pixel. 16-bit buffers use the low half.
    pub fn clear(&mut self, value: u32) {
        let wide = self.dest.format().bytes_per_pixel() == 4;
        for r in self.clip_rects(self.dest.rect()) {
            let count = r.width as usize;
            for y in r.y..r.y + r.height {
                let row = self.dest.row_from_mut(r.x, y);
                if wide {
                    (self.routines.memset_32)(row, value, count);
                } else {
                    (self.routines.memset_16)(row, value as u16, count);
                }
            }
        }
    }

    /// Read-only view of `rect` in the painter's buffer.
    pub fn image_ref(&self, rect: IntRect) -> ImageRef<'_> {
        self.dest.as_ref().sub_image(rect)
    }

    pub fn image_mut(&mut self, rect: IntRect) -> ImageMut<'_> {
        self.dest.sub_image_mut(rect)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/painter/painter.rs"]
mod tests;

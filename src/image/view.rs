use crate::foundation::core::{IntRect, IntSize};
use crate::foundation::error::{GfxError, GfxResult};
use crate::pixel::PixelFormat;

// `None` when the byte count does not fit in `usize`.
fn required_len(width: i32, height: i32, stride: usize, format: PixelFormat) -> Option<usize> {
    if width <= 0 || height <= 0 {
        return Some(0);
    }
    let row = (width as usize).checked_mul(format.bytes_per_pixel())?;
    (height as usize - 1).checked_mul(stride)?.checked_add(row)
}

fn validate(
    len: usize,
    width: i32,
    height: i32,
    stride: usize,
    format: PixelFormat,
) -> GfxResult<()> {
    if width < 0 || height < 0 {
        return Err(GfxError::geometry(format!(
            "negative image size {width}x{height}"
        )));
    }
    let row = (width as usize).saturating_mul(format.bytes_per_pixel());
    if height > 0 && stride < row {
        return Err(GfxError::geometry(format!(
            "stride {stride} shorter than a {width}px {format:?} row ({row} bytes)"
        )));
    }
    let Some(need) = required_len(width, height, stride, format) else {
        return Err(GfxError::geometry(format!(
            "{width}x{height} {format:?} at stride {stride} overflows the address space"
        )));
    };
    if len < need {
        return Err(GfxError::geometry(format!(
            "buffer holds {len} bytes, {width}x{height} {format:?} at stride {stride} needs {need}"
        )));
    }
    Ok(())
}

// Byte range of the sub-rectangle `r`, already clipped to a validated image, so every product
// stays below the buffer length.
fn sub_range(r: IntRect, stride: usize, format: PixelFormat) -> std::ops::Range<usize> {
    let start = r.y as usize * stride + r.x as usize * format.bytes_per_pixel();
    start..start + required_len(r.width, r.height, stride, format).unwrap_or(0)
}

/// Read-only view over pixel memory.
///
/// Copying a view copies a slice reference and four scalars; no method allocates or copies pixel
/// data except [`ImageRef::to_image`].
#[derive(Clone, Copy, Debug)]
pub struct ImageRef<'a> {
    data: &'a [u8],
    width: i32,
    height: i32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> ImageRef<'a> {
    /// View `width x height` pixels at the start of `data`, rows `stride` bytes apart.
    pub fn new(
        data: &'a [u8],
        width: i32,
        height: i32,
        stride: usize,
        format: PixelFormat,
    ) -> GfxResult<Self> {
        validate(data.len(), width, height, stride, format)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    // Callers guarantee the buffer already satisfies `validate`.
    pub(crate) fn from_parts(
        data: &'a [u8],
        width: i32,
        height: i32,
        stride: usize,
        format: PixelFormat,
    ) -> Self {
        Self {
            data,
            width,
            height,
            stride,
            format,
        }
    }

    pub fn from_image(image: &'a super::Image) -> Self {
        image.as_ref()
    }

    pub fn empty(format: PixelFormat) -> Self {
        Self {
            data: &[],
            width: 0,
            height: 0,
            stride: 0,
            format,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    pub fn rect(&self) -> IntRect {
        IntRect::new(0, 0, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// All bytes covered by the view, starting at the first pixel.
    pub fn bits(&self) -> &'a [u8] {
        self.data
    }

    /// Pixel bytes of row `y`; empty when `y` is out of range.
    pub fn row(&self, y: i32) -> &'a [u8] {
        self.row_from(0, y)
    }

    /// Row `y` from column `x` to the right edge.
    pub(crate) fn row_from(&self, x: i32, y: i32) -> &'a [u8] {
        if y < 0 || y >= self.height || x < 0 || x >= self.width {
            return &[];
        }
        let bpp = self.format.bytes_per_pixel();
        let start = y as usize * self.stride + x as usize * bpp;
        let end = y as usize * self.stride + self.width as usize * bpp;
        &self.data[start..end]
    }

    /// View of `rect ∩ self.rect()` sharing this memory; empty when they do not meet.
    pub fn sub_image(&self, rect: IntRect) -> ImageRef<'a> {
        let r = rect.intersect(self.rect());
        if r.is_empty() {
            return Self::empty(self.format);
        }
        Self {
            data: &self.data[sub_range(r, self.stride, self.format)],
            width: r.width,
            height: r.height,
            stride: self.stride,
            format: self.format,
        }
    }

    /// Reinterpret the same bytes as `format`.
    pub fn override_format(&self, format: PixelFormat) -> GfxResult<ImageRef<'a>> {
        validate(self.data.len(), self.width, self.height, self.stride, format)
            .map_err(|e| GfxError::format(e.to_string()))?;
        Ok(Self { format, ..*self })
    }

    /// Tightly packed owned copy.
    pub fn to_image(&self) -> super::Image {
        let mut out = super::Image::new(self.width, self.height, self.format);
        let row_bytes = self.width as usize * self.format.bytes_per_pixel();
        for y in 0..self.height {
            out.as_mut().row_mut(y)[..row_bytes].copy_from_slice(self.row(y));
        }
        out
    }
}

/// Writable view over pixel memory.
#[derive(Debug)]
pub struct ImageMut<'a> {
    data: &'a mut [u8],
    width: i32,
    height: i32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> ImageMut<'a> {
    pub fn new(
        data: &'a mut [u8],
        width: i32,
        height: i32,
        stride: usize,
        format: PixelFormat,
    ) -> GfxResult<Self> {
        validate(data.len(), width, height, stride, format)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    pub(crate) fn from_parts(
        data: &'a mut [u8],
        width: i32,
        height: i32,
        stride: usize,
        format: PixelFormat,
    ) -> Self {
        Self {
            data,
            width,
            height,
            stride,
            format,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn size(&self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    pub fn rect(&self) -> IntRect {
        IntRect::new(0, 0, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_ref(&self) -> ImageRef<'_> {
        ImageRef {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
        }
    }

    /// Shorter-lived writable view of the same pixels.
    pub fn reborrow(&mut self) -> ImageMut<'_> {
        ImageMut {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
        }
    }

    pub fn bits_mut(&mut self) -> &mut [u8] {
        self.data
    }

    /// Pixel bytes of row `y`; empty when `y` is out of range.
    pub fn row_mut(&mut self, y: i32) -> &mut [u8] {
        self.row_from_mut(0, y)
    }

    pub(crate) fn row_from_mut(&mut self, x: i32, y: i32) -> &mut [u8] {
        if y < 0 || y >= self.height || x < 0 || x >= self.width {
            return &mut [];
        }
        let bpp = self.format.bytes_per_pixel();
        let start = y as usize * self.stride + x as usize * bpp;
        let end = y as usize * self.stride + self.width as usize * bpp;
        &mut self.data[start..end]
    }

    /// Writable view of `rect ∩ self.rect()`.
    pub fn sub_image_mut(&mut self, rect: IntRect) -> ImageMut<'_> {
        let r = rect.intersect(self.rect());
        if r.is_empty() {
            return ImageMut {
                data: &mut [],
                width: 0,
                height: 0,
                stride: 0,
                format: self.format,
            };
        }
        let range = sub_range(r, self.stride, self.format);
        ImageMut {
            data: &mut self.data[range],
            width: r.width,
            height: r.height,
            stride: self.stride,
            format: self.format,
        }
    }

    /// Consume the view, narrowing it to `rect ∩ self.rect()` for its full lifetime.
    pub fn into_sub_image(self, rect: IntRect) -> ImageMut<'a> {
        let r = rect.intersect(self.rect());
        if r.is_empty() {
            return ImageMut {
                data: &mut [],
                width: 0,
                height: 0,
                stride: 0,
                format: self.format,
            };
        }
        let range = sub_range(r, self.stride, self.format);
        ImageMut {
            data: &mut self.data[range],
            width: r.width,
            height: r.height,
            stride: self.stride,
            format: self.format,
        }
    }

    pub fn override_format(self, format: PixelFormat) -> GfxResult<ImageMut<'a>> {
        validate(self.data.len(), self.width, self.height, self.stride, format)
            .map_err(|e| GfxError::format(e.to_string()))?;
        Ok(ImageMut { format, ..self })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/image/view.rs"]
mod tests;

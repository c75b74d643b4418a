use super::{ImageMut, ImageRef};
use crate::foundation::core::{IntRect, IntSize};
use crate::foundation::error::{GfxError, GfxResult};
use crate::pixel::PixelFormat;
use crate::pixel::fill::{memset_16, memset_32};
use crate::pixel::format::{load16, load32, store16, store32};
use crate::routines::RoutineTable;

/// Heap-owned pixel buffer with 4-byte aligned rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: i32,
    height: i32,
    stride: usize,
    format: PixelFormat,
}

impl Image {
    /// Zero-filled image. Negative sizes are clamped to zero.
    pub fn new(width: i32, height: i32, format: PixelFormat) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let stride = (width as usize * format.bytes_per_pixel()).div_ceil(4) * 4;
        Self {
            data: vec![0; stride * height as usize],
            width,
            height,
            stride,
            format,
        }
    }

    pub fn with_size(size: IntSize, format: PixelFormat) -> Self {
        Self::new(size.width, size.height, format)
    }

    /// Take ownership of existing pixel bytes.
    pub fn from_raw(
        data: Vec<u8>,
        width: i32,
        height: i32,
        stride: usize,
        format: PixelFormat,
    ) -> GfxResult<Self> {
        ImageRef::new(&data, width, height, stride, format)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Tightly packed 32-bit image from `0xAARRGGBB` words in row-major order.
    pub fn from_pixels32(
        width: i32,
        height: i32,
        format: PixelFormat,
        pixels: &[u32],
    ) -> GfxResult<Self> {
        if format.bytes_per_pixel() != 4 {
            return Err(GfxError::format(format!("{format:?} is not a 32-bit format")));
        }
        let data: Vec<u8> = pixels.iter().flat_map(|p| p.to_ne_bytes()).collect();
        Self::from_raw(data, width, height, width.max(0) as usize * 4, format)
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

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn as_ref(&self) -> ImageRef<'_> {
        ImageRef::from_parts(
            &self.data,
            self.width,
            self.height,
            self.stride,
            self.format,
        )
    }

    pub fn as_mut(&mut self) -> ImageMut<'_> {
        ImageMut::from_parts(
            &mut self.data,
            self.width,
            self.height,
            self.stride,
            self.format,
        )
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.stride + x as usize * self.format.bytes_per_pixel())
    }

    /// 32-bit pixel at `(x, y)`; `0` outside the image or for 16-bit formats.
    pub fn pixel32(&self, x: i32, y: i32) -> u32 {
        match (self.format.bytes_per_pixel(), self.index(x, y)) {
            (4, Some(o)) => load32(&self.data[o..], 0),
            _ => 0,
        }
    }

    pub fn set_pixel32(&mut self, x: i32, y: i32, value: u32) {
        if let (4, Some(o)) = (self.format.bytes_per_pixel(), self.index(x, y)) {
            store32(&mut self.data[o..], 0, value);
        }
    }

    /// 5-6-5 pixel at `(x, y)`; `0` outside the image or for 32-bit formats.
    pub fn pixel16(&self, x: i32, y: i32) -> u16 {
        match (self.format.bytes_per_pixel(), self.index(x, y)) {
            (2, Some(o)) => load16(&self.data[o..], 0),
            _ => 0,
        }
    }

    pub fn set_pixel16(&mut self, x: i32, y: i32, value: u16) {
        if let (2, Some(o)) = (self.format.bytes_per_pixel(), self.index(x, y)) {
            store16(&mut self.data[o..], 0, value);
        }
    }

    /// Set every pixel to `value`, truncated to the pixel width.
    pub fn fill(&mut self, value: u32) {
        let width = self.width as usize;
        let wide = self.format.bytes_per_pixel() == 4;
        let mut view = self.as_mut();
        for y in 0..view.height() {
            let row = view.row_mut(y);
            if wide {
                memset_32(row, value, width);
            } else {
                memset_16(row, value as u16, width);
            }
        }
    }

    /// Copy converted to `format` through `routines`' span converters.
    pub fn convert_to(&self, format: PixelFormat, routines: &RoutineTable) -> GfxResult<Image> {
        if format == self.format {
            return Ok(self.clone());
        }
        let convert = routines.converter(self.format, format).ok_or_else(|| {
            GfxError::format(format!(
                "no conversion from {:?} to {format:?}",
                self.format
            ))
        })?;
        let mut out = Image::new(self.width, self.height, format);
        let src = self.as_ref();
        let width = self.width as usize;
        let mut dst = out.as_mut();
        for y in 0..self.height {
            convert(src.row(y), dst.row_mut(y), width);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/image/owned.rs"]
mod tests;

/// Pixel layouts understood by the compositor.
///
/// 32-bit formats hold a native-endian `u32` of the form `0xAARRGGBB`; [`PixelFormat::Rgb16`] holds
/// a native-endian 5-6-5 `u16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 5-6-5 packed RGB.
    Rgb16,
    /// 8-8-8 RGB in a 32-bit word; alpha is ignored on read and written as `0xFF`.
    Rgb32,
    /// Straight (non-premultiplied) ARGB.
    Argb32,
    /// Premultiplied ARGB.
    Argb32Premultiplied,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb16 => 2,
            Self::Rgb32 | Self::Argb32 | Self::Argb32Premultiplied => 4,
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Argb32 | Self::Argb32Premultiplied)
    }

    /// Row index into the compositor's format-pair dispatch tables.
    ///
    /// Straight ARGB is not a raster-path format and has no slot.
    pub(crate) const fn raster_index(self) -> Option<usize> {
        match self {
            Self::Rgb16 => Some(0),
            Self::Rgb32 => Some(1),
            Self::Argb32Premultiplied => Some(2),
            Self::Argb32 => None,
        }
    }
}

#[inline]
pub(crate) fn load16(bytes: &[u8], i: usize) -> u16 {
    let o = i * 2;
    u16::from_ne_bytes([bytes[o], bytes[o + 1]])
}

#[inline]
pub(crate) fn store16(bytes: &mut [u8], i: usize, v: u16) {
    let o = i * 2;
    bytes[o..o + 2].copy_from_slice(&v.to_ne_bytes());
}

#[inline]
pub(crate) fn load32(bytes: &[u8], i: usize) -> u32 {
    let o = i * 4;
    u32::from_ne_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
}

#[inline]
pub(crate) fn store32(bytes: &mut [u8], i: usize, v: u32) {
    let o = i * 4;
    bytes[o..o + 4].copy_from_slice(&v.to_ne_bytes());
}

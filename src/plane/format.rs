use crate::pixel::convert::{rgb16_to_rgb32, rgb32_to_rgb16};

/// Video plane layouts.
///
/// Planar YUV formats are transformed one plane at a time as 8-bit elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaneFormat {
    Rgb32,
    Bgr32,
    Argb32,
    Bgra32,
    Rgb24,
    Bgr24,
    Rgb565,
    Bgr565,
    Y8,
    Yuv420P,
    Yv12,
}

impl PlaneFormat {
    /// Bytes per element.
    pub const fn element_size(self) -> usize {
        match self {
            Self::Rgb32 | Self::Bgr32 | Self::Argb32 | Self::Bgra32 => 4,
            Self::Rgb24 | Self::Bgr24 => 3,
            Self::Rgb565 | Self::Bgr565 => 2,
            Self::Y8 | Self::Yuv420P | Self::Yv12 => 1,
        }
    }

    /// Alpha formats are moved like their opaque counterparts.
    pub(crate) const fn canonical(self) -> Self {
        match self {
            Self::Argb32 => Self::Rgb32,
            Self::Bgra32 => Self::Bgr32,
            other => other,
        }
    }
}

/// Per-element move from a `SRC`-byte source element to a `DST`-byte destination element.
pub(crate) trait Assign {
    const SRC: usize;
    const DST: usize;

    fn assign(src: &[u8], dst: &mut [u8]);
}

pub(crate) struct Same<const N: usize>;

impl<const N: usize> Assign for Same<N> {
    const SRC: usize = N;
    const DST: usize = N;

    #[inline]
    fn assign(src: &[u8], dst: &mut [u8]) {
        dst[..N].copy_from_slice(&src[..N]);
    }
}

/// RGB32 <-> BGR32: all four bytes reversed.
pub(crate) struct Reverse32;

impl Assign for Reverse32 {
    const SRC: usize = 4;
    const DST: usize = 4;

    #[inline]
    fn assign(src: &[u8], dst: &mut [u8]) {
        dst[..4].copy_from_slice(&[src[3], src[2], src[1], src[0]]);
    }
}

/// RGB24 <-> BGR24.
pub(crate) struct Swap24;

impl Assign for Swap24 {
    const SRC: usize = 3;
    const DST: usize = 3;

    #[inline]
    fn assign(src: &[u8], dst: &mut [u8]) {
        dst[..3].copy_from_slice(&[src[2], src[1], src[0]]);
    }
}

pub(crate) struct Rgb32To565;

impl Assign for Rgb32To565 {
    const SRC: usize = 4;
    const DST: usize = 2;

    #[inline]
    fn assign(src: &[u8], dst: &mut [u8]) {
        let v = u32::from_ne_bytes([src[0], src[1], src[2], src[3]]);
        dst[..2].copy_from_slice(&rgb32_to_rgb16(v).to_ne_bytes());
    }
}

pub(crate) struct Rgb565To32;

impl Assign for Rgb565To32 {
    const SRC: usize = 2;
    const DST: usize = 4;

    #[inline]
    fn assign(src: &[u8], dst: &mut [u8]) {
        let v = u16::from_ne_bytes([src[0], src[1]]);
        dst[..4].copy_from_slice(&rgb16_to_rgb32(v).to_ne_bytes());
    }
}

/// RGB32 to RGB24 keeps the first three bytes of each word.
pub(crate) struct Rgb32To24;

impl Assign for Rgb32To24 {
    const SRC: usize = 4;
    const DST: usize = 3;

    #[inline]
    fn assign(src: &[u8], dst: &mut [u8]) {
        dst[..3].copy_from_slice(&src[..3]);
    }
}

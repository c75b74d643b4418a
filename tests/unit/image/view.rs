use super::*;
use crate::foundation::error::GfxError;

fn ramp(width: i32, height: i32) -> Vec<u8> {
    (0..width * height)
        .flat_map(|i| (i as u32).to_ne_bytes())
        .collect()
}

#[test]
fn short_buffer_is_rejected() {
    let data = vec![0u8; 15];
    let err = ImageRef::new(&data, 2, 2, 8, PixelFormat::Rgb32).unwrap_err();
    assert!(matches!(err, GfxError::Geometry(_)));
}

#[test]
fn last_row_may_omit_padding() {
    let data = vec![0u8; 16 + 8];
    let view = ImageRef::new(&data, 2, 2, 16, PixelFormat::Rgb32).unwrap();
    assert_eq!(view.row(1).len(), 8);
}

#[test]
fn narrow_stride_is_rejected() {
    let data = vec![0u8; 64];
    assert!(ImageRef::new(&data, 4, 2, 12, PixelFormat::Rgb32).is_err());
}

#[test]
fn sub_image_clips_and_shares_rows() {
    let data = ramp(4, 3);
    let view = ImageRef::new(&data, 4, 3, 16, PixelFormat::Rgb32).unwrap();
    let sub = view.sub_image(IntRect::new(2, 1, 10, 10));
    assert_eq!(sub.size(), IntSize::new(2, 2));
    assert_eq!(sub.stride(), 16);
    assert_eq!(&sub.row(0)[..4], &6u32.to_ne_bytes());
    assert_eq!(&sub.row(1)[4..8], &11u32.to_ne_bytes());
}

#[test]
fn sub_image_of_sub_image_composes() {
    let data = ramp(8, 8);
    let view = ImageRef::new(&data, 8, 8, 32, PixelFormat::Rgb32).unwrap();
    let r1 = IntRect::new(1, 2, 5, 5);
    let r2 = IntRect::new(2, -1, 4, 3);
    let nested = view.sub_image(r1).sub_image(r2);
    let direct = view.sub_image(r2.translated(r1.x, r1.y).intersect(r1));
    assert_eq!(nested.size(), direct.size());
    for y in 0..nested.height() {
        assert_eq!(nested.row(y), direct.row(y));
    }
}

#[test]
fn disjoint_sub_image_is_empty() {
    let data = ramp(2, 2);
    let view = ImageRef::new(&data, 2, 2, 8, PixelFormat::Rgb32).unwrap();
    assert!(view.sub_image(IntRect::new(5, 5, 2, 2)).is_empty());
    assert!(view.row(7).is_empty());
}

#[test]
fn override_format_checks_new_width() {
    let data = vec![0u8; 8];
    let view = ImageRef::new(&data, 4, 1, 8, PixelFormat::Rgb16).unwrap();
    assert!(view.override_format(PixelFormat::Rgb32).is_err());
    let again = view.override_format(PixelFormat::Rgb16).unwrap();
    assert_eq!(again.format(), PixelFormat::Rgb16);
}

#[test]
fn writes_through_sub_view_land_in_parent() {
    let mut data = vec![0u8; 3 * 3 * 2];
    let mut view = ImageMut::new(&mut data, 3, 3, 6, PixelFormat::Rgb16).unwrap();
    {
        let mut sub = view.sub_image_mut(IntRect::new(1, 1, 2, 2));
        sub.row_mut(1)[2..4].copy_from_slice(&0xF800u16.to_ne_bytes());
    }
    assert_eq!(&view.as_ref().row(2)[4..6], &0xF800u16.to_ne_bytes());
}

#[test]
fn to_image_is_detached() {
    let mut data = ramp(2, 2);
    let snapshot = {
        let view = ImageRef::new(&data, 2, 2, 8, PixelFormat::Argb32Premultiplied).unwrap();
        view.to_image()
    };
    data.fill(0xEE);
    assert_eq!(snapshot.pixel32(1, 1), 3);
}

#[test]
fn override_format_failure_is_a_format_error() {
    let data = vec![0u8; 8];
    let view = ImageRef::new(&data, 4, 1, 8, PixelFormat::Rgb16).unwrap();
    let err = view.override_format(PixelFormat::Argb32).unwrap_err();
    assert!(matches!(err, GfxError::Format(_)));
}

#[test]
fn overflowing_geometry_is_rejected() {
    let data = [0u8; 16];
    let huge = usize::MAX / 2 + 1;
    let err = ImageRef::new(&data, 1, 3, huge, PixelFormat::Rgb32).unwrap_err();
    assert!(matches!(err, GfxError::Geometry(_)), "{err}");

    let mut buf = [0u8; 16];
    let err = ImageMut::new(&mut buf, 1, 3, usize::MAX, PixelFormat::Rgb16).unwrap_err();
    assert!(matches!(err, GfxError::Geometry(_)), "{err}");
}

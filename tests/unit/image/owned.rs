use super::*;

#[test]
fn rows_are_four_byte_aligned() {
    let img = Image::new(3, 2, PixelFormat::Rgb16);
    assert_eq!(img.stride(), 8);
    assert_eq!(img.data().len(), 16);
    assert!(img.data().iter().all(|b| *b == 0));
}

#[test]
fn pixel_accessors_respect_format_and_bounds() {
    let mut img = Image::new(2, 2, PixelFormat::Rgb32);
    img.set_pixel32(1, 1, 0xFF11_2233);
    img.set_pixel32(5, 0, 0xFFFF_FFFF);
    img.set_pixel16(0, 0, 0xFFFF);
    assert_eq!(img.pixel32(1, 1), 0xFF11_2233);
    assert_eq!(img.pixel32(0, 0), 0);
    assert_eq!(img.pixel32(-1, 0), 0);
    assert_eq!(img.pixel16(1, 1), 0);
}

#[test]
fn fill_covers_every_row() {
    let mut img = Image::new(3, 3, PixelFormat::Rgb16);
    img.fill(0x07E0);
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(img.pixel16(x, y), 0x07E0);
        }
    }
}

#[test]
fn from_pixels32_rejects_16bit_formats() {
    assert!(Image::from_pixels32(1, 1, PixelFormat::Rgb16, &[0]).is_err());
    assert!(Image::from_pixels32(2, 2, PixelFormat::Rgb32, &[0; 3]).is_err());
}

#[test]
fn convert_rgb32_to_rgb16_and_back() {
    let routines = RoutineTable::portable();
    let img = Image::from_pixels32(2, 1, PixelFormat::Rgb32, &[0xFFFF_0000, 0xFF00_FF00]).unwrap();
    let small = img.convert_to(PixelFormat::Rgb16, &routines).unwrap();
    assert_eq!(small.pixel16(0, 0), 0xF800);
    assert_eq!(small.pixel16(1, 0), 0x07E0);
    let back = small.convert_to(PixelFormat::Rgb32, &routines).unwrap();
    assert_eq!(back.pixel32(0, 0), 0xFFFF_0000);
    assert_eq!(back.pixel32(1, 0), 0xFF00_FF00);
}

#[test]
fn convert_straight_to_premultiplied() {
    let routines = RoutineTable::portable();
    let img = Image::from_pixels32(1, 1, PixelFormat::Argb32, &[0x80FF_FFFF]).unwrap();
    let p = img
        .convert_to(PixelFormat::Argb32Premultiplied, &routines)
        .unwrap();
    assert_eq!(p.pixel32(0, 0), 0x8080_8080);
}

#[test]
fn unsupported_conversion_is_a_format_error() {
    let routines = RoutineTable::portable();
    let img = Image::new(1, 1, PixelFormat::Argb32Premultiplied);
    let err = img.convert_to(PixelFormat::Argb32, &routines).unwrap_err();
    assert!(matches!(err, GfxError::Format(_)));
}

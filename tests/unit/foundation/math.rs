use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn byte_mul_scales_every_lane() {
    assert_eq!(byte_mul(0xFFFF_FFFF, 256), 0xFFFF_FFFF);
    assert_eq!(byte_mul(0xFFFF_FFFF, 0), 0);
    assert_eq!(byte_mul(0x8040_2010, 128), 0x4020_1008);
}

#[test]
fn opacity_mul_endpoints() {
    assert_eq!(opacity_mul(0xFF, 77), 77);
    assert_eq!(opacity_mul(0, 200), 0);
    assert_eq!(opacity_mul(127, 255), 127);
}

#[test]
fn opacity_to_u8_truncates_between_endpoints() {
    assert_eq!(opacity_to_u8(1.0), 255);
    assert_eq!(opacity_to_u8(0.0), 0);
    assert_eq!(opacity_to_u8(0.5), 127);
    assert_eq!(opacity_to_u8(-3.0), 0);
    assert_eq!(opacity_to_u8(f32::NAN), 0);
}

#[test]
fn fixed_point_conversion_rounds() {
    assert_eq!(to_fixed(1.0), FIXED_ONE);
    assert_eq!(to_fixed(0.5), FIXED_HALF);
    assert_eq!(to_fixed(-1.5), -0x1_8000);
}

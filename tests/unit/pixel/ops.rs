use super::*;
use crate::pixel::convert::{color_rgb32_rgb16, rgb16_to_rgb32};

fn words32(px: &[u32]) -> Vec<u8> {
    px.iter().flat_map(|p| p.to_ne_bytes()).collect()
}

fn words16(px: &[u16]) -> Vec<u8> {
    px.iter().flat_map(|p| p.to_ne_bytes()).collect()
}

fn sample_premul() -> Vec<u32> {
    vec![0xFFFF_0000, 0x8040_2010, 0x0000_0000, 0x7F7F_7F7F, 0x0101_0000]
}

#[test]
fn red_over_white_at_half_opacity() {
    let out = over_argb32p_rgb32(0xFFFF_FFFF, 0xFFFF_0000, 128);
    assert_eq!(out >> 24, 0xFF);
    assert_eq!((out >> 16) & 0xFF, 0xFF);
    let g = ((out >> 8) & 0xFF) as i32;
    let b = (out & 0xFF) as i32;
    assert!((g - 128).abs() <= 1, "g = {g}");
    assert!((b - 128).abs() <= 1, "b = {b}");
}

#[test]
fn zero_opacity_blend_is_noop() {
    let src = words32(&sample_premul());

    let mut d32 = words32(&[0x1234_5678, 0, 0xFFFF_FFFF, 0x00AB_CDEF, 0x8000_0001]);
    let before = d32.clone();
    blend_argb32p_rgb32(&mut d32, &src, 0, 5);
    assert_eq!(d32, before);
    blend_argb32p_argb32p(&mut d32, &src, 0, 5);
    assert_eq!(d32, before);

    let mut d16 = words16(&[0xF800, 0x07E0, 0x001F, 0xFFFF, 0x1234]);
    let before16 = d16.clone();
    blend_argb32p_rgb16(&mut d16, &src, 0, 5);
    assert_eq!(d16, before16);

    let alpha = [255u8; 5];
    blend_rgba16_rgb16(&mut d16, &words16(&[1, 2, 3, 4, 5]), &alpha, 0, 5);
    assert_eq!(d16, before16);
}

#[test]
fn full_opacity_opaque_blend_equals_conversion() {
    let src_px = [0xFF12_3456u32, 0xFFFF_FFFF, 0xFF00_0000, 0xFF80_40C0];
    let src = words32(&src_px);

    let mut d32 = words32(&[0xFF00_FF00; 4]);
    blend_argb32p_rgb32(&mut d32, &src, 0xFF, 4);
    assert_eq!(d32, src);

    let mut d16 = words16(&[0x1234; 4]);
    blend_argb32p_rgb16(&mut d16, &src, 0xFF, 4);
    let mut converted = vec![0u8; 8];
    color_rgb32_rgb16(&src, &mut converted, 4);
    assert_eq!(d16, converted);
}

#[test]
fn copy_variants_match_in_place() {
    let src = words32(&sample_premul());
    let dest = words32(&[0xFF10_2030, 0xFF40_5060, 0xFF70_8090, 0xFFA0_B0C0, 0xFFD0_E0F0]);

    for op in [1u8, 77, 128, 254, 255] {
        let mut in_place = dest.clone();
        blend_argb32p_rgb32(&mut in_place, &src, op, 5);
        let mut out = vec![0u8; dest.len()];
        blend_argb32p_rgb32_out(&dest, &src, op, 5, &mut out);
        assert_eq!(in_place, out, "rgb32 op {op}");

        let mut in_place = dest.clone();
        blend_argb32p_argb32p(&mut in_place, &src, op, 5);
        let mut out = vec![0u8; dest.len()];
        blend_argb32p_argb32p_out(&dest, &src, op, 5, &mut out);
        assert_eq!(in_place, out, "argb32p op {op}");

        let d16 = words16(&[0xF800, 0x07E0, 0x001F, 0xFFFF, 0x0000]);
        let mut in_place = d16.clone();
        blend_argb32p_rgb16(&mut in_place, &src, op, 5);
        let mut out = vec![0u8; d16.len()];
        blend_argb32p_rgb16_out(&d16, &src, op, 5, &mut out);
        assert_eq!(in_place, out, "rgb16 op {op}");
    }
}

#[test]
fn blend_color_special_cases() {
    let dest = words32(&[0xFF11_2233; 3]);

    let mut d = dest.clone();
    blend_color_rgb32(&mut d, 0x00FF_FFFF, 3);
    assert_eq!(d, dest);

    blend_color_rgb32(&mut d, 0xFFAB_CDEF, 3);
    assert_eq!(d, words32(&[0xFFAB_CDEF; 3]));

    let mut d16 = words16(&[0x1111; 2]);
    blend_color_rgb16(&mut d16, 0xFF00_0000, 2);
    assert_eq!(d16, words16(&[0x0000; 2]));

    let mut d = words32(&[0x0000_0000; 2]);
    blend_color_argb32p(&mut d, 0x8080_0000, 2);
    assert_eq!(d, words32(&[0x8080_0000; 2]));
}

#[test]
fn blend_color_copy_variant_matches() {
    let dest = words32(&[0xFF11_2233, 0xFFFF_FFFF]);
    let mut in_place = dest.clone();
    blend_color_rgb32(&mut in_place, 0x8040_0000, 2);
    let mut out = vec![0u8; 8];
    blend_color_rgb32_out(&dest, 0x8040_0000, 2, &mut out);
    assert_eq!(in_place, out);

    let d16 = words16(&[0x1234, 0xFFFF]);
    let mut in_place = d16.clone();
    blend_color_rgb16(&mut in_place, 0x8040_0000, 2);
    let mut out = vec![0u8; 4];
    blend_color_rgb16_out(&d16, 0x8040_0000, 2, &mut out);
    assert_eq!(in_place, out);
}

#[test]
fn rgba16_alpha_array_selects_per_pixel() {
    let src = words16(&[0xF800, 0xF800, 0xF800]);
    let mut dest = words16(&[0x001F, 0x001F, 0x001F]);
    blend_rgba16_rgb16(&mut dest, &src, &[0, 255, 128], 255, 3);

    let px = |i: usize| u16::from_ne_bytes([dest[i * 2], dest[i * 2 + 1]]);
    assert_eq!(px(0), 0x001F);
    assert_eq!(px(1), 0xF800);
    let mixed = rgb16_to_rgb32(px(2));
    assert!((mixed >> 16) & 0xFF > 0x70);
    assert!(mixed & 0xFF > 0x70);
}

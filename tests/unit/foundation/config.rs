use super::*;
use std::collections::HashMap;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

#[test]
fn empty_environment_is_default() {
    assert_eq!(GfxConfig::from_lookup(lookup(&[])), GfxConfig::default());
}

#[test]
fn flags_accept_any_non_false_value() {
    let cfg = GfxConfig::from_lookup(lookup(&[
        ("GFX_FORCE_FALLBACK", "1"),
        ("GFX_REPORT_HAZARDS", "yes"),
        ("GFX_CANVAS_FULL_UPDATE", "0"),
        ("GFX_SHOW_IMAGE_BOUNDS", "false"),
        ("GFX_REFLECTION_NO_BLUR", ""),
    ]));
    assert!(cfg.force_fallback);
    assert!(cfg.report_hazards);
    assert!(!cfg.canvas_full_update);
    assert!(!cfg.show_image_bounds);
    assert!(!cfg.reflection_no_blur);
}

#[test]
fn routines_name_is_trimmed_and_blank_is_none() {
    let cfg = GfxConfig::from_lookup(lookup(&[("GFX_ROUTINES", " packed ")]));
    assert_eq!(cfg.routines.as_deref(), Some("packed"));

    let cfg = GfxConfig::from_lookup(lookup(&[("GFX_ROUTINES", "  ")]));
    assert_eq!(cfg.routines, None);
}

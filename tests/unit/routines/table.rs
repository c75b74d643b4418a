use super::*;

struct Poison;

impl RoutineBackend for Poison {
    fn name(&self) -> &str {
        "poison"
    }

    fn install(&self, table: &mut RoutineTable) {
        fn poison_memset_32(dest: &mut [u8], _value: u32, count: usize) {
            dest[..count * 4].fill(0xAB);
        }
        table.memset_32 = poison_memset_32;
    }
}

#[test]
fn no_name_keeps_portable_kernels() {
    let t = RoutineTable::init(None, &BackendRegistry::default()).unwrap();
    assert_eq!(t.backend_name(), "portable");
    assert!(!t.force_fallback());
    assert!(!t.hazards().enabled());
}

#[test]
fn unknown_backend_is_a_plugin_error() {
    let err = RoutineTable::init(Some("neon9000"), &BackendRegistry::default()).unwrap_err();
    assert!(matches!(err, GfxError::Plugin(_)));
    assert!(err.to_string().contains("neon9000"));
}

#[test]
fn from_config_degrades_to_portable_and_keeps_flags() {
    let cfg = GfxConfig {
        routines: Some("missing".to_string()),
        force_fallback: true,
        report_hazards: true,
        ..GfxConfig::default()
    };
    let t = RoutineTable::from_config(&cfg, &BackendRegistry::default());
    assert_eq!(t.backend_name(), "portable");
    assert!(t.force_fallback());
    assert!(t.hazards().enabled());
}

#[test]
fn registered_backend_overrides_only_its_slots() {
    let mut reg = BackendRegistry::default();
    reg.register(Box::new(Poison));
    let t = RoutineTable::init(Some("poison"), &reg).unwrap();

    let mut buf = vec![0u8; 8];
    (t.memset_32)(&mut buf, 0x0102_0304, 2);
    assert_eq!(buf, vec![0xAB; 8]);

    let mut buf16 = vec![0u8; 4];
    (t.memset_16)(&mut buf16, 0x1234, 2);
    assert_eq!(buf16, [0x1234u16.to_ne_bytes(), 0x1234u16.to_ne_bytes()].concat());
}

#[test]
fn packed_backend_matches_portable_on_opaque_and_transparent() {
    let packed = RoutineTable::init(Some("packed"), &BackendRegistry::default()).unwrap();
    let portable = RoutineTable::portable();
    assert_eq!(packed.backend_name(), "packed");

    for color in [0xFF12_3456u32, 0x0000_0000] {
        let mut a: Vec<u8> = [0xFF80_8080u32; 3].iter().flat_map(|p| p.to_ne_bytes()).collect();
        let mut b = a.clone();
        (packed.blend_color_rgb32)(&mut a, color, 3);
        (portable.blend_color_rgb32)(&mut b, color, 3);
        assert_eq!(a, b);

        let mut a: Vec<u8> = [0x8410u16; 3].iter().flat_map(|p| p.to_ne_bytes()).collect();
        let mut b = a.clone();
        (packed.blend_color_rgb16)(&mut a, color, 3);
        (portable.blend_color_rgb16)(&mut b, color, 3);
        assert_eq!(a, b);
    }
}

#[test]
fn packed_translucent_blend_stays_close_to_portable() {
    let packed = RoutineTable::init(Some("packed"), &BackendRegistry::default()).unwrap();
    let portable = RoutineTable::portable();
    let color = 0x8040_2010u32;

    let mut a = 0xFFC0_C0C0u32.to_ne_bytes().to_vec();
    let mut b = a.clone();
    (packed.blend_color_rgb32)(&mut a, color, 1);
    (portable.blend_color_rgb32)(&mut b, color, 1);
    for i in 0..4 {
        assert!((i32::from(a[i]) - i32::from(b[i])).abs() <= 1, "lane {i}");
    }
}

#[test]
fn registry_names_are_unique() {
    let mut reg = BackendRegistry::default();
    reg.register(Box::new(PackedBackend));
    let names = reg.names();
    assert_eq!(names.iter().filter(|n| **n == "packed").count(), 1);
    assert!(reg.get("PORTABLE").is_some());
}

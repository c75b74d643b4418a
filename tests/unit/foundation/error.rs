use super::*;

#[test]
fn each_kind_names_its_layer() {
    let cases = [
        (GfxError::geometry("stride 3 < 4"), "geometry error: stride 3 < 4"),
        (GfxError::format("Y8 -> Rgb32"), "format error: Y8 -> Rgb32"),
        (GfxError::plugin("no backend `neon`"), "routine backend error: no backend `neon`"),
        (GfxError::fallback("70000x1"), "fallback renderer error: 70000x1"),
    ];
    for (err, text) in cases {
        assert_eq!(err.to_string(), text);
    }
}

#[test]
fn anyhow_errors_convert_through_question_mark() {
    fn load() -> GfxResult<()> {
        Err(anyhow::anyhow!("short plane buffer"))?
    }
    let err = load().unwrap_err();
    assert!(matches!(err, GfxError::Other(_)));
    assert_eq!(err.to_string(), "short plane buffer");
}

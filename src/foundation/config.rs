use std::sync::OnceLock;

/// Process configuration read from the environment.
///
/// Every field has an environment variable; see [`GfxConfig::from_env`]. Tests and embedders can
/// build the struct directly instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GfxConfig {
    /// `GFX_ROUTINES`: name of the routine backend to install.
    pub routines: Option<String>,
    /// `GFX_FORCE_FALLBACK`: route every draw through the vector fallback.
    pub force_fallback: bool,
    /// `GFX_REPORT_HAZARDS`: warn once per slow blend combination.
    pub report_hazards: bool,
    /// `GFX_CANVAS_FULL_UPDATE`: canvases repaint the whole surface each frame.
    pub canvas_full_update: bool,
    /// `GFX_SHOW_IMAGE_BOUNDS`: overlay canvas image bounds.
    pub show_image_bounds: bool,
    /// `GFX_REFLECTION_NO_BLUR`: skip the blur pass of canvas reflections.
    pub reflection_no_blur: bool,
}

impl GfxConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| lookup(key).map(|v| parse_flag(&v)).unwrap_or(false);
        Self {
            routines: lookup("GFX_ROUTINES")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            force_fallback: flag("GFX_FORCE_FALLBACK"),
            report_hazards: flag("GFX_REPORT_HAZARDS"),
            canvas_full_update: flag("GFX_CANVAS_FULL_UPDATE"),
            show_image_bounds: flag("GFX_SHOW_IMAGE_BOUNDS"),
            reflection_no_blur: flag("GFX_REFLECTION_NO_BLUR"),
        }
    }

    /// Environment configuration, read on first use and cached for the process lifetime.
    pub fn global() -> &'static GfxConfig {
        static CONFIG: OnceLock<GfxConfig> = OnceLock::new();
        CONFIG.get_or_init(GfxConfig::from_env)
    }
}

fn parse_flag(v: &str) -> bool {
    let v = v.trim();
    !(v.is_empty() || v == "0" || v.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;

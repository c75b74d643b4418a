use std::sync::atomic::{AtomicU32, Ordering};

/// Blend combinations that work but take a slow multi-pass route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hazard {
    /// RGB16 source onto an RGB32 destination at partial opacity.
    BlendRgb16OverRgb32WithOpacity,
    /// RGB16 source onto an RGB16 destination at partial opacity.
    BlendRgb16OverRgb16WithOpacity,
}

impl Hazard {
    fn bit(self) -> u32 {
        match self {
            Self::BlendRgb16OverRgb32WithOpacity => 1 << 0,
            Self::BlendRgb16OverRgb16WithOpacity => 1 << 1,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::BlendRgb16OverRgb32WithOpacity => "blend RGB16 onto RGB32 with opacity",
            Self::BlendRgb16OverRgb16WithOpacity => "blend RGB16 onto RGB16 with opacity",
        }
    }
}

/// Logs each [`Hazard`] kind at most once per reporter, when enabled.
#[derive(Debug)]
pub struct HazardReporter {
    enabled: bool,
    seen: AtomicU32,
}

impl HazardReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            seen: AtomicU32::new(0),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Record `hazard`; returns `true` only for the call that emitted the warning.
    pub fn report(&self, hazard: Hazard) -> bool {
        if !self.enabled {
            return false;
        }
        let prev = self.seen.fetch_or(hazard.bit(), Ordering::Relaxed);
        if prev & hazard.bit() != 0 {
            return false;
        }
        tracing::warn!(hazard = hazard.describe(), "gfx painter performance hazard");
        true
    }

    pub fn was_reported(&self, hazard: Hazard) -> bool {
        self.seen.load(Ordering::Relaxed) & hazard.bit() != 0
    }
}

impl Clone for HazardReporter {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            seen: AtomicU32::new(self.seen.load(Ordering::Relaxed)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/routines/hazard.rs"]
mod tests;

//! Swappable kernel dispatch.
//!
//! [`RoutineTable`] holds one function pointer per pixel kernel. It starts out pointing at the
//! portable implementations in [`crate::pixel`]; a [`RoutineBackend`] chosen by name may replace
//! any subset of the slots. Tables are plain values handed to painters and blitters by reference,
//! so tests can install fake kernels without touching process state.

mod backend;
mod hazard;

use std::sync::OnceLock;

pub use backend::{BackendRegistry, PackedBackend, PortableBackend, RoutineBackend};
pub use hazard::{Hazard, HazardReporter};

use crate::foundation::config::GfxConfig;
use crate::foundation::error::{GfxError, GfxResult};
use crate::pixel::{PixelFormat, blur, convert, fill, ops};

pub type BlendFn = fn(&mut [u8], &[u8], u8, usize);
pub type BlendOutFn = fn(&[u8], &[u8], u8, usize, &mut [u8]);
pub type AlphaBlendFn = fn(&mut [u8], &[u8], &[u8], u8, usize);
pub type BlendColorFn = fn(&mut [u8], u32, usize);
pub type BlendColorOutFn = fn(&[u8], u32, usize, &mut [u8]);
pub type ConvertFn = fn(&[u8], &mut [u8], usize);
pub type AlphaConvertFn = fn(&[u8], &[u8], &mut [u8], usize);
pub type Memset8Fn = fn(&mut [u8], u8, usize);
pub type Memset16Fn = fn(&mut [u8], u16, usize);
pub type Memset32Fn = fn(&mut [u8], u32, usize);
pub type MemcpyFn = fn(&mut [u8], &[u8], usize);
pub type BlurFn = fn(&mut [u8], usize, usize, usize, PixelFormat, i32);

#[derive(Clone, Debug)]
pub struct RoutineTable {
    pub blend_argb32p_rgb32: BlendFn,
    pub blend_argb32p_rgb32_out: BlendOutFn,
    pub blend_argb32p_rgb16: BlendFn,
    pub blend_argb32p_rgb16_out: BlendOutFn,
    pub blend_argb32p_argb32p: BlendFn,
    pub blend_argb32p_argb32p_out: BlendOutFn,
    pub blend_rgba16_rgb16: AlphaBlendFn,

    pub blend_color_rgb32: BlendColorFn,
    pub blend_color_rgb32_out: BlendColorOutFn,
    pub blend_color_rgb16: BlendColorFn,
    pub blend_color_rgb16_out: BlendColorOutFn,
    pub blend_color_argb32p: BlendColorFn,

    pub color_rgb16_rgb32: ConvertFn,
    pub color_rgb32_rgb16: ConvertFn,
    pub color_rgb32_argb32p: ConvertFn,
    pub premultiply_argb32: ConvertFn,
    pub color_rgba16_argb32p: AlphaConvertFn,
    pub color_argb32p_rgba8: ConvertFn,
    pub color_rgba8_argb32p: ConvertFn,

    pub memset_8: Memset8Fn,
    pub memset_16: Memset16Fn,
    pub memset_32: Memset32Fn,
    pub memcpy: MemcpyFn,

    pub blur: BlurFn,

    backend: String,
    force_fallback: bool,
    hazards: HazardReporter,
}

impl Default for RoutineTable {
    fn default() -> Self {
        Self::portable()
    }
}

impl RoutineTable {
    /// Portable kernels, debug flags off.
    pub fn portable() -> Self {
        Self {
            blend_argb32p_rgb32: ops::blend_argb32p_rgb32,
            blend_argb32p_rgb32_out: ops::blend_argb32p_rgb32_out,
            blend_argb32p_rgb16: ops::blend_argb32p_rgb16,
            blend_argb32p_rgb16_out: ops::blend_argb32p_rgb16_out,
            blend_argb32p_argb32p: ops::blend_argb32p_argb32p,
            blend_argb32p_argb32p_out: ops::blend_argb32p_argb32p_out,
            blend_rgba16_rgb16: ops::blend_rgba16_rgb16,

            blend_color_rgb32: ops::blend_color_rgb32,
            blend_color_rgb32_out: ops::blend_color_rgb32_out,
            blend_color_rgb16: ops::blend_color_rgb16,
            blend_color_rgb16_out: ops::blend_color_rgb16_out,
            blend_color_argb32p: ops::blend_color_argb32p,

            color_rgb16_rgb32: convert::color_rgb16_rgb32,
            color_rgb32_rgb16: convert::color_rgb32_rgb16,
            color_rgb32_argb32p: convert::color_rgb32_argb32p,
            premultiply_argb32: convert::premultiply_argb32,
            color_rgba16_argb32p: convert::color_rgba16_argb32p,
            color_argb32p_rgba8: convert::color_argb32p_rgba8,
            color_rgba8_argb32p: convert::color_rgba8_argb32p,

            memset_8: fill::memset_8,
            memset_16: fill::memset_16,
            memset_32: fill::memset_32,
            memcpy: fill::memcpy,

            blur: blur::blur,

            backend: PortableBackend::NAME.to_string(),
            force_fallback: false,
            hazards: HazardReporter::new(false),
        }
    }

    /// Portable table with `name`'s overrides installed. `None` keeps the portable kernels.
    pub fn init(name: Option<&str>, registry: &BackendRegistry) -> GfxResult<Self> {
        let mut table = Self::portable();
        let Some(name) = name else {
            return Ok(table);
        };
        let backend = registry.get(name).ok_or_else(|| {
            GfxError::plugin(format!(
                "unknown routine backend '{name}' (available: {})",
                registry.names().join(", ")
            ))
        })?;
        backend.install(&mut table);
        table.backend = backend.name().to_string();
        tracing::debug!(backend = %table.backend, "installed routine backend");
        Ok(table)
    }

    /// Table for `config`. A backend that cannot be installed is logged and the portable
    /// kernels are kept.
    pub fn from_config(config: &GfxConfig, registry: &BackendRegistry) -> Self {
        let table = match Self::init(config.routines.as_deref(), registry) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "keeping portable routines");
                Self::portable()
            }
        };
        table.with_debug_flags(config.force_fallback, config.report_hazards)
    }

    /// Process-wide table built once from [`GfxConfig::global`] and the built-in backends.
    pub fn global() -> &'static RoutineTable {
        static TABLE: OnceLock<RoutineTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            RoutineTable::from_config(GfxConfig::global(), &BackendRegistry::default())
        })
    }

    pub fn with_debug_flags(mut self, force_fallback: bool, report_hazards: bool) -> Self {
        self.force_fallback = force_fallback;
        self.hazards = HazardReporter::new(report_hazards);
        self
    }

    pub fn backend_name(&self) -> &str {
        &self.backend
    }

    /// Every painter built on this table uses the vector fallback.
    pub fn force_fallback(&self) -> bool {
        self.force_fallback
    }

    pub fn hazards(&self) -> &HazardReporter {
        &self.hazards
    }

    /// Span converter from `src` to `dst` pixels.
    ///
    /// `None` when the formats are equal (copy the bytes instead) or when no kernel handles
    /// the pair.
    pub fn converter(&self, src: PixelFormat, dst: PixelFormat) -> Option<ConvertFn> {
        use PixelFormat::*;
        match (src, dst) {
            (Rgb16, Rgb32 | Argb32 | Argb32Premultiplied) => Some(self.color_rgb16_rgb32),
            (Rgb32 | Argb32Premultiplied, Rgb16) => Some(self.color_rgb32_rgb16),
            (Rgb32, Argb32 | Argb32Premultiplied) | (Argb32Premultiplied, Rgb32) => {
                Some(self.color_rgb32_argb32p)
            }
            (Argb32, Argb32Premultiplied | Rgb32) => Some(self.premultiply_argb32),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/routines/table.rs"]
mod tests;

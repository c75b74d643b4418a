use std::collections::HashMap;

use vello_cpu::Pixmap;

use crate::foundation::error::{GfxError, GfxResult};

/// Limits for scratch pixmaps kept between fallback draws.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SurfacePoolOpts {
    /// Bytes kept across every size.
    pub(crate) byte_budget: usize,
    /// Pixmaps kept per size.
    pub(crate) per_size: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            byte_budget: 64 << 20,
            per_size: 4,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PoolCounters {
    pub(crate) kept: usize,
    pub(crate) kept_bytes: usize,
    pub(crate) created: u64,
    pub(crate) discarded: u64,
}

fn pixmap_bytes(w: u16, h: u16) -> usize {
    usize::from(w) * usize::from(h) * 4
}

/// Scratch RGBA8 pixmaps for the fallback path, stacked per size.
///
/// A pixmap from `take` still holds whatever the last draw left in it.
pub(crate) struct SurfacePool {
    opts: SurfacePoolOpts,
    counters: PoolCounters,
    by_size: HashMap<(u16, u16), Vec<Pixmap>>,
}

impl SurfacePool {
    pub(crate) fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            counters: PoolCounters::default(),
            by_size: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn counters(&self) -> PoolCounters {
        self.counters
    }

    #[cfg(test)]
    pub(crate) fn sizes_held(&self) -> usize {
        self.by_size.len()
    }

    /// `width x height` pixmap; vello_cpu sizes are `u16`, so larger sides are an error.
    pub(crate) fn take(&mut self, width: u32, height: u32) -> GfxResult<Pixmap> {
        let side = |v: u32| {
            u16::try_from(v).map_err(|_| {
                GfxError::fallback(format!("scratch surface {width}x{height} too large"))
            })
        };
        let (w, h) = (side(width)?, side(height)?);

        if let Some(stack) = self.by_size.get_mut(&(w, h))
            && let Some(pixmap) = stack.pop()
        {
            if stack.is_empty() {
                self.by_size.remove(&(w, h));
            }
            self.counters.kept -= 1;
            self.counters.kept_bytes -= pixmap_bytes(w, h);
            return Ok(pixmap);
        }
        self.counters.created += 1;
        tracing::debug!(
            created = self.counters.created,
            kept = self.counters.kept,
            "new scratch surface {w}x{h}"
        );
        Ok(Pixmap::new(w, h))
    }

    /// Keep `pixmap` for a later `take` unless a limit says otherwise.
    pub(crate) fn give_back(&mut self, pixmap: Pixmap) {
        let (w, h) = (pixmap.width(), pixmap.height());
        let bytes = pixmap_bytes(w, h);
        let stacked = self.by_size.get(&(w, h)).map_or(0, Vec::len);
        if stacked >= self.opts.per_size || self.counters.kept_bytes + bytes > self.opts.byte_budget
        {
            self.counters.discarded += 1;
            tracing::debug!(
                discarded = self.counters.discarded,
                kept_bytes = self.counters.kept_bytes,
                "scratch surface dropped"
            );
            return;
        }
        self.by_size.entry((w, h)).or_default().push(pixmap);
        self.counters.kept += 1;
        self.counters.kept_bytes += bytes;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/painter/surface_pool.rs"]
mod tests;

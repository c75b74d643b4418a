use super::RoutineTable;
use crate::foundation::math::byte_mul;
use crate::pixel::convert::rgb32_to_rgb16;
use crate::pixel::format::load32;

/// A set of kernel overrides selected by name at start-up.
///
/// `install` may overwrite any subset of the table's slots; slots it leaves alone keep the
/// portable kernels.
pub trait RoutineBackend: Send + Sync {
    fn name(&self) -> &str;

    fn install(&self, table: &mut RoutineTable);
}

/// The portable kernels as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct PortableBackend;

impl PortableBackend {
    pub const NAME: &'static str = "portable";
}

impl RoutineBackend for PortableBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn install(&self, _table: &mut RoutineTable) {}
}

/// Word-at-a-time fills and lane-packed colour blends.
///
/// The colour blend uses `x * (256 - a) >> 8` lane arithmetic, which can differ from the
/// portable kernels by one step per channel on translucent colours.
#[derive(Clone, Copy, Debug, Default)]
pub struct PackedBackend;

impl PackedBackend {
    pub const NAME: &'static str = "packed";
}

impl RoutineBackend for PackedBackend {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn install(&self, table: &mut RoutineTable) {
        table.memset_16 = packed_memset_16;
        table.memset_32 = packed_memset_32;
        table.blend_color_rgb16 = packed_blend_color_rgb16;
        table.blend_color_rgb32 = packed_blend_color_rgb32;
        table.blend_color_argb32p = packed_blend_color_argb32p;
    }
}

fn packed_memset_16(dest: &mut [u8], value: u16, count: usize) {
    let word = value.to_ne_bytes();
    for chunk in dest[..count * 2].chunks_exact_mut(2) {
        chunk.copy_from_slice(&word);
    }
}

fn packed_memset_32(dest: &mut [u8], value: u32, count: usize) {
    let word = value.to_ne_bytes();
    for chunk in dest[..count * 4].chunks_exact_mut(4) {
        chunk.copy_from_slice(&word);
    }
}

const RGB16_SPREAD_MASK: u32 = 0x07E0_F81F;

// Green moves to the high half so all three fields can be scaled by one multiply.
fn spread16(c: u16) -> u32 {
    let c = u32::from(c);
    (c | (c << 16)) & RGB16_SPREAD_MASK
}

fn pack16(v: u32) -> u16 {
    ((v & 0xFFFF) | (v >> 16)) as u16
}

fn packed_blend_color_rgb16(dest: &mut [u8], color: u32, count: usize) {
    let alpha = color >> 24;
    match alpha {
        0 => {}
        0xFF => packed_memset_16(dest, rgb32_to_rgb16(color), count),
        _ => {
            let src = spread16(rgb32_to_rgb16(color));
            let ialpha = (256 - alpha) >> 3;
            for chunk in dest[..count * 2].chunks_exact_mut(2) {
                let d = spread16(u16::from_ne_bytes([chunk[0], chunk[1]]));
                let scaled = ((d * ialpha) >> 5) & RGB16_SPREAD_MASK;
                let v = pack16((src + scaled) & RGB16_SPREAD_MASK);
                chunk.copy_from_slice(&v.to_ne_bytes());
            }
        }
    }
}

fn packed_blend_span(dest: &mut [u8], color: u32, count: usize, alpha_mask: u32) {
    let ialpha = 256 - (color >> 24);
    for chunk in dest[..count * 4].chunks_exact_mut(4) {
        let d = load32(chunk, 0);
        let v = color.wrapping_add(byte_mul(d, ialpha)) | alpha_mask;
        chunk.copy_from_slice(&v.to_ne_bytes());
    }
}

fn packed_blend_color_rgb32(dest: &mut [u8], color: u32, count: usize) {
    match color >> 24 {
        0 => {}
        0xFF => packed_memset_32(dest, color, count),
        _ => packed_blend_span(dest, color, count, 0xFF00_0000),
    }
}

fn packed_blend_color_argb32p(dest: &mut [u8], color: u32, count: usize) {
    match color >> 24 {
        0 => {}
        0xFF => packed_memset_32(dest, color, count),
        _ => packed_blend_span(dest, color, count, 0),
    }
}

/// Name-keyed set of available backends.
pub struct BackendRegistry {
    backends: Vec<Box<dyn RoutineBackend>>,
}

impl Default for BackendRegistry {
    /// Registry holding the built-in `portable` and `packed` backends.
    fn default() -> Self {
        let mut r = Self::empty();
        r.register(Box::new(PortableBackend));
        r.register(Box::new(PackedBackend));
        r
    }
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Add `backend`, replacing any earlier backend of the same name.
    pub fn register(&mut self, backend: Box<dyn RoutineBackend>) {
        self.backends.retain(|b| b.name() != backend.name());
        self.backends.push(backend);
    }

    pub fn get(&self, name: &str) -> Option<&dyn RoutineBackend> {
        self.backends
            .iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
            .map(|b| b.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }
}

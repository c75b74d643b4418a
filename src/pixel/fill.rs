//! Width-correct span fills and copies.

use super::format::{store16, store32};

pub fn memset_8(dest: &mut [u8], value: u8, count: usize) {
    dest[..count].fill(value);
}

pub fn memset_16(dest: &mut [u8], value: u16, count: usize) {
    for i in 0..count {
        store16(dest, i, value);
    }
}

pub fn memset_32(dest: &mut [u8], value: u32, count: usize) {
    for i in 0..count {
        store32(dest, i, value);
    }
}

/// Copy `bytes` bytes; the opaque same-format blit.
pub fn memcpy(dest: &mut [u8], src: &[u8], bytes: usize) {
    dest[..bytes].copy_from_slice(&src[..bytes]);
}

//! Per-scanline pixel kernels: blend, convert, fill and blur.
//!
//! These functions do not validate their inputs. The painter, blitter and plane transform clip
//! every rectangle before calling in.

pub mod blur;
pub mod convert;
pub mod fill;
pub mod format;
pub mod ops;

pub use format::PixelFormat;

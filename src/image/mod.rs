//! Pixel buffers: borrowed views and an owned image.
//!
//! Views never own their memory; sub-views share the parent's bytes. Anything that needs to read
//! pixels it is also writing takes an owned snapshot first.

mod owned;
mod view;

pub use owned::Image;
pub use view::{ImageMut, ImageRef};

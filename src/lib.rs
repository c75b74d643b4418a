//! gfxblit is a software compositing engine for devices without a GPU.
//!
//! The crate is layered bottom-up:
//!
//! - [`pixel`]: span kernels for blending, converting, filling and blurring pixels
//! - [`routines`]: a [`RoutineTable`] of those kernels, chosen once per process
//! - [`image`]: borrowed [`ImageRef`] / [`ImageMut`] views and the owned [`Image`]
//! - [`blit`]: nearest and bilinear affine blits of images and solid colours
//! - [`plane`]: nearest-neighbour scaling and quarter-turn rotation of video planes
//! - [`painter`]: the [`GfxPainter`] compositor, with a `vello_cpu` fallback for formats the
//!   raster kernels do not cover
//! - [`canvas`]: a retained scene graph with dirty-region tracking
#![forbid(unsafe_code)]

pub mod blit;
pub mod canvas;
pub mod foundation;
pub mod image;
pub mod painter;
pub mod pixel;
pub mod plane;
pub mod routines;

pub use crate::foundation::config::GfxConfig;
pub use crate::foundation::core::{Affine, IntPoint, IntRect, IntSize, Point, Rect, Rgba8};
pub use crate::foundation::error::{GfxError, GfxResult};

pub use crate::canvas::{Canvas, ItemId, ItemKind};
pub use crate::image::{Image, ImageMut, ImageRef};
pub use crate::painter::{ClipRegion, GfxPainter, MainThreadProxy, ProxyOutcome, ProxyReceiver};
pub use crate::pixel::PixelFormat;
pub use crate::plane::{PlaneFormat, PlaneTransform, Rotation};
pub use crate::routines::RoutineTable;

//! Nearest-neighbour scaling and quarter-turn rotation of raw video planes.
//!
//! Source and destination geometry are clipped against each other once, then two Bresenham-style
//! jump tables spread the source extent evenly over the destination extent. Rotation only changes
//! which source axis each destination axis walks and in which direction; memory is never
//! transposed up front.

mod clip;
mod format;
mod jumps;
mod transform;

pub use clip::{aligned, clip_rects};
pub use format::PlaneFormat;
pub use jumps::make_jumps_table;
pub use transform::PlaneTransform;

/// Clockwise quarter-turn applied while copying a plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    /// Rotation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Self::Rotate0 => Self::Rotate0,
            Self::Rotate90 => Self::Rotate270,
            Self::Rotate180 => Self::Rotate180,
            Self::Rotate270 => Self::Rotate90,
        }
    }

    /// Destination axes are swapped relative to the source.
    pub fn is_transposing(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

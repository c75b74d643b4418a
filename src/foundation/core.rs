pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Integer pixel position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: i32,
    pub y: i32,
}

impl IntPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntSize {
    pub width: i32,
    pub height: i32,
}

impl IntSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Integer pixel rectangle `(x, y, width, height)`.
///
/// A rectangle with non-positive width or height is empty. All empty rectangles intersect to
/// [`IntRect::default`], so equality comparisons on empty results are stable.
///
/// Edges are computed in `i64`, so rectangles reaching past `i32::MAX` clip instead of
/// overflowing. Results of `normalized`, `intersect` and `union` end at or before `i32::MAX`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IntRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(size: IntSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Rectangle spanning inclusive corner coordinates.
    pub const fn from_coords(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1, y1, x2 - x1 + 1, y2 - y1 + 1)
    }

    pub fn left(self) -> i32 {
        self.x
    }

    pub fn top(self) -> i32 {
        self.y
    }

    /// Inclusive right edge.
    pub fn right(self) -> i32 {
        saturate(self.x_end() - 1)
    }

    /// Inclusive bottom edge.
    pub fn bottom(self) -> i32 {
        saturate(self.y_end() - 1)
    }

    /// Exclusive right edge.
    pub fn x_end(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn y_end(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn size(self) -> IntSize {
        IntSize::new(self.width, self.height)
    }

    pub fn origin(self) -> IntPoint {
        IntPoint::new(self.x, self.y)
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.width) * i64::from(self.height)
        }
    }

    /// Flip negative extents so the rectangle covers the same cells with positive size, then
    /// trim whatever lies past `i32::MAX`.
    pub fn normalized(self) -> Self {
        let (x1, x2) = if self.width < 0 {
            (self.x_end() + 1, i64::from(self.x) + 1)
        } else {
            (i64::from(self.x), self.x_end())
        };
        let (y1, y2) = if self.height < 0 {
            (self.y_end() + 1, i64::from(self.y) + 1)
        } else {
            (i64::from(self.y), self.y_end())
        };
        Self::spanning(x1, y1, x2, y2)
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    // Rectangle over `[x1, x2) x [y1, y2)`, clamped into `i32` coordinates.
    fn spanning(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        let (x1, y1) = (saturate(x1), saturate(y1));
        let x2 = x2.min(i64::from(i32::MAX));
        let y2 = y2.min(i64::from(i32::MAX));
        Self::new(
            x1,
            y1,
            saturate(x2 - i64::from(x1)),
            saturate(y2 - i64::from(y1)),
        )
    }

    pub fn intersect(self, other: Self) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::default();
        }
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.x_end().min(other.x_end()).min(i64::from(i32::MAX));
        let y2 = self.y_end().min(other.y_end()).min(i64::from(i32::MAX));
        if x2 <= i64::from(x1) || y2 <= i64::from(y1) {
            return Self::default();
        }
        Self::spanning(i64::from(x1), i64::from(y1), x2, y2)
    }

    pub fn intersects(self, other: Self) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Bounding union; empty operands are ignored.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self::spanning(
            i64::from(self.x.min(other.x)),
            i64::from(self.y.min(other.y)),
            self.x_end().max(other.x_end()),
            self.y_end().max(other.y_end()),
        )
    }

    pub fn contains(self, p: IntPoint) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && i64::from(p.x) < self.x_end()
            && i64::from(p.y) < self.y_end()
    }

    pub fn contains_rect(self, other: Self) -> bool {
        other.is_empty() || self.intersect(other) == other
    }

    /// Grow by `d` on every side.
    pub fn inflated(self, d: i32) -> Self {
        let d = i64::from(d);
        Self::spanning(
            i64::from(self.x) - d,
            i64::from(self.y) - d,
            self.x_end() + d,
            self.y_end() + d,
        )
    }

    pub fn to_kurbo(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            self.x_end() as f64,
            self.y_end() as f64,
        )
    }

    /// Smallest integer rectangle covering `r`.
    pub fn covering(r: Rect) -> Self {
        let r = r.abs().expand();
        let x1 = r.x0.max(f64::from(i32::MIN / 2)) as i32;
        let y1 = r.y0.max(f64::from(i32::MIN / 2)) as i32;
        let x2 = r.x1.min(f64::from(i32::MAX / 2)) as i32;
        let y2 = r.y1.min(f64::from(i32::MAX / 2)) as i32;
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Axis-aligned bounds of this rectangle mapped through `m`.
    pub fn mapped_bounds(self, m: Affine) -> Self {
        if self.is_empty() {
            return Self::default();
        }
        Self::covering(m.transform_rect_bbox(self.to_kurbo()))
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Unpack a `0xAARRGGBB` value.
    pub const fn from_argb32(v: u32) -> Self {
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8, (v >> 24) as u8)
    }

    /// Pack as `0xAARRGGBB` without premultiplying.
    pub const fn to_argb32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Pack as premultiplied `0xAARRGGBB`.
    pub fn to_argb32_premultiplied(self) -> u32 {
        fn premul(c: u8, a: u8) -> u32 {
            (u32::from(c) * u32::from(a) + 127) / 255
        }
        (u32::from(self.a) << 24)
            | (premul(self.r, self.a) << 16)
            | (premul(self.g, self.a) << 8)
            | premul(self.b, self.a)
    }

    /// Scale alpha by an 8-bit opacity.
    pub fn with_opacity(self, opacity: u8) -> Self {
        let a = crate::foundation::math::mul_div255_u8(u16::from(self.a), u16::from(opacity));
        Self { a, ..self }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

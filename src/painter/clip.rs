use crate::foundation::core::IntRect;

/// Area a painter may touch.
///
/// `Rects` holds pairwise disjoint, non-empty rectangles. An empty `Rects` covers nothing; the
/// painter treats it like `Whole` when constructing, and the canvas returns it when nothing needs
/// repainting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClipRegion {
    #[default]
    Whole,
    Rects(Vec<IntRect>),
}

// Parts of `a` outside `b`: at most four bands, top and bottom spanning the full width.
fn subtract(a: IntRect, b: IntRect) -> Vec<IntRect> {
    let i = a.intersect(b);
    if i.is_empty() {
        return vec![a];
    }
    let mut out = Vec::with_capacity(4);
    if i.y > a.y {
        out.push(IntRect::new(a.x, a.y, a.width, i.y - a.y));
    }
    let a_end = a.y + a.height;
    let i_end = i.y + i.height;
    if i_end < a_end {
        out.push(IntRect::new(a.x, i_end, a.width, a_end - i_end));
    }
    if i.x > a.x {
        out.push(IntRect::new(a.x, i.y, i.x - a.x, i.height));
    }
    let a_right = a.x + a.width;
    let i_right = i.x + i.width;
    if i_right < a_right {
        out.push(IntRect::new(i_right, i.y, a_right - i_right, i.height));
    }
    out
}

impl ClipRegion {
    /// Region with no rectangles.
    pub fn empty() -> Self {
        Self::Rects(Vec::new())
    }

    pub fn from_rect(rect: IntRect) -> Self {
        let mut r = Self::empty();
        r.add_rect(rect);
        r
    }

    /// Union of `rects`, split so the stored rectangles do not overlap.
    pub fn from_rects(rects: impl IntoIterator<Item = IntRect>) -> Self {
        let mut r = Self::empty();
        for rect in rects {
            r.add_rect(rect);
        }
        r
    }

    pub fn is_whole(&self) -> bool {
        matches!(self, Self::Whole)
    }

    /// `true` for a `Rects` region covering nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Rects(r) if r.is_empty())
    }

    /// Stored rectangles; empty for `Whole`.
    pub fn rects(&self) -> &[IntRect] {
        match self {
            Self::Whole => &[],
            Self::Rects(r) => r,
        }
    }

    /// Add the parts of `rect` not already covered. No effect on `Whole`.
    pub fn add_rect(&mut self, rect: IntRect) {
        let Self::Rects(rects) = self else {
            return;
        };
        let rect = rect.normalized();
        if rect.is_empty() {
            return;
        }
        let mut pieces = vec![rect];
        for existing in rects.iter() {
            pieces = pieces
                .into_iter()
                .flat_map(|p| subtract(p, *existing))
                .collect();
            if pieces.is_empty() {
                return;
            }
        }
        rects.extend(pieces);
    }

    pub fn union(&mut self, other: &ClipRegion) {
        match other {
            Self::Whole => *self = Self::Whole,
            Self::Rects(rects) => {
                for r in rects {
                    self.add_rect(*r);
                }
            }
        }
    }

    /// Bounding rectangle, or `None` for `Whole` and for an empty region.
    pub fn bounding_rect(&self) -> Option<IntRect> {
        match self {
            Self::Whole => None,
            Self::Rects(rects) => rects.iter().copied().reduce(IntRect::union),
        }
    }

    pub fn contains_rect(&self, rect: IntRect) -> bool {
        match self {
            Self::Whole => true,
            Self::Rects(rects) => rects
                .iter()
                .fold(vec![rect], |left, r| {
                    left.into_iter().flat_map(|p| subtract(p, *r)).collect()
                })
                .is_empty(),
        }
    }

    /// Region rectangles intersected with `bounds`. `Whole` yields `bounds` itself.
    pub fn clipped_to(&self, bounds: IntRect) -> Vec<IntRect> {
        if bounds.is_empty() {
            return Vec::new();
        }
        match self {
            Self::Whole => vec![bounds],
            Self::Rects(rects) => rects
                .iter()
                .map(|r| r.intersect(bounds))
                .filter(|r| !r.is_empty())
                .collect(),
        }
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        match self {
            Self::Whole => Self::Whole,
            Self::Rects(rects) => Self::Rects(rects.iter().map(|r| r.translated(dx, dy)).collect()),
        }
    }

    /// Total covered pixels. `None` for `Whole`.
    pub fn area(&self) -> Option<i64> {
        match self {
            Self::Whole => None,
            Self::Rects(rects) => Some(rects.iter().map(|r| r.area()).sum()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/painter/clip.rs"]
mod tests;

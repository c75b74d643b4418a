use crate::foundation::core::{IntRect, IntSize, Rgba8};
use crate::image::Image;
use crate::pixel::PixelFormat;

/// Handle to an item in a [`super::Canvas`].
///
/// Handles carry a generation, so a handle to a removed item never aliases a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Axes a [`ClipItem`] restricts. Unclipped axes take the painter's clip extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipAxes(u8);

impl ClipAxes {
    pub const NONE: Self = Self(0);
    pub const WIDTH: Self = Self(1);
    pub const HEIGHT: Self = Self(2);
    pub const BOTH: Self = Self(3);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ClipAxes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone)]
pub struct ImageItem {
    pub image: Image,
    /// Rotation about the item centre, in degrees.
    pub rotate: f64,
    pub smooth: bool,
    /// Place RGB16 images at fractional x offsets.
    pub subpixel: bool,
}

#[derive(Debug, Clone)]
pub struct ColorItem {
    pub color: Rgba8,
    pub size: IntSize,
    pub rotate: f64,
    pub smooth: bool,
}

/// Restricts children to a `width x height` box at the item position.
#[derive(Debug, Clone)]
pub struct ClipItem {
    pub width: i32,
    pub height: i32,
    pub clip: ClipAxes,
}

/// Where a reflection copies its pixels from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionSource {
    /// The item rectangle shifted by `(dx, dy)`.
    Offset { dx: i32, dy: i32 },
    /// A fixed rectangle in layer coordinates.
    Rect(IntRect),
}

#[derive(Debug, Clone)]
pub struct ReflectionItem {
    pub size: IntSize,
    pub source: ReflectionSource,
}

/// Repaint strategy of a cache layer for its next paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptState {
    /// The cached image is current.
    None,
    /// Only the given child was added since the last paint.
    Add(ItemId),
    /// Every child must be repainted.
    Invalid,
}

/// Offscreen layer that caches its children in an image.
#[derive(Debug, Clone)]
pub struct CacheLayer {
    pub(crate) image: Image,
    pub(crate) state: OptState,
    pub(crate) dirty_items: Vec<ItemId>,
    /// When unset, changes to existing children keep the cached image; only adding or removing
    /// children repaints it.
    pub refresh_on_updates: bool,
    pub smooth: bool,
}

impl CacheLayer {
    /// Transparent layers cache premultiplied ARGB; opaque ones cache RGB16 over black.
    pub fn new(size: IntSize, transparent: bool) -> Self {
        let format = if transparent {
            PixelFormat::Argb32Premultiplied
        } else {
            PixelFormat::Rgb16
        };
        Self {
            image: Image::with_size(size, format),
            state: OptState::Invalid,
            dirty_items: Vec::new(),
            refresh_on_updates: true,
            smooth: false,
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn size(&self) -> IntSize {
        self.image.size()
    }

    pub fn state(&self) -> OptState {
        self.state
    }
}

#[derive(Debug, Clone)]
pub enum ItemKind {
    Group,
    Image(ImageItem),
    Color(ColorItem),
    Clip(ClipItem),
    Reflection(ReflectionItem),
    CacheLayer(CacheLayer),
}

impl ItemKind {
    pub fn image(image: Image) -> Self {
        Self::Image(ImageItem {
            image,
            rotate: 0.0,
            smooth: false,
            subpixel: false,
        })
    }

    pub fn color(color: Rgba8, size: IntSize) -> Self {
        Self::Color(ColorItem {
            color,
            size,
            rotate: 0.0,
            smooth: false,
        })
    }

    pub fn clip(width: i32, height: i32, clip: ClipAxes) -> Self {
        Self::Clip(ClipItem {
            width,
            height,
            clip,
        })
    }

    pub fn reflection(size: IntSize, dx: i32, dy: i32) -> Self {
        Self::Reflection(ReflectionItem {
            size,
            source: ReflectionSource::Offset { dx, dy },
        })
    }

    /// Reflection of a fixed rectangle; the item takes the rectangle's size.
    pub fn reflection_of(rect: IntRect) -> Self {
        Self::Reflection(ReflectionItem {
            size: rect.size(),
            source: ReflectionSource::Rect(rect),
        })
    }

    pub fn cache_layer(size: IntSize, transparent: bool) -> Self {
        Self::CacheLayer(CacheLayer::new(size, transparent))
    }
}

/// One node of the canvas tree.
#[derive(Debug, Clone)]
pub struct CanvasItem {
    pub(crate) parent: Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) z: f64,
    pub(crate) scale: f64,
    pub(crate) visible: f64,
    pub(crate) dirty: bool,
    pub(crate) kind: ItemKind,
}

impl CanvasItem {
    pub(crate) fn new(parent: Option<ItemId>, kind: ItemKind) -> Self {
        Self {
            parent,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            scale: 1.0,
            visible: 1.0,
            dirty: false,
            kind,
        }
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Children in paint order after the last z-sort.
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Visibility in `[0, 1]`; acts as an opacity multiplier when painting.
    pub fn visible(&self) -> f64 {
        self.visible
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Changes made here are not tracked; prefer [`super::Canvas::update_kind`].
    pub fn kind_mut(&mut self) -> &mut ItemKind {
        &mut self.kind
    }

    pub(crate) fn is_cache_layer(&self) -> bool {
        matches!(self.kind, ItemKind::CacheLayer(_))
    }
}

//! Retained scene graph painted through a [`GfxPainter`](crate::painter::GfxPainter).
//!
//! Items live in an arena owned by the [`Canvas`] and are addressed by [`ItemId`]. Every change
//! marks the item dirty in its layer: the nearest cache layer above it, or the root. Dirty items
//! at the root record their bounds before and after the change, and [`Canvas::reset_dirty`]
//! turns those into the region the next frame repaints.

mod item;
mod paint;

pub use item::{
    CacheLayer, CanvasItem, ClipAxes, ClipItem, ColorItem, ImageItem, ItemId, ItemKind, OptState,
    ReflectionItem, ReflectionSource,
};

use crate::foundation::config::GfxConfig;
use crate::foundation::core::{Affine, IntRect, IntSize};
use crate::foundation::error::{GfxError, GfxResult};
use crate::painter::ClipRegion;

#[derive(Debug)]
struct Slot {
    generation: u32,
    item: Option<CanvasItem>,
}

#[derive(Clone, Copy)]
enum Property {
    X,
    Y,
    Z,
    Scale,
    Visible,
}

impl CanvasItem {
    fn property_mut(&mut self, p: Property) -> &mut f64 {
        match p {
            Property::X => &mut self.x,
            Property::Y => &mut self.y,
            Property::Z => &mut self.z,
            Property::Scale => &mut self.scale,
            Property::Visible => &mut self.visible,
        }
    }
}

/// Accumulated position, scale and visibility of an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Placement {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) scale: f64,
    pub(crate) visible: f64,
}

impl Placement {
    const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        visible: 1.0,
    };

    fn child(self, item: &CanvasItem) -> Self {
        Self {
            x: self.x + self.scale * item.x,
            y: self.y + self.scale * item.y,
            scale: self.scale * item.scale,
            visible: self.visible * item.visible,
        }
    }

    /// `size` centred on the placement, rotated by `degrees`, scaled by the placement scale.
    pub(crate) fn centred(self, degrees: f64, size: IntSize) -> Affine {
        Affine::translate((self.x, self.y))
            * Affine::rotate(degrees.to_radians())
            * Affine::scale(self.scale)
            * Affine::translate((-f64::from(size.width / 2), -f64::from(size.height / 2)))
    }

    /// Cache layer image at the placement, scaled about its centre.
    pub(crate) fn scaled_about_centre(self, size: IntSize) -> Affine {
        let (hw, hh) = (f64::from(size.width / 2), f64::from(size.height / 2));
        Affine::translate((self.x + hw, self.y + hh))
            * Affine::scale(self.scale)
            * Affine::translate((-hw, -hh))
    }
}

/// Arena-backed item tree with dirty-region tracking.
#[derive(Debug)]
pub struct Canvas {
    size: IntSize,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ItemId,
    old_dirty: IntRect,
    dirty_items: Vec<ItemId>,
    dynamic_area: IntRect,
    dynamic_items: Vec<ItemId>,
    full_update: bool,
    show_image_bounds: bool,
    reflection_blur: bool,
}

impl Canvas {
    /// Canvas configured from the process environment.
    pub fn new(size: IntSize) -> Self {
        Self::with_config(size, GfxConfig::global())
    }

    pub fn with_config(size: IntSize, config: &GfxConfig) -> Self {
        let root = ItemId {
            index: 0,
            generation: 0,
        };
        let mut canvas = Self {
            size,
            slots: vec![Slot {
                generation: 0,
                item: Some(CanvasItem::new(None, ItemKind::Group)),
            }],
            free: Vec::new(),
            root,
            old_dirty: IntRect::default(),
            dirty_items: Vec::new(),
            dynamic_area: IntRect::default(),
            dynamic_items: Vec::new(),
            full_update: config.canvas_full_update,
            show_image_bounds: config.show_image_bounds,
            reflection_blur: !config.reflection_no_blur,
        };
        canvas.mark_dirty(root);
        canvas
    }

    pub fn size(&self) -> IntSize {
        self.size
    }

    /// The root layer. It cannot be removed or reparented.
    pub fn root(&self) -> ItemId {
        self.root
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn item(&self, id: ItemId) -> Option<&CanvasItem> {
        self.get(id)
    }

    /// Direct access to an item. Changes made through it are not tracked as dirty.
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut CanvasItem> {
        self.get_mut(id)
    }

    fn get(&self, id: ItemId) -> Option<&CanvasItem> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.item.as_ref()
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut CanvasItem> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.item.as_mut()
    }

    fn cache_layer_mut(&mut self, id: ItemId) -> Option<&mut CacheLayer> {
        match &mut self.get_mut(id)?.kind {
            ItemKind::CacheLayer(cache) => Some(cache),
            _ => None,
        }
    }

    fn alloc(&mut self, item: CanvasItem) -> ItemId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.item = Some(item);
            return ItemId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            item: Some(item),
        });
        ItemId {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    fn release(&mut self, id: ItemId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize)
            && slot.generation == id.generation
            && slot.item.take().is_some()
        {
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
        }
    }

    // --- tree editing ---

    /// Append a new item as the last child of `parent` and mark it dirty.
    pub fn add_item(&mut self, parent: ItemId, kind: ItemKind) -> GfxResult<ItemId> {
        if !self.contains(parent) {
            return Err(GfxError::geometry("unknown parent item"));
        }
        let id = self.alloc(CanvasItem::new(Some(parent), kind));
        self.attach(parent, id);
        self.mark_dirty(id);
        Ok(id)
    }

    /// Remove `id` and its whole subtree. The area it covered is repainted.
    pub fn remove_item(&mut self, id: ItemId) -> GfxResult<()> {
        if id == self.root {
            return Err(GfxError::geometry("the root item cannot be removed"));
        }
        let Some(parent) = self.get(id).map(|item| item.parent) else {
            return Err(GfxError::geometry("unknown item"));
        };
        self.mark_dirty(id);
        let subtree = self.subtree(id);
        for &n in &subtree {
            if self.get(n).is_some_and(|item| item.dirty)
                && let Some(layer) = self.dirty_layer(n)
                && !subtree.contains(&layer)
            {
                self.rem_dirty(layer, n);
            }
        }
        if let Some(parent) = parent
            && let Some(p) = self.get_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        self.dynamic_items.retain(|d| !subtree.contains(d));
        for n in subtree {
            self.release(n);
        }
        Ok(())
    }

    /// Move `id` under `parent`, keeping its local x, y, scale and visibility.
    pub fn set_parent(&mut self, id: ItemId, parent: ItemId) -> GfxResult<()> {
        if id == self.root {
            return Err(GfxError::geometry("the root item cannot be reparented"));
        }
        let Some(old_parent) = self.get(id).map(|item| item.parent) else {
            return Err(GfxError::geometry("unknown item"));
        };
        if !self.contains(parent) {
            return Err(GfxError::geometry("unknown parent item"));
        }
        if old_parent == Some(parent) {
            return Ok(());
        }
        if self.subtree(id).contains(&parent) {
            return Err(GfxError::geometry("an item cannot become its own descendant"));
        }

        let old_layer = self.dirty_layer(id);
        self.mark_dirty(id);
        if let Some(old) = old_parent
            && let Some(p) = self.get_mut(old)
        {
            p.children.retain(|&c| c != id);
        }
        if let Some(item) = self.get_mut(id) {
            item.parent = Some(parent);
        }
        self.attach(parent, id);

        let new_layer = self.dirty_layer(id);
        if old_layer != new_layer && self.get(id).is_some_and(|item| item.dirty) {
            if let Some(old) = old_layer {
                self.rem_dirty(old, id);
            }
            if let Some(new) = new_layer {
                self.add_dirty(new, id);
            }
        }
        Ok(())
    }

    /// Move `id` under `parent`, keeping where it appears on screen.
    pub fn move_to_parent(&mut self, id: ItemId, parent: ItemId) -> GfxResult<()> {
        let before = self.global(id);
        self.set_parent(id, parent)?;
        let p = self.global(parent);
        let now = self.global(id);
        if p.scale != 0.0 {
            if before.x != now.x {
                self.set_x(id, (before.x - p.x) / p.scale);
            }
            if before.y != now.y {
                self.set_y(id, (before.y - p.y) / p.scale);
            }
            if before.scale != now.scale {
                self.set_scale(id, before.scale / p.scale);
            }
        }
        if before.visible != now.visible && p.visible != 0.0 {
            self.set_visible(id, before.visible / p.visible);
        }
        Ok(())
    }

    fn attach(&mut self, parent: ItemId, child: ItemId) {
        if let Some(cache) = self.cache_layer_mut(parent) {
            cache.state = match cache.state {
                OptState::None => OptState::Add(child),
                _ => OptState::Invalid,
            };
        }
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
    }

    /// `id` followed by all its descendants.
    fn subtree(&self, id: ItemId) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(item) = self.get(n) {
                out.push(n);
                stack.extend(item.children.iter().rev().copied());
            }
        }
        out
    }

    // --- properties ---

    fn set_property(&mut self, id: ItemId, property: Property, value: f64) {
        let Some(item) = self.get_mut(id) else {
            return;
        };
        if *item.property_mut(property) == value {
            return;
        }
        self.mark_dirty(id);
        if let Some(item) = self.get_mut(id) {
            *item.property_mut(property) = value;
        }
        // An item that was invisible before the change is marked now.
        self.mark_dirty(id);
    }

    pub fn set_x(&mut self, id: ItemId, x: f64) {
        self.set_property(id, Property::X, x);
    }

    pub fn set_y(&mut self, id: ItemId, y: f64) {
        self.set_property(id, Property::Y, y);
    }

    /// Paint order among siblings; lower z paints first.
    pub fn set_z(&mut self, id: ItemId, z: f64) {
        self.set_property(id, Property::Z, z);
    }

    pub fn set_scale(&mut self, id: ItemId, scale: f64) {
        self.set_property(id, Property::Scale, scale);
    }

    pub fn set_visible(&mut self, id: ItemId, visible: f64) {
        self.set_property(id, Property::Visible, visible);
    }

    /// Edit an item's kind-specific state, repainting its old and new bounds.
    pub fn update_kind(&mut self, id: ItemId, f: impl FnOnce(&mut ItemKind)) {
        if !self.contains(id) {
            return;
        }
        self.mark_dirty(id);
        if let Some(item) = self.get_mut(id) {
            f(&mut item.kind);
        }
        self.mark_dirty(id);
    }

    // --- geometry ---

    fn is_layer(&self, id: ItemId) -> bool {
        id == self.root || self.get(id).is_some_and(CanvasItem::is_cache_layer)
    }

    /// The layer `id` paints into when it is a layer itself, else the nearest layer above it.
    fn layer(&self, id: ItemId) -> Option<ItemId> {
        let mut cur = id;
        loop {
            if self.is_layer(cur) {
                return Some(cur);
            }
            cur = self.get(cur)?.parent?;
        }
    }

    /// Layer that records `id` as dirty.
    fn dirty_layer(&self, id: ItemId) -> Option<ItemId> {
        let layer = self.layer(id);
        if layer == Some(id)
            && let Some(parent) = self.get(id).and_then(|item| item.parent)
        {
            return self.layer(parent);
        }
        layer
    }

    fn global(&self, id: ItemId) -> Placement {
        let Some(item) = self.get(id) else {
            return Placement::ORIGIN;
        };
        item.parent
            .map_or(Placement::ORIGIN, |p| self.global(p))
            .child(item)
    }

    /// Placement of `id` in the coordinate space of the layer it paints into.
    pub(crate) fn in_layer(&self, id: ItemId) -> Placement {
        let Some(item) = self.get(id) else {
            return Placement::ORIGIN;
        };
        item.parent
            .map_or(Placement::ORIGIN, |p| self.layer_origin(p))
            .child(item)
    }

    fn layer_origin(&self, id: ItemId) -> Placement {
        if self.is_layer(id) {
            Placement::ORIGIN
        } else {
            self.in_layer(id)
        }
    }

    pub fn global_x(&self, id: ItemId) -> f64 {
        self.global(id).x
    }

    pub fn global_y(&self, id: ItemId) -> f64 {
        self.global(id).y
    }

    pub fn global_scale(&self, id: ItemId) -> f64 {
        self.global(id).scale
    }

    pub fn global_visible(&self, id: ItemId) -> f64 {
        self.global(id).visible
    }

    /// X position within the nearest enclosing layer.
    pub fn layer_x(&self, id: ItemId) -> f64 {
        self.in_layer(id).x
    }

    pub fn layer_y(&self, id: ItemId) -> f64 {
        self.in_layer(id).y
    }

    pub fn layer_scale(&self, id: ItemId) -> f64 {
        self.in_layer(id).scale
    }

    pub fn layer_visible(&self, id: ItemId) -> f64 {
        self.in_layer(id).visible
    }

    fn children_rect(&self, item: &CanvasItem) -> IntRect {
        item.children
            .iter()
            .fold(IntRect::default(), |acc, &c| acc.union(self.bounding_rect(c)))
    }

    /// Area `id` and its children may touch, in layer coordinates.
    pub fn bounding_rect(&self, id: ItemId) -> IntRect {
        let Some(item) = self.get(id) else {
            return IntRect::default();
        };
        let place = self.in_layer(id);
        match &item.kind {
            ItemKind::Group => self.children_rect(item),
            ItemKind::Image(img) => {
                let size = img.image.size();
                IntRect::from_size(size)
                    .mapped_bounds(place.centred(img.rotate, size))
                    .inflated(1)
                    .union(self.children_rect(item))
            }
            ItemKind::Color(c) => IntRect::from_size(c.size)
                .mapped_bounds(place.centred(c.rotate, c.size))
                .inflated(1)
                .union(self.children_rect(item)),
            ItemKind::Clip(c) => self
                .children_rect(item)
                .intersect(paint::clip_rect(place, c)),
            ItemKind::Reflection(r) => paint::reflection_rect(place, r)
                .union(paint::reflection_source(place, r))
                .union(self.children_rect(item)),
            ItemKind::CacheLayer(cache) => {
                let size = cache.size();
                if place.scale == 1.0 {
                    IntRect::new(place.x as i32, place.y as i32, size.width, size.height)
                } else {
                    IntRect::from_size(size).mapped_bounds(place.scaled_about_centre(size))
                }
            }
        }
    }

    // --- dirty tracking ---

    pub fn is_dirty(&self, id: ItemId) -> bool {
        self.get(id).is_some_and(|item| item.dirty)
    }

    /// Record `id` as changed. Invisible and already-dirty items are skipped.
    pub fn mark_dirty(&mut self, id: ItemId) {
        let Some(item) = self.get(id) else {
            return;
        };
        if item.dirty || item.visible == 0.0 {
            return;
        }
        let Some(layer) = self.dirty_layer(id) else {
            return;
        };
        self.add_dirty(layer, id);
        if let Some(item) = self.get_mut(id) {
            item.dirty = true;
        }
    }

    fn add_dirty(&mut self, layer: ItemId, id: ItemId) {
        if layer == self.root {
            self.old_dirty = self.old_dirty.union(self.bounding_rect(id));
            self.dirty_items.push(id);
            return;
        }
        self.mark_dirty(layer);
        if let Some(cache) = self.cache_layer_mut(layer) {
            if cache.refresh_on_updates {
                cache.state = match cache.state {
                    OptState::Add(added) if added == id => OptState::Add(added),
                    _ => OptState::Invalid,
                };
            }
            cache.dirty_items.push(id);
        }
    }

    fn rem_dirty(&mut self, layer: ItemId, id: ItemId) {
        if layer == self.root {
            self.dirty_items.retain(|&d| d != id);
            return;
        }
        if let Some(cache) = self.cache_layer_mut(layer) {
            cache.dirty_items.retain(|&d| d != id);
            cache.state = OptState::Invalid;
        }
    }

    fn clean(&mut self, id: ItemId) {
        let Some(item) = self.get_mut(id) else {
            return;
        };
        item.dirty = false;
        let pending = match &mut item.kind {
            ItemKind::CacheLayer(cache) => std::mem::take(&mut cache.dirty_items),
            _ => return,
        };
        for child in pending {
            self.clean(child);
        }
    }

    /// Extra area repainted with every non-empty update.
    pub fn set_dynamic_area(&mut self, area: IntRect) {
        self.dynamic_area = area;
    }

    pub fn dynamic_area(&self) -> IntRect {
        self.dynamic_area
    }

    /// Repaint the bounds of `id` with every non-empty update while it is visible.
    pub fn add_dynamic_item(&mut self, id: ItemId) {
        if self.contains(id) && !self.dynamic_items.contains(&id) {
            self.dynamic_items.push(id);
        }
    }

    pub fn remove_dynamic_item(&mut self, id: ItemId) {
        self.dynamic_items.retain(|&d| d != id);
    }

    /// Take the region changed since the last call and mark everything clean.
    ///
    /// Returns [`ClipRegion::Whole`] in full-update mode and an empty region when nothing
    /// changed.
    #[tracing::instrument(skip_all)]
    pub fn reset_dirty(&mut self) -> ClipRegion {
        let items = std::mem::take(&mut self.dirty_items);
        let mut changed = std::mem::take(&mut self.old_dirty);
        for &id in &items {
            changed = changed.union(self.bounding_rect(id));
        }
        for id in items {
            self.clean(id);
        }

        if self.full_update {
            return ClipRegion::Whole;
        }
        if changed.is_empty() {
            return ClipRegion::empty();
        }
        let mut region = ClipRegion::from_rect(changed);
        if !self.dynamic_area.is_empty() {
            region.add_rect(self.dynamic_area);
        }
        for &id in &self.dynamic_items {
            if self.get(id).is_some_and(|item| item.visible != 0.0) {
                region.add_rect(self.bounding_rect(id));
            }
        }
        tracing::debug!(rects = region.rects().len(), "canvas dirty region");
        region
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/canvas.rs"]
mod tests;

use super::{Canvas, ClipAxes, ClipItem, ImageItem, ItemId, ItemKind, OptState, Placement};
use super::{ColorItem, ReflectionItem, ReflectionSource};
use crate::foundation::core::{Affine, IntRect, IntSize, Rgba8};
use crate::image::Image;
use crate::painter::GfxPainter;
use crate::pixel::blur::blur_alpha;

const BOUNDS_OVERLAY: Rgba8 = Rgba8::new(0, 0, 255, 127);
const REFLECTION_BLUR_RADIUS: u32 = 3;

pub(super) fn clip_rect(place: Placement, clip: &ClipItem) -> IntRect {
    IntRect::new(place.x.floor() as i32, place.y.floor() as i32, clip.width, clip.height)
}

/// Where a reflection draws.
pub(super) fn reflection_rect(place: Placement, r: &ReflectionItem) -> IntRect {
    let (x, y) = (place.x.floor() as i32, place.y.floor() as i32);
    IntRect::new(x, y, r.size.width, r.size.height)
}

/// Where a reflection reads from.
pub(super) fn reflection_source(place: Placement, r: &ReflectionItem) -> IntRect {
    match r.source {
        ReflectionSource::Rect(rect) if !rect.is_empty() => rect,
        ReflectionSource::Rect(_) => reflection_rect(place, r),
        ReflectionSource::Offset { dx, dy } => reflection_rect(place, r).translated(dx, dy),
    }
}

/// Stable bubble sort by z; cheap when the order rarely changes.
fn sort_by_z(children: &mut [(f64, ItemId)]) {
    let mut swapped = true;
    let mut end = children.len();
    while swapped && end > 1 {
        swapped = false;
        for i in 1..end {
            if children[i].0 < children[i - 1].0 {
                children.swap(i, i - 1);
                swapped = true;
            }
        }
        end -= 1;
    }
}

impl Canvas {
    /// Paint the whole tree. The painter's region limits what is touched.
    #[tracing::instrument(skip_all)]
    pub fn paint(&mut self, p: &mut GfxPainter<'_>) {
        let root = self.root;
        self.paint_children(root, p);
    }

    fn z_order_children(&mut self, id: ItemId) {
        let Some(item) = self.get(id) else {
            return;
        };
        if item.children.len() <= 1 {
            return;
        }
        let mut order: Vec<(f64, ItemId)> = item
            .children
            .iter()
            .map(|&c| (self.get(c).map_or(0.0, |i| i.z), c))
            .collect();
        sort_by_z(&mut order);
        if let Some(item) = self.get_mut(id) {
            item.children = order.into_iter().map(|(_, c)| c).collect();
        }
    }

    fn paint_children(&mut self, id: ItemId, p: &mut GfxPainter<'_>) {
        self.z_order_children(id);
        let children = match self.get(id) {
            Some(item) => item.children.clone(),
            None => return,
        };
        for child in children {
            if self.get(child).is_some_and(|c| c.visible != 0.0) {
                self.paint_item(child, p);
            }
        }
    }

    fn paint_item(&mut self, id: ItemId, p: &mut GfxPainter<'_>) {
        let place = self.in_layer(id);
        let Some(item) = self.get(id) else {
            return;
        };
        match &item.kind {
            ItemKind::Group => {}
            ItemKind::Image(img) => self.paint_image(img, place, p),
            ItemKind::Color(c) => paint_color(c, place, p),
            ItemKind::Clip(c) => {
                let c = c.clone();
                return self.paint_clip(id, &c, place, p);
            }
            ItemKind::Reflection(r) => {
                let r = r.clone();
                return self.paint_reflection(id, &r, place, p);
            }
            ItemKind::CacheLayer(_) => return self.paint_cache_layer(id, place, p),
        }
        self.paint_children(id, p);
    }

    fn paint_image(&self, img: &ImageItem, place: Placement, p: &mut GfxPainter<'_>) {
        if img.image.is_empty() {
            return;
        }
        let op = p.opacity_u8();
        p.set_opacity(p.opacity() * place.visible as f32);
        let size = img.image.size();
        let view = img.image.as_ref();
        if img.rotate != 0.0 || place.scale != 1.0 {
            p.draw_image_transformed(place.centred(img.rotate, size), &view, img.smooth);
        } else {
            let x = place.x - f64::from(size.width) / 2.0;
            let y = (place.y - f64::from(size.height) / 2.0).floor() as i32;
            if img.subpixel {
                p.draw_image_subpixel(x, y, &view);
            } else {
                p.draw_image(x.floor() as i32, y, &view);
            }
            if self.show_image_bounds {
                let bounds = IntRect::new(x.floor() as i32, y, size.width, size.height);
                p.fill_rect(bounds, BOUNDS_OVERLAY);
            }
        }
        p.set_opacity_u8(op);
    }

    fn paint_clip(
        &mut self,
        id: ItemId,
        clip: &ClipItem,
        place: Placement,
        p: &mut GfxPainter<'_>,
    ) {
        let user = p.user_clip_rect();
        let painter = p.clip_rect();
        let mut rect = clip_rect(place, clip);
        if !clip.clip.contains(ClipAxes::HEIGHT) && !painter.is_empty() {
            rect.y = painter.y;
            rect.height = painter.height;
        }
        if !clip.clip.contains(ClipAxes::WIDTH) && !painter.is_empty() {
            rect.x = painter.x;
            rect.width = painter.width;
        }
        if !user.is_empty() {
            rect = rect.intersect(user);
        }
        if rect.is_empty() {
            return;
        }
        p.set_user_clip_rect(rect);
        self.paint_children(id, p);
        p.set_user_clip_rect(user);
    }

    fn paint_reflection(
        &mut self,
        id: ItemId,
        r: &ReflectionItem,
        place: Placement,
        p: &mut GfxPainter<'_>,
    ) {
        let h = r.size.height;
        if h > 0 && r.size.width > 0 {
            let op = p.opacity_u8();
            p.set_opacity(p.opacity() * place.visible as f32);
            let area = reflection_rect(place, r);
            let y0 = area.y;
            p.set_horizontal_opacity_function(Some(Box::new(move |y| {
                (255 - 255 * (y - y0) / h).clamp(0, 255) as u8
            })));
            let snapshot = p.image_ref(reflection_source(place, r)).to_image();
            p.draw_image_flipped(area.x, area.y, &snapshot.as_ref());
            p.set_horizontal_opacity_function(None);

            if self.reflection_blur && !p.using_fallback() {
                let blur = p.routines().blur;
                let mut view = p.image_mut(area);
                let (w, hh, stride, format) = (
                    view.width() as usize,
                    view.height() as usize,
                    view.stride(),
                    view.format(),
                );
                blur(view.bits_mut(), w, hh, stride, format, blur_alpha(REFLECTION_BLUR_RADIUS));
            }
            p.set_opacity_u8(op);
        }
        self.paint_children(id, p);
    }

    fn paint_cache_layer(&mut self, id: ItemId, place: Placement, p: &mut GfxPainter<'_>) {
        self.z_order_children(id);
        let Some(item) = self.get_mut(id) else {
            return;
        };
        if item.children.is_empty() {
            return;
        }
        let children = item.children.clone();
        let ItemKind::CacheLayer(cache) = &mut item.kind else {
            return;
        };
        let state = std::mem::replace(&mut cache.state, OptState::None);
        let smooth = cache.smooth;
        let format = cache.image.format();
        let mut image = std::mem::replace(&mut cache.image, Image::new(0, 0, format));

        let repaint = match state {
            OptState::None => Vec::new(),
            OptState::Add(added) if children.last() == Some(&added) => vec![added],
            _ => {
                image.fill(0);
                children
            }
        };
        if !repaint.is_empty() {
            tracing::debug!(items = repaint.len(), "repainting cache layer");
            let mut inner = GfxPainter::new(image.as_mut(), p.routines());
            for child in repaint {
                if self.get(child).is_some_and(|c| c.visible != 0.0) {
                    self.paint_item(child, &mut inner);
                }
            }
        }

        let op = p.opacity_u8();
        p.set_opacity(p.opacity() * place.visible as f32);
        let view = image.as_ref();
        if place.scale != 1.0 {
            p.draw_image_transformed(place.scaled_about_centre(image.size()), &view, smooth);
        } else {
            p.draw_image(place.x.floor() as i32, place.y.floor() as i32, &view);
        }
        p.set_opacity_u8(op);

        if let Some(cache) = self.cache_layer_mut(id) {
            cache.image = image;
        }
    }
}

fn paint_color(c: &ColorItem, place: Placement, p: &mut GfxPainter<'_>) {
    let op = p.opacity_u8();
    p.set_opacity(p.opacity() * place.visible as f32);
    let size = IntSize::new(
        (f64::from(c.size.width) * place.scale) as i32,
        (f64::from(c.size.height) * place.scale) as i32,
    );
    if c.rotate != 0.0 {
        let m = Affine::translate((place.x, place.y))
            * Affine::rotate(c.rotate.to_radians())
            * Affine::translate((-f64::from(size.width / 2), -f64::from(size.height / 2)));
        p.fill_rect_transformed(m, size, c.color, c.smooth);
    } else {
        let x = (place.x - f64::from(size.width) / 2.0).floor() as i32;
        let y = (place.y - f64::from(size.height) / 2.0).floor() as i32;
        p.fill_rect(IntRect::new(x, y, size.width, size.height), c.color);
    }
    p.set_opacity_u8(op);
}

use super::*;
use crate::foundation::core::Rgba8;
use crate::image::Image;
use crate::painter::GfxPainter;
use crate::pixel::PixelFormat;
use crate::routines::RoutineTable;

const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);
const RED: Rgba8 = Rgba8::opaque(255, 0, 0);

fn canvas() -> Canvas {
    Canvas::with_config(IntSize::new(64, 64), &GfxConfig::default())
}

fn close(a: u32, b: u32, tol: i32) -> bool {
    (0..4).all(|i| {
        let s = i * 8;
        (((a >> s) & 0xFF) as i32 - ((b >> s) & 0xFF) as i32).abs() <= tol
    })
}

fn render(canvas: &mut Canvas, w: i32, h: i32) -> Image {
    let routines = RoutineTable::portable();
    let mut img = Image::new(w, h, PixelFormat::Rgb32);
    img.fill(0xFF00_0000);
    {
        let mut p = GfxPainter::new(img.as_mut(), &routines);
        canvas.paint(&mut p);
    }
    img
}

fn cache_state(canvas: &Canvas, id: ItemId) -> OptState {
    match canvas.item(id).unwrap().kind() {
        ItemKind::CacheLayer(layer) => layer.state(),
        other => panic!("not a cache layer: {other:?}"),
    }
}

fn square(canvas: &mut Canvas, parent: ItemId, color: Rgba8, side: i32, x: f64, y: f64) -> ItemId {
    let id = canvas
        .add_item(parent, ItemKind::color(color, IntSize::new(side, side)))
        .unwrap();
    canvas.set_x(id, x);
    canvas.set_y(id, y);
    id
}

#[test]
fn new_items_take_defaults() {
    let mut c = canvas();
    let id = c.add_item(c.root(), ItemKind::Group).unwrap();
    let item = c.item(id).unwrap();
    assert_eq!(
        (item.x(), item.y(), item.z(), item.scale(), item.visible()),
        (0.0, 0.0, 0.0, 1.0, 1.0)
    );
    assert_eq!(item.parent(), Some(c.root()));
    assert_eq!(c.item(c.root()).unwrap().children(), &[id]);
}

#[test]
fn global_values_accumulate_through_parents() {
    let mut c = canvas();
    let g = c.add_item(c.root(), ItemKind::Group).unwrap();
    c.set_x(g, 10.0);
    c.set_y(g, 20.0);
    c.set_scale(g, 2.0);
    c.set_visible(g, 0.5);
    let child = c.add_item(g, ItemKind::Group).unwrap();
    c.set_x(child, 5.0);
    c.set_y(child, 1.0);
    c.set_visible(child, 0.5);

    assert_eq!(c.global_x(child), 20.0);
    assert_eq!(c.global_y(child), 22.0);
    assert_eq!(c.global_scale(child), 2.0);
    assert_eq!(c.global_visible(child), 0.25);
    assert_eq!(c.layer_x(child), 20.0);
}

#[test]
fn layer_values_stop_at_cache_layers() {
    let mut c = canvas();
    let layer = c
        .add_item(c.root(), ItemKind::cache_layer(IntSize::new(8, 8), true))
        .unwrap();
    c.set_x(layer, 100.0);
    c.set_scale(layer, 2.0);
    let child = c.add_item(layer, ItemKind::Group).unwrap();
    c.set_x(child, 5.0);

    assert_eq!(c.layer_x(layer), 100.0);
    assert_eq!(c.layer_x(child), 5.0);
    assert_eq!(c.layer_scale(child), 1.0);
    assert_eq!(c.global_x(child), 110.0);
}

#[test]
fn color_bounds_are_centred_and_inflated() {
    let mut c = canvas();
    let root = c.root();
    let id = square(&mut c, root, WHITE, 10, 20.0, 20.0);
    assert_eq!(c.bounding_rect(id), IntRect::new(14, 14, 12, 12));
    assert_eq!(c.bounding_rect(c.root()), IntRect::new(14, 14, 12, 12));
}

#[test]
fn reset_dirty_covers_old_and_new_bounds() {
    let mut c = canvas();
    assert!(c.reset_dirty().is_empty());

    let root = c.root();
    let id = square(&mut c, root, WHITE, 10, 20.0, 20.0);
    assert!(c.is_dirty(id));
    assert_eq!(c.reset_dirty().rects(), &[IntRect::new(14, 14, 12, 12)]);
    assert!(!c.is_dirty(id));
    assert!(c.reset_dirty().is_empty());

    c.set_x(id, 40.0);
    assert_eq!(c.reset_dirty().rects(), &[IntRect::new(14, 14, 32, 12)]);
}

#[test]
fn unchanged_values_do_not_dirty() {
    let mut c = canvas();
    let root = c.root();
    let id = square(&mut c, root, WHITE, 4, 8.0, 8.0);
    c.reset_dirty();
    c.set_x(id, 8.0);
    c.set_scale(id, 1.0);
    assert!(!c.is_dirty(id));
    assert!(c.reset_dirty().is_empty());
}

#[test]
fn invisible_items_are_not_tracked() {
    let mut c = canvas();
    let root = c.root();
    let id = square(&mut c, root, WHITE, 4, 8.0, 8.0);
    c.reset_dirty();

    c.set_visible(id, 0.0);
    assert!(c.is_dirty(id));
    assert!(!c.reset_dirty().is_empty());

    c.set_x(id, 30.0);
    assert!(!c.is_dirty(id));
    assert!(c.reset_dirty().is_empty());

    c.set_visible(id, 1.0);
    assert!(c.is_dirty(id));
    assert_eq!(c.reset_dirty().rects(), &[IntRect::new(27, 5, 6, 6)]);
}

#[test]
fn full_update_mode_returns_whole() {
    let config = GfxConfig {
        canvas_full_update: true,
        ..GfxConfig::default()
    };
    let mut c = Canvas::with_config(IntSize::new(16, 16), &config);
    assert!(c.reset_dirty().is_whole());
}

#[test]
fn dynamic_area_joins_non_empty_updates() {
    let mut c = canvas();
    let root = c.root();
    let dynamic = square(&mut c, root, WHITE, 2, 50.0, 50.0);
    c.set_dynamic_area(IntRect::new(0, 0, 4, 4));
    c.add_dynamic_item(dynamic);
    c.reset_dirty();
    assert!(c.reset_dirty().is_empty());

    let root = c.root();
    let id = square(&mut c, root, WHITE, 2, 20.0, 20.0);
    let region = c.reset_dirty();
    assert!(region.contains_rect(c.bounding_rect(id)));
    assert!(region.contains_rect(IntRect::new(0, 0, 4, 4)));
    assert!(region.contains_rect(c.bounding_rect(dynamic)));
}

#[test]
fn removing_an_item_repaints_its_area_and_frees_the_subtree() {
    let mut c = canvas();
    let g = c.add_item(c.root(), ItemKind::Group).unwrap();
    let child = square(&mut c, g, WHITE, 10, 20.0, 20.0);
    c.reset_dirty();

    c.remove_item(g).unwrap();
    assert!(!c.contains(g));
    assert!(!c.contains(child));
    assert_eq!(c.reset_dirty().rects(), &[IntRect::new(14, 14, 12, 12)]);

    let reused = c.add_item(c.root(), ItemKind::Group).unwrap();
    assert!(c.contains(reused));
    assert!(!c.contains(g));
    assert!(!c.contains(child));
}

#[test]
fn invalid_tree_edits_are_rejected() {
    let mut c = canvas();
    let root = c.root();
    let a = c.add_item(root, ItemKind::Group).unwrap();
    let b = c.add_item(a, ItemKind::Group).unwrap();
    assert!(c.remove_item(root).is_err());
    assert!(c.set_parent(a, b).is_err());
    assert!(c.set_parent(root, a).is_err());
    c.remove_item(b).unwrap();
    assert!(c.add_item(b, ItemKind::Group).is_err());
    assert!(c.remove_item(b).is_err());
}

#[test]
fn move_to_parent_keeps_screen_placement() {
    let mut c = canvas();
    let g = c.add_item(c.root(), ItemKind::Group).unwrap();
    c.set_x(g, 50.0);
    c.set_scale(g, 2.0);
    c.set_visible(g, 0.5);
    let root = c.root();
    let id = square(&mut c, root, WHITE, 2, 10.0, 4.0);

    c.move_to_parent(id, g).unwrap();
    assert_eq!(c.item(id).unwrap().parent(), Some(g));
    assert_eq!(c.item(id).unwrap().x(), -20.0);
    assert_eq!(c.global_x(id), 10.0);
    assert_eq!(c.global_y(id), 4.0);
    assert_eq!(c.global_scale(id), 1.0);
    assert_eq!(c.global_visible(id), 1.0);
}

#[test]
fn higher_z_paints_on_top() {
    let mut c = canvas();
    let root = c.root();
    let red = square(&mut c, root, RED, 4, 2.0, 2.0);
    let white = square(&mut c, root, WHITE, 4, 2.0, 2.0);
    c.set_z(red, 1.0);

    let img = render(&mut c, 4, 4);
    assert_eq!(img.pixel32(1, 1), 0xFFFF_0000);
    assert_eq!(c.item(c.root()).unwrap().children(), &[white, red]);
}

#[test]
fn visibility_scales_opacity() {
    let mut c = canvas();
    let root = c.root();
    let id = square(&mut c, root, WHITE, 4, 2.0, 2.0);
    c.set_visible(id, 0.5);
    let img = render(&mut c, 4, 4);
    assert!(close(img.pixel32(0, 0), 0xFF7F_7F7F, 2), "{:08x}", img.pixel32(0, 0));
}

#[test]
fn clip_items_restrict_children() {
    let mut c = canvas();
    let clip = c.add_item(c.root(), ItemKind::clip(2, 2, ClipAxes::BOTH)).unwrap();
    square(&mut c, clip, WHITE, 8, 4.0, 4.0);

    let img = render(&mut c, 8, 8);
    assert_eq!(img.pixel32(1, 1), 0xFFFF_FFFF);
    assert_eq!(img.pixel32(2, 1), 0xFF00_0000);
    assert_eq!(img.pixel32(1, 2), 0xFF00_0000);
    assert_eq!(c.bounding_rect(clip), IntRect::new(0, 0, 2, 2));
}

#[test]
fn unclipped_axis_uses_painter_extent() {
    let mut c = canvas();
    let clip = c.add_item(c.root(), ItemKind::clip(2, 2, ClipAxes::WIDTH)).unwrap();
    square(&mut c, clip, WHITE, 8, 4.0, 4.0);

    let img = render(&mut c, 8, 8);
    assert_eq!(img.pixel32(1, 7), 0xFFFF_FFFF);
    assert_eq!(img.pixel32(2, 7), 0xFF00_0000);
}

#[test]
fn cache_layer_state_follows_changes() {
    let mut c = canvas();
    let layer = c
        .add_item(c.root(), ItemKind::cache_layer(IntSize::new(8, 8), false))
        .unwrap();
    assert_eq!(cache_state(&c, layer), OptState::Invalid);

    let a = square(&mut c, layer, WHITE, 2, 1.0, 1.0);
    render(&mut c, 8, 8);
    c.reset_dirty();
    assert_eq!(cache_state(&c, layer), OptState::None);

    let b = square(&mut c, layer, WHITE, 2, 5.0, 5.0);
    assert_eq!(cache_state(&c, layer), OptState::Add(b));
    assert!(c.is_dirty(layer));
    render(&mut c, 8, 8);
    c.reset_dirty();
    assert!(!c.is_dirty(b));

    c.set_x(a, 3.0);
    assert_eq!(cache_state(&c, layer), OptState::Invalid);
    render(&mut c, 8, 8);
    c.reset_dirty();

    if let Some(ItemKind::CacheLayer(l)) = c.item_mut(layer).map(|i| i.kind_mut()) {
        l.refresh_on_updates = false;
    }
    c.set_x(a, 1.0);
    assert_eq!(cache_state(&c, layer), OptState::None);
    assert!(c.is_dirty(layer));
    c.reset_dirty();

    c.remove_item(b).unwrap();
    assert_eq!(cache_state(&c, layer), OptState::Invalid);
}

#[test]
fn cache_layer_paints_children_into_its_image() {
    let mut c = canvas();
    let layer = c
        .add_item(c.root(), ItemKind::cache_layer(IntSize::new(4, 4), false))
        .unwrap();
    c.set_x(layer, 2.0);
    c.set_y(layer, 2.0);
    square(&mut c, layer, WHITE, 4, 2.0, 2.0);
    assert_eq!(c.bounding_rect(layer), IntRect::new(2, 2, 4, 4));

    let img = render(&mut c, 8, 8);
    assert_eq!(img.pixel32(2, 2), 0xFFFF_FFFF);
    assert_eq!(img.pixel32(5, 5), 0xFFFF_FFFF);
    assert_eq!(img.pixel32(1, 1), 0xFF00_0000);
    assert_eq!(img.pixel32(6, 6), 0xFF00_0000);
}

#[test]
fn reflection_draws_a_faded_mirror() {
    let config = GfxConfig {
        reflection_no_blur: true,
        ..GfxConfig::default()
    };
    let mut c = Canvas::with_config(IntSize::new(4, 4), &config);
    let root = c.root();
    let top = c
        .add_item(root, ItemKind::color(RED, IntSize::new(4, 1)))
        .unwrap();
    c.set_x(top, 2.0);
    c.set_y(top, 0.5);
    let below = c
        .add_item(root, ItemKind::color(WHITE, IntSize::new(4, 1)))
        .unwrap();
    c.set_x(below, 2.0);
    c.set_y(below, 1.5);
    let mirror = c
        .add_item(root, ItemKind::reflection(IntSize::new(4, 2), 0, -2))
        .unwrap();
    c.set_y(mirror, 2.0);
    assert_eq!(c.bounding_rect(mirror), IntRect::new(0, 0, 4, 4));

    let img = render(&mut c, 4, 4);
    assert_eq!(img.pixel32(0, 0), 0xFFFF_0000);
    assert_eq!(img.pixel32(0, 1), 0xFFFF_FFFF);
    assert_eq!(img.pixel32(0, 2), 0xFFFF_FFFF);
    assert!(close(img.pixel32(0, 3), 0xFF80_0000, 2), "{:08x}", img.pixel32(0, 3));
}

#[test]
fn image_bounds_overlay_is_blue() {
    let config = GfxConfig {
        show_image_bounds: true,
        ..GfxConfig::default()
    };
    let mut c = Canvas::with_config(IntSize::new(4, 4), &config);
    let mut black = Image::new(2, 2, PixelFormat::Rgb32);
    black.fill(0xFF00_0000);
    let id = c.add_item(c.root(), ItemKind::image(black)).unwrap();
    c.set_x(id, 1.0);
    c.set_y(id, 1.0);

    let img = render(&mut c, 4, 4);
    let px = img.pixel32(0, 0);
    assert_eq!((px >> 16) & 0xFF, 0);
    assert!(px & 0xFF > 0x70, "{px:08x}");
    assert_eq!(img.pixel32(3, 3), 0xFF00_0000);
}

#[test]
fn update_kind_marks_old_and_new_bounds() {
    let mut c = canvas();
    let root = c.root();
    let id = square(&mut c, root, WHITE, 2, 10.0, 10.0);
    c.reset_dirty();
    c.update_kind(id, |kind| {
        if let ItemKind::Color(color) = kind {
            color.size = IntSize::new(6, 6);
        }
    });
    let region = c.reset_dirty();
    assert_eq!(region.rects(), &[IntRect::new(6, 6, 8, 8)]);
}

#[test]
fn negative_fractional_edges_round_down() {
    let mut c = Canvas::with_config(IntSize::new(4, 4), &GfxConfig::default());
    let mut white = Image::new(2, 2, PixelFormat::Rgb32);
    white.fill(0xFFFF_FFFF);
    let id = c.add_item(c.root(), ItemKind::image(white)).unwrap();
    c.set_x(id, 0.5);
    c.set_y(id, 0.5);
    let root = c.root();
    square(&mut c, root, RED, 2, 3.0, 0.5);

    // Top edges sit at -0.5 and the image's left edge too, so they start one pixel off.
    let img = render(&mut c, 4, 4);
    assert_eq!(img.pixel32(0, 0), 0xFFFF_FFFF);
    assert_eq!(img.pixel32(1, 0), 0xFF00_0000);
    assert_eq!(img.pixel32(0, 1), 0xFF00_0000);
    assert_eq!(img.pixel32(2, 0), 0xFFFF_0000);
    assert_eq!(img.pixel32(3, 0), 0xFFFF_0000);
    assert_eq!(img.pixel32(2, 1), 0xFF00_0000);
}

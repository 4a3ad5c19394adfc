//! Integration tests: canvas layer driven through host events (pw-editor).
//!
//! Runs `CanvasLayer` against the in-memory `ComponentTree` host and checks
//! what ends up on the host: styles, overlays, history and trait schemas.

use pretty_assertions::assert_eq;
use pw_core::geometry::{Point, Rect, SurfaceMetrics};
use pw_core::model::{GridConfigPatch, HandleDirection, SMART_OBJECT_ATTR};
use pw_core::tree::{ComponentNode, ComponentTree};
use pw_core::{CanvasEffect, ComponentModel, NodeId};
use pw_editor::input::FieldUpdate;
use pw_editor::{CanvasLayer, HostEvent, LayerConfig, PointerEvent};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Fixture {
    host: ComponentTree,
    layer: CanvasLayer,
    card: NodeId,
    card_title: NodeId,
    card_image: NodeId,
    banner: NodeId,
}

/// A product card with two children and a hero banner, surface attached.
fn fixture() -> Fixture {
    init_logger();
    let mut host = ComponentTree::new();
    host.attach_surface(SurfaceMetrics {
        frame_origin: Point::new(240.0, 64.0),
        scroll: Point::default(),
    });
    let card = host.add(
        None,
        ComponentNode::new(NodeId::intern("card"), "div")
            .with_attr(SMART_OBJECT_ATTR, "product-card")
            .with_rect(Rect::new(40.0, 40.0, 240.0, 320.0)),
    );
    let card_title = host.add(
        Some(card),
        ComponentNode::new(NodeId::intern("card-title"), "h3")
            .with_rect(Rect::new(50.0, 200.0, 220.0, 30.0)),
    );
    let card_image = host.add(
        Some(card),
        ComponentNode::new(NodeId::intern("card-image"), "img")
            .with_type("image")
            .with_attr("data-gjs-type", "image")
            .with_rect(Rect::new(50.0, 50.0, 220.0, 140.0)),
    );
    let banner = host.add(
        None,
        ComponentNode::new(NodeId::intern("banner"), "section")
            .with_attr(SMART_OBJECT_ATTR, "hero-banner")
            .with_rect(Rect::new(0.0, 400.0, 800.0, 360.0)),
    );

    let mut layer = CanvasLayer::new(LayerConfig::default());
    layer.register_catalog(&mut host).unwrap();
    layer.handle_event(&mut host, HostEvent::Ready, 0.0);
    Fixture {
        host,
        layer,
        card,
        card_title,
        card_image,
        banner,
    }
}

fn count_resolutions(host: &ComponentTree) -> usize {
    host.count(|e| matches!(e, CanvasEffect::ResolveSchema { .. }))
}

// ─── Grid snapping ──────────────────────────────────────────────────────

fn drag_to(f: &mut Fixture, node: NodeId, x: f64) -> Option<String> {
    f.host.set_rect(node, Rect::new(x, 400.0, 800.0, 360.0));
    f.host.get_mut(node).unwrap().style.remove("left");
    f.layer.handle_event(&mut f.host, HostEvent::Drag { node }, 10.0);
    f.host.style(node, "left")
}

#[test]
fn drag_snaps_within_inclusive_threshold() {
    let mut f = fixture();
    let banner = f.banner;
    f.layer
        .handle_event(&mut f.host, HostEvent::DragStart { node: banner }, 0.0);

    assert_eq!(drag_to(&mut f, banner, 187.0).as_deref(), Some("180px"));
    assert_eq!(drag_to(&mut f, banner, 170.0).as_deref(), Some("180px"));
    assert_eq!(drag_to(&mut f, banner, 165.0).as_deref(), Some("160px"));

    f.layer.handle_event(&mut f.host, HostEvent::DragEnd, 20.0);
    assert!(f.host.overlays.guides.is_empty());
}

#[test]
fn snap_decisions_are_per_axis() {
    let mut f = fixture();
    f.layer
        .update_grid_config(
            &mut f.host,
            &GridConfigPatch {
                snap_threshold: Some(3),
                ..GridConfigPatch::default()
            },
        )
        .unwrap();
    let banner = f.banner;
    // x = 182 is 2 from 180; y = 407 is 7 from 400.
    f.host.set_rect(banner, Rect::new(182.0, 407.0, 800.0, 360.0));
    f.layer
        .handle_event(&mut f.host, HostEvent::DragStart { node: banner }, 0.0);
    f.layer
        .handle_event(&mut f.host, HostEvent::Drag { node: banner }, 5.0);
    assert_eq!(f.host.style(banner, "left").as_deref(), Some("180px"));
    assert_eq!(f.host.style(banner, "top"), None);
}

#[test]
fn rejected_grid_patch_changes_nothing() {
    let mut f = fixture();
    let before = f.layer.grid_config();
    let err = f.layer.update_grid_config(
        &mut f.host,
        &GridConfigPatch {
            snap_threshold: Some(-1),
            ..GridConfigPatch::default()
        },
    );
    assert!(err.is_err());
    assert_eq!(f.layer.grid_config(), before);
}

#[test]
fn guides_expire_after_two_seconds() {
    let mut f = fixture();
    let card = f.card;
    f.layer
        .handle_event(&mut f.host, HostEvent::DragStart { node: card }, 1000.0);
    assert!(!f.host.overlays.guides.is_empty());
    assert_eq!(f.layer.next_deadline(), Some(3000.0));
    f.layer.tick(&mut f.host, 3000.0);
    assert!(f.host.overlays.guides.is_empty());
}

#[test]
fn grid_visual_requested_while_detached_appears_on_ready() {
    let mut f = fixture();
    f.host.detach_surface();
    f.layer.toggle_grid_visibility(&mut f.host, true);
    assert_eq!(f.host.overlays.grid_cell, None);

    f.host.attach_surface(SurfaceMetrics::default());
    f.layer.handle_event(&mut f.host, HostEvent::Ready, 50.0);
    assert_eq!(f.host.overlays.grid_cell, Some(20));
}

// ─── Resize ─────────────────────────────────────────────────────────────

#[test]
fn east_resize_clamps_to_minimum_width() {
    let mut f = fixture();
    let banner = f.banner;
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: banner }, 0.0);
    assert_eq!(f.host.overlays.handles.len(), 8);

    f.layer.handle_pointer(
        &mut f.host,
        PointerEvent::HandleDown {
            direction: HandleDirection::E,
            x: 1040.0,
            y: 644.0,
        },
        10.0,
    );
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Move { x: 40.0, y: 644.0 }, 20.0);
    assert_eq!(f.host.style(banner, "width").as_deref(), Some("50px"));
    assert_eq!(f.host.style(banner, "height"), None);
}

#[test]
fn resize_rounds_to_grid_while_grid_is_shown() {
    let mut f = fixture();
    let banner = f.banner;
    f.layer.toggle_grid_visibility(&mut f.host, true);
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: banner }, 0.0);
    f.layer.handle_pointer(
        &mut f.host,
        PointerEvent::HandleDown {
            direction: HandleDirection::S,
            x: 640.0,
            y: 824.0,
        },
        10.0,
    );
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Move { x: 640.0, y: 837.0 }, 20.0);
    // 360 + 13 = 373 → 380
    assert_eq!(f.host.style(banner, "height").as_deref(), Some("380px"));
}

#[test]
fn resize_session_commits_one_history_entry() {
    let mut f = fixture();
    let card = f.card;
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: card }, 0.0);
    f.layer.handle_pointer(
        &mut f.host,
        PointerEvent::HandleDown {
            direction: HandleDirection::Se,
            x: 520.0,
            y: 424.0,
        },
        0.0,
    );
    for step in 1..=5 {
        let d = f64::from(step) * 10.0;
        f.layer.handle_pointer(
            &mut f.host,
            PointerEvent::Move {
                x: 520.0 + d,
                y: 424.0 + d,
            },
            f64::from(step),
        );
    }
    assert!(f.host.history.is_empty());
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Up { x: 570.0, y: 474.0 }, 6.0);

    assert_eq!(f.host.history, vec![card]);
    assert_eq!(f.host.style(card, "width").as_deref(), Some("290px"));
    assert_eq!(f.host.style(card, "height").as_deref(), Some("370px"));
    assert_eq!(f.host.overlays.pointer_listeners, 0);
    assert!(!f.host.overlays.text_selection_suppressed);

    // handles follow the new rectangle
    let se = f
        .host
        .overlays
        .handles
        .iter()
        .find(|h| h.direction == HandleDirection::Se)
        .unwrap();
    assert_eq!((se.x, se.y), (330.0, 410.0));
}

#[test]
fn handles_move_to_the_new_selection_and_vanish_on_deselect() {
    let mut f = fixture();
    let (card, banner) = (f.card, f.banner);
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: card }, 0.0);
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: banner }, 1.0);
    assert_eq!(f.host.overlays.handles_target, Some(banner));
    assert_eq!(f.host.overlays.handles.len(), 8);

    f.layer.handle_event(&mut f.host, HostEvent::Deselected, 2.0);
    assert_eq!(f.host.overlays.handles_target, None);
    assert!(f.host.overlays.handles.is_empty());
}

#[test]
fn inline_text_never_gets_handles() {
    let mut f = fixture();
    let span = f.host.add(
        Some(f.card),
        ComponentNode::new(NodeId::intern("price-tag"), "span")
            .with_rect(Rect::new(60.0, 240.0, 40.0, 16.0)),
    );
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: span }, 0.0);
    assert!(f.host.overlays.handles.is_empty());

    // a stray press cannot resize what has no handles
    f.layer.handle_pointer(
        &mut f.host,
        PointerEvent::HandleDown {
            direction: HandleDirection::Se,
            x: 340.0,
            y: 320.0,
        },
        1.0,
    );
    assert!(!f.layer.resize().is_active());
    assert_eq!(f.host.overlays.cursor, None);
    assert_eq!(f.host.overlays.pointer_listeners, 0);
}

// ─── Hover ──────────────────────────────────────────────────────────────

#[test]
fn hovering_between_children_keeps_the_outline() {
    let mut f = fixture();
    let (card, title, image) = (f.card, f.card_title, f.card_image);

    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: title }, 0.0);
    f.layer.handle_pointer(
        &mut f.host,
        PointerEvent::Out {
            target: title,
            related: Some(card),
        },
        5.0,
    );
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: card }, 6.0);
    f.layer.tick(&mut f.host, 100.0);

    assert_eq!(f.host.overlays.outline.as_ref().map(|o| o.0), Some(card));
    assert_eq!(f.host.count(|e| matches!(e, CanvasEffect::HideOutline)), 0);

    // the image child is its own component
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: image }, 120.0);
    let outline = f.host.overlays.outline.clone().unwrap();
    assert_eq!(outline.0, image);
    assert_eq!(outline.2, "Image");
}

#[test]
fn disabling_hover_hides_now_and_keeps_stylesheet() {
    let mut f = fixture();
    let title = f.card_title;
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: title }, 0.0);
    f.layer.set_hover_enabled(&mut f.host, false);
    assert_eq!(f.host.overlays.outline, None);
    assert_eq!(f.host.overlays.stylesheets.len(), 1);

    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: title }, 10.0);
    assert_eq!(f.host.overlays.outline, None);
}

#[test]
fn repeated_ready_does_not_strand_the_outline() {
    let mut f = fixture();
    let (card, title) = (f.card, f.card_title);
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: title }, 0.0);
    assert_eq!(f.host.overlays.outline.as_ref().map(|o| o.0), Some(card));

    f.layer.handle_event(&mut f.host, HostEvent::Ready, 10.0);
    assert_eq!(f.host.overlays.outline, None);
    assert_eq!(f.host.overlays.stylesheets.len(), 1);

    let root = f.host.root_id();
    f.layer.handle_pointer(
        &mut f.host,
        PointerEvent::Out {
            target: title,
            related: Some(root),
        },
        20.0,
    );
    f.layer.tick(&mut f.host, 1000.0);
    assert_eq!(f.host.overlays.outline, None);

    // hovering again after the remount outlines as usual
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: title }, 1100.0);
    assert_eq!(f.host.overlays.outline.as_ref().map(|o| o.0), Some(card));
}

// ─── Selection / traits ─────────────────────────────────────────────────

#[test]
fn reselecting_the_same_node_does_not_resolve_again() {
    let mut f = fixture();
    let image = f.card_image;
    for t in 0..3 {
        f.layer.handle_event(
            &mut f.host,
            HostEvent::SelectionChanged { node: image },
            f64::from(t),
        );
    }
    assert_eq!(count_resolutions(&f.host), 1);
    assert_eq!(
        f.host
            .count(|e| matches!(e, CanvasEffect::RefreshTraits { .. })),
        2
    );
}

#[test]
fn image_selection_installs_src_and_alt() {
    let mut f = fixture();
    let image = f.card_image;
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: image }, 0.0);
    f.layer.resolve_builtin(&mut f.host);
    let names = f.host.traits(image).unwrap();
    assert!(names.get("src").is_some());
    assert!(names.get("alt").is_some());
}

#[test]
fn smart_object_gets_its_template_schema() {
    let mut f = fixture();
    let banner = f.banner;
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: banner }, 0.0);
    f.layer.resolve_builtin(&mut f.host);
    let schema = f.host.traits(banner).unwrap();
    assert_eq!(
        schema.names(),
        vec![
            "headline",
            "subheadline",
            "backgroundImage",
            "linkUrl",
            "textAlignment",
            "colorScheme"
        ]
    );
}

#[test]
fn failed_lookup_falls_back_to_minimal_schema() {
    let mut f = fixture();
    let card = f.card;
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: card }, 0.0);
    let ticket = f.host.schema_requests[0].ticket;
    f.layer
        .complete_schema(&mut f.host, ticket, Err("network down".into()));
    assert_eq!(
        f.host.traits(card).unwrap().names(),
        vec!["id", "cssClasses", "title"]
    );
}

#[test]
fn locked_update_does_not_double_apply() {
    let mut f = fixture();
    let banner = f.banner;
    let update = HostEvent::Update {
        node: banner,
        fields: vec![FieldUpdate::new("textAlignment", "center")],
    };
    f.layer.handle_event(&mut f.host, update.clone(), 100.0);
    f.layer.handle_event(&mut f.host, update.clone(), 120.0);
    assert_eq!(f.host.count(CanvasEffect::is_style_write), 1);
    assert_eq!(f.host.style(banner, "text-align").as_deref(), Some("center"));

    // released after the lock window
    f.layer.tick(&mut f.host, 150.0);
    f.layer.handle_event(&mut f.host, update, 150.0);
    assert_eq!(f.host.count(CanvasEffect::is_style_write), 2);
}

#[test]
fn field_updates_reach_attributes_and_styles() {
    let mut f = fixture();
    let image = f.card_image;
    f.layer.handle_event(
        &mut f.host,
        HostEvent::Update {
            node: image,
            fields: vec![
                FieldUpdate::new("src", "/img/shoe.png"),
                FieldUpdate::new("alt", "Red shoe"),
                FieldUpdate::new("colorScheme", "dark"),
                FieldUpdate::new("data-sku", "SKU-42"),
                FieldUpdate::new("data-empty", ""),
            ],
        },
        0.0,
    );
    let node = f.host.get(image).unwrap();
    assert_eq!(node.attributes["src"], "/img/shoe.png");
    assert_eq!(node.attributes["alt"], "Red shoe");
    assert_eq!(node.attributes["data-sku"], "SKU-42");
    assert!(!node.attributes.contains_key("data-empty"));
    assert_eq!(node.style["--pw-bg"], "#111827");
}

// ─── Teardown ───────────────────────────────────────────────────────────

#[test]
fn destroy_removes_every_side_effect() {
    let mut f = fixture();
    let (card, title) = (f.card, f.card_title);
    f.layer.toggle_grid_visibility(&mut f.host, true);
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: card }, 0.0);
    f.layer
        .handle_pointer(&mut f.host, PointerEvent::Over { target: f.banner }, 0.0);
    f.layer.handle_pointer(
        &mut f.host,
        PointerEvent::HandleDown {
            direction: HandleDirection::E,
            x: 520.0,
            y: 264.0,
        },
        1.0,
    );
    f.layer
        .handle_event(&mut f.host, HostEvent::DragStart { node: title }, 2.0);

    f.layer.destroy(&mut f.host);
    let overlays = &f.host.overlays;
    assert_eq!(overlays.outline, None);
    assert!(overlays.handles.is_empty());
    assert!(overlays.guides.is_empty());
    assert_eq!(overlays.grid_cell, None);
    assert_eq!(overlays.cursor, None);
    assert_eq!(overlays.pointer_listeners, 0);
    assert!(!overlays.text_selection_suppressed);
    assert!(overlays.stylesheets.is_empty());
}

#[test]
fn calls_after_destroy_leave_the_host_alone() {
    let mut f = fixture();
    let card = f.card;
    f.layer
        .handle_event(&mut f.host, HostEvent::SelectionChanged { node: card }, 0.0);
    let ticket = f.layer.selection().pending().map(|r| r.ticket);
    f.layer.destroy(&mut f.host);
    let before = f.host.applied.len();

    f.layer.toggle_grid_visibility(&mut f.host, true);
    f.layer
        .update_grid_config(
            &mut f.host,
            &GridConfigPatch {
                visible: Some(true),
                ..GridConfigPatch::default()
            },
        )
        .unwrap();
    f.layer.set_hover_enabled(&mut f.host, false);
    f.layer.set_resize_enabled(&mut f.host, false);
    let mut late = pw_editor::catalog::builtin_templates().remove(0);
    late.id = "late-card".to_string();
    f.layer.register_template(&mut f.host, late).unwrap();
    if let Some(ticket) = ticket {
        f.layer
            .complete_schema(&mut f.host, ticket, Err("gone".to_string()));
    }
    f.layer.resolve_builtin(&mut f.host);

    assert_eq!(f.host.applied.len(), before);
    assert_eq!(f.host.overlays.grid_cell, None);
    assert!(!f.host.palette.iter().any(|p| p.id == "late-card"));
}

//! Style transitions scheduled on live objects.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use lumen_ui::{Font, ObjId, Style, Ui, UiConfig};
use std::sync::Arc;

fn setup() -> (Ui, ObjId) {
    let mut ui = Ui::new(UiConfig::default());
    let screen = ui.tree().active_screen().unwrap();
    let obj = ui.create_base(Some(screen)).unwrap();
    (ui, obj)
}

#[test]
fn test_numeric_fields_move_and_end_on_target() {
    let (mut ui, obj) = setup();
    let from = Arc::new(Style::new().radius(0).opa(0));
    let to = Arc::new(Style::new().radius(10).opa(200));
    ui.transition(obj, from.clone(), to.clone(), 100).unwrap();
    assert!(Arc::ptr_eq(&ui.tree().style(obj).unwrap(), &from));

    ui.tick(50);
    let mid = ui.tree().style(obj).unwrap();
    assert_eq!(mid.radius, 5);
    assert_eq!(mid.opa, 100);

    ui.tick(50);
    assert!(Arc::ptr_eq(&ui.tree().style(obj).unwrap(), &to));
    assert!(ui.anims().is_empty());
}

#[test]
fn test_one_sided_border_waits_for_end() {
    let (mut ui, obj) = setup();
    let from = Arc::new(Style::new().no_border());
    let to = Arc::new(Style::new().border(Rgb565::RED, 3));
    ui.transition(obj, from, to, 100).unwrap();

    ui.tick(90);
    let style = ui.tree().style(obj).unwrap();
    assert_eq!(style.border_color, None);
    assert_eq!(style.border_width, 0);

    ui.tick(10);
    let style = ui.tree().style(obj).unwrap();
    assert_eq!(style.border_color, Some(Rgb565::RED));
    assert_eq!(style.border_width, 3);
}

#[test]
fn test_fill_blends_when_both_sides_have_one() {
    let (mut ui, obj) = setup();
    let from = Arc::new(Style::new().fill(Rgb565::BLACK));
    let to = Arc::new(Style::new().fill(Rgb565::new(30, 60, 30)));
    ui.transition(obj, from, to, 100).unwrap();
    ui.tick(50);
    assert_eq!(
        ui.tree().style(obj).unwrap().fill,
        Some(Rgb565::new(15, 30, 15))
    );
}

#[test]
fn test_font_switches_halfway() {
    let (mut ui, obj) = setup();
    let from = Arc::new(Style::new().font(Font::Small));
    let to = Arc::new(Style::new().font(Font::Title));
    ui.transition(obj, from, to, 100).unwrap();

    ui.tick(49);
    assert_eq!(ui.tree().style(obj).unwrap().font, Font::Small);
    ui.tick(1);
    assert_eq!(ui.tree().style(obj).unwrap().font, Font::Title);
}

#[test]
fn test_shared_styles_untouched() {
    let (mut ui, obj) = setup();
    let screen = ui.tree().active_screen().unwrap();
    let neighbour = ui.create_base(Some(screen)).unwrap();
    let shared = ui.tree().style(neighbour).unwrap();
    let snapshot = *shared;

    ui.transition(obj, shared.clone(), Arc::new(Style::new().radius(8)), 100)
        .unwrap();
    ui.tick(50);
    assert_eq!(*ui.tree().style(neighbour).unwrap(), snapshot);
    assert!(Arc::ptr_eq(&ui.tree().style(neighbour).unwrap(), &shared));
}

#[test]
fn test_new_transition_replaces_running_one() {
    let (mut ui, obj) = setup();
    let a = Arc::new(Style::new().radius(0));
    let b = Arc::new(Style::new().radius(20));
    let c = Arc::new(Style::new().radius(4));
    ui.transition(obj, a, b, 100).unwrap();
    ui.tick(50);
    let current = ui.tree().style(obj).unwrap();
    ui.transition(obj, current, c.clone(), 100).unwrap();
    assert_eq!(ui.anims().count(), 1);
    ui.tick(100);
    assert!(Arc::ptr_eq(&ui.tree().style(obj).unwrap(), &c));
}

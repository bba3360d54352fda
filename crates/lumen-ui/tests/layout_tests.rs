//! Layout policies resolved through the Taffy pass.
//!
//! Containers use the default plain style: 10px horizontal padding, 8px
//! vertical padding and a 6px gap between children.

use embedded_graphics::prelude::Point;
use lumen_ui::{Align, Fit, FitPolicy, Layout, ObjId, Ui, UiConfig};

fn container(ui: &mut Ui, layout: Layout, width: u32, height: u32) -> ObjId {
    let screen = ui.tree().active_screen().unwrap();
    let id = ui.create_base(Some(screen)).unwrap();
    let tree = ui.tree_mut();
    tree.set_size(id, width, height).unwrap();
    tree.set_layout(id, layout).unwrap();
    id
}

fn boxed(ui: &mut Ui, parent: ObjId, width: u32, height: u32) -> ObjId {
    let id = ui.create_base(Some(parent)).unwrap();
    ui.tree_mut().set_size(id, width, height).unwrap();
    id
}

fn pos(ui: &Ui, id: ObjId) -> Point {
    Point::new(ui.tree().x(id).unwrap(), ui.tree().y(id).unwrap())
}

#[test]
fn test_column_stacks_children() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Column(Align::Start), 200, 200);
    let a = boxed(&mut ui, c, 50, 20);
    let b = boxed(&mut ui, c, 30, 10);
    ui.refresh_layout().unwrap();

    assert_eq!(pos(&ui, a), Point::new(10, 8));
    assert_eq!(pos(&ui, b), Point::new(10, 34));
}

#[test]
fn test_column_alignment() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Column(Align::End), 200, 200);
    let a = boxed(&mut ui, c, 50, 20);
    ui.refresh_layout().unwrap();
    assert_eq!(pos(&ui, a), Point::new(140, 8));

    ui.tree_mut()
        .set_layout(c, Layout::Column(Align::Center))
        .unwrap();
    ui.refresh_layout().unwrap();
    assert_eq!(pos(&ui, a), Point::new(75, 8));
}

#[test]
fn test_row_places_left_to_right() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Row(Align::Start), 200, 100);
    let a = boxed(&mut ui, c, 50, 20);
    let b = boxed(&mut ui, c, 30, 10);
    ui.refresh_layout().unwrap();

    assert_eq!(pos(&ui, a), Point::new(10, 8));
    assert_eq!(pos(&ui, b), Point::new(66, 8));
}

#[test]
fn test_center_layout() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Center, 200, 200);
    let a = boxed(&mut ui, c, 50, 20);
    ui.refresh_layout().unwrap();
    assert_eq!(pos(&ui, a), Point::new(75, 90));
}

#[test]
fn test_shrink_wraps_children() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Column(Align::Start), 200, 200);
    ui.tree_mut().set_fit(c, Fit::Shrink, Fit::Shrink).unwrap();
    boxed(&mut ui, c, 50, 20);
    boxed(&mut ui, c, 30, 10);
    ui.refresh_layout().unwrap();

    assert_eq!(ui.tree().width(c).unwrap(), 70);
    assert_eq!(ui.tree().height(c).unwrap(), 52);
}

#[test]
fn test_shrink_without_content_keeps_size() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Off, 40, 30);
    ui.tree_mut().set_fit(c, Fit::Shrink, Fit::Shrink).unwrap();
    ui.refresh_layout().unwrap();
    assert_eq!(ui.tree().width(c).unwrap(), 40);
    assert_eq!(ui.tree().height(c).unwrap(), 30);
}

#[test]
fn test_grow_fills_remaining_space() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Row(Align::Start), 200, 100);
    let fixed = boxed(&mut ui, c, 50, 20);
    let grow = boxed(&mut ui, c, 10, 20);
    ui.tree_mut().set_fit(grow, Fit::Grow, Fit::Fixed).unwrap();
    ui.refresh_layout().unwrap();

    assert_eq!(ui.tree().width(fixed).unwrap(), 50);
    assert_eq!(pos(&ui, grow), Point::new(66, 8));
    assert_eq!(ui.tree().width(grow).unwrap(), 124);
}

#[test]
fn test_grow_on_cross_axis_stretches() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Column(Align::Start), 200, 100);
    let grow = boxed(&mut ui, c, 10, 20);
    ui.tree_mut().set_fit(grow, Fit::Grow, Fit::Fixed).unwrap();
    ui.refresh_layout().unwrap();
    assert_eq!(ui.tree().width(grow).unwrap(), 180);
}

/// Free-placement container with a 40x30 child at (50, 20).
fn free_child(ui: &mut Ui, fit: FitPolicy) -> ObjId {
    let c = container(ui, Layout::Off, 200, 100);
    let child = boxed(ui, c, 40, 30);
    let tree = ui.tree_mut();
    tree.set_pos(child, 50, 20).unwrap();
    tree.set_fit_policy(child, fit).unwrap();
    ui.refresh_layout().unwrap();
    child
}

#[test]
fn test_left_edge_grows_to_parent() {
    let mut ui = Ui::new(UiConfig::default());
    let fit = FitPolicy::edges(Fit::Grow, Fit::Fixed, Fit::Fixed, Fit::Fixed);
    let child = free_child(&mut ui, fit);

    assert_eq!(pos(&ui, child), Point::new(0, 20));
    // Right edge stays at 50 + 40.
    assert_eq!(ui.tree().width(child).unwrap(), 90);
    assert_eq!(ui.tree().height(child).unwrap(), 30);
}

#[test]
fn test_right_edge_grows_to_parent() {
    let mut ui = Ui::new(UiConfig::default());
    let fit = FitPolicy::edges(Fit::Fixed, Fit::Grow, Fit::Fixed, Fit::Fixed);
    let child = free_child(&mut ui, fit);

    assert_eq!(pos(&ui, child), Point::new(50, 20));
    assert_eq!(ui.tree().width(child).unwrap(), 150);
}

#[test]
fn test_bottom_edge_grows_to_parent() {
    let mut ui = Ui::new(UiConfig::default());
    let fit = FitPolicy::edges(Fit::Fixed, Fit::Fixed, Fit::Fixed, Fit::Grow);
    let child = free_child(&mut ui, fit);

    assert_eq!(pos(&ui, child), Point::new(50, 20));
    assert_eq!(ui.tree().width(child).unwrap(), 40);
    assert_eq!(ui.tree().height(child).unwrap(), 80);
    assert_eq!(ui.tree().fit(child).unwrap(), fit);
}

#[test]
fn test_both_edges_grow_to_parent() {
    let mut ui = Ui::new(UiConfig::default());
    let child = free_child(&mut ui, FitPolicy::new(Fit::Grow, Fit::Grow));

    assert_eq!(pos(&ui, child), Point::new(0, 0));
    assert_eq!(ui.tree().width(child).unwrap(), 200);
    assert_eq!(ui.tree().height(child).unwrap(), 100);
}

#[test]
fn test_grid_columns() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Grid(2), 200, 200);
    let cells: Vec<ObjId> = (0..4).map(|_| boxed(&mut ui, c, 50, 20)).collect();
    ui.refresh_layout().unwrap();

    assert_eq!(pos(&ui, cells[0]), Point::new(10, 8));
    assert_eq!(pos(&ui, cells[1]), Point::new(103, 8));
    assert_eq!(pos(&ui, cells[2]), Point::new(10, 34));
    assert_eq!(pos(&ui, cells[3]), Point::new(103, 34));
}

#[test]
fn test_pretty_wraps() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Pretty, 140, 200);
    let a = boxed(&mut ui, c, 50, 20);
    let b = boxed(&mut ui, c, 50, 20);
    let wrapped = boxed(&mut ui, c, 50, 20);
    ui.refresh_layout().unwrap();

    assert_eq!(pos(&ui, a), Point::new(10, 8));
    assert_eq!(pos(&ui, b), Point::new(66, 8));
    assert_eq!(pos(&ui, wrapped), Point::new(10, 34));
}

#[test]
fn test_off_keeps_requested_positions() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Off, 200, 200);
    let a = boxed(&mut ui, c, 50, 20);
    ui.tree_mut().set_pos(a, 30, 40).unwrap();
    ui.refresh_layout().unwrap();
    assert_eq!(pos(&ui, a), Point::new(30, 40));
}

#[test]
fn test_layout_is_lazy() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Off, 200, 200);
    let a = boxed(&mut ui, c, 50, 20);
    ui.tree_mut().set_pos(a, 30, 40).unwrap();
    ui.refresh_layout().unwrap();

    ui.tree_mut()
        .set_layout(c, Layout::Column(Align::Start))
        .unwrap();
    assert_eq!(pos(&ui, a), Point::new(30, 40));
    assert!(ui.tree().dirty().needs_layout());
    ui.refresh_layout().unwrap();
    assert_eq!(pos(&ui, a), Point::new(10, 8));
    assert!(!ui.tree().dirty().needs_layout());
}

#[test]
fn test_hidden_child_takes_no_space() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Column(Align::Start), 200, 200);
    let a = boxed(&mut ui, c, 50, 20);
    let b = boxed(&mut ui, c, 50, 20);
    ui.tree_mut().set_hidden(a, true).unwrap();
    ui.refresh_layout().unwrap();
    assert_eq!(pos(&ui, b), Point::new(10, 8));
}

#[test]
fn test_label_measured_by_text() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Column(Align::Start), 200, 200);
    let label = ui.create_label(Some(c), "abc").unwrap();
    let below = boxed(&mut ui, c, 50, 20);
    ui.refresh_layout().unwrap();

    assert_eq!(ui.tree().width(label).unwrap(), 21);
    assert_eq!(ui.tree().height(label).unwrap(), 13);
    assert_eq!(pos(&ui, below), Point::new(10, 27));
}

#[test]
fn test_padding_clamped_on_small_container() {
    let mut ui = Ui::new(UiConfig::default());
    let c = container(&mut ui, Layout::Column(Align::Start), 12, 10);
    let a = boxed(&mut ui, c, 2, 2);
    ui.refresh_layout().unwrap();
    assert_eq!(pos(&ui, a), Point::new(6, 5));
}

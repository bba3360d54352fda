//! Notice lifecycle: hold, fade, collapse and self-destruction.

use lumen_ui::{DrawCommand, ObjId, Ui, UiConfig, UiError};

fn notice(ui: &mut Ui, text: &str) -> (ObjId, u32) {
    let id = ui.add_notice(text).unwrap();
    let height = ui.tree().height(id).unwrap();
    (id, height)
}

#[test]
fn test_notice_sized_to_text() {
    let mut ui = Ui::new(UiConfig::default());
    let (id, height) = notice(&mut ui, "X");
    // 6x10 glyph plus 8px/6px padding.
    assert_eq!(ui.tree().width(id).unwrap(), 22);
    assert_eq!(height, 22);
    assert!(!ui.tree().obj(id).unwrap().is_clickable());
}

#[cfg(feature = "notice-fade")]
#[test]
fn test_notice_timeline() {
    let mut ui = Ui::new(UiConfig::default());
    let (id, height) = notice(&mut ui, "Saved");

    for _ in 0..15 {
        ui.tick(100);
        assert_eq!(ui.tree().opa(id).unwrap(), 255);
        assert_eq!(ui.tree().height(id).unwrap(), height);
    }

    // Halfway through the fade and the collapse the values are linear.
    ui.tick(100);
    let opa = ui.tree().opa(id).unwrap();
    assert!((127..=128).contains(&opa), "opa {}", opa);
    ui.tick(100);
    assert_eq!(ui.tree().opa(id).unwrap(), 0);
    assert_eq!(ui.tree().height(id).unwrap(), height);

    ui.tick(100);
    assert_eq!(height, 22);
    assert_eq!(ui.tree().height(id).unwrap(), height / 2);

    ui.tick(100);
    assert!(!ui.tree().is_alive(id));
    assert!(ui.anims().is_empty());
}

#[cfg(not(feature = "notice-fade"))]
#[test]
fn test_notice_timeline_without_fade() {
    let mut ui = Ui::new(UiConfig::default());
    let (id, height) = notice(&mut ui, "Saved");

    ui.tick(1500);
    assert_eq!(ui.tree().opa(id).unwrap(), 255);
    assert_eq!(ui.tree().height(id).unwrap(), height);
    ui.tick(100);
    let mid = ui.tree().height(id).unwrap();
    assert!(mid > 0 && mid < height);
    ui.tick(100);
    assert!(!ui.tree().is_alive(id));
}

#[test]
fn test_notices_stack_on_the_right() {
    let mut ui = Ui::new(UiConfig::default());
    let (first, _) = notice(&mut ui, "one");
    let (second, _) = notice(&mut ui, "second one");
    ui.refresh_layout().unwrap();

    let a = ui.tree().coords(first).unwrap();
    let b = ui.tree().coords(second).unwrap();
    assert!(b.top_left.y >= a.top_left.y + a.size.height as i32);
    let right = |r: embedded_graphics::primitives::Rectangle| r.top_left.x + r.size.width as i32;
    assert_eq!(right(a), 320);
    assert_eq!(right(b), 320);
    assert_eq!(ui.tree().parent(first).unwrap(), ui.tree().parent(second).unwrap());
}

#[test]
fn test_holder_raised_above_later_siblings() {
    let mut ui = Ui::new(UiConfig::default());
    let screen = ui.tree().active_screen().unwrap();
    let (first, _) = notice(&mut ui, "first");
    let holder = ui.tree().parent(first).unwrap().unwrap();

    let cover = ui.create_base(Some(screen)).unwrap();
    ui.tree_mut().set_size(cover, 320, 240).unwrap();
    assert_eq!(ui.tree().children(screen).unwrap(), &[holder, cover]);

    notice(&mut ui, "second");
    assert_eq!(ui.tree().children(screen).unwrap(), &[cover, holder]);

    // The newest notice text is painted last, over the cover.
    let list = ui.draw_list().unwrap();
    match list.commands().last() {
        Some(DrawCommand::Text { text, .. }) => assert_eq!(text, "second"),
        other => panic!("last command {:?}", other),
    }
}

#[test]
fn test_expired_notice_leaves_holder_only() {
    let mut ui = Ui::new(UiConfig::default());
    let (id, _) = notice(&mut ui, "bye");
    let holder = ui.tree().parent(id).unwrap().unwrap();
    assert_eq!(ui.tree().len(), 4);

    ui.tick(5000);
    ui.tick(5000);
    assert!(!ui.tree().is_alive(id));
    assert!(ui.tree().is_alive(holder));
    assert_eq!(ui.tree().len(), 2);

    // The holder is reused by the next notice.
    let (next, _) = notice(&mut ui, "again");
    assert_eq!(ui.tree().parent(next).unwrap(), Some(holder));
}

#[test]
fn test_destroying_notice_early_cancels_its_tasks() {
    let mut ui = Ui::new(UiConfig::default());
    let (id, _) = notice(&mut ui, "gone");
    assert!(ui.anims().is_animating(id));
    ui.destroy(id).unwrap();
    assert!(ui.anims().is_empty());
    ui.tick(5000);
}

#[test]
fn test_failed_notice_rolls_back() {
    // Screen, holder and notice fit; the label does not.
    let mut ui = Ui::new(UiConfig::default().max_objects(3));
    let err = ui.add_notice("full").unwrap_err();
    assert_eq!(err, UiError::AllocationExhausted { capacity: 3 });
    assert_eq!(ui.tree().len(), 2);
    assert!(ui.anims().is_empty());
}

#[test]
fn test_notice_follows_active_screen() {
    let mut ui = Ui::new(UiConfig::default());
    let (first, _) = notice(&mut ui, "a");
    let other = ui.create_base(None).unwrap();
    ui.tree_mut().set_active_screen(other).unwrap();
    let (second, _) = notice(&mut ui, "b");
    assert_eq!(ui.tree().screen_of(first).unwrap(), ui.tree().screens()[0]);
    assert_eq!(ui.tree().screen_of(second).unwrap(), other);
}

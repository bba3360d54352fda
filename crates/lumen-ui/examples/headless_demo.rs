//! Headless walkthrough: a toggle button, a notice and a fading panel,
//! rendered into an in-memory display.
//!
//! Run with `RUST_LOG=lumen_ui=trace` to follow every signal and task.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;
use lumen_test_utils::TestDisplay;
use lumen_ui::{
    Align, Anim, AnimPath, AnimProp, ButtonAction, InputEvent, Layout, Ui, UiConfig,
};
use std::sync::Arc;

const FRAME_MS: u32 = 16;

fn main() {
    lumen_core::logging::init();
    lumen_core::profiling::set_enabled(true);

    let mut ui = Ui::new(UiConfig::default().screen_size(160, 120));
    let screen = ui.tree().active_screen().expect("initial screen");

    let panel = ui.create_base(Some(screen)).expect("panel");
    {
        let tree = ui.tree_mut();
        tree.set_pos(panel, 8, 8).expect("panel pos");
        tree.set_size(panel, 144, 104).expect("panel size");
        tree.set_layout(panel, Layout::Column(Align::Center))
            .expect("panel layout");
    }
    let pretty = ui.tree().theme().pretty.clone();
    ui.set_style(panel, pretty).expect("panel style");

    let button = ui.create_button(Some(panel)).expect("button");
    ui.tree_mut().set_toggle(button, true).expect("toggle");
    ui.create_label(Some(button), "Toggle").expect("button label");
    ui.tree_mut()
        .set_action(
            button,
            ButtonAction::Release,
            Arc::new(|id| tracing::info!("{} released", id)),
        )
        .expect("action");

    ui.create_label(Some(panel), "lumen").expect("caption");

    let mut display = TestDisplay::new(160, 120);
    ui.render(&mut display).expect("first frame");

    let center = ui.tree().coords(button).expect("button area").center();
    for point in [center, Point::new(0, 0)] {
        ui.handle_input(InputEvent::Press(point));
        ui.handle_input(InputEvent::Release(point));
    }
    tracing::info!("Button is {:?}", ui.tree().state(button));

    ui.add_notice("Saved").expect("notice");
    ui.animate(
        Anim::prop(panel, AnimProp::Opa)
            .values(255, 96)
            .time(600)
            .path(AnimPath::EaseInOut)
            .playback(200),
    );

    let mut frames = 0;
    while !ui.anims().is_empty() {
        lumen_core::profiling::new_frame();
        ui.tick(FRAME_MS);
        if ui.needs_redraw() {
            ui.render(&mut display).expect("frame");
            frames += 1;
        }
    }

    let writes = display.writes();
    let painted = display.painted_bounds(Rgb565::WHITE);
    tracing::info!(
        "{} frames, {} pixel writes, {} objects left, painted {:?}",
        frames,
        writes,
        ui.tree().len(),
        painted,
    );
}

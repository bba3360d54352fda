//! Lumen UI - retained object tree for small displays
//!
//! - Objects with per-kind capability tables instead of inheritance
//! - Shared, immutable styles with animated transitions
//! - Row, column, wrap and grid layouts via Taffy
//! - Buttons with a five-state machine and ink effect
//! - Self-destructing notices driven by chained animations
//! - Rendering into any `embedded-graphics` draw target
//!
//! ## Quick Start
//!
//! ```
//! use lumen_ui::{InputEvent, Ui, UiConfig};
//! use lumen_test_utils::TestDisplay;
//! use embedded_graphics::prelude::Point;
//!
//! let mut ui = Ui::new(UiConfig::default().screen_size(160, 120));
//! let screen = ui.tree().active_screen().unwrap();
//! let button = ui.create_button(Some(screen)).unwrap();
//! ui.tree_mut().set_pos(button, 10, 10).unwrap();
//! ui.create_label(Some(button), "OK").unwrap();
//!
//! let mut display = TestDisplay::new(160, 120);
//! ui.render(&mut display).unwrap();
//!
//! // Main loop:
//! ui.handle_input(InputEvent::Press(Point::new(20, 20)));
//! ui.tick(16);
//! ui.render(&mut display).unwrap();
//! ```

pub mod anim;
pub mod config;
pub mod dirty;
pub mod draw_list;
pub mod error;
pub mod input;
pub mod layout;
mod notice;
pub mod obj;
pub mod render;
pub mod signal;
pub mod style;
pub mod theme;
pub mod transition;
pub mod tree;
pub mod widgets;

pub use anim::{Anim, AnimCtx, AnimEngine, AnimId, AnimPath, AnimProp, AnimSetter};
pub use config::{NoticeConfig, UiConfig};
pub use dirty::DirtyFlags;
pub use draw_list::{DrawCommand, DrawList};
pub use error::{RenderError, UiError, UiResult};
pub use input::InputEvent;
pub use layout::{Align, Fit, FitPolicy, Layout};
pub use obj::{Obj, ObjId, ObjKind};
pub use style::{Font, Opa, Style};
pub use theme::Theme;
pub use transition::StyleTransition;
pub use tree::ObjTree;
pub use widgets::{ButtonAction, ButtonState, ButtonStyle, ImageDsc, InkTimes};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::DrawTarget;
use input::InputState;
use lumen_core::profiling::profile_function;
use std::sync::Arc;
use tracing::{debug, warn};

/// Object tree, animation engine and input state behind one handle.
///
/// The application drives it from its main loop: feed pointer events to
/// [`handle_input`](Self::handle_input), call [`tick`](Self::tick) with the
/// elapsed milliseconds and [`render`](Self::render) when
/// [`needs_redraw`](Self::needs_redraw) says so.
pub struct Ui {
    tree: ObjTree,
    anims: AnimEngine,
    input: InputState,
    config: UiConfig,
    notice_holder: Option<ObjId>,
    draw_list: DrawList,
}

impl Ui {
    /// Create a UI with the default theme and one empty, active screen.
    pub fn new(config: UiConfig) -> Self {
        Self::with_theme(config, Theme::default())
    }

    pub fn with_theme(config: UiConfig, theme: Theme) -> Self {
        let mut tree = ObjTree::new(&config, theme);
        if let Err(err) = tree.create(ObjKind::Base, None, None) {
            warn!("No initial screen: {}", err);
        }
        Self {
            tree,
            anims: AnimEngine::new(),
            input: InputState::default(),
            config,
            notice_holder: None,
            draw_list: DrawList::new(),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn tree(&self) -> &ObjTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ObjTree {
        &mut self.tree
    }

    pub fn anims(&self) -> &AnimEngine {
        &self.anims
    }

    pub fn anims_mut(&mut self) -> &mut AnimEngine {
        &mut self.anims
    }

    /// See [`ObjTree::create`].
    pub fn create(
        &mut self,
        kind: ObjKind,
        parent: Option<ObjId>,
        template: Option<ObjId>,
    ) -> UiResult<ObjId> {
        self.tree.create(kind, parent, template)
    }

    pub fn create_base(&mut self, parent: Option<ObjId>) -> UiResult<ObjId> {
        self.tree.create(ObjKind::Base, parent, None)
    }

    pub fn create_button(&mut self, parent: Option<ObjId>) -> UiResult<ObjId> {
        self.tree.create(ObjKind::Button, parent, None)
    }

    pub fn create_label(&mut self, parent: Option<ObjId>, text: &str) -> UiResult<ObjId> {
        let id = self.tree.create(ObjKind::Label, parent, None)?;
        if let Err(err) = self.tree.set_text(id, text) {
            self.destroy(id)?;
            return Err(err);
        }
        Ok(id)
    }

    pub fn create_image(&mut self, parent: Option<ObjId>, src: ImageDsc) -> UiResult<ObjId> {
        let id = self.tree.create(ObjKind::Image, parent, None)?;
        if let Err(err) = self.tree.set_src(id, src) {
            self.destroy(id)?;
            return Err(err);
        }
        Ok(id)
    }

    /// Destroy `id` and its subtree, cancelling every animation that
    /// targets any destroyed object before returning.
    pub fn destroy(&mut self, id: ObjId) -> UiResult<Vec<ObjId>> {
        let destroyed = self.tree.destroy(id)?;
        let cancelled = self.anims.cancel_all_for(&destroyed);
        if cancelled > 0 {
            debug!("Cancelled {} animation(s) with {}", cancelled, id);
        }
        self.input.forget(&destroyed);
        if self.notice_holder.is_some_and(|h| destroyed.contains(&h)) {
            self.notice_holder = None;
        }
        Ok(destroyed)
    }

    /// See [`ObjTree::set_style`].
    pub fn set_style(&mut self, id: ObjId, style: Arc<Style>) -> UiResult<()> {
        self.tree.set_style(id, style)
    }

    /// Move `id` from `from` to `to` over `time_ms`. The object takes `from`
    /// right away and ends holding the `to` reference itself.
    pub fn transition(
        &mut self,
        id: ObjId,
        from: Arc<Style>,
        to: Arc<Style>,
        time_ms: u32,
    ) -> UiResult<AnimId> {
        self.tree.set_style(id, from.clone())?;
        let anim = StyleTransition::new(from, to).anim(id, time_ms);
        Ok(self.anims.schedule(anim))
    }

    /// Start an animation task.
    pub fn animate(&mut self, anim: Anim) -> AnimId {
        self.anims.schedule(anim)
    }

    /// Advance animations and press timing by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        profile_function!();
        self.anims.tick(&mut self.tree, elapsed_ms);
        // Completion callbacks may have destroyed the pressed object.
        self.input.forget_dead(&self.tree);
        self.input.tick(
            &mut self.tree,
            &mut self.anims,
            elapsed_ms,
            self.config.long_press_ms,
        );
        if self
            .notice_holder
            .is_some_and(|holder| !self.tree.is_alive(holder))
        {
            self.notice_holder = None;
        }
    }

    /// Deliver a pointer event.
    ///
    /// Hit-testing uses the geometry of the last layout pass.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.handle(&mut self.tree, &mut self.anims, event);
    }

    /// Object currently held down by the pointer.
    pub fn pressed(&self) -> Option<ObjId> {
        self.input.pressed()
    }

    /// See [`ObjTree::refresh_layout`].
    pub fn refresh_layout(&mut self) -> UiResult<()> {
        self.tree.refresh_layout()
    }

    /// Something changed since the last render.
    pub fn needs_redraw(&self) -> bool {
        !self.tree.dirty().is_empty()
    }

    /// Bring layout up to date and record the active screen.
    pub fn draw_list(&mut self) -> UiResult<&DrawList> {
        self.tree.refresh_layout()?;
        self.draw_list.clear();
        render::build(&self.tree, &mut self.draw_list);
        Ok(&self.draw_list)
    }

    /// Lay out, record and paint the active screen onto `target`.
    pub fn render<D>(&mut self, target: &mut D) -> Result<(), RenderError<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        profile_function!();
        self.draw_list()?;
        self.draw_list.paint(target).map_err(RenderError::Draw)?;
        self.tree.clear_dirty();
        Ok(())
    }
}

//! Buttons: a five-state machine driven by press signals, one style per
//! state, and an optional ink effect.
//!
//! With toggling enabled every complete press and release flips the toggled
//! bit, so four input steps from `Released` walk through
//! `Pressed`, `ToggledReleased`, `ToggledPressed` and back to `Released`.
//! Losing the press returns to the pre-press state without flipping.
//! `Inactive` is entered and left only through [`ObjTree::set_state`] and
//! ignores input while set.

use crate::anim::{Anim, AnimProp};
use crate::dirty::DirtyFlags;
use crate::draw_list::DrawList;
use crate::error::{UiError, UiResult};
use crate::layout::{FitPolicy, Layout};
use crate::obj::{Obj, ObjClass, ObjExt, ObjId, RenderCtx, base_hit_test, no_content};
use crate::signal::{Signal, SignalCtx, SignalResult};
use crate::style::Style;
use crate::tree::ObjTree;
use embedded_graphics::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// Button state. Also indexes the button's styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
    ToggledReleased,
    ToggledPressed,
    Inactive,
}

/// Styles are indexed 1:1 by state.
pub type ButtonStyle = ButtonState;

impl ButtonState {
    pub const ALL: [ButtonState; 5] = [
        ButtonState::Released,
        ButtonState::Pressed,
        ButtonState::ToggledReleased,
        ButtonState::ToggledPressed,
        ButtonState::Inactive,
    ];

    pub fn index(self) -> usize {
        match self {
            ButtonState::Released => 0,
            ButtonState::Pressed => 1,
            ButtonState::ToggledReleased => 2,
            ButtonState::ToggledPressed => 3,
            ButtonState::Inactive => 4,
        }
    }

    pub fn is_toggled(self) -> bool {
        matches!(self, ButtonState::ToggledReleased | ButtonState::ToggledPressed)
    }

    pub fn is_pressed(self) -> bool {
        matches!(self, ButtonState::Pressed | ButtonState::ToggledPressed)
    }

    /// State after the pointer goes down.
    pub fn on_press(self) -> Self {
        match self {
            ButtonState::Released => ButtonState::Pressed,
            ButtonState::ToggledReleased => ButtonState::ToggledPressed,
            other => other,
        }
    }

    /// State after the pointer is released on the button.
    pub fn on_release(self, toggle: bool) -> Self {
        match (self, toggle) {
            (ButtonState::Pressed, false) => ButtonState::Released,
            (ButtonState::Pressed, true) => ButtonState::ToggledReleased,
            (ButtonState::ToggledPressed, false) => ButtonState::ToggledReleased,
            (ButtonState::ToggledPressed, true) => ButtonState::Released,
            (other, _) => other,
        }
    }

    /// State after the pointer slides off while pressed.
    pub fn on_press_lost(self) -> Self {
        match self {
            ButtonState::Pressed => ButtonState::Released,
            ButtonState::ToggledPressed => ButtonState::ToggledReleased,
            other => other,
        }
    }

    /// Same pressed-ness, toggled bit flipped. `Inactive` stays put.
    fn flipped(self) -> Self {
        match self {
            ButtonState::Released => ButtonState::ToggledReleased,
            ButtonState::Pressed => ButtonState::ToggledPressed,
            ButtonState::ToggledReleased => ButtonState::Released,
            ButtonState::ToggledPressed => ButtonState::Pressed,
            ButtonState::Inactive => ButtonState::Inactive,
        }
    }
}

/// Events a button can report to user code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Press,
    Release,
    LongPress,
}

impl ButtonAction {
    fn index(self) -> usize {
        match self {
            ButtonAction::Press => 0,
            ButtonAction::Release => 1,
            ButtonAction::LongPress => 2,
        }
    }
}

/// User callback for a [`ButtonAction`].
pub type ActionFn = Arc<dyn Fn(ObjId)>;

/// Ink effect timing in milliseconds. `in_ms == 0` disables the effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InkTimes {
    /// Time for the circle to grow from the touch point.
    pub in_ms: u32,
    /// Time the full circle is held.
    pub wait_ms: u32,
    /// Time for the circle to shrink away.
    pub out_ms: u32,
}

impl InkTimes {
    pub const DISABLED: Self = Self::new(0, 0, 0);

    pub const fn new(in_ms: u32, wait_ms: u32, out_ms: u32) -> Self {
        Self {
            in_ms,
            wait_ms,
            out_ms,
        }
    }

    pub fn enabled(&self) -> bool {
        self.in_ms > 0
    }
}

/// A running ink effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    /// Touch point relative to the button.
    pub center: Point,
    pub radius: u32,
    /// State whose style paints the body under the circle.
    pub base: ButtonState,
}

/// Button fields.
#[derive(Clone)]
pub struct ButtonExt {
    pub(crate) state: ButtonState,
    pub(crate) toggle: bool,
    pub(crate) styles: [Arc<Style>; 5],
    pub(crate) ink_times: InkTimes,
    pub(crate) ink: Option<Ink>,
    pub(crate) actions: [Option<ActionFn>; 3],
}

impl ButtonExt {
    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_toggle(&self) -> bool {
        self.toggle
    }

    pub fn style(&self, which: ButtonStyle) -> &Arc<Style> {
        &self.styles[which.index()]
    }

    pub fn ink_times(&self) -> InkTimes {
        self.ink_times
    }

    pub fn ink(&self) -> Option<Ink> {
        self.ink
    }

    fn action(&self, action: ButtonAction) -> Option<ActionFn> {
        self.actions[action.index()].clone()
    }
}

impl fmt::Debug for ButtonExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonExt")
            .field("state", &self.state)
            .field("toggle", &self.toggle)
            .field("ink_times", &self.ink_times)
            .field("ink", &self.ink)
            .field(
                "actions",
                &self.actions.iter().map(Option::is_some).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

fn construct(obj: &mut Obj, tree: &ObjTree) {
    let styles = tree.theme().button.clone();
    obj.style = styles[ButtonState::Released.index()].clone();
    obj.layout = Layout::Center;
    obj.fit = FitPolicy::FIXED;
    obj.ext = ObjExt::Button(ButtonExt {
        state: ButtonState::Released,
        toggle: false,
        styles,
        ink_times: tree.default_ink(),
        ink: None,
        actions: [None, None, None],
    });
}

fn destruct(obj: &mut Obj) {
    if let Some(btn) = obj.button_mut() {
        btn.ink = None;
        btn.actions = [None, None, None];
    }
}

fn render(obj: &Obj, ctx: &RenderCtx, list: &mut DrawList) {
    let ink = obj.button().and_then(|btn| btn.ink.map(|ink| (btn, ink)));
    match ink {
        Some((btn, ink)) if ink.radius > 0 => {
            ctx.draw_body(btn.style(ink.base), list);
            if let Some(fill) = obj.style.fill {
                let center = ctx.area.top_left + ink.center;
                list.circle(center, ink.radius, ctx.blend(fill), ctx.clip);
            }
        }
        _ => ctx.draw_body(&obj.style, list),
    }
}

fn signal(ctx: &mut SignalCtx<'_>, signal: &Signal) -> SignalResult {
    let id = ctx.id;
    let Some(btn) = ctx.tree.obj(id).ok().and_then(Obj::button) else {
        return SignalResult::Ignored;
    };
    let state = btn.state;
    let toggle = btn.toggle;
    let ink_times = btn.ink_times;
    if state == ButtonState::Inactive {
        return SignalResult::Ignored;
    }

    let (next, action) = match *signal {
        Signal::Pressed(point) => {
            if ink_times.enabled() {
                start_ink(ctx, point, state, ink_times);
            }
            (state.on_press(), Some(ButtonAction::Press))
        }
        Signal::Released(_) if state.is_pressed() => {
            (state.on_release(toggle), Some(ButtonAction::Release))
        }
        Signal::PressLost => (state.on_press_lost(), None),
        Signal::LongPress => (state, Some(ButtonAction::LongPress)),
        Signal::Pressing(_) | Signal::Released(_) => return SignalResult::Ignored,
    };

    if next != state {
        trace!("{} {:?} -> {:?}", id, state, next);
        // A running transition would overwrite the state style.
        if ctx.anims.cancel_transition(id) > 0 {
            trace!("{} state change cut a style transition", id);
        }
        if ctx.tree.set_state(id, next).is_err() {
            return SignalResult::Ignored;
        }
    }
    let callback = action.and_then(|a| ctx.tree.obj(id).ok()?.button()?.action(a));
    if let Some(callback) = callback {
        callback(id);
    }
    SignalResult::Handled
}

fn start_ink(ctx: &mut SignalCtx<'_>, point: Point, base: ButtonState, times: InkTimes) {
    let id = ctx.id;
    let Ok(area) = ctx.tree.coords(id) else {
        return;
    };
    let center = point - area.top_left;
    let dx = center.x.max(area.size.width as i32 - center.x) as f32;
    let dy = center.y.max(area.size.height as i32 - center.y) as f32;
    let radius = (dx * dx + dy * dy).sqrt().ceil() as i32;

    if let Ok(btn) = ctx.tree.button_ext_mut(id) {
        btn.ink = Some(Ink {
            center,
            radius: 0,
            base,
        });
    }

    let InkTimes {
        in_ms,
        wait_ms,
        out_ms,
    } = times;
    ctx.anims.schedule(
        Anim::prop(id, AnimProp::InkRadius)
            .values(0, radius)
            .time(in_ms)
            .on_complete(move |ctx, id| {
                ctx.schedule(
                    Anim::prop(id, AnimProp::InkRadius)
                        .values(radius, 0)
                        .time(out_ms)
                        .delay(wait_ms)
                        .on_complete(|ctx, id| {
                            if let Err(err) = ctx.tree_mut().clear_ink(id) {
                                warn!("Ink of {} not cleared: {}", id, err);
                            }
                        }),
                );
            }),
    );
}

pub(crate) static BUTTON_CLASS: ObjClass = ObjClass {
    name: "button",
    construct,
    destruct,
    render,
    hit_test: base_hit_test,
    signal,
    content_size: no_content,
};

impl ObjTree {
    fn button_ext_mut(&mut self, id: ObjId) -> UiResult<&mut ButtonExt> {
        self.obj_mut(id)?
            .button_mut()
            .ok_or(UiError::WrongKind {
                id,
                expected: BUTTON_CLASS.name,
            })
    }

    fn button_ext(&self, id: ObjId) -> UiResult<&ButtonExt> {
        self.obj(id)?.button().ok_or(UiError::WrongKind {
            id,
            expected: BUTTON_CLASS.name,
        })
    }

    /// Force a button into `state`, including in and out of `Inactive`.
    pub fn set_state(&mut self, id: ObjId, state: ButtonState) -> UiResult<()> {
        let obj = self.obj_mut(id)?;
        let Some(btn) = obj.button_mut() else {
            return Err(UiError::WrongKind {
                id,
                expected: BUTTON_CLASS.name,
            });
        };
        btn.state = state;
        let style = btn.styles[state.index()].clone();
        obj.style = style;
        self.mark(id, DirtyFlags::STATE | DirtyFlags::STYLE);
        Ok(())
    }

    pub fn state(&self, id: ObjId) -> UiResult<ButtonState> {
        self.button_ext(id).map(ButtonExt::state)
    }

    /// Enable or disable toggling. The current state is kept.
    pub fn set_toggle(&mut self, id: ObjId, toggle: bool) -> UiResult<()> {
        self.button_ext_mut(id)?.toggle = toggle;
        Ok(())
    }

    /// Flip the toggled bit without a press. Does nothing on a button that
    /// does not toggle, or while inactive.
    pub fn toggle(&mut self, id: ObjId) -> UiResult<()> {
        let btn = self.button_ext(id)?;
        if !btn.toggle {
            trace!("toggle() on non-toggle button {}", id);
            return Ok(());
        }
        let next = btn.state.flipped();
        if next != btn.state {
            self.set_state(id, next)?;
        }
        Ok(())
    }

    /// Replace the style used for one state. Takes effect immediately when
    /// the button is in that state.
    pub fn set_button_style(
        &mut self,
        id: ObjId,
        which: ButtonStyle,
        style: Arc<Style>,
    ) -> UiResult<()> {
        let obj = self.obj_mut(id)?;
        let Some(btn) = obj.button_mut() else {
            return Err(UiError::WrongKind {
                id,
                expected: BUTTON_CLASS.name,
            });
        };
        btn.styles[which.index()] = style.clone();
        let active = btn.state == which;
        if active {
            obj.style = style;
            self.mark(id, DirtyFlags::STYLE);
        }
        Ok(())
    }

    pub fn button_style(&self, id: ObjId, which: ButtonStyle) -> UiResult<Arc<Style>> {
        self.button_ext(id).map(|btn| btn.style(which).clone())
    }

    pub fn set_ink(&mut self, id: ObjId, times: InkTimes) -> UiResult<()> {
        self.button_ext_mut(id)?.ink_times = times;
        Ok(())
    }

    pub fn set_action(&mut self, id: ObjId, action: ButtonAction, f: ActionFn) -> UiResult<()> {
        self.button_ext_mut(id)?.actions[action.index()] = Some(f);
        Ok(())
    }

    /// Resize a running ink circle. Ignored when no ink is running.
    pub fn set_ink_radius(&mut self, id: ObjId, radius: u32) -> UiResult<()> {
        let Some(ink) = &mut self.button_ext_mut(id)?.ink else {
            return Ok(());
        };
        ink.radius = radius;
        self.mark(id, DirtyFlags::STATE);
        Ok(())
    }

    pub(crate) fn clear_ink(&mut self, id: ObjId) -> UiResult<()> {
        self.button_ext_mut(id)?.ink = None;
        self.mark(id, DirtyFlags::STATE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_cover_all() {
        for (i, s) in ButtonState::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn test_plain_cycle() {
        let s = ButtonState::Released.on_press();
        assert_eq!(s, ButtonState::Pressed);
        assert_eq!(s.on_release(false), ButtonState::Released);
    }

    #[test]
    fn test_toggle_cycle() {
        let mut s = ButtonState::Released;
        let mut seen = Vec::new();
        for _ in 0..2 {
            s = s.on_press();
            seen.push(s);
            s = s.on_release(true);
            seen.push(s);
        }
        assert_eq!(
            seen,
            vec![
                ButtonState::Pressed,
                ButtonState::ToggledReleased,
                ButtonState::ToggledPressed,
                ButtonState::Released,
            ]
        );
    }

    #[test]
    fn test_press_lost_keeps_toggle_bit() {
        assert_eq!(ButtonState::Pressed.on_press_lost(), ButtonState::Released);
        assert_eq!(
            ButtonState::ToggledPressed.on_press_lost(),
            ButtonState::ToggledReleased
        );
    }

    #[test]
    fn test_inactive_absorbs_input() {
        let s = ButtonState::Inactive;
        assert_eq!(s.on_press(), s);
        assert_eq!(s.on_release(true), s);
        assert_eq!(s.on_press_lost(), s);
    }

    #[test]
    fn test_ink_times() {
        assert!(!InkTimes::DISABLED.enabled());
        assert!(InkTimes::new(100, 0, 0).enabled());
        assert!(!InkTimes::new(0, 100, 100).enabled());
    }
}

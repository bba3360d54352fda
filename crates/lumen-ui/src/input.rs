//! Pointer input: hit-testing and signal generation.

use crate::anim::AnimEngine;
use crate::obj::ObjId;
use crate::signal::{Signal, SignalCtx};
use crate::tree::ObjTree;
use embedded_graphics::prelude::Point;
use tracing::trace;

/// Raw pointer event in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(Point),
    Release(Point),
    Move(Point),
}

/// Tracks the object under an active press.
#[derive(Debug, Default)]
pub(crate) struct InputState {
    pressed: Option<ObjId>,
    held_ms: u32,
    long_sent: bool,
    /// Pointer left the pressed object; nothing more is sent until release.
    lost: bool,
}

impl InputState {
    pub fn pressed(&self) -> Option<ObjId> {
        self.pressed.filter(|_| !self.lost)
    }

    pub fn handle(&mut self, tree: &mut ObjTree, anims: &mut AnimEngine, event: InputEvent) {
        match event {
            InputEvent::Press(point) if self.pressed.is_none() => {
                let Some(target) = tree.hit_test(point) else {
                    return;
                };
                trace!("Press at {:?} hits {}", point, target);
                self.pressed = Some(target);
                self.held_ms = 0;
                self.long_sent = false;
                self.lost = false;
                SignalCtx::send(tree, anims, target, Signal::Pressed(point));
            }
            InputEvent::Press(point) | InputEvent::Move(point) => {
                let Some(target) = self.pressed() else {
                    return;
                };
                let inside = tree.coords(target).is_ok_and(|area| area.contains(point));
                if inside {
                    SignalCtx::send(tree, anims, target, Signal::Pressing(point));
                } else {
                    self.lost = true;
                    SignalCtx::send(tree, anims, target, Signal::PressLost);
                }
            }
            InputEvent::Release(point) => {
                if let Some(target) = self.pressed() {
                    SignalCtx::send(tree, anims, target, Signal::Released(point));
                }
                self.reset();
            }
        }
    }

    /// Count press time and emit the long-press signal once.
    pub fn tick(
        &mut self,
        tree: &mut ObjTree,
        anims: &mut AnimEngine,
        elapsed_ms: u32,
        long_press_ms: u32,
    ) {
        let Some(target) = self.pressed() else {
            return;
        };
        if self.long_sent {
            return;
        }
        self.held_ms = self.held_ms.saturating_add(elapsed_ms);
        if self.held_ms >= long_press_ms {
            self.long_sent = true;
            SignalCtx::send(tree, anims, target, Signal::LongPress);
        }
    }

    /// Drop the press if its object is gone, for destroys that bypass
    /// [`forget`](Self::forget).
    pub fn forget_dead(&mut self, tree: &ObjTree) {
        if self.pressed.is_some_and(|p| !tree.is_alive(p)) {
            self.reset();
        }
    }

    /// Drop the press if its object was destroyed.
    pub fn forget(&mut self, destroyed: &[ObjId]) {
        if self.pressed.is_some_and(|p| destroyed.contains(&p)) {
            self.reset();
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

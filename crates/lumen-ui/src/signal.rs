//! Signals delivered to an object's class.

use crate::anim::AnimEngine;
use crate::obj::ObjId;
use crate::tree::ObjTree;
use embedded_graphics::prelude::Point;

/// Input-derived notification for a single object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Pointer went down on the object.
    Pressed(Point),
    /// Pointer is still down and on the object.
    Pressing(Point),
    /// Pointer slid off the object while pressed.
    PressLost,
    /// Pointer was released on the object.
    Released(Point),
    /// Pointer has been held on the object for the long-press time.
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalResult {
    Handled,
    Ignored,
}

/// Everything a signal handler may touch.
pub struct SignalCtx<'a> {
    pub tree: &'a mut ObjTree,
    pub anims: &'a mut AnimEngine,
    /// Object the signal is addressed to.
    pub id: ObjId,
}

impl SignalCtx<'_> {
    /// Dispatch `signal` to `id` through its class table.
    ///
    /// Stale ids are ignored.
    pub fn send(tree: &mut ObjTree, anims: &mut AnimEngine, id: ObjId, signal: Signal) -> SignalResult {
        let Ok(obj) = tree.obj(id) else {
            return SignalResult::Ignored;
        };
        let handler = obj.kind().class().signal;
        let mut ctx = SignalCtx { tree, anims, id };
        tracing::trace!("{:?} -> {}", signal, id);
        handler(&mut ctx, &signal)
    }
}

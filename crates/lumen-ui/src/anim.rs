//! Time-driven property animation.
//!
//! An [`AnimEngine`] owns every running task. The application calls
//! [`AnimEngine::tick`] once per frame with the milliseconds elapsed since the
//! previous call; every task advances by that same delta.
//!
//! Tasks refer to their target through an [`ObjId`], so a task whose object
//! was destroyed is detected by a failed lookup and dropped without touching
//! the tree.
//!
//! # Example
//!
//! ```
//! use lumen_ui::anim::{Anim, AnimProp};
//! use lumen_ui::{Ui, UiConfig};
//!
//! let mut ui = Ui::new(UiConfig::default());
//! let screen = ui.tree().active_screen().unwrap();
//! let obj = ui.create_base(Some(screen)).unwrap();
//!
//! ui.animate(Anim::prop(obj, AnimProp::X).values(0, 100).time(200));
//! ui.tick(100);
//! assert_eq!(ui.tree().x(obj).unwrap(), 50);
//! ui.tick(100);
//! assert_eq!(ui.tree().x(obj).unwrap(), 100);
//! assert!(!ui.anims().is_animating(obj));
//! ```

use crate::error::UiResult;
use crate::obj::ObjId;
use crate::style::Opa;
use crate::transition::StyleTransition;
use crate::tree::ObjTree;
use lumen_core::alloc::{HashSet, IndexSlot, SparseSet};
use lumen_core::profiling::profile_function;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Resolution of progress-based animations such as style transitions.
pub const ANIM_RES: i32 = 256;

/// Repeat count that never runs out.
pub const REPEAT_INFINITE: u16 = u16::MAX;

/// Built-in animatable properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimProp {
    X,
    Y,
    Width,
    Height,
    Opa,
    /// Radius of a button's ink circle.
    InkRadius,
}

impl AnimProp {
    fn apply(self, tree: &mut ObjTree, id: ObjId, value: i32) -> UiResult<()> {
        match self {
            AnimProp::X => tree.set_x(id, value),
            AnimProp::Y => tree.set_y(id, value),
            AnimProp::Width => tree.set_width(id, value.max(0) as u32),
            AnimProp::Height => tree.set_height(id, value.max(0) as u32),
            AnimProp::Opa => tree.set_opa(id, value.clamp(0, 255) as Opa),
            AnimProp::InkRadius => tree.set_ink_radius(id, value.max(0) as u32),
        }
    }
}

/// Custom setter: receives the tree, the target and the current value.
pub type AnimFn = fn(&mut ObjTree, ObjId, i32);

/// How a task writes its value into the target.
#[derive(Clone)]
pub enum AnimSetter {
    Prop(AnimProp),
    Func(AnimFn),
    /// Progress from 0 to [`ANIM_RES`] through a style transition.
    Style(Arc<StyleTransition>),
}

impl AnimSetter {
    /// Two setters write the same thing, so their tasks cannot run together.
    pub fn same_slot(&self, other: &AnimSetter) -> bool {
        match (self, other) {
            (AnimSetter::Prop(a), AnimSetter::Prop(b)) => a == b,
            (AnimSetter::Func(a), AnimSetter::Func(b)) => std::ptr::fn_addr_eq(*a, *b),
            (AnimSetter::Style(_), AnimSetter::Style(_)) => true,
            _ => false,
        }
    }

    fn apply(&self, tree: &mut ObjTree, id: ObjId, value: i32) -> UiResult<()> {
        match self {
            AnimSetter::Prop(prop) => prop.apply(tree, id, value),
            AnimSetter::Func(f) => {
                f(tree, id, value);
                Ok(())
            }
            AnimSetter::Style(transition) => tree.set_style(id, transition.at(value)),
        }
    }
}

impl fmt::Debug for AnimSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimSetter::Prop(prop) => f.debug_tuple("Prop").field(prop).finish(),
            AnimSetter::Func(_) => f.write_str("Func"),
            AnimSetter::Style(_) => f.write_str("Style"),
        }
    }
}

/// Interpolation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimPath {
    #[default]
    Linear,
    /// Holds `start` until the end, then jumps to `end`.
    Step,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl AnimPath {
    /// Value at `act_time` of a `time` long leg from `start` to `end`.
    pub fn value(self, start: i32, end: i32, act_time: u32, time: u32) -> i32 {
        if act_time >= time {
            return end;
        }
        let span = end as i64 - start as i64;
        match self {
            AnimPath::Linear => (start as i64 + span * act_time as i64 / time as i64) as i32,
            AnimPath::Step => start,
            AnimPath::EaseIn | AnimPath::EaseOut | AnimPath::EaseInOut => {
                let t = act_time as f32 / time as f32;
                let eased = match self {
                    AnimPath::EaseIn => t * t,
                    AnimPath::EaseOut => t * (2.0 - t),
                    _ if t < 0.5 => 2.0 * t * t,
                    _ => -1.0 + (4.0 - 2.0 * t) * t,
                };
                (start as i64 + (span as f32 * eased).round() as i64) as i32
            }
        }
    }
}

/// One-shot completion callback.
pub type CompleteFn = Box<dyn FnOnce(&mut AnimCtx<'_>, ObjId)>;

/// An animation task.
pub struct Anim {
    target: ObjId,
    setter: AnimSetter,
    start: i32,
    end: i32,
    time: u32,
    /// Elapsed time in the current leg. Negative while delayed.
    act_time: i32,
    path: AnimPath,
    repeat: u16,
    repeat_pause: u32,
    playback: bool,
    playback_pause: u32,
    playback_now: bool,
    on_complete: Option<CompleteFn>,
}

impl Anim {
    pub fn new(target: ObjId, setter: AnimSetter) -> Self {
        Self {
            target,
            setter,
            start: 0,
            end: 0,
            time: 0,
            act_time: 0,
            path: AnimPath::Linear,
            repeat: 0,
            repeat_pause: 0,
            playback: false,
            playback_pause: 0,
            playback_now: false,
            on_complete: None,
        }
    }

    /// Animate a built-in property.
    pub fn prop(target: ObjId, prop: AnimProp) -> Self {
        Self::new(target, AnimSetter::Prop(prop))
    }

    pub fn values(mut self, start: i32, end: i32) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Duration of one leg in milliseconds.
    pub fn time(mut self, ms: u32) -> Self {
        self.time = ms;
        self
    }

    /// Wait `ms` before the first value is applied.
    pub fn delay(mut self, ms: u32) -> Self {
        self.act_time = -(ms.min(i32::MAX as u32) as i32);
        self
    }

    pub fn path(mut self, path: AnimPath) -> Self {
        self.path = path;
        self
    }

    /// Run `count` more times after the first leg, pausing `pause_ms` before each.
    pub fn repeat(mut self, count: u16, pause_ms: u32) -> Self {
        self.repeat = count;
        self.repeat_pause = pause_ms;
        self
    }

    /// After the last repeat, run once more from `end` back to `start`.
    pub fn playback(mut self, pause_ms: u32) -> Self {
        self.playback = true;
        self.playback_pause = pause_ms;
        self
    }

    /// Called once, after the final leg has applied its end value.
    pub fn on_complete(mut self, f: impl FnOnce(&mut AnimCtx<'_>, ObjId) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn target(&self) -> ObjId {
        self.target
    }

    pub fn setter(&self) -> &AnimSetter {
        &self.setter
    }

    pub fn act_time(&self) -> i32 {
        self.act_time
    }

    /// Current value, or `None` while delayed.
    pub fn value(&self) -> Option<i32> {
        (self.act_time >= 0)
            .then(|| self.path.value(self.start, self.end, self.act_time as u32, self.time))
    }

    /// Set up the next leg. Returns false when the task is done.
    fn next_leg(&mut self) -> bool {
        if self.repeat > 0 {
            if self.repeat != REPEAT_INFINITE {
                self.repeat -= 1;
            }
            self.act_time = -(self.repeat_pause.min(i32::MAX as u32) as i32);
            true
        } else if self.playback && !self.playback_now {
            self.playback_now = true;
            std::mem::swap(&mut self.start, &mut self.end);
            self.act_time = -(self.playback_pause.min(i32::MAX as u32) as i32);
            true
        } else {
            false
        }
    }
}

impl fmt::Debug for Anim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anim")
            .field("target", &self.target)
            .field("setter", &self.setter)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("time", &self.time)
            .field("act_time", &self.act_time)
            .field("path", &self.path)
            .field("repeat", &self.repeat)
            .field("playback", &self.playback)
            .field("playback_now", &self.playback_now)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimId(IndexSlot);

/// Access given to completion callbacks.
///
/// The engine is busy while callbacks run, so scheduling and cancelling are
/// recorded here and applied before [`AnimEngine::tick`] returns.
pub struct AnimCtx<'a> {
    tree: &'a mut ObjTree,
    pending: &'a mut Vec<Anim>,
    cancels: &'a mut Vec<ObjId>,
}

impl AnimCtx<'_> {
    pub fn tree(&self) -> &ObjTree {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ObjTree {
        self.tree
    }

    pub fn schedule(&mut self, anim: Anim) {
        self.pending.push(anim);
    }

    /// Cancel every task of `target`, including ones scheduled earlier in
    /// this callback.
    pub fn cancel_for(&mut self, target: ObjId) {
        self.pending.retain(|a| a.target != target);
        self.cancels.push(target);
    }

    /// Destroy an object. Its tasks are dropped before the tick ends.
    pub fn destroy(&mut self, id: ObjId) -> UiResult<Vec<ObjId>> {
        self.tree.destroy(id)
    }
}

/// Registry of running animation tasks.
#[derive(Default)]
pub struct AnimEngine {
    tasks: SparseSet<Anim>,
}

impl AnimEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a task. A running task with the same target and setter is
    /// replaced without firing its completion callback.
    pub fn schedule(&mut self, anim: Anim) -> AnimId {
        let replaced = self.cancel_for(anim.target, Some(&anim.setter));
        if replaced > 0 {
            trace!("Replaced {} task(s) on {}", replaced, anim.target);
        }
        AnimId(self.tasks.push(anim))
    }

    /// Remove a task without completing it.
    pub fn cancel(&mut self, id: AnimId) -> bool {
        self.tasks.try_remove(id.0).is_some()
    }

    /// Remove the tasks of `target`, all of them or only those writing
    /// through `setter`. Returns how many were removed.
    pub fn cancel_for(&mut self, target: ObjId, setter: Option<&AnimSetter>) -> usize {
        self.remove_where(|a| {
            a.target == target && setter.is_none_or(|s| s.same_slot(&a.setter))
        })
    }

    /// Remove a running style transition of `target`, if any.
    pub fn cancel_transition(&mut self, target: ObjId) -> usize {
        self.remove_where(|a| a.target == target && matches!(a.setter, AnimSetter::Style(_)))
    }

    fn remove_where(&mut self, doomed: impl Fn(&Anim) -> bool) -> usize {
        let slots: Vec<IndexSlot> = self
            .tasks
            .iter_slots()
            .filter(|(_, a)| doomed(a))
            .map(|(slot, _)| slot)
            .collect();
        for slot in &slots {
            self.tasks.remove(*slot);
        }
        slots.len()
    }

    /// Remove every task targeting any of `ids`.
    pub fn cancel_all_for(&mut self, ids: &[ObjId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let ids: HashSet<ObjId> = ids.iter().copied().collect();
        self.remove_where(|a| ids.contains(&a.target))
    }

    /// Number of running tasks.
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether any task targets `target`.
    pub fn is_animating(&self, target: ObjId) -> bool {
        self.tasks.iter().any(|a| a.target == target)
    }

    pub fn get(&self, id: AnimId) -> Option<&Anim> {
        self.tasks.try_get(id.0)
    }

    /// Advance every task by `elapsed_ms`.
    pub fn tick(&mut self, tree: &mut ObjTree, elapsed_ms: u32) {
        profile_function!();
        let elapsed = elapsed_ms.min(i32::MAX as u32) as i32;

        let mut dropped = Vec::new();
        let mut finished = Vec::new();
        let slots: Vec<IndexSlot> = self.tasks.iter_slots().map(|(slot, _)| slot).collect();
        for slot in slots {
            let anim = self.tasks.get_mut(slot);
            if !tree.is_alive(anim.target) {
                warn!("Dropping animation of destroyed {}", anim.target);
                dropped.push(slot);
                continue;
            }

            anim.act_time = anim.act_time.saturating_add(elapsed);
            if anim.act_time < 0 {
                continue;
            }
            let time = anim.time.min(i32::MAX as u32) as i32;
            if anim.act_time > time {
                anim.act_time = time;
            }
            let value = anim.path.value(anim.start, anim.end, anim.act_time as u32, anim.time);
            if let Err(err) = anim.setter.apply(tree, anim.target, value) {
                warn!("Dropping animation of {}: {}", anim.target, err);
                dropped.push(slot);
                continue;
            }
            if anim.act_time >= time && !anim.next_leg() {
                finished.push(slot);
            }
        }

        for slot in dropped {
            self.tasks.remove(slot);
        }

        let mut pending = Vec::new();
        let mut cancels = Vec::new();
        for slot in finished {
            let mut anim = self.tasks.remove(slot);
            debug!("Animation {:?} of {} finished", anim.setter, anim.target);
            if let Some(callback) = anim.on_complete.take() {
                let mut ctx = AnimCtx {
                    tree: &mut *tree,
                    pending: &mut pending,
                    cancels: &mut cancels,
                };
                callback(&mut ctx, anim.target);
            }
        }

        self.cancel_all_for(&cancels);
        self.purge_dead(tree);
        for anim in pending {
            if tree.is_alive(anim.target) {
                self.schedule(anim);
            }
        }
    }

    /// Drop tasks whose target no longer exists.
    fn purge_dead(&mut self, tree: &ObjTree) {
        self.remove_where(|a| !tree.is_alive(a.target));
    }
}

impl fmt::Debug for AnimEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.tasks.iter()).finish()
    }
}

/// Time needed to go from `start` to `end` at `speed` units per second.
///
/// Never returns 0 for a nonzero distance. A zero speed yields 0 (instant).
pub fn speed_to_time(speed: u32, start: i32, end: i32) -> u32 {
    if speed == 0 {
        return 0;
    }
    let distance = (end as i64 - start as i64).unsigned_abs();
    let time = distance * 1000 / speed as u64;
    if time == 0 && distance > 0 {
        1
    } else {
        time.min(u32::MAX as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_path() {
        assert_eq!(AnimPath::Linear.value(0, 100, 0, 200), 0);
        assert_eq!(AnimPath::Linear.value(0, 100, 50, 200), 25);
        assert_eq!(AnimPath::Linear.value(0, 100, 200, 200), 100);
        assert_eq!(AnimPath::Linear.value(100, 0, 100, 200), 50);
    }

    #[test]
    fn test_step_path() {
        assert_eq!(AnimPath::Step.value(0, 100, 199, 200), 0);
        assert_eq!(AnimPath::Step.value(0, 100, 200, 200), 100);
    }

    #[test]
    fn test_zero_time_is_end() {
        assert_eq!(AnimPath::Linear.value(3, 9, 0, 0), 9);
    }

    #[test]
    fn test_ease_endpoints() {
        for path in [AnimPath::EaseIn, AnimPath::EaseOut, AnimPath::EaseInOut] {
            assert_eq!(path.value(0, 100, 0, 100), 0);
            assert_eq!(path.value(0, 100, 100, 100), 100);
        }
        assert!(AnimPath::EaseIn.value(0, 100, 50, 100) < 50);
        assert!(AnimPath::EaseOut.value(0, 100, 50, 100) > 50);
    }

    #[test]
    fn test_speed_to_time() {
        assert_eq!(speed_to_time(100, 0, 50), 500);
        assert_eq!(speed_to_time(100, 50, 0), 500);
        assert_eq!(speed_to_time(10_000, 0, 1), 1);
        assert_eq!(speed_to_time(100, 5, 5), 0);
        assert_eq!(speed_to_time(0, 0, 10), 0);
    }

    #[test]
    fn test_next_leg_order() {
        let id = ObjId(IndexSlot::new(0, 0));
        let mut a = Anim::prop(id, AnimProp::X)
            .values(0, 10)
            .repeat(1, 30)
            .playback(20);
        assert!(a.next_leg());
        assert_eq!(a.act_time, -30);
        assert_eq!((a.start, a.end), (0, 10));
        assert!(a.next_leg());
        assert_eq!(a.act_time, -20);
        assert_eq!((a.start, a.end), (10, 0));
        assert!(!a.next_leg());
    }

    fn set_nothing(_: &mut ObjTree, _: ObjId, _: i32) {}
    fn set_other(_: &mut ObjTree, _: ObjId, _: i32) {}

    #[test]
    fn test_same_slot() {
        let x = AnimSetter::Prop(AnimProp::X);
        assert!(x.same_slot(&AnimSetter::Prop(AnimProp::X)));
        assert!(!x.same_slot(&AnimSetter::Prop(AnimProp::Y)));
        let f = AnimSetter::Func(set_nothing);
        assert!(f.same_slot(&AnimSetter::Func(set_nothing)));
        assert!(!f.same_slot(&AnimSetter::Func(set_other)));
        assert!(!f.same_slot(&x));
    }
}

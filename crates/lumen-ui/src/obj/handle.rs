//! Generation-tagged object handles.

use lumen_core::alloc::IndexSlot;
use std::fmt;

/// Handle to an object in an [`ObjTree`](crate::ObjTree).
///
/// Handles are `Copy` and never keep an object alive. Once the object is
/// destroyed its slot generation moves on, so the handle stops resolving
/// even if the slot is reused for a new object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjId(pub(crate) IndexSlot);

impl ObjId {
    /// Slot index, unique among live objects.
    pub fn index(&self) -> u32 {
        self.0.index()
    }

    /// Slot generation the handle was issued with.
    pub fn generation(&self) -> u32 {
        self.0.generation()
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}v{}", self.index(), self.generation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let id = ObjId(IndexSlot::new(3, 7));
        assert_eq!(id.to_string(), "obj#7v3");
    }

    #[test]
    fn test_generation_distinguishes() {
        let a = ObjId(IndexSlot::new(0, 1));
        let b = ObjId(IndexSlot::new(1, 1));
        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
    }
}

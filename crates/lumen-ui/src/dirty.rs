//! Dirty flag tracking for objects.

use bitflags::bitflags;

bitflags! {
    /// What changed on an object since the last layout/render pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE           = 0;

        /// Position, size, fit or layout policy changed.
        const LAYOUT         = 1 << 0;

        /// Children were added, removed, or reordered.
        const CHILDREN_ORDER = 1 << 1;

        /// Label text or image source changed; intrinsic size must be re-measured.
        const CONTENT        = 1 << 2;

        /// Style reference swapped. Padding lives in the style, so this also
        /// needs a layout pass.
        const STYLE          = 1 << 3;

        /// Only opacity changed.
        const OPACITY        = 1 << 4;

        /// Widget-specific visual state (button state, ink radius).
        const STATE          = 1 << 5;

        /// Visible/hidden toggle changed.
        const VISIBILITY     = 1 << 6;
    }
}

impl DirtyFlags {
    /// Flags that require the layout pass to run.
    pub const LAYOUT_GROUP: Self = Self::LAYOUT
        .union(Self::CHILDREN_ORDER)
        .union(Self::CONTENT)
        .union(Self::STYLE);

    /// Returns true if any layout-affecting flags are set.
    #[inline]
    pub fn needs_layout(&self) -> bool {
        self.intersects(Self::LAYOUT_GROUP)
    }

    /// Returns true if only visual properties changed (no layout needed).
    #[inline]
    pub fn is_paint_only(&self) -> bool {
        !self.is_empty() && !self.needs_layout()
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}

//! Layout and fit policies, and their translation to Taffy styles.
//!
//! Layout is lazy: setters only mark objects dirty and the tree recomputes
//! geometry in [`ObjTree::refresh_layout`](crate::ObjTree::refresh_layout),
//! which rendering calls first. Taffy sizes children before it can shrink a
//! parent around them, so a fit pass always resolves bottom-up.

use crate::style::Style;
use embedded_graphics::prelude::Size as PxSize;
use taffy::prelude::*;

/// Cross-axis alignment for row and column layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

impl Align {
    fn to_taffy(self) -> AlignItems {
        match self {
            Align::Start => AlignItems::Start,
            Align::Center => AlignItems::Center,
            Align::End => AlignItems::End,
        }
    }
}

/// How an object arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// Children keep their own x/y.
    #[default]
    Off,
    /// Children stacked in a column, centered on both axes.
    Center,
    /// Top-to-bottom column.
    Column(Align),
    /// Left-to-right row.
    Row(Align),
    /// Left-to-right rows that wrap.
    Pretty,
    /// Grid with the given number of equal columns.
    Grid(u16),
}

impl Layout {
    /// True if children are placed by the layout rather than by their x/y.
    pub fn places_children(self) -> bool {
        !matches!(self, Layout::Off)
    }

    fn main_axis_horizontal(self) -> bool {
        matches!(self, Layout::Row(_) | Layout::Pretty)
    }
}

/// Sizing policy along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fit {
    /// Keep the size set by the user.
    #[default]
    Fixed,
    /// Shrink to wrap content (children in flow, or measured text/image).
    Shrink,
    /// Grow to fill the parent's content area.
    Grow,
}

/// Fit policy for each edge of an object.
///
/// An edge set to [`Fit::Grow`] moves out to the matching edge of the
/// parent's content area while the opposite edge keeps its requested
/// position. Inside a parent layout the object's position belongs to the
/// layout, so a growing edge makes the whole axis grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FitPolicy {
    pub left: Fit,
    pub right: Fit,
    pub top: Fit,
    pub bottom: Fit,
}

impl FitPolicy {
    pub const FIXED: Self = Self::new(Fit::Fixed, Fit::Fixed);
    pub const SHRINK: Self = Self::new(Fit::Shrink, Fit::Shrink);

    /// Same policy on both edges of each axis.
    pub const fn new(hor: Fit, ver: Fit) -> Self {
        Self::edges(hor, hor, ver, ver)
    }

    pub const fn edges(left: Fit, right: Fit, top: Fit, bottom: Fit) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Policy of the horizontal axis as a whole.
    pub fn hor(&self) -> Fit {
        axis(self.left, self.right)
    }

    /// Policy of the vertical axis as a whole.
    pub fn ver(&self) -> Fit {
        axis(self.top, self.bottom)
    }
}

/// A growing edge wins over a shrinking one.
fn axis(start: Fit, end: Fit) -> Fit {
    if start == Fit::Grow || end == Fit::Grow {
        Fit::Grow
    } else if start == Fit::Shrink || end == Fit::Shrink {
        Fit::Shrink
    } else {
        Fit::Fixed
    }
}

/// Insets and size along one axis of an absolutely placed object with at
/// least one growing edge.
fn grow_edges(
    start: Fit,
    end: Fit,
    pos: i32,
    len: u32,
) -> (LengthPercentageAuto, LengthPercentageAuto, Dimension) {
    let at = |v: i32| LengthPercentageAuto::Length(v as f32);
    match (start == Fit::Grow, end == Fit::Grow) {
        (true, true) => (at(0), at(0), Dimension::Auto),
        // Far edge stays where the requested geometry put it.
        (true, false) => (
            at(0),
            LengthPercentageAuto::Auto,
            Dimension::Length(pos.saturating_add(len as i32).max(0) as f32),
        ),
        (false, true) => (at(pos), at(0), Dimension::Auto),
        (false, false) => (at(pos), LengthPercentageAuto::Auto, Dimension::Length(len as f32)),
    }
}

/// Intrinsic content size attached to measured Taffy leaves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentSize {
    pub width: f32,
    pub height: f32,
}

impl From<PxSize> for ContentSize {
    fn from(size: PxSize) -> Self {
        Self {
            width: size.width as f32,
            height: size.height as f32,
        }
    }
}

/// Geometry and policies of one object, as seen by the layout pass.
pub(crate) struct LayoutInput<'a> {
    pub x: i32,
    pub y: i32,
    pub size: PxSize,
    pub layout: Layout,
    pub fit: FitPolicy,
    pub style: &'a Style,
    /// Object has a measured intrinsic size (label, image).
    pub measured: bool,
    /// Layout of the parent, `None` for screens.
    pub parent_layout: Option<Layout>,
}

impl LayoutInput<'_> {
    /// Shrink only makes sense when there is something to wrap.
    fn shrinks(&self, fit: Fit) -> bool {
        fit == Fit::Shrink && (self.measured || self.layout.places_children())
    }

    fn dimension(&self, fit: Fit, fixed: u32, horizontal: bool) -> (Dimension, f32) {
        match (fit, self.parent_layout) {
            (Fit::Grow, Some(parent)) if parent.places_children() => {
                if parent.main_axis_horizontal() == horizontal
                    && !matches!(parent, Layout::Grid(_) | Layout::Center)
                {
                    (Dimension::Length(0.0), 1.0)
                } else {
                    (Dimension::Auto, 0.0)
                }
            }
            (Fit::Grow, _) => (Dimension::Percent(1.0), 0.0),
            (fit, _) if self.shrinks(fit) => (Dimension::Auto, 0.0),
            _ => (Dimension::Length(fixed as f32), 0.0),
        }
    }

    /// Build the Taffy style for this object.
    pub fn to_taffy(&self) -> TaffyStyle {
        let mut out = TaffyStyle::default();

        let (hor, ver) = (self.fit.hor(), self.fit.ver());
        let (width, grow_w) = self.dimension(hor, self.size.width, true);
        let (height, grow_h) = self.dimension(ver, self.size.height, false);
        out.size = Size { width, height };
        if grow_w > 0.0 || grow_h > 0.0 {
            out.flex_grow = 1.0;
            out.flex_basis = Dimension::Length(0.0);
        }
        let cross_grow = |fit: Fit, horizontal: bool| {
            fit == Fit::Grow
                && self.parent_layout.is_some_and(|p| {
                    p.places_children() && p.main_axis_horizontal() != horizontal
                })
        };
        if cross_grow(hor, true) || cross_grow(ver, false) {
            out.align_self = Some(AlignSelf::Stretch);
        }

        match self.parent_layout {
            Some(parent) if parent.places_children() => {
                out.position = Position::Relative;
            }
            Some(_) => {
                out.position = Position::Absolute;
                out.inset = Rect {
                    left: LengthPercentageAuto::Length(self.x as f32),
                    top: LengthPercentageAuto::Length(self.y as f32),
                    right: LengthPercentageAuto::Auto,
                    bottom: LengthPercentageAuto::Auto,
                };
                if hor == Fit::Grow {
                    let (left, right, width) =
                        grow_edges(self.fit.left, self.fit.right, self.x, self.size.width);
                    out.inset.left = left;
                    out.inset.right = right;
                    out.size.width = width;
                }
                if ver == Fit::Grow {
                    let (top, bottom, height) =
                        grow_edges(self.fit.top, self.fit.bottom, self.y, self.size.height);
                    out.inset.top = top;
                    out.inset.bottom = bottom;
                    out.size.height = height;
                }
            }
            None => {}
        }

        if self.layout.places_children() {
            // A fixed axis never shrinks below its padding, so clamp padding
            // to the size the object was given.
            let pad_h = clamp_pad(self.style.pad_hor, hor, self.size.width);
            let pad_v = clamp_pad(self.style.pad_ver, ver, self.size.height);
            out.padding = Rect {
                left: LengthPercentage::Length(pad_h),
                right: LengthPercentage::Length(pad_h),
                top: LengthPercentage::Length(pad_v),
                bottom: LengthPercentage::Length(pad_v),
            };
            let gap = LengthPercentage::Length(self.style.pad_inner as f32);
            out.gap = Size {
                width: gap,
                height: gap,
            };
        }

        match self.layout {
            Layout::Off => {}
            Layout::Center => {
                out.flex_direction = FlexDirection::Column;
                out.justify_content = Some(JustifyContent::Center);
                out.align_items = Some(AlignItems::Center);
            }
            Layout::Column(align) => {
                out.flex_direction = FlexDirection::Column;
                out.align_items = Some(align.to_taffy());
            }
            Layout::Row(align) => {
                out.flex_direction = FlexDirection::Row;
                out.align_items = Some(align.to_taffy());
            }
            Layout::Pretty => {
                out.flex_direction = FlexDirection::Row;
                out.flex_wrap = FlexWrap::Wrap;
                out.align_items = Some(AlignItems::Start);
                out.align_content = Some(AlignContent::Start);
            }
            Layout::Grid(columns) => {
                out.display = Display::Grid;
                out.grid_template_columns = vec![fr(1.0); columns.max(1) as usize];
                // Rows pack at the top instead of stretching over free space.
                out.align_content = Some(AlignContent::Start);
            }
        }

        out
    }
}

/// Taffy's style type, aliased to avoid clashing with [`Style`].
pub(crate) type TaffyStyle = taffy::Style;

fn clamp_pad(pad: u16, fit: Fit, size: u32) -> f32 {
    if fit == Fit::Fixed {
        pad.min((size / 2) as u16) as f32
    } else {
        pad as f32
    }
}

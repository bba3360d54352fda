use super::Obj;
use crate::draw_list::DrawList;
use crate::signal::{Signal, SignalCtx, SignalResult};
use crate::style::{Opa, Style, mix, opa_scale};
use crate::tree::ObjTree;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

/// Per-kind capability table.
///
/// One static table exists per [`ObjKind`](super::ObjKind). Kinds that need
/// no special behavior for an entry reuse the base functions.
pub struct ObjClass {
    pub name: &'static str,
    /// Fill in kind defaults on a freshly allocated object.
    pub construct: fn(&mut Obj, &ObjTree),
    /// Release kind-specific resources. Runs once, children first.
    pub destruct: fn(&mut Obj),
    /// Emit draw commands for the object itself (not its children).
    pub render: fn(&Obj, &RenderCtx, &mut DrawList),
    /// Whether `point` (absolute) hits the object occupying `area`.
    pub hit_test: fn(&Obj, Rectangle, Point) -> bool,
    /// React to an input signal.
    pub signal: fn(&mut SignalCtx<'_>, &Signal) -> SignalResult,
    /// Intrinsic size used by shrink fit.
    pub content_size: fn(&Obj) -> Option<Size>,
}

impl std::fmt::Debug for ObjClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjClass").field("name", &self.name).finish()
    }
}

/// State accumulated from the ancestors while rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    /// Absolute object area.
    pub area: Rectangle,
    /// Intersection of the object area with every ancestor area.
    pub clip: Rectangle,
    /// Product of the opacities down to and including this object.
    pub opa: Opa,
    /// Color the object is drawn over.
    pub bg: Rgb565,
}

impl RenderCtx {
    /// Blend `color` over the background at the accumulated opacity.
    pub fn blend(&self, color: Rgb565) -> Rgb565 {
        mix(color, self.bg, self.opa)
    }

    /// Draw the styled body rectangle of the object.
    pub fn draw_body(&self, style: &Style, list: &mut DrawList) {
        let fill = style.fill.map(|c| self.blend(c));
        let border = style.visible_border().map(|(color, width)| {
            let base = fill.unwrap_or(self.bg);
            (mix(color, base, opa_scale(self.opa, style.border_opa)), width)
        });
        if fill.is_some() || border.is_some() {
            list.rect(self.area, self.clip, fill, border, style.radius);
        }
    }
}

pub(crate) fn noop_construct(_obj: &mut Obj, _tree: &ObjTree) {}

pub(crate) fn noop_destruct(_obj: &mut Obj) {}

pub(crate) fn base_render(obj: &Obj, ctx: &RenderCtx, list: &mut DrawList) {
    ctx.draw_body(&obj.style, list);
}

pub(crate) fn base_hit_test(_obj: &Obj, area: Rectangle, point: Point) -> bool {
    area.contains(point)
}

pub(crate) fn ignore_signal(_ctx: &mut SignalCtx<'_>, _signal: &Signal) -> SignalResult {
    SignalResult::Ignored
}

pub(crate) fn no_content(_obj: &Obj) -> Option<Size> {
    None
}

pub(crate) static BASE_CLASS: ObjClass = ObjClass {
    name: "base",
    construct: noop_construct,
    destruct: noop_destruct,
    render: base_render,
    hit_test: base_hit_test,
    signal: ignore_signal,
    content_size: no_content,
};

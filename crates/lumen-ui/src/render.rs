//! Tree walk that turns the active screen into a draw list.

use crate::draw_list::DrawList;
use crate::obj::{ObjId, RenderCtx};
use crate::style::{OPA_COVER, OPA_TRANSP, Opa, mix, opa_scale};
use crate::tree::ObjTree;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::prelude::Point;
use embedded_graphics::primitives::Rectangle;
use lumen_core::profiling::profile_function;

/// Color assumed under the screen.
const DISPLAY_BG: Rgb565 = Rgb565::BLACK;

/// Record the active screen into `list`, back to front.
///
/// Layout must be current; [`Ui::render`](crate::Ui::render) takes care of it.
pub fn build(tree: &ObjTree, list: &mut DrawList) {
    profile_function!();
    let Some(screen) = tree.active_screen() else {
        return;
    };
    let full = Rectangle::new(Point::zero(), tree.screen_size());
    walk(tree, screen, Point::zero(), full, OPA_COVER, DISPLAY_BG, list);
}

fn walk(
    tree: &ObjTree,
    id: ObjId,
    origin: Point,
    clip: Rectangle,
    opa: Opa,
    bg: Rgb565,
    list: &mut DrawList,
) {
    let Some(obj) = tree.get(id) else {
        return;
    };
    if obj.hidden {
        return;
    }
    let opa = opa_scale(opa, opa_scale(obj.opa, obj.style.opa));
    if opa == OPA_TRANSP {
        return;
    }
    let area = Rectangle::new(origin + obj.area.top_left, obj.area.size);
    let clip = clip.intersection(&area);
    if clip.is_zero_sized() {
        return;
    }

    let ctx = RenderCtx {
        area,
        clip,
        opa,
        bg,
    };
    (obj.kind.class().render)(obj, &ctx, list);

    let inner_bg = obj.style.fill.map_or(bg, |fill| mix(fill, bg, opa));
    for &child in &obj.children {
        walk(tree, child, area.top_left, clip, opa, inner_bg, list);
    }
}

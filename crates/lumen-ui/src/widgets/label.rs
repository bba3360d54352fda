//! Text labels.

use crate::dirty::DirtyFlags;
use crate::draw_list::DrawList;
use crate::error::{UiError, UiResult};
use crate::layout::{Fit, FitPolicy};
use crate::obj::{
    Obj, ObjClass, ObjExt, ObjId, RenderCtx, base_hit_test, ignore_signal, noop_destruct,
};
use crate::tree::ObjTree;
use embedded_graphics::prelude::*;

/// Label fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelExt {
    pub(crate) text: String,
}

impl LabelExt {
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn construct(obj: &mut Obj, tree: &ObjTree) {
    obj.style = tree.theme().label.clone();
    obj.click = false;
    obj.fit = FitPolicy::SHRINK;
    obj.ext = ObjExt::Label(LabelExt::default());
}

fn render(obj: &Obj, ctx: &RenderCtx, list: &mut DrawList) {
    ctx.draw_body(&obj.style, list);
    let Some(label) = obj.label() else { return };
    if label.text.is_empty() {
        return;
    }
    list.text(
        ctx.area.top_left,
        &label.text,
        obj.style.font,
        ctx.blend(obj.style.text_color),
        ctx.clip,
    );
}

fn content_size(obj: &Obj) -> Option<Size> {
    obj.label().map(|label| obj.style.font.text_size(&label.text))
}

pub(crate) static LABEL_CLASS: ObjClass = ObjClass {
    name: "label",
    construct,
    destruct: noop_destruct,
    render,
    hit_test: base_hit_test,
    signal: ignore_signal,
    content_size,
};

impl ObjTree {
    /// Replace a label's text. The label is re-measured on the next layout pass.
    pub fn set_text(&mut self, id: ObjId, text: impl Into<String>) -> UiResult<()> {
        let obj = self.obj_mut(id)?;
        let ObjExt::Label(label) = &mut obj.ext else {
            return Err(UiError::WrongKind {
                id,
                expected: LABEL_CLASS.name,
            });
        };
        label.text = text.into();
        if let Some(size) = obj.content_size() {
            if obj.fit.hor() == Fit::Shrink {
                obj.size.width = size.width;
            }
            if obj.fit.ver() == Fit::Shrink {
                obj.size.height = size.height;
            }
            obj.area.size = obj.size;
        }
        self.mark(id, DirtyFlags::CONTENT);
        Ok(())
    }

    /// Text of a label.
    pub fn text(&self, id: ObjId) -> UiResult<&str> {
        let obj = self.obj(id)?;
        obj.label().map(LabelExt::text).ok_or(UiError::WrongKind {
            id,
            expected: LABEL_CLASS.name,
        })
    }
}

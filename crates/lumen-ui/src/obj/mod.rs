//! Display objects.
//!
//! Every node in the tree is an [`Obj`]: common geometry, links, style and
//! flags, plus an [`ObjExt`] block with the fields only one kind needs.
//! Behavior that differs per kind lives in that kind's [`ObjClass`] table.

mod class;
mod handle;

pub use class::{ObjClass, RenderCtx};
pub use handle::ObjId;

pub(crate) use class::{BASE_CLASS, base_hit_test, ignore_signal, no_content, noop_destruct};

use crate::dirty::DirtyFlags;
use crate::layout::{FitPolicy, Layout};
use crate::style::{OPA_COVER, Opa, Style};
use crate::widgets::button::ButtonExt;
use crate::widgets::image::ImageExt;
use crate::widgets::label::LabelExt;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use std::sync::Arc;

/// Type tag selecting an object's capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjKind {
    /// Plain rectangle, used for screens and containers.
    Base,
    Label,
    Button,
    Image,
}

impl ObjKind {
    /// The capability table for this kind.
    pub fn class(self) -> &'static ObjClass {
        match self {
            ObjKind::Base => &BASE_CLASS,
            ObjKind::Label => &crate::widgets::label::LABEL_CLASS,
            ObjKind::Button => &crate::widgets::button::BUTTON_CLASS,
            ObjKind::Image => &crate::widgets::image::IMAGE_CLASS,
        }
    }

    pub fn name(self) -> &'static str {
        self.class().name
    }
}

/// Kind-specific fields.
#[derive(Debug, Clone)]
pub enum ObjExt {
    Base,
    Label(LabelExt),
    Button(ButtonExt),
    Image(ImageExt),
}

/// A node of the object tree.
#[derive(Debug)]
pub struct Obj {
    pub(crate) kind: ObjKind,
    pub(crate) parent: Option<ObjId>,
    pub(crate) children: Vec<ObjId>,
    /// Position requested by the user, relative to the parent.
    pub(crate) pos: Point,
    /// Size requested by the user.
    pub(crate) size: Size,
    /// Resolved area relative to the parent, updated by the layout pass.
    pub(crate) area: Rectangle,
    pub(crate) style: Arc<Style>,
    pub(crate) opa: Opa,
    pub(crate) hidden: bool,
    pub(crate) click: bool,
    pub(crate) layout: Layout,
    pub(crate) fit: FitPolicy,
    pub(crate) taffy: taffy::NodeId,
    pub(crate) dirty: DirtyFlags,
    pub(crate) ext: ObjExt,
}

impl Obj {
    pub(crate) fn new(
        kind: ObjKind,
        parent: Option<ObjId>,
        taffy: taffy::NodeId,
        style: Arc<Style>,
    ) -> Self {
        let size = Size::new(100, 50);
        Self {
            kind,
            parent,
            children: Vec::new(),
            pos: Point::zero(),
            size,
            area: Rectangle::new(Point::zero(), size),
            style,
            opa: OPA_COVER,
            hidden: false,
            click: true,
            layout: Layout::Off,
            fit: FitPolicy::FIXED,
            taffy,
            dirty: DirtyFlags::LAYOUT | DirtyFlags::STYLE,
            ext: ObjExt::Base,
        }
    }

    /// Copy everything but identity and links from `template`.
    ///
    /// The style is shared. The extension block is deep-copied only when both
    /// objects are of the same kind; otherwise this object keeps the defaults
    /// its class constructed.
    pub(crate) fn copy_from(&mut self, template: &Obj) {
        self.pos = template.pos;
        self.size = template.size;
        self.area = Rectangle::new(template.pos, template.size);
        self.style = template.style.clone();
        self.opa = template.opa;
        self.hidden = template.hidden;
        self.click = template.click;
        self.layout = template.layout;
        self.fit = template.fit;
        if self.kind == template.kind {
            self.ext = template.ext.clone();
            if let ObjExt::Button(btn) = &mut self.ext {
                btn.ink = None;
            }
        }
    }

    pub fn kind(&self) -> ObjKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ObjId> {
        self.parent
    }

    /// Children in paint order, back to front.
    pub fn children(&self) -> &[ObjId] {
        &self.children
    }

    /// Area relative to the parent, as of the last layout pass or setter.
    pub fn area(&self) -> Rectangle {
        self.area
    }

    pub fn style(&self) -> &Arc<Style> {
        &self.style
    }

    pub fn opa(&self) -> Opa {
        self.opa
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_clickable(&self) -> bool {
        self.click
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn fit(&self) -> FitPolicy {
        self.fit
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn ext(&self) -> &ObjExt {
        &self.ext
    }

    pub fn label(&self) -> Option<&LabelExt> {
        match &self.ext {
            ObjExt::Label(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn button(&self) -> Option<&ButtonExt> {
        match &self.ext {
            ObjExt::Button(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageExt> {
        match &self.ext {
            ObjExt::Image(ext) => Some(ext),
            _ => None,
        }
    }

    pub(crate) fn button_mut(&mut self) -> Option<&mut ButtonExt> {
        match &mut self.ext {
            ObjExt::Button(ext) => Some(ext),
            _ => None,
        }
    }

    /// Intrinsic content size, if this kind has one.
    pub fn content_size(&self) -> Option<Size> {
        (self.kind.class().content_size)(self)
    }

    pub(crate) fn mark(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }
}

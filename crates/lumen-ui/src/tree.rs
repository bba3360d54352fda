//! Object tree with Taffy layout integration.

use crate::config::UiConfig;
use crate::dirty::DirtyFlags;
use crate::error::{UiError, UiResult};
use crate::layout::{ContentSize, Fit, FitPolicy, Layout, LayoutInput};
use crate::obj::{Obj, ObjId, ObjKind};
use crate::style::{Opa, Style};
use crate::theme::Theme;
use crate::widgets::button::InkTimes;
use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use lumen_core::alloc::SparseSet;
use lumen_core::profiling::{profile_function, profile_scope};
use std::sync::Arc;
use taffy::{AvailableSpace, TaffyTree};
use tracing::{debug, warn};

/// Owns every object and the layout engine state behind them.
///
/// Objects are addressed by [`ObjId`]. Every mutator validates the handle
/// and returns [`UiError::InvalidHandle`] for destroyed objects.
pub struct ObjTree {
    objs: SparseSet<Obj>,
    taffy: TaffyTree<ContentSize>,
    screens: Vec<ObjId>,
    active: Option<ObjId>,
    theme: Theme,
    screen_size: Size,
    default_ink: InkTimes,
    /// Union of everything marked since the last render.
    dirty: DirtyFlags,
}

impl ObjTree {
    pub fn new(config: &UiConfig, theme: Theme) -> Self {
        Self {
            objs: SparseSet::with_limit(config.max_objects),
            taffy: TaffyTree::new(),
            screens: Vec::new(),
            active: None,
            theme,
            screen_size: config.screen_size,
            default_ink: config.ink,
            dirty: DirtyFlags::NONE,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Ink timing given to new buttons.
    pub fn default_ink(&self) -> InkTimes {
        self.default_ink
    }

    pub fn screen_size(&self) -> Size {
        self.screen_size
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    /// Maximum number of live objects.
    pub fn capacity(&self) -> usize {
        self.objs.limit().unwrap_or(usize::MAX)
    }

    pub fn is_alive(&self, id: ObjId) -> bool {
        self.objs.contains(id.0)
    }

    pub fn get(&self, id: ObjId) -> Option<&Obj> {
        self.objs.try_get(id.0)
    }

    pub fn obj(&self, id: ObjId) -> UiResult<&Obj> {
        self.objs
            .try_get(id.0)
            .ok_or(UiError::InvalidHandle { id })
    }

    pub(crate) fn obj_mut(&mut self, id: ObjId) -> UiResult<&mut Obj> {
        self.objs
            .try_get_mut(id.0)
            .ok_or(UiError::InvalidHandle { id })
    }

    /// Record a change on `id`. Stale handles are ignored.
    pub(crate) fn mark(&mut self, id: ObjId, flags: DirtyFlags) {
        if let Some(obj) = self.objs.try_get_mut(id.0) {
            obj.mark(flags);
            self.dirty |= flags;
        }
    }

    /// Everything marked since the last [`clear_dirty`](Self::clear_dirty).
    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
        for obj in self.objs.iter_mut() {
            obj.dirty = DirtyFlags::NONE;
        }
    }

    pub fn screens(&self) -> &[ObjId] {
        &self.screens
    }

    /// Screen that is rendered and receives input.
    pub fn active_screen(&self) -> Option<ObjId> {
        self.active
    }

    pub fn set_active_screen(&mut self, id: ObjId) -> UiResult<()> {
        if self.obj(id)?.parent.is_some() {
            return Err(UiError::WrongKind {
                id,
                expected: "screen",
            });
        }
        self.active = Some(id);
        self.mark(id, DirtyFlags::CHILDREN_ORDER);
        Ok(())
    }

    /// Create an object of `kind` under `parent`, or a new screen when
    /// `parent` is `None`.
    ///
    /// With a `template`, base fields are copied from it and its style is
    /// shared. Its extension block is deep-copied when it is of the same kind.
    /// Children of the template are not copied.
    pub fn create(
        &mut self,
        kind: ObjKind,
        parent: Option<ObjId>,
        template: Option<ObjId>,
    ) -> UiResult<ObjId> {
        profile_function!();
        let parent_node = parent.map(|p| self.obj(p).map(|o| o.taffy)).transpose()?;
        if let Some(t) = template {
            self.obj(t)?;
        }

        let node = self.taffy.new_leaf(taffy::Style::default())?;
        let style = match parent {
            None => self.theme.screen.clone(),
            Some(_) => self.theme.plain.clone(),
        };
        let mut obj = Obj::new(kind, parent, node, style);
        (kind.class().construct)(&mut obj, self);
        if let Some(t) = template {
            obj.copy_from(self.objs.get(t.0));
        }
        if parent.is_none() {
            obj.pos = Point::zero();
            obj.size = self.screen_size;
            obj.area = Rectangle::new(Point::zero(), self.screen_size);
            obj.fit = FitPolicy::FIXED;
        }

        let slot = match self.objs.try_push(obj) {
            Ok(slot) => slot,
            Err(full) => {
                self.discard_node(full.value.taffy);
                warn!("Cannot create {}: {} objects in use", kind.name(), full.limit);
                return Err(UiError::AllocationExhausted {
                    capacity: full.limit,
                });
            }
        };
        let id = ObjId(slot);

        match (parent, parent_node) {
            (Some(parent), Some(parent_node)) => {
                if let Err(err) = self.taffy.add_child(parent_node, node) {
                    self.objs.remove(slot);
                    self.discard_node(node);
                    return Err(err.into());
                }
                self.objs.get_mut(parent.0).children.push(id);
                self.mark(parent, DirtyFlags::CHILDREN_ORDER);
            }
            _ => {
                self.screens.push(id);
                if self.active.is_none() {
                    self.active = Some(id);
                }
            }
        }

        self.mark(id, DirtyFlags::LAYOUT | DirtyFlags::STYLE);
        debug!("Created {} {}", kind.name(), id);
        Ok(id)
    }

    fn discard_node(&mut self, node: taffy::NodeId) {
        if let Err(err) = self.taffy.remove(node) {
            warn!("Failed to release layout node: {}", err);
        }
    }

    /// Destroy `id` and its whole subtree, children first.
    ///
    /// Returns every destroyed handle in destruction order. Animation tasks
    /// are not touched here; [`Ui::destroy`](crate::Ui::destroy) cancels them.
    pub fn destroy(&mut self, id: ObjId) -> UiResult<Vec<ObjId>> {
        profile_function!();
        let parent = self.obj(id)?.parent;
        let order = self.post_order(id);

        match parent {
            Some(parent) => {
                if let Some(p) = self.objs.try_get_mut(parent.0) {
                    p.children.retain(|&c| c != id);
                }
                self.mark(parent, DirtyFlags::CHILDREN_ORDER);
            }
            None => {
                self.screens.retain(|&s| s != id);
                if self.active == Some(id) {
                    self.active = self.screens.first().copied();
                }
                self.dirty |= DirtyFlags::CHILDREN_ORDER;
            }
        }

        for victim in &order {
            let mut obj = self.objs.remove(victim.0);
            (obj.kind.class().destruct)(&mut obj);
            self.discard_node(obj.taffy);
        }
        debug!("Destroyed {} ({} objects)", id, order.len());
        Ok(order)
    }

    /// `id` and its descendants, children before parents.
    fn post_order(&self, id: ObjId) -> Vec<ObjId> {
        let mut out = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                out.push(id);
                continue;
            }
            stack.push((id, true));
            if let Some(obj) = self.objs.try_get(id.0) {
                stack.extend(obj.children.iter().rev().map(|&c| (c, false)));
            }
        }
        out
    }

    pub fn parent(&self, id: ObjId) -> UiResult<Option<ObjId>> {
        self.obj(id).map(Obj::parent)
    }

    pub fn children(&self, id: ObjId) -> UiResult<&[ObjId]> {
        self.obj(id).map(Obj::children)
    }

    /// Move `id` in front of its siblings, for painting and hit-testing.
    /// Screens are left alone.
    pub fn move_foreground(&mut self, id: ObjId) -> UiResult<()> {
        let Some(parent) = self.obj(id)?.parent else {
            return Ok(());
        };
        let p = self.obj_mut(parent)?;
        if p.children.last() == Some(&id) {
            return Ok(());
        }
        p.children.retain(|&c| c != id);
        p.children.push(id);
        let (parent_node, children) = (p.taffy, p.children.clone());
        let nodes: Vec<taffy::NodeId> = children
            .iter()
            .filter_map(|c| self.objs.try_get(c.0))
            .map(|o| o.taffy)
            .collect();
        self.taffy.set_children(parent_node, &nodes)?;
        self.mark(parent, DirtyFlags::CHILDREN_ORDER);
        Ok(())
    }

    /// The screen `id` lives on.
    pub fn screen_of(&self, id: ObjId) -> UiResult<ObjId> {
        let mut current = id;
        while let Some(parent) = self.obj(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Swap the shared style reference. Nothing is repainted until the next
    /// render.
    pub fn set_style(&mut self, id: ObjId, style: Arc<Style>) -> UiResult<()> {
        self.obj_mut(id)?.style = style;
        self.mark(id, DirtyFlags::STYLE);
        Ok(())
    }

    pub fn style(&self, id: ObjId) -> UiResult<Arc<Style>> {
        self.obj(id).map(|o| o.style.clone())
    }

    /// True when the parent's layout decides where `id` goes.
    fn placed_by_parent(&self, obj: &Obj) -> bool {
        obj.parent
            .and_then(|p| self.objs.try_get(p.0))
            .is_some_and(|p| p.layout.places_children())
    }

    /// Mirror requested geometry into the resolved area where the layout
    /// pass would not change it anyway.
    fn sync_area(&mut self, id: ObjId) {
        let Some(obj) = self.objs.try_get(id.0) else {
            return;
        };
        let placed = self.placed_by_parent(obj);
        let obj = self.objs.get_mut(id.0);
        if !placed {
            obj.area.top_left = obj.pos;
        }
        if obj.fit.hor() == Fit::Fixed {
            obj.area.size.width = obj.size.width;
        }
        if obj.fit.ver() == Fit::Fixed {
            obj.area.size.height = obj.size.height;
        }
    }

    fn update_geometry(&mut self, id: ObjId, f: impl FnOnce(&mut Obj)) -> UiResult<()> {
        f(self.obj_mut(id)?);
        self.sync_area(id);
        self.mark(id, DirtyFlags::LAYOUT);
        Ok(())
    }

    pub fn set_pos(&mut self, id: ObjId, x: i32, y: i32) -> UiResult<()> {
        self.update_geometry(id, |o| o.pos = Point::new(x, y))
    }

    pub fn set_x(&mut self, id: ObjId, x: i32) -> UiResult<()> {
        self.update_geometry(id, |o| o.pos.x = x)
    }

    pub fn set_y(&mut self, id: ObjId, y: i32) -> UiResult<()> {
        self.update_geometry(id, |o| o.pos.y = y)
    }

    pub fn set_size(&mut self, id: ObjId, width: u32, height: u32) -> UiResult<()> {
        self.update_geometry(id, |o| o.size = Size::new(width, height))
    }

    pub fn set_width(&mut self, id: ObjId, width: u32) -> UiResult<()> {
        self.update_geometry(id, |o| o.size.width = width)
    }

    pub fn set_height(&mut self, id: ObjId, height: u32) -> UiResult<()> {
        self.update_geometry(id, |o| o.size.height = height)
    }

    pub fn x(&self, id: ObjId) -> UiResult<i32> {
        self.obj(id).map(|o| o.area.top_left.x)
    }

    pub fn y(&self, id: ObjId) -> UiResult<i32> {
        self.obj(id).map(|o| o.area.top_left.y)
    }

    pub fn width(&self, id: ObjId) -> UiResult<u32> {
        self.obj(id).map(|o| o.area.size.width)
    }

    pub fn height(&self, id: ObjId) -> UiResult<u32> {
        self.obj(id).map(|o| o.area.size.height)
    }

    pub fn set_opa(&mut self, id: ObjId, opa: Opa) -> UiResult<()> {
        self.obj_mut(id)?.opa = opa;
        self.mark(id, DirtyFlags::OPACITY);
        Ok(())
    }

    pub fn opa(&self, id: ObjId) -> UiResult<Opa> {
        self.obj(id).map(Obj::opa)
    }

    /// Hidden objects are neither drawn, hit-tested nor laid out.
    pub fn set_hidden(&mut self, id: ObjId, hidden: bool) -> UiResult<()> {
        self.obj_mut(id)?.hidden = hidden;
        self.mark(id, DirtyFlags::VISIBILITY | DirtyFlags::LAYOUT);
        Ok(())
    }

    pub fn set_click(&mut self, id: ObjId, click: bool) -> UiResult<()> {
        self.obj_mut(id)?.click = click;
        Ok(())
    }

    pub fn set_layout(&mut self, id: ObjId, layout: Layout) -> UiResult<()> {
        self.obj_mut(id)?.layout = layout;
        self.mark(id, DirtyFlags::LAYOUT | DirtyFlags::CHILDREN_ORDER);
        Ok(())
    }

    /// Same fit on both edges of each axis.
    pub fn set_fit(&mut self, id: ObjId, hor: Fit, ver: Fit) -> UiResult<()> {
        self.set_fit_policy(id, FitPolicy::new(hor, ver))
    }

    /// Fit each edge separately. See [`FitPolicy`].
    pub fn set_fit_policy(&mut self, id: ObjId, fit: FitPolicy) -> UiResult<()> {
        self.update_geometry(id, |o| o.fit = fit)
    }

    pub fn fit(&self, id: ObjId) -> UiResult<FitPolicy> {
        self.obj(id).map(Obj::fit)
    }

    /// Absolute area of `id`, as of the last layout pass or setter.
    pub fn coords(&self, id: ObjId) -> UiResult<Rectangle> {
        let obj = self.obj(id)?;
        let mut top_left = obj.area.top_left;
        let mut parent = obj.parent;
        while let Some(p) = parent {
            let p = self.obj(p)?;
            top_left += p.area.top_left;
            parent = p.parent;
        }
        Ok(Rectangle::new(top_left, obj.area.size))
    }

    /// Front-most clickable object under `point` on the active screen.
    pub fn hit_test(&self, point: Point) -> Option<ObjId> {
        self.hit(self.active?, Point::zero(), point)
    }

    fn hit(&self, id: ObjId, origin: Point, point: Point) -> Option<ObjId> {
        let obj = self.objs.try_get(id.0)?;
        if obj.hidden {
            return None;
        }
        let area = Rectangle::new(origin + obj.area.top_left, obj.area.size);
        // Children are clipped to their parent, so they cannot be hit outside it.
        if !area.contains(point) {
            return None;
        }
        for &child in obj.children.iter().rev() {
            if let Some(hit) = self.hit(child, area.top_left, point) {
                return Some(hit);
            }
        }
        (obj.click && (obj.kind.class().hit_test)(obj, area, point)).then_some(id)
    }

    /// Recompute geometry if anything affecting layout changed.
    pub fn refresh_layout(&mut self) -> UiResult<()> {
        if !self.dirty.needs_layout() {
            return Ok(());
        }
        profile_function!();
        for screen in self.screens.clone() {
            self.layout_screen(screen)?;
        }
        self.dirty.remove(DirtyFlags::LAYOUT_GROUP);
        for obj in self.objs.iter_mut() {
            obj.dirty.remove(DirtyFlags::LAYOUT_GROUP);
        }
        Ok(())
    }

    fn layout_screen(&mut self, screen: ObjId) -> UiResult<()> {
        {
            profile_scope!("sync_styles");
            let mut stack = vec![(screen, None)];
            while let Some((id, parent_layout)) = stack.pop() {
                let obj = self.objs.get(id.0);
                let content = obj.content_size();
                let input = LayoutInput {
                    x: obj.pos.x,
                    y: obj.pos.y,
                    size: obj.size,
                    layout: obj.layout,
                    fit: obj.fit,
                    style: &obj.style,
                    measured: content.is_some(),
                    parent_layout,
                };
                let mut style = input.to_taffy();
                if obj.hidden {
                    style.display = taffy::Display::None;
                }
                self.taffy.set_style(obj.taffy, style)?;
                self.taffy
                    .set_node_context(obj.taffy, content.map(ContentSize::from))?;
                stack.extend(obj.children.iter().map(|&c| (c, Some(obj.layout))));
            }
        }

        {
            profile_scope!("compute");
            let root = self.objs.get(screen.0).taffy;
            let available = taffy::Size {
                width: AvailableSpace::Definite(self.screen_size.width as f32),
                height: AvailableSpace::Definite(self.screen_size.height as f32),
            };
            self.taffy.compute_layout_with_measure(
                root,
                available,
                |known, _available, _node, context, _style| {
                    let content = context.map(|c| *c).unwrap_or_default();
                    taffy::Size {
                        width: known.width.unwrap_or(content.width),
                        height: known.height.unwrap_or(content.height),
                    }
                },
            )?;
        }

        let mut stack = vec![screen];
        while let Some(id) = stack.pop() {
            let obj = self.objs.get_mut(id.0);
            let layout = self.taffy.layout(obj.taffy)?;
            obj.area = Rectangle::new(
                Point::new(
                    layout.location.x.round() as i32,
                    layout.location.y.round() as i32,
                ),
                Size::new(
                    layout.size.width.round().max(0.0) as u32,
                    layout.size.height.round().max(0.0) as u32,
                ),
            );
            stack.extend(obj.children.iter().copied());
        }
        Ok(())
    }

    /// Iterate every live object.
    pub fn iter(&self) -> impl Iterator<Item = (ObjId, &Obj)> {
        self.objs.iter_slots().map(|(slot, obj)| (ObjId(slot), obj))
    }
}

impl std::fmt::Debug for ObjTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjTree")
            .field("objects", &self.objs.len())
            .field("screens", &self.screens)
            .field("active", &self.active)
            .field("dirty", &self.dirty)
            .finish()
    }
}

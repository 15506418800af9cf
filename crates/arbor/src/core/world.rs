use std::{any::Any, collections::VecDeque, time::Instant};

use slotmap::SlotMap;
use tracing::debug;

use crate::{
    Config, NodeId, Widget,
    containers::{
        Container, ContainerKind, ScrollerState, StackState, group, scroller, single, stack,
    },
    error::{Error, Result},
    event::{self, Button, DragDrop, Event, EventArgs, EventKind, Key, Mods},
    geom::{HorizontalAlignment, Measure, Orientation, Point, Rect, Size, VerticalAlignment},
    input::{self, ArmedClick},
    layout::{self, register_for_layouting},
    layouting::{LayoutQueue, LayoutingType},
    node::{Node, Props},
    paint::{self, DrawContext},
    style::StyleTable,
    template::TemplateRegistry,
};

/// The widget arena, its layout and repaint queues, and the input state.
///
/// Every node lives in the arena and is addressed by [`NodeId`]. A disposed
/// node's id no longer resolves: operations on it are logged no-ops, and
/// lookups return `None`.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node ID.
    pub(crate) root: NodeId,
    /// Engine tuning.
    pub(crate) config: Config,
    /// Pending layout work.
    pub(crate) layout_queue: LayoutQueue,
    /// Nodes waiting to register their clips.
    pub(crate) clipping_queue: VecDeque<NodeId>,
    /// Deepest node under the pointer.
    pub(crate) hover: Option<NodeId>,
    /// Node holding keyboard focus.
    pub(crate) focused: Option<NodeId>,
    /// Node capturing the mouse while a button is held.
    pub(crate) active: Option<NodeId>,
    /// Last pointer position.
    pub(crate) mouse: Point,
    /// Modifier keys currently held.
    pub(crate) modifiers: Mods,
    /// Click waiting for a possible second press.
    pub(crate) armed_click: Option<ArmedClick>,
    /// Drag operation in progress.
    pub(crate) drag: Option<DragDrop>,
    /// Style initializers.
    pub(crate) styles: StyleTable,
    /// Instance factories.
    pub(crate) templates: TemplateRegistry,
}

impl Core {
    /// Create a core whose root covers a surface of the given size.
    pub fn new(config: Config, size: Size) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = Node::new(Container::new(ContainerKind::Root), None);
        root.slot = size.rect();
        root.last_slots = root.slot;
        root.dirty = false;
        let root = nodes.insert(root);
        Self {
            nodes,
            root,
            config,
            layout_queue: LayoutQueue::default(),
            clipping_queue: VecDeque::new(),
            hover: None,
            focused: None,
            active: None,
            mouse: Point::zero(),
            modifiers: Mods::default(),
            armed_click: None,
            drag: None,
            styles: StyleTable::with_defaults(),
            templates: TemplateRegistry::new(),
        }
    }

    /// Insert a detached node and run the style initializer for its key.
    fn insert_node(
        &mut self,
        kind: Container,
        widget: Option<Box<dyn Widget>>,
        style_key: Option<&str>,
    ) -> NodeId {
        let mut node = Node::new(kind, widget);
        if let Some(k) = style_key {
            node.style_key = k.to_string();
        }
        let init = self.styles.get(&node.style_key);
        let id = self.nodes.insert(node);
        if let Some(init) = init {
            init(self, id);
        }
        id
    }

    /// Create a detached node of any kind, with an optional widget payload.
    pub fn create_node(&mut self, kind: ContainerKind, widget: Option<Box<dyn Widget>>) -> NodeId {
        self.insert_node(Container::new(kind), widget, None)
    }

    /// Create a detached node styled with an explicit key instead of its
    /// type tag.
    pub fn create_with_style(
        &mut self,
        kind: ContainerKind,
        widget: Option<Box<dyn Widget>>,
        style_key: &str,
    ) -> NodeId {
        self.insert_node(Container::new(kind), widget, Some(style_key))
    }

    /// Create a detached leaf carrying a widget.
    pub fn create_widget<W: Widget>(&mut self, widget: W) -> NodeId {
        self.insert_node(Container::Leaf, Some(Box::new(widget)), None)
    }

    /// Create a detached leaf without payload.
    pub fn create_leaf(&mut self) -> NodeId {
        self.create_node(ContainerKind::Leaf, None)
    }

    /// Create a detached group.
    pub fn create_group(&mut self) -> NodeId {
        self.create_node(ContainerKind::Group, None)
    }

    /// Create a detached stack.
    pub fn create_stack(&mut self, orientation: Orientation) -> NodeId {
        let state = StackState {
            orientation,
            ..StackState::default()
        };
        self.insert_node(Container::Stack(state), None, None)
    }

    /// Create a detached wrapper.
    pub fn create_wrapper(&mut self, orientation: Orientation) -> NodeId {
        let state = StackState {
            orientation,
            ..StackState::default()
        };
        self.insert_node(Container::Wrapper(state), None, None)
    }

    /// Create a detached private single-child container.
    pub fn create_container(&mut self) -> NodeId {
        self.create_node(ContainerKind::Single, None)
    }

    /// Create a detached scroller.
    pub fn create_scroller(&mut self) -> NodeId {
        self.insert_node(Container::Scroller(ScrollerState::default()), None, None)
    }

    /// Build a registered template instance. The result is detached.
    pub fn create_instance(&mut self, name: &str) -> Result<NodeId> {
        let factory = self
            .templates
            .get(name)
            .ok_or_else(|| Error::UnknownTemplate(name.to_string()))?;
        factory(self)
    }

    /// Find a named part of a template instance.
    pub fn template_part(&self, root: NodeId, name: &str) -> Result<NodeId> {
        self.find_in(root, name)
            .ok_or_else(|| Error::MissingTemplatePart(name.to_string()))
    }

    // Structure

    /// Check that `child` may be attached under `parent`, returning the
    /// parent's kind.
    fn check_attach(&self, parent: NodeId, child: NodeId) -> Result<ContainerKind> {
        let p = self.nodes.get(parent).ok_or(Error::NodeNotFound(parent))?;
        let c = self.nodes.get(child).ok_or(Error::NodeNotFound(child))?;
        if child == parent || child == self.root || self.contains(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        if c.parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        Ok(p.kind.kind())
    }

    /// Check that `child` is listed under `parent`, returning the parent's
    /// kind.
    fn check_child(&self, parent: NodeId, child: NodeId) -> Result<ContainerKind> {
        let p = self.nodes.get(parent).ok_or(Error::NodeNotFound(parent))?;
        if !p.kind.children().contains(&child) {
            return Err(Error::NotAChild { parent, child });
        }
        Ok(p.kind.kind())
    }

    /// Append a detached node to a group, stack or wrapper. Adding to the root
    /// is [`Core::add_widget`].
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.check_attach(parent, child)? {
            ContainerKind::Root => self.add_widget(child),
            ContainerKind::Group | ContainerKind::Stack | ContainerKind::Wrapper => {
                group::add_child(self, parent, child);
                Ok(())
            }
            _ => Err(Error::NotAContainer(parent)),
        }
    }

    /// Insert a detached node at `index` in a group, stack or wrapper.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let kind = self.check_attach(parent, child)?;
        if !matches!(
            kind,
            ContainerKind::Root
                | ContainerKind::Group
                | ContainerKind::Stack
                | ContainerKind::Wrapper
        ) {
            return Err(Error::NotAContainer(parent));
        }
        if index > self.children(parent).len() {
            return Err(Error::ChildIndex { parent, index });
        }
        group::insert_child(self, parent, index, child);
        if kind == ContainerKind::Root {
            register_for_layouting(self, child, LayoutingType::ALL);
        }
        Ok(())
    }

    /// Detach a child without disposing it.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_child(parent, child)?;
        self.release_pointers(child);
        self.detach(child);
        Ok(())
    }

    /// Detach and dispose a child.
    pub fn delete_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_child(parent, child)?;
        self.dispose(child);
        Ok(())
    }

    /// Dispose every child of a container.
    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        let kind = self
            .nodes
            .get(id)
            .map(|n| n.kind.kind())
            .ok_or(Error::NodeNotFound(id))?;
        match kind {
            ContainerKind::Root => self.clear_interface(),
            ContainerKind::Group | ContainerKind::Stack | ContainerKind::Wrapper => {
                group::clear_children(self, id);
            }
            ContainerKind::Single | ContainerKind::Scroller => single::set_child(self, id, None),
            ContainerKind::Leaf => return Err(Error::NotAContainer(id)),
        }
        Ok(())
    }

    /// Replace the child of a private container or scroller, disposing the
    /// previous one.
    pub fn set_child(&mut self, id: NodeId, child: Option<NodeId>) -> Result<()> {
        let kind = match child {
            Some(c) => self.check_attach(id, c)?,
            None => self
                .nodes
                .get(id)
                .map(|n| n.kind.kind())
                .ok_or(Error::NodeNotFound(id))?,
        };
        if !matches!(kind, ContainerKind::Single | ContainerKind::Scroller) {
            return Err(Error::NotAContainer(id));
        }
        single::set_child(self, id, child);
        Ok(())
    }

    /// Paint a child above its siblings.
    pub fn put_on_top(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.check_child(parent, child)? {
            ContainerKind::Root => group::put_on_bottom(self, parent, child),
            _ => group::put_on_top(self, parent, child),
        }
        Ok(())
    }

    /// Paint a child below its siblings.
    pub fn put_on_bottom(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.check_child(parent, child)? {
            ContainerKind::Root => group::put_on_top(self, parent, child),
            _ => group::put_on_bottom(self, parent, child),
        }
        Ok(())
    }

    /// Unlink a node from its parent through the parent's container logic,
    /// registering the area it last covered for repaint.
    fn detach(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let Some(parent) = node.parent else {
            return;
        };
        let last = node.last_painted_slot;
        paint::register_clip(self, parent, last);
        let kind = self
            .nodes
            .get(parent)
            .filter(|p| p.kind.children().contains(&id))
            .map(|p| p.kind.kind());
        match kind {
            Some(ContainerKind::Stack | ContainerKind::Wrapper) => {
                stack::remove_child(self, parent, id);
            }
            Some(ContainerKind::Group | ContainerKind::Root) => group::remove_child(self, parent, id),
            Some(ContainerKind::Single | ContainerKind::Scroller) => {
                single::detach_child(self, parent);
            }
            Some(ContainerKind::Leaf) | None => {
                if let Some(n) = self.nodes.get_mut(id) {
                    n.parent = None;
                    n.logical_parent = None;
                }
            }
        }
    }

    // Root

    /// Add a detached node as the topmost top-level widget.
    pub fn add_widget(&mut self, child: NodeId) -> Result<()> {
        self.check_attach(self.root, child)?;
        group::insert_child(self, self.root, 0, child);
        register_for_layouting(self, child, LayoutingType::ALL);
        Ok(())
    }

    /// Detach a top-level widget without disposing it.
    pub fn remove_widget(&mut self, child: NodeId) -> Result<()> {
        self.remove_child(self.root, child)
    }

    /// Detach and dispose a top-level widget.
    pub fn delete_widget(&mut self, child: NodeId) -> Result<()> {
        self.delete_child(self.root, child)
    }

    /// Raise a top-level widget above the others.
    pub fn put_widget_on_top(&mut self, child: NodeId) -> Result<()> {
        self.put_on_top(self.root, child)
    }

    /// Dispose every top-level widget.
    pub fn clear_interface(&mut self) {
        for c in self.children(self.root).to_vec() {
            self.dispose(c);
        }
        self.hover = None;
        self.focused = None;
        self.active = None;
        self.armed_click = None;
        self.drag = None;
    }

    /// Resize the surface. Every top-level widget is laid out again and the
    /// whole surface repaints.
    pub fn resize(&mut self, size: Size) {
        let root = self.root;
        if let Some(node) = self.nodes.get_mut(root) {
            node.slot = size.rect();
            node.last_slots = node.slot;
        }
        for c in self.children(root).to_vec() {
            register_for_layouting(self, c, LayoutingType::ALL);
        }
        paint::register_clip(self, root, size.rect());
    }

    // Lifecycle

    /// Clear the hover, focus, active and armed-click pointers that lie in
    /// the subtree of `id`. Leaving nodes receive mouse-leave. A drag whose
    /// source lies inside ends without a drop; a target inside is left.
    fn release_pointers(&mut self, id: NodeId) {
        if let Some(op) = self.drag {
            if self.is_or_is_inside(op.source, id) {
                input::cancel_drag(self);
            } else if op.target.is_some_and(|t| self.is_or_is_inside(t, id)) {
                input::set_drop_target(self, None);
            }
        }
        if let Some(h) = self.hover
            && self.is_or_is_inside(h, id)
        {
            let position = self.mouse;
            let mut cur = Some(h);
            while let Some(c) = cur {
                event::send(self, c, Event::MouseLeave(position));
                if c == id {
                    break;
                }
                cur = self.nodes.get(c).and_then(|n| n.parent);
            }
            self.hover = None;
        }
        if self.focused.is_some_and(|f| self.is_or_is_inside(f, id)) {
            self.set_focus(None);
        }
        if self.active.is_some_and(|a| self.is_or_is_inside(a, id)) {
            self.set_active(None);
        }
        if self
            .armed_click
            .is_some_and(|a| self.is_or_is_inside(a.sender, id))
        {
            self.armed_click = None;
        }
    }

    /// Register the area a node last covered with its parent and release
    /// the pointers inside it.
    fn unshown(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let Some(parent) = node.parent {
            let last = node.last_painted_slot;
            paint::register_clip(self, parent, last);
        }
        self.release_pointers(id);
    }

    /// Destroy a node and its subtree.
    ///
    /// The node is detached through its parent's container logic first.
    /// Each widget payload sees [`Widget::on_dispose`] once, children before
    /// parents.
    pub fn dispose(&mut self, id: NodeId) {
        if id == self.root {
            debug!("refusing to dispose the root");
            return;
        }
        if !self.nodes.contains_key(id) {
            debug!("dispose of unknown node {id:?}");
            return;
        }
        self.release_pointers(id);
        self.detach(id);
        for n in self.subtree_post_order(id) {
            if let Some(mut node) = self.nodes.remove(n)
                && let Some(w) = node.widget.as_mut()
            {
                w.on_dispose();
            }
        }
    }

    /// Collect a subtree in post-order, including its root.
    fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if visited {
                out.push(id);
                continue;
            }
            stack.push((id, true));
            for c in node.kind.children().iter().rev() {
                stack.push((*c, false));
            }
        }
        out
    }

    // Queries

    /// Root node ID.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable engine configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// A node, if it exists.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Does the node exist?
    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes in the arena, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the arena empty apart from the root?
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Children of a node. Empty for leaves and unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map_or(&[], |n| n.kind.children())
    }

    /// Graphic parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// The node unhandled events bubble to: the logical parent for top-level
    /// widgets, the graphic parent otherwise.
    pub fn focus_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        match node.parent {
            Some(p) if p != self.root => Some(p),
            _ => node.logical_parent,
        }
    }

    /// Is `node` a strict descendant of `ancestor` in the graphic tree?
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = self.parent(node);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.parent(c);
        }
        false
    }

    /// Is `node` equal to `ancestor` or one of its descendants?
    pub fn is_or_is_inside(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.contains(ancestor, node)
    }

    /// Find a named node anywhere in the tree.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_in(self.root, name)
    }

    /// Find a named node in a subtree, in pre-order.
    pub fn find_in(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.kind.children().iter().rev());
        }
        None
    }

    /// Resolved width policy, with Inherit resolved through the parent.
    pub fn width(&self, id: NodeId) -> Measure {
        layout::measure_of(self, id, Orientation::Horizontal)
    }

    /// Resolved height policy, with Inherit resolved through the parent.
    pub fn height(&self, id: NodeId) -> Measure {
        layout::measure_of(self, id, Orientation::Vertical)
    }

    /// Current slot. Zero for unknown nodes.
    pub fn slot(&self, id: NodeId) -> Rect {
        layout::slot(self, id)
    }

    /// Client rectangle in the node's own coordinates.
    pub fn client_rectangle(&self, id: NodeId) -> Rect {
        layout::client_rectangle(self, id)
    }

    /// Pending layout flags.
    pub fn registered(&self, id: NodeId) -> LayoutingType {
        layout::registered(self, id)
    }

    /// The layout queue.
    pub fn layout_queue(&self) -> &LayoutQueue {
        &self.layout_queue
    }

    /// The node under the pointer.
    pub fn hover(&self) -> Option<NodeId> {
        self.hover
    }

    /// The node holding focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// The node capturing the mouse.
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    /// The drag operation in progress.
    pub fn drag_drop(&self) -> Option<DragDrop> {
        self.drag
    }

    /// Is the node the target of the drag in progress?
    pub fn is_drop_target(&self, id: NodeId) -> bool {
        self.drag.is_some_and(|d| d.target == Some(id))
    }

    /// Last pointer position.
    pub fn mouse_position(&self) -> Point {
        self.mouse
    }

    /// Modifier keys held.
    pub fn modifiers(&self) -> Mods {
        self.modifiers
    }

    /// Style initializers, for registration.
    pub fn styles_mut(&mut self) -> &mut StyleTable {
        &mut self.styles
    }

    /// Instance factories, for registration.
    pub fn templates_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.templates
    }

    /// Borrow the widget payload of a node as a concrete type.
    pub fn widget<W: Widget>(&self, id: NodeId) -> Option<&W> {
        let w = self.nodes.get(id)?.widget.as_deref()?;
        (w as &dyn Any).downcast_ref::<W>()
    }

    /// Mutably borrow the widget payload of a node as a concrete type. Call
    /// [`Core::register_for_graphic_update`] after changing what it draws.
    pub fn widget_mut<W: Widget>(&mut self, id: NodeId) -> Option<&mut W> {
        let w = self.nodes.get_mut(id)?.widget.as_deref_mut()?;
        (w as &mut dyn Any).downcast_mut::<W>()
    }

    // Focus

    /// Move keyboard focus, sending unfocused and focused events.
    pub fn set_focus(&mut self, id: Option<NodeId>) {
        let id = id.filter(|i| self.nodes.contains_key(*i));
        if self.focused == id {
            return;
        }
        if let Some(old) = self.focused.take() {
            if let Some(n) = self.nodes.get_mut(old) {
                n.has_focus = false;
            }
            event::send(self, old, Event::Unfocused);
        }
        if let Some(new) = id
            && let Some(n) = self.nodes.get_mut(new)
        {
            n.has_focus = true;
            self.focused = Some(new);
            event::send(self, new, Event::Focused);
        }
    }

    /// Set the node capturing the mouse.
    pub fn set_active(&mut self, id: Option<NodeId>) {
        if let Some(old) = self.active.take()
            && let Some(n) = self.nodes.get_mut(old)
        {
            n.is_active = false;
        }
        if let Some(new) = id
            && let Some(n) = self.nodes.get_mut(new)
        {
            n.is_active = true;
            self.active = Some(new);
        }
    }

    // Properties

    /// Store a property value. Returns false when the node is unknown or the
    /// value is unchanged.
    fn set_prop<T: PartialEq>(
        &mut self,
        id: NodeId,
        field: impl FnOnce(&mut Props) -> &mut T,
        value: T,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            debug!("property change on unknown node {id:?}");
            return false;
        };
        let slot = field(&mut node.props);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Set the width policy. A Fixed value outside the size bounds is
    /// rejected. Returns whether the value changed.
    pub fn set_width(&mut self, id: NodeId, width: impl Into<Measure>) -> bool {
        layout::set_size_measure(self, id, Orientation::Horizontal, width.into())
    }

    /// Set the height policy. A Fixed value outside the size bounds is
    /// rejected. Returns whether the value changed.
    pub fn set_height(&mut self, id: NodeId, height: impl Into<Measure>) -> bool {
        layout::set_size_measure(self, id, Orientation::Vertical, height.into())
    }

    /// Set the explicit horizontal offset. Zero aligns instead.
    pub fn set_left(&mut self, id: NodeId, left: i32) {
        if self.set_prop(id, |p| &mut p.left, left) {
            register_for_layouting(self, id, LayoutingType::X);
        }
    }

    /// Set the explicit vertical offset. Zero aligns instead.
    pub fn set_top(&mut self, id: NodeId, top: i32) {
        if self.set_prop(id, |p| &mut p.top, top) {
            register_for_layouting(self, id, LayoutingType::Y);
        }
    }

    /// Set the margin around the client rectangle.
    pub fn set_margin(&mut self, id: NodeId, margin: i32) {
        if self.set_prop(id, |p| &mut p.margin, margin) {
            paint::register_for_graphic_update(self, id);
        }
    }

    /// Set the lower size bound.
    pub fn set_minimum_size(&mut self, id: NodeId, size: Size) {
        if self.set_prop(id, |p| &mut p.minimum_size, size) {
            register_for_layouting(self, id, LayoutingType::SIZING);
        }
    }

    /// Set the upper size bound. Zero on an axis means unbounded.
    pub fn set_maximum_size(&mut self, id: NodeId, size: Size) {
        if self.set_prop(id, |p| &mut p.maximum_size, size) {
            register_for_layouting(self, id, LayoutingType::SIZING);
        }
    }

    /// Set the horizontal alignment used when no left offset is given.
    pub fn set_horizontal_alignment(&mut self, id: NodeId, a: HorizontalAlignment) {
        if self.set_prop(id, |p| &mut p.horizontal_alignment, a) {
            register_for_layouting(self, id, LayoutingType::X);
        }
    }

    /// Set the vertical alignment used when no top offset is given.
    pub fn set_vertical_alignment(&mut self, id: NodeId, a: VerticalAlignment) {
        if self.set_prop(id, |p| &mut p.vertical_alignment, a) {
            register_for_layouting(self, id, LayoutingType::Y);
        }
    }

    /// Show or hide a node. Hiding releases the pointers inside it and
    /// repaints the area it covered.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if !self.set_prop(id, |p| &mut p.visible, visible) {
            return;
        }
        if visible {
            if let Some(n) = self.nodes.get_mut(id) {
                n.dirty = true;
            }
        } else {
            self.unshown(id);
        }
        register_for_layouting(self, id, LayoutingType::SIZING);
    }

    /// Enable or disable a node. Disabled nodes are shaded and ignore input.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) {
        if self.set_prop(id, |p| &mut p.enabled, enabled) {
            paint::register_for_redraw(self, id);
        }
    }

    /// Allow the node to take focus on mouse-down.
    pub fn set_focusable(&mut self, id: NodeId, focusable: bool) {
        self.set_prop(id, |p| &mut p.focusable, focusable);
    }

    /// Let unhandled mouse events bubble past this node.
    pub fn set_bubble_mouse_event(&mut self, id: NodeId, bubble: bool) {
        self.set_prop(id, |p| &mut p.bubble_mouse_event, bubble);
    }

    /// Let the node be dragged by moving the pointer with a button held on it.
    pub fn set_allow_drag(&mut self, id: NodeId, allow: bool) {
        self.set_prop(id, |p| &mut p.allow_drag, allow);
    }

    /// Let the node accept drops.
    pub fn set_allow_drop(&mut self, id: NodeId, allow: bool) {
        self.set_prop(id, |p| &mut p.allow_drop, allow);
    }

    /// Restrict accepted drops to sources with one of these style keys.
    pub fn set_allowed_drop_types<S: Into<String>>(
        &mut self,
        id: NodeId,
        types: impl IntoIterator<Item = S>,
    ) {
        let types = types.into_iter().map(Into::into).collect();
        self.set_prop(id, |p| &mut p.allowed_drop_types, types);
    }

    /// Clip children to the client rectangle when drawing.
    pub fn set_clip_to_client_rect(&mut self, id: NodeId, clip: bool) {
        if self.set_prop(id, |p| &mut p.clip_to_client_rect, clip) {
            paint::register_for_redraw(self, id);
        }
    }

    /// Keep an offscreen bitmap of the node.
    pub fn set_cache_enabled(&mut self, id: NodeId, enabled: bool) {
        if !self.set_prop(id, |p| &mut p.cache_enabled, enabled) {
            return;
        }
        if let Some(n) = self.nodes.get_mut(id) {
            n.cache = None;
            n.clipping.reset();
        }
        paint::register_for_redraw(self, id);
    }

    /// Set the node events bubble to when it is a top-level widget.
    pub fn set_logical_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        match self.nodes.get_mut(id) {
            Some(n) => n.logical_parent = parent,
            None => debug!("logical parent change on unknown node {id:?}"),
        }
    }

    /// Name a node for lookups.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        match self.nodes.get_mut(id) {
            Some(n) => n.name = Some(name.into()),
            None => debug!("rename of unknown node {id:?}"),
        }
    }

    /// Set the gap between the children of a stack or wrapper.
    pub fn set_spacing(&mut self, id: NodeId, spacing: i32) {
        stack::set_spacing(self, id, spacing);
    }

    /// Set the main axis of a stack or wrapper.
    pub fn set_orientation(&mut self, id: NodeId, orientation: Orientation) {
        stack::set_orientation(self, id, orientation);
    }

    /// Main axis of a stack or wrapper.
    pub fn orientation(&self, id: NodeId) -> Option<Orientation> {
        stack::state(self, id).map(|(o, _, _)| o)
    }

    /// Gap between the children of a stack or wrapper.
    pub fn spacing(&self, id: NodeId) -> Option<i32> {
        stack::state(self, id).map(|(_, s, _)| s)
    }

    /// The child of a stack that takes the remaining space.
    pub fn stretched_child(&self, id: NodeId) -> Option<NodeId> {
        stack::state(self, id).and_then(|(_, _, c)| c)
    }

    /// Scroll a scroller horizontally, clamped to its range.
    pub fn set_scroll_x(&mut self, id: NodeId, x: i32) {
        scroller::set_scroll(self, id, Orientation::Horizontal, x);
    }

    /// Scroll a scroller vertically, clamped to its range.
    pub fn set_scroll_y(&mut self, id: NodeId, y: i32) {
        scroller::set_scroll(self, id, Orientation::Vertical, y);
    }

    /// Set the distance a scroller moves per wheel notch.
    pub fn set_scroll_speed(&mut self, id: NodeId, speed: i32) {
        scroller::set_scroll_speed(self, id, speed);
    }

    /// Scroll offset of a scroller.
    pub fn scroll(&self, id: NodeId) -> Point {
        scroller::scroll(self, id)
    }

    /// Maximum scroll offset of a scroller.
    pub fn max_scroll(&self, id: NodeId) -> Point {
        scroller::max_scroll(self, id)
    }

    // Repaint

    /// Request a repaint after a content change. Fit nodes are re-measured.
    pub fn register_for_graphic_update(&mut self, id: NodeId) {
        paint::register_for_graphic_update(self, id);
    }

    /// Request a repaint without re-measuring.
    pub fn register_for_redraw(&mut self, id: NodeId) {
        paint::register_for_redraw(self, id);
    }

    /// Request layout work on a node.
    pub fn register_for_layouting(&mut self, id: NodeId, lt: LayoutingType) {
        register_for_layouting(self, id, lt);
    }

    // Events

    /// Subscribe to an event kind on a node.
    pub fn subscribe<F>(&mut self, id: NodeId, kind: EventKind, handler: F) -> Result<()>
    where
        F: FnMut(&mut Self, NodeId, &mut EventArgs) + Send + Sync + 'static,
    {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.handlers.add(kind, Box::new(handler));
        Ok(())
    }

    /// Drop every subscriber of a kind on a node.
    pub fn unsubscribe(&mut self, id: NodeId, kind: EventKind) {
        if let Some(n) = self.nodes.get_mut(id) {
            n.handlers.clear(kind);
        }
    }

    /// Deliver an event to a node, bubbling as usual. Returns whether it was
    /// handled.
    pub fn send_event(&mut self, id: NodeId, event: Event) -> bool {
        event::send(self, id, event)
    }

    // Frame pump

    /// Drain the layout queue for one pass.
    pub fn process_layouting(&mut self) {
        layout::process_layouting(self);
    }

    /// Register the clips of every node queued for repaint.
    pub fn process_clipping(&mut self) {
        paint::clipping_registration(self);
    }

    /// Repaint the accumulated root region. Returns whether anything was drawn.
    pub fn process_drawing(&mut self, ctx: &mut dyn DrawContext) -> bool {
        paint::process_drawing(self, ctx)
    }

    /// Run one frame: deliver an expired click, then lay out, clip and draw.
    /// Returns whether anything was drawn.
    pub fn update(&mut self, ctx: &mut dyn DrawContext) -> bool {
        input::fire_expired_click(self, Instant::now());
        self.process_layouting();
        self.process_clipping();
        self.process_drawing(ctx)
    }

    // Input

    /// The pointer moved. Returns whether it is over the interface.
    pub fn process_mouse_move(&mut self, position: impl Into<Point>) -> bool {
        input::process_mouse_move(self, position.into())
    }

    /// A mouse button went down. Returns whether a node received it.
    pub fn process_mouse_button_down(&mut self, button: Button) -> bool {
        input::process_mouse_button_down(self, button, Instant::now())
    }

    /// A mouse button came up. Returns whether a node captured it.
    pub fn process_mouse_button_up(&mut self, button: Button) -> bool {
        input::process_mouse_button_up(self, button, Instant::now())
    }

    /// The wheel turned. Returns whether a node received it.
    pub fn process_mouse_wheel(&mut self, delta: i32) -> bool {
        input::process_mouse_wheel(self, delta)
    }

    /// A key went down. Returns whether a node has focus.
    pub fn process_key_down(&mut self, key: impl Into<Key>) -> bool {
        input::process_key_down(self, key.into())
    }

    /// A key came up. Returns whether a node has focus.
    pub fn process_key_up(&mut self, key: impl Into<Key>) -> bool {
        input::process_key_up(self, key.into())
    }

    /// A character was typed. Returns whether a node has focus.
    pub fn process_key_press(&mut self, c: char) -> bool {
        input::process_key_press(self, c)
    }

    /// Record the modifier keys held.
    pub fn set_modifiers(&mut self, mods: Mods) {
        self.modifiers = mods;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Log, RecordingContext, TestWidget};

    fn core() -> Core {
        Core::new(Config::default(), Size::new(200, 100))
    }

    fn layout(core: &mut Core) {
        let mut ctx = RecordingContext::new();
        core.update(&mut ctx);
    }

    #[test]
    fn double_parenting_rejected() -> Result<()> {
        let mut c = core();
        let a = c.create_group();
        let b = c.create_group();
        let leaf = c.create_leaf();
        c.add_child(a, leaf)?;
        assert_eq!(c.add_child(b, leaf), Err(Error::AlreadyAttached(leaf)));
        assert_eq!(c.parent(leaf), Some(a));
        assert!(c.children(b).is_empty());
        Ok(())
    }

    #[test]
    fn cycles_rejected() -> Result<()> {
        let mut c = core();
        let a = c.create_group();
        let b = c.create_group();
        c.add_child(a, b)?;
        assert_eq!(
            c.add_child(b, a),
            Err(Error::WouldCreateCycle { parent: b, child: a })
        );
        assert_eq!(
            c.add_child(a, a),
            Err(Error::WouldCreateCycle { parent: a, child: a })
        );
        Ok(())
    }

    #[test]
    fn structural_errors() -> Result<()> {
        let mut c = core();
        let leaf = c.create_leaf();
        let other = c.create_leaf();
        let g = c.create_group();
        assert_eq!(c.add_child(leaf, other), Err(Error::NotAContainer(leaf)));
        assert_eq!(
            c.insert_child(g, 3, other),
            Err(Error::ChildIndex { parent: g, index: 3 })
        );
        assert_eq!(
            c.remove_child(g, other),
            Err(Error::NotAChild { parent: g, child: other })
        );
        let s = c.create_stack(Orientation::Vertical);
        assert_eq!(c.set_child(s, Some(other)), Err(Error::NotAContainer(s)));
        Ok(())
    }

    #[test]
    fn root_order() -> Result<()> {
        let mut c = core();
        let a = c.create_leaf();
        let b = c.create_leaf();
        c.add_widget(a)?;
        c.add_widget(b)?;
        assert_eq!(c.children(c.root_id()), &[b, a]);
        c.put_widget_on_top(a)?;
        assert_eq!(c.children(c.root_id()), &[a, b]);
        c.remove_widget(a)?;
        assert!(c.exists(a));
        assert_eq!(c.parent(a), None);
        c.delete_widget(b)?;
        assert!(!c.exists(b));
        Ok(())
    }

    #[test]
    fn dispose_removes_subtree_children_first() -> Result<()> {
        let mut c = core();
        let order = Log::default();
        let g = c.create_group();
        let inner = c.create_group();
        let leaf = c.create_widget(TestWidget::new(10, 10).dispose_log("leaf", &order));
        c.add_child(inner, leaf)?;
        c.add_child(g, inner)?;
        c.add_widget(g)?;
        c.dispose(g);
        assert!(!c.exists(g));
        assert!(!c.exists(inner));
        assert!(!c.exists(leaf));
        assert_eq!(*order.lock(), vec!["leaf"]);
        assert_eq!(c.len(), 1);
        c.dispose(g);
        Ok(())
    }

    #[test]
    fn contains_and_lookup() -> Result<()> {
        let mut c = core();
        let g = c.create_group();
        let s = c.create_stack(Orientation::Horizontal);
        let leaf = c.create_leaf();
        c.set_name(leaf, "target");
        c.add_child(s, leaf)?;
        c.add_child(g, s)?;
        c.add_widget(g)?;
        assert!(c.contains(g, leaf));
        assert!(!c.contains(leaf, g));
        assert!(c.is_or_is_inside(g, g));
        assert_eq!(c.find_by_name("target"), Some(leaf));
        assert_eq!(c.template_part(g, "target")?, leaf);
        assert_eq!(
            c.template_part(g, "Content"),
            Err(Error::MissingTemplatePart("Content".into()))
        );
        Ok(())
    }

    #[test]
    fn focus_parent_routes_top_level_through_logical_parent() -> Result<()> {
        let mut c = core();
        let owner = c.create_group();
        let popup = c.create_group();
        let item = c.create_leaf();
        c.add_child(popup, item)?;
        c.add_widget(owner)?;
        c.add_widget(popup)?;
        assert_eq!(c.focus_parent(popup), None);
        c.set_logical_parent(popup, Some(owner));
        assert_eq!(c.focus_parent(popup), Some(owner));
        assert_eq!(c.focus_parent(item), Some(popup));
        assert_eq!(c.parent(popup), Some(c.root_id()));
        Ok(())
    }

    #[test]
    fn style_applied_once_per_construction() {
        fn mark(core: &mut Core, id: NodeId) {
            let m = core.node(id).map_or(0, |n| n.props().margin);
            core.set_margin(id, m + 1);
        }
        let mut c = core();
        c.styles_mut().register("Group", mark);
        c.styles_mut().register("Fancy", mark);
        let g = c.create_group();
        assert_eq!(c.node(g).map(|n| n.props().margin), Some(1));
        let f = c.create_with_style(ContainerKind::Leaf, None, "Fancy");
        assert_eq!(c.node(f).map(|n| n.props().margin), Some(1));
        let s = c.create_stack(Orientation::Vertical);
        assert_eq!(c.node(s).and_then(|n| n.kind().stack()).map(|s| s.spacing), Some(2));
    }

    #[test]
    fn templates() -> Result<()> {
        let mut c = core();
        assert_eq!(
            c.create_instance("Popup"),
            Err(Error::UnknownTemplate("Popup".into()))
        );
        c.templates_mut().register("Popup", |core| {
            let g = core.create_group();
            let content = core.create_container();
            core.set_name(content, "Content");
            core.add_child(g, content)?;
            Ok(g)
        });
        let p = c.create_instance("Popup")?;
        assert!(c.template_part(p, "Content").is_ok());
        assert_eq!(c.parent(p), None);
        Ok(())
    }

    #[test]
    fn widget_downcast() {
        let mut c = core();
        let id = c.create_widget(TestWidget::new(4, 5));
        assert_eq!(c.widget::<TestWidget>(id).map(|w| w.size), Some(Size::new(4, 5)));
        if let Some(w) = c.widget_mut::<TestWidget>(id) {
            w.size = Size::new(7, 7);
        }
        assert_eq!(c.widget::<TestWidget>(id).map(|w| w.size), Some(Size::new(7, 7)));
    }

    #[test]
    fn hiding_releases_focus() -> Result<()> {
        let mut c = core();
        let g = c.create_group();
        let leaf = c.create_leaf();
        c.add_child(g, leaf)?;
        c.add_widget(g)?;
        c.set_focus(Some(leaf));
        assert_eq!(c.focused(), Some(leaf));
        assert!(c.node(leaf).is_some_and(|n| n.has_focus()));
        c.set_visible(g, false);
        assert_eq!(c.focused(), None);
        assert!(c.node(leaf).is_some_and(|n| !n.has_focus()));
        Ok(())
    }

    #[test]
    fn resize_relayouts_top_level() -> Result<()> {
        let mut c = core();
        let g = c.create_group();
        c.add_widget(g)?;
        layout(&mut c);
        assert_eq!(c.slot(g), Rect::new(0, 0, 200, 100));
        c.resize(Size::new(300, 50));
        layout(&mut c);
        assert_eq!(c.slot(g), Rect::new(0, 0, 300, 50));
        Ok(())
    }
}

use crate::{
    NodeId,
    containers::Container,
    event::Handlers,
    geom::{HorizontalAlignment, Measure, Orientation, Rect, Region, Size, VerticalAlignment},
    layouting::LayoutingType,
    paint::Surface,
    widget::Widget,
};

/// User-settable layout and behaviour properties of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Props {
    /// Width policy.
    pub width: Measure,
    /// Height policy.
    pub height: Measure,
    /// Explicit horizontal offset. Zero means "use the alignment".
    pub left: i32,
    /// Explicit vertical offset. Zero means "use the alignment".
    pub top: i32,
    /// Inner margin between the slot and the client rectangle.
    pub margin: i32,
    /// Minimum size. Bounds the resolved size of a visible node.
    pub minimum_size: Size,
    /// Maximum size. Zero on an axis means unbounded.
    pub maximum_size: Size,
    /// Horizontal alignment inside the parent's client rectangle.
    pub horizontal_alignment: HorizontalAlignment,
    /// Vertical alignment inside the parent's client rectangle.
    pub vertical_alignment: VerticalAlignment,
    /// Visibility.
    pub visible: bool,
    /// Whether the node takes part in hit testing.
    pub enabled: bool,
    /// Whether the node takes focus on mouse-down.
    pub focusable: bool,
    /// Whether unhandled mouse events bubble to the focus parent.
    pub bubble_mouse_event: bool,
    /// Whether children are clipped to the client rectangle.
    pub clip_to_client_rect: bool,
    /// Whether the node renders through an offscreen bitmap.
    pub cache_enabled: bool,
    /// Whether dragging the node with a button held starts a drag operation.
    pub allow_drag: bool,
    /// Whether the node accepts drops.
    pub allow_drop: bool,
    /// Style keys of the drag sources accepted. Empty accepts any source.
    pub allowed_drop_types: Vec<String>,
}

impl Default for Props {
    fn default() -> Self {
        Self {
            width: Measure::Inherit,
            height: Measure::Inherit,
            left: 0,
            top: 0,
            margin: 0,
            minimum_size: Size::new(1, 1),
            maximum_size: Size::zero(),
            horizontal_alignment: HorizontalAlignment::Center,
            vertical_alignment: VerticalAlignment::Center,
            visible: true,
            enabled: true,
            focusable: false,
            bubble_mouse_event: true,
            clip_to_client_rect: true,
            cache_enabled: false,
            allow_drag: false,
            allow_drop: false,
            allowed_drop_types: Vec::new(),
        }
    }
}

impl Props {
    /// The raw size policy along an axis.
    pub fn size(&self, axis: Orientation) -> Measure {
        match axis {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }

    /// Mutable size policy along an axis.
    pub(crate) fn size_mut(&mut self, axis: Orientation) -> &mut Measure {
        match axis {
            Orientation::Horizontal => &mut self.width,
            Orientation::Vertical => &mut self.height,
        }
    }

    /// The explicit offset along an axis.
    pub fn offset(&self, axis: Orientation) -> i32 {
        match axis {
            Orientation::Horizontal => self.left,
            Orientation::Vertical => self.top,
        }
    }

    /// Would a drag source with this style key be accepted as a drop?
    pub fn accepts_drop(&self, source_key: &str) -> bool {
        self.allow_drop
            && (self.allowed_drop_types.is_empty()
                || self.allowed_drop_types.iter().any(|t| t == source_key))
    }
}

/// Core node data stored in the arena.
pub struct Node {
    /// Widget payload.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Container kind and its state.
    pub(crate) kind: Container,
    /// Key the style table was consulted with on construction.
    pub(crate) style_key: String,
    /// Optional name for lookups.
    pub(crate) name: Option<String>,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Explicit focus parent, used when the graphic parent is the root.
    pub(crate) logical_parent: Option<NodeId>,

    /// Layout and behaviour properties.
    pub(crate) props: Props,

    /// Resolved rectangle relative to the parent's client rectangle.
    pub(crate) slot: Rect,
    /// Slot at the last completed layout step on each axis.
    pub(crate) last_slots: Rect,
    /// Slot at the last paint.
    pub(crate) last_painted_slot: Rect,
    /// Size of the content. Maintained incrementally by containers.
    pub(crate) content_size: Size,
    /// Layout flags that are queued and not yet resolved.
    pub(crate) registered: LayoutingType,
    /// Needs repainting.
    pub(crate) dirty: bool,
    /// Listed in the clipping queue.
    pub(crate) queued_for_clipping: bool,
    /// Areas to redraw on the next cache update, in client coordinates.
    pub(crate) clipping: Region,
    /// Offscreen bitmap when caching is enabled.
    pub(crate) cache: Option<Box<dyn Surface>>,

    /// Event subscribers.
    pub(crate) handlers: Handlers,
    /// Whether the node holds keyboard focus.
    pub(crate) has_focus: bool,
    /// Whether the node currently captures the mouse.
    pub(crate) is_active: bool,
    /// Whether the node is the source of the drag in progress.
    pub(crate) is_dragged: bool,
}

impl Node {
    /// A detached node.
    pub(crate) fn new(kind: Container, widget: Option<Box<dyn Widget>>) -> Self {
        let style_key = match &widget {
            Some(w) if w.style_key() != "Widget" => w.style_key().to_string(),
            _ => kind.kind().style_key().to_string(),
        };
        Self {
            widget,
            kind,
            style_key,
            name: None,
            parent: None,
            logical_parent: None,
            props: Props::default(),
            slot: Rect::default(),
            last_slots: Rect::default(),
            last_painted_slot: Rect::default(),
            content_size: Size::zero(),
            registered: LayoutingType::empty(),
            dirty: true,
            queued_for_clipping: false,
            clipping: Region::new(),
            cache: None,
            handlers: Handlers::default(),
            has_focus: false,
            is_active: false,
            is_dragged: false,
        }
    }

    /// Return the node's container state.
    pub fn kind(&self) -> &Container {
        &self.kind
    }

    /// Return the node's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return the style key used on construction.
    pub fn style_key(&self) -> &str {
        &self.style_key
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's logical parent, if any.
    pub fn logical_parent(&self) -> Option<NodeId> {
        self.logical_parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        self.kind.children()
    }

    /// Return the node's properties.
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Return the resolved slot.
    pub fn slot(&self) -> Rect {
        self.slot
    }

    /// Return the slot at the last completed layout step.
    pub fn last_slots(&self) -> Rect {
        self.last_slots
    }

    /// Return the slot at the last paint.
    pub fn last_painted_slot(&self) -> Rect {
        self.last_painted_slot
    }

    /// Return the content size.
    pub fn content_size(&self) -> Size {
        self.content_size
    }

    /// Return the pending layout flags.
    pub fn registered(&self) -> LayoutingType {
        self.registered
    }

    /// Return true if the node needs repainting.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Return the pending clip region.
    pub fn clipping(&self) -> &Region {
        &self.clipping
    }

    /// Return true if an offscreen bitmap is held.
    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Return true if the node holds keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Return true if the node captures the mouse.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Return true if the node is being dragged.
    pub fn is_dragged(&self) -> bool {
        self.is_dragged
    }

    /// Return the widget payload.
    pub fn widget(&self) -> Option<&dyn Widget> {
        self.widget.as_deref()
    }

    /// The slot shrunk by the margin, in the node's own coordinates.
    pub fn client_rectangle(&self) -> Rect {
        self.slot.size().rect().inflated(-self.props.margin)
    }
}

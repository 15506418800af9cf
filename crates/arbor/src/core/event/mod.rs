//! Input event types and per-node dispatch.

use std::{collections::HashMap, fmt};

use tracing::trace;

use crate::{
    Core, NodeId,
    containers::{ContainerKind, scroller},
    geom::Point,
};

/// Keyboard primitives.
pub mod key;
/// Mouse primitives.
pub mod mouse;

pub use key::{Key, KeyCode, Mods};
pub use mouse::Button;

/// Payload of mouse button events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseButtonEvent {
    /// Button involved.
    pub button: Button,
    /// Pointer position in surface coordinates.
    pub position: Point,
}

/// Payload of mouse wheel events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseWheelEvent {
    /// Notches turned. Positive is away from the user.
    pub delta: i32,
    /// Pointer position in surface coordinates.
    pub position: Point,
}

/// An event delivered to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The pointer moved.
    MouseMove {
        /// New pointer position.
        position: Point,
        /// Movement since the previous position.
        delta: Point,
    },
    /// The pointer entered the node.
    MouseEnter(Point),
    /// The pointer left the node.
    MouseLeave(Point),
    /// A button was pressed.
    MouseDown(MouseButtonEvent),
    /// A button was released.
    MouseUp(MouseButtonEvent),
    /// A press and release landed on the same node.
    MouseClick(MouseButtonEvent),
    /// Two clicks landed within the double-click delay.
    MouseDoubleClick(MouseButtonEvent),
    /// The wheel turned.
    MouseWheel(MouseWheelEvent),
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// A character was typed.
    KeyPress(char),
    /// The node gained focus.
    Focused,
    /// The node lost focus.
    Unfocused,
    /// The node became the source of a drag.
    StartDrag(Point),
    /// The pointer moved while this node is being dragged.
    Drag {
        /// New pointer position.
        position: Point,
        /// Movement since the previous position.
        delta: Point,
    },
    /// A drag from the given source entered this drop target.
    DragEnter(NodeId),
    /// A drag from the given source left this drop target.
    DragLeave(NodeId),
    /// The given source was dropped onto this node.
    Drop(NodeId),
    /// The drag of this node ended, over the given target if any.
    EndDrag(Option<NodeId>),
}

/// A drag operation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDrop {
    /// Node being dragged.
    pub source: NodeId,
    /// Accepting node under the pointer.
    pub target: Option<NodeId>,
}

/// Discriminant of an [`Event`], used to key subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`Event::MouseMove`]
    MouseMove,
    /// [`Event::MouseEnter`]
    MouseEnter,
    /// [`Event::MouseLeave`]
    MouseLeave,
    /// [`Event::MouseDown`]
    MouseDown,
    /// [`Event::MouseUp`]
    MouseUp,
    /// [`Event::MouseClick`]
    MouseClick,
    /// [`Event::MouseDoubleClick`]
    MouseDoubleClick,
    /// [`Event::MouseWheel`]
    MouseWheel,
    /// [`Event::KeyDown`]
    KeyDown,
    /// [`Event::KeyUp`]
    KeyUp,
    /// [`Event::KeyPress`]
    KeyPress,
    /// [`Event::Focused`]
    Focused,
    /// [`Event::Unfocused`]
    Unfocused,
    /// [`Event::StartDrag`]
    StartDrag,
    /// [`Event::Drag`]
    Drag,
    /// [`Event::DragEnter`]
    DragEnter,
    /// [`Event::DragLeave`]
    DragLeave,
    /// [`Event::Drop`]
    Drop,
    /// [`Event::EndDrag`]
    EndDrag,
}

impl Event {
    /// The kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MouseMove { .. } => EventKind::MouseMove,
            Self::MouseEnter(_) => EventKind::MouseEnter,
            Self::MouseLeave(_) => EventKind::MouseLeave,
            Self::MouseDown(_) => EventKind::MouseDown,
            Self::MouseUp(_) => EventKind::MouseUp,
            Self::MouseClick(_) => EventKind::MouseClick,
            Self::MouseDoubleClick(_) => EventKind::MouseDoubleClick,
            Self::MouseWheel(_) => EventKind::MouseWheel,
            Self::KeyDown(_) => EventKind::KeyDown,
            Self::KeyUp(_) => EventKind::KeyUp,
            Self::KeyPress(_) => EventKind::KeyPress,
            Self::Focused => EventKind::Focused,
            Self::Unfocused => EventKind::Unfocused,
            Self::StartDrag(_) => EventKind::StartDrag,
            Self::Drag { .. } => EventKind::Drag,
            Self::DragEnter(_) => EventKind::DragEnter,
            Self::DragLeave(_) => EventKind::DragLeave,
            Self::Drop(_) => EventKind::Drop,
            Self::EndDrag(_) => EventKind::EndDrag,
        }
    }

    /// Is this a mouse event?
    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            Self::MouseMove { .. }
                | Self::MouseEnter(_)
                | Self::MouseLeave(_)
                | Self::MouseDown(_)
                | Self::MouseUp(_)
                | Self::MouseClick(_)
                | Self::MouseDoubleClick(_)
                | Self::MouseWheel(_)
                | Self::Drag { .. }
        )
    }

    /// Is this a drag-and-drop event?
    pub fn is_drag(&self) -> bool {
        matches!(
            self,
            Self::StartDrag(_)
                | Self::Drag { .. }
                | Self::DragEnter(_)
                | Self::DragLeave(_)
                | Self::Drop(_)
                | Self::EndDrag(_)
        )
    }

    /// Does an unhandled event of this kind travel to the focus parent?
    /// Drag events stay on the node they were sent to.
    pub fn bubbles(&self) -> bool {
        !self.is_drag()
            && !matches!(
                self,
                Self::MouseEnter(_) | Self::MouseLeave(_) | Self::Focused | Self::Unfocused
            )
    }
}

/// An event in flight, with its handled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventArgs {
    /// The event.
    pub event: Event,
    /// Set to stop bubbling.
    pub handled: bool,
}

impl EventArgs {
    /// Unhandled arguments for an event.
    pub fn new(event: Event) -> Self {
        Self {
            event,
            handled: false,
        }
    }
}

/// An event subscriber.
pub type Handler = Box<dyn FnMut(&mut Core, NodeId, &mut EventArgs) + Send + Sync>;

/// Subscribers of a node, per event kind.
#[derive(Default)]
pub struct Handlers {
    /// Subscriber lists.
    map: HashMap<EventKind, Vec<Handler>>,
}

impl fmt::Debug for Handlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.map.iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

impl Handlers {
    /// Append a subscriber.
    pub fn add(&mut self, kind: EventKind, handler: Handler) {
        self.map.entry(kind).or_default().push(handler);
    }

    /// Are there subscribers for this kind?
    pub fn has(&self, kind: EventKind) -> bool {
        self.map.get(&kind).is_some_and(|v| !v.is_empty())
    }

    /// Remove all subscribers of a kind.
    pub fn clear(&mut self, kind: EventKind) {
        self.map.remove(&kind);
    }

    /// Take the subscribers of a kind out while they run.
    fn take(&mut self, kind: EventKind) -> Vec<Handler> {
        self.map.remove(&kind).unwrap_or_default()
    }

    /// Put running subscribers back, keeping any added in the meantime after them.
    fn restore(&mut self, kind: EventKind, mut handlers: Vec<Handler>) {
        handlers.extend(self.take(kind));
        if !handlers.is_empty() {
            self.map.insert(kind, handlers);
        }
    }
}

/// Deliver a fresh event to a node. Returns whether it was handled.
pub(crate) fn send(core: &mut Core, id: NodeId, event: Event) -> bool {
    let mut args = EventArgs::new(event);
    dispatch(core, id, &mut args);
    args.handled
}

/// Deliver an event to a node and bubble it along the focus parents.
pub(crate) fn dispatch(core: &mut Core, id: NodeId, args: &mut EventArgs) {
    let Some(node) = core.nodes.get(id) else {
        trace!("event {:?} for disposed node {id:?}", args.event.kind());
        return;
    };
    let kind = node.kind.kind();
    let focusable = node.props.focusable;
    let bubble_mouse = node.props.bubble_mouse_event;

    match args.event {
        Event::MouseDown(_) if focusable => {
            core.set_focus(Some(id));
            args.handled = true;
        }
        Event::MouseWheel(w) if kind == ContainerKind::Scroller => {
            scroller::on_mouse_wheel(core, id, w.delta);
            args.handled = true;
        }
        _ => {}
    }

    let ek = args.event.kind();
    if core.nodes.get(id).is_some_and(|n| n.handlers.has(ek)) {
        invoke(core, id, ek, args);
    } else if !args.handled
        && args.event.bubbles()
        && (bubble_mouse || !args.event.is_mouse())
        && let Some(fp) = core.focus_parent(id)
    {
        dispatch(core, fp, args);
    }

    if let Event::KeyDown(k) = args.event
        && kind == ContainerKind::Scroller
    {
        scroller::on_key_down(core, id, k.key);
    }
}

/// Run every subscriber of a kind on a node.
fn invoke(core: &mut Core, id: NodeId, kind: EventKind, args: &mut EventArgs) {
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    let mut handlers = node.handlers.take(kind);
    for h in handlers.iter_mut() {
        h(core, id, args);
    }
    if let Some(node) = core.nodes.get_mut(id) {
        node.handlers.restore(kind, handlers);
    }
}

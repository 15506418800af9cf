//! Host input processing: hit testing, hover tracking, mouse capture, click
//! recognition and drag-and-drop.
//!
//! The host forwards raw input through the `process_*` entry points on
//! [`Core`]. Mouse events go to the hovered node, or to the active node while
//! a button is held; keyboard events go to the focused node. Moving an
//! active node that allows dragging turns the capture into a drag: moves go
//! to the source as drag events and the accepting node under the pointer
//! becomes the drop target.

use std::time::Instant;

use tracing::trace;

use crate::{
    Core, NodeId,
    containers::Container,
    event::{self, Button, DragDrop, Event, Key, MouseButtonEvent, MouseWheelEvent},
    geom::Point,
    layout::client_rectangle,
};

/// A click waiting to see whether a second press turns it into a double click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedClick {
    /// Node the click will be delivered to.
    pub sender: NodeId,
    /// Button released.
    pub button: Button,
    /// Pointer position at release.
    pub position: Point,
    /// Time of release.
    pub at: Instant,
}

/// Hit test a point given in the root's coordinates.
///
/// On success `m` is rewritten into the node's parent client coordinates,
/// shifted by any scroll offsets crossed on the way.
pub(crate) fn point_is_in(core: &Core, id: NodeId, m: &mut Point) -> bool {
    let Some(node) = core.nodes.get(id) else {
        return false;
    };
    if let Container::Root(_) = node.kind {
        return true;
    }
    let Some(parent) = node.parent else {
        return false;
    };
    if !node.props.visible || !node.props.enabled {
        return false;
    }
    if !point_is_in(core, parent, m) {
        return false;
    }
    let Some(p) = core.nodes.get(parent) else {
        return false;
    };
    *m -= p.slot.position() + client_rectangle(core, parent).position();
    if !node.slot.contains_or_equal(*m) {
        return false;
    }
    if let Container::Scroller(s) = &node.kind {
        if s.single.child.is_none() {
            return false;
        }
        *m += s.scroll;
    }
    true
}

/// Is the pointer over this node?
pub(crate) fn mouse_is_in(core: &Core, id: NodeId, position: Point) -> bool {
    let Some(node) = core.nodes.get(id) else {
        return false;
    };
    let mut m = position;
    node.props.visible && node.props.enabled && point_is_in(core, id, &mut m)
}

/// Make this node the hover target, then descend into the topmost child
/// under the pointer.
pub(crate) fn check_hover_widget(core: &mut Core, id: NodeId, position: Point) {
    if core.hover != Some(id) {
        event::send(core, id, Event::MouseEnter(position));
        core.hover = Some(id);
    }
    let children = core
        .nodes
        .get(id)
        .map(|n| n.kind.children().to_vec())
        .unwrap_or_default();
    if let Some(c) = children
        .into_iter()
        .rev()
        .find(|c| mouse_is_in(core, *c, position))
    {
        check_hover_widget(core, c, position);
    }
}

/// Send a mouse move to the current hover target, if any.
fn move_hover(core: &mut Core, ev: Event) {
    if let Some(h) = core.hover {
        event::send(core, h, ev);
    }
}

/// Send mouse-leave from the hover target up its focus parents, clearing it.
fn leave_hover_chain(core: &mut Core, position: Point) {
    while let Some(h) = core.hover {
        event::send(core, h, Event::MouseLeave(position));
        core.hover = core.focus_parent(h);
    }
}

/// Track a pointer move. Returns whether the pointer is over the interface.
pub(crate) fn process_mouse_move(core: &mut Core, position: Point) -> bool {
    let delta = position - core.mouse;
    core.mouse = position;
    let ev = Event::MouseMove { position, delta };

    if let Some(a) = core.active {
        if core.drag.is_none() && core.nodes.get(a).is_some_and(|n| n.props.allow_drag) {
            start_drag(core, a, position);
        }
        if core.drag.is_some() {
            track_drag(core, position, delta);
        } else {
            event::send(core, a, ev);
        }
        return true;
    }

    let roots = core.children(core.root).to_vec();
    if let Some(hover) = core.hover.filter(|h| core.nodes.contains_key(*h)) {
        let mut top = hover;
        while let Some(fp) = core.focus_parent(top) {
            top = fp;
        }
        let idx = roots.iter().position(|r| *r == top).unwrap_or(0);
        if let Some(g) = roots[..idx]
            .iter()
            .copied()
            .find(|g| mouse_is_in(core, *g, position))
        {
            trace!("pointer moved onto a higher top-level widget {g:?}");
            leave_hover_chain(core, position);
            check_hover_widget(core, g, position);
            move_hover(core, ev);
            return true;
        }

        if mouse_is_in(core, hover, position) {
            check_hover_widget(core, hover, position);
            move_hover(core, ev);
            return true;
        }
        event::send(core, hover, Event::MouseLeave(position));
        let mut h = hover;
        while let Some(fp) = core.focus_parent(h) {
            h = fp;
            core.hover = Some(h);
            if mouse_is_in(core, h, position) {
                check_hover_widget(core, h, position);
                move_hover(core, ev);
                return true;
            }
            event::send(core, h, Event::MouseLeave(position));
        }
    }

    if let Some(g) = roots
        .iter()
        .copied()
        .find(|g| mouse_is_in(core, *g, position))
    {
        check_hover_widget(core, g, position);
        move_hover(core, ev);
        return true;
    }
    core.hover = None;
    false
}

/// The deepest node under the pointer, skipping the subtree of `skip`.
fn node_under(core: &Core, position: Point, skip: NodeId) -> Option<NodeId> {
    let hit = |c: NodeId| c != skip && mouse_is_in(core, c, position);
    let mut cur = core.children(core.root).iter().copied().find(|c| hit(*c))?;
    while let Some(c) = core.children(cur).iter().rev().copied().find(|c| hit(*c)) {
        cur = c;
    }
    Some(cur)
}

/// The nearest node under the pointer, or focus parent of it, accepting a
/// drop from `source`.
fn drop_target(core: &Core, position: Point, source: NodeId) -> Option<NodeId> {
    let key = core.nodes.get(source)?.style_key.as_str();
    let mut cur = node_under(core, position, source);
    while let Some(c) = cur {
        if c != source && core.nodes.get(c)?.props.accepts_drop(key) {
            return Some(c);
        }
        cur = core.focus_parent(c);
    }
    None
}

/// Make the active node the source of a new drag.
fn start_drag(core: &mut Core, source: NodeId, position: Point) {
    trace!("drag of {source:?} started at {position:?}");
    core.drag = Some(DragDrop {
        source,
        target: None,
    });
    if let Some(n) = core.nodes.get_mut(source) {
        n.is_dragged = true;
    }
    event::send(core, source, Event::StartDrag(position));
}

/// Forward a move to the drag source and follow the target under the pointer.
fn track_drag(core: &mut Core, position: Point, delta: Point) {
    let Some(op) = core.drag else {
        return;
    };
    event::send(core, op.source, Event::Drag { position, delta });
    let Some(op) = core.drag else {
        return;
    };
    let target = drop_target(core, position, op.source);
    if target != op.target {
        set_drop_target(core, target);
    }
}

/// Replace the drop target of the drag in progress, sending leave to the old
/// target and enter to the new one.
pub(crate) fn set_drop_target(core: &mut Core, target: Option<NodeId>) {
    let Some(op) = core.drag.as_mut() else {
        return;
    };
    let old = op.target.take();
    op.target = target;
    let source = op.source;
    if let Some(o) = old {
        event::send(core, o, Event::DragLeave(source));
    }
    if let Some(t) = target {
        event::send(core, t, Event::DragEnter(source));
    }
}

/// Drop onto the target, if any, then tell the source the drag is over.
fn finish_drag(core: &mut Core, op: DragDrop) {
    trace!("drag of {:?} ended over {:?}", op.source, op.target);
    if let Some(n) = core.nodes.get_mut(op.source) {
        n.is_dragged = false;
    }
    if let Some(t) = op.target {
        event::send(core, t, Event::Drop(op.source));
    }
    event::send(core, op.source, Event::EndDrag(op.target));
}

/// Abandon the drag in progress without dropping.
pub(crate) fn cancel_drag(core: &mut Core) {
    set_drop_target(core, None);
    if let Some(op) = core.drag.take() {
        finish_drag(core, op);
    }
}

/// Deliver an armed click once the double-click window has passed.
pub(crate) fn fire_expired_click(core: &mut Core, now: Instant) {
    let delay = core.config.double_click_delay();
    if let Some(a) = core.armed_click
        && now.duration_since(a.at) >= delay
    {
        core.armed_click = None;
        event::send(
            core,
            a.sender,
            Event::MouseClick(MouseButtonEvent {
                button: a.button,
                position: a.position,
            }),
        );
    }
}

/// A button went down. Returns whether a node received it.
pub(crate) fn process_mouse_button_down(core: &mut Core, button: Button, now: Instant) -> bool {
    let Some(hover) = core.hover else {
        return false;
    };
    let position = core.mouse;
    let payload = MouseButtonEvent { button, position };

    let mut target = Some(hover);
    while let Some(t) = target {
        if core.nodes.get(t).is_some_and(|n| n.props.focusable) {
            break;
        }
        target = core.focus_parent(t);
    }
    let hover_focused = target.unwrap_or(hover);

    if let Some(a) = core.armed_click
        && a.sender == hover_focused
        && now.duration_since(a.at) < core.config.double_click_delay()
    {
        core.armed_click = None;
        event::send(core, a.sender, Event::MouseDoubleClick(payload));
        return true;
    }
    if let Some(a) = core.armed_click.take() {
        event::send(
            core,
            a.sender,
            Event::MouseClick(MouseButtonEvent {
                button: a.button,
                position: a.position,
            }),
        );
    }

    event::send(core, hover, Event::MouseDown(payload));
    core.set_active(Some(hover_focused));
    true
}

/// A button came up. Returns whether a node had captured the mouse.
pub(crate) fn process_mouse_button_up(core: &mut Core, button: Button, now: Instant) -> bool {
    let Some(active) = core.active else {
        return false;
    };
    let position = core.mouse;
    if let Some(op) = core.drag.take() {
        finish_drag(core, op);
    } else if mouse_is_in(core, active, position) {
        core.armed_click = Some(ArmedClick {
            sender: active,
            button,
            position,
            at: now,
        });
    }
    event::send(
        core,
        active,
        Event::MouseUp(MouseButtonEvent { button, position }),
    );
    core.set_active(None);
    true
}

/// The wheel turned. Returns whether a node received it.
pub(crate) fn process_mouse_wheel(core: &mut Core, delta: i32) -> bool {
    let Some(hover) = core.hover else {
        return false;
    };
    let position = core.mouse;
    event::send(
        core,
        hover,
        Event::MouseWheel(MouseWheelEvent { delta, position }),
    );
    true
}

/// Deliver a keyboard event to the focused node.
fn process_key(core: &mut Core, ev: Event) -> bool {
    let Some(f) = core.focused else {
        return false;
    };
    event::send(core, f, ev);
    true
}

/// A key went down.
pub(crate) fn process_key_down(core: &mut Core, key: Key) -> bool {
    process_key(core, Event::KeyDown(key))
}

/// A key came up.
pub(crate) fn process_key_up(core: &mut Core, key: Key) -> bool {
    process_key(core, Event::KeyUp(key))
}

/// A character was typed.
pub(crate) fn process_key_press(core: &mut Core, c: char) -> bool {
    process_key(core, Event::KeyPress(c))
}

//! The layouting algorithm shared by every node.
//!
//! Layout is resolved incrementally. A change to a node's properties queues
//! the affected [`LayoutingType`] units, and each unit is resolved on its own
//! once the values it depends on are known. A unit whose inputs are not ready
//! reports failure and is retried later in the pass, or deferred to the next
//! one.
//!
//! The kind-specific hooks live in [`crate::containers`]. This module holds
//! the base behaviour and the dispatchers that route each hook to its kind.

use tracing::{debug, trace};

use crate::{
    Core, NodeId,
    containers::{Container, ContainerKind, group, scroller, single, stack, wrapper},
    geom::{HorizontalAlignment, Measure, Orientation, Rect, VerticalAlignment},
    layouting::{LayoutingQueueItem, LayoutingType},
    paint,
};

/// Placement of a node inside its parent along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    /// Left or top.
    Start,
    /// Centered.
    Center,
    /// Right or bottom.
    End,
}

/// The alignment of a node along an axis.
fn align_along(core: &Core, id: NodeId, axis: Orientation) -> Align {
    let Some(node) = core.nodes.get(id) else {
        return Align::Center;
    };
    match axis {
        Orientation::Horizontal => match node.props.horizontal_alignment {
            HorizontalAlignment::Left => Align::Start,
            HorizontalAlignment::Center => Align::Center,
            HorizontalAlignment::Right => Align::End,
        },
        Orientation::Vertical => match node.props.vertical_alignment {
            VerticalAlignment::Top => Align::Start,
            VerticalAlignment::Center => Align::Center,
            VerticalAlignment::Bottom => Align::End,
        },
    }
}

/// The pending layout flags of a node. Empty for disposed nodes.
pub(crate) fn registered(core: &Core, id: NodeId) -> LayoutingType {
    core.nodes
        .get(id)
        .map_or(LayoutingType::empty(), |n| n.registered)
}

/// The slot of a node. Empty for disposed nodes.
pub(crate) fn slot(core: &Core, id: NodeId) -> Rect {
    core.nodes.get(id).map(|n| n.slot).unwrap_or_default()
}

/// Is the node visible?
pub(crate) fn is_visible(core: &Core, id: NodeId) -> bool {
    core.nodes.get(id).is_some_and(|n| n.props.visible)
}

/// The client rectangle of a node in its own coordinates.
pub(crate) fn client_rectangle(core: &Core, id: NodeId) -> Rect {
    core.nodes
        .get(id)
        .map(|n| n.client_rectangle())
        .unwrap_or_default()
}

/// The size policy of a node along an axis, with Inherit resolved.
///
/// Inherit resolves to Fit when the parent resolves to Fit, and to Stretched
/// otherwise. Children of the root, and detached nodes, resolve to Stretched.
pub(crate) fn measure_of(core: &Core, id: NodeId, axis: Orientation) -> Measure {
    let Some(node) = core.nodes.get(id) else {
        return Measure::Stretched;
    };
    match node.props.size(axis) {
        Measure::Inherit => match node.parent {
            Some(p) if p != core.root => {
                if measure_of(core, p, axis).is_fit() {
                    Measure::Fit
                } else {
                    Measure::Stretched
                }
            }
            _ => Measure::Stretched,
        },
        m => m,
    }
}

/// Store a size policy, requesting layout on that axis.
///
/// Fixed values outside the node's size bounds are rejected. Returns whether
/// the stored value changed.
pub(crate) fn set_size_measure(core: &mut Core, id: NodeId, axis: Orientation, m: Measure) -> bool {
    let m = match m {
        Measure::Percent(p) => Measure::percent(p),
        m => m,
    };
    let Some(node) = core.nodes.get_mut(id) else {
        debug!("size change on disposed node {id:?}");
        return false;
    };
    if node.props.size(axis) == m {
        return false;
    }
    if let Measure::Fixed(v) = m {
        let min = node.props.minimum_size.along(axis);
        let max = node.props.maximum_size.along(axis);
        if v < min || (max > 0 && v > max) {
            debug!("rejected {axis} size {v} outside [{min}, {max}] on {id:?}");
            return false;
        }
    }
    *node.props.size_mut(axis) = m;
    register_for_layouting(core, id, LayoutingType::size(axis));
    true
}

/// Queue layout work for a node.
///
/// Flags already pending are ignored, as are flags that cannot apply: the
/// position of a stretched axis, child arrangement on a node that does not
/// arrange, and anything the parent controls itself.
pub(crate) fn register_for_layouting(core: &mut Core, id: NodeId, lt: LayoutingType) {
    let Some(node) = core.nodes.get(id) else {
        debug!("layout request for disposed node {id:?}");
        return;
    };
    let Some(parent) = node.parent else {
        return;
    };
    let mut lt = lt.difference(node.registered);
    if lt.is_empty() {
        return;
    }
    let arranges = node.kind.arranges_children();
    if measure_of(core, id, Orientation::Horizontal).is_stretched() {
        lt.remove(LayoutingType::X);
    }
    if measure_of(core, id, Orientation::Vertical).is_stretched() {
        lt.remove(LayoutingType::Y);
    }
    if !arranges {
        lt.remove(LayoutingType::ARRANGE_CHILDREN);
    }
    lt = children_layouting_constraints(core, parent, lt);

    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    lt = lt.difference(node.registered);
    if lt.is_empty() {
        return;
    }
    node.registered |= lt;
    for unit in lt.units() {
        trace!("queue {unit:?} for {id:?}");
        core.layout_queue.push(LayoutingQueueItem::new(unit, id));
    }
}

/// Remove the flags a parent resolves for its children itself.
fn children_layouting_constraints(core: &Core, parent: NodeId, lt: LayoutingType) -> LayoutingType {
    match core.nodes.get(parent).map(|n| &n.kind) {
        Some(Container::Stack(s)) => lt.difference(LayoutingType::position(s.orientation)),
        Some(Container::Wrapper(_)) => lt.difference(LayoutingType::POSITIONING),
        _ => lt,
    }
}

/// Resolve one layout unit. Returns false when its inputs are not ready.
pub(crate) fn update_layout(core: &mut Core, id: NodeId, lt: LayoutingType) -> bool {
    let Some(kind) = core.nodes.get(id).map(|n| n.kind.kind()) else {
        return false;
    };
    match kind {
        ContainerKind::Stack => stack::update_layout(core, id, lt),
        ContainerKind::Wrapper => wrapper::update_layout(core, id, lt),
        ContainerKind::Single | ContainerKind::Scroller => single::update_layout(core, id, lt),
        ContainerKind::Leaf | ContainerKind::Root | ContainerKind::Group => base_update_layout(core, id, lt),
    }
}

/// Base resolution of a position or size unit.
pub(crate) fn base_update_layout(core: &mut Core, id: NodeId, lt: LayoutingType) -> bool {
    let Some(node) = core.nodes.get_mut(id) else {
        return false;
    };
    node.registered.remove(lt);
    let Some(parent) = node.parent else {
        return false;
    };

    if let Some(axis) = lt.position_axis() {
        if !update_position(core, id, parent, axis) {
            return false;
        }
    } else if let Some(axis) = lt.size_axis()
        && !update_size(core, id, parent, axis)
    {
        return false;
    }

    if let Some(node) = core.nodes.get(id)
        && node.registered.is_empty()
        && node.dirty
    {
        paint::enqueue_for_repaint(core, id);
    }
    true
}

/// Resolve the position of a node along an axis.
fn update_position(core: &mut Core, id: NodeId, parent: NodeId, axis: Orientation) -> bool {
    let Some(node) = core.nodes.get(id) else {
        return false;
    };
    let offset = node.props.offset(axis);
    let pos = if offset != 0 {
        offset
    } else {
        let size_flag = LayoutingType::size(axis);
        if registered(core, parent).contains(size_flag) || node.registered.contains(size_flag) {
            return false;
        }
        let pcw = client_rectangle(core, parent).len_along(axis);
        let len = node.slot.len_along(axis);
        match align_along(core, id, axis) {
            Align::Start => 0,
            Align::End => pcw - len,
            Align::Center => pcw / 2 - len / 2,
        }
    };

    let Some(node) = core.nodes.get_mut(id) else {
        return false;
    };
    *node.slot.pos_along_mut(axis) = pos;
    if node.last_slots.pos_along(axis) == pos {
        return true;
    }
    node.dirty = true;
    on_layout_changes(core, id, LayoutingType::position(axis));
    if let Some(node) = core.nodes.get_mut(id) {
        *node.last_slots.pos_along_mut(axis) = node.slot.pos_along(axis);
    }
    true
}

/// Resolve the size of a node along an axis.
fn update_size(core: &mut Core, id: NodeId, parent: NodeId, axis: Orientation) -> bool {
    let size_flag = LayoutingType::size(axis);
    let visible = is_visible(core, id);
    let new = if visible {
        match measure_of(core, id, axis) {
            Measure::Fixed(v) => v,
            Measure::Fit => measure_raw_size(core, id, axis),
            _ if registered(core, parent).contains(size_flag) => return false,
            Measure::Percent(p) => {
                let pcw = f64::from(client_rectangle(core, parent).len_along(axis));
                (pcw * f64::from(p) / 100.0).round_ties_even() as i32
            }
            Measure::Stretched | Measure::Inherit => client_rectangle(core, parent).len_along(axis),
        }
    } else {
        0
    };

    let Some(node) = core.nodes.get_mut(id) else {
        return false;
    };
    *node.slot.len_along_mut(axis) = new;
    if new < 0 {
        return false;
    }
    let min = node.props.minimum_size.along(axis);
    let max = node.props.maximum_size.along(axis);
    let len = if !visible {
        0
    } else if new < min {
        min
    } else if max > 0 && new > max {
        max
    } else {
        new
    };
    *node.slot.len_along_mut(axis) = len;

    if node.last_slots.len_along(axis) == len {
        return true;
    }
    node.dirty = true;
    on_layout_changes(core, id, size_flag);
    if let Some(node) = core.nodes.get_mut(id) {
        *node.last_slots.len_along_mut(axis) = node.slot.len_along(axis);
    }
    true
}

/// React to a resolved change of a node's own slot, notifying the parent.
pub(crate) fn on_layout_changes(core: &mut Core, id: NodeId, lt: LayoutingType) {
    on_layout_changes_with(core, id, lt, true);
}

/// React to a resolved change of a node's own slot.
///
/// `notify_parent` is false when the parent itself applied the change.
pub(crate) fn on_layout_changes_with(
    core: &mut Core,
    id: NodeId,
    lt: LayoutingType,
    notify_parent: bool,
) {
    let Some(kind) = core.nodes.get(id).map(|n| n.kind.kind()) else {
        return;
    };
    match kind {
        ContainerKind::Wrapper => wrapper::on_layout_changes(core, id, lt, notify_parent),
        ContainerKind::Group | ContainerKind::Stack => {
            base_on_layout_changes(core, id, lt, notify_parent);
            group::on_layout_changes(core, id, lt);
        }
        ContainerKind::Single => {
            base_on_layout_changes(core, id, lt, notify_parent);
            single::on_layout_changes(core, id, lt);
        }
        ContainerKind::Scroller => {
            base_on_layout_changes(core, id, lt, notify_parent);
            single::on_layout_changes(core, id, lt);
            scroller::update_max_scroll(core, id, lt);
        }
        ContainerKind::Leaf | ContainerKind::Root => base_on_layout_changes(core, id, lt, notify_parent),
    }
}

/// A resolved size re-aligns the node on that axis.
fn base_on_layout_changes(core: &mut Core, id: NodeId, lt: LayoutingType, notify_parent: bool) {
    if let Some(axis) = lt.size_axis() {
        register_for_layouting(core, id, LayoutingType::position(axis));
    }
    if notify_parent {
        raise_layout_changed(core, id, lt);
    }
}

/// Tell the parent container that a child's slot changed.
pub(crate) fn raise_layout_changed(core: &mut Core, id: NodeId, lt: LayoutingType) {
    let Some(parent) = core.nodes.get(id).and_then(|n| n.parent) else {
        return;
    };
    if parent != core.root && core.nodes.contains_key(parent) {
        on_child_layout_changes(core, parent, id, lt);
    }
}

/// React to a resolved change of a child's slot.
pub(crate) fn on_child_layout_changes(
    core: &mut Core,
    parent: NodeId,
    child: NodeId,
    lt: LayoutingType,
) {
    let Some(kind) = core.nodes.get(parent).map(|n| n.kind.kind()) else {
        return;
    };
    match kind {
        ContainerKind::Group => group::on_child_layout_changes(core, parent, child, lt),
        ContainerKind::Stack => stack::on_child_layout_changes(core, parent, child, lt),
        ContainerKind::Wrapper => wrapper::on_child_layout_changes(core, parent, child, lt),
        ContainerKind::Single => single::on_child_layout_changes(core, parent, child, lt),
        ContainerKind::Scroller => {
            single::on_child_layout_changes(core, parent, child, lt);
            scroller::update_max_scroll(core, parent, lt);
        }
        ContainerKind::Leaf | ContainerKind::Root => {}
    }
}

/// The size a node wants along an axis when it is Fit. Negative when it
/// cannot be known yet.
pub(crate) fn measure_raw_size(core: &mut Core, id: NodeId, axis: Orientation) -> i32 {
    let Some(kind) = core.nodes.get(id).map(|n| n.kind.kind()) else {
        return -1;
    };
    match kind {
        ContainerKind::Group => group::measure_raw_size(core, id, axis),
        ContainerKind::Stack => stack::measure_raw_size(core, id, axis),
        ContainerKind::Wrapper => wrapper::measure_raw_size(core, id, axis),
        ContainerKind::Single | ContainerKind::Scroller => single::measure_raw_size(core, id, axis),
        ContainerKind::Root => slot(core, id).len_along(axis),
        ContainerKind::Leaf => base_measure_raw_size(core, id, axis),
    }
}

/// Content size plus the margin on both sides.
///
/// Leaves with a widget payload measure the widget's content.
pub(crate) fn base_measure_raw_size(core: &Core, id: NodeId, axis: Orientation) -> i32 {
    let Some(node) = core.nodes.get(id) else {
        return -1;
    };
    let content = match (&node.kind, &node.widget) {
        (Container::Leaf, Some(w)) => w.content_size().along(axis),
        _ => node.content_size.along(axis),
    };
    content + 2 * node.props.margin
}

/// Drain the layout queue.
///
/// Items queued while draining are processed in the same pass. Items that
/// exhaust their retries are deferred, and the deferred items form the queue
/// of the next pass.
pub(crate) fn process_layouting(core: &mut Core) {
    while let Some(item) = core.layout_queue.pop() {
        process_item(core, item);
    }
    core.layout_queue.finish_pass();
}

/// Process one queue item.
fn process_item(core: &mut Core, mut item: LayoutingQueueItem) {
    let Some(node) = core.nodes.get(item.node) else {
        trace!("drop {:?} for disposed node {:?}", item.kind, item.node);
        return;
    };
    if node.parent.is_none() {
        trace!("drop {:?} for detached node {:?}", item.kind, item.node);
        return;
    }
    item.tries += 1;
    if update_layout(core, item.node, item.kind) {
        if let Some(node) = core.nodes.get(item.node)
            && node.registered.is_empty()
            && node.dirty
        {
            paint::enqueue_for_repaint(core, item.node);
        }
        return;
    }

    let max_tries = core.config.max_layouting_tries;
    let max_discard = core.config.max_discard_count;
    let Some(node) = core.nodes.get_mut(item.node) else {
        return;
    };
    if item.tries < max_tries {
        node.registered |= item.kind;
        core.layout_queue.push(item);
    } else if item.discard_count < max_discard {
        item.tries = 0;
        item.discard_count += 1;
        node.registered |= item.kind;
        core.layout_queue.defer(item);
    } else {
        debug!(
            "layout {:?} for {:?} dropped after {} deferrals",
            item.kind, item.node, item.discard_count
        );
    }
}

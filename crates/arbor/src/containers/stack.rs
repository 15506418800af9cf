//! Stacks place their visible children one after the other along their
//! orientation, separated by the spacing.
//!
//! Along the stacking axis the stack keeps its content size as the running
//! sum of its children's sizes. One child may be Stretched on that axis: it
//! receives whatever space remains, and the stack sets its size directly. Any
//! further stretched child is demoted to Fit. A Fit stack never has a
//! stretched child.

use crate::{
    Core, NodeId,
    containers::group,
    geom::{Measure, Orientation, Rect, Size},
    layout::{self, client_rectangle, measure_of, on_layout_changes_with, register_for_layouting},
    layouting::LayoutingType,
    paint,
};

/// Orientation, spacing and stretched child of a stack.
pub(crate) fn state(core: &Core, id: NodeId) -> Option<(Orientation, i32, Option<NodeId>)> {
    core.nodes
        .get(id)
        .and_then(|n| n.kind.stack())
        .map(|s| (s.orientation, s.spacing, s.stretched_child))
}

/// Set or clear the stretched child.
fn set_stretched(core: &mut Core, id: NodeId, child: Option<NodeId>) {
    if let Some(s) = core.nodes.get_mut(id).and_then(|n| n.kind.stack_mut()) {
        s.stretched_child = child;
    }
}

/// Add `delta` to the content size along an axis.
fn grow_content(core: &mut Core, id: NodeId, axis: Orientation, delta: i32) {
    if let Some(n) = core.nodes.get_mut(id) {
        *n.content_size.along_mut(axis) += delta;
    }
}

/// Number of visible children.
fn visible_children(core: &Core, id: NodeId) -> i32 {
    core.nodes.get(id).map_or(0, |n| {
        n.kind
            .children()
            .iter()
            .filter(|c| layout::is_visible(core, **c))
            .count() as i32
    })
}

/// Fit measurement. Along the stacking axis this is the summed content plus
/// the spacing between visible children.
pub(crate) fn measure_raw_size(core: &mut Core, id: NodeId, axis: Orientation) -> i32 {
    let Some((orientation, spacing, _)) = state(core, id) else {
        return -1;
    };
    if axis != orientation {
        return group::measure_raw_size(core, id, axis);
    }
    let gaps = (spacing * (visible_children(core, id) - 1)).max(0);
    layout::base_measure_raw_size(core, id, axis) + gaps
}

/// Place visible children with a running offset along the stacking axis.
pub(crate) fn compute_children_positions(core: &mut Core, id: NodeId) {
    let Some((orientation, spacing, _)) = state(core, id) else {
        return;
    };
    let mut d = 0;
    for c in group::children(core, id) {
        let Some(node) = core.nodes.get_mut(c) else {
            continue;
        };
        if !node.props.visible {
            continue;
        }
        *node.slot.pos_along_mut(orientation) = d;
        d += node.slot.len_along(orientation) + spacing;
    }
    if let Some(node) = core.nodes.get_mut(id) {
        node.dirty = true;
    }
}

/// Arrangement is resolved here. Everything else is the base behaviour.
pub(crate) fn update_layout(core: &mut Core, id: NodeId, lt: LayoutingType) -> bool {
    if lt != LayoutingType::ARRANGE_CHILDREN {
        return layout::base_update_layout(core, id, lt);
    }
    if let Some(node) = core.nodes.get_mut(id) {
        node.registered.remove(lt);
    }
    compute_children_positions(core, id);
    if let Some(node) = core.nodes.get(id)
        && node.registered.is_empty()
        && node.dirty
    {
        paint::enqueue_for_repaint(core, id);
    }
    true
}

/// Force the size of a child along an axis.
///
/// The child's own change handling runs, without notifying this stack.
pub(crate) fn set_child_size(core: &mut Core, child: NodeId, axis: Orientation, size: i32) {
    let Some(node) = core.nodes.get_mut(child) else {
        return;
    };
    let max = node.props.maximum_size.along(axis);
    let size = if max > 0 { size.min(max) } else { size };
    if node.slot.len_along(axis) == size {
        return;
    }
    *node.slot.len_along_mut(axis) = size;
    node.dirty = true;
    on_layout_changes_with(core, child, LayoutingType::size(axis), false);
    if let Some(node) = core.nodes.get_mut(child) {
        *node.last_slots.len_along_mut(axis) = node.slot.len_along(axis);
    }
}

/// Give the stretched child whatever space the other visible children and
/// the gaps between them leave.
pub(crate) fn adjust_stretched_child(core: &mut Core, id: NodeId, axis: Orientation) {
    let Some((_, spacing, Some(stretched))) = state(core, id) else {
        return;
    };
    let Some(content) = core.nodes.get(id).map(|n| n.content_size.along(axis)) else {
        return;
    };
    let gaps = (spacing * (visible_children(core, id) - 1)).max(0);
    let free = client_rectangle(core, id).len_along(axis) - content - gaps;
    let min = core
        .nodes
        .get(stretched)
        .map_or(0, |n| n.props.minimum_size.along(axis));
    set_child_size(core, stretched, axis, free.max(min));
}

/// Keep the content size and the stretched child coherent with a child's
/// new size along the stacking axis.
pub(crate) fn on_child_layout_changes(
    core: &mut Core,
    id: NodeId,
    child: NodeId,
    lt: LayoutingType,
) {
    let Some((orientation, _, stretched)) = state(core, id) else {
        return;
    };
    if lt.size_axis() != Some(orientation) {
        group::on_child_layout_changes(core, id, child, lt);
        return;
    }
    let axis = orientation;
    let child_slot = layout::slot(core, child).len_along(axis);
    let child_last = core
        .nodes
        .get(child)
        .map_or(0, |n| n.last_slots.len_along(axis));

    if measure_of(core, child, axis).is_stretched() {
        if stretched.is_none() && !measure_of(core, id, axis).is_fit() {
            set_stretched(core, id, Some(child));
            grow_content(core, id, axis, -child_last);
        } else if stretched != Some(child) {
            grow_content(core, id, axis, -child_last);
            if let Some(n) = core.nodes.get_mut(child) {
                *n.slot.len_along_mut(axis) = 0;
            }
            layout::set_size_measure(core, child, axis, Measure::Fit);
            return;
        }
    } else if stretched == Some(child) {
        set_stretched(core, id, None);
        grow_content(core, id, axis, child_slot);
    } else {
        grow_content(core, id, axis, child_slot - child_last);
    }

    adjust_stretched_child(core, id, axis);
    if measure_of(core, id, axis).is_fit() {
        register_for_layouting(core, id, LayoutingType::size(axis));
    }
    register_for_layouting(core, id, LayoutingType::ARRANGE_CHILDREN);
}

/// Detach a child, giving its space back to the stretched child.
pub(crate) fn remove_child(core: &mut Core, id: NodeId, child: NodeId) {
    let Some((orientation, _, stretched)) = state(core, id) else {
        return;
    };
    if stretched != Some(child) {
        let last = core
            .nodes
            .get(child)
            .map_or(0, |n| n.last_slots.len_along(orientation));
        grow_content(core, id, orientation, -last);
    }
    group::remove_child(core, id, child);
    if stretched == Some(child) {
        set_stretched(core, id, None);
        register_for_layouting(core, id, LayoutingType::SIZING);
    } else {
        adjust_stretched_child(core, id, orientation);
    }
}

/// Change the gap between visible children.
pub(crate) fn set_spacing(core: &mut Core, id: NodeId, spacing: i32) {
    let Some(s) = core.nodes.get_mut(id).and_then(|n| n.kind.stack_mut()) else {
        return;
    };
    if s.spacing == spacing {
        return;
    }
    s.spacing = spacing;
    register_for_layouting(
        core,
        id,
        LayoutingType::SIZING | LayoutingType::ARRANGE_CHILDREN,
    );
}

/// Change the stacking axis.
///
/// The accumulated content and the stretched child belong to the old axis,
/// so they are dropped and every child is re-measured from zero to rebuild
/// them.
pub(crate) fn set_orientation(core: &mut Core, id: NodeId, orientation: Orientation) {
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    let Some(s) = node.kind.stack_mut() else {
        return;
    };
    if s.orientation == orientation {
        return;
    }
    s.orientation = orientation;
    s.stretched_child = None;
    s.group.largest_child = None;
    s.group.tallest_child = None;
    node.content_size = Size::zero();
    for c in group::children(core, id) {
        if let Some(n) = core.nodes.get_mut(c) {
            n.slot = Rect::from_parts(n.slot.position(), Size::zero());
            n.last_slots = n.slot;
        }
        register_for_layouting(core, c, LayoutingType::SIZING);
    }
    register_for_layouting(
        core,
        id,
        LayoutingType::SIZING | LayoutingType::ARRANGE_CHILDREN,
    );
}

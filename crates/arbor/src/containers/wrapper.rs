//! Wrappers flow their children into lines and start a new line when the
//! next child would overflow the client rectangle.
//!
//! A horizontal wrapper fills columns top to bottom and adds columns to the
//! right; a vertical wrapper fills rows left to right and adds rows below.
//! The flow axis must be bounded, so a wrapper never fits its content along
//! it: a Fit request on that axis is turned into Stretched. Relative children
//! along the line axis are turned into Fit.

use crate::{
    Core, NodeId,
    containers::{group, stack},
    geom::{Measure, Orientation},
    layout::{self, client_rectangle, measure_of, raise_layout_changed, register_for_layouting},
    layouting::LayoutingType,
    paint,
};

/// Place visible children line by line.
pub(crate) fn compute_children_positions(core: &mut Core, id: NodeId) {
    let Some((orientation, spacing, _)) = stack::state(core, id) else {
        return;
    };
    let flow = orientation.cross();
    let limit = client_rectangle(core, id).len_along(flow);
    let mut f = 0;
    let mut l = 0;
    let mut thickest = 0;
    for c in group::children(core, id) {
        let Some(node) = core.nodes.get_mut(c) else {
            continue;
        };
        if !node.props.visible {
            continue;
        }
        let cf = node.slot.len_along(flow);
        let cl = node.slot.len_along(orientation);
        if f + cf > limit {
            f = 0;
            l += thickest + spacing;
            thickest = cl;
        } else if thickest < cl {
            thickest = cl;
        }
        *node.slot.pos_along_mut(flow) = f;
        *node.slot.pos_along_mut(orientation) = l;
        f += cf + spacing;
    }
    if let Some(node) = core.nodes.get_mut(id) {
        node.dirty = true;
    }
}

/// Fit measurement along the line axis: the sum of line thicknesses.
pub(crate) fn measure_raw_size(core: &mut Core, id: NodeId, axis: Orientation) -> i32 {
    let Some((orientation, spacing, _)) = stack::state(core, id) else {
        return -1;
    };
    if axis != orientation {
        layout::set_size_measure(core, id, axis, Measure::Stretched);
        return -1;
    }
    let flow = orientation.cross();
    let flow_flag = LayoutingType::size(flow);
    if layout::registered(core, id).contains(flow_flag) {
        return -1;
    }
    let limit = client_rectangle(core, id).len_along(flow);
    let mut d = 0;
    let mut total = 0;
    let mut thickest = 0;
    for c in group::children(core, id) {
        if !layout::is_visible(core, c) {
            continue;
        }
        if measure_of(core, c, flow).is_relative_to_parent()
            && layout::registered(core, c).contains(flow_flag)
        {
            return -1;
        }
        let s = layout::slot(core, c);
        if d + s.len_along(flow) > limit {
            d = 0;
            total += thickest + spacing;
            thickest = s.len_along(axis);
        } else if thickest < s.len_along(axis) {
            thickest = s.len_along(axis);
        }
        d += s.len_along(flow) + spacing;
    }
    if d == 0 {
        total -= spacing;
    }
    let margin = core.nodes.get(id).map_or(0, |n| n.props.margin);
    total + thickest + 2 * margin
}

/// Arrangement waits for the wrapper's own size.
pub(crate) fn update_layout(core: &mut Core, id: NodeId, lt: LayoutingType) -> bool {
    if lt != LayoutingType::ARRANGE_CHILDREN {
        return layout::base_update_layout(core, id, lt);
    }
    let Some(node) = core.nodes.get_mut(id) else {
        return false;
    };
    node.registered.remove(lt);
    if node.registered.intersects(LayoutingType::SIZING) {
        return false;
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

/// A size change re-sizes relative children, re-measures a Fit line axis and
/// re-flows the children.
pub(crate) fn on_layout_changes(
    core: &mut Core,
    id: NodeId,
    lt: LayoutingType,
    notify_parent: bool,
) {
    let Some(axis) = lt.size_axis() else {
        return;
    };
    for c in group::children(core, id) {
        if measure_of(core, c, axis).is_relative_to_parent() {
            register_for_layouting(core, c, LayoutingType::size(axis));
        }
    }
    if measure_of(core, id, axis.cross()).is_fit() {
        register_for_layouting(core, id, LayoutingType::size(axis.cross()));
    }
    register_for_layouting(core, id, LayoutingType::position(axis));
    register_for_layouting(core, id, LayoutingType::ARRANGE_CHILDREN);
    if notify_parent {
        raise_layout_changed(core, id, lt);
    }
}

/// Any child size change re-flows the children.
pub(crate) fn on_child_layout_changes(
    core: &mut Core,
    id: NodeId,
    child: NodeId,
    lt: LayoutingType,
) {
    let Some(axis) = lt.size_axis() else {
        return;
    };
    let Some((orientation, _, _)) = stack::state(core, id) else {
        return;
    };
    if axis == orientation && measure_of(core, child, axis).is_relative_to_parent() {
        layout::set_size_measure(core, child, axis, Measure::Fit);
        return;
    }
    register_for_layouting(core, id, LayoutingType::size(axis));
    register_for_layouting(core, id, LayoutingType::ARRANGE_CHILDREN);
}

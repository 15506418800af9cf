use std::mem;

use crate::{
    Core, NodeId,
    containers::scroller,
    geom::{Orientation, Overlap, Region, Size},
    layout::{self, client_rectangle, measure_of, register_for_layouting},
    layouting::LayoutingType,
    paint::{self, DrawContext, with_saved},
};

/// Children of a group-like node. Empty for anything else.
pub(crate) fn children(core: &Core, id: NodeId) -> Vec<NodeId> {
    core.nodes
        .get(id)
        .map(|n| n.kind.children().to_vec())
        .unwrap_or_default()
}

/// Attach `child` at `index` in the child list and queue its layout.
pub(crate) fn insert_child(core: &mut Core, id: NodeId, index: usize, child: NodeId) {
    let Some(g) = core.nodes.get_mut(id).and_then(|n| n.kind.group_mut()) else {
        return;
    };
    g.children.insert(index, child);
    if let Some(c) = core.nodes.get_mut(child) {
        c.parent = Some(id);
        c.registered = LayoutingType::empty();
    }
    register_for_layouting(
        core,
        child,
        LayoutingType::SIZING | LayoutingType::ARRANGE_CHILDREN,
    );
}

/// Attach `child` at the end of the child list.
pub(crate) fn add_child(core: &mut Core, id: NodeId, child: NodeId) {
    let len = core
        .nodes
        .get(id)
        .map_or(0, |n| n.kind.children().len());
    insert_child(core, id, len, child);
}

/// Detach `child`, keeping the tracked maxima coherent.
pub(crate) fn remove_child(core: &mut Core, id: NodeId, child: NodeId) {
    if core.hover.is_some_and(|h| core.contains(id, h)) {
        core.hover = None;
    }
    let Some(g) = core.nodes.get_mut(id).and_then(|n| n.kind.group_mut()) else {
        return;
    };
    g.children.retain(|c| *c != child);
    let mut rescan = Vec::new();
    for axis in [Orientation::Horizontal, Orientation::Vertical] {
        if g.max_child(axis) == Some(child) {
            *g.max_child_mut(axis) = None;
            rescan.push(axis);
        }
    }
    if let Some(c) = core.nodes.get_mut(child) {
        c.parent = None;
        c.logical_parent = None;
    }
    for axis in rescan {
        if measure_of(core, id, axis).is_fit() {
            search_largest_child(core, id, axis, false);
        }
    }
    register_for_layouting(
        core,
        id,
        LayoutingType::SIZING | LayoutingType::ARRANGE_CHILDREN,
    );
}

/// Dispose every child, last first, and reset the tracked maxima.
pub(crate) fn clear_children(core: &mut Core, id: NodeId) {
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    node.content_size = Size::zero();
    let children = match node.kind.group_mut() {
        Some(g) => {
            g.largest_child = None;
            g.tallest_child = None;
            mem::take(&mut g.children)
        }
        None => return,
    };
    if let Some(s) = node.kind.stack_mut() {
        s.stretched_child = None;
    }
    for c in children.into_iter().rev() {
        core.dispose(c);
    }
    register_for_layouting(core, id, LayoutingType::SIZING);

    if let Some(parent) = core.nodes.get(id).and_then(|n| n.parent)
        && core
            .nodes
            .get(parent)
            .and_then(|p| p.kind.scroller())
            .is_some_and(|s| s.single.child == Some(id))
    {
        scroller::reset_scroll(core, parent);
    }
}

/// Move a child to the end of the list so it paints over its siblings.
pub(crate) fn put_on_top(core: &mut Core, id: NodeId, child: NodeId) {
    reorder(core, id, child, true);
}

/// Move a child to the start of the list so it paints under its siblings.
pub(crate) fn put_on_bottom(core: &mut Core, id: NodeId, child: NodeId) {
    reorder(core, id, child, false);
}

/// Shared body of the reordering operations.
fn reorder(core: &mut Core, id: NodeId, child: NodeId, top: bool) {
    let Some(g) = core.nodes.get_mut(id).and_then(|n| n.kind.group_mut()) else {
        return;
    };
    if !g.children.contains(&child) {
        return;
    }
    g.children.retain(|c| *c != child);
    if top {
        g.children.push(child);
    } else {
        g.children.insert(0, child);
    }
    paint::register_for_redraw(core, id);
}

/// Fit measurement: the largest child plus the margin.
pub(crate) fn measure_raw_size(core: &mut Core, id: NodeId, axis: Orientation) -> i32 {
    let tracked = core
        .nodes
        .get(id)
        .and_then(|n| n.kind.group())
        .map(|g| (g.children.is_empty(), g.max_child(axis)));
    if let Some((false, None)) = tracked {
        search_largest_child(core, id, axis, false);
        let found = core
            .nodes
            .get(id)
            .and_then(|n| n.kind.group())
            .and_then(|g| g.max_child(axis));
        if found.is_none() {
            search_largest_child(core, id, axis, true);
        }
    }
    layout::base_measure_raw_size(core, id, axis)
}

/// Find the largest visible child along an axis and adopt its size as the
/// content size.
///
/// Without `force`, children whose size on that axis is still pending are
/// skipped and their current slot is used for the rest. With `force`, every
/// visible child is measured.
pub(crate) fn search_largest_child(core: &mut Core, id: NodeId, axis: Orientation, force: bool) {
    let size_flag = LayoutingType::size(axis);
    let mut best = None;
    let mut size = 0;
    for c in children(core, id) {
        if !layout::is_visible(core, c) {
            continue;
        }
        let cs = if force {
            layout::measure_raw_size(core, c, axis)
        } else if layout::registered(core, c).contains(size_flag) {
            continue;
        } else {
            layout::slot(core, c).len_along(axis)
        };
        if cs > size {
            size = cs;
            best = Some(c);
        }
    }
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    *node.content_size.along_mut(axis) = size;
    if let Some(g) = node.kind.group_mut() {
        *g.max_child_mut(axis) = best;
    }
}

/// A resolved size change re-queues the children that depend on it:
/// relative children re-size and the others re-align.
pub(crate) fn on_layout_changes(core: &mut Core, id: NodeId, lt: LayoutingType) {
    let Some(axis) = lt.size_axis() else {
        return;
    };
    for c in children(core, id) {
        if measure_of(core, c, axis).is_relative_to_parent() {
            register_for_layouting(core, c, LayoutingType::size(axis));
        } else {
            register_for_layouting(core, c, LayoutingType::position(axis));
        }
    }
}

/// Track the largest child while the group is Fit on that axis.
pub(crate) fn on_child_layout_changes(
    core: &mut Core,
    id: NodeId,
    child: NodeId,
    lt: LayoutingType,
) {
    let Some(axis) = lt.size_axis() else {
        return;
    };
    if !measure_of(core, id, axis).is_fit() {
        return;
    }
    let cs = layout::slot(core, child).len_along(axis);
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    let is_max = node.kind.group().and_then(|g| g.max_child(axis)) == Some(child);
    if cs > node.content_size.along(axis) {
        *node.content_size.along_mut(axis) = cs;
        if let Some(g) = node.kind.group_mut() {
            *g.max_child_mut(axis) = Some(child);
        }
    } else if is_max {
        search_largest_child(core, id, axis, false);
    }
    register_for_layouting(core, id, LayoutingType::size(axis));
}

/// Draw the widget payload, then every visible child in order.
pub(crate) fn on_draw(core: &mut Core, id: NodeId, ctx: &mut dyn DrawContext) {
    paint::draw_self(core, id, ctx);
    let clip = core
        .nodes
        .get(id)
        .is_some_and(|n| n.props.clip_to_client_rect);
    let client = client_rectangle(core, id);
    with_saved(ctx, |ctx| {
        if clip {
            ctx.clip_rect(client);
        }
        for c in children(core, id) {
            if layout::is_visible(core, c) {
                paint::paint(core, c, ctx);
            }
        }
    });
}

/// Redraw the parts of a cached group covered by its clip region.
///
/// `ctx` is already clipped to the region. Children entirely outside it keep
/// their cached pixels.
pub(crate) fn redraw_clipped(
    core: &mut Core,
    id: NodeId,
    ctx: &mut dyn DrawContext,
    clipping: &Region,
) {
    paint::draw_self(core, id, ctx);
    let clip = core
        .nodes
        .get(id)
        .is_some_and(|n| n.props.clip_to_client_rect);
    let client = client_rectangle(core, id);
    if clip {
        ctx.clip_rect(client);
    }
    for c in children(core, id) {
        if !layout::is_visible(core, c) {
            continue;
        }
        if clipping.contains(layout::slot(core, c) + client.position()) == Overlap::Out {
            continue;
        }
        paint::paint(core, c, ctx);
    }
}


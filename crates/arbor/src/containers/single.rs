use crate::{
    Core, NodeId,
    geom::{Orientation, Size},
    layout::{self, client_rectangle, measure_of, register_for_layouting},
    layouting::LayoutingType,
    paint::{self, DrawContext, with_saved},
};

/// The hosted child of a single-child container.
pub(crate) fn child(core: &Core, id: NodeId) -> Option<NodeId> {
    core.nodes
        .get(id)
        .and_then(|n| n.kind.single())
        .and_then(|s| s.child)
}

/// Replace the hosted child. The previous child is disposed.
pub(crate) fn set_child(core: &mut Core, id: NodeId, new: Option<NodeId>) {
    if let Some(old) = child(core, id) {
        if core.hover.is_some_and(|h| core.contains(id, h)) {
            core.hover = None;
        }
        core.dispose(old);
    }
    let Some(c) = new else {
        return;
    };
    let size = layout::slot(core, c).size();
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    node.content_size = size;
    if let Some(s) = node.kind.single_mut() {
        s.child = Some(c);
    }
    if let Some(n) = core.nodes.get_mut(c) {
        n.parent = Some(id);
        n.registered = LayoutingType::empty();
    }
    register_for_layouting(core, c, LayoutingType::SIZING);
}

/// Unlink the hosted child without disposing it. Disposal of the child
/// detaches it through here.
pub(crate) fn detach_child(core: &mut Core, id: NodeId) {
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    let Some(old) = node.kind.single_mut().and_then(|s| s.child.take()) else {
        return;
    };
    node.content_size = Size::zero();
    if let Some(n) = core.nodes.get_mut(old) {
        n.parent = None;
        n.logical_parent = None;
    }
    paint::register_for_graphic_update(core, id);
}

/// Relative children are measured through their own raw size.
pub(crate) fn measure_raw_size(core: &mut Core, id: NodeId, axis: Orientation) -> i32 {
    if let Some(c) = child(core, id)
        && measure_of(core, c, axis).is_relative_to_parent()
    {
        let size = layout::measure_raw_size(core, c, axis);
        if let Some(n) = core.nodes.get_mut(id) {
            *n.content_size.along_mut(axis) = size;
        }
    }
    layout::base_measure_raw_size(core, id, axis)
}

/// A Fit container re-measures a relative child before its own size
/// resolves.
pub(crate) fn update_layout(core: &mut Core, id: NodeId, lt: LayoutingType) -> bool {
    if let Some(axis) = lt.size_axis()
        && let Some(c) = child(core, id)
        && measure_of(core, id, axis).is_fit()
        && measure_of(core, c, axis).is_relative_to_parent()
    {
        let size = layout::measure_raw_size(core, c, axis);
        if let Some(n) = core.nodes.get_mut(id) {
            *n.content_size.along_mut(axis) = size;
        }
    }
    layout::base_update_layout(core, id, lt)
}

/// Propagate a size change to the child: a relative child re-sizes, and a
/// child without an explicit offset re-aligns unless it fills the container.
pub(crate) fn on_layout_changes(core: &mut Core, id: NodeId, lt: LayoutingType) {
    let Some(axis) = lt.size_axis() else {
        return;
    };
    let Some(c) = child(core, id) else {
        return;
    };
    let m = measure_of(core, c, axis);
    let offset = core.nodes.get(c).map_or(0, |n| n.props.offset(axis));
    let mut flags = LayoutingType::empty();
    if m.is_relative_to_parent() {
        flags |= LayoutingType::size(axis);
        if m.percentage().is_some_and(|p| p < 100) && offset == 0 {
            flags |= LayoutingType::position(axis);
        }
    } else if offset == 0 {
        flags |= LayoutingType::position(axis);
    }
    if !flags.is_empty() {
        register_for_layouting(core, c, flags);
    }
}

/// The content size follows the child's slot.
pub(crate) fn on_child_layout_changes(
    core: &mut Core,
    id: NodeId,
    child: NodeId,
    lt: LayoutingType,
) {
    let Some(axis) = lt.size_axis() else {
        return;
    };
    let size = layout::slot(core, child).len_along(axis);
    if let Some(n) = core.nodes.get_mut(id) {
        *n.content_size.along_mut(axis) = size;
    }
    if measure_of(core, id, axis).is_fit() {
        register_for_layouting(core, id, LayoutingType::size(axis));
    }
}

/// Draw the widget payload, then the child when visible.
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
        if let Some(c) = child(core, id)
            && layout::is_visible(core, c)
        {
            paint::paint(core, c, ctx);
        }
    });
}

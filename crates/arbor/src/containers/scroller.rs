//! Scrollers are single-child containers showing a window onto a child that
//! may be larger than their client rectangle.
//!
//! The scroll offset is clamped to `[0, max_scroll]`, where the maximum is
//! the child's size minus the client size on each axis. Clips and hit tests
//! cross the scroller shifted by the offset.

use crate::{
    Core, NodeId,
    containers::single,
    event::KeyCode,
    geom::{Orientation, Point},
    layout::{self, client_rectangle},
    layouting::LayoutingType,
    paint::{self, DrawContext, with_saved},
};

/// Current scroll offset.
pub(crate) fn scroll(core: &Core, id: NodeId) -> Point {
    core.nodes
        .get(id)
        .and_then(|n| n.kind.scroller())
        .map(|s| s.scroll)
        .unwrap_or_default()
}

/// Current maximum scroll offset.
pub(crate) fn max_scroll(core: &Core, id: NodeId) -> Point {
    core.nodes
        .get(id)
        .and_then(|n| n.kind.scroller())
        .map(|s| s.max_scroll)
        .unwrap_or_default()
}

/// Coordinate of a point along an axis.
fn along(p: Point, axis: Orientation) -> i32 {
    match axis {
        Orientation::Horizontal => p.x,
        Orientation::Vertical => p.y,
    }
}

/// Mutable coordinate of a point along an axis.
fn along_mut(p: &mut Point, axis: Orientation) -> &mut i32 {
    match axis {
        Orientation::Horizontal => &mut p.x,
        Orientation::Vertical => &mut p.y,
    }
}

/// Set the scroll offset along an axis, clamped to `[0, max]`.
pub(crate) fn set_scroll(core: &mut Core, id: NodeId, axis: Orientation, value: i32) {
    let Some(s) = core.nodes.get_mut(id).and_then(|n| n.kind.scroller_mut()) else {
        return;
    };
    let v = value.clamp(0, along(s.max_scroll, axis).max(0));
    if along(s.scroll, axis) == v {
        return;
    }
    *along_mut(&mut s.scroll, axis) = v;
    paint::register_for_graphic_update(core, id);
}

/// Set the maximum scroll offset along an axis, never below zero.
pub(crate) fn set_max_scroll(core: &mut Core, id: NodeId, axis: Orientation, value: i32) {
    let Some(s) = core.nodes.get_mut(id).and_then(|n| n.kind.scroller_mut()) else {
        return;
    };
    let max = value.max(0);
    if along(s.max_scroll, axis) == max {
        return;
    }
    *along_mut(&mut s.max_scroll, axis) = max;
    if along(s.scroll, axis) > max {
        set_scroll(core, id, axis, max);
    }
    paint::register_for_graphic_update(core, id);
}

/// Scroll back to the origin.
pub(crate) fn reset_scroll(core: &mut Core, id: NodeId) {
    set_scroll(core, id, Orientation::Horizontal, 0);
    set_scroll(core, id, Orientation::Vertical, 0);
}

/// Recompute the maximum scroll offset after a size change.
pub(crate) fn update_max_scroll(core: &mut Core, id: NodeId, lt: LayoutingType) {
    let Some(c) = single::child(core, id) else {
        set_max_scroll(core, id, Orientation::Horizontal, 0);
        set_max_scroll(core, id, Orientation::Vertical, 0);
        return;
    };
    let Some(axis) = lt.size_axis() else {
        return;
    };
    let max = layout::slot(core, c).len_along(axis) - client_rectangle(core, id).len_along(axis);
    set_max_scroll(core, id, axis, max);
}

/// Wheel scrolling: vertical, or horizontal with Shift held.
pub(crate) fn on_mouse_wheel(core: &mut Core, id: NodeId, delta: i32) {
    let speed = core
        .nodes
        .get(id)
        .and_then(|n| n.kind.scroller())
        .map_or(0, |s| s.scroll_speed);
    let s = scroll(core, id);
    let step = delta.saturating_mul(speed);
    if core.modifiers.shift {
        set_scroll(core, id, Orientation::Horizontal, s.x.saturating_add(step));
    } else {
        set_scroll(core, id, Orientation::Vertical, s.y.saturating_sub(step));
    }
}

/// Keyboard scrolling.
pub(crate) fn on_key_down(core: &mut Core, id: NodeId, key: KeyCode) {
    let s = scroll(core, id);
    match key {
        KeyCode::Up => set_scroll(core, id, Orientation::Vertical, s.y - 1),
        KeyCode::Down => set_scroll(core, id, Orientation::Vertical, s.y + 1),
        KeyCode::Left => set_scroll(core, id, Orientation::Horizontal, s.x - 1),
        KeyCode::Right => set_scroll(core, id, Orientation::Horizontal, s.x + 1),
        KeyCode::Home => reset_scroll(core, id),
        KeyCode::End => {
            let max = max_scroll(core, id);
            set_scroll(core, id, Orientation::Horizontal, max.x);
            set_scroll(core, id, Orientation::Vertical, max.y);
        }
        _ => {}
    }
}

/// Draw the background, then the child shifted by the scroll offset.
pub(crate) fn on_draw(core: &mut Core, id: NodeId, ctx: &mut dyn DrawContext) {
    paint::draw_self(core, id, ctx);
    let clip = core
        .nodes
        .get(id)
        .is_some_and(|n| n.props.clip_to_client_rect);
    let client = client_rectangle(core, id);
    let offset = scroll(core, id);
    with_saved(ctx, |ctx| {
        if clip {
            ctx.clip_rect(client);
        }
        ctx.translate(-offset);
        if let Some(c) = single::child(core, id) {
            paint::paint(core, c, ctx);
        }
    });
}

/// Change the distance scrolled per wheel notch.
pub(crate) fn set_scroll_speed(core: &mut Core, id: NodeId, speed: i32) {
    if let Some(s) = core.nodes.get_mut(id).and_then(|n| n.kind.scroller_mut()) {
        s.scroll_speed = speed;
    }
}

//! Clipping, caching and painting.
//!
//! A frame repaints only what changed. Nodes whose geometry or content
//! changed are queued for clipping; the clipping pass registers their old and
//! new rectangles with every cached ancestor up to the root, and the drawing
//! pass repaints the root's accumulated region. Cached nodes keep an
//! offscreen [`Surface`] and only redraw the parts of it covered by their own
//! clip region.

use scopeguard::guard;
use tracing::{debug, trace};

use crate::{
    Core, NodeId,
    containers::{Container, ContainerKind, group, scroller, single},
    geom::{Orientation, Overlap, Point, Rect, Region, Size},
    layout::{self, client_rectangle},
    layouting::LayoutingType,
};

/// An offscreen bitmap.
pub trait Surface: Send + Sync {
    /// Size in pixels.
    fn size(&self) -> Size;

    /// A drawing context targeting this surface.
    fn context(&mut self) -> Box<dyn DrawContext + '_>;
}

/// The drawing operations the paint pipeline needs from a backend.
///
/// Transforms and clips stack: `save` pushes the current state and `restore`
/// pops it.
pub trait DrawContext {
    /// Push the current transform and clip.
    fn save(&mut self);
    /// Pop the transform and clip pushed by the matching `save`.
    fn restore(&mut self);
    /// Move the origin.
    fn translate(&mut self, offset: Point);
    /// Intersect the clip with a rectangle.
    fn clip_rect(&mut self, r: Rect);
    /// Intersect the clip with a region.
    fn clip_region(&mut self, region: &Region);
    /// Clear everything inside the clip to transparent.
    fn clear(&mut self);
    /// Fill a rectangle with the current source.
    fn fill_rect(&mut self, r: Rect);
    /// Dim a rectangle to show a disabled widget.
    fn shade(&mut self, r: Rect) {
        self.fill_rect(r);
    }
    /// Create an offscreen surface compatible with this context.
    fn create_surface(&mut self, size: Size) -> Box<dyn Surface>;
    /// Draw a surface with its origin at `at`.
    fn blit(&mut self, surface: &dyn Surface, at: Point);
}

/// Run `f` between a `save` and its matching `restore`.
pub(crate) fn with_saved<R>(
    ctx: &mut dyn DrawContext,
    f: impl FnOnce(&mut dyn DrawContext) -> R,
) -> R {
    let mut ctx = guard(ctx, |c| c.restore());
    ctx.save();
    f(&mut **ctx)
}

/// Queue a node for the clipping pass, once.
pub(crate) fn enqueue_for_repaint(core: &mut Core, id: NodeId) {
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    if node.queued_for_clipping {
        return;
    }
    node.queued_for_clipping = true;
    core.clipping_queue.push_back(id);
}

/// Request a repaint after a content change.
///
/// A node that is Fit on either axis may change size, so it is re-measured
/// instead.
pub(crate) fn register_for_graphic_update(core: &mut Core, id: NodeId) {
    let Some(node) = core.nodes.get_mut(id) else {
        debug!("graphic update for disposed node {id:?}");
        return;
    };
    node.dirty = true;
    let pending = !node.registered.is_empty();
    if layout::measure_of(core, id, Orientation::Horizontal).is_fit()
        || layout::measure_of(core, id, Orientation::Vertical).is_fit()
    {
        layout::register_for_layouting(core, id, LayoutingType::SIZING);
    } else if !pending {
        enqueue_for_repaint(core, id);
    }
}

/// Request a repaint without re-measuring.
pub(crate) fn register_for_redraw(core: &mut Core, id: NodeId) {
    let Some(node) = core.nodes.get_mut(id) else {
        debug!("redraw for disposed node {id:?}");
        return;
    };
    node.dirty = true;
    if node.registered.is_empty() {
        enqueue_for_repaint(core, id);
    }
}

/// Drain the clipping queue, registering each node's previous and current
/// rectangles with its parent.
pub(crate) fn clipping_registration(core: &mut Core) {
    while let Some(id) = core.clipping_queue.pop_front() {
        let Some(node) = core.nodes.get_mut(id) else {
            continue;
        };
        node.queued_for_clipping = false;
        let (parent, last, current) = (node.parent, node.last_painted_slot, node.slot);
        if let Some(parent) = parent {
            register_clip(core, parent, last);
            register_clip(core, parent, current);
        }
    }
}

/// Record a rectangle, in this node's client coordinates, as needing a
/// redraw, and forward it up the tree.
pub(crate) fn register_clip(core: &mut Core, id: NodeId, clip: Rect) {
    let Some(node) = core.nodes.get_mut(id) else {
        debug!("clip registered on disposed node {id:?}");
        return;
    };
    let clip = match &node.kind {
        Container::Root(_) => {
            node.clipping.union_rect(clip);
            return;
        }
        Container::Scroller(s) => clip - s.scroll,
        _ => clip,
    };
    if node.dirty && node.props.cache_enabled {
        return;
    }
    let r = clip + node.client_rectangle().position();
    if r.w < 0 || r.h < 0 {
        return;
    }
    if node.props.cache_enabled {
        node.clipping.union_rect(r);
    }
    let Some(parent) = node.parent else {
        return;
    };
    let up = r + node.slot.position();
    register_clip(core, parent, up);
}

/// Paint a node onto its parent's context.
pub(crate) fn paint(core: &mut Core, id: NodeId, ctx: &mut dyn DrawContext) {
    let Some(node) = core.nodes.get(id) else {
        debug!("paint of disposed node {id:?}");
        return;
    };
    let Some(parent) = node.parent else {
        debug!("paint of detached node {id:?}");
        return;
    };
    if node.slot.is_negative() {
        debug!("paint skipped, unresolved slot {} on {id:?}", node.slot);
        return;
    }
    let origin = client_rectangle(core, parent).position();
    let max = core.config.max_cache_size;

    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    if node.props.cache_enabled && (node.slot.w > max || node.slot.h > max) {
        debug!("slot {} exceeds cache limit, disabling cache on {id:?}", node.slot);
        node.props.cache_enabled = false;
        node.cache = None;
    }
    let rb = node.slot + origin;
    let enabled = node.props.enabled;

    if node.props.cache_enabled {
        if node.dirty {
            recreate_cache(core, id, ctx);
            paint_cache(core, id, ctx, rb);
        } else {
            update_cache(core, id, ctx, rb);
        }
    } else {
        with_saved(ctx, |ctx| {
            ctx.translate(rb.position());
            on_draw(core, id, ctx);
        });
    }
    if !enabled {
        ctx.shade(rb);
    }

    if let Some(node) = core.nodes.get_mut(id) {
        node.last_painted_slot = node.slot;
    }
}

/// Redraw the whole node into a fresh offscreen surface.
fn recreate_cache(core: &mut Core, id: NodeId, ctx: &mut dyn DrawContext) {
    trace!("recreate cache of {id:?}");
    let size = layout::slot(core, id).size();
    let mut surface = ctx.create_surface(size);
    {
        let mut sctx = surface.context();
        on_draw(core, id, &mut *sctx);
    }
    if let Some(node) = core.nodes.get_mut(id) {
        node.cache = Some(surface);
        node.dirty = false;
        node.clipping.reset();
    }
}

/// Blit the cached surface at `rb`.
fn paint_cache(core: &Core, id: NodeId, ctx: &mut dyn DrawContext, rb: Rect) {
    if let Some(surface) = core.nodes.get(id).and_then(|n| n.cache.as_deref()) {
        ctx.blit(surface, rb.position());
    }
}

/// Redraw the clipped parts of the cache, then blit it.
fn update_cache(core: &mut Core, id: NodeId, ctx: &mut dyn DrawContext, rb: Rect) {
    let Some(node) = core.nodes.get_mut(id) else {
        return;
    };
    let kind = node.kind.kind();
    let clipping = node.clipping.clone();
    if kind != ContainerKind::Leaf
        && !clipping.is_empty()
        && let Some(mut surface) = node.cache.take()
    {
        {
            let mut sctx = surface.context();
            sctx.clip_region(&clipping);
            sctx.clear();
            match kind {
                ContainerKind::Group | ContainerKind::Stack | ContainerKind::Wrapper => {
                    group::redraw_clipped(core, id, &mut *sctx, &clipping);
                }
                _ => on_draw(core, id, &mut *sctx),
            }
        }
        if let Some(node) = core.nodes.get_mut(id) {
            node.cache = Some(surface);
        }
    }
    paint_cache(core, id, ctx, rb);
    if let Some(node) = core.nodes.get_mut(id) {
        node.clipping.reset();
    }
}

/// Draw the widget payload of a node.
pub(crate) fn draw_self(core: &Core, id: NodeId, ctx: &mut dyn DrawContext) {
    let Some(node) = core.nodes.get(id) else {
        return;
    };
    if let Some(w) = node.widget.as_deref() {
        w.draw(ctx, node.slot.size().rect());
    }
}

/// Draw a node and its children in the node's own coordinates.
pub(crate) fn on_draw(core: &mut Core, id: NodeId, ctx: &mut dyn DrawContext) {
    let Some(kind) = core.nodes.get(id).map(|n| n.kind.kind()) else {
        return;
    };
    match kind {
        ContainerKind::Group | ContainerKind::Stack | ContainerKind::Wrapper => {
            group::on_draw(core, id, ctx);
        }
        ContainerKind::Single => single::on_draw(core, id, ctx),
        ContainerKind::Scroller => scroller::on_draw(core, id, ctx),
        ContainerKind::Leaf | ContainerKind::Root => draw_self(core, id, ctx),
    }
}

/// Repaint the root's accumulated clip region. Returns whether anything was
/// drawn.
pub(crate) fn process_drawing(core: &mut Core, ctx: &mut dyn DrawContext) -> bool {
    let root = core.root;
    let Some(node) = core.nodes.get(root) else {
        return false;
    };
    if node.clipping.is_empty() {
        return false;
    }
    let region = node.clipping.clone();
    let children = node.children().to_vec();

    ctx.save();
    ctx.clip_region(&region);
    ctx.clear();
    for c in children.into_iter().rev() {
        if !layout::is_visible(core, c) || region.contains(layout::slot(core, c)) == Overlap::Out {
            continue;
        }
        with_saved(ctx, |ctx| paint(core, c, ctx));
    }
    ctx.restore();

    if let Some(node) = core.nodes.get_mut(root) {
        node.clipping.reset();
    }
    true
}

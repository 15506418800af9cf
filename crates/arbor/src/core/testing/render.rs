use std::{mem, sync::Arc};

use parking_lot::Mutex;

use crate::{
    geom::{Point, Rect, Region, Size},
    paint::{DrawContext, Surface},
};

/// A recorded drawing operation. Rectangles and points are in the
/// coordinates of the context's target, with translations applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    /// State pushed.
    Save,
    /// State popped.
    Restore,
    /// Clip to a rectangle.
    ClipRect(Rect),
    /// Clip to the rectangles of a region.
    ClipRegion(Vec<Rect>),
    /// Clear the clip area.
    Clear,
    /// Fill a rectangle.
    Fill(Rect),
    /// Shade a disabled node.
    Shade(Rect),
    /// Offscreen surface created.
    CreateSurface(Size),
    /// Surface copied onto the target.
    Blit {
        /// Size of the surface.
        size: Size,
        /// Top-left corner on the target.
        at: Point,
    },
}

/// A [`DrawContext`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingContext {
    /// Shared operation log.
    log: Arc<Mutex<Vec<DrawOp>>>,
    /// Current translation.
    offset: Point,
    /// Translations saved by `save`.
    saved: Vec<Point>,
}

impl RecordingContext {
    /// A context with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context appending to an existing log.
    fn with_log(log: Arc<Mutex<Vec<DrawOp>>>) -> Self {
        Self {
            log,
            offset: Point::zero(),
            saved: Vec::new(),
        }
    }

    /// A copy of the log.
    pub fn ops(&self) -> Vec<DrawOp> {
        self.log.lock().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<DrawOp> {
        mem::take(&mut *self.log.lock())
    }

    /// Filled rectangles, in order.
    pub fn fills(&self) -> Vec<Rect> {
        self.log
            .lock()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Number of surface blits.
    pub fn blits(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|op| matches!(op, DrawOp::Blit { .. }))
            .count()
    }

    /// Record an operation.
    fn push(&self, op: DrawOp) {
        self.log.lock().push(op);
    }
}

impl DrawContext for RecordingContext {
    fn save(&mut self) {
        self.saved.push(self.offset);
        self.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if let Some(o) = self.saved.pop() {
            self.offset = o;
        }
        self.push(DrawOp::Restore);
    }

    fn translate(&mut self, offset: Point) {
        self.offset += offset;
    }

    fn clip_rect(&mut self, r: Rect) {
        self.push(DrawOp::ClipRect(r + self.offset));
    }

    fn clip_region(&mut self, region: &Region) {
        let rects = region.rects().iter().map(|r| *r + self.offset).collect();
        self.push(DrawOp::ClipRegion(rects));
    }

    fn clear(&mut self) {
        self.push(DrawOp::Clear);
    }

    fn fill_rect(&mut self, r: Rect) {
        self.push(DrawOp::Fill(r + self.offset));
    }

    fn shade(&mut self, r: Rect) {
        self.push(DrawOp::Shade(r + self.offset));
    }

    fn create_surface(&mut self, size: Size) -> Box<dyn Surface> {
        self.push(DrawOp::CreateSurface(size));
        Box::new(RecordingSurface::new(size))
    }

    fn blit(&mut self, surface: &dyn Surface, at: Point) {
        self.push(DrawOp::Blit {
            size: surface.size(),
            at: at + self.offset,
        });
    }
}

/// An offscreen surface keeping its own operation log.
#[derive(Debug)]
pub struct RecordingSurface {
    /// Surface size.
    size: Size,
    /// Operations drawn onto this surface.
    log: Arc<Mutex<Vec<DrawOp>>>,
}

impl RecordingSurface {
    /// An empty surface.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            log: Arc::default(),
        }
    }

    /// A copy of the operations drawn onto this surface.
    pub fn ops(&self) -> Vec<DrawOp> {
        self.log.lock().clone()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn context(&mut self) -> Box<dyn DrawContext + '_> {
        Box::new(RecordingContext::with_log(Arc::clone(&self.log)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_follows_save_restore() {
        let mut ctx = RecordingContext::new();
        ctx.save();
        ctx.translate(Point::new(10, 5));
        ctx.fill_rect(Rect::new(0, 0, 2, 2));
        ctx.restore();
        ctx.fill_rect(Rect::new(0, 0, 2, 2));
        assert_eq!(
            ctx.fills(),
            vec![Rect::new(10, 5, 2, 2), Rect::new(0, 0, 2, 2)]
        );
    }

    #[test]
    fn surfaces_record_separately() {
        let mut ctx = RecordingContext::new();
        let mut s = ctx.create_surface(Size::new(4, 4));
        s.context().fill_rect(Rect::new(1, 1, 1, 1));
        ctx.blit(&*s, Point::new(3, 3));
        assert!(ctx.fills().is_empty());
        assert_eq!(ctx.blits(), 1);
        assert_eq!(
            ctx.ops(),
            vec![
                DrawOp::CreateSurface(Size::new(4, 4)),
                DrawOp::Blit {
                    size: Size::new(4, 4),
                    at: Point::new(3, 3)
                }
            ]
        );
    }
}

use super::render::RecordingContext;
use crate::{Config, Core, geom::Size};

/// A [`Core`] paired with a recording draw context. Tests build a tree on
/// `core` and drive it with [`Harness::frame`].
pub struct Harness {
    /// The core under test.
    pub core: Core,
    /// Receives the drawing of every frame.
    pub ctx: RecordingContext,
}

impl Harness {
    /// A harness with the default configuration.
    pub fn new(w: i32, h: i32) -> Self {
        Self::with_config(Config::default(), w, h)
    }

    /// A harness with an explicit configuration.
    pub fn with_config(config: Config, w: i32, h: i32) -> Self {
        super::init_logging();
        Self {
            core: Core::new(config, Size::new(w, h)),
            ctx: RecordingContext::new(),
        }
    }

    /// Run one frame. Returns whether anything was drawn.
    pub fn frame(&mut self) -> bool {
        self.core.update(&mut self.ctx)
    }

    /// Run frames until the layout queue is empty, up to `limit` frames.
    /// Returns the number of frames run.
    pub fn settle(&mut self, limit: usize) -> usize {
        let mut n = 0;
        while n < limit {
            self.frame();
            n += 1;
            if self.core.layout_queue().is_empty() {
                break;
            }
        }
        n
    }
}

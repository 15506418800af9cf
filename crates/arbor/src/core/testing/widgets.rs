use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    Core, NodeId, Widget,
    error::Result,
    event::{Event, EventKind},
    geom::{Rect, Size},
    paint::DrawContext,
};

/// A shared log of labels.
pub type Log = Arc<Mutex<Vec<&'static str>>>;

/// A shared log of delivered events.
pub type EventLog = Arc<Mutex<Vec<(NodeId, Event)>>>;

/// A leaf payload with a fixed content size. It fills its bounds when drawn
/// and can log its draws and disposal.
#[derive(Debug, Clone)]
pub struct TestWidget {
    /// Content size reported for Fit measurement.
    pub size: Size,
    /// Label written to the logs.
    pub label: &'static str,
    /// Receives the label on every draw.
    draws: Option<Log>,
    /// Receives the label on disposal.
    disposals: Option<Log>,
}

impl TestWidget {
    /// A widget of the given content size.
    pub fn new(w: i32, h: i32) -> Self {
        Self {
            size: Size::new(w, h),
            label: "",
            draws: None,
            disposals: None,
        }
    }

    /// Log draws under `label`.
    pub fn draw_log(mut self, label: &'static str, log: &Log) -> Self {
        self.label = label;
        self.draws = Some(Arc::clone(log));
        self
    }

    /// Log disposal under `label`.
    pub fn dispose_log(mut self, label: &'static str, log: &Log) -> Self {
        self.label = label;
        self.disposals = Some(Arc::clone(log));
        self
    }
}

impl Widget for TestWidget {
    fn content_size(&self) -> Size {
        self.size
    }

    fn draw(&self, ctx: &mut dyn DrawContext, bounds: Rect) {
        ctx.fill_rect(bounds);
        if let Some(l) = &self.draws {
            l.lock().push(self.label);
        }
    }

    fn on_dispose(&mut self) {
        if let Some(l) = &self.disposals {
            l.lock().push(self.label);
        }
    }
}

/// An empty event log.
pub fn event_log() -> EventLog {
    Arc::default()
}

/// Record events of a kind delivered to a node, optionally marking them
/// handled.
pub fn record(
    core: &mut Core,
    id: NodeId,
    kind: EventKind,
    log: &EventLog,
    handle: bool,
) -> Result<()> {
    let log = Arc::clone(log);
    core.subscribe(id, kind, move |_, target, args| {
        log.lock().push((target, args.event));
        if handle {
            args.handled = true;
        }
    })
}

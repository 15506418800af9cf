//! Background population of containers.
//!
//! A loader walks an item iterator on its own thread. Each item is built
//! and appended under its own update scope, so the host keeps running frames
//! between items, and cancellation is observed between items.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
};

use tracing::debug;

use crate::{
    Core, NodeId, UiContext,
    error::{Error, Result},
};

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Default, Debug, Clone)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a finished loader.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Items built and attached.
    pub inserted: usize,
    /// Whether the loader stopped on cancellation.
    pub cancelled: bool,
}

/// Handle on a running loader.
#[derive(Debug)]
pub struct LoaderHandle {
    /// Cancellation flag shared with the thread.
    token: CancellationToken,
    /// The loader thread.
    join: JoinHandle<Result<LoadReport>>,
}

impl LoaderHandle {
    /// Ask the loader to stop before its next item.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The loader's cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Has the loader thread exited?
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the loader to exit.
    pub fn join(self) -> Result<LoadReport> {
        self.join
            .join()
            .map_err(|_| Error::Loader("loader thread panicked".into()))?
    }
}

/// Spawns background loaders.
pub struct Loader;

impl Loader {
    /// Build one node per item and append it to `parent`, on a background
    /// thread.
    pub fn spawn<I, F>(ctx: Arc<UiContext>, parent: NodeId, items: I, build: F) -> LoaderHandle
    where
        I: IntoIterator + Send + 'static,
        I::IntoIter: Send,
        F: FnMut(&mut Core, I::Item) -> Result<NodeId> + Send + 'static,
    {
        Self::spawn_with_token(ctx, parent, items, build, CancellationToken::new())
    }

    /// Like [`Loader::spawn`], observing an existing token.
    pub fn spawn_with_token<I, F>(
        ctx: Arc<UiContext>,
        parent: NodeId,
        items: I,
        mut build: F,
        token: CancellationToken,
    ) -> LoaderHandle
    where
        I: IntoIterator + Send + 'static,
        I::IntoIter: Send,
        F: FnMut(&mut Core, I::Item) -> Result<NodeId> + Send + 'static,
    {
        let t = token.clone();
        let join = thread::spawn(move || {
            let mut report = LoadReport::default();
            for item in items {
                if t.is_cancelled() {
                    debug!("loader for {parent:?} cancelled after {} items", report.inserted);
                    report.cancelled = true;
                    break;
                }
                let mut core = ctx.update_scope();
                let id = build(&mut core, item)?;
                if let Err(e) = core.add_child(parent, id) {
                    core.dispose(id);
                    return Err(e);
                }
                report.inserted += 1;
            }
            Ok(report)
        });
        LoaderHandle { token, join }
    }
}

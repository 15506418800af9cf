//! Lock-guarded access to a [`Core`] shared between the host thread and
//! background loaders.
//!
//! The host runs frames through [`UiContext::try_update`], which skips the
//! frame instead of blocking when another scope holds the lock. Loaders take
//! an [`UpdateScope`] per inserted item, so the host can interleave frames
//! between items.

use std::ops::{Deref, DerefMut};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

use crate::{Core, paint::DrawContext};

/// Owner of a [`Core`] behind a reader-writer lock.
pub struct UiContext {
    /// The guarded core.
    core: RwLock<Core>,
}

/// Exclusive access for multi-step structural mutation. The lock is
/// released on drop.
pub struct UpdateScope<'a> {
    /// The write guard.
    guard: RwLockWriteGuard<'a, Core>,
}

/// Exclusive access for running the layout pump. The tree can be read but
/// not restructured through this scope.
pub struct LayoutScope<'a> {
    /// The write guard.
    guard: RwLockWriteGuard<'a, Core>,
}

impl UiContext {
    /// Take ownership of a core.
    pub fn new(core: Core) -> Self {
        Self {
            core: RwLock::new(core),
        }
    }

    /// Shared access for queries and hit testing.
    pub fn read(&self) -> RwLockReadGuard<'_, Core> {
        self.core.read()
    }

    /// Block until exclusive access is available.
    pub fn update_scope(&self) -> UpdateScope<'_> {
        UpdateScope {
            guard: self.core.write(),
        }
    }

    /// Exclusive access if nobody else holds the lock.
    pub fn try_update_scope(&self) -> Option<UpdateScope<'_>> {
        self.core.try_write().map(|guard| UpdateScope { guard })
    }

    /// Block until the layout pump can run.
    pub fn layout_scope(&self) -> LayoutScope<'_> {
        LayoutScope {
            guard: self.core.write(),
        }
    }

    /// Run one frame unless another scope is held. Returns `None` when the
    /// frame was skipped, otherwise whether anything was drawn.
    pub fn try_update(&self, ctx: &mut dyn DrawContext) -> Option<bool> {
        let Some(mut core) = self.core.try_write() else {
            trace!("frame skipped, core is locked");
            return None;
        };
        Some(core.update(ctx))
    }

    /// Give the core back.
    pub fn into_inner(self) -> Core {
        self.core.into_inner()
    }
}

impl Deref for UpdateScope<'_> {
    type Target = Core;

    fn deref(&self) -> &Core {
        &self.guard
    }
}

impl DerefMut for UpdateScope<'_> {
    fn deref_mut(&mut self) -> &mut Core {
        &mut self.guard
    }
}

impl LayoutScope<'_> {
    /// Drain the layout queue for one pass.
    pub fn process(&mut self) {
        self.guard.process_layouting();
    }

    /// Number of queued layout items.
    pub fn pending(&self) -> usize {
        self.guard.layout_queue().len()
    }
}

impl Deref for LayoutScope<'_> {
    type Target = Core;

    fn deref(&self) -> &Core {
        &self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, geom::Size, testing::RecordingContext};

    #[test]
    fn update_skipped_while_scope_held() {
        let ui = UiContext::new(Core::new(Config::default(), Size::new(10, 10)));
        let mut ctx = RecordingContext::new();
        {
            let _scope = ui.update_scope();
            assert!(ui.try_update(&mut ctx).is_none());
            assert!(ui.try_update_scope().is_none());
        }
        assert!(ui.try_update(&mut ctx).is_some());
    }

    #[test]
    fn layout_scope_runs_the_pump() {
        let ui = UiContext::new(Core::new(Config::default(), Size::new(10, 10)));
        {
            let mut s = ui.update_scope();
            let g = s.create_group();
            s.add_widget(g).ok();
        }
        let mut l = ui.layout_scope();
        assert!(l.pending() > 0);
        l.process();
        assert_eq!(l.pending(), 0);
        drop(l);
        assert_eq!(ui.read().children(ui.read().root_id()).len(), 1);
    }
}

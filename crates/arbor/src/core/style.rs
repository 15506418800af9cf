//! Style initializers.
//!
//! A style is a plain function run once on every freshly constructed node
//! whose style key matches. It may set properties and subscribe handlers.
//! Keys are either a container type tag (`"Group"`, `"Stack"`, ...) or the
//! style key of a widget payload.

use std::collections::HashMap;

use crate::{Core, NodeId};

/// A style initializer.
pub type StyleInit = fn(&mut Core, NodeId);

/// Table of style initializers by key.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    /// Initializers by key.
    entries: HashMap<String, StyleInit>,
}

/// Stacks and wrappers separate their children by 2.
fn spaced(core: &mut Core, id: NodeId) {
    core.set_spacing(id, 2);
}

/// Scrollers scroll by the configured speed.
fn scroller(core: &mut Core, id: NodeId) {
    let speed = core.config().default_scroll_speed;
    core.set_scroll_speed(id, speed);
}

impl StyleTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding the built-in styles.
    pub fn with_defaults() -> Self {
        let mut t = Self::new();
        t.register("Stack", spaced);
        t.register("Wrapper", spaced);
        t.register("DockStack", spaced);
        t.register("Scroller", scroller);
        t
    }

    /// Register or replace the initializer for a key.
    pub fn register(&mut self, key: impl Into<String>, init: StyleInit) {
        self.entries.insert(key.into(), init);
    }

    /// Remove the initializer for a key.
    pub fn remove(&mut self, key: &str) -> Option<StyleInit> {
        self.entries.remove(key)
    }

    /// The initializer for a key.
    pub fn get(&self, key: &str) -> Option<StyleInit> {
        self.entries.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let t = StyleTable::with_defaults();
        assert!(t.get("Stack").is_some());
        assert!(t.get("Scroller").is_some());
        assert!(t.get("Group").is_none());
    }

    #[test]
    fn register_replaces() {
        fn noop(_: &mut Core, _: NodeId) {}
        let mut t = StyleTable::new();
        t.register("Group", noop);
        assert!(t.get("Group").is_some());
        assert!(t.remove("Group").is_some());
        assert!(t.get("Group").is_none());
    }
}

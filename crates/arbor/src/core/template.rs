//! Instance factories.
//!
//! Templated controls materialize their sub-trees through named factories.
//! The core never parses template syntax: a factory is any closure that
//! builds a detached node.

use std::{collections::HashMap, fmt, sync::Arc};

use crate::{Core, NodeId, error::Result};

/// A factory building a detached sub-tree and returning its root.
pub type Factory = Arc<dyn Fn(&mut Core) -> Result<NodeId> + Send + Sync>;

/// Registry of instance factories by name.
#[derive(Clone, Default)]
pub struct TemplateRegistry {
    /// Factories by name.
    factories: HashMap<String, Factory>,
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a factory.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&mut Core) -> Result<NodeId> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// The factory registered under a name.
    pub fn get(&self, name: &str) -> Option<Factory> {
        self.factories.get(name).cloned()
    }

    /// Is a factory registered under this name?
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

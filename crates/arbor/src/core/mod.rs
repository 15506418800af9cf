#![allow(clippy::new_without_default)]
//! Core types for the Arbor widget tree.

// Core modules - public
/// Engine tuning configuration.
pub mod config;
/// UI context and lock scopes.
pub mod context;
/// Core error types.
pub mod error;
/// Input event types and dispatch.
pub mod event;
/// Layouting flags and queue.
pub mod layouting;
/// Background loaders.
pub mod loader;
/// Node data and properties.
pub mod node;
/// Clipping, caching and painting.
pub mod paint;
/// Style initializer table.
pub mod style;
/// Instance factory registry.
pub mod template;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Core modules - internal
/// Node ID types.
pub mod id;
/// Host input processing: hover, capture and clicks.
pub(crate) mod input;
/// The layouting algorithm shared by every node.
pub(crate) mod layout;
/// World state and the structural tree API.
pub mod world;

// Public exports from internal modules
pub use config::Config;
pub use context::UiContext;
pub use id::NodeId;
pub use loader::{CancellationToken, LoadReport, Loader, LoaderHandle};
pub use world::Core;

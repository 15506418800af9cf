//! Arbor: a retained-mode widget layout core.
//!
//! Arbor keeps a tree of widgets in an arena and resolves their geometry
//! incrementally through a layouting queue. Only the parts of the tree whose
//! geometry changed are repainted, through a per-widget clip region and an
//! optional bitmap cache.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Core`] - The arena, layout queue and input state
//! - [`UiContext`] - Lock-guarded access to a `Core` shared with loaders
//! - [`Widget`] - The trait implemented by widget payloads
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Rect, Size, Measure, Region, etc.)
//! - [`containers`] - Container kinds and their layout hooks
//! - [`widgets`] - Built-in widget payloads

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod containers;
pub mod geom;
pub mod widget;
pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
// Re-export core application types
pub use core::{
    CancellationToken, Config, Core, LoadReport, Loader, LoaderHandle, NodeId, UiContext,
};
pub use core::{context, error, event, layouting, loader, node, paint, style, template};
pub(crate) use core::{input, layout};

pub use widget::Widget;

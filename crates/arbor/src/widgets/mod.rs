//! Built-in widget payloads.

pub mod dock;

pub use dock::{DockLayout, DockStack, DockWindow, Splitter, export_config, import_config};

//! Geometry primitives used across arbor.

#![warn(missing_docs)]

/// Alignment and orientation enums.
mod align;
/// Error types for geometry operations.
mod error;
/// Sizing policy values.
mod measure;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Rectangle sets for dirty-area tracking.
mod region;
/// Width/height size type.
mod size;

pub use align::{Alignment, HorizontalAlignment, Orientation, VerticalAlignment};
pub use error::{Error, Result};
pub use measure::Measure;
pub use point::Point;
pub use rect::Rect;
pub use region::{Overlap, Region};
pub use size::Size;

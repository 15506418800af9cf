//! Geometry primitives, re-exported from `arbor-geom`.

pub use arbor_geom::*;

use std::result::Result as StdResult;

use thiserror::Error;

use crate::{NodeId, geom};

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("node not found: {0:?}")]
    /// The referenced node does not exist in the arena.
    NodeNotFound(NodeId),
    #[error("node already attached: {0:?}")]
    /// The node already has a parent.
    AlreadyAttached(NodeId),
    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    /// The child is the parent itself or one of its ancestors.
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },
    #[error("node is not a container: {0:?}")]
    /// The node cannot host children of the requested shape.
    NotAContainer(NodeId),
    #[error("{child:?} is not a child of {parent:?}")]
    /// The node is not listed among the container's children.
    NotAChild {
        /// Container that was searched.
        parent: NodeId,
        /// Node that was not found.
        child: NodeId,
    },
    #[error("child index {index} out of range for {parent:?}")]
    /// An insertion index beyond the end of the child list.
    ChildIndex {
        /// Container being modified.
        parent: NodeId,
        /// Offending index.
        index: usize,
    },
    #[error("unknown template: {0}")]
    /// No instance factory is registered under this name.
    UnknownTemplate(String),
    #[error("missing template part: {0}")]
    /// A named sub-widget required by a template is absent.
    MissingTemplatePart(String),
    #[error("config: {0}")]
    /// Configuration failure.
    Config(String),
    #[error("parse error: {0}")]
    /// Parsing failure.
    Parse(String),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
    #[error("loader: {0}")]
    /// Background loader failure.
    Loader(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        match e {
            geom::Error::Parse(s) => Self::Parse(s),
            geom::Error::Geometry(s) => Self::Geometry(s),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}

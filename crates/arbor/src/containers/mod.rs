//! Container kinds.
//!
//! Every node carries a [`Container`] value describing whether and how it
//! hosts children. The layout, paint and hit-testing passes dispatch the
//! kind-specific hooks by matching on it. The behaviour of each kind lives in
//! the submodules, as free functions over the [`Core`](crate::Core).

use crate::{
    NodeId,
    geom::{Orientation, Point},
};

/// Unordered group: children overlap and align individually.
pub mod group;
/// Single-child scrolling viewport.
pub mod scroller;
/// Single-child private container.
pub mod single;
/// Linear stack with one optional stretched child.
pub mod stack;
/// Flow container wrapping children into rows or columns.
pub mod wrapper;

/// Discriminant of a [`Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// No children.
    Leaf,
    /// The tree root.
    Root,
    /// See [`group`].
    Group,
    /// See [`stack`].
    Stack,
    /// See [`wrapper`].
    Wrapper,
    /// See [`single`].
    Single,
    /// See [`scroller`].
    Scroller,
}

impl ContainerKind {
    /// Type tag used for the style table.
    pub fn style_key(self) -> &'static str {
        match self {
            Self::Leaf => "Widget",
            Self::Root => "Root",
            Self::Group => "Group",
            Self::Stack => "Stack",
            Self::Wrapper => "Wrapper",
            Self::Single => "Container",
            Self::Scroller => "Scroller",
        }
    }
}

/// State of a group-like container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupState {
    /// Children in insertion order. Later children paint on top.
    pub(crate) children: Vec<NodeId>,
    /// The widest visible child, tracked while the group is Fit.
    pub(crate) largest_child: Option<NodeId>,
    /// The tallest visible child, tracked while the group is Fit.
    pub(crate) tallest_child: Option<NodeId>,
}

impl GroupState {
    /// The tracked maximum child along an axis.
    pub(crate) fn max_child(&self, axis: Orientation) -> Option<NodeId> {
        match axis {
            Orientation::Horizontal => self.largest_child,
            Orientation::Vertical => self.tallest_child,
        }
    }

    /// Mutable access to the tracked maximum child along an axis.
    pub(crate) fn max_child_mut(&mut self, axis: Orientation) -> &mut Option<NodeId> {
        match axis {
            Orientation::Horizontal => &mut self.largest_child,
            Orientation::Vertical => &mut self.tallest_child,
        }
    }
}

/// State of a stack or wrapper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackState {
    /// Underlying group.
    pub(crate) group: GroupState,
    /// Main axis.
    pub(crate) orientation: Orientation,
    /// Gap between consecutive visible children.
    pub(crate) spacing: i32,
    /// The single child sized to the remaining space.
    pub(crate) stretched_child: Option<NodeId>,
}

/// State of a single-child container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleState {
    /// The hosted child.
    pub(crate) child: Option<NodeId>,
}

/// State of a scroller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollerState {
    /// Underlying single-child container.
    pub(crate) single: SingleState,
    /// Current scroll offset, within `[0, max_scroll]`.
    pub(crate) scroll: Point,
    /// Maximum scroll offset.
    pub(crate) max_scroll: Point,
    /// Pixels per wheel notch.
    pub(crate) scroll_speed: i32,
}

/// Tagged per-kind container state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    /// No children.
    Leaf,
    /// The tree root. Index 0 of its children is the topmost widget.
    Root(GroupState),
    /// Overlapping children.
    Group(GroupState),
    /// Linear stack.
    Stack(StackState),
    /// Wrapping flow.
    Wrapper(StackState),
    /// Private single-child container.
    Single(SingleState),
    /// Scrolling single-child container.
    Scroller(ScrollerState),
}

impl Container {
    /// Fresh state for a kind.
    pub fn new(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Leaf => Self::Leaf,
            ContainerKind::Root => Self::Root(GroupState::default()),
            ContainerKind::Group => Self::Group(GroupState::default()),
            ContainerKind::Stack => Self::Stack(StackState::default()),
            ContainerKind::Wrapper => Self::Wrapper(StackState::default()),
            ContainerKind::Single => Self::Single(SingleState::default()),
            ContainerKind::Scroller => Self::Scroller(ScrollerState::default()),
        }
    }

    /// The kind of this container.
    pub fn kind(&self) -> ContainerKind {
        match self {
            Self::Leaf => ContainerKind::Leaf,
            Self::Root(_) => ContainerKind::Root,
            Self::Group(_) => ContainerKind::Group,
            Self::Stack(_) => ContainerKind::Stack,
            Self::Wrapper(_) => ContainerKind::Wrapper,
            Self::Single(_) => ContainerKind::Single,
            Self::Scroller(_) => ContainerKind::Scroller,
        }
    }

    /// Hosted children in order.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Self::Leaf => &[],
            Self::Single(s) => s.child.as_slice(),
            Self::Scroller(s) => s.single.child.as_slice(),
            _ => self.group().map_or(&[], |g| g.children.as_slice()),
        }
    }

    /// Does this container place its children itself?
    pub fn arranges_children(&self) -> bool {
        matches!(self, Self::Stack(_) | Self::Wrapper(_))
    }

    /// Group state of group-like kinds.
    pub(crate) fn group(&self) -> Option<&GroupState> {
        match self {
            Self::Root(g) | Self::Group(g) => Some(g),
            Self::Stack(s) | Self::Wrapper(s) => Some(&s.group),
            _ => None,
        }
    }

    /// Mutable group state of group-like kinds.
    pub(crate) fn group_mut(&mut self) -> Option<&mut GroupState> {
        match self {
            Self::Root(g) | Self::Group(g) => Some(g),
            Self::Stack(s) | Self::Wrapper(s) => Some(&mut s.group),
            _ => None,
        }
    }

    /// Stack state of stacks and wrappers.
    pub(crate) fn stack(&self) -> Option<&StackState> {
        match self {
            Self::Stack(s) | Self::Wrapper(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable stack state of stacks and wrappers.
    pub(crate) fn stack_mut(&mut self) -> Option<&mut StackState> {
        match self {
            Self::Stack(s) | Self::Wrapper(s) => Some(s),
            _ => None,
        }
    }

    /// Single-child state of private containers and scrollers.
    pub(crate) fn single(&self) -> Option<&SingleState> {
        match self {
            Self::Single(s) => Some(s),
            Self::Scroller(s) => Some(&s.single),
            _ => None,
        }
    }

    /// Mutable single-child state.
    pub(crate) fn single_mut(&mut self) -> Option<&mut SingleState> {
        match self {
            Self::Single(s) => Some(s),
            Self::Scroller(s) => Some(&mut s.single),
            _ => None,
        }
    }

    /// Scroller state.
    pub(crate) fn scroller(&self) -> Option<&ScrollerState> {
        match self {
            Self::Scroller(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable scroller state.
    pub(crate) fn scroller_mut(&mut self) -> Option<&mut ScrollerState> {
        match self {
            Self::Scroller(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_round_trip() {
        for k in [
            ContainerKind::Leaf,
            ContainerKind::Root,
            ContainerKind::Group,
            ContainerKind::Stack,
            ContainerKind::Wrapper,
            ContainerKind::Single,
            ContainerKind::Scroller,
        ] {
            let c = Container::new(k);
            assert_eq!(c.kind(), k);
            assert!(c.children().is_empty());
        }
        assert!(Container::new(ContainerKind::Wrapper).arranges_children());
        assert!(!Container::new(ContainerKind::Group).arranges_children());
        assert!(Container::new(ContainerKind::Scroller).single().is_some());
    }
}

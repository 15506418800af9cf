use std::{collections::VecDeque, mem};

use bitflags::bitflags;

use crate::{NodeId, geom::Orientation};

bitflags! {
    /// Independently schedulable units of layout work.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LayoutingType: u8 {
        /// Horizontal position.
        const X = 0b0_0001;
        /// Vertical position.
        const Y = 0b0_0010;
        /// Both positions.
        const POSITIONING = Self::X.bits() | Self::Y.bits();
        /// Width.
        const WIDTH = 0b0_0100;
        /// Height.
        const HEIGHT = 0b0_1000;
        /// Both sizes.
        const SIZING = Self::WIDTH.bits() | Self::HEIGHT.bits();
        /// Placement of children by an arranging container.
        const ARRANGE_CHILDREN = 0b1_0000;
        /// Everything.
        const ALL = Self::POSITIONING.bits() | Self::SIZING.bits() | Self::ARRANGE_CHILDREN.bits();
    }
}

impl LayoutingType {
    /// Single flags in the order they are queued.
    const QUEUE_ORDER: [Self; 5] = [
        Self::WIDTH,
        Self::HEIGHT,
        Self::X,
        Self::Y,
        Self::ARRANGE_CHILDREN,
    ];

    /// The size flag of an axis.
    pub fn size(axis: Orientation) -> Self {
        match axis {
            Orientation::Horizontal => Self::WIDTH,
            Orientation::Vertical => Self::HEIGHT,
        }
    }

    /// The position flag of an axis.
    pub fn position(axis: Orientation) -> Self {
        match axis {
            Orientation::Horizontal => Self::X,
            Orientation::Vertical => Self::Y,
        }
    }

    /// The axis of a single size flag.
    pub fn size_axis(self) -> Option<Orientation> {
        if self == Self::WIDTH {
            Some(Orientation::Horizontal)
        } else if self == Self::HEIGHT {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }

    /// The axis of a single position flag.
    pub fn position_axis(self) -> Option<Orientation> {
        if self == Self::X {
            Some(Orientation::Horizontal)
        } else if self == Self::Y {
            Some(Orientation::Vertical)
        } else {
            None
        }
    }

    /// Split into single flags, in queue order.
    pub fn units(self) -> impl Iterator<Item = Self> {
        Self::QUEUE_ORDER
            .into_iter()
            .filter(move |f| self.contains(*f))
    }
}

/// One pending unit of layout work for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutingQueueItem {
    /// The single flag to resolve.
    pub kind: LayoutingType,
    /// Target node.
    pub node: NodeId,
    /// Attempts made during the current pass.
    pub tries: u32,
    /// Passes this item has been deferred.
    pub discard_count: u32,
}

impl LayoutingQueueItem {
    /// A fresh item.
    pub fn new(kind: LayoutingType, node: NodeId) -> Self {
        Self {
            kind,
            node,
            tries: 0,
            discard_count: 0,
        }
    }
}

/// The FIFO of pending layout work, plus the items deferred to the next pass.
#[derive(Debug, Default)]
pub struct LayoutQueue {
    /// Items of the current pass. Items appended while draining are processed
    /// in the same pass.
    pending: VecDeque<LayoutingQueueItem>,
    /// Items deferred to the next pass.
    discard: VecDeque<LayoutingQueueItem>,
}

impl LayoutQueue {
    /// Append an item to the current pass.
    pub fn push(&mut self, item: LayoutingQueueItem) {
        self.pending.push_back(item);
    }

    /// Take the next item of the current pass.
    pub fn pop(&mut self) -> Option<LayoutingQueueItem> {
        self.pending.pop_front()
    }

    /// Defer an item to the next pass.
    pub fn defer(&mut self, item: LayoutingQueueItem) {
        self.discard.push_back(item);
    }

    /// End a pass: the deferred items become the next pass's queue.
    pub fn finish_pass(&mut self) {
        debug_assert!(self.pending.is_empty());
        self.pending = mem::take(&mut self.discard);
    }

    /// Number of items in the current pass.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Is the current pass empty?
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of deferred items.
    pub fn deferred(&self) -> usize {
        self.discard.len()
    }

    /// Count items of the current pass for a node and flag.
    pub fn count(&self, node: NodeId, kind: LayoutingType) -> usize {
        self.pending
            .iter()
            .filter(|i| i.node == node && i.kind == kind)
            .count()
    }

    /// Drop everything, including deferred items.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.discard.clear();
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn units_in_queue_order() {
        let units: Vec<_> = LayoutingType::ALL.units().collect();
        assert_eq!(
            units,
            vec![
                LayoutingType::WIDTH,
                LayoutingType::HEIGHT,
                LayoutingType::X,
                LayoutingType::Y,
                LayoutingType::ARRANGE_CHILDREN
            ]
        );
        assert_eq!(LayoutingType::POSITIONING.bits(), 3);
        assert_eq!(LayoutingType::SIZING.bits(), 12);
        assert_eq!(
            LayoutingType::WIDTH.size_axis(),
            Some(Orientation::Horizontal)
        );
        assert_eq!(LayoutingType::SIZING.size_axis(), None);
    }

    #[test]
    fn deferred_items_start_next_pass() {
        let mut ids: SlotMap<NodeId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let mut q = LayoutQueue::default();
        q.push(LayoutingQueueItem::new(LayoutingType::X, a));
        let item = q.pop().unwrap();
        q.defer(item);
        assert!(q.is_empty());
        q.finish_pass();
        assert_eq!(q.count(a, LayoutingType::X), 1);
        assert_eq!(q.deferred(), 0);
    }
}

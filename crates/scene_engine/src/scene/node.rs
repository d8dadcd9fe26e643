//! Internal spatial owning an ordered, sparse list of children

use crate::scene::bound::Bound;
use crate::scene::SpatialKey;

/// Child slots of an internal spatial.
///
/// Detaching a child leaves an empty slot which the next attach reuses, so slot
/// indices stay stable across detach/attach cycles.
#[derive(Debug, Clone, Default)]
pub struct Node {
    children: Vec<Option<SpatialKey>>,
}

impl Node {
    /// Create a node without children
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node with room for `capacity` children
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            children: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots, including empty ones
    pub fn slot_count(&self) -> usize {
        self.children.len()
    }

    /// Number of occupied slots
    pub fn child_count(&self) -> usize {
        self.children.iter().flatten().count()
    }

    /// Child in slot `index`; `None` for empty or out-of-range slots
    pub fn child_at(&self, index: usize) -> Option<SpatialKey> {
        self.children.get(index).copied().flatten()
    }

    /// Occupied children in slot order
    pub fn children(&self) -> impl Iterator<Item = SpatialKey> + '_ {
        self.children.iter().flatten().copied()
    }

    /// Slot index holding `child`
    pub fn slot_of(&self, child: SpatialKey) -> Option<usize> {
        self.children.iter().position(|slot| *slot == Some(child))
    }

    /// Store `child` in the first empty slot, appending if none; returns the slot
    pub(crate) fn insert_child(&mut self, child: SpatialKey) -> usize {
        if let Some(index) = self.children.iter().position(Option::is_none) {
            self.children[index] = Some(child);
            return index;
        }
        self.children.push(Some(child));
        self.children.len() - 1
    }

    /// Empty the slot holding `child`; returns the slot
    pub(crate) fn remove_child(&mut self, child: SpatialKey) -> Option<usize> {
        let index = self.slot_of(child)?;
        self.children[index] = None;
        Some(index)
    }

    /// Empty slot `index`; returns its former occupant
    pub(crate) fn take_child_at(&mut self, index: usize) -> Option<SpatialKey> {
        self.children.get_mut(index)?.take()
    }

    /// Aggregate of child bounds: starts empty and grows to contain each
    /// child bound in turn
    pub fn aggregate_bound<'a>(child_bounds: impl IntoIterator<Item = &'a Bound>) -> Bound {
        let mut bound = Bound::empty();
        for child in child_bounds {
            bound.grow_to_contain(child);
        }
        bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use slotmap::SlotMap;

    fn keys(n: usize) -> Vec<SpatialKey> {
        let mut map: SlotMap<SpatialKey, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_detached_slot_is_reused() {
        let k = keys(3);
        let mut node = Node::new();
        assert_eq!(node.insert_child(k[0]), 0);
        assert_eq!(node.insert_child(k[1]), 1);

        assert_eq!(node.remove_child(k[0]), Some(0));
        assert_eq!(node.slot_count(), 2);
        assert_eq!(node.child_count(), 1);
        assert_eq!(node.child_at(0), None);

        assert_eq!(node.insert_child(k[2]), 0);
        assert_eq!(node.children().collect::<Vec<_>>(), vec![k[2], k[1]]);
    }

    #[test]
    fn test_out_of_range_slots_are_absent() {
        let k = keys(1);
        let mut node = Node::new();
        node.insert_child(k[0]);
        assert_eq!(node.child_at(5), None);
        assert_eq!(node.take_child_at(5), None);
        assert_eq!(node.take_child_at(0), Some(k[0]));
        assert_eq!(node.remove_child(k[0]), None);
    }

    #[test]
    fn test_aggregate_skips_empty_bounds() {
        let bounds = [
            Bound::empty(),
            Bound::new(Point3::new(1.0, 0.0, 0.0), 1.0),
            Bound::empty(),
        ];
        assert_eq!(Node::aggregate_bound(&bounds), bounds[1]);
        assert!(Node::aggregate_bound(std::iter::empty()).is_empty());
    }
}

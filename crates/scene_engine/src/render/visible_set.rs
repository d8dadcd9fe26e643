//! Output of a cull pass

use crate::scene::SpatialKey;

/// Visuals that survived culling, in traversal order.
///
/// Entries are keys into the [`SceneGraph`](crate::scene::SceneGraph) that was
/// culled. The set is rebuilt every pass; keys go stale if the graph is
/// modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleSet {
    visible: Vec<SpatialKey>,
}

impl VisibleSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            visible: Vec::with_capacity(capacity),
        }
    }

    /// Append a visual
    pub fn insert(&mut self, key: SpatialKey) {
        self.visible.push(key);
    }

    /// Drop every entry, keeping the allocation
    pub fn clear(&mut self) {
        self.visible.clear();
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<SpatialKey> {
        self.visible.get(index).copied()
    }

    /// Whether `key` is in the set
    pub fn contains(&self, key: SpatialKey) -> bool {
        self.visible.contains(&key)
    }

    /// Entries in traversal order
    pub fn iter(&self) -> impl Iterator<Item = SpatialKey> + '_ {
        self.visible.iter().copied()
    }

    /// Entries as a slice
    pub fn as_slice(&self) -> &[SpatialKey] {
        &self.visible
    }
}

impl<'a> IntoIterator for &'a VisibleSet {
    type Item = SpatialKey;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, SpatialKey>>;

    fn into_iter(self) -> Self::IntoIter {
        self.visible.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_insert_keeps_order_and_clear_empties() {
        let mut map: SlotMap<SpatialKey, ()> = SlotMap::with_key();
        let a = map.insert(());
        let b = map.insert(());

        let mut set = VisibleSet::with_capacity(2);
        set.insert(b);
        set.insert(a);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0), Some(b));
        assert_eq!((&set).into_iter().collect::<Vec<_>>(), vec![b, a]);
        assert!(set.contains(a));

        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.get(0), None);
    }
}

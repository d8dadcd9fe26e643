//! Scene graph arena and the per-frame update protocol
//!
//! Every spatial lives in one slot map owned by [`SceneGraph`]. Ownership flows
//! from a node to its children through the child slots; the `parent` key on a
//! child is a non-owning back-reference used only to walk upward when
//! refreshing ancestor bounds.
//!
//! `update` runs in a fixed order: controllers and world transforms top-down
//! (each child fully updated before its parent aggregates), then the bound of
//! the updated spatial, then the bounds of every ancestor above it.

use log::{debug, trace};
use slotmap::SlotMap;

use crate::scene::bound::Bound;
use crate::scene::controller::Controller;
use crate::scene::node::Node;
use crate::scene::spatial::{Spatial, SpatialKind};
use crate::scene::transform::Transform;
use crate::scene::visual::Visual;
use crate::scene::SpatialKey;

/// Arena owning every spatial of a scene
#[derive(Debug, Default)]
pub struct SceneGraph {
    spatials: SlotMap<SpatialKey, Spatial>,
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spatials
    pub fn len(&self) -> usize {
        self.spatials.len()
    }

    /// Whether the graph holds no spatials
    pub fn is_empty(&self) -> bool {
        self.spatials.is_empty()
    }

    /// Whether `key` refers to a live spatial
    pub fn contains(&self, key: SpatialKey) -> bool {
        self.spatials.contains_key(key)
    }

    /// Add an unattached internal node
    pub fn insert_node(&mut self, name: impl Into<String>) -> SpatialKey {
        self.insert(Spatial::new(name, SpatialKind::Node(Node::new())))
    }

    /// Add an unattached visual
    pub fn insert_visual(&mut self, name: impl Into<String>, visual: Visual) -> SpatialKey {
        self.insert(Spatial::new(name, SpatialKind::Visual(visual)))
    }

    fn insert(&mut self, spatial: Spatial) -> SpatialKey {
        let name = spatial.name().to_owned();
        let key = self.spatials.insert(spatial);
        trace!("Inserted spatial '{}' as {:?}", name, key);
        key
    }

    /// Look up a spatial
    pub fn get(&self, key: SpatialKey) -> Option<&Spatial> {
        self.spatials.get(key)
    }

    /// Look up a spatial mutably
    pub fn get_mut(&mut self, key: SpatialKey) -> Option<&mut Spatial> {
        self.spatials.get_mut(key)
    }

    /// Visual data of `key`, if it is a live visual
    pub fn visual(&self, key: SpatialKey) -> Option<&Visual> {
        self.get(key)?.as_visual()
    }

    /// Mutable visual data of `key`, if it is a live visual
    pub fn visual_mut(&mut self, key: SpatialKey) -> Option<&mut Visual> {
        self.get_mut(key)?.as_visual_mut()
    }

    /// Node data of `key`, if it is a live node
    pub fn node(&self, key: SpatialKey) -> Option<&Node> {
        self.get(key)?.as_node()
    }

    /// Owning node of `key`
    pub fn parent(&self, key: SpatialKey) -> Option<SpatialKey> {
        self.get(key)?.parent
    }

    /// Child of `parent` in slot `index`; `None` for empty, out-of-range, or
    /// non-node lookups
    pub fn child_at(&self, parent: SpatialKey, index: usize) -> Option<SpatialKey> {
        self.node(parent)?.child_at(index)
    }

    /// Every spatial without a parent
    pub fn roots(&self) -> impl Iterator<Item = SpatialKey> + '_ {
        self.spatials
            .iter()
            .filter(|(_, spatial)| spatial.parent.is_none())
            .map(|(key, _)| key)
    }

    /// Iterate over all spatials
    pub fn iter(&self) -> impl Iterator<Item = (SpatialKey, &Spatial)> + '_ {
        self.spatials.iter()
    }

    /// Attach `child` to `parent`, reusing the first empty slot.
    ///
    /// Returns the slot index.
    ///
    /// # Panics
    /// If either key is stale, `parent` is not a node, `child` is `parent`, or
    /// `child` already has a parent.
    pub fn attach_child(&mut self, parent: SpatialKey, child: SpatialKey) -> usize {
        assert!(parent != child, "a spatial cannot be attached to itself");
        let parent_spatial = self
            .spatials
            .get(parent)
            .unwrap_or_else(|| panic!("attach_child: stale parent key {parent:?}"));
        assert!(
            parent_spatial.as_node().is_some(),
            "attach_child: '{}' is not a node",
            parent_spatial.name()
        );

        let child_spatial = self
            .spatials
            .get_mut(child)
            .unwrap_or_else(|| panic!("attach_child: stale child key {child:?}"));
        assert!(
            child_spatial.parent.is_none(),
            "attach_child: '{}' already has a parent",
            child_spatial.name()
        );
        child_spatial.parent = Some(parent);

        let parent_spatial = &mut self.spatials[parent];
        let slot = match &mut parent_spatial.kind {
            SpatialKind::Node(node) => node.insert_child(child),
            SpatialKind::Visual(_) => unreachable!("parent kind checked above"),
        };
        debug!("Attached {:?} to '{}' in slot {}", child, parent_spatial.name(), slot);
        slot
    }

    /// Detach `child` from `parent`, leaving its slot empty.
    ///
    /// Returns the vacated slot, or `None` if `child` was not a child of `parent`.
    pub fn detach_child(&mut self, parent: SpatialKey, child: SpatialKey) -> Option<usize> {
        let SpatialKind::Node(node) = &mut self.spatials.get_mut(parent)?.kind else {
            return None;
        };
        let slot = node.remove_child(child)?;
        if let Some(child_spatial) = self.spatials.get_mut(child) {
            child_spatial.parent = None;
        }
        debug!("Detached {:?} from {:?} (slot {})", child, parent, slot);
        Some(slot)
    }

    /// Detach whatever occupies slot `index` of `parent`.
    ///
    /// Returns the detached child, or `None` for empty or out-of-range slots.
    pub fn detach_child_at(&mut self, parent: SpatialKey, index: usize) -> Option<SpatialKey> {
        let SpatialKind::Node(node) = &mut self.spatials.get_mut(parent)?.kind else {
            return None;
        };
        let child = node.take_child_at(index)?;
        if let Some(child_spatial) = self.spatials.get_mut(child) {
            child_spatial.parent = None;
        }
        debug!("Detached {:?} from {:?} (slot {})", child, parent, index);
        Some(child)
    }

    /// Remove `key` and its whole subtree, detaching it from its parent first.
    ///
    /// Returns the number of spatials removed (zero for a stale key).
    pub fn remove(&mut self, key: SpatialKey) -> usize {
        let Some(parent) = self.get(key).map(|s| s.parent) else {
            return 0;
        };
        if let Some(parent) = parent {
            self.detach_child(parent, key);
        }

        let mut pending = vec![key];
        let mut removed = 0;
        while let Some(next) = pending.pop() {
            if let Some(spatial) = self.spatials.remove(next) {
                if let SpatialKind::Node(node) = &spatial.kind {
                    pending.extend(node.children());
                }
                removed += 1;
            }
        }
        debug!("Removed subtree rooted at {:?} ({} spatials)", key, removed);
        removed
    }

    /// Attach a controller to a spatial
    ///
    /// # Panics
    /// If `key` is stale.
    pub fn attach_controller(&mut self, key: SpatialKey, controller: Box<dyn Controller>) {
        self[key].push_controller(controller);
    }

    /// Remove and return every controller of a spatial
    pub fn detach_all_controllers(&mut self, key: SpatialKey) -> Vec<Box<dyn Controller>> {
        self.get_mut(key).map(Spatial::clear_controllers).unwrap_or_default()
    }

    /// Pin the world transform of `key`; updates keep it instead of deriving
    /// it from the parent until [`SceneGraph::release_world_transform`]
    pub fn set_world_transform(&mut self, key: SpatialKey, world: Transform) {
        let spatial = &mut self[key];
        spatial.world = world;
        spatial.world_is_current = true;
    }

    /// Resume deriving the world transform of `key` from its parent
    pub fn release_world_transform(&mut self, key: SpatialKey) {
        self[key].world_is_current = false;
    }

    /// Run the update protocol on the subtree rooted at `key`, then refresh
    /// the bounds of every ancestor.
    ///
    /// # Panics
    /// If `key` is stale.
    pub fn update(&mut self, key: SpatialKey, app_time: f64) {
        trace!("Updating subtree {:?} at t={:.4}", key, app_time);
        self.update_subtree(key, app_time, true);
    }

    fn update_subtree(&mut self, key: SpatialKey, app_time: f64, initiator: bool) {
        self.update_world_data(key, app_time);
        self.update_world_bound(key);
        if initiator {
            self.propagate_bound_to_root(key);
        }
    }

    /// Run controllers, refresh the world transform, then fully update each
    /// child (without upward propagation).
    pub fn update_world_data(&mut self, key: SpatialKey, app_time: f64) {
        self[key].update_controllers(app_time);

        let spatial = &self[key];
        if !spatial.world_is_current {
            let world = match spatial.parent {
                Some(parent) => Transform::product(&self[parent].world, &spatial.local),
                None => spatial.local.clone(),
            };
            self[key].world = world;
        }

        let slots = self.node(key).map_or(0, Node::slot_count);
        for index in 0..slots {
            if let Some(child) = self.child_at(key, index) {
                self.update_subtree(child, app_time, false);
            }
        }
    }

    /// Recompute the world bound of `key` from its children (node) or its
    /// model bound and world transform (visual)
    pub fn update_world_bound(&mut self, key: SpatialKey) {
        let spatial = &self[key];
        let bound = match &spatial.kind {
            SpatialKind::Node(node) => {
                Node::aggregate_bound(
                    node.children().map(|child| &self.spatials[child].world_bound),
                )
            }
            SpatialKind::Visual(visual) => visual.world_bound(&spatial.world),
        };
        self[key].world_bound = bound;
    }

    /// Refresh the bounds of every ancestor of `key`, nearest first
    pub fn propagate_bound_to_root(&mut self, key: SpatialKey) {
        let mut current = self.parent(key);
        while let Some(ancestor) = current {
            self.update_world_bound(ancestor);
            current = self.parent(ancestor);
        }
    }

    /// World bound of `key`
    pub fn world_bound(&self, key: SpatialKey) -> Option<&Bound> {
        self.get(key).map(Spatial::world_bound)
    }
}

impl std::ops::Index<SpatialKey> for SceneGraph {
    type Output = Spatial;

    fn index(&self, key: SpatialKey) -> &Spatial {
        &self.spatials[key]
    }
}

impl std::ops::IndexMut<SpatialKey> for SceneGraph {
    fn index_mut(&mut self, key: SpatialKey) -> &mut Spatial {
        &mut self.spatials[key]
    }
}

//! Data shared by every scene graph element
//!
//! A spatial is either an internal [`Node`] or a leaf [`Visual`]. The kind is a
//! closed enum, so every pass over the graph handles both cases explicitly.

use crate::scene::bound::Bound;
use crate::scene::controller::{ControlledTarget, Controller};
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::visual::Visual;
use crate::scene::SpatialKey;

/// Culling behaviour of a spatial and its subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullingMode {
    /// Never drawn; the subtree is skipped entirely
    Always,
    /// Drawn when the world bound intersects the view frustum
    #[default]
    Dynamic,
    /// Always drawn; the subtree skips the frustum test
    Never,
}

/// Concrete kind of a spatial
#[derive(Debug, Clone)]
pub enum SpatialKind {
    /// Internal element with children
    Node(Node),
    /// Drawable leaf
    Visual(Visual),
}

/// A scene graph element
#[derive(Debug)]
pub struct Spatial {
    name: String,
    pub(crate) local: Transform,
    pub(crate) world: Transform,
    pub(crate) world_is_current: bool,
    pub(crate) world_bound: Bound,
    culling: CullingMode,
    pub(crate) parent: Option<SpatialKey>,
    controllers: Vec<Box<dyn Controller>>,
    pub(crate) kind: SpatialKind,
}

impl Spatial {
    pub(crate) fn new(name: impl Into<String>, kind: SpatialKind) -> Self {
        Self {
            name: name.into(),
            local: Transform::identity(),
            world: Transform::identity(),
            world_is_current: false,
            world_bound: Bound::empty(),
            culling: CullingMode::default(),
            parent: None,
            controllers: Vec::new(),
            kind,
        }
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// Mutable transform relative to the parent; picked up by the next update
    pub fn local_transform_mut(&mut self) -> &mut Transform {
        &mut self.local
    }

    /// Cached transform relative to the world origin
    pub fn world_transform(&self) -> &Transform {
        &self.world
    }

    /// Whether the world transform is pinned and left alone by updates
    pub fn world_is_current(&self) -> bool {
        self.world_is_current
    }

    /// World-space bounding sphere as of the last update
    pub fn world_bound(&self) -> &Bound {
        &self.world_bound
    }

    /// Culling mode
    pub fn culling(&self) -> CullingMode {
        self.culling
    }

    /// Change the culling mode
    pub fn set_culling(&mut self, culling: CullingMode) {
        self.culling = culling;
    }

    /// Owning node, if attached
    pub fn parent(&self) -> Option<SpatialKey> {
        self.parent
    }

    /// Concrete kind
    pub fn kind(&self) -> &SpatialKind {
        &self.kind
    }

    /// Node data if this is a node
    pub fn as_node(&self) -> Option<&Node> {
        match &self.kind {
            SpatialKind::Node(node) => Some(node),
            SpatialKind::Visual(_) => None,
        }
    }

    /// Visual data if this is a visual
    pub fn as_visual(&self) -> Option<&Visual> {
        match &self.kind {
            SpatialKind::Visual(visual) => Some(visual),
            SpatialKind::Node(_) => None,
        }
    }

    /// Mutable visual data if this is a visual
    pub fn as_visual_mut(&mut self) -> Option<&mut Visual> {
        match &mut self.kind {
            SpatialKind::Visual(visual) => Some(visual),
            SpatialKind::Node(_) => None,
        }
    }

    /// Number of attached controllers
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    pub(crate) fn push_controller(&mut self, controller: Box<dyn Controller>) {
        self.controllers.push(controller);
    }

    pub(crate) fn clear_controllers(&mut self) -> Vec<Box<dyn Controller>> {
        std::mem::take(&mut self.controllers)
    }

    /// Run every active controller at `app_time`.
    ///
    /// Returns true if any controller reported a change.
    pub fn update_controllers(&mut self, app_time: f64) -> bool {
        if self.controllers.is_empty() {
            return false;
        }

        let visual = match &mut self.kind {
            SpatialKind::Visual(visual) => Some(visual),
            SpatialKind::Node(_) => None,
        };
        let mut target = ControlledTarget::new(&mut self.local, visual);
        let mut changed = false;
        for controller in self.controllers.iter_mut().filter(|c| c.is_active()) {
            changed |= controller.update(app_time, &mut target);
        }
        target.finish();
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::controller::{ControllerTiming, RepeatType, TranslationController};

    #[test]
    fn test_defaults() {
        let spatial = Spatial::new("root", SpatialKind::Node(Node::new()));
        assert_eq!(spatial.name(), "root");
        assert_eq!(spatial.culling(), CullingMode::Dynamic);
        assert!(spatial.parent().is_none());
        assert!(spatial.world_bound().is_empty());
        assert!(spatial.as_node().is_some());
        assert!(spatial.as_visual().is_none());
    }

    #[test]
    fn test_inactive_controllers_are_skipped() {
        let mut spatial = Spatial::new("mover", SpatialKind::Node(Node::new()));
        let mut mover = TranslationController::new(
            Vec3::zeros(),
            Vec3::new(4.0, 0.0, 0.0),
            ControllerTiming::new(RepeatType::Clamp, 0.0, 1.0),
        );
        mover.set_active(false);
        spatial.push_controller(Box::new(mover));

        assert!(!spatial.update_controllers(1.0));
        assert_eq!(*spatial.local_transform().translate(), Vec3::zeros());

        let mut controllers = spatial.clear_controllers();
        controllers[0].set_active(true);
        for c in controllers {
            spatial.push_controller(c);
        }
        assert!(spatial.update_controllers(1.0));
        assert_eq!(*spatial.local_transform().translate(), Vec3::new(4.0, 0.0, 0.0));
    }
}

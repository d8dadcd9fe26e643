//! Scene management system
//!
//! A hierarchy of spatials with propagated transforms and bounding spheres.
//!
//! ## Architecture
//!
//! ```text
//! SceneGraph (arena, owns every Spatial)
//!      ├── Spatial { local, world, world_bound, culling, parent, controllers }
//!      │        └── SpatialKind::Node(children) | SpatialKind::Visual(geometry)
//!      ↓ update(key, time)
//! world transforms (top-down) → world bounds (bottom-up) → ancestors
//! ```

mod bound;
mod controller;
mod geometry;
mod node;
mod plane;
mod scene_graph;
mod spatial;
mod standard_mesh;
mod transform;
mod visual;

slotmap::new_key_type! {
    /// Handle of a spatial inside a [`SceneGraph`]
    pub struct SpatialKey;
}

pub use bound::Bound;
pub use controller::{
    ControlledTarget, Controller, ControllerTiming, RepeatType, SpinController,
    TranslationController, WaveController,
};
pub use geometry::{IndexBuffer, PrimitiveType, VertexAttributes, VertexBuffer, VertexFormat};
pub use node::Node;
pub use plane::{Plane, PlaneSide};
pub use scene_graph::SceneGraph;
pub use spatial::{CullingMode, Spatial, SpatialKind};
pub use standard_mesh::StandardMesh;
pub use transform::Transform;
pub use visual::Visual;

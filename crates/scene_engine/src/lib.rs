//! # Scene Engine
//!
//! Hierarchical scene graph with transform propagation, bounding-sphere
//! aggregation and frustum culling.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed node/visual hierarchy with controllers
//! - **Update Protocol**: World transforms top-down, world bounds bottom-up
//! - **Frustum Culling**: Plane-mask pruning with per-subtree save/restore
//! - **Headless Rendering**: Draw loop contract with a device-free backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.insert_node("root");
//! let ball = graph.insert_visual("ball", StandardMesh::sphere(8, 16, 1.0));
//! graph.attach_child(root, ball);
//! graph[ball].local_transform_mut().set_translate(Vec3::new(0.0, 0.0, -10.0));
//!
//! graph.update(root, 0.0);
//!
//! let mut culler = Culler::new(ViewConfig::default().build_camera());
//! let visible = culler.compute_visible_set(&graph, root);
//! assert!(visible.contains(ball));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, SceneConfig, ViewConfig},
        foundation::{
            math::{Mat3, Point3, Vec3},
            time::{FrameClock, Stopwatch},
        },
        render::{Camera, Culler, Frustum, HeadlessRenderer, RenderError, Renderer, VisibleSet},
        scene::{
            Bound, Controller, CullingMode, Plane, PlaneSide, SceneGraph, SpatialKey,
            SpinController, StandardMesh, Transform, Visual,
        },
    };
}

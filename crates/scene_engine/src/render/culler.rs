//! # Frustum Culler
//!
//! Walks a scene graph and collects the visuals whose world bounds intersect
//! the camera frustum.
//!
//! ## Plane State
//! Each culling plane owns one bit of `plane_state`. When a bound lies fully on
//! the inner side of a plane its bit is cleared, so descendants of that bound
//! skip the plane. The state is saved before a spatial is tested and restored
//! after its subtree is done, so siblings always start from the parent's set.
//!
//! ## Plane Order
//! The six frustum planes occupy slots 0..6 in the order near, far, bottom,
//! top, left, right. Extra planes pushed with [`Culler::push_plane`] follow.

use log::trace;

use crate::foundation::math::{Point3, Vec3};
use crate::render::camera::{Camera, Frustum};
use crate::render::visible_set::VisibleSet;
use crate::scene::{Bound, CullingMode, Plane, PlaneSide, SceneGraph, SpatialKey, SpatialKind};

/// Maximum number of culling planes, one per bit of the plane state
pub const MAX_PLANE_QUANTITY: usize = 32;

/// Number of planes bounding the view frustum
pub const FRUSTUM_PLANE_QUANTITY: usize = 6;

/// Slot of each frustum plane
pub mod plane_index {
    /// Near plane
    pub const NEAR: usize = 0;
    /// Far plane
    pub const FAR: usize = 1;
    /// Bottom plane
    pub const BOTTOM: usize = 2;
    /// Top plane
    pub const TOP: usize = 3;
    /// Left plane
    pub const LEFT: usize = 4;
    /// Right plane
    pub const RIGHT: usize = 5;
}

/// Frustum culler with plane-mask pruning
#[derive(Debug, Clone)]
pub struct Culler {
    camera: Camera,
    planes: [Plane; MAX_PLANE_QUANTITY],
    plane_quantity: usize,
    plane_state: u32,
    visible: VisibleSet,
}

impl Culler {
    /// Create a culler for `camera` with its six frustum planes derived
    pub fn new(camera: Camera) -> Self {
        let frustum = *camera.frustum();
        let unset = Plane {
            normal: Vec3::zeros(),
            constant: 0.0,
        };
        let mut culler = Self {
            camera,
            planes: [unset; MAX_PLANE_QUANTITY],
            plane_quantity: FRUSTUM_PLANE_QUANTITY,
            plane_state: !0,
            visible: VisibleSet::new(),
        };
        culler.set_frustum(frustum);
        culler
    }

    /// Camera the planes were derived from
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera and rederive the frustum planes from it
    pub fn set_camera(&mut self, camera: Camera) {
        let frustum = *camera.frustum();
        self.camera = camera;
        self.set_frustum(frustum);
    }

    /// Current frustum extents
    pub fn frustum(&self) -> &Frustum {
        self.camera.frustum()
    }

    /// Set the frustum extents and derive the six world-space planes from the
    /// camera frame. Every plane is marked active again.
    ///
    /// Call again after moving the camera.
    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.camera.set_frustum(frustum);

        let position = self.camera.location().coords;
        let d_vector = *self.camera.d_vector();
        let u_vector = *self.camera.u_vector();
        let r_vector = *self.camera.r_vector();
        let d_dot_e = d_vector.dot(&position);

        let Frustum {
            d_min,
            d_max,
            u_min,
            u_max,
            r_min,
            r_max,
        } = frustum;

        let through_eye = |normal: Vec3| Plane {
            normal,
            constant: normal.dot(&position),
        };

        self.planes[plane_index::NEAR] = Plane {
            normal: d_vector,
            constant: d_dot_e + d_min,
        };
        self.planes[plane_index::FAR] = Plane {
            normal: -d_vector,
            constant: -(d_dot_e + d_max),
        };

        let d_min_sqr = d_min * d_min;

        let inv_length = 1.0 / (d_min_sqr + u_min * u_min).sqrt();
        self.planes[plane_index::BOTTOM] =
            through_eye(d_vector * (-u_min * inv_length) + u_vector * (d_min * inv_length));

        let inv_length = 1.0 / (d_min_sqr + u_max * u_max).sqrt();
        self.planes[plane_index::TOP] =
            through_eye(d_vector * (u_max * inv_length) + u_vector * (-d_min * inv_length));

        let inv_length = 1.0 / (d_min_sqr + r_min * r_min).sqrt();
        self.planes[plane_index::LEFT] =
            through_eye(d_vector * (-r_min * inv_length) + r_vector * (d_min * inv_length));

        let inv_length = 1.0 / (d_min_sqr + r_max * r_max).sqrt();
        self.planes[plane_index::RIGHT] =
            through_eye(d_vector * (r_max * inv_length) + r_vector * (-d_min * inv_length));

        self.plane_state = !0;
    }

    /// Number of planes in use
    pub fn plane_quantity(&self) -> usize {
        self.plane_quantity
    }

    /// Planes in use, frustum planes first
    pub fn planes(&self) -> &[Plane] {
        &self.planes[..self.plane_quantity]
    }

    /// Bit `i` set means plane `i` still needs testing
    pub fn plane_state(&self) -> u32 {
        self.plane_state
    }

    /// Overwrite the plane state
    pub fn set_plane_state(&mut self, plane_state: u32) {
        self.plane_state = plane_state;
    }

    /// Add a culling plane after the existing ones.
    ///
    /// Returns false, leaving the culler unchanged, when all
    /// [`MAX_PLANE_QUANTITY`] slots are in use.
    pub fn push_plane(&mut self, plane: Plane) -> bool {
        if self.plane_quantity >= MAX_PLANE_QUANTITY {
            return false;
        }
        self.planes[self.plane_quantity] = plane;
        self.plane_state |= 1 << self.plane_quantity;
        self.plane_quantity += 1;
        true
    }

    /// Remove the last pushed plane.
    ///
    /// Returns false when only the frustum planes remain; they cannot be popped.
    pub fn pop_plane(&mut self) -> bool {
        if self.plane_quantity <= FRUSTUM_PLANE_QUANTITY {
            return false;
        }
        self.plane_quantity -= 1;
        true
    }

    /// Visuals collected by the last cull pass
    pub fn visible_set(&self) -> &VisibleSet {
        &self.visible
    }

    /// Cull the subtree rooted at `root`, replacing the visible set.
    ///
    /// # Panics
    /// If `root` is not a live spatial of `graph`.
    pub fn compute_visible_set(&mut self, graph: &SceneGraph, root: SpatialKey) -> &VisibleSet {
        assert!(graph.contains(root), "compute_visible_set: stale root key {root:?}");
        self.visible.clear();
        self.on_get_visible_set(graph, root, false);
        trace!(
            "Cull pass from {:?}: {} of {} spatials visible",
            root,
            self.visible.len(),
            graph.len()
        );
        &self.visible
    }

    /// Cull one spatial and, if it passes, its subtree.
    ///
    /// With `no_cull` set the frustum test is skipped for the whole subtree.
    pub fn on_get_visible_set(&mut self, graph: &SceneGraph, key: SpatialKey, no_cull: bool) {
        let spatial = &graph[key];
        let no_cull = match spatial.culling() {
            CullingMode::Always => return,
            CullingMode::Never => true,
            CullingMode::Dynamic => no_cull,
        };

        let saved_state = self.plane_state;
        if no_cull || self.is_visible(spatial.world_bound()) {
            match spatial.kind() {
                SpatialKind::Node(node) => {
                    for child in node.children() {
                        self.on_get_visible_set(graph, child, no_cull);
                    }
                }
                SpatialKind::Visual(_) => self.visible.insert(key),
            }
        }
        self.plane_state = saved_state;
    }

    /// Test a bound against the active planes, highest index first.
    ///
    /// Clears the bit of every plane the bound lies fully inside. The empty
    /// bound is never visible.
    pub fn is_visible(&mut self, bound: &Bound) -> bool {
        if bound.is_empty() {
            return false;
        }

        for index in (0..self.plane_quantity).rev() {
            let mask = 1_u32 << index;
            if self.plane_state & mask == 0 {
                continue;
            }
            match bound.which_side(&self.planes[index]) {
                PlaneSide::Negative => return false,
                PlaneSide::Positive => self.plane_state &= !mask,
                PlaneSide::Straddling => {}
            }
        }
        true
    }

    /// Test a convex polygon against every plane in use, such as a portal.
    ///
    /// The polygon is invisible if all of its vertices lie strictly outside
    /// some single plane. The plane state is neither read nor modified. An
    /// empty polygon is never visible.
    pub fn is_visible_polygon(&self, vertices: &[Point3], ignore_near_plane: bool) -> bool {
        for (index, plane) in self.planes().iter().enumerate().rev() {
            if ignore_near_plane && index == plane_index::NEAR {
                continue;
            }
            let outside = vertices
                .iter()
                .all(|vertex| plane.which_side(vertex) == PlaneSide::Negative);
            if outside {
                return false;
            }
        }
        !vertices.is_empty()
    }

    /// Classify the whole frustum volume against `plane` using its eight
    /// corners
    pub fn which_side(&self, plane: &Plane) -> PlaneSide {
        let frustum = self.camera.frustum();

        let eye_distance = plane.distance_to(self.camera.location());
        let n_dot_d = plane.normal.dot(self.camera.d_vector());
        let n_dot_u = plane.normal.dot(self.camera.u_vector());
        let n_dot_r = plane.normal.dot(self.camera.r_vector());
        let far_ratio = frustum.d_max / frustum.d_min;

        let mut positive = 0;
        let mut negative = 0;
        let mut classify = |value: f32| {
            if value > 0.0 {
                positive += 1;
            } else if value < 0.0 {
                negative += 1;
            }
        };

        let near_d = eye_distance + frustum.d_min * n_dot_d;
        let far_d = eye_distance + frustum.d_max * n_dot_d;
        for u in [frustum.u_min, frustum.u_max] {
            for r in [frustum.r_min, frustum.r_max] {
                let offset = u * n_dot_u + r * n_dot_r;
                classify(near_d + offset);
                classify(far_d + far_ratio * offset);
            }
        }

        match (positive > 0, negative > 0) {
            (true, true) => PlaneSide::Straddling,
            (true, false) => PlaneSide::Positive,
            _ => PlaneSide::Negative,
        }
    }
}

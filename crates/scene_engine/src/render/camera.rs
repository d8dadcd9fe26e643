//! # Camera
//!
//! A camera is a world-space frame plus a view frustum.
//!
//! ## Coordinate System
//! The frame is location `E` with orthonormal axes:
//! - `D` = view direction
//! - `U` = up
//! - `R` = right, with `R = D × U`
//!
//! The frustum is six scalars measured in that frame: near/far distances along
//! `D`, and the bottom/top (`U`) and left/right (`R`) extents on the near plane.
//! The default camera sits at the origin looking down `-Z` with `+Y` up.

use log::trace;

use crate::foundation::math::{utils, Point3, Vec3};

/// Tolerance for the orthonormality check on camera axes
const AXIS_TOLERANCE: f32 = 1e-3;

/// View frustum extents in camera coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Near distance along D
    pub d_min: f32,
    /// Far distance along D
    pub d_max: f32,
    /// Bottom extent along U at the near plane (usually negative)
    pub u_min: f32,
    /// Top extent along U at the near plane
    pub u_max: f32,
    /// Left extent along R at the near plane (usually negative)
    pub r_min: f32,
    /// Right extent along R at the near plane
    pub r_max: f32,
}

impl Frustum {
    /// Symmetric perspective frustum from a vertical field of view
    pub fn from_fov(up_fov_degrees: f32, aspect_ratio: f32, d_min: f32, d_max: f32) -> Self {
        let half_angle = 0.5 * utils::deg_to_rad(up_fov_degrees);
        let u_max = d_min * half_angle.tan();
        let r_max = aspect_ratio * u_max;
        Self {
            d_min,
            d_max,
            u_min: -u_max,
            u_max,
            r_min: -r_max,
            r_max,
        }
    }
}

impl Default for Frustum {
    fn default() -> Self {
        Self::from_fov(90.0, 1.0, 1.0, 1000.0)
    }
}

/// World-space viewer consumed by the culler
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    location: Point3,
    d_vector: Vec3,
    u_vector: Vec3,
    r_vector: Vec3,
    frustum: Frustum,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            location: Point3::origin(),
            d_vector: Vec3::new(0.0, 0.0, -1.0),
            u_vector: Vec3::new(0.0, 1.0, 0.0),
            r_vector: Vec3::new(1.0, 0.0, 0.0),
            frustum: Frustum::default(),
        }
    }
}

impl Camera {
    /// Camera with the default frame and the given frustum
    pub fn new(frustum: Frustum) -> Self {
        Self {
            frustum,
            ..Self::default()
        }
    }

    /// Set location and axes together.
    ///
    /// # Panics
    /// In debug builds, if the axes are not orthonormal.
    pub fn set_frame(&mut self, location: Point3, d_vector: Vec3, u_vector: Vec3, r_vector: Vec3) {
        self.location = location;
        self.set_axes(d_vector, u_vector, r_vector);
    }

    /// Move the camera without changing its orientation
    pub fn set_location(&mut self, location: Point3) {
        self.location = location;
        trace!("Camera location updated to: {:?}", location);
    }

    /// Set the view axes; they must be orthonormal
    pub fn set_axes(&mut self, d_vector: Vec3, u_vector: Vec3, r_vector: Vec3) {
        debug_assert!(
            (d_vector.norm() - 1.0).abs() < AXIS_TOLERANCE
                && (u_vector.norm() - 1.0).abs() < AXIS_TOLERANCE
                && (r_vector.norm() - 1.0).abs() < AXIS_TOLERANCE
                && d_vector.dot(&u_vector).abs() < AXIS_TOLERANCE
                && d_vector.dot(&r_vector).abs() < AXIS_TOLERANCE
                && u_vector.dot(&r_vector).abs() < AXIS_TOLERANCE,
            "camera axes must be orthonormal"
        );
        self.d_vector = d_vector;
        self.u_vector = u_vector;
        self.r_vector = r_vector;
    }

    /// Place the camera at `location` looking at `target`.
    ///
    /// `up` does not need to be perpendicular to the view direction; the axes
    /// are re-orthonormalized.
    pub fn look_at(&mut self, location: Point3, target: Point3, up: Vec3) {
        let d_vector = (target - location).normalize();
        let r_vector = d_vector.cross(&up).normalize();
        let u_vector = r_vector.cross(&d_vector);
        self.set_frame(location, d_vector, u_vector, r_vector);
        trace!("Camera look_at updated - location: {:?}, target: {:?}", location, target);
    }

    /// Replace the frustum
    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = frustum;
    }

    /// Replace the frustum with a symmetric perspective one
    pub fn set_frustum_fov(
        &mut self,
        up_fov_degrees: f32,
        aspect_ratio: f32,
        d_min: f32,
        d_max: f32,
    ) {
        self.frustum = Frustum::from_fov(up_fov_degrees, aspect_ratio, d_min, d_max);
    }

    /// Location in world space
    pub fn location(&self) -> &Point3 {
        &self.location
    }

    /// View direction
    pub fn d_vector(&self) -> &Vec3 {
        &self.d_vector
    }

    /// Up vector
    pub fn u_vector(&self) -> &Vec3 {
        &self.u_vector
    }

    /// Right vector
    pub fn r_vector(&self) -> &Vec3 {
        &self.r_vector
    }

    /// Frustum extents
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_frame_is_right_handed() {
        let camera = Camera::default();
        assert_relative_eq!(camera.d_vector().cross(camera.u_vector()), *camera.r_vector());
    }

    #[test]
    fn test_fov_frustum_is_symmetric() {
        let frustum = Frustum::from_fov(90.0, 2.0, 1.0, 50.0);
        assert_relative_eq!(frustum.u_max, 1.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.u_min, -1.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.r_max, 2.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.r_min, -2.0, epsilon = 1e-6);
        assert_relative_eq!(frustum.d_max, 50.0);
    }

    #[test]
    fn test_look_at_builds_orthonormal_frame() {
        let mut camera = Camera::default();
        let up = Vec3::new(0.0, 1.0, 0.3);
        camera.look_at(Point3::origin(), Point3::new(10.0, 0.0, 0.0), up);

        assert_relative_eq!(*camera.d_vector(), Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(*camera.u_vector(), up.normalize(), epsilon = 1e-6);
        assert_relative_eq!(
            *camera.r_vector(),
            Vec3::new(0.0, -0.3, 1.0).normalize(),
            epsilon = 1e-6
        );
        assert_relative_eq!(camera.u_vector().dot(camera.d_vector()), 0.0, epsilon = 1e-6);
        assert_relative_eq!(camera.r_vector().dot(camera.u_vector()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_look_at_with_perpendicular_up_keeps_it() {
        let mut camera = Camera::default();
        camera.look_at(Point3::origin(), Point3::new(10.0, 0.0, 0.0), Vec3::y());
        assert_relative_eq!(*camera.u_vector(), Vec3::y(), epsilon = 1e-6);
        assert_relative_eq!(*camera.r_vector(), Vec3::z(), epsilon = 1e-6);
    }
}

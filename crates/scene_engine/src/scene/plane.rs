//! Oriented plane used for culling and side classification

use crate::foundation::math::{Point3, Vec3};

/// Which side of a plane something lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Entirely on the side the normal points to
    Positive,
    /// Entirely on the side opposite the normal
    Negative,
    /// Touching or crossing the plane
    Straddling,
}

/// Plane `normal · X = constant`, normal of unit length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Signed offset from the origin along the normal
    pub constant: f32,
}

impl Plane {
    /// Create a plane from a normal (normalized here) and constant
    pub fn new(normal: Vec3, constant: f32) -> Self {
        let length = normal.norm();
        Self {
            normal: normal / length,
            constant: constant / length,
        }
    }

    /// Plane through `point` with the given normal
    pub fn from_normal_point(normal: Vec3, point: &Point3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            constant: normal.dot(&point.coords),
        }
    }

    /// Plane through three points; the normal follows the winding `p0, p1, p2`
    pub fn from_points(p0: &Point3, p1: &Point3, p2: &Point3) -> Self {
        let normal = (p1 - p0).cross(&(p2 - p0));
        Self::from_normal_point(normal, p0)
    }

    /// Signed distance from the plane to a point
    pub fn distance_to(&self, point: &Point3) -> f32 {
        self.normal.dot(&point.coords) - self.constant
    }

    /// Classify a point against the plane
    pub fn which_side(&self, point: &Point3) -> PlaneSide {
        let distance = self.distance_to(point);
        if distance > 0.0 {
            PlaneSide::Positive
        } else if distance < 0.0 {
            PlaneSide::Negative
        } else {
            PlaneSide::Straddling
        }
    }
}

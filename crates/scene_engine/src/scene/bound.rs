//! Bounding sphere used as the world bound of every spatial
//!
//! A radius of zero marks the empty bound: it is skipped by merges and never
//! reported visible by the culler.

use crate::foundation::math::{Point3, ZERO_TOLERANCE};
use crate::scene::plane::{Plane, PlaneSide};
use crate::scene::transform::Transform;

/// Bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    /// Center of the sphere
    pub center: Point3,
    /// Radius of the sphere, zero for the empty bound
    pub radius: f32,
}

impl Default for Bound {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bound {
    /// Create a bounding sphere
    pub fn new(center: Point3, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "bound radius must be non-negative");
        Self { center, radius }
    }

    /// The empty bound: origin with radius zero
    pub fn empty() -> Self {
        Self {
            center: Point3::origin(),
            radius: 0.0,
        }
    }

    /// Whether this is the empty bound
    pub fn is_empty(&self) -> bool {
        self.radius == 0.0
    }

    /// Sphere around a point cloud: center at the mean, radius to the farthest point.
    ///
    /// An empty slice yields the empty bound.
    pub fn compute_from_data<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Point3>,
        I::IntoIter: Clone,
    {
        let positions = positions.into_iter();
        let mut sum = Point3::origin().coords;
        let mut count = 0_usize;
        for p in positions.clone() {
            sum += p.coords;
            count += 1;
        }
        if count == 0 {
            return Self::empty();
        }

        let center = Point3::from(sum / count as f32);
        let radius_sqr = positions
            .map(|p| (p - center).norm_squared())
            .fold(0.0_f32, f32::max);
        Self {
            center,
            radius: radius_sqr.sqrt(),
        }
    }

    /// Grow this sphere to the smallest sphere containing both it and `other`
    pub fn grow_to_contain(&mut self, other: &Self) {
        if other.radius == 0.0 {
            return;
        }
        if self.radius == 0.0 {
            *self = *other;
            return;
        }

        let center_diff = other.center - self.center;
        let length_sqr = center_diff.norm_squared();
        let radius_diff = other.radius - self.radius;
        let radius_diff_sqr = radius_diff * radius_diff;

        if radius_diff_sqr >= length_sqr {
            // One sphere already contains the other.
            if radius_diff >= 0.0 {
                *self = *other;
            }
            return;
        }

        let length = length_sqr.sqrt();
        if length > ZERO_TOLERANCE {
            let coeff = (length + radius_diff) / (2.0 * length);
            self.center += center_diff * coeff;
        }
        self.radius = 0.5 * (length + self.radius + other.radius);
    }

    /// Map this bound through a transform.
    ///
    /// The radius is scaled by the transform norm, so the result still encloses
    /// the transformed contents under non-uniform scale or shear.
    pub fn transform_by(&self, transform: &Transform) -> Self {
        Self {
            center: transform.apply_forward(&self.center),
            radius: transform.norm() * self.radius,
        }
    }

    /// Classify the sphere against a plane
    pub fn which_side(&self, plane: &Plane) -> PlaneSide {
        let distance = plane.distance_to(&self.center);
        if distance <= -self.radius {
            PlaneSide::Negative
        } else if distance >= self.radius {
            PlaneSide::Positive
        } else {
            PlaneSide::Straddling
        }
    }

    /// Whether `other` lies inside this sphere, allowing `epsilon` slack
    pub fn contains(&self, other: &Self, epsilon: f32) -> bool {
        (other.center - self.center).norm() + other.radius <= self.radius + epsilon
    }

    /// Whether the two spheres overlap
    pub fn test_intersection(&self, other: &Self) -> bool {
        let radius_sum = self.radius + other.radius;
        (other.center - self.center).norm_squared() <= radius_sum * radius_sum
    }
}

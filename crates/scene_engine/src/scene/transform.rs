//! Affine transform owned by every spatial
//!
//! A transform is either a rotation-scale matrix `Y = R*S*X + T` (the common
//! case, kept in factored form so composition and inversion stay cheap) or a
//! general affine map `Y = M*X + T` once shear or non-uniform composition
//! makes the factored form impossible.

use crate::foundation::math::{utils, Mat3, Mat4, Point3, Vec3};

/// Composite affine transform
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Rotation when `is_rs_matrix`, otherwise the general linear part
    matrix: Mat3,
    translate: Vec3,
    scale: Vec3,
    is_identity: bool,
    is_rs_matrix: bool,
    is_uniform_scale: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Mat3::identity(),
            translate: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            is_identity: true,
            is_rs_matrix: true,
            is_uniform_scale: true,
        }
    }
}

impl Transform {
    /// Create the identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a pure translation
    pub fn from_translation(translate: Vec3) -> Self {
        let mut transform = Self::default();
        transform.set_translate(translate);
        transform
    }

    /// Create a rotation-scale-translation transform with uniform scale
    pub fn from_parts(rotate: Mat3, uniform_scale: f32, translate: Vec3) -> Self {
        let mut transform = Self::default();
        transform.set_rotate(rotate);
        transform.set_uniform_scale(uniform_scale);
        transform.set_translate(translate);
        transform
    }

    /// Reset to identity
    pub fn make_identity(&mut self) {
        *self = Self::default();
    }

    /// Reset the scale of a rotation-scale transform to one
    pub fn make_unit_scale(&mut self) {
        assert!(self.is_rs_matrix, "make_unit_scale requires a rotation-scale transform");
        self.scale = Vec3::new(1.0, 1.0, 1.0);
        self.is_uniform_scale = true;
    }

    /// Whether this transform is known to be the identity
    pub fn is_identity(&self) -> bool {
        self.is_identity
    }

    /// Whether the linear part is stored as rotation times scale
    pub fn is_rs_matrix(&self) -> bool {
        self.is_rs_matrix
    }

    /// Whether the scale is the same along every axis
    pub fn is_uniform_scale(&self) -> bool {
        self.is_rs_matrix && self.is_uniform_scale
    }

    /// Set the rotation part; the transform becomes rotation-scale form
    pub fn set_rotate(&mut self, rotate: Mat3) {
        self.matrix = rotate;
        self.is_identity = false;
        self.is_rs_matrix = true;
    }

    /// Rotation part of a rotation-scale transform
    pub fn rotate(&self) -> &Mat3 {
        assert!(self.is_rs_matrix, "rotate() requires a rotation-scale transform");
        &self.matrix
    }

    /// Set a general linear part; the transform leaves rotation-scale form
    pub fn set_matrix(&mut self, matrix: Mat3) {
        self.matrix = matrix;
        self.is_identity = false;
        self.is_rs_matrix = false;
        self.is_uniform_scale = false;
    }

    /// Stored matrix: the rotation for rotation-scale transforms, the full
    /// linear part otherwise
    pub fn matrix(&self) -> &Mat3 {
        &self.matrix
    }

    /// Set the translation
    pub fn set_translate(&mut self, translate: Vec3) {
        self.translate = translate;
        self.is_identity = false;
    }

    /// Translation part
    pub fn translate(&self) -> &Vec3 {
        &self.translate
    }

    /// Set a per-axis scale. Every component must be non-zero.
    pub fn set_scale(&mut self, scale: Vec3) {
        assert!(self.is_rs_matrix, "set_scale requires a rotation-scale transform");
        assert!(
            scale.x != 0.0 && scale.y != 0.0 && scale.z != 0.0,
            "scale components must be non-zero"
        );
        self.scale = scale;
        self.is_identity = false;
        self.is_uniform_scale = false;
    }

    /// Set the same scale on every axis. Must be non-zero.
    pub fn set_uniform_scale(&mut self, scale: f32) {
        assert!(self.is_rs_matrix, "set_uniform_scale requires a rotation-scale transform");
        assert!(scale != 0.0, "uniform scale must be non-zero");
        self.scale = Vec3::new(scale, scale, scale);
        self.is_identity = false;
        self.is_uniform_scale = true;
    }

    /// Per-axis scale of a rotation-scale transform
    pub fn scale(&self) -> &Vec3 {
        assert!(self.is_rs_matrix, "scale() requires a rotation-scale transform");
        &self.scale
    }

    /// Uniform scale of a rotation-scale transform
    pub fn uniform_scale(&self) -> f32 {
        assert!(
            self.is_rs_matrix && self.is_uniform_scale,
            "uniform_scale() requires a uniformly scaled rotation-scale transform"
        );
        self.scale.x
    }

    /// Linear part as a single matrix (`R*S` or `M`)
    pub fn linear(&self) -> Mat3 {
        if self.is_rs_matrix {
            self.matrix * Mat3::from_diagonal(&self.scale)
        } else {
            self.matrix
        }
    }

    /// Upper bound on how far the linear part can stretch a unit vector.
    ///
    /// Exact for rotation-scale transforms (largest absolute scale); the
    /// largest absolute row sum for general matrices.
    pub fn norm(&self) -> f32 {
        if self.is_rs_matrix {
            self.scale.x.abs().max(self.scale.y.abs()).max(self.scale.z.abs())
        } else {
            utils::max_abs_row_sum(&self.matrix)
        }
    }

    /// Map a point forward: `Y = M*X + T`
    pub fn apply_forward(&self, point: &Point3) -> Point3 {
        if self.is_identity {
            return *point;
        }
        Point3::from(self.linear() * point.coords + self.translate)
    }

    /// Map a direction forward (translation ignored)
    pub fn apply_forward_vector(&self, vector: &Vec3) -> Vec3 {
        if self.is_identity {
            return *vector;
        }
        self.linear() * vector
    }

    /// Map a point backward: `X = M^{-1}*(Y - T)`.
    ///
    /// Returns `None` when a general linear part is singular.
    pub fn apply_inverse(&self, point: &Point3) -> Option<Point3> {
        if self.is_identity {
            return Some(*point);
        }
        let offset = point.coords - self.translate;
        if self.is_rs_matrix {
            let unrotated = self.matrix.transpose() * offset;
            return Some(Point3::from(unrotated.component_div(&self.scale)));
        }
        let inverse = self.matrix.try_inverse()?;
        Some(Point3::from(inverse * offset))
    }

    /// Inverse transform, `None` when the linear part is singular
    pub fn inverse(&self) -> Option<Self> {
        if self.is_identity {
            return Some(self.clone());
        }

        let mut inverse = Self::default();
        if self.is_rs_matrix && self.is_uniform_scale {
            let rotate_t = self.matrix.transpose();
            let inv_scale = 1.0 / self.scale.x;
            inverse.set_rotate(rotate_t);
            inverse.set_uniform_scale(inv_scale);
            inverse.set_translate(-(rotate_t * self.translate) * inv_scale);
            return Some(inverse);
        }

        let linear_inverse = if self.is_rs_matrix {
            let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
            Mat3::from_diagonal(&inv_scale) * self.matrix.transpose()
        } else {
            self.matrix.try_inverse()?
        };
        inverse.set_matrix(linear_inverse);
        inverse.set_translate(-(linear_inverse * self.translate));
        Some(inverse)
    }

    /// Composition `a ∘ b`: applies `b` first, then `a`
    pub fn product(a: &Self, b: &Self) -> Self {
        if a.is_identity {
            return b.clone();
        }
        if b.is_identity {
            return a.clone();
        }

        let mut result = Self::default();
        if a.is_rs_matrix && b.is_rs_matrix && a.is_uniform_scale {
            let a_scale = a.scale.x;
            result.set_rotate(a.matrix * b.matrix);
            result.set_translate(a_scale * (a.matrix * b.translate) + a.translate);
            if b.is_uniform_scale {
                result.set_uniform_scale(a_scale * b.scale.x);
            } else {
                result.set_scale(b.scale * a_scale);
            }
            return result;
        }

        // No longer expressible as R*S*X + T.
        let a_linear = a.linear();
        let b_linear = b.linear();
        result.set_matrix(a_linear * b_linear);
        result.set_translate(a_linear * b.translate + a.translate);
        result
    }

    /// Homogeneous 4x4 matrix for column vectors
    pub fn homogeneous_matrix(&self) -> Mat4 {
        let mut m = self.linear().to_homogeneous();
        m[(0, 3)] = self.translate.x;
        m[(1, 3)] = self.translate.y;
        m[(2, 3)] = self.translate.z;
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn spin_z(angle: f32) -> Mat3 {
        utils::rotation_about_axis(&Vec3::z(), angle)
    }

    #[test]
    fn test_identity_passes_points_through() {
        let t = Transform::identity();
        let p = Point3::new(1.0, -2.0, 3.0);
        assert_eq!(t.apply_forward(&p), p);
        assert!(t.is_identity());
        assert_relative_eq!(t.norm(), 1.0);
    }

    #[test]
    fn test_apply_forward_rotate_scale_translate() {
        let t = Transform::from_parts(spin_z(HALF_PI), 2.0, Vec3::new(10.0, 0.0, 0.0));
        let p = t.apply_forward(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(10.0, 2.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_apply_inverse_undoes_forward() {
        let mut t = Transform::from_parts(spin_z(0.3), 1.0, Vec3::new(1.0, 2.0, 3.0));
        t.set_scale(Vec3::new(2.0, 3.0, 0.5));
        let p = Point3::new(0.7, -1.1, 4.0);
        let back = t.apply_inverse(&t.apply_forward(&p)).expect("rs transforms are invertible");
        assert_relative_eq!(back, p, epsilon = EPSILON);
    }

    #[test]
    fn test_product_keeps_rs_form_for_uniform_left() {
        let a = Transform::from_parts(spin_z(HALF_PI), 2.0, Vec3::new(1.0, 0.0, 0.0));
        let mut b = Transform::from_translation(Vec3::new(0.0, 0.0, 5.0));
        b.set_scale(Vec3::new(1.0, 2.0, 3.0));
        let ab = Transform::product(&a, &b);
        assert!(ab.is_rs_matrix());
        assert!(!ab.is_uniform_scale());
        assert_relative_eq!(*ab.scale(), Vec3::new(2.0, 4.0, 6.0), epsilon = EPSILON);
        assert_relative_eq!(
            ab.homogeneous_matrix(),
            a.homogeneous_matrix() * b.homogeneous_matrix(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_product_falls_back_to_general_matrix() {
        let mut a = Transform::from_translation(Vec3::new(0.0, 1.0, 0.0));
        a.set_scale(Vec3::new(1.0, 3.0, 1.0));
        let b = Transform::from_parts(spin_z(0.5), 1.0, Vec3::new(2.0, 0.0, 0.0));
        let ab = Transform::product(&a, &b);
        assert!(!ab.is_rs_matrix());
        assert_relative_eq!(
            ab.homogeneous_matrix(),
            a.homogeneous_matrix() * b.homogeneous_matrix(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_inverse_composes_to_identity() {
        let mut general = Transform::identity();
        general.set_matrix(Mat3::new(
            1.0, 0.5, 0.0,
            0.0, 2.0, 0.0,
            0.0, 0.0, 1.0,
        ));
        general.set_translate(Vec3::new(3.0, -1.0, 2.0));
        let inverse = general.inverse().expect("matrix is invertible");
        let round_trip = Transform::product(&general, &inverse);
        assert_relative_eq!(round_trip.homogeneous_matrix(), Mat4::identity(), epsilon = EPSILON);

        let uniform = Transform::from_parts(spin_z(1.2), 4.0, Vec3::new(0.0, 7.0, 0.0));
        let inverse = uniform.inverse().expect("rs transforms are invertible");
        assert!(inverse.is_uniform_scale());
        let round_trip = Transform::product(&inverse, &uniform);
        assert_relative_eq!(round_trip.homogeneous_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        let mut t = Transform::identity();
        t.set_matrix(Mat3::zeros());
        assert!(t.inverse().is_none());
        assert!(t.apply_inverse(&Point3::origin()).is_none());
    }

    #[test]
    fn test_norm_bounds_stretch() {
        let mut t = Transform::identity();
        t.set_scale(Vec3::new(1.0, -5.0, 2.0));
        assert_relative_eq!(t.norm(), 5.0);

        let mut shear = Transform::identity();
        shear.set_matrix(Mat3::new(
            1.0, 1.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ));
        let stretched = shear.apply_forward_vector(&Vec3::new(1.0, 1.0, 0.0).normalize());
        assert!(stretched.norm() <= shear.norm() + EPSILON);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_uniform_scale_panics() {
        Transform::identity().set_uniform_scale(0.0);
    }
}

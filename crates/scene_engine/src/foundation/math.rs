//! Math utilities and types
//!
//! Thin aliases over `nalgebra` so the rest of the engine speaks in terms of
//! single-precision points, vectors and matrices.

pub use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Tolerance used for "close enough to zero" checks in geometric code
pub const ZERO_TOLERANCE: f32 = 1e-6;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Mat3, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Rotation matrix about an arbitrary axis (the axis is normalized here)
    pub fn rotation_about_axis(axis: &Vec3, angle: f32) -> Mat3 {
        let unit = nalgebra::Unit::new_normalize(*axis);
        *nalgebra::Rotation3::from_axis_angle(&unit, angle).matrix()
    }

    /// Largest absolute row sum of a 3x3 matrix (the infinity norm)
    pub fn max_abs_row_sum(m: &Mat3) -> f32 {
        (0..3)
            .map(|r| m[(r, 0)].abs() + m[(r, 1)].abs() + m[(r, 2)].abs())
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deg_rad_round_trip() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = 1e-6);
        assert_relative_eq!(utils::rad_to_deg(constants::HALF_PI), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotation_about_axis_quarter_turn() {
        let r = utils::rotation_about_axis(&Vec3::z(), constants::HALF_PI);
        let rotated = r * Vec3::x();
        assert_relative_eq!(rotated, Vec3::y(), epsilon = 1e-6);
    }

    #[test]
    fn test_max_abs_row_sum() {
        let m = Mat3::new(
            1.0, -2.0, 0.0,
            0.5, 0.5, 0.5,
            0.0, 0.0, -4.0,
        );
        assert_relative_eq!(utils::max_abs_row_sum(&m), 4.0);
    }
}

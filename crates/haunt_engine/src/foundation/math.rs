//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Build a rotation from Euler angles applied in X, then Y, then Z order
/// (intrinsic), i.e. `R = Rx * Ry * Rz`.
///
/// This is the rotation convention of the scene graph: a node rotated by
/// `(x, y, z)` first spins about its local Z axis, then Y, then X.
pub fn euler_xyz(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_axis_angle(&Vec3::x_axis(), x)
        * Quat::from_axis_angle(&Vec3::y_axis(), y)
        * Quat::from_axis_angle(&Vec3::z_axis(), z)
}

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Replace the rotation with XYZ Euler angles
    #[must_use]
    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = euler_xyz(x, y, z);
        self
    }

    /// Replace the scale with a uniform factor
    #[must_use]
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euler_xyz_order() {
        // A quarter turn about Z then about X moves +X onto +Y, then +Y onto +Z.
        let rotation = euler_xyz(constants::HALF_PI, 0.0, constants::HALF_PI);
        let moved = rotation * Vec3::x();
        assert_relative_eq!(moved, Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_matrix_scales_then_rotates_then_translates() {
        let transform = Transform::from_position(Vec3::new(1.0, 0.0, 0.0))
            .with_euler(0.0, constants::HALF_PI, 0.0)
            .with_uniform_scale(2.0);

        let moved = transform.to_matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(moved.coords, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-6);
    }
}

//! Pose math shared between the pool and render backends.
//!
//! These are plain transfer types. Projection math belongs to the renderer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit Y vector, the default camera up direction
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit -Z vector, the default camera look direction
    pub const NEG_Z: Self = Self::new(0.0, 0.0, -1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Quaternion for rotations
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World pose of a Visual: position + rotation.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Pose {
    /// Position
    pub position: Vec3,
    /// Rotation
    pub rotation: Quaternion,
}

impl Pose {
    /// Creates a new pose
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quaternion) -> Self {
        Self { position, rotation }
    }

    /// Pose at the origin with no rotation
    pub const IDENTITY: Self = Self::new(Vec3::ZERO, Quaternion::IDENTITY);
}

/// Vantage point of a Camera for one snapshot.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct CameraPose {
    /// Eye position
    pub position: Vec3,
    /// Look direction
    pub look: Vec3,
    /// Up direction
    pub up: Vec3,
}

impl CameraPose {
    /// Creates a new camera pose
    #[must_use]
    pub const fn new(position: Vec3, look: Vec3, up: Vec3) -> Self {
        Self { position, look, up }
    }

    /// Camera at `position` looking down -Z with +Y up
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::NEG_Z, Vec3::Y)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!((b - a).to_array(), [3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_pose_layout_is_packed() {
        // 3 + 4 floats, no padding
        assert_eq!(bytemuck::bytes_of(&Pose::IDENTITY).len(), 28);
        // 3 * 3 floats
        assert_eq!(bytemuck::bytes_of(&CameraPose::default()).len(), 36);
    }

    #[test]
    fn test_default_camera_pose() {
        let pose = CameraPose::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.look, Vec3::NEG_Z);
        assert_eq!(pose.up, Vec3::Y);
        assert!((pose.look.length() - 1.0).abs() < f32::EPSILON);
    }
}

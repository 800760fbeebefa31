//! Node transforms
//!
//! Rotation is stored as XYZ Euler angles so per-axis increments stay exact.
//! Object-local operations go through a quaternion and are converted back.

use glam::{EulerRot, Quat, Vec3};

/// Position and rotation of a scene node
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    /// Position in parent space
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
}

impl Transform {
    /// Transform at `position` with no rotation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    /// Rotation as a quaternion
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Replace the rotation from a quaternion
    pub fn set_quaternion(&mut self, q: Quat) {
        let (x, y, z) = q.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Move along an axis expressed in the node's local frame
    pub fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
        let axis = axis.normalize_or_zero();
        self.position += self.quaternion() * axis * distance;
    }

    pub fn translate_y(&mut self, distance: f32) {
        self.translate_on_axis(Vec3::Y, distance);
    }

    /// Rotate around an axis expressed in the node's local frame
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        let q = self.quaternion() * Quat::from_axis_angle(axis, angle);
        self.set_quaternion(q);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::Y, angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn translate_y_without_rotation_moves_up() {
        let mut t = Transform::from_position(Vec3::new(0.0, 0.2, 0.0));
        t.translate_y(0.5);
        assert!(close(t.position.y, 0.7));
        assert!(close(t.position.x, 0.0));
    }

    #[test]
    fn translate_follows_local_frame() {
        let mut t = Transform::default();
        t.rotation.z = PI / 2.0;
        t.translate_y(1.0);
        // Local +Y points along world -X after a quarter turn around Z
        assert!(close(t.position.x, -1.0));
        assert!(close(t.position.y, 0.0));
    }

    #[test]
    fn rotate_y_accumulates() {
        let mut t = Transform::default();
        for _ in 0..10 {
            t.rotate_y(PI / 180.0);
        }
        assert!(close(t.rotation.y, 10.0 * PI / 180.0));
        assert!(close(t.rotation.x, 0.0));
    }

    #[test]
    fn zero_axis_rotation_is_ignored() {
        let mut t = Transform::default();
        t.rotate_on_axis(Vec3::ZERO, 1.0);
        assert_eq!(t, Transform::default());
    }
}

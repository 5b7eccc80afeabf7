//! Core types shared by the controllers

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a controlled object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Forward direction projected onto the ground plane.
    ///
    /// Zero when the transform looks straight up or down.
    pub fn flat_forward(&self) -> Vec3 {
        flatten(self.forward())
    }

    /// Right direction projected onto the ground plane
    pub fn flat_right(&self) -> Vec3 {
        flatten(self.right())
    }

    /// Translate by the given offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Rotate to face a target position.
    ///
    /// Leaves the rotation untouched when the target coincides with the position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if let Some(rotation) = look_rotation(target - self.position, up) {
            self.rotation = rotation;
        }
    }
}

/// Rotation whose forward (negative Z) axis points along `direction`
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let back = (-direction).try_normalize()?;
    let right = up
        .cross(back)
        .try_normalize()
        .unwrap_or_else(|| back.any_orthonormal_vector());
    let up = back.cross(right);

    Some(Quat::from_mat3(&Mat3::from_cols(right, up, back)))
}

fn flatten(direction: Vec3) -> Vec3 {
    Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_4, PI};

    #[test]
    fn test_transform_directions() {
        let transform = Transform::default();
        assert_eq!(transform.forward(), Vec3::NEG_Z);
        assert_eq!(transform.right(), Vec3::X);
        assert_eq!(transform.up(), Vec3::Y);
    }

    #[test]
    fn test_look_at() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.0, 10.0));
        transform.look_at(Vec3::ZERO, Vec3::Y);
        assert!(transform.forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(transform.up().abs_diff_eq(Vec3::Y, 1e-5));

        let mut transform = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        transform.look_at(Vec3::ZERO, Vec3::NEG_Y);
        assert!(transform.forward().abs_diff_eq(Vec3::NEG_X, 1e-5));
        assert!(transform.up().abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn test_look_at_degenerate() {
        let rotation = Quat::from_rotation_y(1.0);
        let mut transform = Transform::from_position_rotation(Vec3::ONE, rotation);
        transform.look_at(Vec3::ONE, Vec3::Y);
        assert_eq!(transform.rotation, rotation);

        // Looking straight along the up vector still yields a valid rotation
        let mut transform = Transform::default();
        transform.look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(transform.forward().abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn test_flat_axes() {
        let rotation = Quat::from_rotation_y(PI) * Quat::from_rotation_x(-FRAC_PI_4);
        let transform = Transform::from_position_rotation(Vec3::ZERO, rotation);

        assert!(transform.flat_forward().abs_diff_eq(Vec3::Z, 1e-5));
        assert!(transform.flat_right().abs_diff_eq(Vec3::NEG_X, 1e-5));
    }
}

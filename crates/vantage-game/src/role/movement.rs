//! Grounded role movement gated by a forward probe

use glam::{Quat, Vec2, Vec3};
use tracing::{debug, warn};
use vantage_core::Transform;
use vantage_physics::{BodyHandle, CollisionStart, PhysicsBackend};

use crate::input::{ControlIntent, ControlScheme, InputSnapshot, KeyboardGesture, TouchGesture};

use super::RoleMovementConfig;

/// World-space movement for a `(right, forward)` delta in the frame of `rotation`.
///
/// Both axes are flattened onto the ground plane, so a tilted role still walks level.
pub fn resolve_movement(rotation: Quat, delta: Vec2) -> Vec3 {
    let frame = Transform::from_position_rotation(Vec3::ZERO, rotation);
    frame.flat_forward() * delta.y + frame.flat_right() * delta.x
}

/// Role movement controller
pub struct RoleMovement {
    /// Movement configuration
    pub config: RoleMovementConfig,
    /// The role's body
    body: BodyHandle,
    /// Whether a missing body has already been reported
    missing_reported: bool,
}

impl RoleMovement {
    /// Create a movement controller for `body`
    pub fn new(config: RoleMovementConfig, body: BodyHandle) -> Self {
        Self {
            config,
            body,
            missing_reported: false,
        }
    }

    /// The role's body
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Step along `delta` if nothing is within reach ahead.
    ///
    /// There is no sliding or partial step: a blocked probe leaves the role in
    /// place and returns `false`.
    pub fn try_move(
        &mut self,
        backend: &mut impl PhysicsBackend,
        delta: Vec2,
        speed: f32,
        dt: f32,
    ) -> bool {
        let pose = backend.body_position(self.body).zip(backend.body_rotation(self.body));
        let Some((position, rotation)) = pose else {
            if !self.missing_reported {
                warn!("Role body {:?} not found, movement is disabled", self.body);
                self.missing_reported = true;
            }
            return false;
        };

        let movement = resolve_movement(rotation, delta);
        if movement == Vec3::ZERO {
            return false;
        }

        let origin = position + Vec3::Y * (self.config.height / 2.0);
        let reach = self.config.probe_distance(speed, dt);
        if let Some(hit) = backend.raycast(origin, movement, reach, Some(self.body)) {
            debug!("Role blocked {:.2} ahead", hit.distance);
            return false;
        }

        backend.move_body(self.body, position + movement * speed * dt);
        true
    }

    /// Stop dead when the role bumps into something
    pub fn handle_collision(&self, backend: &mut impl PhysicsBackend, collision: &CollisionStart) {
        if collision.involves(self.body) {
            debug!("Role collided, halting: {:?}", collision);
            backend.halt_body(self.body);
        }
    }

    /// Run one frame of input
    pub fn update(&mut self, backend: &mut impl PhysicsBackend, snapshot: &InputSnapshot, dt: f32) {
        for intent in self.intents(snapshot) {
            match intent {
                ControlIntent::Move { delta, speed } => {
                    self.try_move(backend, delta, speed, dt);
                }
                ControlIntent::Rotate { .. } | ControlIntent::Zoom { .. } => {}
            }
        }
    }
}

impl ControlScheme for RoleMovement {
    fn keyboard_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent> {
        match snapshot.keyboard_gesture() {
            KeyboardGesture::ShiftHeld => Some(ControlIntent::Move {
                delta: snapshot.axis(),
                speed: self.config.keyboard_speed,
            }),
            _ => None,
        }
    }

    fn touch_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent> {
        match snapshot.touch_gesture() {
            TouchGesture::HoldAndSwipe => Some(ControlIntent::Move {
                delta: snapshot.hold_and_swipe_delta(self.config.touch_speed),
                speed: self.config.touch_speed,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use vantage_physics::PhysicsWorld;

    use super::*;
    use crate::input::{KeyStates, TrackedKey};

    /// Role at the origin facing +Z
    fn setup() -> (PhysicsWorld, RoleMovement) {
        let mut world = PhysicsWorld::new();
        let config = RoleMovementConfig::default();
        let body = world.spawn_capsule(Vec3::ZERO, Quat::from_rotation_y(PI), config.radius, config.height);
        world.update_query_pipeline();
        (world, RoleMovement::new(config, body))
    }

    #[test]
    fn test_resolve_movement_flattens_axes() {
        let movement = resolve_movement(Quat::IDENTITY, Vec2::new(1.0, 1.0));
        assert!(movement.abs_diff_eq(Vec3::new(1.0, 0.0, -1.0), 1e-5));

        let tilted = Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(0.7);
        let movement = resolve_movement(tilted, Vec2::new(0.0, 2.0));
        assert!(movement.abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_forward_move() {
        let (mut world, mut role) = setup();

        assert!(role.try_move(&mut world, Vec2::new(0.0, 1.0), 5.0, 0.1));
        let position = world.body_position(role.body()).unwrap();
        assert!(position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-5));
    }

    #[test]
    fn test_obstacle_within_probe_blocks() {
        let (mut world, mut role) = setup();
        // Face at z = 2.5: beyond the step but inside step + radius + margin
        world.create_static_box(Vec3::splat(0.5), Vec3::new(0.0, 0.6, 3.0));
        world.update_query_pipeline();

        assert!(!role.try_move(&mut world, Vec2::new(0.0, 1.0), 5.0, 0.1));
        assert_eq!(world.body_position(role.body()).unwrap(), Vec3::ZERO);

        // Sideways is still free
        assert!(role.try_move(&mut world, Vec2::new(1.0, 0.0), 5.0, 0.1));
        let position = world.body_position(role.body()).unwrap();
        assert!(position.abs_diff_eq(Vec3::new(-0.5, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_zero_delta_does_not_move() {
        let (mut world, mut role) = setup();
        assert!(!role.try_move(&mut world, Vec2::ZERO, 5.0, 0.1));
        assert_eq!(world.body_position(role.body()).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn test_collision_halts_role() {
        let (mut world, role) = setup();
        if let Some(rb) = world.rigid_body_set.get_mut(role.body()) {
            rb.set_linvel([3.0, 0.0, 1.0].into(), true);
            rb.set_angvel([0.0, 2.0, 0.0].into(), true);
        }

        let unrelated = CollisionStart { first: None, second: None };
        role.handle_collision(&mut world, &unrelated);
        assert!(world.get_rigid_body(role.body()).unwrap().linvel().norm() > 0.0);

        let hit = CollisionStart { first: None, second: Some(role.body()) };
        role.handle_collision(&mut world, &hit);
        let rb = world.get_rigid_body(role.body()).unwrap();
        assert_eq!(rb.linvel().norm(), 0.0);
        assert_eq!(rb.angvel().norm(), 0.0);
    }

    #[test]
    fn test_update_moves_with_shift() {
        let (mut world, mut role) = setup();
        let mut keys = KeyStates::default();
        keys.set(TrackedKey::ShiftLeft, true);
        let snapshot = InputSnapshot::new(Vec2::Y, Vec::new(), keys);

        role.update(&mut world, &snapshot, 0.01);
        let position = world.body_position(role.body()).unwrap();
        assert!(position.abs_diff_eq(Vec3::new(0.0, 0.0, 0.2), 1e-5));

        // Plain arrows belong to the camera
        keys.set(TrackedKey::ShiftLeft, false);
        keys.set(TrackedKey::ArrowUp, true);
        let snapshot = InputSnapshot::new(Vec2::Y, Vec::new(), keys);
        role.update(&mut world, &snapshot, 0.01);
        assert!(world.body_position(role.body()).unwrap().abs_diff_eq(position, 1e-6));
    }
}

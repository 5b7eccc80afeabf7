//! Orbit camera that circles a target and backs off from obstacles

use glam::{Quat, Vec2, Vec3};
use tracing::{debug, warn};
use vantage_core::types::look_rotation;
use vantage_core::{orbit_offset, orbit_up, wrap_angle, Transform};
use vantage_physics::{BodyHandle, CollisionStart, PhysicsBackend};

use crate::input::{ControlIntent, ControlScheme, InputSnapshot, KeyboardGesture, TouchGesture};

use super::OrbitConfig;

/// Spherical coordinates of the camera around its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    /// Angle around the target's vertical axis, in [0, 2π)
    pub horizontal_angle: f32,
    /// Elevation angle, in [0, 2π)
    pub vertical_angle: f32,
    /// Distance from the target
    pub radius: f32,
}

impl OrbitState {
    /// Offset from the target for the current angles and radius
    pub fn offset(&self) -> Vec3 {
        orbit_offset(self.horizontal_angle, self.vertical_angle, self.radius)
    }

    /// Up vector used when looking at the target
    pub fn up(&self) -> Vec3 {
        orbit_up(self.vertical_angle)
    }
}

/// Orbit camera controller
pub struct OrbitCamera {
    /// Configuration
    pub config: OrbitConfig,
    /// Current orbit
    state: OrbitState,
    /// The camera's own body
    body: BodyHandle,
    /// The body being followed
    target: BodyHandle,
    /// Camera orientation
    rotation: Quat,
    /// Whether a rotation already positioned the camera this frame
    rotated_this_frame: bool,
    /// Whether a missing body has already been reported
    missing_reported: bool,
}

impl OrbitCamera {
    /// Create an orbit camera for `body` following `target`
    pub fn new(config: OrbitConfig, body: BodyHandle, target: BodyHandle) -> Self {
        let radius = config.initial_radius.clamp(config.min_radius, config.max_radius);
        Self {
            config,
            state: OrbitState {
                horizontal_angle: 0.0,
                vertical_angle: 0.0,
                radius,
            },
            body,
            target,
            rotation: Quat::IDENTITY,
            rotated_this_frame: false,
            missing_reported: false,
        }
    }

    /// Current orbit
    pub fn state(&self) -> OrbitState {
        self.state
    }

    /// Camera orientation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// The camera's body
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// The followed body
    pub fn target(&self) -> BodyHandle {
        self.target
    }

    /// Follow a different body from the next frame on
    pub fn set_target(&mut self, target: BodyHandle) {
        self.target = target;
        self.missing_reported = false;
    }

    /// Camera pose, if the camera body exists
    pub fn transform(&self, backend: &impl PhysicsBackend) -> Option<Transform> {
        backend
            .body_position(self.body)
            .map(|position| Transform::from_position_rotation(position, self.rotation))
    }

    /// Orbit by `delta * speed * dt` radians and move the camera if the way is clear.
    ///
    /// The radius is brought back into `[min_radius, max_radius]` first. A
    /// blocked probe keeps the camera where it is and sets the radius to the
    /// current separation, clamped to the same range.
    pub fn apply_rotation(
        &mut self,
        backend: &mut impl PhysicsBackend,
        delta: Vec2,
        speed: f32,
        dt: f32,
    ) {
        self.rotated_this_frame = true;
        let Some((camera, target)) = self.poses(&*backend) else {
            return;
        };

        self.state.horizontal_angle = wrap_angle(self.state.horizontal_angle + delta.x * speed * dt);
        self.state.vertical_angle = wrap_angle(self.state.vertical_angle + delta.y * speed * dt);
        // A blocked follow may have left the radius out of range
        self.state.radius = self.state.radius.clamp(self.config.min_radius, self.config.max_radius);

        let candidate = target + self.state.offset();
        if self.probe(&*backend, camera, candidate) {
            self.state.radius = camera
                .distance(target)
                .clamp(self.config.min_radius, self.config.max_radius);
            self.look_at(camera, target);
        } else {
            backend.move_body(self.body, candidate);
            self.look_at(candidate, target);
        }
    }

    /// Keep up with a target that moved without any rotation input.
    ///
    /// A blocked probe snaps the radius to the current separation with no floor,
    /// unlike [`apply_rotation`](Self::apply_rotation). While the radius is below
    /// `max_radius` the camera holds its position and only the radius catches up.
    pub fn follow_target(&mut self, backend: &mut impl PhysicsBackend) {
        let Some((camera, target)) = self.poses(&*backend) else {
            return;
        };

        let mut candidate = target + self.state.offset();
        if self.probe(&*backend, camera, candidate) {
            self.state.radius = camera.distance(target);
            return;
        }

        if self.state.radius < self.config.max_radius {
            self.state.radius = camera.distance(target).min(self.config.max_radius);
            candidate = camera;
        }
        backend.move_body(self.body, candidate);
        self.look_at(candidate, target);
    }

    /// Run one frame: apply rotation intents, otherwise follow the target
    pub fn update(&mut self, backend: &mut impl PhysicsBackend, snapshot: &InputSnapshot, dt: f32) {
        for intent in self.intents(snapshot) {
            match intent {
                ControlIntent::Rotate { delta, speed } => {
                    self.apply_rotation(backend, delta, speed, dt);
                }
                ControlIntent::Move { .. } | ControlIntent::Zoom { .. } => {}
            }
        }

        if !self.rotated_this_frame {
            self.follow_target(backend);
        }
        self.rotated_this_frame = false;
    }

    /// React to a collision reported by the physics step
    pub fn handle_collision(&self, collision: &CollisionStart) {
        if collision.involves(self.body) {
            debug!("Orbit camera touched {:?}", collision);
        }
    }

    /// Whether anything lies within the probe distance toward `candidate`
    fn probe(&self, backend: &impl PhysicsBackend, camera: Vec3, candidate: Vec3) -> bool {
        let hit = backend.raycast(
            camera,
            candidate - camera,
            self.config.probe_distance,
            Some(self.body),
        );
        if let Some(hit) = hit {
            debug!("Obstacle {:.2} ahead of orbit camera, holding position", hit.distance);
        }
        hit.is_some()
    }

    fn look_at(&mut self, from: Vec3, target: Vec3) {
        if let Some(rotation) = look_rotation(target - from, self.state.up()) {
            self.rotation = rotation;
        }
    }

    fn poses(&mut self, backend: &impl PhysicsBackend) -> Option<(Vec3, Vec3)> {
        let camera = backend.body_position(self.body);
        let target = backend.body_position(self.target);
        match camera.zip(target) {
            Some(poses) => {
                self.missing_reported = false;
                Some(poses)
            }
            None => {
                if !self.missing_reported {
                    warn!(
                        "Orbit camera body {:?} or target {:?} not found, camera is idle",
                        self.body, self.target
                    );
                    self.missing_reported = true;
                }
                None
            }
        }
    }
}

impl ControlScheme for OrbitCamera {
    fn keyboard_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent> {
        match snapshot.keyboard_gesture() {
            KeyboardGesture::Arrows => Some(ControlIntent::Rotate {
                delta: snapshot.axis(),
                speed: self.config.keyboard_speed,
            }),
            _ => None,
        }
    }

    fn touch_intent(&self, snapshot: &InputSnapshot) -> Option<ControlIntent> {
        match snapshot.touch_gesture() {
            TouchGesture::SingleSwipe => Some(ControlIntent::Rotate {
                delta: snapshot.single_swipe_delta(self.config.touch_speed),
                speed: self.config.touch_speed,
            }),
            _ => None,
        }
    }
}

//! Sphere collision detector
//!
//! Probes a sphere's path with a single ray before moving it. The ray starts at
//! the sphere's center and reaches the intended destination plus one radius, so
//! it covers the sphere's leading surface rather than just its center.

use std::cell::Cell;

use glam::Vec3;
use tracing::{debug, warn};

use crate::backend::{BodyHandle, PhysicsBackend};

/// Length of the probe for moving a sphere of `radius` from `position` along
/// `movement` at `speed` for `dt` seconds.
///
/// `movement` is normalized first, so its magnitude never affects the probe.
pub fn detection_distance(position: Vec3, movement: Vec3, speed: f32, dt: f32, radius: f32) -> f32 {
    let target = position + movement.normalize_or_zero() * speed * dt;
    position.distance(target) + radius
}

/// Ray-probed mover for a sphere body
#[derive(Debug, Clone)]
pub struct SphereCollisionDetector {
    /// Sphere radius
    radius: f32,
    /// The body being moved
    body: BodyHandle,
    /// Last position a move was committed to
    last_valid_position: Vec3,
    /// Whether a missing body has already been reported
    missing_reported: Cell<bool>,
}

impl SphereCollisionDetector {
    /// Create a detector for a body, recording its current position as the last valid one.
    ///
    /// Returns `None` if the body does not exist in the backend.
    pub fn new(radius: f32, body: BodyHandle, backend: &impl PhysicsBackend) -> Option<Self> {
        let last_valid_position = backend.body_position(body)?;
        Some(Self {
            radius,
            body,
            last_valid_position,
            missing_reported: Cell::new(false),
        })
    }

    /// Sphere radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Handle of the moved body
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Last position a move was committed to
    pub fn last_valid_position(&self) -> Vec3 {
        self.last_valid_position
    }

    /// Check whether moving along `movement` would hit something.
    ///
    /// A missing body counts as blocked. A zero movement has nothing to hit.
    pub fn will_collide(
        &self,
        backend: &impl PhysicsBackend,
        movement: Vec3,
        speed: f32,
        dt: f32,
    ) -> bool {
        let Some(position) = self.position(backend) else {
            return true;
        };
        let Some(direction) = movement.try_normalize() else {
            return false;
        };

        let distance = detection_distance(position, direction, speed, dt, self.radius);
        backend
            .raycast(position, direction, distance, Some(self.body))
            .is_some()
    }

    /// Move along `movement` if the path is clear.
    ///
    /// Returns `false` and leaves the body where it is when the probe hits.
    pub fn try_move(
        &mut self,
        backend: &mut impl PhysicsBackend,
        movement: Vec3,
        speed: f32,
        dt: f32,
    ) -> bool {
        let Some(position) = self.position(&*backend) else {
            return false;
        };
        let Some(direction) = movement.try_normalize() else {
            return false;
        };

        let target = position + direction * speed * dt;
        let distance = detection_distance(position, direction, speed, dt, self.radius);
        if let Some(hit) = backend.raycast(position, direction, distance, Some(self.body)) {
            debug!("Sphere move blocked {:.3} along {:?}", hit.distance, direction);
            return false;
        }

        self.last_valid_position = target;
        backend.move_body(self.body, target);
        true
    }

    /// Distance the sphere can travel along `movement` this step without touching anything
    pub fn safe_movement_distance(
        &self,
        backend: &impl PhysicsBackend,
        movement: Vec3,
        speed: f32,
        dt: f32,
    ) -> f32 {
        let Some(position) = self.position(backend) else {
            return 0.0;
        };
        let Some(direction) = movement.try_normalize() else {
            return 0.0;
        };

        let reach = detection_distance(position, direction, speed, dt, self.radius);
        match backend.raycast(position, direction, reach, Some(self.body)) {
            Some(hit) => (hit.distance - self.radius).max(0.0),
            None => reach - self.radius,
        }
    }

    fn position(&self, backend: &impl PhysicsBackend) -> Option<Vec3> {
        let position = backend.body_position(self.body);
        if position.is_none() && !self.missing_reported.replace(true) {
            warn!("Sphere detector body {:?} not found, moves are disabled", self.body);
        }
        position
    }
}

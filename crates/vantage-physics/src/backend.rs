//! The physics seam the controllers are written against
//!
//! Controllers never reach into the physics world directly; they read body
//! poses, cast rays, and relocate their own body through this trait. The
//! rapier-backed [`PhysicsWorld`](crate::PhysicsWorld) is the production
//! implementation.

use glam::{Quat, Vec3};
use rapier3d::prelude::RigidBodyHandle;

/// Handle to a body owned by the physics world
pub type BodyHandle = RigidBodyHandle;

/// Result of a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// The body the hit collider belongs to (`None` for static geometry)
    pub body: Option<BodyHandle>,
}

/// Synchronous queries and relocation against the current world state
pub trait PhysicsBackend {
    /// Cast a ray and return the closest hit within `max_distance`.
    ///
    /// `direction` need not be normalized; a zero direction never hits.
    /// Colliders attached to `ignore` are skipped.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<BodyHandle>,
    ) -> Option<RayHit>;

    /// Current position of a body, `None` if the handle no longer resolves
    fn body_position(&self, body: BodyHandle) -> Option<Vec3>;

    /// Current rotation of a body, `None` if the handle no longer resolves
    fn body_rotation(&self, body: BodyHandle) -> Option<Quat>;

    /// Relocate a body to a new position
    fn move_body(&mut self, body: BodyHandle, position: Vec3);

    /// Zero a body's linear and angular velocity
    fn halt_body(&mut self, body: BodyHandle);
}

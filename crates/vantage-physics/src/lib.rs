//! Vantage Physics - Physics world and collision probing using rapier3d
//!
//! Provides the rapier-backed world, the [`PhysicsBackend`] seam the
//! controllers use, and the sphere collision detector.

mod backend;
mod sphere_detector;

pub use backend::{BodyHandle, PhysicsBackend, RayHit};
pub use sphere_detector::{detection_distance, SphereCollisionDetector};

use glam::{Quat, Vec3};
use nalgebra::{Isometry3, Quaternion, Translation3, Unit, UnitQuaternion};
use parking_lot::Mutex;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Physics world configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
    /// Linear damping for controller bodies, so pushes die out quickly
    pub body_damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
            body_damping: 10.0,
        }
    }
}

/// A collision that started during the last step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionStart {
    /// Body owning the first collider (`None` for static geometry)
    pub first: Option<BodyHandle>,
    /// Body owning the second collider (`None` for static geometry)
    pub second: Option<BodyHandle>,
}

impl CollisionStart {
    /// Whether the given body took part in this collision
    pub fn involves(&self, body: BodyHandle) -> bool {
        self.first == Some(body) || self.second == Some(body)
    }
}

/// Collects collision-start events while the pipeline steps
#[derive(Default)]
struct CollisionLog {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for CollisionLog {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(first, second, _) = event {
            self.started.lock().push((first, second));
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,
    /// Collision events from the last step
    collisions: CollisionLog,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            collisions: CollisionLog::default(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collisions,
        );

        // Update query pipeline after physics step
        self.update_query_pipeline();
    }

    /// Refresh the query pipeline so raycasts see newly added colliders
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Take the collisions that started since the last call
    pub fn drain_collisions(&mut self) -> Vec<CollisionStart> {
        let started = std::mem::take(&mut *self.collisions.started.lock());
        started
            .into_iter()
            .map(|(first, second)| CollisionStart {
                first: self.collider_parent(first),
                second: self.collider_parent(second),
            })
            .collect()
    }

    fn collider_parent(&self, handle: ColliderHandle) -> Option<BodyHandle> {
        self.collider_set.get(handle).and_then(|collider| collider.parent())
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a dynamic rigid body with a collider
    pub fn add_dynamic_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Remove a rigid body and its colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Builder for a controller body: no gravity, no physics-driven rotation, heavy damping
    fn controller_body(&self, position: Vec3, rotation: Quat) -> RigidBody {
        RigidBodyBuilder::dynamic()
            .position(to_isometry(position, rotation))
            .gravity_scale(0.0)
            .lock_rotations()
            .linear_damping(self.config.body_damping)
            .build()
    }

    /// Spawn a sphere body driven by a controller
    pub fn spawn_sphere(&mut self, position: Vec3, radius: f32) -> BodyHandle {
        let body = self.controller_body(position, Quat::IDENTITY);
        let collider = ColliderBuilder::ball(radius)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.add_dynamic_body(body, collider).0
    }

    /// Spawn an upright capsule body driven by a controller
    pub fn spawn_capsule(
        &mut self,
        position: Vec3,
        rotation: Quat,
        radius: f32,
        height: f32,
    ) -> BodyHandle {
        let half_height = (height / 2.0 - radius).max(0.01);
        let body = self.controller_body(position, rotation);
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .friction(0.0)
            .restitution(0.0)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.add_dynamic_body(body, collider).0
    }

    /// Cast a ray with an explicit query filter
    pub fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
            .map(|(handle, toi)| RayHit {
                distance: toi,
                body: self.collider_parent(handle),
            })
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBackend for PhysicsWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: Option<BodyHandle>,
    ) -> Option<RayHit> {
        // Unit direction keeps the time of impact in world units
        let direction = direction.try_normalize()?;
        let filter = match ignore {
            Some(body) => QueryFilter::default().exclude_rigid_body(body),
            None => QueryFilter::default(),
        };
        self.cast_ray(origin, direction, max_distance, filter)
    }

    fn body_position(&self, body: BodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(body).map(|rb| {
            let t = rb.translation();
            Vec3::new(t.x, t.y, t.z)
        })
    }

    fn body_rotation(&self, body: BodyHandle) -> Option<Quat> {
        self.rigid_body_set.get(body).map(|rb| {
            let q = &rb.rotation().coords;
            Quat::from_xyzw(q.x, q.y, q.z, q.w)
        })
    }

    fn move_body(&mut self, body: BodyHandle, position: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body) {
            rb.set_translation(vector![position.x, position.y, position.z], true);
        }
    }

    fn halt_body(&mut self, body: BodyHandle) {
        if let Some(rb) = self.rigid_body_set.get_mut(body) {
            rb.set_linvel(vector![0.0, 0.0, 0.0], true);
            rb.set_angvel(vector![0.0, 0.0, 0.0], true);
        }
    }
}

fn to_isometry(position: Vec3, rotation: Quat) -> Isometry3<Real> {
    Isometry3::from_parts(
        Translation3::new(position.x, position.y, position.z),
        UnitQuaternion::from_quaternion(Quaternion::new(
            rotation.w, rotation.x, rotation.y, rotation.z,
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.config.gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn test_ground_creation() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        assert!(world.get_collider(ground).is_some());
    }

    #[test]
    fn test_raycast() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world.update_query_pipeline();

        let hit = world.raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -2.0, 0.0), 100.0, None);
        let hit = hit.expect("ray should hit the ground");
        assert!((hit.distance - 10.0).abs() < 1e-4);
        assert_eq!(hit.body, None);

        // Zero directions never hit
        assert!(world.raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, 100.0, None).is_none());
    }

    #[test]
    fn test_raycast_ignores_own_body() {
        let mut world = PhysicsWorld::new();
        let body = world.spawn_sphere(Vec3::ZERO, 1.0);
        world.update_query_pipeline();

        let hit = world.raycast(Vec3::ZERO, Vec3::X, 5.0, None).expect("starts inside the sphere");
        assert_eq!(hit.body, Some(body));
        assert!(world.raycast(Vec3::ZERO, Vec3::X, 5.0, Some(body)).is_none());
    }

    #[test]
    fn test_body_pose_and_relocation() {
        let mut world = PhysicsWorld::new();
        let rotation = Quat::from_rotation_y(std::f32::consts::PI);
        let body = world.spawn_capsule(Vec3::new(1.0, 2.0, 3.0), rotation, 0.5, 2.0);

        assert!(world.body_position(body).unwrap().abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
        let read = world.body_rotation(body).unwrap();
        assert!(read.abs_diff_eq(rotation, 1e-5) || read.abs_diff_eq(-rotation, 1e-5));

        world.move_body(body, Vec3::new(4.0, 0.0, 0.0));
        assert!(world.body_position(body).unwrap().abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));

        world.remove_rigid_body(body);
        assert!(world.body_position(body).is_none());
    }

    #[test]
    fn test_collision_events_and_halt() {
        let mut world = PhysicsWorld::new();
        world.create_static_box(Vec3::splat(0.5), Vec3::new(1.5, 0.0, 0.0));
        let body = world.spawn_sphere(Vec3::ZERO, 0.5);
        if let Some(rb) = world.rigid_body_set.get_mut(body) {
            rb.set_linvel(vector![20.0, 0.0, 0.0], true);
        }

        let mut collisions = Vec::new();
        for _ in 0..60 {
            world.step();
            collisions.extend(world.drain_collisions());
        }
        assert!(collisions.iter().any(|c| c.involves(body)));

        world.halt_body(body);
        let rb = world.get_rigid_body(body).unwrap();
        assert_eq!(rb.linvel().norm(), 0.0);
        assert_eq!(rb.angvel().norm(), 0.0);
    }
}

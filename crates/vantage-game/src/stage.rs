//! The running scene: physics world plus the controllers acting on it

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vantage_core::Transform;
use vantage_physics::{PhysicsBackend, PhysicsConfig, PhysicsWorld};

use crate::camera::{FreeCamera, FreeCameraConfig, OrbitCamera, OrbitConfig};
use crate::input::InputSnapshot;
use crate::role::{RoleMovement, RoleMovementConfig};
use crate::scene::{BodySizes, SceneError, SceneLayout, CAMERA, ROLE};

/// Which controller drives the camera body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    #[default]
    Orbit,
    Free,
}

/// Everything needed to assemble a stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub camera_mode: CameraMode,
    pub physics: PhysicsConfig,
    pub orbit: OrbitConfig,
    pub free_camera: FreeCameraConfig,
    pub role: RoleMovementConfig,
    pub layout: SceneLayout,
}

/// The active camera controller
pub enum StageCamera {
    Orbit(OrbitCamera),
    Free(FreeCamera),
}

impl StageCamera {
    /// Camera pose, if the camera body exists
    pub fn transform(&self, backend: &impl PhysicsBackend) -> Option<Transform> {
        match self {
            Self::Orbit(camera) => camera.transform(backend),
            Self::Free(camera) => camera.transform(backend),
        }
    }
}

/// Physics world, role and camera stepped together each frame
pub struct Stage {
    pub world: PhysicsWorld,
    pub camera: StageCamera,
    pub role: RoleMovement,
    frame: u64,
}

impl Stage {
    /// Build the scene and attach the controllers to its bodies
    pub fn new(config: StageConfig) -> Result<Self, SceneError> {
        let mut world = PhysicsWorld::with_config(config.physics);
        let camera_radius = match config.camera_mode {
            CameraMode::Orbit => config.orbit.collision_radius,
            CameraMode::Free => config.free_camera.collision_radius,
        };
        let handles = config.layout.build(
            &mut world,
            BodySizes {
                role_radius: config.role.radius,
                role_height: config.role.height,
                camera_radius,
            },
        );

        let role_body = handles.body(ROLE)?;
        let camera_body = handles.body(CAMERA)?;

        let camera = match config.camera_mode {
            CameraMode::Orbit => StageCamera::Orbit(OrbitCamera::new(config.orbit, camera_body, role_body)),
            CameraMode::Free => {
                let camera = FreeCamera::new(config.free_camera, camera_body, &world)
                    .ok_or_else(|| SceneError::NotFound(CAMERA.to_string()))?;
                StageCamera::Free(camera)
            }
        };
        info!("Stage ready with {:?} camera", config.camera_mode);

        Ok(Self {
            world,
            camera,
            role: RoleMovement::new(config.role, role_body),
            frame: 0,
        })
    }

    /// Run one frame: controllers first, then physics, then collision reactions
    pub fn tick(&mut self, snapshot: &InputSnapshot, dt: f32) {
        self.role.update(&mut self.world, snapshot, dt);
        match &mut self.camera {
            StageCamera::Orbit(camera) => camera.update(&mut self.world, snapshot, dt),
            StageCamera::Free(camera) => camera.update(&mut self.world, snapshot, dt),
        }

        self.world.step();

        for collision in self.world.drain_collisions() {
            self.role.handle_collision(&mut self.world, &collision);
            if let StageCamera::Orbit(camera) = &self.camera {
                camera.handle_collision(&collision);
            }
        }

        self.frame += 1;
        debug!("Frame {} done", self.frame);
    }

    /// Frames run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current role position
    pub fn role_position(&self) -> Option<Vec3> {
        self.world.body_position(self.role.body())
    }

    /// Current camera pose
    pub fn camera_transform(&self) -> Option<Transform> {
        self.camera.transform(&self.world)
    }
}

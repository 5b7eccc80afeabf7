//! Scene layout for the house the role walks around in
//!
//! Objects are looked up by name here, once, while the scene is built. The
//! controllers only ever see the resulting handles.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::info;
use vantage_physics::{BodyHandle, PhysicsWorld};

/// Name of the role body
pub const ROLE: &str = "Role";
/// Name of the camera body
pub const CAMERA: &str = "Camera";
/// Name of the floor
pub const PLANE: &str = "Plane";

/// Errors from resolving scene objects
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("scene object not found: {0}")]
    NotFound(String),

    #[error("scene object '{0}' is static geometry, not a body")]
    NotABody(String),
}

/// What a named scene object is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneObject {
    /// A controller-driven body
    Body(BodyHandle),
    /// Static geometry
    Static,
}

/// A static wall of the house
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallLayout {
    pub name: String,
    pub half_extents: Vec3,
    pub position: Vec3,
}

/// Placement of everything in the scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneLayout {
    /// Height of the floor plane
    pub floor_y: f32,
    /// Role center at startup
    pub role_spawn: Vec3,
    /// Role heading at startup, radians around world up
    pub role_heading: f32,
    /// Camera position at startup
    pub camera_spawn: Vec3,
    /// Walls around the floor
    pub walls: Vec<WallLayout>,
}

impl Default for SceneLayout {
    fn default() -> Self {
        let wall = |name: &str, half_extents: Vec3, position: Vec3| WallLayout {
            name: name.to_string(),
            half_extents,
            position,
        };
        let along_z = Vec3::new(0.5, 3.0, 30.0);
        let along_x = Vec3::new(30.0, 3.0, 0.5);

        Self {
            floor_y: -2.5,
            role_spawn: Vec3::new(0.0, 1.05, 0.0),
            role_heading: 0.0,
            camera_spawn: Vec3::new(0.0, 1.05, 20.0),
            walls: vec![
                wall("Wall_X1", along_z, Vec3::new(-30.0, 3.0, 0.0)),
                wall("Wall_X2", along_z, Vec3::new(30.0, 3.0, 0.0)),
                wall("Wall_Z1", along_x, Vec3::new(0.0, 3.0, -30.0)),
                wall("Wall_Z2", along_x, Vec3::new(0.0, 3.0, 30.0)),
            ],
        }
    }
}

/// Sizes of the controller bodies
#[derive(Debug, Clone, Copy)]
pub struct BodySizes {
    pub role_radius: f32,
    pub role_height: f32,
    pub camera_radius: f32,
}

/// Handles of a built scene, by name
#[derive(Debug, Clone, Default)]
pub struct SceneHandles {
    objects: HashMap<String, SceneObject>,
}

impl SceneHandles {
    /// Look up any named object
    pub fn get(&self, name: &str) -> Result<SceneObject, SceneError> {
        self.objects
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Look up a named body
    pub fn body(&self, name: &str) -> Result<BodyHandle, SceneError> {
        match self.get(name)? {
            SceneObject::Body(handle) => Ok(handle),
            SceneObject::Static => Err(SceneError::NotABody(name.to_string())),
        }
    }

    /// Number of named objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing was built
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl SceneLayout {
    /// Put the layout into a physics world
    pub fn build(&self, world: &mut PhysicsWorld, sizes: BodySizes) -> SceneHandles {
        let mut objects = HashMap::new();

        world.create_ground(self.floor_y);
        objects.insert(PLANE.to_string(), SceneObject::Static);

        for wall in &self.walls {
            world.create_static_box(wall.half_extents, wall.position);
            objects.insert(wall.name.clone(), SceneObject::Static);
        }

        let role = world.spawn_capsule(
            self.role_spawn,
            Quat::from_rotation_y(self.role_heading),
            sizes.role_radius,
            sizes.role_height,
        );
        objects.insert(ROLE.to_string(), SceneObject::Body(role));

        let camera = world.spawn_sphere(self.camera_spawn, sizes.camera_radius);
        objects.insert(CAMERA.to_string(), SceneObject::Body(camera));

        world.update_query_pipeline();
        info!("Scene built with {} walls", self.walls.len());

        SceneHandles { objects }
    }
}

#[cfg(test)]
mod tests {
    use vantage_physics::PhysicsBackend;

    use super::*;

    fn sizes() -> BodySizes {
        BodySizes {
            role_radius: 1.0,
            role_height: 1.2,
            camera_radius: 3.0,
        }
    }

    #[test]
    fn test_build_registers_objects() {
        let mut world = PhysicsWorld::new();
        let layout = SceneLayout::default();
        let handles = layout.build(&mut world, sizes());

        assert_eq!(handles.len(), 7);
        let role = handles.body(ROLE).unwrap();
        let camera = handles.body(CAMERA).unwrap();
        assert_eq!(world.body_position(role), Some(layout.role_spawn));
        assert_eq!(world.body_position(camera), Some(layout.camera_spawn));
        assert_eq!(handles.get("Wall_Z2"), Ok(SceneObject::Static));
    }

    #[test]
    fn test_lookup_errors() {
        let mut world = PhysicsWorld::new();
        let handles = SceneLayout::default().build(&mut world, sizes());

        assert_eq!(handles.body("Ghost"), Err(SceneError::NotFound("Ghost".to_string())));
        assert_eq!(handles.body(PLANE), Err(SceneError::NotABody(PLANE.to_string())));
        assert_eq!(
            SceneError::NotFound("Ghost".to_string()).to_string(),
            "scene object not found: Ghost"
        );
    }

    #[test]
    fn test_walls_block_rays() {
        let mut world = PhysicsWorld::new();
        SceneLayout::default().build(&mut world, sizes());

        let hit = world.raycast(Vec3::new(0.0, 1.0, 5.0), Vec3::X, 100.0, None).unwrap();
        assert!((hit.distance - 29.5).abs() < 1e-3);
        assert_eq!(hit.body, None);
    }
}

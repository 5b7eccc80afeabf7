//! Vantage Game - Camera and role controllers
//!
//! Input collection, the orbit and free cameras, grounded role movement,
//! and the stage that steps them against the physics world.

pub mod camera;
pub mod input;
pub mod role;
pub mod scene;
pub mod stage;

pub use camera::{FreeCamera, FreeCameraConfig, OrbitCamera, OrbitConfig, OrbitState};
pub use input::{ControlIntent, ControlScheme, InputCollector, InputSnapshot, KeyboardGesture, TouchGesture};
pub use role::{RoleMovement, RoleMovementConfig};
pub use scene::{SceneError, SceneHandles, SceneLayout};
pub use stage::{CameraMode, Stage, StageCamera, StageConfig};

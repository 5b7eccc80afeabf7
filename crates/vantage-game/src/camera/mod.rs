//! Camera system module
//!
//! Provides an obstacle-aware orbit camera that follows a target and a
//! free-flying camera that moves through the sphere collision detector.

mod config;
mod free;
mod orbit;

pub use config::{FreeCameraConfig, OrbitConfig};
pub use free::FreeCamera;
pub use orbit::{OrbitCamera, OrbitState};

//! Camera configuration

use serde::{Deserialize, Serialize};

/// Orbit camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitConfig {
    /// Closest the camera may be pulled in after a blocked rotation
    pub min_radius: f32,
    /// Farthest the camera may orbit
    pub max_radius: f32,
    /// Orbit radius at startup
    pub initial_radius: f32,
    /// Length of the obstacle probe toward a new camera position
    pub probe_distance: f32,
    /// Collision radius of the camera body
    pub collision_radius: f32,
    /// Rotation speed for arrow keys (radians per second at full axis)
    pub keyboard_speed: f32,
    /// Rotation speed and sensitivity for single-finger swipes
    pub touch_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            min_radius: 10.0,
            max_radius: 40.0,
            initial_radius: 20.0,
            probe_distance: 5.0,
            collision_radius: 3.0,
            keyboard_speed: 20.0,
            touch_speed: 2.0,
        }
    }
}

/// Free-flying camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeCameraConfig {
    /// Collision radius of the camera body
    pub collision_radius: f32,
    /// Movement speed in meters per second
    pub move_speed: f32,
    /// Multiplier on keyboard movement input while shift is held
    pub sprint_multiplier: f32,
    /// Fixed timestep used for movement probes
    pub move_timestep: f32,
    /// Rotation speed in degrees per second per unit of input
    pub rotation_speed: f32,
    /// Minimum pitch angle in degrees
    pub pitch_min: f32,
    /// Maximum pitch angle in degrees
    pub pitch_max: f32,
    /// Field of view at startup, in degrees
    pub initial_fov: f32,
    /// Narrowest field of view in degrees
    pub fov_min: f32,
    /// Widest field of view in degrees
    pub fov_max: f32,
    /// Field of view change per unit of keyboard zoom input
    pub keyboard_zoom_sensitivity: f32,
    /// Sensitivity of single-finger swipe rotation
    pub touch_rotation_sensitivity: f32,
    /// Sensitivity of hold-and-swipe movement
    pub touch_move_sensitivity: f32,
    /// Sensitivity of pinch zoom
    pub touch_zoom_sensitivity: f32,
}

impl Default for FreeCameraConfig {
    fn default() -> Self {
        Self {
            collision_radius: 2.0,
            move_speed: 20.0,
            sprint_multiplier: 1.5,
            move_timestep: 0.02,
            rotation_speed: 20.0,
            pitch_min: -80.0,
            pitch_max: 180.0,
            initial_fov: 60.0,
            fov_min: 15.0,
            fov_max: 90.0,
            keyboard_zoom_sensitivity: 4.0,
            touch_rotation_sensitivity: 0.2,
            touch_move_sensitivity: 2.0,
            touch_zoom_sensitivity: 0.01,
        }
    }
}

//! Role movement configuration and constants

use serde::{Deserialize, Serialize};

/// Role movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleMovementConfig {
    /// Capsule radius
    pub radius: f32,
    /// Capsule height
    pub height: f32,
    /// Extra reach of the forward probe beyond one step and the radius
    pub probe_margin: f32,
    /// Movement speed while shift is held, in meters per second
    pub keyboard_speed: f32,
    /// Movement speed and sensitivity for two-finger hold-and-swipe
    pub touch_speed: f32,
}

impl Default for RoleMovementConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 1.2,
            probe_margin: 2.0,
            keyboard_speed: 20.0,
            touch_speed: 3.0,
        }
    }
}

impl RoleMovementConfig {
    /// Length of the forward probe for one step at `speed`
    pub fn probe_distance(&self, speed: f32, dt: f32) -> f32 {
        speed * dt + self.radius + self.probe_margin
    }
}

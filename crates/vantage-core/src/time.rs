//! Frame timing
//!
//! Every controller update happens once per frame with the delta produced here.

use serde::{Deserialize, Serialize};

/// Frame clock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Largest delta accepted for a single frame (avoids huge jumps after stalls)
    pub max_delta_time: f32,
    /// Time scale multiplier
    pub time_scale: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            max_delta_time: 0.1,
            time_scale: 1.0,
        }
    }
}

/// Per-frame delta time and frame counter
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Configuration
    pub config: TimeConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
}

impl FrameClock {
    /// Create a new frame clock with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance by the raw delta from the previous frame, returning the frame delta
    pub fn tick(&mut self, raw_delta: f32) -> f32 {
        self.delta_time = raw_delta.clamp(0.0, self.config.max_delta_time) * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.frame_count += 1;
        self.delta_time
    }
}

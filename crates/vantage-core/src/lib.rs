//! Vantage Core - Shared types for the Vantage scene controllers
//!
//! This crate provides the foundational types used by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - Transform with look-at orientation
//! - Angle wrapping and orbit helpers
//! - Frame clock for per-frame delta time

pub mod math;
pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use math::{orbit_offset, orbit_up, wrap_angle};
pub use time::{FrameClock, TimeConfig};
pub use types::Transform;

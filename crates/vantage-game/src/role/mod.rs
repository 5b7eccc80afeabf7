//! Role module
//!
//! Grounded movement for the character the orbit camera follows.

mod config;
mod movement;

pub use config::RoleMovementConfig;
pub use movement::{resolve_movement, RoleMovement};

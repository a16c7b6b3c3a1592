//! Circle Arena - bouncing circles in a bounded 2D arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, world tick)
//! - `settings`: Data-driven configuration loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Reference frame rate the per-tick factors (friction) are tuned for
    pub const REFERENCE_HZ: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / REFERENCE_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will account for (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Window defaults; the arena is the window inset by the margin
    pub const WINDOW_WIDTH: f32 = 1600.0;
    pub const WINDOW_HEIGHT: f32 = 900.0;
    pub const BOUNDARY_MARGIN: f32 = 50.0;

    /// Circle defaults
    pub const CIRCLE_RADIUS: f32 = 15.0;
    pub const INITIAL_CIRCLES: usize = 10;
    pub const MAX_CIRCLES: usize = 10_000;
    /// Seconds between spawns while the spawn input is held (50/s)
    pub const SPAWN_DELAY: f32 = 0.02;
    /// Random initial speed range (pixels/s)
    pub const MIN_SPEED: f32 = 20.0;
    pub const MAX_SPEED: f32 = 40.0;
    /// Per-tick velocity retention at the reference rate (2% loss per tick)
    pub const FRICTION: f32 = 0.98;
    /// Wall restitution (1.0 = perfect reflection)
    pub const RESTITUTION: f32 = 1.0;

    /// Steering
    pub const THRUST_ACCEL: f32 = 600.0;
    /// Degrees per second
    pub const TURN_RATE: f32 = 180.0;

    /// Health decoration
    pub const MAX_HEALTH: f32 = 50.0;
    /// Health lost per second
    pub const HEALTH_DRAIN_RATE: f32 = 1.0;
    /// Positions kept in a circle's trail
    pub const TRAIL_LENGTH: usize = 5;

    /// Food squares are 1.5x the circle radius on a side
    pub const FOOD_SIZE: f32 = CIRCLE_RADIUS * 1.5;
    pub const FOOD_MIN: usize = 5;
    pub const FOOD_MAX: usize = 50;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

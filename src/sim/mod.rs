//! Deterministic simulation module
//!
//! All physics and world logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by index)
//! - No rendering or platform dependencies

pub mod body;
pub mod bounds;
pub mod clock;
pub mod collision;
pub mod state;
pub mod step;
pub mod tick;

pub use body::{Body, Kinematic};
pub use bounds::{Bounds, clamp_inside, contain};
pub use clock::FixedStep;
pub use collision::{Contact, broad_phase, closing_speed, collide_pair, narrow_phase, resolve};
pub use state::{Circle, Food, TrailPoint, World};
pub use step::{InitialVelocity, SpawnConfig, StepParams, StepReport, initialize, step};
pub use tick::{TickInput, WorldStats, tick};

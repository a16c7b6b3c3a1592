//! Kinematic bodies
//!
//! The unit the physics step operates on. Anything carrying a [`Body`] can be
//! stepped by implementing [`Kinematic`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A circular body: position, velocity and a fixed radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    /// Always positive, never changes after creation
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        debug_assert!(radius > 0.0, "body radius must be positive, got {radius}");
        Self { pos, vel, radius }
    }

    /// A body at rest
    pub fn at_rest(pos: Vec2, radius: f32) -> Self {
        Self::new(pos, Vec2::ZERO, radius)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Whether `point` lies inside or on the body's edge
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= self.radius * self.radius
    }

    /// Kinetic energy with unit mass
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.vel.length_squared()
    }
}

/// Access to the kinematic state of an entity
///
/// The physics step only ever touches the [`Body`]; decorations layered
/// around it (facing, health, trail) are left alone.
pub trait Kinematic {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;
}

impl Kinematic for Body {
    #[inline]
    fn body(&self) -> &Body {
        self
    }

    #[inline]
    fn body_mut(&mut self) -> &mut Body {
        self
    }
}

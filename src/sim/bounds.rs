//! Arena bounds and wall containment

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;

/// Axis-aligned arena rectangle in world space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Checked constructor: `None` unless `left < right` and `top < bottom`
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Option<Self> {
        let bounds = Self {
            left,
            right,
            top,
            bottom,
        };
        bounds.is_valid().then_some(bounds)
    }

    /// A `width` x `height` area inset by `margin` on every side
    pub fn inset(width: f32, height: f32, margin: f32) -> Option<Self> {
        Self::new(margin, width - margin, margin, height - margin)
    }

    pub fn is_valid(&self) -> bool {
        // Also rejects NaN edges
        self.left < self.right && self.top < self.bottom
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Inclusive point test
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Whether a circle lies fully inside, within `tolerance`
    pub fn contains_circle(&self, center: Vec2, radius: f32, tolerance: f32) -> bool {
        center.x - radius >= self.left - tolerance
            && center.x + radius <= self.right + tolerance
            && center.y - radius >= self.top - tolerance
            && center.y + radius <= self.bottom + tolerance
    }
}

/// Keep a body inside the arena, bouncing it off any wall it touches
///
/// Each wall is handled independently, so a corner hit corrects both axes.
/// The position is clamped so the edge sits on the wall; the velocity
/// component pointing into the wall is flipped and scaled by `restitution`.
/// Returns whether any wall was touched.
pub fn contain(body: &mut Body, bounds: &Bounds, restitution: f32) -> bool {
    debug_assert!(bounds.is_valid(), "malformed arena bounds: {bounds:?}");
    let r = body.radius;
    let mut touched = false;

    if body.pos.x <= bounds.left + r {
        body.pos.x = bounds.left + r;
        if body.vel.x < 0.0 {
            body.vel.x = -body.vel.x * restitution;
        }
        touched = true;
    }
    if body.pos.x >= bounds.right - r {
        body.pos.x = bounds.right - r;
        if body.vel.x > 0.0 {
            body.vel.x = -body.vel.x * restitution;
        }
        touched = true;
    }
    if body.pos.y <= bounds.top + r {
        body.pos.y = bounds.top + r;
        if body.vel.y < 0.0 {
            body.vel.y = -body.vel.y * restitution;
        }
        touched = true;
    }
    if body.pos.y >= bounds.bottom - r {
        body.pos.y = bounds.bottom - r;
        if body.vel.y > 0.0 {
            body.vel.y = -body.vel.y * restitution;
        }
        touched = true;
    }

    touched
}

/// Position-only clamp, leaving velocity untouched
///
/// Used after pair resolution, which may push a body back through a wall.
pub fn clamp_inside(body: &mut Body, bounds: &Bounds) {
    let r = body.radius;
    // max/min rather than clamp: clamp panics when the body is wider than the arena
    body.pos.x = body.pos.x.max(bounds.left + r).min(bounds.right - r);
    body.pos.y = body.pos.y.max(bounds.top + r).min(bounds.bottom - r);
}

//! Circle-circle collision detection and response
//!
//! Broad phase is an AABB reject, narrow phase computes the exact contact,
//! and the response is an equal-mass elastic impulse followed by
//! de-penetration along the contact normal.

use glam::Vec2;

use super::body::Body;

/// Normal used when two centres coincide exactly
pub const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Contact between two overlapping bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Distance between centres
    pub distance: f32,
    /// Unit normal pointing from `b` toward `a`
    pub normal: Vec2,
}

/// Cheap reject: do the radius-sized bounding boxes overlap?
///
/// Never rejects a pair the narrow phase would accept.
#[inline]
pub fn broad_phase(a: &Body, b: &Body) -> bool {
    let reach = a.radius + b.radius;
    let d = a.pos - b.pos;
    d.x.abs() <= reach && d.y.abs() <= reach
}

/// Exact overlap test, `None` when the circles do not intersect
pub fn narrow_phase(a: &Body, b: &Body) -> Option<Contact> {
    let offset = a.pos - b.pos;
    let distance = offset.length();

    if distance >= a.radius + b.radius {
        return None;
    }

    let normal = if distance > 0.0 {
        offset / distance
    } else {
        FALLBACK_NORMAL
    };

    Some(Contact { distance, normal })
}

/// Relative velocity of `a` with respect to `b` along the contact normal
///
/// Positive means the pair is already moving apart.
#[inline]
pub fn closing_speed(a: &Body, b: &Body, normal: Vec2) -> f32 {
    (a.vel - b.vel).dot(normal)
}

/// Apply the elastic response for a detected contact
///
/// Separating pairs are left alone so bodies still overlapping from an
/// earlier step can drift apart instead of being pulled back together.
/// Otherwise the velocities exchange their normal components (equal masses)
/// and each body is pushed out by half the overlap. Both parts use the
/// pre-correction normal. Returns whether a response was applied.
pub fn resolve(a: &mut Body, b: &mut Body, contact: &Contact) -> bool {
    let n = contact.normal;
    let speed = closing_speed(a, b, n);
    if speed > 0.0 {
        return false;
    }

    a.vel -= speed * n;
    b.vel += speed * n;

    // Rounding can leave a hair of negative overlap
    let overlap = ((a.radius + b.radius - contact.distance) * 0.5).max(0.0);
    a.pos += overlap * n;
    b.pos -= overlap * n;

    true
}

/// Run broad phase, narrow phase and response for one pair
///
/// Returns whether a response was applied.
pub fn collide_pair(a: &mut Body, b: &mut Body) -> bool {
    if !broad_phase(a, b) {
        return false;
    }
    match narrow_phase(a, b) {
        Some(contact) => resolve(a, b, &contact),
        None => false,
    }
}

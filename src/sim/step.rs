//! Physics step and body initialization
//!
//! The two entry points the rest of the program drives:
//! - [`initialize`] scatters bodies across the arena (the only randomness)
//! - [`step`] advances every body by one tick

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Kinematic;
use super::bounds::{Bounds, clamp_inside, contain};
use super::collision::collide_pair;
use crate::consts::{FRICTION, REFERENCE_HZ, RESTITUTION};
use crate::direction;

/// Tunables for a physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepParams {
    /// Velocity retained per tick at the reference rate (1.0 = no drag)
    pub friction: f32,
    /// Wall bounce factor (1.0 = perfect reflection)
    pub restitution: f32,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            restitution: RESTITUTION,
        }
    }
}

impl StepParams {
    /// Frictionless, perfectly elastic walls
    pub fn elastic() -> Self {
        Self {
            friction: 1.0,
            restitution: 1.0,
        }
    }

    /// Drag factor for a tick of length `dt`
    #[inline]
    fn drag(&self, dt: f32) -> f32 {
        if self.friction >= 1.0 {
            1.0
        } else {
            self.friction.powf(dt * REFERENCE_HZ)
        }
    }
}

/// Outcome counts for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub wall_contacts: usize,
    pub pair_contacts: usize,
}

/// Advance every body by one tick
///
/// 1. Integrate (`pos += vel * dt`), apply drag, bounce off walls
/// 2. Resolve every unordered pair once, in ascending index order
/// 3. Clamp positions back inside the arena (pair pushes can cross a wall)
///
/// Mutates the slice in place and never resizes it. Pair checks are O(n²).
pub fn step<B: Kinematic>(bodies: &mut [B], bounds: &Bounds, params: &StepParams, dt: f32) -> StepReport {
    debug_assert!(bounds.is_valid(), "malformed arena bounds: {bounds:?}");
    let mut report = StepReport::default();
    let drag = params.drag(dt);

    for entity in bodies.iter_mut() {
        let body = entity.body_mut();
        debug_assert!(body.radius > 0.0, "body radius must be positive");
        body.pos += body.vel * dt;
        body.vel *= drag;
        if contain(body, bounds, params.restitution) {
            report.wall_contacts += 1;
        }
    }

    for i in 0..bodies.len() {
        // Split so body i and every later body can be borrowed mutably together
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = head[i].body_mut();
        for other in tail.iter_mut() {
            if collide_pair(a, other.body_mut()) {
                report.pair_contacts += 1;
            }
        }
    }

    for entity in bodies.iter_mut() {
        clamp_inside(entity.body_mut(), bounds);
    }

    report
}

/// Initial velocity policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InitialVelocity {
    Zero,
    /// Uniform random direction, speed uniform in `[min, max]`
    Random { min: f32, max: f32 },
}

/// How freshly initialized bodies are sized and launched
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Radius range; equal ends give a fixed radius
    pub min_radius: f32,
    pub max_radius: f32,
    pub velocity: InitialVelocity,
}

impl SpawnConfig {
    /// Fixed radius, at rest
    pub fn fixed(radius: f32) -> Self {
        Self {
            min_radius: radius,
            max_radius: radius,
            velocity: InitialVelocity::Zero,
        }
    }

    fn sample_radius<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max_radius > self.min_radius {
            rng.random_range(self.min_radius..=self.max_radius)
        } else {
            self.min_radius
        }
    }
}

/// Random velocity with uniform direction and speed in `[min, max]`
pub fn random_velocity<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let speed = if max > min { rng.random_range(min..=max) } else { min };
    direction(angle) * speed
}

/// Uniform point inside `bounds` inset by `inset` on every side
///
/// Falls back to the centre on any axis too narrow for the inset.
pub fn random_point_inside<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds, inset: f32) -> Vec2 {
    let center = bounds.center();
    let (lo_x, hi_x) = (bounds.left + inset, bounds.right - inset);
    let (lo_y, hi_y) = (bounds.top + inset, bounds.bottom - inset);
    let x = if hi_x > lo_x { rng.random_range(lo_x..=hi_x) } else { center.x };
    let y = if hi_y > lo_y { rng.random_range(lo_y..=hi_y) } else { center.y };
    Vec2::new(x, y)
}

/// Scatter every body in the slice across the arena
///
/// Positions are uniform inside `bounds` inset by each body's radius, so
/// nothing starts clipped by a wall. Bodies may start overlapping each
/// other; the first steps push them apart.
pub fn initialize<B: Kinematic, R: Rng + ?Sized>(
    bodies: &mut [B],
    bounds: &Bounds,
    config: &SpawnConfig,
    rng: &mut R,
) {
    debug_assert!(bounds.is_valid(), "malformed arena bounds: {bounds:?}");
    debug_assert!(config.min_radius > 0.0, "spawn radius must be positive");

    for entity in bodies.iter_mut() {
        let body = entity.body_mut();
        body.radius = config.sample_radius(rng);
        body.pos = random_point_inside(rng, bounds, body.radius);
        body.vel = match config.velocity {
            InitialVelocity::Zero => Vec2::ZERO,
            InitialVelocity::Random { min, max } => random_velocity(rng, min, max),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::body::Body;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn arena() -> Bounds {
        Bounds::new(50.0, 1550.0, 50.0, 850.0).unwrap()
    }

    #[test]
    fn test_single_body_bounces_off_left_wall() {
        let bounds = arena();
        let mut bodies = [Body::new(Vec2::new(bounds.left + 5.0, 400.0), Vec2::new(-10.0, 0.0), 15.0)];

        let report = step(&mut bodies, &bounds, &StepParams::elastic(), SIM_DT);
        assert_eq!(report.wall_contacts, 1);
        assert!((bodies[0].pos.x - (bounds.left + 15.0)).abs() < 1e-3);
        assert!((bodies[0].vel.x - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_head_on_pair_swaps_in_step() {
        let bounds = Bounds::new(-500.0, 500.0, -500.0, 500.0).unwrap();
        let mut bodies = [
            Body::new(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0), 10.0),
            Body::new(Vec2::new(15.0, 0.0), Vec2::new(-5.0, 0.0), 10.0),
        ];

        let report = step(&mut bodies, &bounds, &StepParams::elastic(), SIM_DT);
        assert_eq!(report.pair_contacts, 1);
        assert!((bodies[0].vel - Vec2::new(-5.0, 0.0)).length() < 1e-4);
        assert!((bodies[1].vel - Vec2::new(5.0, 0.0)).length() < 1e-4);
        assert!(bodies[0].pos.distance(bodies[1].pos) >= 20.0 - 1e-3);
    }

    #[test]
    fn test_friction_decays_speed() {
        let bounds = arena();
        let mut bodies = [Body::new(bounds.center(), Vec2::new(100.0, 0.0), 10.0)];
        let params = StepParams {
            friction: 0.98,
            restitution: 1.0,
        };

        step(&mut bodies, &bounds, &params, SIM_DT);
        assert!((bodies[0].vel.x - 98.0).abs() < 1e-3);
        // Integration happens before drag
        assert!((bodies[0].pos.x - (bounds.center().x + 100.0 * SIM_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_empty_and_single_slices() {
        let bounds = arena();
        let mut none: [Body; 0] = [];
        assert_eq!(step(&mut none, &bounds, &StepParams::default(), SIM_DT), StepReport::default());

        let mut one = [Body::at_rest(bounds.center(), 10.0)];
        let report = step(&mut one, &bounds, &StepParams::default(), SIM_DT);
        assert_eq!(report.pair_contacts, 0);
        assert_eq!(one[0].pos, bounds.center());
    }

    #[test]
    fn test_wall_push_is_clamped_after_pairs() {
        let bounds = Bounds::new(0.0, 100.0, 0.0, 100.0).unwrap();
        // Left body pinned against the wall, right body overlapping it
        let mut bodies = [
            Body::at_rest(Vec2::new(10.0, 50.0), 10.0),
            Body::new(Vec2::new(12.0, 50.0), Vec2::new(-1.0, 0.0), 10.0),
        ];

        step(&mut bodies, &bounds, &StepParams::elastic(), SIM_DT);
        for b in &bodies {
            assert!(bounds.contains_circle(b.pos, b.radius, 1e-3));
        }
    }

    #[test]
    fn test_initialize_places_bodies_inside() {
        let bounds = arena();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut bodies = vec![Body::at_rest(Vec2::ZERO, 1.0); 200];
        let config = SpawnConfig {
            min_radius: 5.0,
            max_radius: 25.0,
            velocity: InitialVelocity::Random { min: 20.0, max: 40.0 },
        };

        initialize(&mut bodies, &bounds, &config, &mut rng);
        for b in &bodies {
            assert!(bounds.contains_circle(b.pos, b.radius, 1e-3));
            assert!((5.0..=25.0).contains(&b.radius));
            let speed = b.speed();
            assert!((20.0 - 1e-3..=40.0 + 1e-3).contains(&speed));
        }
    }

    #[test]
    fn test_initialize_fixed_at_rest() {
        let bounds = arena();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bodies = vec![Body::at_rest(Vec2::ZERO, 1.0); 10];

        initialize(&mut bodies, &bounds, &SpawnConfig::fixed(15.0), &mut rng);
        assert!(bodies.iter().all(|b| b.radius == 15.0 && b.vel == Vec2::ZERO));
    }

    #[test]
    fn test_step_is_deterministic() {
        let bounds = arena();
        let config = SpawnConfig {
            min_radius: 8.0,
            max_radius: 20.0,
            velocity: InitialVelocity::Random { min: 100.0, max: 400.0 },
        };
        let run = || {
            let mut rng = Pcg32::seed_from_u64(42);
            let mut bodies = vec![Body::at_rest(Vec2::ZERO, 1.0); 60];
            initialize(&mut bodies, &bounds, &config, &mut rng);
            for _ in 0..300 {
                step(&mut bodies, &bounds, &StepParams::default(), SIM_DT);
            }
            bodies
        };

        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn prop_step_keeps_bodies_contained(
            seed in any::<u64>(),
            count in 1usize..40,
            restitution in 0.5f32..=1.0,
        ) {
            let bounds = Bounds::new(0.0, 400.0, 0.0, 300.0).unwrap();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut bodies = vec![Body::at_rest(Vec2::ZERO, 1.0); count];
            let config = SpawnConfig {
                min_radius: 4.0,
                max_radius: 16.0,
                velocity: InitialVelocity::Random { min: 0.0, max: 600.0 },
            };
            initialize(&mut bodies, &bounds, &config, &mut rng);
            let params = StepParams { friction: 0.99, restitution };

            for _ in 0..60 {
                step(&mut bodies, &bounds, &params, SIM_DT);
                for b in &bodies {
                    prop_assert!(bounds.contains_circle(b.pos, b.radius, 1e-3));
                }
            }
        }
    }
}

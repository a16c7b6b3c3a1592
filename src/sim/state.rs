//! World state: circles, food and everything a tick needs
//!
//! Circles wrap a [`Body`] with decorations (facing, health, trail) that the
//! physics step never looks at.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Kinematic};
use super::bounds::Bounds;
use super::step::{initialize, random_point_inside};
use crate::consts::TRAIL_LENGTH;
use crate::settings::{Settings, SettingsError};
use crate::{direction, wrap_angle};

/// Trail point for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// A circle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub body: Body,
    /// Facing angle in radians, [0, 2π). Independent of the direction of travel.
    pub facing: f32,
    pub health: f32,
    /// Recent positions, newest first
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Circle {
    pub fn new(body: Body, facing: f32, health: f32) -> Self {
        Self {
            body,
            facing: wrap_angle(facing),
            health,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Unit vector along the facing angle
    pub fn facing_dir(&self) -> Vec2 {
        direction(self.facing)
    }

    /// Turn by `degrees` (positive is clockwise on screen, y grows downward)
    pub fn rotate(&mut self, degrees: f32) {
        self.facing = wrap_angle(self.facing + degrees.to_radians());
    }

    /// Add `amount` pixels/s of velocity along the facing direction
    pub fn thrust(&mut self, amount: f32) {
        self.body.vel += self.facing_dir() * amount;
    }

    /// Lose health, never dropping below zero
    pub fn drain(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn feed(&mut self, max_health: f32) {
        self.health = max_health;
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.body.contains_point(point)
    }

    /// Record current position to trail (call once per tick)
    pub fn record_trail(&mut self) {
        let speed = self.body.speed();
        self.trail.insert(
            0,
            TrailPoint {
                pos: self.body.pos,
                speed,
            },
        );
        self.trail.truncate(TRAIL_LENGTH);
    }
}

impl Kinematic for Circle {
    #[inline]
    fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// A square of food; circles touching it are fed and it moves elsewhere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
}

impl Food {
    /// Food placed at a random spot fully inside `bounds`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds, size: f32) -> Self {
        let mut food = Self {
            pos: Vec2::ZERO,
            size,
        };
        food.respawn(rng, bounds);
        food
    }

    /// Move to a new random spot where the whole square fits inside `bounds`
    pub fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: &Bounds) {
        let half = self.size * 0.5;
        self.pos = random_point_inside(rng, bounds, half) - Vec2::splat(half);
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size * 0.5)
    }

    /// Inclusive on all edges
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x <= self.pos.x + self.size
            && p.y >= self.pos.y
            && p.y <= self.pos.y + self.size
    }

    /// Whether a circle reaches the square (closest-point test)
    pub fn touches_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.pos, self.pos + Vec2::splat(self.size));
        closest.distance_squared(center) <= radius * radius
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub settings: Settings,
    pub bounds: Bounds,
    /// Stepped in index order; the order is part of the determinism contract
    pub circles: Vec<Circle>,
    pub food: Vec<Food>,
    /// Index into `circles` of the circle being steered
    pub selected: Option<usize>,
    /// Seconds the spawn input has been held since the last spawn
    pub spawn_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
}

impl World {
    /// Build a world from validated settings, seeded by `settings.seed`
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let bounds = settings
            .arena_bounds()
            .ok_or_else(|| SettingsError::Invalid("arena bounds are empty".to_string()))?;
        let mut rng = Pcg32::seed_from_u64(settings.seed);

        let mut circles: Vec<Circle> = (0..settings.initial_circles)
            .map(|_| Circle::new(Body::at_rest(Vec2::ZERO, settings.min_radius), 0.0, settings.max_health))
            .collect();
        initialize(&mut circles, &bounds, &settings.spawn_config(), &mut rng);
        for circle in &mut circles {
            circle.facing = rng.random_range(0.0..std::f32::consts::TAU);
        }

        let food_count = rng.random_range(settings.food_min..=settings.food_max);
        let food = (0..food_count)
            .map(|_| Food::random(&mut rng, &bounds, settings.food_size))
            .collect();

        log::info!(
            "World created: seed {}, {} circles, {} food, arena {}x{}",
            settings.seed,
            circles.len(),
            food_count,
            bounds.width(),
            bounds.height()
        );

        let selected = if circles.is_empty() { None } else { Some(0) };

        Ok(Self {
            settings,
            bounds,
            circles,
            food,
            selected,
            spawn_timer: 0.0,
            time_ticks: 0,
            rng,
        })
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn selected_circle(&self) -> Option<&Circle> {
        self.selected.and_then(|i| self.circles.get(i))
    }

    pub fn selected_circle_mut(&mut self) -> Option<&mut Circle> {
        self.selected.and_then(|i| self.circles.get_mut(i))
    }

    /// Index of the first circle containing `point`
    pub fn circle_at(&self, point: Vec2) -> Option<usize> {
        self.circles.iter().position(|c| c.contains_point(point))
    }

    /// Add a resting circle at `pos` with a random facing
    ///
    /// Refused when at capacity or when `pos` is outside the arena.
    /// Returns the new circle's index.
    pub fn spawn_circle(&mut self, pos: Vec2) -> Option<usize> {
        if self.circles.len() >= self.settings.max_circles {
            log::debug!("Spawn refused: at capacity ({})", self.settings.max_circles);
            return None;
        }
        if !self.bounds.contains_point(pos) {
            return None;
        }

        let config = self.settings.spawn_config();
        let radius = if config.max_radius > config.min_radius {
            self.rng.random_range(config.min_radius..=config.max_radius)
        } else {
            config.min_radius
        };
        let facing = self.rng.random_range(0.0..std::f32::consts::TAU);
        self.circles.push(Circle::new(
            Body::at_rest(pos, radius),
            facing,
            self.settings.max_health,
        ));
        Some(self.circles.len() - 1)
    }

    /// Respawn the first food square under `point`, if any
    pub fn click_food(&mut self, point: Vec2) -> bool {
        let Some(idx) = self.food.iter().position(|f| f.contains_point(point)) else {
            return false;
        };
        let bounds = self.bounds;
        self.food[idx].respawn(&mut self.rng, &bounds);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_HEALTH;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn world() -> World {
        World::new(Settings {
            seed: 1234,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_world_new_populates() {
        let world = world();
        let s = &world.settings;
        assert_eq!(world.circles.len(), s.initial_circles);
        assert!((s.food_min..=s.food_max).contains(&world.food.len()));
        assert_eq!(world.selected, Some(0));
        for c in &world.circles {
            assert!(world.bounds.contains_circle(c.body.pos, c.body.radius, 1e-3));
            assert_eq!(c.body.vel, Vec2::ZERO);
            assert_eq!(c.health, MAX_HEALTH);
            assert!((0.0..std::f32::consts::TAU).contains(&c.facing));
        }
        for f in &world.food {
            assert!(world.bounds.contains_point(f.pos));
            assert!(world.bounds.contains_point(f.pos + Vec2::splat(f.size)));
        }
    }

    #[test]
    fn test_world_new_rejects_invalid_settings() {
        let result = World::new(Settings {
            restitution: 0.0,
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = world();
        let b = world();
        assert_eq!(a.circles, b.circles);
        assert_eq!(a.food, b.food);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut c = Circle::new(Body::at_rest(Vec2::ZERO, 10.0), 0.0, 1.0);
        c.rotate(-90.0);
        assert!((c.facing - 3.0 * FRAC_PI_2).abs() < 1e-5);
        c.rotate(270.0);
        assert!((c.facing - PI).abs() < 1e-4);
    }

    #[test]
    fn test_thrust_follows_facing() {
        let mut c = Circle::new(Body::at_rest(Vec2::ZERO, 10.0), FRAC_PI_2, 1.0);
        c.thrust(10.0);
        assert!(c.body.vel.x.abs() < 1e-5);
        assert!((c.body.vel.y - 10.0).abs() < 1e-5);
        c.thrust(-4.0);
        assert!((c.body.vel.y - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_health_floor_and_feed() {
        let mut c = Circle::new(Body::at_rest(Vec2::ZERO, 10.0), 0.0, 3.0);
        c.drain(5.0);
        assert_eq!(c.health, 0.0);
        c.feed(MAX_HEALTH);
        assert_eq!(c.health, MAX_HEALTH);
    }

    #[test]
    fn test_trail_keeps_newest() {
        let mut c = Circle::new(Body::at_rest(Vec2::ZERO, 10.0), 0.0, 1.0);
        for i in 0..(TRAIL_LENGTH + 3) {
            c.body.pos = Vec2::new(i as f32, 0.0);
            c.record_trail();
        }
        assert_eq!(c.trail.len(), TRAIL_LENGTH);
        assert_eq!(c.trail[0].pos.x, (TRAIL_LENGTH + 2) as f32);
        assert_eq!(c.trail[TRAIL_LENGTH - 1].pos.x, 3.0);
    }

    #[test]
    fn test_food_geometry() {
        let food = Food {
            pos: Vec2::new(100.0, 100.0),
            size: 20.0,
        };
        assert!(food.contains_point(Vec2::new(100.0, 120.0)));
        assert!(!food.contains_point(Vec2::new(99.9, 110.0)));
        assert_eq!(food.center(), Vec2::new(110.0, 110.0));

        // Edge-on and corner approaches
        assert!(food.touches_circle(Vec2::new(90.0, 110.0), 10.0));
        assert!(!food.touches_circle(Vec2::new(89.0, 110.0), 10.0));
        assert!(!food.touches_circle(Vec2::new(92.0, 92.0), 10.0));
        assert!(food.touches_circle(Vec2::new(95.0, 95.0), 10.0));
        // Centre inside
        assert!(food.touches_circle(Vec2::new(110.0, 110.0), 1.0));
    }

    #[test]
    fn test_spawn_circle_limits() {
        let mut world = World::new(Settings {
            initial_circles: 1,
            max_circles: 2,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(world.spawn_circle(Vec2::new(-10.0, -10.0)), None);
        let idx = world.spawn_circle(world.bounds.center()).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(world.circles[1].body.vel, Vec2::ZERO);
        assert_eq!(world.spawn_circle(world.bounds.center()), None);
    }

    #[test]
    fn test_circle_at_and_click_food() {
        let mut world = world();
        let c = world.circles[3].body.pos;
        assert!(world.circle_at(c).is_some());
        assert_eq!(world.circle_at(Vec2::new(-100.0, -100.0)), None);

        let before = world.food[0];
        assert!(world.click_food(before.center()));
        assert!(!world.click_food(Vec2::new(-100.0, -100.0)));
    }
}

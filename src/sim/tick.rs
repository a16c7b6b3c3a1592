//! Fixed timestep world tick
//!
//! Applies one tick of input, runs the physics step over every circle, then
//! updates the decorations (health, trail) and food.

use glam::Vec2;

use super::state::World;
use super::step::{StepReport, step};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// World-space click: respawns food under it, then selects a circle
    pub click: Option<Vec2>,
    /// Thrust along the selected circle's facing: -1, 0 or +1
    pub thrust: f32,
    /// Turn the selected circle: -1 (counter-clockwise), 0 or +1
    pub turn: f32,
    /// Spawn circles here while held
    pub spawn_at: Option<Vec2>,
}

/// Summary of the world for a debug overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldStats {
    pub time_ticks: u64,
    pub circles: usize,
    pub food: usize,
    pub selected: Option<usize>,
    pub selected_radius: f32,
    pub selected_speed: f32,
    /// Unit-mass kinetic energy summed over all circles
    pub kinetic_energy: f32,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) -> StepReport {
    // Click: food first, then selection
    if let Some(point) = input.click {
        world.click_food(point);
        world.selected = world.circle_at(point);
    }

    // Steer the selected circle
    let thrust = input.thrust.clamp(-1.0, 1.0) * world.settings.thrust_accel * dt;
    let turn = input.turn.clamp(-1.0, 1.0) * world.settings.turn_rate * dt;
    if let Some(circle) = world.selected_circle_mut() {
        if thrust != 0.0 {
            circle.thrust(thrust);
        }
        if turn != 0.0 {
            circle.rotate(turn);
        }
    }

    // Spawn while held
    match input.spawn_at {
        Some(point) => {
            world.spawn_timer += dt;
            if world.spawn_timer >= world.settings.spawn_delay {
                world.spawn_circle(point);
                world.spawn_timer = 0.0;
            }
        }
        None => world.spawn_timer = 0.0,
    }

    let bounds = world.bounds;
    let params = world.settings.step_params();
    let report = step(&mut world.circles, &bounds, &params, dt);

    let drain = world.settings.health_drain * dt;
    for circle in &mut world.circles {
        circle.drain(drain);
        circle.record_trail();
    }

    feed_circles(world);

    world.time_ticks += 1;
    report
}

/// Each food square touched by a circle feeds the first such circle and moves
fn feed_circles(world: &mut World) {
    let max_health = world.settings.max_health;
    let bounds = world.bounds;

    for i in 0..world.food.len() {
        let food = world.food[i];
        let Some(eater) = world
            .circles
            .iter()
            .position(|c| food.touches_circle(c.body.pos, c.body.radius))
        else {
            continue;
        };
        world.circles[eater].feed(max_health);
        let rng = world.rng();
        let mut moved = food;
        moved.respawn(rng, &bounds);
        world.food[i] = moved;
    }
}

impl World {
    /// Snapshot of counts and the selected circle for display
    pub fn stats(&self) -> WorldStats {
        let selected = self.selected_circle();
        WorldStats {
            time_ticks: self.time_ticks,
            circles: self.circles.len(),
            food: self.food.len(),
            selected: self.selected,
            selected_radius: selected.map_or(0.0, |c| c.body.radius),
            selected_speed: selected.map_or(0.0, |c| c.body.speed()),
            kinetic_energy: self.circles.iter().map(|c| c.body.kinetic_energy()).sum(),
        }
    }
}

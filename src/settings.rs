//! Simulation settings
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Bounds, SpawnConfig, StepParams};

pub use crate::sim::InitialVelocity;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub window_width: f32,
    pub window_height: f32,
    /// The arena is the window inset by this much on every side
    pub boundary_margin: f32,

    // === Population ===
    /// Run seed for reproducibility
    pub seed: u64,
    pub initial_circles: usize,
    /// Spawning stops at this many circles
    pub max_circles: usize,
    /// Seconds between spawns while spawning is held
    pub spawn_delay: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub initial_velocity: InitialVelocity,

    // === Physics ===
    pub friction: f32,
    pub restitution: f32,

    // === Steering ===
    /// Pixels/s² added along the facing direction
    pub thrust_accel: f32,
    /// Degrees per second
    pub turn_rate: f32,

    // === Health & food ===
    pub max_health: f32,
    /// Health lost per second
    pub health_drain: f32,
    pub food_min: usize,
    pub food_max: usize,
    pub food_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            boundary_margin: BOUNDARY_MARGIN,

            seed: 0,
            initial_circles: INITIAL_CIRCLES,
            max_circles: MAX_CIRCLES,
            spawn_delay: SPAWN_DELAY,
            min_radius: CIRCLE_RADIUS,
            max_radius: CIRCLE_RADIUS,
            initial_velocity: InitialVelocity::Zero,

            friction: FRICTION,
            restitution: RESTITUTION,

            thrust_accel: THRUST_ACCEL,
            turn_rate: TURN_RATE,

            max_health: MAX_HEALTH,
            health_drain: HEALTH_DRAIN_RATE,
            food_min: FOOD_MIN,
            food_max: FOOD_MAX,
            food_size: FOOD_SIZE,
        }
    }
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the preconditions the physics core relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        // JSON numbers past f32 range deserialize as infinity
        let mut floats = vec![
            ("window_width", self.window_width),
            ("window_height", self.window_height),
            ("boundary_margin", self.boundary_margin),
            ("spawn_delay", self.spawn_delay),
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("friction", self.friction),
            ("restitution", self.restitution),
            ("thrust_accel", self.thrust_accel),
            ("turn_rate", self.turn_rate),
            ("max_health", self.max_health),
            ("health_drain", self.health_drain),
            ("food_size", self.food_size),
        ];
        if let InitialVelocity::Random { min, max } = self.initial_velocity {
            floats.push(("initial_velocity.min", min));
            floats.push(("initial_velocity.max", max));
        }
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SettingsError::Invalid(format!("{name} must be finite, got {value}")));
        }

        let bounds = self.arena_bounds().ok_or_else(|| {
            SettingsError::Invalid(format!(
                "margin {} leaves no arena in a {}x{} window",
                self.boundary_margin, self.window_width, self.window_height
            ))
        })?;

        if !(self.min_radius > 0.0 && self.min_radius <= self.max_radius) {
            return Err(SettingsError::Invalid(format!(
                "radius range [{}, {}] must be positive and ordered",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_radius * 2.0 > bounds.width().min(bounds.height()) {
            return Err(SettingsError::Invalid(format!(
                "circles of radius {} do not fit the arena",
                self.max_radius
            )));
        }
        if let InitialVelocity::Random { min, max } = self.initial_velocity {
            if !(min >= 0.0 && min <= max) {
                return Err(SettingsError::Invalid(format!(
                    "initial speed range [{min}, {max}] must be non-negative and ordered"
                )));
            }
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "friction {} must be in (0, 1]",
                self.friction
            )));
        }
        if !(self.restitution > 0.0 && self.restitution <= 1.0) {
            return Err(SettingsError::Invalid(format!(
                "restitution {} must be in (0, 1]",
                self.restitution
            )));
        }
        if self.initial_circles > self.max_circles {
            return Err(SettingsError::Invalid(format!(
                "initial_circles {} exceeds max_circles {}",
                self.initial_circles, self.max_circles
            )));
        }
        if self.food_min > self.food_max {
            return Err(SettingsError::Invalid(format!(
                "food range [{}, {}] is not ordered",
                self.food_min, self.food_max
            )));
        }
        if !(self.food_size > 0.0 && self.food_size < bounds.width().min(bounds.height())) {
            return Err(SettingsError::Invalid(format!(
                "food size {} does not fit the arena",
                self.food_size
            )));
        }
        if !(self.spawn_delay >= 0.0 && self.max_health > 0.0 && self.health_drain >= 0.0) {
            return Err(SettingsError::Invalid(
                "spawn delay, max health and health drain must be non-negative".to_string(),
            ));
        }

        Ok(())
    }

    /// The arena: window inset by the margin (`None` if that leaves nothing)
    pub fn arena_bounds(&self) -> Option<Bounds> {
        Bounds::inset(self.window_width, self.window_height, self.boundary_margin)
    }

    pub fn step_params(&self) -> StepParams {
        StepParams {
            friction: self.friction,
            restitution: self.restitution,
        }
    }

    pub fn spawn_config(&self) -> SpawnConfig {
        SpawnConfig {
            min_radius: self.min_radius,
            max_radius: self.max_radius,
            velocity: self.initial_velocity,
        }
    }
}

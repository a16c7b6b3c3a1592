//! Fixed timestep accumulator
//!
//! Turns variable frame times into a whole number of fixed simulation ticks.

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    pub dt: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        debug_assert!(dt > 0.0, "fixed timestep must be positive");
        Self {
            dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add a frame's elapsed time and return how many ticks to run
    ///
    /// Long frames are clamped and the tick count is capped to prevent a
    /// spiral of death; time beyond the cap is dropped.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.clamp(0.0, MAX_FRAME_TIME);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        ticks
    }
}

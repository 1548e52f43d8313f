//! Decoupling the simulation rate from the rendering rate.
//!
//! Wall-clock time between frames is accumulated and then spent in fixed-size timesteps.
//! Whatever is left over carries on to the next frame. So however fast or slow frames are drawn,
//! the simulation always advances in exactly the same increments.

use crate::config::Config;

/// The simulation clock's accumulator.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Clock {
    /// The fixed size of every simulation step, in seconds
    timestep: f64,
    /// The most unsimulated time that can build up. Stops a stalled frame from triggering an
    /// unbounded burst of catch-up steps.
    max_accumulated_time: f64,
    /// Speed of the simulation relative to the wall clock
    time_multiplier: f64,
    /// Time, in seconds, not yet spent on simulation steps
    accumulated_time: f64,
    /// The timestamp of the previous frame
    previous_time: f64,
}

impl Clock {
    /// Instantiate. `now` is a monotonic timestamp in seconds.
    #[must_use]
    pub fn new(config: &Config, now: f64) -> Self {
        Self {
            timestep: f64::from(config.timestep),
            max_accumulated_time: f64::from(config.max_accumulated_time),
            time_multiplier: f64::from(config.time_multiplier),
            accumulated_time: 0.0,
            previous_time: now,
        }
    }

    /// Account for a new frame and return how many fixed timesteps should now be simulated.
    ///
    /// At most `floor(max_accumulated_time / timestep)` steps are ever returned.
    pub fn tick(&mut self, now: f64) -> u32 {
        let frame_time = (now - self.previous_time).max(0.0) * self.time_multiplier;
        self.previous_time = now;
        self.accumulated_time = (self.accumulated_time + frame_time).min(self.max_accumulated_time);

        let mut steps: u32 = 0;
        while self.accumulated_time > self.timestep {
            self.accumulated_time -= self.timestep;
            steps = steps.saturating_add(1);
        }

        tracing::trace!(
            "Frame time {frame_time:.4}s, {steps} steps, {:.4}s carried over",
            self.accumulated_time
        );
        steps
    }

    /// The current speed of the simulation relative to the wall clock.
    #[must_use]
    pub const fn time_multiplier(&self) -> f64 {
        self.time_multiplier
    }

    /// Change the speed of the simulation. Negative speeds are treated as 0, which pauses it.
    pub fn set_time_multiplier(&mut self, multiplier: f64) {
        self.time_multiplier = multiplier.max(0.0);
    }

    /// Unsimulated time carried over to the next frame.
    #[must_use]
    pub const fn accumulated_time(&self) -> f64 {
        self.accumulated_time
    }
}

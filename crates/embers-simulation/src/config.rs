//! All the variables that can be configured for the simulation

use snafu::ensure;

use crate::colour::Hsla;
use crate::errors::{InvalidConfigSnafu, SimulationError};

/// A `(start, end)` or `(min, max)` pair.
pub type Range = (f32, f32);

/// All the config for the simulation. It is never changed once a simulation is running, with
/// the exception of the time multiplier, which lives on the [`crate::clock::Clock`].
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// The number of particles. It never changes for the lifetime of a simulation.
    pub particle_count: usize,
    /// The range from which a particle's radius is drawn whenever it (re)spawns
    pub initial_radius_range: Range,
    /// The range from which a particle's lifetime, in seconds, is drawn whenever it (re)spawns
    pub duration_range: Range,
    /// How far, in either axis, from the centre of the canvas a particle can respawn
    pub respawn_offset: f32,
    /// The limit on each component of a particle's velocity, in units per second
    pub max_speed: f32,
    /// The magnitude of the random force at the start and end of a particle's life
    pub jitter_range: Range,
    /// The hue at the start and end of a particle's life
    pub hue_range: Range,
    /// The lightness at the start and end of a particle's life
    pub lightness_range: Range,
    /// The fixed size, in seconds, of every simulation step
    pub timestep: f32,
    /// How many seconds to fast-forward the simulation on startup, so that the particles aren't
    /// all born at the same moment
    pub warmup: f32,
    /// The most unsimulated time, in seconds, that can build up between frames. Caps how many
    /// steps a single slow frame can trigger.
    pub max_accumulated_time: f32,
    /// Speed of the simulation relative to the wall clock
    pub time_multiplier: f32,
    /// How long, in seconds, it takes a newly spawned particle's glow to fade in
    pub glow_fade_in: f32,
    /// The opacity, in percent, of a fully faded-in glow
    pub glow_max_alpha: f32,
    /// The colour that the canvas is cleared to before every frame
    pub background: Hsla,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_count: 50,
            initial_radius_range: (40.0, 80.0),
            duration_range: (2.0, 4.0),
            respawn_offset: 10.0,
            max_speed: 100.0,
            jitter_range: (200.0, 600.0),
            hue_range: (30.0, 0.0),
            lightness_range: (70.0, 30.0),
            timestep: 1.0 / 120.0,
            warmup: 10.0,
            max_accumulated_time: 0.25,
            time_multiplier: 1.0,
            glow_fade_in: 0.1,
            glow_max_alpha: 20.0,
            background: Hsla::new(0.0, 0.0, 20.0, 100.0),
        }
    }
}

impl Config {
    /// Check that the config can't break any of the simulation's invariants.
    ///
    /// # Errors
    /// When a value is out of bounds, or a range is the wrong way round.
    pub fn validate(&self) -> Result<(), SimulationError> {
        ensure!(
            self.timestep > 0.0,
            InvalidConfigSnafu {
                field: "timestep",
                reason: "must be greater than 0",
            }
        );
        ensure!(
            self.duration_range.0 > 0.0 && self.duration_range.1 > 0.0,
            InvalidConfigSnafu {
                field: "duration_range",
                reason: "particle lifetimes must be greater than 0",
            }
        );
        ensure!(
            self.initial_radius_range.0 >= 0.0,
            InvalidConfigSnafu {
                field: "initial_radius_range",
                reason: "radii can't be negative",
            }
        );
        Self::ensure_ordered("initial_radius_range", self.initial_radius_range)?;
        Self::ensure_ordered("duration_range", self.duration_range)?;
        ensure!(
            self.respawn_offset >= 0.0,
            InvalidConfigSnafu {
                field: "respawn_offset",
                reason: "can't be negative",
            }
        );
        ensure!(
            self.max_speed >= 0.0,
            InvalidConfigSnafu {
                field: "max_speed",
                reason: "can't be negative",
            }
        );
        ensure!(
            self.jitter_range.0 >= 0.0 && self.jitter_range.1 >= 0.0,
            InvalidConfigSnafu {
                field: "jitter_range",
                reason: "force magnitudes can't be negative",
            }
        );
        ensure!(
            self.max_accumulated_time > 0.0,
            InvalidConfigSnafu {
                field: "max_accumulated_time",
                reason: "must be greater than 0",
            }
        );
        ensure!(
            self.time_multiplier >= 0.0,
            InvalidConfigSnafu {
                field: "time_multiplier",
                reason: "can't be negative",
            }
        );
        ensure!(
            self.glow_fade_in > 0.0,
            InvalidConfigSnafu {
                field: "glow_fade_in",
                reason: "must be greater than 0",
            }
        );
        ensure!(
            self.warmup >= 0.0,
            InvalidConfigSnafu {
                field: "warmup",
                reason: "can't be negative",
            }
        );

        Ok(())
    }

    /// Ranges that values are drawn from must be `(min, max)`.
    fn ensure_ordered(field: &str, range: Range) -> Result<(), SimulationError> {
        ensure!(
            range.0 <= range.1,
            InvalidConfigSnafu {
                field,
                reason: format!("minimum ({}) is bigger than maximum ({})", range.0, range.1),
            }
        );
        Ok(())
    }
}

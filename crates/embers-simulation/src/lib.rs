//! Embers: a fixed-size pool of glowing particles that spawn near the centre of a canvas, drift
//! upwards under a jittering force, shrink and cool, and then respawn.
//!
//! The simulation always advances in fixed timesteps, independently of how often frames are
//! drawn. See [`clock::Clock`] for the accumulator that decouples the two rates.
//!
//! ```ignore
//! use embers_simulation::prelude::*;
//!
//! let config = Config::default();
//! let mut canvas = Canvas::new(160, 90, 10.0);
//! let mut simulation = Simulation::new(config.clone(), canvas.dimensions(), ThreadRandom::default())?;
//! simulation.fast_forward(config.warmup, canvas.dimensions());
//!
//! let mut clock = Clock::new(&config, 0.0);
//! simulation.advance(&mut clock, 1.0 / 60.0, canvas.dimensions());
//! canvas.fill_rect(Vec2::ZERO, canvas.dimensions(), &Fill::Solid(config.background));
//! {
//!     let mut flipped = canvas.flip_vertical();
//!     draw_particles(&simulation.particles, &mut *flipped, &config);
//! }
//! ```

pub mod canvas;
pub mod clock;
pub mod colour;
pub mod config;
pub mod draw;
pub mod errors;
pub mod maths;
pub mod particle;
pub mod particles;
pub mod random;
pub mod simulation;

/// Everything needed to run and draw a simulation.
pub mod prelude {
    #![expect(clippy::pub_use, reason = "It's a prelude")]

    pub use crate::canvas::Canvas;
    pub use crate::clock::Clock;
    pub use crate::colour::Hsla;
    pub use crate::config::Config;
    pub use crate::draw::{draw_particles, DrawSurface, Fill, RadialGradient};
    pub use crate::errors::SimulationError;
    pub use crate::particle::Particle;
    pub use crate::random::{Random, SequenceRandom, ThreadRandom};
    pub use crate::simulation::Simulation;
    pub use glam::Vec2;
}

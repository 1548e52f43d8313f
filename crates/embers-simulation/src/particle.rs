//! A single ember and its lifecycle.

use glam::Vec2;

use crate::colour::Hsla;
use crate::config::Config;
use crate::maths::{clamp_components, integrate, linear_interpolation};
use crate::random::Random;

/// Every particle's mass. So acceleration is always equal to force.
pub const MASS: f32 = 1.0;

/// The colour a particle has before its first update.
pub const INITIAL_COLOUR: Hsla = Hsla::new(0.0, 100.0, 20.0, 100.0);

/// A single ember.
///
/// Positions are in the canvas's y-up frame: the force model pushes particles towards
/// positive y.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Particle {
    /// Current position
    pub position: Vec2,
    /// Current velocity, in units per second. Both components stay within the configured
    /// maximum speed.
    pub velocity: Vec2,
    /// The acceleration applied during the most recent update
    pub acceleration: Vec2,
    /// The current radius
    pub radius: f32,
    /// The radius at the moment of (re)spawn
    pub initial_radius: f32,
    /// Seconds since the last (re)spawn. Always in `[0, duration)` after an update.
    pub time: f32,
    /// The lifetime, in seconds, of the particle's current incarnation
    pub duration: f32,
    /// Hue and lightness change over the particle's life, saturation and alpha don't
    pub colour: Hsla,
}

impl Particle {
    /// A stationary particle at the very start of its life.
    #[must_use]
    pub const fn new(position: Vec2, radius: f32, duration: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            radius,
            initial_radius: radius,
            time: 0.0,
            duration,
            colour: INITIAL_COLOUR,
        }
    }

    /// Respawn in place, somewhere near the centre of the canvas.
    pub fn reset(&mut self, centre: Vec2, config: &Config, rng: &mut impl Random) {
        let offset = config.respawn_offset;
        self.position = centre
            + Vec2::new(
                rng.range(-offset, offset),
                rng.range(-offset, offset),
            );
        self.velocity = Vec2::ZERO;
        self.initial_radius = rng.range(config.initial_radius_range.0, config.initial_radius_range.1);
        self.radius = self.initial_radius;
        self.duration = rng.range(config.duration_range.0, config.duration_range.1);
        self.time = 0.0;
    }

    /// Advance the particle by one fixed timestep.
    pub fn update(&mut self, timestep: f32, centre: Vec2, config: &Config, rng: &mut impl Random) {
        self.time += timestep;
        if self.time >= self.duration {
            self.reset(centre, config, rng);
        } else {
            self.radius = linear_interpolation(self.time, 0.0, self.initial_radius, self.duration, 0.0);
        }

        self.acceleration = self.random_force(config, rng) / MASS;

        self.velocity = integrate(self.velocity, self.acceleration, timestep);
        self.velocity = clamp_components(self.velocity, config.max_speed);
        self.position = integrate(self.position, self.velocity, timestep);

        self.colour.hue = self.interpolate_over_life(config.hue_range);
        self.colour.lightness = self.interpolate_over_life(config.lightness_range);
    }

    /// The jitter grows as the particle ages. Horizontally it's centred on zero, vertically it
    /// only ever pushes upwards, which is what makes embers rise.
    fn random_force(&self, config: &Config, rng: &mut impl Random) -> Vec2 {
        let jitter = self.interpolate_over_life(config.jitter_range);
        Vec2::new(rng.range(-jitter, jitter), rng.range(0.0, 2.0 * jitter))
    }

    /// Map the particle's age onto a `(start, end)` range.
    fn interpolate_over_life(&self, range: (f32, f32)) -> f32 {
        linear_interpolation(self.time, 0.0, range.0, self.duration, range.1)
    }
}

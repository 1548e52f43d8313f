//! Advancing the particles through time, always in fixed-size steps.

use glam::Vec2;

use crate::clock::Clock;
use crate::config::Config;
use crate::errors::SimulationError;
use crate::particle::Particle;
use crate::particles::{centre_of, create_particles};
use crate::random::Random;

/// How many `f32` epsilons, relative to the step count, a duration may be off a whole number
/// of timesteps and still count as an exact multiple. Durations like `N * (1/120)` pick up
/// rounding error in proportion to `N`.
const STEP_COUNT_EPSILONS: f64 = 4.0;

/// Advance every particle by one fixed timestep.
///
/// Particles don't interact, so the order in which they're updated doesn't matter. The size of
/// the canvas is read on every call so that respawns follow the canvas as it's resized.
pub fn update_particles(
    particles: &mut [Particle],
    timestep: f32,
    canvas_size: Vec2,
    config: &Config,
    rng: &mut impl Random,
) {
    let centre = centre_of(canvas_size);
    for particle in particles {
        particle.update(timestep, centre, config, rng);
    }
}

/// The number of whole timesteps needed to cover `total_duration`: `ceil(total / timestep)`.
#[must_use]
#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is positive, whole and capped to `u32::MAX`"
)]
pub fn step_count(timestep: f32, total_duration: f32) -> u32 {
    if total_duration <= 0.0 || timestep <= 0.0 {
        return 0;
    }

    let ratio = f64::from(total_duration) / f64::from(timestep);
    let nearest = ratio.round();
    let tolerance = ratio * f64::from(f32::EPSILON) * STEP_COUNT_EPSILONS;
    let steps = if (ratio - nearest).abs() <= tolerance {
        nearest
    } else {
        ratio.ceil()
    };

    steps.max(1.0).min(f64::from(u32::MAX)) as u32
}

/// Call `update` once for every timestep needed to cover `total_duration`. Returns the number
/// of steps taken.
///
/// With `total_duration == timestep` that's exactly one step, and exactly `N` for
/// `N * timestep`.
pub fn simulate<F>(timestep: f32, total_duration: f32, mut update: F) -> u32
where
    F: FnMut(f32),
{
    let steps = step_count(timestep, total_duration);
    for _ in 0..steps {
        update(timestep);
    }
    steps
}

/// A complete simulation: the particles, the rules they obey and their source of randomness.
#[derive(Debug)]
#[non_exhaustive]
pub struct Simulation<R: Random> {
    /// All the particles. The length never changes.
    pub particles: Vec<Particle>,
    /// The rules the particles obey
    config: Config,
    /// Where all the jitter comes from
    rng: R,
}

impl<R: Random> Simulation<R> {
    /// Create all the particles in the centre of the canvas.
    ///
    /// # Errors
    /// When the config would break the simulation's invariants.
    pub fn new(config: Config, canvas_size: Vec2, mut rng: R) -> Result<Self, SimulationError> {
        config.validate()?;
        let particles = create_particles(&config, canvas_size, &mut rng);
        tracing::debug!(
            "Created {} particles for a {canvas_size} canvas",
            particles.len()
        );

        Ok(Self {
            particles,
            config,
            rng,
        })
    }

    /// The rules the particles obey.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Advance all particles by a single timestep.
    pub fn step(&mut self, canvas_size: Vec2) {
        update_particles(
            &mut self.particles,
            self.config.timestep,
            canvas_size,
            &self.config,
            &mut self.rng,
        );
    }

    /// Run as many timesteps as are needed to cover `duration` seconds. Used on startup so that
    /// particles aren't all at the same point in their lives.
    pub fn fast_forward(&mut self, duration: f32, canvas_size: Vec2) -> u32 {
        let Self {
            particles,
            config,
            rng,
        } = self;
        let steps = simulate(config.timestep, duration, |timestep| {
            update_particles(particles.as_mut_slice(), timestep, canvas_size, config, &mut *rng);
        });
        tracing::debug!("Fast-forwarded the simulation {duration}s in {steps} steps");
        steps
    }

    /// Catch the simulation up with the wall clock. `now` is a monotonic timestamp in seconds.
    /// Returns the number of steps taken.
    pub fn advance(&mut self, clock: &mut Clock, now: f64, canvas_size: Vec2) -> u32 {
        let steps = clock.tick(now);
        for _ in 0..steps {
            self.step(canvas_size);
        }
        steps
    }
}

#[expect(clippy::indexing_slicing, reason = "Tests aren't so strict")]
#[cfg(test)]
mod test {
    use super::*;
    use crate::random::{SequenceRandom, ThreadRandom};

    const CANVAS: Vec2 = Vec2::new(1000.0, 800.0);

    fn still_config() -> Config {
        let mut config = Config::default();
        config.particle_count = 1;
        config.initial_radius_range = (50.0, 50.0);
        config.duration_range = (2.0, 2.0);
        config.jitter_range = (0.0, 0.0);
        config
    }

    #[test]
    fn one_timestep_is_one_step() {
        let mut calls = 0;
        let steps = simulate(1.0 / 120.0, 1.0 / 120.0, |_| calls += 1);
        assert_eq!(calls, 1);
        assert_eq!(steps, 1);
    }

    #[test]
    fn exact_multiples_of_the_timestep() {
        for multiple in [2_u16, 10, 120, 1200] {
            let mut calls = 0_u32;
            let total = f32::from(multiple) * (1.0 / 120.0);
            simulate(1.0 / 120.0, total, |_| calls += 1);
            assert_eq!(calls, u32::from(multiple), "for {multiple} timesteps");
        }
    }

    #[test]
    fn warmup_with_the_default_timestep() {
        let timestep = Config::default().timestep;
        assert_eq!(step_count(timestep, 10.0), 1200);
        assert_eq!(step_count(0.008_333_333, 10.0), 1200);
        for multiple in [600_u16, 2400, 12000] {
            let total = f32::from(multiple) * timestep;
            assert_eq!(step_count(timestep, total), u32::from(multiple));
        }
    }

    #[test]
    fn partial_timesteps_round_up() {
        assert_eq!(step_count(1.0, 1.5), 2);
        assert_eq!(step_count(1.0, 0.1), 1);
    }

    #[test]
    fn nothing_to_simulate() {
        assert_eq!(step_count(1.0 / 120.0, 0.0), 0);
        assert_eq!(step_count(1.0 / 120.0, -1.0), 0);
    }

    #[test]
    fn radius_halves_halfway_through_life() {
        let mut simulation =
            Simulation::new(still_config(), CANVAS, SequenceRandom::new(vec![0.5])).unwrap();

        let steps = simulation.fast_forward(1.0, CANVAS);

        assert_eq!(steps, 120);
        let particle = &simulation.particles[0];
        assert!((particle.radius - 25.0).abs() < 1e-2, "{}", particle.radius);
        assert_eq!(particle.velocity, Vec2::ZERO);
        assert!((particle.time - 1.0).abs() < 1e-3);
    }

    #[test]
    fn invariants_hold_over_many_lifetimes() {
        let config = Config::default();
        let mut simulation = Simulation::new(config, CANVAS, ThreadRandom).unwrap();
        let mut previous: Vec<(f32, f32)> = simulation
            .particles
            .iter()
            .map(|particle| (particle.time, particle.radius))
            .collect();

        for _ in 0..2000 {
            simulation.step(CANVAS);
            for (particle, last) in simulation.particles.iter().zip(previous.iter_mut()) {
                assert!(particle.time >= 0.0 && particle.time < particle.duration);
                assert!(particle.radius >= 0.0 && particle.radius <= particle.initial_radius);
                assert!(particle.velocity.x.abs() <= 100.0);
                assert!(particle.velocity.y.abs() <= 100.0);

                let is_same_life = particle.time > last.0;
                if is_same_life {
                    assert!(particle.radius <= last.1);
                }
                *last = (particle.time, particle.radius);
            }
        }
        assert_eq!(simulation.particles.len(), 50);
    }

    #[test]
    fn respawns_follow_the_canvas_size() {
        let mut config = still_config();
        config.duration_range = (0.05, 0.05);
        let mut simulation =
            Simulation::new(config, CANVAS, SequenceRandom::new(vec![0.5])).unwrap();

        let resized = Vec2::new(200.0, 100.0);
        simulation.fast_forward(0.1, resized);

        assert!(simulation.particles[0].position.distance(Vec2::new(100.0, 50.0)) < 1.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = Config::default();
        config.duration_range = (0.0, 0.0);
        let result = Simulation::new(config, CANVAS, ThreadRandom);
        assert!(result.is_err());
    }
}

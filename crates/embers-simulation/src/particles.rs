//! The fixed-size particle store

use glam::Vec2;

use crate::config::Config;
use crate::particle::Particle;
use crate::random::Random;

/// The centre of a canvas of the given size.
#[must_use]
pub fn centre_of(canvas_size: Vec2) -> Vec2 {
    canvas_size / 2.0
}

/// Create all the particles that a simulation will ever have. They all start at rest in the
/// centre of the canvas, each with its own random radius and lifetime.
///
/// Particles are never added or removed after this, they're respawned in place instead.
pub fn create_particles(config: &Config, canvas_size: Vec2, rng: &mut impl Random) -> Vec<Particle> {
    let centre = centre_of(canvas_size);
    (0..config.particle_count)
        .map(|_| {
            let radius = rng.range(config.initial_radius_range.0, config.initial_radius_range.1);
            let duration = rng.range(config.duration_range.0, config.duration_range.1);
            Particle::new(centre, radius, duration)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::random::ThreadRandom;

    #[test]
    fn creates_the_configured_number_of_particles() {
        let config = Config::default();
        let particles = create_particles(&config, Vec2::new(800.0, 600.0), &mut ThreadRandom);
        assert_eq!(particles.len(), 50);
    }

    #[test]
    fn particles_start_at_the_centre_and_at_rest() {
        let config = Config::default();
        let particles = create_particles(&config, Vec2::new(800.0, 600.0), &mut ThreadRandom);
        for particle in particles {
            assert_eq!(particle.position, Vec2::new(400.0, 300.0));
            assert_eq!(particle.velocity, Vec2::ZERO);
            assert!(particle.time.abs() < f32::EPSILON);
            assert!((40.0..80.0).contains(&particle.radius));
            assert!((2.0..4.0).contains(&particle.duration));
            assert_eq!(particle.colour, crate::particle::INITIAL_COLOUR);
        }
    }
}

//! Drawing particles onto anything that can fill shapes.

use glam::Vec2;
use palette::Mix as _;

use crate::colour::Hsla;
use crate::config::Config;
use crate::maths::linear_interpolation;
use crate::particle::Particle;

/// How many times bigger than a particle's radius the bright inner part of its glow is.
pub const GLOW_INNER_RADIUS_FACTOR: f32 = 2.0;

/// How many times bigger than a particle's radius its whole glow is.
pub const GLOW_OUTER_RADIUS_FACTOR: f32 = 15.0;

/// The lightness, in percent, of the outer edge of a glow.
pub const GLOW_OUTER_LIGHTNESS: f32 = 2.0;

/// The opacity, in percent, of the outer edge of a glow.
pub const GLOW_OUTER_ALPHA: f32 = 10.0;

/// A colour at a point along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct ColourStop {
    /// Position along the gradient, from 0 to 1
    pub offset: f32,
    /// The colour at that position
    pub colour: palette::Srgba,
}

/// A gradient that radiates from a centre point, between two concentric circles.
///
/// Everything inside the inner circle is the first stop's colour, and everything outside the
/// outer circle is the last stop's colour.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RadialGradient {
    /// The centre of both circles
    pub centre: Vec2,
    /// Where the gradient starts
    pub inner_radius: f32,
    /// Where the gradient ends
    pub outer_radius: f32,
    /// Sorted by offset
    stops: Vec<ColourStop>,
}

impl RadialGradient {
    /// Instantiate a gradient without any colours.
    #[must_use]
    pub const fn new(centre: Vec2, inner_radius: f32, outer_radius: f32) -> Self {
        Self {
            centre,
            inner_radius,
            outer_radius,
            stops: Vec::new(),
        }
    }

    /// Add a colour at `offset` along the gradient. Offsets are clamped to `[0, 1]`. A stop with
    /// the same offset as an existing one goes after it.
    pub fn add_colour_stop(&mut self, offset: f32, colour: Hsla) {
        let offset = offset.clamp(0.0, 1.0);
        let index = self.stops.partition_point(|stop| stop.offset <= offset);
        self.stops.insert(
            index,
            ColourStop {
                offset,
                colour: colour.to_srgba(),
            },
        );
    }

    /// The colour stops, in order.
    #[must_use]
    pub fn stops(&self) -> &[ColourStop] {
        &self.stops
    }

    /// A gradient whose circles don't enclose any area paints nothing.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.outer_radius <= self.inner_radius || self.stops.is_empty()
    }

    /// The colour at a point, or `None` when the gradient paints nothing.
    #[must_use]
    pub fn colour_at(&self, point: Vec2) -> Option<palette::Srgba> {
        if self.is_degenerate() {
            return None;
        }

        let distance = point.distance(self.centre);
        let position = (distance - self.inner_radius) / (self.outer_radius - self.inner_radius);

        let first = self.stops.first()?;
        if position <= first.offset {
            return Some(first.colour);
        }
        let last = self.stops.last()?;
        if position >= last.offset {
            return Some(last.colour);
        }

        let after_index = self.stops.partition_point(|stop| stop.offset <= position);
        let before = self.stops.get(after_index.checked_sub(1)?)?;
        let after = self.stops.get(after_index)?;
        let span = after.offset - before.offset;
        if span <= 0.0 {
            return Some(after.colour);
        }
        let factor = (position - before.offset) / span;
        Some(before.colour.mix(after.colour, factor))
    }
}

/// The ways in which a shape can be filled.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Fill {
    /// A single flat colour
    Solid(Hsla),
    /// A radial gradient
    Radial(RadialGradient),
}

/// Anything that particles can be drawn on.
pub trait DrawSurface {
    /// The width and height of the surface, in canvas units.
    fn dimensions(&self) -> Vec2;

    /// Fill the rectangle with its top-left corner at `origin`.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, fill: &Fill);

    /// Fill a circle with a flat colour.
    fn fill_circle(&mut self, centre: Vec2, radius: f32, colour: Hsla);
}

/// The opacity, in percent, of a particle's glow. It fades in quickly after every respawn and
/// then holds.
#[must_use]
pub fn glow_alpha(time: f32, config: &Config) -> f32 {
    linear_interpolation(time, 0.0, 0.0, config.glow_fade_in, config.glow_max_alpha)
        .min(config.glow_max_alpha)
}

/// The glow around a single particle. It covers the whole surface.
#[must_use]
pub fn glow_gradient(particle: &Particle, config: &Config) -> RadialGradient {
    let mut gradient = RadialGradient::new(
        particle.position,
        GLOW_INNER_RADIUS_FACTOR * particle.radius,
        GLOW_OUTER_RADIUS_FACTOR * particle.radius,
    );
    let colour = particle.colour;
    gradient.add_colour_stop(0.0, colour.with_alpha(glow_alpha(particle.time, config)));
    gradient.add_colour_stop(
        1.0,
        Hsla::new(
            colour.hue,
            colour.saturation,
            GLOW_OUTER_LIGHTNESS,
            GLOW_OUTER_ALPHA,
        ),
    );
    gradient
}

/// Draw all the particles. Every glow is drawn before any of the solid discs, so that the glows
/// never cover the discs.
///
/// Clearing the surface first is the caller's job.
pub fn draw_particles(particles: &[Particle], surface: &mut impl DrawSurface, config: &Config) {
    let size = surface.dimensions();
    for particle in particles {
        let gradient = glow_gradient(particle, config);
        surface.fill_rect(Vec2::ZERO, size, &Fill::Radial(gradient));
    }

    for particle in particles {
        surface.fill_circle(
            particle.position,
            particle.radius,
            particle.colour.with_alpha(100.0),
        );
    }
}

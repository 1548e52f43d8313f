//! Small numeric helpers shared by the simulation and the renderer

use glam::Vec2;

/// Saturate `x` to `[min, max]`.
///
/// Unlike `f32::clamp()` this doesn't panic when `min > max`; getting the bounds in the right
/// order is the caller's responsibility.
#[must_use]
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Evaluate the line through `(x1, y1)` and `(x2, y2)` at `x`.
///
/// `x1` and `x2` must differ. All the simulation's call sites use a particle's lifetime for the
/// span, and lifetimes are validated to be positive.
#[must_use]
pub fn linear_interpolation(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    debug_assert!(
        (x2 - x1).abs() > 0.0,
        "Linear interpolation over an empty span ({x1} to {x2})"
    );
    (y2 - y1) / (x2 - x1) * (x - x1) + y1
}

/// A single explicit Euler step: `y + f * h`, for each component.
#[must_use]
pub fn integrate(y: Vec2, f: Vec2, h: f32) -> Vec2 {
    y + f * h
}

/// Clamp each component of a vector to `[-limit, limit]`.
#[must_use]
pub fn clamp_components(vector: Vec2, limit: f32) -> Vec2 {
    Vec2::new(
        clamp(vector.x, -limit, limit),
        clamp(vector.y, -limit, limit),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamping() {
        assert!((clamp(5.0, 0.0, 1.0) - 1.0).abs() < f32::EPSILON);
        assert!((clamp(-5.0, 0.0, 1.0) - 0.0).abs() < f32::EPSILON);
        assert!((clamp(0.25, 0.0, 1.0) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn interpolating_between_two_points() {
        assert!((linear_interpolation(0.0, 0.0, 30.0, 2.0, 0.0) - 30.0).abs() < 1e-6);
        assert!((linear_interpolation(1.0, 0.0, 30.0, 2.0, 0.0) - 15.0).abs() < 1e-6);
        assert!((linear_interpolation(2.0, 0.0, 70.0, 2.0, 30.0) - 30.0).abs() < 1e-6);
    }

    #[test]
    fn interpolation_extrapolates_past_the_second_point() {
        assert!((linear_interpolation(0.2, 0.0, 0.0, 0.1, 20.0) - 40.0).abs() < 1e-4);
    }

    #[test]
    fn euler_step() {
        let next = integrate(Vec2::new(1.0, 2.0), Vec2::new(10.0, -20.0), 0.5);
        assert_eq!(next, Vec2::new(6.0, -8.0));
    }

    #[test]
    fn clamping_vector_components() {
        let clamped = clamp_components(Vec2::new(150.0, -150.0), 100.0);
        assert_eq!(clamped, Vec2::new(100.0, -100.0));
    }
}

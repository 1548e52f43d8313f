//! Sources of randomness for the simulation.
//!
//! Production code draws fresh entropy on every call. Tests swap in [`SequenceRandom`] so that
//! whole simulation runs can be replayed exactly.

use rand::Rng as _;

/// Anything that can produce uniformly distributed floats.
pub trait Random {
    /// A value in `[min, max)`. When `min == max` the result is always `min`.
    fn range(&mut self, min: f32, max: f32) -> f32;
}

/// Unseeded randomness from the current thread's generator.
#[derive(Default, Debug)]
#[non_exhaustive]
pub struct ThreadRandom;

impl Random for ThreadRandom {
    fn range(&mut self, min: f32, max: f32) -> f32 {
        // `gen_range()` panics on empty ranges, and a config may legitimately fix a value by
        // using the same number for both ends of a range.
        if min < max {
            rand::thread_rng().gen_range(min..max)
        } else {
            min
        }
    }
}

/// Replays a fixed, repeating sequence of fractions in `[0, 1)`.
///
/// A fraction of `0.5` always lands in the middle of the requested range, so a sequence of just
/// `[0.5]` gives a completely predictable simulation.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SequenceRandom {
    /// The fractions to replay
    fractions: Vec<f32>,
    /// The index of the next fraction to use
    cursor: usize,
}

impl SequenceRandom {
    /// Instantiate. An empty sequence behaves like `[0.0]`.
    #[must_use]
    pub const fn new(fractions: Vec<f32>) -> Self {
        Self {
            fractions,
            cursor: 0,
        }
    }
}

impl Random for SequenceRandom {
    fn range(&mut self, min: f32, max: f32) -> f32 {
        let fraction = self.fractions.get(self.cursor).copied().unwrap_or(0.0);
        self.cursor = self.cursor.wrapping_add(1);
        if self.cursor >= self.fractions.len() {
            self.cursor = 0;
        }

        if min >= max {
            return min;
        }
        // Fractions just below 1 can round up to `max`.
        fraction.mul_add(max - min, min).min(max.next_down())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn thread_random_stays_in_range() {
        let mut random = ThreadRandom;
        for _ in 0..1000 {
            let value = random.range(-10.0, 10.0);
            assert!((-10.0..10.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn thread_random_handles_empty_range() {
        let mut random = ThreadRandom;
        assert!((random.range(2.0, 2.0) - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn sequence_random_replays_and_wraps() {
        let mut random = SequenceRandom::new(vec![0.0, 0.5]);
        assert!((random.range(0.0, 10.0) - 0.0).abs() < f32::EPSILON);
        assert!((random.range(0.0, 10.0) - 5.0).abs() < f32::EPSILON);
        assert!((random.range(-4.0, 4.0) - -4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn maximum_is_never_reached() {
        let largest_fraction = 1.0 - f32::EPSILON / 2.0;
        let mut random = SequenceRandom::new(vec![largest_fraction]);
        assert!(random.range(40.0, 80.0) < 80.0);
        assert!(random.range(2.0, 4.0) < 4.0);
        assert!(random.range(-600.0, 600.0) < 600.0);
    }

    #[test]
    fn reversed_range_gives_the_minimum() {
        let mut random = ThreadRandom;
        assert!((random.range(5.0, 1.0) - 5.0).abs() < f32::EPSILON);
        let mut sequence = SequenceRandom::new(vec![0.5]);
        assert!((sequence.range(5.0, 1.0) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_sequence_uses_the_minimum() {
        let mut random = SequenceRandom::new(Vec::new());
        assert!((random.range(3.0, 7.0) - 3.0).abs() < f32::EPSILON);
    }
}

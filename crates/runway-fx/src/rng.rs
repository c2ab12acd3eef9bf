#![forbid(unsafe_code)]

//! Injectable random sources for particle parameters.
//!
//! Every randomized particle field is drawn through [`RandomSource`], so a
//! seeded [`XorShift32`] makes whole animation runs reproducible and a
//! [`SequenceSource`] can pin exact values in tests.

/// A source of uniformly distributed samples in `[0, 1)`.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Sample `base + unit * spread`, i.e. a value in `[base, base + spread)`.
    #[inline]
    fn spread(&mut self, base: f64, spread: f64) -> f64 {
        base + self.next_unit() * spread
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Fallback state for a zero seed (xorshift never leaves zero).
const ZERO_SEED_REPLACEMENT: u32 = 0x9E37_79B9;

/// Deterministic xorshift32 generator.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator. A zero seed is replaced with a fixed non-zero one.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        let state = if seed == 0 {
            ZERO_SEED_REPLACEMENT
        } else {
            seed
        };
        Self { state }
    }

    /// Next raw 32-bit output.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(ZERO_SEED_REPLACEMENT)
    }
}

impl RandomSource for XorShift32 {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        // Top 24 bits keep the result strictly below 1.0.
        f64::from(self.next_u32() >> 8) / f64::from(1u32 << 24)
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Values are clamped into `[0, 1)` on construction.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Create a source that yields `values` in order, then repeats.
    ///
    /// An empty list behaves like a constant `0.0`.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| {
                if v.is_finite() {
                    v.clamp(0.0, 1.0 - f64::EPSILON)
                } else {
                    0.0
                }
            })
            .collect();
        Self { values, cursor: 0 }
    }

    /// A source that always yields `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_never_yields_zero_state() {
        let mut rng = XorShift32::new(1);
        for _ in 0..1000 {
            assert_ne!(rng.next_u32(), 0);
        }
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut a = XorShift32::new(0);
        let mut b = XorShift32::default();
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn unit_samples_stay_in_range() {
        let mut rng = XorShift32::new(0xDEAD_BEEF);
        for _ in 0..10_000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = XorShift32::new(42);
        let mut b = XorShift32::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn spread_maps_into_half_open_range() {
        let mut rng = SequenceSource::new(vec![0.0, 0.5]);
        assert_eq!(rng.spread(0.01, 0.01), 0.01);
        assert_eq!(rng.spread(2.0, 2.0), 3.0);
    }

    #[test]
    fn sequence_cycles_and_clamps() {
        let mut rng = SequenceSource::new(vec![0.25, 2.0, -1.0]);
        assert_eq!(rng.next_unit(), 0.25);
        assert!(rng.next_unit() < 1.0);
        assert_eq!(rng.next_unit(), 0.0);
        assert_eq!(rng.next_unit(), 0.25);
        assert_eq!(rng.drawn(), 4);
    }

    #[test]
    fn empty_sequence_is_zero() {
        let mut rng = SequenceSource::new(Vec::<f64>::new());
        assert_eq!(rng.next_unit(), 0.0);
    }

    #[test]
    fn borrowed_sources_forward() {
        fn draw<R: RandomSource>(mut source: R) -> f64 {
            source.next_unit()
        }
        let mut rng = SequenceSource::constant(0.75);
        assert_eq!(draw(&mut rng), 0.75);
        assert_eq!(rng.drawn(), 1);
    }
}

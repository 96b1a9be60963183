//! Rejection sampling.
//!
//! Reducing a 32-bit draw modulo `M` is biased whenever `M` does
//! not divide 2^32. Draws at or above [`unbiased_threshold`] are
//! discarded until one falls below it. For `M <= 2^32` at least
//! half of all draws are accepted, so the loop takes fewer than two
//! iterations on average.
//!
//! If `M > 2^32` the threshold is zero and no draw could ever be
//! accepted. The sampler then takes exactly one draw and reduces it
//! without rejection. The result is in `[0, M)` but only
//! `[0, 2^32)` is reachable.

use crate::{
    entropy::EntropySource,
    modulus::{Modulus, unbiased_threshold},
};

/// Returns a value uniformly distributed over `[0, modulus)`.
pub fn sample_uniform<R>(rng: &R, modulus: Modulus) -> u64
where
    R: EntropySource + ?Sized,
{
    sample_below(rng, modulus, unbiased_threshold(modulus))
}

/// Like [`sample_uniform`], but with a precomputed threshold.
///
/// `threshold` must be `unbiased_threshold(modulus)`.
pub(crate) fn sample_below<R>(rng: &R, modulus: Modulus, threshold: u64) -> u64
where
    R: EntropySource + ?Sized,
{
    debug_assert_eq!(threshold, unbiased_threshold(modulus));

    let m = modulus.as_nonzero();
    if threshold == 0 {
        return u64::from(rng.next_u32()) % m;
    }
    loop {
        let v = u64::from(rng.next_u32());
        if v < threshold {
            return v % m;
        }
    }
}

#[cfg(test)]
mod tests {
    use core::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{entropy::RngSource, modulus::ENTROPY_SPACE};

    /// Replays a fixed sequence of draws.
    struct Script {
        draws: RefCell<VecDeque<u32>>,
        used: Cell<usize>,
    }

    impl Script {
        fn new(draws: &[u32]) -> Self {
            Self {
                draws: RefCell::new(draws.iter().copied().collect()),
                used: Cell::new(0),
            }
        }
    }

    impl EntropySource for Script {
        fn next_u32(&self) -> u32 {
            self.used.set(self.used.get() + 1);
            self.draws
                .borrow_mut()
                .pop_front()
                .expect("script exhausted")
        }
    }

    fn m(n: u64) -> Modulus {
        Modulus::new(n).expect("non-zero")
    }

    #[test]
    fn test_rejects_at_and_above_threshold() {
        // The threshold for 10 is 4294967290.
        let rng = Script::new(&[u32::MAX, 4_294_967_290, 4_294_967_289]);
        assert_eq!(sample_uniform(&rng, m(10)), 9);
        assert_eq!(rng.used.get(), 3);
    }

    #[test]
    fn test_accepts_first_draw_below_threshold() {
        let rng = Script::new(&[1234]);
        assert_eq!(sample_uniform(&rng, m(26)), 1234 % 26);
        assert_eq!(rng.used.get(), 1);
    }

    #[test]
    fn test_exact_power_of_two_never_rejects() {
        let rng = Script::new(&[u32::MAX, 0]);
        assert_eq!(sample_uniform(&rng, m(ENTROPY_SPACE)), u64::from(u32::MAX));
        assert_eq!(sample_uniform(&rng, m(ENTROPY_SPACE)), 0);
        assert_eq!(rng.used.get(), 2);
    }

    #[test]
    fn test_oversized_modulus_takes_one_draw() {
        for n in [ENTROPY_SPACE + 1, 1 << 40, u64::MAX] {
            let rng = Script::new(&[u32::MAX]);
            assert_eq!(sample_uniform(&rng, m(n)), u64::from(u32::MAX));
            assert_eq!(rng.used.get(), 1);
        }
    }

    #[test]
    fn test_modulus_one() {
        let rng = RngSource::new(StdRng::seed_from_u64(0));
        for _ in 0..1000 {
            assert_eq!(sample_uniform(&rng, m(1)), 0);
        }
    }

    /// Computes Pearson's chi-square statistic for `counts`
    /// against a uniform distribution.
    fn chi_square(counts: &[u64]) -> f64 {
        let total: u64 = counts.iter().sum();
        let expected = total as f64 / counts.len() as f64;
        counts
            .iter()
            .map(|&c| {
                let d = c as f64 - expected;
                d * d / expected
            })
            .sum()
    }

    /// Asserts that `counts` is consistent with a uniform
    /// distribution.
    ///
    /// Uses the normal approximation of the chi-square
    /// distribution with a generous margin of eight standard
    /// deviations.
    fn assert_uniform(counts: &[u64]) {
        let df = (counts.len() - 1) as f64;
        let limit = df + 8.0 * (2.0 * df).sqrt();
        let stat = chi_square(counts);
        assert!(stat <= limit, "chi-square {stat} > {limit} (df = {df})");
    }

    fn check_uniform(n: u64, samples: usize, seed: u64) {
        let rng = RngSource::new(StdRng::seed_from_u64(seed));
        let mut counts = vec![0u64; n as usize];
        for _ in 0..samples {
            let v = sample_uniform(&rng, m(n));
            counts[v as usize] += 1;
        }
        assert_uniform(&counts);
    }

    #[test]
    fn test_uniform_digits() {
        check_uniform(10, 100_000, 1);
    }

    #[test]
    fn test_uniform_letters() {
        check_uniform(26, 260_000, 2);
    }

    #[test]
    fn test_uniform_default_range() {
        check_uniform(0x7FFF, 0x7FFF * 32, 3);
    }

    #[test]
    fn test_uniform_full_width() {
        // Too many values to count individually, so bucket by the
        // top four bits.
        let rng = RngSource::new(StdRng::seed_from_u64(4));
        let mut counts = [0u64; 16];
        for _ in 0..160_000 {
            let v = sample_uniform(&rng, m(ENTROPY_SPACE));
            counts[(v >> 28) as usize] += 1;
        }
        assert_uniform(&counts);
    }

    #[test]
    fn test_uniform_fallback_source() {
        let rng = crate::entropy::FallbackSource::from_seed(5);
        let mut counts = [0u64; 10];
        for _ in 0..100_000 {
            counts[sample_uniform(&rng, m(10)) as usize] += 1;
        }
        assert_uniform(&counts);
    }

    proptest! {
        #[test]
        fn test_in_range(n in 1u64.., seed: u64) {
            let rng = RngSource::new(StdRng::seed_from_u64(seed));
            for _ in 0..16 {
                prop_assert!(sample_uniform(&rng, m(n)) < n);
            }
        }

        #[test]
        fn test_small_in_range(n in 1u64..=1000, seed: u64) {
            let rng = RngSource::new(StdRng::seed_from_u64(seed));
            for _ in 0..16 {
                prop_assert!(sample_uniform(&rng, m(n)) < n);
            }
        }
    }
}

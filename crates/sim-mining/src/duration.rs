//! PoW duration sampling.

use rand::Rng;
use rand_distr::{Distribution, Exp};

/// Draws a proof-of-work duration from `Exponential(rate = hash_power /
/// operating_difficulty)`.
///
/// `hash_power` is in hashes/sec, `operating_difficulty` is the expected
/// number of hashes needed to win, so the ratio is the expected number of
/// blocks this node wins per simulated second — exactly the rate parameter
/// an exponential inter-arrival model wants.
///
/// # Panics
/// Panics if `hash_power` or `operating_difficulty` is not finite and
/// positive; both are validated at configuration load time, so a panic
/// here indicates a bug upstream rather than bad input.
pub fn sample_pow_duration(hash_power: f64, operating_difficulty: f64, rng: &mut impl Rng) -> f64 {
    let rate = hash_power / operating_difficulty;
    let exp = Exp::new(rate).expect("hash_power/operating_difficulty must be a positive rate");
    exp.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn higher_hash_power_yields_shorter_expected_duration() {
        let mut rng = StdRng::seed_from_u64(42);
        let slow: f64 = (0..10_000)
            .map(|_| sample_pow_duration(1.0, 100.0, &mut rng))
            .sum::<f64>()
            / 10_000.0;

        let mut rng = StdRng::seed_from_u64(42);
        let fast: f64 = (0..10_000)
            .map(|_| sample_pow_duration(10.0, 100.0, &mut rng))
            .sum::<f64>()
            / 10_000.0;

        assert!(fast < slow);
    }

    #[test]
    fn durations_are_always_non_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(sample_pow_duration(5.0, 10.0, &mut rng) >= 0.0);
        }
    }
}

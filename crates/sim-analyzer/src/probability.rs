//! Nakamoto's closed-form attack-success probability.

/// Probability that an attacker with hashpower share `q` (out of total
/// network hashpower, so `q in (0,1)`) eventually catches up to and
/// overtakes a chain `z` confirmations deep.
///
/// Implements Nakamoto's Bitcoin whitepaper, Section 11:
///
/// ```text
/// p = 1 - q
/// λ = z · (q / p)
/// P = 1 - Σ_{k=0}^{z} poisson(k; λ) · (1 - (q/p)^(z-k))
/// poisson(k; λ) = e^{-λ} λ^k / k!
/// ```
///
/// `q >= 0.5` (a majority attacker) always succeeds eventually, and `z ==
/// 0` (no confirmations at all) always succeeds immediately; both are
/// handled as base cases rather than falling out of the summation, since
/// `p` would be non-positive or the sum degenerate.
///
/// The Poisson terms are accumulated via the recurrence `term_k = term_{k-1}
/// · λ / k` rather than computing `λ^k / k!` directly, so the function
/// stays numerically stable for `z` in the hundreds without overflowing
/// `k!`.
pub fn attack_success_probability(q: f64, z: u64) -> f64 {
    if q >= 0.5 {
        return 1.0;
    }
    if z == 0 {
        return 1.0;
    }

    let p = 1.0 - q;
    let ratio = q / p;
    let lambda = z as f64 * ratio;

    let mut term = (-lambda).exp(); // poisson(0; lambda)
    let mut tail_sum = 0.0;
    for k in 0..=z {
        if k > 0 {
            term *= lambda / k as f64;
        }
        let remaining = (z - k) as i32;
        tail_sum += term * (1.0 - ratio.powi(remaining));
    }

    (1.0 - tail_sum).clamp(0.0, 1.0)
}

/// Smallest `z` such that `attack_success_probability(q, z) <= target_p`,
/// found by linear search from `z = 0` upward and capped at 1000 (the
/// search simply stops there and returns 1000 if no such `z` was found —
/// for `q` close to 0.5 the required depth grows without a practical
/// bound).
pub fn required_confirmations(q: f64, target_p: f64) -> u64 {
    const SEARCH_CAP: u64 = 1000;
    for z in 0..=SEARCH_CAP {
        if attack_success_probability(q, z) <= target_p {
            return z;
        }
    }
    SEARCH_CAP
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-7, "expected {b}, got {a}");
    }

    #[test]
    fn s1_q_0_1_matches_published_table() {
        let expected = [
            1.0000000, 0.2045873, 0.0509779, 0.0131722, 0.0034552, 0.0009137, 0.0002428,
            0.0000647, 0.0000173, 0.0000046, 0.0000012,
        ];
        for (z, &want) in expected.iter().enumerate() {
            assert_close(attack_success_probability(0.1, z as u64), want);
        }
    }

    #[test]
    fn s2_q_0_3_spot_checks() {
        assert_close(attack_success_probability(0.3, 5), 0.1773523);
        assert_close(attack_success_probability(0.3, 10), 0.0416605);
        assert_close(attack_success_probability(0.3, 50), 0.0000006);
    }

    #[test]
    fn s3_required_confirmations_table() {
        let cases = [
            (0.10, 5),
            (0.15, 8),
            (0.20, 11),
            (0.25, 15),
            (0.30, 24),
            (0.35, 41),
            (0.40, 89),
            (0.45, 340),
        ];
        for (q, want_z) in cases {
            assert_eq!(required_confirmations(q, 0.001), want_z);
        }
    }

    #[test]
    fn majority_attacker_always_succeeds() {
        for q in [0.5, 0.6, 0.9, 0.9999] {
            for z in [0, 1, 10, 100] {
                assert_eq!(attack_success_probability(q, z), 1.0);
            }
        }
    }

    #[test]
    fn zero_confirmations_always_succeeds() {
        for q in [0.01, 0.1, 0.3, 0.49] {
            assert_eq!(attack_success_probability(q, 0), 1.0);
        }
    }

    #[test]
    fn monotonic_non_increasing_in_z_and_increasing_in_q() {
        for &q in &[0.1, 0.2, 0.3, 0.4] {
            let mut prev = attack_success_probability(q, 0);
            for z in 1..=50u64 {
                let cur = attack_success_probability(q, z);
                assert!(cur <= prev + 1e-12);
                prev = cur;
            }
        }

        for z in 0..=50u64 {
            let mut prev = attack_success_probability(0.1, z);
            for &q in &[0.2, 0.3, 0.4] {
                let cur = attack_success_probability(q, z);
                assert!(cur >= prev - 1e-12);
                prev = cur;
            }
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Invariant 6: non-increasing in z for any fixed minority share.
        #[test]
        fn non_increasing_in_z(q in 0.01f64..0.49, z in 0u64..200) {
            let p_here = attack_success_probability(q, z);
            let p_next = attack_success_probability(q, z + 1);
            prop_assert!(p_next <= p_here + 1e-9);
        }

        /// Invariant 7: zero confirmations always succeeds.
        #[test]
        fn zero_confirmations_is_certain(q in 0.0001f64..0.9999) {
            prop_assert_eq!(attack_success_probability(q, 0), 1.0);
        }

        /// Invariant 8: a majority attacker always succeeds, at any depth.
        #[test]
        fn majority_share_is_always_certain(q in 0.5f64..1.0, z in 0u64..500) {
            prop_assert_eq!(attack_success_probability(q, z), 1.0);
        }

        /// The closed form never leaves the unit interval.
        #[test]
        fn probability_stays_in_unit_interval(q in 0.0001f64..0.9999, z in 0u64..300) {
            let p = attack_success_probability(q, z);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}

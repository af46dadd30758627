//! Simulated wall-clock time.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

/// A point (or duration) in simulated time.
///
/// Backed by `f64` because PoW durations are drawn from a continuous
/// exponential distribution. `Ord` is implemented via `total_cmp` so
/// `SimTime` can sit in a `BinaryHeap`; simulated time is never NaN in
/// practice since it only ever results from additions of finite samples.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;
    fn add(self, rhs: f64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl Sub for SimTime {
    type Output = f64;
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_numeric_order() {
        assert!(SimTime(1.0) < SimTime(2.0));
        assert_eq!(SimTime(5.0), SimTime(5.0));
    }

    #[test]
    fn arithmetic_is_straightforward() {
        let t = SimTime(10.0) + 5.0;
        assert_eq!(t, SimTime(15.0));
        assert_eq!(t - SimTime(10.0), 5.0);
    }
}

//! Double-spend conflict injection: pairs a fraction of arriving
//! transactions with an earlier one as a spend of the same output.

use rand::Rng;
use sim_types::TxId;
use std::collections::VecDeque;

/// Remembers the most recent transaction ids (bounded by `dispersion`) so a
/// conflicting peer can be chosen at random from recent history rather than
/// always the immediately preceding transaction.
pub struct ConflictInjector {
    likelihood: f64,
    dispersion: usize,
    target: Option<TxId>,
    recent: VecDeque<TxId>,
}

impl ConflictInjector {
    pub fn new(likelihood: f64, dispersion: f64, target: Option<TxId>) -> Self {
        ConflictInjector {
            likelihood: likelihood.clamp(0.0, 1.0),
            dispersion: dispersion.max(1.0).round() as usize,
            target,
            recent: VecDeque::new(),
        }
    }

    /// Decides whether `candidate` conflicts with an earlier transaction,
    /// returning the peer id to record as `conflict_peer_id`. Call exactly
    /// once per generated transaction, in arrival order, before recording
    /// the transaction itself with [`ConflictInjector::record`].
    pub fn choose_conflict(&mut self, rng: &mut impl Rng) -> Option<TxId> {
        if let Some(target) = self.target {
            if self.recent.is_empty() {
                return None;
            }
            return if rng.gen_bool(self.likelihood) { Some(target) } else { None };
        }

        if self.recent.is_empty() || !rng.gen_bool(self.likelihood) {
            return None;
        }
        let idx = rng.gen_range(0..self.recent.len());
        self.recent.get(idx).copied()
    }

    pub fn record(&mut self, id: TxId) {
        self.recent.push_back(id);
        while self.recent.len() > self.dispersion {
            self.recent.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_likelihood_never_conflicts() {
        let mut injector = ConflictInjector::new(0.0, 5.0, None);
        let mut rng = StdRng::seed_from_u64(1);
        injector.record(TxId(1));
        for _ in 0..20 {
            assert_eq!(injector.choose_conflict(&mut rng), None);
        }
    }

    #[test]
    fn full_likelihood_always_conflicts_once_history_exists() {
        let mut injector = ConflictInjector::new(1.0, 5.0, None);
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(injector.choose_conflict(&mut rng), None);
        injector.record(TxId(1));
        for _ in 0..20 {
            assert!(injector.choose_conflict(&mut rng).is_some());
        }
    }

    #[test]
    fn dispersion_bounds_recent_history() {
        let mut injector = ConflictInjector::new(1.0, 2.0, None);
        for i in 0..5 {
            injector.record(TxId(i));
        }
        assert_eq!(injector.recent.len(), 2);
        assert_eq!(injector.recent.front().copied(), Some(TxId(3)));
    }

    #[test]
    fn target_mode_always_points_at_target() {
        let target = TxId(42);
        let mut injector = ConflictInjector::new(1.0, 5.0, Some(target));
        let mut rng = StdRng::seed_from_u64(3);
        injector.record(TxId(1));
        assert_eq!(injector.choose_conflict(&mut rng), Some(target));
    }
}

//! Client transaction arrivals: a Poisson process in time, with size and fee
//! drawn independently from normal distributions.

use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use sim_types::{IdAllocator, Transaction};

#[derive(Clone, Copy, Debug)]
pub struct WorkloadParams {
    pub lambda: f64,
    pub num_transactions: u64,
    pub size_mean: f64,
    pub size_sd: f64,
    pub fee_value_mean: f64,
    pub fee_value_sd: f64,
}

/// Generates the client-side transaction stream: interarrival gaps and the
/// transactions themselves. Holds no state of its own beyond the
/// parameters; callers drive the count via [`WorkloadParams::num_transactions`].
pub struct TransactionGenerator {
    params: WorkloadParams,
}

impl TransactionGenerator {
    pub fn new(params: WorkloadParams) -> Self {
        TransactionGenerator { params }
    }

    pub fn params(&self) -> &WorkloadParams {
        &self.params
    }

    /// Gap, in simulated time units, until the next arrival.
    pub fn sample_interarrival(&self, rng: &mut impl Rng) -> f64 {
        let exp = Exp::new(self.params.lambda).expect("lambda must be positive");
        exp.sample(rng)
    }

    /// A freshly minted transaction with no conflict set. Size is rounded to
    /// whole bytes and floored at 1; fee is floored at 0.0 since a negative
    /// fee has no meaning.
    pub fn sample_transaction(&self, rng: &mut impl Rng, ids: &mut IdAllocator) -> Transaction {
        let size_dist = Normal::new(self.params.size_mean, self.params.size_sd.max(0.0))
            .expect("size distribution parameters must be finite");
        let fee_dist = Normal::new(self.params.fee_value_mean, self.params.fee_value_sd.max(0.0))
            .expect("fee distribution parameters must be finite");

        let size = size_dist.sample(rng).max(1.0).round() as u64;
        let fee = fee_dist.sample(rng).max(0.0);

        Transaction {
            id: ids.next_tx_id(),
            size,
            fee,
            conflict_peer_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params() -> WorkloadParams {
        WorkloadParams {
            lambda: 2.5,
            num_transactions: 100,
            size_mean: 250.0,
            size_sd: 20.0,
            fee_value_mean: 1.0,
            fee_value_sd: 0.1,
        }
    }

    #[test]
    fn interarrival_times_are_nonnegative() {
        let gen = TransactionGenerator::new(params());
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(gen.sample_interarrival(&mut rng) >= 0.0);
        }
    }

    #[test]
    fn transactions_have_positive_size_and_nonnegative_fee() {
        let gen = TransactionGenerator::new(params());
        let mut rng = StdRng::seed_from_u64(11);
        let mut ids = IdAllocator::new();
        for _ in 0..50 {
            let tx = gen.sample_transaction(&mut rng, &mut ids);
            assert!(tx.size >= 1);
            assert!(tx.fee >= 0.0);
            assert!(tx.conflict_peer_id.is_none());
        }
    }

    #[test]
    fn transaction_ids_are_distinct() {
        let gen = TransactionGenerator::new(params());
        let mut rng = StdRng::seed_from_u64(13);
        let mut ids = IdAllocator::new();
        let a = gen.sample_transaction(&mut rng, &mut ids);
        let b = gen.sample_transaction(&mut rng, &mut ids);
        assert_ne!(a.id, b.id);
    }
}

//! Propagation delay for transactions and blocks: a fixed latency plus a
//! per-receipt transmission time driven by the receiving node's throughput.

use rand::Rng;
use rand_distr::{Distribution, Normal};

#[derive(Clone, Copy, Debug)]
pub struct NetworkParams {
    pub throughput_mean: f64,
    pub throughput_sd: f64,
    pub propagation_time: f64,
}

/// Samples a throughput for a node and converts a payload size into a
/// delay. Throughput is in the same size units per simulated time unit as
/// `Transaction::size`/`Block` sizing; a non-positive sample is floored to
/// a minimal value so delay never divides by zero.
pub struct PropagationModel {
    params: NetworkParams,
}

impl PropagationModel {
    pub fn new(params: NetworkParams) -> Self {
        PropagationModel { params }
    }

    pub fn sample_throughput(&self, rng: &mut impl Rng) -> f64 {
        let dist = Normal::new(self.params.throughput_mean, self.params.throughput_sd.max(0.0))
            .expect("throughput distribution parameters must be finite");
        dist.sample(rng).max(1e-6)
    }

    /// Delay until a payload of `size` bytes is received, given the
    /// receiving node's sampled `throughput`.
    pub fn delay_for(&self, size: u64, throughput: f64) -> f64 {
        self.params.propagation_time + size as f64 / throughput.max(1e-6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> NetworkParams {
        NetworkParams {
            throughput_mean: 100.0,
            throughput_sd: 10.0,
            propagation_time: 0.5,
        }
    }

    #[test]
    fn delay_includes_fixed_propagation_time() {
        let model = PropagationModel::new(params());
        let delay = model.delay_for(1000, 100.0);
        assert_eq!(delay, 0.5 + 10.0);
    }

    #[test]
    fn larger_payload_never_arrives_sooner() {
        let model = PropagationModel::new(params());
        assert!(model.delay_for(2000, 100.0) >= model.delay_for(1000, 100.0));
    }

    #[test]
    fn sampled_throughput_is_positive() {
        let model = PropagationModel::new(params());
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            assert!(model.sample_throughput(&mut rng) > 0.0);
        }
    }
}

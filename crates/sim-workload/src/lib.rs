//! Synthetic client workload: transaction arrivals, sizes, fees, conflicts,
//! and the network's propagation-delay model.

mod arrivals;
mod conflicts;
mod network;

pub use arrivals::{TransactionGenerator, WorkloadParams};
pub use conflicts::ConflictInjector;
pub use network::{NetworkParams, PropagationModel};

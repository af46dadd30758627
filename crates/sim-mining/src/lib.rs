//! The mining controller shared by the Honest and Malicious behaviors.
//!
//! Owns the per-node `Idle ⇄ Mining` state machine and the PoW duration
//! sampler. Everything else — what goes into a candidate block, what
//! happens when the validation event actually fires — belongs to the
//! behavior layer; this crate only answers "should I be mining right now,
//! and for how long."

mod controller;
mod duration;
mod error;

pub use controller::{MiningController, MiningDecision, MiningState};
pub use duration::sample_pow_duration;
pub use error::MiningAssertionError;

//! The theoretical attack-success analyzer: Nakamoto's Section 11
//! closed-form formula, used to validate simulation outcomes against the
//! published model.
//!
//! Pure functions, no simulation state, no I/O.

mod probability;
mod report;

pub use probability::{attack_success_probability, required_confirmations};
pub use report::format_report;

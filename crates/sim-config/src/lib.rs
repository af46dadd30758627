//! Configuration file parsing.
//!
//! The core recognizes a fixed, enumerated set of `key = value` entries
//! (see the README-level table in the specification this crate
//! implements); anything else in the file is ignored. Parse failures are
//! always a `ConfigError`, which the CLI driver treats as fatal.

mod error;
mod hashpower;
mod keys;
mod parser;

pub use error::ConfigError;
pub use hashpower::{parse_hashpower_changes, HashPowerChangeEntry};
pub use keys::{Config, ReportFlags, SimulationCountRange};

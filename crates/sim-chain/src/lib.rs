//! The blockchain structure.
//!
//! A local, per-node view of the chain: a tree of blocks rooted at an
//! implicit genesis sentinel, with orphan handling and deterministic
//! longest-tip selection. Each `Node` in `sim-behavior` owns one of these;
//! there is no shared state between nodes, only blocks cloned across
//! propagation events.

mod block;
mod error;
mod structure;

pub use block::{Block, GENESIS_ID};
pub use error::StructureError;
pub use structure::BlockchainStructure;

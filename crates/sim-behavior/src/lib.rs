//! Node behavior strategies and the glue between a node's pool, its
//! blockchain view, and the shared mining controller.

mod behavior;
mod common;
mod effect;
mod honest;
mod malicious;
mod node;
mod reconfig;

pub use behavior::{Behavior, BehaviorParams};
pub use common::is_conflict_free;
pub use effect::Effect;
pub use honest::HonestBehavior;
pub use malicious::MaliciousBehavior;
pub use node::{MiningAction, Node};
pub use reconfig::{apply_behavior_change, apply_hashpower_change, BehaviorKind};

//! The four-event polymorphic handler interface shared by Honest and
//! Malicious nodes.

use sim_chain::Block;
use sim_types::{SimTime, Transaction};

use crate::effect::Effect;
use crate::node::Node;

/// Parameters a handler needs but that live outside the node (shaping
/// rules shared network-wide).
#[derive(Debug, Clone, Copy)]
pub struct BehaviorParams {
    pub max_block_size: u64,
    pub now: SimTime,
}

pub trait Behavior: std::fmt::Debug {
    fn on_client_tx(&mut self, node: &mut Node, tx: Transaction, params: BehaviorParams) -> Vec<Effect>;

    fn on_propagated_tx(&mut self, node: &mut Node, tx: Transaction, params: BehaviorParams) -> Vec<Effect>;

    fn on_propagated_container(&mut self, node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect>;

    fn on_validation_complete(&mut self, node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect>;
}

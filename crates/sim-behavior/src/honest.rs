//! The honest node: accepts, pools, mines and propagates in good faith.

use sim_chain::Block;
use sim_types::Transaction;

use crate::behavior::{Behavior, BehaviorParams};
use crate::common::{handle_incoming_tx, handle_propagated_container, publish_own_block};
use crate::effect::Effect;
use crate::node::Node;

#[derive(Debug, Default)]
pub struct HonestBehavior;

impl Behavior for HonestBehavior {
    fn on_client_tx(&mut self, node: &mut Node, tx: Transaction, params: BehaviorParams) -> Vec<Effect> {
        handle_incoming_tx(node, tx, params, false)
    }

    fn on_propagated_tx(&mut self, node: &mut Node, tx: Transaction, params: BehaviorParams) -> Vec<Effect> {
        handle_incoming_tx(node, tx, params, true)
    }

    fn on_propagated_container(&mut self, node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect> {
        handle_propagated_container(node, block, params)
    }

    fn on_validation_complete(&mut self, node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect> {
        publish_own_block(node, block, params)
    }
}

//! A mining node: its local pool, chain view, mining controller and
//! pluggable behavior strategy.

use rand::rngs::StdRng;
use rand::SeedableRng;
use sim_chain::{Block, BlockchainStructure};
use sim_mining::{sample_pow_duration, MiningController, MiningDecision};
use sim_scheduler::EventHandle;
use sim_types::{NodeId, SimTime, Transaction, TransactionGroup};

use crate::behavior::{Behavior, BehaviorParams};
use crate::effect::Effect;
use crate::honest::HonestBehavior;

/// What a node's mining glue decided to do this tick. Unlike
/// `sim_mining::MiningDecision`, `Start` already carries the sampled
/// `fire_time`, since only the node knows its own hash power.
#[derive(Debug)]
pub enum MiningAction {
    NoOp,
    Abandoned,
    Start { fire_time: SimTime },
}

pub struct Node {
    pub id: NodeId,
    pub hash_power: f64,
    pub operating_difficulty: f64,
    pub pool: TransactionGroup,
    pub mining_pool: TransactionGroup,
    pub structure: BlockchainStructure,
    pub mining: MiningController,
    pub behavior: Box<dyn Behavior>,
    rng: StdRng,
}

impl Node {
    pub fn new(
        id: NodeId,
        hash_power: f64,
        operating_difficulty: f64,
        min_value_to_mine: f64,
        behavior: Box<dyn Behavior>,
        rng_seed: u64,
    ) -> Self {
        Node {
            id,
            hash_power,
            operating_difficulty,
            pool: TransactionGroup::new(),
            mining_pool: TransactionGroup::new(),
            structure: BlockchainStructure::new(),
            mining: MiningController::new(min_value_to_mine),
            behavior,
            rng: StdRng::seed_from_u64(rng_seed),
        }
    }

    pub fn rebuild_mining_pool(&mut self, max_block_size: u64) {
        self.mining_pool = self.pool.top_n_by_fee_per_size(max_block_size);
    }

    /// Runs the mining transition table and, on `Start`, samples a PoW
    /// duration with this node's own hash power.
    pub fn consider_mining(&mut self, now: SimTime) -> MiningAction {
        let fee_value = self.mining_pool.total_fee_value();
        match self.mining.consider_mining(fee_value) {
            MiningDecision::NoOp => MiningAction::NoOp,
            MiningDecision::Abandoned => MiningAction::Abandoned,
            MiningDecision::Start => {
                let duration =
                    sample_pow_duration(self.hash_power, self.operating_difficulty, &mut self.rng);
                MiningAction::Start { fire_time: now + duration }
            }
        }
    }

    pub fn begin_mining(&mut self, handle: EventHandle, started_at: SimTime) {
        self.mining.begin_mining(handle, started_at);
    }

    /// Runs `f` against this node's behavior, with the node itself passed
    /// back in. The behavior is parked behind a placeholder for the
    /// duration of the call so `f` can take `&mut Node` without aliasing
    /// the `Box<dyn Behavior>` living inside it.
    fn with_behavior<R>(&mut self, f: impl FnOnce(&mut dyn Behavior, &mut Node) -> R) -> R {
        let mut behavior = std::mem::replace(&mut self.behavior, Box::new(HonestBehavior));
        let result = f(behavior.as_mut(), self);
        self.behavior = behavior;
        result
    }

    pub fn dispatch_client_tx(&mut self, tx: Transaction, params: BehaviorParams) -> Vec<Effect> {
        self.with_behavior(|b, n| b.on_client_tx(n, tx, params))
    }

    pub fn dispatch_propagated_tx(&mut self, tx: Transaction, params: BehaviorParams) -> Vec<Effect> {
        self.with_behavior(|b, n| b.on_propagated_tx(n, tx, params))
    }

    pub fn dispatch_propagated_container(&mut self, block: Block, params: BehaviorParams) -> Vec<Effect> {
        self.with_behavior(|b, n| b.on_propagated_container(n, block, params))
    }

    pub fn dispatch_validation_complete(&mut self, block: Block, params: BehaviorParams) -> Vec<Effect> {
        self.with_behavior(|b, n| b.on_validation_complete(n, block, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_types::TxId;

    fn params() -> BehaviorParams {
        BehaviorParams { max_block_size: 1_000_000, now: SimTime::ZERO }
    }

    #[test]
    fn dispatch_client_tx_reaches_the_real_behavior() {
        let mut node = Node::new(NodeId(0), 1.0e9, 1.0e6, 0.0, Box::new(HonestBehavior), 1);
        let tx = Transaction::new(TxId(1), 100, 5.0, None);
        let effects = node.dispatch_client_tx(tx, params());
        assert!(node.pool.contains(TxId(1)));
        assert!(effects.iter().any(|e| matches!(e, Effect::PropagateTx(_))));
    }

    #[test]
    fn with_behavior_restores_the_original_behavior() {
        let mut node = Node::new(NodeId(0), 1.0e9, 1.0e6, 0.0, Box::new(HonestBehavior), 1);
        node.dispatch_client_tx(Transaction::new(TxId(1), 100, 5.0, None), params());
        assert!(format!("{:?}", node.behavior).contains("HonestBehavior"));
    }
}

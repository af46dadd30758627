//! The malicious node: gossips transactions truthfully, but diverts its own
//! mined blocks into a private chain once it has watched the target
//! transaction accumulate enough confirmations, revealing the chain under
//! a defined tie-break rule.

use sim_chain::Block;
use sim_types::{BlockId, TxId};
use tracing::debug;

use crate::behavior::{Behavior, BehaviorParams};
use crate::common::{handle_incoming_tx, handle_propagated_container, publish_own_block, rebuild_and_consider};
use crate::effect::Effect;
use crate::node::Node;

#[derive(Debug, Clone)]
enum State {
    Idle,
    Watching { target_height: u64 },
    Attacking {
        target_height: u64,
        public_height_at_attack_start: u64,
        fork_base: BlockId,
        hidden_chain: Vec<Block>,
    },
}

#[derive(Debug)]
pub struct MaliciousBehavior {
    target_tx_id: TxId,
    required_confirmations: u64,
    min_chain_length: u64,
    max_chain_length: u64,
    state: State,
}

impl MaliciousBehavior {
    pub fn new(
        target_tx_id: TxId,
        required_confirmations: u64,
        min_chain_length: u64,
        max_chain_length: u64,
    ) -> Self {
        MaliciousBehavior {
            target_tx_id,
            required_confirmations,
            min_chain_length,
            max_chain_length,
            state: State::Idle,
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.state, State::Attacking { .. })
    }

    /// Re-examines the structure this behavior just took over, for the
    /// case where a `BehaviorChange` swaps a node to Malicious after the
    /// target transaction already appeared in the public structure.
    pub fn bootstrap(&mut self, node: &mut Node, params: BehaviorParams) -> Vec<Effect> {
        self.on_structure_grew(node, params)
    }

    /// Re-examines the structure after any block (own or peer's) was
    /// appended. Drives Idle -> Watching, the confirmation count-up, and
    /// the reveal check while Attacking. Called after the block that
    /// triggered the change has already been added to the public structure
    /// (or, for a hidden block, to `hidden_chain`).
    fn on_structure_grew(&mut self, node: &mut Node, params: BehaviorParams) -> Vec<Effect> {
        let mut effects = Vec::new();
        match &self.state {
            State::Idle => {
                if let Some(target_block) = node.structure.block_carrying_tx(self.target_tx_id) {
                    let height = target_block.height;
                    let block_id = target_block.id;
                    self.state = State::Watching { target_height: height };
                    effects.push(Effect::AttackState {
                        tx_id: self.target_tx_id,
                        state: "Watching",
                        block_id: Some(block_id),
                        block_height: Some(height),
                        hidden_chain_len: 0,
                        public_growth: 0,
                        outcome: "started",
                    });
                    effects.extend(self.on_structure_grew(node, params));
                }
            }
            State::Watching { target_height } => {
                let target_height = *target_height;
                let confirmations = node.structure.height().saturating_sub(target_height);
                if confirmations >= self.required_confirmations {
                    self.begin_attack(node, target_height, &mut effects);
                }
            }
            State::Attacking { .. } => {
                effects.extend(self.check_reveal(node, params));
            }
        }
        effects
    }

    fn begin_attack(&mut self, node: &mut Node, target_height: u64, effects: &mut Vec<Effect>) {
        let tip_height = node.structure.longest_tip().height;
        let public_height_at_attack_start = if node.structure.longest_path_contains_tx(self.target_tx_id) {
            tip_height.saturating_sub(1)
        } else {
            tip_height
        };
        let target_block = node.structure.block_carrying_tx(self.target_tx_id);
        let target_block_id = target_block.map(|b| b.id);
        let fork_base = target_block.and_then(|b| b.parent).unwrap_or(sim_chain::GENESIS_ID);

        node.pool.remove_group([self.target_tx_id]);
        debug!(node = ?node.id, target_height, fork_base = ?fork_base, "attack started");
        self.state = State::Attacking {
            target_height,
            public_height_at_attack_start,
            fork_base,
            hidden_chain: Vec::new(),
        };
        effects.push(Effect::AttackState {
            tx_id: self.target_tx_id,
            state: "Attacking",
            block_id: target_block_id,
            block_height: Some(target_height),
            hidden_chain_len: 0,
            public_growth: 0,
            outcome: "started",
        });
    }

    fn check_reveal(&mut self, node: &mut Node, params: BehaviorParams) -> Vec<Effect> {
        let State::Attacking { public_height_at_attack_start, hidden_chain, .. } = &self.state else {
            return Vec::new();
        };
        let public_growth = node.structure.height().saturating_sub(*public_height_at_attack_start);
        let hidden_len = hidden_chain.len() as u64;

        let should_reveal = (hidden_len > public_growth && public_growth > self.min_chain_length)
            || public_growth > self.max_chain_length;

        if !should_reveal {
            return Vec::new();
        }

        self.reveal(node, params)
    }

    fn reveal(&mut self, node: &mut Node, params: BehaviorParams) -> Vec<Effect> {
        let State::Attacking { fork_base, hidden_chain, .. } = std::mem::replace(&mut self.state, State::Idle) else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        let revealed_len = hidden_chain.len() as u64;
        debug!(node = ?node.id, revealed_len, "revealing hidden chain");
        let mut parent = fork_base;
        for mut block in hidden_chain {
            block.parent = Some(parent);
            let to_propagate = block.clone();
            parent = block.id;
            match node.structure.add(block) {
                Ok(()) => effects.push(Effect::PropagateBlock(to_propagate)),
                Err(err) => effects.push(Effect::Discarded { reason: err.to_string() }),
            }
        }

        node.pool.remove_group([self.target_tx_id]);
        rebuild_and_consider(node, params, &mut effects);

        effects.push(Effect::AttackState {
            tx_id: self.target_tx_id,
            state: "Idle",
            block_id: None,
            block_height: None,
            hidden_chain_len: revealed_len,
            public_growth: 0,
            outcome: "revealed",
        });
        effects
    }
}

impl Behavior for MaliciousBehavior {
    fn on_client_tx(&mut self, node: &mut Node, tx: sim_types::Transaction, params: BehaviorParams) -> Vec<Effect> {
        handle_incoming_tx(node, tx, params, false)
    }

    fn on_propagated_tx(&mut self, node: &mut Node, tx: sim_types::Transaction, params: BehaviorParams) -> Vec<Effect> {
        handle_incoming_tx(node, tx, params, true)
    }

    fn on_propagated_container(&mut self, node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect> {
        // Blocks received from peers always go to the public structure,
        // even mid-attack: the attacker needs an accurate view of how far
        // the honest chain has grown to decide when to reveal.
        let mut effects = handle_propagated_container(node, block, params);
        effects.extend(self.on_structure_grew(node, params));
        effects
    }

    fn on_validation_complete(&mut self, node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect> {
        if let State::Attacking { hidden_chain, .. } = &mut self.state {
            let tx_ids = block.transactions.ids();
            hidden_chain.push(block);
            node.pool.remove_group(&tx_ids);
            let mut effects = self.check_reveal(node, params);
            rebuild_and_consider(node, params, &mut effects);
            return effects;
        }

        let mut effects = publish_own_block(node, block, params);
        effects.extend(self.on_structure_grew(node, params));
        effects
    }
}

//! Handling shared verbatim between Honest and Malicious: both gossip
//! transactions truthfully, and both reconstruct the mining pool and
//! reconsider mining the same way after any pool or structure change.

use sim_chain::{Block, BlockchainStructure};
use sim_types::{Transaction, TransactionGroup};

use crate::behavior::BehaviorParams;
use crate::effect::Effect;
use crate::node::{MiningAction, Node};

pub fn is_conflict_free(tx: &Transaction, pool: &TransactionGroup, structure: &BlockchainStructure) -> bool {
    match tx.conflict_peer_id {
        None => true,
        Some(peer) => !pool.contains(peer) && !structure.contains_tx(peer),
    }
}

/// `check_duplicate` distinguishes the client-tx path (never rejects on
/// "already known") from the propagated-tx path (does).
pub fn handle_incoming_tx(
    node: &mut Node,
    tx: Transaction,
    params: BehaviorParams,
    check_duplicate: bool,
) -> Vec<Effect> {
    if check_duplicate && (node.pool.contains(tx.id) || node.structure.contains_tx(tx.id)) {
        return vec![Effect::Discarded {
            reason: format!("tx {} already known", tx.id),
        }];
    }
    if !is_conflict_free(&tx, &node.pool, &node.structure) {
        return vec![Effect::Discarded {
            reason: format!("tx {} conflicts with an existing transaction", tx.id),
        }];
    }

    let propagated = tx.clone();
    node.pool.insert(tx);

    let mut effects = vec![Effect::PropagateTx(propagated)];
    rebuild_and_consider(node, params, &mut effects);
    effects
}

/// The propagated-container path, identical for Honest and for Malicious
/// blocks received from peers (the malicious node only diverts blocks it
/// mines itself while attacking).
pub fn handle_propagated_container(node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect> {
    let tx_ids = block.transactions.ids();
    if let Err(err) = node.structure.add(block) {
        return vec![Effect::Discarded { reason: err.to_string() }];
    }
    node.pool.remove_group(&tx_ids);

    let mut effects = Vec::new();
    rebuild_and_consider(node, params, &mut effects);
    effects
}

/// Adds a freshly mined block to the public structure and schedules its
/// propagation. Shared by Honest's normal path and Malicious's non-attacking path.
pub fn publish_own_block(node: &mut Node, block: Block, params: BehaviorParams) -> Vec<Effect> {
    // `block.parent` is left `None`; `BlockchainStructure::add` extends the
    // current longest tip in that case, which is exactly "mine on top of
    // whatever the tip is right now".
    let tx_ids = block.transactions.ids();
    let to_propagate = block.clone();

    let mut effects = match node.structure.add(block) {
        Ok(()) => vec![Effect::PropagateBlock(to_propagate)],
        Err(err) => vec![Effect::Discarded { reason: err.to_string() }],
    };
    node.pool.remove_group(&tx_ids);
    rebuild_and_consider(node, params, &mut effects);
    effects
}

pub fn rebuild_and_consider(node: &mut Node, params: BehaviorParams, effects: &mut Vec<Effect>) {
    node.rebuild_mining_pool(params.max_block_size);
    if let MiningAction::Start { fire_time } = node.consider_mining(params.now) {
        effects.push(Effect::BeginMining { fire_time });
    }
}

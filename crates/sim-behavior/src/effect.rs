//! What a `Behavior` handler asks the runtime to do next. The behavior
//! layer never touches the scheduler directly — it doesn't know the
//! concrete event payload type — so it reports intent and the runtime
//! carries it out.

use sim_chain::Block;
use sim_types::{BlockId, SimTime, Transaction, TxId};

#[derive(Debug, Clone)]
pub enum Effect {
    /// Gossip this transaction to peers.
    PropagateTx(Transaction),
    /// Gossip this block to peers (already attached to the public structure).
    PropagateBlock(Block),
    /// Schedule a `ValidationComplete` for this node at `fire_time`; the
    /// runtime must call `Node::begin_mining` with the resulting handle.
    BeginMining { fire_time: SimTime },
    /// Something was rejected; record it for the event log rather than act on it.
    Discarded { reason: String },
    /// The malicious state machine changed state; record it for the attack log.
    AttackState {
        tx_id: TxId,
        state: &'static str,
        block_id: Option<BlockId>,
        block_height: Option<u64>,
        hidden_chain_len: u64,
        public_growth: u64,
        outcome: &'static str,
    },
}

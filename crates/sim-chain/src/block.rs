//! The `Block` value type.

use sim_types::{BlockId, NodeId, SimTime, TransactionGroup};

/// The id of the implicit genesis sentinel every `BlockchainStructure` is
/// seeded with. Real blocks never use this id (`IdAllocator` starts
/// allocation at 1); a block whose `parent` is `GENESIS_ID` gets height 1
/// for free from the usual `height(parent) + 1` rule.
pub const GENESIS_ID: BlockId = BlockId(0);

/// A mined or propagated block.
///
/// Mutable only in the narrow window between creation (by a node's mining
/// controller) and first insertion into a `BlockchainStructure`, which is
/// what stamps `parent` and `height`. After insertion a block is logically
/// immutable; propagation clones it so each recipient can set its own
/// `current_node_id` bookkeeping without aliasing another node's copy.
#[derive(Clone, Debug)]
pub struct Block {
    pub id: BlockId,
    pub height: u64,
    pub parent: Option<BlockId>,
    pub transactions: TransactionGroup,
    pub validator_node_id: NodeId,
    pub validation_sim_time: SimTime,
    pub validation_difficulty: f64,
    pub validation_cycles: f64,
    pub last_event: String,
}

impl Block {
    /// Builds a candidate block before it has a parent or height assigned;
    /// those are filled in by `BlockchainStructure::add`.
    pub fn candidate(
        id: BlockId,
        transactions: TransactionGroup,
        validator_node_id: NodeId,
        validation_sim_time: SimTime,
        validation_difficulty: f64,
        validation_cycles: f64,
    ) -> Self {
        Self {
            id,
            height: 0,
            parent: None,
            transactions,
            validator_node_id,
            validation_sim_time,
            validation_difficulty,
            validation_cycles,
            last_event: String::from("mined"),
        }
    }

    fn genesis() -> Self {
        Self {
            id: GENESIS_ID,
            height: 0,
            parent: None,
            transactions: TransactionGroup::new(),
            validator_node_id: NodeId(0),
            validation_sim_time: SimTime::ZERO,
            validation_difficulty: 0.0,
            validation_cycles: 0.0,
            last_event: String::from("genesis"),
        }
    }
}

pub(crate) fn make_genesis() -> Block {
    Block::genesis()
}

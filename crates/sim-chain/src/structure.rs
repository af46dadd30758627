//! The DAG of blocks, orphan handling, and longest-tip selection.

use crate::block::{make_genesis, Block, GENESIS_ID};
use crate::error::StructureError;
use sim_types::{BlockId, TxId};
use std::collections::HashMap;

/// A node's local view of the blockchain.
///
/// Blocks live in `blocks` once attached (a path to genesis exists);
/// blocks whose declared parent is not yet known sit in `orphans`.
/// `waiting_on` indexes orphans by the parent id they're blocked on, so
/// adoption on a new arrival is a direct lookup rather than a scan.
///
/// Per the design note, this is an arena keyed by the stable `BlockId`
/// rather than owned parent pointers: propagation detaches and reattaches
/// blocks across nodes, and integer ids survive that without lifetime
/// gymnastics.
#[derive(Debug)]
pub struct BlockchainStructure {
    blocks: HashMap<BlockId, Block>,
    orphans: HashMap<BlockId, Block>,
    waiting_on: HashMap<BlockId, Vec<BlockId>>,
}

impl Default for BlockchainStructure {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockchainStructure {
    pub fn new() -> Self {
        let mut blocks = HashMap::new();
        blocks.insert(GENESIS_ID, make_genesis());
        Self {
            blocks,
            orphans: HashMap::new(),
            waiting_on: HashMap::new(),
        }
    }

    /// True if `id` names a block anywhere in the structure, attached or
    /// orphaned. Used as the duplicate-insertion guard: a block seen twice
    /// via two delivery paths (own validation and propagation, say) must
    /// only ever be added once.
    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id) || self.orphans.contains_key(&id)
    }

    /// True if any block anywhere in the structure (attached or orphaned)
    /// carries a transaction with this id.
    pub fn contains_tx(&self, tx_id: TxId) -> bool {
        self.blocks
            .values()
            .chain(self.orphans.values())
            .any(|b| b.transactions.contains(tx_id))
    }

    fn conflicting_tx(&self, block: &Block) -> Option<TxId> {
        block.transactions.iter().find_map(|tx| {
            tx.conflict_peer_id
                .filter(|peer| self.contains_tx(*peer))
                .map(|_| tx.id)
        })
    }

    /// The tip of maximum height, ties broken by smallest block id. Never
    /// an orphan. Falls back to genesis if nothing else is attached.
    pub fn longest_tip(&self) -> &Block {
        self.blocks
            .values()
            .max_by(|a, b| a.height.cmp(&b.height).then_with(|| b.id.cmp(&a.id)))
            .expect("genesis is always present")
    }

    pub fn height(&self) -> u64 {
        self.longest_tip().height
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id).or_else(|| self.orphans.get(&id))
    }

    /// The attached block carrying `tx_id`, if any. Used by the malicious
    /// behavior to find the block it must count confirmations from; orphans
    /// are excluded since their height is not yet meaningful.
    pub fn block_carrying_tx(&self, tx_id: TxId) -> Option<&Block> {
        self.blocks.values().find(|b| b.transactions.contains(tx_id))
    }

    /// True if `tx_id` appears in a block on the path from genesis to the
    /// current longest tip. Unlike `contains_tx`, blocks sitting on a losing
    /// fork don't count.
    pub fn longest_path_contains_tx(&self, tx_id: TxId) -> bool {
        let mut current = Some(self.longest_tip().id);
        while let Some(id) = current {
            let Some(block) = self.blocks.get(&id) else {
                break;
            };
            if block.transactions.contains(tx_id) {
                return true;
            }
            current = block.parent;
        }
        false
    }

    /// Attempts to attach `block` to its declared parent.
    ///
    /// A `None` parent is interpreted as "extend the current longest tip"
    /// (the edge case where a mining controller built the candidate before
    /// a reorg moved the tip out from under it). If the resolved parent is
    /// unknown, the block is filed as an orphan rather than rejected, and
    /// adoption is retried via BFS over `waiting_on` as new blocks arrive.
    pub fn add(&mut self, mut block: Block) -> Result<(), StructureError> {
        if self.contains(block.id) {
            return Err(StructureError::AlreadyExists { id: block.id });
        }
        if let Some(conflicting_tx) = self.conflicting_tx(&block) {
            return Err(StructureError::ConflictingTransaction {
                block: block.id,
                conflicting_tx,
            });
        }

        let parent_id = block.parent.unwrap_or_else(|| self.longest_tip().id);
        block.parent = Some(parent_id);

        match self.blocks.get(&parent_id) {
            Some(parent) => {
                block.height = parent.height + 1;
                let id = block.id;
                self.blocks.insert(id, block);
                self.adopt_orphans_of(id);
                Ok(())
            }
            None => {
                self.waiting_on.entry(parent_id).or_default().push(block.id);
                self.orphans.insert(block.id, block);
                Ok(())
            }
        }
    }

    /// BFS: once `parent_id` is attached, walk every orphan directly
    /// waiting on it, attach it, then repeat for its own waiters.
    fn adopt_orphans_of(&mut self, parent_id: BlockId) {
        let mut frontier = vec![parent_id];
        while let Some(id) = frontier.pop() {
            let Some(waiters) = self.waiting_on.remove(&id) else {
                continue;
            };
            let parent_height = self
                .blocks
                .get(&id)
                .map(|b| b.height)
                .unwrap_or_default();
            for orphan_id in waiters {
                if let Some(mut orphan) = self.orphans.remove(&orphan_id) {
                    orphan.height = parent_height + 1;
                    self.blocks.insert(orphan_id, orphan);
                    frontier.push(orphan_id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_types::{NodeId, SimTime, TransactionGroup};

    fn block(id: u64, parent: Option<u64>) -> Block {
        Block {
            id: BlockId(id),
            height: 0,
            parent: parent.map(BlockId),
            transactions: TransactionGroup::new(),
            validator_node_id: NodeId(0),
            validation_sim_time: SimTime::ZERO,
            validation_difficulty: 1.0,
            validation_cycles: 1.0,
            last_event: "mined".into(),
        }
    }

    #[test]
    fn genesis_child_gets_height_one() {
        let mut chain = BlockchainStructure::new();
        chain.add(block(1, Some(0))).unwrap();
        assert_eq!(chain.get(BlockId(1)).unwrap().height, 1);
        assert_eq!(chain.height(), 1);
    }

    #[test]
    fn unknown_parent_becomes_orphan_then_is_adopted() {
        let mut chain = BlockchainStructure::new();
        chain.add(block(2, Some(1))).unwrap(); // orphan: parent 1 unknown
        assert_eq!(chain.height(), 0);
        assert!(chain.contains(BlockId(2))); // orphans still count as "contains"

        chain.add(block(1, Some(0))).unwrap();
        assert_eq!(chain.height(), 2);
        assert_eq!(chain.get(BlockId(2)).unwrap().height, 2);
    }

    #[test]
    fn longest_tip_breaks_ties_by_smallest_id() {
        let mut chain = BlockchainStructure::new();
        chain.add(block(5, Some(0))).unwrap();
        chain.add(block(3, Some(0))).unwrap();
        assert_eq!(chain.longest_tip().id, BlockId(3));
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let mut chain = BlockchainStructure::new();
        chain.add(block(1, Some(0))).unwrap();
        let err = chain.add(block(1, Some(0))).unwrap_err();
        assert!(matches!(err, StructureError::AlreadyExists { id } if id == BlockId(1)));
    }

    #[test]
    fn missing_parent_extends_current_tip() {
        let mut chain = BlockchainStructure::new();
        chain.add(block(1, Some(0))).unwrap();
        chain.add(block(2, None)).unwrap();
        assert_eq!(chain.get(BlockId(2)).unwrap().parent, Some(BlockId(1)));
        assert_eq!(chain.get(BlockId(2)).unwrap().height, 2);
    }

    #[test]
    fn longest_path_excludes_losing_fork() {
        use sim_types::Transaction;

        let mut fork_block = block(2, Some(0));
        fork_block.transactions.insert(Transaction::new(TxId(20), 100, 1.0, None));

        let mut chain = BlockchainStructure::new();
        chain.add(block(1, Some(0))).unwrap();
        chain.add(fork_block).unwrap();
        chain.add(block(3, Some(1))).unwrap();
        chain.add(block(4, Some(3))).unwrap();

        assert_eq!(chain.height(), 3);
        assert!(!chain.longest_path_contains_tx(TxId(20)));
        assert!(chain.contains_tx(TxId(20)));
    }

    #[test]
    fn block_carrying_tx_finds_the_attached_block() {
        use sim_types::Transaction;

        let mut with_tx = block(1, Some(0));
        with_tx.transactions.insert(Transaction::new(TxId(10), 100, 1.0, None));

        let mut chain = BlockchainStructure::new();
        chain.add(with_tx).unwrap();
        assert_eq!(chain.block_carrying_tx(TxId(10)).unwrap().id, BlockId(1));
        assert!(chain.block_carrying_tx(TxId(11)).is_none());
    }
}

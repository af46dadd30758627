//! The transaction group / pool: an ordered multiset of transactions.
//!
//! Supports containment by id, top-N selection by `fee/size` descending,
//! and bulk removal by group. Used both as a node's persistent `pool` and
//! as the immutable snapshot of transactions carried inside a `Block`.

use crate::ids::TxId;
use crate::transaction::Transaction;
use std::collections::HashMap;

/// Entry used purely to order transactions by fee density without cloning
/// the whole `Transaction` into the ordering index.
#[derive(Clone, Copy, PartialEq)]
struct Density {
    fee_per_size: f64,
    id: TxId,
}

impl Eq for Density {}

impl Ord for Density {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Descending by density, ties broken by smallest id for determinism.
        other
            .fee_per_size
            .total_cmp(&self.fee_per_size)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Density {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// An ordered multiset of transactions.
///
/// Backed by a `HashMap` for O(1) containment and a sorted index rebuilt
/// lazily for `top_n_by_fee_per_size`. The pool is small enough in this
/// simulator's workloads that rebuilding the index on read is simpler and
/// fast enough; there is no need for the BTreeSet-per-insert machinery a
/// production mempool would want.
#[derive(Clone, Debug, Default)]
pub struct TransactionGroup {
    by_id: HashMap<TxId, Transaction>,
}

impl TransactionGroup {
    pub fn new() -> Self {
        Self {
            by_id: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn insert(&mut self, tx: Transaction) {
        self.by_id.insert(tx.id, tx);
    }

    pub fn contains(&self, id: TxId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn get(&self, id: TxId) -> Option<&Transaction> {
        self.by_id.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.by_id.values()
    }

    /// Removes every transaction in `ids`, ignoring ids that are absent.
    pub fn remove_group<I: IntoIterator<Item = TxId>>(&mut self, ids: I) {
        for id in ids {
            self.by_id.remove(&id);
        }
    }

    /// Returns the ids currently held, in no particular order.
    pub fn ids(&self) -> Vec<TxId> {
        self.by_id.keys().copied().collect()
    }

    pub fn total_fee_value(&self) -> f64 {
        self.by_id.values().map(|tx| tx.fee).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.by_id.values().map(|tx| tx.size).sum()
    }

    /// Selects transactions greedily by descending fee/size until `max_size`
    /// bytes would be exceeded. This is the mining-pool snapshot construction
    /// described for the mining controller.
    pub fn top_n_by_fee_per_size(&self, max_size: u64) -> TransactionGroup {
        let mut ordered: Vec<&Transaction> = self.by_id.values().collect();
        ordered.sort_by_key(|tx| Density {
            fee_per_size: tx.fee_per_size(),
            id: tx.id,
        });

        let mut selected = TransactionGroup::new();
        let mut running_size = 0u64;
        for tx in ordered {
            let candidate_size = running_size + tx.size;
            if candidate_size > max_size {
                continue;
            }
            running_size = candidate_size;
            selected.insert(tx.clone());
        }
        selected
    }
}

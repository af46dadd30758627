//! The transaction value type.

use crate::ids::TxId;

/// An immutable transaction.
///
/// Equality and hashing are by `id` alone; `size` and `fee` are used for
/// ordering decisions (fee/size) but play no role in identity.
///
/// `conflict_peer_id` names another transaction that cannot coexist with
/// this one in any chain (a double-spend pair). The simulator does not
/// model UTXOs; conflicts are declared by the workload generator.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub id: TxId,
    pub size: u64,
    pub fee: f64,
    pub conflict_peer_id: Option<TxId>,
}

impl Transaction {
    pub fn new(id: TxId, size: u64, fee: f64, conflict_peer_id: Option<TxId>) -> Self {
        Self {
            id,
            size,
            fee,
            conflict_peer_id,
        }
    }

    /// Fee per byte, used to rank transactions for block inclusion.
    ///
    /// A zero-size transaction is a malformed input from the workload
    /// generator; treat it as having no density rather than dividing by
    /// zero.
    pub fn fee_per_size(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.fee / self.size as f64
        }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_id_only() {
        let a = Transaction::new(TxId(1), 100, 5.0, None);
        let b = Transaction::new(TxId(1), 999, 0.0, Some(TxId(7)));
        assert_eq!(a, b);
    }

    #[test]
    fn fee_per_size_handles_zero_size() {
        let tx = Transaction::new(TxId(1), 0, 5.0, None);
        assert_eq!(tx.fee_per_size(), 0.0);
    }
}

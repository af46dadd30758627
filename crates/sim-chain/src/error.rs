//! Non-fatal structure errors, logged to the `ErrorLog` and otherwise
//! swallowed: the offending operation simply has no effect.

use sim_types::{BlockId, TxId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("block {id} already present in structure")]
    AlreadyExists { id: BlockId },

    #[error("block {block} conflicts with existing transaction {conflicting_tx}")]
    ConflictingTransaction {
        block: BlockId,
        conflicting_tx: TxId,
    },
}

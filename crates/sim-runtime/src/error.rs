//! Error taxonomy for the runtime layer.
//!
//! `EventError` covers malformed-but-survivable input (a reconfiguration
//! entry naming a node that doesn't exist in this run) and is always
//! logged and discarded rather than propagated. `AssertionError` covers
//! contradictions between a node's recorded state and the event the
//! scheduler just delivered it — these should never happen in correct
//! code, so `Simulation::run` treats one as fatal and aborts the run.

use sim_types::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("event targeted unknown node {node_id}")]
    UnknownNode { node_id: NodeId },
}

#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("mining controller assertion failed on node {node_id}: {source}")]
    Mining {
        node_id: NodeId,
        #[source]
        source: sim_mining::MiningAssertionError,
    },
}

//! The concrete event payload the scheduler is instantiated with. Nothing
//! outside this crate inspects `EventKind` directly — `sim-scheduler` is
//! generic over it and `sim-behavior` only ever hands back `Effect`s.

use sim_behavior::BehaviorKind;
use sim_chain::Block;
use sim_types::{NodeId, Transaction};

#[derive(Debug, Clone)]
pub enum EventKind {
    /// A synthetic client transaction is ready to be submitted to a node.
    TxArrival,
    /// `tx` has finished transiting the network link to `target`.
    TxPropagation { target: NodeId, tx: Transaction },
    /// `block` has finished transiting the network link to `target`.
    ContainerPropagation { target: NodeId, block: Block },
    /// `node`'s in-flight proof-of-work has finished.
    ValidationComplete { node: NodeId },
    /// A scripted hashpower change takes effect at this node.
    HashPowerChange { node: NodeId, new_power: f64 },
    /// A scripted behavior swap takes effect at this node.
    BehaviorChange { node: NodeId, kind: BehaviorKind },
}

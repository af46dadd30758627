//! Runtime reconfiguration: hashpower changes and behavior swaps. Both are
//! scheduled mutations a reconfiguration event applies at its fire time;
//! neither touches the mining controller's in-flight state.

use sim_types::TxId;

use crate::behavior::BehaviorParams;
use crate::effect::Effect;
use crate::honest::HonestBehavior;
use crate::malicious::MaliciousBehavior;
use crate::node::Node;

/// Mutates the node's hash rate. If the node is currently mining, the
/// in-flight `ValidationComplete` keeps its original fire time — only
/// future PoW draws use the new rate.
pub fn apply_hashpower_change(node: &mut Node, new_hash_power: f64) {
    node.hash_power = new_hash_power;
}

/// The two behavior variants a `BehaviorChange` event can swap a node to.
#[derive(Debug, Clone)]
pub enum BehaviorKind {
    Honest,
    Malicious {
        target_tx_id: TxId,
        required_confirmations: u64,
        min_chain_length: u64,
        max_chain_length: u64,
    },
}

/// Swaps the node's behavior strategy immediately. A `Malicious` swap
/// bootstraps the new behavior against the node's current structure, so a
/// target transaction already buried by the time of the swap is picked up
/// without waiting for the next structure-modifying event.
pub fn apply_behavior_change(node: &mut Node, kind: BehaviorKind, params: BehaviorParams) -> Vec<Effect> {
    match kind {
        BehaviorKind::Honest => {
            node.behavior = Box::new(HonestBehavior);
            Vec::new()
        }
        BehaviorKind::Malicious {
            target_tx_id,
            required_confirmations,
            min_chain_length,
            max_chain_length,
        } => {
            let mut malicious =
                MaliciousBehavior::new(target_tx_id, required_confirmations, min_chain_length, max_chain_length);
            let effects = malicious.bootstrap(node, params);
            node.behavior = Box::new(malicious);
            effects
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_types::{NodeId, SimTime};

    fn node() -> Node {
        Node::new(NodeId(0), 1.0e9, 1.0e6, 0.0, Box::new(HonestBehavior), 3)
    }

    #[test]
    fn hashpower_change_updates_the_rate() {
        let mut n = node();
        apply_hashpower_change(&mut n, 5.0e10);
        assert_eq!(n.hash_power, 5.0e10);
    }

    #[test]
    fn behavior_change_to_malicious_swaps_strategy() {
        let mut n = node();
        let params = BehaviorParams { max_block_size: 1_000_000, now: SimTime::ZERO };
        apply_behavior_change(
            &mut n,
            BehaviorKind::Malicious {
                target_tx_id: TxId(10),
                required_confirmations: 2,
                min_chain_length: 2,
                max_chain_length: 15,
            },
            params,
        );
        assert_eq!(format!("{:?}", n.behavior).contains("MaliciousBehavior"), true);
    }
}

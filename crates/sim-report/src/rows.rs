//! One row type per CSV reporter. Field order is the column order, fixed
//! by the interfaces these logs are consumed by downstream.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use sim_chain::Block;
use sim_types::{BlockId, NodeId, TxId};

/// Wall-clock seconds since the UNIX epoch at the moment a row is built,
/// independent of simulated time. Falls back to 0.0 if the system clock
/// is set before the epoch, which never happens in practice.
fn sys_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn join_tx_ids(block: &Block) -> String {
    let mut ids: Vec<u64> = block.transactions.ids().into_iter().map(|id| id.0).collect();
    ids.sort_unstable();
    ids.iter().map(u64::to_string).collect::<Vec<_>>().join(";")
}

#[derive(Debug, Clone, Serialize)]
pub struct EventLogRow {
    #[serde(rename = "SimID")]
    pub sim_id: u64,
    #[serde(rename = "SimTime")]
    pub sim_time: f64,
    #[serde(rename = "SysTime")]
    pub sys_time: f64,
    #[serde(rename = "NodeID")]
    pub node_id: Option<u64>,
    #[serde(rename = "EventType")]
    pub event_type: String,
    #[serde(rename = "Description")]
    pub detail: String,
}

impl EventLogRow {
    pub fn new(sim_id: u64, sim_time: f64, node_id: Option<NodeId>, event_type: impl Into<String>, detail: impl Into<String>) -> Self {
        EventLogRow {
            sim_id,
            sim_time,
            sys_time: sys_time(),
            node_id: node_id.map(|n| n.0),
            event_type: event_type.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockLogRow {
    #[serde(rename = "SimID")]
    pub sim_id: u64,
    #[serde(rename = "SimTime")]
    pub sim_time: f64,
    #[serde(rename = "SysTime")]
    pub sys_time: f64,
    #[serde(rename = "NodeID")]
    pub node_id: u64,
    #[serde(rename = "BlockID")]
    pub block_id: u64,
    #[serde(rename = "ParentID")]
    pub parent_id: Option<u64>,
    #[serde(rename = "Height")]
    pub height: u64,
    #[serde(rename = "BlockContent")]
    pub block_content: String,
    #[serde(rename = "EventType")]
    pub event_type: String,
    #[serde(rename = "Difficulty")]
    pub difficulty: f64,
    #[serde(rename = "Cycles")]
    pub cycles: f64,
}

impl BlockLogRow {
    pub fn new(sim_id: u64, sim_time: f64, node_id: NodeId, block: &Block) -> Self {
        BlockLogRow {
            sim_id,
            sim_time,
            sys_time: sys_time(),
            node_id: node_id.0,
            block_id: block.id.0,
            parent_id: block.parent.map(|p| p.0),
            height: block.height,
            block_content: join_tx_ids(block),
            event_type: block.last_event.clone(),
            difficulty: block.validation_difficulty,
            cycles: block.validation_cycles,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StructureLogRow {
    #[serde(rename = "SimID")]
    pub sim_id: u64,
    #[serde(rename = "SimTime")]
    pub sim_time: f64,
    #[serde(rename = "SysTime")]
    pub sys_time: f64,
    #[serde(rename = "NodeID")]
    pub node_id: u64,
    #[serde(rename = "BlockID")]
    pub block_id: u64,
    #[serde(rename = "ParentBlockID")]
    pub parent_block_id: Option<u64>,
    #[serde(rename = "Height")]
    pub height: u64,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "Place")]
    pub place: String,
}

impl StructureLogRow {
    pub fn new(sim_id: u64, sim_time: f64, node_id: NodeId, block: &Block, place: impl Into<String>) -> Self {
        StructureLogRow {
            sim_id,
            sim_time,
            sys_time: sys_time(),
            node_id: node_id.0,
            block_id: block.id.0,
            parent_block_id: block.parent.map(|p| p.0),
            height: block.height,
            content: join_tx_ids(block),
            place: place.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackLogRow {
    #[serde(rename = "SimID")]
    pub sim_id: u64,
    #[serde(rename = "SimTime")]
    pub sim_time: f64,
    #[serde(rename = "SysTime")]
    pub sys_time: f64,
    #[serde(rename = "NodeID")]
    pub node_id: u64,
    #[serde(rename = "EventType")]
    pub event_type: String,
    #[serde(rename = "TxID")]
    pub tx_id: u64,
    #[serde(rename = "BlockID")]
    pub block_id: Option<u64>,
    #[serde(rename = "BlockHeight")]
    pub block_height: Option<u64>,
    #[serde(rename = "HiddenChainLength")]
    pub hidden_chain_length: u64,
    #[serde(rename = "PublicChainLength")]
    pub public_chain_length: u64,
    #[serde(rename = "Description")]
    pub description: String,
}

impl AttackLogRow {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sim_id: u64,
        sim_time: f64,
        node_id: NodeId,
        event_type: impl Into<String>,
        tx_id: TxId,
        block_id: Option<BlockId>,
        block_height: Option<u64>,
        hidden_chain_length: u64,
        public_chain_length: u64,
        description: impl Into<String>,
    ) -> Self {
        AttackLogRow {
            sim_id,
            sim_time,
            sys_time: sys_time(),
            node_id: node_id.0,
            event_type: event_type.into(),
            tx_id: tx_id.0,
            block_id: block_id.map(|b| b.0),
            block_height,
            hidden_chain_length,
            public_chain_length,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorLogRow {
    #[serde(rename = "SimID")]
    pub sim_id: u64,
    #[serde(rename = "SimTime")]
    pub sim_time: f64,
    #[serde(rename = "SysTime")]
    pub sys_time: f64,
    #[serde(rename = "ErrorKind")]
    pub error_kind: String,
    #[serde(rename = "Description")]
    pub message: String,
}

impl ErrorLogRow {
    pub fn new(sim_id: u64, sim_time: f64, error_kind: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorLogRow {
            sim_id,
            sim_time,
            sys_time: sys_time(),
            error_kind: error_kind.into(),
            message: message.into(),
        }
    }
}

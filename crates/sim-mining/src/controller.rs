//! The `Idle ⇄ Mining` state machine.

use crate::error::MiningAssertionError;
use sim_scheduler::EventHandle;
use sim_types::SimTime;

/// Per-node mining state.
pub enum MiningState {
    Idle,
    Mining { handle: EventHandle, started_at: SimTime },
}

/// What the caller must do after `consider_mining` runs the transition
/// table. The controller never schedules events itself — it doesn't know
/// the event payload type — so starting mining is a two-step handshake:
/// the caller sees `Start`, schedules a `ValidationComplete` at `now +
/// duration`, and hands the resulting handle back via `begin_mining`.
#[derive(Debug, PartialEq)]
pub enum MiningDecision {
    NoOp,
    Start,
    Abandoned,
}

/// `worth_mining` is `mining_pool.total_fee_value() > min_value_to_mine`;
/// a size threshold exists in the data model but is informational only,
/// per the spec, so it plays no role in this decision.
pub struct MiningController {
    state: MiningState,
    min_value_to_mine: f64,
}

impl MiningController {
    pub fn new(min_value_to_mine: f64) -> Self {
        Self {
            state: MiningState::Idle,
            min_value_to_mine,
        }
    }

    pub fn is_mining(&self) -> bool {
        matches!(self.state, MiningState::Mining { .. })
    }

    pub fn worth_mining(&self, mining_pool_fee_value: f64) -> bool {
        mining_pool_fee_value > self.min_value_to_mine
    }

    /// Runs the `Idle ⇄ Mining` transition table:
    ///
    /// | current | worth? | action |
    /// |---|---|---|
    /// | Idle | yes | `Start` |
    /// | Idle | no | `NoOp` |
    /// | Mining | yes | `NoOp` (continue) |
    /// | Mining | no | cancel the in-flight validation event, `Abandoned` |
    pub fn consider_mining(&mut self, mining_pool_fee_value: f64) -> MiningDecision {
        let worth = self.worth_mining(mining_pool_fee_value);
        match (&self.state, worth) {
            (MiningState::Idle, true) => MiningDecision::Start,
            (MiningState::Idle, false) => MiningDecision::NoOp,
            (MiningState::Mining { .. }, true) => MiningDecision::NoOp,
            (MiningState::Mining { handle, .. }, false) => {
                handle.cancel();
                self.state = MiningState::Idle;
                MiningDecision::Abandoned
            }
        }
    }

    /// Records that the caller scheduled a `ValidationComplete` event for
    /// the candidate block just built. Must only be called after
    /// `consider_mining` returned `Start`.
    pub fn begin_mining(&mut self, handle: EventHandle, started_at: SimTime) {
        debug_assert!(matches!(self.state, MiningState::Idle));
        self.state = MiningState::Mining { handle, started_at };
    }

    /// Called when this node's own `ValidationComplete` fires. Transitions
    /// back to `Idle` so `consider_mining` can run again on the refreshed
    /// pool, and returns the elapsed PoW duration so the caller can stamp
    /// `validation_cycles = hash_power * duration`.
    pub fn complete_mining(&mut self, now: SimTime) -> Result<f64, MiningAssertionError> {
        match std::mem::replace(&mut self.state, MiningState::Idle) {
            MiningState::Mining { started_at, .. } => Ok((now - started_at).max(0.0)),
            MiningState::Idle => Err(MiningAssertionError::ValidationFiredWhileIdle),
        }
    }
}

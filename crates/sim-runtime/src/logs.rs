//! The in-memory log buffers a `Simulation` accumulates while it runs.
//!
//! A `Simulation` performs no I/O of its own: it hands `SimulationLogs`
//! back to the caller in its `SimulationOutcome`, and the caller (the CLI,
//! or a test) feeds the rows into `sim_report::Reporters` or inspects them
//! directly. This keeps a bare `Simulation::new(..).run()` usable from a
//! unit test with no temp directory involved.

use sim_report::{AttackLogRow, BlockLogRow, ErrorLogRow, EventLogRow, StructureLogRow};

#[derive(Debug, Clone, Default)]
pub struct SimulationLogs {
    pub events: Vec<EventLogRow>,
    pub blocks: Vec<BlockLogRow>,
    pub structure: Vec<StructureLogRow>,
    pub attacks: Vec<AttackLogRow>,
    pub errors: Vec<ErrorLogRow>,
}

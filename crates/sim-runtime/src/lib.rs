//! Orchestrates one simulation run: the scheduler, the node population,
//! the workload and propagation models, and the in-memory log buffers a
//! caller turns into CSV rows.

mod error;
mod event;
mod logs;
mod metrics;
mod simulation;

pub use error::{AssertionError, EventError};
pub use event::EventKind;
pub use logs::SimulationLogs;
pub use metrics::{AttackMetrics, AttackOutcome};
pub use simulation::{Simulation, SimulationOutcome};

//! CSV reporting and logging setup for one simulation run.
//!
//! Each reporter is independently enabled by a config flag (see
//! `sim_config::ReportFlags`); a disabled reporter's rows are simply
//! dropped rather than buffered, so turning reporting off costs nothing.

mod error;
mod logging;
mod rows;
mod writer;

pub use error::ReportError;
pub use logging::init_logging;
pub use rows::{AttackLogRow, BlockLogRow, ErrorLogRow, EventLogRow, StructureLogRow};
pub use writer::Reporters;

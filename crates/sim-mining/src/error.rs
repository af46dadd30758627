//! Fatal, implementation-bug-indicating errors.

use thiserror::Error;

/// Indicates the mining controller's state was inconsistent with an event
/// the scheduler just delivered. Unlike `StructureError` or `ConfigError`
/// this is never expected in correct operation; surfacing it as a typed
/// error (rather than a panic) lets the simulation runtime log it and
/// abort the run cleanly instead of unwinding through node dispatch.
#[derive(Debug, Error)]
pub enum MiningAssertionError {
    #[error("ValidationComplete fired while mining controller was Idle")]
    ValidationFiredWhileIdle,
}

//! Command execution pipeline
//!
//! Takes a parsed command through to the calendar:
//! Command -> ScheduleResolver -> Resolution -> CommandExecutor -> ExecutionOutcome

pub mod executor;
pub mod resolver;

pub use executor::{CommandExecutor, ExecutionOutcome};
pub use resolver::{lookup_ordinal, target_ordinal, Resolution, ScheduleResolver};

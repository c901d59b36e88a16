//! The simulator: a loaded program, stepped one instruction at a time.
//!
//! [`Simulator`] ties the pieces together: it owns the architectural state,
//! routes data accesses through the cache hierarchy, dispatches decoded
//! instructions, and services environment calls. [`Coverage`] and
//! [`CoreDump`] are the two inspection artifacts a run can produce.

/// Per-instruction execution counts.
pub mod coverage;

/// Architectural state snapshots.
pub mod dump;

/// The fetch/decode/execute engine.
pub mod engine;

/// Register files, memory, and the program counter.
pub mod state;

pub use coverage::Coverage;
pub use dump::CoreDump;
pub use engine::{RunOutcome, Simulator, Status};
pub use state::SimulatorState;

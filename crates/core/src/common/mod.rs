//! Common types and constants shared across the assembler, linker, and simulator.
//!
//! This module provides the fundamental building blocks used by every other
//! component. It includes:
//! 1. **Errors:** Assembler, linker, cache, and simulator error types.
//! 2. **Memory Layout:** Segment base addresses of the simulated machine.
//! 3. **Register Width:** The runtime-selected width of the guest machine.

/// Error types for every stage of the pipeline.
pub mod error;

/// Memory segment base addresses.
pub mod segments;

/// Guest register width selection.
pub mod width;

pub use error::{AssemblerError, AssemblerReport, CacheError, LinkError, SimulatorError};
pub use width::RegisterWidth;

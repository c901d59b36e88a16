//! Educational RISC-V assembler, linker, and simulator.
//!
//! This crate implements the full pipeline from assembly source to executed
//! machine state:
//! 1. **ISA:** Instruction formats, encodings, and execution semantics for
//!    RV32/RV64 I/M/A/F, collected in a registry that drives the assembler,
//!    the disassembler, and the engine from one table.
//! 2. **Assembler:** A two-pass assembler with pseudo-instruction expansion,
//!    data directives, and batched error reporting.
//! 3. **Linker:** Section placement, symbol resolution, and relocation
//!    patching across any number of assembled files.
//! 4. **Simulator:** A stepped execution engine with environment calls,
//!    memory protection policies, coverage recording, and core dumps.
//! 5. **Caches:** A configurable multi-level cache model that observes every
//!    data access and reports hit/miss/eviction statistics.
//!
//! The crate performs no I/O of its own while a program runs; console output
//! is buffered on the simulator and the caller decides where it goes.
//!
//! # Examples
//!
//! ```
//! use abacus_core::asm::assemble;
//! use abacus_core::config::SimulatorSettings;
//! use abacus_core::linker::link;
//! use abacus_core::sim::{RunOutcome, Simulator};
//!
//! let program = assemble(
//!     "demo.s",
//!     "main:\n    addi a0, zero, 10\n    addi a1, zero, 7\n    ecall\n",
//! )
//! .unwrap();
//! let linked = link(&[program]).unwrap();
//! let mut sim = Simulator::new(linked, SimulatorSettings::default()).unwrap();
//! let outcome = sim.run().unwrap();
//! assert_eq!(outcome, RunOutcome::Halted { exit_code: 0 });
//! ```

/// The two-pass assembler and its program representation.
pub mod asm;
/// The multi-level cache model.
pub mod cache;
/// Common types and constants (errors, segment layout, register width).
pub mod common;
/// Simulator and cache configuration.
pub mod config;
/// Instruction set (fields, formats, encodings, execution semantics, ABI).
pub mod isa;
/// Program merging and relocation.
pub mod linker;
/// The execution engine, coverage, and core dumps.
pub mod sim;
/// Cache statistics and reporting.
pub mod stats;

pub use crate::asm::{Program, assemble};
pub use crate::cache::{CacheHandler, CacheHierarchy};
pub use crate::common::{
    AssemblerError, AssemblerReport, CacheError, LinkError, RegisterWidth, SimulatorError,
};
pub use crate::config::{CacheLevelConfig, HierarchyConfig, SimulatorSettings};
pub use crate::linker::{LinkedProgram, link};
pub use crate::sim::{CoreDump, Coverage, RunOutcome, Simulator, Status};

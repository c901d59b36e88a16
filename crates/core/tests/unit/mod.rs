//! # Unit Tests
//!
//! This module mirrors the library's module tree. Each child exercises one
//! component in isolation, reaching for the shared harness only where a
//! fully booted machine is the clearest way to observe a behavior.



/// Unit tests for the instruction set tables: decoding, field extraction,
/// and disassembly round trips.
pub mod isa;


/// Unit tests for the execution engine: programs, environment calls,
/// memory protection, register widths, and post-run artifacts.
pub mod sim;

//! Error types for every stage of the pipeline.
//!
//! Each stage reports failures through its own error type:
//! 1. **Assembly:** [`AssemblerError`] carries the source location of a bad
//!    line; [`AssemblerReport`] aggregates every error found in one pass.
//! 2. **Linking:** [`LinkError`] covers symbol resolution and relocation.
//! 3. **Execution:** [`SimulatorError`] covers decode, dispatch, and memory
//!    faults. Any of these transitions the machine to the errored state.
//! 4. **Cache configuration:** [`CacheError`] rejects invalid geometry while
//!    leaving the previous configuration in place.

use std::fmt;

use thiserror::Error;

use super::width::RegisterWidth;

/// A fault raised while executing the guest program.
///
/// Every variant is fatal to the run: the machine transitions to the errored
/// state and stays there until reset. Exhausting the step budget is *not* an
/// error and is reported through the run outcome instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulatorError {
    /// The word at the program counter matched no registered instruction.
    #[error("illegal instruction {word:#010x} at pc {pc:#010x}")]
    Decode {
        /// Program counter of the fetch.
        pc: u64,
        /// The offending instruction word.
        word: u32,
    },

    /// The instruction exists but has no implementation for the configured
    /// register width.
    #[error("`{mnemonic}` is not implemented for a {width}-bit machine")]
    UnsupportedWidth {
        /// Mnemonic of the decoded instruction.
        mnemonic: &'static str,
        /// The width the machine was configured with.
        width: RegisterWidth,
    },

    /// The engine carries no implementations at all for the configured
    /// register width. Raised at construction, before any instruction runs.
    #[error("no execution support for a {width}-bit machine")]
    UnsupportedMachine {
        /// The rejected width.
        width: RegisterWidth,
    },

    /// A data access was not aligned to its natural size.
    ///
    /// Only raised when aligned addressing is enabled in the settings.
    #[error("misaligned {size}-byte access at {addr:#010x}")]
    Misaligned {
        /// Faulting address.
        addr: u64,
        /// Natural size of the access in bytes.
        size: u32,
    },

    /// A store targeted the text segment while the text is immutable.
    #[error("store to read-only text segment at {addr:#010x}")]
    TextStore {
        /// Faulting address.
        addr: u64,
    },

    /// A data access landed between the heap break and the stack pointer.
    ///
    /// This region is unallocated; accesses are rejected unless the settings
    /// explicitly allow them.
    #[error("access to unallocated memory between heap and stack at {addr:#010x}")]
    AccessViolation {
        /// Faulting address.
        addr: u64,
    },

    /// An environment call received an argument it cannot honor.
    #[error("ecall {selector}: {message}")]
    Ecall {
        /// The `a0` service selector.
        selector: u64,
        /// What was wrong with the request.
        message: &'static str,
    },

    /// `step` was called on a machine that has already halted or errored.
    #[error("machine is {state} and cannot step")]
    NotRunnable {
        /// Human-readable machine state ("halted" or "errored").
        state: &'static str,
    },
}

/// Invalid cache geometry or configuration.
///
/// Raised by the cache setters. The handler keeps its previous configuration
/// and statistics when a setter fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A geometry parameter must be a power of two.
    #[error("cache {name} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: u32,
    },

    /// Associativity cannot exceed the number of blocks.
    #[error("associativity {associativity} exceeds block count {blocks}")]
    AssociativityExceedsBlocks {
        /// Requested associativity.
        associativity: u32,
        /// Configured block count.
        blocks: u32,
    },

    /// A hierarchy level index was out of range.
    #[error("cache level {level} does not exist (hierarchy has {levels} levels)")]
    NoSuchLevel {
        /// Requested one-based level.
        level: usize,
        /// Number of levels present.
        levels: usize,
    },
}

/// A single error found while assembling a source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {message}")]
pub struct AssemblerError {
    /// Name of the source file.
    pub file: String,
    /// One-based line number.
    pub line: usize,
    /// What went wrong.
    pub message: String,
}

impl AssemblerError {
    /// Creates an error pinned to `line` of `file`.
    pub fn new(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }
}

/// Every error found in one assembly pass.
///
/// The assembler keeps going after the first bad line so the whole file can
/// be fixed in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerReport {
    /// The collected errors, in source order.
    pub errors: Vec<AssemblerError>,
}

impl fmt::Display for AssemblerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "could not assemble program ({} errors):", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AssemblerReport {}

/// A failure while merging and relocating assembled programs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// A referenced symbol was defined in no program.
    #[error("undefined symbol `{0}`")]
    UndefinedSymbol(String),

    /// Two programs exported the same global symbol.
    #[error("duplicate global symbol `{0}`")]
    DuplicateSymbol(String),

    /// A resolved target does not fit in the relocated instruction's
    /// immediate field.
    #[error("target of `{label}` is {offset:#x} bytes away, out of range at {addr:#010x}")]
    TargetOutOfRange {
        /// The referenced symbol.
        label: String,
        /// Address of the instruction being patched.
        addr: u64,
        /// Signed distance to the target.
        offset: i64,
    },
}

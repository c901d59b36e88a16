//! The assembler: source text in, relocatable [`Program`] out.
//!
//! Assembly is two passes over the lexed lines. The first pass walks the
//! file once, binding labels to segment offsets and expanding pseudo
//! instructions into their base forms (expansion happens here because a
//! pseudo's size must be known before any later label can be placed). The
//! second pass encodes each instruction against the registry.
//!
//! Label operands are never resolved here. Every reference, local or not,
//! becomes a [`Relocation`] for the linker to patch, so a single file and a
//! multi-file build go through the same path.
//!
//! Errors do not abort assembly; they accumulate and come back together in
//! one [`AssemblerReport`](crate::common::error::AssemblerReport), so a
//! source file with three typos produces three errors in one run.

mod assembler;
mod lexer;
mod parser;

use std::collections::HashMap;

pub use assembler::assemble;

use crate::isa::MachineCode;

/// The segment a symbol is defined in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Executable instructions.
    Text,
    /// Initialized static data.
    Data,
}

/// A label bound to a segment offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// Which segment the symbol points into.
    pub segment: Segment,
    /// Byte offset from the start of that segment.
    pub offset: u64,
    /// Whether the symbol is visible to other files (`.globl`).
    pub global: bool,
}

/// How a relocation patches its instruction once the target is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocKind {
    /// Pc-relative J-type offset (`jal`).
    Jal,
    /// Pc-relative B-type offset (branches).
    Branch,
    /// Upper twenty bits of an absolute address (`lui` from `la`).
    Hi20,
    /// Low twelve bits of an absolute address (`addi` from `la`).
    Lo12I,
}

/// One unresolved label reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    /// Patch style.
    pub kind: RelocKind,
    /// Index of the instruction to patch, within its program's text.
    pub inst_index: usize,
    /// The referenced label.
    pub label: String,
    /// Source line of the reference, for error reporting.
    pub line: usize,
}

/// Source position of one assembled instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugInfo {
    /// File the instruction came from.
    pub file: String,
    /// One-based source line.
    pub line: usize,
    /// The source text of that line, trimmed.
    pub source: String,
}

/// One assembled file: encoded text, raw data, and everything the linker
/// needs to place it.
#[derive(Debug, Clone)]
pub struct Program {
    /// Name of the source file.
    pub name: String,
    /// Encoded instructions, in order. Label references are encoded with a
    /// zero immediate and listed in `relocations`.
    pub insts: Vec<MachineCode>,
    /// Source positions, parallel to `insts`.
    pub debug: Vec<DebugInfo>,
    /// The data segment image.
    pub data: Vec<u8>,
    /// Labels defined by this file.
    pub symbols: HashMap<String, Symbol>,
    /// Label references awaiting resolution.
    pub relocations: Vec<Relocation>,
}

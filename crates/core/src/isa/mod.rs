//! The instruction set: field layouts, encodings, execution semantics, and
//! the registry that ties them together.
//!
//! A single [`Instruction`] record answers three questions at once: how the
//! assembler parses it, which bit pattern encodes it, and what executing it
//! does. The extension modules ([`base`], [`ext_m`], [`ext_a`], [`ext_f`])
//! each contribute their table to the [`InstructionRegistry`].

pub mod abi;
pub mod base;
pub mod disasm;
pub mod exec;
pub mod ext_a;
pub mod ext_f;
pub mod ext_m;
pub mod fields;
pub mod format;
pub mod instruction;
pub mod mcode;
pub mod registry;

pub use exec::Executor;
pub use fields::InstructionField;
pub use format::{FieldEqual, InstructionFormat};
pub use instruction::{Instruction, OperandPattern};
pub use mcode::MachineCode;
pub use registry::InstructionRegistry;

//! The "A" standard extension: load-reserved/store-conditional and the
//! atomic read-modify-write instructions.
//!
//! Every operation is registered four times, once per acquire/release
//! combination. The ordering bits change nothing in a single-threaded
//! machine but are accepted and encoded faithfully so disassembly prints
//! the suffix back out.

use super::exec::{AmoWidth, Executor, IntBinOp};
use super::format::{FieldEqual, InstructionFormat};
use super::instruction::{Instruction, OperandPattern};
use crate::isa::fields::InstructionField;

/// Major opcode of the extension.
pub const OP_AMO: u32 = 0b0101111;

/// Width selectors (`funct3`).
pub mod funct3 {
    /// Word-sized atomics.
    pub const W: u32 = 0b010;
    /// Double-word atomics (RV64).
    pub const D: u32 = 0b011;
}

/// Operation selectors (`funct5`).
pub mod funct5 {
    /// Load reserved.
    pub const LR: u32 = 0b00010;
    /// Store conditional.
    pub const SC: u32 = 0b00011;
    /// Swap.
    pub const AMOSWAP: u32 = 0b00001;
    /// Add.
    pub const AMOADD: u32 = 0b00000;
    /// Exclusive or.
    pub const AMOXOR: u32 = 0b00100;
    /// And.
    pub const AMOAND: u32 = 0b01100;
    /// Or.
    pub const AMOOR: u32 = 0b01000;
    /// Signed minimum.
    pub const AMOMIN: u32 = 0b10000;
    /// Signed maximum.
    pub const AMOMAX: u32 = 0b10100;
    /// Unsigned minimum.
    pub const AMOMINU: u32 = 0b11000;
    /// Unsigned maximum.
    pub const AMOMAXU: u32 = 0b11100;
}

/// Suffix order matched by the name arrays: bare, `.aq`, `.rl`, `.aq.rl`.
const ORDERINGS: [(u32, u32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

fn family(
    names: [&'static str; 4],
    f3: u32,
    f5: u32,
    pattern: OperandPattern,
    executor: Executor,
) -> impl Iterator<Item = Instruction> {
    names.into_iter().zip(ORDERINGS).map(move |(name, (aq, rl))| {
        Instruction::new(
            name,
            InstructionFormat::amo_r_type(OP_AMO, f3, f5, aq, rl),
            pattern,
            executor,
        )
    })
}

fn lr_family(
    names: [&'static str; 4],
    f3: u32,
    width: AmoWidth,
) -> impl Iterator<Item = Instruction> {
    names.into_iter().zip(ORDERINGS).map(move |(name, (aq, rl))| {
        // lr has no source operand; rs2 must be zero in the encoding.
        let format = InstructionFormat::new(vec![
            FieldEqual::new(InstructionField::Opcode, OP_AMO),
            FieldEqual::new(InstructionField::Funct3, f3),
            FieldEqual::new(InstructionField::Funct5, funct5::LR),
            FieldEqual::new(InstructionField::Aq, aq),
            FieldEqual::new(InstructionField::Rl, rl),
            FieldEqual::new(InstructionField::Rs2, 0),
        ]);
        Instruction::new(name, format, OperandPattern::AmoLoad, Executor::LoadReserved(width))
    })
}

pub(crate) fn instructions() -> Vec<Instruction> {
    let mut set = Vec::new();

    set.extend(lr_family(
        ["lr.w", "lr.w.aq", "lr.w.rl", "lr.w.aq.rl"],
        funct3::W,
        AmoWidth::Word,
    ));
    set.extend(lr_family(
        ["lr.d", "lr.d.aq", "lr.d.rl", "lr.d.aq.rl"],
        funct3::D,
        AmoWidth::Double,
    ));
    set.extend(family(
        ["sc.w", "sc.w.aq", "sc.w.rl", "sc.w.aq.rl"],
        funct3::W,
        funct5::SC,
        OperandPattern::AmoRegMem,
        Executor::StoreConditional(AmoWidth::Word),
    ));
    set.extend(family(
        ["sc.d", "sc.d.aq", "sc.d.rl", "sc.d.aq.rl"],
        funct3::D,
        funct5::SC,
        OperandPattern::AmoRegMem,
        Executor::StoreConditional(AmoWidth::Double),
    ));

    type AmoFamily = ([&'static str; 4], [&'static str; 4], u32, IntBinOp);
    let families: [AmoFamily; 9] = [
        (
            ["amoswap.w", "amoswap.w.aq", "amoswap.w.rl", "amoswap.w.aq.rl"],
            ["amoswap.d", "amoswap.d.aq", "amoswap.d.rl", "amoswap.d.aq.rl"],
            funct5::AMOSWAP,
            IntBinOp {
                rv32: Some(|_, b| b),
                rv64: Some(|_, b| b),
            },
        ),
        (
            ["amoadd.w", "amoadd.w.aq", "amoadd.w.rl", "amoadd.w.aq.rl"],
            ["amoadd.d", "amoadd.d.aq", "amoadd.d.rl", "amoadd.d.aq.rl"],
            funct5::AMOADD,
            IntBinOp {
                rv32: Some(u32::wrapping_add),
                rv64: Some(u64::wrapping_add),
            },
        ),
        (
            ["amoxor.w", "amoxor.w.aq", "amoxor.w.rl", "amoxor.w.aq.rl"],
            ["amoxor.d", "amoxor.d.aq", "amoxor.d.rl", "amoxor.d.aq.rl"],
            funct5::AMOXOR,
            IntBinOp {
                rv32: Some(|a, b| a ^ b),
                rv64: Some(|a, b| a ^ b),
            },
        ),
        (
            ["amoand.w", "amoand.w.aq", "amoand.w.rl", "amoand.w.aq.rl"],
            ["amoand.d", "amoand.d.aq", "amoand.d.rl", "amoand.d.aq.rl"],
            funct5::AMOAND,
            IntBinOp {
                rv32: Some(|a, b| a & b),
                rv64: Some(|a, b| a & b),
            },
        ),
        (
            ["amoor.w", "amoor.w.aq", "amoor.w.rl", "amoor.w.aq.rl"],
            ["amoor.d", "amoor.d.aq", "amoor.d.rl", "amoor.d.aq.rl"],
            funct5::AMOOR,
            IntBinOp {
                rv32: Some(|a, b| a | b),
                rv64: Some(|a, b| a | b),
            },
        ),
        (
            ["amomin.w", "amomin.w.aq", "amomin.w.rl", "amomin.w.aq.rl"],
            ["amomin.d", "amomin.d.aq", "amomin.d.rl", "amomin.d.aq.rl"],
            funct5::AMOMIN,
            IntBinOp {
                rv32: Some(|a, b| (a as i32).min(b as i32) as u32),
                rv64: Some(|a, b| (a as i64).min(b as i64) as u64),
            },
        ),
        (
            ["amomax.w", "amomax.w.aq", "amomax.w.rl", "amomax.w.aq.rl"],
            ["amomax.d", "amomax.d.aq", "amomax.d.rl", "amomax.d.aq.rl"],
            funct5::AMOMAX,
            IntBinOp {
                rv32: Some(|a, b| (a as i32).max(b as i32) as u32),
                rv64: Some(|a, b| (a as i64).max(b as i64) as u64),
            },
        ),
        (
            ["amominu.w", "amominu.w.aq", "amominu.w.rl", "amominu.w.aq.rl"],
            ["amominu.d", "amominu.d.aq", "amominu.d.rl", "amominu.d.aq.rl"],
            funct5::AMOMINU,
            IntBinOp {
                rv32: Some(u32::min),
                rv64: Some(u64::min),
            },
        ),
        (
            ["amomaxu.w", "amomaxu.w.aq", "amomaxu.w.rl", "amomaxu.w.aq.rl"],
            ["amomaxu.d", "amomaxu.d.aq", "amomaxu.d.rl", "amomaxu.d.aq.rl"],
            funct5::AMOMAXU,
            IntBinOp {
                rv32: Some(u32::max),
                rv64: Some(u64::max),
            },
        ),
    ];

    for (word_names, double_names, f5, op) in families {
        set.extend(family(
            word_names,
            funct3::W,
            f5,
            OperandPattern::AmoRegMem,
            Executor::Amo { width: AmoWidth::Word, op },
        ));
        set.extend(family(
            double_names,
            funct3::D,
            f5,
            OperandPattern::AmoRegMem,
            Executor::Amo { width: AmoWidth::Double, op },
        ));
    }

    set
}

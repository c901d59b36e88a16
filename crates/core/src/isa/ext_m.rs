//! The "M" standard extension: integer multiplication and division.
//!
//! Division follows the ISA's totalised semantics: dividing by zero yields
//! all-ones (or the dividend for remainders) and the lone signed overflow
//! case wraps back to the minimum value. No instruction here traps.

use super::base::opcodes;
use super::exec::{Executor, IntBinOp};
use super::format::InstructionFormat;
use super::instruction::{Instruction, OperandPattern};

/// Function code shared by the whole extension.
pub const FUNCT7_MULDIV: u32 = 0b0000001;

fn div32(a: u32, b: u32) -> u32 {
    let (a, b) = (a as i32, b as i32);
    if b == 0 {
        u32::MAX
    } else {
        a.wrapping_div(b) as u32
    }
}

fn div64(a: u64, b: u64) -> u64 {
    let (a, b) = (a as i64, b as i64);
    if b == 0 {
        u64::MAX
    } else {
        a.wrapping_div(b) as u64
    }
}

fn rem32(a: u32, b: u32) -> u32 {
    let (a, b) = (a as i32, b as i32);
    if b == 0 { a as u32 } else { a.wrapping_rem(b) as u32 }
}

fn rem64(a: u64, b: u64) -> u64 {
    let (a, b) = (a as i64, b as i64);
    if b == 0 { a as u64 } else { a.wrapping_rem(b) as u64 }
}

fn muldiv(name: &'static str, f3: u32, op: IntBinOp) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::r_type(opcodes::OP_REG, f3, FUNCT7_MULDIV),
        OperandPattern::RdRs1Rs2,
        Executor::Register(op),
    )
}

fn muldiv_w(name: &'static str, f3: u32, op: fn(u64, u64) -> u64) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::r_type(opcodes::OP_REG_32, f3, FUNCT7_MULDIV),
        OperandPattern::RdRs1Rs2,
        Executor::Register(IntBinOp { rv32: None, rv64: Some(op) }),
    )
}

pub(crate) fn instructions() -> Vec<Instruction> {
    vec![
        muldiv(
            "mul",
            0b000,
            IntBinOp {
                rv32: Some(u32::wrapping_mul),
                rv64: Some(u64::wrapping_mul),
            },
        ),
        muldiv(
            "mulh",
            0b001,
            IntBinOp {
                rv32: Some(|a, b| {
                    ((i64::from(a as i32).wrapping_mul(i64::from(b as i32))) >> 32) as u32
                }),
                rv64: Some(|a, b| {
                    (((a as i64 as i128).wrapping_mul(b as i64 as i128)) >> 64) as u64
                }),
            },
        ),
        muldiv(
            "mulhsu",
            0b010,
            IntBinOp {
                rv32: Some(|a, b| {
                    ((i64::from(a as i32).wrapping_mul(i64::from(b))) >> 32) as u32
                }),
                rv64: Some(|a, b| {
                    (((a as i64 as i128).wrapping_mul(b as i128)) >> 64) as u64
                }),
            },
        ),
        muldiv(
            "mulhu",
            0b011,
            IntBinOp {
                rv32: Some(|a, b| ((u64::from(a) * u64::from(b)) >> 32) as u32),
                rv64: Some(|a, b| ((u128::from(a) * u128::from(b)) >> 64) as u64),
            },
        ),
        muldiv(
            "div",
            0b100,
            IntBinOp {
                rv32: Some(div32),
                rv64: Some(div64),
            },
        ),
        muldiv(
            "divu",
            0b101,
            IntBinOp {
                rv32: Some(|a, b| if b == 0 { u32::MAX } else { a / b }),
                rv64: Some(|a, b| if b == 0 { u64::MAX } else { a / b }),
            },
        ),
        muldiv(
            "rem",
            0b110,
            IntBinOp {
                rv32: Some(rem32),
                rv64: Some(rem64),
            },
        ),
        muldiv(
            "remu",
            0b111,
            IntBinOp {
                rv32: Some(|a, b| if b == 0 { a } else { a % b }),
                rv64: Some(|a, b| if b == 0 { a } else { a % b }),
            },
        ),
        muldiv_w("mulw", 0b000, |a, b| {
            ((a as u32).wrapping_mul(b as u32) as i32) as u64
        }),
        muldiv_w("divw", 0b100, |a, b| div32(a as u32, b as u32) as i32 as u64),
        muldiv_w("divuw", 0b101, |a, b| {
            let (a, b) = (a as u32, b as u32);
            (if b == 0 { u32::MAX } else { a / b }) as i32 as u64
        }),
        muldiv_w("remw", 0b110, |a, b| rem32(a as u32, b as u32) as i32 as u64),
        muldiv_w("remuw", 0b111, |a, b| {
            let (a, b) = (a as u32, b as u32);
            (if b == 0 { a } else { a % b }) as i32 as u64
        }),
    ]
}

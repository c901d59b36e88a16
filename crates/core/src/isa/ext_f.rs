//! The "F" standard extension: single-precision floating point.
//!
//! Arithmetic goes through the host's IEEE 754 single type. The rounding
//! mode field is accepted in any encoding but ignored; the machine always
//! rounds to nearest-even, which is what the assembler emits.

use super::exec::Executor;
use super::format::InstructionFormat;
use super::instruction::{Instruction, OperandPattern};

/// Major opcodes used by the extension.
pub mod opcodes {
    /// Floating-point loads.
    pub const OP_LOAD_FP: u32 = 0b0000111;
    /// Floating-point stores.
    pub const OP_STORE_FP: u32 = 0b0100111;
    /// Register-register floating-point operations.
    pub const OP_FP: u32 = 0b1010011;
    /// Fused multiply-add.
    pub const OP_FMADD: u32 = 0b1000011;
    /// Fused multiply-subtract.
    pub const OP_FMSUB: u32 = 0b1000111;
    /// Negated fused multiply-subtract.
    pub const OP_FNMSUB: u32 = 0b1001011;
    /// Negated fused multiply-add.
    pub const OP_FNMADD: u32 = 0b1001111;
}

/// Seven-bit function codes within [`opcodes::OP_FP`].
pub mod funct7 {
    /// Addition.
    pub const FADD: u32 = 0b0000000;
    /// Subtraction.
    pub const FSUB: u32 = 0b0000100;
    /// Multiplication.
    pub const FMUL: u32 = 0b0001000;
    /// Division.
    pub const FDIV: u32 = 0b0001100;
    /// Square root.
    pub const FSQRT: u32 = 0b0101100;
    /// Sign injection family.
    pub const FSGNJ: u32 = 0b0010000;
    /// Minimum and maximum.
    pub const FMIN_MAX: u32 = 0b0010100;
    /// Comparisons.
    pub const FCMP: u32 = 0b1010000;
    /// Float to integer conversion.
    pub const FCVT_W_S: u32 = 0b1100000;
    /// Integer to float conversion.
    pub const FCVT_S_W: u32 = 0b1101000;
    /// Bit move to integer register, and classification.
    pub const FMV_X_W: u32 = 0b1110000;
    /// Bit move from integer register.
    pub const FMV_W_X: u32 = 0b1111000;
}

/// Single-precision operand encoding in the two-bit `fmt` field.
pub const FMT_S: u32 = 0b00;

const SIGN_BIT: u32 = 0x8000_0000;

fn binary(name: &'static str, f7: u32, op: fn(u32, u32) -> u32) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::fr_type(opcodes::OP_FP, f7),
        OperandPattern::FrdFrs1Frs2,
        Executor::FloatRegister(op),
    )
}

fn sign_inject(name: &'static str, f3: u32, op: fn(u32, u32) -> u32) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::fr_f3_type(opcodes::OP_FP, f3, funct7::FSGNJ),
        OperandPattern::FrdFrs1Frs2,
        Executor::FloatRegister(op),
    )
}

fn compare(name: &'static str, f3: u32, cmp: fn(f32, f32) -> bool) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::fr_f3_type(opcodes::OP_FP, f3, funct7::FCMP),
        OperandPattern::RdFrs1Frs2,
        Executor::FloatCompare(cmp),
    )
}

fn fma(name: &'static str, opcode: u32, op: fn(u32, u32, u32) -> u32) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::r4_type(opcode, FMT_S),
        OperandPattern::FrdFrs1Frs2Frs3,
        Executor::FloatFma(op),
    )
}

pub(crate) fn instructions() -> Vec<Instruction> {
    vec![
        Instruction::new(
            "flw",
            InstructionFormat::i_type(opcodes::OP_LOAD_FP, 0b010),
            OperandPattern::FrdMem,
            Executor::FloatLoad,
        ),
        Instruction::new(
            "fsw",
            InstructionFormat::s_type(opcodes::OP_STORE_FP, 0b010),
            OperandPattern::Frs2Mem,
            Executor::FloatStore,
        ),
        fma("fmadd.s", opcodes::OP_FMADD, |a, b, c| {
            f32::from_bits(a)
                .mul_add(f32::from_bits(b), f32::from_bits(c))
                .to_bits()
        }),
        fma("fmsub.s", opcodes::OP_FMSUB, |a, b, c| {
            f32::from_bits(a)
                .mul_add(f32::from_bits(b), -f32::from_bits(c))
                .to_bits()
        }),
        fma("fnmsub.s", opcodes::OP_FNMSUB, |a, b, c| {
            (-f32::from_bits(a))
                .mul_add(f32::from_bits(b), f32::from_bits(c))
                .to_bits()
        }),
        fma("fnmadd.s", opcodes::OP_FNMADD, |a, b, c| {
            (-f32::from_bits(a))
                .mul_add(f32::from_bits(b), -f32::from_bits(c))
                .to_bits()
        }),
        binary("fadd.s", funct7::FADD, |a, b| {
            (f32::from_bits(a) + f32::from_bits(b)).to_bits()
        }),
        binary("fsub.s", funct7::FSUB, |a, b| {
            (f32::from_bits(a) - f32::from_bits(b)).to_bits()
        }),
        binary("fmul.s", funct7::FMUL, |a, b| {
            (f32::from_bits(a) * f32::from_bits(b)).to_bits()
        }),
        binary("fdiv.s", funct7::FDIV, |a, b| {
            (f32::from_bits(a) / f32::from_bits(b)).to_bits()
        }),
        Instruction::new(
            "fsqrt.s",
            InstructionFormat::fr_rs2_type(opcodes::OP_FP, funct7::FSQRT, 0),
            OperandPattern::FrdFrs1,
            Executor::FloatUnary(|a| f32::from_bits(a).sqrt().to_bits()),
        ),
        sign_inject("fsgnj.s", 0b000, |a, b| (a & !SIGN_BIT) | (b & SIGN_BIT)),
        sign_inject("fsgnjn.s", 0b001, |a, b| (a & !SIGN_BIT) | (!b & SIGN_BIT)),
        sign_inject("fsgnjx.s", 0b010, |a, b| a ^ (b & SIGN_BIT)),
        Instruction::new(
            "fmin.s",
            InstructionFormat::fr_f3_type(opcodes::OP_FP, 0b000, funct7::FMIN_MAX),
            OperandPattern::FrdFrs1Frs2,
            Executor::FloatRegister(|a, b| f32::from_bits(a).min(f32::from_bits(b)).to_bits()),
        ),
        Instruction::new(
            "fmax.s",
            InstructionFormat::fr_f3_type(opcodes::OP_FP, 0b001, funct7::FMIN_MAX),
            OperandPattern::FrdFrs1Frs2,
            Executor::FloatRegister(|a, b| f32::from_bits(a).max(f32::from_bits(b)).to_bits()),
        ),
        compare("feq.s", 0b010, |a, b| a == b),
        compare("flt.s", 0b001, |a, b| a < b),
        compare("fle.s", 0b000, |a, b| a <= b),
        Instruction::new(
            "fcvt.w.s",
            InstructionFormat::fr_rs2_type(opcodes::OP_FP, funct7::FCVT_W_S, 0),
            OperandPattern::RdFrs1,
            Executor::FloatCvtToInt { signed: true },
        ),
        Instruction::new(
            "fcvt.wu.s",
            InstructionFormat::fr_rs2_type(opcodes::OP_FP, funct7::FCVT_W_S, 1),
            OperandPattern::RdFrs1,
            Executor::FloatCvtToInt { signed: false },
        ),
        Instruction::new(
            "fcvt.s.w",
            InstructionFormat::fr_rs2_type(opcodes::OP_FP, funct7::FCVT_S_W, 0),
            OperandPattern::FrdRs1,
            Executor::FloatCvtFromInt { signed: true },
        ),
        Instruction::new(
            "fcvt.s.wu",
            InstructionFormat::fr_rs2_type(opcodes::OP_FP, funct7::FCVT_S_W, 1),
            OperandPattern::FrdRs1,
            Executor::FloatCvtFromInt { signed: false },
        ),
        Instruction::new(
            "fmv.x.w",
            InstructionFormat::fr_f3_rs2_type(opcodes::OP_FP, 0b000, funct7::FMV_X_W, 0),
            OperandPattern::RdFrs1,
            Executor::FloatMvToInt,
        ),
        Instruction::new(
            "fclass.s",
            InstructionFormat::fr_f3_rs2_type(opcodes::OP_FP, 0b001, funct7::FMV_X_W, 0),
            OperandPattern::RdFrs1,
            Executor::FloatClass,
        ),
        Instruction::new(
            "fmv.w.x",
            InstructionFormat::fr_f3_rs2_type(opcodes::OP_FP, 0b000, funct7::FMV_W_X, 0),
            OperandPattern::FrdRs1,
            Executor::FloatMvFromInt,
        ),
    ]
}

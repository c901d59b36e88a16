//! Base integer instruction set (RV32I plus the RV64I additions).
//!
//! Each instruction is one table entry: mnemonic, format constraints, operand
//! pattern, and per-width semantics. Word-sized 64-bit instructions (`addw`,
//! `slliw`, ...) fill only the 64-bit slot; a 32-bit machine reports them as
//! unsupported at dispatch rather than failing to decode.

use super::exec::{CmpOp, Executor, IntBinOp, LoadKind, StoreKind};
use super::format::InstructionFormat;
use super::instruction::{Instruction, OperandPattern};

/// Major opcodes of the base ISA.
pub mod opcodes {
    /// Load upper immediate.
    pub const OP_LUI: u32 = 0b0110111;
    /// Add upper immediate to pc.
    pub const OP_AUIPC: u32 = 0b0010111;
    /// Jump and link.
    pub const OP_JAL: u32 = 0b1101111;
    /// Jump and link register.
    pub const OP_JALR: u32 = 0b1100111;
    /// Conditional branches.
    pub const OP_BRANCH: u32 = 0b1100011;
    /// Integer loads.
    pub const OP_LOAD: u32 = 0b0000011;
    /// Integer stores.
    pub const OP_STORE: u32 = 0b0100011;
    /// Register-immediate arithmetic.
    pub const OP_IMM: u32 = 0b0010011;
    /// Register-register arithmetic.
    pub const OP_REG: u32 = 0b0110011;
    /// Word-sized register-immediate arithmetic (RV64).
    pub const OP_IMM_32: u32 = 0b0011011;
    /// Word-sized register-register arithmetic (RV64).
    pub const OP_REG_32: u32 = 0b0111011;
    /// Memory ordering.
    pub const OP_MISC_MEM: u32 = 0b0001111;
    /// Environment calls and breakpoints.
    pub const OP_SYSTEM: u32 = 0b1110011;
}

/// Minor function codes (`funct3`).
pub mod funct3 {
    /// `add`/`sub`/`addi` family selector.
    pub const ADD_SUB: u32 = 0b000;
    /// Shift left logical.
    pub const SLL: u32 = 0b001;
    /// Set less than (signed).
    pub const SLT: u32 = 0b010;
    /// Set less than (unsigned).
    pub const SLTU: u32 = 0b011;
    /// Exclusive or.
    pub const XOR: u32 = 0b100;
    /// Shift right (logical or arithmetic, split by the upper function code).
    pub const SRL_SRA: u32 = 0b101;
    /// Inclusive or.
    pub const OR: u32 = 0b110;
    /// And.
    pub const AND: u32 = 0b111;

    /// Branch if equal.
    pub const BEQ: u32 = 0b000;
    /// Branch if not equal.
    pub const BNE: u32 = 0b001;
    /// Branch if less than (signed).
    pub const BLT: u32 = 0b100;
    /// Branch if greater or equal (signed).
    pub const BGE: u32 = 0b101;
    /// Branch if less than (unsigned).
    pub const BLTU: u32 = 0b110;
    /// Branch if greater or equal (unsigned).
    pub const BGEU: u32 = 0b111;

    /// Load byte.
    pub const LB: u32 = 0b000;
    /// Load half-word.
    pub const LH: u32 = 0b001;
    /// Load word.
    pub const LW: u32 = 0b010;
    /// Load double word (RV64).
    pub const LD: u32 = 0b011;
    /// Load byte unsigned.
    pub const LBU: u32 = 0b100;
    /// Load half-word unsigned.
    pub const LHU: u32 = 0b101;
    /// Load word unsigned (RV64).
    pub const LWU: u32 = 0b110;

    /// Store byte.
    pub const SB: u32 = 0b000;
    /// Store half-word.
    pub const SH: u32 = 0b001;
    /// Store word.
    pub const SW: u32 = 0b010;
    /// Store double word (RV64).
    pub const SD: u32 = 0b011;

    /// Memory fence.
    pub const FENCE: u32 = 0b000;
}

/// Seven-bit function codes (`funct7`).
pub mod funct7 {
    /// The all-zero default.
    pub const DEFAULT: u32 = 0b0000000;
    /// Selects `sub` within the `add`/`sub` pair.
    pub const SUB: u32 = 0b0100000;
    /// Selects `sra` within the shift-right pair.
    pub const SRA: u32 = 0b0100000;
}

/// Six-bit function codes for the plain immediate shifts (`funct6`), leaving
/// six bits of shift amount free.
pub mod funct6 {
    /// The all-zero default.
    pub const DEFAULT: u32 = 0b000000;
    /// Selects `srai` within the shift-right pair.
    pub const SRA: u32 = 0b010000;
}

/// Full encodings of the system instructions.
pub mod system {
    /// `ecall`.
    pub const ECALL: u32 = 0x0000_0073;
    /// `ebreak`.
    pub const EBREAK: u32 = 0x0010_0073;
}

fn reg(name: &'static str, f3: u32, f7: u32, op: IntBinOp) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::r_type(opcodes::OP_REG, f3, f7),
        OperandPattern::RdRs1Rs2,
        Executor::Register(op),
    )
}

fn reg_w(name: &'static str, f3: u32, f7: u32, op: IntBinOp) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::r_type(opcodes::OP_REG_32, f3, f7),
        OperandPattern::RdRs1Rs2,
        Executor::Register(op),
    )
}

fn imm(name: &'static str, f3: u32, op: IntBinOp) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::i_type(opcodes::OP_IMM, f3),
        OperandPattern::RdRs1Imm,
        Executor::Immediate(op),
    )
}

fn load(name: &'static str, f3: u32, kind: LoadKind) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::i_type(opcodes::OP_LOAD, f3),
        OperandPattern::RdMem,
        Executor::Load(kind),
    )
}

fn store(name: &'static str, f3: u32, kind: StoreKind) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::s_type(opcodes::OP_STORE, f3),
        OperandPattern::Rs2Mem,
        Executor::Store(kind),
    )
}

fn branch(name: &'static str, f3: u32, cmp: CmpOp) -> Instruction {
    Instruction::new(
        name,
        InstructionFormat::b_type(opcodes::OP_BRANCH, f3),
        OperandPattern::Rs1Rs2Label,
        Executor::Branch(cmp),
    )
}

/// Every base-ISA instruction, ready for registration.
pub(crate) fn instructions() -> Vec<Instruction> {
    let mut set = vec![
        // ── Upper immediates and jumps ────────────────────────
        Instruction::new(
            "lui",
            InstructionFormat::u_type(opcodes::OP_LUI),
            OperandPattern::RdImm20,
            Executor::Lui,
        ),
        Instruction::new(
            "auipc",
            InstructionFormat::u_type(opcodes::OP_AUIPC),
            OperandPattern::RdImm20,
            Executor::Auipc,
        ),
        Instruction::new(
            "jal",
            InstructionFormat::j_type(opcodes::OP_JAL),
            OperandPattern::RdLabel,
            Executor::Jal,
        ),
        Instruction::new(
            "jalr",
            InstructionFormat::i_type(opcodes::OP_JALR, 0b000),
            OperandPattern::Jalr,
            Executor::Jalr,
        ),
        // ── Branches ──────────────────────────────────────────
        branch(
            "beq",
            funct3::BEQ,
            CmpOp {
                rv32: Some(|a, b| a == b),
                rv64: Some(|a, b| a == b),
            },
        ),
        branch(
            "bne",
            funct3::BNE,
            CmpOp {
                rv32: Some(|a, b| a != b),
                rv64: Some(|a, b| a != b),
            },
        ),
        branch(
            "blt",
            funct3::BLT,
            CmpOp {
                rv32: Some(|a, b| (a as i32) < (b as i32)),
                rv64: Some(|a, b| (a as i64) < (b as i64)),
            },
        ),
        branch(
            "bge",
            funct3::BGE,
            CmpOp {
                rv32: Some(|a, b| (a as i32) >= (b as i32)),
                rv64: Some(|a, b| (a as i64) >= (b as i64)),
            },
        ),
        branch(
            "bltu",
            funct3::BLTU,
            CmpOp {
                rv32: Some(|a, b| a < b),
                rv64: Some(|a, b| a < b),
            },
        ),
        branch(
            "bgeu",
            funct3::BGEU,
            CmpOp {
                rv32: Some(|a, b| a >= b),
                rv64: Some(|a, b| a >= b),
            },
        ),
        // ── Loads and stores ──────────────────────────────────
        load("lb", funct3::LB, LoadKind::Byte),
        load("lh", funct3::LH, LoadKind::Half),
        load("lw", funct3::LW, LoadKind::Word),
        load("ld", funct3::LD, LoadKind::Double),
        load("lbu", funct3::LBU, LoadKind::ByteUnsigned),
        load("lhu", funct3::LHU, LoadKind::HalfUnsigned),
        load("lwu", funct3::LWU, LoadKind::WordUnsigned),
        store("sb", funct3::SB, StoreKind::Byte),
        store("sh", funct3::SH, StoreKind::Half),
        store("sw", funct3::SW, StoreKind::Word),
        store("sd", funct3::SD, StoreKind::Double),
        // ── Register-immediate arithmetic ─────────────────────
        imm(
            "addi",
            funct3::ADD_SUB,
            IntBinOp {
                rv32: Some(u32::wrapping_add),
                rv64: Some(u64::wrapping_add),
            },
        ),
        imm(
            "slti",
            funct3::SLT,
            IntBinOp {
                rv32: Some(|a, b| u32::from((a as i32) < (b as i32))),
                rv64: Some(|a, b| u64::from((a as i64) < (b as i64))),
            },
        ),
        imm(
            "sltiu",
            funct3::SLTU,
            IntBinOp {
                rv32: Some(|a, b| u32::from(a < b)),
                rv64: Some(|a, b| u64::from(a < b)),
            },
        ),
        imm(
            "xori",
            funct3::XOR,
            IntBinOp {
                rv32: Some(|a, b| a ^ b),
                rv64: Some(|a, b| a ^ b),
            },
        ),
        imm(
            "ori",
            funct3::OR,
            IntBinOp {
                rv32: Some(|a, b| a | b),
                rv64: Some(|a, b| a | b),
            },
        ),
        imm(
            "andi",
            funct3::AND,
            IntBinOp {
                rv32: Some(|a, b| a & b),
                rv64: Some(|a, b| a & b),
            },
        ),
        Instruction::new(
            "slli",
            InstructionFormat::shift_type(opcodes::OP_IMM, funct3::SLL, funct6::DEFAULT),
            OperandPattern::RdRs1Shamt,
            Executor::ShiftImmediate(IntBinOp {
                rv32: Some(|a, b| a << (b & 0x1f)),
                rv64: Some(|a, b| a << (b & 0x3f)),
            }),
        ),
        Instruction::new(
            "srli",
            InstructionFormat::shift_type(opcodes::OP_IMM, funct3::SRL_SRA, funct6::DEFAULT),
            OperandPattern::RdRs1Shamt,
            Executor::ShiftImmediate(IntBinOp {
                rv32: Some(|a, b| a >> (b & 0x1f)),
                rv64: Some(|a, b| a >> (b & 0x3f)),
            }),
        ),
        Instruction::new(
            "srai",
            InstructionFormat::shift_type(opcodes::OP_IMM, funct3::SRL_SRA, funct6::SRA),
            OperandPattern::RdRs1Shamt,
            Executor::ShiftImmediate(IntBinOp {
                rv32: Some(|a, b| ((a as i32) >> (b & 0x1f)) as u32),
                rv64: Some(|a, b| ((a as i64) >> (b & 0x3f)) as u64),
            }),
        ),
        // ── Register-register arithmetic ──────────────────────
        reg(
            "add",
            funct3::ADD_SUB,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(u32::wrapping_add),
                rv64: Some(u64::wrapping_add),
            },
        ),
        reg(
            "sub",
            funct3::ADD_SUB,
            funct7::SUB,
            IntBinOp {
                rv32: Some(u32::wrapping_sub),
                rv64: Some(u64::wrapping_sub),
            },
        ),
        reg(
            "sll",
            funct3::SLL,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(|a, b| a << (b & 0x1f)),
                rv64: Some(|a, b| a << (b & 0x3f)),
            },
        ),
        reg(
            "slt",
            funct3::SLT,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(|a, b| u32::from((a as i32) < (b as i32))),
                rv64: Some(|a, b| u64::from((a as i64) < (b as i64))),
            },
        ),
        reg(
            "sltu",
            funct3::SLTU,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(|a, b| u32::from(a < b)),
                rv64: Some(|a, b| u64::from(a < b)),
            },
        ),
        reg(
            "xor",
            funct3::XOR,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(|a, b| a ^ b),
                rv64: Some(|a, b| a ^ b),
            },
        ),
        reg(
            "srl",
            funct3::SRL_SRA,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(|a, b| a >> (b & 0x1f)),
                rv64: Some(|a, b| a >> (b & 0x3f)),
            },
        ),
        reg(
            "sra",
            funct3::SRL_SRA,
            funct7::SRA,
            IntBinOp {
                rv32: Some(|a, b| ((a as i32) >> (b & 0x1f)) as u32),
                rv64: Some(|a, b| ((a as i64) >> (b & 0x3f)) as u64),
            },
        ),
        reg(
            "or",
            funct3::OR,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(|a, b| a | b),
                rv64: Some(|a, b| a | b),
            },
        ),
        reg(
            "and",
            funct3::AND,
            funct7::DEFAULT,
            IntBinOp {
                rv32: Some(|a, b| a & b),
                rv64: Some(|a, b| a & b),
            },
        ),
        // ── System and ordering ───────────────────────────────
        Instruction::new(
            "fence",
            InstructionFormat::i_type(opcodes::OP_MISC_MEM, funct3::FENCE),
            OperandPattern::Bare,
            Executor::Fence,
        ),
        Instruction::new(
            "ecall",
            InstructionFormat::system_type(system::ECALL),
            OperandPattern::Bare,
            Executor::Ecall,
        ),
        Instruction::new(
            "ebreak",
            InstructionFormat::system_type(system::EBREAK),
            OperandPattern::Bare,
            Executor::Ebreak,
        ),
    ];

    // ── RV64 word-sized arithmetic ────────────────────────────
    set.extend([
        Instruction::new(
            "addiw",
            InstructionFormat::i_type(opcodes::OP_IMM_32, funct3::ADD_SUB),
            OperandPattern::RdRs1Imm,
            Executor::Immediate(IntBinOp {
                rv32: None,
                rv64: Some(|a, b| (a.wrapping_add(b) as i32) as u64),
            }),
        ),
        Instruction::new(
            "slliw",
            InstructionFormat::shift_w_type(opcodes::OP_IMM_32, funct3::SLL, funct7::DEFAULT),
            OperandPattern::RdRs1Shamt,
            Executor::ShiftImmediate(IntBinOp {
                rv32: None,
                rv64: Some(|a, b| (((a as u32) << (b & 0x1f)) as i32) as u64),
            }),
        ),
        Instruction::new(
            "srliw",
            InstructionFormat::shift_w_type(opcodes::OP_IMM_32, funct3::SRL_SRA, funct7::DEFAULT),
            OperandPattern::RdRs1Shamt,
            Executor::ShiftImmediate(IntBinOp {
                rv32: None,
                rv64: Some(|a, b| (((a as u32) >> (b & 0x1f)) as i32) as u64),
            }),
        ),
        Instruction::new(
            "sraiw",
            InstructionFormat::shift_w_type(opcodes::OP_IMM_32, funct3::SRL_SRA, funct7::SRA),
            OperandPattern::RdRs1Shamt,
            Executor::ShiftImmediate(IntBinOp {
                rv32: None,
                rv64: Some(|a, b| ((a as i32) >> (b & 0x1f)) as u64),
            }),
        ),
        reg_w(
            "addw",
            funct3::ADD_SUB,
            funct7::DEFAULT,
            IntBinOp {
                rv32: None,
                rv64: Some(|a, b| (a.wrapping_add(b) as i32) as u64),
            },
        ),
        reg_w(
            "subw",
            funct3::ADD_SUB,
            funct7::SUB,
            IntBinOp {
                rv32: None,
                rv64: Some(|a, b| (a.wrapping_sub(b) as i32) as u64),
            },
        ),
        reg_w(
            "sllw",
            funct3::SLL,
            funct7::DEFAULT,
            IntBinOp {
                rv32: None,
                rv64: Some(|a, b| (((a as u32) << (b & 0x1f)) as i32) as u64),
            },
        ),
        reg_w(
            "srlw",
            funct3::SRL_SRA,
            funct7::DEFAULT,
            IntBinOp {
                rv32: None,
                rv64: Some(|a, b| (((a as u32) >> (b & 0x1f)) as i32) as u64),
            },
        ),
        reg_w(
            "sraw",
            funct3::SRL_SRA,
            funct7::SRA,
            IntBinOp {
                rv32: None,
                rv64: Some(|a, b| ((a as i32) >> (b & 0x1f)) as u64),
            },
        ),
    ]);

    set
}

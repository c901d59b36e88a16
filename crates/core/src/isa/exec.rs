//! Execution behavior of instructions, as a closed set of categories.
//!
//! Every instruction carries an [`Executor`]: a tagged variant naming its
//! execution category plus the pure functions that compute its result. The
//! engine dispatches with one exhaustive `match`, so adding a category is a
//! compile-enforced change to the engine rather than a runtime surprise.
//!
//! Width-polymorphic categories carry one optional function per register
//! width. An absent slot means the instruction has no implementation at that
//! width, and dispatch reports it as a checked error instead of panicking.

/// A binary integer operation with per-width implementations.
///
/// A `None` slot yields
/// [`SimulatorError::UnsupportedWidth`](crate::common::error::SimulatorError::UnsupportedWidth)
/// at dispatch. Word-sized variants of 64-bit instructions (`addw`, `sllw`,
/// ...) fill only the 64-bit slot and truncate internally.
#[derive(Debug, Clone, Copy)]
pub struct IntBinOp {
    /// Implementation on a 32-bit machine.
    pub rv32: Option<fn(u32, u32) -> u32>,
    /// Implementation on a 64-bit machine.
    pub rv64: Option<fn(u64, u64) -> u64>,
}

/// A comparison with per-width implementations, used by branches.
#[derive(Debug, Clone, Copy)]
pub struct CmpOp {
    /// Comparison on a 32-bit machine.
    pub rv32: Option<fn(u32, u32) -> bool>,
    /// Comparison on a 64-bit machine.
    pub rv64: Option<fn(u64, u64) -> bool>,
}

/// Size and extension of a memory load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Sign-extended byte.
    Byte,
    /// Sign-extended half-word.
    Half,
    /// Word; sign-extended on a 64-bit machine.
    Word,
    /// Double word. 64-bit machines only.
    Double,
    /// Zero-extended byte.
    ByteUnsigned,
    /// Zero-extended half-word.
    HalfUnsigned,
    /// Zero-extended word. 64-bit machines only.
    WordUnsigned,
}

impl LoadKind {
    /// Access size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            Self::Byte | Self::ByteUnsigned => 1,
            Self::Half | Self::HalfUnsigned => 2,
            Self::Word | Self::WordUnsigned => 4,
            Self::Double => 8,
        }
    }
}

/// Size of a memory store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Low byte.
    Byte,
    /// Low half-word.
    Half,
    /// Low word.
    Word,
    /// Full double word. 64-bit machines only.
    Double,
}

impl StoreKind {
    /// Access size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }
}

/// Operand size of an atomic memory operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmoWidth {
    /// 32-bit operand (`.w` variants).
    Word,
    /// 64-bit operand (`.d` variants). 64-bit machines only.
    Double,
}

impl AmoWidth {
    /// Access size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            Self::Word => 4,
            Self::Double => 8,
        }
    }
}

/// Execution category of an instruction.
///
/// The engine matches exhaustively over this enum; each arm encodes the
/// operand flow (register reads, memory traffic, program counter updates) of
/// its category, parameterized by the carried functions.
#[derive(Debug, Clone, Copy)]
pub enum Executor {
    /// `rd = op(rs1, rs2)`.
    Register(IntBinOp),
    /// `rd = op(rs1, sign_extend(imm))`.
    Immediate(IntBinOp),
    /// `rd = op(rs1, shamt)`; the function masks the shift amount itself.
    ShiftImmediate(IntBinOp),
    /// `rd = extend(memory[rs1 + imm])`.
    Load(LoadKind),
    /// `memory[rs1 + imm] = truncate(rs2)`.
    Store(StoreKind),
    /// `if cmp(rs1, rs2) { pc += imm }`.
    Branch(CmpOp),
    /// `rd = sign_extend(imm20 << 12)`.
    Lui,
    /// `rd = pc + sign_extend(imm20 << 12)`.
    Auipc,
    /// `rd = pc + 4; pc += imm`.
    Jal,
    /// `rd = pc + 4; pc = (rs1 + imm) & !1`.
    Jalr,
    /// Environment call selected by `a0`.
    Ecall,
    /// Breakpoint; currently a logged no-op.
    Ebreak,
    /// Memory ordering fence; a no-op for this in-order machine.
    Fence,
    /// `rd = memory[rs1]; memory[rs1] = op(rd, rs2)` as one step.
    Amo {
        /// Operand size.
        width: AmoWidth,
        /// The read-modify-write operation.
        op: IntBinOp,
    },
    /// Load-reserved: load plus a reservation on the address.
    LoadReserved(AmoWidth),
    /// Store-conditional: store if the reservation still holds, reporting
    /// success in `rd`.
    StoreConditional(AmoWidth),
    /// `frd = memory[rs1 + imm]` (single-precision bits).
    FloatLoad,
    /// `memory[rs1 + imm] = frs2` (single-precision bits).
    FloatStore,
    /// `frd = op(frs1, frs2)` on raw single-precision bits.
    FloatRegister(fn(u32, u32) -> u32),
    /// `frd = op(frs1)` on raw single-precision bits.
    FloatUnary(fn(u32) -> u32),
    /// `frd = op(frs1, frs2, frs3)` on raw single-precision bits.
    FloatFma(fn(u32, u32, u32) -> u32),
    /// `rd = cmp(frs1, frs2) as integer`.
    FloatCompare(fn(f32, f32) -> bool),
    /// `rd = classification mask of frs1`.
    FloatClass,
    /// `rd = sign_extend(frs1 bits)`.
    FloatMvToInt,
    /// `frd = low bits of rs1`.
    FloatMvFromInt,
    /// `rd = frs1 as integer` (rounded toward zero).
    FloatCvtToInt {
        /// Signed or unsigned conversion target.
        signed: bool,
    },
    /// `frd = rs1 as single`.
    FloatCvtFromInt {
        /// Signed or unsigned conversion source.
        signed: bool,
    },
}

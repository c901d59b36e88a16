//! Named bit fields of a 32-bit instruction word.
//!
//! Every field is a half-open bit range `[lo, hi)` counted from bit zero.
//! Fields are purely descriptive: their positions depend only on the
//! instruction format, never on the identity of the instruction occupying
//! them, so the same extraction logic serves decode, assembly, disassembly,
//! and relocation patching.

/// A named bit range within an instruction word.
///
/// Immediate fields follow the base ISA's scattered layouts: a branch offset,
/// for example, is assembled from [`Imm12`](Self::Imm12),
/// [`Imm10_5`](Self::Imm10_5), [`Imm4_1`](Self::Imm4_1), and
/// [`ImmB11`](Self::ImmB11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionField {
    /// The whole 32-bit word.
    Entire,
    /// Major opcode, bits `[0, 7)`.
    Opcode,
    /// Destination register, bits `[7, 12)`.
    Rd,
    /// Minor function code, bits `[12, 15)`.
    Funct3,
    /// First source register, bits `[15, 20)`.
    Rs1,
    /// Second source register, bits `[20, 25)`.
    Rs2,
    /// Seven-bit function code, bits `[25, 32)`.
    Funct7,
    /// Six-bit function code for 64-bit shifts, bits `[26, 32)`.
    Funct6,
    /// Five-bit function code of atomic operations, bits `[27, 32)`.
    Funct5,
    /// Acquire bit of atomic operations, bit 26.
    Aq,
    /// Release bit of atomic operations, bit 25.
    Rl,
    /// Third source register of fused multiply-adds, bits `[27, 32)`.
    Rs3,
    /// Precision selector of fused multiply-adds, bits `[25, 27)`.
    Fmt,
    /// Rounding mode of floating-point operations, bits `[12, 15)`.
    Rm,
    /// Shift amount, bits `[20, 26)` (six bits; 32-bit shifts use five).
    Shamt,
    /// I-type immediate, bits `[20, 32)`.
    Imm11_0,
    /// S-type immediate low part (bits 4:0 of the value), bits `[7, 12)`.
    Imm4_0,
    /// S-type immediate high part (bits 11:5 of the value), bits `[25, 32)`.
    Imm11_5,
    /// B-type immediate bit 11 of the value, bit 7.
    ImmB11,
    /// B-type immediate bits 4:1 of the value, bits `[8, 12)`.
    Imm4_1,
    /// B-type immediate bits 10:5 of the value, bits `[25, 31)`.
    Imm10_5,
    /// B-type immediate bit 12 of the value, bit 31.
    Imm12,
    /// U-type immediate (bits 31:12 of the value), bits `[12, 32)`.
    Imm31_12,
    /// J-type immediate bits 19:12 of the value, bits `[12, 20)`.
    Imm19_12,
    /// J-type immediate bit 11 of the value, bit 20.
    ImmJ11,
    /// J-type immediate bits 10:1 of the value, bits `[21, 31)`.
    Imm10_1,
    /// J-type immediate bit 20 of the value, bit 31.
    Imm20,
}

impl InstructionField {
    /// The half-open bit range `[lo, hi)` this field occupies.
    pub const fn range(self) -> (u32, u32) {
        match self {
            Self::Entire => (0, 32),
            Self::Opcode => (0, 7),
            Self::Rd => (7, 12),
            Self::Funct3 | Self::Rm => (12, 15),
            Self::Rs1 => (15, 20),
            Self::Rs2 => (20, 25),
            Self::Funct7 => (25, 32),
            Self::Funct6 => (26, 32),
            Self::Funct5 | Self::Rs3 => (27, 32),
            Self::Aq => (26, 27),
            Self::Rl => (25, 26),
            Self::Fmt => (25, 27),
            Self::Shamt => (20, 26),
            Self::Imm11_0 => (20, 32),
            Self::Imm4_0 => (7, 12),
            Self::Imm11_5 => (25, 32),
            Self::ImmB11 => (7, 8),
            Self::Imm4_1 => (8, 12),
            Self::Imm10_5 => (25, 31),
            Self::Imm12 => (31, 32),
            Self::Imm31_12 => (12, 32),
            Self::Imm19_12 => (12, 20),
            Self::ImmJ11 => (20, 21),
            Self::Imm10_1 => (21, 31),
            Self::Imm20 => (31, 32),
        }
    }

    /// Width of the field in bits.
    pub const fn width(self) -> u32 {
        let (lo, hi) = self.range();
        hi - lo
    }

    /// Mask selecting this field's bits within the instruction word.
    pub const fn mask(self) -> u32 {
        let (lo, hi) = self.range();
        if hi - lo == 32 {
            u32::MAX
        } else {
            ((1u32 << (hi - lo)) - 1) << lo
        }
    }
}

/// Sign-extends the low `bits` bits of `value` to a full `i32`.
///
/// Used wherever an immediate narrower than the word is interpreted as a
/// signed quantity.
pub const fn sign_extend(value: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((value << shift) as i32) >> shift
}

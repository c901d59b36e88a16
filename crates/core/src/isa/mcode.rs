//! Machine code word wrapper.

use std::fmt;

use super::fields::{InstructionField, sign_extend};

/// One encoded instruction: a 32-bit word plus its length in bytes.
///
/// All encodings currently defined are four bytes long; the length is carried
/// explicitly so the program counter advance never hard-codes it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MachineCode {
    word: u32,
    length: u32,
}

impl MachineCode {
    /// Wraps a raw 32-bit instruction word.
    pub const fn new(word: u32) -> Self {
        Self { word, length: 4 }
    }

    /// The raw instruction word.
    pub const fn word(self) -> u32 {
        self.word
    }

    /// Length of the encoding in bytes.
    pub const fn length(self) -> u32 {
        self.length
    }

    /// Extracts a field, right-aligned.
    pub const fn get(self, field: InstructionField) -> u32 {
        let (lo, hi) = field.range();
        if hi - lo == 32 {
            self.word
        } else {
            (self.word >> lo) & ((1u32 << (hi - lo)) - 1)
        }
    }

    /// Replaces a field with the low bits of `value`.
    ///
    /// Bits of `value` beyond the field's width are discarded; bits of the
    /// word outside the field are untouched.
    pub fn set(&mut self, field: InstructionField, value: u32) {
        let (lo, hi) = field.range();
        if hi - lo == 32 {
            self.word = value;
        } else {
            let mask = field.mask();
            self.word = (self.word & !mask) | ((value << lo) & mask);
        }
    }

    /// The sign-extended I-type immediate.
    pub const fn imm_i(self) -> i32 {
        sign_extend(self.get(InstructionField::Imm11_0), 12)
    }

    /// The sign-extended S-type immediate, reassembled from its two pieces.
    pub const fn imm_s(self) -> i32 {
        let raw = (self.get(InstructionField::Imm11_5) << 5) | self.get(InstructionField::Imm4_0);
        sign_extend(raw, 12)
    }

    /// The sign-extended B-type branch offset, in bytes.
    pub const fn imm_b(self) -> i32 {
        let raw = (self.get(InstructionField::Imm12) << 12)
            | (self.get(InstructionField::ImmB11) << 11)
            | (self.get(InstructionField::Imm10_5) << 5)
            | (self.get(InstructionField::Imm4_1) << 1);
        sign_extend(raw, 13)
    }

    /// The U-type immediate, already shifted into the upper 20 bits.
    pub const fn imm_u(self) -> i32 {
        (self.get(InstructionField::Imm31_12) << 12) as i32
    }

    /// The sign-extended J-type jump offset, in bytes.
    pub const fn imm_j(self) -> i32 {
        let raw = (self.get(InstructionField::Imm20) << 20)
            | (self.get(InstructionField::Imm19_12) << 12)
            | (self.get(InstructionField::ImmJ11) << 11)
            | (self.get(InstructionField::Imm10_1) << 1);
        sign_extend(raw, 21)
    }

    /// Writes the low twelve bits of `imm` into the I-type immediate field.
    pub fn set_imm_i(&mut self, imm: i32) {
        self.set(InstructionField::Imm11_0, imm as u32);
    }

    /// Writes `imm` into the two pieces of the S-type immediate.
    pub fn set_imm_s(&mut self, imm: i32) {
        let value = imm as u32;
        self.set(InstructionField::Imm11_5, value >> 5);
        self.set(InstructionField::Imm4_0, value);
    }

    /// Writes a byte offset into the four pieces of the B-type immediate.
    pub fn set_imm_b(&mut self, offset: i32) {
        let value = offset as u32;
        self.set(InstructionField::Imm12, value >> 12);
        self.set(InstructionField::ImmB11, value >> 11);
        self.set(InstructionField::Imm10_5, value >> 5);
        self.set(InstructionField::Imm4_1, value >> 1);
    }

    /// Writes the low twenty bits of `imm` into the U-type immediate field.
    pub fn set_imm_u(&mut self, imm: i32) {
        self.set(InstructionField::Imm31_12, imm as u32);
    }

    /// Writes a byte offset into the four pieces of the J-type immediate.
    pub fn set_imm_j(&mut self, offset: i32) {
        let value = offset as u32;
        self.set(InstructionField::Imm20, value >> 20);
        self.set(InstructionField::Imm19_12, value >> 12);
        self.set(InstructionField::ImmJ11, value >> 11);
        self.set(InstructionField::Imm10_1, value >> 1);
    }
}

impl fmt::Debug for MachineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineCode({:#010x})", self.word)
    }
}

impl fmt::Display for MachineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.word)
    }
}

impl From<u32> for MachineCode {
    fn from(word: u32) -> Self {
        Self::new(word)
    }
}

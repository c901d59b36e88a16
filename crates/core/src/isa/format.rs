//! Instruction formats as data-driven constraint lists.
//!
//! A format is the set of fields an encoding fixes (opcode, function codes)
//! together with the layout of everything it leaves free (registers,
//! immediates). Matching a word against a format is simply checking every
//! fixed field for equality, which makes decode a table walk instead of a
//! cascade of masks, and lets a registration-time check prove that no two
//! instructions claim the same word.

use super::fields::InstructionField;
use super::mcode::MachineCode;

/// One fixed field of an instruction format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEqual {
    /// The constrained field.
    pub field: InstructionField,
    /// The value the field must hold.
    pub required: u32,
}

impl FieldEqual {
    /// Constrains `field` to equal `required`.
    pub const fn new(field: InstructionField, required: u32) -> Self {
        Self { field, required }
    }
}

/// The fixed fields of one instruction's encoding.
///
/// Owned by exactly one [`Instruction`](super::instruction::Instruction) and
/// immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionFormat {
    /// Length of the encoding in bytes.
    pub length: u32,
    /// Every field this format fixes.
    pub constraints: Vec<FieldEqual>,
}

impl InstructionFormat {
    /// Builds a format from its constraint list.
    pub fn new(constraints: Vec<FieldEqual>) -> Self {
        Self {
            length: 4,
            constraints,
        }
    }

    /// Whether `mcode` satisfies every constraint of this format.
    pub fn matches(&self, mcode: MachineCode) -> bool {
        self.constraints
            .iter()
            .all(|c| mcode.get(c.field) == c.required)
    }

    /// The base encoding: a word with every constraint applied and every
    /// free field zero. Assembly starts from this and fills in operands.
    pub fn fill(&self) -> MachineCode {
        let mut mcode = MachineCode::new(0);
        for c in &self.constraints {
            mcode.set(c.field, c.required);
        }
        mcode
    }

    /// Whether some word could satisfy both this format and `other`.
    ///
    /// The check is bit-exact: each format is flattened to a (mask, value)
    /// pair, and the two conflict when they agree on every bit both
    /// constrain. Field names do not have to line up — a format fixing
    /// `Funct7` is compared bit-for-bit against one fixing `Funct5`, `Aq`,
    /// and `Rl`.
    pub fn overlaps(&self, other: &Self) -> bool {
        let (self_mask, self_value) = self.flatten();
        let (other_mask, other_value) = other.flatten();
        let common = self_mask & other_mask;
        (self_value & common) == (other_value & common)
    }

    /// Flattens the constraint list to a (mask, value) pair over the word.
    fn flatten(&self) -> (u32, u32) {
        let mut mask = 0u32;
        let mut value = 0u32;
        for c in &self.constraints {
            let (lo, _) = c.field.range();
            mask |= c.field.mask();
            value |= (c.required << lo) & c.field.mask();
        }
        (mask, value)
    }

    // ── Per-layout constructors ───────────────────────────────

    /// Register-register layout: opcode, funct3, and funct7 fixed.
    pub fn r_type(opcode: u32, funct3: u32, funct7: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
            FieldEqual::new(InstructionField::Funct7, funct7),
        ])
    }

    /// Register-immediate layout: opcode and funct3 fixed.
    pub fn i_type(opcode: u32, funct3: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
        ])
    }

    /// Shift-immediate layout with a six-bit shift amount: opcode, funct3,
    /// and funct6 fixed. Used by the plain shifts so the 64-bit shamt stays
    /// free.
    pub fn shift_type(opcode: u32, funct3: u32, funct6: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
            FieldEqual::new(InstructionField::Funct6, funct6),
        ])
    }

    /// Shift-immediate layout with a five-bit shift amount: opcode, funct3,
    /// and full funct7 fixed. Used by the word-sized shifts.
    pub fn shift_w_type(opcode: u32, funct3: u32, funct7: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
            FieldEqual::new(InstructionField::Funct7, funct7),
        ])
    }

    /// Store layout: opcode and funct3 fixed, split immediate free.
    pub fn s_type(opcode: u32, funct3: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
        ])
    }

    /// Branch layout: opcode and funct3 fixed, scattered immediate free.
    pub fn b_type(opcode: u32, funct3: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
        ])
    }

    /// Upper-immediate layout: only the opcode fixed.
    pub fn u_type(opcode: u32) -> Self {
        Self::new(vec![FieldEqual::new(InstructionField::Opcode, opcode)])
    }

    /// Jump layout: only the opcode fixed.
    pub fn j_type(opcode: u32) -> Self {
        Self::new(vec![FieldEqual::new(InstructionField::Opcode, opcode)])
    }

    /// System layout: the entire word fixed (`ecall`, `ebreak`).
    pub fn system_type(word: u32) -> Self {
        Self::new(vec![FieldEqual::new(InstructionField::Entire, word)])
    }

    /// Atomic layout: opcode, funct3, funct5, and the acquire/release bits
    /// fixed. Each aq/rl combination registers as its own instruction.
    pub fn amo_r_type(opcode: u32, funct3: u32, funct5: u32, aq: u32, rl: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
            FieldEqual::new(InstructionField::Funct5, funct5),
            FieldEqual::new(InstructionField::Aq, aq),
            FieldEqual::new(InstructionField::Rl, rl),
        ])
    }

    /// Floating-point register layout: opcode and funct7 fixed, rounding
    /// mode free.
    pub fn fr_type(opcode: u32, funct7: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct7, funct7),
        ])
    }

    /// Floating-point layout with rs2 doubling as a function code
    /// (`fsqrt.s`, conversions).
    pub fn fr_rs2_type(opcode: u32, funct7: u32, rs2: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct7, funct7),
            FieldEqual::new(InstructionField::Rs2, rs2),
        ])
    }

    /// Floating-point layout with a fixed funct3 (comparisons, sign
    /// injection, moves, classification).
    pub fn fr_f3_type(opcode: u32, funct3: u32, funct7: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
            FieldEqual::new(InstructionField::Funct7, funct7),
        ])
    }

    /// Floating-point layout with both funct3 and rs2 fixed (`fmv.x.w`,
    /// `fclass.s`).
    pub fn fr_f3_rs2_type(opcode: u32, funct3: u32, funct7: u32, rs2: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Funct3, funct3),
            FieldEqual::new(InstructionField::Funct7, funct7),
            FieldEqual::new(InstructionField::Rs2, rs2),
        ])
    }

    /// Fused multiply-add layout: opcode and precision selector fixed.
    pub fn r4_type(opcode: u32, fmt: u32) -> Self {
        Self::new(vec![
            FieldEqual::new(InstructionField::Opcode, opcode),
            FieldEqual::new(InstructionField::Fmt, fmt),
        ])
    }
}

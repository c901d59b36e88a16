//! The instruction record tying together encoding, parsing, and execution.

use super::exec::Executor;
use super::format::InstructionFormat;

/// Operand syntax of an instruction, used by the assembler to parse its
/// operand list and by the disassembler to render one.
///
/// Each variant names the operand roles in source order. Memory operands use
/// the `imm(reg)` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandPattern {
    /// `rd, rs1, rs2` — e.g. `add x3, x1, x2`.
    RdRs1Rs2,
    /// `rd, rs1, imm` — e.g. `addi x1, x0, 5`.
    RdRs1Imm,
    /// `rd, rs1, shamt` — e.g. `slli x1, x2, 3`.
    RdRs1Shamt,
    /// `rd, imm` with an upper-immediate layout — e.g. `lui x5, 0x10000`.
    RdImm20,
    /// `rd, imm(rs1)` — e.g. `lw x2, 60(x0)`.
    RdMem,
    /// `rs2, imm(rs1)` — e.g. `sw x1, 60(x0)`.
    Rs2Mem,
    /// `rs1, rs2, label` — e.g. `blt x9, x8, loop`.
    Rs1Rs2Label,
    /// `rd, label` (or bare `label`, defaulting `rd` to `ra`) — `jal`.
    RdLabel,
    /// `rd, rs1, imm` with `jalr`'s one-operand and two-operand shorthands.
    Jalr,
    /// No operands — `ecall`, `fence`.
    Bare,
    /// `rd, rs2, (rs1)` — atomic read-modify-writes.
    AmoRegMem,
    /// `rd, (rs1)` — `lr.w`, `lr.d`.
    AmoLoad,
    /// `frd, frs1, frs2` — e.g. `fadd.s f1, f2, f3`.
    FrdFrs1Frs2,
    /// `frd, frs1` — `fsqrt.s`.
    FrdFrs1,
    /// `frd, frs1, frs2, frs3` — fused multiply-adds.
    FrdFrs1Frs2Frs3,
    /// `rd, frs1, frs2` — comparisons.
    RdFrs1Frs2,
    /// `rd, frs1` — `fmv.x.w`, `fcvt.w.s`, `fclass.s`.
    RdFrs1,
    /// `frd, rs1` — `fmv.w.x`, `fcvt.s.w`.
    FrdRs1,
    /// `frd, imm(rs1)` — `flw`.
    FrdMem,
    /// `frs2, imm(rs1)` — `fsw`.
    Frs2Mem,
}

/// One instruction of the simulated machine.
///
/// Instances are constructed once by the extension modules and live in the
/// global registry for the life of the process.
#[derive(Debug, Clone)]
pub struct Instruction {
    /// Mnemonic, e.g. `"addi"`.
    pub name: &'static str,
    /// The fixed fields of this instruction's encoding.
    pub format: InstructionFormat,
    /// Operand syntax for assembly and disassembly.
    pub pattern: OperandPattern,
    /// Execution category and semantics.
    pub executor: Executor,
}

impl Instruction {
    /// Builds an instruction record.
    pub fn new(
        name: &'static str,
        format: InstructionFormat,
        pattern: OperandPattern,
        executor: Executor,
    ) -> Self {
        Self {
            name,
            format,
            pattern,
            executor,
        }
    }
}

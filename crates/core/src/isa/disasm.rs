//! Rendering machine words back to assembly text, for traces and dumps.

use super::abi::{float_register_name, int_register_name};
use super::fields::InstructionField;
use super::instruction::OperandPattern;
use super::mcode::MachineCode;
use super::registry::InstructionRegistry;

/// Renders a machine word as assembly text.
///
/// Words that decode to nothing come back as a `.word` directive, so a dump
/// of arbitrary memory is always round-trippable source.
pub fn disassemble(mcode: MachineCode) -> String {
    InstructionRegistry::global()
        .decode(mcode)
        .map_or_else(|| format!(".word {mcode}"), |inst| render(inst.name, inst.pattern, mcode))
}

fn render(name: &str, pattern: OperandPattern, mcode: MachineCode) -> String {
    let rd = int_register_name(mcode.get(InstructionField::Rd));
    let rs1 = int_register_name(mcode.get(InstructionField::Rs1));
    let rs2 = int_register_name(mcode.get(InstructionField::Rs2));
    let frd = float_register_name(mcode.get(InstructionField::Rd));
    let frs1 = float_register_name(mcode.get(InstructionField::Rs1));
    let frs2 = float_register_name(mcode.get(InstructionField::Rs2));
    let frs3 = float_register_name(mcode.get(InstructionField::Rs3));

    match pattern {
        OperandPattern::RdRs1Rs2 => format!("{name} {rd}, {rs1}, {rs2}"),
        OperandPattern::RdRs1Imm => format!("{name} {rd}, {rs1}, {}", mcode.imm_i()),
        OperandPattern::RdRs1Shamt => {
            format!("{name} {rd}, {rs1}, {}", mcode.get(InstructionField::Shamt))
        }
        OperandPattern::RdImm20 => {
            format!("{name} {rd}, {:#x}", mcode.get(InstructionField::Imm31_12))
        }
        OperandPattern::RdMem => format!("{name} {rd}, {}({rs1})", mcode.imm_i()),
        OperandPattern::Rs2Mem => format!("{name} {rs2}, {}({rs1})", mcode.imm_s()),
        OperandPattern::Rs1Rs2Label => format!("{name} {rs1}, {rs2}, {}", mcode.imm_b()),
        OperandPattern::RdLabel => format!("{name} {rd}, {}", mcode.imm_j()),
        OperandPattern::Jalr => format!("{name} {rd}, {rs1}, {}", mcode.imm_i()),
        OperandPattern::Bare => name.to_owned(),
        OperandPattern::AmoRegMem => format!("{name} {rd}, {rs2}, ({rs1})"),
        OperandPattern::AmoLoad => format!("{name} {rd}, ({rs1})"),
        OperandPattern::FrdFrs1Frs2 => format!("{name} {frd}, {frs1}, {frs2}"),
        OperandPattern::FrdFrs1 => format!("{name} {frd}, {frs1}"),
        OperandPattern::FrdFrs1Frs2Frs3 => format!("{name} {frd}, {frs1}, {frs2}, {frs3}"),
        OperandPattern::RdFrs1Frs2 => format!("{name} {rd}, {frs1}, {frs2}"),
        OperandPattern::RdFrs1 => format!("{name} {rd}, {frs1}"),
        OperandPattern::FrdRs1 => format!("{name} {frd}, {rs1}"),
        OperandPattern::FrdMem => format!("{name} {frd}, {}({rs1})", mcode.imm_i()),
        OperandPattern::Frs2Mem => format!("{name} {frs2}, {}({rs1})", mcode.imm_s()),
    }
}

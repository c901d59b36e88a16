//! Decoding properties across every instruction format.
//!
//! Words are constructed by hand from their bit layout, so these tests
//! catch any disagreement between the encoders in [`MachineCode`] and the
//! format constraints the registry matches against.

use abacus_core::isa::disasm::disassemble;
use abacus_core::isa::{InstructionField, InstructionRegistry, MachineCode};
use proptest::prelude::*;

// ──────────────────────────────────────────────────────────
// Encoding helpers (construct raw 32-bit instructions)
// ──────────────────────────────────────────────────────────

/// Encode an R-type instruction.
fn r_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, rs2: u32, funct7: u32) -> u32 {
    (funct7 & 0x7f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

/// Encode an I-type instruction.
fn i_type(opcode: u32, rd: u32, funct3: u32, rs1: u32, imm: i32) -> u32 {
    ((imm as u32) & 0xfff) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

/// Encode an S-type instruction.
fn s_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 5) & 0x7f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | (v & 0x1f) << 7
        | (opcode & 0x7f)
}

/// Encode a B-type instruction.
fn b_type(opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 12) & 1) << 31
        | ((v >> 5) & 0x3f) << 25
        | (rs2 & 0x1f) << 20
        | (rs1 & 0x1f) << 15
        | (funct3 & 0x7) << 12
        | ((v >> 1) & 0xf) << 8
        | ((v >> 11) & 1) << 7
        | (opcode & 0x7f)
}

/// Encode a U-type instruction.
fn u_type(opcode: u32, rd: u32, imm20: u32) -> u32 {
    (imm20 & 0xf_ffff) << 12 | (rd & 0x1f) << 7 | (opcode & 0x7f)
}

/// Encode a J-type instruction.
fn j_type(opcode: u32, rd: u32, imm: i32) -> u32 {
    let v = imm as u32;
    ((v >> 20) & 1) << 31
        | ((v >> 1) & 0x3ff) << 21
        | ((v >> 11) & 1) << 20
        | ((v >> 12) & 0xff) << 12
        | (rd & 0x1f) << 7
        | (opcode & 0x7f)
}

fn decode_name(word: u32) -> &'static str {
    InstructionRegistry::global()
        .decode(MachineCode::new(word))
        .map_or("<none>", |inst| inst.name)
}

// ══════════════════════════════════════════════════════════
// 1. Format Coverage
// ══════════════════════════════════════════════════════════

/// One representative per encoding format decodes to the expected
/// instruction with its register fields intact.
#[test]
fn each_format_decodes_with_fields_intact() {
    // addi x1, x0, 5
    let addi = MachineCode::new(i_type(0x13, 1, 0, 0, 5));
    assert_eq!(addi.word(), 0x0050_0093);
    assert_eq!(decode_name(addi.word()), "addi");
    assert_eq!(addi.get(InstructionField::Rd), 1);
    assert_eq!(addi.get(InstructionField::Rs1), 0);
    assert_eq!(addi.imm_i(), 5);

    // add x3, x1, x2
    let add = MachineCode::new(r_type(0x33, 3, 0, 1, 2, 0));
    assert_eq!(decode_name(add.word()), "add");
    assert_eq!(add.get(InstructionField::Rs2), 2);

    // sw x1, 60(x0)
    let sw = MachineCode::new(s_type(0x23, 2, 0, 1, 60));
    assert_eq!(decode_name(sw.word()), "sw");
    assert_eq!(sw.imm_s(), 60);

    // beq x1, x2, -4
    let beq = MachineCode::new(b_type(0x63, 0, 1, 2, -4));
    assert_eq!(decode_name(beq.word()), "beq");
    assert_eq!(beq.imm_b(), -4);

    // lui x5, 0x12345
    let lui = MachineCode::new(u_type(0x37, 5, 0x12345));
    assert_eq!(decode_name(lui.word()), "lui");
    assert_eq!(lui.get(InstructionField::Imm31_12), 0x12345);

    // jal x1, -8
    let jal = MachineCode::new(j_type(0x6f, 1, -8));
    assert_eq!(decode_name(jal.word()), "jal");
    assert_eq!(jal.imm_j(), -8);
}

/// Sign extension reaches every immediate getter.
#[test]
fn immediates_sign_extend() {
    assert_eq!(MachineCode::new(i_type(0x13, 1, 0, 2, -1)).imm_i(), -1);
    assert_eq!(MachineCode::new(s_type(0x23, 2, 1, 3, -40)).imm_s(), -40);
    assert_eq!(MachineCode::new(b_type(0x63, 1, 1, 2, -4096)).imm_b(), -4096);
    assert_eq!(MachineCode::new(j_type(0x6f, 0, -2048)).imm_j(), -2048);

    // The upper immediate materializes as `field << 12`, so the top field
    // value reads back negative.
    assert_eq!(MachineCode::new(u_type(0x37, 1, 0xf_ffff)).imm_u(), -4096);
}

// ══════════════════════════════════════════════════════════
// 2. Discrimination
// ══════════════════════════════════════════════════════════

/// Identical opcode and funct3 still split on funct7.
#[test]
fn funct7_distinguishes_op_variants() {
    assert_eq!(decode_name(r_type(0x33, 1, 0, 2, 3, 0x00)), "add");
    assert_eq!(decode_name(r_type(0x33, 1, 0, 2, 3, 0x20)), "sub");
    assert_eq!(decode_name(r_type(0x33, 1, 0, 2, 3, 0x01)), "mul");
}

/// The system opcode splits on its immediate field.
#[test]
fn system_opcode_splits_on_immediate() {
    assert_eq!(decode_name(i_type(0x73, 0, 0, 0, 0)), "ecall");
    assert_eq!(decode_name(i_type(0x73, 0, 0, 0, 1)), "ebreak");
}

/// Words matching no registered format decode to nothing.
#[test]
fn unregistered_words_decode_to_none() {
    let registry = InstructionRegistry::global();
    // All-zero and all-one words use no valid opcode.
    assert!(registry.decode(MachineCode::new(0)).is_none());
    assert!(registry.decode(MachineCode::new(0xffff_ffff)).is_none());
    // A valid load opcode with an unassigned funct3.
    assert!(registry.decode(MachineCode::new(i_type(0x03, 1, 7, 0, 0))).is_none());
}

/// Every registered instruction's own canonical encoding decodes back to
/// that instruction, so no two formats shadow each other.
#[test]
fn every_registered_encoding_decodes_to_itself() {
    let registry = InstructionRegistry::global();
    for inst in registry.iter() {
        let mcode = inst.format.fill();
        let decoded = registry
            .decode(mcode)
            .unwrap_or_else(|| panic!("'{}' did not decode from {mcode}", inst.name));
        assert_eq!(decoded.name, inst.name, "'{}' decoded as '{}'", inst.name, decoded.name);
    }
}

// ══════════════════════════════════════════════════════════
// 3. Properties Over Random Words
// ══════════════════════════════════════════════════════════

proptest! {
    /// Decoding and disassembling are total over all 2^32 words: they may
    /// reject, but they never panic, and a decoded name is always a
    /// registered mnemonic.
    #[test]
    fn decode_is_total(word in any::<u32>()) {
        let registry = InstructionRegistry::global();
        let mcode = MachineCode::new(word);
        if let Some(inst) = registry.decode(mcode) {
            prop_assert!(registry.lookup(inst.name).is_some());
        }
        let _rendered = disassemble(mcode);
    }

    /// Decoding is deterministic.
    #[test]
    fn decode_is_a_function(word in any::<u32>()) {
        let registry = InstructionRegistry::global();
        let first = registry.decode(MachineCode::new(word)).map(|inst| inst.name);
        let second = registry.decode(MachineCode::new(word)).map(|inst| inst.name);
        prop_assert_eq!(first, second);
    }
}

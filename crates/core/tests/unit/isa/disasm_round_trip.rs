//! Source-to-text round trips through the disassembler.
//!
//! Each case is written in the canonical rendering the disassembler
//! produces (ABI register names, decimal offsets, hex upper immediates),
//! so assembling the line and disassembling the resulting word must give
//! the line back verbatim.

use abacus_core::assemble;
use abacus_core::isa::disasm::disassemble;
use rstest::rstest;

fn round_trip(line: &str) -> String {
    let program = assemble("rt.s", line).expect("line should assemble");
    assert_eq!(program.insts.len(), 1, "expected exactly one word for '{line}'");
    disassemble(program.insts[0])
}

#[rstest]
// Integer register and immediate forms.
#[case("add gp, ra, sp")]
#[case("sub t0, t1, t2")]
#[case("addi a0, zero, -7")]
#[case("andi s0, s1, 255")]
#[case("slli t0, t1, 31")]
#[case("srai a0, a0, 3")]
#[case("slt a0, a1, a2")]
// Loads and stores.
#[case("lw sp, 60(zero)")]
#[case("lbu a0, -1(t2)")]
#[case("sb a0, -1(t2)")]
#[case("sd s2, 16(sp)")]
// Control flow with numeric offsets.
#[case("beq a0, a1, -4")]
#[case("bltu s0, s1, 4094")]
#[case("jal ra, 16")]
#[case("jalr zero, ra, 0")]
// Upper immediates.
#[case("lui t0, 0x12345")]
#[case("auipc t1, 0x1")]
// Bare system forms.
#[case("ecall")]
#[case("ebreak")]
#[case("fence")]
// Multiply/divide.
#[case("mul a0, a1, a2")]
#[case("divu t0, t1, t2")]
#[case("remw a0, a1, a2")]
// Atomics.
#[case("amoswap.w a0, a1, (a2)")]
#[case("amoadd.d.aq.rl t0, t1, (a0)")]
#[case("lr.w t0, (a0)")]
#[case("sc.d t0, t1, (a0)")]
// Floating point.
#[case("fadd.s ft0, ft1, ft2")]
#[case("fsqrt.s ft3, ft4")]
#[case("fmadd.s ft0, ft1, ft2, ft3")]
#[case("feq.s a0, ft0, ft1")]
#[case("fclass.s a0, ft0")]
#[case("fmv.x.w a0, ft0")]
#[case("fmv.w.x ft0, a0")]
#[case("fcvt.w.s a0, ft0")]
#[case("fcvt.s.wu ft0, a1")]
#[case("flw ft0, 8(sp)")]
#[case("fsw ft1, -8(sp)")]
fn canonical_lines_round_trip(#[case] line: &str) {
    assert_eq!(round_trip(line), line);
}

/// Numeric register spellings normalize to ABI names on the way out.
#[rstest]
#[case("add x3, x1, x2", "add gp, ra, sp")]
#[case("lw x2, 60(x0)", "lw sp, 60(zero)")]
#[case("fadd.s f1, f2, f3", "fadd.s ft1, ft2, ft3")]
fn numeric_registers_normalize(#[case] written: &str, #[case] canonical: &str) {
    assert_eq!(round_trip(written), canonical);
}

/// The pseudo spellings land on their base encodings.
#[rstest]
#[case("ret", "jalr zero, ra, 0")]
#[case("nop", "addi zero, zero, 0")]
#[case("neg a0, a1", "sub a0, zero, a1")]
#[case("j 8", "jal zero, 8")]
fn pseudos_render_as_their_bases(#[case] written: &str, #[case] canonical: &str) {
    assert_eq!(round_trip(written), canonical);
}

/// Undecodable words render as data so any dump reassembles.
#[test]
fn data_words_render_as_word_directives() {
    let program = assemble("rt.s", ".word 0xdeadbeef").expect("should assemble");
    assert_eq!(disassemble(program.insts[0]), ".word 0xdeadbeef");
}

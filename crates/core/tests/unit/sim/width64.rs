//! 64-bit machines: doubleword memory, word-op sign extension, RV64
//! atomics, and the faults their instructions raise on a 32-bit machine.

use abacus_core::config::SimulatorSettings;
use abacus_core::{RegisterWidth, SimulatorError};

use crate::common::TestContext;

fn w64() -> SimulatorSettings {
    SimulatorSettings {
        width: RegisterWidth::W64,
        ..SimulatorSettings::default()
    }
}

// ══════════════════════════════════════════════════════════
// 1. Doubleword Memory
// ══════════════════════════════════════════════════════════

/// `sd` stores all eight 0xff bytes; `ld` reads them back whole, `lwu`
/// zero-extends the low word, and `lw` sign-extends it.
#[test]
fn doublewords_round_trip_through_memory() {
    let mut ctx = TestContext::boot_with(
        "\
main:
    addi t0, zero, -1
    sd t0, 0x200(zero)
    ld t1, 0x200(zero)
    lwu t2, 0x200(zero)
    lw t3, 0x200(zero)
",
        w64(),
    );
    ctx.step_n(5);
    assert_eq!(ctx.reg(6), u64::MAX);
    assert_eq!(ctx.reg(7), 0xFFFF_FFFF);
    assert_eq!(ctx.reg(28), u64::MAX);
}

// ══════════════════════════════════════════════════════════
// 2. Word Operations
// ══════════════════════════════════════════════════════════

/// With t0 = 0x8000_0000: `addiw` sign-extends its 32-bit result where
/// `addi` keeps all 64 bits, and `addw` wraps the word sum to zero.
#[test]
fn word_ops_sign_extend_their_results() {
    let mut ctx = TestContext::boot_with(
        "\
main:
    addi t0, zero, 1
    slli t0, t0, 31
    addiw t1, t0, 0
    addi t2, t0, 0
    addw t3, t0, t0
",
        w64(),
    );
    ctx.step_n(5);
    assert_eq!(ctx.reg(6), 0xFFFF_FFFF_8000_0000);
    assert_eq!(ctx.reg(7), 0x8000_0000);
    assert_eq!(ctx.reg(28), 0);
}

/// The same negative constant on a 32-bit machine is a zero-extended
/// word, not a 64-bit pattern.
#[test]
fn w32_machines_keep_word_registers() {
    let mut ctx = TestContext::boot("main:\n    addi t0, zero, -1\n");
    ctx.step_n(1);
    assert_eq!(ctx.reg(5), 0xFFFF_FFFF);
}

// ══════════════════════════════════════════════════════════
// 3. Width Dispatch Failures
// ══════════════════════════════════════════════════════════

#[test]
fn rv64_loads_fault_on_w32() {
    let mut ctx = TestContext::boot("main:\n    ld t0, 0(zero)\n");
    let err = ctx.sim.step().expect_err("ld needs a 64-bit machine");
    assert_eq!(
        err,
        SimulatorError::UnsupportedWidth {
            mnemonic: "ld",
            width: RegisterWidth::W32,
        }
    );
}

#[test]
fn rv64_atomics_fault_on_w32() {
    let mut ctx = TestContext::boot("main:\n    amoadd.d t0, t1, (t2)\n");
    let err = ctx.sim.step().expect_err("amoadd.d needs a 64-bit machine");
    assert_eq!(
        err,
        SimulatorError::UnsupportedWidth {
            mnemonic: "amoadd.d",
            width: RegisterWidth::W32,
        }
    );
}

// ══════════════════════════════════════════════════════════
// 4. Atomics
// ══════════════════════════════════════════════════════════

/// `amoadd.w` returns the old word sign-extended and stores the wrapped
/// word sum.
#[test]
fn amo_words_sign_extend_the_loaded_value() {
    let mut ctx = TestContext::boot_with(
        "\
main:
    addi t0, zero, 1
    slli t0, t0, 31
    sw t0, 0x100(zero)
    addi t1, zero, 0x100
    addi t2, zero, 4
    amoadd.w t3, t2, (t1)
",
        w64(),
    );
    ctx.step_n(6);
    assert_eq!(ctx.reg(28), 0xFFFF_FFFF_8000_0000);
    assert_eq!(ctx.mem(0x100, 4), 0x8000_0004);
}

/// A reservation admits exactly one matching store-conditional: the
/// first `sc.w` writes and reports 0, the second reports 1 and leaves
/// memory alone.
#[test]
fn reservation_pairs_succeed_exactly_once() {
    let mut ctx = TestContext::boot_with(
        "\
main:
    addi t0, zero, 0x100
    addi t1, zero, 7
    lr.w t2, (t0)
    sc.w t3, t1, (t0)
    sc.w t4, t1, (t0)
",
        w64(),
    );
    ctx.step_n(5);
    assert_eq!(ctx.reg(7), 0, "lr.w read the untouched word");
    assert_eq!(ctx.reg(28), 0, "first sc.w succeeded");
    assert_eq!(ctx.reg(29), 1, "second sc.w found no reservation");
    assert_eq!(ctx.mem(0x100, 4), 7);
}

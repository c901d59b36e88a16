//! Small programs through the full pipeline, checking architectural
//! effects instruction by instruction.

use abacus_core::common::segments::HEAP_BEGIN;
use abacus_core::{RunOutcome, SimulatorError, Status};

use crate::common::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Arithmetic and Memory
// ══════════════════════════════════════════════════════════

/// x1 = 5, x2 = x1 + 5 = 10, x3 = x1 + x2 = 15, then 15 & 8 = 8.
#[test]
fn dependent_arithmetic_masks_to_eight() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi x1, x0, 5
    addi x2, x1, 5
    add x3, x1, x2
    andi x3, x3, 8
",
    );
    ctx.step_n(4);
    assert_eq!(ctx.reg(1), 5);
    assert_eq!(ctx.reg(2), 10);
    assert_eq!(ctx.reg(3), 8);
}

/// The store lands at 60 and the load reads it back through a different
/// base register: 60 = x1 - 40 with x1 = 100.
#[test]
fn stores_round_trip_through_memory() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi x1, x0, 100
    sw x1, 60(x0)
    lw x2, -40(x1)
",
    );
    ctx.step_n(3);
    assert_eq!(ctx.reg(1), 100);
    assert_eq!(ctx.mem(60, 4), 100);
    assert_eq!(ctx.reg(2), 100);
}

// ══════════════════════════════════════════════════════════
// 2. Branches and Calls
// ══════════════════════════════════════════════════════════

/// x6 stays zero, so the loop never terminates; after 17 steps (2 setup
/// plus 5 full iterations) x8 has accumulated 0+1+2+3+4 = 10 and the
/// final taken branch has the pc back on the loop head.
#[test]
fn counting_loop_accumulates_through_bne() {
    let mut ctx = TestContext::boot(
        "\
main:
    add x8, x8, x9
    addi x7, x0, 5
start:
    add x8, x8, x9
    addi x9, x9, 1
    bne x9, x6, start
",
    );
    ctx.step_n(17);
    assert_eq!(ctx.reg(8), 10);
    assert_eq!(ctx.reg(9), 5);
    assert_eq!(ctx.sim.state().pc(), 8);
}

/// `jal` records the return address, the callee bumps a0, and `jalr`
/// lands back on the instruction after the call.
#[test]
fn calls_link_and_return_through_ra() {
    let mut ctx = TestContext::boot(
        "\
.globl main
main:
    addi a0, zero, 21
    jal ra, bump
    addi a1, a0, 0
    addi a0, zero, 17
    ecall
bump:
    addi a0, a0, 1
    jalr zero, ra, 0
",
    );
    ctx.step_n(2);
    assert_eq!(ctx.reg(1), 8, "ra points after the jal");
    assert_eq!(ctx.sim.state().pc(), 20, "pc landed on the callee");

    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 22 });
}

// ══════════════════════════════════════════════════════════
// 3. Environment Calls
// ══════════════════════════════════════════════════════════

/// Services 1, 11, 4, and 34 in sequence; everything lands in the
/// console buffer, nothing on the host's stdout.
#[test]
fn print_services_buffer_to_the_console() {
    let mut ctx = TestContext::boot(
        "\
.data
msg:
    .asciiz \"ok\"
.text
.globl main
main:
    addi a1, zero, -3
    addi a0, zero, 1
    ecall
    addi a1, zero, 32
    addi a0, zero, 11
    ecall
    la a1, msg
    addi a0, zero, 4
    ecall
    addi a1, zero, 255
    addi a0, zero, 34
    ecall
    addi a0, zero, 10
    ecall
",
    );
    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });
    assert_eq!(ctx.sim.take_stdout(), "-3 ok0x000000ff");
    assert_eq!(ctx.sim.take_stdout(), "", "taking drains the buffer");
}

/// The first `sbrk` hands back the initial break and moves it by 16;
/// a zero-sized second call reads the new break without moving it.
#[test]
fn sbrk_returns_the_old_break_and_grows() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi a1, zero, 16
    addi a0, zero, 9
    ecall
    addi t0, a0, 0
    addi a1, zero, 0
    addi a0, zero, 9
    ecall
",
    );
    ctx.step_n(7);
    assert_eq!(ctx.reg(5), HEAP_BEGIN);
    assert_eq!(ctx.reg(10), HEAP_BEGIN + 16);
    assert_eq!(ctx.sim.state().heap_end(), HEAP_BEGIN + 16);
}

#[test]
fn negative_sbrk_is_a_checked_fault() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi a1, zero, -8
    addi a0, zero, 9
    ecall
",
    );
    ctx.step_n(2);
    let err = ctx.sim.step().expect_err("shrinking the heap is refused");
    assert!(matches!(err, SimulatorError::Ecall { selector: 9, .. }));
    assert_eq!(ctx.sim.status(), Status::Errored);
}

/// exit(a1) halts immediately; the instruction after the ecall never
/// retires and further stepping is refused.
#[test]
fn exit_calls_carry_their_code() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi a1, zero, 3
    addi a0, zero, 17
    ecall
    addi t0, zero, 99
",
    );
    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 3 });
    assert_eq!(ctx.sim.exit_code(), Some(3));
    assert_eq!(ctx.reg(5), 0, "nothing ran past the exit");
    assert_eq!(
        ctx.sim.step().expect_err("halted machines cannot step"),
        SimulatorError::NotRunnable { state: "halted" }
    );
}

/// An unrecognized selector is logged and skipped, not a fault.
#[test]
fn unknown_services_are_ignored() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi a0, zero, 99
    ecall
    addi a1, zero, 1
",
    );
    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });
    assert_eq!(ctx.reg(11), 1, "execution continued past the ecall");
}

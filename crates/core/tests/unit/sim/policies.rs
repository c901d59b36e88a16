//! The settings knobs: text mutability, the heap/stack gap, alignment,
//! step budgets, register initialization, exit recognition, and reset.

use abacus_core::common::segments::{GLOBAL_POINTER, STACK_BEGIN};
use abacus_core::config::SimulatorSettings;
use abacus_core::sim::state::UNSET_PATTERN;
use abacus_core::{
    CacheHierarchy, CacheLevelConfig, HierarchyConfig, RegisterWidth, RunOutcome, SimulatorError,
    Status,
};

use crate::common::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Memory Protection
// ══════════════════════════════════════════════════════════

#[test]
fn immutable_text_rejects_stores() {
    let settings = SimulatorSettings {
        mutable_text: false,
        ..SimulatorSettings::default()
    };
    let mut ctx = TestContext::boot_with("main:\n    sw zero, 0(zero)\n", settings);

    let err = ctx.sim.step().expect_err("the text segment is read-only");
    assert_eq!(err, SimulatorError::TextStore { addr: 0 });
    assert_eq!(ctx.sim.status(), Status::Errored);
    assert_eq!(
        ctx.sim.step().expect_err("faults are sticky"),
        SimulatorError::NotRunnable { state: "errored" }
    );
    assert_eq!(ctx.sim.error(), Some(&err));
}

/// Self-modifying programs are allowed out of the box.
#[test]
fn text_is_writable_by_default() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi t0, zero, 7
    sw t0, 0(zero)
",
    );
    ctx.step_n(2);
    assert_eq!(ctx.mem(0, 4), 7);
}

/// 0x2000_0000 sits between the heap break and the stack pointer, a
/// region no well-formed program touches.
#[test]
fn the_heap_stack_gap_is_closed_by_default() {
    let mut ctx = TestContext::boot(
        "\
main:
    lui t0, 0x20000
    lw t1, 0(t0)
",
    );
    ctx.step_n(1);
    let err = ctx.sim.step().expect_err("the gap is protected");
    assert_eq!(err, SimulatorError::AccessViolation { addr: 0x2000_0000 });
}

#[test]
fn the_gap_opens_with_the_setting() {
    let settings = SimulatorSettings {
        allow_access_btn_stack_heap: true,
        ..SimulatorSettings::default()
    };
    let mut ctx = TestContext::boot_with(
        "\
main:
    lui t0, 0x20000
    addi t1, zero, 5
    sw t1, 0(t0)
    lw t2, 0(t0)
",
        settings,
    );
    ctx.step_n(4);
    assert_eq!(ctx.reg(7), 5);
}

#[test]
fn aligned_addressing_rejects_unnatural_accesses() {
    let settings = SimulatorSettings {
        aligned_addressing: true,
        ..SimulatorSettings::default()
    };
    let mut ctx = TestContext::boot_with(
        "\
main:
    addi t0, zero, 2
    lw t1, 0(t0)
",
        settings,
    );
    ctx.step_n(1);
    let err = ctx.sim.step().expect_err("a word load needs a word boundary");
    assert_eq!(err, SimulatorError::Misaligned { addr: 2, size: 4 });
}

#[test]
fn misaligned_accesses_are_tolerated_by_default() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi t0, zero, 2
    lw t1, 0(t0)
",
    );
    ctx.step_n(2);
    assert_eq!(ctx.reg(6), 0, "unwritten memory reads as zero");
}

// ══════════════════════════════════════════════════════════
// 2. Run Lifecycle
// ══════════════════════════════════════════════════════════

/// Exhausting the budget is an outcome, not a fault: the machine stays
/// runnable and the next `run` picks up where this one stopped.
#[test]
fn step_budget_exhaustion_is_not_an_error() {
    let settings = SimulatorSettings {
        max_steps: 3,
        ..SimulatorSettings::default()
    };
    let mut ctx = TestContext::boot_with("main:\n    jal zero, main\n", settings);

    assert_eq!(ctx.run(), RunOutcome::StepLimitExceeded { steps: 3 });
    assert_eq!(ctx.sim.status(), Status::Running);

    assert_eq!(ctx.run(), RunOutcome::StepLimitExceeded { steps: 3 });
    assert_eq!(ctx.sim.cycles(), 6, "both runs retired their budget");
}

#[test]
fn negative_budget_means_unlimited() {
    let settings = SimulatorSettings {
        max_steps: -1,
        ..SimulatorSettings::default()
    };
    let mut ctx = TestContext::boot_with("main:\n    addi t0, zero, 1\n", settings);
    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });
}

/// With `ecall_only_exit` the pc runs past the last instruction and
/// fetches a zero word instead of halting.
#[test]
fn ecall_only_exit_refuses_to_fall_off_the_text() {
    let settings = SimulatorSettings {
        ecall_only_exit: true,
        ..SimulatorSettings::default()
    };
    let mut ctx = TestContext::boot_with("main:\n    addi t0, zero, 1\n", settings);
    ctx.step_n(1);
    let err = ctx.sim.step().expect_err("nothing valid to fetch at the end");
    assert_eq!(err, SimulatorError::Decode { pc: 4, word: 0 });
}

// ══════════════════════════════════════════════════════════
// 3. Register Initialization
// ══════════════════════════════════════════════════════════

#[test]
fn stack_and_global_pointers_are_seeded_by_default() {
    let ctx = TestContext::boot("main:\n    addi zero, zero, 0\n");
    assert_eq!(ctx.reg(2), STACK_BEGIN);
    assert_eq!(ctx.reg(3), GLOBAL_POINTER);
}

/// With initialization off every register except x0 carries a loud
/// garbage pattern, truncated to the machine width.
#[test]
fn unset_registers_carry_the_sentinel() {
    let settings = SimulatorSettings {
        set_regs_on_init: false,
        ..SimulatorSettings::default()
    };
    let ctx = TestContext::boot_with("main:\n    addi zero, zero, 0\n", settings);
    assert_eq!(ctx.reg(0), 0);
    assert_eq!(ctx.reg(2), 0xDEAD_BEEF, "the stack pointer is not seeded");
    assert_eq!(ctx.reg(7), 0xDEAD_BEEF);

    let settings = SimulatorSettings {
        width: RegisterWidth::W64,
        set_regs_on_init: false,
        ..SimulatorSettings::default()
    };
    let ctx = TestContext::boot_with("main:\n    addi zero, zero, 0\n", settings);
    assert_eq!(ctx.reg(7), UNSET_PATTERN);
}

// ══════════════════════════════════════════════════════════
// 4. Reset
// ══════════════════════════════════════════════════════════

/// Reset rebuilds the boot state. Cache blocks go cold but their
/// counters carry across, so a rerun doubles the miss count.
#[test]
fn reset_restores_the_machine_but_keeps_cache_statistics() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi t0, zero, 9
    sw t0, 0x100(zero)
",
    );
    let caches = CacheHierarchy::new(&HierarchyConfig {
        levels: vec![CacheLevelConfig::default()],
    })
    .expect("configuration should validate");
    ctx.sim.set_caches(caches);

    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });
    assert_eq!(ctx.sim.cycles(), 2);
    assert_eq!(ctx.mem(0x100, 4), 9);
    assert_eq!(ctx.sim.caches().report().levels[0].stats.misses, 1);

    ctx.sim.reset();
    assert_eq!(ctx.sim.status(), Status::Ready);
    assert_eq!(ctx.sim.state().pc(), 0);
    assert_eq!(ctx.reg(5), 0);
    assert_eq!(ctx.mem(0x100, 4), 0);
    assert_eq!(ctx.sim.cycles(), 0);

    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });
    assert_eq!(
        ctx.sim.caches().report().levels[0].stats.misses,
        2,
        "blocks were invalidated but the counters accumulated"
    );
}

//! The two capture artifacts a run can produce: core dumps and
//! coverage records.

use abacus_core::{CoreDump, RunOutcome};
use pretty_assertions::assert_eq;

use crate::common::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Core Dumps
// ══════════════════════════════════════════════════════════

/// A dump of a halted machine survives the trip to JSON and back
/// byte-for-byte, including the sparse memory map.
#[test]
fn core_dumps_round_trip_through_json() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi t0, zero, 9
    sw t0, 0x100(zero)
    addi a0, zero, 10
    ecall
",
    );
    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });

    let dump = CoreDump::capture(&ctx.sim);
    assert_eq!(dump.width, 32);
    assert_eq!(dump.pc, 16);
    assert_eq!(dump.cycles, 4);
    assert_eq!(dump.exit_code, Some(0));
    assert_eq!(dump.registers[5], 9);
    assert_eq!(dump.memory.get(&0x100), Some(&9));

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("core.json");
    dump.write_json(&path).expect("dump should serialize");
    let restored = CoreDump::read_json(&path).expect("dump should parse back");
    assert_eq!(restored, dump);
}

// ══════════════════════════════════════════════════════════
// 2. Coverage
// ══════════════════════════════════════════════════════════

/// Three trips through a countdown loop: the init instruction runs
/// once, the body twice more, seven retirements in all.
#[test]
fn coverage_counts_every_executed_instruction() {
    let mut ctx = TestContext::boot(
        "\
main:
    addi t0, zero, 3
loop:
    addi t0, t0, -1
    bne t0, zero, loop
",
    );
    ctx.sim.record_coverage(true);
    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });
    assert_eq!(ctx.sim.cycles(), 7);

    let coverage = ctx.sim.coverage().expect("recording was enabled");
    assert_eq!(coverage.counts().len(), 3);
    assert_eq!(coverage.counts().get(&0), Some(&1));
    assert_eq!(coverage.counts().get(&4), Some(&3));
    assert_eq!(coverage.counts().get(&8), Some(&3));

    let text = coverage.render_text(ctx.sim.program());
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(
        lines,
        [
            "0x00000000 test.s:2 1",
            "0x00000004 test.s:4 3",
            "0x00000008 test.s:5 3",
        ]
    );

    let json = coverage
        .render_json(ctx.sim.program())
        .expect("counts should serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(value["0x00000004"]["location"], "test.s:4");
    assert_eq!(value["0x00000004"]["count"], 3);
}

#[test]
fn coverage_clears_on_reset_and_disable() {
    let mut ctx = TestContext::boot("main:\n    addi t0, zero, 1\n");
    assert!(ctx.sim.coverage().is_none(), "recording is off by default");

    ctx.sim.record_coverage(true);
    assert_eq!(ctx.run(), RunOutcome::Halted { exit_code: 0 });
    assert!(!ctx.sim.coverage().expect("enabled").counts().is_empty());

    ctx.sim.reset();
    assert!(
        ctx.sim.coverage().expect("still enabled").counts().is_empty(),
        "reset clears the recording"
    );

    ctx.sim.record_coverage(false);
    assert!(ctx.sim.coverage().is_none());
}

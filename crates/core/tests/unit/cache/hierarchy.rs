//! Multi-level cache behavior: traffic forwarding, attachment, sizing, and
//! reconfiguration of the whole hierarchy.

use abacus_core::config::{CacheLevelConfig, HierarchyConfig, PlacementPolicy};
use abacus_core::{CacheError, CacheHierarchy};

/// A small L1 over a roomier fully-associative L2, so L1 evictions can
/// still be caught one level down.
fn two_levels() -> CacheHierarchy {
    let config = HierarchyConfig {
        levels: vec![
            CacheLevelConfig::default(),
            CacheLevelConfig {
                block_count: 8,
                placement: PlacementPolicy::FullyAssociative,
                ..CacheLevelConfig::default()
            },
        ],
    };
    CacheHierarchy::new(&config).expect("configuration should validate")
}

// ══════════════════════════════════════════════════════════
// 1. Traffic Forwarding
// ══════════════════════════════════════════════════════════

/// A miss walks down level by level; the return value names the level that
/// answered, or none for main memory.
#[test]
fn misses_forward_to_the_next_level() {
    let mut caches = two_levels();

    // Cold: both levels miss, both install.
    assert_eq!(caches.access(0x00), None);
    // Warm in L1; L2 sees no traffic.
    assert_eq!(caches.access(0x00), Some(0));
    // 0x10 aliases 0x00 in the default direct-mapped L1 and evicts it.
    assert_eq!(caches.access(0x10), None);
    // L1 misses, but the roomy L2 still holds 0x00.
    assert_eq!(caches.access(0x00), Some(1));

    let report = caches.report();
    assert_eq!(report.levels[0].stats.hits, 1);
    assert_eq!(report.levels[0].stats.misses, 3);
    // L2 saw only the three L1 misses.
    assert_eq!(report.levels[1].stats.hits, 1);
    assert_eq!(report.levels[1].stats.misses, 2);
}

/// An empty hierarchy is a machine without caches: every access falls
/// through.
#[test]
fn empty_hierarchy_always_misses_to_memory() {
    let mut caches = CacheHierarchy::default();
    assert!(caches.is_empty());
    assert_eq!(caches.access(0x00), None);
    assert_eq!(caches.access(0x00), None);
}

// ══════════════════════════════════════════════════════════
// 2. Attachment
// ══════════════════════════════════════════════════════════

/// The walk stops at the first detached level, so a detached L1 shields
/// the levels below it and every counter freezes.
#[test]
fn detaching_a_level_freezes_the_walk() {
    let mut caches = two_levels();
    let _ = caches.access(0x00);

    caches.set_attached(0, false).expect("level exists");
    let before = caches.report();

    for addr in [0x00, 0x10, 0x20] {
        assert_eq!(caches.access(addr), None);
    }

    let after = caches.report();
    assert_eq!(before.levels[0].stats, after.levels[0].stats);
    assert_eq!(before.levels[1].stats, after.levels[1].stats);

    // Reattaching resumes counting from the frozen totals.
    caches.set_attached(0, true).expect("level exists");
    assert_eq!(caches.access(0x00), Some(0), "contents survived detachment");
    assert_eq!(caches.report().levels[0].stats.hits, before.levels[0].stats.hits + 1);
}

/// Detaching only a deeper level turns its misses into memory traffic
/// while the levels above keep working.
#[test]
fn detached_deep_level_sees_no_traffic() {
    let mut caches = two_levels();
    caches.set_attached(1, false).expect("level exists");

    assert_eq!(caches.access(0x00), None);
    assert_eq!(caches.access(0x00), Some(0));

    let report = caches.report();
    assert_eq!(report.levels[0].stats.accesses(), 2);
    assert_eq!(report.levels[1].stats.accesses(), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Sizing and Reconfiguration
// ══════════════════════════════════════════════════════════

/// Growing the hierarchy clones the deepest level's geometry; shrinking
/// drops from the bottom.
#[test]
fn level_count_grows_by_cloning_the_deepest() {
    let mut caches = CacheHierarchy::new(&HierarchyConfig {
        levels: vec![CacheLevelConfig {
            block_count: 16,
            ..CacheLevelConfig::default()
        }],
    })
    .expect("configuration should validate");

    caches.set_level_count(3).expect("valid template");
    let report = caches.report();
    assert_eq!(report.levels.len(), 3);
    assert_eq!(report.levels[1].block_count, 16);
    assert_eq!(report.levels[2].block_count, 16);
    assert_eq!(report.levels[2].level, 3, "levels stay one-based");

    caches.set_level_count(1).expect("shrinking is infallible");
    assert_eq!(caches.len(), 1);
}

/// A rejected per-level reconfiguration leaves that level untouched.
#[test]
fn bad_level_config_is_rejected_and_ignored() {
    let mut caches = two_levels();
    let _ = caches.access(0x00);

    let bad = CacheLevelConfig {
        block_size: 3,
        ..CacheLevelConfig::default()
    };
    assert!(matches!(
        caches.configure_level(0, &bad),
        Err(CacheError::NotPowerOfTwo { .. })
    ));

    let report = caches.report();
    assert_eq!(report.levels[0].block_size, 4, "old geometry retained");
    assert_eq!(report.levels[0].stats.misses, 1, "old counters retained");
    assert_eq!(caches.access(0x00), Some(0), "old contents retained");
}

/// Naming a level that does not exist is its own error.
#[test]
fn out_of_range_level_is_reported() {
    let mut caches = two_levels();
    let error = caches
        .configure_level(5, &CacheLevelConfig::default())
        .expect_err("level 5 does not exist");
    assert!(matches!(error, CacheError::NoSuchLevel { levels: 2, .. }));
}

// ══════════════════════════════════════════════════════════
// 4. Reset and Invalidate
// ══════════════════════════════════════════════════════════

/// Hierarchy-wide invalidation cools every level but keeps every counter;
/// a reset clears both.
#[test]
fn invalidate_and_reset_differ_in_what_they_keep() {
    let mut caches = two_levels();
    let _ = caches.access(0x00);
    let _ = caches.access(0x00);

    caches.invalidate();
    assert_eq!(caches.report().levels[0].stats.hits, 1, "counters survive");
    assert_eq!(caches.access(0x00), None, "contents are cold");

    caches.reset();
    let report = caches.report();
    assert_eq!(report.levels[0].stats.accesses(), 0);
    assert_eq!(report.levels[1].stats.accesses(), 0);
}

// ══════════════════════════════════════════════════════════
// 5. Configuration Files
// ══════════════════════════════════════════════════════════

/// The JSON shape users write: omitted fields take defaults, and policy
/// names use the screaming-snake spellings.
#[test]
fn hierarchy_deserializes_from_json() {
    let config: HierarchyConfig = serde_json::from_str(
        r#"{
            "levels": [
                { "block_size": 16, "block_count": 4 },
                { "block_count": 64, "associativity": 4,
                  "placement": "N_WAY_SET_ASSOCIATIVE", "replacement": "RANDOM" }
            ]
        }"#,
    )
    .expect("configuration should parse");

    let caches = CacheHierarchy::new(&config).expect("configuration should validate");
    let report = caches.report();
    assert_eq!(report.levels[0].block_size, 16);
    assert_eq!(report.levels[0].ways, 1);
    assert_eq!(report.levels[1].ways, 4);
}

//! Cache statistics collection and reporting.
//!
//! Counters accumulate inside each cache level; this module holds the
//! counter type itself plus the printable report assembled from a whole
//! hierarchy. Counters survive machine resets and clear only on an explicit
//! cache reset, so statistics can span repeated runs of one program.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{PlacementPolicy, ReplacementPolicy};

/// Hit, miss, and eviction counters for one cache level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Accesses satisfied by this level.
    pub hits: u64,
    /// Accesses this level could not satisfy.
    pub misses: u64,
    /// Valid blocks displaced by installs.
    pub evictions: u64,
}

impl CacheStats {
    /// Total accesses observed.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, in `0.0..=1.0`. Zero when nothing has
    /// been accessed yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// One level's geometry and counters, snapshotted for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary {
    /// One-based level number; L1 is closest to the core.
    pub level: usize,
    /// Whether the level currently participates in accesses.
    pub attached: bool,
    /// Block size in bytes.
    pub block_size: u32,
    /// Total number of blocks.
    pub block_count: u32,
    /// Blocks per set after applying the placement policy.
    pub ways: u32,
    /// Configured placement policy.
    pub placement: PlacementPolicy,
    /// Configured replacement policy.
    pub replacement: ReplacementPolicy,
    /// Accumulated counters.
    pub stats: CacheStats,
}

/// Printable report over the whole hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct HierarchyReport {
    /// Per-level summaries, L1 first.
    pub levels: Vec<LevelSummary>,
}

impl fmt::Display for HierarchyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "CACHE HIERARCHY STATISTICS")?;
        writeln!(f, "==========================================================")?;
        if self.levels.is_empty() {
            writeln!(f, "  no cache levels configured")?;
        }
        for level in &self.levels {
            let stats = &level.stats;
            writeln!(
                f,
                "L{:<2}    {} blocks x {} B, {}-way, {}, {}{}",
                level.level,
                level.block_count,
                level.block_size,
                level.ways,
                level.placement,
                level.replacement,
                if level.attached { "" } else { " [detached]" }
            )?;
            writeln!(
                f,
                "  accesses: {:<10} | hits: {:<10} | misses: {:<10} | evictions: {}",
                stats.accesses(),
                stats.hits,
                stats.misses,
                stats.evictions
            )?;
            writeln!(f, "  hit_rate: {:.2}%", stats.hit_rate() * 100.0)?;
        }
        write!(f, "==========================================================")
    }
}

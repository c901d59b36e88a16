//! Set-associative cache hierarchy simulator.
//!
//! The hierarchy is a stack of levels, L1 first, modelled purely for
//! statistics: the machine always reads correct data from memory, and each
//! level only records whether an access would have hit it. An access walks
//! the stack top-down, stopping at the first hit or falling through to main
//! memory; every level touched on the way updates its own counters.
//!
//! Geometry is validated when a level is configured. A rejected
//! configuration leaves the previous geometry and all counters in place, so
//! a typo in one parameter never destroys a measurement in progress.

pub mod policy;

use std::fmt;

use tracing::debug;

use self::policy::{LruPolicy, RandomPolicy, ReplacementPolicy};
use crate::common::error::CacheError;
use crate::config::{
    CacheLevelConfig, HierarchyConfig, PlacementPolicy, ReplacementPolicy as PolicyKind,
};
use crate::stats::{CacheStats, HierarchyReport, LevelSummary};

/// One block frame: a tag and its validity.
#[derive(Debug, Clone, Copy, Default)]
struct CacheBlock {
    tag: u64,
    valid: bool,
}

/// One cache level.
///
/// Blocks are stored as a flat vector of `set_count * ways` frames; the
/// frames of set `s` occupy indexes `s * ways .. (s + 1) * ways`.
pub struct CacheHandler {
    level: usize,
    config: CacheLevelConfig,
    ways: usize,
    set_count: usize,
    blocks: Vec<CacheBlock>,
    policy: Box<dyn ReplacementPolicy>,
    stats: CacheStats,
}

impl CacheHandler {
    /// Builds a level from its configuration. `level` is one-based; L1 is
    /// closest to the core.
    ///
    /// # Errors
    ///
    /// Rejects configurations whose sizes are not powers of two or whose
    /// associativity does not divide the block count.
    pub fn new(level: usize, config: &CacheLevelConfig) -> Result<Self, CacheError> {
        Self::validate(config)?;
        let (ways, set_count) = Self::geometry(config);
        Ok(Self {
            level,
            config: config.clone(),
            ways,
            set_count,
            blocks: vec![CacheBlock::default(); set_count * ways],
            policy: build_policy(config, set_count, ways),
            stats: CacheStats::default(),
        })
    }

    fn validate(config: &CacheLevelConfig) -> Result<(), CacheError> {
        require_power_of_two("block size", config.block_size)?;
        require_power_of_two("block count", config.block_count)?;
        require_power_of_two("associativity", config.associativity)?;
        if config.placement == PlacementPolicy::NWaySetAssociative
            && config.associativity > config.block_count
        {
            return Err(CacheError::AssociativityExceedsBlocks {
                associativity: config.associativity,
                blocks: config.block_count,
            });
        }
        Ok(())
    }

    /// Effective ways and set count after applying the placement policy.
    fn geometry(config: &CacheLevelConfig) -> (usize, usize) {
        let ways = match config.placement {
            PlacementPolicy::DirectMapped => 1,
            PlacementPolicy::NWaySetAssociative => config.associativity as usize,
            PlacementPolicy::FullyAssociative => config.block_count as usize,
        };
        (ways, config.block_count as usize / ways)
    }

    /// Replaces this level's configuration.
    ///
    /// Validation happens before anything changes: on error the previous
    /// geometry, contents, and counters all stay as they were. On success
    /// the contents are rebuilt empty but the counters carry over.
    ///
    /// # Errors
    ///
    /// Rejects the new configuration on the same grounds as [`Self::new`].
    pub fn reconfigure(&mut self, config: &CacheLevelConfig) -> Result<(), CacheError> {
        Self::validate(config)?;
        let (ways, set_count) = Self::geometry(config);
        self.config = config.clone();
        self.ways = ways;
        self.set_count = set_count;
        self.blocks = vec![CacheBlock::default(); set_count * ways];
        self.policy = build_policy(config, set_count, ways);
        Ok(())
    }

    /// Presents an address to this level. Returns whether it hit.
    ///
    /// A miss installs the block (write-allocate; reads and writes are not
    /// distinguished), evicting the policy's victim if the set is full.
    pub fn access(&mut self, addr: u64) -> bool {
        let set = self.set_index(addr);
        let tag = self.tag(addr);
        let base = set * self.ways;

        for way in 0..self.ways {
            let block = self.blocks[base + way];
            if block.valid && block.tag == tag {
                self.policy.update(set, way);
                self.stats.hits += 1;
                return true;
            }
        }

        self.stats.misses += 1;
        self.install(set, tag);
        false
    }

    /// Installs `tag` into `set`, preferring an empty frame over an
    /// eviction.
    fn install(&mut self, set: usize, tag: u64) {
        let base = set * self.ways;
        let way = (0..self.ways)
            .find(|&way| !self.blocks[base + way].valid)
            .unwrap_or_else(|| self.policy.get_victim(set));

        if self.blocks[base + way].valid {
            self.stats.evictions += 1;
        }
        self.blocks[base + way] = CacheBlock { tag, valid: true };
        self.policy.update(set, way);
    }

    fn set_index(&self, addr: u64) -> usize {
        ((addr / u64::from(self.config.block_size)) % self.set_count as u64) as usize
    }

    fn tag(&self, addr: u64) -> u64 {
        addr / (u64::from(self.config.block_size) * self.set_count as u64)
    }

    /// Invalidates every block and zeroes the counters.
    pub fn reset(&mut self) {
        self.invalidate();
        self.stats = CacheStats::default();
    }

    /// Invalidates every block but keeps the counters, so statistics can
    /// accumulate across repeated runs.
    pub fn invalidate(&mut self) {
        self.blocks.fill(CacheBlock::default());
        self.policy = build_policy(&self.config, self.set_count, self.ways);
    }

    /// Whether this level participates in accesses.
    pub fn attached(&self) -> bool {
        self.config.attached
    }

    /// Attaches or detaches the level. Connectivity only; counters and
    /// contents are untouched.
    pub fn set_attached(&mut self, attached: bool) {
        self.config.attached = attached;
    }

    /// Accumulated counters.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// One-based level number.
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Snapshot for reporting.
    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            level: self.level,
            attached: self.config.attached,
            block_size: self.config.block_size,
            block_count: self.config.block_count,
            ways: self.ways as u32,
            placement: self.config.placement,
            replacement: self.config.replacement,
            stats: self.stats,
        }
    }
}

impl fmt::Debug for CacheHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandler")
            .field("level", &self.level)
            .field("ways", &self.ways)
            .field("set_count", &self.set_count)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

fn require_power_of_two(name: &'static str, value: u32) -> Result<(), CacheError> {
    if value.is_power_of_two() {
        Ok(())
    } else {
        Err(CacheError::NotPowerOfTwo { name, value })
    }
}

fn build_policy(
    config: &CacheLevelConfig,
    set_count: usize,
    ways: usize,
) -> Box<dyn ReplacementPolicy> {
    match config.replacement {
        PolicyKind::Lru => Box::new(LruPolicy::new(set_count, ways)),
        PolicyKind::Random => Box::new(RandomPolicy::new(ways, config.seed)),
    }
}

/// The whole stack of cache levels.
#[derive(Debug, Default)]
pub struct CacheHierarchy {
    levels: Vec<CacheHandler>,
}

impl CacheHierarchy {
    /// Builds the hierarchy from configuration. An empty level list is a
    /// machine without caches.
    ///
    /// # Errors
    ///
    /// Fails when any level's configuration is invalid.
    pub fn new(config: &HierarchyConfig) -> Result<Self, CacheError> {
        let levels = config
            .levels
            .iter()
            .enumerate()
            .map(|(index, level)| CacheHandler::new(index + 1, level))
            .collect::<Result<Vec<_>, _>>()?;
        if !levels.is_empty() {
            debug!(levels = levels.len(), "cache hierarchy configured");
        }
        Ok(Self { levels })
    }

    /// Presents an address to the hierarchy.
    ///
    /// Returns the zero-based index of the level that hit, or `None` when
    /// the access fell through to main memory. The walk stops at the first
    /// detached level; levels below a detached one see no traffic.
    pub fn access(&mut self, addr: u64) -> Option<usize> {
        for (index, level) in self.levels.iter_mut().enumerate() {
            if !level.attached() {
                break;
            }
            if level.access(addr) {
                return Some(index);
            }
        }
        None
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether any levels are configured.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Grows or shrinks the hierarchy to `count` levels.
    ///
    /// New levels copy the configuration of the current deepest level, or
    /// the default when the hierarchy was empty. Shrinking drops the deepest
    /// levels.
    ///
    /// # Errors
    ///
    /// Fails when the copied configuration does not validate.
    pub fn set_level_count(&mut self, count: usize) -> Result<(), CacheError> {
        while self.levels.len() < count {
            let template = self
                .levels
                .last()
                .map_or_else(CacheLevelConfig::default, |level| level.config.clone());
            let level = CacheHandler::new(self.levels.len() + 1, &template)?;
            self.levels.push(level);
        }
        self.levels.truncate(count);
        Ok(())
    }

    /// Replaces the configuration of one level, zero-based index.
    ///
    /// # Errors
    ///
    /// Fails when the index names no level or the configuration is invalid.
    pub fn configure_level(
        &mut self,
        index: usize,
        config: &CacheLevelConfig,
    ) -> Result<(), CacheError> {
        let levels = self.levels.len();
        let level = self
            .levels
            .get_mut(index)
            .ok_or(CacheError::NoSuchLevel { level: index + 1, levels })?;
        level.reconfigure(config)
    }

    /// Attaches or detaches one level, zero-based index.
    ///
    /// # Errors
    ///
    /// Fails when the index names no level.
    pub fn set_attached(&mut self, index: usize, attached: bool) -> Result<(), CacheError> {
        let levels = self.levels.len();
        let level = self
            .levels
            .get_mut(index)
            .ok_or(CacheError::NoSuchLevel { level: index + 1, levels })?;
        level.set_attached(attached);
        Ok(())
    }

    /// Invalidates every level and zeroes every counter.
    pub fn reset(&mut self) {
        for level in &mut self.levels {
            level.reset();
        }
    }

    /// Invalidates contents everywhere but keeps all counters.
    pub fn invalidate(&mut self) {
        for level in &mut self.levels {
            level.invalidate();
        }
    }

    /// The configured levels, L1 first.
    pub fn levels(&self) -> &[CacheHandler] {
        &self.levels
    }

    /// Snapshot of every level for reporting.
    pub fn report(&self) -> HierarchyReport {
        HierarchyReport {
            levels: self.levels.iter().map(CacheHandler::summary).collect(),
        }
    }
}

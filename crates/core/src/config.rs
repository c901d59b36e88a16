//! Configuration for the simulator and the cache hierarchy.
//!
//! This module defines all configuration structures used to parameterize a
//! run. It provides:
//! 1. **Defaults:** Baseline values matching the classic teaching setup.
//! 2. **Simulator settings:** Step budget, memory protection, halting policy,
//!    register initialization, and register width.
//! 3. **Cache configuration:** Per-level geometry, placement, and replacement
//!    selection for the hierarchy.
//!
//! Everything deserializes from JSON with serde; omitted fields take their
//! defaults, so a config file only needs to name what it changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::width::RegisterWidth;

/// Default configuration constants.
mod defaults {
    /// Default step budget per run. Negative disables the budget.
    pub const MAX_STEPS: i64 = 500_000;

    /// Default cache block size in bytes.
    pub const BLOCK_SIZE: u32 = 4;

    /// Default number of blocks per cache level.
    pub const BLOCK_COUNT: u32 = 4;

    /// Default associativity (direct-mapped).
    pub const ASSOCIATIVITY: u32 = 1;

    /// Default seed for the random replacement policy.
    pub const SEED: u64 = 123_456_789;
}

/// Simulator policy settings.
///
/// These control halting, memory protection, and register initialization.
/// The defaults reproduce the classic teaching configuration: a 32-bit
/// machine with a 500 000 step budget, writable text, and protected
/// heap/stack gap.
///
/// # Examples
///
/// ```
/// use abacus_core::config::SimulatorSettings;
///
/// let settings: SimulatorSettings = serde_json::from_str(r#"{ "width": 64 }"#).unwrap();
/// assert_eq!(settings.width.bits(), 64);
/// assert_eq!(settings.max_steps, 500_000);
/// assert!(settings.mutable_text);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorSettings {
    /// Register width of the guest machine.
    #[serde(default)]
    pub width: RegisterWidth,

    /// Maximum number of steps one `run` may take. Negative disables the
    /// budget entirely.
    #[serde(default = "SimulatorSettings::default_max_steps")]
    pub max_steps: i64,

    /// When false, stores into the text segment raise an error.
    #[serde(default = "SimulatorSettings::default_mutable_text")]
    pub mutable_text: bool,

    /// When true, the machine halts only on an exit environment call, never
    /// by running off the end of the text segment.
    #[serde(default)]
    pub ecall_only_exit: bool,

    /// When true, the stack and global pointers are initialized at load and
    /// the remaining registers start at zero. When false, registers start
    /// with a garbage pattern so use-before-set bugs surface.
    #[serde(default = "SimulatorSettings::default_set_regs_on_init")]
    pub set_regs_on_init: bool,

    /// When true, loads and stores between the heap break and the stack
    /// pointer are permitted instead of raising an access violation.
    #[serde(default)]
    pub allow_access_btn_stack_heap: bool,

    /// When true, data accesses must be aligned to their natural size.
    #[serde(default)]
    pub aligned_addressing: bool,
}

impl SimulatorSettings {
    /// Returns the default step budget.
    fn default_max_steps() -> i64 {
        defaults::MAX_STEPS
    }

    /// Text is writable by default; self-modifying examples are allowed.
    fn default_mutable_text() -> bool {
        true
    }

    /// Stack and global pointers are initialized by default.
    fn default_set_regs_on_init() -> bool {
        true
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            width: RegisterWidth::default(),
            max_steps: defaults::MAX_STEPS,
            mutable_text: true,
            ecall_only_exit: false,
            set_regs_on_init: true,
            allow_access_btn_stack_heap: false,
            aligned_addressing: false,
        }
    }
}

/// Block placement policies.
///
/// Determines which set of a cache level an address may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementPolicy {
    /// One block per set; an address maps to exactly one block.
    #[default]
    #[serde(alias = "DirectMapped")]
    DirectMapped,
    /// Sets of `associativity` blocks each.
    #[serde(alias = "NWaySetAssociative")]
    NWaySetAssociative,
    /// A single set spanning the whole cache; an address may occupy any
    /// block.
    #[serde(alias = "FullyAssociative")]
    FullyAssociative,
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DirectMapped => "direct-mapped",
            Self::NWaySetAssociative => "N-way set-associative",
            Self::FullyAssociative => "fully associative",
        })
    }
}

/// Block replacement policies.
///
/// Determines which block of a full set is evicted on a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Evict the least recently used block of the set.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Evict a pseudo-randomly selected block. Deterministic under a fixed
    /// seed.
    #[serde(alias = "Random")]
    Random,
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lru => "LRU",
            Self::Random => "RANDOM",
        })
    }
}

/// Geometry and policy for one cache level.
///
/// The default level is the classic teaching cache: four 4-byte blocks,
/// direct-mapped, LRU.
///
/// # Examples
///
/// ```
/// use abacus_core::config::{CacheLevelConfig, PlacementPolicy};
///
/// let level: CacheLevelConfig = serde_json::from_str(
///     r#"{ "block_size": 16, "block_count": 8, "associativity": 2,
///          "placement": "N_WAY_SET_ASSOCIATIVE" }"#,
/// )
/// .unwrap();
/// assert_eq!(level.block_count, 8);
/// assert_eq!(level.placement, PlacementPolicy::NWaySetAssociative);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheLevelConfig {
    /// Block size in bytes. Must be a power of two.
    #[serde(default = "CacheLevelConfig::default_block_size")]
    pub block_size: u32,

    /// Number of blocks. Must be a power of two.
    #[serde(default = "CacheLevelConfig::default_block_count")]
    pub block_count: u32,

    /// Blocks per set. Must be a power of two no larger than `block_count`.
    /// Only meaningful under `NWaySetAssociative` placement.
    #[serde(default = "CacheLevelConfig::default_associativity")]
    pub associativity: u32,

    /// Block placement policy.
    #[serde(default)]
    pub placement: PlacementPolicy,

    /// Block replacement policy.
    #[serde(default)]
    pub replacement: ReplacementPolicy,

    /// Seed for the random replacement policy.
    #[serde(default = "CacheLevelConfig::default_seed")]
    pub seed: u64,

    /// Whether the level participates in accesses. A detached level freezes
    /// its statistics and stops propagation to the levels below it.
    #[serde(default = "CacheLevelConfig::default_attached")]
    pub attached: bool,
}

impl CacheLevelConfig {
    /// Returns the default block size in bytes.
    fn default_block_size() -> u32 {
        defaults::BLOCK_SIZE
    }

    /// Returns the default block count.
    fn default_block_count() -> u32 {
        defaults::BLOCK_COUNT
    }

    /// Returns the default associativity.
    fn default_associativity() -> u32 {
        defaults::ASSOCIATIVITY
    }

    /// Returns the default random-policy seed.
    fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Levels are attached by default.
    fn default_attached() -> bool {
        true
    }
}

impl Default for CacheLevelConfig {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            block_count: defaults::BLOCK_COUNT,
            associativity: defaults::ASSOCIATIVITY,
            placement: PlacementPolicy::default(),
            replacement: ReplacementPolicy::default(),
            seed: defaults::SEED,
            attached: true,
        }
    }
}

/// Configuration for the whole cache hierarchy, closest level first.
///
/// An empty `levels` list models a machine without caches; every access goes
/// straight to main memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Per-level configuration, L1 first.
    #[serde(default)]
    pub levels: Vec<CacheLevelConfig>,
}

//! Block replacement policies.
//!
//! A policy answers one question per miss: which way of a full set gives up
//! its block. State is tracked per set so different sets never interfere.

/// Victim selection interface shared by all replacement policies.
pub trait ReplacementPolicy: Send + Sync {
    /// Records an access to `way` within `set`.
    fn update(&mut self, set: usize, way: usize);

    /// Selects the way to evict from `set`.
    fn get_victim(&mut self, set: usize) -> usize;
}

/// Least recently used.
///
/// Keeps a usage stack per set: index 0 is the most recently used way, the
/// last index the least. `update` is O(ways), `get_victim` O(1).
#[derive(Debug)]
pub struct LruPolicy {
    usage: Vec<Vec<usize>>,
}

impl LruPolicy {
    /// Builds the policy with every stack in way order, so the highest way
    /// is evicted first from a never-touched set.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            usage: (0..sets).map(|_| (0..ways).collect()).collect(),
        }
    }
}

impl ReplacementPolicy for LruPolicy {
    fn update(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            let _moved = stack.remove(pos);
        }
        stack.insert(0, way);
    }

    fn get_victim(&mut self, set: usize) -> usize {
        self.usage[set].last().copied().unwrap_or(0)
    }
}

/// Pseudo-random selection via a 64-bit xorshift generator.
///
/// The sequence is fully determined by the seed, so runs are reproducible.
#[derive(Debug)]
pub struct RandomPolicy {
    ways: usize,
    state: u64,
}

impl RandomPolicy {
    /// Builds the policy. A zero seed is bumped to one; xorshift would
    /// otherwise never leave the zero state.
    pub fn new(ways: usize, seed: u64) -> Self {
        Self {
            ways,
            state: seed.max(1),
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn update(&mut self, _set: usize, _way: usize) {}

    fn get_victim(&mut self, _set: usize) -> usize {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x as usize) % self.ways
    }
}

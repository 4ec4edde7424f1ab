//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each `(label, index)`
//! pair, e.g. one per sweep run. Sub-seeds are derived via BLAKE3 hashing,
//! independently of thread scheduling order, so a sweep produces identical
//! results whether it runs sequentially or on any number of threads.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG hierarchy.
///
/// The master seed is expanded into per-(label, index) sub-seeds using
/// BLAKE3. Because derivation is hash-based (not order-dependent), the same
/// master seed produces identical sub-seeds regardless of the order in which
/// runs are scheduled.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Derive a deterministic sub-seed for a specific (label, index).
    pub fn sub_seed(&self, label: &str, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(label.as_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(prefix)
    }

    /// Create a seeded StdRng from a sub-seed.
    pub fn rng_for(&self, label: &str, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(label, index))
    }
}

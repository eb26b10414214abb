//! FNV-1a hashing used to seed probe sequences.

use std::hash::Hasher;

/// 64-bit FNV offset basis, the accumulator's starting value.
const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
/// 64-bit FNV prime the accumulator is multiplied by per input byte.
const FNV_PRIME: u64 = 1_099_511_628_211;

/// Streaming Fowler-Noll-Vo (FNV-1a) hasher over arbitrary byte strings.
///
/// Deterministic and stateless between uses: the same bytes always produce
/// the same 64-bit value, including the empty input, which hashes to the
/// offset basis.
#[derive(Debug, Copy, Clone)]
pub struct FnvHasher {
    /// The running hash accumulator.
    hash: u64,
}

impl FnvHasher {
    /// Creates a new `FnvHasher`, initialized with the FNV offset basis.
    #[must_use]
    pub fn new() -> Self {
        Self { hash: FNV_OFFSET_BASIS }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.hash ^= u64::from(*byte);
            self.hash = self.hash.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Hashes a whole byte string in one call.
pub(crate) fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hasher = FnvHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

//! Tabulation hashing over the bytes of a fixed-width key.
//!
//! One table of 256 random outputs per byte position; the hash of the first
//! `d` bytes is the XOR of their table entries. Truncating to a depth is just
//! stopping the fold early, and extending by one byte is a single XOR, which
//! is what lets a query hash every depth of its path in O(W) total.

use crate::key::FixedKey;
use core::fmt;
use core::marker::PhantomData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct TabulationHash<K> {
    num_bits: u32,
    tables: Box<[[u32; 256]]>,
    _key: PhantomData<fn(K)>,
}

impl<K: FixedKey> TabulationHash<K> {
    pub const MAX_BITS: u32 = 32;

    /// Draws the tables from `rng`. Outputs lie in `[0, 2^num_bits)`.
    ///
    /// Panics if `num_bits` is zero or larger than `MAX_BITS`: a family with no
    /// usable output bits is a construction bug, not a runtime condition.
    pub fn with_rng<R: Rng>(num_bits: u32, rng: &mut R) -> Self {
        assert!(
            (1..=Self::MAX_BITS).contains(&num_bits) && num_bits < usize::BITS,
            "tabulation hash needs 1..={} output bits, got {num_bits}",
            Self::MAX_BITS
        );
        let mask = ((1u64 << num_bits) - 1) as u32;
        let tables = (0..K::WIDTH)
            .map(|_| {
                let mut t = [0u32; 256];
                for v in t.iter_mut() {
                    *v = rng.gen::<u32>() & mask;
                }
                t
            })
            .collect();
        Self {
            num_bits,
            tables,
            _key: PhantomData,
        }
    }

    /// Seeds the tables from system entropy.
    pub fn from_entropy(num_bits: u32) -> Self {
        Self::with_rng(num_bits, &mut StdRng::from_entropy())
    }

    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Number of distinct hash outputs, i.e. slots per table level.
    pub fn slot_count(&self) -> usize {
        1usize << self.num_bits
    }

    /// Hash of the whole key.
    #[inline]
    pub fn hash(&self, key: K) -> usize {
        self.hash_prefix(key, K::WIDTH)
    }

    /// Hash of the first `depth` bytes of `key`; bytes past `depth` never
    /// contribute.
    #[inline]
    pub fn hash_prefix(&self, key: K, depth: usize) -> usize {
        debug_assert!(depth <= K::WIDTH);
        self.tables[..depth]
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, t)| acc ^ t[key.byte_at(i) as usize]) as usize
    }

    /// A cursor positioned at depth 0.
    pub fn cursor(&self) -> HashCursor<'_, K> {
        HashCursor {
            family: self,
            acc: 0,
            depth: 0,
        }
    }
}

impl<K> fmt::Debug for TabulationHash<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabulationHash")
            .field("num_bits", &self.num_bits)
            .field("width", &self.tables.len())
            .finish_non_exhaustive()
    }
}

/// Running hash along one key path, extended a byte at a time.
#[derive(Clone, Debug)]
pub struct HashCursor<'a, K> {
    family: &'a TabulationHash<K>,
    acc: u32,
    depth: usize,
}

impl<'a, K: FixedKey> HashCursor<'a, K> {
    /// Number of bytes folded so far.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Hash of the bytes folded so far.
    pub fn value(&self) -> usize {
        self.acc as usize
    }

    /// Folds `b` in as the byte at the current depth and returns the hash of
    /// the prefix extended by it.
    #[inline]
    pub fn fold_byte(&mut self, b: u8) -> usize {
        assert!(
            self.depth < K::WIDTH,
            "hash cursor already at full key width {}",
            K::WIDTH
        );
        self.acc ^= self.family.tables[self.depth][b as usize];
        self.depth += 1;
        self.value()
    }

    /// Folds bytes `[depth(), target)` of `key` and returns the hash at
    /// `target`.
    #[inline]
    pub fn advance_to(&mut self, key: K, target: usize) -> usize {
        debug_assert!(target <= K::WIDTH);
        debug_assert!(target >= self.depth, "hash cursor cannot move backwards");
        while self.depth < target {
            self.acc ^= self.family.tables[self.depth][key.byte_at(self.depth) as usize];
            self.depth += 1;
        }
        self.value()
    }
}

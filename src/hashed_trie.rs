//! HashedTrie: byte-wise trie whose levels are two-choice hash tables.
//!
//! Depth `d` holds one node per distinct `d`-byte prefix of the stored keys.
//! Each (prefix, depth) hashes to one slot in table 0 and one in table 1, and
//! the node lives in whichever of the two validates. There is no chaining, so
//! every read goes through [`NodeRecord::validates`].

use crate::fast_bitset::ChildSet;
use crate::key::FixedKey;
use crate::node::NodeRecord;
use crate::tabulation::TabulationHash;
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

/// Slot storage of one table: `levels[depth][slot]`.
pub(crate) type Levels<K> = Vec<Box<[NodeRecord<K>]>>;

/// Location of a slot: table, depth and slot index. Read the record behind it
/// with [`NodeHandle::node`] or [`HashedTrie::node`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeHandle {
    table: usize,
    depth: usize,
    slot: usize,
}

impl NodeHandle {
    pub fn table(&self) -> usize {
        self.table
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn node<'a, K, V>(&self, trie: &'a HashedTrie<K, V>) -> &'a NodeRecord<K>
    where
        K: FixedKey,
    {
        trie.node(*self)
    }
}

pub struct HashedTrie<K, V> {
    hashes: [TabulationHash<K>; 2],
    tables: [Levels<K>; 2],
    values: SlotMap<DefaultKey, V>,
}

impl<K: FixedKey, V> HashedTrie<K, V> {
    pub(crate) fn from_parts(
        hashes: [TabulationHash<K>; 2],
        tables: [Levels<K>; 2],
        values: SlotMap<DefaultKey, V>,
    ) -> Self {
        debug_assert!(tables.iter().all(|t| t.len() == K::WIDTH + 1));
        Self {
            hashes,
            tables,
            values,
        }
    }

    #[cfg(test)]
    pub(crate) fn tables_for_test(&self) -> &[Levels<K>; 2] {
        &self.tables
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Output width of the hash families, i.e. log2 of the slots per level.
    pub fn hash_bits(&self) -> u32 {
        self.hashes[0].num_bits()
    }

    /// Record behind a handle. Handles come from this trie's own resolution
    /// methods, so indexing is in bounds.
    #[inline]
    pub fn node(&self, h: NodeHandle) -> &NodeRecord<K> {
        &self.tables[h.table][h.depth][h.slot]
    }

    #[inline]
    fn candidates(&self, key: K, depth: usize) -> [NodeHandle; 2] {
        [0, 1].map(|table| NodeHandle {
            table,
            depth,
            slot: self.hashes[table].hash_prefix(key, depth),
        })
    }

    /// True iff the slot at `h` holds the node for `key`'s first `depth` bytes.
    #[inline]
    pub fn validate(&self, h: NodeHandle, key: K, depth: usize) -> bool {
        self.node(h).validates(key, depth)
    }

    /// Node for `key`'s first `depth` bytes, if one is stored.
    pub fn resolve(&self, key: K, depth: usize) -> Option<NodeHandle> {
        self.resolve_candidates(key, depth, self.candidates(key, depth))
    }

    /// Like [`resolve`](Self::resolve) with the two candidate slots already
    /// computed, e.g. by [`preload_path`](Self::preload_path).
    #[inline]
    pub fn resolve_candidates(
        &self,
        key: K,
        depth: usize,
        candidates: [NodeHandle; 2],
    ) -> Option<NodeHandle> {
        candidates
            .into_iter()
            .find(|&h| self.validate(h, key, depth))
    }

    /// Candidate slots for every depth `0..=W` along `key`'s path, hashed
    /// incrementally with one cursor per table.
    pub fn preload_path(&self, key: K) -> Vec<[NodeHandle; 2]> {
        let mut cursors = [self.hashes[0].cursor(), self.hashes[1].cursor()];
        let mut path = Vec::with_capacity(K::WIDTH + 1);
        path.push([cursors[0].value(), cursors[1].value()]);
        for depth in 0..K::WIDTH {
            let b = key.byte_at(depth);
            path.push([cursors[0].fold_byte(b), cursors[1].fold_byte(b)]);
        }
        path.into_iter()
            .enumerate()
            .map(|(depth, slots)| {
                [0, 1].map(|table| NodeHandle {
                    table,
                    depth,
                    slot: slots[table],
                })
            })
            .collect()
    }

    fn entry(&self, h: NodeHandle) -> Option<(K, &V)> {
        let node = self.node(h);
        self.values.get(node.min_value).map(|v| (node.min_key, v))
    }

    /// Value stored under `key`.
    pub fn get(&self, key: K) -> Option<&V> {
        let leaf = self.resolve(key, K::WIDTH)?;
        self.values.get(self.node(leaf).min_value)
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.resolve(key, K::WIDTH).is_some()
    }

    /// Smallest stored entry, read from the root's min-member cache.
    pub fn first(&self) -> Option<(K, &V)> {
        self.resolve(K::ZERO, 0).and_then(|root| self.entry(root))
    }

    /// Smallest stored entry whose key is strictly greater than `key`.
    pub fn successor(&self, key: K) -> Option<(K, &V)> {
        let path = self.preload_path(key);
        let ancestors: Vec<NodeHandle> = path
            .into_iter()
            .enumerate()
            .map_while(|(depth, candidates)| self.resolve_candidates(key, depth, candidates))
            .collect();

        // A matched leaf is `key` itself and has no siblings to offer.
        for &h in ancestors.iter().rev().filter(|h| h.depth < K::WIDTH) {
            let depth = h.depth;
            let children: &ChildSet = &self.node(h).children;
            let Some(next) = children.next_set_after(usize::from(key.byte_at(depth))) else {
                continue;
            };
            // Bytes past `depth` do not affect resolution at `depth + 1`.
            let branch = key.with_byte(depth, next as u8);
            let child = self.resolve(branch, depth + 1);
            debug_assert!(
                child.is_some(),
                "presence bit {next} at depth {depth} has no child node"
            );
            return child.and_then(|c| self.entry(c));
        }
        None
    }

    /// Entries with keys `>= start`, ascending.
    pub fn range_from(&self, start: K) -> Iter<'_, K, V> {
        let next = match self.get(start) {
            Some(v) => Some((start, v)),
            None => self.successor(start),
        };
        Iter { trie: self, next }
    }

    /// All entries, ascending.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            trie: self,
            next: self.first(),
        }
    }
}

impl<K: FixedKey, V> fmt::Debug for HashedTrie<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedTrie")
            .field("len", &self.len())
            .field("hash_bits", &self.hash_bits())
            .field("width", &K::WIDTH)
            .finish_non_exhaustive()
    }
}

/// Ascending iterator produced by chaining successor queries.
pub struct Iter<'a, K, V> {
    trie: &'a HashedTrie<K, V>,
    next: Option<(K, &'a V)>,
}

impl<'a, K: FixedKey, V> Iterator for Iter<'a, K, V> {
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.trie.successor(current.0);
        Some(current)
    }
}

impl<'a, K: FixedKey, V> IntoIterator for &'a HashedTrie<K, V> {
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

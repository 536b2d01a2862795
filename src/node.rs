//! Per-slot node records of the hashed trie.

use crate::fast_bitset::ChildSet;
use crate::key::FixedKey;
use slotmap::{DefaultKey, Key};

/// Record stored in every table slot.
///
/// `min_key`/`min_value` cache the smallest key under this node's prefix and
/// the storage key of its value. `children` marks the next bytes that have a
/// child. A live node always has at least one child bit (leaves carry bit 0),
/// so an empty `children` set doubles as the vacant-slot marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord<K> {
    pub(crate) min_key: K,
    pub(crate) min_value: DefaultKey,
    pub(crate) children: ChildSet,
}

impl<K: FixedKey> NodeRecord<K> {
    /// Byte recorded in the presence set of depth-W leaves.
    pub(crate) const LEAF_MARK: usize = 0;

    pub(crate) fn vacant() -> Self {
        Self {
            min_key: K::ZERO,
            min_value: DefaultKey::null(),
            children: ChildSet::new(),
        }
    }

    pub(crate) fn new(min_key: K, min_value: DefaultKey, children: ChildSet) -> Self {
        debug_assert!(
            !children.is_empty(),
            "live node for {min_key:?} must have a child"
        );
        Self {
            min_key,
            min_value,
            children,
        }
    }

    pub fn is_vacant(&self) -> bool {
        self.children.is_empty()
    }

    pub fn min_key(&self) -> K {
        self.min_key
    }

    pub fn children(&self) -> &ChildSet {
        &self.children
    }

    /// True iff this record is the node for `key`'s first `depth` bytes.
    ///
    /// Prefixes are unique per depth, so a nonempty record whose cached
    /// minimum shares the prefix can only be that prefix's node; anything else
    /// is a collision and reads as "no node here".
    #[inline]
    pub fn validates(&self, key: K, depth: usize) -> bool {
        self.min_key.shares_prefix(key, depth) && !self.children.is_empty()
    }
}

impl<K: FixedKey> Default for NodeRecord<K> {
    fn default() -> Self {
        Self::vacant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    /// Invariant: vacant records never validate, not even at depth 0.
    #[test]
    fn vacant_never_validates() {
        let v = NodeRecord::<u32>::vacant();
        assert!(v.is_vacant());
        assert!(!v.validates(0, 0));
        assert!(!v.validates(0, 4));
    }

    /// Invariant: a live record validates exactly for keys sharing its prefix.
    #[test]
    fn live_record_validates_on_prefix() {
        let mut values: SlotMap<DefaultKey, &str> = SlotMap::new();
        let vk = values.insert("v");
        let n = NodeRecord::new(0x1234_5678u32, vk, ChildSet::with_bit(0x56));
        assert!(!n.is_vacant());
        assert!(n.validates(0x1234_0000, 2));
        assert!(n.validates(0x12ff_ffff, 1));
        assert!(!n.validates(0x1235_0000, 2));
        assert!(n.validates(0xffff_ffff, 0));
        assert_eq!(n.min_key(), 0x1234_5678);
    }
}

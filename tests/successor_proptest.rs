use hashed_trie::HashedTrie;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Model successor and point queries on HashedTrie against a BTreeSet.
proptest! {
    #[test]
    fn prop_successor_is_next_greater_member(
        keys in proptest::collection::btree_set(any::<u64>(), 0..150),
        probes in proptest::collection::vec(any::<u64>(), 1..50),
    ) {
        let t = HashedTrie::from_entries(keys.iter().map(|&k| (k, k ^ 0x5555))).unwrap();
        let max = keys.iter().next_back().copied();

        for k in probes.into_iter().chain(keys.iter().copied()) {
            let expected = keys.range(k.saturating_add(1)..).next().copied()
                .filter(|_| k < u64::MAX);
            prop_assert_eq!(t.successor(k).map(|(s, _)| s), expected);
            if let Some((s, v)) = t.successor(k) {
                prop_assert_eq!(*v, s ^ 0x5555);
            }
            if max.map_or(true, |m| k >= m) {
                prop_assert!(t.successor(k).is_none());
            }
            prop_assert_eq!(t.get(k).is_some(), keys.contains(&k));
        }
    }

    #[test]
    fn prop_iteration_is_sorted_membership(keys in proptest::collection::btree_set(any::<u16>(), 0..400)) {
        let t = HashedTrie::from_entries(keys.iter().map(|&k| (k, ()))).unwrap();
        let seen: BTreeSet<u16> = t.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(&seen, &keys);
        let ordered: Vec<u16> = t.iter().map(|(k, _)| k).collect();
        prop_assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    }
}

#![cfg(test)]

// Property tests for HashedTrie kept inside the crate so they can inspect
// table layout through crate-private accessors.

use crate::{FixedKey, HashedTrie, TrieConfig};
use proptest::prelude::*;
use std::collections::BTreeMap;

// Keys clustered so that many share long prefixes: a few dense low ranges,
// a fixed high prefix with varying low bytes, and unrelated random keys.
fn arb_key() -> impl Strategy<Value = u32> {
    prop_oneof![
        0u32..600,
        (0u32..16).prop_map(|x| 0xabcd_ef00 | x),
        (0u32..8).prop_map(|x| 0x7f00_0000 | (x << 8)),
        any::<u32>(),
    ]
}

fn arb_entries() -> impl Strategy<Value = BTreeMap<u32, u64>> {
    proptest::collection::btree_map(arb_key(), any::<u64>(), 0..200)
}

// Queries include every member and its neighbours, plus unrelated keys.
fn queries(model: &BTreeMap<u32, u64>, extra: &[u32]) -> Vec<u32> {
    let mut q: Vec<u32> = model
        .keys()
        .flat_map(|&k| [k.wrapping_sub(1), k, k.wrapping_add(1)])
        .collect();
    q.extend_from_slice(extra);
    q.extend([0, u32::MAX]);
    q
}

fn expected_successor(model: &BTreeMap<u32, u64>, k: u32) -> Option<(u32, &u64)> {
    model
        .range((std::ops::Bound::Excluded(k), std::ops::Bound::Unbounded))
        .next()
        .map(|(k, v)| (*k, v))
}

// Property: model equivalence against BTreeMap.
// - `get` returns the stored value for members and None otherwise, even for
//   keys one byte away from a member.
// - `successor` is the smallest strictly greater member, None at or past the max.
// - `first`, `len` and full iteration agree with the model.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_btreemap(
        model in arb_entries(),
        extra in proptest::collection::vec(arb_key(), 0..32),
        seed in any::<u64>(),
    ) {
        let config = TrieConfig::builder().seed(seed).build();
        let t = HashedTrie::build(model.iter().map(|(&k, &v)| (k, v)), &config).unwrap();

        prop_assert_eq!(t.len(), model.len());
        prop_assert_eq!(t.is_empty(), model.is_empty());
        prop_assert_eq!(t.first(), model.iter().next().map(|(k, v)| (*k, v)));

        for k in queries(&model, &extra) {
            prop_assert_eq!(t.get(k), model.get(&k), "get({:#x})", k);
            prop_assert_eq!(t.contains_key(k), model.contains_key(&k));
            prop_assert_eq!(t.successor(k), expected_successor(&model, k), "successor({:#x})", k);
        }

        let all: Vec<(u32, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(u32, u64)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(all, expected);
    }
}

// Property: layouts forced through tiny widths (many reseeds and growth
// steps) answer exactly like roomy ones, and every live slot validates for
// its own prefix.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_crowded_layouts_stay_correct(
        model in proptest::collection::btree_map(any::<u16>(), any::<u8>(), 1..300),
        start_bits in 1u32..6,
        seed in any::<u64>(),
    ) {
        let config = TrieConfig::builder()
            .hash_bits(start_bits)
            .max_hash_bits(16)
            .max_reseeds(1)
            .seed(seed)
            .build();
        let t = HashedTrie::build(model.iter().map(|(&k, &v)| (k, v)), &config).unwrap();

        for (table_idx, table) in t.tables_for_test().iter().enumerate() {
            for (depth, level) in table.iter().enumerate() {
                for (slot, node) in level.iter().enumerate().filter(|(_, n)| !n.is_vacant()) {
                    prop_assert!(
                        node.validates(node.min_key(), depth),
                        "table {} depth {} slot {}", table_idx, depth, slot
                    );
                    prop_assert!(model.contains_key(&node.min_key()));
                }
            }
        }

        for k in (0..=u16::MAX).step_by(97).chain(model.keys().copied()) {
            prop_assert_eq!(t.get(k), model.get(&k));
            let succ = model
                .range((std::ops::Bound::Excluded(k), std::ops::Bound::Unbounded))
                .next()
                .map(|(k, v)| (*k, v));
            prop_assert_eq!(t.successor(k), succ);
        }
    }
}

// Property: for every stored prefix the resolved node caches the minimum key
// under that prefix.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_min_member_cache(model in arb_entries(), seed in any::<u64>()) {
        let config = TrieConfig::builder().seed(seed).build();
        let t = HashedTrie::build(model.iter().map(|(&k, &v)| (k, v)), &config).unwrap();
        for &k in model.keys() {
            for depth in 0..=u32::WIDTH {
                let h = t.resolve(k, depth);
                prop_assert!(h.is_some(), "prefix of {:#x} at depth {} must resolve", k, depth);
                let p = k.prefix(depth);
                let min = model.range(p..).next().map(|(k, _)| *k);
                prop_assert_eq!(h.map(|h| t.node(h).min_key()), min);
            }
        }
    }
}

use hashed_trie::{BuildError, FixedKey, HashedTrie, TrieConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn abc() -> HashedTrie<u64, &'static str> {
    init_logging();
    HashedTrie::from_entries([(10u64, "a"), (20, "b"), (300, "c")]).unwrap()
}

#[test]
fn end_to_end_example() {
    let t = abc();
    assert_eq!(t.get(20), Some(&"b"));
    assert_eq!(t.get(21), None);
    assert_eq!(t.successor(15), Some((20, &"b")));
    assert_eq!(t.successor(300), None);
    assert_eq!(t.successor(0), Some((10, &"a")));
}

#[test]
fn successor_never_returns_the_query_key() {
    let t = abc();
    for k in [10u64, 20, 300] {
        let (next, _) = t.successor(k).unwrap_or((u64::MAX, &""));
        assert!(next > k, "successor({k}) = {next}");
    }
    assert_eq!(t.successor(10).map(|(k, _)| k), Some(20));
    assert_eq!(t.successor(20).map(|(k, _)| k), Some(300));
}

#[test]
fn keys_sharing_long_prefixes() {
    init_logging();
    let base: u64 = 0x0123_4567_89ab_cd00;
    let members = [base | 0x10, base | 0x20, base | 0xff];
    let t = HashedTrie::from_entries(members.iter().map(|&k| (k, k))).unwrap();

    for &k in &members {
        assert_eq!(t.get(k), Some(&k));
    }
    // Same first seven bytes as every member, different last byte.
    for k in [base, base | 0x11, base | 0xfe] {
        assert_eq!(t.get(k), None, "{k:#x}");
    }
    assert_eq!(t.successor(base).map(|(k, _)| k), Some(base | 0x10));
    assert_eq!(t.successor(base | 0x10).map(|(k, _)| k), Some(base | 0x20));
    assert_eq!(t.successor(base | 0x21).map(|(k, _)| k), Some(base | 0xff));
    assert_eq!(t.successor(base | 0xff), None);
    // Below the shared prefix, the first member is the successor.
    assert_eq!(t.successor(0).map(|(k, _)| k), Some(base | 0x10));
}

#[test]
fn empty_structure() {
    let t: HashedTrie<u32, String> = HashedTrie::from_entries(Vec::new()).unwrap();
    assert!(t.is_empty());
    for k in [0u32, 1, 12345, u32::MAX] {
        assert_eq!(t.get(k), None);
        assert_eq!(t.successor(k), None);
    }
    assert_eq!(t.first(), None);
    assert_eq!(t.range_from(0).count(), 0);
}

#[test]
fn single_key_at_extremes() {
    let zero = HashedTrie::from_entries([(0u16, 'z')]).unwrap();
    assert_eq!(zero.get(0), Some(&'z'));
    assert_eq!(zero.successor(0), None);

    let max = HashedTrie::from_entries([(u16::MAX, 'm')]).unwrap();
    assert_eq!(max.successor(0), Some((u16::MAX, &'m')));
    assert_eq!(max.successor(u16::MAX - 1), Some((u16::MAX, &'m')));
    assert_eq!(max.successor(u16::MAX), None);
}

#[test]
fn wide_keys() {
    let keys: Vec<u128> = vec![1, 1 << 64, (1 << 64) + 1, u128::MAX - 1, u128::MAX];
    let t = HashedTrie::from_entries(keys.iter().map(|&k| (k, k.count_ones()))).unwrap();
    assert_eq!(u128::WIDTH, 16);
    for w in keys.windows(2) {
        assert_eq!(t.successor(w[0]).map(|(k, _)| k), Some(w[1]));
    }
    assert_eq!(t.get(1 << 64), Some(&1));
    assert_eq!(t.get(2), None);
    let ascending: Vec<u128> = t.iter().map(|(k, _)| k).collect();
    assert_eq!(ascending, keys);
}

#[test]
fn range_from_matches_sorted_order() {
    let keys: Vec<u32> = (0..500u32).map(|i| i * i * 31).collect();
    let t = HashedTrie::from_entries(keys.iter().map(|&k| (k, ()))).unwrap();
    for start in [0u32, 31, 32, 123_456, 7_000_000, u32::MAX] {
        let got: Vec<u32> = t.range_from(start).map(|(k, _)| k).collect();
        let expected: Vec<u32> = keys.iter().copied().filter(|&k| k >= start).collect();
        assert_eq!(got, expected, "range_from({start})");
    }
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = HashedTrie::from_entries([(5u8, 1), (6, 2), (5, 3)]).unwrap_err();
    assert_eq!(err, BuildError::DuplicateKey { position: 2 });
    assert_eq!(err.to_string(), "duplicate key at input position 2");
}

#[test]
fn every_byte_key_space() {
    // Fills the whole u8 key space: the root has all 256 children.
    let t = HashedTrie::build(
        (0..=255u8).map(|k| (k, u32::from(k) * 2)),
        &TrieConfig::builder().seed(1).build(),
    )
    .unwrap();
    let root = t.resolve(0, 0).unwrap();
    assert_eq!(t.node(root).children().count_set(), 256);
    for k in 0..255u8 {
        assert_eq!(t.successor(k), Some((k + 1, &(u32::from(k + 1) * 2))));
    }
    assert_eq!(t.successor(255), None);
}

//! Bulk construction of a [`HashedTrie`] from key/value pairs.
//!
//! Nodes are gathered per depth (one per distinct prefix), then placed into
//! the two tables with two-choice hashing plus cuckoo displacement. A level
//! that still cannot be placed discards the attempt: the builder draws fresh
//! hash families, and after `max_reseeds` failures grows the hash width.

use crate::error::BuildError;
use crate::fast_bitset::ChildSet;
use crate::hashed_trie::{HashedTrie, Levels};
use crate::key::FixedKey;
use crate::logger::{debug, info, trace};
use crate::node::NodeRecord;
use crate::tabulation::TabulationHash;
use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotmap::{DefaultKey, SlotMap};
use typed_builder::TypedBuilder;

/// Smallest width picked when `hash_bits` is left to the builder.
const MIN_DEFAULT_HASH_BITS: u32 = 4;

/// Construction parameters for [`HashedTrie::build`].
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct TrieConfig {
    /// Initial hash width in bits (slots per table level = 2^hash_bits). When
    /// unset, derived from the widest level: one bit more than needed to hold
    /// it in a single table.
    #[builder(default, setter(strip_option))]
    pub hash_bits: Option<u32>,

    /// Widest hash the builder may grow to before giving up.
    #[builder(default = 24)]
    pub max_hash_bits: u32,

    /// Fresh hash families drawn at one width before growing it.
    #[builder(default = 8)]
    pub max_reseeds: u32,

    /// Cuckoo displacements allowed while placing a single node.
    #[builder(default = 64)]
    pub max_kicks: u32,

    /// Seed for the hash tables. When unset, tables are seeded from system
    /// entropy.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl TrieConfig {
    fn validate(&self) -> Result<(), BuildError> {
        let max = TabulationHash::<u8>::MAX_BITS.min(usize::BITS - 1);
        if self.max_hash_bits == 0 || self.max_hash_bits > max {
            return Err(BuildError::InvalidConfig {
                reason: format!("max_hash_bits must be in 1..={max}, got {}", self.max_hash_bits),
            });
        }
        if let Some(bits) = self.hash_bits {
            if bits == 0 || bits > self.max_hash_bits {
                return Err(BuildError::InvalidConfig {
                    reason: format!(
                        "hash_bits must be in 1..={}, got {bits}",
                        self.max_hash_bits
                    ),
                });
            }
        }
        Ok(())
    }

    fn initial_hash_bits(&self, widest_level: usize) -> u32 {
        self.hash_bits.unwrap_or_else(|| {
            let needed = widest_level.max(1).next_power_of_two().trailing_zeros() + 1;
            needed.clamp(MIN_DEFAULT_HASH_BITS.min(self.max_hash_bits), self.max_hash_bits)
        })
    }
}

impl<K: FixedKey, V> HashedTrie<K, V> {
    /// Builds a trie over `entries` with the default configuration.
    pub fn from_entries<I>(entries: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::build(entries, &TrieConfig::default())
    }

    /// Builds a trie over `entries`. Keys must be unique.
    pub fn build<I>(entries: I, config: &TrieConfig) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        config.validate()?;

        let mut values: SlotMap<DefaultKey, V> = SlotMap::new();
        let levels = gather_levels(entries, &mut values)?;
        let (widest_depth, widest) = levels
            .iter()
            .map(Vec::len)
            .enumerate()
            .max_by_key(|&(_, n)| n)
            .unwrap_or((0, 0));

        let mut rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut failed_depth = 0;

        for bits in config.initial_hash_bits(widest)..=config.max_hash_bits {
            let slots = 1usize << bits;
            if widest > 2 * slots {
                trace!("{widest} nodes cannot fit two tables of {slots} slots");
                failed_depth = widest_depth;
                continue;
            }
            for attempt in 0..=config.max_reseeds {
                let hashes = [
                    TabulationHash::with_rng(bits, &mut rng),
                    TabulationHash::with_rng(bits, &mut rng),
                ];
                match place_levels(&hashes, &levels, config.max_kicks) {
                    Ok(tables) => {
                        info!(
                            "built hashed trie: {} keys, {bits} hash bits, {} attempts at this width",
                            values.len(),
                            attempt + 1
                        );
                        return Ok(HashedTrie::from_parts(hashes, tables, values));
                    }
                    Err(depth) => {
                        debug!(
                            "placement failed at depth {depth} with {bits} hash bits (attempt {}), reseeding",
                            attempt + 1
                        );
                        failed_depth = depth;
                    }
                }
            }
            debug!("growing hash width past {bits} bits");
        }

        Err(BuildError::PlacementFailed {
            depth: failed_depth,
            nodes: levels.get(failed_depth).map_or(0, Vec::len),
            max_hash_bits: config.max_hash_bits,
        })
    }
}

/// One node per distinct prefix at every depth `0..=W`, sorted by key so
/// placement order does not depend on map iteration order.
fn gather_levels<K, V, I>(
    entries: I,
    values: &mut SlotMap<DefaultKey, V>,
) -> Result<Vec<Vec<NodeRecord<K>>>, BuildError>
where
    K: FixedKey,
    I: IntoIterator<Item = (K, V)>,
{
    let mut by_prefix: Vec<HashMap<K, NodeRecord<K>>> =
        (0..=K::WIDTH).map(|_| HashMap::new()).collect();

    for (position, (key, value)) in entries.into_iter().enumerate() {
        if by_prefix[K::WIDTH].contains_key(&key) {
            return Err(BuildError::DuplicateKey { position });
        }
        let vk = values.insert(value);
        for (depth, level) in by_prefix.iter_mut().enumerate() {
            let child = if depth < K::WIDTH {
                usize::from(key.byte_at(depth))
            } else {
                NodeRecord::<K>::LEAF_MARK
            };
            level
                .entry(key.prefix(depth))
                .and_modify(|node| {
                    node.children.set_bit(child);
                    if key < node.min_key {
                        node.min_key = key;
                        node.min_value = vk;
                    }
                })
                .or_insert_with(|| NodeRecord::new(key, vk, ChildSet::with_bit(child)));
        }
    }

    Ok(by_prefix
        .into_iter()
        .map(|level| {
            let mut nodes: Vec<NodeRecord<K>> = level.into_values().collect();
            nodes.sort_unstable_by_key(|n| n.min_key);
            nodes
        })
        .collect())
}

/// Lays every level out in fresh tables. On failure returns the depth whose
/// node could not be placed.
fn place_levels<K: FixedKey>(
    hashes: &[TabulationHash<K>; 2],
    levels: &[Vec<NodeRecord<K>>],
    max_kicks: u32,
) -> Result<[Levels<K>; 2], usize> {
    let slots = hashes[0].slot_count();
    let mut tables: [Levels<K>; 2] = [0, 1].map(|_| {
        (0..=K::WIDTH)
            .map(|_| vec![NodeRecord::vacant(); slots].into_boxed_slice())
            .collect()
    });

    for (depth, nodes) in levels.iter().enumerate() {
        for &node in nodes {
            if !place(&mut tables, hashes, depth, node, max_kicks) {
                return Err(depth);
            }
        }
    }
    Ok(tables)
}

/// Two-choice insert with cuckoo displacement. An evicted node moves to its
/// slot in the other table, recomputed from its `min_key`, which carries the
/// node's prefix.
fn place<K: FixedKey>(
    tables: &mut [Levels<K>; 2],
    hashes: &[TabulationHash<K>; 2],
    depth: usize,
    node: NodeRecord<K>,
    max_kicks: u32,
) -> bool {
    debug_assert!(!node.is_vacant());
    for (table, hash) in hashes.iter().enumerate() {
        let cell = &mut tables[table][depth][hash.hash_prefix(node.min_key, depth)];
        if cell.is_vacant() {
            *cell = node;
            return true;
        }
    }

    let mut homeless = node;
    let mut table = 0;
    for _ in 0..max_kicks {
        let slot = hashes[table].hash_prefix(homeless.min_key, depth);
        homeless = core::mem::replace(&mut tables[table][depth][slot], homeless);
        if homeless.is_vacant() {
            return true;
        }
        table ^= 1;
    }
    false
}

//! hashed-trie: an immutable index over fixed-width integer keys answering
//! exact lookups and successor queries in O(W) hash probes, W being the key
//! width in bytes.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a byte-wise trie whose memory follows the number of stored keys
//!   rather than the key universe, with no pointer-linked nodes.
//! - Layers:
//!   - FastBitset: word-backed bit vector; `ChildSet` marks which of the 256
//!     next bytes of a node have a child and finds the next one above a byte.
//!   - TabulationHash: per-byte random tables XOR-folded over a key prefix,
//!     truncatable to any depth and extendable one byte at a time through a
//!     `HashCursor`.
//!   - NodeRecord: per-slot payload; caches the minimum key of the subtree
//!     and the presence set of its children.
//!   - HashedTrie: two tables x (W + 1) depths of node records. A
//!     (prefix, depth) maps to one slot per table; validation decides which,
//!     if either, is its node.
//!
//! Constraints
//! - Read-only after construction; `HashedTrie<K, V>` is `Send + Sync` when
//!   `V` is, so concurrent readers need no locking.
//! - No chaining: every lookup step validates the slot it lands in by
//!   checking that the cached minimum shares the queried prefix and that the
//!   presence set is nonempty.
//! - Queries never fail; absence is `None`. Only construction returns errors.
//!
//! Presence-set sentinel
//! - An all-zero `ChildSet` marks a vacant slot. Live nodes always have at
//!   least one child bit; depth-W leaves have no next byte and carry bit 0.
//!   Breaking this makes live nodes invisible, so the builder asserts it in
//!   debug builds.
//!
//! Successor semantics
//! - `successor(k)` is strictly greater than `k`. The matched leaf of a stored
//!   key is never searched for siblings; the search starts at its parent.
//!
//! Construction
//! - `HashedTrie::build` gathers one node per distinct prefix per depth, then
//!   places nodes with two-choice hashing and cuckoo displacement. Failed
//!   layouts are retried with fresh hash tables and then wider hashes, as
//!   configured by `TrieConfig`.
//! - Hash tables are drawn once per build and owned by the trie; there is no
//!   process-wide random state.
//!
//! Notes and non-goals
//! - No insertion or deletion on a built trie; rebuild instead.
//! - No persistence or serialization.
//! - Builder diagnostics go through `log` when the `logger` feature is on.

mod builder;
mod error;
pub mod fast_bitset;
pub mod hashed_trie;
mod hashed_trie_proptest;
mod key;
mod logger;
mod node;
pub mod tabulation;

// Public surface
pub use builder::TrieConfig;
pub use error::BuildError;
pub use fast_bitset::{ChildSet, FastBitset};
pub use hashed_trie::{HashedTrie, NodeHandle};
pub use key::FixedKey;
pub use node::NodeRecord;
pub use tabulation::{HashCursor, TabulationHash};

//! FastBitset: fixed-capacity bit vector backed by `u64` words.
//!
//! Capacity is `WORDS * 64` bits. Trie nodes use [`ChildSet`] (256 bits) to
//! mark which next-byte values have a live child; the successor walk needs
//! "smallest set bit strictly greater than `s`", which is `keep_above(s)`
//! followed by `lowest_set()` on a copy.

use core::fmt;

const WORD_BITS: usize = u64::BITS as usize;

/// Presence set over the 256 possible next bytes of a trie node.
pub type ChildSet = FastBitset<4>;

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FastBitset<const WORDS: usize> {
    words: [u64; WORDS],
}

/// `x << s`, yielding 0 instead of overflowing when `s >= 64`.
#[inline]
fn safe_shl(x: u64, s: usize) -> u64 {
    u32::try_from(s)
        .ok()
        .and_then(|s| x.checked_shl(s))
        .unwrap_or(0)
}

impl<const WORDS: usize> FastBitset<WORDS> {
    pub const CAPACITY: usize = WORDS * WORD_BITS;

    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    /// A set holding exactly `bit`.
    pub fn with_bit(bit: usize) -> Self {
        let mut s = Self::new();
        s.set_bit(bit);
        debug_assert!(!s.is_empty());
        s
    }

    #[inline]
    fn locate(bit: usize) -> (usize, u64) {
        debug_assert!(bit < Self::CAPACITY, "bit {bit} out of range");
        (bit / WORD_BITS, 1u64 << (bit % WORD_BITS))
    }

    #[inline]
    pub fn set_bit(&mut self, bit: usize) {
        let (w, m) = Self::locate(bit);
        self.words[w] |= m;
    }

    #[inline]
    pub fn clear_bit(&mut self, bit: usize) {
        let (w, m) = Self::locate(bit);
        self.words[w] &= !m;
    }

    #[inline]
    pub fn get_bit(&self, bit: usize) -> bool {
        let (w, m) = Self::locate(bit);
        self.words[w] & m != 0
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count_set(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Index of the lowest set bit.
    pub fn lowest_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|&(_, &w)| w != 0)
            .map(|(i, w)| i * WORD_BITS + w.trailing_zeros() as usize)
    }

    /// Index of the highest set bit.
    pub fn highest_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|&(_, &w)| w != 0)
            .map(|(i, w)| i * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize))
    }

    /// Clears bits `[start, CAPACITY)`.
    pub fn keep_below(&mut self, start: usize) {
        let first = start / WORD_BITS;
        if first >= WORDS {
            return;
        }
        let mask = safe_shl(1, start % WORD_BITS).wrapping_sub(1);
        self.words[first] &= mask;
        for w in &mut self.words[first + 1..] {
            *w = 0;
        }
    }

    /// Clears bits `[0, start]`.
    pub fn keep_above(&mut self, start: usize) {
        let last = start / WORD_BITS;
        if last >= WORDS {
            self.words = [0; WORDS];
            return;
        }
        let mask = !safe_shl(1, start % WORD_BITS + 1).wrapping_sub(1);
        self.words[last] &= mask;
        for w in &mut self.words[..last] {
            *w = 0;
        }
    }

    /// Smallest set bit strictly greater than `bit`.
    #[inline]
    pub fn next_set_after(&self, bit: usize) -> Option<usize> {
        let mut rest = *self;
        rest.keep_above(bit);
        rest.lowest_set()
    }

    /// Set positions in ascending order.
    pub fn iter(&self) -> Iter<WORDS> {
        Iter { rest: *self }
    }
}

impl<const WORDS: usize> Default for FastBitset<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> fmt::Debug for FastBitset<WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<const WORDS: usize> FromIterator<usize> for FastBitset<WORDS> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut s = Self::new();
        for bit in iter {
            s.set_bit(bit);
        }
        s
    }
}

/// Ascending iterator over the set positions of a `FastBitset`.
pub struct Iter<const WORDS: usize> {
    rest: FastBitset<WORDS>,
}

impl<const WORDS: usize> Iterator for Iter<WORDS> {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<usize> {
        let bit = self.rest.lowest_set()?;
        self.rest.clear_bit(bit);
        Some(bit)
    }
}

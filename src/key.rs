//! Fixed-width integer keys viewed as most-significant-first byte strings.

use core::fmt::Debug;
use core::hash::Hash;

/// An unsigned integer key of `WIDTH` bytes. Byte 0 is the most significant,
/// so byte-wise order equals numeric order.
///
/// Byte access is plain shift-and-mask arithmetic on the value; nothing
/// depends on the in-memory layout of the integer.
pub trait FixedKey: Copy + Ord + Hash + Debug {
    /// Number of bytes in the key, which is also the depth of the trie.
    const WIDTH: usize;
    const ZERO: Self;

    /// Byte `i`, counting from the most significant end.
    fn byte_at(self, i: usize) -> u8;

    /// This key with byte `i` replaced by `b`.
    fn with_byte(self, i: usize, b: u8) -> Self;

    /// Keeps the first `depth` bytes and zeroes the rest.
    fn prefix(self, depth: usize) -> Self;

    /// True iff `self` and `other` agree on their first `depth` bytes.
    fn shares_prefix(self, other: Self, depth: usize) -> bool;
}

macro_rules! impl_fixed_key {
    ($($t:ty),*) => {$(
        impl FixedKey for $t {
            const WIDTH: usize = core::mem::size_of::<$t>();
            const ZERO: Self = 0;

            #[inline]
            fn byte_at(self, i: usize) -> u8 {
                debug_assert!(i < Self::WIDTH);
                (self >> (8 * (Self::WIDTH - 1 - i))) as u8
            }

            #[inline]
            fn with_byte(self, i: usize, b: u8) -> Self {
                debug_assert!(i < Self::WIDTH);
                let shift = 8 * (Self::WIDTH - 1 - i);
                (self & !((0xff as $t) << shift)) | ((b as $t) << shift)
            }

            #[inline]
            fn prefix(self, depth: usize) -> Self {
                if depth == 0 {
                    return 0;
                }
                if depth >= Self::WIDTH {
                    return self;
                }
                let shift = 8 * (Self::WIDTH - depth);
                (self >> shift) << shift
            }

            #[inline]
            fn shares_prefix(self, other: Self, depth: usize) -> bool {
                if depth == 0 {
                    return true;
                }
                if depth >= Self::WIDTH {
                    return self == other;
                }
                (self ^ other) >> (8 * (Self::WIDTH - depth)) == 0
            }
        }
    )*};
}

impl_fixed_key!(u8, u16, u32, u64, u128);

#[cfg(test)]
mod tests {
    use super::FixedKey;

    /// Invariant: byte 0 is the most significant byte.
    #[test]
    fn bytes_are_big_endian() {
        let k: u64 = 0x0102_0304_0506_0708;
        let bytes: Vec<u8> = (0..u64::WIDTH).map(|i| k.byte_at(i)).collect();
        assert_eq!(bytes, k.to_be_bytes());
        assert_eq!(0xabcdu16.byte_at(0), 0xab);
        assert_eq!(0xabcdu16.byte_at(1), 0xcd);
    }

    /// Invariant: `with_byte` replaces exactly one byte.
    #[test]
    fn with_byte_replaces_one_byte() {
        let k: u32 = 0x1122_3344;
        assert_eq!(k.with_byte(0, 0xff), 0xff22_3344);
        assert_eq!(k.with_byte(2, 0x00), 0x1122_0044);
        assert_eq!(k.with_byte(3, 0x99), 0x1122_3399);
        assert_eq!(k.with_byte(1, k.byte_at(1)), k);
    }

    /// Invariant: `prefix(d)` zeroes every byte past `d` and agrees with
    /// `shares_prefix`.
    #[test]
    fn prefix_and_shares_prefix_agree() {
        let a: u64 = 0x1122_3344_5566_7788;
        let b: u64 = 0x1122_33ff_0000_0000;
        assert_eq!(a.prefix(0), 0);
        assert_eq!(a.prefix(3), 0x1122_3300_0000_0000);
        assert_eq!(a.prefix(8), a);
        for d in 0..=u64::WIDTH {
            assert_eq!(a.shares_prefix(b, d), a.prefix(d) == b.prefix(d), "depth {d}");
        }
        assert!(a.shares_prefix(b, 3));
        assert!(!a.shares_prefix(b, 4));
    }

    /// Invariant: widths follow the integer size.
    #[test]
    fn widths() {
        assert_eq!(u8::WIDTH, 1);
        assert_eq!(u16::WIDTH, 2);
        assert_eq!(u32::WIDTH, 4);
        assert_eq!(u64::WIDTH, 8);
        assert_eq!(u128::WIDTH, 16);
    }
}

//! The 1 KiB Argon2 memory block and the BlaMka compression function `G`.

use std::ops::{BitXor, BitXorAssign};
use zeroize::Zeroize;

pub const BLOCK_BYTES: usize = 1024;
pub const QWORDS_IN_BLOCK: usize = BLOCK_BYTES / 8;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Block([u64; QWORDS_IN_BLOCK]);

impl Block {
    pub const ZERO: Self = Self([0; QWORDS_IN_BLOCK]);

    /// # Panics
    ///
    /// If `bytes` is not exactly [`BLOCK_BYTES`] long.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(BLOCK_BYTES, bytes.len(), "Argon2 block must be 1024 bytes");
        let mut block = Self::ZERO;
        for (word, chunk) in block.0.iter_mut().zip(bytes.chunks_exact(8)) {
            *word = u64::from_le_bytes(chunk.try_into().expect("chunk has 8 bytes"));
        }
        block
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_BYTES] {
        let mut bytes = [0; BLOCK_BYTES];
        for (word, chunk) in self.0.iter().zip(bytes.chunks_exact_mut(8)) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    #[inline]
    pub fn word(&self, index: usize) -> u64 {
        self.0[index]
    }

    #[inline]
    pub fn set_word(&mut self, index: usize, value: u64) {
        self.0[index] = value;
    }

    /// Overwrites `self` with `G(prev, reference)`, or XORs that into `self` when `with_xor` is set.
    pub fn fill(&mut self, prev: &Block, reference: &Block, with_xor: bool) {
        let mut r = *prev;
        r ^= reference;

        let mut q = r;
        for row in 0..8 {
            let base = 16 * row;
            q.permute(std::array::from_fn(|i| base + i));
        }
        for column in 0..8 {
            let base = 2 * column;
            q.permute(std::array::from_fn(|i| base + 16 * (i / 2) + i % 2));
        }

        if with_xor {
            *self ^= &r;
        } else {
            *self = r;
        }
        *self ^= &q;
        q.zeroize();
        r.zeroize();
    }

    /// The BLAKE2b round function with multiplications, on the 16 words at `v`.
    fn permute(&mut self, v: [usize; 16]) {
        self.gb(v[0], v[4], v[8], v[12]);
        self.gb(v[1], v[5], v[9], v[13]);
        self.gb(v[2], v[6], v[10], v[14]);
        self.gb(v[3], v[7], v[11], v[15]);

        self.gb(v[0], v[5], v[10], v[15]);
        self.gb(v[1], v[6], v[11], v[12]);
        self.gb(v[2], v[7], v[8], v[13]);
        self.gb(v[3], v[4], v[9], v[14]);
    }

    #[inline(always)]
    fn gb(&mut self, a: usize, b: usize, c: usize, d: usize) {
        let w = &mut self.0;
        w[a] = blamka(w[a], w[b]);
        w[d] = (w[d] ^ w[a]).rotate_right(32);
        w[c] = blamka(w[c], w[d]);
        w[b] = (w[b] ^ w[c]).rotate_right(24);
        w[a] = blamka(w[a], w[b]);
        w[d] = (w[d] ^ w[a]).rotate_right(16);
        w[c] = blamka(w[c], w[d]);
        w[b] = (w[b] ^ w[c]).rotate_right(63);
    }
}

/// `x + y + 2 * lo32(x) * lo32(y)`
#[inline(always)]
fn blamka(x: u64, y: u64) -> u64 {
    let product = (x & 0xffff_ffff).wrapping_mul(y & 0xffff_ffff);
    x.wrapping_add(y).wrapping_add(product.wrapping_mul(2))
}

impl BitXorAssign for Block {
    fn bitxor_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0.iter()) {
            *lhs ^= rhs;
        }
    }
}

impl BitXorAssign<&Block> for Block {
    fn bitxor_assign(&mut self, rhs: &Block) {
        for (lhs, rhs) in self.0.iter_mut().zip(rhs.0.iter()) {
            *lhs ^= rhs;
        }
    }
}

impl BitXor for Block {
    type Output = Self;

    fn bitxor(mut self, rhs: Self) -> Self {
        self ^= rhs;
        self
    }
}

impl Zeroize for Block {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_round_trip() {
        let bytes: Vec<u8> = (0..BLOCK_BYTES).map(|i| (i * 7) as u8).collect();
        let block = Block::from_bytes(&bytes);
        assert_eq!(0x6962_5b54_4d46_3f38, block.word(1));
        assert_eq!(bytes.as_slice(), block.to_bytes().as_slice());
    }

    #[test]
    fn compression_of_zero_is_zero() {
        let mut block = Block::ZERO;
        block.fill(&Block::ZERO, &Block::ZERO, false);
        assert_eq!(Block::ZERO, block);
    }

    #[test]
    fn with_xor_keeps_previous_content() {
        let mut prev = Block::ZERO;
        prev.set_word(0, 1);
        let mut reference = Block::ZERO;
        reference.set_word(5, 0xdead_beef);

        let mut overwritten = Block::ZERO;
        overwritten.fill(&prev, &reference, false);

        let mut existing = Block::ZERO;
        existing.set_word(17, 42);
        let mut xored = existing;
        xored.fill(&prev, &reference, true);

        assert_eq!(overwritten ^ existing, xored);
    }

    #[test]
    fn blamka_uses_low_halves() {
        assert_eq!(2 + 3 + 2 * 6, blamka(2, 3));
        assert_eq!(1 << 33, blamka(1 << 32, 1 << 32));
    }
}

//! BLAKE2b (RFC 7693) without key or salt, with a digest length of 1 to 64 bytes.
//!
//! Besides [`Blake2bFunction`], the primitive is used by Argon2 for its pre-hash and,
//! through [`blake2b_long`], to expand seed material into 1 KiB blocks.

mod function;
pub use function::{Blake2bConfig, Blake2bFunction};

use zeroize::Zeroize;

use crate::codec;
use crate::error::{ChfError, Result};

pub const BLOCK_LEN: usize = 128;
pub const MAX_DIGEST_LEN: usize = 64;

const IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

// Rows 10 and 11 repeat rows 0 and 1 so the table can be indexed by round directly.
const SIGMA: [[usize; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

// Column step, then diagonal step.
const G_ORDER: [[usize; 4]; 8] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
    [0, 5, 10, 15],
    [1, 6, 11, 12],
    [2, 7, 8, 13],
    [3, 4, 9, 14],
];

/// Incremental BLAKE2b state.
///
/// # Example
///
/// ```
/// use passhash::hash::blake2b::Blake2b;
///
/// let mut hasher = Blake2b::new(32).unwrap();
/// hasher.update(b"Iam");
/// hasher.update(b"UsingBlake2b");
/// let digest = hasher.finalize_reset();
/// assert_eq!(32, digest.len());
///
/// hasher.update(b"IamUsingBlake2b");
/// assert_eq!(digest, hasher.finalize());
/// ```
#[derive(Clone)]
pub struct Blake2b {
    chain: [u64; 8],
    counter: [u64; 2],
    buffer: [u8; BLOCK_LEN],
    buffer_len: usize,
    digest_len: usize,
}

impl Blake2b {
    /// Creates a state producing `digest_len` bytes.
    ///
    /// # Errors
    ///
    /// [`ChfError::BadParameters`] unless `1 <= digest_len <= 64`.
    pub fn new(digest_len: usize) -> Result<Self> {
        if !(1..=MAX_DIGEST_LEN).contains(&digest_len) {
            return Err(ChfError::bad_parameters(format!(
                "BLAKE2b digest length must be between 1 and {MAX_DIGEST_LEN} but is {digest_len}"
            )));
        }
        let mut state = Self {
            chain: [0; 8],
            counter: [0; 2],
            buffer: [0; BLOCK_LEN],
            buffer_len: 0,
            digest_len,
        };
        state.reset();
        Ok(state)
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    /// Restores the initial state, keeping the digest length.
    pub fn reset(&mut self) {
        self.chain = IV;
        // Parameter block: digest length, key length 0, fanout 1, depth 1.
        self.chain[0] ^= 0x0101_0000 ^ self.digest_len as u64;
        self.counter = [0; 2];
        self.buffer.zeroize();
        self.buffer_len = 0;
    }

    pub fn update(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            // The last block has to be compressed with the finalization flag,
            // so a full buffer is only compressed once more input arrives.
            if self.buffer_len == BLOCK_LEN {
                self.increment_counter(BLOCK_LEN as u64);
                let block = self.buffer;
                self.compress(&block, false);
                self.buffer_len = 0;
            }
            let take = (BLOCK_LEN - self.buffer_len).min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];
        }
    }

    /// Writes the digest into `out`, which must be exactly [`digest_len`](Self::digest_len) bytes,
    /// and resets the state.
    ///
    /// # Panics
    ///
    /// If `out` has a different length than the configured digest.
    pub fn finalize_into_reset(&mut self, out: &mut [u8]) {
        assert_eq!(self.digest_len, out.len(), "Output buffer has wrong length");
        self.increment_counter(self.buffer_len as u64);
        self.buffer[self.buffer_len..].fill(0);
        let block = self.buffer;
        self.compress(&block, true);

        let mut full = [0u8; MAX_DIGEST_LEN];
        for (chunk, word) in full.chunks_exact_mut(8).zip(self.chain.iter()) {
            chunk.copy_from_slice(&codec::le64(*word));
        }
        out.copy_from_slice(&full[..self.digest_len]);
        full.zeroize();
        self.reset();
    }

    pub fn finalize_reset(&mut self) -> Vec<u8> {
        let mut out = vec![0; self.digest_len];
        self.finalize_into_reset(&mut out);
        out
    }

    pub fn finalize(mut self) -> Vec<u8> {
        self.finalize_reset()
    }

    fn increment_counter(&mut self, by: u64) {
        let (low, overflow) = self.counter[0].overflowing_add(by);
        self.counter[0] = low;
        if overflow {
            self.counter[1] = self.counter[1].wrapping_add(1);
        }
    }

    fn compress(&mut self, block: &[u8; BLOCK_LEN], last: bool) {
        let mut m = [0u64; 16];
        for (word, chunk) in m.iter_mut().zip(block.chunks_exact(8)) {
            *word = u64::from_le_bytes(chunk.try_into().expect("chunk has 8 bytes"));
        }

        let mut v = [0u64; 16];
        v[..8].copy_from_slice(&self.chain);
        v[8..].copy_from_slice(&IV);
        v[12] ^= self.counter[0];
        v[13] ^= self.counter[1];
        if last {
            v[14] = !v[14];
        }

        for sigma in &SIGMA {
            for (step, [a, b, c, d]) in G_ORDER.iter().enumerate() {
                g(
                    &mut v,
                    [*a, *b, *c, *d],
                    m[sigma[2 * step]],
                    m[sigma[2 * step + 1]],
                );
            }
        }

        for i in 0..8 {
            self.chain[i] ^= v[i] ^ v[i + 8];
        }
        m.zeroize();
        v.zeroize();
    }
}

#[inline(always)]
fn g(v: &mut [u64; 16], [a, b, c, d]: [usize; 4], x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

impl Drop for Blake2b {
    fn drop(&mut self) {
        self.chain.zeroize();
        self.buffer.zeroize();
    }
}

impl std::fmt::Debug for Blake2b {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Blake2b(digest_len={})", self.digest_len)
    }
}

/// One-shot BLAKE2b over the concatenation of `inputs`.
pub fn blake2b(digest_len: usize, inputs: &[&[u8]]) -> Result<Vec<u8>> {
    let mut hasher = Blake2b::new(digest_len)?;
    for input in inputs {
        hasher.update(input);
    }
    Ok(hasher.finalize())
}

/// Variable-length BLAKE2b as used by Argon2 (`H'` in RFC 9106).
///
/// Fills `out` with `H'^len(out)(inputs)`. Outputs up to 64 bytes are a single BLAKE2b
/// over `LE32(len) ‖ inputs`. Longer outputs chain 64-byte digests and keep the first
/// 32 bytes of each, finishing with one digest of the remaining length.
pub fn blake2b_long(out: &mut [u8], inputs: &[&[u8]]) -> Result<()> {
    let out_len = u32::try_from(out.len())
        .map_err(|_| ChfError::bad_parameters("blake2b_long output is too long"))?;
    if out.is_empty() {
        return Err(ChfError::bad_parameters("blake2b_long output must not be empty"));
    }

    let mut hasher = Blake2b::new(out.len().min(MAX_DIGEST_LEN))?;
    hasher.update(&codec::le32(out_len));
    for input in inputs {
        hasher.update(input);
    }

    if out.len() <= MAX_DIGEST_LEN {
        hasher.finalize_into_reset(out);
        return Ok(());
    }

    const HALF: usize = MAX_DIGEST_LEN / 2;
    let mut v = [0u8; MAX_DIGEST_LEN];
    hasher.finalize_into_reset(&mut v);
    out[..HALF].copy_from_slice(&v[..HALF]);
    let mut written = HALF;
    while out.len() - written > MAX_DIGEST_LEN {
        hasher.update(&v);
        hasher.finalize_into_reset(&mut v);
        out[written..written + HALF].copy_from_slice(&v[..HALF]);
        written += HALF;
    }
    let mut last = Blake2b::new(out.len() - written)?;
    last.update(&v);
    last.finalize_into_reset(&mut out[written..]);
    v.zeroize();
    Ok(())
}

#[cfg(test)]
mod tests {
    use blake2::digest::{Update, VariableOutput};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn reference(digest_len: usize, data: &[u8]) -> Vec<u8> {
        let mut hasher = blake2::Blake2bVar::new(digest_len).unwrap();
        hasher.update(data);
        let mut out = vec![0; digest_len];
        hasher.finalize_variable(&mut out).unwrap();
        out
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn known_vector() {
        let mut hasher = Blake2b::new(64).unwrap();
        hasher.update(b"IamUsingBlake2b###");
        assert_eq!(
            "5fc5a199294099e98280dac6047523aa123ba29e6995618339c9590e4dca983dea2529ad85afbac5613c495b3fb50bf2d5919cb3f51f6a9dba78a33f9d278f6f",
            hex::encode(hasher.finalize()),
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce",
            hex::encode(Blake2b::new(64).unwrap().finalize()),
        );
    }

    #[rstest]
    fn rejects_invalid_digest_length(#[values(0, 65, 128)] digest_len: usize) {
        assert!(matches!(
            Blake2b::new(digest_len),
            Err(ChfError::BadParameters(_))
        ));
    }

    #[rstest]
    fn matches_reference_implementation(
        #[values(1, 20, 32, 48, 64)] digest_len: usize,
        #[values(0, 1, 127, 128, 129, 255, 256, 257, 1000)] data_len: usize,
    ) {
        let data = pattern(data_len);
        assert_eq!(
            reference(digest_len, &data),
            blake2b(digest_len, &[&data]).unwrap()
        );
    }

    #[rstest]
    fn chunked_updates_match_one_shot(#[values(1, 3, 64, 127, 128, 129)] chunk_size: usize) {
        // [3, 1, 2, 4] followed by 250+ bytes crosses block boundaries at odd offsets.
        let mut data = vec![3, 1, 2, 4];
        data.extend(0..=252u8);

        let mut hasher = Blake2b::new(64).unwrap();
        for chunk in data.chunks(chunk_size) {
            hasher.update(chunk);
        }
        assert_eq!(reference(64, &data), hasher.finalize());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut hasher = Blake2b::new(32).unwrap();
        hasher.update(b"some data that will be thrown away");
        hasher.reset();
        hasher.update(b"abc");
        assert_eq!(reference(32, b"abc"), hasher.finalize());
    }

    #[test]
    fn finalize_reset_allows_reuse() {
        let mut hasher = Blake2b::new(64).unwrap();
        hasher.update(b"first");
        assert_eq!(reference(64, b"first"), hasher.finalize_reset());
        hasher.update(b"second");
        assert_eq!(reference(64, b"second"), hasher.finalize_reset());
    }

    #[rstest]
    fn blake2b_long_short_outputs_are_prefixed_blake2b(#[values(4, 32, 64)] out_len: usize) {
        let mut out = vec![0; out_len];
        blake2b_long(&mut out, &[b"seed", b"material"]).unwrap();

        let mut prefixed = (out_len as u32).to_le_bytes().to_vec();
        prefixed.extend_from_slice(b"seedmaterial");
        assert_eq!(reference(out_len, &prefixed), out);
    }

    #[rstest]
    fn blake2b_long_long_outputs(#[values(65, 96, 97, 128, 1024)] out_len: usize) {
        let mut out = vec![0; out_len];
        blake2b_long(&mut out, &[b"seed"]).unwrap();

        let mut input = (out_len as u32).to_le_bytes().to_vec();
        input.extend_from_slice(b"seed");
        let mut v = reference(64, &input);
        let mut expected = v[..32].to_vec();
        while out_len - expected.len() > 64 {
            v = reference(64, &v);
            expected.extend_from_slice(&v[..32]);
        }
        expected.extend(reference(out_len - expected.len(), &v));

        assert_eq!(expected, out);
    }
}

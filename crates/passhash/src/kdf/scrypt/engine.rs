//! scrypt (RFC 7914): PBKDF2-HMAC-SHA256 stretching around the sequential memory-hard `smix`.

use hmac::Hmac;
use rayon::prelude::*;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::codec::{read_le32_words, write_le32_words};
use crate::error::{ChfError, Result};
use crate::kdf::pbkdf2;

/// Upper bound for `N·r` and `r·p`, so that `128·N·r` and `128·r·p` fit into a signed 32 bit integer.
pub const MAX_COST: u64 = (1 << 24) - 1;

const SALSA_WORDS: usize = 16;

/// Bytes of memory a derivation with these parameters allocates, not counting the
/// fixed-size buffers. Informational only.
pub fn required_memory(n: u64, r: u32, p: u32) -> u64 {
    128u64
        .saturating_mul(n)
        .saturating_mul(u64::from(r))
        .saturating_mul(u64::from(p))
}

pub fn validate_parameters(n: u64, r: u32, p: u32) -> Result<()> {
    if n < 2 || !n.is_power_of_two() {
        return Err(ChfError::bad_parameters(format!(
            "scrypt work factor N must be a power of 2 greater than 1 but is {n}"
        )));
    }
    if r == 0 {
        return Err(ChfError::bad_parameters("scrypt block size r must be positive"));
    }
    if p == 0 {
        return Err(ChfError::bad_parameters("scrypt parallelism p must be positive"));
    }
    if n > MAX_COST / u64::from(r) {
        return Err(ChfError::bad_parameters(format!(
            "scrypt parameter N={n} is too large for r={r}"
        )));
    }
    if u64::from(r) > MAX_COST / u64::from(p) {
        return Err(ChfError::bad_parameters(format!(
            "scrypt parameter r={r} is too large for p={p}"
        )));
    }
    Ok(())
}

/// Derives `dk_len` bytes from `password` and `salt`.
///
/// The `p` calls to [`smix`] run in parallel, each on its own `128·r` byte slice of the
/// stretched buffer, and are joined before the final PBKDF2 pass.
///
/// # Errors
///
/// [`ChfError::BadParameters`] if `N`, `r`, `p` are out of bounds or `dk_len` is zero.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    n: u64,
    r: u32,
    p: u32,
    dk_len: usize,
) -> Result<Vec<u8>> {
    validate_parameters(n, r, p)?;
    if dk_len == 0 {
        return Err(ChfError::bad_parameters(
            "scrypt derived key length must be positive",
        ));
    }
    log::debug!(
        "Running scrypt with N={n}, r={r}, p={p}, requiring {} bytes",
        required_memory(n, r, p)
    );

    let block_len = 128 * r as usize;
    let mut b = Zeroizing::new(vec![0u8; block_len * p as usize]);
    pbkdf2::derive_into::<Hmac<Sha256>>(password, salt, 1, &mut b)?;

    b.par_chunks_mut(block_len).for_each(|block| {
        let mut scratch = Scratch::new(n as usize, r as usize);
        smix(block, &mut scratch);
    });

    let mut derived = vec![0u8; dk_len];
    pbkdf2::derive_into::<Hmac<Sha256>>(password, &b, 1, &mut derived)?;
    Ok(derived)
}

/// Scratch memory of one [`smix`] call: the lookup table `V` with `N` entries and the two
/// working blocks `X` and `Y`. Zeroed when dropped.
pub struct Scratch {
    n: usize,
    r: usize,
    x: Vec<u32>,
    y: Vec<u32>,
    v: Vec<u32>,
}

impl Scratch {
    pub fn new(n: usize, r: usize) -> Self {
        let words = 32 * r;
        Self {
            n,
            r,
            x: vec![0; words],
            y: vec![0; words],
            v: vec![0; words * n],
        }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        self.x.zeroize();
        self.y.zeroize();
        self.v.zeroize();
    }
}

/// Mixes one `128·r` byte block in place.
///
/// # Panics
///
/// If `block` isn't `128·r` bytes for the `r` the scratch was allocated with.
pub fn smix(block: &mut [u8], scratch: &mut Scratch) {
    let Scratch { n, r, x, y, v } = scratch;
    let (n, r) = (*n, *r);
    let words = 32 * r;
    assert_eq!(4 * words, block.len(), "smix block has the wrong length");

    read_le32_words(block, x);
    for entry in v.chunks_exact_mut(words) {
        entry.copy_from_slice(x);
        blockmix_salsa8(x, y, r);
        std::mem::swap(x, y);
    }
    for _ in 0..n {
        let j = (integerify(x, r) & (n as u64 - 1)) as usize;
        for (x, v) in x.iter_mut().zip(&v[j * words..(j + 1) * words]) {
            *x ^= v;
        }
        blockmix_salsa8(x, y, r);
        std::mem::swap(x, y);
    }
    write_le32_words(x, block);
}

/// Interprets the first 8 bytes of the last 64 byte sub-block of `x` as a little endian integer.
#[inline]
pub fn integerify(x: &[u32], r: usize) -> u64 {
    let last = (2 * r - 1) * SALSA_WORDS;
    u64::from(x[last]) | (u64::from(x[last + 1]) << 32)
}

/// BlockMix with salsa20/8 on `2r` 64 byte sub-blocks.
///
/// Sub-block `i` of the output is `salsa20/8(previous ^ input[i])`. Results for even `i`
/// go to the first half of `output`, results for odd `i` to the second half.
/// Both slices must hold `32·r` words.
pub fn blockmix_salsa8(input: &[u32], output: &mut [u32], r: usize) {
    debug_assert_eq!(32 * r, input.len());
    debug_assert_eq!(32 * r, output.len());

    let mut x = [0u32; SALSA_WORDS];
    x.copy_from_slice(&input[(2 * r - 1) * SALSA_WORDS..]);
    for (i, sub_block) in input.chunks_exact(SALSA_WORDS).enumerate() {
        for (x, b) in x.iter_mut().zip(sub_block) {
            *x ^= b;
        }
        salsa20_8(&mut x);
        let dest = if i % 2 == 0 { i / 2 } else { r + i / 2 } * SALSA_WORDS;
        output[dest..dest + SALSA_WORDS].copy_from_slice(&x);
    }
    x.zeroize();
}

/// The salsa20/8 core: 4 double rounds, then adds the input to the output.
pub fn salsa20_8(b: &mut [u32; SALSA_WORDS]) {
    let mut x = *b;

    macro_rules! quarter {
        ($a:expr, $b:expr, $c:expr, $d:expr) => {
            x[$b] ^= x[$a].wrapping_add(x[$d]).rotate_left(7);
            x[$c] ^= x[$b].wrapping_add(x[$a]).rotate_left(9);
            x[$d] ^= x[$c].wrapping_add(x[$b]).rotate_left(13);
            x[$a] ^= x[$d].wrapping_add(x[$c]).rotate_left(18);
        };
    }

    for _ in 0..4 {
        // columns
        quarter!(0, 4, 8, 12);
        quarter!(5, 9, 13, 1);
        quarter!(10, 14, 2, 6);
        quarter!(15, 3, 7, 11);
        // rows
        quarter!(0, 1, 2, 3);
        quarter!(5, 6, 7, 4);
        quarter!(10, 11, 8, 9);
        quarter!(15, 12, 13, 14);
    }

    for (b, x) in b.iter_mut().zip(x.iter()) {
        *b = b.wrapping_add(*x);
    }
    x.zeroize();
}

use hmac::digest::{KeyInit, OutputSizeUser};
use hmac::{Hmac, Mac};
use zeroize::Zeroize;

use super::HmacAlgorithm;
use crate::error::{ChfError, Result};

/// PBKDF2 (RFC 8018) with the given HMAC, filling all of `out`.
pub fn derive_into<M>(password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) -> Result<()>
where
    M: Mac + KeyInit + Clone,
{
    if iterations == 0 {
        return Err(ChfError::bad_parameters("PBKDF2 iterations must be positive"));
    }
    let prf = <M as KeyInit>::new_from_slice(password)
        .map_err(|err| ChfError::illegal_state(format!("HMAC rejected the password: {err}")))?;

    for (index, chunk) in out.chunks_mut(M::output_size()).enumerate() {
        let block_index = u32::try_from(index + 1)
            .map_err(|_| ChfError::bad_parameters("PBKDF2 output is too long"))?;

        let mut mac = prf.clone();
        Mac::update(&mut mac, salt);
        Mac::update(&mut mac, &block_index.to_be_bytes());
        let mut u = mac.finalize().into_bytes();
        let mut t = u.clone();
        for _ in 1..iterations {
            let mut mac = prf.clone();
            Mac::update(&mut mac, &u);
            u = mac.finalize().into_bytes();
            for (t, u) in t.iter_mut().zip(u.iter()) {
                *t ^= u;
            }
        }
        chunk.copy_from_slice(&t[..chunk.len()]);
        u.as_mut_slice().zeroize();
        t.as_mut_slice().zeroize();
    }
    Ok(())
}

/// Derives `bits / 8` bytes with PBKDF2 over `algorithm`.
///
/// # Errors
///
/// [`ChfError::BadParameters`] for an empty salt, zero iterations or fewer than 8 bits.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    algorithm: HmacAlgorithm,
    iterations: u32,
    bits: u32,
) -> Result<Vec<u8>> {
    if salt.is_empty() {
        return Err(ChfError::bad_parameters("PBKDF2 salt must not be empty"));
    }
    if bits < 8 {
        return Err(ChfError::bad_parameters(format!(
            "PBKDF2 key length must be at least 8 bits but is {bits}"
        )));
    }
    let mut out = vec![0; bits as usize / 8];
    match algorithm {
        HmacAlgorithm::Sha1 => derive_into::<Hmac<sha1::Sha1>>(password, salt, iterations, &mut out)?,
        HmacAlgorithm::Sha224 => {
            derive_into::<Hmac<sha2::Sha224>>(password, salt, iterations, &mut out)?
        }
        HmacAlgorithm::Sha256 => {
            derive_into::<Hmac<sha2::Sha256>>(password, salt, iterations, &mut out)?
        }
        HmacAlgorithm::Sha384 => {
            derive_into::<Hmac<sha2::Sha384>>(password, salt, iterations, &mut out)?
        }
        HmacAlgorithm::Sha512 => {
            derive_into::<Hmac<sha2::Sha512>>(password, salt, iterations, &mut out)?
        }
    }
    Ok(out)
}

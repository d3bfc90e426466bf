//! Byte and character codecs shared by the hash string formats.
//!
//! All functions are pure. Decoding failures are reported as [`ChfError::BadParameters`]
//! because decoding only ever happens on caller-supplied hash strings.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::error::{ChfError, Result};

/// Standard alphabet, padded on encode, accepts both padded and unpadded input.
const BASE64_PADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Standard alphabet without padding, as used by the PHC string format.
const BASE64_UNPADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn utf8_encode(text: &str) -> &[u8] {
    text.as_bytes()
}

pub fn utf8_decode(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|err| ChfError::bad_parameters(format!("Input is not valid UTF-8: {err}")))
}

pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn hex_decode(text: &str) -> Result<Vec<u8>> {
    hex::decode(text)
        .map_err(|err| ChfError::bad_parameters(format!("Input is not valid hex: {err}")))
}

pub fn base64_encode(bytes: &[u8]) -> String {
    BASE64_PADDED.encode(bytes)
}

pub fn base64_encode_unpadded(bytes: &[u8]) -> String {
    BASE64_UNPADDED.encode(bytes)
}

/// Decodes standard base64, with or without trailing padding.
pub fn base64_decode(text: &str) -> Result<Vec<u8>> {
    BASE64_PADDED
        .decode(text)
        .map_err(|err| ChfError::bad_parameters(format!("Input is not valid base64: {err}")))
}

#[inline]
pub fn le32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

#[inline]
pub fn le64(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Length prefix used by BLAKE2b-based constructions. Inputs longer than `u32::MAX` bytes are rejected.
pub fn le32_len(bytes: &[u8]) -> Result<[u8; 4]> {
    let len = u32::try_from(bytes.len()).map_err(|_| {
        ChfError::bad_parameters(format!(
            "Input of {} bytes is longer than u32::MAX",
            bytes.len()
        ))
    })?;
    Ok(le32(len))
}

/// Reads little endian u32 words from `bytes` into `words`.
///
/// # Panics
///
/// If `bytes` doesn't hold exactly `4 * words.len()` bytes.
pub fn read_le32_words(bytes: &[u8], words: &mut [u32]) {
    assert_eq!(bytes.len(), 4 * words.len());
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

/// Writes `words` as little endian bytes into `bytes`.
///
/// # Panics
///
/// If `bytes` doesn't hold exactly `4 * words.len()` bytes.
pub fn write_le32_words(words: &[u32], bytes: &mut [u8]) {
    assert_eq!(bytes.len(), 4 * words.len());
    for (word, chunk) in words.iter().zip(bytes.chunks_exact_mut(4)) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_padded_round_trip() {
        assert_eq!("YWJj", base64_encode(b"abc"));
        assert_eq!("YWI=", base64_encode(b"ab"));
        assert_eq!(b"ab".to_vec(), base64_decode("YWI=").unwrap());
    }

    #[test]
    fn base64_decode_accepts_missing_padding() {
        assert_eq!(b"ab".to_vec(), base64_decode("YWI").unwrap());
    }

    #[test]
    fn base64_unpadded() {
        assert_eq!("a1hYRFVFUUhMdzF5dk43", base64_encode_unpadded(b"kXXDUEQHLw1yvN7"));
        assert_eq!("YWI", base64_encode_unpadded(b"ab"));
    }

    #[test]
    fn base64_decode_rejects_garbage() {
        assert!(matches!(
            base64_decode("not base64!"),
            Err(ChfError::BadParameters(_))
        ));
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!("00ff10", hex_encode(&[0x00, 0xff, 0x10]));
        assert_eq!(vec![0x00, 0xff, 0x10], hex_decode("00FF10").unwrap());
        assert!(hex_decode("0g").is_err());
    }

    #[test]
    fn utf8() {
        assert_eq!("päss".as_bytes(), utf8_encode("päss"));
        assert_eq!("päss", utf8_decode("päss".as_bytes()).unwrap());
        assert!(utf8_decode(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn little_endian_words() {
        assert_eq!([1, 0, 0, 0], le32(1));
        assert_eq!([0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01], le64(0x0102030405060708));

        let mut words = [0u32; 2];
        read_le32_words(&[1, 0, 0, 0, 0x78, 0x56, 0x34, 0x12], &mut words);
        assert_eq!([1, 0x12345678], words);

        let mut bytes = [0u8; 8];
        write_le32_words(&words, &mut bytes);
        assert_eq!([1, 0, 0, 0, 0x78, 0x56, 0x34, 0x12], bytes);
    }
}

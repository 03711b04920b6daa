//! AES-CBC token encoding.
//!
//! The IV is derived from the label alone, so a given (key, label, secret)
//! triple always produces the same token. Tokens compare equal across
//! processes without shared nonce state, and also leak equality of the
//! underlying secrets. Do not use them where that matters.

use crate::error::TokenError;
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::NoPadding, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

/// AES block width. Secrets are padded or truncated to exactly one block.
pub const BLOCK_SIZE: usize = 16;

const PAD: u8 = b' ';

/// Centers `text` in a field of `width` bytes, padding with spaces.
///
/// Longer input is cut at the last character boundary that fits in `width`
/// bytes. When the padding is odd, the extra space goes on the right.
///
/// ```
/// use edge_token::center_pad;
///
/// assert_eq!(center_pad("ab", 5), " ab  ".as_bytes());
/// assert_eq!(center_pad("abcdefgh", 4), b"abcd");
/// ```
#[must_use]
pub fn center_pad(text: &str, width: usize) -> Vec<u8> {
    let mut end = text.len().min(width);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let body = &text.as_bytes()[..end];
    let fill = width - body.len();
    let left = fill / 2;

    let mut out = Vec::with_capacity(width);
    out.resize(left, PAD);
    out.extend_from_slice(body);
    out.resize(width, PAD);
    out
}

/// Encoder/decoder bound to one entity key and label.
///
/// # Example
///
/// ```
/// use edge_token::TokenCodec;
///
/// let codec = TokenCodec::new(b"0123456789abcdef", "auction-1").unwrap();
/// let token = codec.encode("s3cret");
/// assert_eq!(token.len(), 32);
/// assert_eq!(codec.try_decode(&token).unwrap(), "s3cret");
/// ```
#[derive(Clone)]
pub struct TokenCodec {
    key: Vec<u8>,
    iv: [u8; BLOCK_SIZE],
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &"<redacted>")
            .field("iv", &String::from_utf8_lossy(&self.iv))
            .finish()
    }
}

macro_rules! with_cipher {
    ($key:expr, $iv:expr, $mode:ident, |$cipher:ident| $body:expr) => {
        match $key.len() {
            16 => {
                let $cipher = cbc::$mode::<Aes128>::new_from_slices($key, $iv)
                    .map_err(|_| TokenError::KeyLength($key.len()))?;
                $body
            }
            24 => {
                let $cipher = cbc::$mode::<Aes192>::new_from_slices($key, $iv)
                    .map_err(|_| TokenError::KeyLength($key.len()))?;
                $body
            }
            32 => {
                let $cipher = cbc::$mode::<Aes256>::new_from_slices($key, $iv)
                    .map_err(|_| TokenError::KeyLength($key.len()))?;
                $body
            }
            len => return Err(TokenError::KeyLength(len)),
        }
    };
}

impl TokenCodec {
    /// Creates a codec for `entity_key`, deriving the IV from `label`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::KeyLength`] unless the key is 16, 24 or 32 bytes.
    pub fn new(entity_key: &[u8], label: &str) -> Result<Self, TokenError> {
        if !matches!(entity_key.len(), 16 | 24 | 32) {
            return Err(TokenError::KeyLength(entity_key.len()));
        }
        let mut iv = [PAD; BLOCK_SIZE];
        iv.copy_from_slice(&center_pad(label, BLOCK_SIZE));
        Ok(Self {
            key: entity_key.to_vec(),
            iv,
        })
    }

    /// Encrypts `secret` into a lower-case hex token of one block.
    ///
    /// Anything beyond one block after centering is dropped.
    pub fn encode(&self, secret: &str) -> String {
        let mut block = [PAD; BLOCK_SIZE];
        block.copy_from_slice(&center_pad(secret, BLOCK_SIZE));
        match self.encrypt(&mut block) {
            Ok(()) => hex::encode(block),
            // Unreachable: the key length was checked in `new`.
            Err(_) => String::new(),
        }
    }

    /// Decrypts a token and trims the padding.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] describing the first check that failed.
    pub fn try_decode(&self, token: &str) -> Result<String, TokenError> {
        let mut buf = hex::decode(token)?;
        if buf.is_empty() || buf.len() % BLOCK_SIZE != 0 {
            return Err(TokenError::BlockLength(buf.len()));
        }
        let plain = self.decrypt(&mut buf)?;
        Ok(std::str::from_utf8(plain)?.trim().to_string())
    }

    /// Decrypts a token, returning `""` for anything that is not a valid
    /// token for this key and label.
    pub fn decode(&self, token: &str) -> String {
        self.try_decode(token).unwrap_or_default()
    }

    fn encrypt(&self, block: &mut [u8; BLOCK_SIZE]) -> Result<(), TokenError> {
        let key = self.key.as_slice();
        let iv = self.iv.as_slice();
        with_cipher!(key, iv, Encryptor, |cipher| {
            cipher
                .encrypt_padded_mut::<NoPadding>(block, BLOCK_SIZE)
                .map_err(|_| TokenError::BlockLength(BLOCK_SIZE))?;
        });
        Ok(())
    }

    fn decrypt<'b>(&self, buf: &'b mut [u8]) -> Result<&'b [u8], TokenError> {
        let key = self.key.as_slice();
        let iv = self.iv.as_slice();
        let len = buf.len();
        with_cipher!(key, iv, Decryptor, |cipher| {
            cipher
                .decrypt_padded_mut::<NoPadding>(buf)
                .map_err(|_| TokenError::BlockLength(len))
        })
    }
}

/// Encodes `secret` with `entity_key` and an IV derived from `label`.
///
/// # Errors
///
/// Returns [`TokenError::KeyLength`] for an unsupported key size.
pub fn encode(entity_key: &[u8], label: &str, secret: &str) -> Result<String, TokenError> {
    Ok(TokenCodec::new(entity_key, label)?.encode(secret))
}

/// Strict decode. See [`TokenCodec::try_decode`].
///
/// # Errors
///
/// Returns a [`TokenError`] for a bad key, malformed hex, a partial block,
/// or a plaintext that is not printable UTF-8.
pub fn try_decode(entity_key: &[u8], label: &str, token: &str) -> Result<String, TokenError> {
    TokenCodec::new(entity_key, label)?.try_decode(token)
}

/// Fail-soft decode: any failure yields `""`.
///
/// Callers treat the empty string as "invalid or foreign token".
///
/// ```
/// use edge_token::{decode, encode};
///
/// let key = b"0123456789abcdef";
/// let token = encode(key, "bidder", "42").unwrap();
/// assert_eq!(decode(key, "bidder", &token), "42");
/// assert_eq!(decode(key, "bidder", "not hex"), "");
/// assert_eq!(decode(b"short", "bidder", &token), "");
/// ```
pub fn decode(entity_key: &[u8], label: &str, token: &str) -> String {
    try_decode(entity_key, label, token).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"0123456789abcdef";

    #[test]
    fn test_center_pad_odd_fill_goes_right() {
        assert_eq!(center_pad("a", 4), b" a  ");
        assert_eq!(center_pad("", 3), b"   ");
        assert_eq!(center_pad("abcd", 4), b"abcd");
    }

    #[test]
    fn test_center_pad_never_splits_a_character() {
        // "é" is two bytes; only one fits after "abc".
        let padded = center_pad("abcé", 4);
        assert_eq!(padded, b"abc ");
        assert!(std::str::from_utf8(&padded).is_ok());
    }

    #[test]
    fn test_round_trip() {
        let token = encode(KEY, "auction-1", "hunter2").unwrap();
        assert_eq!(token.len(), BLOCK_SIZE * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(decode(KEY, "auction-1", &token), "hunter2");
    }

    #[test]
    fn test_control_characters_survive_round_trip() {
        for secret in ["a\tb", "line1\nx", "x\u{7f}y"] {
            let token = encode(KEY, "n", secret).unwrap();
            assert_eq!(try_decode(KEY, "n", &token).unwrap(), secret);
        }
    }

    #[test]
    fn test_deterministic_for_same_inputs() {
        let a = encode(KEY, "label", "secret").unwrap();
        let b = encode(KEY, "label", "secret").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, encode(KEY, "other", "secret").unwrap());
    }

    #[test]
    fn test_long_secret_is_truncated_to_one_block() {
        let token = encode(KEY, "l", "0123456789abcdefXYZ").unwrap();
        assert_eq!(decode(KEY, "l", &token), "0123456789abcdef");
    }

    #[test]
    fn test_all_key_sizes() {
        for key in [&[7u8; 16][..], &[7u8; 24][..], &[7u8; 32][..]] {
            let token = encode(key, "n", "value").unwrap();
            assert_eq!(try_decode(key, "n", &token).unwrap(), "value");
        }
    }

    #[test]
    fn test_bad_key_length() {
        assert_eq!(encode(b"short", "n", "x"), Err(TokenError::KeyLength(5)));
        assert_eq!(decode(b"short", "n", "00"), "");
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(try_decode(KEY, "n", "zz"), Err(TokenError::Hex(_))));
        assert_eq!(try_decode(KEY, "n", ""), Err(TokenError::BlockLength(0)));
        assert_eq!(try_decode(KEY, "n", "abcd"), Err(TokenError::BlockLength(2)));
        assert_eq!(decode(KEY, "n", "abc"), "");
    }

    #[test]
    fn test_wrong_key_yields_empty() {
        let token = encode(KEY, "n", "secret").unwrap();
        assert_eq!(decode(b"fedcba9876543210", "n", &token), "");
    }

    #[test]
    fn test_debug_redacts_key() {
        let codec = TokenCodec::new(KEY, "n").unwrap();
        assert!(!format!("{codec:?}").contains("0123456789abcdef"));
    }
}

//! Token codec errors.

use thiserror::Error;

/// Why a token could not be produced or read back.
///
/// Only [`try_decode`](crate::try_decode) and [`encode`](crate::encode)
/// surface these; [`decode`](crate::decode) turns every one of them into an
/// empty string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    /// The entity key is not a valid AES key size.
    #[error("entity key must be 16, 24 or 32 bytes, got {0}")]
    KeyLength(usize),

    /// The token is not valid hex.
    #[error("token is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The ciphertext is empty or not a whole number of blocks.
    #[error("ciphertext length {0} is not a non-zero multiple of the block size")]
    BlockLength(usize),

    /// The decrypted bytes are not UTF-8.
    #[error("decrypted token is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

//! # Edge Token
//!
//! Encodes a short secret into an opaque hex token and back, keyed by an
//! entity key and a human-readable label.
//!
//! Tokens hold exactly one AES block: secrets longer than 16 bytes are
//! truncated. The IV is derived from the label, so encoding is deterministic.
//!
//! ```
//! let key = b"0123456789abcdef";
//! let token = edge_token::encode(key, "bid-7", "owner-token").unwrap();
//! assert_eq!(edge_token::decode(key, "bid-7", &token), "owner-token");
//! assert_eq!(edge_token::decode(key, "bid-8", "garbage"), "");
//! ```

#![doc(html_root_url = "https://docs.rs/edge-token/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod error;

pub use codec::{center_pad, decode, encode, try_decode, TokenCodec, BLOCK_SIZE};
pub use error::TokenError;

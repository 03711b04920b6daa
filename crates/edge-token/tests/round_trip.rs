//! Property tests for the token codec.

use edge_token::{center_pad, decode, encode, BLOCK_SIZE};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 16),
        proptest::collection::vec(any::<u8>(), 24),
        proptest::collection::vec(any::<u8>(), 32),
    ]
}

proptest! {
    #[test]
    fn prop_short_secrets_round_trip(
        key in key_strategy(),
        label in "[a-z0-9-]{0,24}",
        secret in "[A-Za-z0-9_.]{0,16}",
    ) {
        let token = encode(&key, &label, &secret).unwrap();
        prop_assert_eq!(token.len(), BLOCK_SIZE * 2);
        prop_assert_eq!(decode(&key, &label, &token), secret);
    }

    #[test]
    fn prop_decode_matches_trimmed_padding(
        key in key_strategy(),
        label in "\\PC{0,20}",
        secret in "\\PC{0,24}",
    ) {
        let token = encode(&key, &label, &secret).unwrap();
        let padded = center_pad(&secret, BLOCK_SIZE);
        let expected = std::str::from_utf8(&padded).unwrap().trim().to_string();
        prop_assert_eq!(decode(&key, &label, &token), expected);
    }

    #[test]
    fn prop_control_characters_round_trip(
        key in key_strategy(),
        secret in "[a-z\\t\\n\\r\\x00-\\x1f\\x7f]{0,16}",
    ) {
        let token = encode(&key, "label", &secret).unwrap();
        let padded = center_pad(&secret, BLOCK_SIZE);
        let expected = std::str::from_utf8(&padded).unwrap().trim().to_string();
        prop_assert_eq!(decode(&key, "label", &token), expected);
    }

    #[test]
    fn prop_center_pad_is_one_valid_block(text in "\\PC{0,40}") {
        let padded = center_pad(&text, BLOCK_SIZE);
        prop_assert_eq!(padded.len(), BLOCK_SIZE);
        prop_assert!(std::str::from_utf8(&padded).is_ok());
    }

    #[test]
    fn prop_decode_never_panics(token in "\\PC{0,64}") {
        let _ = decode(b"0123456789abcdef", "label", &token);
    }
}

//! Predicates over the chain's text encodings. None of these fail; malformed input is `false`.

use txforge_common::address::base58;
use txforge_common::crypto::ed25519;
use txforge_common::utils::decode_base64;

use crate::codec::WireTransaction;
use crate::constants::{MAX_MEMO_LENGTH, SECRET_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::pubkey::PUBLIC_KEY_LENGTH;

pub use txforge_common::utils::is_valid_amount;

/// Decodes a base58 64-byte secret whose public half matches its seed.
pub(crate) fn decode_secret_key(prv: &str) -> Option<[u8; SECRET_KEY_LENGTH]> {
    let secret = base58::decode_fixed::<SECRET_KEY_LENGTH>(prv).ok()?;
    let signing_key = ed25519::signing_key_from_seed(&secret[..32]).ok()?;
    (signing_key.verifying_key().to_bytes()[..] == secret[32..]).then_some(secret)
}

pub fn is_valid_address(address: &str) -> bool {
    is_valid_public_key(address)
}

pub fn is_valid_public_key(key: &str) -> bool {
    base58::is_fixed::<PUBLIC_KEY_LENGTH>(key)
}

pub fn is_valid_private_key(key: &str) -> bool {
    decode_secret_key(key).is_some()
}

/// Recent blockhashes and durable nonce values are 32 bytes.
pub fn is_valid_block_id(hash: &str) -> bool {
    base58::is_fixed::<32>(hash)
}

pub fn is_valid_signature(signature: &str) -> bool {
    base58::is_fixed::<SIGNATURE_LENGTH>(signature)
}

/// A transaction id is its first signature.
pub fn is_valid_transaction_id(id: &str) -> bool {
    is_valid_signature(id)
}

pub fn is_valid_memo(memo: &str) -> bool {
    memo.len() <= MAX_MEMO_LENGTH
}

/// True when `raw` is base64 that decodes into a complete wire transaction.
pub fn is_valid_raw_transaction(raw: &str) -> bool {
    decode_base64(raw)
        .ok()
        .map(|bytes| WireTransaction::decode(&bytes).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeyPair;
    use txforge_common::traits::BaseKeyPair;

    #[test]
    fn test_key_predicates() {
        let keys = KeyPair::from_seed(&[3u8; 32]).unwrap().keys();
        let private = keys.private.unwrap();
        assert!(is_valid_public_key(&keys.public));
        assert!(is_valid_address(&keys.public));
        assert!(!is_valid_public_key(&private));
        assert!(is_valid_private_key(&private));
        assert!(!is_valid_private_key(&keys.public));
    }

    #[test]
    fn test_block_id_and_signature() {
        assert!(is_valid_block_id("GHtXQBsoZHVnNFa9YevAzFr17DJjgHXk3ycTKD5xD3Zi"));
        assert!(!is_valid_block_id("randomstring"));
        assert!(is_valid_signature(&base58::encode(&[5u8; 64])));
        assert!(!is_valid_transaction_id(&base58::encode(&[5u8; 32])));
    }

    #[test]
    fn test_memo_length() {
        assert!(is_valid_memo("test memo"));
        assert!(is_valid_memo(&"a".repeat(256)));
        assert!(!is_valid_memo(&"a".repeat(257)));
    }

    #[test]
    fn test_raw_transaction() {
        assert!(!is_valid_raw_transaction(""));
        assert!(!is_valid_raw_transaction("not base64"));
        assert!(!is_valid_raw_transaction("AAAA"));
    }
}

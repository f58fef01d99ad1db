use ed25519_dalek::SigningKey;
use txforge_common::crypto::ed25519;
use txforge_common::traits::BaseKeyPair;
use txforge_common::types::{DefaultKeys, RawKeys};
use txforge_common::utils::{decode_base64, decode_hex_fixed};
use txforge_common::TxError;

use crate::address::{ss58_encode, AccountId, GENERIC_SUBSTRATE_FORMAT};

/// Ed25519 key pair for the relay chain.
///
/// The private key is the 32-byte seed, displayed as hex. The public key doubles as
/// the account id.
#[derive(Clone)]
pub struct KeyPair {
    secret: Option<SigningKey>,
    public: AccountId,
}

/// Decodes a private key given as hex (optionally `0x` prefixed) or base64.
pub fn decode_private_key(key: &str) -> Option<[u8; 32]> {
    decode_hex_fixed::<32>(key).or_else(|| {
        decode_base64(key)
            .ok()
            .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
    })
}

pub fn is_valid_private_key(key: &str) -> bool {
    decode_private_key(key).is_some()
}

pub fn is_valid_public_key(key: &str) -> bool {
    decode_hex_fixed::<32>(key)
        .map(|bytes| ed25519::verifying_key_from_bytes(&bytes).is_ok())
        .unwrap_or(false)
}

impl KeyPair {
    fn from_signing_key(secret: SigningKey) -> Self {
        let public = secret.verifying_key().to_bytes();
        Self {
            secret: Some(secret),
            public,
        }
    }

    pub fn public_key(&self) -> &AccountId {
        &self.public
    }

    pub fn signing_key(&self) -> Option<&SigningKey> {
        self.secret.as_ref()
    }

    /// Encodes the address under a specific SS58 format.
    pub fn address_with_format(&self, format: u16) -> Result<String, TxError> {
        Ok(ss58_encode(&self.public, format)?)
    }
}

impl BaseKeyPair for KeyPair {
    fn generate() -> Self {
        Self::from_signing_key(ed25519::generate())
    }

    fn from_seed(seed: &[u8]) -> Result<Self, TxError> {
        Ok(Self::from_signing_key(ed25519::signing_key_from_seed(seed)?))
    }

    fn from_private_key(prv: &str) -> Result<Self, TxError> {
        let seed = decode_private_key(prv).ok_or_else(|| TxError::invalid_key("Invalid private key"))?;
        Self::from_seed(&seed)
    }

    fn from_public_key(public: &str) -> Result<Self, TxError> {
        if !is_valid_public_key(public) {
            return Err(TxError::invalid_key("address seems to be malformed"));
        }
        let public = decode_hex_fixed::<32>(public)
            .ok_or_else(|| TxError::invalid_key("address seems to be malformed"))?;
        Ok(Self {
            secret: None,
            public,
        })
    }

    fn address(&self) -> String {
        // Formats below 64 always encode.
        ss58_encode(&self.public, GENERIC_SUBSTRATE_FORMAT).unwrap_or_default()
    }

    fn keys(&self) -> DefaultKeys {
        DefaultKeys {
            public: hex::encode(self.public),
            private: self.secret.as_ref().map(|s| hex::encode(s.to_bytes())),
        }
    }

    fn keys_raw(&self) -> RawKeys {
        RawKeys {
            public: self.public.to_vec(),
            private: self.secret.as_ref().map(|s| s.to_bytes().to_vec()),
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &hex::encode(self.public))
            .field("has_private", &self.secret.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT1_PRV: &str = "874578010603af8e93b44bfc1d13b32830d0dbca6c89f28ccdc662afd3cdc824";
    const ACCOUNT1_PUB: &str = "61b18c6dc02ddcabdeac56cb4f21a971cc41cc97640f6f85b073480008c53a0d";
    const ACCOUNT2_PRV: &str = "6f850d17c2bf64478a2aac860fe9c23a48d322f12932c43fe90704553b7b84fd";
    const ACCOUNT2_ADDR: &str = "5Ffp1wJCPu4hzVDTo7XaMLqZSvSadyUQmxWPDw74CBjECSoq";
    const ACCOUNT3_PUB: &str = "d472bd6e0f1f92297631938e30edb682208c2cd2698d80cf678c53a69979eb9f";
    const DEFAULT_PUB: &str = "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29";
    const DEFAULT_ADDR: &str = "5DQcDYQ3wwobcrJ5aE5CzGp34ZWYNeYfYZ1yLbPiU2RcSvwm";

    #[test]
    fn test_random_key_pair_has_both_keys() {
        let keys = KeyPair::generate().keys();
        assert_eq!(keys.public.len(), 64);
        assert_eq!(keys.private.map(|p| p.len()), Some(64));
    }

    #[test]
    fn test_from_private_key() {
        let keys = KeyPair::from_private_key(ACCOUNT1_PRV).unwrap().keys();
        assert_eq!(keys.private.as_deref(), Some(ACCOUNT1_PRV));
        assert_eq!(keys.public, ACCOUNT1_PUB);
    }

    #[test]
    fn test_from_public_key_cannot_sign() {
        let pair = KeyPair::from_public_key(ACCOUNT3_PUB).unwrap();
        assert_eq!(pair.keys().public, ACCOUNT3_PUB);
        assert!(!pair.has_private_key());
        assert!(pair.signing_key().is_none());
    }

    #[test]
    fn test_zero_seed_address() {
        let pair = KeyPair::from_seed(&[0u8; 32]).unwrap();
        assert_eq!(pair.keys().public, DEFAULT_PUB);
        assert_eq!(pair.address(), DEFAULT_ADDR);
    }

    #[test]
    fn test_address_from_private_key() {
        assert_eq!(KeyPair::from_private_key(ACCOUNT2_PRV).unwrap().address(), ACCOUNT2_ADDR);
    }

    #[test]
    fn test_invalid_material() {
        let err = KeyPair::from_seed(&[0u8; 8]).unwrap_err();
        assert_eq!(err.to_string(), "bad seed size");

        let err = KeyPair::from_public_key("01D63D").unwrap_err();
        assert_eq!(err.to_string(), "address seems to be malformed");

        assert!(matches!(KeyPair::from_private_key("82A34"), Err(TxError::InvalidKey(_))));
    }

    #[test]
    fn test_base64_private_key_is_accepted() {
        let seed = hex::decode(ACCOUNT1_PRV).unwrap();
        let encoded = txforge_common::utils::encode_base64(&seed);
        assert!(is_valid_private_key(&encoded));
        assert_eq!(KeyPair::from_private_key(&encoded).unwrap().keys().public, ACCOUNT1_PUB);
    }
}

use ed25519_dalek::SigningKey;
use txforge_common::address::base58;
use txforge_common::crypto::ed25519;
use txforge_common::traits::BaseKeyPair;
use txforge_common::types::{DefaultKeys, RawKeys};
use txforge_common::TxError;

use crate::constants::SECRET_KEY_LENGTH;
use crate::pubkey::Pubkey;
use crate::utils::{decode_secret_key, is_valid_public_key};

/// Ed25519 key pair. The private key is displayed as base58 of the 64-byte
/// `seed || public key` secret.
#[derive(Clone)]
pub struct KeyPair {
    secret: Option<SigningKey>,
    public: Pubkey,
}

impl KeyPair {
    fn from_signing_key(secret: SigningKey) -> Self {
        let public = Pubkey::new(secret.verifying_key().to_bytes());
        Self {
            secret: Some(secret),
            public,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.public
    }

    pub fn signing_key(&self) -> Option<&SigningKey> {
        self.secret.as_ref()
    }

    /// 64-byte secret: seed followed by the public key.
    pub fn secret_bytes(&self) -> Option<[u8; SECRET_KEY_LENGTH]> {
        self.secret.as_ref().map(SigningKey::to_keypair_bytes)
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
        let secret = decode_secret_key(prv).ok_or_else(|| TxError::invalid_key("Invalid private key"))?;
        Self::from_seed(&secret[..32])
    }

    fn from_public_key(public: &str) -> Result<Self, TxError> {
        if !is_valid_public_key(public) {
            return Err(TxError::invalid_key(format!("Invalid public key: {}", public)));
        }
        let public = public
            .parse::<Pubkey>()
            .map_err(|_| TxError::invalid_key(format!("Invalid public key: {}", public)))?;
        Ok(Self {
            secret: None,
            public,
        })
    }

    fn address(&self) -> String {
        self.public.to_string()
    }

    fn keys(&self) -> DefaultKeys {
        DefaultKeys {
            public: self.public.to_string(),
            private: self.secret_bytes().map(|secret| base58::encode(&secret)),
        }
    }

    fn keys_raw(&self) -> RawKeys {
        RawKeys {
            public: self.public.to_bytes().to_vec(),
            private: self.secret_bytes().map(|secret| secret.to_vec()),
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("has_private", &self.secret.is_some())
            .finish()
    }
}

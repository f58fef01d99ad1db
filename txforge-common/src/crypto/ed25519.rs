use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::errors::TxError;

pub const SEED_LENGTH: usize = 32;
pub const PUBLIC_KEY_LENGTH: usize = 32;
pub const SIGNATURE_LENGTH: usize = 64;

/// Generates a signing key from the operating system RNG.
pub fn generate() -> SigningKey {
    let mut csprng = OsRng;
    SigningKey::generate(&mut csprng)
}

/// Builds a signing key from a 32-byte seed.
pub fn signing_key_from_seed(seed: &[u8]) -> Result<SigningKey, TxError> {
    let seed: &[u8; SEED_LENGTH] = seed
        .try_into()
        .map_err(|_| TxError::invalid_key("bad seed size"))?;
    Ok(SigningKey::from_bytes(seed))
}

pub fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey, TxError> {
    let bytes: &[u8; PUBLIC_KEY_LENGTH] = bytes
        .try_into()
        .map_err(|_| TxError::invalid_key("Invalid public key length"))?;
    VerifyingKey::from_bytes(bytes).map_err(|e| TxError::invalid_key(e.to_string()))
}

/// Signs `message` with `key`. Pure and deterministic, no I/O.
pub fn sign_message(key: &SigningKey, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
    key.sign(message).to_bytes()
}

/// Checks an ed25519 signature. Any malformed input yields `false`.
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(verifying_key) = verifying_key_from_bytes(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    verifying_key.verify(message, &signature).is_ok()
}

/// Returns true if `seed` has the length ed25519 seed derivation expects.
pub fn is_valid_seed(seed: &[u8]) -> bool {
    seed.len() == SEED_LENGTH
}

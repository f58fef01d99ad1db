use ed25519_dalek::SignatureError;
use thiserror::Error;

/// Errors related specifically to address formatting and encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The string is not valid base58.
    #[error("Failed to decode base58: {0}")]
    Base58(String),

    /// Decoded payload does not have the expected length.
    #[error("Invalid address length: {0}")]
    InvalidLength(usize),

    /// SS58 checksum bytes do not match the payload.
    #[error("Invalid address checksum")]
    InvalidChecksum,

    /// Network prefix is not supported by the encoder.
    #[error("Unsupported address prefix: {0}")]
    UnsupportedPrefix(u16),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

impl From<bs58::decode::Error> for AddressError {
    fn from(err: bs58::decode::Error) -> Self {
        AddressError::Base58(err.to_string())
    }
}

impl From<SignatureError> for AddressError {
    fn from(err: SignatureError) -> Self {
        AddressError::InvalidPublicKey(err.to_string())
    }
}

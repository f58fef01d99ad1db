use thiserror::Error;

use crate::address::AddressError;

/// Error taxonomy shared by every chain module.
///
/// Each variant carries the message exactly as it should be shown to a caller,
/// so `Display` prints it unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxError {
    /// Malformed seed, private key or public key material.
    #[error("{0}")]
    InvalidKey(String),

    /// Operation attempted on a transaction missing required state, or a raw
    /// transaction that fails validation.
    #[error("{0}")]
    InvalidTransaction(String),

    /// A setter or `build()` rejected an out-of-range or missing value.
    #[error("{0}")]
    BuildTransaction(String),

    /// Signing preconditions were not met.
    #[error("{0}")]
    Signing(String),

    /// The operation or instruction has no codec mapping.
    #[error("{0}")]
    NotSupported(String),

    /// Declared capability intentionally left out of a chain module.
    #[error("{0}")]
    NotImplemented(String),

    /// Raw bytes could not be decoded into a transaction.
    #[error("{0}")]
    ParseTransaction(String),

    /// An address handed to a builder did not pass validation.
    #[error("invalid address '{0}'")]
    AddressValidation(String),

    #[error("Address error: {0}")]
    Address(#[from] AddressError),
}

impl TxError {
    pub fn build(message: impl Into<String>) -> Self {
        TxError::BuildTransaction(message.into())
    }

    pub fn invalid_tx(message: impl Into<String>) -> Self {
        TxError::InvalidTransaction(message.into())
    }

    pub fn signing(message: impl Into<String>) -> Self {
        TxError::Signing(message.into())
    }

    pub fn invalid_key(message: impl Into<String>) -> Self {
        TxError::InvalidKey(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        TxError::ParseTransaction(message.into())
    }

    pub fn not_supported(message: impl Into<String>) -> Self {
        TxError::NotSupported(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_printed_verbatim() {
        let err = TxError::build("Value cannot be less than zero");
        assert_eq!(err.to_string(), "Value cannot be less than zero");

        let err = TxError::AddressValidation("abc".to_string());
        assert_eq!(err.to_string(), "invalid address 'abc'");
    }

    #[test]
    fn test_address_error_is_wrapped() {
        let err: TxError = AddressError::InvalidLength(31).into();
        assert!(matches!(err, TxError::Address(_)));
        assert!(err.to_string().contains("31"));
    }
}

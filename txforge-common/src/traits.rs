use serde::Serialize;

use crate::errors::TxError;
use crate::types::{BaseKey, DefaultKeys, RawKeys, TransactionType};
use crate::utils;

/// Key material for one chain.
pub trait BaseKeyPair: Sized {
    /// Creates a key pair from a fresh random seed.
    fn generate() -> Self;

    /// Derives a key pair from a seed of the chain's required length.
    fn from_seed(seed: &[u8]) -> Result<Self, TxError>;

    /// Parses the chain's canonical private key encoding.
    fn from_private_key(prv: &str) -> Result<Self, TxError>;

    /// Parses the chain's canonical public key encoding. The result cannot sign.
    fn from_public_key(public: &str) -> Result<Self, TxError>;

    /// Address of the public key under the chain's default encoding.
    fn address(&self) -> String;

    fn keys(&self) -> DefaultKeys;

    fn keys_raw(&self) -> RawKeys;

    fn has_private_key(&self) -> bool {
        self.keys_raw().private.is_some()
    }
}

/// A wire transaction wrapper: Empty, then Unsigned once a builder sets the payload,
/// then Signed after `sign()`.
pub trait BaseTransaction {
    /// Structured summary returned by [`BaseTransaction::to_json`].
    type Data: Serialize;

    fn id(&self) -> Option<String>;

    fn transaction_type(&self) -> Option<TransactionType>;

    fn can_sign(&self, key: &BaseKey) -> bool;

    /// Wire encoding ready for broadcast (signed bytes if present, unsigned payload otherwise).
    fn to_broadcast_format(&self) -> Result<String, TxError>;

    fn to_json(&self) -> Result<Self::Data, TxError>;

    /// Signatures currently attached, in display encoding.
    fn signature(&self) -> Vec<String>;
}

/// Shared builder lifecycle: accumulate, validate, encode, optionally sign.
pub trait BaseTransactionBuilder {
    type Transaction: BaseTransaction;

    /// Loads builder state from a previously built raw transaction.
    fn from_raw(&mut self, raw: &str) -> Result<&mut Self, TxError>;

    /// Registers a signer. Signing happens during `build()`.
    fn sign(&mut self, key: &BaseKey) -> Result<&mut Self, TxError>;

    /// Validates accumulated state and produces the transaction.
    fn build(&mut self) -> Result<Self::Transaction, TxError>;

    fn validate_address(&self, address: &str) -> Result<(), TxError>;

    fn validate_key(&self, key: &BaseKey) -> Result<(), TxError>;

    fn validate_raw_transaction(&self, raw: &str) -> Result<(), TxError>;

    fn validate_transaction(&self) -> Result<(), TxError>;

    fn validate_value(&self, value: &str) -> Result<u128, TxError> {
        utils::validate_value(value)
    }
}

/// Entry point that classifies raw transactions and hands out builders.
pub trait BaseTransactionBuilderFactory {
    type Builder: BaseTransactionBuilder;

    fn from_raw(&self, raw: &str) -> Result<Self::Builder, TxError>;
}

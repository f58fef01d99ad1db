use tracing::{debug, warn};
use txforge_common::traits::{BaseTransaction, BaseTransactionBuilder, BaseTransactionBuilderFactory};
use txforge_common::types::{BaseKey, TransactionType};
use txforge_common::TxError;

use crate::builder::{TransferBuilder, WalletInitializationBuilder};
use crate::transaction::Transaction;
use crate::utils::is_valid_raw_transaction;

/// Any system program builder, as returned by [`TransactionBuilderFactory::from_raw`].
#[derive(Debug, Clone)]
pub enum SolBuilder {
    Transfer(TransferBuilder),
    WalletInitialization(WalletInitializationBuilder),
}

macro_rules! dispatch {
    ($self:expr, $builder:ident => $body:expr) => {
        match $self {
            SolBuilder::Transfer($builder) => $body,
            SolBuilder::WalletInitialization($builder) => $body,
        }
    };
}

impl SolBuilder {
    pub fn transaction_type(&self) -> TransactionType {
        dispatch!(self, b => b.transaction_type())
    }
}

impl BaseTransactionBuilder for SolBuilder {
    type Transaction = Transaction;

    fn from_raw(&mut self, raw: &str) -> Result<&mut Self, TxError> {
        dispatch!(self, b => { b.from_raw(raw)?; });
        Ok(self)
    }

    fn sign(&mut self, key: &BaseKey) -> Result<&mut Self, TxError> {
        dispatch!(self, b => { b.sign(key)?; });
        Ok(self)
    }

    fn build(&mut self) -> Result<Transaction, TxError> {
        dispatch!(self, b => b.build())
    }

    fn validate_address(&self, address: &str) -> Result<(), TxError> {
        dispatch!(self, b => b.validate_address(address))
    }

    fn validate_key(&self, key: &BaseKey) -> Result<(), TxError> {
        dispatch!(self, b => b.validate_key(key))
    }

    fn validate_raw_transaction(&self, raw: &str) -> Result<(), TxError> {
        dispatch!(self, b => b.validate_raw_transaction(raw))
    }

    fn validate_transaction(&self) -> Result<(), TxError> {
        dispatch!(self, b => b.validate_transaction())
    }
}

/// Hands out builders and classifies raw base64 transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilderFactory;

impl TransactionBuilderFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn transfer_builder(&self) -> TransferBuilder {
        TransferBuilder::new()
    }

    pub fn wallet_initialization_builder(&self) -> WalletInitializationBuilder {
        WalletInitializationBuilder::new()
    }
}

impl BaseTransactionBuilderFactory for TransactionBuilderFactory {
    type Builder = SolBuilder;

    fn from_raw(&self, raw: &str) -> Result<SolBuilder, TxError> {
        if raw.is_empty() {
            return Err(TxError::parse("Invalid raw transaction: Undefined"));
        }
        if !is_valid_raw_transaction(raw) {
            return Err(TxError::parse("Invalid raw transaction"));
        }

        let tx = Transaction::from_raw(raw).map_err(|e| {
            warn!("⚠️ Could not classify raw transaction: {}", e);
            e
        })?;
        let mut builder = match tx.transaction_type() {
            Some(TransactionType::Send) => SolBuilder::Transfer(self.transfer_builder()),
            Some(TransactionType::WalletInitialization) => {
                SolBuilder::WalletInitialization(self.wallet_initialization_builder())
            }
            _ => return Err(TxError::invalid_tx("Invalid transaction")),
        };
        debug!(kind = %builder.transaction_type(), "classified raw transaction");

        builder.from_raw(raw)?;
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_empty_and_garbage() {
        let factory = TransactionBuilderFactory::new();
        assert_eq!(
            factory.from_raw("").unwrap_err(),
            TxError::parse("Invalid raw transaction: Undefined")
        );
        assert_eq!(factory.from_raw("AAAA").unwrap_err(), TxError::parse("Invalid raw transaction"));
    }

    #[test]
    fn test_getters_have_fixed_types() {
        let factory = TransactionBuilderFactory::new();
        assert_eq!(factory.transfer_builder().transaction_type(), TransactionType::Send);
        assert_eq!(
            factory.wallet_initialization_builder().transaction_type(),
            TransactionType::WalletInitialization
        );
    }
}

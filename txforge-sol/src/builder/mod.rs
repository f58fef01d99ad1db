//! Builders for system program transactions.
//!
//! [`Builder`] holds the state every transaction needs (fee payer, blockhash or durable
//! nonce, accumulated instruction parameters, pending signers). The [`BuilderKind`]
//! parameter fixes the transaction type and gates the kind-specific setters.

pub mod transfer;
pub mod wallet_init;

use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::{debug, info};
use txforge_common::address::base58;
use txforge_common::traits::{BaseKeyPair, BaseTransaction, BaseTransactionBuilder};
use txforge_common::types::{BaseKey, TransactionType};
use txforge_common::utils::{is_valid_amount, NEGATIVE_VALUE};
use txforge_common::TxError;

use crate::codec::wire::Signature;
use crate::codec::{Message, WireTransaction};
use crate::instruction::{build_instructions, parse_instructions, InstructionParams, NonceParams};
use crate::keypair::KeyPair;
use crate::pubkey::Pubkey;
use crate::transaction::Transaction;
use crate::utils::{is_valid_address, is_valid_block_id, is_valid_public_key, is_valid_raw_transaction};

pub use transfer::{Transfer, TransferBuilder};
pub use wallet_init::{WalletInit, WalletInitializationBuilder};

/// Nonce account and its authority, for transactions that use a durable nonce instead of a
/// recent blockhash.
pub type DurableNonceParams = NonceParams;

/// Fixes the transaction type a [`Builder`] produces.
pub trait BuilderKind: Default + Clone + Debug {
    const TRANSACTION_TYPE: TransactionType;
}

pub(crate) fn invalid_param(field: &str, value: &str) -> TxError {
    TxError::build(format!("Invalid or missing {}, got: {}", field, value))
}

pub(crate) fn check_public_key(field: &str, value: &str) -> Result<(), TxError> {
    if value.is_empty() || !is_valid_public_key(value) {
        return Err(invalid_param(field, value));
    }
    Ok(())
}

/// Lamport amounts: negative values get the shared message, anything else that is not a
/// `u64` decimal is reported as invalid.
pub(crate) fn check_amount<B: BaseTransactionBuilder>(builder: &B, amount: &str) -> Result<(), TxError> {
    match builder.validate_value(amount) {
        Err(err) if err == TxError::build(NEGATIVE_VALUE) => Err(err),
        Ok(value) if is_valid_amount(amount) && value <= u64::MAX as u128 => Ok(()),
        _ => Err(invalid_param("amount", amount)),
    }
}

#[derive(Debug, Clone, Default)]
pub struct Builder<K: BuilderKind> {
    fee_payer: Option<Pubkey>,
    recent_blockhash: Option<[u8; 32]>,
    nonce_info: Option<NonceParams>,
    pub(crate) instructions_data: Vec<InstructionParams>,
    signers: Vec<KeyPair>,
    carried_signatures: Vec<(Pubkey, Signature)>,
    kind: PhantomData<K>,
}

impl<K: BuilderKind> Builder<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction_type(&self) -> TransactionType {
        K::TRANSACTION_TYPE
    }

    pub fn instructions_data(&self) -> &[InstructionParams] {
        &self.instructions_data
    }

    /// Account that pays the fee. It is always the first required signer.
    pub fn fee_payer(&mut self, address: &str) -> Result<&mut Self, TxError> {
        let key = address
            .parse::<Pubkey>()
            .map_err(|_| invalid_param("feePayerAddress", address))?;
        self.fee_payer = Some(key);
        Ok(self)
    }

    /// Sets the recent blockhash. With `durable`, the blockhash is the nonce account's stored
    /// value and a nonce advance instruction is prepended at build time.
    pub fn nonce(&mut self, blockhash: &str, durable: Option<DurableNonceParams>) -> Result<&mut Self, TxError> {
        if blockhash.is_empty() || !is_valid_block_id(blockhash) {
            return Err(invalid_param("blockHash", blockhash));
        }
        if let Some(params) = &durable {
            check_public_key("walletNoncePubKey", &params.wallet_nonce_pub_key)?;
            check_public_key("authWalletPubKey", &params.auth_wallet_pub_key)?;
            if params.wallet_nonce_pub_key == params.auth_wallet_pub_key {
                return Err(TxError::build(
                    "Invalid params: walletNoncePubKey cannot be equal to authWalletPubKey",
                ));
            }
        }
        self.recent_blockhash = Some(base58::decode_fixed::<32>(blockhash)?);
        if durable.is_some() {
            self.nonce_info = durable;
        }
        Ok(self)
    }

    fn load(&mut self, tx: &Transaction) -> Result<(), TxError> {
        let transaction_type = tx
            .transaction_type()
            .ok_or_else(|| TxError::invalid_tx("Invalid transaction"))?;
        if transaction_type != K::TRANSACTION_TYPE {
            return Err(TxError::invalid_tx(format!(
                "Invalid Transaction Type: {}. Expected {}",
                transaction_type,
                K::TRANSACTION_TYPE
            )));
        }
        let data = tx.to_json()?;
        if let Some(fee_payer) = &data.fee_payer {
            self.fee_payer(fee_payer)?;
        }
        self.nonce(&data.nonce, None)?;
        self.instructions_data = parse_instructions(transaction_type, &tx.instructions()?)?;

        if let Some(wire) = tx.wire() {
            self.carried_signatures = wire
                .message
                .signer_keys()
                .iter()
                .copied()
                .zip(wire.signatures.iter().copied())
                .filter(|(_, signature)| signature.iter().any(|b| *b != 0))
                .collect();
        }
        Ok(())
    }

    fn compile(&self, fee_payer: Pubkey, blockhash: [u8; 32]) -> Result<WireTransaction, TxError> {
        let mut instructions = Vec::new();
        if let Some(nonce) = &self.nonce_info {
            instructions.extend(build_instructions(&InstructionParams::NonceAdvance(nonce.clone()))?);
        }
        for params in &self.instructions_data {
            instructions.extend(build_instructions(params)?);
        }

        let message = Message::compile(&instructions, fee_payer, blockhash)
            .map_err(|e| TxError::build(format!("Failed to compile message: {}", e)))?;
        let mut wire = WireTransaction::new_unsigned(message);
        for (signer, signature) in &self.carried_signatures {
            if let Some(index) = wire.signer_index(signer) {
                wire.set_signature(index, *signature);
            }
        }
        Ok(wire)
    }
}

impl<K: BuilderKind> BaseTransactionBuilder for Builder<K> {
    type Transaction = Transaction;

    fn from_raw(&mut self, raw: &str) -> Result<&mut Self, TxError> {
        self.validate_raw_transaction(raw)?;
        let tx = Transaction::from_raw(raw)?;
        self.load(&tx)?;
        debug!(
            kind = %K::TRANSACTION_TYPE,
            instructions = self.instructions_data.len(),
            signatures = self.carried_signatures.len(),
            "loaded raw transaction"
        );
        Ok(self)
    }

    fn sign(&mut self, key: &BaseKey) -> Result<&mut Self, TxError> {
        self.validate_key(key)?;
        if self
            .signers
            .iter()
            .any(|signer| signer.keys().private.as_deref() == Some(key.key.as_str()))
        {
            return Err(TxError::signing(format!("Repeated sign: {}", key.key)));
        }
        self.signers.push(KeyPair::from_private_key(&key.key)?);
        Ok(self)
    }

    fn build(&mut self) -> Result<Transaction, TxError> {
        self.validate_transaction()?;
        let fee_payer = self
            .fee_payer
            .ok_or_else(|| TxError::build("feePayer is required before building"))?;
        let blockhash = self
            .recent_blockhash
            .ok_or_else(|| TxError::build("nonce is required before building"))?;

        let mut tx = Transaction::new();
        tx.set_wire(self.compile(fee_payer, blockhash)?);
        tx.set_transaction_type(K::TRANSACTION_TYPE);
        tx.sign(&self.signers)?;

        info!(
            "🧱 Built {} transaction ({} bytes, {} signature(s))",
            K::TRANSACTION_TYPE,
            tx.transaction_size()?,
            tx.signature().len()
        );
        Ok(tx)
    }

    fn validate_address(&self, address: &str) -> Result<(), TxError> {
        if !is_valid_address(address) {
            return Err(TxError::build(format!("Invalid address {}", address)));
        }
        Ok(())
    }

    fn validate_key(&self, key: &BaseKey) -> Result<(), TxError> {
        match KeyPair::from_private_key(&key.key) {
            Ok(pair) if pair.has_private_key() => Ok(()),
            _ => Err(TxError::build("Invalid key")),
        }
    }

    fn validate_raw_transaction(&self, raw: &str) -> Result<(), TxError> {
        if raw.is_empty() {
            return Err(TxError::invalid_tx("Raw transaction is empty"));
        }
        if !is_valid_raw_transaction(raw) {
            return Err(TxError::invalid_tx("Invalid raw transaction"));
        }
        Ok(())
    }

    fn validate_transaction(&self) -> Result<(), TxError> {
        if self.fee_payer.is_none() {
            return Err(TxError::build("Invalid transaction: missing feePayer"));
        }
        if self.recent_blockhash.is_none() {
            return Err(TxError::build("Invalid transaction: missing nonce blockhash"));
        }
        Ok(())
    }
}

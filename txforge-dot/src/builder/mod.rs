//! Relay chain transaction builders.
//!
//! Every builder is a [`Builder`] over a call-specific [`MethodBuilder`]. The shared
//! state (sender, mortality, nonce, tip, network identity) lives in [`BuilderCore`] and
//! is set through the provided methods of [`TransactionBuilder`].

pub mod add_proxy;
pub mod proxy;
pub mod stake;
pub mod transfer;
pub mod unstake;

use tracing::{debug, info};
use txforge_common::traits::{BaseKeyPair, BaseTransactionBuilder};
use txforge_common::types::{BaseKey, TransactionType};
use txforge_common::utils::{decode_hex, is_valid_hex, to_0x_hex, validate_number, validate_value};
use txforge_common::TxError;

use crate::address::{decode_account, AccountId, GENERIC_SUBSTRATE_FORMAT};
use crate::codec::{decode_method, decode_raw, Era, Method, MethodName, RawExtrinsic, SigningPayload};
use crate::keypair::{is_valid_private_key, KeyPair};
use crate::network::{NetworkConfig, PalletIndices};
use crate::transaction::{parse_hash, Transaction};

pub use add_proxy::{AddProxyBuilder, AddProxyMethod};
pub use proxy::{ProxyBuilder, ProxyMethod};
pub use stake::{StakeBuilder, StakeMethod};
pub use transfer::{TransferBuilder, TransferMethod};
pub use unstake::{UnstakeBuilder, UnstakeMethod};

pub const DEFAULT_ERA_PERIOD: u64 = 64;

/// Mortality window: the block the transaction becomes valid at and how many blocks it lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validity {
    pub first_valid: Option<i64>,
    pub max_duration: Option<i64>,
}

/// State shared by every call type.
#[derive(Debug, Clone)]
pub struct BuilderCore {
    pub(crate) sender: Option<AccountId>,
    pub(crate) block_number: Option<u64>,
    pub(crate) block_hash: Option<[u8; 32]>,
    pub(crate) genesis_hash: Option<[u8; 32]>,
    pub(crate) metadata: Option<String>,
    pub(crate) chain_name: Option<String>,
    pub(crate) nonce: Option<u64>,
    pub(crate) spec_version: Option<u32>,
    pub(crate) spec_name: Option<String>,
    pub(crate) transaction_version: Option<u32>,
    pub(crate) era_period: u64,
    pub(crate) tip: u128,
    pub(crate) pallets: Option<PalletIndices>,
    pub(crate) ss58_format: u16,
}

impl Default for BuilderCore {
    fn default() -> Self {
        Self {
            sender: None,
            block_number: None,
            block_hash: None,
            genesis_hash: None,
            metadata: None,
            chain_name: None,
            nonce: None,
            spec_version: None,
            spec_name: None,
            transaction_version: None,
            era_period: DEFAULT_ERA_PERIOD,
            tip: 0,
            pallets: None,
            ss58_format: GENERIC_SUBSTRATE_FORMAT,
        }
    }
}

impl BuilderCore {
    pub fn with_network(network: &NetworkConfig) -> Self {
        let mut core = Self::default();
        core.apply_network(network);
        core
    }

    fn apply_network(&mut self, network: &NetworkConfig) {
        self.genesis_hash = parse_hash(&network.genesis_hash);
        self.metadata = Some(network.metadata.clone());
        self.chain_name = Some(network.chain_name.clone());
        self.spec_version = Some(network.spec_version);
        self.spec_name = Some(network.spec_name.clone());
        self.pallets = Some(network.pallets);
        self.ss58_format = network.ss58_format;
    }

    /// Checks every base field is present, reporting the first one missing.
    pub fn validate(&self) -> Result<(), TxError> {
        let checks = [
            ("sender", self.sender.is_some()),
            ("blockNumber", self.block_number.is_some()),
            ("blockHash", self.block_hash.is_some()),
            ("genesisHash", self.genesis_hash.is_some()),
            ("metadata", self.metadata.is_some()),
            ("chainName", self.chain_name.is_some()),
            ("nonce", self.nonce.is_some()),
            ("specVersion", self.spec_version.is_some()),
            ("specName", self.spec_name.is_some()),
            ("transactionVersion", self.transaction_version.is_some()),
        ];
        match checks.iter().find(|(_, present)| !present) {
            Some((field, _)) => Err(missing_field(field)),
            None => Ok(()),
        }
    }

    fn pallets(&self, action: &str) -> Result<PalletIndices, TxError> {
        self.pallets
            .ok_or_else(|| TxError::build(format!("Please set the network before {} the transaction", action)))
    }

    /// Network bundle as currently overridden by the individual setters.
    fn network_config(&self, pallets: PalletIndices) -> NetworkConfig {
        NetworkConfig {
            spec_name: self.spec_name.clone().unwrap_or_default(),
            chain_name: self.chain_name.clone().unwrap_or_default(),
            genesis_hash: self.genesis_hash.map(|h| to_0x_hex(&h)).unwrap_or_default(),
            spec_version: self.spec_version.unwrap_or_default(),
            ss58_format: self.ss58_format,
            metadata: self.metadata.clone().unwrap_or_default(),
            pallets,
        }
    }
}

pub(crate) fn missing_field(field: &str) -> TxError {
    TxError::invalid_tx(format!("Transaction validation failed: \"{}\" is required", field))
}

pub(crate) fn required<T: Clone>(value: &Option<T>, field: &str) -> Result<T, TxError> {
    value.clone().ok_or_else(|| missing_field(field))
}

pub(crate) fn type_mismatch(found: MethodName, expected: MethodName) -> TxError {
    TxError::invalid_tx(format!("Invalid Transaction Type: {}. Expected {}", found, expected))
}

pub(crate) fn parse_account(address: &str) -> Result<AccountId, TxError> {
    decode_account(address).map_err(|_| TxError::AddressValidation(address.to_string()))
}

/// Fluent setters shared by every relay chain builder.
pub trait TransactionBuilder: Sized {
    fn core(&self) -> &BuilderCore;

    fn core_mut(&mut self) -> &mut BuilderCore;

    /// Account that pays for and signs the transaction.
    fn sender(&mut self, address: &str) -> Result<&mut Self, TxError> {
        self.core_mut().sender = Some(parse_account(address)?);
        Ok(self)
    }

    /// Account nonce.
    fn sequence_id(&mut self, nonce: i64) -> Result<&mut Self, TxError> {
        self.core_mut().nonce = Some(validate_number(nonce)?);
        Ok(self)
    }

    /// Tip paid on top of the base fee.
    fn fee(&mut self, tip: &str) -> Result<&mut Self, TxError> {
        self.core_mut().tip = validate_value(tip)?;
        Ok(self)
    }

    /// Zero leaves the corresponding field untouched.
    fn validity(&mut self, validity: Validity) -> Result<&mut Self, TxError> {
        if let Some(first_valid) = validity.first_valid.filter(|v| *v != 0) {
            self.core_mut().block_number = Some(validate_number(first_valid)?);
        }
        if let Some(max_duration) = validity.max_duration.filter(|v| *v != 0) {
            self.core_mut().era_period = validate_number(max_duration)?;
        }
        Ok(self)
    }

    /// Hash of the block the mortality window is anchored at.
    fn block_hash(&mut self, hash: &str) -> Result<&mut Self, TxError> {
        let hash = parse_hash(hash).ok_or_else(|| TxError::build(format!("Invalid block hash, got: {}", hash)))?;
        self.core_mut().block_hash = Some(hash);
        Ok(self)
    }

    fn transaction_version(&mut self, version: u32) -> &mut Self {
        self.core_mut().transaction_version = Some(version);
        self
    }

    fn spec_name(&mut self, name: &str) -> &mut Self {
        self.core_mut().spec_name = Some(name.to_string());
        self
    }

    fn genesis_hash(&mut self, hash: &str) -> Result<&mut Self, TxError> {
        let hash = parse_hash(hash).ok_or_else(|| TxError::build(format!("Invalid genesis hash, got: {}", hash)))?;
        self.core_mut().genesis_hash = Some(hash);
        Ok(self)
    }

    fn metadata(&mut self, metadata: &str) -> &mut Self {
        self.core_mut().metadata = Some(metadata.to_string());
        self
    }

    fn spec_version(&mut self, version: u32) -> &mut Self {
        self.core_mut().spec_version = Some(version);
        self
    }

    fn chain_name(&mut self, name: &str) -> &mut Self {
        self.core_mut().chain_name = Some(name.to_string());
        self
    }

    /// Sets the whole network identity bundle at once.
    fn network(&mut self, network: &NetworkConfig) -> &mut Self {
        debug!(chain = %network.chain_name, spec_version = network.spec_version, "network selected");
        self.core_mut().apply_network(network);
        self
    }

    fn testnet(&mut self) -> &mut Self {
        self.network(&NetworkConfig::testnet())
    }

    fn westend(&mut self) -> &mut Self {
        self.network(&NetworkConfig::westend())
    }

    fn mainnet(&mut self) -> &mut Self {
        self.network(&NetworkConfig::mainnet())
    }
}

/// Call-specific half of a builder.
pub trait MethodBuilder: Default + Clone + std::fmt::Debug {
    /// The only call this builder accepts from raw bytes.
    const EXPECTED: MethodName;

    fn transaction_type(&self) -> TransactionType;

    /// Checks the call arguments and assembles the call.
    fn build_method(&self, pallets: &PalletIndices) -> Result<Method, TxError>;

    /// Copies the arguments of a decoded call into the builder.
    fn load_method(&mut self, method: &Method) -> Result<(), TxError>;
}

/// A relay chain builder: shared core state, call arguments, and registered signers.
#[derive(Debug, Clone, Default)]
pub struct Builder<M: MethodBuilder> {
    pub(crate) core: BuilderCore,
    pub(crate) method: M,
    signers: Vec<KeyPair>,
}

impl<M: MethodBuilder> Builder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(network: &NetworkConfig) -> Self {
        Self {
            core: BuilderCore::with_network(network),
            method: M::default(),
            signers: Vec::new(),
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.method.transaction_type()
    }

    fn load_raw(&mut self, decoded: &RawExtrinsic, method: &Method) -> Result<(), TxError> {
        match decoded {
            RawExtrinsic::Payload(payload) => {
                self.core.block_hash = Some(payload.block_hash);
                self.core.genesis_hash = Some(payload.genesis_hash);
                self.core.spec_version = Some(payload.spec_version);
                self.core.transaction_version = Some(payload.transaction_version);
            }
            RawExtrinsic::Signed(signed) => {
                self.core.sender = Some(signed.signer);
            }
        }
        if let Some(period) = decoded.era().period() {
            self.core.era_period = period;
        }
        self.core.nonce = Some(decoded.nonce());
        self.core.tip = decoded.tip();
        self.method.load_method(method)
    }
}

impl<M: MethodBuilder> TransactionBuilder for Builder<M> {
    fn core(&self) -> &BuilderCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BuilderCore {
        &mut self.core
    }
}

impl<M: MethodBuilder> BaseTransactionBuilder for Builder<M> {
    type Transaction = Transaction;

    fn from_raw(&mut self, raw: &str) -> Result<&mut Self, TxError> {
        let pallets = self.core.pallets("parsing")?;
        self.validate_raw_transaction(raw)?;

        let bytes = decode_hex(raw).map_err(|e| TxError::invalid_tx(format!("Invalid raw transaction: {}", e)))?;
        let decoded = decode_raw(&bytes)?;
        let method = decode_method(decoded.method(), &pallets)?;
        if method.name() != M::EXPECTED {
            return Err(type_mismatch(method.name(), M::EXPECTED));
        }
        debug!(
            method = %method.name(),
            signed = matches!(decoded, RawExtrinsic::Signed(_)),
            "loaded raw transaction"
        );

        self.load_raw(&decoded, &method)?;
        Ok(self)
    }

    fn sign(&mut self, key: &BaseKey) -> Result<&mut Self, TxError> {
        self.validate_key(key)?;
        self.signers.push(KeyPair::from_private_key(&key.key)?);
        Ok(self)
    }

    fn build(&mut self) -> Result<Transaction, TxError> {
        self.validate_transaction()?;
        let pallets = self.core.pallets("building")?;
        let method = self.method.build_method(&pallets)?;

        let core = &self.core;
        let block_number = required(&core.block_number, "blockNumber")?;
        let payload = SigningPayload {
            method: method.encode(&pallets),
            era: Era::mortal(core.era_period, block_number),
            nonce: required(&core.nonce, "nonce")?,
            tip: core.tip,
            spec_version: required(&core.spec_version, "specVersion")?,
            transaction_version: required(&core.transaction_version, "transactionVersion")?,
            genesis_hash: required(&core.genesis_hash, "genesisHash")?,
            block_hash: required(&core.block_hash, "blockHash")?,
        };

        let mut tx = Transaction::new(core.network_config(pallets));
        tx.set_payload(payload);
        tx.set_transaction_type(self.method.transaction_type());
        tx.set_sender(required(&core.sender, "sender")?);
        tx.set_block_number(block_number);

        for signer in &self.signers {
            tx.sign(signer)?;
        }

        info!(
            "🧱 Built {} transaction ({} bytes, {} signer(s))",
            self.method.transaction_type(),
            tx.transaction_size()?,
            self.signers.len()
        );
        Ok(tx)
    }

    fn validate_address(&self, address: &str) -> Result<(), TxError> {
        parse_account(address).map(|_| ())
    }

    fn validate_key(&self, key: &BaseKey) -> Result<(), TxError> {
        if is_valid_private_key(&key.key) {
            Ok(())
        } else {
            Err(TxError::build("Key validation failed"))
        }
    }

    fn validate_raw_transaction(&self, raw: &str) -> Result<(), TxError> {
        if raw.is_empty() || !is_valid_hex(raw) {
            return Err(TxError::invalid_tx("Invalid raw transaction"));
        }
        Ok(())
    }

    fn validate_transaction(&self) -> Result<(), TxError> {
        self.core.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT1_ADDR: &str = "5EGoFA95omzemRssELLDjVenNZ68aXyUeqtKQScXSEBvVJkr";

    #[test]
    fn test_validation_reports_first_missing_field() {
        let mut builder = TransferBuilder::new();
        assert_eq!(
            builder.validate_transaction().unwrap_err().to_string(),
            "Transaction validation failed: \"sender\" is required"
        );

        builder.sender(ACCOUNT1_ADDR).unwrap();
        assert_eq!(
            builder.validate_transaction().unwrap_err().to_string(),
            "Transaction validation failed: \"blockNumber\" is required"
        );

        builder
            .validity(Validity {
                first_valid: Some(3933),
                max_duration: Some(64),
            })
            .unwrap();
        assert_eq!(
            builder.validate_transaction().unwrap_err().to_string(),
            "Transaction validation failed: \"blockHash\" is required"
        );
    }

    #[test]
    fn test_network_fills_identity_fields() {
        let mut builder = UnstakeBuilder::new();
        builder.westend();
        let core = builder.core();
        assert_eq!(core.chain_name.as_deref(), Some("Westend"));
        assert_eq!(core.spec_version, Some(9122));
        assert_eq!(core.pallets, Some(PalletIndices::WESTEND));
        assert!(core.genesis_hash.is_some());
    }

    #[test]
    fn test_numeric_setters_reject_negatives() {
        let mut builder = TransferBuilder::new();
        assert_eq!(
            builder.sequence_id(-1).unwrap_err(),
            TxError::build("Value cannot be less than zero")
        );
        assert_eq!(builder.fee("-1").unwrap_err(), TxError::build("Value cannot be less than zero"));
        assert!(builder
            .validity(Validity {
                first_valid: Some(-5),
                max_duration: None,
            })
            .is_err());
    }

    #[test]
    fn test_zero_validity_keeps_previous_values() {
        let mut builder = TransferBuilder::new();
        builder
            .validity(Validity {
                first_valid: Some(3933),
                max_duration: Some(64),
            })
            .unwrap()
            .validity(Validity {
                first_valid: Some(0),
                max_duration: Some(0),
            })
            .unwrap();
        assert_eq!(builder.core().block_number, Some(3933));
        assert_eq!(builder.core().era_period, 64);
    }

    #[test]
    fn test_bad_sender_and_hashes() {
        let mut builder = TransferBuilder::new();
        assert_eq!(
            builder.sender("not-an-address").unwrap_err().to_string(),
            "invalid address 'not-an-address'"
        );
        assert!(builder.block_hash("0x1234").is_err());
        assert!(builder.genesis_hash("abc").is_err());
    }

    #[test]
    fn test_from_raw_requires_network() {
        let mut builder = TransferBuilder::new();
        assert_eq!(
            builder.from_raw("0x00").unwrap_err(),
            TxError::build("Please set the network before parsing the transaction")
        );
    }

    #[test]
    fn test_sign_rejects_malformed_key() {
        let mut builder = TransferBuilder::new();
        assert_eq!(
            builder.sign(&BaseKey::new("zz")).unwrap_err(),
            TxError::build("Key validation failed")
        );
    }

    #[test]
    fn test_validate_raw_transaction() {
        let builder = TransferBuilder::new();
        assert!(builder.validate_raw_transaction("").is_err());
        assert!(builder.validate_raw_transaction("0xzz").is_err());
        assert!(builder.validate_raw_transaction("0x0102").is_ok());
    }
}

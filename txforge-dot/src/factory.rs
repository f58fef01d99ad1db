use tracing::{debug, warn};
use txforge_common::traits::{BaseTransactionBuilder, BaseTransactionBuilderFactory};
use txforge_common::types::BaseKey;
use txforge_common::utils::decode_hex;
use txforge_common::TxError;

use crate::builder::{
    AddProxyBuilder, BuilderCore, ProxyBuilder, StakeBuilder, TransactionBuilder, TransferBuilder, UnstakeBuilder,
};
use crate::codec::{decode_method, decode_raw, MethodName};
use crate::network::NetworkConfig;
use crate::transaction::Transaction;

const UNSUPPORTED: &str = "Transaction cannot be parsed or has an unsupported transaction type";

/// Any relay chain builder, as returned by [`TransactionBuilderFactory::from_raw`].
#[derive(Debug, Clone)]
pub enum DotBuilder {
    Transfer(TransferBuilder),
    Stake(StakeBuilder),
    Unstake(UnstakeBuilder),
    AddProxy(AddProxyBuilder),
    Proxy(ProxyBuilder),
}

macro_rules! dispatch {
    ($self:expr, $builder:ident => $body:expr) => {
        match $self {
            DotBuilder::Transfer($builder) => $body,
            DotBuilder::Stake($builder) => $body,
            DotBuilder::Unstake($builder) => $body,
            DotBuilder::AddProxy($builder) => $body,
            DotBuilder::Proxy($builder) => $body,
        }
    };
}

impl DotBuilder {
    pub fn method_name(&self) -> MethodName {
        match self {
            DotBuilder::Transfer(_) => MethodName::TransferKeepAlive,
            DotBuilder::Stake(_) => MethodName::Bond,
            DotBuilder::Unstake(_) => MethodName::Unbond,
            DotBuilder::AddProxy(_) => MethodName::AddProxy,
            DotBuilder::Proxy(_) => MethodName::Proxy,
        }
    }
}

impl TransactionBuilder for DotBuilder {
    fn core(&self) -> &BuilderCore {
        dispatch!(self, b => b.core())
    }

    fn core_mut(&mut self) -> &mut BuilderCore {
        dispatch!(self, b => b.core_mut())
    }
}

impl BaseTransactionBuilder for DotBuilder {
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

/// Hands out builders for one network and classifies raw transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilderFactory {
    network: Option<NetworkConfig>,
}

impl TransactionBuilderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network(&mut self, network: NetworkConfig) -> &mut Self {
        debug!(chain = %network.chain_name, "factory network selected");
        self.network = Some(network);
        self
    }

    pub fn testnet(&mut self) -> &mut Self {
        self.network(NetworkConfig::testnet())
    }

    pub fn westend(&mut self) -> &mut Self {
        self.network(NetworkConfig::westend())
    }

    pub fn mainnet(&mut self) -> &mut Self {
        self.network(NetworkConfig::mainnet())
    }

    pub fn network_config(&self) -> Option<&NetworkConfig> {
        self.network.as_ref()
    }

    fn builder<B: TransactionBuilder + Default>(&self) -> B {
        let mut builder = B::default();
        if let Some(network) = &self.network {
            builder.network(network);
        }
        builder
    }

    pub fn transfer_builder(&self) -> TransferBuilder {
        self.builder()
    }

    pub fn stake_builder(&self) -> StakeBuilder {
        self.builder()
    }

    pub fn unstake_builder(&self) -> UnstakeBuilder {
        self.builder()
    }

    pub fn add_proxy_builder(&self) -> AddProxyBuilder {
        self.builder()
    }

    /// Wallet initialization registers a proxy.
    pub fn wallet_initialization_builder(&self) -> AddProxyBuilder {
        self.add_proxy_builder()
    }

    pub fn proxy_builder(&self) -> ProxyBuilder {
        self.builder()
    }

    fn classify(&self, raw: &str, network: &NetworkConfig) -> Result<MethodName, TxError> {
        let bytes = decode_hex(raw).map_err(|_| TxError::not_supported(UNSUPPORTED))?;
        let decoded = decode_raw(&bytes)?;
        Ok(decode_method(decoded.method(), &network.pallets)?.name())
    }
}

impl BaseTransactionBuilderFactory for TransactionBuilderFactory {
    type Builder = DotBuilder;

    fn from_raw(&self, raw: &str) -> Result<DotBuilder, TxError> {
        let network = self
            .network
            .as_ref()
            .ok_or_else(|| TxError::build("Please set the network before parsing the transaction"))?;

        let name = self.classify(raw, network).map_err(|e| {
            warn!("⚠️ Could not classify raw transaction: {}", e);
            TxError::not_supported(UNSUPPORTED)
        })?;
        debug!(method = %name, "classified raw transaction");

        let mut builder = match name {
            MethodName::TransferKeepAlive => DotBuilder::Transfer(self.transfer_builder()),
            MethodName::Bond => DotBuilder::Stake(self.stake_builder()),
            MethodName::Unbond => DotBuilder::Unstake(self.unstake_builder()),
            MethodName::AddProxy => DotBuilder::AddProxy(self.add_proxy_builder()),
            MethodName::Proxy => DotBuilder::Proxy(self.proxy_builder()),
        };
        builder.from_raw(raw)?;
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Validity;
    use txforge_common::traits::BaseTransaction;

    const SIGNED_STAKE: &str = "0x4d02840061b18c6dc02ddcabdeac56cb4f21a971cc41cc97640f6f85b073480008c53a0d002f727310a5a1e2991edd4c51d723f0cdc4c065f7139a678ede2a27147953477490b50b4c5d8110ab38799e1ca1b627bb79014c9fb14c7b7733c24984ef2af90bd5012103000700009f7b0675db59d19b4bd9c8c72eaabba75a9863d02b30115b8b3c3ca5c20f02540b00203d88792d00";

    #[test]
    fn test_from_raw_dispatches_on_method() {
        let mut factory = TransactionBuilderFactory::new();
        factory.testnet();
        let builder = factory.from_raw(SIGNED_STAKE).unwrap();
        assert_eq!(builder.method_name(), MethodName::Bond);
        assert!(matches!(builder, DotBuilder::Stake(_)));
        assert_eq!(builder.core().nonce, Some(200));
    }

    #[test]
    fn test_unknown_call_is_not_supported() {
        let mut factory = TransactionBuilderFactory::new();
        factory.testnet();
        assert_eq!(
            factory.from_raw("0x0863010000").unwrap_err(),
            TxError::not_supported(UNSUPPORTED)
        );
        assert_eq!(factory.from_raw("xyz").unwrap_err(), TxError::not_supported(UNSUPPORTED));
    }

    #[test]
    fn test_from_raw_requires_network() {
        let factory = TransactionBuilderFactory::new();
        assert_eq!(
            factory.from_raw(SIGNED_STAKE).unwrap_err(),
            TxError::build("Please set the network before parsing the transaction")
        );
    }

    #[test]
    fn test_builders_inherit_network() {
        let mut factory = TransactionBuilderFactory::new();
        factory.westend();
        let builder = factory.wallet_initialization_builder();
        assert_eq!(builder.core().chain_name.as_deref(), Some("Westend"));
    }

    #[test]
    fn test_parsed_builder_signs_and_reloads() {
        let mut factory = TransactionBuilderFactory::new();
        factory.testnet();
        let mut builder = factory.from_raw(SIGNED_STAKE).unwrap();
        builder
            .sign(&BaseKey::new("874578010603af8e93b44bfc1d13b32830d0dbca6c89f28ccdc662afd3cdc824"))
            .unwrap()
            .from_raw(SIGNED_STAKE)
            .unwrap();
        builder
            .validity(Validity {
                first_valid: Some(3933),
                max_duration: Some(64),
            })
            .unwrap()
            .block_hash("0x149799bc9602cb5cf201f3425fb8d253b2d4e61fc119dcab3249f307f594754d")
            .unwrap()
            .transaction_version(7);

        let tx = builder.build().unwrap();
        assert!(tx.verify_signature());
        assert_eq!(tx.to_json().unwrap().nonce, 200);
    }
}

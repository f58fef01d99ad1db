use txforge_common::types::TransactionType;
use txforge_common::utils::decode_hex;
use txforge_common::TxError;

use super::{parse_account, required, type_mismatch, Builder, MethodBuilder};
use crate::address::AccountId;
use crate::codec::{decode_method, Method, MethodName, ProxyType};
use crate::network::PalletIndices;

/// Dispatches a call on behalf of another account that registered the sender as its proxy.
pub type ProxyBuilder = Builder<ProxyMethod>;

#[derive(Debug, Clone, Default)]
pub struct ProxyMethod {
    real: Option<AccountId>,
    force_proxy_type: Option<ProxyType>,
    call: Option<Vec<u8>>,
}

impl MethodBuilder for ProxyMethod {
    const EXPECTED: MethodName = MethodName::Proxy;

    fn transaction_type(&self) -> TransactionType {
        TransactionType::Send
    }

    fn build_method(&self, pallets: &PalletIndices) -> Result<Method, TxError> {
        let real = required(&self.real, "real")?;
        let call = required(&self.call, "call")?;
        decode_method(&call, pallets)?;
        Ok(Method::Proxy {
            real,
            force_proxy_type: self.force_proxy_type,
            call,
        })
    }

    fn load_method(&mut self, method: &Method) -> Result<(), TxError> {
        let Method::Proxy {
            real,
            force_proxy_type,
            call,
        } = method
        else {
            return Err(type_mismatch(method.name(), Self::EXPECTED));
        };
        self.real = Some(*real);
        self.force_proxy_type = *force_proxy_type;
        self.call = Some(call.clone());
        Ok(())
    }
}

impl ProxyBuilder {
    /// Account the call is dispatched for.
    pub fn owner(&mut self, address: &str) -> Result<&mut Self, TxError> {
        self.method.real = Some(parse_account(address)?);
        Ok(self)
    }

    pub fn force_proxy_type(&mut self, proxy_type: Option<ProxyType>) -> &mut Self {
        self.method.force_proxy_type = proxy_type;
        self
    }

    /// Wrapped call as `0x` hex, e.g. from [`crate::Transaction::method_hex`].
    ///
    /// Checked against the network's call table when one is configured.
    pub fn call(&mut self, method_hex: &str) -> Result<&mut Self, TxError> {
        let call = decode_hex(method_hex).map_err(|_| TxError::build(format!("Invalid call, got: {}", method_hex)))?;
        if let Some(pallets) = &self.core.pallets {
            decode_method(&call, pallets)?;
        }
        self.method.call = Some(call);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TransactionBuilder, TransferBuilder, Validity};
    use txforge_common::traits::{BaseTransaction, BaseTransactionBuilder};

    const ACCOUNT1_ADDR: &str = "5EGoFA95omzemRssELLDjVenNZ68aXyUeqtKQScXSEBvVJkr";
    const ACCOUNT2_ADDR: &str = "5Ffp1wJCPu4hzVDTo7XaMLqZSvSadyUQmxWPDw74CBjECSoq";
    const ACCOUNT3_ADDR: &str = "5GsG6P9EqkbmTrM1GE5bcQx9nsSq74KueiLa1kNZiwagFxW4";
    const BLOCK_HASH: &str = "0x149799bc9602cb5cf201f3425fb8d253b2d4e61fc119dcab3249f307f594754d";
    const VALIDITY: Validity = Validity {
        first_valid: Some(3933),
        max_duration: Some(64),
    };

    fn transfer_call() -> String {
        let mut transfer = TransferBuilder::new();
        transfer.testnet().transaction_version(7);
        transfer
            .sender(ACCOUNT2_ADDR)
            .unwrap()
            .validity(VALIDITY)
            .unwrap()
            .block_hash(BLOCK_HASH)
            .unwrap()
            .sequence_id(0)
            .unwrap();
        transfer.to(ACCOUNT3_ADDR).unwrap().amount("90034235235322").unwrap();
        transfer.build().unwrap().method_hex().unwrap()
    }

    fn proxy_builder() -> ProxyBuilder {
        let mut builder = ProxyBuilder::new();
        builder.testnet().transaction_version(7);
        builder
            .sender(ACCOUNT1_ADDR)
            .unwrap()
            .validity(VALIDITY)
            .unwrap()
            .block_hash(BLOCK_HASH)
            .unwrap()
            .sequence_id(200)
            .unwrap();
        builder
    }

    #[test]
    fn test_proxied_transfer_reports_inner_call() {
        let mut builder = proxy_builder();
        builder
            .owner(ACCOUNT2_ADDR)
            .unwrap()
            .force_proxy_type(Some(ProxyType::Any))
            .call(&transfer_call())
            .unwrap();
        let tx = builder.build().unwrap();
        assert_eq!(tx.transaction_type(), Some(TransactionType::Send));

        let json = tx.to_json().unwrap();
        assert_eq!(json.real.as_deref(), Some(ACCOUNT2_ADDR));
        assert_eq!(json.force_proxy_type, Some(ProxyType::Any));
        assert_eq!(json.to.as_deref(), Some(ACCOUNT3_ADDR));
        assert_eq!(json.amount.as_deref(), Some("90034235235322"));
    }

    #[test]
    fn test_round_trip_through_raw() {
        let mut builder = proxy_builder();
        builder.owner(ACCOUNT2_ADDR).unwrap().call(&transfer_call()).unwrap();
        let raw = builder.build().unwrap().to_broadcast_format().unwrap();

        let mut parsed = ProxyBuilder::new();
        parsed.testnet();
        parsed.from_raw(&raw).unwrap();
        parsed.sender(ACCOUNT1_ADDR).unwrap().validity(VALIDITY).unwrap();
        assert_eq!(parsed.build().unwrap().to_broadcast_format().unwrap(), raw);
    }

    #[test]
    fn test_call_is_checked_against_network() {
        let mut builder = proxy_builder();
        assert!(builder.call("0x6301").is_err());
        assert!(builder.call("not hex").is_err());
    }

    #[test]
    fn test_call_is_required() {
        let mut builder = proxy_builder();
        builder.owner(ACCOUNT2_ADDR).unwrap();
        assert_eq!(
            builder.build().unwrap_err().to_string(),
            "Transaction validation failed: \"call\" is required"
        );
    }
}

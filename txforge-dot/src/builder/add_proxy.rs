use txforge_common::types::TransactionType;
use txforge_common::utils::validate_number;
use txforge_common::TxError;

use super::{parse_account, required, type_mismatch, Builder, MethodBuilder};
use crate::address::AccountId;
use crate::codec::{Method, MethodName, ProxyType};
use crate::network::PalletIndices;

/// Registers a delegate allowed to act for the sender. Used for wallet initialization.
pub type AddProxyBuilder = Builder<AddProxyMethod>;

#[derive(Debug, Clone, Default)]
pub struct AddProxyMethod {
    delegate: Option<AccountId>,
    proxy_type: Option<ProxyType>,
    delay: Option<u32>,
}

impl MethodBuilder for AddProxyMethod {
    const EXPECTED: MethodName = MethodName::AddProxy;

    fn transaction_type(&self) -> TransactionType {
        TransactionType::WalletInitialization
    }

    fn build_method(&self, _pallets: &PalletIndices) -> Result<Method, TxError> {
        Ok(Method::AddProxy {
            delegate: required(&self.delegate, "owner")?,
            proxy_type: required(&self.proxy_type, "proxyType")?,
            delay: required(&self.delay, "delay")?,
        })
    }

    fn load_method(&mut self, method: &Method) -> Result<(), TxError> {
        let Method::AddProxy {
            delegate,
            proxy_type,
            delay,
        } = method
        else {
            return Err(type_mismatch(method.name(), Self::EXPECTED));
        };
        self.delegate = Some(*delegate);
        self.proxy_type = Some(*proxy_type);
        self.delay = Some(*delay);
        Ok(())
    }
}

impl AddProxyBuilder {
    /// Delegate account.
    pub fn owner(&mut self, address: &str) -> Result<&mut Self, TxError> {
        self.method.delegate = Some(parse_account(address)?);
        Ok(self)
    }

    pub fn proxy_type(&mut self, proxy_type: ProxyType) -> &mut Self {
        self.method.proxy_type = Some(proxy_type);
        self
    }

    /// Announcement delay in blocks.
    pub fn delay(&mut self, delay: i64) -> Result<&mut Self, TxError> {
        let delay = u32::try_from(validate_number(delay)?)
            .map_err(|_| TxError::build(format!("Invalid delay, got: {}", delay)))?;
        self.method.delay = Some(delay);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TransactionBuilder, Validity};
    use txforge_common::traits::{BaseTransaction, BaseTransactionBuilder};

    const ACCOUNT1_ADDR: &str = "5EGoFA95omzemRssELLDjVenNZ68aXyUeqtKQScXSEBvVJkr";
    const ACCOUNT2_ADDR: &str = "5Ffp1wJCPu4hzVDTo7XaMLqZSvSadyUQmxWPDw74CBjECSoq";

    fn builder() -> AddProxyBuilder {
        let mut builder = AddProxyBuilder::new();
        builder.testnet().transaction_version(7);
        builder
            .sender(ACCOUNT1_ADDR)
            .unwrap()
            .validity(Validity {
                first_valid: Some(3933),
                max_duration: Some(64),
            })
            .unwrap()
            .block_hash("0x149799bc9602cb5cf201f3425fb8d253b2d4e61fc119dcab3249f307f594754d")
            .unwrap()
            .sequence_id(200)
            .unwrap();
        builder
    }

    #[test]
    fn test_build_add_proxy() {
        let mut builder = builder();
        builder
            .owner(ACCOUNT2_ADDR)
            .unwrap()
            .proxy_type(ProxyType::Any)
            .delay(0)
            .unwrap();
        let tx = builder.build().unwrap();
        assert_eq!(tx.transaction_type(), Some(TransactionType::WalletInitialization));

        let json = tx.to_json().unwrap();
        assert_eq!(json.owner.as_deref(), Some(ACCOUNT2_ADDR));
        assert_eq!(json.proxy_type, Some(ProxyType::Any));
        assert_eq!(json.delay, Some(0));
    }

    #[test]
    fn test_delay_must_fit() {
        let mut builder = builder();
        assert_eq!(builder.delay(-1).unwrap_err(), TxError::build("Value cannot be less than zero"));
        assert!(builder.delay(i64::MAX).is_err());
    }

    #[test]
    fn test_missing_proxy_type() {
        let mut builder = builder();
        builder.owner(ACCOUNT2_ADDR).unwrap().delay(1).unwrap();
        assert_eq!(
            builder.build().unwrap_err().to_string(),
            "Transaction validation failed: \"proxyType\" is required"
        );
    }
}

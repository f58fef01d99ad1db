use txforge_common::types::TransactionType;
use txforge_common::utils::validate_value;
use txforge_common::TxError;

use super::{required, type_mismatch, Builder, MethodBuilder};
use crate::codec::{Method, MethodName};
use crate::network::PalletIndices;

/// Schedules bonded funds to be unlocked.
pub type UnstakeBuilder = Builder<UnstakeMethod>;

#[derive(Debug, Clone, Default)]
pub struct UnstakeMethod {
    amount: Option<u128>,
}

impl MethodBuilder for UnstakeMethod {
    const EXPECTED: MethodName = MethodName::Unbond;

    fn transaction_type(&self) -> TransactionType {
        TransactionType::StakingUnlock
    }

    fn build_method(&self, _pallets: &PalletIndices) -> Result<Method, TxError> {
        Ok(Method::Unbond {
            value: required(&self.amount, "amount")?,
        })
    }

    fn load_method(&mut self, method: &Method) -> Result<(), TxError> {
        let Method::Unbond { value } = method else {
            return Err(type_mismatch(method.name(), Self::EXPECTED));
        };
        self.amount = Some(*value);
        Ok(())
    }
}

impl UnstakeBuilder {
    pub fn amount(&mut self, amount: &str) -> Result<&mut Self, TxError> {
        self.method.amount = Some(validate_value(amount)?);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TransactionBuilder, Validity};
    use txforge_common::traits::{BaseTransaction, BaseTransactionBuilder};

    #[test]
    fn test_build_unbond() {
        let mut builder = UnstakeBuilder::new();
        builder.westend().transaction_version(5);
        builder
            .sender("5EGoFA95omzemRssELLDjVenNZ68aXyUeqtKQScXSEBvVJkr")
            .unwrap()
            .validity(Validity {
                first_valid: Some(100),
                max_duration: Some(64),
            })
            .unwrap()
            .block_hash("0x149799bc9602cb5cf201f3425fb8d253b2d4e61fc119dcab3249f307f594754d")
            .unwrap()
            .sequence_id(3)
            .unwrap();
        builder.amount("50000000000000").unwrap();

        let tx = builder.build().unwrap();
        assert_eq!(tx.transaction_type(), Some(TransactionType::StakingUnlock));
        assert_eq!(tx.method_hex().unwrap(), "0x06020b00203d88792d");

        let json = tx.to_json().unwrap();
        assert_eq!(json.amount.as_deref(), Some("50000000000000"));
        assert_eq!(json.chain_name, "Westend");
        assert_eq!(json.spec_name, "westend");
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let err = UnstakeBuilder::new().amount("-1").unwrap_err();
        assert_eq!(err, TxError::build("Value cannot be less than zero"));
    }
}

use txforge_common::types::TransactionType;
use txforge_common::utils::validate_value;
use txforge_common::TxError;

use super::{parse_account, required, type_mismatch, Builder, MethodBuilder};
use crate::address::AccountId;
use crate::codec::{Method, MethodName};
use crate::network::PalletIndices;

/// Balance transfer that keeps the sender above the existential deposit.
pub type TransferBuilder = Builder<TransferMethod>;

#[derive(Debug, Clone, Default)]
pub struct TransferMethod {
    to: Option<AccountId>,
    amount: Option<u128>,
}

impl MethodBuilder for TransferMethod {
    const EXPECTED: MethodName = MethodName::TransferKeepAlive;

    fn transaction_type(&self) -> TransactionType {
        TransactionType::Send
    }

    fn build_method(&self, _pallets: &PalletIndices) -> Result<Method, TxError> {
        Ok(Method::TransferKeepAlive {
            dest: required(&self.to, "to")?,
            value: required(&self.amount, "amount")?,
        })
    }

    fn load_method(&mut self, method: &Method) -> Result<(), TxError> {
        let Method::TransferKeepAlive { dest, value } = method else {
            return Err(type_mismatch(method.name(), Self::EXPECTED));
        };
        self.to = Some(*dest);
        self.amount = Some(*value);
        Ok(())
    }
}

impl TransferBuilder {
    /// Amount in planck.
    pub fn amount(&mut self, amount: &str) -> Result<&mut Self, TxError> {
        self.method.amount = Some(validate_value(amount)?);
        Ok(self)
    }

    pub fn to(&mut self, address: &str) -> Result<&mut Self, TxError> {
        self.method.to = Some(parse_account(address)?);
        Ok(self)
    }
}

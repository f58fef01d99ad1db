use txforge_common::types::TransactionType;
use txforge_common::utils::validate_value;
use txforge_common::TxError;

use super::{parse_account, required, type_mismatch, Builder, MethodBuilder};
use crate::address::AccountId;
use crate::codec::{Method, MethodName, Payee};
use crate::network::PalletIndices;

/// Bonds funds from the sender (stash) to a controller account.
pub type StakeBuilder = Builder<StakeMethod>;

#[derive(Debug, Clone)]
pub struct StakeMethod {
    controller: Option<AccountId>,
    amount: Option<u128>,
    payee: Payee,
}

impl Default for StakeMethod {
    fn default() -> Self {
        Self {
            controller: None,
            amount: None,
            payee: Payee::Staked,
        }
    }
}

impl MethodBuilder for StakeMethod {
    const EXPECTED: MethodName = MethodName::Bond;

    fn transaction_type(&self) -> TransactionType {
        TransactionType::StakingActivate
    }

    fn build_method(&self, _pallets: &PalletIndices) -> Result<Method, TxError> {
        Ok(Method::Bond {
            controller: required(&self.controller, "controller")?,
            value: required(&self.amount, "amount")?,
            payee: self.payee,
        })
    }

    fn load_method(&mut self, method: &Method) -> Result<(), TxError> {
        let Method::Bond {
            controller,
            value,
            payee,
        } = method
        else {
            return Err(type_mismatch(method.name(), Self::EXPECTED));
        };
        self.controller = Some(*controller);
        self.amount = Some(*value);
        self.payee = *payee;
        Ok(())
    }
}

impl StakeBuilder {
    pub fn amount(&mut self, amount: &str) -> Result<&mut Self, TxError> {
        self.method.amount = Some(validate_value(amount)?);
        Ok(self)
    }

    /// Controller account.
    pub fn owner(&mut self, address: &str) -> Result<&mut Self, TxError> {
        self.method.controller = Some(parse_account(address)?);
        Ok(self)
    }

    /// Reward destination. Defaults to [`Payee::Staked`].
    pub fn payee(&mut self, payee: Payee) -> &mut Self {
        self.method.payee = payee;
        self
    }

    /// Pays rewards to an arbitrary account.
    pub fn payee_account(&mut self, address: &str) -> Result<&mut Self, TxError> {
        self.method.payee = Payee::Account(parse_account(address)?);
        Ok(self)
    }
}

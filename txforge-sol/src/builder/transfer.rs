use txforge_common::types::TransactionType;
use txforge_common::TxError;

use super::{check_amount, check_public_key, Builder, BuilderKind};
use crate::instruction::{InstructionParams, MemoParams, TransferParams};
use crate::utils::is_valid_memo;

/// Lamport transfers with optional memos.
pub type TransferBuilder = Builder<Transfer>;

#[derive(Debug, Clone, Default)]
pub struct Transfer;

impl BuilderKind for Transfer {
    const TRANSACTION_TYPE: TransactionType = TransactionType::Send;
}

impl TransferBuilder {
    pub fn memo(&mut self, memo: &str) -> Result<&mut Self, TxError> {
        if memo.is_empty() {
            return Err(TxError::build(format!("Invalid memo, got: {}", memo)));
        }
        if !is_valid_memo(memo) {
            return Err(TxError::build("Memo is too long"));
        }
        self.instructions_data.push(InstructionParams::Memo(MemoParams {
            memo: memo.to_string(),
        }));
        Ok(self)
    }

    /// Adds one transfer. Can be called repeatedly.
    pub fn transfer(&mut self, from: &str, to: &str, amount: &str) -> Result<&mut Self, TxError> {
        check_public_key("fromAddress", from)?;
        check_public_key("toAddress", to)?;
        check_amount(&*self, amount)?;
        self.instructions_data.push(InstructionParams::Transfer(TransferParams {
            from_address: from.to_string(),
            to_address: to.to_string(),
            amount: amount.to_string(),
        }));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeyPair;
    use txforge_common::traits::{BaseKeyPair, BaseTransaction, BaseTransactionBuilder};
    use txforge_common::types::BaseKey;

    const BLOCKHASH: &str = "GHtXQBsoZHVnNFa9YevAzFr17DJjgHXk3ycTKD5xD3Zi";

    fn pair(n: u8) -> KeyPair {
        KeyPair::from_seed(&[n; 32]).unwrap()
    }

    #[test]
    fn test_memo_and_transfers_in_order() {
        let from = pair(1);
        let mut builder = TransferBuilder::new();
        builder
            .fee_payer(&from.address())
            .unwrap()
            .nonce(BLOCKHASH, None)
            .unwrap()
            .memo("test memo")
            .unwrap()
            .transfer(&from.address(), &pair(2).address(), "300000")
            .unwrap()
            .transfer(&from.address(), &pair(3).address(), "1")
            .unwrap();
        builder.sign(&BaseKey::new(from.keys().private.unwrap())).unwrap();

        let tx = builder.build().unwrap();
        let json = tx.to_json().unwrap();
        assert_eq!(json.fee_multiplier, 1);
        assert_eq!(json.instructions_data.len(), 3);
        assert_eq!(
            json.instructions_data[0],
            InstructionParams::Memo(MemoParams { memo: "test memo".into() })
        );
        assert_eq!(
            json.instructions_data[2],
            InstructionParams::Transfer(TransferParams {
                from_address: from.address(),
                to_address: pair(3).address(),
                amount: "1".into(),
            })
        );
        assert!(tx.verify_signatures());
    }

    #[test]
    fn test_memo_limits() {
        let mut builder = TransferBuilder::new();
        assert_eq!(builder.memo("").unwrap_err(), TxError::build("Invalid memo, got: "));
        assert_eq!(
            builder.memo(&"x".repeat(257)).unwrap_err(),
            TxError::build("Memo is too long")
        );
        assert!(builder.memo(&"x".repeat(256)).is_ok());
    }

    #[test]
    fn test_transfer_argument_errors() {
        let mut builder = TransferBuilder::new();
        let from = pair(1).address();
        assert_eq!(
            builder.transfer("bad", &from, "1").unwrap_err(),
            TxError::build("Invalid or missing fromAddress, got: bad")
        );
        assert_eq!(
            builder.transfer(&from, "", "1").unwrap_err(),
            TxError::build("Invalid or missing toAddress, got: ")
        );
        assert_eq!(
            builder.transfer(&from, &from, "randomstring").unwrap_err(),
            TxError::build("Invalid or missing amount, got: randomstring")
        );
        assert_eq!(
            builder.transfer(&from, &from, "-1").unwrap_err(),
            TxError::build("Value cannot be less than zero")
        );
        assert!(builder.instructions_data().is_empty());
    }
}

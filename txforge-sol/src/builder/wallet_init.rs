use txforge_common::types::TransactionType;
use txforge_common::TxError;

use super::{check_amount, check_public_key, Builder, BuilderKind};
use crate::instruction::{InstructionParams, WalletInitParams};

/// Creates and initializes a nonce account funded by, and under the authority of, the sender.
pub type WalletInitializationBuilder = Builder<WalletInit>;

#[derive(Debug, Clone, Default)]
pub struct WalletInit;

impl BuilderKind for WalletInit {
    const TRANSACTION_TYPE: TransactionType = TransactionType::WalletInitialization;
}

impl WalletInitializationBuilder {
    pub fn wallet_init(&mut self, from: &str, nonce: &str, auth: &str, amount: &str) -> Result<&mut Self, TxError> {
        check_public_key("fromAddress", from)?;
        check_public_key("nonceAddress", nonce)?;
        if from == nonce {
            return Err(TxError::build("nonceAddress cant be equal to fromAddress"));
        }
        check_public_key("authAddress", auth)?;
        if from != auth {
            return Err(TxError::build("authAddress has to be equal to fromAddress"));
        }
        check_amount(&*self, amount)?;

        self.instructions_data
            .push(InstructionParams::CreateNonceAccount(WalletInitParams {
                from_address: from.to_string(),
                nonce_address: nonce.to_string(),
                auth_address: auth.to_string(),
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

    const BLOCKHASH: &str = "GHtXQBsoZHVnNFa9YevAzFr17DJjgHXk3ycTKD5xD3Zi";

    fn address(n: u8) -> String {
        KeyPair::from_seed(&[n; 32]).unwrap().address()
    }

    #[test]
    fn test_wallet_init_builds() {
        let mut builder = WalletInitializationBuilder::new();
        builder
            .fee_payer(&address(1))
            .unwrap()
            .nonce(BLOCKHASH, None)
            .unwrap()
            .wallet_init(&address(1), &address(2), &address(1), "300000")
            .unwrap();
        let tx = builder.build().unwrap();
        assert_eq!(tx.transaction_type(), Some(TransactionType::WalletInitialization));

        let json = tx.to_json().unwrap();
        assert_eq!(json.fee_payer, Some(address(1)));
        assert_eq!(json.nonce, BLOCKHASH);
        assert_eq!(
            json.instructions_data,
            vec![InstructionParams::CreateNonceAccount(WalletInitParams {
                from_address: address(1),
                nonce_address: address(2),
                auth_address: address(1),
                amount: "300000".into(),
            })]
        );
    }

    #[test]
    fn test_wallet_init_address_rules() {
        let mut builder = WalletInitializationBuilder::new();
        assert_eq!(
            builder
                .wallet_init(&address(1), &address(1), &address(1), "300000")
                .unwrap_err(),
            TxError::build("nonceAddress cant be equal to fromAddress")
        );
        assert_eq!(
            builder
                .wallet_init(&address(1), &address(2), &address(3), "300000")
                .unwrap_err(),
            TxError::build("authAddress has to be equal to fromAddress")
        );
        assert_eq!(
            builder
                .wallet_init(&address(1), &address(2), &address(1), "randomstring")
                .unwrap_err(),
            TxError::build("Invalid or missing amount, got: randomstring")
        );
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let err = WalletInitializationBuilder::new()
            .wallet_init(&address(1), &address(2), &address(1), "-1")
            .unwrap_err();
        assert_eq!(err, TxError::build("Value cannot be less than zero"));
    }
}

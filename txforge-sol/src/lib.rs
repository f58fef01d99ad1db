//! Build, sign and parse system program transactions for an ed25519, base58 addressed chain.
//!
//! ```rust
//! use txforge_sol::prelude::*;
//!
//! let sender = KeyPair::from_seed(&[1u8; 32])?;
//! let nonce_account = KeyPair::from_seed(&[2u8; 32])?;
//!
//! let mut builder = TransactionBuilderFactory::new().wallet_initialization_builder();
//! builder
//!     .fee_payer(&sender.address())?
//!     .nonce("GHtXQBsoZHVnNFa9YevAzFr17DJjgHXk3ycTKD5xD3Zi", None)?
//!     .wallet_init(&sender.address(), &nonce_account.address(), &sender.address(), "300000")?;
//! builder.sign(&BaseKey::new(sender.keys().private.unwrap_or_default()))?;
//! builder.sign(&BaseKey::new(nonce_account.keys().private.unwrap_or_default()))?;
//!
//! let tx = builder.build()?;
//! assert_eq!(tx.signature().len(), 2);
//! # Ok::<(), txforge_common::TxError>(())
//! ```

pub mod builder;
pub mod codec;
pub mod constants;
pub mod factory;
pub mod instruction;
pub mod keypair;
pub mod pubkey;
pub mod transaction;
pub mod utils;

pub use builder::{Builder, BuilderKind, DurableNonceParams, TransferBuilder, WalletInitializationBuilder};
pub use factory::{SolBuilder, TransactionBuilderFactory};
pub use instruction::InstructionParams;
pub use keypair::KeyPair;
pub use pubkey::Pubkey;
pub use transaction::{Transaction, TxData};

pub mod prelude {
    pub use crate::{
        DurableNonceParams, InstructionParams, KeyPair, Pubkey, SolBuilder, Transaction, TransactionBuilderFactory,
    };
    pub use txforge_common::traits::{
        BaseKeyPair, BaseTransaction, BaseTransactionBuilder, BaseTransactionBuilderFactory,
    };
    pub use txforge_common::types::{BaseKey, TransactionType};
}

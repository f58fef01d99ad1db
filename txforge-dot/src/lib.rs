//! Build, sign and parse relay chain (SCALE encoded) transactions.
//!
//! ```rust
//! use txforge_dot::prelude::*;
//!
//! let mut factory = TransactionBuilderFactory::new();
//! factory.testnet();
//!
//! let mut builder = factory.transfer_builder();
//! builder
//!     .sender("5EGoFA95omzemRssELLDjVenNZ68aXyUeqtKQScXSEBvVJkr")?
//!     .validity(Validity { first_valid: Some(3933), max_duration: Some(64) })?
//!     .block_hash("0x149799bc9602cb5cf201f3425fb8d253b2d4e61fc119dcab3249f307f594754d")?
//!     .sequence_id(200)?
//!     .transaction_version(7);
//! builder
//!     .to("5Ffp1wJCPu4hzVDTo7XaMLqZSvSadyUQmxWPDw74CBjECSoq")?
//!     .amount("1000000000000")?;
//!
//! let tx = builder.build()?;
//! assert!(tx.to_broadcast_format()?.starts_with("0xa405"));
//! # Ok::<(), txforge_common::TxError>(())
//! ```

pub mod address;
pub mod builder;
pub mod codec;
pub mod factory;
pub mod keypair;
pub mod network;
pub mod transaction;

pub use builder::{
    AddProxyBuilder, Builder, ProxyBuilder, StakeBuilder, TransactionBuilder, TransferBuilder, UnstakeBuilder,
    Validity,
};
pub use codec::{Payee, ProxyType};
pub use factory::{DotBuilder, TransactionBuilderFactory};
pub use keypair::KeyPair;
pub use network::{NetworkConfig, PalletIndices};
pub use transaction::{Transaction, TxData};

pub mod prelude {
    pub use crate::{
        DotBuilder, KeyPair, NetworkConfig, Payee, ProxyType, Transaction, TransactionBuilder,
        TransactionBuilderFactory, Validity,
    };
    pub use txforge_common::traits::{
        BaseKeyPair, BaseTransaction, BaseTransactionBuilder, BaseTransactionBuilderFactory,
    };
    pub use txforge_common::types::{BaseKey, TransactionType};
}

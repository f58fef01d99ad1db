pub mod address;
pub mod crypto;
pub mod errors;
pub mod traits;
pub mod types;
pub mod utils;

pub use errors::TxError;
pub use types::{BaseKey, DefaultKeys, TransactionType};

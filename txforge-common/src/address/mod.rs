pub mod base58;
pub mod errors;

pub use errors::AddressError;

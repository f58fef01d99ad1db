use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use txforge_common::address::{base58, AddressError};

pub const PUBLIC_KEY_LENGTH: usize = 32;

/// A 32-byte account address, displayed as base58.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pubkey([u8; PUBLIC_KEY_LENGTH]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        base58::decode_fixed::<PUBLIC_KEY_LENGTH>(s).map(Pubkey)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base58::encode(&self.0))
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for Pubkey {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Pubkey(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let key = Pubkey::new([9u8; 32]);
        let text = key.to_string();
        assert_eq!(text.parse::<Pubkey>().unwrap(), key);
        assert_eq!(
            "3DEf".parse::<Pubkey>().unwrap_err(),
            AddressError::InvalidLength(3)
        );
        assert!("0OIl".parse::<Pubkey>().is_err());
    }
}

use serde::{Deserialize, Serialize};

/// Operation kind recorded on every built or parsed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Send,
    WalletInitialization,
    StakingActivate,
    StakingUnlock,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TransactionType::Send => "Send",
            TransactionType::WalletInitialization => "WalletInitialization",
            TransactionType::StakingActivate => "StakingActivate",
            TransactionType::StakingUnlock => "StakingUnlock",
        };
        write!(f, "{}", name)
    }
}

/// A private key as handed to `sign()`, in the chain's canonical text encoding.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseKey {
    pub key: String,
}

impl BaseKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl std::fmt::Debug for BaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BaseKey(..)")
    }
}

impl From<&str> for BaseKey {
    fn from(key: &str) -> Self {
        BaseKey::new(key)
    }
}

impl From<String> for BaseKey {
    fn from(key: String) -> Self {
        BaseKey::new(key)
    }
}

/// Public key and, when present, private key in display encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultKeys {
    #[serde(rename = "pub")]
    pub public: String,
    #[serde(rename = "prv", skip_serializing_if = "Option::is_none")]
    pub private: Option<String>,
}

/// Raw byte form of [`DefaultKeys`].
#[derive(Clone, PartialEq, Eq)]
pub struct RawKeys {
    pub public: Vec<u8>,
    pub private: Option<Vec<u8>>,
}

impl std::fmt::Debug for RawKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawKeys")
            .field("public", &hex::encode(&self.public))
            .field("private", &self.private.as_ref().map(|_| ".."))
            .finish()
    }
}

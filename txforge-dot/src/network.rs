use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::address::GENERIC_SUBSTRATE_FORMAT;

/// Pallet indices of the calls the codec knows how to build. This is the slice of the
/// runtime registry the method codec needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletIndices {
    pub balances: u8,
    pub staking: u8,
    pub proxy: u8,
}

impl PalletIndices {
    pub const POLKADOT: PalletIndices = PalletIndices {
        balances: 0x05,
        staking: 0x07,
        proxy: 0x1d,
    };

    pub const WESTEND: PalletIndices = PalletIndices {
        balances: 0x04,
        staking: 0x06,
        proxy: 0x1e,
    };
}

/// Network identity bundle: everything a builder needs besides per-transaction fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub spec_name: String,
    pub chain_name: String,
    pub genesis_hash: String,
    pub spec_version: u32,
    pub ss58_format: u16,
    /// Opaque runtime metadata blob, kept for callers that forward it to other tools.
    #[serde(default)]
    pub metadata: String,
    pub pallets: PalletIndices,
}

impl NetworkConfig {
    pub fn testnet() -> Self {
        Self {
            spec_name: "polkadot".to_string(),
            chain_name: "Polkadot".to_string(),
            genesis_hash: "0x2b8d4fdbb41f4bc15b8a7ec8ed0687f2a1ae11e0fc2dc6604fa962a9421ae349".to_string(),
            spec_version: 9100,
            ss58_format: GENERIC_SUBSTRATE_FORMAT,
            metadata: String::new(),
            pallets: PalletIndices::POLKADOT,
        }
    }

    pub fn westend() -> Self {
        Self {
            spec_name: "westend".to_string(),
            chain_name: "Westend".to_string(),
            genesis_hash: "0xe143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e".to_string(),
            spec_version: 9122,
            ss58_format: GENERIC_SUBSTRATE_FORMAT,
            metadata: String::new(),
            pallets: PalletIndices::WESTEND,
        }
    }

    pub fn mainnet() -> Self {
        Self {
            spec_name: "polkadot".to_string(),
            chain_name: "Polkadot".to_string(),
            genesis_hash: "0x91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3".to_string(),
            spec_version: 9122,
            ss58_format: 0,
            metadata: String::new(),
            pallets: PalletIndices::POLKADOT,
        }
    }

    /// Looks up a built-in network by name (`testnet`, `westend`, `mainnet`).
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "testnet" => Some(Self::testnet()),
            "westend" => Some(Self::westend()),
            "mainnet" => Some(Self::mainnet()),
            _ => None,
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, json)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

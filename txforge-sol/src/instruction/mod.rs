//! Instruction parameter sets and the system/memo program instruction codec.

mod build;
mod parser;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use txforge_common::TxError;

use crate::codec::Instruction;
use crate::constants::{MEMO_PROGRAM_ID, SYSTEM_PROGRAM_ID};
use crate::pubkey::Pubkey;

pub use build::build_instructions;
pub use parser::{parse_instructions, transaction_type_of};

/// One logical operation of a transaction, as the builders accumulate it and as
/// `to_json` reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum InstructionParams {
    Memo(MemoParams),
    NonceAdvance(NonceParams),
    Transfer(TransferParams),
    CreateNonceAccount(WalletInitParams),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoParams {
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonceParams {
    pub wallet_nonce_pub_key: String,
    pub auth_wallet_pub_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferParams {
    pub from_address: String,
    pub to_address: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInitParams {
    pub from_address: String,
    pub nonce_address: String,
    pub auth_address: String,
    pub amount: String,
}

impl FromStr for InstructionParams {
    type Err = TxError;

    /// Parses the `{"type": ..., "params": {...}}` JSON form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|_| TxError::not_supported("Invalid instruction type or not supported"))
    }
}

/// System program instructions, in on-chain discriminant order. Serialized with bincode
/// (u32 LE variant index, fixed-width LE integers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemInstruction {
    CreateAccount { lamports: u64, space: u64, owner: Pubkey },
    Assign { owner: Pubkey },
    Transfer { lamports: u64 },
    CreateAccountWithSeed { base: Pubkey, seed: String, lamports: u64, space: u64, owner: Pubkey },
    AdvanceNonceAccount,
    WithdrawNonceAccount(u64),
    InitializeNonceAccount(Pubkey),
    AuthorizeNonceAccount(Pubkey),
    Allocate { space: u64 },
}

impl SystemInstruction {
    pub fn encode(&self) -> Result<Vec<u8>, TxError> {
        bincode::serialize(self).map_err(|e| TxError::build(format!("Failed to encode instruction: {}", e)))
    }

    pub fn decode(data: &[u8]) -> Option<Self> {
        bincode::deserialize(data).ok()
    }
}

/// What an instruction turned out to be once its program and data were inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedInstruction {
    Memo(String),
    System(SystemInstruction),
    Unknown,
}

impl DecodedInstruction {
    pub fn decode(instruction: &Instruction) -> Self {
        if instruction.program_id == MEMO_PROGRAM_ID {
            return match String::from_utf8(instruction.data.clone()) {
                Ok(memo) => DecodedInstruction::Memo(memo),
                Err(_) => DecodedInstruction::Unknown,
            };
        }
        if instruction.program_id == SYSTEM_PROGRAM_ID {
            if let Some(system) = SystemInstruction::decode(&instruction.data) {
                return DecodedInstruction::System(system);
            }
        }
        DecodedInstruction::Unknown
    }

    /// Name used in classification errors.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedInstruction::Memo(_) => "Memo",
            DecodedInstruction::System(system) => match system {
                SystemInstruction::CreateAccount { .. } => "Create",
                SystemInstruction::Assign { .. } => "Assign",
                SystemInstruction::Transfer { .. } => "Transfer",
                SystemInstruction::CreateAccountWithSeed { .. } => "CreateWithSeed",
                SystemInstruction::AdvanceNonceAccount => "AdvanceNonceAccount",
                SystemInstruction::WithdrawNonceAccount(_) => "WithdrawNonceAccount",
                SystemInstruction::InitializeNonceAccount(_) => "InitializeNonceAccount",
                SystemInstruction::AuthorizeNonceAccount(_) => "AuthorizeNonceAccount",
                SystemInstruction::Allocate { .. } => "Allocate",
            },
            DecodedInstruction::Unknown => "Unknown",
        }
    }
}

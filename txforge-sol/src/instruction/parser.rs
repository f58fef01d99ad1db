use tracing::debug;
use txforge_common::types::TransactionType;
use txforge_common::TxError;

use super::{
    DecodedInstruction, InstructionParams, MemoParams, NonceParams, SystemInstruction, TransferParams,
    WalletInitParams,
};
use crate::codec::Instruction;

const UNSUPPORTED_PATTERN: &str = "Invalid Transaction - Unsupported TX type";

fn account(instruction: &Instruction, index: usize) -> Result<String, TxError> {
    instruction
        .accounts
        .get(index)
        .map(|meta| meta.pubkey.to_string())
        .ok_or_else(|| TxError::invalid_tx(format!("Instruction is missing account {}", index)))
}

fn decode_all(instructions: &[Instruction]) -> Result<Vec<DecodedInstruction>, TxError> {
    instructions
        .iter()
        .map(|ix| match DecodedInstruction::decode(ix) {
            decoded @ (DecodedInstruction::Memo(_)
            | DecodedInstruction::System(
                SystemInstruction::Transfer { .. }
                | SystemInstruction::AdvanceNonceAccount
                | SystemInstruction::CreateAccount { .. }
                | SystemInstruction::InitializeNonceAccount(_),
            )) => Ok(decoded),
            other => Err(TxError::not_supported(format!(
                "Invalid transaction, instruction type not supported: {}",
                other.kind()
            ))),
        })
        .collect()
}

fn is_wallet_init_step(decoded: &DecodedInstruction) -> bool {
    matches!(
        decoded,
        DecodedInstruction::System(SystemInstruction::CreateAccount { .. } | SystemInstruction::InitializeNonceAccount(_))
    )
}

/// Classifies an instruction list. A create/initialize nonce account pair (optionally after a
/// nonce advance) is a wallet initialization; memo, nonce advance and transfer sequences are sends.
pub fn transaction_type_of(instructions: &[Instruction]) -> Result<TransactionType, TxError> {
    let decoded = decode_all(instructions)?;
    if !decoded.iter().any(is_wallet_init_step) {
        return Ok(TransactionType::Send);
    }

    let body = match decoded.first() {
        Some(DecodedInstruction::System(SystemInstruction::AdvanceNonceAccount)) => &decoded[1..],
        _ => &decoded[..],
    };
    match body {
        [DecodedInstruction::System(SystemInstruction::CreateAccount { .. }), DecodedInstruction::System(SystemInstruction::InitializeNonceAccount(_))] => {
            Ok(TransactionType::WalletInitialization)
        }
        _ => Err(TxError::invalid_tx(UNSUPPORTED_PATTERN)),
    }
}

/// Recovers the parameter sets a builder would have used to produce `instructions`.
pub fn parse_instructions(
    transaction_type: TransactionType,
    instructions: &[Instruction],
) -> Result<Vec<InstructionParams>, TxError> {
    let params = match transaction_type {
        TransactionType::Send => parse_send(instructions)?,
        TransactionType::WalletInitialization => parse_wallet_init(instructions)?,
        other => {
            return Err(TxError::not_supported(format!(
                "Invalid transaction, transaction type not supported: {}",
                other
            )))
        }
    };
    debug!(kind = %transaction_type, count = params.len(), "parsed instructions");
    Ok(params)
}

fn parse_send(instructions: &[Instruction]) -> Result<Vec<InstructionParams>, TxError> {
    let decoded = decode_all(instructions)?;
    instructions
        .iter()
        .zip(decoded)
        .map(|(ix, decoded)| match decoded {
            DecodedInstruction::Memo(memo) => Ok(InstructionParams::Memo(MemoParams { memo })),
            DecodedInstruction::System(SystemInstruction::AdvanceNonceAccount) => advance_nonce(ix),
            DecodedInstruction::System(SystemInstruction::Transfer { lamports }) => {
                Ok(InstructionParams::Transfer(TransferParams {
                    from_address: account(ix, 0)?,
                    to_address: account(ix, 1)?,
                    amount: lamports.to_string(),
                }))
            }
            other => Err(TxError::not_supported(format!(
                "Invalid transaction, instruction type not supported: {}",
                other.kind()
            ))),
        })
        .collect()
}

fn advance_nonce(ix: &Instruction) -> Result<InstructionParams, TxError> {
    Ok(InstructionParams::NonceAdvance(NonceParams {
        wallet_nonce_pub_key: account(ix, 0)?,
        auth_wallet_pub_key: account(ix, 2)?,
    }))
}

fn parse_wallet_init(instructions: &[Instruction]) -> Result<Vec<InstructionParams>, TxError> {
    let mut params = Vec::with_capacity(2);
    let mut rest = instructions;
    if let Some(first) = instructions.first() {
        if DecodedInstruction::decode(first) == DecodedInstruction::System(SystemInstruction::AdvanceNonceAccount) {
            params.push(advance_nonce(first)?);
            rest = &instructions[1..];
        }
    }

    let [create, initialize] = rest else {
        return Err(TxError::invalid_tx(UNSUPPORTED_PATTERN));
    };
    let (lamports, authority) = match (DecodedInstruction::decode(create), DecodedInstruction::decode(initialize)) {
        (
            DecodedInstruction::System(SystemInstruction::CreateAccount { lamports, .. }),
            DecodedInstruction::System(SystemInstruction::InitializeNonceAccount(authority)),
        ) => (lamports, authority),
        _ => return Err(TxError::invalid_tx(UNSUPPORTED_PATTERN)),
    };

    params.push(InstructionParams::CreateNonceAccount(WalletInitParams {
        from_address: account(create, 0)?,
        nonce_address: account(initialize, 0)?,
        auth_address: authority.to_string(),
        amount: lamports.to_string(),
    }));
    Ok(params)
}

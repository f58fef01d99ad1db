use txforge_common::TxError;

use super::{InstructionParams, MemoParams, NonceParams, SystemInstruction, TransferParams, WalletInitParams};
use crate::codec::{AccountMeta, Instruction};
use crate::constants::{MEMO_PROGRAM_ID, NONCE_ACCOUNT_SPACE, SYSTEM_PROGRAM_ID, SYSVAR_RECENT_BLOCKHASHES_ID, SYSVAR_RENT_ID};
use crate::pubkey::Pubkey;

fn pubkey(value: &str, field: &str) -> Result<Pubkey, TxError> {
    value
        .parse()
        .map_err(|_| TxError::build(format!("Invalid or missing {}, got: {}", field, value)))
}

fn lamports(value: &str) -> Result<u64, TxError> {
    value
        .parse()
        .map_err(|_| TxError::build(format!("Invalid or missing amount, got: {}", value)))
}

fn system(accounts: Vec<AccountMeta>, instruction: SystemInstruction) -> Result<Instruction, TxError> {
    Ok(Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts,
        data: instruction.encode()?,
    })
}

/// Expands one parameter set into the program instructions that carry it out.
pub fn build_instructions(params: &InstructionParams) -> Result<Vec<Instruction>, TxError> {
    match params {
        InstructionParams::NonceAdvance(nonce) => advance_nonce(nonce).map(|ix| vec![ix]),
        InstructionParams::Memo(memo) => Ok(vec![memo_instruction(memo)]),
        InstructionParams::Transfer(transfer) => transfer_instruction(transfer).map(|ix| vec![ix]),
        InstructionParams::CreateNonceAccount(wallet_init) => create_nonce_account(wallet_init),
    }
}

fn advance_nonce(params: &NonceParams) -> Result<Instruction, TxError> {
    let nonce = pubkey(&params.wallet_nonce_pub_key, "walletNoncePubKey")?;
    let authority = pubkey(&params.auth_wallet_pub_key, "authWalletPubKey")?;
    system(
        vec![
            AccountMeta::new(nonce, false),
            AccountMeta::new_readonly(SYSVAR_RECENT_BLOCKHASHES_ID, false),
            AccountMeta::new_readonly(authority, true),
        ],
        SystemInstruction::AdvanceNonceAccount,
    )
}

fn memo_instruction(params: &MemoParams) -> Instruction {
    Instruction {
        program_id: MEMO_PROGRAM_ID,
        accounts: vec![],
        data: params.memo.as_bytes().to_vec(),
    }
}

fn transfer_instruction(params: &TransferParams) -> Result<Instruction, TxError> {
    let from = pubkey(&params.from_address, "fromAddress")?;
    let to = pubkey(&params.to_address, "toAddress")?;
    system(
        vec![AccountMeta::new(from, true), AccountMeta::new(to, false)],
        SystemInstruction::Transfer {
            lamports: lamports(&params.amount)?,
        },
    )
}

/// Funds a new nonce account and initializes it with its authority.
fn create_nonce_account(params: &WalletInitParams) -> Result<Vec<Instruction>, TxError> {
    let from = pubkey(&params.from_address, "fromAddress")?;
    let nonce = pubkey(&params.nonce_address, "nonceAddress")?;
    let authority = pubkey(&params.auth_address, "authAddress")?;

    let create = system(
        vec![AccountMeta::new(from, true), AccountMeta::new(nonce, true)],
        SystemInstruction::CreateAccount {
            lamports: lamports(&params.amount)?,
            space: NONCE_ACCOUNT_SPACE,
            owner: SYSTEM_PROGRAM_ID,
        },
    )?;
    let initialize = system(
        vec![
            AccountMeta::new(nonce, false),
            AccountMeta::new_readonly(SYSVAR_RECENT_BLOCKHASHES_ID, false),
            AccountMeta::new_readonly(SYSVAR_RENT_ID, false),
        ],
        SystemInstruction::InitializeNonceAccount(authority),
    )?;
    Ok(vec![create, initialize])
}

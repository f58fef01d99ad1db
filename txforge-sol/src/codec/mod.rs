pub mod message;
pub mod shortvec;
pub mod wire;

use thiserror::Error;
use txforge_common::TxError;

pub use message::{AccountMeta, CompiledInstruction, Instruction, Message, MessageHeader};
pub use wire::WireTransaction;

/// Failures while reading or compiling wire bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unexpected end of input")]
    UnexpectedEof,

    #[error("Invalid compact-u16 length")]
    InvalidLength,

    #[error("Unexpected trailing bytes: {0}")]
    TrailingBytes(usize),

    #[error("Account index {0} out of range")]
    AccountIndex(u8),

    #[error("Too many accounts: {0}")]
    TooManyAccounts(usize),

    #[error("Signature count {found} does not match {expected} required signers")]
    SignatureCount { expected: usize, found: usize },
}

impl From<CodecError> for TxError {
    fn from(err: CodecError) -> Self {
        TxError::parse(format!("Failed to decode transaction: {}", err))
    }
}

pub(crate) fn read_bytes<'a>(input: &mut &'a [u8], len: usize) -> Result<&'a [u8], CodecError> {
    if input.len() < len {
        return Err(CodecError::UnexpectedEof);
    }
    let (head, rest) = input.split_at(len);
    *input = rest;
    Ok(head)
}

pub(crate) fn read_array<const N: usize>(input: &mut &[u8]) -> Result<[u8; N], CodecError> {
    let mut out = [0u8; N];
    out.copy_from_slice(read_bytes(input, N)?);
    Ok(out)
}

pub(crate) fn read_u8(input: &mut &[u8]) -> Result<u8, CodecError> {
    let [byte] = read_array::<1>(input)?;
    Ok(byte)
}

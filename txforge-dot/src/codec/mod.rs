pub mod era;
pub mod extrinsic;
pub mod method;

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use parity_scale_codec::{Compact, Decode, Encode};
use thiserror::Error;
use txforge_common::TxError;

pub use era::Era;
pub use extrinsic::{decode_raw, RawExtrinsic, SignedExtrinsic, SigningPayload};
pub use method::{decode_inner_call, decode_method, resolve_call, Method, MethodName, Payee, ProxyType};

type Blake2b256 = Blake2b<U32>;

/// Failures while decoding SCALE bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("SCALE decoding failed: {0}")]
    Scale(String),

    #[error("Unknown call index: pallet {pallet}, call {call}")]
    UnknownCall { pallet: u8, call: u8 },

    #[error("Unexpected trailing bytes: {0}")]
    TrailingBytes(usize),

    #[error("Unsupported extrinsic version: {0:#04x}")]
    UnsupportedVersion(u8),

    #[error("Unsupported signature type: {0}")]
    UnsupportedSignature(u8),
}

impl From<parity_scale_codec::Error> for CodecError {
    fn from(err: parity_scale_codec::Error) -> Self {
        CodecError::Scale(err.to_string())
    }
}

impl From<CodecError> for TxError {
    fn from(err: CodecError) -> Self {
        TxError::parse(format!("Failed to decode transaction: {}", err))
    }
}

pub fn blake2_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Compact encoding depends only on the value, so every width goes through `u128`.
pub(crate) fn encode_compact(value: impl Into<u128>, out: &mut Vec<u8>) {
    Compact::<u128>(value.into()).encode_to(out);
}

pub(crate) fn decode_compact<T>(input: &mut &[u8]) -> Result<T, CodecError>
where
    Compact<T>: Decode,
{
    Ok(Compact::<T>::decode(input)?.0)
}

pub(crate) fn read_array<const N: usize>(input: &mut &[u8]) -> Result<[u8; N], CodecError> {
    Ok(<[u8; N]>::decode(input)?)
}

pub(crate) fn ensure_consumed(input: &[u8]) -> Result<(), CodecError> {
    if input.is_empty() {
        Ok(())
    } else {
        Err(CodecError::TrailingBytes(input.len()))
    }
}

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::errors::TxError;

pub const NEGATIVE_VALUE: &str = "Value cannot be less than zero";

/// Parses a decimal amount in the chain's smallest unit.
///
/// Negative values fail with `Value cannot be less than zero`; anything that is not
/// a plain non-negative integer fails with `Invalid amount, got: <value>`.
pub fn validate_value(value: &str) -> Result<u128, TxError> {
    let trimmed = value.trim();
    if let Some(rest) = trimmed.strip_prefix('-') {
        if is_decimal_number(rest) {
            return Err(TxError::build(NEGATIVE_VALUE));
        }
    }
    trimmed
        .parse::<u128>()
        .ok()
        .filter(|_| !trimmed.starts_with('+'))
        .ok_or_else(|| TxError::build(format!("Invalid amount, got: {}", value)))
}

/// Same rule as [`validate_value`] for plain integer inputs such as nonces and block numbers.
pub fn validate_number(value: i64) -> Result<u64, TxError> {
    u64::try_from(value).map_err(|_| TxError::build(NEGATIVE_VALUE))
}

/// Returns true for a non-negative integer string that fits in 128 bits.
pub fn is_valid_amount(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) && value.parse::<u128>().is_ok()
}

fn is_decimal_number(value: &str) -> bool {
    let mut parts = value.splitn(2, '.');
    let int = parts.next().unwrap_or_default();
    let frac = parts.next().unwrap_or_default();
    !(int.is_empty() && frac.is_empty())
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.bytes().all(|b| b.is_ascii_digit())
}

pub fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Decodes hex with or without a `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_0x(value))
}

/// Decodes hex into a fixed-size array.
pub fn decode_hex_fixed<const N: usize>(value: &str) -> Option<[u8; N]> {
    decode_hex(value).ok()?.try_into().ok()
}

pub fn to_0x_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn is_valid_hex(value: &str) -> bool {
    decode_hex(value).is_ok()
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(value: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(value.trim())
}

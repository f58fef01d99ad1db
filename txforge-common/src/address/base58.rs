use super::errors::AddressError;

/// Encodes raw bytes as a base58 string (bitcoin alphabet).
pub fn encode(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decodes a base58 string into a fixed-size array.
///
/// # Arguments
///
/// * `value` - base58 text
///
/// # Returns
///
/// The decoded bytes, or `AddressError::InvalidLength` when the payload is not `N` bytes long.
pub fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], AddressError> {
    let bytes = bs58::decode(value).into_vec()?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| AddressError::InvalidLength(len))
}

/// Returns true when `value` is base58 and decodes to exactly `N` bytes.
pub fn is_fixed<const N: usize>(value: &str) -> bool {
    decode_fixed::<N>(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fixed_checks_length() {
        let text = encode(&[7u8; 32]);
        assert_eq!(decode_fixed::<32>(&text).unwrap(), [7u8; 32]);
        assert_eq!(decode_fixed::<64>(&text), Err(AddressError::InvalidLength(32)));
    }

    #[test]
    fn test_invalid_alphabet_is_rejected() {
        // '0', 'O', 'I' and 'l' are not part of the alphabet
        assert!(!is_fixed::<32>("0OIl"));
        assert!(matches!(decode_fixed::<32>("0OIl"), Err(AddressError::Base58(_))));
    }
}

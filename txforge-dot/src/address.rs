use blake2::{Blake2b512, Digest};
use txforge_common::address::AddressError;
use txforge_common::utils::decode_hex_fixed;

/// 32-byte account id (the raw ed25519 public key).
pub type AccountId = [u8; 32];

/// SS58 format shared by generic substrate chains and the test networks.
pub const GENERIC_SUBSTRATE_FORMAT: u16 = 42;

const SS58_PREFIX: &[u8] = b"SS58PRE";
const CHECKSUM_LENGTH: usize = 2;
const ADDRESS_LENGTH: usize = 1 + 32 + CHECKSUM_LENGTH;

fn ss58_hash(data: &[u8]) -> [u8; 64] {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_PREFIX);
    hasher.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Encodes a public key as an SS58 address.
///
/// Only single-byte formats (0..64) are supported.
///
/// # Example
///
/// ```rust
/// use txforge_dot::address::{ss58_encode, GENERIC_SUBSTRATE_FORMAT};
///
/// let address = ss58_encode(&[0u8; 32], GENERIC_SUBSTRATE_FORMAT).unwrap();
/// assert!(address.starts_with('5'));
/// ```
pub fn ss58_encode(public_key: &AccountId, format: u16) -> Result<String, AddressError> {
    if format >= 64 {
        return Err(AddressError::UnsupportedPrefix(format));
    }

    let mut payload = Vec::with_capacity(ADDRESS_LENGTH);
    payload.push(format as u8);
    payload.extend_from_slice(public_key);
    let checksum = ss58_hash(&payload);
    payload.extend_from_slice(&checksum[..CHECKSUM_LENGTH]);

    Ok(bs58::encode(payload).into_string())
}

/// Decodes an SS58 address into its format and public key, checking the checksum.
pub fn ss58_decode(address: &str) -> Result<(u16, AccountId), AddressError> {
    let bytes = bs58::decode(address).into_vec()?;
    if bytes.len() != ADDRESS_LENGTH {
        return Err(AddressError::InvalidLength(bytes.len()));
    }
    if bytes[0] >= 64 {
        return Err(AddressError::UnsupportedPrefix(bytes[0] as u16));
    }

    let (body, checksum) = bytes.split_at(ADDRESS_LENGTH - CHECKSUM_LENGTH);
    if ss58_hash(body)[..CHECKSUM_LENGTH] != *checksum {
        return Err(AddressError::InvalidChecksum);
    }

    let mut account = [0u8; 32];
    account.copy_from_slice(&body[1..]);
    Ok((bytes[0] as u16, account))
}

/// Resolves an SS58 address or a 32-byte hex public key into an account id.
pub fn decode_account(value: &str) -> Result<AccountId, AddressError> {
    if value.starts_with("0x") {
        return decode_hex_fixed::<32>(value)
            .ok_or_else(|| AddressError::InvalidPublicKey(value.to_string()));
    }
    ss58_decode(value).map(|(_, account)| account)
}

pub fn is_valid_address(value: &str) -> bool {
    decode_account(value).is_ok()
}

//! Program ids and limits used by the instruction codec.

use crate::pubkey::Pubkey;

pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0; 32]);

/// `MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr`
pub const MEMO_PROGRAM_ID: Pubkey = Pubkey::new([
    5, 74, 83, 90, 153, 41, 33, 6, 77, 36, 232, 113, 96, 218, 56, 124, 124, 53, 181, 221, 188, 146, 187, 129, 228, 31,
    168, 64, 65, 5, 68, 141,
]);

/// `SysvarRecentB1ockHashes11111111111111111111`
pub const SYSVAR_RECENT_BLOCKHASHES_ID: Pubkey = Pubkey::new([
    6, 167, 213, 23, 25, 44, 86, 142, 224, 138, 132, 95, 115, 210, 151, 136, 207, 3, 92, 49, 69, 178, 26, 179, 68, 216,
    6, 46, 169, 64, 0, 0,
]);

/// `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: Pubkey = Pubkey::new([
    6, 167, 213, 23, 25, 44, 92, 81, 33, 140, 201, 76, 61, 74, 241, 127, 88, 218, 238, 8, 155, 161, 253, 68, 227, 219,
    217, 138, 0, 0, 0, 0,
]);

/// Size of a nonce account's data.
pub const NONCE_ACCOUNT_SPACE: u64 = 80;

/// Longest memo accepted by the transfer builder, in bytes.
pub const MAX_MEMO_LENGTH: usize = 256;

pub const SECRET_KEY_LENGTH: usize = 64;
pub const SIGNATURE_LENGTH: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_ids_render_as_base58() {
        assert_eq!(SYSTEM_PROGRAM_ID.to_string(), "11111111111111111111111111111111");
        assert_eq!(MEMO_PROGRAM_ID.to_string(), "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");
        assert_eq!(
            SYSVAR_RECENT_BLOCKHASHES_ID.to_string(),
            "SysvarRecentB1ockHashes11111111111111111111"
        );
        assert_eq!(SYSVAR_RENT_ID.to_string(), "SysvarRent111111111111111111111111111111111");
    }
}

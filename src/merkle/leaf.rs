//! Leaf encodings for both tree levels
//!
//! Both layouts are fixed-width and must match whatever verifies proofs
//! against the published root.

use crate::model::{Account, Amount, Hash, Token};
use crate::Result;

/// `token (20) || amount big-endian (32)`
pub const TOKEN_LEAF_LEN: usize = 20 + Amount::ENCODED_LEN;

/// `account (20) || token tree root (32)`
pub const ACCOUNT_LEAF_LEN: usize = 20 + Hash::LEN;

/// Encode a token leaf. Fails if `amount` is negative or wider than 256 bits.
pub fn encode_token_leaf(token: &Token, amount: &Amount) -> Result<[u8; TOKEN_LEAF_LEN]> {
    let mut leaf = [0u8; TOKEN_LEAF_LEN];
    leaf[..20].copy_from_slice(token.as_slice());
    leaf[20..].copy_from_slice(&amount.to_be_bytes32()?);
    Ok(leaf)
}

/// Encode an account leaf binding `account` to its token tree root
pub fn encode_account_leaf(account: &Account, token_root: &Hash) -> [u8; ACCOUNT_LEAF_LEN] {
    let mut leaf = [0u8; ACCOUNT_LEAF_LEN];
    leaf[..20].copy_from_slice(account.as_slice());
    leaf[20..].copy_from_slice(token_root.as_bytes());
    leaf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use alloy_primitives::Address;

    #[test]
    fn test_token_leaf_vector() {
        let token = Address::repeat_byte(0xbb);
        let leaf = encode_token_leaf(&token, &Amount::from(1000u64)).unwrap();

        let mut expected = vec![0xbb; 20];
        expected.extend_from_slice(&[0u8; 30]);
        expected.extend_from_slice(&[0x03, 0xe8]);
        assert_eq!(leaf.to_vec(), expected);
    }

    #[test]
    fn test_amount_only_touches_trailing_bytes() {
        let token = Address::repeat_byte(0xbb);
        let a = encode_token_leaf(&token, &Amount::from(1000u64)).unwrap();
        let b = encode_token_leaf(&token, &Amount::from(1001u64)).unwrap();

        assert_eq!(a[..20], b[..20]);
        assert_ne!(a[20..], b[20..]);
    }

    #[test]
    fn test_token_leaf_rejects_out_of_range() {
        let token = Address::repeat_byte(0xbb);
        assert!(matches!(
            encode_token_leaf(&token, &Amount::from(-5i32)),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_account_leaf_layout() {
        let account = Address::repeat_byte(0xaa);
        let root = Hash::digest(b"tokens");
        let leaf = encode_account_leaf(&account, &root);

        assert_eq!(&leaf[..20], &[0xaa; 20]);
        assert_eq!(&leaf[20..], root.as_bytes());
    }
}

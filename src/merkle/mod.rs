//! Two-level merkle commitment
//!
//! - Token tree per account over `token || amount` leaves
//! - Account tree over `account || token root` leaves
//!
//! Both levels use the same keccak-256 tree layout, see [`MerkleTree`].

mod commitment;
mod leaf;
mod tree;

pub use commitment::{merklize, merklize_sequential, Commitment};
pub use leaf::{encode_account_leaf, encode_token_leaf, ACCOUNT_LEAF_LEN, TOKEN_LEAF_LEN};
pub use tree::MerkleTree;

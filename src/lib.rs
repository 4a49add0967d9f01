//! # distree
//!
//! Accumulates token reward distributions and commits to them with a
//! two-level merkle tree.
//!
//! A [`Distribution`] maps accounts to the amounts of each token they are
//! owed. Partial distributions (one per epoch, one per source, ...) are summed
//! with [`Distribution::add`], then the final distribution is merklized once.
//!
//! ## Core Concepts
//!
//! - **Distribution**: account → token → amount, in insertion order
//! - **Token tree**: one per account, leaves are `token || amount`
//! - **Account tree**: leaves are `account || token root`; its root is the
//!   published commitment
//!
//! ## Example
//!
//! ```ignore
//! use distree::Distribution;
//!
//! let mut total = Distribution::new();
//! total.add(&Distribution::load("epoch-1.json")?);
//! total.add(&Distribution::load("epoch-2.json")?);
//! let commitment = total.merklize()?;
//! println!("{}", commitment.root());
//! ```

pub mod merkle;
pub mod model;

mod error;

pub use error::{Error, Result};
pub use merkle::{merklize, merklize_sequential, Commitment, MerkleTree};
pub use model::{Account, Amount, Distribution, Hash, OrderedMap, Token, TokenAmounts};

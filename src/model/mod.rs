//! Core data model types for distree

mod amount;
mod distribution;
mod hash;
mod ordered_map;

pub use amount::Amount;
pub use distribution::{format_address, Account, Distribution, Token, TokenAmounts};
pub use hash::Hash;
pub use ordered_map::OrderedMap;

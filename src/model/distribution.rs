//! Distribution - amounts of each token owed to each account
//!
//! A distribution is an ordered map of account → (ordered map of token →
//! amount). Order is first-insertion order at both levels and survives the
//! JSON round-trip, which is what makes a commitment reproducible from a
//! serialized distribution.

use super::{Amount, OrderedMap};
use crate::merkle::{merklize, Commitment};
use crate::{Error, Result};
use alloy_primitives::Address;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::value::RawValue;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Identifier of an account receiving a distribution
pub type Account = Address;

/// Identifier of a distributed token
pub type Token = Address;

/// Tokens owed to a single account, in insertion order
pub type TokenAmounts = OrderedMap<Token, Amount>;

/// Amounts of tokens owed to accounts
///
/// Not internally synchronized: mutation needs `&mut self`, so a caller that
/// shares a distribution across threads has to wrap it in a lock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Distribution {
    data: OrderedMap<Account, TokenAmounts>,
}

impl Distribution {
    /// Create an empty distribution
    pub fn new() -> Self {
        Distribution {
            data: OrderedMap::new(),
        }
    }

    /// Set the amount of `token` owed to `account`, replacing any previous value.
    ///
    /// A new account is appended after all existing accounts and a new token
    /// after the account's existing tokens. Negative amounts are stored as
    /// given and rejected later by [`Distribution::merklize`].
    pub fn set(&mut self, account: Account, token: Token, amount: impl Into<Amount>) {
        self.data
            .get_or_insert_with(account, OrderedMap::new)
            .insert(token, amount.into());
    }

    /// Amount of `token` owed to `account`, zero if never set
    pub fn get(&self, account: &Account, token: &Token) -> Amount {
        self.data
            .get(account)
            .and_then(|tokens| tokens.get(token))
            .cloned()
            .unwrap_or_default()
    }

    /// Add every amount in `other` onto this distribution.
    ///
    /// Keys new to this distribution are appended in the order they are met
    /// while walking `other`.
    pub fn add(&mut self, other: &Distribution) {
        for (account, token, amount) in other.iter() {
            let total = self.get(account, token) + amount;
            self.set(*account, *token, total);
        }
        tracing::debug!(
            merged = other.num_leaves(),
            accounts = self.num_accounts(),
            leaves = self.num_leaves(),
            "added distribution"
        );
    }

    /// Total number of (account, token) pairs, including zero amounts
    pub fn num_leaves(&self) -> usize {
        self.data.values().map(OrderedMap::len).sum()
    }

    pub fn num_accounts(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Accounts with their tokens, in insertion order
    pub fn accounts(&self) -> &OrderedMap<Account, TokenAmounts> {
        &self.data
    }

    /// Tokens owed to `account`, if it has any entry
    pub fn tokens(&self, account: &Account) -> Option<&TokenAmounts> {
        self.data.get(account)
    }

    /// Every (account, token, amount) triple in merklization order
    pub fn iter(&self) -> impl Iterator<Item = (&Account, &Token, &Amount)> + '_ {
        self.data.iter().flat_map(|(account, tokens)| {
            tokens
                .iter()
                .map(move |(token, amount)| (account, token, amount))
        })
    }

    /// Build the two-level commitment over this distribution
    pub fn merklize(&self) -> Result<Commitment> {
        merklize(self)
    }

    // === JSON helpers ===

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::MalformedInput(e.to_string()))
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedInput(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a distribution from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    /// Write this distribution to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Lowercase `0x`-prefixed hex, the key format of serialized distributions
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

fn parse_address(text: &str) -> Result<Address> {
    Address::from_str(text)
        .map_err(|e| Error::MalformedInput(format!("invalid address {text:?}: {e}")))
}

// === Serialization ===

struct TokensRef<'a>(&'a TokenAmounts);

impl Serialize for TokensRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (token, amount) in self.0.iter() {
            map.serialize_entry(&format_address(token), amount)?;
        }
        map.end()
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.data.len()))?;
        for (account, tokens) in self.data.iter() {
            map.serialize_entry(&format_address(account), &TokensRef(tokens))?;
        }
        map.end()
    }
}

/// Inner token object. Each amount's raw text goes through
/// [`Amount::parse_nullable`]; a `null` leaves the token unset.
struct TokensOwned(TokenAmounts);

impl<'de> Deserialize<'de> for TokensOwned {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TokensVisitor;

        impl<'de> Visitor<'de> for TokensVisitor {
            type Value = TokensOwned;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping token addresses to integer amounts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut tokens = OrderedMap::new();
                let mut seen = std::collections::HashSet::new();
                while let Some(key) = access.next_key::<String>()? {
                    let token = parse_address(&key).map_err(de::Error::custom)?;
                    if !seen.insert(token) {
                        return Err(de::Error::custom(format!("duplicate token {key}")));
                    }
                    let raw = access.next_value::<Box<RawValue>>()?;
                    if let Some(amount) =
                        Amount::parse_nullable(raw.get()).map_err(de::Error::custom)?
                    {
                        tokens.insert(token, amount);
                    }
                }
                Ok(TokensOwned(tokens))
            }
        }

        deserializer.deserialize_map(TokensVisitor)
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = Distribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping account addresses to token objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut data = OrderedMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    let account = parse_address(&key).map_err(de::Error::custom)?;
                    if data.contains_key(&account) {
                        return Err(de::Error::custom(format!("duplicate account {key}")));
                    }
                    let TokensOwned(tokens) = access.next_value()?;
                    data.insert(account, tokens);
                }
                Ok(Distribution { data })
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

//! Two-level commitment over a distribution
//!
//! Each account gets a token tree over its `(token, amount)` leaves. The
//! account tree is then built over `(account, token root)` leaves, so a single
//! account root commits to every balance.

use super::leaf::{encode_account_leaf, encode_token_leaf};
use super::MerkleTree;
use crate::model::{Account, Distribution, Hash, TokenAmounts};
use crate::{Error, Result};
use rayon::prelude::*;

/// Account tree plus one token tree per account, in distribution order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment {
    pub account_tree: MerkleTree,
    pub token_trees: Vec<MerkleTree>,
}

impl Commitment {
    /// The published root
    pub fn root(&self) -> Hash {
        self.account_tree.root()
    }

    /// Token tree of the account at `index` in distribution order
    pub fn token_tree(&self, index: usize) -> Option<&MerkleTree> {
        self.token_trees.get(index)
    }

    pub fn into_parts(self) -> (MerkleTree, Vec<MerkleTree>) {
        (self.account_tree, self.token_trees)
    }
}

/// Merklize a distribution, building token trees in parallel.
///
/// Token trees are independent per account; the results are collected in
/// account order, so the output matches [`merklize_sequential`] exactly.
pub fn merklize(distribution: &Distribution) -> Result<Commitment> {
    let token_trees = distribution
        .accounts()
        .as_slice()
        .par_iter()
        .map(|(account, tokens)| build_token_tree(account, tokens))
        .collect::<Result<Vec<_>>>()?;
    assemble(distribution, token_trees)
}

/// Merklize on the calling thread only
pub fn merklize_sequential(distribution: &Distribution) -> Result<Commitment> {
    let token_trees = distribution
        .accounts()
        .iter()
        .map(|(account, tokens)| build_token_tree(account, tokens))
        .collect::<Result<Vec<_>>>()?;
    assemble(distribution, token_trees)
}

fn build_token_tree(account: &Account, tokens: &TokenAmounts) -> Result<MerkleTree> {
    if tokens.is_empty() {
        return Err(Error::TreeConstruction(format!(
            "account {account} has no tokens"
        )));
    }
    let leaves = tokens
        .iter()
        .map(|(token, amount)| {
            encode_token_leaf(token, amount)
                .map(|leaf| leaf.to_vec())
                .map_err(|e| match e {
                    Error::Encoding(msg) => {
                        Error::Encoding(format!("account {account}, token {token}: {msg}"))
                    }
                    other => other,
                })
        })
        .collect::<Result<Vec<_>>>()?;
    MerkleTree::build(leaves)
}

fn assemble(distribution: &Distribution, token_trees: Vec<MerkleTree>) -> Result<Commitment> {
    if distribution.is_empty() {
        return Err(Error::TreeConstruction(
            "distribution has no accounts".to_string(),
        ));
    }

    let account_leaves = distribution
        .accounts()
        .keys()
        .zip(&token_trees)
        .map(|(account, tree)| encode_account_leaf(account, &tree.root()).to_vec())
        .collect();
    let account_tree = MerkleTree::build(account_leaves)?;

    tracing::debug!(
        accounts = token_trees.len(),
        leaves = distribution.num_leaves(),
        root = %account_tree.root(),
        "merklized distribution"
    );

    Ok(Commitment {
        account_tree,
        token_trees,
    })
}

//! Binary merkle tree over an ordered leaf sequence

use crate::model::Hash;
use crate::{Error, Result};

/// A complete binary merkle tree
///
/// Nodes are stored in a flat array in heap order: the root sits at index 1
/// and the children of node `i` at `2i` and `2i + 1`. The leaf layer starts at
/// `width`, the leaf count rounded up to a power of two.
///
/// - leaf node: `keccak256(leaf)`
/// - padding leaf slots: 32 zero bytes, not hashed
/// - internal node: `keccak256(left || right)`, children in position order
///
/// Every node and the original leaf data are kept so that inclusion proofs can
/// be read off the tree later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    leaves: Vec<Vec<u8>>,
    nodes: Vec<Hash>,
    width: usize,
}

impl MerkleTree {
    /// Build a tree over `leaves` in the given order.
    ///
    /// Fails with [`Error::TreeConstruction`] when there are no leaves.
    pub fn build(leaves: Vec<Vec<u8>>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(Error::TreeConstruction(
                "tree must have at least one leaf".to_string(),
            ));
        }

        let width = leaves.len().next_power_of_two();
        let mut nodes = vec![Hash::ZERO; 2 * width];

        for (i, leaf) in leaves.iter().enumerate() {
            nodes[width + i] = Hash::digest(leaf);
        }
        for i in (1..width).rev() {
            nodes[i] = Hash::digest_many(&[nodes[2 * i].as_bytes(), nodes[2 * i + 1].as_bytes()]);
        }

        tracing::trace!(leaves = leaves.len(), width, root = %nodes[1], "built merkle tree");

        Ok(MerkleTree {
            leaves,
            nodes,
            width,
        })
    }

    pub fn root(&self) -> Hash {
        self.nodes[1]
    }

    /// Number of real (unpadded) leaves
    pub fn num_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Leaf count after padding to a power of two
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of levels below the root
    pub fn depth(&self) -> usize {
        self.width.trailing_zeros() as usize
    }

    /// Raw bytes of leaf `index`
    pub fn leaf(&self, index: usize) -> Option<&[u8]> {
        self.leaves.get(index).map(Vec::as_slice)
    }

    /// Hashed leaf node at `index`
    pub fn leaf_hash(&self, index: usize) -> Option<Hash> {
        (index < self.leaves.len()).then(|| self.nodes[self.width + index])
    }

    /// Position of the first leaf equal to `data`
    pub fn find_leaf(&self, data: &[u8]) -> Option<usize> {
        self.leaves.iter().position(|leaf| leaf.as_slice() == data)
    }
}

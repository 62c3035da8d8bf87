//! Merkle commitments with mutation detection
//!
//! The tree duplicates the last hash of an odd level before reducing,
//! which makes certain duplicated transaction lists collide with the
//! honest list (CVE-2012-2459). The only way to exploit that is to make
//! some level end in two equal hashes, so flagging any equal adjacent
//! pair conservatively catches every such mutation, assuming no SHA-256
//! collision.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};

use crate::types::{Block, Hash};

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(left);
    engine.input(right);
    sha256d::Hash::from_engine(engine).into_inner()
}

/// Root of the (mutation-prone) Merkle tree over `hashes`, plus whether
/// any level contained an equal adjacent pair.
///
/// An empty input yields the all-zero hash. The builder is tolerant by
/// design: it always returns a root and leaves the treatment of a
/// detected mutation to the caller.
pub fn compute_merkle_root(mut hashes: Vec<Hash>) -> (Hash, bool) {
    let mut mutation = false;
    while hashes.len() > 1 {
        // Scan pairs before any duplication happens at this level
        for pair in hashes.chunks_exact(2) {
            if pair[0] == pair[1] {
                mutation = true;
            }
        }
        if hashes.len() % 2 == 1 {
            let last = hashes[hashes.len() - 1];
            hashes.push(last);
        }
        let mut next = Vec::with_capacity(hashes.len() / 2);
        for pair in hashes.chunks_exact(2) {
            next.push(hash_pair(&pair[0], &pair[1]));
        }
        hashes = next;
    }
    match hashes.first() {
        Some(root) => (*root, mutation),
        None => ([0u8; 32], mutation),
    }
}

/// Merkle root over the block's txids, in transaction order.
pub fn block_merkle_root(block: &Block) -> (Hash, bool) {
    let leaves = block.transactions.iter().map(|tx| tx.txid()).collect();
    compute_merkle_root(leaves)
}

/// Merkle root over the block's wtxids. The coinbase leaf is the
/// all-zero hash: its wtxid is not meaningful at commitment time.
pub fn block_witness_merkle_root(block: &Block) -> (Hash, bool) {
    let mut leaves: Vec<Hash> = Vec::with_capacity(block.transactions.len());
    for (i, tx) in block.transactions.iter().enumerate() {
        if i == 0 {
            leaves.push([0u8; 32]);
        } else {
            leaves.push(tx.wtxid());
        }
    }
    compute_merkle_root(leaves)
}

//! # consensus-core
//!
//! Consensus validation core for a Bitcoin-compatible chain: the rules
//! every peer must agree on byte-for-byte. Given a candidate transaction
//! or a block-level Merkle commitment, the crate decides whether it
//! conforms. A single bit of disagreement forks the chain, so every
//! contract here is deterministic and exhaustive.
//!
//! ## What lives here
//!
//! - Context-free transaction structure checks and the contextual input
//!   check with fee computation ([`transaction`])
//! - Absolute `nLockTime` finality and BIP 68 relative locks against
//!   median time-past ([`locktime`], [`chain`])
//! - Signature-operation accounting across legacy, P2SH and witness
//!   scripts ([`sigops`], [`script`])
//! - Mutation-resistant Merkle commitments ([`merkle`])
//!
//! Script *execution* is an external collaborator reached through the
//! [`sigops::WitnessSigOps`] oracle; chain storage is reached through the
//! read-only [`coins::CoinView`] and [`chain::Chain`] views.
//!
//! ## Design principles
//!
//! 1. **Pure functions**: every entry point is deterministic,
//!    side-effect-free and synchronous on the caller's thread
//! 2. **Errors are values**: consensus rejections carry the stable
//!    `(reason, reject_code, token)` triple peers observe
//! 3. **Exact version pinning** for consensus-critical dependencies
//!
//! ## Usage
//!
//! ```rust
//! use consensus_core::{ConsensusVerifier, OutPoint, Script, Transaction, TxIn, TxOut};
//! use consensus_core::constants::SEQUENCE_FINAL;
//!
//! let verifier = ConsensusVerifier::new();
//! let tx = Transaction {
//!     version: 1,
//!     inputs: vec![TxIn::new(
//!         OutPoint::new([1u8; 32], 0),
//!         Script::from(vec![0x51]),
//!         SEQUENCE_FINAL,
//!     )],
//!     outputs: vec![TxOut::new(1000, Script::from(vec![0x51]))],
//!     lock_time: 0,
//! };
//! assert!(verifier.check_transaction(&tx, true).is_ok());
//! ```

pub mod chain;
pub mod coins;
pub mod constants;
pub mod error;
pub mod locktime;
pub mod merkle;
pub mod opcodes;
pub mod script;
pub mod serialize;
pub mod sigops;
pub mod transaction;
pub mod types;

// Re-export commonly used items
pub use chain::{BlockIndex, Chain};
pub use coins::{Coin, CoinView, MemoryCoinView};
pub use error::{ConsensusError, InvalidReason, Result};
pub use script::{Script, ScriptError};
pub use types::{
    Amount, Block, BlockHeader, Hash, OutPoint, Transaction, TxIn, TxOut, Witness,
};

use locktime::LockPoints;
use sigops::WitnessSigOps;

/// Stateless entry point bundling the crate's validation operations.
///
/// Every method delegates to the free functions of the concern modules;
/// the struct exists so embedders can hold one capability object.
///
/// # Examples
///
/// ```
/// use consensus_core::ConsensusVerifier;
///
/// let verifier = ConsensusVerifier::new();
/// // single-leaf Merkle identity
/// let (root, mutated) = consensus_core::merkle::compute_merkle_root(vec![[7u8; 32]]);
/// assert_eq!(root, [7u8; 32]);
/// assert!(!mutated);
/// # let _ = verifier;
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsensusVerifier;

impl ConsensusVerifier {
    pub fn new() -> Self {
        Self
    }

    /// Context-free structural checks; see [`transaction::check_transaction`].
    ///
    /// ```
    /// use consensus_core::{ConsensusVerifier, Script, Transaction, TxOut};
    ///
    /// let verifier = ConsensusVerifier::new();
    /// let tx = Transaction {
    ///     version: 1,
    ///     inputs: vec![],
    ///     outputs: vec![TxOut::new(1, Script::from(vec![0x51]))],
    ///     lock_time: 0,
    /// };
    /// let err = verifier.check_transaction(&tx, true).unwrap_err();
    /// assert_eq!(err.token(), Some("bad-txns-vin-empty"));
    /// ```
    pub fn check_transaction(&self, tx: &Transaction, check_duplicate_inputs: bool) -> Result<()> {
        transaction::check_transaction(tx, check_duplicate_inputs)
    }

    /// Contextual input check; returns the fee on success.
    pub fn check_tx_inputs(
        &self,
        tx: &Transaction,
        coins: &impl CoinView,
        spend_height: i32,
    ) -> Result<Amount> {
        transaction::check_tx_inputs(tx, coins, spend_height)
    }

    /// Absolute lock-time finality at the given height and time.
    pub fn is_final_tx(&self, tx: &Transaction, block_height: i32, block_time: i64) -> bool {
        locktime::is_final_tx(tx, block_height, block_time)
    }

    /// BIP 68 lock points for `tx`; see
    /// [`locktime::calculate_sequence_locks`] for the `prev_heights`
    /// contract.
    pub fn calculate_sequence_locks(
        &self,
        tx: &Transaction,
        flags: u32,
        prev_heights: &mut [i32],
        tip: &BlockIndex<'_>,
    ) -> LockPoints {
        locktime::calculate_sequence_locks(tx, flags, prev_heights, tip)
    }

    /// Would `tx` satisfy its relative locks in the block after `tip`?
    pub fn sequence_locks(
        &self,
        tx: &Transaction,
        flags: u32,
        prev_heights: &mut [i32],
        tip: &BlockIndex<'_>,
    ) -> bool {
        locktime::sequence_locks(tx, flags, prev_heights, tip)
    }

    /// Combined weighted sigop cost of a transaction.
    pub fn transaction_sig_op_cost(
        &self,
        tx: &Transaction,
        coins: &impl CoinView,
        flags: u32,
        witness_ops: &impl WitnessSigOps,
    ) -> i64 {
        sigops::transaction_sig_op_cost(tx, coins, flags, witness_ops)
    }

    /// Merkle root over the block's txids, with the mutation flag.
    pub fn block_merkle_root(&self, block: &Block) -> (Hash, bool) {
        merkle::block_merkle_root(block)
    }

    /// Merkle root over the block's wtxids, coinbase leaf zeroed.
    pub fn block_witness_merkle_root(&self, block: &Block) -> (Hash, bool) {
        merkle::block_witness_merkle_root(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SEQUENCE_FINAL;

    #[test]
    fn test_facade_delegates_to_check_transaction() {
        let verifier = ConsensusVerifier::new();
        let tx = Transaction {
            version: 1,
            inputs: vec![TxIn::new(
                OutPoint::new([1; 32], 0),
                Script::from(vec![0x51]),
                SEQUENCE_FINAL,
            )],
            outputs: vec![TxOut::new(1000, Script::from(vec![0x51]))],
            lock_time: 0,
        };
        assert!(verifier.check_transaction(&tx, true).is_ok());
        assert!(verifier.is_final_tx(&tx, 0, 0));
    }

    #[test]
    fn test_facade_is_zero_sized() {
        assert_eq!(std::mem::size_of::<ConsensusVerifier>(), 0);
    }
}

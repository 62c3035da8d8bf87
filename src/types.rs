//! Core value types for consensus validation
//!
//! Transactions and coins are produced elsewhere and presented to the core
//! by reference; everything here is a plain value type. Transaction hashes
//! are defined in terms of the canonical encoding in `serialize`, so
//! recomputing them always agrees with the wire bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_MONEY, SEQUENCE_FINAL, WITNESS_SCALE_FACTOR};
use crate::error::{ConsensusError, Result};
use crate::script::Script;
use crate::serialize::{serialize_hash, serialized_size, SERIALIZE_TRANSACTION_NO_WITNESS};

/// 256-bit hash
pub type Hash = [u8; 32];

/// Amount in the smallest currency unit, 64-bit signed
pub type Amount = i64;

/// Base units per coin
pub const COIN: Amount = 100_000_000;

/// An amount is in range iff `0 <= v <= MAX_MONEY`.
pub fn money_range(value: Amount) -> bool {
    (0..=MAX_MONEY).contains(&value)
}

/// Per-input witness: a stack of byte vectors carried out-of-band from
/// the canonical transaction body.
pub type Witness = Vec<Vec<u8>>;

/// Reference to a specific output of a prior transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: Hash,
    pub vout: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, vout: u32) -> Self {
        OutPoint { txid, vout }
    }

    /// The reserved coinbase prevout: all-zero txid and index `0xffffffff`.
    pub fn null() -> Self {
        OutPoint {
            txid: [0u8; 32],
            vout: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.txid == [0u8; 32] && self.vout == u32::MAX
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutPoint({}, {})", &hex_reversed(&self.txid)[..10], self.vout)
    }
}

/// Transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub prevout: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
    /// Witness stack; never part of the non-witness serialization hash.
    pub witness: Witness,
}

impl TxIn {
    pub fn new(prevout: OutPoint, script_sig: Script, sequence: u32) -> Self {
        TxIn {
            prevout,
            script_sig,
            sequence,
            witness: Vec::new(),
        }
    }
}

impl fmt::Display for TxIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxIn({}", self.prevout)?;
        if self.prevout.is_null() {
            write!(f, ", coinbase {}", hex(self.script_sig.as_bytes()))?;
        } else {
            let sig = hex(self.script_sig.as_bytes());
            write!(f, ", scriptSig={}", &sig[..sig.len().min(24)])?;
        }
        if self.sequence != SEQUENCE_FINAL {
            write!(f, ", sequence={}", self.sequence)?;
        }
        write!(f, ")")
    }
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub value: Amount,
    pub script_pubkey: Script,
}

impl TxOut {
    pub fn new(value: Amount, script_pubkey: Script) -> Self {
        TxOut {
            value,
            script_pubkey,
        }
    }
}

impl fmt::Display for TxOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spk = hex(self.script_pubkey.as_bytes());
        write!(
            f,
            "TxOut(value={}.{:08}, scriptPubKey={})",
            self.value / COIN,
            self.value % COIN,
            &spk[..spk.len().min(30)]
        )
    }
}

/// An immutable transaction aggregate.
///
/// `txid` hashes the serialization without witness data, `wtxid` the full
/// serialization; the two agree when no input carries a witness stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TxIn>,
    pub outputs: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    /// Exactly one input, and that input's prevout is null.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    pub fn has_witness(&self) -> bool {
        self.inputs.iter().any(|txin| !txin.witness.is_empty())
    }

    /// Double-SHA-256 of the serialization without witness data.
    pub fn txid(&self) -> Hash {
        serialize_hash(self, SERIALIZE_TRANSACTION_NO_WITNESS)
    }

    /// Double-SHA-256 of the full serialization; equals `txid` when no
    /// input has a witness stack.
    pub fn wtxid(&self) -> Hash {
        if !self.has_witness() {
            return self.txid();
        }
        serialize_hash(self, 0)
    }

    /// Sum of output values, checked step by step against the money
    /// range. Failure means the transaction could not have been produced
    /// by a conforming peer.
    pub fn value_out(&self) -> Result<Amount> {
        let mut total: Amount = 0;
        for txout in &self.outputs {
            if !money_range(txout.value) {
                return Err(ConsensusError::ValueOutOfRange("value_out"));
            }
            total += txout.value;
            if !money_range(total) {
                return Err(ConsensusError::ValueOutOfRange("value_out"));
            }
        }
        Ok(total)
    }

    /// Byte length of the full canonical encoding.
    pub fn total_size(&self) -> usize {
        serialized_size(self, 0)
    }

    /// BIP 141 weight: three times the non-witness size plus the full size.
    pub fn weight(&self) -> usize {
        serialized_size(self, SERIALIZE_TRANSACTION_NO_WITNESS) * (WITNESS_SCALE_FACTOR - 1)
            + self.total_size()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Transaction(txid={}, version={}, inputs={}, outputs={}, lock_time={})",
            &hex_reversed(&self.txid())[..10],
            self.version,
            self.inputs.len(),
            self.outputs.len(),
            self.lock_time
        )?;
        for txin in &self.inputs {
            writeln!(f, "    {}", txin)?;
        }
        for txout in &self.outputs {
            writeln!(f, "    {}", txout)?;
        }
        Ok(())
    }
}

/// Block header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block_hash: Hash,
    pub merkle_root: Hash,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

/// Block: header plus ordered transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Hashes print big-endian, reversed from their in-memory byte order.
fn hex_reversed(hash: &Hash) -> String {
    hash.iter().rev().map(|b| format!("{:02x}", b)).collect()
}

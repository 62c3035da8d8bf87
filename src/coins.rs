//! Unspent output views
//!
//! The coin view is a read-only collaborator: the core only needs to look
//! coins up, never to write them. A spent or unknown coin is simply
//! absent. Accesses during a single validation are assumed point-in-time
//! consistent; the core fails closed if that contract is broken.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Amount, OutPoint, Transaction, TxOut};

/// One unspent output together with where it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub output: TxOut,
    /// Height of the block that created this output
    pub height: i32,
    /// Whether the creating transaction was a coinbase
    pub coinbase: bool,
}

impl Coin {
    pub fn new(output: TxOut, height: i32, coinbase: bool) -> Self {
        Coin {
            output,
            height,
            coinbase,
        }
    }

    pub fn value(&self) -> Amount {
        self.output.value
    }
}

/// Read-only mapping from outpoints to unspent coins.
pub trait CoinView {
    /// Look up one coin; `None` when the outpoint is unknown or spent.
    fn access_coin(&self, outpoint: &OutPoint) -> Option<Coin>;

    /// All inputs of `tx` refer to coins present in this view.
    fn have_inputs(&self, tx: &Transaction) -> bool {
        tx.inputs
            .iter()
            .all(|txin| self.access_coin(&txin.prevout).is_some())
    }
}

/// Fetch a coin that `have_inputs` already vouched for. A miss here means
/// the caller's view changed mid-validation; consensus code fails closed.
pub(crate) fn fetch_coin(view: &impl CoinView, outpoint: &OutPoint) -> Coin {
    match view.access_coin(outpoint) {
        Some(coin) => coin,
        None => panic!("coin view lost {} during validation", outpoint),
    }
}

/// In-memory coin view backed by a hash map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCoinView {
    coins: HashMap<OutPoint, Coin>,
}

impl MemoryCoinView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_coin(&mut self, outpoint: OutPoint, coin: Coin) {
        self.coins.insert(outpoint, coin);
    }

    /// Make every output of `tx` available, keyed by its txid. Block
    /// processing calls this in block order so later transactions can
    /// spend earlier outputs.
    pub fn add_tx_outputs(&mut self, tx: &Transaction, height: i32) {
        let txid = tx.txid();
        let coinbase = tx.is_coinbase();
        for (n, output) in tx.outputs.iter().enumerate() {
            self.add_coin(
                OutPoint::new(txid, n as u32),
                Coin::new(output.clone(), height, coinbase),
            );
        }
    }

    /// Remove and return a coin, if present.
    pub fn spend(&mut self, outpoint: &OutPoint) -> Option<Coin> {
        self.coins.remove(outpoint)
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

impl CoinView for MemoryCoinView {
    fn access_coin(&self, outpoint: &OutPoint) -> Option<Coin> {
        self.coins.get(outpoint).cloned()
    }
}

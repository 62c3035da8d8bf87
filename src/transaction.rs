//! Transaction validation
//!
//! `check_transaction` is the context-free structural check; it depends on
//! nothing but the transaction bytes. `check_tx_inputs` is the contextual
//! check against a coin view and is the only place the no-inflation rule
//! is enforced. Reject tokens are stable ASCII strings shared with the
//! network.

use std::collections::HashSet;

use crate::coins::{fetch_coin, CoinView};
use crate::constants::{COINBASE_MATURITY, MAX_BLOCK_WEIGHT, WITNESS_SCALE_FACTOR};
use crate::error::{ConsensusError, InvalidReason, Result};
use crate::serialize::{serialized_size, SERIALIZE_TRANSACTION_NO_WITNESS};
use crate::types::{money_range, Amount, Transaction};

/// Context-free structural checks.
///
/// Size uses the non-witness encoding; witness bytes are not charged
/// here. Block-level callers pass `check_duplicate_inputs = false`
/// because the block-context check subsumes it.
pub fn check_transaction(tx: &Transaction, check_duplicate_inputs: bool) -> Result<()> {
    if tx.inputs.is_empty() {
        return Err(ConsensusError::consensus("bad-txns-vin-empty"));
    }
    if tx.outputs.is_empty() {
        return Err(ConsensusError::consensus("bad-txns-vout-empty"));
    }
    // Size limit against the stripped encoding; witness malleability has
    // not been checked yet at this point.
    if serialized_size(tx, SERIALIZE_TRANSACTION_NO_WITNESS) * WITNESS_SCALE_FACTOR
        > MAX_BLOCK_WEIGHT
    {
        return Err(ConsensusError::consensus("bad-txns-oversize"));
    }

    // Negative or overflowing output values
    let mut value_out: Amount = 0;
    for txout in &tx.outputs {
        if txout.value < 0 {
            return Err(ConsensusError::consensus("bad-txns-vout-negative"));
        }
        if !money_range(txout.value) {
            return Err(ConsensusError::consensus("bad-txns-vout-toolarge"));
        }
        value_out += txout.value;
        if !money_range(value_out) {
            return Err(ConsensusError::consensus("bad-txns-txouttotal-toolarge"));
        }
    }

    if check_duplicate_inputs {
        let mut seen = HashSet::with_capacity(tx.inputs.len());
        for txin in &tx.inputs {
            if !seen.insert(txin.prevout) {
                return Err(ConsensusError::consensus("bad-txns-inputs-duplicate"));
            }
        }
    }

    if tx.is_coinbase() {
        let sig_len = tx.inputs[0].script_sig.len();
        if !(2..=100).contains(&sig_len) {
            return Err(ConsensusError::consensus("bad-cb-length"));
        }
    } else {
        for txin in &tx.inputs {
            if txin.prevout.is_null() {
                return Err(ConsensusError::consensus("bad-txns-prevout-null"));
            }
        }
    }

    Ok(())
}

/// Contextual input checks against a coin view at `spend_height`.
///
/// On success returns the transaction fee. The view must be point-in-time
/// consistent: a coin that vanishes between `have_inputs` and access
/// panics rather than producing a wrong verdict.
pub fn check_tx_inputs(
    tx: &Transaction,
    coins: &impl CoinView,
    spend_height: i32,
) -> Result<Amount> {
    if !coins.have_inputs(tx) {
        return Err(ConsensusError::invalid(
            InvalidReason::TxMissingInputs,
            "bad-txns-inputs-missingorspent",
        ));
    }

    let mut value_in: Amount = 0;
    for txin in &tx.inputs {
        let coin = fetch_coin(coins, &txin.prevout);

        // If prev is coinbase, check that it's matured
        if coin.coinbase && spend_height - coin.height < COINBASE_MATURITY {
            return Err(ConsensusError::invalid(
                InvalidReason::TxPrematureSpend,
                "bad-txns-premature-spend-of-coinbase",
            ));
        }

        if !money_range(coin.value()) {
            return Err(ConsensusError::consensus("bad-txns-inputvalues-outofrange"));
        }
        value_in += coin.value();
        if !money_range(value_in) {
            return Err(ConsensusError::consensus("bad-txns-inputvalues-outofrange"));
        }
    }

    let value_out = tx.value_out()?;
    if value_in < value_out {
        return Err(ConsensusError::consensus("bad-txns-in-belowout"));
    }

    let fee = value_in - value_out;
    if !money_range(fee) {
        return Err(ConsensusError::consensus("bad-txns-fee-outofrange"));
    }
    Ok(fee)
}

//! Absolute and relative time-lock evaluation
//!
//! Absolute finality follows `nLockTime`; relative locks follow BIP 68
//! sequence numbers evaluated against median time-past. Both use the
//! "last invalid height/time" convention, which is why the relative
//! calculation subtracts one from the first-valid point.

use crate::chain::BlockIndex;
use crate::constants::{
    LOCKTIME_THRESHOLD, LOCKTIME_VERIFY_SEQUENCE, SEQUENCE_FINAL, SEQUENCE_LOCKTIME_DISABLE_FLAG,
    SEQUENCE_LOCKTIME_GRANULARITY, SEQUENCE_LOCKTIME_MASK, SEQUENCE_LOCKTIME_TYPE_FLAG,
};
use crate::types::Transaction;

/// Height- and time-based lock points a transaction must clear before it
/// can be included. `(-1, -1)` means unconstrained.
pub type LockPoints = (i32, i64);

/// Can the transaction be included in a block at `block_height` /
/// `block_time`?
pub fn is_final_tx(tx: &Transaction, block_height: i32, block_time: i64) -> bool {
    if tx.lock_time == 0 {
        return true;
    }
    let lock_time = tx.lock_time as i64;
    let threshold = if lock_time < LOCKTIME_THRESHOLD {
        block_height as i64
    } else {
        block_time
    };
    if lock_time < threshold {
        return true;
    }
    // Still final if every input opted out of nLockTime
    tx.inputs.iter().all(|txin| txin.sequence == SEQUENCE_FINAL)
}

/// Compute the BIP 68 lock points for `tx` given the confirmation height
/// of each spent coin and the chain tip.
///
/// `prev_heights` must have one entry per input; entries whose input
/// carries the disable flag are zeroed in place, matching the reference.
/// Enforcement requires transaction version 2 or higher (compared as
/// unsigned) and `LOCKTIME_VERIFY_SEQUENCE` in `flags`.
pub fn calculate_sequence_locks(
    tx: &Transaction,
    flags: u32,
    prev_heights: &mut [i32],
    tip: &BlockIndex<'_>,
) -> LockPoints {
    assert_eq!(prev_heights.len(), tx.inputs.len());

    let mut min_height: i32 = -1;
    let mut min_time: i64 = -1;

    // nVersion is signed; an unsigned comparison keeps the upper half of
    // the version range inside BIP 68.
    let enforce_bip68 = (tx.version as u32) >= 2 && flags & LOCKTIME_VERIFY_SEQUENCE != 0;
    if !enforce_bip68 {
        return (min_height, min_time);
    }

    for (txin, prev_height) in tx.inputs.iter().zip(prev_heights.iter_mut()) {
        if txin.sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
            // The height of this input is not relevant for sequence locks
            *prev_height = 0;
            continue;
        }

        let coin_height = *prev_height;
        let masked = (txin.sequence & SEQUENCE_LOCKTIME_MASK) as i64;

        if txin.sequence & SEQUENCE_LOCKTIME_TYPE_FLAG != 0 {
            // Time-based locks are measured from the smallest allowed
            // timestamp of the block holding the spent coin, which is the
            // median time-past of the block before it.
            let coin_time = tip
                .ancestor((coin_height - 1).max(0))
                .median_time_past();
            min_time = min_time.max(coin_time + (masked << SEQUENCE_LOCKTIME_GRANULARITY) - 1);
        } else {
            min_height = min_height.max(coin_height + masked as i32 - 1);
        }
    }

    (min_height, min_time)
}

/// Are the lock points satisfied for inclusion in the block after `tip`?
pub fn evaluate_sequence_locks(tip: &BlockIndex<'_>, lock_points: LockPoints) -> bool {
    let prev = match tip.prev() {
        Some(prev) => prev,
        None => panic!("sequence lock evaluation requires a non-genesis tip"),
    };
    let block_time = prev.median_time_past();
    !(lock_points.0 >= tip.height() || lock_points.1 >= block_time)
}

/// One-shot calculation and evaluation.
pub fn sequence_locks(
    tx: &Transaction,
    flags: u32,
    prev_heights: &mut [i32],
    tip: &BlockIndex<'_>,
) -> bool {
    evaluate_sequence_locks(tip, calculate_sequence_locks(tx, flags, prev_heights, tip))
}

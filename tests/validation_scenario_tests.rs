//! Scenario tests that exercise whole validation flows rather than
//! single functions: structural rejection, coinbase shape, Merkle
//! mutation, relative time locks, maturity and fee accounting.

use consensus_core::constants::{COINBASE_MATURITY, LOCKTIME_VERIFY_SEQUENCE, SEQUENCE_FINAL};
use consensus_core::locktime::{calculate_sequence_locks, evaluate_sequence_locks};
use consensus_core::merkle::compute_merkle_root;
use consensus_core::transaction::{check_transaction, check_tx_inputs};
use consensus_core::*;

fn spend_of(prevout: OutPoint, value: Amount) -> Transaction {
    Transaction {
        version: 1,
        inputs: vec![TxIn::new(prevout, Script::new(), SEQUENCE_FINAL)],
        outputs: vec![TxOut::new(value, Script::from(vec![0x51]))],
        lock_time: 0,
    }
}

fn token(err: ConsensusError) -> &'static str {
    err.token().expect("expected a consensus rejection")
}

#[test]
fn test_structural_rejection_comes_first() {
    // An input-less transaction never reaches the coin view
    let tx = Transaction {
        version: 1,
        inputs: vec![],
        outputs: vec![TxOut::new(1000, Script::new())],
        lock_time: 0,
    };
    assert_eq!(token(check_transaction(&tx, true).unwrap_err()), "bad-txns-vin-empty");
}

#[test]
fn test_coinbase_script_sig_length_window() {
    let coinbase = |sig_len: usize| Transaction {
        version: 1,
        inputs: vec![TxIn::new(
            OutPoint::null(),
            Script::from(vec![0u8; sig_len]),
            SEQUENCE_FINAL,
        )],
        outputs: vec![TxOut::new(50, Script::new())],
        lock_time: 0,
    };

    assert_eq!(token(check_transaction(&coinbase(1), true).unwrap_err()), "bad-cb-length");
    assert!(check_transaction(&coinbase(2), true).is_ok());
    assert!(check_transaction(&coinbase(100), true).is_ok());
    assert_eq!(token(check_transaction(&coinbase(101), true).unwrap_err()), "bad-cb-length");
}

#[test]
fn test_duplicated_tail_produces_same_root_but_is_flagged() {
    // CVE-2012-2459: repeating the final pair of leaves does not change
    // the root, so the root alone cannot distinguish the two blocks. The
    // mutation flag can.
    let leaf = |n: u8| [n; 32];
    let honest: Vec<Hash> = (1..=6).map(leaf).collect();
    let mut forged = honest.clone();
    forged.push(leaf(5));
    forged.push(leaf(6));

    let (honest_root, honest_mutated) = compute_merkle_root(honest);
    let (forged_root, forged_mutated) = compute_merkle_root(forged);

    assert_eq!(honest_root, forged_root);
    assert!(!honest_mutated);
    assert!(forged_mutated);
}

#[test]
fn test_relative_time_lock_clears_when_median_time_passes() {
    // Coin confirmed at height 50 of a chain whose median time-past is a
    // flat 1_000_000. A lock of 3 granularity units first becomes valid
    // at 1_000_000 + 3*512, so the last invalid time is 1_001_535.
    let coin_chain = Chain::from_timestamps(&[1_000_000; 100]);
    let coin_tip = coin_chain.tip().unwrap();

    let mut tx = spend_of(OutPoint::new([9; 32], 0), 1000);
    tx.version = 2;
    tx.inputs[0].sequence =
        consensus_core::constants::SEQUENCE_LOCKTIME_TYPE_FLAG | 3;

    let mut heights = vec![50];
    let lock_points =
        calculate_sequence_locks(&tx, LOCKTIME_VERIFY_SEQUENCE, &mut heights, &coin_tip);
    assert_eq!(lock_points, (-1, 1_001_535));

    // Inclusion is judged against the median time-past of the block
    // before the tip; equality is still too early.
    let too_early = Chain::from_timestamps(&[1_001_535; 20]);
    assert!(!evaluate_sequence_locks(&too_early.tip().unwrap(), lock_points));

    let late_enough = Chain::from_timestamps(&[1_001_536; 20]);
    assert!(evaluate_sequence_locks(&late_enough.tip().unwrap(), lock_points));
}

#[test]
fn test_coinbase_maturity_boundary() {
    let prevout = OutPoint::new([2; 32], 0);
    let mut view = MemoryCoinView::new();
    view.add_coin(prevout, Coin::new(TxOut::new(5000, Script::new()), 1000, true));

    let tx = spend_of(prevout, 4000);

    // 99 confirmations at spend height 1099
    let err = check_tx_inputs(&tx, &view, 1000 + COINBASE_MATURITY - 1).unwrap_err();
    assert_eq!(token(err), "bad-txns-premature-spend-of-coinbase");

    // 100 confirmations at spend height 1100
    assert_eq!(check_tx_inputs(&tx, &view, 1000 + COINBASE_MATURITY), Ok(1000));
}

#[test]
fn test_fee_cannot_go_negative() {
    let prevout = OutPoint::new([3; 32], 0);
    let tx = spend_of(prevout, 100);

    let mut poor = MemoryCoinView::new();
    poor.add_coin(prevout, Coin::new(TxOut::new(99, Script::new()), 10, false));
    assert_eq!(token(check_tx_inputs(&tx, &poor, 500).unwrap_err()), "bad-txns-in-belowout");

    let mut rich = MemoryCoinView::new();
    rich.add_coin(prevout, Coin::new(TxOut::new(101, Script::new()), 10, false));
    assert_eq!(check_tx_inputs(&tx, &rich, 500), Ok(1));
}

#[test]
fn test_spending_chain_through_memory_view() {
    // Confirm a funding transaction, then validate and apply a spend of
    // it, then reject a double spend of the same coin.
    let funding = Transaction {
        version: 1,
        inputs: vec![TxIn::new(OutPoint::new([7; 32], 0), Script::new(), SEQUENCE_FINAL)],
        outputs: vec![TxOut::new(10_000, Script::from(vec![0x51]))],
        lock_time: 0,
    };

    let mut view = MemoryCoinView::new();
    view.add_tx_outputs(&funding, 100);

    let spend = spend_of(OutPoint::new(funding.txid(), 0), 9_000);
    assert!(check_transaction(&spend, true).is_ok());
    assert_eq!(check_tx_inputs(&spend, &view, 300), Ok(1_000));

    view.spend(&spend.inputs[0].prevout);
    let err = check_tx_inputs(&spend, &view, 300).unwrap_err();
    assert_eq!(token(err), "bad-txns-inputs-missingorspent");
}

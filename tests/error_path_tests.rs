//! Exhaustive coverage of consensus rejection tokens and error surfaces

use anyhow::{bail, Result};
use consensus_core::constants::{MAX_MONEY, SEQUENCE_FINAL};
use consensus_core::transaction::{check_transaction, check_tx_inputs};
use consensus_core::*;

fn input(byte: u8) -> TxIn {
    TxIn::new(OutPoint::new([byte; 32], 0), Script::new(), SEQUENCE_FINAL)
}

fn expect_token(result: consensus_core::Result<()>, want: &str) -> Result<()> {
    match result {
        Err(err) if err.token() == Some(want) => Ok(()),
        Err(err) => bail!("expected token {want}, got {err}"),
        Ok(()) => bail!("expected token {want}, got Ok"),
    }
}

#[test]
fn test_empty_outputs() -> Result<()> {
    let tx = Transaction {
        version: 1,
        inputs: vec![input(1)],
        outputs: vec![],
        lock_time: 0,
    };
    expect_token(check_transaction(&tx, true), "bad-txns-vout-empty")
}

#[test]
fn test_oversize_stripped_encoding() -> Result<()> {
    // Just over a quarter of the block weight limit before witness data
    let tx = Transaction {
        version: 1,
        inputs: vec![input(1)],
        outputs: vec![TxOut::new(1, Script::from(vec![0u8; 1_000_000]))],
        lock_time: 0,
    };
    expect_token(check_transaction(&tx, true), "bad-txns-oversize")
}

#[test]
fn test_output_value_range() -> Result<()> {
    let with_values = |values: &[i64]| Transaction {
        version: 1,
        inputs: vec![input(1)],
        outputs: values.iter().map(|&v| TxOut::new(v, Script::new())).collect(),
        lock_time: 0,
    };

    expect_token(check_transaction(&with_values(&[-1]), true), "bad-txns-vout-negative")?;
    expect_token(
        check_transaction(&with_values(&[MAX_MONEY + 1]), true),
        "bad-txns-vout-toolarge",
    )?;
    // Each output is in range but the sum is not
    expect_token(
        check_transaction(&with_values(&[MAX_MONEY, 1]), true),
        "bad-txns-txouttotal-toolarge",
    )
}

#[test]
fn test_duplicate_inputs_only_when_requested() -> Result<()> {
    let tx = Transaction {
        version: 1,
        inputs: vec![input(1), input(1)],
        outputs: vec![TxOut::new(1, Script::new())],
        lock_time: 0,
    };
    expect_token(check_transaction(&tx, true), "bad-txns-inputs-duplicate")?;

    // Block-context callers run the duplicate check elsewhere
    check_transaction(&tx, false)?;
    Ok(())
}

#[test]
fn test_null_prevout_outside_coinbase() -> Result<()> {
    let tx = Transaction {
        version: 1,
        inputs: vec![input(1), TxIn::new(OutPoint::null(), Script::new(), SEQUENCE_FINAL)],
        outputs: vec![TxOut::new(1, Script::new())],
        lock_time: 0,
    };
    expect_token(check_transaction(&tx, true), "bad-txns-prevout-null")
}

#[test]
fn test_input_value_out_of_range() -> Result<()> {
    let prevout = OutPoint::new([5; 32], 0);
    let mut view = MemoryCoinView::new();
    view.add_coin(prevout, Coin::new(TxOut::new(MAX_MONEY + 1, Script::new()), 10, false));

    let tx = Transaction {
        version: 1,
        inputs: vec![TxIn::new(prevout, Script::new(), SEQUENCE_FINAL)],
        outputs: vec![TxOut::new(1, Script::new())],
        lock_time: 0,
    };
    expect_token(
        check_tx_inputs(&tx, &view, 500).map(|_| ()),
        "bad-txns-inputvalues-outofrange",
    )
}

#[test]
fn test_summed_input_values_out_of_range() -> Result<()> {
    // Two in-range coins whose sum exceeds the money limit
    let a = OutPoint::new([6; 32], 0);
    let b = OutPoint::new([6; 32], 1);
    let mut view = MemoryCoinView::new();
    view.add_coin(a, Coin::new(TxOut::new(MAX_MONEY, Script::new()), 10, false));
    view.add_coin(b, Coin::new(TxOut::new(1, Script::new()), 10, false));

    let tx = Transaction {
        version: 1,
        inputs: vec![
            TxIn::new(a, Script::new(), SEQUENCE_FINAL),
            TxIn::new(b, Script::new(), SEQUENCE_FINAL),
        ],
        outputs: vec![TxOut::new(1, Script::new())],
        lock_time: 0,
    };
    expect_token(
        check_tx_inputs(&tx, &view, 500).map(|_| ()),
        "bad-txns-inputvalues-outofrange",
    )
}

#[test]
fn test_rejection_display_carries_code_and_token() {
    let err = check_transaction(
        &Transaction {
            version: 1,
            inputs: vec![],
            outputs: vec![],
            lock_time: 0,
        },
        true,
    )
    .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("bad-txns-vin-empty"), "{text}");
    assert!(text.contains("0x10"), "{text}");
}

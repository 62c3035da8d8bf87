//! Transaction-level signature-operation accounting
//!
//! Three counts exist because deployment staged them with different
//! weight factors: the legacy count over raw scripts, the P2SH count
//! over redeem scripts, and the witness count supplied by the script
//! engine. The combined cost is what blocks budget against
//! `MAX_BLOCK_SIGOPS_COST`.

use crate::coins::{fetch_coin, CoinView};
use crate::constants::{SCRIPT_VERIFY_P2SH, WITNESS_SCALE_FACTOR};
use crate::script::Script;
use crate::types::{Transaction, Witness};

/// Oracle for witness sigop counting, implemented by the script engine.
pub trait WitnessSigOps {
    /// Non-negative count for one input spend under `flags`.
    fn count_witness_sig_ops(
        &self,
        script_sig: &Script,
        script_pubkey: &Script,
        witness: &Witness,
        flags: u32,
    ) -> i64;
}

/// Oracle for callers that validate without witness rules.
pub struct NoWitnessSigOps;

impl WitnessSigOps for NoWitnessSigOps {
    fn count_witness_sig_ops(&self, _: &Script, _: &Script, _: &Witness, _: u32) -> i64 {
        0
    }
}

/// Legacy count over every scriptSig and scriptPubKey, inaccurate
/// multisig weighting. Coinbase inputs are counted too; callers never
/// admit coinbases to a mempool, so the distinction is moot there.
pub fn legacy_sig_op_count(tx: &Transaction) -> u32 {
    let mut n: u32 = 0;
    for txin in &tx.inputs {
        n = n.saturating_add(txin.script_sig.sig_op_count(false));
    }
    for txout in &tx.outputs {
        n = n.saturating_add(txout.script_pubkey.sig_op_count(false));
    }
    n
}

/// Accurate count of sigops hidden behind P2SH previous outputs.
pub fn p2sh_sig_op_count(tx: &Transaction, coins: &impl CoinView) -> u32 {
    if tx.is_coinbase() {
        return 0;
    }

    let mut n: u32 = 0;
    for txin in &tx.inputs {
        let coin = fetch_coin(coins, &txin.prevout);
        if coin.output.script_pubkey.is_pay_to_script_hash() {
            n = n.saturating_add(coin.output.script_pubkey.p2sh_sig_op_count(&txin.script_sig));
        }
    }
    n
}

/// Total sigop cost of a transaction.
///
/// Legacy sigops weigh `WITNESS_SCALE_FACTOR` each, P2SH sigops likewise
/// when `SCRIPT_VERIFY_P2SH` is active, and witness sigops weigh one.
/// For a coinbase only the legacy term applies.
pub fn transaction_sig_op_cost(
    tx: &Transaction,
    coins: &impl CoinView,
    flags: u32,
    witness_ops: &impl WitnessSigOps,
) -> i64 {
    let mut cost = legacy_sig_op_count(tx) as i64 * WITNESS_SCALE_FACTOR as i64;

    if tx.is_coinbase() {
        return cost;
    }

    if flags & SCRIPT_VERIFY_P2SH != 0 {
        cost += p2sh_sig_op_count(tx, coins) as i64 * WITNESS_SCALE_FACTOR as i64;
    }

    for txin in &tx.inputs {
        let coin = fetch_coin(coins, &txin.prevout);
        cost += witness_ops.count_witness_sig_ops(
            &txin.script_sig,
            &coin.output.script_pubkey,
            &txin.witness,
            flags,
        );
    }
    cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coins::{Coin, MemoryCoinView};
    use crate::constants::SEQUENCE_FINAL;
    use crate::opcodes::*;
    use crate::types::{OutPoint, TxIn, TxOut};

    fn p2sh_script_pubkey() -> Script {
        let mut spk = vec![OP_HASH160, 0x14];
        spk.extend([0u8; 20]);
        spk.push(OP_EQUAL);
        Script::from(spk)
    }

    fn tx_spending(script_sig: Vec<u8>, script_pubkey: Vec<u8>) -> Transaction {
        Transaction {
            version: 1,
            inputs: vec![TxIn::new(
                OutPoint::new([1; 32], 0),
                Script::from(script_sig),
                SEQUENCE_FINAL,
            )],
            outputs: vec![TxOut::new(1000, Script::from(script_pubkey))],
            lock_time: 0,
        }
    }

    fn view_with_script_pubkey(script_pubkey: Script) -> MemoryCoinView {
        let mut view = MemoryCoinView::new();
        view.add_coin(
            OutPoint::new([1; 32], 0),
            Coin::new(TxOut::new(5000, script_pubkey), 0, false),
        );
        view
    }

    struct FixedWitnessSigOps(i64);

    impl WitnessSigOps for FixedWitnessSigOps {
        fn count_witness_sig_ops(&self, _: &Script, _: &Script, _: &Witness, _: u32) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_legacy_count_sums_both_sides() {
        let tx = tx_spending(vec![OP_CHECKSIG], vec![OP_CHECKSIG, OP_CHECKSIGVERIFY]);
        assert_eq!(legacy_sig_op_count(&tx), 3);
    }

    #[test]
    fn test_legacy_count_multisig_cap() {
        let tx = tx_spending(vec![], vec![OP_2, OP_CHECKMULTISIG]);
        // inaccurate counting charges the full cap
        assert_eq!(legacy_sig_op_count(&tx), 20);
    }

    #[test]
    fn test_legacy_count_includes_coinbase_input() {
        let tx = Transaction {
            version: 1,
            inputs: vec![TxIn::new(
                OutPoint::null(),
                Script::from(vec![OP_CHECKSIG, OP_CHECKSIG]),
                SEQUENCE_FINAL,
            )],
            outputs: vec![TxOut::new(1, Script::new())],
            lock_time: 0,
        };
        assert_eq!(legacy_sig_op_count(&tx), 2);
    }

    #[test]
    fn test_p2sh_count_reads_redeem_script() {
        let redeem = vec![OP_3, OP_CHECKMULTISIG];
        let mut script_sig = vec![redeem.len() as u8];
        script_sig.extend(&redeem);

        let tx = tx_spending(script_sig, vec![]);
        let view = view_with_script_pubkey(p2sh_script_pubkey());
        assert_eq!(p2sh_sig_op_count(&tx, &view), 3);
    }

    #[test]
    fn test_p2sh_count_zero_for_plain_previous_output() {
        let tx = tx_spending(vec![0x01, 0xaa], vec![]);
        let view = view_with_script_pubkey(Script::from(vec![OP_CHECKSIG]));
        assert_eq!(p2sh_sig_op_count(&tx, &view), 0);
    }

    #[test]
    fn test_sig_op_cost_weighting() {
        let redeem = vec![OP_2, OP_CHECKMULTISIG];
        let mut script_sig = vec![redeem.len() as u8];
        script_sig.extend(&redeem);

        let tx = tx_spending(script_sig, vec![OP_CHECKSIG]);
        let view = view_with_script_pubkey(p2sh_script_pubkey());

        // legacy: 1 (output) * 4; p2sh: 2 * 4; witness oracle: 5
        let cost = transaction_sig_op_cost(&tx, &view, SCRIPT_VERIFY_P2SH, &FixedWitnessSigOps(5));
        assert_eq!(cost, 4 + 8 + 5);

        // without the P2SH flag the middle term disappears
        let cost = transaction_sig_op_cost(&tx, &view, 0, &FixedWitnessSigOps(5));
        assert_eq!(cost, 4 + 5);
    }

    #[test]
    fn test_sig_op_cost_coinbase_short_circuits() {
        let tx = Transaction {
            version: 1,
            inputs: vec![TxIn::new(
                OutPoint::null(),
                Script::from(vec![0x00, 0x00]),
                SEQUENCE_FINAL,
            )],
            outputs: vec![TxOut::new(1, Script::from(vec![OP_CHECKSIG]))],
            lock_time: 0,
        };
        let view = MemoryCoinView::new();
        let cost = transaction_sig_op_cost(&tx, &view, SCRIPT_VERIFY_P2SH, &FixedWitnessSigOps(99));
        assert_eq!(cost, 4);
    }
}

//! Canonical transaction encoding and hashing
//!
//! Reproduces the network's byte layout bit-exactly: little-endian
//! integers, CompactSize counts, and the BIP 144 marker/flag extension
//! when witness data is present and requested. Transaction identifiers
//! are the double-SHA-256 of these encodings.

use sha2::{Digest, Sha256};

use crate::types::{Hash, Transaction};

/// Omit witness stacks from the encoding (txid dialect).
pub const SERIALIZE_TRANSACTION_NO_WITNESS: u32 = 0x4000_0000;

/// Encoding dialect selector; passed through opaquely by the core.
pub const PROTOCOL_VERSION: u32 = 70015;

/// Double-SHA-256.
pub fn double_sha256(bytes: &[u8]) -> Hash {
    let first = Sha256::digest(bytes);
    let second = Sha256::digest(first);
    let mut out = [0u8; 32];
    out.copy_from_slice(&second);
    out
}

fn write_compact_size(out: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        out.push(n as u8);
    } else if n <= 0xffff {
        out.push(0xfd);
        out.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        out.push(0xfe);
        out.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        out.push(0xff);
        out.extend_from_slice(&n.to_le_bytes());
    }
}

/// Canonical encoding of a transaction under `flags`.
///
/// The witness extension is emitted only when witness data exists and
/// `SERIALIZE_TRANSACTION_NO_WITNESS` is not set, exactly like the
/// reference encoder.
pub fn serialize_tx(tx: &Transaction, flags: u32) -> Vec<u8> {
    let with_witness = flags & SERIALIZE_TRANSACTION_NO_WITNESS == 0 && tx.has_witness();

    let mut out = Vec::new();
    out.extend_from_slice(&tx.version.to_le_bytes());

    if with_witness {
        // BIP 144 marker and flag
        out.push(0x00);
        out.push(0x01);
    }

    write_compact_size(&mut out, tx.inputs.len() as u64);
    for txin in &tx.inputs {
        out.extend_from_slice(&txin.prevout.txid);
        out.extend_from_slice(&txin.prevout.vout.to_le_bytes());
        write_compact_size(&mut out, txin.script_sig.len() as u64);
        out.extend_from_slice(txin.script_sig.as_bytes());
        out.extend_from_slice(&txin.sequence.to_le_bytes());
    }

    write_compact_size(&mut out, tx.outputs.len() as u64);
    for txout in &tx.outputs {
        out.extend_from_slice(&txout.value.to_le_bytes());
        write_compact_size(&mut out, txout.script_pubkey.len() as u64);
        out.extend_from_slice(txout.script_pubkey.as_bytes());
    }

    if with_witness {
        for txin in &tx.inputs {
            write_compact_size(&mut out, txin.witness.len() as u64);
            for element in &txin.witness {
                write_compact_size(&mut out, element.len() as u64);
                out.extend_from_slice(element);
            }
        }
    }

    out.extend_from_slice(&tx.lock_time.to_le_bytes());
    out
}

/// Byte length of the canonical encoding under `flags`.
pub fn serialized_size(tx: &Transaction, flags: u32) -> usize {
    serialize_tx(tx, flags).len()
}

/// Double-SHA-256 of the canonical encoding under `flags`.
pub fn serialize_hash(tx: &Transaction, flags: u32) -> Hash {
    double_sha256(&serialize_tx(tx, flags))
}

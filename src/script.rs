//! Script byte-walking and shape classification
//!
//! A script is a flat byte string. The walker reads one opcode at a time
//! and, for push opcodes, extracts the immediate payload. Nothing here
//! executes a script: unknown and disabled opcodes decode fine, and only
//! malformed push data is an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_OPCODE, MAX_PUBKEYS_PER_MULTISIG, MAX_SCRIPT_ELEMENT_SIZE};
use crate::opcodes::*;

/// Decode failure while walking a script.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptError {
    /// A push length prefix extends past the end of the script
    #[error("truncated push length prefix")]
    TruncatedLength,
    /// A declared push payload extends past the end of the script
    #[error("push payload extends past end of script")]
    TruncatedPayload,
}

/// An owned script byte buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

impl Script {
    pub fn new() -> Self {
        Script(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walk the script one (opcode, payload) step at a time.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions {
            data: &self.0,
            pc: 0,
            done: false,
        }
    }

    /// Every step decodes cleanly, no opcode exceeds `MAX_OPCODE`, and no
    /// push payload exceeds `MAX_SCRIPT_ELEMENT_SIZE` bytes.
    pub fn has_valid_ops(&self) -> bool {
        self.instructions().all(|step| match step {
            Ok((opcode, payload)) => {
                opcode <= MAX_OPCODE && payload.len() <= MAX_SCRIPT_ELEMENT_SIZE
            }
            Err(_) => false,
        })
    }

    /// Every decoded opcode is push-type (≤ `OP_16`). `OP_RESERVED`
    /// counts as push-type even though executing it would fail.
    pub fn is_push_only(&self) -> bool {
        self.instructions().all(|step| match step {
            Ok((opcode, _)) => opcode <= OP_16,
            Err(_) => false,
        })
    }

    /// Extra-fast test for pay-to-script-hash scripts.
    pub fn is_pay_to_script_hash(&self) -> bool {
        self.0.len() == 23 && self.0[0] == OP_HASH160 && self.0[1] == 0x14 && self.0[22] == OP_EQUAL
    }

    /// Extra-fast test for pay-to-witness-script-hash scripts.
    pub fn is_pay_to_witness_script_hash(&self) -> bool {
        self.0.len() == 34 && self.0[0] == OP_0 && self.0[1] == 0x20
    }

    /// A witness program is a 1-byte version opcode followed by a single
    /// push of 2 to 40 bytes. Returns `(version, program)`.
    pub fn witness_program(&self) -> Option<(u8, &[u8])> {
        if self.0.len() < 4 || self.0.len() > 42 {
            return None;
        }
        if self.0[0] != OP_0 && !(OP_1..=OP_16).contains(&self.0[0]) {
            return None;
        }
        if self.0[1] as usize + 2 != self.0.len() {
            return None;
        }
        Some((decode_op_n(self.0[0]), &self.0[2..]))
    }

    /// Legacy signature-operation count.
    ///
    /// `OP_CHECKSIG(VERIFY)` adds one. `OP_CHECKMULTISIG(VERIFY)` adds the
    /// value of the immediately preceding `OP_1..OP_16` when `accurate`,
    /// otherwise `MAX_PUBKEYS_PER_MULTISIG`. If decoding halts mid-script
    /// the count accumulated so far is returned without an error signal.
    pub fn sig_op_count(&self, accurate: bool) -> u32 {
        let mut n: u32 = 0;
        let mut last_opcode = OP_INVALIDOPCODE;
        for step in self.instructions() {
            let (opcode, _) = match step {
                Ok(op) => op,
                Err(_) => break,
            };
            if opcode == OP_CHECKSIG || opcode == OP_CHECKSIGVERIFY {
                n = n.saturating_add(1);
            } else if opcode == OP_CHECKMULTISIG || opcode == OP_CHECKMULTISIGVERIFY {
                if accurate && (OP_1..=OP_16).contains(&last_opcode) {
                    n = n.saturating_add(decode_op_n(last_opcode) as u32);
                } else {
                    n = n.saturating_add(MAX_PUBKEYS_PER_MULTISIG);
                }
            }
            last_opcode = opcode;
        }
        n
    }

    /// Sigop count charged to a P2SH spend, where `self` is the previous
    /// output's scriptPubKey and `script_sig` the spending input script.
    ///
    /// The scriptSig must be push-only; its final push is reinterpreted as
    /// the redeem script and counted accurately. Any non-push opcode or
    /// decode failure yields zero.
    pub fn p2sh_sig_op_count(&self, script_sig: &Script) -> u32 {
        if !self.is_pay_to_script_hash() {
            return self.sig_op_count(true);
        }
        let mut last_push: &[u8] = &[];
        for step in script_sig.instructions() {
            match step {
                Ok((opcode, payload)) => {
                    if opcode > OP_16 {
                        return 0;
                    }
                    last_push = payload;
                }
                Err(_) => return 0,
            }
        }
        Script::from(last_push.to_vec()).sig_op_count(true)
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl From<&[u8]> for Script {
    fn from(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Non-executing iterator over `(opcode, payload)` steps of a script.
///
/// Yields `Err` once on a malformed push and then fuses; the payload is
/// empty for every non-push opcode.
pub struct Instructions<'a> {
    data: &'a [u8],
    pc: usize,
    done: bool,
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<(u8, &'a [u8]), ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pc >= self.data.len() {
            return None;
        }
        let opcode = self.data[self.pc];
        self.pc += 1;

        if opcode > OP_PUSHDATA4 {
            return Some(Ok((opcode, &self.data[..0])));
        }

        // Immediate operand: direct pushes encode the length in the
        // opcode itself, OP_PUSHDATA1/2/4 carry a little-endian prefix.
        let size = if opcode < OP_PUSHDATA1 {
            opcode as usize
        } else {
            let prefix_len = match opcode {
                OP_PUSHDATA1 => 1,
                OP_PUSHDATA2 => 2,
                _ => 4,
            };
            if self.data.len() - self.pc < prefix_len {
                self.done = true;
                return Some(Err(ScriptError::TruncatedLength));
            }
            let prefix = &self.data[self.pc..self.pc + prefix_len];
            self.pc += prefix_len;
            match opcode {
                OP_PUSHDATA1 => prefix[0] as usize,
                OP_PUSHDATA2 => u16::from_le_bytes([prefix[0], prefix[1]]) as usize,
                _ => u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize,
            }
        };

        if self.data.len() - self.pc < size {
            self.done = true;
            return Some(Err(ScriptError::TruncatedPayload));
        }
        let payload = &self.data[self.pc..self.pc + size];
        self.pc += size;
        Some(Ok((opcode, payload)))
    }
}

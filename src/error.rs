//! Error types for consensus validation
//!
//! Errors are values. A consensus rejection carries the stable
//! `(reason, reject_code, token)` triple that is visible to peers; the
//! remaining variants are structural impossibilities that a conforming
//! peer could never have produced.

use thiserror::Error;

use crate::constants::REJECT_INVALID;

/// Why a candidate was rejected. Mirrors the reference's
/// `ValidationInvalidReason` values that this core can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Violation of a context-free or contextual consensus rule
    Consensus,
    /// Referenced outputs are missing from or spent in the coin view
    TxMissingInputs,
    /// Coinbase output spent before reaching maturity
    TxPrematureSpend,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// Terminal verdict for the current candidate. Callers must not retry
    /// with the same inputs; the token is a stable ASCII identifier.
    #[error("transaction rejected: {token} (reject code {reject_code:#04x})")]
    TxInvalid {
        reason: InvalidReason,
        reject_code: u8,
        token: &'static str,
    },

    /// Amount arithmetic left the valid money range. A conforming peer
    /// cannot produce such a transaction; callers may abort wider work.
    #[error("amount out of range in {0}")]
    ValueOutOfRange(&'static str),
}

impl ConsensusError {
    /// Consensus rejection with `REJECT_INVALID` and the given token.
    pub fn invalid(reason: InvalidReason, token: &'static str) -> Self {
        ConsensusError::TxInvalid {
            reason,
            reject_code: REJECT_INVALID,
            token,
        }
    }

    /// Plain consensus-rule rejection.
    pub fn consensus(token: &'static str) -> Self {
        Self::invalid(InvalidReason::Consensus, token)
    }

    /// Reject token, if this is a rejection.
    pub fn token(&self) -> Option<&'static str> {
        match self {
            ConsensusError::TxInvalid { token, .. } => Some(token),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsensusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_carries_triple() {
        let err = ConsensusError::consensus("bad-txns-vin-empty");
        match err {
            ConsensusError::TxInvalid {
                reason,
                reject_code,
                token,
            } => {
                assert_eq!(reason, InvalidReason::Consensus);
                assert_eq!(reject_code, REJECT_INVALID);
                assert_eq!(token, "bad-txns-vin-empty");
            }
            _ => panic!("expected TxInvalid"),
        }
    }

    #[test]
    fn test_token_accessor() {
        let err = ConsensusError::invalid(InvalidReason::TxPrematureSpend, "bad-txns-premature-spend-of-coinbase");
        assert_eq!(err.token(), Some("bad-txns-premature-spend-of-coinbase"));
        assert_eq!(ConsensusError::ValueOutOfRange("value_out").token(), None);
    }

    #[test]
    fn test_display_includes_token() {
        let err = ConsensusError::consensus("bad-txns-oversize");
        let msg = err.to_string();
        assert!(msg.contains("bad-txns-oversize"));
        assert!(msg.contains("0x10"));
    }
}

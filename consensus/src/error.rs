//! Consensus error types. All variants are consensus-fatal: the offending
//! block is rejected, never retried.

use slate_ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("block timestamp {0} is more than one interval from its slot")]
    TimestampOutOfTolerance(u64),

    #[error("slot {slot} belongs to delegate {expected:?}, block signed by {got}")]
    WrongProducer {
        slot: u64,
        expected: Option<u32>,
        got: u32,
    },

    #[error("producer {0} has no usable signing key registered")]
    UnknownProducerKey(u32),

    #[error("block signature does not verify against the producer's key")]
    BadSignature,

    #[error("claimed fee {claimed} exceeds the cap {cap}")]
    FeeTooLarge { claimed: u64, cap: u64 },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

use slate_consensus::ConsensusError;
use slate_ledger::LedgerError;
use slate_store::StoreError;
use slate_transactions::TxError;
use thiserror::Error;

/// Top-level node errors.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("consensus error: {0}")]
    Consensus(#[from] ConsensusError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("block for a stale slot discarded")]
    StaleBlock,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mempool admission failures. Recoverable: the submitter may retry with
/// different inputs; nothing here is consensus-fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    #[error("mempool is full")]
    MempoolFull,

    #[error("transaction already pending")]
    DuplicateTransaction,

    #[error("input {0} not found in the committed unspent set")]
    UnknownInput(String),

    #[error("input {0} is already consumed by a pending transaction")]
    InputPending(String),

    #[error("projected votes would cross the concentration cap")]
    CapProjection,

    #[error(transparent)]
    Structure(#[from] TxError),
}

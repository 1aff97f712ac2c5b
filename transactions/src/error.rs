//! Structural validation errors for transactions and blocks.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TxError {
    #[error("varint ran past the end of the buffer")]
    TruncatedVarint,

    #[error("delegate id {0} does not fit the wire width")]
    DelegateIdOutOfRange(i64),

    #[error("transaction spends input {0} twice")]
    DuplicateInput(String),

    #[error("transaction has neither inputs nor outputs")]
    Empty,

    #[error("invalid delegate name: {0:?}")]
    BadName(String),

    #[error("delegate fee output outside the terminal transaction")]
    MisplacedFeeOutput,

    #[error("block height {height} does not follow parent height {parent}")]
    NonSequentialHeight { height: u64, parent: u64 },
}

//! Ledger errors. Every variant is consensus-fatal for the block that
//! triggered it: the block is rejected and state is left unchanged.

use slate_transactions::TxError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("input {0} does not reference a known unspent output")]
    UnknownOutput(String),

    #[error("input {0} is spent twice within the block")]
    DoubleSpend(String),

    #[error("vote references unknown delegate {0}")]
    UnknownDelegate(u32),

    #[error("vote references resigned delegate {0}")]
    ResignedDelegate(u32),

    #[error("delegate {delegate} projected net votes {projected} exceed cap {cap}")]
    VoteCapExceeded {
        delegate: u32,
        projected: i128,
        cap: i128,
    },

    #[error("delegate name {0:?} is already registered")]
    NameTaken(String),

    #[error("delegate id {0} is already registered")]
    IdTaken(u32),

    #[error("claim renews name {name:?} with mismatched delegate id")]
    ClaimIdMismatch { name: String },

    #[error("registration fee too small: burned {burned}, required {required}")]
    InsufficientRegistrationFee { required: u64, burned: u64 },

    #[error("renewal of {name:?} outside the renewal window")]
    RenewalOutsideWindow { name: String },

    #[error("transaction {tx} creates more value than it consumes")]
    OutputsExceedInputs { tx: String },

    #[error("transaction {tx} issues new supply outside the genesis block")]
    IssuanceOutsideGenesis { tx: String },

    #[error("delegate fee {claimed} exceeds the block's fee pool {pool}")]
    FeeExceedsPool { claimed: u64, pool: u64 },

    #[error("block height {got} does not extend tip height {tip}")]
    NonSequentialHeight { tip: u64, got: u64 },

    #[error("block prev hash does not match the chain tip")]
    PrevHashMismatch,

    #[error(transparent)]
    Structure(#[from] TxError),
}

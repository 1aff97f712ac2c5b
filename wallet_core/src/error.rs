use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("insufficient spendable funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("wallet holds no spendable outputs")]
    NoSpendableOutputs,
}

//! Wallet-side vote and input selection.
//!
//! The ranking index is authoritative for block production, but wallets
//! override it with their own trust policy and locally observed delegate
//! scores when deciding where each outgoing transaction's vote goes.
//!
//! ## Module overview
//!
//! - [`trust_policy`] — per-wallet trusted/distrusted delegate sets.
//! - [`vote_selector`] — pick the vote target for an outgoing transaction.
//! - [`input_selector`] — pick which unspent outputs to consume.
//! - [`transaction_builder`] — assemble and sign the transaction.
//! - [`wallet`] — facade tying key, policy and selection together.

pub mod error;
pub mod input_selector;
pub mod transaction_builder;
pub mod trust_policy;
pub mod vote_selector;
pub mod wallet;

pub use error::WalletError;
pub use input_selector::select_inputs;
pub use transaction_builder::build_payment;
pub use trust_policy::TrustPolicy;
pub use vote_selector::select_vote_target;
pub use wallet::Wallet;

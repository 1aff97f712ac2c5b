//! Vote accounting, delegate registry and ranking for the Slate DPOS core.
//!
//! Shareholders elect block producers through per-transaction votes carried
//! by unspent outputs. This crate owns the committed chain state:
//!
//! - [`tally`] — per-delegate net vote totals derived from unspent outputs,
//!   with the 2% concentration cap.
//! - [`registry`] — delegate registration, renewal and resignation.
//! - [`ranking`] — ordered view over eligible delegates by net votes.
//! - [`revenue`] — rolling per-block revenue mean driving fee pricing.
//! - [`utxo`] — the unspent-output set.
//! - [`chain`] — atomic block application tying the above together.

pub mod chain;
pub mod error;
pub mod ranking;
pub mod registry;
pub mod revenue;
pub mod tally;
pub mod utxo;

pub use chain::{BlockReceipt, ChainState};
pub use error::LedgerError;
pub use ranking::RankingIndex;
pub use registry::{ClaimAction, DelegateRegistry, RegistryEntry};
pub use revenue::RevenueWindow;
pub use tally::VoteTally;
pub use utxo::UtxoSet;

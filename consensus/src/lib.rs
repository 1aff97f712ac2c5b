//! Consensus — deterministic slot scheduling and delegate scoring.
//!
//! The top-ranked delegates produce blocks at fixed wall-clock slots;
//! every node validates arrivals against the schedule and keeps local
//! statistics about each producer's behaviour.
//!
//! ## Module overview
//!
//! - [`scheduler`] — UTC instant → authorized producer mapping.
//! - [`median`] — bounded-reservoir streaming median estimator.
//! - [`observer`] — per-delegate production statistics.
//! - [`score`] — comparative metric ranking feeding wallet vote choices.
//! - [`validator`] — block acceptance: producer, signature, fee, ledger.
//! - [`error`] — consensus error types.

pub mod error;
pub mod median;
pub mod observer;
pub mod scheduler;
pub mod score;
pub mod validator;

pub use error::ConsensusError;
pub use median::StreamingMedian;
pub use observer::{BlockObservation, Observation, ScoreObserver};
pub use scheduler::{SlotSchedule, SlotStatus};
pub use score::{rank_delegates, DelegateScore, ScoreWeights};
pub use validator::BlockValidator;

//! The Slate node — wires the DPOS core subsystems together.
//!
//! The core is single-writer, multi-reader: block application and mempool
//! admission serialize through one coordinator, while readers work against
//! the last committed snapshot.
//!
//! ## Module overview
//!
//! - [`config`] — TOML-backed node configuration.
//! - [`logging`] — structured logging initialisation.
//! - [`mempool`] — transaction admission with pending-spend tracking.
//! - [`ingest`] — buffering of future-slot blocks, discard of stale ones.
//! - [`service`] — the single-writer chain coordinator and snapshots.
//! - [`producer`] — slot timer loop for local delegate identities.
//! - [`shutdown`] — cooperative shutdown signalling.
//! - [`node`] — top-level assembly with LMDB persistence and replay.

pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod mempool;
pub mod node;
pub mod producer;
pub mod service;
pub mod shutdown;

pub use config::NodeConfig;
pub use error::{AdmissionError, NodeError};
pub use ingest::{IngestBuffer, IngestDecision};
pub use mempool::Mempool;
pub use node::SlateNode;
pub use producer::ProducerIdentity;
pub use service::ChainService;
pub use shutdown::ShutdownController;

//! Fundamental types for the Slate DPOS protocol.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, hashes, amounts, timestamps, delegate identifiers,
//! signing keys, and network parameters.

pub mod address;
pub mod amount;
pub mod crypto;
pub mod delegate;
pub mod hash;
pub mod keys;
pub mod params;
pub mod time;

pub use address::Address;
pub use amount::ShareAmount;
pub use delegate::{DelegateId, DelegateNum, VotePolarity};
pub use hash::{BlockHash, TxHash};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use params::NetworkParams;
pub use time::Timestamp;

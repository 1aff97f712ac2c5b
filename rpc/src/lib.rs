//! Remote-procedure client surface.
//!
//! The node exposes a small method set to wallets over a bidirectional
//! byte stream carrying JSON request/response frames, one in-flight call
//! per connection pair. This crate defines the method contract and the
//! stream client; transport setup and authentication policy live with the
//! caller.

pub mod api;
pub mod client;
pub mod error;

pub use api::{BlockHeader, ClientApi};
pub use client::JsonClient;
pub use error::RpcError;

//! The client-visible method surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use slate_transactions::Transaction;
use slate_types::{Address, BlockHash, DelegateNum, Signature, Timestamp, TxHash};
use std::path::Path;

use crate::error::RpcError;

/// A signed block header, as returned by `getblock`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub hash: BlockHash,
    pub height: u64,
    pub prev: BlockHash,
    pub timestamp: Timestamp,
    pub producer: DelegateNum,
    pub signature: Signature,
}

/// The remote method set a wallet may call on a node.
///
/// One in-flight call per connection pair; every method is a plain
/// request/response exchange and the node publishes no events on this
/// channel beyond call replies.
#[async_trait]
pub trait ClientApi {
    /// Authenticate the connection. All other calls require a prior
    /// successful login.
    async fn login(&mut self, user: &str, pass: &str) -> Result<bool, RpcError>;

    /// Send `amount` shares to `address`; returns the transaction id.
    async fn transfer(&mut self, amount: u64, address: &Address) -> Result<TxHash, RpcError>;

    /// Balance for one asset type.
    async fn getbalance(&mut self, asset_type: u32) -> Result<u64, RpcError>;

    /// Fetch a signed transaction by id.
    async fn get_transaction(&mut self, tx_id: TxHash) -> Result<Transaction, RpcError>;

    /// Fetch a signed block header by height.
    async fn getblock(&mut self, height: u64) -> Result<BlockHeader, RpcError>;

    /// Whether the address parses and checksums correctly.
    async fn validateaddress(&mut self, address: &Address) -> Result<bool, RpcError>;

    /// Import keys from a bitcoin wallet file.
    async fn import_bitcoin_wallet(&mut self, path: &Path, pass: &str)
        -> Result<bool, RpcError>;
}

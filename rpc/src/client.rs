//! JSON frame client over any bidirectional byte stream.
//!
//! Frames are newline-delimited JSON objects. Requests carry an id,
//! method name and positional params; responses echo the id with either
//! a result or an error string. With one in-flight call per connection,
//! the next line read always answers the last request written.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use slate_transactions::Transaction;
use slate_types::{Address, TxHash};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf};

use crate::api::{BlockHeader, ClientApi};
use crate::error::RpcError;

/// A request/response client over a byte stream.
pub struct JsonClient<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    next_id: u64,
}

impl<S: AsyncRead + AsyncWrite> JsonClient<S> {
    pub fn new(stream: S) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            next_id: 0,
        }
    }

    async fn call<T: DeserializeOwned>(
        &mut self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        self.next_id += 1;
        let request = json!({ "id": self.next_id, "method": method, "params": params });
        let mut line = serde_json::to_string(&request)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;

        let mut reply = String::new();
        let n = self.reader.read_line(&mut reply).await?;
        if n == 0 {
            return Err(RpcError::ConnectionClosed);
        }
        let frame: Value = serde_json::from_str(&reply)?;
        if frame.get("id").and_then(Value::as_u64) != Some(self.next_id) {
            return Err(RpcError::Protocol("response id mismatch".into()));
        }
        if let Some(err) = frame.get("error").and_then(Value::as_str) {
            return Err(RpcError::Remote(err.to_string()));
        }
        let result = frame
            .get("result")
            .ok_or_else(|| RpcError::Protocol("frame has neither result nor error".into()))?;
        Ok(serde_json::from_value(result.clone())?)
    }
}

#[async_trait]
impl<S: AsyncRead + AsyncWrite + Send> ClientApi for JsonClient<S> {
    async fn login(&mut self, user: &str, pass: &str) -> Result<bool, RpcError> {
        self.call("login", json!([user, pass])).await
    }

    async fn transfer(&mut self, amount: u64, address: &Address) -> Result<TxHash, RpcError> {
        self.call("transfer", json!([amount, address])).await
    }

    async fn getbalance(&mut self, asset_type: u32) -> Result<u64, RpcError> {
        self.call("getbalance", json!([asset_type])).await
    }

    async fn get_transaction(&mut self, tx_id: TxHash) -> Result<Transaction, RpcError> {
        self.call("get_transaction", json!([tx_id])).await
    }

    async fn getblock(&mut self, height: u64) -> Result<BlockHeader, RpcError> {
        self.call("getblock", json!([height])).await
    }

    async fn validateaddress(&mut self, address: &Address) -> Result<bool, RpcError> {
        self.call("validateaddress", json!([address])).await
    }

    async fn import_bitcoin_wallet(
        &mut self,
        path: &Path,
        pass: &str,
    ) -> Result<bool, RpcError> {
        self.call("import_bitcoin_wallet", json!([path, pass])).await
    }
}

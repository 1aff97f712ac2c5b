//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use slate_types::NetworkParams;
use std::path::{Path, PathBuf};

use crate::NodeError;

/// Configuration for a Slate node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for ledger storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Network constants. Every node on a network must agree on these.
    #[serde(default)]
    pub params: NetworkParams,

    /// Maximum transactions held in the mempool.
    #[serde(default = "default_mempool_capacity")]
    pub mempool_capacity: usize,

    /// Maximum buffered future-slot blocks.
    #[serde(default = "default_ingest_capacity")]
    pub ingest_capacity: usize,

    /// Maximum transactions packed into a produced block.
    #[serde(default = "default_block_tx_limit")]
    pub block_tx_limit: usize,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            params: NetworkParams::default(),
            mempool_capacity: default_mempool_capacity(),
            ingest_capacity: default_ingest_capacity(),
            block_tx_limit: default_block_tx_limit(),
            map_size: default_map_size(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./slate_data")
}

fn default_mempool_capacity() -> usize {
    8_192
}

fn default_ingest_capacity() -> usize {
    1_024
}

fn default_block_tx_limit() -> usize {
    512
}

fn default_map_size() -> usize {
    1 << 30
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::block::LmdbBlockStore;
use crate::meta::LmdbMetaStore;
use crate::observation::LmdbObservationStore;
use crate::registry::LmdbRegistryStore;
use crate::utxo::LmdbUtxoStore;
use crate::LmdbError;

/// Number of named databases in the environment.
pub const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) blocks_db: Database<Bytes, Bytes>,
    pub(crate) utxos_db: Database<Bytes, Bytes>,
    pub(crate) registry_db: Database<Bytes, Bytes>,
    pub(crate) observations_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("failed to create directory: {e}")))?;

        let env = unsafe {
            EnvOpenOptions::new()
                .max_dbs(MAX_DBS)
                .map_size(map_size)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let blocks_db = env.create_database(&mut wtxn, Some("blocks"))?;
        let utxos_db = env.create_database(&mut wtxn, Some("utxos"))?;
        let registry_db = env.create_database(&mut wtxn, Some("registry"))?;
        let observations_db = env.create_database(&mut wtxn, Some("observations"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            blocks_db,
            utxos_db,
            registry_db,
            observations_db,
            meta_db,
        })
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    pub fn block_store(&self) -> LmdbBlockStore {
        LmdbBlockStore {
            env: Arc::clone(&self.env),
            blocks_db: self.blocks_db,
        }
    }

    pub fn utxo_store(&self) -> LmdbUtxoStore {
        LmdbUtxoStore {
            env: Arc::clone(&self.env),
            utxos_db: self.utxos_db,
        }
    }

    pub fn registry_store(&self) -> LmdbRegistryStore {
        LmdbRegistryStore {
            env: Arc::clone(&self.env),
            registry_db: self.registry_db,
        }
    }

    pub fn observation_store(&self) -> LmdbObservationStore {
        LmdbObservationStore {
            env: Arc::clone(&self.env),
            observations_db: self.observations_db,
        }
    }

    pub fn meta_store(&self) -> LmdbMetaStore {
        LmdbMetaStore {
            env: Arc::clone(&self.env),
            meta_db: self.meta_db,
        }
    }

    /// Flush dirty pages during graceful shutdown. LMDB already syncs on
    /// every write-transaction commit.
    pub fn force_sync(&self) -> Result<(), LmdbError> {
        let wtxn = self.env.write_txn()?;
        wtxn.commit()?;
        Ok(())
    }
}

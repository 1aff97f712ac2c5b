//! LMDB implementation of RegistryStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use slate_ledger::RegistryEntry;
use slate_store::{RegistryStore, StoreError};

use crate::LmdbError;

pub struct LmdbRegistryStore {
    pub(crate) env: Arc<Env>,
    pub(crate) registry_db: Database<Bytes, Bytes>,
}

impl RegistryStore for LmdbRegistryStore {
    fn put_entry(&self, entry: &RegistryEntry) -> Result<(), StoreError> {
        let val = bincode::serialize(entry).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.registry_db
            .put(&mut wtxn, entry.name.as_bytes(), &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_entry(&self, name: &str) -> Result<Option<RegistryEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .registry_db
            .get(&rtxn, name.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn delete_entry(&self, name: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.registry_db
            .delete(&mut wtxn, name.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_entries(&self) -> Result<Vec<RegistryEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.registry_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (_, val) = entry.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(results)
    }
}

//! LMDB implementation of ObservationStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use slate_consensus::Observation;
use slate_store::{ObservationStore, StoreError};
use slate_types::DelegateNum;

use crate::LmdbError;

pub struct LmdbObservationStore {
    pub(crate) env: Arc<Env>,
    pub(crate) observations_db: Database<Bytes, Bytes>,
}

impl ObservationStore for LmdbObservationStore {
    fn put_observation(&self, num: DelegateNum, obs: &Observation) -> Result<(), StoreError> {
        let key = num.get().to_be_bytes();
        let val = bincode::serialize(obs).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.observations_db
            .put(&mut wtxn, &key, &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_observation(&self, num: DelegateNum) -> Result<Option<Observation>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .observations_db
            .get(&rtxn, &num.get().to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn iter_observations(&self) -> Result<Vec<(DelegateNum, Observation)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.observations_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            if key.len() != 4 {
                continue;
            }
            let mut buf = [0u8; 4];
            buf.copy_from_slice(key);
            let num = DelegateNum::new(u32::from_be_bytes(buf));
            results.push((num, bincode::deserialize(val).map_err(LmdbError::from)?));
        }
        Ok(results)
    }
}

//! LMDB implementation of UtxoStore.
//!
//! Keys are `tx_hash(32) ‖ index_be(4)`.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use slate_store::{StoreError, UtxoStore};
use slate_transactions::{OutputId, UnspentOutput};
use slate_types::TxHash;

use crate::LmdbError;

pub struct LmdbUtxoStore {
    pub(crate) env: Arc<Env>,
    pub(crate) utxos_db: Database<Bytes, Bytes>,
}

fn key_of(id: &OutputId) -> [u8; 36] {
    let mut key = [0u8; 36];
    key[..32].copy_from_slice(id.tx.as_bytes());
    key[32..].copy_from_slice(&id.index.to_be_bytes());
    key
}

fn id_of(key: &[u8]) -> Result<OutputId, LmdbError> {
    if key.len() != 36 {
        return Err(LmdbError::Serialization("invalid utxo key length".into()));
    }
    let mut tx = [0u8; 32];
    tx.copy_from_slice(&key[..32]);
    let mut idx = [0u8; 4];
    idx.copy_from_slice(&key[32..]);
    Ok(OutputId::new(TxHash::new(tx), u32::from_be_bytes(idx)))
}

impl UtxoStore for LmdbUtxoStore {
    fn put_utxo(&self, id: &OutputId, output: &UnspentOutput) -> Result<(), StoreError> {
        let val = bincode::serialize(output).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.utxos_db
            .put(&mut wtxn, &key_of(id), &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_utxo(&self, id: &OutputId) -> Result<Option<UnspentOutput>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .utxos_db
            .get(&rtxn, &key_of(id))
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn delete_utxo(&self, id: &OutputId) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.utxos_db
            .delete(&mut wtxn, &key_of(id))
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn iter_utxos(&self) -> Result<Vec<(OutputId, UnspentOutput)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.utxos_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let id = id_of(key)?;
            let output = bincode::deserialize(val).map_err(LmdbError::from)?;
            results.push((id, output));
        }
        Ok(results)
    }
}

//! LMDB implementation of BlockStore.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use slate_store::{BlockStore, StoreError};
use slate_transactions::Block;

use crate::LmdbError;

pub struct LmdbBlockStore {
    pub(crate) env: Arc<Env>,
    pub(crate) blocks_db: Database<Bytes, Bytes>,
}

impl BlockStore for LmdbBlockStore {
    fn put_block(&self, block: &Block) -> Result<(), StoreError> {
        let key = block.height.to_be_bytes();
        let val = bincode::serialize(block).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.blocks_db
            .put(&mut wtxn, &key, &val)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_block(&self, height: u64) -> Result<Option<Block>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .blocks_db
            .get(&rtxn, &height.to_be_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                let block = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(block))
            }
            None => Ok(None),
        }
    }

    fn max_height(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let last = self.blocks_db.last(&rtxn).map_err(LmdbError::from)?;
        match last {
            Some((key, _)) if key.len() == 8 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(key);
                Ok(u64::from_be_bytes(buf))
            }
            _ => Ok(0),
        }
    }

    fn iter_from(&self, from: u64) -> Result<Vec<Block>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut blocks = Vec::new();
        let start = from.to_be_bytes();
        let iter = self
            .blocks_db
            .range(&rtxn, &(Bound::Included(&start[..]), Bound::Unbounded))
            .map_err(LmdbError::from)?;
        for entry in iter {
            let (_, val) = entry.map_err(LmdbError::from)?;
            blocks.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(blocks)
    }
}

//! Block storage trait.

use crate::StoreError;
use slate_transactions::Block;

/// Persistent storage for the committed block sequence, keyed by height.
pub trait BlockStore {
    /// Store a committed block at its height.
    fn put_block(&self, block: &Block) -> Result<(), StoreError>;

    /// Fetch a block by height.
    fn get_block(&self, height: u64) -> Result<Option<Block>, StoreError>;

    /// Height of the highest stored block; zero when empty.
    fn max_height(&self) -> Result<u64, StoreError>;

    /// All blocks from `from` upward in height order.
    fn iter_from(&self, from: u64) -> Result<Vec<Block>, StoreError>;
}

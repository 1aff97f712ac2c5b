//! Unspent-output storage trait.

use crate::StoreError;
use slate_transactions::{OutputId, UnspentOutput};

/// Persistent storage for the unspent-output set.
pub trait UtxoStore {
    fn put_utxo(&self, id: &OutputId, output: &UnspentOutput) -> Result<(), StoreError>;

    fn get_utxo(&self, id: &OutputId) -> Result<Option<UnspentOutput>, StoreError>;

    fn delete_utxo(&self, id: &OutputId) -> Result<(), StoreError>;

    fn iter_utxos(&self) -> Result<Vec<(OutputId, UnspentOutput)>, StoreError>;
}

//! Delegate registry storage trait.

use crate::StoreError;
use slate_ledger::RegistryEntry;

/// Persistent storage for registered delegate names, keyed by name.
pub trait RegistryStore {
    fn put_entry(&self, entry: &RegistryEntry) -> Result<(), StoreError>;

    fn get_entry(&self, name: &str) -> Result<Option<RegistryEntry>, StoreError>;

    fn delete_entry(&self, name: &str) -> Result<(), StoreError>;

    fn iter_entries(&self) -> Result<Vec<RegistryEntry>, StoreError>;
}

//! Small metadata table: chain tip, format versions.

use crate::StoreError;

/// Key-value metadata storage.
pub trait MetaStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

//! Observation storage trait.
//!
//! Observations are node-local and may diverge across nodes; they are
//! persisted so a restart does not discard the accumulated view.

use crate::StoreError;
use slate_consensus::Observation;
use slate_types::DelegateNum;

/// Persistent storage for per-delegate observations.
pub trait ObservationStore {
    fn put_observation(&self, num: DelegateNum, obs: &Observation) -> Result<(), StoreError>;

    fn get_observation(&self, num: DelegateNum) -> Result<Option<Observation>, StoreError>;

    fn iter_observations(&self) -> Result<Vec<(DelegateNum, Observation)>, StoreError>;
}

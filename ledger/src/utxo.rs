//! The unspent-output set.

use serde::{Deserialize, Serialize};
use slate_transactions::{OutputId, UnspentOutput};
use slate_types::Address;
use std::collections::HashMap;

/// All currently unspent outputs, keyed by the creating transaction and
/// output index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UtxoSet {
    outputs: HashMap<OutputId, UnspentOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &OutputId) -> Option<&UnspentOutput> {
        self.outputs.get(id)
    }

    pub fn contains(&self, id: &OutputId) -> bool {
        self.outputs.contains_key(id)
    }

    pub fn insert(&mut self, id: OutputId, output: UnspentOutput) {
        self.outputs.insert(id, output);
    }

    pub fn remove(&mut self, id: &OutputId) -> Option<UnspentOutput> {
        self.outputs.remove(id)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutputId, &UnspentOutput)> {
        self.outputs.iter()
    }

    /// All outputs owned by `owner`, for wallet input selection.
    pub fn owned_by<'a>(
        &'a self,
        owner: &'a Address,
    ) -> impl Iterator<Item = (&'a OutputId, &'a UnspentOutput)> {
        self.outputs.iter().filter(move |(_, o)| &o.owner == owner)
    }
}

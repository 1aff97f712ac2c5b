//! Per-wallet trust and distrust sets.
//!
//! Purely local policy: it never propagates to other nodes and has no
//! effect on consensus. A delegate can be in at most one of the two sets.

use serde::{Deserialize, Serialize};
use slate_types::DelegateNum;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustPolicy {
    trusted: BTreeSet<u32>,
    distrusted: BTreeSet<u32>,
}

impl TrustPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a delegate trusted, clearing any distrust.
    pub fn trust(&mut self, num: DelegateNum) {
        self.distrusted.remove(&num.get());
        self.trusted.insert(num.get());
    }

    /// Mark a delegate distrusted, clearing any trust.
    pub fn distrust(&mut self, num: DelegateNum) {
        self.trusted.remove(&num.get());
        self.distrusted.insert(num.get());
    }

    /// Forget a delegate entirely.
    pub fn clear(&mut self, num: DelegateNum) {
        self.trusted.remove(&num.get());
        self.distrusted.remove(&num.get());
    }

    pub fn is_trusted(&self, num: DelegateNum) -> bool {
        self.trusted.contains(&num.get())
    }

    pub fn is_distrusted(&self, num: DelegateNum) -> bool {
        self.distrusted.contains(&num.get())
    }

    pub fn trusted(&self) -> impl Iterator<Item = DelegateNum> + '_ {
        self.trusted.iter().map(|&id| DelegateNum::new(id))
    }

    pub fn distrusted(&self) -> impl Iterator<Item = DelegateNum> + '_ {
        self.distrusted.iter().map(|&id| DelegateNum::new(id))
    }
}

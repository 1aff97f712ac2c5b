//! Ordered index over eligible delegates by net votes.
//!
//! Keyed on `(−net, id, name)`: highest net first, ties broken by lower id,
//! then lexicographic name. Authoritative for block-producer selection and
//! renewal pricing; wallets overlay their own trust and score on top.

use serde::{Deserialize, Serialize};
use slate_types::DelegateNum;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
struct RankKey {
    /// Negated net votes, so ascending key order is descending net.
    neg_net: i128,
    id: u32,
    name: String,
}

/// Sorted view over eligible delegates. Contains only delegates that are
/// registered, unresigned and unexpired; the chain keeps it in sync with
/// the tally under the same write path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingIndex {
    ordered: BTreeSet<RankKey>,
    keys: HashMap<u32, RankKey>,
}

impl RankingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or reposition a delegate at the given net votes.
    pub fn upsert(&mut self, num: DelegateNum, net: i128, name: &str) {
        let key = RankKey {
            neg_net: -net,
            id: num.get(),
            name: name.to_string(),
        };
        if let Some(old) = self.keys.insert(num.get(), key.clone()) {
            self.ordered.remove(&old);
        }
        self.ordered.insert(key);
    }

    /// Drop a delegate that became ineligible.
    pub fn remove(&mut self, num: DelegateNum) {
        if let Some(old) = self.keys.remove(&num.get()) {
            self.ordered.remove(&old);
        }
    }

    pub fn contains(&self, num: DelegateNum) -> bool {
        self.keys.contains_key(&num.get())
    }

    /// Zero-based position of a delegate, best-ranked first.
    pub fn rank_of(&self, num: DelegateNum) -> Option<usize> {
        self.keys.get(&num.get())?;
        self.ordered.iter().position(|k| k.id == num.get())
    }

    /// The best-ranked `n` delegates in order.
    pub fn top(&self, n: usize) -> Vec<DelegateNum> {
        self.ordered
            .iter()
            .take(n)
            .map(|k| DelegateNum::new(k.id))
            .collect()
    }

    /// All ranked delegates, best first.
    pub fn iter(&self) -> impl Iterator<Item = DelegateNum> + '_ {
        self.ordered.iter().map(|k| DelegateNum::new(k.id))
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(n: u32) -> DelegateNum {
        DelegateNum::new(n)
    }

    #[test]
    fn orders_by_net_descending() {
        let mut idx = RankingIndex::new();
        idx.upsert(d(1), 100, "alice");
        idx.upsert(d(2), 300, "bob");
        idx.upsert(d(3), 200, "carol");

        assert_eq!(idx.top(3), vec![d(2), d(3), d(1)]);
        assert_eq!(idx.rank_of(d(2)), Some(0));
        assert_eq!(idx.rank_of(d(1)), Some(2));
    }

    #[test]
    fn ties_break_by_lower_id() {
        let mut idx = RankingIndex::new();
        idx.upsert(d(7), 100, "gina");
        idx.upsert(d(3), 100, "carol");

        assert_eq!(idx.top(2), vec![d(3), d(7)]);
    }

    #[test]
    fn upsert_repositions() {
        let mut idx = RankingIndex::new();
        idx.upsert(d(1), 100, "alice");
        idx.upsert(d(2), 200, "bob");
        assert_eq!(idx.rank_of(d(1)), Some(1));

        idx.upsert(d(1), 500, "alice");
        assert_eq!(idx.rank_of(d(1)), Some(0));
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn negative_net_ranks_below_zero_net() {
        let mut idx = RankingIndex::new();
        idx.upsert(d(1), -50, "alice");
        idx.upsert(d(2), 0, "bob");

        assert_eq!(idx.top(2), vec![d(2), d(1)]);
    }

    #[test]
    fn remove_clears_both_indexes() {
        let mut idx = RankingIndex::new();
        idx.upsert(d(1), 100, "alice");
        idx.remove(d(1));

        assert!(!idx.contains(d(1)));
        assert_eq!(idx.rank_of(d(1)), None);
        assert!(idx.is_empty());
    }

    #[test]
    fn top_truncates_to_available() {
        let mut idx = RankingIndex::new();
        idx.upsert(d(1), 10, "alice");
        assert_eq!(idx.top(100).len(), 1);
    }
}

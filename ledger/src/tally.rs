//! Incremental vote tally, updated as unspent outputs are created and spent.
//!
//! Avoids scanning the full output set to compute a delegate's net votes.
//! Each unspent output contributes its amount to exactly one delegate's
//! positive or negative bucket according to the sign of its vote reference;
//! outputs carrying the reserved zero reference contribute to supply only.

use serde::{Deserialize, Serialize};
use slate_transactions::UnspentOutput;
use slate_types::{DelegateNum, VotePolarity};
use std::collections::HashMap;

/// Per-delegate vote sums plus the count of referencing outputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub positive: u64,
    pub negative: u64,
    /// Unspent outputs referencing this delegate. Drives registry garbage
    /// collection: a resigned delegate is destroyed only at zero refs.
    pub refs: u64,
}

impl Bucket {
    fn is_empty(&self) -> bool {
        self.positive == 0 && self.negative == 0 && self.refs == 0
    }

    pub fn net(&self) -> i128 {
        self.positive as i128 - self.negative as i128
    }
}

/// Derived view mapping delegate → (positive, negative) sums over all
/// unspent outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    buckets: HashMap<u32, Bucket>,
    /// Sum of every unspent output's amount, voted or not.
    total_supply: u64,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a newly created unspent output.
    pub fn apply_create(&mut self, output: &UnspentOutput) {
        let amount = output.amount.raw();
        self.total_supply = self.total_supply.saturating_add(amount);
        let (Some(num), Some(polarity)) = (output.vote.base(), output.vote.polarity()) else {
            return;
        };
        let bucket = self.buckets.entry(num.get()).or_default();
        match polarity {
            VotePolarity::For => bucket.positive = bucket.positive.saturating_add(amount),
            VotePolarity::Against => bucket.negative = bucket.negative.saturating_add(amount),
        }
        bucket.refs += 1;
    }

    /// Account for an unspent output being consumed.
    pub fn apply_spend(&mut self, output: &UnspentOutput) {
        let amount = output.amount.raw();
        self.total_supply = self.total_supply.saturating_sub(amount);
        let (Some(num), Some(polarity)) = (output.vote.base(), output.vote.polarity()) else {
            return;
        };
        if let Some(bucket) = self.buckets.get_mut(&num.get()) {
            match polarity {
                VotePolarity::For => bucket.positive = bucket.positive.saturating_sub(amount),
                VotePolarity::Against => bucket.negative = bucket.negative.saturating_sub(amount),
            }
            bucket.refs = bucket.refs.saturating_sub(1);
            if bucket.is_empty() {
                self.buckets.remove(&num.get());
            }
        }
    }

    /// Net votes for a delegate: positive minus negative. May be negative.
    pub fn net(&self, num: DelegateNum) -> i128 {
        self.buckets.get(&num.get()).map(Bucket::net).unwrap_or(0)
    }

    /// Number of unspent outputs referencing a delegate.
    pub fn refs(&self, num: DelegateNum) -> u64 {
        self.buckets.get(&num.get()).map(|b| b.refs).unwrap_or(0)
    }

    pub fn bucket(&self, num: DelegateNum) -> Option<&Bucket> {
        self.buckets.get(&num.get())
    }

    /// Sum of all unspent output amounts.
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Iterate all delegates with a non-empty bucket.
    pub fn iter(&self) -> impl Iterator<Item = (DelegateNum, &Bucket)> {
        self.buckets
            .iter()
            .map(|(&id, bucket)| (DelegateNum::new(id), bucket))
    }

    /// Sum of positive and negative voting amounts across all delegates.
    /// Equals `total_supply` when every unspent output carries a vote.
    pub fn voted_amount(&self) -> u64 {
        self.buckets
            .values()
            .map(|b| b.positive + b.negative)
            .sum()
    }

    /// Project net votes for `num` after applying `delta`.
    pub fn projected_net(&self, num: DelegateNum, delta: i128) -> i128 {
        self.net(num) + delta
    }

    /// For a candidate set of per-delegate net deltas, return the first
    /// delegate whose projected net would exceed `cap`. `cap` is computed
    /// by the caller from the projected supply.
    pub fn cap_violation(
        &self,
        deltas: &HashMap<u32, i128>,
        cap: i128,
    ) -> Option<(DelegateNum, i128)> {
        for (&id, &delta) in deltas {
            let projected = self.projected_net(DelegateNum::new(id), delta);
            if projected > cap {
                return Some((DelegateNum::new(id), projected));
            }
        }
        None
    }

    /// Whether a candidate transaction or block would push any touched
    /// delegate above `cap`.
    pub fn would_exceed_cap(&self, deltas: &HashMap<u32, i128>, cap: i128) -> bool {
        self.cap_violation(deltas, cap).is_some()
    }
}

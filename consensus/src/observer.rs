//! Per-node statistics for observed delegates.
//!
//! Every accepted block updates the producer's observation; a scheduled
//! slot that passes without a block counts as a miss. Observations are
//! local: the transaction-visibility fractions depend on what this node's
//! mempool had seen, so values legitimately differ across nodes.

use serde::{Deserialize, Serialize};
use slate_types::DelegateNum;
use std::collections::HashMap;

use crate::median::StreamingMedian;

/// What one accepted block looked like from this node.
#[derive(Clone, Debug)]
pub struct BlockObservation {
    pub producer: DelegateNum,
    /// When the block reached this node.
    pub arrival_secs: u64,
    /// Nominal start of its slot.
    pub scheduled_secs: u64,
    /// Local mempool transactions seen before the scheduled time.
    pub expected_seen: u64,
    /// Of those, how many the block included.
    pub expected_included: u64,
    /// Block transactions this node had not seen before the scheduled time.
    pub unexpected_included: u64,
    /// Total transactions in the block.
    pub block_tx_count: u64,
    /// Claimed producer fee as basis points of the allowed cap.
    pub fee_fraction_bps: u32,
}

/// Accumulated behaviour of one delegate, as seen locally.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Observation {
    pub produced: u64,
    pub missed: u64,
    pub late_latency: StreamingMedian,
    pub early_latency: StreamingMedian,
    expected_seen: u64,
    expected_included: u64,
    unexpected_included: u64,
    block_tx_total: u64,
    pub invalid_signed: u64,
    fee_fraction_bps_sum: u64,
    fee_samples: u64,
}

impl Observation {
    /// Fraction of scheduled slots actually produced, in basis points.
    pub fn reliability_bps(&self) -> u32 {
        let total = self.produced + self.missed;
        if total == 0 {
            return 0;
        }
        (self.produced * 10_000 / total) as u32
    }

    /// Fraction of locally expected transactions the delegate included,
    /// in basis points. Ideal 10_000.
    pub fn expected_tx_bps(&self) -> u32 {
        if self.expected_seen == 0 {
            return 10_000;
        }
        (self.expected_included * 10_000 / self.expected_seen) as u32
    }

    /// Fraction of block transactions this node had not seen, in basis
    /// points. Ideal 0.
    pub fn unexpected_tx_bps(&self) -> u32 {
        if self.block_tx_total == 0 {
            return 0;
        }
        (self.unexpected_included * 10_000 / self.block_tx_total) as u32
    }

    /// Mean claimed fee as basis points of the cap. Ideal 0.
    pub fn fee_fraction_bps(&self) -> u32 {
        if self.fee_samples == 0 {
            return 0;
        }
        (self.fee_fraction_bps_sum / self.fee_samples) as u32
    }

    /// Any locally observed invalid signed block disqualifies the delegate
    /// from trust consideration.
    pub fn disqualified(&self) -> bool {
        self.invalid_signed >= 1
    }
}

/// All observations held by this node, keyed per delegate.
#[derive(Clone, Debug, Default)]
pub struct ScoreObserver {
    observations: HashMap<u32, Observation>,
}

impl ScoreObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted per-delegate observations.
    pub fn from_entries(entries: impl IntoIterator<Item = (DelegateNum, Observation)>) -> Self {
        Self {
            observations: entries
                .into_iter()
                .map(|(num, obs)| (num.get(), obs))
                .collect(),
        }
    }

    /// Record an accepted block.
    pub fn record_produced(&mut self, obs: BlockObservation) {
        let entry = self.observations.entry(obs.producer.get()).or_default();
        entry.produced += 1;
        if obs.arrival_secs >= obs.scheduled_secs {
            entry.late_latency.record(obs.arrival_secs - obs.scheduled_secs);
        } else {
            entry.early_latency.record(obs.scheduled_secs - obs.arrival_secs);
        }
        entry.expected_seen += obs.expected_seen;
        entry.expected_included += obs.expected_included;
        entry.unexpected_included += obs.unexpected_included;
        entry.block_tx_total += obs.block_tx_count;
        entry.fee_fraction_bps_sum += obs.fee_fraction_bps as u64;
        entry.fee_samples += 1;
    }

    /// Record a scheduled slot that timed out with no block.
    pub fn record_missed(&mut self, producer: DelegateNum) {
        self.observations.entry(producer.get()).or_default().missed += 1;
    }

    /// Record a rejected block that carried the delegate's valid signature.
    pub fn record_invalid(&mut self, producer: DelegateNum) {
        self.observations
            .entry(producer.get())
            .or_default()
            .invalid_signed += 1;
    }

    pub fn observation(&self, producer: DelegateNum) -> Option<&Observation> {
        self.observations.get(&producer.get())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DelegateNum, &Observation)> {
        self.observations
            .iter()
            .map(|(&id, obs)| (DelegateNum::new(id), obs))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

//! Deterministic slot scheduling.
//!
//! Time is divided into slots of one block interval. Rounds group
//! `round_size` consecutive slots; within a round, the delegate at rank `r`
//! is authorized to produce the block of the `r`-th slot. The producer loop
//! re-derives its slot on every wakeup, so early or late timer fires never
//! accumulate drift.

use slate_types::{NetworkParams, Timestamp};

/// Where an arriving block's slot sits relative to local time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    /// Within the current round: validate now.
    Current,
    /// A future slot: buffer until its time arrives.
    Future,
    /// More than one full round late: discard.
    Stale,
}

/// Pure slot arithmetic over the network parameters.
#[derive(Clone, Debug)]
pub struct SlotSchedule {
    params: NetworkParams,
}

impl SlotSchedule {
    pub fn new(params: NetworkParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// The slot containing a UTC instant.
    pub fn slot_at(&self, now: Timestamp) -> u64 {
        now.as_secs() / self.params.block_interval_secs
    }

    /// Nominal start time of a slot.
    pub fn slot_start(&self, slot: u64) -> Timestamp {
        Timestamp::new(slot * self.params.block_interval_secs)
    }

    /// First slot of the round containing `slot`.
    pub fn round_base(&self, slot: u64) -> u64 {
        slot / self.params.round_size * self.params.round_size
    }

    /// The next slot at which the delegate ranked `rank` produces.
    ///
    /// If the rank's slot in the current round has already passed, the
    /// delegate produces in the next round.
    pub fn produce_slot(&self, rank: u64, now: Timestamp) -> u64 {
        let slot_now = self.slot_at(now);
        let mut slot = self.round_base(slot_now) + rank;
        if self.slot_start(slot) < now {
            slot += self.params.round_size;
        }
        slot
    }

    /// Wall-clock time of the delegate's next production slot.
    pub fn produce_time(&self, rank: u64, now: Timestamp) -> Timestamp {
        self.slot_start(self.produce_slot(rank, now))
    }

    /// Classify an arriving block's slot against local time: future slots
    /// are buffered, slots more than one round behind are discarded.
    pub fn classify(&self, slot: u64, now: Timestamp) -> SlotStatus {
        let slot_now = self.slot_at(now);
        if slot > slot_now {
            SlotStatus::Future
        } else if slot_now - slot > self.params.round_size {
            SlotStatus::Stale
        } else {
            SlotStatus::Current
        }
    }

    /// The slot a block timestamp claims: the nearest slot boundary.
    /// Producers emit grid-aligned timestamps, but validation tolerates
    /// drift of up to one interval around the boundary.
    pub fn slot_for_timestamp(&self, timestamp: Timestamp) -> u64 {
        let interval = self.params.block_interval_secs;
        (timestamp.as_secs() + interval / 2) / interval
    }

    /// Whether a timestamp is within one interval of `slot`'s nominal
    /// start time.
    pub fn within_tolerance(&self, timestamp: Timestamp, slot: u64) -> bool {
        timestamp.abs_diff(self.slot_start(slot)) <= self.params.block_interval_secs
    }
}

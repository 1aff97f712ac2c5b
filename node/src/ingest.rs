//! Ingest buffering for out-of-order block arrival.
//!
//! Blocks for future slots are held until their slot begins; blocks more
//! than one full round late are discarded outright.

use slate_consensus::{SlotSchedule, SlotStatus};
use slate_transactions::Block;
use slate_types::Timestamp;
use std::collections::BTreeMap;

/// What the buffer decided about an arriving block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestDecision {
    /// Slot is current: hand it to the validator now.
    Validate,
    /// Slot is in the future: held until due.
    Buffered,
    /// More than one round late, or the buffer is full: dropped.
    Discarded,
}

/// Bounded holding area for future-slot blocks, keyed by slot.
pub struct IngestBuffer {
    schedule: SlotSchedule,
    future: BTreeMap<u64, Vec<Block>>,
    held: usize,
    capacity: usize,
}

impl IngestBuffer {
    pub fn new(schedule: SlotSchedule, capacity: usize) -> Self {
        Self {
            schedule,
            future: BTreeMap::new(),
            held: 0,
            capacity,
        }
    }

    /// Classify an arriving block, buffering it when its slot has not
    /// started yet.
    pub fn offer(&mut self, block: Block, now: Timestamp) -> IngestDecision {
        let slot = self.schedule.slot_for_timestamp(block.timestamp);
        match self.schedule.classify(slot, now) {
            SlotStatus::Current => IngestDecision::Validate,
            SlotStatus::Stale => {
                tracing::debug!(height = block.height, slot, "stale block discarded");
                IngestDecision::Discarded
            }
            SlotStatus::Future => {
                if self.held >= self.capacity {
                    tracing::warn!(height = block.height, slot, "ingest buffer full");
                    return IngestDecision::Discarded;
                }
                self.future.entry(slot).or_default().push(block);
                self.held += 1;
                IngestDecision::Buffered
            }
        }
    }

    /// Release every buffered block whose slot has begun, oldest first.
    pub fn drain_due(&mut self, now: Timestamp) -> Vec<Block> {
        let slot_now = self.schedule.slot_at(now);
        let due: Vec<u64> = self
            .future
            .range(..=slot_now)
            .map(|(&slot, _)| slot)
            .collect();
        let mut released = Vec::new();
        for slot in due {
            if let Some(mut blocks) = self.future.remove(&slot) {
                self.held -= blocks.len();
                released.append(&mut blocks);
            }
        }
        released
    }

    pub fn held(&self) -> usize {
        self.held
    }
}

//! Block validation: schedule, signature, fee and ledger checks.
//!
//! A block is accepted only if it was produced by the delegate the ranking
//! authorizes for its slot, carries that delegate's signature, claims no
//! more than the allowed producer fee, and applies cleanly to the ledger.
//! Failure at any step leaves chain state unchanged; a failure after the
//! signature verified is charged to the producer's local observation.

use slate_ledger::{BlockReceipt, ChainState};
use slate_transactions::Block;
use slate_types::{crypto, NetworkParams, PublicKey, Timestamp, TxHash};
use std::collections::HashSet;

use crate::error::ConsensusError;
use crate::observer::{BlockObservation, ScoreObserver};
use crate::scheduler::SlotSchedule;

/// Validates incoming blocks against the schedule and the ledger.
pub struct BlockValidator {
    schedule: SlotSchedule,
}

impl BlockValidator {
    pub fn new(params: NetworkParams) -> Self {
        Self {
            schedule: SlotSchedule::new(params),
        }
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    /// Validate `block` and commit it to `chain`, updating `observer`.
    ///
    /// `expected_txs` is the set of transaction hashes this node's mempool
    /// had seen before the block's scheduled time; it feeds the local
    /// transaction-visibility statistics.
    pub fn validate_and_apply(
        &self,
        chain: &mut ChainState,
        observer: &mut ScoreObserver,
        block: &Block,
        arrival: Timestamp,
        expected_txs: &HashSet<TxHash>,
    ) -> Result<BlockReceipt, ConsensusError> {
        // The nearest slot boundary is the slot the block claims; the
        // timestamp may drift from it by at most one interval.
        let slot = self.schedule.slot_for_timestamp(block.timestamp);
        if !self.schedule.within_tolerance(block.timestamp, slot) {
            return Err(ConsensusError::TimestampOutOfTolerance(
                block.timestamp.as_secs(),
            ));
        }

        // The ranking as of the previous block decides who owns the slot.
        let expected = chain.producer_for_slot(slot);
        if expected != Some(block.producer) {
            return Err(ConsensusError::WrongProducer {
                slot,
                expected: expected.map(|n| n.get()),
                got: block.producer.get(),
            });
        }

        let key = producer_key(chain, block)?;
        if !crypto::verify(&key, &block.signing_digest(), &block.signature) {
            // An unverifiable signature is unattributable; reject without
            // charging the delegate.
            return Err(ConsensusError::BadSignature);
        }

        let cap = chain.params().fee_cap(chain.mean_revenue());
        let claimed = block.claimed_fee();
        if claimed > cap {
            observer.record_invalid(block.producer);
            return Err(ConsensusError::FeeTooLarge { claimed, cap });
        }

        let receipt = match chain.apply_block(block) {
            Ok(receipt) => receipt,
            Err(e) => {
                observer.record_invalid(block.producer);
                tracing::warn!(
                    height = block.height,
                    producer = block.producer.get(),
                    error = %e,
                    "block rejected by ledger"
                );
                return Err(ConsensusError::Ledger(e));
            }
        };

        observer.record_produced(self.observe(block, slot, arrival, claimed, cap, expected_txs));
        Ok(receipt)
    }

    fn observe(
        &self,
        block: &Block,
        slot: u64,
        arrival: Timestamp,
        claimed: u64,
        cap: u64,
        expected_txs: &HashSet<TxHash>,
    ) -> BlockObservation {
        let included: HashSet<TxHash> = block.transactions.iter().map(|tx| tx.hash).collect();
        let expected_included = expected_txs.intersection(&included).count() as u64;
        let unexpected_included = included
            .iter()
            .filter(|h| !expected_txs.contains(h))
            .count() as u64;
        let fee_fraction_bps = if cap == 0 {
            0
        } else {
            (claimed as u128 * 10_000 / cap as u128) as u32
        };
        BlockObservation {
            producer: block.producer,
            arrival_secs: arrival.as_secs(),
            scheduled_secs: self.schedule.slot_start(slot).as_secs(),
            expected_seen: expected_txs.len() as u64,
            expected_included,
            unexpected_included,
            block_tx_count: block.transactions.len() as u64,
            fee_fraction_bps,
        }
    }
}

/// The producer's signing key, read from its registry entry's data field.
fn producer_key(chain: &ChainState, block: &Block) -> Result<PublicKey, ConsensusError> {
    let entry = chain
        .registry()
        .get(block.producer)
        .ok_or(ConsensusError::UnknownProducerKey(block.producer.get()))?;
    let bytes: [u8; 32] = entry
        .data
        .get(..32)
        .and_then(|b| b.try_into().ok())
        .ok_or(ConsensusError::UnknownProducerKey(block.producer.get()))?;
    Ok(PublicKey(bytes))
}

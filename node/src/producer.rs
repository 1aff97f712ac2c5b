//! Producer slot timer for local delegate identities.
//!
//! The loop sleeps until the identity's next scheduled slot, then
//! re-derives the slot from the clock and the fresh snapshot before
//! producing — a wakeup that fired early or late, or a ranking that moved
//! underneath the timer, never yields a block for the wrong slot. A wallet
//! holding several identities runs one loop per identity.

use slate_consensus::SlotSchedule;
use slate_transactions::Block;
use slate_types::{DelegateNum, KeyPair, Timestamp};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::service::ChainService;
use crate::shutdown::ShutdownSignal;

/// A delegate identity this node produces blocks for.
pub struct ProducerIdentity {
    pub delegate: DelegateNum,
    pub keys: KeyPair,
}

/// Build and sign the block for `slot` from the current snapshot and
/// pending transactions.
pub fn build_block(
    service: &ChainService,
    identity: &ProducerIdentity,
    schedule: &SlotSchedule,
    slot: u64,
    tx_limit: usize,
) -> Block {
    let snapshot = service.snapshot();
    let transactions = service.pending_for_block(tx_limit);
    let mut block = Block::new(
        snapshot.height() + 1,
        snapshot.tip(),
        schedule.slot_start(slot),
        identity.delegate,
        transactions,
    );
    block.sign(&identity.keys.private);
    block
}

/// Run one identity's production loop until shutdown.
///
/// Produced blocks are handed to `sink`; the node task validates and
/// broadcasts them like any other arrival.
pub async fn run_producer(
    service: Arc<ChainService>,
    identity: ProducerIdentity,
    schedule: SlotSchedule,
    tx_limit: usize,
    sink: mpsc::Sender<Block>,
    mut shutdown: ShutdownSignal,
) {
    let round = schedule.params().round_size;
    let interval = schedule.params().block_interval_secs;
    let mut last_produced_slot: Option<u64> = None;

    loop {
        let now = Timestamp::now();
        let snapshot = service.snapshot();
        let Some(rank) = snapshot.rank_of(identity.delegate).filter(|&r| (r as u64) < round)
        else {
            // Out of the producer set: the slot timer is cancelled; check
            // again next round whether the ranking brought us back.
            tracing::debug!(delegate = identity.delegate.get(), "not in producer set");
            if wait_or_shutdown(&mut shutdown, Duration::from_secs(interval * round)).await {
                return;
            }
            continue;
        };

        let produce_at = schedule.produce_time(rank as u64, now);
        let sleep = Duration::from_secs(produce_at.as_secs().saturating_sub(now.as_secs()));
        tracing::debug!(
            delegate = identity.delegate.get(),
            rank,
            produce_at = produce_at.as_secs(),
            "scheduled"
        );
        if wait_or_shutdown(&mut shutdown, sleep).await {
            return;
        }

        // Re-derive after the wakeup; the timer may have fired early or
        // late, and the ranking may have shifted.
        let now = Timestamp::now();
        let slot = schedule.slot_at(now);
        let snapshot = service.snapshot();
        let authorized = snapshot.producer_for_slot(slot) == Some(identity.delegate);
        if authorized && last_produced_slot != Some(slot) {
            let block = build_block(&service, &identity, &schedule, slot, tx_limit);
            tracing::info!(
                delegate = identity.delegate.get(),
                height = block.height,
                slot,
                txs = block.transactions.len(),
                "produced block"
            );
            last_produced_slot = Some(slot);
            if sink.send(block).await.is_err() {
                return;
            }
        }
    }
}

/// Sleep for `duration`, returning true if shutdown arrived first.
async fn wait_or_shutdown(shutdown: &mut ShutdownSignal, duration: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        _ = shutdown.wait() => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_transactions::{Output, Transaction};
    use slate_types::{crypto, Address, DelegateId, NetworkParams, ShareAmount};

    fn identity(n: u32, seed: u8) -> ProducerIdentity {
        ProducerIdentity {
            delegate: DelegateNum::new(n),
            keys: crypto::keypair_from_seed(&[seed; 32]),
        }
    }

    /// Service bootstrapped with one registered delegate and some supply.
    fn service_with_genesis(identity: &ProducerIdentity) -> Arc<ChainService> {
        let params = NetworkParams::default();
        let service = Arc::new(ChainService::new(params.clone(), 64));

        let gtx = Transaction::new(
            vec![],
            vec![
                Output::ClaimName {
                    delegate_id: Some(identity.delegate),
                    name: "producer".into(),
                    data: identity.keys.public.as_bytes().to_vec(),
                },
                Output::Payment {
                    owner: Address::new("slt_genesisowner"),
                    amount: ShareAmount::new(1_000_000),
                },
            ],
            DelegateId::NONE,
            Timestamp::new(0),
        );
        let genesis = Block::new(
            1,
            slate_types::BlockHash::ZERO,
            Timestamp::new(10),
            identity.delegate,
            vec![gtx],
        );
        service.replay_block(&genesis).expect("genesis applies");
        service
    }

    #[test]
    fn built_block_extends_the_snapshot_and_verifies() {
        let id = identity(1, 7);
        let service = service_with_genesis(&id);
        let schedule = SlotSchedule::new(NetworkParams::default());

        let block = build_block(&service, &id, &schedule, 200, 16);
        assert_eq!(block.height, 2);
        assert_eq!(block.prev, service.snapshot().tip());
        assert_eq!(block.timestamp, Timestamp::new(2_000));
        assert!(crypto::verify(
            &id.keys.public,
            &block.signing_digest(),
            &block.signature
        ));
    }

    #[tokio::test]
    async fn producer_loop_exits_on_shutdown() {
        let id = identity(1, 7);
        let service = service_with_genesis(&id);
        let schedule = SlotSchedule::new(NetworkParams::default());
        let (sink, _rx) = mpsc::channel(4);

        let controller = crate::ShutdownController::new();
        let signal = controller.signal();
        let handle = tokio::spawn(run_producer(service, id, schedule, 16, sink, signal));

        controller.shutdown();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop exits promptly")
            .unwrap();
    }
}

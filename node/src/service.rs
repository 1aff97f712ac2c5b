//! The single-writer chain coordinator.
//!
//! All mutation — block application and mempool admission — serializes
//! through this service, so the ledger invariants hold at every commit
//! boundary. Readers never touch the write lock: after each commit the
//! service publishes a fresh `Arc<ChainState>` snapshot, and long-running
//! enumerations keep their own Arc while block application proceeds.
//!
//! Lock order is fixed: state → observer → snapshot → mempool.

use slate_consensus::{BlockValidator, ConsensusError, ScoreObserver};
use slate_ledger::{BlockReceipt, ChainState, LedgerError};
use slate_transactions::{Block, Transaction};
use slate_types::{DelegateNum, NetworkParams, Timestamp};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::AdmissionError;
use crate::mempool::Mempool;

/// Owns the committed chain state, the local observer and the mempool.
pub struct ChainService {
    state: Mutex<ChainState>,
    snapshot: RwLock<Arc<ChainState>>,
    validator: BlockValidator,
    observer: Mutex<ScoreObserver>,
    mempool: Mutex<Mempool>,
}

impl ChainService {
    pub fn new(params: NetworkParams, mempool_capacity: usize) -> Self {
        let state = ChainState::new(params.clone());
        let snapshot = Arc::new(state.clone());
        Self {
            state: Mutex::new(state),
            snapshot: RwLock::new(snapshot),
            validator: BlockValidator::new(params),
            observer: Mutex::new(ScoreObserver::new()),
            mempool: Mutex::new(Mempool::new(mempool_capacity)),
        }
    }

    /// The last committed snapshot. Cheap to clone; never blocked by
    /// block application.
    pub fn snapshot(&self) -> Arc<ChainState> {
        self.snapshot.read().expect("snapshot lock").clone()
    }

    /// Validate and commit a network block, updating observations and
    /// pruning the mempool. Consensus-fatal errors leave state unchanged.
    pub fn ingest_block(
        &self,
        block: &Block,
        arrival: Timestamp,
    ) -> Result<BlockReceipt, ConsensusError> {
        let mut state = self.state.lock().expect("state lock");
        let mut observer = self.observer.lock().expect("observer lock");
        let expected = self.mempool.lock().expect("mempool lock").known_hashes();

        let receipt =
            self.validator
                .validate_and_apply(&mut state, &mut observer, block, arrival, &expected)?;

        self.publish(&state);
        drop(observer);
        drop(state);

        self.mempool
            .lock()
            .expect("mempool lock")
            .prune_committed(&block.transactions);
        Ok(receipt)
    }

    /// Apply a locally persisted block during replay, bypassing the
    /// producer-schedule checks (they were enforced when it was first
    /// accepted). Ledger rules still apply in full.
    pub fn replay_block(&self, block: &Block) -> Result<BlockReceipt, LedgerError> {
        let mut state = self.state.lock().expect("state lock");
        let receipt = state.apply_block(block)?;
        self.publish(&state);
        Ok(receipt)
    }

    /// Admit a transaction against the committed snapshot.
    pub fn submit_transaction(&self, tx: Transaction) -> Result<(), AdmissionError> {
        let snapshot = self.snapshot();
        self.mempool
            .lock()
            .expect("mempool lock")
            .admit(&snapshot, tx)
    }

    /// Pack the oldest pending transactions for a produced block.
    pub fn pending_for_block(&self, limit: usize) -> Vec<Transaction> {
        self.mempool
            .lock()
            .expect("mempool lock")
            .take_for_block(limit)
    }

    pub fn mempool_len(&self) -> usize {
        self.mempool.lock().expect("mempool lock").len()
    }

    /// Record a scheduled slot that produced no block.
    pub fn record_missed_slot(&self, producer: DelegateNum) {
        self.observer
            .lock()
            .expect("observer lock")
            .record_missed(producer);
    }

    /// A copy of the local observation state.
    pub fn observer_snapshot(&self) -> ScoreObserver {
        self.observer.lock().expect("observer lock").clone()
    }

    /// Replace the observation state, e.g. from the persisted store at
    /// startup.
    pub fn restore_observer(&self, observer: ScoreObserver) {
        *self.observer.lock().expect("observer lock") = observer;
    }

    fn publish(&self, state: &ChainState) {
        *self.snapshot.write().expect("snapshot lock") = Arc::new(state.clone());
    }
}

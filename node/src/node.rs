//! Top-level node assembly: persistence, replay, ingest and producers.

use slate_consensus::{ScoreObserver, SlotSchedule};
use slate_ledger::BlockReceipt;
use slate_store::{BlockStore, MetaStore, ObservationStore};
use slate_store_lmdb::LmdbEnvironment;
use slate_transactions::{Block, Transaction};
use slate_types::Timestamp;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::NodeConfig;
use crate::error::{AdmissionError, NodeError};
use crate::ingest::{IngestBuffer, IngestDecision};
use crate::producer::{run_producer, ProducerIdentity};
use crate::service::ChainService;
use crate::shutdown::ShutdownController;

/// Channel capacity for locally produced blocks.
const PRODUCED_CHANNEL_CAPACITY: usize = 64;
/// Meta-store key for the committed tip height.
const TIP_HEIGHT_META_KEY: &str = "tip_height";

/// A running Slate node.
pub struct SlateNode {
    config: NodeConfig,
    service: Arc<ChainService>,
    env: LmdbEnvironment,
    ingest: Mutex<IngestBuffer>,
    shutdown: ShutdownController,
    produced_tx: mpsc::Sender<Block>,
    produced_rx: Mutex<Option<mpsc::Receiver<Block>>>,
    producer_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl SlateNode {
    /// Open the data directory and rebuild chain state by replaying the
    /// persisted block sequence.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        let env = LmdbEnvironment::open(&config.data_dir, config.map_size)
            .map_err(|e| NodeError::Config(e.to_string()))?;
        let service = Arc::new(ChainService::new(
            config.params.clone(),
            config.mempool_capacity,
        ));

        let blocks = env.block_store().iter_from(1)?;
        let replayed = blocks.len();
        for block in &blocks {
            service.replay_block(block)?;
        }
        if replayed > 0 {
            tracing::info!(blocks = replayed, "chain state replayed from store");
        }

        let observations = env.observation_store().iter_observations()?;
        if !observations.is_empty() {
            service.restore_observer(ScoreObserver::from_entries(observations));
        }

        let schedule = SlotSchedule::new(config.params.clone());
        let ingest = Mutex::new(IngestBuffer::new(schedule, config.ingest_capacity));
        let (produced_tx, produced_rx) = mpsc::channel(PRODUCED_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            service,
            env,
            ingest,
            shutdown: ShutdownController::new(),
            produced_tx,
            produced_rx: Mutex::new(Some(produced_rx)),
            producer_handles: Mutex::new(Vec::new()),
        })
    }

    pub fn service(&self) -> &Arc<ChainService> {
        &self.service
    }

    /// Install the genesis block on an empty chain, bypassing the
    /// producer-schedule checks that need an existing ranking.
    pub fn bootstrap(&self, genesis: &Block) -> Result<BlockReceipt, NodeError> {
        let receipt = self.service.replay_block(genesis)?;
        self.persist_block(genesis)?;
        Ok(receipt)
    }

    /// Handle a block arriving from the network or a local producer.
    ///
    /// Returns `Ok(None)` when the block was buffered for a future slot.
    pub fn handle_block(
        &self,
        block: Block,
        now: Timestamp,
    ) -> Result<Option<BlockReceipt>, NodeError> {
        let decision = self
            .ingest
            .lock()
            .expect("ingest lock")
            .offer(block.clone(), now);
        match decision {
            IngestDecision::Discarded => Err(NodeError::StaleBlock),
            IngestDecision::Buffered => Ok(None),
            IngestDecision::Validate => {
                let receipt = self.service.ingest_block(&block, now)?;
                self.persist_block(&block)?;
                self.persist_observation(&block)?;
                Ok(Some(receipt))
            }
        }
    }

    /// Release buffered blocks whose slots have begun and validate them.
    pub fn drain_ingest(&self, now: Timestamp) {
        let due = self.ingest.lock().expect("ingest lock").drain_due(now);
        for block in due {
            let height = block.height;
            match self.service.ingest_block(&block, now) {
                Ok(_) => {
                    if let Err(e) = self.persist_block(&block) {
                        tracing::error!(height, error = %e, "failed to persist block");
                    }
                    let _ = self.persist_observation(&block);
                }
                Err(e) => tracing::warn!(height, error = %e, "buffered block rejected"),
            }
        }
    }

    /// Admit a transaction to the mempool.
    pub fn submit_transaction(&self, tx: Transaction) -> Result<(), AdmissionError> {
        self.service.submit_transaction(tx)
    }

    /// Spawn the production loop for a local delegate identity. A wallet
    /// holding several identities calls this once per identity.
    pub fn spawn_producer(&self, identity: ProducerIdentity) {
        let schedule = SlotSchedule::new(self.config.params.clone());
        let handle = tokio::spawn(run_producer(
            Arc::clone(&self.service),
            identity,
            schedule,
            self.config.block_tx_limit,
            self.produced_tx.clone(),
            self.shutdown.signal(),
        ));
        self.producer_handles
            .lock()
            .expect("producer handles lock")
            .push(handle);
    }

    /// Main loop: apply locally produced blocks and drain the ingest
    /// buffer until shutdown.
    pub async fn run(&self) {
        let mut produced_rx = self
            .produced_rx
            .lock()
            .expect("produced rx lock")
            .take()
            .expect("run called twice");
        let mut signal = self.shutdown.signal();
        let mut tick = tokio::time::interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                Some(block) = produced_rx.recv() => {
                    let now = Timestamp::now();
                    if let Err(e) = self.handle_block(block, now) {
                        tracing::warn!(error = %e, "locally produced block rejected");
                    }
                }
                _ = tick.tick() => {
                    self.drain_ingest(Timestamp::now());
                }
                _ = signal.wait() => break,
            }
        }
    }

    /// Request shutdown and flush storage.
    pub fn shutdown(&self) -> Result<(), NodeError> {
        self.shutdown.shutdown();
        self.env
            .force_sync()
            .map_err(|e| NodeError::Config(e.to_string()))?;
        Ok(())
    }

    fn persist_block(&self, block: &Block) -> Result<(), NodeError> {
        self.env.block_store().put_block(block)?;
        self.env
            .meta_store()
            .put_meta(TIP_HEIGHT_META_KEY, &block.height.to_be_bytes())?;
        Ok(())
    }

    fn persist_observation(&self, block: &Block) -> Result<(), NodeError> {
        let observer = self.service.observer_snapshot();
        if let Some(obs) = observer.observation(block.producer) {
            self.env
                .observation_store()
                .put_observation(block.producer, obs)?;
        }
        Ok(())
    }
}

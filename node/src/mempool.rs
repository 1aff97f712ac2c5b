//! Transaction admission and the pending set.
//!
//! Admission checks run against the last committed snapshot: inputs must
//! exist there and must not already be consumed by another pending
//! transaction, and the projected vote deltas must stay inside the
//! concentration cap. Rejections are recoverable; the submitter may retry
//! with different inputs.

use slate_ledger::ChainState;
use slate_transactions::{OutputId, Transaction};
use slate_types::TxHash;
use std::collections::{HashMap, HashSet};

use crate::error::AdmissionError;

/// Pending transactions, insertion-ordered for block packing.
pub struct Mempool {
    pending: HashMap<TxHash, Transaction>,
    order: Vec<TxHash>,
    consumed: HashSet<OutputId>,
    capacity: usize,
}

impl Mempool {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: HashMap::new(),
            order: Vec::new(),
            consumed: HashSet::new(),
            capacity,
        }
    }

    /// Admit a transaction against the committed snapshot.
    pub fn admit(&mut self, snapshot: &ChainState, tx: Transaction) -> Result<(), AdmissionError> {
        if self.pending.len() >= self.capacity {
            return Err(AdmissionError::MempoolFull);
        }
        if self.pending.contains_key(&tx.hash) {
            return Err(AdmissionError::DuplicateTransaction);
        }
        tx.validate_structure(false)?;

        let mut deltas: HashMap<u32, i128> = HashMap::new();
        for input in &tx.inputs {
            if self.consumed.contains(input) {
                return Err(AdmissionError::InputPending(input.to_string()));
            }
            let output = snapshot
                .utxo(input)
                .ok_or_else(|| AdmissionError::UnknownInput(input.to_string()))?;
            if let Some(num) = output.vote.base() {
                let signed = output.vote.raw().signum() as i128 * output.amount.raw() as i128;
                *deltas.entry(num.get()).or_insert(0) -= signed;
            }
        }
        if let Some(num) = tx.vote.base() {
            let created: i128 = tx.output_total() as i128;
            let signed = tx.vote.raw().signum() as i128 * created;
            *deltas.entry(num.get()).or_insert(0) += signed;
        }
        if snapshot.would_exceed_cap(&deltas) {
            return Err(AdmissionError::CapProjection);
        }

        for input in &tx.inputs {
            self.consumed.insert(*input);
        }
        self.order.push(tx.hash);
        self.pending.insert(tx.hash, tx);
        Ok(())
    }

    /// The oldest pending transactions, up to `limit`, for block packing.
    pub fn take_for_block(&self, limit: usize) -> Vec<Transaction> {
        self.order
            .iter()
            .take(limit)
            .filter_map(|hash| self.pending.get(hash).cloned())
            .collect()
    }

    /// Drop transactions included in a committed block and release any
    /// pending reservations that block invalidated.
    pub fn prune_committed(&mut self, committed: &[Transaction]) {
        for tx in committed {
            if let Some(old) = self.pending.remove(&tx.hash) {
                for input in &old.inputs {
                    self.consumed.remove(input);
                }
            }
            // Inputs spent by the block are gone regardless of which
            // transaction in the pool wanted them.
            for input in &tx.inputs {
                self.consumed.remove(input);
            }
        }
        self.order.retain(|h| self.pending.contains_key(h));

        // Evict pending transactions whose inputs the block consumed.
        let doomed: Vec<TxHash> = self
            .pending
            .values()
            .filter(|p| {
                p.inputs
                    .iter()
                    .any(|i| committed.iter().any(|c| c.inputs.contains(i)))
            })
            .map(|p| p.hash)
            .collect();
        for hash in doomed {
            if let Some(old) = self.pending.remove(&hash) {
                for input in &old.inputs {
                    self.consumed.remove(input);
                }
            }
        }
        self.order.retain(|h| self.pending.contains_key(h));
    }

    /// Hashes of everything currently pending; the validator compares the
    /// blocks it accepts against this view.
    pub fn known_hashes(&self) -> HashSet<TxHash> {
        self.pending.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_ledger::ChainState;
    use slate_transactions::{Block, Output};
    use slate_types::{
        Address, DelegateId, DelegateNum, NetworkParams, ShareAmount, Timestamp,
    };

    fn addr(n: u32) -> Address {
        Address::new(format!("slt_{n:08x}"))
    }

    fn payment(owner: u32, amount: u64) -> Output {
        Output::Payment {
            owner: addr(owner),
            amount: ShareAmount::new(amount),
        }
    }

    /// Chain with one delegate and issued outputs of the given amounts.
    fn chain_with_outputs(amounts: &[u64]) -> (ChainState, Vec<OutputId>) {
        let mut chain = ChainState::new(NetworkParams::default());
        let mut outputs = vec![Output::ClaimName {
            delegate_id: Some(DelegateNum::new(1)),
            name: "alice".into(),
            data: vec![],
        }];
        outputs.extend(amounts.iter().enumerate().map(|(i, &a)| payment(i as u32, a)));
        let gtx = Transaction::new(vec![], outputs, DelegateId::NONE, Timestamp::new(0));
        let ids = (0..amounts.len() as u32)
            .map(|i| OutputId::new(gtx.hash, 1 + i))
            .collect();
        let block = Block::new(1, chain.tip(), Timestamp::new(10), DelegateNum::new(1), vec![gtx]);
        chain.apply_block(&block).unwrap();
        (chain, ids)
    }

    fn spend(input: OutputId, amount: u64, vote: DelegateId) -> Transaction {
        Transaction::new(
            vec![input],
            vec![payment(0, amount)],
            vote,
            Timestamp::new(0),
        )
    }

    #[test]
    fn admits_a_clean_transaction() {
        let (chain, ids) = chain_with_outputs(&[1_000]);
        let mut pool = Mempool::new(16);
        pool.admit(&chain, spend(ids[0], 1_000, DelegateId::NONE))
            .unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn pending_double_spend_is_recoverable() {
        let (chain, ids) = chain_with_outputs(&[1_000]);
        let mut pool = Mempool::new(16);
        pool.admit(&chain, spend(ids[0], 1_000, DelegateId::NONE))
            .unwrap();

        let err = pool
            .admit(&chain, spend(ids[0], 999, DelegateId::NONE))
            .unwrap_err();
        assert!(matches!(err, AdmissionError::InputPending(_)));
    }

    #[test]
    fn unknown_input_rejected() {
        let (chain, _) = chain_with_outputs(&[1_000]);
        let mut pool = Mempool::new(16);
        let bogus = OutputId::new(TxHash::new([9; 32]), 0);
        let err = pool
            .admit(&chain, spend(bogus, 5, DelegateId::NONE))
            .unwrap_err();
        assert!(matches!(err, AdmissionError::UnknownInput(_)));
    }

    #[test]
    fn cap_projection_rejects_oversized_votes() {
        // Supply 1,000,000 → cap 20,000; voting 25,000 at once crosses it.
        let (chain, ids) = chain_with_outputs(&[25_000, 975_000]);
        let mut pool = Mempool::new(16);
        let err = pool
            .admit(
                &chain,
                spend(ids[0], 25_000, DelegateId::for_delegate(DelegateNum::new(1))),
            )
            .unwrap_err();
        assert_eq!(err, AdmissionError::CapProjection);

        // An against-vote of the same size is fine.
        pool.admit(
            &chain,
            spend(ids[0], 25_000, DelegateId::against_delegate(DelegateNum::new(1))),
        )
        .unwrap();
    }

    #[test]
    fn capacity_limit() {
        let (chain, ids) = chain_with_outputs(&[100, 100]);
        let mut pool = Mempool::new(1);
        pool.admit(&chain, spend(ids[0], 100, DelegateId::NONE))
            .unwrap();
        let err = pool
            .admit(&chain, spend(ids[1], 100, DelegateId::NONE))
            .unwrap_err();
        assert_eq!(err, AdmissionError::MempoolFull);
    }

    #[test]
    fn prune_releases_inputs_and_evicts_conflicts() {
        let (chain, ids) = chain_with_outputs(&[100, 200]);
        let mut pool = Mempool::new(16);
        let committed_tx = spend(ids[0], 100, DelegateId::NONE);
        let conflicting = Transaction::new(
            vec![ids[0], ids[1]],
            vec![payment(0, 300)],
            DelegateId::NONE,
            Timestamp::new(1),
        );
        // The conflicting tx is pending when someone else's block spends
        // ids[0].
        pool.admit(&chain, conflicting).unwrap();
        pool.prune_committed(&[committed_tx]);

        assert!(pool.is_empty());
        // ids[1] is usable again after the eviction.
        pool.admit(&chain, spend(ids[1], 200, DelegateId::NONE))
            .unwrap();
    }

    #[test]
    fn take_for_block_preserves_admission_order() {
        let (chain, ids) = chain_with_outputs(&[100, 200, 300]);
        let mut pool = Mempool::new(16);
        let txs: Vec<Transaction> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| spend(id, (i as u64 + 1) * 100, DelegateId::NONE))
            .collect();
        for tx in &txs {
            pool.admit(&chain, tx.clone()).unwrap();
        }

        let packed = pool.take_for_block(2);
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[0].hash, txs[0].hash);
        assert_eq!(packed[1].hash, txs[1].hash);
    }
}

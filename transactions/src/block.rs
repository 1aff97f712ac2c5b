//! Block format: ordered transactions, producer signature, aligned timestamp.

use serde::{Deserialize, Serialize};
use slate_types::{crypto, BlockHash, DelegateNum, PrivateKey, Signature, Timestamp};

use crate::error::TxError;
use crate::transaction::Transaction;

/// A block produced by the delegate authorized for its slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub hash: BlockHash,
    pub height: u64,
    pub prev: BlockHash,
    /// Must align to the slot grid within one block interval.
    pub timestamp: Timestamp,
    /// The delegate claiming this slot.
    pub producer: DelegateNum,
    pub transactions: Vec<Transaction>,
    /// Producer's signature over [`Block::signing_digest`].
    pub signature: Signature,
}

impl Block {
    /// Assemble an unsigned block with its hash computed.
    pub fn new(
        height: u64,
        prev: BlockHash,
        timestamp: Timestamp,
        producer: DelegateNum,
        transactions: Vec<Transaction>,
    ) -> Self {
        let mut block = Self {
            hash: BlockHash::ZERO,
            height,
            prev,
            timestamp,
            producer,
            transactions,
            signature: Signature([0u8; 64]),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Digest over the header fields and the transaction hashes.
    pub fn compute_hash(&self) -> BlockHash {
        let mut tx_hashes = Vec::with_capacity(self.transactions.len() * 32);
        for tx in &self.transactions {
            tx_hashes.extend_from_slice(tx.hash.as_bytes());
        }
        let digest = crypto::sha256_multi(&[
            b"slate-block",
            &self.height.to_le_bytes(),
            self.prev.as_bytes(),
            &self.timestamp.as_secs().to_le_bytes(),
            &self.producer.get().to_le_bytes(),
            &tx_hashes,
        ]);
        BlockHash::new(digest)
    }

    /// The bytes the producer signs.
    pub fn signing_digest(&self) -> [u8; 32] {
        *self.compute_hash().as_bytes()
    }

    /// Sign in place with the producer's key.
    pub fn sign(&mut self, key: &PrivateKey) {
        self.signature = crypto::sign(key, &self.signing_digest());
    }

    /// The terminal transaction, which alone may carry the delegate fee.
    pub fn terminal_tx(&self) -> Option<&Transaction> {
        self.transactions.last()
    }

    /// Total delegate fee claimed by the terminal transaction.
    pub fn claimed_fee(&self) -> u64 {
        self.terminal_tx()
            .map(|tx| {
                tx.outputs
                    .iter()
                    .filter(|o| o.is_delegate_fee())
                    .map(|o| o.amount().raw())
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Structural checks that need no chain state: every transaction is
    /// well-formed, and fee outputs appear only in the terminal transaction.
    /// An empty transaction list is legal; producers keep the cadence even
    /// with an empty mempool.
    pub fn validate_structure(&self) -> Result<(), TxError> {
        let Some(last) = self.transactions.len().checked_sub(1) else {
            return Ok(());
        };
        for (i, tx) in self.transactions.iter().enumerate() {
            tx.validate_structure(i == last)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Output, OutputId};
    use slate_types::{Address, DelegateId, ShareAmount, TxHash};

    fn addr(n: u8) -> Address {
        Address::new(format!("slt_{:02x}{}", n, "0".repeat(8)))
    }

    fn simple_tx(seed: u8) -> Transaction {
        Transaction::new(
            vec![OutputId::new(TxHash::new([seed; 32]), 0)],
            vec![Output::Payment {
                owner: addr(seed),
                amount: ShareAmount::new(10),
            }],
            DelegateId::NONE,
            Timestamp::new(100),
        )
    }

    fn fee_tx(seed: u8, fee: u64) -> Transaction {
        Transaction::new(
            vec![OutputId::new(TxHash::new([seed; 32]), 0)],
            vec![Output::DelegateFee {
                owner: addr(seed),
                amount: ShareAmount::new(fee),
            }],
            DelegateId::NONE,
            Timestamp::new(100),
        )
    }

    #[test]
    fn sign_verify_with_producer_key() {
        let kp = crypto::keypair_from_seed(&[9u8; 32]);
        let mut block = Block::new(
            1,
            BlockHash::new([1; 32]),
            Timestamp::new(1000),
            DelegateNum::new(5),
            vec![simple_tx(1)],
        );
        block.sign(&kp.private);
        assert!(crypto::verify(
            &kp.public,
            &block.signing_digest(),
            &block.signature
        ));
    }

    #[test]
    fn claimed_fee_reads_terminal_tx_only() {
        let block = Block::new(
            1,
            BlockHash::ZERO,
            Timestamp::new(1000),
            DelegateNum::new(5),
            vec![simple_tx(1), fee_tx(2, 42)],
        );
        assert_eq!(block.claimed_fee(), 42);
        assert!(block.validate_structure().is_ok());
    }

    #[test]
    fn fee_output_before_terminal_rejected() {
        let block = Block::new(
            1,
            BlockHash::ZERO,
            Timestamp::new(1000),
            DelegateNum::new(5),
            vec![fee_tx(2, 42), simple_tx(1)],
        );
        assert!(matches!(
            block.validate_structure(),
            Err(TxError::MisplacedFeeOutput)
        ));
    }

    #[test]
    fn empty_block_is_structurally_valid() {
        let block = Block::new(
            1,
            BlockHash::ZERO,
            Timestamp::new(1000),
            DelegateNum::new(5),
            vec![],
        );
        assert!(block.validate_structure().is_ok());
        assert_eq!(block.claimed_fee(), 0);
    }

    #[test]
    fn hash_changes_with_transactions() {
        let a = Block::new(
            1,
            BlockHash::ZERO,
            Timestamp::new(1000),
            DelegateNum::new(5),
            vec![simple_tx(1)],
        );
        let b = Block::new(
            1,
            BlockHash::ZERO,
            Timestamp::new(1000),
            DelegateNum::new(5),
            vec![simple_tx(2)],
        );
        assert_ne!(a.hash, b.hash);
    }
}

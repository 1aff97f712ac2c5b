//! The transaction envelope.

use serde::{Deserialize, Serialize};
use slate_types::{crypto, DelegateId, Signature, Timestamp, TxHash};
use std::collections::HashSet;

use crate::encoding;
use crate::error::TxError;
use crate::output::{valid_name, Output, OutputId};

/// A transaction: a set of inputs to spend, outputs to create, and one
/// delegate reference that every created output will vote with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: TxHash,
    pub inputs: Vec<OutputId>,
    pub outputs: Vec<Output>,
    /// Signed vote reference; its polarity applies to all created outputs.
    pub vote: DelegateId,
    pub timestamp: Timestamp,
    pub signature: Signature,
}

impl Transaction {
    /// Build a transaction with its hash computed from the content fields.
    pub fn new(
        inputs: Vec<OutputId>,
        outputs: Vec<Output>,
        vote: DelegateId,
        timestamp: Timestamp,
    ) -> Self {
        let mut tx = Self {
            hash: TxHash::ZERO,
            inputs,
            outputs,
            vote,
            timestamp,
            signature: Signature([0u8; 64]),
        };
        tx.hash = tx.compute_hash();
        tx
    }

    /// Digest over the content fields (everything except hash + signature).
    /// The vote reference enters the digest in its compact signed encoding.
    pub fn compute_hash(&self) -> TxHash {
        let inputs = bincode::serialize(&self.inputs).expect("serializable inputs");
        let outputs = bincode::serialize(&self.outputs).expect("serializable outputs");
        let mut vote = Vec::with_capacity(5);
        encoding::write_delegate_id(self.vote, &mut vote);
        let digest = crypto::sha256_multi(&[
            b"slate-tx",
            &inputs,
            &outputs,
            &vote,
            &self.timestamp.as_secs().to_le_bytes(),
        ]);
        TxHash::new(digest)
    }

    /// The bytes a spender signs.
    pub fn signing_digest(&self) -> [u8; 32] {
        *self.compute_hash().as_bytes()
    }

    /// Sum of created value (payments + fee outputs).
    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|o| o.amount().raw()).sum()
    }

    /// Whether any output is a `ClaimName`.
    pub fn has_claim(&self) -> bool {
        self.outputs.iter().any(Output::is_claim)
    }

    /// Structural checks that need no chain state.
    ///
    /// `allow_fee_output` is true only for the terminal transaction of a
    /// block; mempool admission always passes false.
    pub fn validate_structure(&self, allow_fee_output: bool) -> Result<(), TxError> {
        if self.inputs.is_empty() && self.outputs.is_empty() {
            return Err(TxError::Empty);
        }
        let mut seen = HashSet::with_capacity(self.inputs.len());
        for input in &self.inputs {
            if !seen.insert(input) {
                return Err(TxError::DuplicateInput(input.to_string()));
            }
        }
        for output in &self.outputs {
            match output {
                Output::ClaimName { name, .. } if !valid_name(name) => {
                    return Err(TxError::BadName(name.clone()));
                }
                Output::DelegateFee { .. } if !allow_fee_output => {
                    return Err(TxError::MisplacedFeeOutput);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

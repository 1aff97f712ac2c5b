//! Transaction outputs and the unspent-output record.

use serde::{Deserialize, Serialize};
use slate_types::{Address, DelegateId, DelegateNum, ShareAmount, TxHash};
use std::fmt;

/// Reference to an output of a prior transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputId {
    pub tx: TxHash,
    pub index: u32,
}

impl OutputId {
    pub fn new(tx: TxHash, index: u32) -> Self {
        Self { tx, index }
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx, self.index)
    }
}

/// One output of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// A plain transfer. Becomes an unspent output voting with the
    /// enclosing transaction's delegate reference.
    Payment { owner: Address, amount: ShareAmount },

    /// Register, renew or resign a delegate name. `delegate_id: None`
    /// registers the name as ineligible (the wire's reserved zero id);
    /// on a name the claimant already owns it is a resignation.
    ClaimName {
        delegate_id: Option<DelegateNum>,
        name: String,
        data: Vec<u8>,
    },

    /// The producer's fee payment. Only valid in the terminal transaction
    /// of a block, capped by the rolling revenue mean.
    DelegateFee { owner: Address, amount: ShareAmount },
}

impl Output {
    /// The monetary value this output removes from the fee pool.
    /// ClaimName outputs carry no value; their cost is the burned fee.
    pub fn amount(&self) -> ShareAmount {
        match self {
            Output::Payment { amount, .. } | Output::DelegateFee { amount, .. } => *amount,
            Output::ClaimName { .. } => ShareAmount::ZERO,
        }
    }

    /// The owner of the value, for outputs that carry value.
    pub fn owner(&self) -> Option<&Address> {
        match self {
            Output::Payment { owner, .. } | Output::DelegateFee { owner, .. } => Some(owner),
            Output::ClaimName { .. } => None,
        }
    }

    pub fn is_claim(&self) -> bool {
        matches!(self, Output::ClaimName { .. })
    }

    pub fn is_delegate_fee(&self) -> bool {
        matches!(self, Output::DelegateFee { .. })
    }
}

/// Maximum delegate name length.
pub const MAX_NAME_LEN: usize = 32;

/// Whether a delegate name conforms to the bounded character set:
/// 1–32 chars, lowercase ASCII alphanumerics plus `-`, starting with a letter.
pub fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_NAME_LEN
        && first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// An unspent output as tracked by the ledger.
///
/// Carries exactly one `vote` value, so every share at every moment is
/// voting for or against exactly one delegate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub owner: Address,
    pub amount: ShareAmount,
    pub vote: DelegateId,
    /// Block height at which the output was created.
    pub age: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_charset() {
        assert!(valid_name("alice"));
        assert!(valid_name("node-7"));
        assert!(!valid_name(""));
        assert!(!valid_name("Alice"));
        assert!(!valid_name("7up"));
        assert!(!valid_name("has space"));
        assert!(!valid_name(&"x".repeat(MAX_NAME_LEN + 1)));
        assert!(valid_name(&"x".repeat(MAX_NAME_LEN)));
    }

    #[test]
    fn claim_outputs_carry_no_value() {
        let claim = Output::ClaimName {
            delegate_id: Some(DelegateNum::new(1)),
            name: "alice".into(),
            data: vec![],
        };
        assert_eq!(claim.amount(), ShareAmount::ZERO);
        assert!(claim.owner().is_none());
        assert!(claim.is_claim());
    }
}

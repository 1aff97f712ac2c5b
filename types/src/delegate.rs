//! Delegate identifiers and vote polarity.
//!
//! Every transaction carries a signed [`DelegateId`]: the magnitude names the
//! delegate, the sign is the polarity of the vote carried by the referencing
//! outputs. `0` is reserved and means "resigned / ineligible".

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unsigned registry key of a delegate. Never zero; the zero value is
/// rejected at construction and at deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DelegateNum(u32);

impl DelegateNum {
    /// Create a delegate number.
    ///
    /// # Panics
    /// Panics if `n` is zero — zero is the reserved "resigned" marker and
    /// never identifies a delegate.
    pub fn new(n: u32) -> Self {
        assert!(n != 0, "delegate number zero is reserved");
        Self(n)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for DelegateNum {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        if n == 0 {
            return Err("delegate number zero is reserved".into());
        }
        Ok(Self(n))
    }
}

impl From<DelegateNum> for u32 {
    fn from(num: DelegateNum) -> u32 {
        num.0
    }
}

impl fmt::Display for DelegateNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delegate/{}", self.0)
    }
}

/// Which way an output's amount counts for its delegate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotePolarity {
    /// The output's amount supports the delegate.
    For,
    /// The output's amount counts against the delegate.
    Against,
}

/// A signed vote reference carried by transactions and unspent outputs.
///
/// Positive supports the delegate, negative opposes it, zero is the reserved
/// "no delegate" value used for resignation claims.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelegateId(i32);

impl DelegateId {
    /// The reserved "resigned / ineligible" value.
    pub const NONE: Self = Self(0);

    /// Build a vote reference from a delegate number and polarity.
    pub fn voting(num: DelegateNum, polarity: VotePolarity) -> Self {
        let n = num.get() as i32;
        match polarity {
            VotePolarity::For => Self(n),
            VotePolarity::Against => Self(-n),
        }
    }

    /// Vote *for* a delegate.
    pub fn for_delegate(num: DelegateNum) -> Self {
        Self::voting(num, VotePolarity::For)
    }

    /// Vote *against* a delegate.
    pub fn against_delegate(num: DelegateNum) -> Self {
        Self::voting(num, VotePolarity::Against)
    }

    /// Reconstruct from a raw signed value (wire decoding).
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> i32 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// The delegate this reference names, if any.
    pub fn base(&self) -> Option<DelegateNum> {
        match self.0.unsigned_abs() {
            0 => None,
            n => Some(DelegateNum::new(n)),
        }
    }

    /// The vote polarity, if this references a delegate.
    pub fn polarity(&self) -> Option<VotePolarity> {
        if self.0 > 0 {
            Some(VotePolarity::For)
        } else if self.0 < 0 {
            Some(VotePolarity::Against)
        } else {
            None
        }
    }
}

impl fmt::Display for DelegateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.base(), self.polarity()) {
            (Some(num), Some(VotePolarity::For)) => write!(f, "+{}", num.get()),
            (Some(num), Some(VotePolarity::Against)) => write!(f, "-{}", num.get()),
            _ => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polarity_roundtrip() {
        let num = DelegateNum::new(42);
        let pro = DelegateId::for_delegate(num);
        let con = DelegateId::against_delegate(num);

        assert_eq!(pro.base(), Some(num));
        assert_eq!(con.base(), Some(num));
        assert_eq!(pro.polarity(), Some(VotePolarity::For));
        assert_eq!(con.polarity(), Some(VotePolarity::Against));
    }

    #[test]
    fn none_has_no_base_or_polarity() {
        assert!(DelegateId::NONE.is_none());
        assert_eq!(DelegateId::NONE.base(), None);
        assert_eq!(DelegateId::NONE.polarity(), None);
    }

    #[test]
    fn from_raw_preserves_sign() {
        assert_eq!(DelegateId::from_raw(-7).polarity(), Some(VotePolarity::Against));
        assert_eq!(DelegateId::from_raw(7).polarity(), Some(VotePolarity::For));
        assert_eq!(DelegateId::from_raw(-7).base(), Some(DelegateNum::new(7)));
    }

    #[test]
    #[should_panic]
    fn zero_delegate_num_rejected() {
        DelegateNum::new(0);
    }
}

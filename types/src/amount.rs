//! Share amount type.
//!
//! Amounts are fixed-point integers (u64 raw shares) to avoid floating-point
//! errors. The smallest unit is 1 share. Vote arithmetic that can go negative
//! (net votes) uses `i128` at the call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// An amount of shares.
///
/// Internally stored as raw units (u64) for precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShareAmount(u64);

impl ShareAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// This amount as a signed wide integer, for net-vote arithmetic.
    pub fn as_i128(&self) -> i128 {
        self.0 as i128
    }
}

impl Add for ShareAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for ShareAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for ShareAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for ShareAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shares", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_arithmetic() {
        let a = ShareAmount::new(100);
        let b = ShareAmount::new(30);
        assert_eq!(a.checked_add(b), Some(ShareAmount::new(130)));
        assert_eq!(a.checked_sub(b), Some(ShareAmount::new(70)));
        assert_eq!(b.checked_sub(a), None);
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let a = ShareAmount::new(5);
        let b = ShareAmount::new(10);
        assert_eq!(a.saturating_sub(b), ShareAmount::ZERO);
    }

    #[test]
    fn sum_over_iterator() {
        let total: ShareAmount = [1u64, 2, 3].iter().map(|&n| ShareAmount::new(n)).sum();
        assert_eq!(total, ShareAmount::new(6));
    }
}

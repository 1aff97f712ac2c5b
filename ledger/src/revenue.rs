//! Rolling per-block revenue window.
//!
//! All fee pricing (registration, renewal, the producer fee cap) references
//! the mean revenue of the most recent window of blocks. A block's revenue
//! is the fees it collects, excluding the producer's own fee claim.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The most recent per-block revenues, up to the configured window length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueWindow {
    window: usize,
    revenues: VecDeque<u64>,
}

impl RevenueWindow {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            revenues: VecDeque::with_capacity(window),
        }
    }

    /// Record a committed block's revenue, evicting the oldest entry once
    /// the window is full.
    pub fn record(&mut self, revenue: u64) {
        if self.revenues.len() == self.window {
            self.revenues.pop_front();
        }
        self.revenues.push_back(revenue);
    }

    /// Mean revenue over the recorded blocks. When fewer than a full window
    /// of blocks exist, the mean is over all available; zero before any.
    pub fn mean(&self) -> u64 {
        if self.revenues.is_empty() {
            return 0;
        }
        let sum: u128 = self.revenues.iter().map(|&r| r as u128).sum();
        (sum / self.revenues.len() as u128) as u64
    }

    pub fn len(&self) -> usize {
        self.revenues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revenues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_means_zero() {
        assert_eq!(RevenueWindow::new(100).mean(), 0);
    }

    #[test]
    fn partial_window_uses_all_available() {
        let mut w = RevenueWindow::new(100);
        w.record(1000);
        w.record(2000);
        assert_eq!(w.mean(), 1500);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn full_window_evicts_oldest() {
        let mut w = RevenueWindow::new(3);
        for r in [300, 600, 900, 1200] {
            w.record(r);
        }
        assert_eq!(w.len(), 3);
        assert_eq!(w.mean(), (600 + 900 + 1200) / 3);
    }

    #[test]
    fn mean_does_not_overflow_on_large_revenues() {
        let mut w = RevenueWindow::new(2);
        w.record(u64::MAX);
        w.record(u64::MAX);
        assert_eq!(w.mean(), u64::MAX);
    }
}

//! Streaming median over a bounded reservoir.
//!
//! Latency medians are kept per delegate for the whole life of a node, so
//! exact storage is out. A uniform reservoir keeps a fixed-size random
//! sample of the stream; the sample median tracks the true median well
//! within the few-percent error the scoring tolerates.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default reservoir size. Odd, so the sample median is a real element.
const DEFAULT_CAPACITY: usize = 499;

/// Fixed-memory median estimator over an unbounded stream of samples.
#[derive(Clone, Serialize, Deserialize)]
pub struct StreamingMedian {
    samples: Vec<u64>,
    capacity: usize,
    seen: u64,
}

impl StreamingMedian {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            seen: 0,
        }
    }

    /// Record one sample. Uniform reservoir replacement keeps every sample
    /// equally likely to be retained.
    pub fn record(&mut self, value: u64) {
        self.seen += 1;
        if self.samples.len() < self.capacity {
            self.samples.push(value);
            return;
        }
        let slot = rand::thread_rng().gen_range(0..self.seen);
        if (slot as usize) < self.capacity {
            self.samples[slot as usize] = value;
        }
    }

    /// The current median estimate; `None` before any sample.
    pub fn median(&self) -> Option<u64> {
        if self.samples.is_empty() {
            return None;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_unstable();
        Some(sorted[sorted.len() / 2])
    }

    /// Total samples observed (not retained).
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for StreamingMedian {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StreamingMedian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingMedian")
            .field("seen", &self.seen)
            .field("median", &self.median())
            .finish()
    }
}

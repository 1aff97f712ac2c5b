//! Comparative delegate scoring.
//!
//! No absolute quality scale exists across nodes, so delegates are scored
//! by their rank within each metric, then the ranks are averaged under
//! configurable weights. Early and late latency share one weight, so a
//! node gains nothing by skewing its own clock in either direction.

use slate_types::DelegateNum;

use crate::observer::Observation;

/// Relative weights for the score composition. The single `latency` weight
/// covers both the early and late medians.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreWeights {
    pub reliability: u64,
    pub latency: u64,
    pub expected_tx: u64,
    pub unexpected_tx: u64,
    pub fee: u64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            reliability: 1,
            latency: 1,
            expected_tx: 1,
            unexpected_tx: 1,
            fee: 1,
        }
    }
}

impl ScoreWeights {
    fn total(&self) -> u64 {
        // Latency counts twice: once for the late median, once for the early.
        self.reliability + 2 * self.latency + self.expected_tx + self.unexpected_tx + self.fee
    }
}

/// One delegate's composite score. Lower is better.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelegateScore {
    pub delegate: DelegateNum,
    /// Weighted mean of per-metric ranks, scaled by 1000.
    pub score_milli: u64,
}

/// Rank in one metric: the number of peers with a strictly better value.
fn metric_ranks(values: &[(u32, u64)], lower_better: bool) -> Vec<u64> {
    values
        .iter()
        .map(|&(_, v)| {
            values
                .iter()
                .filter(|&&(_, other)| if lower_better { other < v } else { other > v })
                .count() as u64
        })
        .collect()
}

/// Score every non-disqualified delegate by comparative rank, best first.
///
/// Delegates with an observed invalid signed block are excluded entirely.
pub fn rank_delegates(
    observations: &[(DelegateNum, &Observation)],
    weights: &ScoreWeights,
) -> Vec<DelegateScore> {
    let qualified: Vec<(DelegateNum, &Observation)> = observations
        .iter()
        .filter(|(_, obs)| !obs.disqualified())
        .map(|&(num, obs)| (num, obs))
        .collect();
    if qualified.is_empty() {
        return Vec::new();
    }

    let metric = |f: &dyn Fn(&Observation) -> u64| -> Vec<(u32, u64)> {
        qualified
            .iter()
            .map(|(num, obs)| (num.get(), f(obs)))
            .collect()
    };

    let reliability = metric_ranks(&metric(&|o| o.reliability_bps() as u64), false);
    let late = metric_ranks(
        &metric(&|o| o.late_latency.median().unwrap_or(0)),
        true,
    );
    let early = metric_ranks(
        &metric(&|o| o.early_latency.median().unwrap_or(0)),
        true,
    );
    let expected = metric_ranks(&metric(&|o| o.expected_tx_bps() as u64), false);
    let unexpected = metric_ranks(&metric(&|o| o.unexpected_tx_bps() as u64), true);
    let fee = metric_ranks(&metric(&|o| o.fee_fraction_bps() as u64), true);

    let mut scores: Vec<DelegateScore> = qualified
        .iter()
        .enumerate()
        .map(|(i, (num, _))| {
            let weighted = weights.reliability * reliability[i]
                + weights.latency * late[i]
                + weights.latency * early[i]
                + weights.expected_tx * expected[i]
                + weights.unexpected_tx * unexpected[i]
                + weights.fee * fee[i];
            DelegateScore {
                delegate: *num,
                score_milli: weighted * 1000 / weights.total(),
            }
        })
        .collect();

    scores.sort_by_key(|s| (s.score_milli, s.delegate.get()));
    scores
}

//! Network parameters — the protocol constants every node agrees on.

use serde::{Deserialize, Serialize};

const SECS_PER_YEAR: u64 = 365 * 24 * 3600;

/// All network constants stored by every node.
///
/// Heights and periods are denominated in blocks; one block per
/// `block_interval_secs` of wall-clock time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkParams {
    /// Block period in seconds. Time is divided into slots of this length.
    pub block_interval_secs: u64,

    /// Slots per round; also the number of active block producers.
    pub round_size: u64,

    /// Per-delegate net-vote ceiling as basis points of total supply
    /// (200 = 2%).
    pub vote_cap_bps: u32,

    /// Producer fee ceiling as basis points of mean per-block revenue
    /// (1000 = 10%).
    pub fee_cap_bps: u32,

    /// Number of trailing blocks in the rolling revenue mean.
    pub revenue_window: usize,

    /// Registration fee = this multiple of mean per-block revenue.
    pub registration_fee_multiplier: u64,

    /// Registration lifetime in blocks (one year of slots).
    pub renewal_period_blocks: u64,

    /// Renewal window before expiry in blocks (one month of slots).
    pub renewal_grace_blocks: u64,

    /// Outputs older than this are proactively re-spent to refresh their
    /// vote (eleven months of slots).
    pub stale_vote_age_blocks: u64,

    /// Wallet vote-against scan depth (broader than the producer set).
    pub distrust_scan_depth: usize,

    /// Wallet rule-3 targets must sit below this fraction of supply
    /// (basis points; 100 = 1%).
    pub underdog_ceiling_bps: u32,
}

impl NetworkParams {
    /// Parameters for a given block interval, everything else at protocol
    /// defaults.
    pub fn with_interval(block_interval_secs: u64) -> Self {
        let blocks_per_year = SECS_PER_YEAR / block_interval_secs;
        Self {
            block_interval_secs,
            round_size: 100,
            vote_cap_bps: 200,
            fee_cap_bps: 1000,
            revenue_window: 100,
            registration_fee_multiplier: 100,
            renewal_period_blocks: blocks_per_year,
            renewal_grace_blocks: blocks_per_year / 12,
            stale_vote_age_blocks: blocks_per_year * 11 / 12,
            distrust_scan_depth: 200,
            underdog_ceiling_bps: 100,
        }
    }

    /// Maximum net votes for a single delegate given the current supply.
    pub fn vote_cap(&self, total_supply: u64) -> i128 {
        total_supply as i128 * self.vote_cap_bps as i128 / 10_000
    }

    /// Maximum producer fee given the mean per-block revenue.
    pub fn fee_cap(&self, mean_revenue: u64) -> u64 {
        (mean_revenue as u128 * self.fee_cap_bps as u128 / 10_000) as u64
    }

    /// Registration fee given the mean per-block revenue.
    pub fn registration_fee(&self, mean_revenue: u64) -> u64 {
        mean_revenue.saturating_mul(self.registration_fee_multiplier)
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::with_interval(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_cap_is_two_percent() {
        let params = NetworkParams::default();
        assert_eq!(params.vote_cap(1_000_000), 20_000);
    }

    #[test]
    fn fee_cap_is_ten_percent_of_mean_revenue() {
        let params = NetworkParams::default();
        assert_eq!(params.fee_cap(1000), 100);
    }

    #[test]
    fn registration_fee_is_hundred_times_mean_revenue() {
        let params = NetworkParams::default();
        assert_eq!(params.registration_fee(1000), 100_000);
    }

    #[test]
    fn derived_periods_scale_with_interval() {
        let params = NetworkParams::with_interval(10);
        assert_eq!(params.renewal_period_blocks, 3_153_600);
        assert_eq!(params.renewal_grace_blocks, 262_800);
        assert_eq!(
            params.stale_vote_age_blocks,
            params.renewal_period_blocks * 11 / 12
        );
    }
}

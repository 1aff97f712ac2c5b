//! Vote-target selection for outgoing transactions.
//!
//! First match wins:
//! 1. a distrusted delegate inside the anti-target scan window is voted
//!    *against* (highest-ranked first, to hit the most dangerous one);
//! 2. otherwise the weakest trusted ally (lowest current rank) is voted
//!    *for*;
//! 3. otherwise the best locally scored delegate still below the underdog
//!    ceiling is voted *for*.
//!
//! Every for-vote is checked against the cap projection; a target that
//! would cross the concentration cap falls through to the next rule.

use slate_consensus::DelegateScore;
use slate_ledger::ChainState;
use slate_types::{DelegateId, DelegateNum};
use std::collections::HashMap;

use crate::trust_policy::TrustPolicy;

/// Choose the vote reference for an outgoing transaction moving `amount`
/// shares. Returns `None` when no rule yields a usable target.
pub fn select_vote_target(
    chain: &ChainState,
    policy: &TrustPolicy,
    scores: &[DelegateScore],
    amount: u64,
) -> Option<DelegateId> {
    if let Some(target) = distrusted_target(chain, policy) {
        // Against-votes lower the target's net; the cap cannot bind.
        return Some(DelegateId::against_delegate(target));
    }
    if let Some(target) = weakest_trusted(chain, policy) {
        if fits_cap(chain, target, amount) {
            return Some(DelegateId::for_delegate(target));
        }
    }
    best_underdog(chain, scores, amount).map(DelegateId::for_delegate)
}

/// Rule 1: the highest-ranked distrusted delegate within the scan window.
fn distrusted_target(chain: &ChainState, policy: &TrustPolicy) -> Option<DelegateNum> {
    let depth = chain.params().distrust_scan_depth;
    chain
        .top(depth)
        .into_iter()
        .find(|num| policy.is_distrusted(*num))
}

/// Rule 2: the trusted delegate with the lowest current rank.
fn weakest_trusted(chain: &ChainState, policy: &TrustPolicy) -> Option<DelegateNum> {
    policy
        .trusted()
        .filter_map(|num| chain.rank_of(num).map(|rank| (rank, num)))
        .max_by_key(|&(rank, _)| rank)
        .map(|(_, num)| num)
}

/// Rule 3: the best-scored observed delegate below the underdog ceiling.
fn best_underdog(
    chain: &ChainState,
    scores: &[DelegateScore],
    amount: u64,
) -> Option<DelegateNum> {
    let ceiling = chain.total_supply() as i128 * chain.params().underdog_ceiling_bps as i128
        / 10_000;
    scores
        .iter()
        .map(|s| s.delegate)
        .find(|&num| chain.net_votes(num) < ceiling && fits_cap(chain, num, amount))
}

/// Whether voting `amount` for `num` stays inside the concentration cap.
fn fits_cap(chain: &ChainState, num: DelegateNum, amount: u64) -> bool {
    let mut deltas = HashMap::new();
    deltas.insert(num.get(), amount as i128);
    !chain.would_exceed_cap(&deltas)
}

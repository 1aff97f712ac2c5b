//! Input selection for outgoing transactions.
//!
//! Selection order:
//! 1. every output whose vote references a distrusted delegate — spending
//!    them is what actually removes the votes;
//! 2. outputs past the stale-vote age, to refresh their vote;
//! 3. the oldest remaining outputs until the needed amount is covered.

use slate_ledger::ChainState;
use slate_transactions::{OutputId, UnspentOutput};
use slate_types::Address;

use crate::error::WalletError;
use crate::trust_policy::TrustPolicy;

/// Select the outputs an outgoing transaction of `needed` shares consumes.
///
/// Distrusted-referencing and stale outputs are always included, even when
/// the needed amount is already covered; the surplus returns as change.
pub fn select_inputs(
    chain: &ChainState,
    owner: &Address,
    policy: &TrustPolicy,
    needed: u64,
) -> Result<Vec<(OutputId, UnspentOutput)>, WalletError> {
    let stale_age = chain.params().stale_vote_age_blocks;
    let height = chain.height();

    let mut mandatory: Vec<(OutputId, UnspentOutput)> = Vec::new();
    let mut optional: Vec<(OutputId, UnspentOutput)> = Vec::new();
    for (id, output) in chain.utxos().owned_by(owner) {
        let distrusted = output
            .vote
            .base()
            .map(|num| policy.is_distrusted(num))
            .unwrap_or(false);
        let stale = height.saturating_sub(output.age) >= stale_age;
        if distrusted || stale {
            mandatory.push((*id, output.clone()));
        } else {
            optional.push((*id, output.clone()));
        }
    }

    if mandatory.is_empty() && optional.is_empty() {
        return Err(WalletError::NoSpendableOutputs);
    }

    // Deterministic ordering: oldest first, ties by output id.
    mandatory.sort_by(|a, b| (a.1.age, a.0).cmp(&(b.1.age, b.0)));
    optional.sort_by(|a, b| (a.1.age, a.0).cmp(&(b.1.age, b.0)));

    let mut selected = mandatory;
    let mut total: u64 = selected.iter().map(|(_, o)| o.amount.raw()).sum();
    for (id, output) in optional {
        if total >= needed {
            break;
        }
        total += output.amount.raw();
        selected.push((id, output));
    }

    if total < needed {
        return Err(WalletError::InsufficientFunds {
            needed,
            available: total,
        });
    }
    Ok(selected)
}

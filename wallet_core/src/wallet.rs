//! Wallet facade: keys, trust policy and transaction creation.

use slate_consensus::{rank_delegates, ScoreObserver, ScoreWeights};
use slate_ledger::ChainState;
use slate_transactions::{OutputId, Transaction, UnspentOutput};
use slate_types::{Address, DelegateId, KeyPair, Timestamp};

use crate::error::WalletError;
use crate::input_selector::select_inputs;
use crate::transaction_builder::build_payment;
use crate::trust_policy::TrustPolicy;
use crate::vote_selector::select_vote_target;

/// A single-key wallet with its local trust policy and score weights.
pub struct Wallet {
    keys: KeyPair,
    address: Address,
    policy: TrustPolicy,
    weights: ScoreWeights,
}

impl Wallet {
    pub fn new(keys: KeyPair) -> Self {
        let address = Address::from_public_key(&keys.public);
        Self {
            keys,
            address,
            policy: TrustPolicy::new(),
            weights: ScoreWeights::default(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn policy(&self) -> &TrustPolicy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut TrustPolicy {
        &mut self.policy
    }

    pub fn set_weights(&mut self, weights: ScoreWeights) {
        self.weights = weights;
    }

    /// Total spendable balance on the committed snapshot.
    pub fn balance(&self, chain: &ChainState) -> u64 {
        chain
            .utxos()
            .owned_by(&self.address)
            .map(|(_, o)| o.amount.raw())
            .sum()
    }

    /// Outputs whose votes are stuck on a delegate that is no longer
    /// eligible (resigned, expired or garbage-collected). They keep voting
    /// until spent; a UI should prompt the owner to re-spend them.
    pub fn stuck_outputs<'a>(
        &'a self,
        chain: &'a ChainState,
    ) -> impl Iterator<Item = (&'a OutputId, &'a UnspentOutput)> {
        chain.utxos().owned_by(&self.address).filter(|(_, o)| {
            o.vote.base().is_some_and(|num| {
                chain
                    .registry()
                    .get(num)
                    .map(|e| !e.is_eligible(chain.height()))
                    .unwrap_or(true)
            })
        })
    }

    /// Create a signed payment of `amount` plus `fee`, choosing inputs and
    /// the vote target per the wallet rules.
    pub fn create_payment(
        &self,
        chain: &ChainState,
        observer: &ScoreObserver,
        recipient: &Address,
        amount: u64,
        fee: u64,
        now: Timestamp,
    ) -> Result<Transaction, WalletError> {
        let inputs = select_inputs(chain, &self.address, &self.policy, amount + fee)?;
        let moved: u64 = inputs.iter().map(|(_, o)| o.amount.raw()).sum::<u64>() - fee;

        let observations: Vec<_> = observer.iter().collect();
        let scores = rank_delegates(&observations, &self.weights);
        let vote = select_vote_target(chain, &self.policy, &scores, moved)
            .unwrap_or(DelegateId::NONE);

        Ok(build_payment(
            inputs,
            recipient,
            amount,
            fee,
            &self.address,
            vote,
            &self.keys.private,
            now,
        ))
    }
}

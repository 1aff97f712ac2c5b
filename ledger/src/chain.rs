//! Committed chain state and atomic block application.
//!
//! Applying a block is all-or-nothing: validation computes the complete
//! effect (spends, creations, registry actions, fee pool) before any
//! mutation, so commit cannot fail and a rejected block leaves state
//! untouched. The vote cap is checked against the post-block projection.

use slate_transactions::{Block, Output, OutputId, UnspentOutput};
use slate_types::{BlockHash, DelegateNum, NetworkParams};
use std::collections::{HashMap, HashSet};

use crate::error::LedgerError;
use crate::ranking::RankingIndex;
use crate::registry::{ClaimAction, DelegateRegistry};
use crate::revenue::RevenueWindow;
use crate::tally::VoteTally;
use crate::utxo::UtxoSet;

/// Summary of a committed block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockReceipt {
    pub height: u64,
    /// Fees collected by this block, excluding the producer's claim.
    pub revenue: u64,
    pub claimed_fee: u64,
}

/// The fully validated effect of a block, ready to commit.
struct BlockPlan {
    spends: Vec<(OutputId, UnspentOutput)>,
    creates: Vec<(OutputId, UnspentOutput)>,
    claims: Vec<PlannedClaim>,
    revenue: u64,
    claimed_fee: u64,
    touched: HashSet<u32>,
}

struct PlannedClaim {
    action: ClaimAction,
    delegate_id: Option<DelegateNum>,
    name: String,
    data: Vec<u8>,
}

/// The committed ledger: unspent outputs, vote tally, delegate registry,
/// ranking index and revenue window, advanced one block at a time.
///
/// Cloning is the snapshot mechanism: the coordinator publishes an
/// `Arc<ChainState>` copy after each commit so readers are never blocked
/// by block application.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainState {
    params: NetworkParams,
    height: u64,
    tip: BlockHash,
    utxos: UtxoSet,
    tally: VoteTally,
    registry: DelegateRegistry,
    ranking: RankingIndex,
    revenue: RevenueWindow,
}

impl ChainState {
    /// An empty chain at height zero awaiting its genesis block.
    pub fn new(params: NetworkParams) -> Self {
        let revenue = RevenueWindow::new(params.revenue_window);
        Self {
            params,
            height: 0,
            tip: BlockHash::ZERO,
            utxos: UtxoSet::new(),
            tally: VoteTally::new(),
            registry: DelegateRegistry::new(),
            ranking: RankingIndex::new(),
            revenue,
        }
    }

    /// Rebuild state by replaying a block sequence from genesis.
    /// Two nodes replaying the same chain converge on identical state.
    pub fn replay(
        params: NetworkParams,
        blocks: impl IntoIterator<Item = Block>,
    ) -> Result<Self, LedgerError> {
        let mut chain = Self::new(params);
        for block in blocks {
            chain.apply_block(&block)?;
        }
        Ok(chain)
    }

    // ── Read API (used against the committed snapshot) ──────────────────

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn tip(&self) -> BlockHash {
        self.tip
    }

    pub fn total_supply(&self) -> u64 {
        self.tally.total_supply()
    }

    pub fn net_votes(&self, num: DelegateNum) -> i128 {
        self.tally.net(num)
    }

    pub fn rank_of(&self, num: DelegateNum) -> Option<usize> {
        self.ranking.rank_of(num)
    }

    pub fn top(&self, n: usize) -> Vec<DelegateNum> {
        self.ranking.top(n)
    }

    /// The delegate authorized to produce at `slot`, if the ranking has
    /// enough eligible entries.
    pub fn producer_for_slot(&self, slot: u64) -> Option<DelegateNum> {
        let round = self.params.round_size;
        let rank = (slot % round) as usize;
        self.ranking.top(round as usize).get(rank).copied()
    }

    pub fn mean_revenue(&self) -> u64 {
        self.revenue.mean()
    }

    pub fn utxo(&self, id: &OutputId) -> Option<&UnspentOutput> {
        self.utxos.get(id)
    }

    pub fn utxos(&self) -> &UtxoSet {
        &self.utxos
    }

    pub fn tally(&self) -> &VoteTally {
        &self.tally
    }

    pub fn registry(&self) -> &DelegateRegistry {
        &self.registry
    }

    pub fn ranking(&self) -> &RankingIndex {
        &self.ranking
    }

    /// Admission-time cap projection against the committed snapshot: would
    /// these per-delegate net deltas push any eligible delegate past the
    /// 2% concentration cap?
    pub fn would_exceed_cap(&self, deltas: &HashMap<u32, i128>) -> bool {
        let cap = self.params.vote_cap(self.tally.total_supply());
        deltas.iter().any(|(&id, &delta)| {
            let num = DelegateNum::new(id);
            let eligible = self
                .registry
                .get(num)
                .map(|e| e.is_eligible(self.height))
                .unwrap_or(false);
            eligible && self.tally.projected_net(num, delta) > cap
        })
    }

    // ── Block application ───────────────────────────────────────────────

    /// Validate and commit a block atomically. On any error the state is
    /// exactly as before the call.
    pub fn apply_block(&mut self, block: &Block) -> Result<BlockReceipt, LedgerError> {
        let plan = self.validate_block(block)?;
        Ok(self.commit(block, plan))
    }

    fn validate_block(&self, block: &Block) -> Result<BlockPlan, LedgerError> {
        block.validate_structure()?;

        if block.height != self.height + 1 {
            return Err(LedgerError::NonSequentialHeight {
                tip: self.height,
                got: block.height,
            });
        }
        if block.prev != self.tip {
            return Err(LedgerError::PrevHashMismatch);
        }

        let genesis = block.height == 1;
        let mut spent: HashSet<OutputId> = HashSet::new();
        let mut spends: Vec<(OutputId, UnspentOutput)> = Vec::new();
        let mut created: HashMap<OutputId, UnspentOutput> = HashMap::new();
        let mut created_order: Vec<OutputId> = Vec::new();
        let mut claims: Vec<PlannedClaim> = Vec::new();
        let mut deltas: HashMap<u32, i128> = HashMap::new();
        let mut pending_names: HashSet<String> = HashSet::new();
        let mut pending_ids: HashSet<u32> = HashSet::new();
        let mut resigned_plan: HashSet<u32> = HashSet::new();
        let mut renewed_plan: HashSet<u32> = HashSet::new();
        let mut registered_plan: HashSet<u32> = HashSet::new();
        let mut pool: u64 = 0;

        for tx in &block.transactions {
            // I4: the vote must reference a live (unresigned) delegate.
            if let Some(num) = tx.vote.base() {
                self.registry.check_vote_target(num)?;
            }

            let mut inputs_total: u64 = 0;
            for input in &tx.inputs {
                if !spent.insert(*input) {
                    return Err(LedgerError::DoubleSpend(input.to_string()));
                }
                let output = if let Some(o) = created.remove(input) {
                    created_order.retain(|id| id != input);
                    apply_vote_delta(&mut deltas, &o, -1);
                    o
                } else if let Some(o) = self.utxos.get(input) {
                    let o = o.clone();
                    apply_vote_delta(&mut deltas, &o, -1);
                    spends.push((*input, o.clone()));
                    o
                } else {
                    return Err(LedgerError::UnknownOutput(input.to_string()));
                };
                inputs_total += output.amount.raw();
            }

            let mut payments_total: u64 = 0;
            let mut required_claim_fee: u64 = 0;
            for (index, output) in tx.outputs.iter().enumerate() {
                match output {
                    Output::Payment { owner, amount } | Output::DelegateFee { owner, amount } => {
                        if !output.is_delegate_fee() {
                            payments_total += amount.raw();
                        }
                        let utxo = UnspentOutput {
                            owner: owner.clone(),
                            amount: *amount,
                            vote: tx.vote,
                            age: block.height,
                        };
                        apply_vote_delta(&mut deltas, &utxo, 1);
                        let id = OutputId::new(tx.hash, index as u32);
                        created.insert(id, utxo);
                        created_order.push(id);
                    }
                    Output::ClaimName {
                        delegate_id,
                        name,
                        data,
                    } => {
                        let action = self.registry.validate_claim(
                            *delegate_id,
                            name,
                            block.height,
                            &self.params,
                        )?;
                        // Claims inside one block must not collide.
                        if !pending_names.insert(name.clone()) {
                            return Err(LedgerError::NameTaken(name.clone()));
                        }
                        if let Some(num) = delegate_id {
                            if !pending_ids.insert(num.get()) {
                                return Err(LedgerError::IdTaken(num.get()));
                            }
                        }
                        required_claim_fee += self.claim_fee(action, *delegate_id);
                        match action {
                            ClaimAction::Register => {
                                if let Some(num) = delegate_id {
                                    registered_plan.insert(num.get());
                                }
                            }
                            ClaimAction::Renew => {
                                renewed_plan.insert(delegate_id.expect("renewal has id").get());
                            }
                            ClaimAction::Resign => {
                                if let Some(entry) = self.registry.get_by_name(name) {
                                    if let Some(num) = entry.id {
                                        resigned_plan.insert(num.get());
                                    }
                                }
                            }
                        }
                        claims.push(PlannedClaim {
                            action,
                            delegate_id: *delegate_id,
                            name: name.clone(),
                            data: data.clone(),
                        });
                    }
                }
            }

            if tx.inputs.is_empty() {
                // Issuance mints supply; only the genesis block may do it.
                if !genesis {
                    return Err(LedgerError::IssuanceOutsideGenesis {
                        tx: tx.hash.to_string(),
                    });
                }
            } else {
                let fee = inputs_total.checked_sub(payments_total).ok_or_else(|| {
                    LedgerError::OutputsExceedInputs {
                        tx: tx.hash.to_string(),
                    }
                })?;
                if fee < required_claim_fee {
                    return Err(LedgerError::InsufficientRegistrationFee {
                        required: required_claim_fee,
                        burned: fee,
                    });
                }
                pool += fee;
            }
        }

        let claimed_fee = block.claimed_fee();
        if claimed_fee > pool {
            return Err(LedgerError::FeeExceedsPool {
                claimed: claimed_fee,
                pool,
            });
        }

        // I2 against the post-block projection: the cap binds every delegate
        // that is eligible once this block commits.
        let spent_total: u64 = spends.iter().map(|(_, o)| o.amount.raw()).sum();
        let created_total: u64 = created.values().map(|o| o.amount.raw()).sum();
        let projected_supply = self.tally.total_supply() - spent_total + created_total;
        let cap = self.params.vote_cap(projected_supply);

        let mut candidates: HashSet<u32> = deltas.keys().copied().collect();
        candidates.extend(self.tally.iter().map(|(num, _)| num.get()));
        for id in candidates {
            let num = DelegateNum::new(id);
            let eligible = if resigned_plan.contains(&id) {
                false
            } else if registered_plan.contains(&id) || renewed_plan.contains(&id) {
                true
            } else {
                self.registry
                    .get(num)
                    .map(|e| e.is_eligible(block.height))
                    .unwrap_or(false)
            };
            if !eligible {
                continue;
            }
            let delta = deltas.get(&id).copied().unwrap_or(0);
            let projected = self.tally.projected_net(num, delta);
            if projected > cap {
                return Err(LedgerError::VoteCapExceeded {
                    delegate: id,
                    projected,
                    cap,
                });
            }
        }

        let mut touched: HashSet<u32> = deltas.keys().copied().collect();
        touched.extend(&registered_plan);
        touched.extend(&renewed_plan);
        touched.extend(&resigned_plan);

        let creates = created_order
            .into_iter()
            .map(|id| {
                let utxo = created.remove(&id).expect("ordered create exists");
                (id, utxo)
            })
            .collect();

        Ok(BlockPlan {
            spends,
            creates,
            claims,
            revenue: pool,
            claimed_fee,
            touched,
        })
    }

    /// The fee a claim must burn, priced from the rolling revenue mean.
    fn claim_fee(&self, action: ClaimAction, delegate_id: Option<DelegateNum>) -> u64 {
        let full = self.params.registration_fee(self.revenue.mean());
        match action {
            ClaimAction::Register => full,
            ClaimAction::Renew => {
                let producer_set = self.params.round_size as usize;
                let in_top = delegate_id
                    .and_then(|num| self.ranking.rank_of(num))
                    .map(|rank| rank < producer_set)
                    .unwrap_or(false);
                if in_top {
                    0
                } else {
                    full
                }
            }
            ClaimAction::Resign => 0,
        }
    }

    fn commit(&mut self, block: &Block, plan: BlockPlan) -> BlockReceipt {
        for (id, output) in &plan.spends {
            self.utxos.remove(id);
            self.tally.apply_spend(output);
        }
        for (id, output) in plan.creates {
            self.tally.apply_create(&output);
            self.utxos.insert(id, output);
        }
        for claim in plan.claims {
            self.registry.apply_claim(
                claim.action,
                claim.delegate_id,
                &claim.name,
                claim.data,
                block.height,
                &self.params,
            );
        }
        for num in self.registry.drain_expired(block.height) {
            self.ranking.remove(num);
        }
        for id in plan.touched {
            let num = DelegateNum::new(id);
            match self.registry.get(num) {
                Some(entry) if entry.is_eligible(block.height) => {
                    let name = entry.name.clone();
                    self.ranking.upsert(num, self.tally.net(num), &name);
                }
                _ => self.ranking.remove(num),
            }
        }
        self.revenue.record(plan.revenue);
        self.height = block.height;
        self.tip = block.hash;
        self.registry.collect_garbage(|num| self.tally.refs(num));

        tracing::debug!(
            height = block.height,
            revenue = plan.revenue,
            claimed_fee = plan.claimed_fee,
            "block committed"
        );

        BlockReceipt {
            height: block.height,
            revenue: plan.revenue,
            claimed_fee: plan.claimed_fee,
        }
    }

    /// Exhaustive structural check of the committed invariants. Intended
    /// for tests and debug assertions, not the hot path.
    pub fn verify_invariants(&self) -> Result<(), String> {
        // Supply conservation: every unspent output counted exactly once.
        let mut recount = VoteTally::new();
        for (_, output) in self.utxos.iter() {
            recount.apply_create(output);
        }
        if recount != self.tally {
            return Err("tally diverges from a recount of the unspent set".into());
        }

        // Concentration cap over eligible delegates.
        let cap = self.params.vote_cap(self.tally.total_supply());
        for (num, bucket) in self.tally.iter() {
            let eligible = self
                .registry
                .get(num)
                .map(|e| e.is_eligible(self.height))
                .unwrap_or(false);
            if eligible && bucket.net() > cap {
                return Err(format!("delegate {} net {} above cap {cap}", num, bucket.net()));
            }
        }

        // Ranking matches a fresh sort over eligible delegates.
        let mut fresh = RankingIndex::new();
        for entry in self.registry.iter() {
            if let Some(num) = entry.id {
                if entry.is_eligible(self.height) {
                    fresh.upsert(num, self.tally.net(num), &entry.name);
                }
            }
        }
        if fresh != self.ranking {
            return Err("ranking index diverges from a fresh sort".into());
        }
        Ok(())
    }
}

fn apply_vote_delta(deltas: &mut HashMap<u32, i128>, output: &UnspentOutput, direction: i128) {
    let (Some(num), Some(_)) = (output.vote.base(), output.vote.polarity()) else {
        return;
    };
    let signed = output.vote.raw().signum() as i128 * output.amount.raw() as i128;
    *deltas.entry(num.get()).or_insert(0) += signed * direction;
}

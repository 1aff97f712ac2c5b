//! Delegate registry: registration, renewal, resignation, expiry.
//!
//! Registration is driven by `ClaimName` outputs. A name is a globally
//! unique handle; a non-zero delegate id makes the name vote-eligible.
//! Name control (who may renew or resign a name) is enforced by the
//! transaction signature layer upstream of this registry.

use serde::{Deserialize, Serialize};
use slate_types::{DelegateNum, NetworkParams};
use std::collections::{BTreeMap, HashMap};

use crate::error::LedgerError;

/// One registered name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// `None` models the reserved zero id: the name is registered but
    /// ineligible for votes.
    pub id: Option<DelegateNum>,
    pub name: String,
    pub data: Vec<u8>,
    pub registered_at: u64,
    pub expires_at: u64,
    pub resigned: bool,
}

impl RegistryEntry {
    pub fn is_expired(&self, height: u64) -> bool {
        height >= self.expires_at
    }

    /// Eligible for ranking and block production.
    pub fn is_eligible(&self, height: u64) -> bool {
        self.id.is_some() && !self.resigned && !self.is_expired(height)
    }

    /// Whether the renewal window (the final grace period before expiry)
    /// is open at `height`. Stays open after expiry for late renewal.
    pub fn renewal_open(&self, height: u64, params: &NetworkParams) -> bool {
        height >= self.expires_at.saturating_sub(params.renewal_grace_blocks)
    }
}

/// What a validated claim will do when committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimAction {
    /// Fresh name; pays the full registration fee.
    Register,
    /// Same id re-claiming its name inside the renewal window; free for
    /// delegates currently ranked in the producer set, full price otherwise.
    Renew,
    /// Zero id on an owned name; no fee.
    Resign,
}

/// All registered delegate names, with unique-id and expiry indexes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DelegateRegistry {
    by_name: HashMap<String, RegistryEntry>,
    id_index: HashMap<u32, String>,
    /// expires_at → names. Entries go stale after renewal and are
    /// re-validated against the live entry when drained.
    expiry_index: BTreeMap<u64, Vec<String>>,
}

impl DelegateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&RegistryEntry> {
        self.by_name.get(name)
    }

    pub fn get(&self, num: DelegateNum) -> Option<&RegistryEntry> {
        self.id_index
            .get(&num.get())
            .and_then(|name| self.by_name.get(name))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.by_name.values()
    }

    /// Check a transaction's vote target: the base id must exist and must
    /// not be resigned at inclusion time. Expired-but-unresigned delegates
    /// may still receive votes; renewal brings them back to ranking.
    pub fn check_vote_target(&self, num: DelegateNum) -> Result<(), LedgerError> {
        match self.get(num) {
            None => Err(LedgerError::UnknownDelegate(num.get())),
            Some(entry) if entry.resigned => Err(LedgerError::ResignedDelegate(num.get())),
            Some(_) => Ok(()),
        }
    }

    /// Classify a claim against the current registry. No mutation.
    pub fn validate_claim(
        &self,
        delegate_id: Option<DelegateNum>,
        name: &str,
        height: u64,
        params: &NetworkParams,
    ) -> Result<ClaimAction, LedgerError> {
        match self.by_name.get(name) {
            None => {
                if let Some(num) = delegate_id {
                    if self.id_index.contains_key(&num.get()) {
                        return Err(LedgerError::IdTaken(num.get()));
                    }
                }
                Ok(ClaimAction::Register)
            }
            Some(entry) => {
                if entry.resigned {
                    return Err(LedgerError::NameTaken(name.to_string()));
                }
                match delegate_id {
                    None => Ok(ClaimAction::Resign),
                    Some(num) if entry.id == Some(num) => {
                        if !entry.renewal_open(height, params) {
                            return Err(LedgerError::RenewalOutsideWindow {
                                name: name.to_string(),
                            });
                        }
                        Ok(ClaimAction::Renew)
                    }
                    Some(_) => Err(LedgerError::ClaimIdMismatch {
                        name: name.to_string(),
                    }),
                }
            }
        }
    }

    /// Commit a claim previously validated with [`Self::validate_claim`].
    pub fn apply_claim(
        &mut self,
        action: ClaimAction,
        delegate_id: Option<DelegateNum>,
        name: &str,
        data: Vec<u8>,
        height: u64,
        params: &NetworkParams,
    ) {
        match action {
            ClaimAction::Register => {
                let expires_at = height + params.renewal_period_blocks;
                let entry = RegistryEntry {
                    id: delegate_id,
                    name: name.to_string(),
                    data,
                    registered_at: height,
                    expires_at,
                    resigned: false,
                };
                if let Some(num) = delegate_id {
                    self.id_index.insert(num.get(), name.to_string());
                }
                self.expiry_index
                    .entry(expires_at)
                    .or_default()
                    .push(name.to_string());
                self.by_name.insert(name.to_string(), entry);
            }
            ClaimAction::Renew => {
                let entry = self.by_name.get_mut(name).expect("validated renewal");
                entry.expires_at = if height < entry.expires_at {
                    entry.expires_at + params.renewal_period_blocks
                } else {
                    height + params.renewal_period_blocks
                };
                entry.data = data;
                self.expiry_index
                    .entry(entry.expires_at)
                    .or_default()
                    .push(name.to_string());
            }
            ClaimAction::Resign => {
                let entry = self.by_name.get_mut(name).expect("validated resignation");
                entry.resigned = true;
            }
        }
    }

    /// Delegates whose registration lapses at or before `height`.
    /// Each is reported once; renewed entries are skipped via the live
    /// `expires_at` check.
    pub fn drain_expired(&mut self, height: u64) -> Vec<DelegateNum> {
        let mut due: Vec<u64> = self
            .expiry_index
            .range(..=height)
            .map(|(&h, _)| h)
            .collect();
        let mut expired = Vec::new();
        for h in due.drain(..) {
            for name in self.expiry_index.remove(&h).unwrap_or_default() {
                let Some(entry) = self.by_name.get(&name) else {
                    continue;
                };
                if entry.resigned || !entry.is_expired(height) {
                    continue;
                }
                if let Some(num) = entry.id {
                    expired.push(num);
                }
            }
        }
        expired
    }

    /// Destroy entries that are resigned and no longer referenced by any
    /// unspent output. `refs` reports the live reference count per id.
    pub fn collect_garbage(&mut self, refs: impl Fn(DelegateNum) -> u64) {
        let doomed: Vec<String> = self
            .by_name
            .values()
            .filter(|e| e.resigned && e.id.map(&refs).unwrap_or(0) == 0)
            .map(|e| e.name.clone())
            .collect();
        for name in doomed {
            if let Some(entry) = self.by_name.remove(&name) {
                if let Some(num) = entry.id {
                    self.id_index.remove(&num.get());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> NetworkParams {
        NetworkParams::default()
    }

    fn d(n: u32) -> DelegateNum {
        DelegateNum::new(n)
    }

    fn register(reg: &mut DelegateRegistry, num: u32, name: &str, height: u64) {
        let action = reg
            .validate_claim(Some(d(num)), name, height, &params())
            .unwrap();
        assert_eq!(action, ClaimAction::Register);
        reg.apply_claim(action, Some(d(num)), name, vec![], height, &params());
    }

    #[test]
    fn register_and_lookup() {
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 10);

        let entry = reg.get(d(1)).unwrap();
        assert_eq!(entry.name, "alice");
        assert_eq!(entry.registered_at, 10);
        assert!(entry.is_eligible(11));
        assert_eq!(reg.get_by_name("alice").unwrap().id, Some(d(1)));
    }

    #[test]
    fn duplicate_name_and_id_rejected() {
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 10);

        assert_eq!(
            reg.validate_claim(Some(d(2)), "alice", 11, &params()),
            Err(LedgerError::ClaimIdMismatch {
                name: "alice".into()
            })
        );
        assert_eq!(
            reg.validate_claim(Some(d(1)), "bob", 11, &params()),
            Err(LedgerError::IdTaken(1))
        );
    }

    #[test]
    fn zero_id_name_is_registered_but_ineligible() {
        let mut reg = DelegateRegistry::new();
        let action = reg.validate_claim(None, "parked", 5, &params()).unwrap();
        reg.apply_claim(action, None, "parked", vec![], 5, &params());

        let entry = reg.get_by_name("parked").unwrap();
        assert_eq!(entry.id, None);
        assert!(!entry.is_eligible(6));
    }

    #[test]
    fn vote_target_checks() {
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 10);

        assert!(reg.check_vote_target(d(1)).is_ok());
        assert_eq!(
            reg.check_vote_target(d(2)),
            Err(LedgerError::UnknownDelegate(2))
        );

        let action = reg.validate_claim(None, "alice", 20, &params()).unwrap();
        assert_eq!(action, ClaimAction::Resign);
        reg.apply_claim(action, None, "alice", vec![], 20, &params());
        assert_eq!(
            reg.check_vote_target(d(1)),
            Err(LedgerError::ResignedDelegate(1))
        );
    }

    #[test]
    fn renewal_window_gate() {
        let p = params();
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 0);
        let expires = p.renewal_period_blocks;

        // Far too early.
        assert_eq!(
            reg.validate_claim(Some(d(1)), "alice", expires / 2, &p),
            Err(LedgerError::RenewalOutsideWindow {
                name: "alice".into()
            })
        );

        // Inside the final grace period.
        let in_window = expires - p.renewal_grace_blocks + 1;
        assert_eq!(
            reg.validate_claim(Some(d(1)), "alice", in_window, &p),
            Ok(ClaimAction::Renew)
        );
    }

    #[test]
    fn renewal_before_expiry_extends_the_anniversary() {
        let p = params();
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 0);
        let expires = p.renewal_period_blocks;
        let in_window = expires - p.renewal_grace_blocks + 1;

        reg.apply_claim(ClaimAction::Renew, Some(d(1)), "alice", vec![], in_window, &p);
        assert_eq!(
            reg.get(d(1)).unwrap().expires_at,
            expires + p.renewal_period_blocks
        );
    }

    #[test]
    fn late_renewal_restarts_from_now() {
        let p = params();
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 0);
        let late = p.renewal_period_blocks + 500;

        assert_eq!(
            reg.validate_claim(Some(d(1)), "alice", late, &p),
            Ok(ClaimAction::Renew)
        );
        reg.apply_claim(ClaimAction::Renew, Some(d(1)), "alice", vec![], late, &p);
        assert_eq!(
            reg.get(d(1)).unwrap().expires_at,
            late + p.renewal_period_blocks
        );
    }

    #[test]
    fn drain_expired_skips_renewed_entries() {
        let p = params();
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 0);
        register(&mut reg, 2, "bob", 0);
        let expires = p.renewal_period_blocks;

        // Alice renews inside the window; Bob does not.
        let in_window = expires - p.renewal_grace_blocks + 1;
        reg.apply_claim(ClaimAction::Renew, Some(d(1)), "alice", vec![], in_window, &p);

        let expired = reg.drain_expired(expires);
        assert_eq!(expired, vec![d(2)]);
        assert!(reg.get(d(1)).unwrap().is_eligible(expires));
    }

    #[test]
    fn garbage_collection_requires_resigned_and_unreferenced() {
        let p = params();
        let mut reg = DelegateRegistry::new();
        register(&mut reg, 1, "alice", 0);
        reg.apply_claim(ClaimAction::Resign, None, "alice", vec![], 10, &p);

        // Still referenced by outputs: survives.
        reg.collect_garbage(|_| 3);
        assert!(reg.get_by_name("alice").is_some());

        // Unreferenced: destroyed, id and name free again.
        reg.collect_garbage(|_| 0);
        assert!(reg.get_by_name("alice").is_none());
        assert_eq!(
            reg.validate_claim(Some(d(1)), "alice", 20, &p),
            Ok(ClaimAction::Register)
        );
    }
}

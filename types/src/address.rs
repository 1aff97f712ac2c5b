//! Account address type with `slt_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Slate account address, always prefixed with `slt_`.
///
/// Derived from the account's public key via SHA-256 + hex encoding.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all Slate addresses.
    pub const PREFIX: &'static str = "slt_";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `slt_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with slt_");
        Self(s)
    }

    /// Derive an address from a public key.
    pub fn from_public_key(public_key: &crate::keys::PublicKey) -> Self {
        let digest = crate::crypto::sha256(public_key.as_bytes());
        let mut s = String::with_capacity(Self::PREFIX.len() + 40);
        s.push_str(Self::PREFIX);
        for b in &digest[..20] {
            s.push_str(&format!("{b:02x}"));
        }
        Self(s)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX)
            && self.0.len() > Self::PREFIX.len()
            && self.0[Self::PREFIX.len()..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

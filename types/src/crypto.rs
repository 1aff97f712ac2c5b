//! Digests and Ed25519 signing for producers and transactions.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::keys::{KeyPair, PrivateKey, PublicKey, Signature};

/// SHA-256 digest of a byte slice.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 over several concatenated segments, without an intermediate copy.
pub fn sha256_multi(segments: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seg in segments {
        hasher.update(seg);
    }
    hasher.finalize().into()
}

/// Generate a fresh random key pair.
pub fn generate_keypair() -> KeyPair {
    let signing = SigningKey::generate(&mut OsRng);
    keypair_from_signing(signing)
}

/// Deterministic key pair from a 32-byte seed (tests, genesis).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    keypair_from_signing(SigningKey::from_bytes(seed))
}

fn keypair_from_signing(signing: SigningKey) -> KeyPair {
    let public = PublicKey(signing.verifying_key().to_bytes());
    let private = PrivateKey(signing.to_bytes());
    KeyPair { public, private }
}

/// Sign a message digest with a private key.
pub fn sign(private: &PrivateKey, message: &[u8]) -> Signature {
    let signing = SigningKey::from_bytes(&private.0);
    Signature(signing.sign(message).to_bytes())
}

/// Verify a signature against a public key. Malformed keys verify as false.
pub fn verify(public: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    let Ok(verifying) = VerifyingKey::from_bytes(&public.0) else {
        return false;
    };
    let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
    verifying.verify(message, &sig).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let kp = keypair_from_seed(&[0x11; 32]);
        let sig = sign(&kp.private, b"block digest");
        assert!(verify(&kp.public, b"block digest", &sig));
        assert!(!verify(&kp.public, b"other digest", &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let kp = keypair_from_seed(&[0x22; 32]);
        let other = keypair_from_seed(&[0x33; 32]);
        let sig = sign(&kp.private, b"msg");
        assert!(!verify(&other.public, b"msg", &sig));
    }

    #[test]
    fn seed_is_deterministic() {
        let a = keypair_from_seed(&[0x44; 32]);
        let b = keypair_from_seed(&[0x44; 32]);
        assert_eq!(a.public, b.public);
    }

    #[test]
    fn sha256_multi_matches_concat() {
        let joined = sha256(b"hello world");
        let multi = sha256_multi(&[b"hello", b" ", b"world"]);
        assert_eq!(joined, multi);
    }
}

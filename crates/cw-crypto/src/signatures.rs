//! Ed25519 signing and verification.
//!
//! Verification uses the standard RFC 8032 Ed25519 check, which accepts
//! signatures produced by both a native Rust signer and a browser-side
//! libsodium/TweetNaCl-compatible signer: both profiles produce the same
//! canonical signature bytes for a given key and message, so a single
//! standards-conformant verifier covers both.

use crate::errors::CryptoError;
use cw_types::{PubKey32, Sig64};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroize;

/// Verify `signature` over `message` under `public_key`.
pub fn verify(public_key: &PubKey32, message: &[u8], signature: &Sig64) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key.as_bytes()).map_err(|_| CryptoError::InvalidPublicKey)?;
    let sig = Signature::from_bytes(signature.as_bytes());
    verifying_key
        .verify(message, &sig)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

/// An Ed25519 keypair used to sign outgoing messages (not needed by the
/// node's request path, but kept for tests and any tooling that needs to
/// mint well-formed signed events).
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> PubKey32 {
        PubKey32(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign is deterministic (RFC 8032): no RNG dependency, same message
    /// always yields the same signature under the same key.
    pub fn sign(&self, message: &[u8]) -> Sig64 {
        Sig64(self.signing_key.sign(message).to_bytes())
    }
}

impl Drop for Ed25519KeyPair {
    fn drop(&mut self) {
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

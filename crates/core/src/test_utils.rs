//! Utilities for testing DigiID flows.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use k256::ecdsa::signature::{DigestSigner, DigestVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::challenge::ChallengeUri;
use crate::errors::{Error, VerifierError};
use crate::payloads::CallbackPayload;
use crate::traits::SignatureVerifier;

const MESSAGE_PREFIX: &[u8] = b"\x19DigiByte Signed Message:\n";

/// A deterministic "random" number generator that always returns the same byte.
///
/// NOTE: Only for testing, it's obviously not cryptographically secure.
#[derive(Debug, Clone)]
pub struct FixedRng(u8);

impl FixedRng {
    /// Initializes a generator that fills every byte with `byte`.
    pub fn new(byte: u8) -> Self {
        Self(byte)
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        u32::from_ne_bytes([self.0; 4])
    }

    fn next_u64(&mut self) -> u64 {
        u64::from_ne_bytes([self.0; 8])
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for FixedRng {}

/// A mock ECDSA/Secp256k1/SHA-256 wallet.
///
/// Its address is the hex encoded SEC1 compressed verifying key.
#[derive(Clone)]
pub struct MockWallet {
    secret: SigningKey,
}

impl MockWallet {
    /// Generates a wallet with a random signing key.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            secret: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Returns the address of the wallet.
    pub fn address(&self) -> String {
        hex::encode(
            self.secret
                .verifying_key()
                .to_encoded_point(true)
                .as_bytes(),
        )
    }

    /// Returns the (base64 encoded) signature of a message.
    pub fn sign(&self, message: &str) -> String {
        let signature: Signature = self.secret.sign_digest(message_digest(message));
        STANDARD.encode(signature.to_bytes())
    }

    /// Returns the callback payload for a challenge URI.
    pub fn respond(&self, challenge: &ChallengeUri) -> CallbackPayload {
        CallbackPayload::new(
            self.address(),
            challenge.as_str(),
            self.sign(challenge.as_str()),
        )
    }
}

/// A signature verifier for [`MockWallet`] signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSignatureVerifier;

#[async_trait]
impl SignatureVerifier for MockSignatureVerifier {
    async fn verify_signature(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, VerifierError> {
        let invalid_address = |reason: String| Error::InvalidInput {
            input: address.to_owned(),
            reason,
        };
        let key_bytes = hex::decode(address).map_err(|error| invalid_address(error.to_string()))?;
        let verifying_key = VerifyingKey::from_sec1_bytes(&key_bytes)
            .map_err(|error| invalid_address(error.to_string()))?;

        let sig_bytes = STANDARD.decode(signature).map_err(VerifierError::other)?;
        let signature = Signature::from_slice(&sig_bytes).map_err(VerifierError::other)?;

        Ok(verifying_key
            .verify_digest(message_digest(message), &signature)
            .is_ok())
    }
}

/// Returns the digest of a prefixed message.
fn message_digest(message: &str) -> Sha256 {
    Sha256::new_with_prefix(MESSAGE_PREFIX).chain_update(message.as_bytes())
}

//! Traits for DigiID capabilities.

use async_trait::async_trait;

use crate::errors::VerifierError;

/// Interface for verifying wallet message signatures (e.g. DigiByte signed messages for legacy,
/// script-wrapped segwit and native segwit addresses).
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    /// Returns `Ok(true)` if the signature is a valid signature of the message by the address,
    /// `Ok(false)` for a well-formed signature that doesn't match,
    /// or an `Err` for a malformed address or signature (or any other failure).
    async fn verify_signature(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, VerifierError>;
}

#[async_trait]
impl<F> SignatureVerifier for F
where
    F: Fn(&str, &str, &str) -> Result<bool, VerifierError> + Send + Sync,
{
    async fn verify_signature(
        &self,
        message: &str,
        address: &str,
        signature: &str,
    ) -> Result<bool, VerifierError> {
        self(message, address, signature)
    }
}

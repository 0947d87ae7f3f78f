//! Types for DigiID payloads.

use serde::{Deserialize, Serialize};

/// A callback payload (i.e. the response a wallet sends to the callback URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackPayload {
    /// The address of the signing key.
    pub address: String,
    /// The signed challenge URI.
    pub uri: String,
    /// The (base64 encoded) signature of the challenge URI.
    pub signature: String,
}

impl CallbackPayload {
    /// Initializes a callback payload.
    pub fn new(
        address: impl Into<String>,
        uri: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            uri: uri.into(),
            signature: signature.into(),
        }
    }
}

/// The result of a successful callback verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Always `true`, failed verifications return an error instead.
    pub is_valid: bool,
    /// The authenticated address.
    pub address: String,
    /// The nonce from the signed challenge URI.
    pub nonce: String,
}

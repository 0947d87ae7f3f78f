//! Callback verification.
//!
//! NOTE: Nonces are only checked against [`VerificationOptions::expected_nonce`] (if any),
//! tracking issued and used nonces (i.e. replay protection) is the caller's responsibility.

use url::Url;

use crate::challenge::{self, ChallengeUri, Transport};
use crate::errors::Error;
use crate::payloads::{CallbackPayload, VerificationResult};
use crate::traits::SignatureVerifier;

/// An expected callback URL, either pre-parsed or as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackUrl {
    /// A parsed callback URL.
    Parsed(Url),
    /// A callback URL string, parsed during verification.
    Raw(String),
}

impl CallbackUrl {
    /// Returns the parsed callback URL.
    fn to_url(&self) -> Result<Url, Error> {
        match self {
            CallbackUrl::Parsed(url) => Ok(url.clone()),
            CallbackUrl::Raw(input) => {
                Url::parse(input).map_err(|error| Error::invalid_url(input, error))
            }
        }
    }
}

impl From<Url> for CallbackUrl {
    fn from(url: Url) -> Self {
        CallbackUrl::Parsed(url)
    }
}

impl From<&str> for CallbackUrl {
    fn from(input: &str) -> Self {
        CallbackUrl::Raw(input.to_owned())
    }
}

impl From<String> for CallbackUrl {
    fn from(input: String) -> Self {
        CallbackUrl::Raw(input)
    }
}

/// Options for verifying a callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOptions {
    /// The callback URL used to generate the challenge URI.
    pub expected_callback_url: CallbackUrl,
    /// The nonce used to generate the challenge URI.
    ///
    /// NOTE: Without it, the caller must check the nonce in the result to guard against replay attacks.
    pub expected_nonce: Option<String>,
}

impl VerificationOptions {
    /// Returns options for an expected callback URL (without a nonce check).
    pub fn new(expected_callback_url: impl Into<CallbackUrl>) -> Self {
        Self {
            expected_callback_url: expected_callback_url.into(),
            expected_nonce: None,
        }
    }

    /// Sets the expected nonce.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.expected_nonce = Some(nonce.into());
        self
    }
}

/// Given a callback payload, verification options and a signature verifier,
/// returns an `Ok` result with the authenticated address and nonce for a valid callback,
/// or an appropriate `Err` result otherwise.
#[tracing::instrument(level = "debug", skip_all, fields(address = %payload.address))]
pub async fn verify<V>(
    payload: &CallbackPayload,
    options: &VerificationOptions,
    verifier: &V,
) -> Result<VerificationResult, Error>
where
    V: SignatureVerifier + ?Sized,
{
    let result = verify_callback(payload, options, verifier).await;
    match &result {
        Ok(_) => tracing::debug!("DigiID callback verified"),
        Err(error) => tracing::debug!(kind = %error.kind(), "DigiID callback rejected"),
    }
    result
}

async fn verify_callback<V>(
    payload: &CallbackPayload,
    options: &VerificationOptions,
    verifier: &V,
) -> Result<VerificationResult, Error>
where
    V: SignatureVerifier + ?Sized,
{
    // Checks required fields.
    for (name, value) in [
        ("address", &payload.address),
        ("uri", &payload.uri),
        ("signature", &payload.signature),
    ] {
        if value.is_empty() {
            return Err(Error::MissingInput(name));
        }
    }

    // Parses the signed challenge and the expected callback URL.
    let challenge = ChallengeUri::parse(&payload.uri)?;
    let expected_url = options.expected_callback_url.to_url()?;
    let expected_authority_and_path = challenge::authority_and_path(&expected_url);

    // Callback URLs should match.
    if challenge.authority_and_path() != expected_authority_and_path {
        return Err(Error::EndpointMismatch {
            expected: expected_authority_and_path,
            received: challenge.authority_and_path().to_owned(),
        });
    }

    // Transport flag should match the expected scheme.
    match challenge.transport() {
        Some(Transport::Insecure) if expected_url.scheme() != Transport::Insecure.scheme() => {
            return Err(Error::SchemeMismatch(format!(
                "challenge allows `http` but the callback URL uses `{}`",
                expected_url.scheme()
            )));
        }
        Some(Transport::Secure) if expected_url.scheme() != Transport::Secure.scheme() => {
            return Err(Error::SchemeMismatch(format!(
                "challenge requires `https` but the callback URL uses `{}`",
                expected_url.scheme()
            )));
        }
        None => {
            return Err(Error::SchemeMismatch(format!(
                "unknown transport flag `{}`",
                challenge.transport_flag()
            )));
        }
        Some(_) => (),
    }

    // Nonces should match (if an expected nonce is provided).
    if let Some(expected_nonce) = &options.expected_nonce {
        if challenge.nonce() != expected_nonce {
            return Err(Error::NonceMismatch {
                expected: expected_nonce.clone(),
                received: challenge.nonce().to_owned(),
            });
        }
    }

    // Verifies signature.
    if !verifier
        .verify_signature(&payload.uri, &payload.address, &payload.signature)
        .await?
    {
        return Err(Error::InvalidSignature);
    }

    Ok(VerificationResult {
        is_valid: true,
        address: payload.address.clone(),
        nonce: challenge.nonce().to_owned(),
    })
}

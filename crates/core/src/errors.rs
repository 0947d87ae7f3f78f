//! Types and abstractions for DigiID errors.

use std::fmt;

use thiserror::Error;

/// A DigiID error.
///
/// Every failure of challenge generation or callback verification is reported as one of these variants,
/// with the offending value(s) interpolated into its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required input was absent or empty.
    #[error("missing required input: `{0}`")]
    MissingInput(&'static str),
    /// A URL-like value couldn't be parsed.
    #[error("invalid URL `{input}`: {reason}")]
    InvalidInput { input: String, reason: String },
    /// The callback URL scheme doesn't agree with the transport flag.
    #[error("scheme mismatch: {0}")]
    SchemeMismatch(String),
    /// The challenge URI is missing a required parameter.
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),
    /// The challenge URI was issued for a different callback URL.
    #[error("callback URL mismatch: expected `{expected}`, received `{received}`")]
    EndpointMismatch { expected: String, received: String },
    /// The challenge nonce is not the one that was issued.
    #[error("nonce mismatch: expected `{expected}`, received `{received}`")]
    NonceMismatch { expected: String, received: String },
    /// The signature doesn't match the challenge URI and address.
    #[error("invalid signature")]
    InvalidSignature,
    /// The signature verifier failed unexpectedly.
    #[error("signature verification failed: {0}")]
    VerificationFailure(String),
}

impl Error {
    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingInput(_) => ErrorKind::MissingInput,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::SchemeMismatch(_) => ErrorKind::SchemeMismatch,
            Error::MalformedChallenge(_) => ErrorKind::MalformedChallenge,
            Error::EndpointMismatch { .. } => ErrorKind::EndpointMismatch,
            Error::NonceMismatch { .. } => ErrorKind::NonceMismatch,
            Error::InvalidSignature => ErrorKind::InvalidSignature,
            Error::VerificationFailure(_) => ErrorKind::VerificationFailure,
        }
    }

    /// Returns an invalid input error for a URL parse failure.
    pub(crate) fn invalid_url(input: &str, error: url::ParseError) -> Self {
        Error::InvalidInput {
            input: input.to_owned(),
            reason: error.to_string(),
        }
    }
}

/// The kind of a DigiID error (i.e. the error taxonomy without context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingInput,
    InvalidInput,
    SchemeMismatch,
    MalformedChallenge,
    EndpointMismatch,
    NonceMismatch,
    InvalidSignature,
    VerificationFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::MissingInput => "missing-input",
            ErrorKind::InvalidInput => "invalid-input",
            ErrorKind::SchemeMismatch => "scheme-mismatch",
            ErrorKind::MalformedChallenge => "malformed-challenge",
            ErrorKind::EndpointMismatch => "endpoint-mismatch",
            ErrorKind::NonceMismatch => "nonce-mismatch",
            ErrorKind::InvalidSignature => "invalid-signature",
            ErrorKind::VerificationFailure => "verification-failure",
        };
        f.write_str(name)
    }
}

/// An error raised by a [`SignatureVerifier`](crate::SignatureVerifier).
#[derive(Debug, Error)]
pub enum VerifierError {
    /// A DigiID error, returned to the caller of [`verify`](crate::verify) unchanged.
    #[error(transparent)]
    Digiid(#[from] Error),
    /// Any other failure, reported to the caller as [`Error::VerificationFailure`].
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl VerifierError {
    /// Wraps an arbitrary error (or message) as an unexpected verifier failure.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        VerifierError::Other(error.into())
    }
}

impl From<VerifierError> for Error {
    fn from(error: VerifierError) -> Self {
        match error {
            VerifierError::Digiid(error) => error,
            VerifierError::Other(error) => Error::VerificationFailure(error.to_string()),
        }
    }
}

//! A Rust implementation of the core [DigiID protocol](https://www.digiid.io/) for passwordless authentication,
//! where a wallet proves ownership of an address by signing a challenge URI issued by a relying party.
//!
//! ```text
//! relying party                          wallet
//!  build(options)  ── digiid://… ──────▶  sign(uri)
//!  verify(payload) ◀── {address, uri, signature}
//! ```
//!
//! Signature verification for the wallet's address type is delegated to a [`SignatureVerifier`].
//! Nonce storage (i.e. replay protection across requests) is left to the caller.

pub use self::{
    challenge::{ChallengeUri, Transport},
    errors::{Error, ErrorKind, VerifierError},
    generation::{build, build_with_rng, GenerationOptions},
    payloads::{CallbackPayload, VerificationResult},
    traits::SignatureVerifier,
    verification::{verify, CallbackUrl, VerificationOptions},
};

pub mod challenge;
pub mod crypto;
mod errors;
pub mod generation;
mod payloads;
#[cfg(any(test, feature = "dev"))]
pub mod test_utils;
mod traits;
pub mod verification;

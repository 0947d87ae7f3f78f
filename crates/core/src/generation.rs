//! Challenge URI generation.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::challenge::{self, ChallengeUri, Transport};
use crate::crypto;
use crate::errors::Error;

/// Options for generating a challenge URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// The callback URL the wallet should send its response to.
    pub callback_url: String,
    /// The nonce, a fresh random nonce is generated if `None`.
    ///
    /// NOTE: It's used verbatim, so it must be safe for inclusion in a URI query.
    pub nonce: Option<String>,
    /// Allows a plaintext (i.e. `http`) callback URL.
    pub allow_insecure: bool,
}

impl GenerationOptions {
    /// Returns options for a callback URL with a random nonce and secure transport.
    pub fn new(callback_url: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            ..Self::default()
        }
    }

    /// Sets an explicit nonce.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Allows a plaintext (i.e. `http`) callback URL.
    pub fn allow_insecure(mut self) -> Self {
        self.allow_insecure = true;
        self
    }
}

/// Given generation options, returns a challenge URI,
/// generating a random nonce (if necessary) with the thread-local cryptographically secure random number generator.
pub fn build(options: &GenerationOptions) -> Result<ChallengeUri, Error> {
    build_with_rng(options, &mut rand::thread_rng())
}

/// Given generation options and a cryptographically secure random number generator, returns a challenge URI.
pub fn build_with_rng<R: RngCore + CryptoRng>(
    options: &GenerationOptions,
    rng: &mut R,
) -> Result<ChallengeUri, Error> {
    if options.callback_url.is_empty() {
        return Err(Error::MissingInput("callback_url"));
    }
    let callback_url = Url::parse(&options.callback_url)
        .map_err(|error| Error::invalid_url(&options.callback_url, error))?;
    let authority_and_path = challenge::authority_and_path(&callback_url);

    let nonce = match &options.nonce {
        Some(nonce) => nonce.clone(),
        None => crypto::random_nonce(rng),
    };

    let transport = if options.allow_insecure {
        Transport::Insecure
    } else {
        Transport::Secure
    };
    if callback_url.scheme() != transport.scheme() {
        return Err(Error::SchemeMismatch(if options.allow_insecure {
            format!(
                "`{}` must use `http` when insecure callbacks are allowed",
                options.callback_url
            )
        } else {
            format!("`{}` must use `https`", options.callback_url)
        }));
    }

    Ok(ChallengeUri::new(authority_and_path, nonce, transport))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_utils::FixedRng;

    #[test]
    fn build_works() {
        for (options, expected) in [
            // Random nonce from the injected rng.
            (
                GenerationOptions::new("https://example.com/callback"),
                "digiid://example.com/callback?x=61616161616161616161616161616161&u=0",
            ),
            // Explicit nonce.
            (
                GenerationOptions::new("https://example.com/callback").with_nonce("abc123"),
                "digiid://example.com/callback?x=abc123&u=0",
            ),
            // Insecure callback.
            (
                GenerationOptions::new("http://localhost:3000/callback")
                    .with_nonce("abc123")
                    .allow_insecure(),
                "digiid://localhost:3000/callback?x=abc123&u=1",
            ),
            // Trailing slash is preserved.
            (
                GenerationOptions::new("https://example.com/callback/").with_nonce("abc123"),
                "digiid://example.com/callback/?x=abc123&u=0",
            ),
            // Query and fragment are dropped.
            (
                GenerationOptions::new("https://example.com/callback?session=1#top")
                    .with_nonce("abc123"),
                "digiid://example.com/callback?x=abc123&u=0",
            ),
            // Non-default ports are kept.
            (
                GenerationOptions::new("https://example.com:8443/callback").with_nonce("abc123"),
                "digiid://example.com:8443/callback?x=abc123&u=0",
            ),
        ] {
            let challenge = build_with_rng(&options, &mut FixedRng::new(0x61)).unwrap();
            assert_eq!(challenge.as_str(), expected);
        }
    }

    #[test]
    fn build_rejects_invalid_options() {
        for (options, expected_kind) in [
            (GenerationOptions::new(""), ErrorKind::MissingInput),
            (GenerationOptions::new("not a url"), ErrorKind::InvalidInput),
            (GenerationOptions::new("https://"), ErrorKind::InvalidInput),
            // Secure transport requires `https`.
            (
                GenerationOptions::new("http://example.com/callback"),
                ErrorKind::SchemeMismatch,
            ),
            (
                GenerationOptions::new("ftp://example.com/callback"),
                ErrorKind::SchemeMismatch,
            ),
            // Insecure transport requires `http`.
            (
                GenerationOptions::new("https://example.com/callback").allow_insecure(),
                ErrorKind::SchemeMismatch,
            ),
            (
                GenerationOptions::new("ftp://example.com/callback").allow_insecure(),
                ErrorKind::SchemeMismatch,
            ),
        ] {
            let error = build(&options).unwrap_err();
            assert_eq!(error.kind(), expected_kind, "{options:?}");
        }

        // Scheme mismatch messages are distinct for each transport.
        let secure_error = build(&GenerationOptions::new("http://example.com/callback"))
            .unwrap_err()
            .to_string();
        let insecure_error =
            build(&GenerationOptions::new("https://example.com/callback").allow_insecure())
                .unwrap_err()
                .to_string();
        assert_ne!(secure_error, insecure_error);
    }

    #[test]
    fn build_sets_transport_flag() {
        for (options, expected_flag) in [
            (GenerationOptions::new("https://example.com/a"), "0"),
            (GenerationOptions::new("https://example.com/a/b/c/"), "0"),
            (
                GenerationOptions::new("http://example.com/a").allow_insecure(),
                "1",
            ),
            (
                GenerationOptions::new("http://127.0.0.1:8080/").allow_insecure(),
                "1",
            ),
        ] {
            let challenge = build(&options).unwrap();
            assert_eq!(challenge.transport_flag(), expected_flag);
            assert!(challenge
                .as_str()
                .ends_with(&format!("&u={expected_flag}")));
        }
    }

    #[test]
    fn build_round_trips_callback_url() {
        for (callback_url, authority_and_path) in [
            ("https://example.com/callback", "example.com/callback"),
            ("https://example.com/callback/", "example.com/callback/"),
            (
                "https://sub.example.com:8443/digiid/login",
                "sub.example.com:8443/digiid/login",
            ),
            ("https://example.com/", "example.com/"),
        ] {
            let challenge = build(&GenerationOptions::new(callback_url)).unwrap();
            let parsed = ChallengeUri::parse(challenge.as_str()).unwrap();

            assert_eq!(parsed, challenge);
            assert_eq!(parsed.authority_and_path(), authority_and_path);
            assert_eq!(parsed.callback_url(), Some(Url::parse(callback_url).unwrap()));
        }
    }

    #[test]
    fn build_is_deterministic_with_explicit_nonce() {
        let options = GenerationOptions::new("https://example.com/callback").with_nonce("fixed");
        assert_eq!(build(&options).unwrap(), build(&options).unwrap());

        // Random nonces are fresh for every call.
        let options = GenerationOptions::new("https://example.com/callback");
        assert_ne!(
            build(&options).unwrap().nonce(),
            build(&options).unwrap().nonce()
        );
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: GenerationOptions =
            serde_json::from_str(r#"{"callback_url": "https://example.com/callback"}"#).unwrap();
        assert_eq!(options, GenerationOptions::new("https://example.com/callback"));
    }
}

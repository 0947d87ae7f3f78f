//! DigiID challenge URI types and parsing.
//!
//! A challenge URI has the form `digiid://{host}{path}?x={nonce}&u={0|1}`.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::errors::Error;

/// The DigiID URI scheme.
pub const SCHEME: &str = "digiid";

/// The challenge URI query parameter holding the nonce.
pub const NONCE_PARAM: &str = "x";

/// The challenge URI query parameter holding the transport flag.
pub const TRANSPORT_PARAM: &str = "u";

const SCHEME_PREFIX: &str = "digiid://";

/// The transport used by a callback URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Encrypted transport (i.e. `https`), flagged as `u=0`.
    Secure,
    /// Explicitly allowed plaintext transport (i.e. `http`), flagged as `u=1`.
    Insecure,
}

impl Transport {
    /// Returns the URL scheme for the transport.
    pub fn scheme(self) -> &'static str {
        match self {
            Transport::Secure => "https",
            Transport::Insecure => "http",
        }
    }

    /// Returns the challenge URI transport flag for the transport.
    pub fn flag(self) -> &'static str {
        match self {
            Transport::Secure => "0",
            Transport::Insecure => "1",
        }
    }

    /// Returns the transport for a challenge URI transport flag (if any).
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "0" => Some(Transport::Secure),
            "1" => Some(Transport::Insecure),
            _ => None,
        }
    }
}

/// A DigiID challenge URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChallengeUri {
    uri: String,
    authority_and_path: String,
    nonce: String,
    transport_flag: String,
}

impl ChallengeUri {
    /// Returns the challenge URI for a callback URL (as `authority + path`), a nonce and a transport.
    pub(crate) fn new(authority_and_path: String, nonce: String, transport: Transport) -> Self {
        let uri = format!(
            "{SCHEME_PREFIX}{authority_and_path}?{NONCE_PARAM}={nonce}&{TRANSPORT_PARAM}={}",
            transport.flag()
        );
        Self {
            uri,
            authority_and_path,
            nonce,
            transport_flag: transport.flag().to_owned(),
        }
    }

    /// Parses a challenge URI.
    ///
    /// The URI must start with exactly `digiid://` and include non-empty `x` (nonce) and `u` (transport flag) parameters.
    /// The transport flag isn't validated here, see [`ChallengeUri::transport`].
    pub fn parse(uri: &str) -> Result<Self, Error> {
        let rest = uri.strip_prefix(SCHEME_PREFIX).ok_or_else(|| Error::InvalidInput {
            input: uri.to_owned(),
            reason: format!("expected a `{SCHEME_PREFIX}` URI"),
        })?;

        // Parses with the transport scheme named by the flag so that default ports are elided
        // exactly as they are for the callback URL.
        let scheme = rest
            .split_once('?')
            .and_then(|(_, query)| query_param(query, TRANSPORT_PARAM))
            .and_then(|flag| Transport::from_flag(&flag))
            .unwrap_or(Transport::Insecure)
            .scheme();
        let url = Url::parse(&format!("{scheme}://{rest}"))
            .map_err(|error| Error::invalid_url(uri, error))?;

        let nonce = url
            .query_pairs()
            .find_map(|(key, value)| (key == NONCE_PARAM).then(|| value.into_owned()));
        let transport_flag = url
            .query_pairs()
            .find_map(|(key, value)| (key == TRANSPORT_PARAM).then(|| value.into_owned()));
        // Empty values count as missing.
        let (Some(nonce), Some(transport_flag)) = (
            nonce.filter(|nonce| !nonce.is_empty()),
            transport_flag.filter(|flag| !flag.is_empty()),
        ) else {
            return Err(Error::MalformedChallenge(format!(
                "`{uri}` must include non-empty `{NONCE_PARAM}` and `{TRANSPORT_PARAM}` parameters"
            )));
        };

        Ok(Self {
            uri: uri.to_owned(),
            authority_and_path: authority_and_path(&url),
            nonce,
            transport_flag,
        })
    }

    /// Returns the challenge URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Returns the callback URL without its scheme (i.e. `host[:port] + path`).
    pub fn authority_and_path(&self) -> &str {
        &self.authority_and_path
    }

    /// Returns the nonce.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Returns the raw transport flag.
    pub fn transport_flag(&self) -> &str {
        &self.transport_flag
    }

    /// Returns the transport, or `None` for an unknown transport flag.
    pub fn transport(&self) -> Option<Transport> {
        Transport::from_flag(&self.transport_flag)
    }

    /// Returns the callback URL a wallet should send its response to,
    /// or `None` for an unknown transport flag.
    pub fn callback_url(&self) -> Option<Url> {
        let transport = self.transport()?;
        Url::parse(&format!("{}://{}", transport.scheme(), self.authority_and_path)).ok()
    }

    /// Returns the challenge URI as a `String`.
    pub fn into_string(self) -> String {
        self.uri
    }
}

impl fmt::Display for ChallengeUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for ChallengeUri {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

impl FromStr for ChallengeUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns `host[:port] + path` for a URL (i.e. drops the scheme, query and fragment).
pub(crate) fn authority_and_path(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}{}", url.path()),
        None => format!("{host}{}", url.path()),
    }
}

/// Returns the first (percent-decoded) value of a query parameter.
fn query_param(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find_map(|(key, value)| (key == name).then(|| value.into_owned()))
}

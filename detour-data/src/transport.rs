//! Shared blocking HTTP transport for the service clients.
//!
//! The `detour-core` provider traits are synchronous to keep the core
//! library embeddable in synchronous contexts. [`Transport`] bridges
//! the async `reqwest` calls to that interface by blocking on an
//! internally owned Tokio runtime.
//!
//! # Runtime behaviour
//!
//! When called from outside any Tokio runtime, the transport uses its
//! own stored runtime. When called from within an existing
//! multi-threaded Tokio runtime (detected via [`Handle::try_current`]
//! and [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle
//! with [`tokio::task::block_in_place`] to avoid nested runtime
//! panics. When called from within a `current_thread` runtime, it
//! falls back to its own internal runtime, which may deadlock if the
//! caller's runtime is driving IO this request depends on.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

/// Environment variable holding the map-provider API credential.
pub const API_KEY_ENV: &str = "DETOUR_API_KEY";

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "detour-engine/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for client construction failures.
#[derive(Debug)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// Failed to build the Tokio runtime.
    Runtime(std::io::Error),
    /// The configured base URL did not parse.
    BaseUrl(url::ParseError),
    /// The API credential environment variable was unset or invalid.
    MissingApiKey(std::env::VarError),
}

impl std::fmt::Display for ClientBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
            Self::BaseUrl(err) => write!(f, "invalid base URL: {err}"),
            Self::MissingApiKey(err) => {
                write!(f, "missing API credential ({API_KEY_ENV}): {err}")
            }
        }
    }
}

impl std::error::Error for ClientBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
            Self::BaseUrl(err) => Some(err),
            Self::MissingApiKey(err) => Some(err),
        }
    }
}

/// Configuration shared by the HTTP service clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the service (e.g. `"https://maps.example.com"`).
    pub base_url: String,
    /// Static API credential appended to every request.
    pub api_key: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with the given base URL and credential.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Create a configuration reading the credential from
    /// [`API_KEY_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::MissingApiKey`] when the variable
    /// is unset or not valid Unicode.
    pub fn from_env(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(ClientBuildError::MissingApiKey)?;
        Ok(Self::new(base_url, api_key))
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Errors surfaced by [`Transport::get_json`].
///
/// Converted to the matching domain error (`ServiceUnavailable` or
/// `MalformedResponse`) at each client boundary; raw transport errors
/// never reach the planner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// The requested URL (credential redacted).
        url: String,
        /// The configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// The requested URL (credential redacted).
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail from the HTTP layer.
        message: String,
    },
    /// The request could not be delivered.
    #[error("request to {url} failed: {message}")]
    Network {
        /// The requested URL (credential redacted).
        url: String,
        /// Error detail from the HTTP layer.
        message: String,
    },
    /// The response body could not be decoded as the expected JSON.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Error detail from the decoder.
        message: String,
    },
}

/// Blocking JSON-over-HTTP transport with an owned runtime.
pub struct Transport {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("client", &self.client)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Transport {
    /// Build a transport from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to
    /// build.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            timeout: config.timeout,
        })
    }

    /// Issue a GET request and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] describing the timeout, HTTP, or
    /// network failure, or the decode failure for a 2xx body.
    pub fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, TransportError> {
        let future = self.get_json_async(url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own.
            _ => self.runtime.block_on(future),
        }
    }

    async fn get_json_async<T: DeserializeOwned>(&self, url: &Url) -> Result<T, TransportError> {
        let redacted = redact_credential(url);
        log::debug!("GET {redacted}");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &redacted))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &redacted))?;

        response.json().await.map_err(|err| TransportError::Decode {
            message: err.to_string(),
        })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return TransportError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Render a URL for logging with the `key` query parameter redacted.
fn redact_credential(url: &Url) -> String {
    if url.query().is_none() {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            if name == "key" {
                (name.into_owned(), "REDACTED".to_owned())
            } else {
                (name.into_owned(), value.into_owned())
            }
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.into()
}

//! Error types for the Spin Chimp client.
//!
//! # Design
//! `ApiError` is what every facade method returns. Validation failures are
//! raised locally before anything touches the network; service failures are
//! produced only by `classify::classify` and keep every message the service
//! sent, plus the raw response text for diagnostics.

use std::time::Duration;

/// Errors returned by `SpinChimpClient` and `RequestEngine`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A parameter failed local validation; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The service answered with a `failed:` response.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The transport could not complete the exchange.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// A table response did not follow the `key,value|key,value` format.
    #[error("malformed response: {raw:?}")]
    MalformedResponse { raw: String },

    /// A success response that does not match what the operation promises.
    #[error("unexpected response: {raw:?}")]
    UnexpectedResponse { raw: String },

    /// The response body was not valid UTF-8.
    #[error("response body is not valid UTF-8: {0}")]
    Decode(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    pub fn service_kind(&self) -> Option<ServiceErrorKind> {
        match self {
            ApiError::Service(err) => Some(err.kind()),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Local parameter validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A validated parameter has neither a caller value nor a default.
    #[error("parameter '{name}' does not exist")]
    UnknownParameter { name: String },

    #[error("parameter '{name}' has a wrong value: '{value}'")]
    InvalidParameterValue { name: String, value: String },
}

impl ValidationError {
    pub fn parameter(&self) -> &str {
        match self {
            ValidationError::UnknownParameter { name } => name,
            ValidationError::InvalidParameterValue { name, .. } => name,
        }
    }
}

/// Category assigned to a `failed:` response by message-prefix inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceErrorKind {
    Authentication,
    QuotaExceeded,
    InternalService,
    ArticleProcessing,
    Unknown,
}

/// A failure reported by the service itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", summarize(.messages))]
pub struct ServiceError {
    kind: ServiceErrorKind,
    messages: Vec<String>,
    raw: String,
}

impl ServiceError {
    pub(crate) fn new(kind: ServiceErrorKind, messages: Vec<String>, raw: &str) -> Self {
        Self {
            kind,
            messages,
            raw: raw.to_string(),
        }
    }

    pub fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    /// Every `|`-separated message, in the order the service sent them.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The complete response text, including the `failed:` prefix.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

fn summarize(messages: &[String]) -> &str {
    match messages {
        [] => "the service reported a failure",
        [only] => only,
        _ => "multiple errors occurred",
    }
}

/// Failure of the transport collaborator. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

/// Invalid or missing client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

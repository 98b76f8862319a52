//! Credentials and client configuration.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://api.spinchimp.com";

/// Applied to every transport exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const EMAIL_VAR: &str = "SPINCHIMP_EMAIL";
pub const APIKEY_VAR: &str = "SPINCHIMP_APIKEY";
pub const AID_VAR: &str = "SPINCHIMP_AID";

/// Account credentials sent with every request.
///
/// `aid` is the application id or name; the service accepts an empty one.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub apikey: String,
    #[serde(default)]
    pub aid: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, apikey: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            apikey: apikey.into(),
            aid: String::new(),
        }
    }

    pub fn with_aid(mut self, aid: impl Into<String>) -> Self {
        self.aid = aid.into();
        self
    }

    /// Read `SPINCHIMP_EMAIL`, `SPINCHIMP_APIKEY` and the optional
    /// `SPINCHIMP_AID`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let email = lookup(EMAIL_VAR).ok_or(ConfigError::MissingVar(EMAIL_VAR))?;
        let apikey = lookup(APIKEY_VAR).ok_or(ConfigError::MissingVar(APIKEY_VAR))?;
        let aid = lookup(AID_VAR).unwrap_or_default();
        Ok(Self { email, apikey, aid })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("apikey", &"<redacted>")
            .field("aid", &self.aid)
            .finish()
    }
}

/// Everything a client needs besides its transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) credentials: Credentials,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            credentials,
        }
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

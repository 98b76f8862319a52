//! Build wire requests and interpret wire responses.
//!
//! # Design
//! `RequestEngine` holds only immutable configuration. Each call is split
//! into `build_request` (pure), the transport exchange, and `parse_response`
//! (pure). `invoke` chains the three for hosts that hand the engine a
//! `Transport`; hosts doing their own IO call the halves directly.

use std::collections::BTreeMap;
use std::time::Duration;

use url::Url;

use crate::classify::classify;
use crate::config::{ClientConfig, Credentials};
use crate::error::{ApiError, ConfigError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::resolve::ResolvedRequest;
use crate::schema::Operation;

const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Stateless request builder and response interpreter.
#[derive(Debug, Clone)]
pub struct RequestEngine {
    base_url: String,
    timeout: Duration,
    credentials: Credentials,
}

impl RequestEngine {
    /// Fails if the configured base URL cannot carry a path, or already
    /// carries a query or fragment.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let parsed = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: config.base_url,
                reason: "URL cannot be a base".to_string(),
            });
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl {
                url: config.base_url,
                reason: "base URL must not have a query or fragment".to_string(),
            });
        }
        Ok(Self {
            base_url: config.base_url,
            timeout: config.timeout,
            credentials: config.credentials,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `POST {base}/{operation}?{params + credentials}` with `text` as body.
    pub fn build_request(&self, text: &str, resolved: &ResolvedRequest) -> Result<HttpRequest, ApiError> {
        let mut query: BTreeMap<&str, &str> = resolved
            .params()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        query.insert("email", &self.credentials.email);
        query.insert("apikey", &self.credentials.apikey);
        query.insert("aid", &self.credentials.aid);

        let endpoint = format!("{}/{}", self.base_url, resolved.operation().name());
        let url = Url::parse_with_params(&endpoint, query).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("content-type".to_string(), CONTENT_TYPE.to_string())],
            body: text.to_string(),
        })
    }

    /// Decode the body and classify it. Returns the raw success text.
    pub fn parse_response(&self, operation: Operation, response: HttpResponse) -> Result<String, ApiError> {
        if !(200..300).contains(&response.status) {
            tracing::warn!(
                operation = operation.name(),
                status = response.status,
                "service returned non-success status"
            );
            return Err(TransportError::Status(response.status).into());
        }
        let text = String::from_utf8(response.body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Err(err) = classify(&text) {
            tracing::warn!(
                operation = operation.name(),
                kind = ?err.kind(),
                messages = ?err.messages(),
                "service reported failure"
            );
            return Err(err.into());
        }
        Ok(text)
    }

    /// Run one call end to end. Transport failures are returned as
    /// `ApiError::Network` and never retried.
    pub fn invoke<T: Transport + ?Sized>(
        &self,
        transport: &T,
        text: &str,
        resolved: &ResolvedRequest,
    ) -> Result<String, ApiError> {
        let operation = resolved.operation();
        let request = self.build_request(text, resolved)?;
        tracing::debug!(
            operation = operation.name(),
            query = %loggable_query(resolved),
            body_len = request.body.len(),
            "invoking operation"
        );
        let response = transport.send(&request, self.timeout).map_err(|err| {
            tracing::warn!(operation = operation.name(), error = %err, "transport failed");
            ApiError::Network(err)
        })?;
        self.parse_response(operation, response)
    }
}

/// The encoded query without the injected credentials.
fn loggable_query(resolved: &ResolvedRequest) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(resolved.params())
        .finish()
}

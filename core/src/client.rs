//! Public operation catalog for the Spin Chimp API.
//!
//! # Design
//! `SpinChimpClient` owns a `RequestEngine` and a `Transport` and nothing
//! else, so `&self` methods can run concurrently. Each method resolves its
//! parameters against a fixed operation schema, invokes the engine, and
//! post-processes the success text where the operation returns a table.

use crate::config::{ClientConfig, Credentials};
use crate::engine::RequestEngine;
use crate::error::{ApiError, ConfigError};
use crate::http::Transport;
use crate::resolve::{resolve, ParameterSet};
use crate::schema::Operation;
use crate::types::ResponseTable;

#[cfg(feature = "ureq")]
use crate::transport::UreqTransport;

const CONNECTION_OK: &str = "OK";

/// How `GlobalSpin` should rewrite the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpinMode {
    /// Return the text marked up with `{a|b}` spintax.
    Markup,
    /// Return one unique rewritten variation.
    Rewrite,
}

impl SpinMode {
    fn flag(self) -> &'static str {
        match self {
            SpinMode::Markup => "0",
            SpinMode::Rewrite => "1",
        }
    }
}

/// Synchronous client for the Spin Chimp API.
#[derive(Debug, Clone)]
pub struct SpinChimpClient<T> {
    engine: RequestEngine,
    transport: T,
}

#[cfg(feature = "ureq")]
impl SpinChimpClient<UreqTransport> {
    /// Client for the public service using the default ureq transport.
    pub fn new(credentials: Credentials) -> Result<Self, ConfigError> {
        Self::with_transport(ClientConfig::new(credentials), UreqTransport::new())
    }
}

impl<T: Transport> SpinChimpClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: RequestEngine::new(config)?,
            transport,
        })
    }

    pub fn engine(&self) -> &RequestEngine {
        &self.engine
    }

    /// Succeeds only when the service answers exactly `OK`.
    pub fn test_connection(&self) -> Result<(), ApiError> {
        let raw = self.call(Operation::TestConnection, "", &ParameterSet::new())?;
        if raw == CONNECTION_OK {
            Ok(())
        } else {
            Err(ApiError::UnexpectedResponse { raw })
        }
    }

    /// Daily limit, remaining daily limit, extended quota and bulk quota.
    pub fn account_quota(&self) -> Result<ResponseTable, ApiError> {
        let params = ParameterSet::new().with("simple", "0");
        let raw = self.call(Operation::QueryStats, "", &params)?;
        ResponseTable::parse(&raw)
    }

    /// Remaining query count, as sent by the service.
    pub fn remaining_quota(&self) -> Result<String, ApiError> {
        let params = ParameterSet::new().with("simple", "1");
        self.call(Operation::QueryStats, "", &params)
    }

    /// Word or phrase to density percentage. `min_length` defaults to `3`
    /// and must be an integer.
    pub fn word_density(&self, text: &str, min_length: Option<&str>) -> Result<ResponseTable, ApiError> {
        let mut params = ParameterSet::new();
        params.insert("minlength", min_length.map(str::to_string));
        let raw = self.call(Operation::CalcWordDensity, text, &params)?;
        ResponseTable::parse(&raw)
    }

    /// Expand spintax in `text` into plain text.
    pub fn expand_spintax(
        &self,
        text: &str,
        exclude_original: bool,
        reorder_paragraphs: bool,
    ) -> Result<String, ApiError> {
        let params = ParameterSet::new()
            .with("dontincludeoriginal", bool_flag(exclude_original))
            .with("reorderparagraphs", bool_flag(reorder_paragraphs));
        self.call(Operation::GenerateSpin, text, &params)
    }

    /// Spin `text` and return it with spintax markup.
    pub fn spin_with_markup(&self, text: &str, params: Option<&ParameterSet>) -> Result<String, ApiError> {
        self.spin(text, params, SpinMode::Markup)
    }

    /// Spin `text` and return one unique variation.
    pub fn unique_variation(&self, text: &str, params: Option<&ParameterSet>) -> Result<String, ApiError> {
        self.spin(text, params, SpinMode::Rewrite)
    }

    fn spin(&self, text: &str, params: Option<&ParameterSet>, mode: SpinMode) -> Result<String, ApiError> {
        let mut params = params.cloned().unwrap_or_default();
        params.set("rewrite", mode.flag());
        self.call(Operation::GlobalSpin, text, &params)
    }

    fn call(&self, operation: Operation, text: &str, params: &ParameterSet) -> Result<String, ApiError> {
        let resolved = resolve(operation.spec(), params)?;
        self.engine.invoke(&self.transport, text, &resolved)
    }
}

fn bool_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ServiceErrorKind, TransportError, ValidationError};
    use crate::http::{HttpRequest, HttpResponse};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays queued responses and keeps the requests it was given.
    #[derive(Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn replying(body: &str) -> Self {
            let transport = Self::default();
            transport
                .replies
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::ok(body)));
            transport
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &HttpRequest, _timeout: Duration) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".to_string())))
        }
    }

    fn client(transport: &ScriptedTransport) -> SpinChimpClient<&ScriptedTransport> {
        let config = ClientConfig::new(Credentials::new("me@example.com", "key"))
            .with_base_url("http://spin.test");
        SpinChimpClient::with_transport(config, transport).unwrap()
    }

    fn query(request: &HttpRequest) -> Vec<(String, String)> {
        url::Url::parse(&request.url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn param(request: &HttpRequest, name: &str) -> Option<String> {
        query(request).into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    #[test]
    fn test_connection_accepts_exact_ok() {
        let transport = ScriptedTransport::replying("OK");
        client(&transport).test_connection().unwrap();
        let requests = transport.requests();
        assert!(requests[0].url.starts_with("http://spin.test/TestConnection?"));
        assert!(requests[0].body.is_empty());
    }

    #[test]
    fn test_connection_rejects_other_text() {
        let transport = ScriptedTransport::replying("OK\n");
        let err = client(&transport).test_connection().unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponse { .. }));
    }

    #[test]
    fn test_connection_reports_bad_key() {
        let transport = ScriptedTransport::replying("Failed: Invalid API Key");
        let err = client(&transport).test_connection().unwrap_err();
        match err {
            ApiError::Service(service) => {
                assert_eq!(service.kind(), ServiceErrorKind::Authentication);
                assert_eq!(service.messages(), ["Invalid API Key"]);
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn account_quota_parses_table() {
        let transport = ScriptedTransport::replying("DailyLimit,250|DailyRemaining,12|ExtendedQuota,0|BulkQuota,5");
        let table = client(&transport).account_quota().unwrap();
        assert_eq!(table.get("DailyRemaining"), Some("12"));
        assert_eq!(table.len(), 4);
        assert_eq!(param(&transport.requests()[0], "simple").as_deref(), Some("0"));
    }

    #[test]
    fn account_quota_rejects_malformed_table() {
        let transport = ScriptedTransport::replying("DailyLimit=250");
        let err = client(&transport).account_quota().unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { .. }));
    }

    #[test]
    fn remaining_quota_returns_text() {
        let transport = ScriptedTransport::replying("42");
        assert_eq!(client(&transport).remaining_quota().unwrap(), "42");
        assert_eq!(param(&transport.requests()[0], "simple").as_deref(), Some("1"));
    }

    #[test]
    fn word_density_defaults_min_length() {
        let transport = ScriptedTransport::replying("spin,50.00|text,50.00");
        let table = client(&transport).word_density("spin text", None).unwrap();
        assert_eq!(table.get("spin"), Some("50.00"));
        let request = &transport.requests()[0];
        assert_eq!(param(request, "minlength").as_deref(), Some("3"));
        assert_eq!(request.body, "spin text");
    }

    #[test]
    fn word_density_validates_before_sending() {
        let transport = ScriptedTransport::default();
        let err = client(&transport).word_density("text", Some("three")).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(ValidationError::InvalidParameterValue { ref name, .. }) if name == "minlength"
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn expand_spintax_sends_flags() {
        let transport = ScriptedTransport::replying("Hello world");
        let out = client(&transport).expand_spintax("{Hello|Hi} world", true, false).unwrap();
        assert_eq!(out, "Hello world");
        let request = &transport.requests()[0];
        assert_eq!(param(request, "dontincludeoriginal").as_deref(), Some("1"));
        assert_eq!(param(request, "reorderparagraphs").as_deref(), Some("0"));
    }

    #[test]
    fn expand_spintax_sends_reorder_flag() {
        let transport = ScriptedTransport::replying("Para two.\n\nPara one.");
        client(&transport)
            .expand_spintax("Para one.\n\nPara two.", false, true)
            .unwrap();
        let request = &transport.requests()[0];
        assert!(request.url.contains("/GenerateSpin?"));
        assert_eq!(param(request, "reorderparagraphs").as_deref(), Some("1"));
        assert_eq!(param(request, "dontincludeoriginal").as_deref(), Some("0"));
    }

    #[test]
    fn spin_modes_force_rewrite_flag() {
        let transport = ScriptedTransport::default();
        {
            let mut replies = transport.replies.lock().unwrap();
            replies.push_back(Ok(HttpResponse::ok("{a|b}")));
            replies.push_back(Ok(HttpResponse::ok("b")));
        }
        let caller = ParameterSet::new().with("rewrite", "1").with("quality", "5");
        let c = client(&transport);
        c.spin_with_markup("a", Some(&caller)).unwrap();
        c.unique_variation("a", None).unwrap();

        let requests = transport.requests();
        assert!(requests[0].url.contains("/GlobalSpin?"));
        assert_eq!(param(&requests[0], "rewrite").as_deref(), Some("0"));
        assert_eq!(param(&requests[0], "quality").as_deref(), Some("5"));
        assert_eq!(param(&requests[1], "rewrite").as_deref(), Some("1"));
        assert_eq!(param(&requests[1], "quality").as_deref(), Some("4"));
        // caller's set is untouched
        assert_eq!(caller.get("rewrite"), Some("1"));
    }

    #[test]
    fn spin_rejects_bad_tag_protect() {
        let transport = ScriptedTransport::default();
        let params = ParameterSet::new().with("tagprotect", "[],{}");
        let err = client(&transport).unique_variation("text", Some(&params)).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn credentials_are_injected_per_call() {
        let transport = ScriptedTransport::replying("OK");
        client(&transport).test_connection().unwrap();
        let request = &transport.requests()[0];
        assert_eq!(param(request, "email").as_deref(), Some("me@example.com"));
        assert_eq!(param(request, "apikey").as_deref(), Some("key"));
        assert_eq!(param(request, "aid").as_deref(), Some(""));
    }

    #[test]
    fn transport_failure_is_network_error() {
        let transport = ScriptedTransport::default();
        let err = client(&transport).remaining_quota().unwrap_err();
        assert!(err.is_network());
        assert_eq!(transport.requests().len(), 1);
    }
}

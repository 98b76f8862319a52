//! Map raw service responses to success text or a `ServiceError`.
//!
//! The service signals failure in-band: the body starts with `failed:`
//! (any case), one separator character, then one or more `|`-separated
//! messages. Only the first message is inspected to pick a kind; the rest is
//! kept as opaque diagnostics.

use crate::error::{ServiceError, ServiceErrorKind};

const FAILURE_PREFIX: &str = "failed:";

// First match wins; compared against the lower-cased first message.
const KIND_PREFIXES: &[(&str, ServiceErrorKind)] = &[
    ("login error", ServiceErrorKind::Authentication),
    ("invalid api key", ServiceErrorKind::Authentication),
    ("invalid apikey", ServiceErrorKind::Authentication),
    ("invalid email", ServiceErrorKind::Authentication),
    ("invalid login", ServiceErrorKind::Authentication),
    ("authentication", ServiceErrorKind::Authentication),
    ("quota", ServiceErrorKind::QuotaExceeded),
    ("daily limit", ServiceErrorKind::QuotaExceeded),
    ("no quota", ServiceErrorKind::QuotaExceeded),
    ("out of quota", ServiceErrorKind::QuotaExceeded),
    ("not enough quota", ServiceErrorKind::QuotaExceeded),
    ("internal error", ServiceErrorKind::InternalService),
    ("server error", ServiceErrorKind::InternalService),
    ("unexpected error", ServiceErrorKind::InternalService),
    ("article", ServiceErrorKind::ArticleProcessing),
    ("text", ServiceErrorKind::ArticleProcessing),
    ("no text", ServiceErrorKind::ArticleProcessing),
    ("spintax", ServiceErrorKind::ArticleProcessing),
    ("invalid spintax", ServiceErrorKind::ArticleProcessing),
];

/// Return `raw` unchanged on success, or the classified failure.
pub fn classify(raw: &str) -> Result<&str, ServiceError> {
    let Some(body) = failure_body(raw) else {
        return Ok(raw);
    };
    let messages: Vec<String> = body.split('|').map(|m| m.trim().to_string()).collect();
    let kind = messages
        .first()
        .map(|first| kind_of(first))
        .unwrap_or(ServiceErrorKind::Unknown);
    Err(ServiceError::new(kind, messages, raw))
}

/// Text after `failed:` and exactly one separator character.
fn failure_body(raw: &str) -> Option<&str> {
    let prefix = raw.get(..FAILURE_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(FAILURE_PREFIX) {
        return None;
    }
    let mut rest = raw[FAILURE_PREFIX.len()..].chars();
    rest.next();
    Some(rest.as_str())
}

fn kind_of(message: &str) -> ServiceErrorKind {
    let lower = message.to_lowercase();
    KIND_PREFIXES
        .iter()
        .find(|(prefix, _)| lower.starts_with(prefix))
        .map(|(_, kind)| *kind)
        .unwrap_or(ServiceErrorKind::Unknown)
}

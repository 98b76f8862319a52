//! Typed payloads parsed from success responses.

use std::fmt;

use serde::Serialize;

use crate::error::ApiError;

/// Ordered key/value table from a `key,value|key,value` response.
///
/// Returned by the account-quota and word-density operations. Entries keep
/// wire order, and `Display` writes the wire form back out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseTable {
    entries: Vec<(String, String)>,
}

impl ResponseTable {
    /// Parse a table payload. An empty payload is an empty table; any
    /// segment that is not exactly two comma-separated fields is rejected.
    pub fn parse(payload: &str) -> Result<Self, ApiError> {
        if payload.is_empty() {
            return Ok(Self::default());
        }
        let entries = payload
            .split('|')
            .map(|segment| match segment.split_once(',') {
                Some((key, value)) if !value.contains(',') => Ok((key.to_string(), value.to_string())),
                _ => Err(ApiError::MalformedResponse {
                    raw: payload.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    /// Value for `key`. A key repeated on the wire resolves to its last
    /// occurrence; `iter` still yields every entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, String)> {
        self.entries
    }
}

impl fmt::Display for ResponseTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{key},{value}")?;
        }
        Ok(())
    }
}

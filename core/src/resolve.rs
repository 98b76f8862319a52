//! Merge caller parameters with operation defaults and validate them.
//!
//! # Design
//! `resolve` is the only way to obtain a `ResolvedRequest`, so anything that
//! reaches `RequestEngine` has already passed every declared constraint.
//! Validation is fail-fast: the first bad parameter voids the whole call.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::schema::{Operation, OperationSpec};
use crate::validate;

/// Caller-supplied parameters for one call.
///
/// A `None` value means "no value": the entry is ignored and the schema
/// default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: BTreeMap<String, Option<String>>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), Some(value.into()));
    }

    /// Insert a raw entry, including the `None` sentinel.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.entries.insert(name.into(), value);
    }

    /// The value for `name`, or `None` if absent or explicitly unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|v| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Explicit filter: entries carrying the `None` sentinel are dropped.
    fn supplied(&self) -> BTreeMap<&str, &str> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (name.as_str(), v)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (name, value) in iter {
            set.set(name, value);
        }
        set
    }
}

/// Finalized parameters for one call. Only produced by `resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    operation: Operation,
    params: BTreeMap<String, String>,
}

impl ResolvedRequest {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Resolve `caller` against `spec`.
///
/// Every validated name must have a caller value or a default; the
/// effective value is checked against its constraint. The result is the
/// schema defaults overlaid by every supplied caller value. Caller names the
/// schema does not know are passed through unchecked.
pub fn resolve(spec: &OperationSpec, caller: &ParameterSet) -> Result<ResolvedRequest, ValidationError> {
    let supplied = caller.supplied();

    for (name, constraint) in spec.validators {
        let value = supplied
            .get(name)
            .copied()
            .or_else(|| spec.default_for(name))
            .ok_or_else(|| ValidationError::UnknownParameter {
                name: name.to_string(),
            })?;
        validate::check(name, value, *constraint)?;
    }

    let mut params: BTreeMap<String, String> = spec
        .defaults
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    for (name, value) in supplied {
        if !spec.recognizes(name) {
            tracing::debug!(
                operation = spec.operation.name(),
                parameter = name,
                "passing through unrecognized parameter"
            );
        }
        params.insert(name.to_string(), value.to_string());
    }

    Ok(ResolvedRequest {
        operation: spec.operation,
        params,
    })
}

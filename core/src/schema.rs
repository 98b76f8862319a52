//! Static operation catalog for the Spin Chimp API.
//!
//! # Design
//! Every remote method the client knows about has exactly one
//! `OperationSpec` entry in `CATALOG`, indexed by `Operation`. Defaults and
//! constraints are `&'static` data, so resolution always copies them into a
//! fresh per-call map and never mutates shared state.

/// A remote method exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    TestConnection,
    QueryStats,
    CalcWordDensity,
    GenerateSpin,
    GlobalSpin,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::TestConnection,
        Operation::QueryStats,
        Operation::CalcWordDensity,
        Operation::GenerateSpin,
        Operation::GlobalSpin,
    ];

    /// Wire method identifier, used as the last path segment of the URL.
    pub fn name(self) -> &'static str {
        match self {
            Operation::TestConnection => "TestConnection",
            Operation::QueryStats => "QueryStats",
            Operation::CalcWordDensity => "CalcWordDensity",
            Operation::GenerateSpin => "GenerateSpin",
            Operation::GlobalSpin => "GlobalSpin",
        }
    }

    pub fn spec(self) -> &'static OperationSpec {
        &CATALOG[self as usize]
    }
}

/// The single rule a parameter value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Value must equal one of the listed literals.
    OneOf(&'static [&'static str]),
    /// Value must be a base-10 integer.
    Integer,
    /// Value is a comma-joined list drawn from the listed tokens.
    SubsetOf(&'static [&'static str]),
}

/// Parameter schema for one operation.
#[derive(Debug)]
pub struct OperationSpec {
    pub operation: Operation,
    pub defaults: &'static [(&'static str, &'static str)],
    pub validators: &'static [(&'static str, Constraint)],
}

impl OperationSpec {
    pub fn default_for(&self, name: &str) -> Option<&'static str> {
        self.defaults
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn constraint_for(&self, name: &str) -> Option<Constraint> {
        self.validators
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, constraint)| *constraint)
    }

    /// True if the name appears in either the defaults or the validators.
    pub fn recognizes(&self, name: &str) -> bool {
        self.default_for(name).is_some() || self.constraint_for(name).is_some()
    }
}

const BOOL: &[&str] = &["0", "1"];
const QUALITY: &[&str] = &["1", "2", "3", "4", "5"];
const POS_MATCH: &[&str] = &["0", "1", "2", "3", "4"];
const TAG_PROTECT: &[&str] = &["[]", "()", "<-->"];

const SPIN_DEFAULTS: &[(&str, &str)] = &[
    ("quality", "4"),
    ("posmatch", "3"),
    ("protectedterms", ""),
    ("rewrite", "0"),
    ("phraseignorequality", "0"),
    ("spinwithinspin", "0"),
    ("spinwithinhtml", "0"),
    ("applyinstantunique", "0"),
    ("fullcharset", "0"),
    ("spintidy", "0"),
    ("tagprotect", ""),
    ("maxspindepth", "0"),
];

const SPIN_VALIDATORS: &[(&str, Constraint)] = &[
    ("quality", Constraint::OneOf(QUALITY)),
    ("posmatch", Constraint::OneOf(POS_MATCH)),
    ("rewrite", Constraint::OneOf(BOOL)),
    ("phraseignorequality", Constraint::OneOf(BOOL)),
    ("spinwithinspin", Constraint::OneOf(BOOL)),
    ("spinwithinhtml", Constraint::OneOf(BOOL)),
    ("applyinstantunique", Constraint::OneOf(BOOL)),
    ("fullcharset", Constraint::OneOf(BOOL)),
    ("spintidy", Constraint::OneOf(BOOL)),
    ("tagprotect", Constraint::SubsetOf(TAG_PROTECT)),
    ("maxspindepth", Constraint::Integer),
];

// Indexed by `Operation as usize`; keep in declaration order.
static CATALOG: [OperationSpec; 5] = [
    OperationSpec {
        operation: Operation::TestConnection,
        defaults: &[],
        validators: &[],
    },
    OperationSpec {
        operation: Operation::QueryStats,
        defaults: &[],
        validators: &[("simple", Constraint::OneOf(BOOL))],
    },
    OperationSpec {
        operation: Operation::CalcWordDensity,
        defaults: &[("minlength", "3")],
        validators: &[("minlength", Constraint::Integer)],
    },
    OperationSpec {
        operation: Operation::GenerateSpin,
        defaults: &[("dontincludeoriginal", "0"), ("reorderparagraphs", "0")],
        validators: &[
            ("dontincludeoriginal", Constraint::OneOf(BOOL)),
            ("reorderparagraphs", Constraint::OneOf(BOOL)),
        ],
    },
    OperationSpec {
        operation: Operation::GlobalSpin,
        defaults: SPIN_DEFAULTS,
        validators: SPIN_VALIDATORS,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_operation() {
        for op in Operation::ALL {
            assert_eq!(op.spec().operation, op);
        }
    }

    #[test]
    fn wire_names_are_unique() {
        let mut names: Vec<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn spin_schema_lookups() {
        let spec = Operation::GlobalSpin.spec();
        assert_eq!(spec.default_for("quality"), Some("4"));
        assert_eq!(spec.default_for("tagprotect"), Some(""));
        assert_eq!(spec.constraint_for("maxspindepth"), Some(Constraint::Integer));
        assert_eq!(spec.constraint_for("protectedterms"), None);
        assert!(spec.recognizes("protectedterms"));
        assert!(!spec.recognizes("Wordscount"));
    }

    #[test]
    fn query_stats_simple_has_no_default() {
        let spec = Operation::QueryStats.spec();
        assert!(spec.constraint_for("simple").is_some());
        assert!(spec.default_for("simple").is_none());
    }

    #[test]
    fn every_default_bearing_validator_name_has_a_default() {
        for op in [Operation::CalcWordDensity, Operation::GenerateSpin, Operation::GlobalSpin] {
            let spec = op.spec();
            for (name, _) in spec.validators {
                assert!(spec.default_for(name).is_some(), "{}: {name}", op.name());
            }
        }
    }
}

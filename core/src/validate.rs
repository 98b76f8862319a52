//! Constraint checks for single parameter values.

use crate::error::ValidationError;
use crate::schema::Constraint;

/// Check `value` against `constraint`, naming `name` in the failure.
pub fn check(name: &str, value: &str, constraint: Constraint) -> Result<(), ValidationError> {
    let ok = match constraint {
        Constraint::OneOf(allowed) => allowed.contains(&value),
        Constraint::Integer => is_integer(value),
        Constraint::SubsetOf(allowed) => is_subset(value, allowed),
    };
    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidParameterValue {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Optional sign followed by ASCII digits. No range limit.
fn is_integer(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// An empty value selects nothing and passes; "[]," does not.
fn is_subset(value: &str, allowed: &[&str]) -> bool {
    value.is_empty()
        || value
            .split(',')
            .all(|token| !token.is_empty() && allowed.contains(&token))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGS: Constraint = Constraint::SubsetOf(&["[]", "()", "<-->"]);

    #[test]
    fn enumeration_membership() {
        let bool_flag = Constraint::OneOf(&["0", "1"]);
        assert!(check("spintidy", "0", bool_flag).is_ok());
        assert!(check("spintidy", "1", bool_flag).is_ok());
        assert!(check("spintidy", "2", bool_flag).is_err());
        assert!(check("spintidy", "", bool_flag).is_err());
        assert!(check("spintidy", " 1", bool_flag).is_err());
    }

    #[test]
    fn integer_parsing() {
        for ok in ["0", "3", "-7", "+12", "123456789012345678901234567890"] {
            assert!(check("minlength", ok, Constraint::Integer).is_ok(), "{ok}");
        }
        for bad in ["", "-", "3.5", "three", "1e3", " 3"] {
            assert!(check("minlength", bad, Constraint::Integer).is_err(), "{bad}");
        }
    }

    #[test]
    fn tag_protect_accepts_allowed_combinations() {
        for ok in ["", "[]", "()", "<-->", "[],()", "<-->,[],()"] {
            assert!(check("tagprotect", ok, TAGS).is_ok(), "{ok}");
        }
    }

    #[test]
    fn tag_protect_rejects_unknown_or_empty_tokens() {
        for bad in ["{}", "[],{}", "[],", ",()", "[],,()", "[ ]"] {
            assert!(check("tagprotect", bad, TAGS).is_err(), "{bad}");
        }
    }

    #[test]
    fn failure_names_parameter_and_value() {
        let err = check("quality", "9", Constraint::OneOf(&["1", "2"])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidParameterValue {
                name: "quality".to_string(),
                value: "9".to_string(),
            }
        );
    }
}

//! Default value validation.
//!
//! Checks run in a fixed order and the first failure aborts resolution:
//!
//! 1. type membership (only when a value is present),
//! 2. required-ness (absent, `null`, `""` and NaN all fail),
//! 3. enumeration membership (only when a value is present),
//! 4. NaN rejection, whatever the other settings say.
//!
//! # Examples
//!
//! ```
//! use option_schema_core::{DefaultValidator, Definition, Kind, Map, ResolveError, Validator, Value};
//!
//! let def = Definition::new().with_type([Kind::Number]).required();
//! let options = Map::new();
//!
//! assert!(DefaultValidator.validate("port", Some(&Value::from(0)), &def, &options).is_ok());
//!
//! let err = DefaultValidator.validate("port", None, &def, &options).unwrap_err();
//! assert!(matches!(err, ResolveError::Required { .. }));
//! ```

use crate::hooks::Validator;
use crate::{Definition, Map, ResolveError, Result, Value};

/// Default [`Validator`] applying the type, required, enum and NaN checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {
    fn validate(
        &self,
        name: &str,
        value: Option<&Value>,
        definition: &Definition,
        _options: &Map,
    ) -> Result<()> {
        check_type(name, value, definition)?;
        check_required(name, value, definition)?;
        check_enum(name, value, definition)?;
        check_nan(name, value)
    }
}

fn check_type(name: &str, value: Option<&Value>, definition: &Definition) -> Result<()> {
    let (Some(types), Some(value)) = (&definition.types, value) else {
        return Ok(());
    };
    if types.contains(value.kind()) {
        return Ok(());
    }
    Err(ResolveError::Type {
        name: name.to_string(),
        expected: types.kinds().to_vec(),
        value: value.clone(),
    })
}

fn check_required(name: &str, value: Option<&Value>, definition: &Definition) -> Result<()> {
    if definition.required && !is_meaningful(value) {
        return Err(ResolveError::Required {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Required means "meaningfully present": `0` and `false` count, `null`,
/// `""` and NaN do not.
fn is_meaningful(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => !n.is_nan(),
        Some(_) => true,
    }
}

fn check_enum(name: &str, value: Option<&Value>, definition: &Definition) -> Result<()> {
    let (Some(allowed), Some(value)) = (&definition.allowed, value) else {
        return Ok(());
    };
    if allowed.contains(value) {
        return Ok(());
    }
    Err(ResolveError::Enum {
        name: name.to_string(),
        value: value.clone(),
        possible: allowed.clone(),
    })
}

fn check_nan(name: &str, value: Option<&Value>) -> Result<()> {
    match value {
        Some(value) if value.is_nan() => Err(ResolveError::NaN {
            name: name.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;

    fn validate(def: &Definition, value: Option<Value>) -> Result<()> {
        DefaultValidator.validate("x", value.as_ref(), def, &Map::new())
    }

    #[test]
    fn test_type_mismatch_reports_expected_kinds() {
        let def = Definition::new().with_type([Kind::Number]);
        let err = validate(&def, Some(Value::from("3000"))).unwrap_err();
        match err {
            ResolveError::Type {
                name,
                expected,
                value,
            } => {
                assert_eq!(name, "x");
                assert_eq!(expected, vec![Kind::Number]);
                assert_eq!(value, Value::from("3000"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_type_check_skipped_when_absent() {
        let def = Definition::new().with_type([Kind::Number]);
        assert!(validate(&def, None).is_ok());
    }

    #[test]
    fn test_multiple_types_accept_any_member() {
        let def = Definition::new().with_type([Kind::Number, Kind::String]);
        assert!(validate(&def, Some(Value::from(1))).is_ok());
        assert!(validate(&def, Some(Value::from("a"))).is_ok());
        assert!(validate(&def, Some(Value::Bool(true))).is_err());
    }

    #[test]
    fn test_required_rejects_empty_values() {
        let def = Definition::new().required();
        for value in [
            None,
            Some(Value::Null),
            Some(Value::from("")),
            Some(Value::Number(f64::NAN)),
        ] {
            let err = validate(&def, value).unwrap_err();
            assert_eq!(err.code(), "required");
        }
    }

    #[test]
    fn test_required_accepts_falsy_values() {
        let def = Definition::new().required();
        assert!(validate(&def, Some(Value::from(0))).is_ok());
        assert!(validate(&def, Some(Value::Bool(false))).is_ok());
        assert!(validate(&def, Some(Value::Object(Map::new()))).is_ok());
    }

    #[test]
    fn test_type_check_runs_before_required() {
        let def = Definition::new().with_type([Kind::String]).required();
        let err = validate(&def, Some(Value::Null)).unwrap_err();
        assert_eq!(err.code(), "type");
    }

    #[test]
    fn test_enum_membership() {
        let def = Definition::new().with_enum([2000, 3000, 3001]);
        assert!(validate(&def, Some(Value::from(3000))).is_ok());
        assert!(validate(&def, None).is_ok());

        let err = validate(&def, Some(Value::from(80))).unwrap_err();
        assert_eq!(err.code(), "enum");
    }

    #[test]
    fn test_nan_rejected_without_other_constraints() {
        let def = Definition::new();
        let err = validate(&def, Some(Value::Number(f64::NAN))).unwrap_err();
        assert!(matches!(err, ResolveError::NaN { .. }));
    }
}

//! Built-in parse steps for declarative schemas.
//!
//! Schema documents cannot carry closures, so a definition loaded from JSON
//! or YAML may name one of these conversions in its `parse` field. Each is a
//! single-step conversion of a present value; absent values stay absent and
//! values that cannot be converted are left for the validator to judge.
//!
//! Like any parse override, a coercion replaces the `extend` merge step.

use std::str::FromStr;

use crate::hooks::Parser;
use crate::{Definition, Result, Value};

/// Named single-step value conversion.
///
/// # Examples
///
/// ```
/// use option_schema_core::{Coerce, Definition, Parser, Value};
///
/// let def = Definition::new();
/// let port = Coerce::Number.parse(Some(Value::from("3000")), &def).unwrap();
/// assert_eq!(port, Some(Value::Number(3000.0)));
///
/// let bad = Coerce::Number.parse(Some(Value::from("abc")), &def).unwrap();
/// assert!(bad.unwrap().is_nan());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerce {
    /// Strings are parsed as floats; unparsable strings become NaN.
    Number,
    /// `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`/`""` become booleans.
    Boolean,
    /// Numbers and booleans are rendered as strings.
    String,
    /// Strings holding JSON are decoded.
    Json,
}

impl FromStr for Coerce {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(Coerce::Number),
            "boolean" | "bool" => Ok(Coerce::Boolean),
            "string" => Ok(Coerce::String),
            "json" => Ok(Coerce::Json),
            other => Err(format!("unknown parse step '{other}'")),
        }
    }
}

impl Coerce {
    pub fn apply(self, value: Value) -> Value {
        match (self, value) {
            (Coerce::Number, Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Value::Number(0.0)
                } else {
                    Value::Number(trimmed.parse::<f64>().unwrap_or(f64::NAN))
                }
            }
            (Coerce::Number, Value::Bool(b)) => Value::Number(if b { 1.0 } else { 0.0 }),
            (Coerce::Boolean, Value::String(s)) => {
                match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" | "on" => Value::Bool(true),
                    "false" | "0" | "no" | "off" | "" => Value::Bool(false),
                    _ => Value::String(s),
                }
            }
            (Coerce::Boolean, Value::Number(n)) if !n.is_nan() => Value::Bool(n != 0.0),
            (Coerce::String, value @ (Value::Number(_) | Value::Bool(_))) => {
                Value::String(value.to_string())
            }
            (Coerce::Json, Value::String(s)) => match serde_json::from_str::<serde_json::Value>(&s)
            {
                Ok(decoded) => Value::from(decoded),
                Err(_) => Value::String(s),
            },
            (_, value) => value,
        }
    }
}

impl Parser for Coerce {
    fn parse(&self, value: Option<Value>, _definition: &Definition) -> Result<Option<Value>> {
        Ok(value.map(|value| self.apply(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Map;

    #[test]
    fn test_number_coercion() {
        assert_eq!(Coerce::Number.apply(Value::from(" 42 ")), Value::from(42));
        assert_eq!(Coerce::Number.apply(Value::from("1.5")), Value::from(1.5));
        assert!(Coerce::Number.apply(Value::from("abc")).is_nan());
        assert_eq!(Coerce::Number.apply(Value::Null), Value::Null);
    }

    #[test]
    fn test_boolean_coercion() {
        assert_eq!(Coerce::Boolean.apply(Value::from("yes")), Value::Bool(true));
        assert_eq!(Coerce::Boolean.apply(Value::from("0")), Value::Bool(false));
        assert_eq!(Coerce::Boolean.apply(Value::from(2)), Value::Bool(true));
        assert_eq!(Coerce::Boolean.apply(Value::from("maybe")), Value::from("maybe"));
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(Coerce::String.apply(Value::from(3000)), Value::from("3000"));
        assert_eq!(Coerce::String.apply(Value::Bool(true)), Value::from("true"));
    }

    #[test]
    fn test_json_coercion() {
        let decoded = Coerce::Json.apply(Value::from(r#"{"origin":"*"}"#));
        let expected: Map = [("origin", "*")].into_iter().collect();
        assert_eq!(decoded, Value::Object(expected));
        assert_eq!(Coerce::Json.apply(Value::from("{oops")), Value::from("{oops"));
    }

    #[test]
    fn test_absent_stays_absent() {
        assert_eq!(Coerce::Number.parse(None, &Definition::new()).unwrap(), None);
    }

    #[test]
    fn test_parse_step_names() {
        assert_eq!("Number".parse::<Coerce>(), Ok(Coerce::Number));
        assert!("date".parse::<Coerce>().is_err());
    }
}

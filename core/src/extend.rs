//! Default parse step: merging object values over their default.
//!
//! With `extend` unset the value passes through untouched. With `extend`
//! set, an absent value becomes a copy of an object default (or an empty
//! object), an object value is laid over the default, and any other value
//! is left alone. The last rule is what lets `{ cors: false }` switch off a
//! whole block.
//!
//! # Examples
//!
//! ```
//! use option_schema_core::{Definition, ExtendMerger, Map, Parser, Value};
//!
//! let def = Definition::new()
//!     .with_default([("origin", "*")].into_iter().collect::<Map>())
//!     .extend();
//! let value = Value::from([("method", "GET")].into_iter().collect::<Map>());
//!
//! let merged = ExtendMerger.parse(Some(value), &def).unwrap().unwrap();
//! assert_eq!(merged.to_string(), r#"{"origin": "*", "method": "GET"}"#);
//!
//! let disabled = ExtendMerger.parse(Some(Value::Bool(false)), &def).unwrap();
//! assert_eq!(disabled, Some(Value::Bool(false)));
//! ```

use crate::hooks::Parser;
use crate::{Definition, Result, Value};

/// Default [`Parser`] implementing `extend` semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtendMerger;

impl Parser for ExtendMerger {
    fn parse(&self, value: Option<Value>, definition: &Definition) -> Result<Option<Value>> {
        if !definition.extend {
            return Ok(value);
        }

        let base = definition
            .default
            .as_ref()
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let merged = match value {
            None => Value::Object(base),
            Some(Value::Object(overlay)) => Value::Object(base.merged_with(&overlay)),
            Some(other) => other,
        };
        Ok(Some(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Map;

    fn cors_default() -> Map {
        [("origin", "*")].into_iter().collect()
    }

    #[test]
    fn test_without_extend_value_passes_through() {
        let def = Definition::new().with_default(cors_default());
        assert_eq!(ExtendMerger.parse(None, &def).unwrap(), None);

        let value = Value::from([("method", "GET")].into_iter().collect::<Map>());
        assert_eq!(
            ExtendMerger.parse(Some(value.clone()), &def).unwrap(),
            Some(value)
        );
    }

    #[test]
    fn test_absent_value_becomes_empty_object() {
        let def = Definition::new().extend();
        assert_eq!(
            ExtendMerger.parse(None, &def).unwrap(),
            Some(Value::Object(Map::new()))
        );
    }

    #[test]
    fn test_absent_value_copies_default() {
        let def = Definition::new().with_default(cors_default()).extend();
        assert_eq!(
            ExtendMerger.parse(None, &def).unwrap(),
            Some(Value::Object(cors_default()))
        );
    }

    #[test]
    fn test_value_keys_override_default() {
        let def = Definition::new().with_default(cors_default()).extend();
        let value = Value::from([("origin", "https://x/")].into_iter().collect::<Map>());

        let merged = ExtendMerger.parse(Some(value), &def).unwrap().unwrap();
        assert_eq!(
            merged.as_object().and_then(|m| m.get("origin")),
            Some(&Value::from("https://x/"))
        );
    }

    #[test]
    fn test_non_object_values_are_untouched() {
        let def = Definition::new().with_default(cors_default()).extend();
        for value in [Value::Bool(false), Value::from("*"), Value::from(1)] {
            assert_eq!(
                ExtendMerger.parse(Some(value.clone()), &def).unwrap(),
                Some(value)
            );
        }
    }

    #[test]
    fn test_non_object_default_is_ignored_when_merging() {
        let def = Definition::new().with_default("*").extend();
        let value = Value::from([("a", 1)].into_iter().collect::<Map>());
        assert_eq!(
            ExtendMerger.parse(Some(value.clone()), &def).unwrap(),
            Some(value)
        );
    }
}

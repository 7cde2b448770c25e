//! Error types for option resolution.
//!
//! Every failure is fatal for the whole resolution call. Schema-level and
//! value-level failures share one enum; [`ResolveError::code`] gives a stable
//! discriminator for callers that branch on the failure class.

use thiserror::Error;

use crate::{Kind, Value};

/// Boxed error raised by a caller-supplied hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while loading a schema or resolving options.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A schema entry is not a well-formed definition.
    #[error("invalid definition for option '{name}': {reason}")]
    InvalidSchema { name: String, reason: String },

    /// The schema document as a whole has the wrong shape.
    #[error("invalid schema document: {reason}")]
    InvalidDocument { reason: String },

    /// A non-object input was supplied to a schema without a root key.
    #[error("expected an object of options but received a {kind}")]
    NotObject { kind: Kind },

    /// The environment supplied an option that may not come from it.
    #[error("option '{name}' cannot be set through the environment variable '{key}'")]
    NoEnv { name: String, key: String },

    /// The arguments supplied an option that may not come from them.
    #[error("option '{name}' cannot be passed as the argument '{key}'")]
    NoArg { name: String, key: String },

    /// The resolved value has a kind outside the declared type set.
    #[error("option '{name}' expected {} but received {value}", join_kinds(.expected))]
    Type {
        name: String,
        expected: Vec<Kind>,
        value: Value,
    },

    /// A required option is missing, null, empty or NaN.
    #[error("option '{name}' is required")]
    Required { name: String },

    /// The resolved value is not one of the admissible values.
    #[error("option '{name}' must be one of {} but received {value}", join_values(.possible))]
    Enum {
        name: String,
        value: Value,
        possible: Vec<Value>,
    },

    /// The resolved value is a numeric NaN.
    #[error("option '{name}' resolved to NaN")]
    NaN { name: String },

    /// Error raised by a caller-supplied find, parse or validate hook.
    #[error(transparent)]
    Custom(BoxError),
}

impl ResolveError {
    /// Wraps an error raised inside a hook.
    pub fn custom(err: impl Into<BoxError>) -> Self {
        ResolveError::Custom(err.into())
    }

    /// Stable short code for the failure class.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_schema_core::ResolveError;
    ///
    /// let err = ResolveError::Required { name: "port".into() };
    /// assert_eq!(err.code(), "required");
    /// assert_eq!(err.option_name(), Some("port"));
    /// ```
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::InvalidSchema { .. } | ResolveError::InvalidDocument { .. } => {
                "invalid_schema"
            }
            ResolveError::NotObject { .. } => "notobject",
            ResolveError::NoEnv { .. } => "noenv",
            ResolveError::NoArg { .. } => "noarg",
            ResolveError::Type { .. } => "type",
            ResolveError::Required { .. } => "required",
            ResolveError::Enum { .. } => "enum",
            ResolveError::NaN { .. } => "nan",
            ResolveError::Custom(_) => "custom",
        }
    }

    /// Name of the offending option, when the failure is tied to one.
    pub fn option_name(&self) -> Option<&str> {
        match self {
            ResolveError::InvalidSchema { name, .. }
            | ResolveError::NoEnv { name, .. }
            | ResolveError::NoArg { name, .. }
            | ResolveError::Type { name, .. }
            | ResolveError::Required { name }
            | ResolveError::Enum { name, .. }
            | ResolveError::NaN { name } => Some(name.as_str()),
            ResolveError::InvalidDocument { .. }
            | ResolveError::NotObject { .. }
            | ResolveError::Custom(_) => None,
        }
    }

    /// Returns `true` for failures caused by the schema itself rather than
    /// by the supplied values.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            ResolveError::InvalidSchema { .. } | ResolveError::InvalidDocument { .. }
        )
    }
}

fn join_kinds(kinds: &[Kind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn join_values(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Convenience alias for results with [`ResolveError`].
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_error_lists_expected_kinds() {
        let err = ResolveError::Type {
            name: "port".to_string(),
            expected: vec![Kind::Number, Kind::String],
            value: Value::Bool(true),
        };
        assert_eq!(
            err.to_string(),
            "option 'port' expected number | string but received true"
        );
    }

    #[test]
    fn test_enum_error_lists_possible_values() {
        let err = ResolveError::Enum {
            name: "port".to_string(),
            value: Value::from(80),
            possible: vec![Value::from(2000), Value::from(3000)],
        };
        assert_eq!(
            err.to_string(),
            "option 'port' must be one of [2000, 3000] but received 80"
        );
        assert_eq!(err.code(), "enum");
    }

    #[test]
    fn test_custom_error_is_transparent() {
        let err = ResolveError::custom("port is reserved");
        assert_eq!(err.to_string(), "port is reserved");
        assert_eq!(err.option_name(), None);
    }
}

//! Capability interfaces for the three resolution steps.
//!
//! Each option is resolved by a [`Finder`] (pick a raw value from the
//! sources), a [`Parser`] (transform it) and a [`Validator`] (accept or reject
//! it). The resolver ships a default implementation of each; a
//! [`Definition`] may carry an override for any of them, which replaces the
//! default for that option only.
//!
//! Closures with matching signatures implement the traits directly:
//!
//! ```
//! use option_schema_core::{Definition, Kind, Map, ResolveError, Value, resolve};
//!
//! let schema = option_schema_core::Schema::new().option(
//!     "port",
//!     Definition::new()
//!         .with_type([Kind::Number])
//!         .with_parser(|value: Option<Value>, _def: &Definition| {
//!             Ok::<_, ResolveError>(value.map(|v| match v {
//!                 Value::String(s) => Value::Number(s.parse().unwrap_or(f64::NAN)),
//!                 other => other,
//!             }))
//!         }),
//! );
//!
//! let arg = Value::from([("port", "8080")].into_iter().collect::<Map>());
//! let options = resolve(&schema, Some(&arg), &Map::new(), None)
//!     .unwrap()
//!     .into_options()
//!     .unwrap();
//! assert_eq!(options.get("port"), Some(&Value::Number(8080.0)));
//! ```

use crate::{Definition, Map, Result, Value};

/// Inputs available when picking the raw value of one option.
#[derive(Debug, Clone, Copy)]
pub struct FindRequest<'a> {
    /// Option name as declared in the schema.
    pub name: &'a str,
    /// The option's definition.
    pub definition: &'a Definition,
    /// Argument object (after root coercion).
    pub arg: &'a Map,
    /// Environment mapping.
    pub env: &'a Map,
    /// Options resolved one level up.
    pub parent: &'a Map,
}

/// Picks the raw value for one option from the available sources.
pub trait Finder: Send + Sync {
    fn find(&self, request: &FindRequest<'_>) -> Result<Option<Value>>;
}

/// Transforms a found value before validation.
pub trait Parser: Send + Sync {
    fn parse(&self, value: Option<Value>, definition: &Definition) -> Result<Option<Value>>;
}

/// Accepts or rejects a parsed value.
///
/// `options` holds the options already resolved at the same level, in
/// declaration order.
pub trait Validator: Send + Sync {
    fn validate(
        &self,
        name: &str,
        value: Option<&Value>,
        definition: &Definition,
        options: &Map,
    ) -> Result<()>;
}

impl<F> Finder for F
where
    F: Fn(&FindRequest<'_>) -> Result<Option<Value>> + Send + Sync,
{
    fn find(&self, request: &FindRequest<'_>) -> Result<Option<Value>> {
        self(request)
    }
}

impl<F> Parser for F
where
    F: Fn(Option<Value>, &Definition) -> Result<Option<Value>> + Send + Sync,
{
    fn parse(&self, value: Option<Value>, definition: &Definition) -> Result<Option<Value>> {
        self(value, definition)
    }
}

impl<F> Validator for F
where
    F: Fn(&str, Option<&Value>, &Definition, &Map) -> Result<()> + Send + Sync,
{
    fn validate(
        &self,
        name: &str,
        value: Option<&Value>,
        definition: &Definition,
        options: &Map,
    ) -> Result<()> {
        self(name, value, definition, options)
    }
}

//! Schema type definitions.
//!
//! A [`Schema`] is an ordered list of option names, each with a
//! [`Definition`] describing where the option may be sourced from, its
//! default, and how it is validated. Definitions are plain immutable values;
//! the resolver never writes back into them.

use std::fmt;
use std::sync::Arc;

use crate::hooks::{Finder, Parser, Validator};
use crate::{Kind, Value};

/// Prefix of reserved schema entries that are never treated as options.
pub const CONTROL_PREFIX: &str = "__";

/// Document key naming the option that absorbs a non-object input.
pub const ROOT_KEY: &str = "__root";

/// Where an option may be read from within one source.
///
/// # Examples
///
/// ```
/// use option_schema_core::SourceKey;
///
/// assert_eq!(SourceKey::from(true), SourceKey::Own);
/// assert_eq!(SourceKey::from(false), SourceKey::Forbidden);
/// assert_eq!(SourceKey::from("port_number"), SourceKey::Renamed("port_number".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SourceKey {
    /// Use the option's own name.
    #[default]
    Own,
    /// The source may not supply this option.
    Forbidden,
    /// Use an alternate key.
    Renamed(String),
}

impl From<bool> for SourceKey {
    fn from(allowed: bool) -> Self {
        if allowed {
            SourceKey::Own
        } else {
            SourceKey::Forbidden
        }
    }
}

impl From<&str> for SourceKey {
    fn from(key: &str) -> Self {
        SourceKey::Renamed(key.to_string())
    }
}

impl From<String> for SourceKey {
    fn from(key: String) -> Self {
        SourceKey::Renamed(key)
    }
}

/// Ordered, de-duplicated set of admissible kinds.
///
/// # Examples
///
/// ```
/// use option_schema_core::{Kind, TypeSet};
///
/// let set = TypeSet::parse_names(["Number", "string", "number"]).unwrap();
/// assert_eq!(set.kinds(), &[Kind::Number, Kind::String]);
/// assert!(set.contains(Kind::String));
/// assert!(!set.contains(Kind::Boolean));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSet {
    kinds: Vec<Kind>,
}

impl TypeSet {
    pub fn new(kinds: impl IntoIterator<Item = Kind>) -> Self {
        let mut set = Vec::new();
        for kind in kinds {
            if !set.contains(&kind) {
                set.push(kind);
            }
        }
        Self { kinds: set }
    }

    /// Normalizes type names (case-insensitive, constructor-style accepted).
    pub fn parse_names<I, S>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kinds = names
            .into_iter()
            .map(|name| name.as_ref().parse::<Kind>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(kinds))
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> &[Kind] {
        &self.kinds
    }
}

impl From<Kind> for TypeSet {
    fn from(kind: Kind) -> Self {
        Self::new([kind])
    }
}

impl<const N: usize> From<[Kind; N]> for TypeSet {
    fn from(kinds: [Kind; N]) -> Self {
        Self::new(kinds)
    }
}

/// Per-option resolution rules.
///
/// Built with chained `with_*` methods; every field is optional.
///
/// # Examples
///
/// ```
/// use option_schema_core::{Definition, Kind, SourceKey, Value};
///
/// let def = Definition::new()
///     .with_env("HTTP_PORT")
///     .with_arg(false)
///     .with_type([Kind::Number])
///     .with_default(3000)
///     .required();
///
/// assert_eq!(def.env, SourceKey::Renamed("HTTP_PORT".into()));
/// assert_eq!(def.arg, SourceKey::Forbidden);
/// assert_eq!(def.default, Some(Value::Number(3000.0)));
/// assert!(def.required);
/// ```
#[derive(Clone, Default)]
pub struct Definition {
    /// Argument source key.
    pub arg: SourceKey,
    /// Environment source key (upper-cased before lookup).
    pub env: SourceKey,
    /// Inheritance source key.
    pub inherit: SourceKey,
    /// Fallback value when no source supplies one.
    pub default: Option<Value>,
    /// Merge an object value over an object default.
    pub extend: bool,
    /// Admissible kinds, if constrained.
    pub types: Option<TypeSet>,
    /// The value must be meaningfully present.
    pub required: bool,
    /// Admissible literal values, if constrained.
    pub allowed: Option<Vec<Value>>,
    /// Nested schema resolved after the flat pass.
    pub options: Option<Schema>,
    /// Override for the find step.
    pub finder: Option<Arc<dyn Finder>>,
    /// Override for the parse step.
    pub parser: Option<Arc<dyn Parser>>,
    /// Override for the validate step.
    pub validator: Option<Arc<dyn Validator>>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arg(mut self, key: impl Into<SourceKey>) -> Self {
        self.arg = key.into();
        self
    }

    pub fn with_env(mut self, key: impl Into<SourceKey>) -> Self {
        self.env = key.into();
        self
    }

    pub fn with_inherit(mut self, key: impl Into<SourceKey>) -> Self {
        self.inherit = key.into();
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Enables merging of object values over an object default.
    pub fn extend(mut self) -> Self {
        self.extend = true;
        self
    }

    pub fn with_type(mut self, types: impl Into<TypeSet>) -> Self {
        self.types = Some(types.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches a nested schema.
    pub fn with_options(mut self, schema: Schema) -> Self {
        self.options = Some(schema);
        self
    }

    pub fn with_finder(mut self, finder: impl Finder + 'static) -> Self {
        self.finder = Some(Arc::new(finder));
        self
    }

    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parser = Some(Arc::new(parser));
        self
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("arg", &self.arg)
            .field("env", &self.env)
            .field("inherit", &self.inherit)
            .field("default", &self.default)
            .field("extend", &self.extend)
            .field("types", &self.types)
            .field("required", &self.required)
            .field("allowed", &self.allowed)
            .field("options", &self.options)
            .field("finder", &self.finder.is_some())
            .field("parser", &self.parser.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Ordered option schema.
///
/// Declaration order decides output order and which options a later option
/// can inherit from.
///
/// # Examples
///
/// ```
/// use option_schema_core::{Definition, Schema};
///
/// let schema = Schema::new()
///     .root("port")
///     .option("port", Definition::new())
///     .option("host", Definition::new().with_default("localhost"));
///
/// assert_eq!(schema.root_key(), Some("port"));
/// assert_eq!(schema.names().collect::<Vec<_>>(), vec!["port", "host"]);
/// assert!(schema.get("host").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    root: Option<String>,
    entries: Vec<(String, Definition)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the option that absorbs a non-object input.
    pub fn root(mut self, name: impl Into<String>) -> Self {
        self.root = Some(name.into());
        self
    }

    /// Declares an option. Re-declaring a name replaces it in place.
    pub fn option(mut self, name: impl Into<String>, definition: Definition) -> Self {
        self.insert(name, definition);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: Definition) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = definition,
            None => self.entries.push((name, definition)),
        }
    }

    pub fn root_key(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }

    /// Declared entries in order, including control entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.entries.iter().map(|(name, def)| (name.as_str(), def))
    }

    /// Declared option names in order, control entries excluded.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries()
            .map(|(name, _)| name)
            .filter(|name| !is_control(name))
    }

    pub fn len(&self) -> usize {
        self.names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns `true` for reserved entries such as `__root`.
pub fn is_control(name: &str) -> bool {
    name.starts_with(CONTROL_PREFIX)
}

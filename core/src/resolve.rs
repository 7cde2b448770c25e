//! Schema-driven option resolution.
//!
//! Resolution of one schema level runs in two phases:
//!
//! 1. every declared option, in order, is found, parsed and validated, and
//!    the present results are collected into the level's options;
//! 2. every option carrying a nested schema is re-resolved from its raw
//!    argument value, inheriting from the complete phase-1 options.
//!
//! Non-object arguments are first wrapped under the schema's root key, and a
//! nested block whose raw argument is `false` resolves to `false` as a whole.
//!
//! # Examples
//!
//! ```
//! use option_schema_core::{Definition, Kind, Map, Schema, Value, resolve};
//!
//! let schema = Schema::new()
//!     .option("origin", Definition::new().with_type([Kind::String]))
//!     .option(
//!         "cors",
//!         Definition::new()
//!             .extend()
//!             .with_options(Schema::new().option("origin", Definition::new().with_inherit(true))),
//!     );
//!
//! let arg = Value::from([("origin", "https://x/")].into_iter().collect::<Map>());
//! let options = resolve(&schema, Some(&arg), &Map::new(), None)
//!     .unwrap()
//!     .into_options()
//!     .unwrap();
//!
//! assert_eq!(
//!     Value::Object(options).to_string(),
//!     r#"{"origin": "https://x/", "cors": {"origin": "https://x/"}}"#
//! );
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::ResolverConfig;
use crate::find::PrecedenceFinder;
use crate::hooks::{FindRequest, Finder, Parser, Validator};
use crate::types::is_control;
use crate::{DefaultValidator, ExtendMerger, Map, ResolveError, Result, Schema, Value};

/// Outcome of resolving one schema level.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The resolved options.
    Options(Map),
    /// The block was switched off by passing `false`.
    Disabled,
}

impl Resolution {
    /// Converts into the value stored for a nested block.
    pub fn into_value(self) -> Value {
        match self {
            Resolution::Options(options) => Value::Object(options),
            Resolution::Disabled => Value::Bool(false),
        }
    }

    /// Returns the resolved options, or `None` for a disabled block.
    pub fn into_options(self) -> Option<Map> {
        match self {
            Resolution::Options(options) => Some(options),
            Resolution::Disabled => None,
        }
    }

    /// Returns `true` when the block was switched off by `false`.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Resolution::Disabled)
    }
}

/// Resolves schemas against argument, environment and parent sources.
///
/// Holds the default implementation of each resolution step. Definitions may
/// override any step for a single option.
#[derive(Clone)]
pub struct Resolver {
    finder: Arc<dyn Finder>,
    parser: Arc<dyn Parser>,
    validator: Arc<dyn Validator>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a resolver whose default finder uses the configured platform
    /// and environment exemptions.
    pub fn from_config(config: &ResolverConfig) -> Self {
        let finder = PrecedenceFinder::new(config.platform(), config.env_exemptions.clone());
        Self {
            finder: Arc::new(finder),
            parser: Arc::new(ExtendMerger),
            validator: Arc::new(DefaultValidator),
        }
    }

    /// Replaces the default find step for every option.
    pub fn with_finder(mut self, finder: impl Finder + 'static) -> Self {
        self.finder = Arc::new(finder);
        self
    }

    /// Replaces the default parse step for every option.
    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parser = Arc::new(parser);
        self
    }

    /// Replaces the default validate step for every option.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Resolves `schema` against the given sources.
    ///
    /// `arg` defaults to an empty object. `parent` is only present for nested
    /// schemas; it is both the inheritance source and what allows a literal
    /// `false` argument to disable the block.
    ///
    /// # Errors
    ///
    /// Fails on the first option that cannot be resolved; see
    /// [`ResolveError`] for the failure classes.
    pub fn resolve(
        &self,
        schema: &Schema,
        arg: Option<&Value>,
        env: &Map,
        parent: Option<&Map>,
    ) -> Result<Resolution> {
        if parent.is_some() && matches!(arg, Some(Value::Bool(false))) {
            debug!("Block disabled by argument");
            return Ok(Resolution::Disabled);
        }

        let arg = coerce_root(schema, arg)?;
        let empty = Map::new();
        let parent = parent.unwrap_or(&empty);

        let mut options = self.resolve_flat(schema, &arg, env, parent)?;
        self.resolve_nested(schema, &arg, env, &mut options)?;

        Ok(Resolution::Options(options))
    }

    /// Phase 1: find, parse and validate every declared option in order.
    fn resolve_flat(&self, schema: &Schema, arg: &Map, env: &Map, parent: &Map) -> Result<Map> {
        let mut options = Map::new();

        for (name, definition) in schema.entries() {
            if is_control(name) {
                trace!(option = name, "Skipping control entry");
                continue;
            }

            let request = FindRequest {
                name,
                definition,
                arg,
                env,
                parent,
            };
            let finder = definition.finder.as_deref().unwrap_or(&*self.finder);
            let value = finder.find(&request)?;

            let parser = definition.parser.as_deref().unwrap_or(&*self.parser);
            let value = parser.parse(value, definition)?;

            let validator = definition.validator.as_deref().unwrap_or(&*self.validator);
            validator.validate(name, value.as_ref(), definition, &options)?;

            if let Some(value) = value {
                options.insert(name, value);
            }
        }

        Ok(options)
    }

    /// Phase 2: expand nested schemas with the flat options as parent.
    fn resolve_nested(
        &self,
        schema: &Schema,
        arg: &Map,
        env: &Map,
        options: &mut Map,
    ) -> Result<()> {
        for (name, definition) in schema.entries() {
            if is_control(name) {
                continue;
            }
            let Some(nested) = &definition.options else {
                continue;
            };
            debug!(option = name, "Resolving nested options");

            let parent = options.clone();
            let resolution = self.resolve(nested, arg.get(name), env, Some(&parent))?;
            options.insert(name, resolution.into_value());
        }

        // Blocks absent after phase 1 were appended; restore declaration order.
        let mut ordered = Map::new();
        for name in schema.names() {
            if let Some(value) = options.remove(name) {
                ordered.insert(name, value);
            }
        }
        *options = ordered;
        Ok(())
    }
}

/// Wraps a non-object argument under the schema's root key.
fn coerce_root(schema: &Schema, arg: Option<&Value>) -> Result<Map> {
    match arg {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(value) => {
            let Some(root) = schema.root_key() else {
                return Err(ResolveError::NotObject { kind: value.kind() });
            };
            let mut map = Map::new();
            map.insert(root, value.clone());
            Ok(map)
        }
    }
}

/// Resolves `schema` with the default [`Resolver`].
///
/// # Examples
///
/// ```
/// use option_schema_core::{Definition, Map, Schema, Value, resolve};
///
/// let schema = Schema::new().root("port").option("port", Definition::new());
/// let options = resolve(&schema, Some(&Value::from(3000)), &Map::new(), None)
///     .unwrap()
///     .into_options()
///     .unwrap();
/// assert_eq!(options.get("port"), Some(&Value::from(3000)));
/// ```
pub fn resolve(
    schema: &Schema,
    arg: Option<&Value>,
    env: &Map,
    parent: Option<&Map>,
) -> Result<Resolution> {
    Resolver::default().resolve(schema, arg, env, parent)
}

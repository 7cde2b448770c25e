//! Schema-driven option resolution.
//!
//! This crate turns a declarative [`Schema`] plus up to three raw sources
//! (explicit arguments, an environment mapping, and a parent option set)
//! into one validated options object:
//!
//! - [`Schema`] / [`Definition`]: ordered option declarations with source
//!   keys, defaults, `extend` merging, type/required/enum constraints and
//!   nested schemas.
//! - [`resolve`] / [`Resolver`]: the resolution pipeline. Values are picked
//!   by precedence (environment, then argument, then inheritance, then
//!   default), parsed, validated, and nested schemas are expanded in a second
//!   pass.
//! - [`Finder`], [`Parser`], [`Validator`]: the three step interfaces, with
//!   default implementations [`PrecedenceFinder`], [`ExtendMerger`] and
//!   [`DefaultValidator`], each overridable per option.
//! - [`Schema::from_json`]: loading schemas from JSON or YAML documents.
//!
//! # Example
//!
//! ```
//! use option_schema_core::*;
//!
//! let schema = Schema::new()
//!     .root("port")
//!     .option("port", Definition::new().with_type([Kind::Number]).with_default(3000))
//!     .option("host", Definition::new().with_env("HTTP_HOST").with_default("localhost"));
//!
//! let env: Map = [("PORT", 4000)].into_iter().collect();
//! let options = resolve(&schema, Some(&Value::from(8080)), &env, None)
//!     .unwrap()
//!     .into_options()
//!     .unwrap();
//!
//! // the environment outranks the argument
//! assert_eq!(options.get("port"), Some(&Value::from(4000)));
//! assert_eq!(options.get("host"), Some(&Value::from("localhost")));
//! ```

mod coerce;
mod config;
mod error;
mod extend;
mod find;
mod hooks;
mod load;
mod resolve;
mod types;
mod validate;
mod value;

pub use coerce::Coerce;
pub use config::ResolverConfig;
pub use error::{BoxError, ResolveError, Result};
pub use extend::ExtendMerger;
pub use find::{EnvExemption, PrecedenceFinder, SourcePlan, standard_exemptions};
pub use hooks::{FindRequest, Finder, Parser, Validator};
pub use resolve::{Resolution, Resolver, resolve};
pub use types::{CONTROL_PREFIX, Definition, ROOT_KEY, Schema, SourceKey, TypeSet, is_control};
pub use validate::DefaultValidator;
pub use value::{Kind, Map, Value};

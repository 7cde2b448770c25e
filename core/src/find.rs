//! Precedence-ordered value lookup.
//!
//! For each option the three [`SourceKey`]s of its definition are turned into
//! a [`SourcePlan`] of effective keys, and the first defined value of
//! `env[env_key]`, `arg[arg_key]`, `parent[inherit_key]`, `default` wins.
//!
//! A source marked [`SourceKey::Forbidden`] is skipped, but if it still
//! carries a value under the option's own key the caller tried to set the
//! option through a disallowed channel and resolution fails.
//!
//! # Examples
//!
//! ```
//! use option_schema_core::{Definition, Finder, FindRequest, Map, PrecedenceFinder, Value};
//!
//! let def = Definition::new().with_default(80);
//! let arg: Map = [("port", 3000)].into_iter().collect();
//! let env: Map = [("PORT", 4000)].into_iter().collect();
//! let parent = Map::new();
//!
//! let request = FindRequest { name: "port", definition: &def, arg: &arg, env: &env, parent: &parent };
//! let value = PrecedenceFinder::default().find(&request).unwrap();
//! assert_eq!(value, Some(Value::Number(4000.0)));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hooks::{FindRequest, Finder};
use crate::{Definition, ResolveError, Result, SourceKey, Value};

/// An environment key that may be present even when an option forbids the
/// environment source, because the platform defines it for unrelated reasons.
///
/// # Examples
///
/// ```
/// use option_schema_core::EnvExemption;
///
/// let exemption = EnvExemption::new("windows", "PUBLIC");
/// assert!(exemption.matches("windows", "public"));
/// assert!(!exemption.matches("linux", "PUBLIC"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvExemption {
    /// Platform name as reported by `std::env::consts::OS`.
    pub platform: String,
    /// Environment key, compared case-insensitively.
    pub key: String,
}

impl EnvExemption {
    pub fn new(platform: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            key: key.into(),
        }
    }

    pub fn matches(&self, platform: &str, key: &str) -> bool {
        self.platform.eq_ignore_ascii_case(platform) && self.key.eq_ignore_ascii_case(key)
    }
}

/// Exemptions applied when no configuration overrides them.
///
/// Windows defines `PUBLIC` as the shared user profile directory.
pub fn standard_exemptions() -> Vec<EnvExemption> {
    vec![EnvExemption::new("windows", "PUBLIC")]
}

/// Effective lookup keys for one option. `None` marks a forbidden source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePlan {
    pub env: Option<String>,
    pub arg: Option<String>,
    pub inherit: Option<String>,
}

impl SourcePlan {
    /// Derives the effective keys of `definition` for the option `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_schema_core::{Definition, SourcePlan};
    ///
    /// let def = Definition::new().with_env("port_number").with_inherit(false);
    /// let plan = SourcePlan::for_option("port", &def);
    /// assert_eq!(plan.env.as_deref(), Some("PORT_NUMBER"));
    /// assert_eq!(plan.arg.as_deref(), Some("port"));
    /// assert_eq!(plan.inherit, None);
    /// ```
    pub fn for_option(name: &str, definition: &Definition) -> Self {
        Self {
            env: effective_key(name, &definition.env).map(|key| key.to_uppercase()),
            arg: effective_key(name, &definition.arg),
            inherit: effective_key(name, &definition.inherit),
        }
    }
}

fn effective_key(name: &str, source: &SourceKey) -> Option<String> {
    match source {
        SourceKey::Own => Some(name.to_string()),
        SourceKey::Forbidden => None,
        SourceKey::Renamed(key) => Some(key.clone()),
    }
}

/// Default [`Finder`]: environment, then argument, then inheritance, then
/// default.
#[derive(Debug, Clone)]
pub struct PrecedenceFinder {
    platform: String,
    exemptions: Vec<EnvExemption>,
}

impl Default for PrecedenceFinder {
    fn default() -> Self {
        Self::new(std::env::consts::OS, standard_exemptions())
    }
}

impl PrecedenceFinder {
    pub fn new(platform: impl Into<String>, exemptions: Vec<EnvExemption>) -> Self {
        Self {
            platform: platform.into(),
            exemptions,
        }
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn exemptions(&self) -> &[EnvExemption] {
        &self.exemptions
    }

    fn is_exempt(&self, key: &str) -> bool {
        self.exemptions
            .iter()
            .any(|exemption| exemption.matches(&self.platform, key))
    }

    /// Fails when a forbidden source still carries the option's own key.
    fn check_forbidden(&self, request: &FindRequest<'_>) -> Result<()> {
        let name = request.name;
        let definition = request.definition;

        if definition.env == SourceKey::Forbidden {
            let key = name.to_uppercase();
            if request.env.contains_key(&key) && !self.is_exempt(&key) {
                return Err(ResolveError::NoEnv {
                    name: name.to_string(),
                    key,
                });
            }
        }

        if definition.arg == SourceKey::Forbidden && request.arg.contains_key(name) {
            return Err(ResolveError::NoArg {
                name: name.to_string(),
                key: name.to_string(),
            });
        }

        Ok(())
    }
}

impl Finder for PrecedenceFinder {
    fn find(&self, request: &FindRequest<'_>) -> Result<Option<Value>> {
        self.check_forbidden(request)?;

        let plan = SourcePlan::for_option(request.name, request.definition);
        let candidates = [
            ("env", plan.env.as_deref().and_then(|k| request.env.get(k))),
            ("arg", plan.arg.as_deref().and_then(|k| request.arg.get(k))),
            (
                "inherit",
                plan.inherit.as_deref().and_then(|k| request.parent.get(k)),
            ),
            ("default", request.definition.default.as_ref()),
        ];

        let found = candidates
            .into_iter()
            .find_map(|(source, value)| value.map(|value| (source, value)));

        match found {
            Some((source, value)) => {
                debug!(option = request.name, source, "Found option value");
                Ok(Some(value.clone()))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Map;

    fn find(
        finder: &PrecedenceFinder,
        name: &str,
        def: &Definition,
        arg: &Map,
        env: &Map,
        parent: &Map,
    ) -> Result<Option<Value>> {
        finder.find(&FindRequest {
            name,
            definition: def,
            arg,
            env,
            parent,
        })
    }

    #[test]
    fn test_precedence_env_arg_inherit_default() {
        let finder = PrecedenceFinder::default();
        let def = Definition::new().with_default(1);
        let env: Map = [("PORT", 4)].into_iter().collect();
        let arg: Map = [("port", 3)].into_iter().collect();
        let parent: Map = [("port", 2)].into_iter().collect();
        let empty = Map::new();

        let pick = |arg: &Map, env: &Map, parent: &Map| {
            find(&finder, "port", &def, arg, env, parent)
                .unwrap()
                .and_then(|v| v.as_f64())
        };

        assert_eq!(pick(&arg, &env, &parent), Some(4.0));
        assert_eq!(pick(&arg, &empty, &parent), Some(3.0));
        assert_eq!(pick(&empty, &empty, &parent), Some(2.0));
        assert_eq!(pick(&empty, &empty, &empty), Some(1.0));
    }

    #[test]
    fn test_absent_everywhere_is_none() {
        let finder = PrecedenceFinder::default();
        let empty = Map::new();
        let value = find(&finder, "port", &Definition::new(), &empty, &empty, &empty).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_forbidden_env_with_value_fails() {
        let finder = PrecedenceFinder::new("linux", standard_exemptions());
        let def = Definition::new().with_env(false);
        let env: Map = [("PORT", 3000)].into_iter().collect();
        let empty = Map::new();

        let err = find(&finder, "port", &def, &empty, &env, &empty).unwrap_err();
        assert!(matches!(err, ResolveError::NoEnv { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn test_forbidden_arg_with_value_fails() {
        let finder = PrecedenceFinder::default();
        let def = Definition::new().with_arg(false);
        let arg: Map = [("port", 3000)].into_iter().collect();
        let empty = Map::new();

        let err = find(&finder, "port", &def, &arg, &empty, &empty).unwrap_err();
        assert_eq!(err.code(), "noarg");
    }

    #[test]
    fn test_forbidden_source_does_not_consult_renamed_key() {
        let finder = PrecedenceFinder::default();
        let def = Definition::new().with_arg(false);
        let arg: Map = [("port_number", 3000)].into_iter().collect();
        let empty = Map::new();

        let value = find(&finder, "port", &def, &arg, &empty, &empty).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_exempt_env_key_is_ignored_on_matching_platform() {
        let def = Definition::new().with_env(false).with_default("dist");
        let env: Map = [("PUBLIC", "C:\\Users\\Public")].into_iter().collect();
        let empty = Map::new();

        let windows = PrecedenceFinder::new("windows", standard_exemptions());
        let value = find(&windows, "public", &def, &empty, &env, &empty).unwrap();
        assert_eq!(value, Some(Value::from("dist")));

        let linux = PrecedenceFinder::new("linux", standard_exemptions());
        assert!(find(&linux, "public", &def, &empty, &env, &empty).is_err());
    }

    #[test]
    fn test_renamed_env_key_is_upper_cased() {
        let finder = PrecedenceFinder::default();
        let def = Definition::new().with_env("port_number");
        let env: Map = [("PORT_NUMBER", 3000)].into_iter().collect();
        let empty = Map::new();

        let value = find(&finder, "port", &def, &empty, &env, &empty).unwrap();
        assert_eq!(value, Some(Value::from(3000)));
    }
}

//! Loading schemas from declarative documents.
//!
//! A schema document is an object mapping option names to definition
//! objects, with an optional `__root` entry naming the root option. Other
//! `__`-prefixed entries are ignored. Documents cannot hold closures, so the
//! `parse` field selects one of the built-in [`Coerce`] steps.
//!
//! # Example YAML
//!
//! ```yaml
//! __root: port
//! port:
//!   type: number
//!   env: PORT_NUMBER
//!   parse: number
//!   default: 3000
//! cors:
//!   extend: true
//!   default: { origin: "*" }
//!   options:
//!     origin: { inherit: true }
//! ```
//!
//! # Examples
//!
//! ```
//! use option_schema_core::{Kind, Schema, SourceKey};
//!
//! let schema = Schema::from_json(&serde_json::json!({
//!     "__root": "port",
//!     "port": { "type": "Number", "arg": "port_number", "env": false },
//! }))
//! .unwrap();
//!
//! let port = schema.get("port").unwrap();
//! assert_eq!(schema.root_key(), Some("port"));
//! assert_eq!(port.arg, SourceKey::Renamed("port_number".into()));
//! assert_eq!(port.env, SourceKey::Forbidden);
//! assert_eq!(port.types.as_ref().unwrap().kinds(), &[Kind::Number]);
//! ```

use serde::{Deserialize, Deserializer};
use serde_json::Value as Json;

use crate::types::{ROOT_KEY, is_control};
use crate::{Coerce, Definition, ResolveError, Result, Schema, SourceKey, TypeSet, Value};

const DEFINITION_FIELDS: &[&str] = &[
    "arg", "env", "inherit", "default", "extend", "type", "required", "enum", "parse", "options",
];

impl Schema {
    /// Builds a schema from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidDocument`] when the document is not an
    /// object, and [`ResolveError::InvalidSchema`] when a definition is not an
    /// object or a definition field has the wrong shape.
    pub fn from_json(document: &Json) -> Result<Self> {
        let Json::Object(entries) = document else {
            return Err(ResolveError::InvalidDocument {
                reason: format!("expected an object, found {}", Value::from(document).kind()),
            });
        };

        let mut schema = Schema::new();
        for (name, raw) in entries {
            if name == ROOT_KEY {
                let root = raw
                    .as_str()
                    .ok_or_else(|| invalid(name, "root key must be a string"))?;
                schema = schema.root(root);
                continue;
            }
            if is_control(name) {
                continue;
            }
            schema.insert(name.clone(), definition_from_json(name, raw)?);
        }
        Ok(schema)
    }
}

impl TryFrom<Json> for Schema {
    type Error = ResolveError;

    fn try_from(document: Json) -> Result<Self> {
        Schema::from_json(&document)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let document = Json::deserialize(deserializer)?;
        Schema::from_json(&document).map_err(serde::de::Error::custom)
    }
}

fn definition_from_json(name: &str, raw: &Json) -> Result<Definition> {
    let Json::Object(fields) = raw else {
        return Err(invalid(name, &format!("expected an object, found {raw}")));
    };

    if let Some(unknown) = fields
        .keys()
        .find(|field| !DEFINITION_FIELDS.contains(&field.as_str()))
    {
        return Err(invalid(name, &format!("unknown field '{unknown}'")));
    }

    let mut def = Definition::new();
    for (field, value) in fields {
        match field.as_str() {
            "arg" => def.arg = source_key(name, field, value)?,
            "env" => def.env = source_key(name, field, value)?,
            "inherit" => def.inherit = source_key(name, field, value)?,
            "default" => def.default = Some(Value::from(value)),
            "extend" => def.extend = flag(name, field, value)?,
            "required" => def.required = flag(name, field, value)?,
            "type" => def.types = Some(type_set(name, value)?),
            "enum" => {
                let Json::Array(items) = value else {
                    return Err(invalid(name, "'enum' must be an array"));
                };
                def.allowed = Some(items.iter().map(Value::from).collect());
            }
            "parse" => {
                let step = value
                    .as_str()
                    .ok_or_else(|| invalid(name, "'parse' must be a string"))?
                    .parse::<Coerce>()
                    .map_err(|reason| invalid(name, &reason))?;
                def = def.with_parser(step);
            }
            "options" => {
                if !value.is_object() {
                    return Err(invalid(name, "'options' must be an object"));
                }
                def.options = Some(Schema::from_json(value)?);
            }
            _ => {}
        }
    }
    Ok(def)
}

fn source_key(name: &str, field: &str, value: &Json) -> Result<SourceKey> {
    match value {
        Json::Bool(allowed) => Ok(SourceKey::from(*allowed)),
        Json::String(key) if !key.is_empty() => Ok(SourceKey::Renamed(key.clone())),
        _ => Err(invalid(
            name,
            &format!("'{field}' must be a boolean or a non-empty string"),
        )),
    }
}

fn flag(name: &str, field: &str, value: &Json) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(name, &format!("'{field}' must be a boolean")))
}

fn type_set(name: &str, value: &Json) -> Result<TypeSet> {
    let names: Vec<&str> = match value {
        Json::String(single) => vec![single.as_str()],
        Json::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| invalid(name, "'type' entries must be strings"))
            })
            .collect::<Result<_>>()?,
        _ => return Err(invalid(name, "'type' must be a string or an array")),
    };
    TypeSet::parse_names(names).map_err(|reason| invalid(name, &reason))
}

fn invalid(name: &str, reason: &str) -> ResolveError {
    ResolveError::InvalidSchema {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

//! TOML declaration manifests.
//!
//! A manifest describes a parameter set without code:
//!
//! ```toml
//! program = "unit.exe"
//! delimiters = ["-", "/"]
//!
//! [default]
//! value_description = "filename"
//! type = "string"
//!
//! [[parameter]]
//! name = "pages"
//! type = "integer"
//! array = true
//! mandatory = true
//! value_description = "number"
//! description = "page numbers"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::accessor::ParameterType;
use crate::binder::{BindOptions, DEFAULT_DELIMITER};
use crate::error::{ArgError, Result};
use crate::interpreter::Interpreter;
use crate::registry::{ParameterRegistry, ParameterSpec};
use crate::value::{coerce, Arity, TypeTag, TypedValue, ValueKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Program name shown at the start of the usage line
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default = "default_delimiters")]
    pub delimiters: Vec<char>,
    #[serde(default)]
    pub default: Option<DefaultDecl>,
    #[serde(default, rename = "parameter")]
    pub parameters: Vec<ParameterDecl>,
}

/// The positional parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultDecl {
    #[serde(default)]
    pub value_description: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub value_description: String,
    #[serde(default)]
    pub default: Option<toml::Value>,
}

fn default_delimiters() -> Vec<char> {
    vec![DEFAULT_DELIMITER]
}

fn tag_of(kind: ValueKind, array: bool) -> TypeTag {
    TypeTag::new(kind, if array { Arity::Array } else { Arity::Scalar })
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ArgError::Manifest(format!("Failed to read manifest: {}", e)))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ArgError::Manifest(format!("Failed to parse manifest: {}", e)))
    }

    pub fn bind_options(&self) -> Result<BindOptions> {
        if self.delimiters.is_empty() {
            return Err(ArgError::Manifest(
                "At least one delimiter is required".to_string(),
            ));
        }
        Ok(BindOptions::with_delimiters(self.delimiters.iter().copied()))
    }

    /// Declare every parameter of the manifest in a fresh registry, default
    /// parameter first.
    pub fn registry(&self) -> Result<ParameterRegistry> {
        let mut registry = ParameterRegistry::new();

        if let Some(default) = &self.default {
            registry.declare(
                ParameterSpec::new("", tag_of(default.kind, default.array))
                    .value_description(&default.value_description)
                    .description(&default.description)
                    .mandatory(default.mandatory),
            )?;
        }

        for decl in &self.parameters {
            if decl.name.is_empty() {
                return Err(ArgError::Manifest(
                    "Parameter without a name; use the [default] table for the positional parameter"
                        .to_string(),
                ));
            }
            let tag = tag_of(decl.kind, decl.array);
            let mut spec = ParameterSpec::new(&decl.name, tag)
                .mandatory(decl.mandatory)
                .description(&decl.description)
                .example(&decl.example)
                .value_description(&decl.value_description);
            if let Some(value) = &decl.default {
                spec = spec.default_value(default_value(&decl.name, value, tag)?);
            }
            registry.declare(spec)?;
        }

        Ok(registry)
    }

    pub fn interpreter(&self) -> Result<Interpreter> {
        Ok(Interpreter::from_registry(self.registry()?, self.bind_options()?))
    }

    /// Program name for usage output, falling back to `fallback`.
    pub fn program_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.program.as_deref().unwrap_or(fallback)
    }
}

fn default_value(name: &str, value: &toml::Value, tag: TypeTag) -> Result<TypedValue> {
    let converted = match (tag.arity, value) {
        (Arity::Array, toml::Value::Array(items)) => array_value(items, tag.kind),
        (Arity::Scalar, value) => scalar_value(value, tag.kind),
        (Arity::Array, _) => None,
    };

    converted.ok_or_else(|| {
        ArgError::Manifest(format!(
            "Default value {} for '{}' is not a valid {}",
            value, name, tag
        ))
    })
}

fn scalar_value(value: &toml::Value, kind: ValueKind) -> Option<TypedValue> {
    match (kind, value) {
        (ValueKind::Boolean, toml::Value::Boolean(b)) => Some(TypedValue::Bool(*b)),
        (ValueKind::Integer, toml::Value::Integer(i)) => Some(TypedValue::Int(*i)),
        (ValueKind::Float, toml::Value::Float(f)) => Some(TypedValue::Float(*f)),
        (ValueKind::Float, toml::Value::Integer(i)) => Some(TypedValue::Float(*i as f64)),
        (ValueKind::String, toml::Value::String(s)) => Some(TypedValue::Str(s.clone())),
        (ValueKind::DateTime, toml::Value::String(s)) => coerce(s, TypeTag::scalar(kind)).ok(),
        (ValueKind::DateTime, toml::Value::Datetime(d)) => {
            coerce(&d.to_string(), TypeTag::scalar(kind)).ok()
        }
        _ => None,
    }
}

fn array_value(items: &[toml::Value], kind: ValueKind) -> Option<TypedValue> {
    let values = items
        .iter()
        .map(|item| scalar_value(item, kind))
        .collect::<Option<Vec<_>>>()?;

    match kind {
        ValueKind::Boolean => None,
        ValueKind::Integer => gather::<i64>(&values).map(ParameterType::into_value),
        ValueKind::Float => gather::<f64>(&values).map(ParameterType::into_value),
        ValueKind::String => gather::<String>(&values).map(ParameterType::into_value),
        ValueKind::DateTime => {
            gather::<chrono::NaiveDateTime>(&values).map(ParameterType::into_value)
        }
    }
}

fn gather<T: ParameterType>(values: &[TypedValue]) -> Option<Vec<T>> {
    values.iter().map(T::from_value).collect()
}

//! Parameter declarations.
//!
//! The registry owns every [`ParameterSpec`] in declaration order and indexes
//! them by lower-cased name. Declarations are validated when they are made:
//! a broken declaration is a programming mistake in the embedding
//! application and surfaces as [`ArgError::Configuration`], never as a parse
//! error.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::{ArgError, Result};
use crate::value::{Arity, TypeTag, TypedValue, ValueKind};

/// Name under which the positional parameter is reported, e.g. in
/// [`ParameterRegistry::to_json`]. No named parameter may use it.
pub const POSITIONAL_KEY: &str = "default";

/// Declaration of one parameter plus its bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    name: String,
    tag: TypeTag,
    mandatory: bool,
    description: String,
    example: String,
    value_description: String,
    default_value: Option<TypedValue>,
    value: Option<TypedValue>,
}

impl ParameterSpec {
    /// Start a declaration. An empty `name` declares the positional parameter.
    pub fn new(name: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            tag,
            mandatory: false,
            description: String::new(),
            example: String::new(),
            value_description: String::new(),
            default_value: None,
            value: None,
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, TypeTag::scalar(ValueKind::Boolean))
    }

    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn value_description(mut self, value_description: impl Into<String>) -> Self {
        self.value_description = value_description.into();
        self
    }

    pub fn default_value(mut self, value: TypedValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used in messages; the positional parameter has none of its own.
    pub fn label(&self) -> &str {
        match (self.name.is_empty(), self.value_description.is_empty()) {
            (false, _) => &self.name,
            (true, false) => &self.value_description,
            (true, true) => "default",
        }
    }

    pub fn type_tag(&self) -> TypeTag {
        self.tag
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn is_positional(&self) -> bool {
        self.name.is_empty()
    }

    pub fn is_array(&self) -> bool {
        self.tag.is_array()
    }

    pub fn is_flag(&self) -> bool {
        self.tag.is_flag()
    }

    pub fn description_text(&self) -> &str {
        &self.description
    }

    pub fn example_text(&self) -> &str {
        &self.example
    }

    pub fn value_description_text(&self) -> &str {
        &self.value_description
    }

    pub fn default(&self) -> Option<&TypedValue> {
        self.default_value.as_ref()
    }

    /// The value bound by the last successful pass, if any.
    pub fn value(&self) -> Option<&TypedValue> {
        self.value.as_ref()
    }

    /// Bound value, falling back to the declared default.
    pub fn effective_value(&self) -> Option<&TypedValue> {
        self.value.as_ref().or(self.default_value.as_ref())
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    fn validate(&self) -> Result<()> {
        if self.name.eq_ignore_ascii_case(POSITIONAL_KEY) {
            return Err(ArgError::Configuration(format!(
                "Name '{}' is reserved for the default parameter",
                self.name
            )));
        }
        if self.tag.kind == ValueKind::Boolean && self.tag.arity == Arity::Array {
            return Err(ArgError::Configuration(format!(
                "Flag '{}' cannot hold an array",
                self.label()
            )));
        }
        if self.is_positional() && self.is_flag() {
            return Err(ArgError::Configuration(
                "Default parameter cannot be a flag".to_string(),
            ));
        }
        if let Some(default) = &self.default_value {
            if default.type_tag() != self.tag {
                return Err(ArgError::Configuration(format!(
                    "Default value for '{}' is {}, declared {}",
                    self.label(),
                    default.type_tag(),
                    self.tag
                )));
            }
        }
        Ok(())
    }
}

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(0);

/// Ordered, case-insensitive collection of parameter declarations.
///
/// Clones keep the id, so typed handles stay valid on a cloned registry.
#[derive(Debug, Clone)]
pub struct ParameterRegistry {
    id: u64,
    parameters: Vec<ParameterSpec>,
    index: HashMap<String, usize>,
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            parameters: Vec::new(),
            index: HashMap::new(),
        }
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully built declaration.
    pub fn declare(&mut self, spec: ParameterSpec) -> Result<()> {
        self.insert(spec).map(|_| ())
    }

    pub fn declare_parameter(
        &mut self,
        name: &str,
        tag: TypeTag,
        mandatory: bool,
        description: &str,
        example: &str,
        default: Option<TypedValue>,
    ) -> Result<()> {
        let mut spec = ParameterSpec::new(name, tag)
            .mandatory(mandatory)
            .description(description)
            .example(example);
        spec.default_value = default;
        self.declare(spec)
    }

    pub fn declare_flag(&mut self, name: &str, description: &str) -> Result<()> {
        self.declare(ParameterSpec::flag(name).description(description))
    }

    /// Register the positional parameter bound from leading bare tokens.
    pub fn declare_default(&mut self, value_description: &str, tag: TypeTag) -> Result<()> {
        self.declare(ParameterSpec::new("", tag).value_description(value_description))
    }

    pub(crate) fn insert(&mut self, spec: ParameterSpec) -> Result<usize> {
        spec.validate()?;
        let key = key(spec.name());
        if self.index.contains_key(&key) {
            let message = if spec.is_positional() {
                "Default parameter already registered".to_string()
            } else {
                format!("Argument '{}' already registered", spec.name())
            };
            return Err(ArgError::Configuration(message));
        }

        debug!(parameter = spec.label(), tag = %spec.type_tag(), mandatory = spec.is_mandatory(), "declared parameter");

        let position = self.parameters.len();
        self.parameters.push(spec);
        self.index.insert(key, position);
        Ok(position)
    }

    /// Find a declaration by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.position(name).map(|i| &self.parameters[i])
    }

    pub fn lookup(&self, name: &str) -> Result<&ParameterSpec> {
        self.get(name)
            .ok_or_else(|| ArgError::UnknownParameter(name.to_string()))
    }

    pub fn default_parameter(&self) -> Option<&ParameterSpec> {
        self.get("")
    }

    /// Declarations in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn all_mandatory_satisfied(&self) -> bool {
        self.parameters.iter().all(|p| !p.mandatory || p.is_set())
    }

    /// Labels of every mandatory parameter without a bound value.
    pub fn missing_mandatory(&self) -> Vec<String> {
        self.parameters
            .iter()
            .filter(|p| p.mandatory && !p.is_set())
            .map(|p| p.label().to_string())
            .collect()
    }

    /// Fails with every unset mandatory parameter named in one error.
    pub fn check_mandatory(&self) -> Result<()> {
        let missing = self.missing_mandatory();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ArgError::MandatoryParameterMissing(missing))
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&key(name)).copied()
    }

    pub(crate) fn at(&self, position: usize) -> &ParameterSpec {
        &self.parameters[position]
    }

    pub(crate) fn try_at(&self, position: usize) -> Option<&ParameterSpec> {
        self.parameters.get(position)
    }

    pub(crate) fn clear_values(&mut self) {
        for parameter in &mut self.parameters {
            parameter.value = None;
        }
    }

    pub(crate) fn set_value(&mut self, position: usize, value: TypedValue) {
        self.parameters[position].value = Some(value);
    }
}

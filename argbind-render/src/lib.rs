//! Presentation of declared parameters and bound values.
//!
//! [`HelpData`] is a read-only snapshot of a registry's declarations. A
//! [`Renderer`] turns it into usage text, and turns the JSON snapshot of
//! bound values into output text.

use anyhow::Result;
use argbind_core::{ParameterRegistry, ParameterSpec};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod cli;

pub use cli::CliRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Pretty,
    Raw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpData {
    pub program: String,
    pub parameters: Vec<ParameterHelp>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterHelp {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub flag: bool,
    pub array: bool,
    pub mandatory: bool,
    pub description: String,
    pub example: String,
    pub value_description: String,
}

impl From<&ParameterSpec> for ParameterHelp {
    fn from(spec: &ParameterSpec) -> Self {
        Self {
            name: spec.name().to_string(),
            type_name: spec.type_tag().to_string(),
            flag: spec.is_flag(),
            array: spec.is_array(),
            mandatory: spec.is_mandatory(),
            description: spec.description_text().to_string(),
            example: spec.example_text().to_string(),
            value_description: spec.value_description_text().to_string(),
        }
    }
}

impl ParameterHelp {
    pub fn is_positional(&self) -> bool {
        self.name.is_empty()
    }

    /// `vd`, or `vd vd...` for arrays
    pub fn placeholder(&self) -> String {
        let vd = &self.value_description;
        if self.array {
            format!("{} {}...", vd, vd)
        } else {
            vd.clone()
        }
    }

    /// `-name`, `-name vd` or `-name vd vd...`
    pub fn synopsis(&self) -> String {
        if self.flag {
            format!("-{}", self.name)
        } else {
            format!("-{} {}", self.name, self.placeholder())
        }
    }
}

impl HelpData {
    pub fn from_registry(program: &str, registry: &ParameterRegistry) -> Self {
        Self {
            program: program.to_string(),
            parameters: registry.iter().map(ParameterHelp::from).collect(),
        }
    }

    pub fn named(&self) -> impl Iterator<Item = &ParameterHelp> {
        self.parameters.iter().filter(|p| !p.is_positional())
    }
}

/// `PROGRAM positional [-optional vd] -mandatory vd vd...`
///
/// The positional parameter is never bracketed, optional or not.
pub fn usage_line(help: &HelpData) -> String {
    let mut parts = vec![help.program.to_uppercase()];
    for parameter in &help.parameters {
        if parameter.is_positional() {
            parts.push(parameter.placeholder());
        } else if parameter.mandatory {
            parts.push(parameter.synopsis());
        } else {
            parts.push(format!("[{}]", parameter.synopsis()));
        }
    }
    parts.join(" ")
}

/// A newline, then one `\t-name vd\tdescription` line per named parameter.
pub fn help_table(help: &HelpData) -> String {
    let mut output = String::from("\n");
    for parameter in help.named() {
        output.push_str(&format!(
            "\t-{} {}\t{}\n",
            parameter.name, parameter.value_description, parameter.description
        ));
    }
    output
}

pub trait Renderer {
    fn render_usage(&self, help: &HelpData) -> Result<String>;

    fn render(&self, value: &Value, display: &DisplayType) -> Result<String> {
        match display {
            DisplayType::Pretty => Ok(serde_json::to_string_pretty(value)?),
            DisplayType::Raw => Ok(serde_json::to_string(value)?),
        }
    }
}

/// Uncolored output.
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render_usage(&self, help: &HelpData) -> Result<String> {
        Ok(format!("{}{}", usage_line(help), help_table(help)))
    }
}

//! Fluent front door over the registry and the binder.
//!
//! An [`Interpreter`] owns one registry, the argument vector and an optional
//! error handler. [`Interpreter::run`] performs one binding pass followed by
//! the mandatory check.

use std::fmt;

use tracing::debug;

use crate::accessor::ParameterType;
use crate::binder::BindOptions;
use crate::error::{ArgError, Result};
use crate::registry::{ParameterRegistry, ParameterSpec};
use crate::value::TypeTag;

/// Receives binding errors instead of the caller.
pub type ErrorHandler = Box<dyn Fn(&ArgError)>;

/// How a successful [`Interpreter::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every token was bound and all mandatory parameters are set
    Bound,
    /// The pass was aborted and the error went to the injected handler
    Handled,
}

#[derive(Default)]
pub struct Interpreter {
    registry: ParameterRegistry,
    arguments: Vec<String>,
    options: BindOptions,
    on_error: Option<ErrorHandler>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already populated registry, e.g. one built from a manifest.
    pub fn from_registry(registry: ParameterRegistry, options: BindOptions) -> Self {
        Self {
            registry,
            options,
            ..Self::default()
        }
    }

    pub fn declare(mut self, spec: ParameterSpec) -> Result<Self> {
        self.registry.declare(spec)?;
        Ok(self)
    }

    pub fn flag(self, name: &str, help: &str) -> Result<Self> {
        self.declare(ParameterSpec::flag(name).description(help))
    }

    pub fn parameter<T: ParameterType>(self, name: &str, example: &str, help: &str) -> Result<Self> {
        self.declare(
            ParameterSpec::new(name, T::TAG)
                .example(example)
                .description(help),
        )
    }

    pub fn mandatory<T: ParameterType>(self, name: &str, example: &str, help: &str) -> Result<Self> {
        self.declare(
            ParameterSpec::new(name, T::TAG)
                .example(example)
                .description(help)
                .mandatory(true),
        )
    }

    pub fn default_parameter(self, value_description: &str, tag: TypeTag) -> Result<Self> {
        self.declare(ParameterSpec::new("", tag).value_description(value_description))
    }

    pub fn delimiters(mut self, delimiters: impl IntoIterator<Item = char>) -> Self {
        self.options = BindOptions::with_delimiters(delimiters);
        self
    }

    /// Append tokens to the argument vector.
    pub fn arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Append a whole command line, split on whitespace. No quoting rules apply.
    pub fn argument_line(self, line: &str) -> Self {
        self.arguments(line.split_whitespace())
    }

    pub fn on_error(mut self, handler: impl Fn(&ArgError) + 'static) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// Bind the arguments, then verify mandatory parameters.
    ///
    /// Binding errors go to the error handler when one is set and the run
    /// ends with [`RunOutcome::Handled`]; without a handler they are
    /// returned. A missing mandatory parameter is always returned.
    pub fn run(&mut self) -> Result<RunOutcome> {
        if let Err(err) = self.registry.bind(self.arguments.as_slice(), &self.options) {
            return match &self.on_error {
                Some(handler) => {
                    debug!(error = %err, "binding failed, passing to error handler");
                    handler(&err);
                    Ok(RunOutcome::Handled)
                }
                None => Err(err),
            };
        }

        self.registry.check_mandatory()?;
        Ok(RunOutcome::Bound)
    }

    pub fn value<T: ParameterType>(&self, name: &str) -> Result<T> {
        self.registry.get_value(name)
    }

    pub fn registry(&self) -> &ParameterRegistry {
        &self.registry
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("registry", &self.registry)
            .field("arguments", &self.arguments)
            .field("options", &self.options)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

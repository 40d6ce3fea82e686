//! Error types for the argbind engine.

use thiserror::Error;

use crate::value::TypeTag;

/// Main error type for declaring, binding and reading parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgError {
    /// A declaration broke a registry rule (duplicate name, second default
    /// parameter, boolean array, mistyped default value)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A delimiter-prefixed token named a parameter that was never declared
    #[error("Not registered argument passed '{0}'")]
    UnregisteredArgument(String),

    /// A value token could not be coerced to the parameter's type
    #[error("Value '{token}' for argument '{parameter}' is not a valid {expected}")]
    TypeMismatch {
        parameter: String,
        token: String,
        expected: TypeTag,
    },

    /// A scalar or array parameter was not followed by any value token
    #[error("Missing values after argument '{0}'")]
    MissingValue(String),

    /// A bare token followed a parameter that takes no further values
    #[error("Unexpected value '{token}' behind argument '{parameter}'")]
    UnexpectedValue { token: String, parameter: String },

    /// Raised after a complete binding pass, naming every unset mandatory parameter
    #[error("Mandatory parameters {} are missing", .0.join(","))]
    MandatoryParameterMissing(Vec<String>),

    /// A typed read asked for a type the parameter was not declared with
    #[error("Parameter '{parameter}' holds {declared}, requested {requested}")]
    TypeRequestMismatch {
        parameter: String,
        declared: TypeTag,
        requested: TypeTag,
    },

    /// A read or lookup named a parameter that was never declared
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// A typed handle was used with a registry that did not issue it
    #[error("Parameter handle belongs to another registry")]
    ForeignHandle,

    /// The declaration manifest could not be read or understood
    #[error("Invalid manifest: {0}")]
    Manifest(String),
}

impl ArgError {
    /// True for the errors that abort a binding pass and may be routed to an
    /// injected error handler.
    pub fn is_binding_error(&self) -> bool {
        matches!(
            self,
            ArgError::UnregisteredArgument(_)
                | ArgError::TypeMismatch { .. }
                | ArgError::MissingValue(_)
                | ArgError::UnexpectedValue { .. }
        )
    }
}

/// Result type alias for argbind operations
pub type Result<T> = std::result::Result<T, ArgError>;

impl From<std::io::Error> for ArgError {
    fn from(err: std::io::Error) -> Self {
        ArgError::Manifest(format!("IO error: {}", err))
    }
}

impl From<toml::de::Error> for ArgError {
    fn from(err: toml::de::Error) -> Self {
        ArgError::Manifest(err.to_string())
    }
}

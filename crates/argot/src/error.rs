//! Error types for argument processing.
//!
//! Every violation the processor can detect has its own variant so callers
//! can branch on the cause. [`ArgumentError::kind`] gives a fieldless view
//! for matching when the message details don't matter.

use thiserror::Error;

use crate::field::ArgKind;

/// Boxed error returned by custom converters.
pub type ConverterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while discovering bindings, matching arguments or
/// validating constraints.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// A label declaration is missing or collides with another field.
    #[error("label violation on field '{field}': {reason}")]
    Utilize { field: String, reason: String },

    /// The verbal (positional) field is missing or declared more than once.
    #[error("verbal violation: {0}")]
    Verbal(String),

    /// A parameter, field type or construct is not supported.
    #[error("support violation: {0}")]
    Support(String),

    /// An option was given without its argument.
    #[error("option violation: argument missing for parameter '{parameter}'")]
    Option { parameter: String },

    /// An exclusive parameter was combined with other parameters.
    #[error("exclusive violation: parameter '{parameter}' cannot be combined with other parameters")]
    Exclusive { parameter: String },

    /// A required parameter was not supplied.
    #[error("required violation: parameter '{parameter}' is required")]
    Required { parameter: String },

    /// A dependency declaration is broken or not satisfied.
    #[error("dependent violation: {0}")]
    Dependent(String),

    /// A default value does not fit the field type.
    #[error("default value violation on field '{field}': {reason}")]
    Default { field: String, reason: String },

    /// Field metadata is malformed for its kind.
    #[error("{kind} attribute violation on field '{field}': {reason}")]
    Attribute {
        kind: ArgKind,
        field: String,
        reason: String,
    },

    /// A custom converter is missing or failed.
    #[error("custom converter failed for parameter '{parameter}': {reason}")]
    CustomConverter {
        parameter: String,
        reason: String,
        #[source]
        source: Option<ConverterError>,
    },

    /// The raw argument could not be converted into the field type.
    #[error("cannot convert '{argument}' for parameter '{parameter}' into {type_name}")]
    Conversion {
        parameter: String,
        argument: String,
        type_name: &'static str,
    },

    /// A produced value did not match the field it was assigned to.
    #[error("cannot assign value to field '{field}': expected {expected}")]
    Assignment {
        field: String,
        expected: &'static str,
    },

    /// The argument list was empty.
    #[error("no arguments supplied")]
    EmptyArguments,

    /// A command line string could not be split into tokens.
    #[error("malformed command line: {0}")]
    CommandLine(String),
}

/// Fieldless discriminant of [`ArgumentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Utilize,
    Verbal,
    Support,
    Option,
    Exclusive,
    Required,
    Dependent,
    Default,
    Attribute,
    CustomConverter,
    Conversion,
    Assignment,
    EmptyArguments,
    CommandLine,
}

impl ArgumentError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArgumentError::Utilize { .. } => ErrorKind::Utilize,
            ArgumentError::Verbal(_) => ErrorKind::Verbal,
            ArgumentError::Support(_) => ErrorKind::Support,
            ArgumentError::Option { .. } => ErrorKind::Option,
            ArgumentError::Exclusive { .. } => ErrorKind::Exclusive,
            ArgumentError::Required { .. } => ErrorKind::Required,
            ArgumentError::Dependent(_) => ErrorKind::Dependent,
            ArgumentError::Default { .. } => ErrorKind::Default,
            ArgumentError::Attribute { .. } => ErrorKind::Attribute,
            ArgumentError::CustomConverter { .. } => ErrorKind::CustomConverter,
            ArgumentError::Conversion { .. } => ErrorKind::Conversion,
            ArgumentError::Assignment { .. } => ErrorKind::Assignment,
            ArgumentError::EmptyArguments => ErrorKind::EmptyArguments,
            ArgumentError::CommandLine(_) => ErrorKind::CommandLine,
        }
    }

    /// Create a label violation.
    pub fn utilize(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Utilize {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a default value violation.
    pub fn default_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Default {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an attribute violation for a field of the given kind.
    pub fn attribute(kind: ArgKind, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Attribute {
            kind,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a custom converter violation without an underlying cause.
    pub fn converter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CustomConverter {
            parameter: parameter.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Wraps an error produced by a custom converter.
    ///
    /// When the converter failed with an `ArgumentError` of its own, that
    /// error is surfaced as is. When one is buried in the source chain, its
    /// message becomes the reason and the chain is kept as the source.
    pub fn from_converter(parameter: impl Into<String>, error: ConverterError) -> Self {
        match error.downcast::<ArgumentError>() {
            Ok(inner) => *inner,
            Err(error) => {
                let reason = innermost_domain_error(error.as_ref())
                    .map(ToString::to_string)
                    .unwrap_or_else(|| error.to_string());
                Self::CustomConverter {
                    parameter: parameter.into(),
                    reason,
                    source: Some(error),
                }
            }
        }
    }
}

/// Walks an error's source chain and returns the deepest `ArgumentError`.
pub fn innermost_domain_error<'a>(
    error: &'a (dyn std::error::Error + 'static),
) -> Option<&'a ArgumentError> {
    let mut found = None;
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = current {
        if let Some(domain) = e.downcast_ref::<ArgumentError>() {
            found = Some(domain);
        }
        current = e.source();
    }
    found
}

/// Result type for argument processing.
pub type Result<T> = std::result::Result<T, ArgumentError>;

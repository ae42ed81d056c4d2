//! Error types for the steparg core library
//!
//! Conversion failures fall into two groups. Contract violations
//! (`NullInput`, `UnsupportedTargetKind`, `Configuration`) and handler
//! failures (`Invocation`) always propagate. Conversion misses are the
//! expected outcome of trying a representation that does not fit and are
//! collapsed into `false` by the capability probes.

use thiserror::Error;

/// Main error type for steparg operations
#[derive(Error, Debug)]
pub enum Error {
    /// The value to convert was absent
    #[error("Value cannot be null: {argument}")]
    NullInput { argument: String },

    /// Primitive conversion was attempted against a non-runtime type descriptor
    #[error("The step argument converter can be used with runtime types only (target: {target})")]
    UnsupportedTargetKind { target: String },

    /// Text did not name any member of the target enum
    #[error("Requested value '{value}' was not found in enum {enum_name} (members: {members:?})")]
    NoMatchingEnumMember {
        value: String,
        enum_name: String,
        members: Vec<String>,
    },

    /// Text is not a valid unique identifier
    #[error("Unrecognized Guid format: '{value}'")]
    MalformedIdentifier { value: String },

    /// The value's runtime type cannot be turned into the target type
    #[error("Invalid cast from '{from}' to '{to}'")]
    InvalidCast { from: String, to: String },

    /// The value does not fit into the target type's range
    #[error("Value '{value}' was either too large or too small for {target}")]
    Overflow { value: String, target: String },

    /// Text is not in a format recognised for the target type
    #[error("Input string '{value}' was not in a correct format for {target}")]
    FormatMismatch { value: String, target: String },

    /// An argument was rejected by a converter
    #[error("Invalid argument: {message}")]
    ArgumentInvalid { message: String },

    /// A step argument transformation's handler failed
    #[error("Step argument transformation '{binding}' failed: {source}")]
    Invocation {
        binding: String,
        #[source]
        source: anyhow::Error,
    },

    /// A binding or converter was set up incorrectly
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        binding: Option<String>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error is an expected conversion miss.
    ///
    /// Capability probes report these as `false`; every other kind is a
    /// programming error and must keep propagating.
    pub fn is_conversion_miss(&self) -> bool {
        matches!(
            self,
            Error::NoMatchingEnumMember { .. }
                | Error::MalformedIdentifier { .. }
                | Error::InvalidCast { .. }
                | Error::Overflow { .. }
                | Error::FormatMismatch { .. }
                | Error::ArgumentInvalid { .. }
        )
    }

    pub(crate) fn invalid_cast(from: impl ToString, to: impl ToString) -> Self {
        Error::InvalidCast {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub(crate) fn overflow(value: impl ToString, target: impl ToString) -> Self {
        Error::Overflow {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    pub(crate) fn format_mismatch(value: impl ToString, target: impl ToString) -> Self {
        Error::FormatMismatch {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>, binding: Option<&str>) -> Self {
        Error::Configuration {
            message: message.into(),
            binding: binding.map(str::to_string),
        }
    }
}

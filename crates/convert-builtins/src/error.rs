//! Error types for the built-in scalar conversions.
//!
//! Built-in conversions never fall back to a default value for malformed
//! input; the only lenient case is an empty or whitespace-only string, which
//! is handled before parsing starts.

use thiserror::Error;

/// Errors raised by built-in conversion functions.
#[derive(Debug, Error)]
pub enum BuiltinError {
    /// Numeric value does not fit the target type.
    #[error("Numeric overflow converting {value} to {target_type}")]
    Overflow { value: String, target_type: &'static str },

    /// NaN or infinite value where a finite number is required.
    #[error("Non-finite value {value} cannot be converted to {target_type}")]
    NotFinite { value: String, target_type: &'static str },

    /// Malformed numeric text.
    #[error("Invalid {target_type} format: {input:?}")]
    InvalidNumber { input: String, target_type: &'static str },

    /// Malformed boolean text.
    #[error("Invalid boolean format: {input:?}. Expected 'true' or 'false'")]
    InvalidBoolean { input: String },

    /// Text that is neither a single character nor blank.
    #[error("Invalid character: {input:?}. Expected exactly one character")]
    InvalidChar { input: String },

    /// Integer that is not a Unicode scalar value.
    #[error("Invalid character code point: {value}")]
    InvalidCodePoint { value: String },

    /// Malformed date-time text.
    #[error("Invalid datetime format: {input:?}: {reason}")]
    InvalidDateTime { input: String, reason: String },

    /// Malformed duration text.
    #[error(
        "Invalid duration format: {input:?}. Expected ISO 8601 duration or [-][d.]hh:mm:ss[.f]"
    )]
    InvalidDuration { input: String },

    /// Duration outside the representable range of the target type.
    #[error("Duration {value} cannot be represented as {target_type}")]
    DurationOutOfRange { value: String, target_type: &'static str },

    /// Malformed UUID text or byte sequence.
    #[error("Invalid UUID: {reason}")]
    InvalidUuid { reason: String },

    /// Malformed URI text.
    #[error("Invalid URI {input:?}: {source}")]
    InvalidUri {
        input: String,
        #[source]
        source: url::ParseError,
    },

    /// Malformed base64 or hex text.
    #[error("Invalid {encoding} byte sequence: {reason}")]
    InvalidBytes { encoding: &'static str, reason: String },

    /// Format pattern the target does not understand.
    #[error("Format {format:?} is not supported for {target_type}")]
    InvalidFormat { format: String, target_type: &'static str },

    /// Empty input for a target without a zero value.
    #[error("Empty input cannot be converted to {target_type}")]
    EmptyInput { target_type: &'static str },

    /// Type name that does not belong to the catalogue.
    #[error("Unknown type name: {name:?}")]
    UnknownType { name: String },
}

/// Result type for built-in conversions.
pub type Result<T> = std::result::Result<T, BuiltinError>;

//! The single error kind surfaced by conversions.
//!
//! Every failure (no conversion path, a failing definition, an illegal
//! empty optional) funnels into [`ConversionError`]. The underlying reason is
//! kept as the error's `source()` and never swallowed.

use crate::type_key::{ConversionPairKey, TypeKey};
use std::fmt;
use thiserror::Error;

/// Boxed error carried as the cause of a failed conversion.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFailure {
    /// No strategy exists for the type pair.
    Unsupported,
    /// A strategy was found but its function rejected the value.
    Failed,
    /// The source was an empty optional whose inner type pair is unconvertible.
    IllegalEmptyOptional,
    /// An empty source had to become the target's zero value, but the target has none.
    NoZeroValue,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Unsupported => "no conversion exists",
            Self::Failed => "conversion failed",
            Self::IllegalEmptyOptional => "empty optional of an unconvertible type pair",
            Self::NoZeroValue => "target type has no zero value",
        };
        f.write_str(text)
    }
}

/// Error returned when a value cannot be converted between two types.
#[derive(Debug, Error)]
#[error("cannot convert {value} from `{source_type}` to `{target_type}`: {reason}")]
pub struct ConversionError {
    /// Type of the value that was being converted.
    pub source_type: TypeKey,
    /// Requested target type.
    pub target_type: TypeKey,
    /// Debug rendering of the attempted value, for diagnostics.
    pub value: String,
    /// Failure category.
    pub reason: ConversionFailure,
    /// Originating error, if any.
    #[source]
    pub cause: Option<BoxError>,
}

impl ConversionError {
    pub fn new(pair: ConversionPairKey, value: String, reason: ConversionFailure) -> Self {
        Self {
            source_type: pair.source,
            target_type: pair.target,
            value,
            reason,
            cause: None,
        }
    }

    /// No strategy applies to the pair.
    pub fn unsupported(pair: ConversionPairKey, value: &dyn fmt::Debug) -> Self {
        Self::new(pair, format!("{value:?}"), ConversionFailure::Unsupported)
    }

    /// A strategy's function failed; `cause` is preserved.
    pub fn failed(
        pair: ConversionPairKey,
        value: &dyn fmt::Debug,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self::new(pair, format!("{value:?}"), ConversionFailure::Failed).with_cause(cause)
    }

    /// The source was an empty optional and the unwrapped pair is unconvertible.
    pub fn illegal_empty_optional(pair: ConversionPairKey) -> Self {
        Self::new(pair, "None".to_string(), ConversionFailure::IllegalEmptyOptional)
    }

    /// The target has no zero value to stand in for an empty source.
    pub fn no_zero_value(pair: ConversionPairKey, value: &dyn fmt::Debug) -> Self {
        Self::new(pair, format!("{value:?}"), ConversionFailure::NoZeroValue)
    }

    /// Re-state a nested conversion failure for the outer pair, keeping it as the cause.
    ///
    /// Errors that already describe `pair` are returned unchanged. An illegal
    /// empty optional keeps its category.
    pub fn wrap(pair: ConversionPairKey, inner: ConversionError) -> Self {
        if inner.pair() == pair {
            return inner;
        }
        let reason = match inner.reason {
            ConversionFailure::IllegalEmptyOptional => ConversionFailure::IllegalEmptyOptional,
            _ => ConversionFailure::Failed,
        };
        Self::new(pair, inner.value.clone(), reason).with_cause(inner)
    }

    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The (source, target) pair this error refers to.
    pub fn pair(&self) -> ConversionPairKey {
        ConversionPairKey::new(self.source_type, self.target_type)
    }

    pub fn is_unsupported(&self) -> bool {
        self.reason == ConversionFailure::Unsupported
    }
}

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[derive(Debug, Error)]
    #[error("value out of range")]
    struct OutOfRange;

    #[test]
    fn test_unsupported_message_names_both_types() {
        let err = ConversionError::unsupported(ConversionPairKey::of::<u8, String>(), &7u8);
        let message = err.to_string();
        assert!(message.contains("`u8`"));
        assert!(message.contains("`String`"));
        assert!(message.contains("no conversion exists"));
        assert!(err.is_unsupported());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_failed_preserves_cause() {
        let pair = ConversionPairKey::of::<i64, i16>();
        let err = ConversionError::failed(pair, &40_000i64, OutOfRange);
        assert_eq!(err.reason, ConversionFailure::Failed);
        assert_eq!(err.value, "40000");
        assert_eq!(err.source().map(|e| e.to_string()), Some("value out of range".to_string()));
        assert_eq!(err.pair(), ConversionPairKey::of::<i64, i16>());
    }

    #[test]
    fn test_wrap_restates_outer_pair() {
        let pair = ConversionPairKey::of::<i64, i16>();
        let inner = ConversionError::failed(pair, &40_000i64, OutOfRange);
        let outer = ConversionError::wrap(ConversionPairKey::of::<Option<i64>, i16>(), inner);
        assert_eq!(outer.reason, ConversionFailure::Failed);
        assert_eq!(outer.value, "40000");
        assert!(outer.to_string().contains("`Option<i64>`"));
        let cause = outer.source().and_then(|e| e.downcast_ref::<ConversionError>()).unwrap();
        assert_eq!(cause.pair(), ConversionPairKey::of::<i64, i16>());

        let same = ConversionError::unsupported(ConversionPairKey::of::<u8, char>(), &1u8);
        let wrapped = ConversionError::wrap(ConversionPairKey::of::<u8, char>(), same);
        assert!(wrapped.cause.is_none());
    }
}

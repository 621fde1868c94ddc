//! Types the engine can convert, and the structural hooks it dispatches through.
//!
//! Strategy resolution works on [`TypeKey`]s, but executing an optional or
//! enumeration strategy needs the concrete inner types. Each [`Convertible`]
//! type describes its [`Shape`] and, for the structural shapes, carries the
//! monomorphized hooks that re-enter the engine with those inner types.

use crate::engine::ConversionEngine;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use convert_core::{ConversionError, ConversionPairKey, ConversionSettings, Result, TypeKey};
use rust_decimal::Decimal;
use std::any::Any;
use std::fmt;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Structural classification used during strategy resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Neither optional nor an enumeration.
    Plain,
    /// `Option<inner>`.
    Optional { inner: TypeKey },
    /// An enumeration backed by the integral `repr`.
    Enumeration { repr: TypeKey },
}

impl Shape {
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional { .. })
    }

    pub fn is_enumeration(&self) -> bool {
        matches!(self, Self::Enumeration { .. })
    }
}

/// A type that can appear on either side of a conversion.
///
/// Plain types only need an empty impl, plus [`Convertible::zero_value`] if
/// an empty optional should be able to collapse into them. Optionals are
/// covered by the blanket impl on `Option<X>`, and enumerations by
/// [`convertible_enum!`](crate::convertible_enum).
///
/// The hidden hooks are called by the engine once a structural strategy has
/// been selected; their defaults report the pair as unsupported.
pub trait Convertible: Any + fmt::Debug + Sized {
    fn shape() -> Shape {
        Shape::Plain
    }

    /// Value substituted when an empty optional converts into this type.
    fn zero_value() -> Option<Self> {
        None
    }

    /// Convert the present payload of an optional; `Ok(None)` when empty.
    #[doc(hidden)]
    fn convert_present<T: Convertible>(
        self,
        _engine: &ConversionEngine,
        _settings: &ConversionSettings,
    ) -> Result<Option<T>> {
        Err(ConversionError::unsupported(ConversionPairKey::of::<Self, T>(), &self))
    }

    /// Whether the payload type of this optional converts into `T`.
    #[doc(hidden)]
    fn present_convertible_to<T: Convertible>(_engine: &ConversionEngine) -> bool {
        false
    }

    /// Build this optional from a value converted into its payload type.
    #[doc(hidden)]
    fn wrap_converted<S: Convertible>(
        value: S,
        _engine: &ConversionEngine,
        _settings: &ConversionSettings,
    ) -> Result<Self> {
        Err(ConversionError::unsupported(ConversionPairKey::of::<S, Self>(), &value))
    }

    /// Build this optional from another optional, keeping emptiness.
    #[doc(hidden)]
    fn wrap_optional<S: Convertible>(
        value: S,
        _engine: &ConversionEngine,
        _settings: &ConversionSettings,
    ) -> Result<Self> {
        Err(ConversionError::unsupported(ConversionPairKey::of::<S, Self>(), &value))
    }

    /// Whether `S` converts into the payload type of this optional.
    #[doc(hidden)]
    fn convertible_into_payload<S: Convertible>(_engine: &ConversionEngine) -> bool {
        false
    }

    #[doc(hidden)]
    fn enum_into<T: Convertible>(
        self,
        _engine: &ConversionEngine,
        _settings: &ConversionSettings,
    ) -> Result<T> {
        Err(ConversionError::unsupported(ConversionPairKey::of::<Self, T>(), &self))
    }

    #[doc(hidden)]
    fn enum_convertible_to<T: Convertible>(_engine: &ConversionEngine) -> bool {
        false
    }

    #[doc(hidden)]
    fn enum_from<S: Convertible>(
        value: S,
        _engine: &ConversionEngine,
        _settings: &ConversionSettings,
    ) -> Result<Self> {
        Err(ConversionError::unsupported(ConversionPairKey::of::<S, Self>(), &value))
    }

    #[doc(hidden)]
    fn enum_convertible_from<S: Convertible>(_engine: &ConversionEngine) -> bool {
        false
    }
}

/// Move `slot`'s value out as `T` when it holds an `Option<T>`.
///
/// Used once the engine has proven two type parameters are the same type.
pub(crate) fn take_as<T: 'static>(slot: &mut dyn Any) -> Option<T> {
    slot.downcast_mut::<Option<T>>().and_then(Option::take)
}

macro_rules! impl_convertible_with_default {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Convertible for $ty {
                fn zero_value() -> Option<Self> {
                    Some(<$ty>::default())
                }
            }
        )+
    };
}

impl_convertible_with_default!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    char,
    String,
    Vec<u8>,
    Uuid,
    NaiveDateTime,
    DateTime<FixedOffset>,
    DateTime<Utc>,
    TimeDelta,
    Duration,
);

// No meaningful zero value.
impl Convertible for Url {}
impl Convertible for TypeKey {}

impl<X: Convertible> Convertible for Option<X> {
    fn shape() -> Shape {
        Shape::Optional {
            inner: TypeKey::of::<X>(),
        }
    }

    fn zero_value() -> Option<Self> {
        Some(None)
    }

    fn convert_present<T: Convertible>(
        self,
        engine: &ConversionEngine,
        settings: &ConversionSettings,
    ) -> Result<Option<T>> {
        match self {
            Some(inner) => engine.convert_with::<X, T>(inner, settings).map(Some),
            None if engine.can_convert::<X, T>() => Ok(None),
            None => Err(ConversionError::illegal_empty_optional(ConversionPairKey::of::<
                Self,
                T,
            >())),
        }
    }

    fn present_convertible_to<T: Convertible>(engine: &ConversionEngine) -> bool {
        engine.can_convert::<X, T>()
    }

    fn wrap_converted<S: Convertible>(
        value: S,
        engine: &ConversionEngine,
        settings: &ConversionSettings,
    ) -> Result<Self> {
        engine.convert_with::<S, X>(value, settings).map(Some)
    }

    fn wrap_optional<S: Convertible>(
        value: S,
        engine: &ConversionEngine,
        settings: &ConversionSettings,
    ) -> Result<Self> {
        value.convert_present::<X>(engine, settings)
    }

    fn convertible_into_payload<S: Convertible>(engine: &ConversionEngine) -> bool {
        engine.can_convert::<S, X>()
    }
}

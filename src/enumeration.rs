//! Enumeration support.
//!
//! An enumeration converts through its integral representation, except
//! against `String`, where it converts by variant name.
//!
//! | Direction         | Rule                                                            |
//! | ----------------- | --------------------------------------------------------------- |
//! | enum -> `String`  | Variant name; format `D` for the decimal value, `X`/`x` for hex |
//! | `String` -> enum  | Case-insensitive name, else numeric text; blank yields the zero variant |
//! | enum -> other     | Representation converted to the target                          |
//! | other -> enum     | Source converted to the representation, then matched to a variant |
//!
//! Values that match no declared variant are rejected.

use crate::convertible::{take_as, Convertible};
use crate::engine::ConversionEngine;
use convert_core::{BoxError, ConversionError, ConversionPairKey, ConversionSettings, Result};
use std::any::{type_name, Any};
use std::fmt;
use thiserror::Error;

/// Errors raised while mapping between an enumeration and its text or numeric forms.
#[derive(Debug, Error)]
pub enum EnumError {
    #[error("'{name}' is not a variant of {enum_type}")]
    UnknownName {
        name: String,
        enum_type: &'static str,
    },

    #[error("{value} does not match any variant of {enum_type}")]
    UnknownValue {
        value: String,
        enum_type: &'static str,
    },

    #[error("{enum_type} has no variant for the zero value")]
    NoZeroVariant { enum_type: &'static str },

    #[error("invalid enumeration format '{0}'")]
    InvalidFormat(String),
}

/// An enumeration with an integral representation.
///
/// Usually implemented through [`convertible_enum!`](crate::convertible_enum).
pub trait ConvertibleEnum: Copy + fmt::Debug + 'static {
    type Repr: Convertible + Copy + PartialEq + fmt::Display + fmt::LowerHex + fmt::UpperHex;

    /// Declared variants, in declaration order.
    const VARIANTS: &'static [(&'static str, Self)];

    fn to_repr(self) -> Self::Repr;

    fn from_repr(repr: Self::Repr) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .map(|(_, variant)| *variant)
            .find(|variant| variant.to_repr() == repr)
    }

    fn name(self) -> Option<&'static str> {
        let repr = self.to_repr();
        Self::VARIANTS
            .iter()
            .find(|(_, variant)| variant.to_repr() == repr)
            .map(|(name, _)| *name)
    }

    /// Case-insensitive lookup by variant name.
    fn from_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, variant)| *variant)
    }
}

/// The variant whose representation is zero, if declared.
pub fn zero_variant<E: ConvertibleEnum>() -> Option<E> {
    <E::Repr as Convertible>::zero_value().and_then(E::from_repr)
}

fn render<E: ConvertibleEnum>(
    value: E,
    settings: &ConversionSettings,
) -> std::result::Result<String, EnumError> {
    let repr = value.to_repr();
    match settings.format() {
        None | Some("G" | "g" | "F" | "f") => {
            Ok(value.name().map_or_else(|| repr.to_string(), str::to_string))
        }
        Some("D" | "d") => Ok(repr.to_string()),
        Some("X") => Ok(format!("{repr:X}")),
        Some("x") => Ok(format!("{repr:x}")),
        Some(other) => Err(EnumError::InvalidFormat(other.to_string())),
    }
}

fn looks_numeric(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+')
}

fn parse<E: ConvertibleEnum>(
    text: &str,
    engine: &ConversionEngine,
    settings: &ConversionSettings,
) -> std::result::Result<E, BoxError> {
    let text = text.trim();
    if text.is_empty() {
        return zero_variant::<E>().ok_or_else(|| {
            EnumError::NoZeroVariant {
                enum_type: type_name::<E>(),
            }
            .into()
        });
    }
    if let Some(variant) = E::from_name(text) {
        return Ok(variant);
    }
    if !looks_numeric(text) {
        return Err(EnumError::UnknownName {
            name: text.to_string(),
            enum_type: type_name::<E>(),
        }
        .into());
    }
    let repr = engine.convert_with::<String, E::Repr>(text.to_string(), settings)?;
    E::from_repr(repr).ok_or_else(|| {
        EnumError::UnknownValue {
            value: repr.to_string(),
            enum_type: type_name::<E>(),
        }
        .into()
    })
}

/// Convert an enumeration value into `T`.
pub fn enum_into<E: ConvertibleEnum + Convertible, T: Convertible>(
    value: E,
    engine: &ConversionEngine,
    settings: &ConversionSettings,
) -> Result<T> {
    let pair = ConversionPairKey::of::<E, T>();
    if pair.target.is::<String>() {
        let text =
            render(value, settings).map_err(|err| ConversionError::failed(pair, &value, err))?;
        let mut slot = Some(text);
        return take_as::<T>(&mut slot).ok_or_else(|| ConversionError::unsupported(pair, &value));
    }
    engine
        .convert_with::<E::Repr, T>(value.to_repr(), settings)
        .map_err(|err| ConversionError::wrap(pair, err))
}

/// Convert a value of `S` into the enumeration `E`.
pub fn enum_from<S: Convertible, E: ConvertibleEnum + Convertible>(
    value: S,
    engine: &ConversionEngine,
    settings: &ConversionSettings,
) -> Result<E> {
    let pair = ConversionPairKey::of::<S, E>();
    if let Some(text) = (&value as &dyn Any).downcast_ref::<String>() {
        return parse::<E>(text, engine, settings)
            .map_err(|cause| ConversionError::failed(pair, &value, cause));
    }
    let repr = engine
        .convert_with::<S, E::Repr>(value, settings)
        .map_err(|err| ConversionError::wrap(pair, err))?;
    E::from_repr(repr).ok_or_else(|| {
        ConversionError::failed(
            pair,
            &repr,
            EnumError::UnknownValue {
                value: repr.to_string(),
                enum_type: type_name::<E>(),
            },
        )
    })
}

pub fn enum_convertible_to<E: ConvertibleEnum, T: Convertible>(engine: &ConversionEngine) -> bool {
    ConversionPairKey::of::<E, T>().target.is::<String>() || engine.can_convert::<E::Repr, T>()
}

pub fn enum_convertible_from<S: Convertible, E: ConvertibleEnum>(
    engine: &ConversionEngine,
) -> bool {
    ConversionPairKey::of::<S, E>().source.is::<String>() || engine.can_convert::<S, E::Repr>()
}

/// Implement [`Convertible`] for a type that already implements [`ConvertibleEnum`].
#[macro_export]
macro_rules! impl_convertible_enum {
    ($name:ty) => {
        impl $crate::Convertible for $name {
            fn shape() -> $crate::Shape {
                $crate::Shape::Enumeration {
                    repr: $crate::TypeKey::of::<<$name as $crate::ConvertibleEnum>::Repr>(),
                }
            }

            fn zero_value() -> ::std::option::Option<Self> {
                $crate::enumeration::zero_variant::<Self>()
            }

            fn enum_into<T: $crate::Convertible>(
                self,
                engine: &$crate::ConversionEngine,
                settings: &$crate::ConversionSettings,
            ) -> $crate::Result<T> {
                $crate::enumeration::enum_into(self, engine, settings)
            }

            fn enum_convertible_to<T: $crate::Convertible>(
                engine: &$crate::ConversionEngine,
            ) -> bool {
                $crate::enumeration::enum_convertible_to::<Self, T>(engine)
            }

            fn enum_from<S: $crate::Convertible>(
                value: S,
                engine: &$crate::ConversionEngine,
                settings: &$crate::ConversionSettings,
            ) -> $crate::Result<Self> {
                $crate::enumeration::enum_from(value, engine, settings)
            }

            fn enum_convertible_from<S: $crate::Convertible>(
                engine: &$crate::ConversionEngine,
            ) -> bool {
                $crate::enumeration::enum_convertible_from::<S, Self>(engine)
            }
        }
    };
}

/// Declare a fieldless enumeration with explicit discriminants and make it convertible.
///
/// The enum derives `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq` and `Hash`;
/// further attributes are passed through.
///
/// ```rust
/// use scalar_convert::{convertible_enum, ConversionEngine};
///
/// convertible_enum! {
///     pub enum Level: u8 {
///         Low = 1,
///         High = 2,
///     }
/// }
///
/// let engine = ConversionEngine::new();
/// let level: Level = engine.convert("high".to_string(), None).unwrap();
/// assert_eq!(level, Level::High);
/// assert_eq!(engine.convert::<Level, i64>(level, None).unwrap(), 2);
/// ```
#[macro_export]
macro_rules! convertible_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($repr)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )+
        }

        impl $crate::ConvertibleEnum for $name {
            type Repr = $repr;

            const VARIANTS: &'static [(&'static str, Self)] = &[
                $((::std::stringify!($variant), $name::$variant),)+
            ];

            fn to_repr(self) -> $repr {
                self as $repr
            }
        }

        $crate::impl_convertible_enum!($name);
    };
}

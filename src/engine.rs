//! The conversion engine.
//!
//! [`ConversionEngine`] owns a [`DefinitionTable`] and a [`StrategyCache`].
//! A conversion between `S` and `T` first obtains the pair's strategy,
//! resolving it on first use in this order:
//!
//! 1. identity, when `S` and `T` are the same type
//! 2. a registered definition for the exact pair
//! 3. a registered assignable cast for the exact pair
//! 4. optional handling: source, target or both are `Option<_>`
//! 5. enumeration handling: source, target or both are enumerations
//! 6. unsupported
//!
//! The strategy is then executed against the value. Structural strategies
//! re-enter the engine with the inner types, so their own pairs are
//! resolved and cached as well.

use crate::convertible::{take_as, Convertible, Shape};
use crate::strategy::{ResolvedStrategy, StrategyCache, StrategyKind};
use convert_core::{
    BoxError, ConversionError, ConversionPairKey, ConversionSettings, DefinitionTable, Result,
};
use tracing::debug;

/// Resolves, caches and executes conversions between [`Convertible`] types.
///
/// The engine is `Send + Sync`; share it by reference or behind an `Arc`.
/// Registration takes `&mut self` and drops every cached strategy, so
/// registrations are expected to happen before the engine is shared.
#[derive(Debug)]
pub struct ConversionEngine {
    definitions: DefinitionTable,
    cache: StrategyCache,
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionEngine {
    /// An engine preloaded with the built-in scalar catalogue.
    pub fn new() -> Self {
        let mut definitions = DefinitionTable::new();
        convert_builtins::register_builtins(&mut definitions);
        Self::with_definitions(definitions)
    }

    /// An engine with no registered definitions.
    ///
    /// Identity, optional and enumeration handling still apply.
    pub fn empty() -> Self {
        Self::with_definitions(DefinitionTable::new())
    }

    pub fn with_definitions(definitions: DefinitionTable) -> Self {
        Self {
            definitions,
            cache: StrategyCache::new(),
        }
    }

    pub fn definitions(&self) -> &DefinitionTable {
        &self.definitions
    }

    /// Register a conversion function for `S -> T`.
    ///
    /// Replaces any earlier definition for the pair and returns `true` when it
    /// did. Cached strategies are discarded.
    pub fn register<S, T, F, E>(&mut self, func: F) -> bool
    where
        S: Convertible,
        T: Convertible,
        F: Fn(&S, &ConversionSettings) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let replaced = self.definitions.register(func);
        self.cache.clear();
        replaced
    }

    /// Register `S -> T` as an assignable cast through `T: From<S>`.
    ///
    /// A definition for the same pair takes precedence over the cast.
    pub fn register_assignable<S, T>(&mut self) -> bool
    where
        S: Convertible,
        T: Convertible + From<S>,
    {
        let replaced = self.definitions.register_assignable::<S, T>();
        self.cache.clear();
        replaced
    }

    /// Convert `value` to `T`.
    ///
    /// `None` settings behave exactly like [`ConversionSettings::default`].
    pub fn convert<S, T>(&self, value: S, settings: Option<&ConversionSettings>) -> Result<T>
    where
        S: Convertible,
        T: Convertible,
    {
        self.convert_with(value, ConversionSettings::or_default(settings))
    }

    /// Whether a conversion path exists for `S -> T`.
    ///
    /// Structural strategies are only convertible when their inner pair is.
    /// A `true` answer does not guarantee every value converts.
    pub fn can_convert<S, T>(&self) -> bool
    where
        S: Convertible,
        T: Convertible,
    {
        match self.strategy::<S, T>() {
            ResolvedStrategy::Identity
            | ResolvedStrategy::ByDefinition(_)
            | ResolvedStrategy::ByAssignableCast(_) => true,
            ResolvedStrategy::NullableSourceUnwrap => S::present_convertible_to::<T>(self),
            ResolvedStrategy::NullableTargetWrap | ResolvedStrategy::NullableBothWrap => {
                T::convertible_into_payload::<S>(self)
            }
            ResolvedStrategy::EnumSourceToPlain => S::enum_convertible_to::<T>(self),
            ResolvedStrategy::PlainToEnumTarget | ResolvedStrategy::EnumSourceToEnumTarget => {
                T::enum_convertible_from::<S>(self)
            }
            ResolvedStrategy::Unsupported => false,
        }
    }

    /// The strategy kind selected for `S -> T`, resolving it if needed.
    pub fn strategy_kind<S, T>(&self) -> StrategyKind
    where
        S: Convertible,
        T: Convertible,
    {
        self.strategy::<S, T>().kind()
    }

    /// Number of type pairs with a cached strategy.
    pub fn cached_strategies(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn convert_with<S, T>(&self, value: S, settings: &ConversionSettings) -> Result<T>
    where
        S: Convertible,
        T: Convertible,
    {
        let pair = ConversionPairKey::of::<S, T>();
        match self.strategy::<S, T>() {
            ResolvedStrategy::Identity => {
                let mut slot = Some(value);
                take_as::<T>(&mut slot).ok_or_else(|| ConversionError::unsupported(pair, &slot))
            }
            ResolvedStrategy::ByDefinition(definition) => match definition.typed::<S, T>() {
                Some(typed) => typed
                    .call(&value, settings)
                    .map_err(|cause| ConversionError::failed(pair, &value, cause)),
                None => Err(ConversionError::unsupported(pair, &value)),
            },
            ResolvedStrategy::ByAssignableCast(definition) => match definition.cast::<S, T>() {
                Some(cast) => Ok(cast.call(value)),
                None => Err(ConversionError::unsupported(pair, &value)),
            },
            ResolvedStrategy::NullableSourceUnwrap => {
                match value.convert_present::<T>(self, settings) {
                    Ok(Some(converted)) => Ok(converted),
                    Ok(None) => T::zero_value()
                        .ok_or_else(|| ConversionError::no_zero_value(pair, &None::<()>)),
                    Err(err) => Err(ConversionError::wrap(pair, err)),
                }
            }
            ResolvedStrategy::NullableTargetWrap => T::wrap_converted::<S>(value, self, settings)
                .map_err(|err| ConversionError::wrap(pair, err)),
            ResolvedStrategy::NullableBothWrap => T::wrap_optional::<S>(value, self, settings)
                .map_err(|err| ConversionError::wrap(pair, err)),
            ResolvedStrategy::EnumSourceToPlain => value.enum_into::<T>(self, settings),
            ResolvedStrategy::PlainToEnumTarget | ResolvedStrategy::EnumSourceToEnumTarget => {
                T::enum_from::<S>(value, self, settings)
            }
            ResolvedStrategy::Unsupported => Err(ConversionError::unsupported(pair, &value)),
        }
    }

    fn strategy<S, T>(&self) -> ResolvedStrategy
    where
        S: Convertible,
        T: Convertible,
    {
        let pair = ConversionPairKey::of::<S, T>();
        self.cache
            .get_or_resolve(pair, || self.resolve(pair, S::shape(), T::shape()))
    }

    fn resolve(&self, pair: ConversionPairKey, source: Shape, target: Shape) -> ResolvedStrategy {
        let strategy = if pair.is_identity() {
            ResolvedStrategy::Identity
        } else if let Some(definition) = self.definitions.get(&pair) {
            ResolvedStrategy::ByDefinition(definition.clone())
        } else if let Some(cast) = self.definitions.cast(&pair) {
            ResolvedStrategy::ByAssignableCast(cast.clone())
        } else {
            match (source, target) {
                (Shape::Optional { .. }, Shape::Optional { .. }) => {
                    ResolvedStrategy::NullableBothWrap
                }
                (Shape::Optional { .. }, _) => ResolvedStrategy::NullableSourceUnwrap,
                (_, Shape::Optional { .. }) => ResolvedStrategy::NullableTargetWrap,
                (Shape::Enumeration { .. }, Shape::Enumeration { .. }) => {
                    ResolvedStrategy::EnumSourceToEnumTarget
                }
                (Shape::Enumeration { .. }, _) => ResolvedStrategy::EnumSourceToPlain,
                (_, Shape::Enumeration { .. }) => ResolvedStrategy::PlainToEnumTarget,
                (Shape::Plain, Shape::Plain) => ResolvedStrategy::Unsupported,
            }
        };
        debug!("Resolved {} strategy for {pair}", strategy.kind());
        strategy
    }
}

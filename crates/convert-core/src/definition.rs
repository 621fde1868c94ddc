//! Registry of conversion functions keyed by (source, target) type pairs.
//!
//! Definitions are stored type-erased so one table can hold functions for
//! arbitrary pairs, and recovered with their concrete signature at the call
//! site, where both types are statically known. Values are never boxed on the
//! way through; only the function itself lives behind an `Arc`.

use crate::error::BoxError;
use crate::settings::ConversionSettings;
use crate::type_key::ConversionPairKey;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type DefinitionFn<S, T> = dyn Fn(&S, &ConversionSettings) -> Result<T, BoxError> + Send + Sync;

/// A conversion function from `S` to `T`.
pub struct TypedDefinition<S: 'static, T: 'static> {
    func: Box<DefinitionFn<S, T>>,
}

impl<S: 'static, T: 'static> TypedDefinition<S, T> {
    pub fn new<F, E>(func: F) -> Self
    where
        F: Fn(&S, &ConversionSettings) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            func: Box::new(move |value, settings| func(value, settings).map_err(Into::into)),
        }
    }

    /// Run the conversion.
    pub fn call(&self, value: &S, settings: &ConversionSettings) -> Result<T, BoxError> {
        (self.func)(value, settings)
    }
}

/// A lossless reinterpretation of `S` as `T`, where `T` can hold every `S`.
pub struct Cast<S: 'static, T: 'static> {
    func: fn(S) -> T,
}

impl<S: 'static, T: 'static> Cast<S, T> {
    pub fn new(func: fn(S) -> T) -> Self {
        Self { func }
    }

    pub fn call(&self, value: S) -> T {
        (self.func)(value)
    }
}

/// Type-erased handle to a [`TypedDefinition`] or a [`Cast`].
///
/// Cloning is cheap; every clone refers to the same function.
#[derive(Clone)]
pub struct Definition {
    pair: ConversionPairKey,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Definition {
    fn new<F: Any + Send + Sync>(pair: ConversionPairKey, func: F) -> Self {
        Self {
            pair,
            inner: Arc::new(func),
        }
    }

    /// The pair this definition converts.
    pub fn pair(&self) -> ConversionPairKey {
        self.pair
    }

    /// Recover the typed conversion function.
    pub fn typed<S: 'static, T: 'static>(&self) -> Option<&TypedDefinition<S, T>> {
        self.inner.downcast_ref()
    }

    /// Recover the typed cast.
    pub fn cast<S: 'static, T: 'static>(&self) -> Option<&Cast<S, T>> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition").field("pair", &self.pair).finish()
    }
}

/// Conversion functions and assignable casts, keyed by exact type pair.
///
/// The table is filled before it is handed to an engine. Registration takes
/// `&mut self`, so it cannot run concurrently with lookups.
#[derive(Default, Clone)]
pub struct DefinitionTable {
    definitions: HashMap<ConversionPairKey, Definition>,
    casts: HashMap<ConversionPairKey, Definition>,
}

impl DefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a conversion function for `S -> T`.
    ///
    /// Returns `true` when an earlier definition for the same pair was replaced.
    pub fn register<S, T, F, E>(&mut self, func: F) -> bool
    where
        S: 'static,
        T: 'static,
        F: Fn(&S, &ConversionSettings) -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let pair = ConversionPairKey::of::<S, T>();
        let definition = Definition::new(pair, TypedDefinition::<S, T>::new(func));
        let replaced = self.definitions.insert(pair, definition).is_some();
        if replaced {
            debug!("Replaced conversion definition for {pair}");
        }
        replaced
    }

    /// Register `T::from` as the assignable cast for `S -> T`.
    pub fn register_assignable<S, T>(&mut self) -> bool
    where
        S: 'static,
        T: From<S> + 'static,
    {
        let pair = ConversionPairKey::of::<S, T>();
        let cast = Definition::new(pair, Cast::<S, T>::new(T::from));
        let replaced = self.casts.insert(pair, cast).is_some();
        if replaced {
            debug!("Replaced assignable cast for {pair}");
        }
        replaced
    }

    /// Conversion function registered for `pair`.
    pub fn get(&self, pair: &ConversionPairKey) -> Option<&Definition> {
        self.definitions.get(pair)
    }

    /// Assignable cast registered for `pair`.
    pub fn cast(&self, pair: &ConversionPairKey) -> Option<&Definition> {
        self.casts.get(pair)
    }

    /// Whether a conversion function or a cast exists for `pair`.
    pub fn contains(&self, pair: &ConversionPairKey) -> bool {
        self.definitions.contains_key(pair) || self.casts.contains_key(pair)
    }

    /// Number of conversion functions and casts.
    pub fn len(&self) -> usize {
        self.definitions.len() + self.casts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.casts.is_empty()
    }

    /// Every registered pair, functions first, then casts.
    pub fn pairs(&self) -> impl Iterator<Item = ConversionPairKey> + '_ {
        self.definitions.keys().chain(self.casts.keys()).copied()
    }
}

impl fmt::Debug for DefinitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionTable")
            .field("definitions", &self.definitions.len())
            .field("casts", &self.casts.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::ParseIntError;

    #[derive(Debug, PartialEq)]
    struct Meters(f64);

    impl From<u32> for Meters {
        fn from(value: u32) -> Self {
            Meters(f64::from(value))
        }
    }

    #[test]
    fn test_register_and_call() {
        let mut table = DefinitionTable::new();
        let replaced = table.register(|value: &String, _: &ConversionSettings| {
            value.trim().parse::<i32>()
        });
        assert!(!replaced);

        let definition = table.get(&ConversionPairKey::of::<String, i32>()).unwrap();
        let typed = definition.typed::<String, i32>().unwrap();
        let settings = ConversionSettings::default();
        assert_eq!(typed.call(&" 42 ".to_string(), &settings).unwrap(), 42);

        let err = typed.call(&"x".to_string(), &settings).unwrap_err();
        assert!(err.downcast_ref::<ParseIntError>().is_some());
    }

    #[test]
    fn test_typed_recovery_rejects_other_signatures() {
        let mut table = DefinitionTable::new();
        table.register(|value: &u8, _: &ConversionSettings| Ok::<_, BoxError>(u16::from(*value)));

        let definition = table.get(&ConversionPairKey::of::<u8, u16>()).unwrap();
        assert!(definition.typed::<u8, u16>().is_some());
        assert!(definition.typed::<u8, u32>().is_none());
        assert!(definition.cast::<u8, u16>().is_none());
    }

    #[test]
    fn test_replacing_definition() {
        let mut table = DefinitionTable::new();
        table.register(|_: &u8, _: &ConversionSettings| Ok::<_, BoxError>(1u16));
        assert!(table.register(|_: &u8, _: &ConversionSettings| Ok::<_, BoxError>(2u16)));
        assert_eq!(table.len(), 1);

        let typed = table
            .get(&ConversionPairKey::of::<u8, u16>())
            .and_then(|d| d.typed::<u8, u16>())
            .unwrap();
        assert_eq!(typed.call(&0, &ConversionSettings::default()).unwrap(), 2);
    }

    #[test]
    fn test_assignable_cast() {
        let mut table = DefinitionTable::new();
        table.register_assignable::<u32, Meters>();

        let pair = ConversionPairKey::of::<u32, Meters>();
        assert!(table.contains(&pair));
        assert!(table.get(&pair).is_none());

        let cast = table.cast(&pair).and_then(|d| d.cast::<u32, Meters>()).unwrap();
        assert_eq!(cast.call(5), Meters(5.0));
        assert_eq!(table.pairs().collect::<Vec<_>>(), vec![pair]);
    }
}

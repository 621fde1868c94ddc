//! Core types for the scalar-convert engine.
//!
//! This crate provides the foundational types shared by the conversion
//! crates:
//!
//! - [`TypeKey`] / [`ConversionPairKey`] - Identities used to key tables and caches
//! - [`ConversionSettings`] - Optional format, format-provider and temporal-style parameters
//! - [`ConversionError`] - The single error kind every failed conversion returns
//! - [`DefinitionTable`] - Registry of conversion functions and assignable casts
//!
//! # Architecture
//!
//! ```text
//! convert-core (this crate)
//!    │
//!    ├─── convert-builtins   (fills a DefinitionTable with the scalar catalogue)
//!    │
//!    └─── scalar-convert     (strategy resolution, caching, the engine façade)
//! ```
//!
//! # Example
//!
//! ```rust
//! use convert_core::{ConversionPairKey, ConversionSettings, DefinitionTable};
//!
//! let mut table = DefinitionTable::new();
//! table.register(|value: &u8, _: &ConversionSettings| {
//!     Ok::<_, std::convert::Infallible>(u32::from(*value) * 2)
//! });
//!
//! let pair = ConversionPairKey::of::<u8, u32>();
//! let doubled = table
//!     .get(&pair)
//!     .and_then(|definition| definition.typed::<u8, u32>())
//!     .map(|typed| typed.call(&21, &ConversionSettings::default()));
//! assert_eq!(doubled.unwrap().unwrap(), 42);
//! ```

pub mod definition;
pub mod error;
pub mod settings;
pub mod type_key;

pub use definition::{Cast, Definition, DefinitionTable, TypedDefinition};
pub use error::{BoxError, ConversionError, ConversionFailure, Result};
pub use settings::{ConversionSettings, FormatProvider, TemporalStyle};
pub use type_key::{ConversionPairKey, TypeKey};

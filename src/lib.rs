//! Scalar Convert Library
//!
//! A generic conversion engine: given a value and a requested target type,
//! it finds a conversion path, caches it per type pair and executes it.
//!
//! # Features
//!
//! - Built-in catalogue: every scalar (numbers, text, bytes, UUIDs, URIs,
//!   date-times, durations) converts to and from `String`, and across its family
//! - Registration: custom conversion functions and `From`-based casts
//! - Optional handling: `Option<X>` sources unwrap, targets wrap
//! - Enumerations: by name against text, by integral value otherwise
//! - Concurrency: strategies resolve once per pair and are shared across threads
//!
//! # Workspace Crates
//!
//! - `convert_core` - type keys, settings, the error type, the definition table
//! - `convert_builtins` - the scalar catalogue
//!
//! # Example
//!
//! ```rust
//! use scalar_convert::{ConversionEngine, ConversionSettings};
//!
//! let engine = ConversionEngine::new();
//!
//! let port: u16 = engine.convert(" 8080 ".to_string(), None).unwrap();
//! assert_eq!(port, 8080);
//!
//! let hex = ConversionSettings::default().with_format("X");
//! let text: String = engine.convert(255u8, Some(&hex)).unwrap();
//! assert_eq!(text, "FF");
//!
//! let missing: i64 = engine.convert(None::<i32>, None).unwrap();
//! assert_eq!(missing, 0);
//!
//! assert!(engine.convert::<i64, i16>(32_768, None).is_err());
//! ```

pub mod config;
pub mod convertible;
pub mod engine;
pub mod enumeration;
pub mod strategy;

pub use config::{SettingsCatalog, SettingsError};
pub use convertible::{Convertible, Shape};
pub use engine::ConversionEngine;
pub use enumeration::{ConvertibleEnum, EnumError};
pub use strategy::{ResolvedStrategy, StrategyCache, StrategyKind};

pub use convert_builtins::{catalogue_types, register_builtins, BuiltinError};
pub use convert_core::{
    BoxError, ConversionError, ConversionFailure, ConversionPairKey, ConversionSettings,
    Definition, DefinitionTable, FormatProvider, Result, TemporalStyle, TypeKey,
};

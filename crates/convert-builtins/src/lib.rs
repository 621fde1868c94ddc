//! Built-in scalar conversions for the scalar-convert engine.
//!
//! This crate fills a [`DefinitionTable`] with the closed catalogue of
//! scalar-to-scalar conversions.
//!
//! # Modules
//!
//! - [`numeric`] - Integral, floating point, decimal, boolean and code point conversions
//! - [`text`] - Number, boolean and character parsing/formatting
//! - [`temporal`] - Date-time and duration parsing, formatting and cross conversions
//! - [`binary`] - Byte sequences, UUIDs, URIs and type keys
//!
//! # Catalogue
//!
//! | Family    | Types                                                           |
//! | --------- | --------------------------------------------------------------- |
//! | Boolean   | `bool`                                                          |
//! | Integral  | `i8` `i16` `i32` `i64` `u8` `u16` `u32` `u64`                   |
//! | Fractional| `f32` `f64` `rust_decimal::Decimal`                             |
//! | Text      | `char` `String`                                                 |
//! | Binary    | `Vec<u8>` `uuid::Uuid`                                          |
//! | Temporal  | `NaiveDateTime` `DateTime<FixedOffset>` `DateTime<Utc>` `TimeDelta` `std::time::Duration` |
//! | Other     | `url::Url` `TypeKey`                                            |
//!
//! Every catalogue type converts to and from `String`. Identity pairs are
//! not registered; the engine handles them before consulting the table.
//!
//! # Example
//!
//! ```rust
//! use convert_core::{ConversionPairKey, ConversionSettings, DefinitionTable};
//!
//! let mut table = DefinitionTable::new();
//! convert_builtins::register_builtins(&mut table);
//!
//! let parse = table
//!     .get(&ConversionPairKey::of::<String, i32>())
//!     .and_then(|definition| definition.typed::<String, i32>())
//!     .unwrap();
//! assert_eq!(parse.call(&" 42 ".to_string(), &ConversionSettings::default()).unwrap(), 42);
//! ```

pub mod binary;
pub mod error;
pub mod numeric;
pub mod temporal;
pub mod text;

pub use error::{BuiltinError, Result};

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use convert_core::{DefinitionTable, TypeKey};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Register the whole built-in catalogue.
pub fn register_builtins(table: &mut DefinitionTable) {
    let before = table.len();
    numeric::register(table);
    text::register(table);
    temporal::register(table);
    binary::register(table);
    debug!("Registered {} built-in conversion definitions", table.len() - before);
}

/// Type keys of every catalogue type.
pub fn catalogue_types() -> Vec<TypeKey> {
    vec![
        TypeKey::of::<bool>(),
        TypeKey::of::<i8>(),
        TypeKey::of::<i16>(),
        TypeKey::of::<i32>(),
        TypeKey::of::<i64>(),
        TypeKey::of::<u8>(),
        TypeKey::of::<u16>(),
        TypeKey::of::<u32>(),
        TypeKey::of::<u64>(),
        TypeKey::of::<f32>(),
        TypeKey::of::<f64>(),
        TypeKey::of::<Decimal>(),
        TypeKey::of::<char>(),
        TypeKey::of::<String>(),
        TypeKey::of::<Vec<u8>>(),
        TypeKey::of::<Uuid>(),
        TypeKey::of::<NaiveDateTime>(),
        TypeKey::of::<DateTime<FixedOffset>>(),
        TypeKey::of::<DateTime<Utc>>(),
        TypeKey::of::<TimeDelta>(),
        TypeKey::of::<Duration>(),
        TypeKey::of::<Url>(),
        TypeKey::of::<TypeKey>(),
    ]
}

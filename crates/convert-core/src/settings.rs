//! Optional parameters consulted by context-sensitive conversions.
//!
//! Every field is optional. Conversion functions read settings through the
//! accessors on [`ConversionSettings`], which supply defaults, so an absent
//! settings object behaves exactly like a default one.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Flags controlling how date-time values are parsed and converted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TemporalStyle: u8 {
        /// Keep the offset (or wall-clock time) carried by the input.
        const ROUND_TRIP_KIND = 0b0000_0001;
        /// Normalise offset-aware results to UTC, and take the UTC wall-clock
        /// time when an offset-aware value becomes a naive one.
        const ADJUST_TO_UNIVERSAL = 0b0000_0010;
    }
}

impl TemporalStyle {
    /// Whether offset-aware values should be normalised to UTC.
    pub fn adjusts_to_universal(&self) -> bool {
        self.contains(Self::ADJUST_TO_UNIVERSAL)
    }
}

impl Default for TemporalStyle {
    fn default() -> Self {
        Self::ROUND_TRIP_KIND
    }
}

/// Culture-like description of how numbers are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatProvider {
    /// Display name, e.g. `de-DE`. Informational only.
    #[serde(default)]
    pub name: Option<String>,

    /// Separator between integral and fractional digits.
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Separator between digit groups.
    #[serde(default = "default_group_separator")]
    pub group_separator: char,
}

fn default_decimal_separator() -> char {
    '.'
}

fn default_group_separator() -> char {
    ','
}

static INVARIANT_PROVIDER: FormatProvider = FormatProvider::invariant();

impl FormatProvider {
    /// Culture-independent provider: `.` decimal separator, `,` groups.
    pub const fn invariant() -> Self {
        Self {
            name: None,
            decimal_separator: '.',
            group_separator: ',',
        }
    }

    pub fn new(decimal_separator: char, group_separator: char) -> Self {
        Self {
            name: None,
            decimal_separator,
            group_separator,
        }
    }

    /// Attach a display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether this provider writes numbers like the invariant one.
    pub fn is_invariant(&self) -> bool {
        self.decimal_separator == '.' && self.group_separator == ','
    }
}

impl Default for FormatProvider {
    fn default() -> Self {
        Self::invariant()
    }
}

/// Optional parameters for a single conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Format pattern for numeric, temporal, identifier, byte and enumeration
    /// text conversions.
    #[serde(default)]
    pub format: Option<String>,

    /// Separators used by locale-aware numeric conversions.
    #[serde(default)]
    pub format_provider: Option<FormatProvider>,

    /// Date-time parsing and conversion style.
    #[serde(default)]
    pub temporal_style: TemporalStyle,
}

static DEFAULT_SETTINGS: ConversionSettings = ConversionSettings {
    format: None,
    format_provider: None,
    temporal_style: TemporalStyle::ROUND_TRIP_KIND,
};

impl ConversionSettings {
    /// Create settings with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve optional caller settings to a concrete reference.
    pub fn or_default(settings: Option<&ConversionSettings>) -> &ConversionSettings {
        settings.unwrap_or(&DEFAULT_SETTINGS)
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_format_provider(mut self, provider: FormatProvider) -> Self {
        self.format_provider = Some(provider);
        self
    }

    pub fn with_temporal_style(mut self, style: TemporalStyle) -> Self {
        self.temporal_style = style;
        self
    }

    /// The format pattern, treating blank patterns as absent.
    pub fn format(&self) -> Option<&str> {
        self.format
            .as_deref()
            .map(str::trim)
            .filter(|format| !format.is_empty())
    }

    /// The format provider, or the invariant provider when absent.
    pub fn format_provider(&self) -> &FormatProvider {
        self.format_provider.as_ref().unwrap_or(&INVARIANT_PROVIDER)
    }

    pub fn temporal_style(&self) -> TemporalStyle {
        self.temporal_style
    }
}

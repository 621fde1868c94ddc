//! Conversions for byte sequences, UUIDs, URIs and type keys.

use crate::error::{BuiltinError, Result};
use crate::text::lenient;
use base64::Engine;
use convert_core::{ConversionSettings, DefinitionTable, TypeKey};
use std::any::type_name;
use url::Url;
use uuid::Uuid;

// ============================================================================
// Byte sequences
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteEncoding {
    Base64,
    HexLower,
    HexUpper,
}

impl ByteEncoding {
    fn from_settings(settings: &ConversionSettings) -> Result<Self> {
        match settings.format() {
            None => Ok(Self::Base64),
            Some(format) if format.eq_ignore_ascii_case("base64") => Ok(Self::Base64),
            Some("x") => Ok(Self::HexLower),
            Some("X") => Ok(Self::HexUpper),
            Some(other) => Err(BuiltinError::InvalidFormat {
                format: other.to_string(),
                target_type: type_name::<Vec<u8>>(),
            }),
        }
    }
}

/// Encode bytes as base64 (default) or hex (`x` / `X`).
pub fn format_bytes(value: &Vec<u8>, settings: &ConversionSettings) -> Result<String> {
    Ok(match ByteEncoding::from_settings(settings)? {
        ByteEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(value),
        ByteEncoding::HexLower => hex::encode(value),
        ByteEncoding::HexUpper => hex::encode_upper(value),
    })
}

/// Decode base64 (default) or hex (`x` / `X`) text.
pub fn parse_bytes(value: &String, settings: &ConversionSettings) -> Result<Vec<u8>> {
    let encoding = ByteEncoding::from_settings(settings)?;
    lenient(value, |text| match encoding {
        ByteEncoding::Base64 => base64::engine::general_purpose::STANDARD
            .decode(text)
            .map_err(|err| BuiltinError::InvalidBytes {
                encoding: "base64",
                reason: err.to_string(),
            }),
        ByteEncoding::HexLower | ByteEncoding::HexUpper => {
            hex::decode(text).map_err(|err| BuiltinError::InvalidBytes {
                encoding: "hex",
                reason: err.to_string(),
            })
        }
    })
}

// ============================================================================
// UUIDs
// ============================================================================

/// UUID text shapes: `D` hyphenated, `N` digits only, `B` braces, `P` parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UuidFormat {
    Hyphenated,
    Simple,
    Braced,
    Parenthesized,
}

impl UuidFormat {
    fn from_settings(settings: &ConversionSettings) -> Result<Option<Self>> {
        let Some(format) = settings.format() else {
            return Ok(None);
        };
        let parsed = match format {
            "D" | "d" => Self::Hyphenated,
            "N" | "n" => Self::Simple,
            "B" | "b" => Self::Braced,
            "P" | "p" => Self::Parenthesized,
            other => {
                return Err(BuiltinError::InvalidFormat {
                    format: other.to_string(),
                    target_type: type_name::<Uuid>(),
                })
            }
        };
        Ok(Some(parsed))
    }

    fn text_len(self) -> usize {
        match self {
            Self::Hyphenated => 36,
            Self::Simple => 32,
            Self::Braced | Self::Parenthesized => 38,
        }
    }
}

fn invalid_uuid(reason: impl ToString) -> BuiltinError {
    BuiltinError::InvalidUuid {
        reason: reason.to_string(),
    }
}

fn strip_parentheses(text: &str) -> Option<&str> {
    text.strip_prefix('(').and_then(|rest| rest.strip_suffix(')'))
}

/// Canonical lowercase hyphenated form unless a format is given.
pub fn format_uuid(value: &Uuid, settings: &ConversionSettings) -> Result<String> {
    Ok(match UuidFormat::from_settings(settings)? {
        None | Some(UuidFormat::Hyphenated) => value.hyphenated().to_string(),
        Some(UuidFormat::Simple) => value.simple().to_string(),
        Some(UuidFormat::Braced) => value.braced().to_string(),
        Some(UuidFormat::Parenthesized) => format!("({})", value.hyphenated()),
    })
}

/// Parse any common UUID shape, or exactly the shape named by the format.
pub fn parse_uuid(value: &String, settings: &ConversionSettings) -> Result<Uuid> {
    let format = UuidFormat::from_settings(settings)?;
    lenient(value, |text| match format {
        None => Uuid::try_parse(strip_parentheses(text).unwrap_or(text)).map_err(invalid_uuid),
        Some(format) => {
            if text.len() != format.text_len() {
                return Err(invalid_uuid(format!(
                    "expected {} characters for format {format:?}, got {}",
                    format.text_len(),
                    text.len()
                )));
            }
            let body = match format {
                UuidFormat::Parenthesized => strip_parentheses(text)
                    .ok_or_else(|| invalid_uuid("expected surrounding parentheses"))?,
                UuidFormat::Braced if !text.starts_with('{') => {
                    return Err(invalid_uuid("expected surrounding braces"));
                }
                _ => text,
            };
            Uuid::try_parse(body).map_err(invalid_uuid)
        }
    })
}

/// RFC 4122 byte order; exactly sixteen bytes.
pub fn bytes_to_uuid(value: &Vec<u8>, _: &ConversionSettings) -> Result<Uuid> {
    Uuid::from_slice(value)
        .map_err(|_| invalid_uuid(format!("expected 16 bytes, got {}", value.len())))
}

pub fn uuid_to_bytes(value: &Uuid, _: &ConversionSettings) -> Result<Vec<u8>> {
    Ok(value.as_bytes().to_vec())
}

// ============================================================================
// URIs and type keys
// ============================================================================

pub fn format_url(value: &Url, _: &ConversionSettings) -> Result<String> {
    Ok(value.as_str().to_string())
}

/// Absolute URIs only. Blank input fails: a URI has no zero value.
pub fn parse_url(value: &String, _: &ConversionSettings) -> Result<Url> {
    let text = value.trim();
    if text.is_empty() {
        return Err(BuiltinError::EmptyInput {
            target_type: type_name::<Url>(),
        });
    }
    Url::parse(text).map_err(|source| BuiltinError::InvalidUri {
        input: text.to_string(),
        source,
    })
}

pub fn format_type_key(value: &TypeKey, _: &ConversionSettings) -> Result<String> {
    Ok(value.name().to_string())
}

/// Resolve a full or short type name among the catalogue types.
pub fn parse_type_key(value: &String, _: &ConversionSettings) -> Result<TypeKey> {
    let text = value.trim();
    if text.is_empty() {
        return Err(BuiltinError::EmptyInput {
            target_type: type_name::<TypeKey>(),
        });
    }
    crate::catalogue_types()
        .into_iter()
        .find(|key| key.name() == text || key.short_name() == text)
        .ok_or_else(|| BuiltinError::UnknownType {
            name: text.to_string(),
        })
}

/// Register byte, UUID, URI and type key conversions.
pub fn register(table: &mut DefinitionTable) {
    table.register(format_bytes);
    table.register(parse_bytes);
    table.register(format_uuid);
    table.register(parse_uuid);
    table.register(bytes_to_uuid);
    table.register(uuid_to_bytes);
    table.register(format_url);
    table.register(parse_url);
    table.register(format_type_key);
    table.register(parse_type_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    fn defaults() -> ConversionSettings {
        ConversionSettings::default()
    }

    fn sample() -> Uuid {
        Uuid::parse_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_bytes_text() {
        let bytes = vec![0xde, 0xad, 0xbe, 0xef];
        assert_eq!(format_bytes(&bytes, &defaults()).unwrap(), "3q2+7w==");
        assert_eq!(parse_bytes(&"3q2+7w==".to_string(), &defaults()).unwrap(), bytes);

        let hex_upper = defaults().with_format("X");
        assert_eq!(format_bytes(&bytes, &hex_upper).unwrap(), "DEADBEEF");
        assert_eq!(parse_bytes(&"deadbeef".to_string(), &hex_upper).unwrap(), bytes);

        assert!(parse_bytes(&"***".to_string(), &defaults()).is_err());
        assert!(parse_bytes(&"".to_string(), &defaults()).unwrap().is_empty());
        assert!(format_bytes(&bytes, &defaults().with_format("octal")).is_err());
    }

    #[test]
    fn test_uuid_formats() {
        let id = sample();
        assert_eq!(format_uuid(&id, &defaults()).unwrap(), SAMPLE);
        assert_eq!(
            format_uuid(&id, &defaults().with_format("N")).unwrap(),
            SAMPLE.replace('-', "")
        );
        assert_eq!(
            format_uuid(&id, &defaults().with_format("B")).unwrap(),
            format!("{{{SAMPLE}}}")
        );
        assert_eq!(
            format_uuid(&id, &defaults().with_format("P")).unwrap(),
            format!("({SAMPLE})")
        );
    }

    #[test]
    fn test_uuid_parsing() {
        let id = sample();
        for text in [
            SAMPLE.to_string(),
            SAMPLE.to_uppercase(),
            SAMPLE.replace('-', ""),
            format!("{{{SAMPLE}}}"),
            format!("({SAMPLE})"),
        ] {
            assert_eq!(parse_uuid(&text, &defaults()).unwrap(), id);
        }

        let strict = defaults().with_format("N");
        assert!(parse_uuid(&SAMPLE.to_string(), &strict).is_err());
        assert_eq!(parse_uuid(&SAMPLE.replace('-', ""), &strict).unwrap(), id);
        assert_eq!(
            parse_uuid(&format!("({SAMPLE})"), &defaults().with_format("P")).unwrap(),
            id
        );

        assert_eq!(parse_uuid(&"  ".to_string(), &defaults()).unwrap(), Uuid::nil());
        assert!(matches!(
            parse_uuid(&"not-a-uuid".to_string(), &defaults()),
            Err(BuiltinError::InvalidUuid { .. })
        ));
    }

    #[test]
    fn test_uuid_bytes() {
        let id = sample();
        let bytes = uuid_to_bytes(&id, &defaults()).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes[0], 0x67);
        assert_eq!(bytes_to_uuid(&bytes, &defaults()).unwrap(), id);
        assert!(bytes_to_uuid(&vec![1, 2, 3], &defaults()).is_err());
    }

    #[test]
    fn test_urls() {
        let url = parse_url(&" https://example.com/a?b=c ".to_string(), &defaults()).unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(format_url(&url, &defaults()).unwrap(), "https://example.com/a?b=c");
        assert!(matches!(
            parse_url(&"/relative/path".to_string(), &defaults()),
            Err(BuiltinError::InvalidUri { .. })
        ));
        assert!(matches!(
            parse_url(&String::new(), &defaults()),
            Err(BuiltinError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_type_keys() {
        let key = TypeKey::of::<Uuid>();
        let name = format_type_key(&key, &defaults()).unwrap();
        assert_eq!(parse_type_key(&name, &defaults()).unwrap(), key);
        assert_eq!(parse_type_key(&"Uuid".to_string(), &defaults()).unwrap(), key);
        assert_eq!(
            parse_type_key(&"i64".to_string(), &defaults()).unwrap(),
            TypeKey::of::<i64>()
        );
        assert!(matches!(
            parse_type_key(&"Widget".to_string(), &defaults()),
            Err(BuiltinError::UnknownType { .. })
        ));
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use scalar_convert::{
    convertible_enum, ConversionEngine, ConversionFailure, ConversionSettings, Convertible,
    StrategyKind,
};
use std::str::FromStr;
use uuid::Uuid;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter("scalar_convert=debug,convert_core=debug")
        .with_test_writer()
        .try_init()
        .ok();
}

convertible_enum! {
    enum Color: i32 {
        Red = 0,
        Green = 1,
        Blue = 2,
    }
}

convertible_enum! {
    enum Shade: u8 {
        Dark = 0,
        Light = 2,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Widget(u32);

#[derive(Debug, Clone, PartialEq)]
struct Gadget(u32);

impl Convertible for Widget {}
impl Convertible for Gadget {}

#[test]
fn test_identity_idempotence() {
    init_logging();
    let engine = ConversionEngine::new();
    assert_eq!(engine.convert::<i32, i32>(-17, None).unwrap(), -17);
    assert_eq!(engine.convert::<String, String>("x".into(), None).unwrap(), "x");
    assert_eq!(engine.convert::<Widget, Widget>(Widget(3), None).unwrap(), Widget(3));
    assert_eq!(engine.convert::<Color, Color>(Color::Blue, None).unwrap(), Color::Blue);
    assert_eq!(
        engine.convert::<Option<u8>, Option<u8>>(Some(9), None).unwrap(),
        Some(9)
    );
}

#[test]
fn test_int32_text_round_trip() {
    let engine = ConversionEngine::new();
    for n in [i32::MIN, -1_000_000, -1, 0, 1, 42, i32::MAX] {
        let text: String = engine.convert(n, None).unwrap();
        assert_eq!(engine.convert::<String, i32>(text, None).unwrap(), n);
    }
}

#[test]
fn test_empty_string_leniency() {
    let engine = ConversionEngine::new();
    for blank in ["", "   "] {
        assert_eq!(engine.convert::<String, i32>(blank.into(), None).unwrap(), 0);
        assert_eq!(engine.convert::<String, Decimal>(blank.into(), None).unwrap(), Decimal::ZERO);
        assert_eq!(engine.convert::<String, f64>(blank.into(), None).unwrap(), 0.0);
        assert!(!engine.convert::<String, bool>(blank.into(), None).unwrap());
        assert_eq!(engine.convert::<String, Uuid>(blank.into(), None).unwrap(), Uuid::nil());
    }
}

#[test]
fn test_overflow_rejection() {
    let engine = ConversionEngine::new();
    let err = engine.convert::<i64, i16>(32_768, None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::Failed);
    assert!(err.cause.is_some());
    assert_eq!(engine.convert::<i64, i16>(32_767, None).unwrap(), 32_767);
    assert!(engine.convert::<i32, u8>(-1, None).is_err());
    assert!(engine.convert::<f64, i32>(f64::NAN, None).is_err());
}

#[test]
fn test_optional_wrap_and_unwrap() {
    let engine = ConversionEngine::new();
    assert_eq!(engine.convert::<Option<i32>, i32>(Some(5), None).unwrap(), 5);
    assert_eq!(engine.convert::<Option<i32>, i32>(None, None).unwrap(), 0);
    assert_eq!(engine.convert::<i32, Option<i32>>(5, None).unwrap(), Some(5));
    assert_eq!(
        engine.convert::<Option<String>, Option<i64>>(Some("12".into()), None).unwrap(),
        Some(12)
    );
    assert_eq!(engine.convert::<Option<String>, Option<i64>>(None, None).unwrap(), None);
}

#[test]
fn test_empty_optional_of_unconvertible_pair_fails() {
    let engine = ConversionEngine::new();
    let err = engine.convert::<Option<i32>, Widget>(None, None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::IllegalEmptyOptional);
    assert!(err.to_string().contains("Option<i32>"));
    assert!(err.to_string().contains("Widget"));

    let err = engine.convert::<Option<i32>, Option<Widget>>(None, None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::IllegalEmptyOptional);
}

#[test]
fn test_empty_optional_into_type_without_zero_value() {
    let mut engine = ConversionEngine::new();
    engine.register(|value: &u32, _: &ConversionSettings| {
        Ok::<_, std::convert::Infallible>(Widget(*value))
    });
    assert_eq!(engine.convert::<Option<u32>, Widget>(Some(4), None).unwrap(), Widget(4));
    let err = engine.convert::<Option<u32>, Widget>(None, None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::NoZeroValue);
}

#[test]
fn test_enum_round_trip_by_name() {
    let engine = ConversionEngine::new();
    let text: String = engine.convert(Color::Green, None).unwrap();
    assert_eq!(text, "Green");
    assert_eq!(engine.convert::<String, Color>(text, None).unwrap(), Color::Green);
    assert_eq!(engine.convert::<String, Color>("green".into(), None).unwrap(), Color::Green);
    assert_eq!(engine.convert::<String, Color>(" BLUE ".into(), None).unwrap(), Color::Blue);

    let err = engine.convert::<String, Color>("Purple".into(), None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::Failed);
    assert!(err.cause.is_some());
}

#[test]
fn test_enum_numeric_paths() {
    let engine = ConversionEngine::new();
    assert_eq!(engine.strategy_kind::<Color, i64>(), StrategyKind::EnumSourceToPlain);
    assert_eq!(engine.convert::<Color, i64>(Color::Blue, None).unwrap(), 2);
    assert_eq!(engine.convert::<u8, Color>(1, None).unwrap(), Color::Green);
    assert_eq!(engine.convert::<String, Color>("2".into(), None).unwrap(), Color::Blue);
    assert!(engine.convert::<i32, Color>(7, None).is_err());

    let decimal = ConversionSettings::default().with_format("D");
    assert_eq!(engine.convert::<Color, String>(Color::Blue, Some(&decimal)).unwrap(), "2");
}

#[test]
fn test_enum_to_enum() {
    let engine = ConversionEngine::new();
    assert_eq!(engine.strategy_kind::<Color, Shade>(), StrategyKind::EnumSourceToEnumTarget);
    assert_eq!(engine.convert::<Color, Shade>(Color::Red, None).unwrap(), Shade::Dark);
    assert_eq!(engine.convert::<Color, Shade>(Color::Blue, None).unwrap(), Shade::Light);
    assert!(engine.convert::<Color, Shade>(Color::Green, None).is_err());
}

#[test]
fn test_optional_enum() {
    let engine = ConversionEngine::new();
    assert_eq!(
        engine.convert::<Option<String>, Option<Color>>(Some("red".into()), None).unwrap(),
        Some(Color::Red)
    );
    assert_eq!(engine.convert::<Option<Shade>, Color>(None, None).unwrap(), Color::Red);
}

#[test]
fn test_unsupported_pair() {
    let engine = ConversionEngine::new();
    let err = engine.convert::<Widget, Gadget>(Widget(1), None).unwrap_err();
    assert!(err.is_unsupported());
    assert!(err.cause.is_none());
    let message = err.to_string();
    assert!(message.contains("Widget"));
    assert!(message.contains("Gadget"));
}

#[test]
fn test_absent_settings_match_defaults() {
    let engine = ConversionEngine::new();
    let defaults = ConversionSettings::default();
    let stamp = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|date| date.and_hms_opt(13, 45, 0))
        .unwrap();
    assert_eq!(
        engine.convert::<NaiveDateTime, String>(stamp, None).unwrap(),
        engine.convert::<NaiveDateTime, String>(stamp, Some(&defaults)).unwrap()
    );
    assert_eq!(
        engine.convert::<f64, String>(1234.5, None).unwrap(),
        engine.convert::<f64, String>(1234.5, Some(&defaults)).unwrap()
    );
}

#[test]
fn test_temporal_and_scalar_samples() {
    let engine = ConversionEngine::new();
    let utc: DateTime<Utc> = engine
        .convert("2024-05-01T10:00:00+02:00".to_string(), None)
        .unwrap();
    assert_eq!(utc.to_rfc3339(), "2024-05-01T08:00:00+00:00");

    let delta: TimeDelta = engine.convert("PT1H30M".to_string(), None).unwrap();
    assert_eq!(delta, TimeDelta::minutes(90));

    let price: Decimal = engine.convert(19.99f64, None).unwrap();
    assert_eq!(price, Decimal::from_str("19.99").unwrap());

    let id = Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    let bytes: Vec<u8> = engine.convert(id, None).unwrap();
    assert_eq!(engine.convert::<Vec<u8>, Uuid>(bytes, None).unwrap(), id);

    assert_eq!(engine.convert::<bool, u64>(true, None).unwrap(), 1);
    assert!(engine.convert::<i8, bool>(-3, None).unwrap());
}

#[test]
fn test_registered_definition_replaces_builtin() {
    let mut engine = ConversionEngine::new();
    assert_eq!(engine.convert::<bool, String>(true, None).unwrap(), "true");
    let replaced = engine.register(|value: &bool, _: &ConversionSettings| {
        Ok::<_, std::convert::Infallible>(if *value { "yes" } else { "no" }.to_string())
    });
    assert!(replaced);
    assert_eq!(engine.convert::<bool, String>(true, None).unwrap(), "yes");
}

#[test]
fn test_float_narrowing_out_of_range_fails() {
    init_logging();
    let engine = ConversionEngine::new();

    assert_eq!(engine.convert::<f64, f32>(1.5, None).unwrap(), 1.5f32);
    assert!(engine.convert::<f64, f32>(f64::INFINITY, None).unwrap().is_infinite());

    let err = engine.convert::<f64, f32>(1e300, None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::Failed);
    assert!(err.cause.is_some());

    let err = engine.convert::<String, f32>("1e300".to_string(), None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::Failed);
    assert!(err.cause.is_some());

    let err = engine.convert::<String, f64>("1e400".to_string(), None).unwrap_err();
    assert_eq!(err.reason, ConversionFailure::Failed);
    assert!(err.cause.is_some());
}

#[test]
fn test_padded_single_char_text() {
    let engine = ConversionEngine::new();
    assert_eq!(engine.convert::<String, char>(" x ".to_string(), None).unwrap(), 'x');
    assert_eq!(engine.convert::<String, char>(" ".to_string(), None).unwrap(), ' ');
    assert!(engine.convert::<String, char>(" xy ".to_string(), None).is_err());
}

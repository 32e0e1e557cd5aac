//! Conversion between native values and culture-invariant text
//!
//! The text forms never depend on the locale: `True`/`False` for booleans,
//! plain decimal integers, shortest round-trip floats with
//! `NaN`/`Infinity`/`-Infinity`, and enums by variant name. Parsing accepts
//! what those rules produce plus the usual leniency (surrounding whitespace,
//! leading `+`, any letter case for booleans/enums).

use crate::error::{Result, SettingsError};
use crate::types::{Value, ValueType};
use std::str::FromStr;

/// Render a value as invariant text
pub fn to_invariant_text(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::U8(v) => v.to_string(),
        Value::I8(v) => v.to_string(),
        Value::Char(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        Value::F32(v) => float_text(*v as f64, v.to_string()),
        Value::F64(v) => float_text(*v, v.to_string()),
        Value::String(v) => v.clone(),
        Value::Enum { variant, .. } => variant.to_string(),
    }
}

fn float_text(v: f64, shortest: String) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "Infinity".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        shortest
    }
}

/// Parse invariant text as a value of `value_type`
pub fn from_invariant_text(text: &str, value_type: &ValueType) -> Result<Value> {
    let fail = || SettingsError::conversion(text, value_type);
    let trimmed = text.trim();

    let value = match value_type {
        ValueType::Bool => {
            if trimmed.eq_ignore_ascii_case("true") {
                Value::Bool(true)
            } else if trimmed.eq_ignore_ascii_case("false") {
                Value::Bool(false)
            } else {
                return Err(fail());
            }
        }
        ValueType::U8 => Value::U8(parse(trimmed).ok_or_else(fail)?),
        ValueType::I8 => Value::I8(parse(trimmed).ok_or_else(fail)?),
        ValueType::I16 => Value::I16(parse(trimmed).ok_or_else(fail)?),
        ValueType::U16 => Value::U16(parse(trimmed).ok_or_else(fail)?),
        ValueType::I32 => Value::I32(parse(trimmed).ok_or_else(fail)?),
        ValueType::U32 => Value::U32(parse(trimmed).ok_or_else(fail)?),
        ValueType::I64 => Value::I64(parse(trimmed).ok_or_else(fail)?),
        ValueType::U64 => Value::U64(parse(trimmed).ok_or_else(fail)?),
        ValueType::F32 => Value::F32(parse(trimmed).ok_or_else(fail)?),
        ValueType::F64 => Value::F64(parse(trimmed).ok_or_else(fail)?),
        ValueType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Value::Char(c),
                _ => return Err(fail()),
            }
        }
        ValueType::String => Value::String(text.to_string()),
        ValueType::Enum(ty) => Value::Enum {
            ty: *ty,
            variant: ty.variant(trimmed).ok_or_else(fail)?,
        },
    };

    Ok(value)
}

// Float parsing already accepts "Infinity", "-Infinity" and "NaN" in any case.
fn parse<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnumType, SettingValue};

    const COLORS: EnumType = EnumType {
        name: "tests::Color",
        variants: &["Red", "Green", "Blue"],
    };

    fn round_trip(value: Value) {
        let ty = value.value_type();
        let text = to_invariant_text(&value);
        let parsed = from_invariant_text(&text, &ty).unwrap();
        assert_eq!(parsed, value, "round trip through '{}'", text);
    }

    #[test]
    fn test_round_trip_all_kinds() {
        round_trip(Value::Bool(true));
        round_trip(Value::Bool(false));
        round_trip(Value::U8(u8::MAX));
        round_trip(Value::I8(i8::MIN));
        round_trip(Value::Char('ß'));
        round_trip(Value::I16(-12_345));
        round_trip(Value::U16(65_535));
        round_trip(Value::I32(i32::MIN));
        round_trip(Value::U32(u32::MAX));
        round_trip(Value::I64(i64::MAX));
        round_trip(Value::U64(u64::MAX));
        round_trip(Value::F32(0.1));
        round_trip(Value::F32(f32::MAX));
        round_trip(Value::F64(0.1 + 0.2));
        round_trip(Value::F64(1e-300));
        round_trip(Value::F64(-2.5e300));
        round_trip(Value::F64(f64::INFINITY));
        round_trip(Value::F64(f64::NEG_INFINITY));
        round_trip(Value::String("  spaced & <quoted> \"text\"  ".to_string()));
        round_trip(Value::Enum { ty: COLORS, variant: "Green" });
    }

    #[test]
    fn test_nan_round_trips_as_nan() {
        assert_eq!(to_invariant_text(&Value::F64(f64::NAN)), "NaN");
        match from_invariant_text("NaN", &ValueType::F64).unwrap() {
            Value::F64(v) => assert!(v.is_nan()),
            other => panic!("Expected F64, got {:?}", other),
        }
    }

    #[test]
    fn test_invariant_formatting() {
        assert_eq!(to_invariant_text(&Value::Bool(true)), "True");
        assert_eq!(to_invariant_text(&Value::F64(1234.5)), "1234.5");
        assert_eq!(to_invariant_text(&Value::F64(2.0)), "2");
        assert_eq!(to_invariant_text(&Value::F32(f32::NEG_INFINITY)), "-Infinity");
        assert_eq!(to_invariant_text(&Value::I64(-1_000_000)), "-1000000");
        assert_eq!(to_invariant_text(&Value::Enum { ty: COLORS, variant: "Blue" }), "Blue");
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(from_invariant_text(" true ", &ValueType::Bool).unwrap(), Value::Bool(true));
        assert_eq!(from_invariant_text("FALSE", &ValueType::Bool).unwrap(), Value::Bool(false));
        assert_eq!(from_invariant_text("+42", &ValueType::I32).unwrap(), Value::I32(42));
        assert_eq!(from_invariant_text(" 7\n", &ValueType::U8).unwrap(), Value::U8(7));
        assert_eq!(from_invariant_text("1E+21", &ValueType::F64).unwrap(), Value::F64(1e21));
        assert_eq!(
            from_invariant_text("blue", &ValueType::Enum(COLORS)).unwrap(),
            Value::Enum { ty: COLORS, variant: "Blue" }
        );
    }

    #[test]
    fn test_rejects_malformed_text() {
        assert!(from_invariant_text("not-a-number", &ValueType::I32).is_err());
        assert!(from_invariant_text("256", &ValueType::U8).is_err());
        assert!(from_invariant_text("-1", &ValueType::U32).is_err());
        assert!(from_invariant_text("1,5", &ValueType::F64).is_err());
        assert!(from_invariant_text("yes", &ValueType::Bool).is_err());
        assert!(from_invariant_text("ab", &ValueType::Char).is_err());
        assert!(from_invariant_text("", &ValueType::Char).is_err());
        assert!(from_invariant_text("Purple", &ValueType::Enum(COLORS)).is_err());

        let err = from_invariant_text("x", &ValueType::I16).unwrap_err();
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "cannot convert 'x' to i16");
    }

    #[test]
    fn test_strings_are_verbatim() {
        let value = from_invariant_text("  keep me  ", &String::value_type()).unwrap();
        assert_eq!(value, Value::String("  keep me  ".to_string()));
    }
}

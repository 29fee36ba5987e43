//! String to primitive conversion.
//!
//! [`PrimitiveConverter`] turns a raw argument into a value of a declared
//! [`FieldType`]. Numeric input is trimmed before parsing; strings pass
//! through untouched. Booleans are not convertible: switches are assigned
//! directly.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::field_type::{box_none, box_scalar, BoxedValue, FieldType, Primitive};

/// Layouts accepted for naive date-time input, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Converts raw strings into primitive field values.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveConverter;

impl PrimitiveConverter {
    /// Returns `true` if values of `ty` can be produced from a string.
    pub fn supports(ty: FieldType) -> bool {
        match ty.primitive() {
            Some(Primitive::Bool) | None => false,
            Some(_) => true,
        }
    }

    /// Returns `true` if `raw` would convert into `ty`.
    pub fn is_convertible(raw: &str, ty: FieldType) -> bool {
        Self::try_convert(raw, ty).is_some()
    }

    /// Converts `raw` into a boxed value of `ty`.
    ///
    /// Returns `None` when the type is unsupported or the input does not
    /// parse. Blank input yields `None` for nullable targets and fails for
    /// non-nullable numerics.
    pub fn try_convert(raw: &str, ty: FieldType) -> Option<BoxedValue> {
        let (primitive, nullable) = match ty {
            FieldType::Value(p) => (p, false),
            FieldType::Nullable(p) => (p, true),
            _ => return None,
        };

        match primitive {
            Primitive::Bool => None,
            Primitive::String => Some(box_scalar(raw.to_string(), nullable)),
            Primitive::Char => match raw.chars().next() {
                Some(c) => Some(box_scalar(c, nullable)),
                None if nullable => Some(box_none(primitive)),
                None => None,
            },
            _ => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return nullable.then(|| box_none(primitive));
                }
                parse_trimmed(trimmed, primitive, nullable)
            }
        }
    }
}

fn parse_trimmed(s: &str, primitive: Primitive, nullable: bool) -> Option<BoxedValue> {
    fn parsed<T: FromStr + Send + 'static>(s: &str, nullable: bool) -> Option<BoxedValue> {
        s.parse::<T>().ok().map(|v| box_scalar(v, nullable))
    }

    match primitive {
        Primitive::U8 => parsed::<u8>(s, nullable),
        Primitive::I16 => parsed::<i16>(s, nullable),
        Primitive::U16 => parsed::<u16>(s, nullable),
        Primitive::I32 => parsed::<i32>(s, nullable),
        Primitive::U32 => parsed::<u32>(s, nullable),
        Primitive::I64 => parsed::<i64>(s, nullable),
        Primitive::U64 => parsed::<u64>(s, nullable),
        Primitive::F32 => parse_float::<f32>(s).map(|v| box_scalar(v, nullable)),
        Primitive::F64 => parse_float::<f64>(s).map(|v| box_scalar(v, nullable)),
        Primitive::Decimal => parse_decimal(s).map(|v| box_scalar(v, nullable)),
        Primitive::DateTime => parse_date_time(s).map(|v| box_scalar(v, nullable)),
        Primitive::Bool | Primitive::Char | Primitive::String => None,
    }
}

/// Parses a float, rejecting values that overflow to infinity.
fn parse_float<T>(s: &str) -> Option<T>
where
    T: FromStr + Into<f64> + Copy,
{
    let value = s.parse::<T>().ok()?;
    let wide: f64 = value.into();
    let explicit_infinity = s.to_ascii_lowercase().contains("inf");
    if wide.is_infinite() && !explicit_infinity {
        return None;
    }
    Some(value)
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Converts `raw` into `T` using the primitive converter.
///
/// ```
/// use argot::convert;
///
/// assert_eq!(convert::<i32>(" 42 "), Some(42));
/// assert_eq!(convert::<Option<u16>>(""), Some(None));
/// assert_eq!(convert::<u16>(""), None);
/// assert_eq!(convert::<u8>("256"), None);
/// ```
pub fn convert<T: 'static>(raw: &str) -> Option<T> {
    PrimitiveConverter::try_convert(raw, FieldType::of::<T>())
        .and_then(|value| value.downcast::<T>().ok())
        .map(|value| *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn supports_everything_but_bool() {
        assert!(PrimitiveConverter::supports(FieldType::of::<i32>()));
        assert!(PrimitiveConverter::supports(FieldType::of::<Option<char>>()));
        assert!(PrimitiveConverter::supports(FieldType::of::<String>()));
        assert!(!PrimitiveConverter::supports(FieldType::of::<bool>()));
        assert!(!PrimitiveConverter::supports(FieldType::of::<Option<bool>>()));
        assert!(!PrimitiveConverter::supports(FieldType::of::<Vec<String>>()));
    }

    #[test]
    fn integers_are_trimmed() {
        assert_eq!(convert::<i16>("  -12\t"), Some(-12));
        assert_eq!(convert::<u64>(" 18446744073709551615 "), Some(u64::MAX));
    }

    #[test]
    fn out_of_range_fails() {
        assert_eq!(convert::<u8>("256"), None);
        assert_eq!(convert::<i16>("32768"), None);
        assert_eq!(convert::<u32>("-1"), None);
        assert_eq!(convert::<f32>("1e40"), None);
    }

    #[test]
    fn blank_input_for_nullable_is_none() {
        assert_eq!(convert::<Option<i32>>(""), Some(None));
        assert_eq!(convert::<Option<i32>>("   "), Some(None));
        assert_eq!(convert::<Option<Decimal>>(" "), Some(None));
        assert_eq!(convert::<Option<NaiveDateTime>>(""), Some(None));
    }

    #[test]
    fn blank_input_for_non_nullable_fails() {
        assert_eq!(convert::<i32>(""), None);
        assert_eq!(convert::<f64>("  "), None);
        assert_eq!(convert::<Decimal>(""), None);
        assert_eq!(convert::<char>(""), None);
    }

    #[test]
    fn strings_pass_through() {
        assert_eq!(convert::<String>(""), Some(String::new()));
        assert_eq!(convert::<String>("  a b "), Some("  a b ".to_string()));
        assert_eq!(convert::<Option<String>>(" x"), Some(Some(" x".to_string())));
    }

    #[test]
    fn char_takes_first_character() {
        assert_eq!(convert::<char>("xyz"), Some('x'));
        assert_eq!(convert::<char>("   "), Some(' '));
        assert_eq!(convert::<Option<char>>(""), Some(None));
        assert_eq!(convert::<Option<char>>("\tq"), Some(Some('\t')));
    }

    #[test]
    fn floats_and_decimals() {
        assert_eq!(convert::<f64>(" 1.5 "), Some(1.5));
        assert_eq!(convert::<f32>("-0.25"), Some(-0.25));
        assert_eq!(convert::<Decimal>("12.345"), Decimal::from_str("12.345").ok());
        assert_eq!(convert::<Decimal>("1e3"), Decimal::from_str("1000").ok());
        assert_eq!(convert::<Decimal>("abc"), None);
    }

    #[test]
    fn date_times() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(12, 30, 0).unwrap());
        assert_eq!(convert::<NaiveDateTime>("2024-03-01T12:30:00"), Some(expected));
        assert_eq!(convert::<NaiveDateTime>("2024-03-01 12:30"), Some(expected));
        assert_eq!(
            convert::<NaiveDateTime>("2024-03-01T13:30:00+01:00"),
            Some(expected)
        );
        assert_eq!(
            convert::<NaiveDateTime>("2024-03-01"),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(convert::<NaiveDateTime>("yesterday"), None);
    }

    #[test]
    fn bool_is_not_convertible() {
        assert!(!PrimitiveConverter::is_convertible("true", FieldType::of::<bool>()));
    }

    #[test]
    fn garbage_fails() {
        assert_eq!(convert::<i32>("4x2"), None);
        assert!(!PrimitiveConverter::is_convertible("nan-ish", FieldType::of::<u8>()));
    }
}

//! Parsing helpers with strict, lenient and nullable flavours.
//!
//! - `parse_strict` returns a [`ParseError`] naming the input and target type
//! - `parse_lenient` falls back to `T::default()` on failure
//! - `parse_nullable` maps absent/blank input to `None`

use std::any::type_name;
use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ParseError;
use crate::strings::StrExt;

/// Layouts tried (in order) for date/time strings without an offset.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

/// Layouts tried for date-only strings (midnight is assumed).
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse `s` as `T`, trimming surrounding whitespace.
pub fn parse_strict<T>(s: &str) -> Result<T, ParseError>
where
    T: FromStr,
    T::Err: Display,
{
    s.trim().parse::<T>().map_err(|e| ParseError::Invalid {
        input: s.to_string(),
        target: type_name::<T>(),
        reason: e.to_string(),
    })
}

/// Parse `s` as `T`, returning `T::default()` when it does not parse.
pub fn parse_lenient<T>(s: &str) -> T
where
    T: FromStr + Default,
{
    s.trim().parse::<T>().unwrap_or_default()
}

/// Parse an optional string leniently; absent or blank input yields `None`.
pub fn parse_nullable<T>(s: Option<&str>) -> Option<T>
where
    T: FromStr + Default,
{
    match s {
        Some(s) if s.is_valued() => Some(parse_lenient(s)),
        _ => None,
    }
}

/// True when `s` parses as `T`.
pub fn is_parsable<T: FromStr>(s: &str) -> bool {
    s.trim().parse::<T>().is_ok()
}

/// Parse `true`/`false` case-insensitively.
pub fn parse_bool(s: &str) -> Result<bool, ParseError> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::Invalid {
            input: s.to_string(),
            target: "bool",
            reason: "expected 'true' or 'false'".to_string(),
        })
    }
}

/// Lenient boolean: anything other than a case-insensitive `true` is `false`.
pub fn parse_bool_lenient(s: &str) -> bool {
    parse_bool(s).unwrap_or(false)
}

/// Nullable boolean: absent or blank input yields `None`.
pub fn parse_bool_nullable(s: Option<&str>) -> Option<bool> {
    match s {
        Some(s) if s.is_valued() => Some(parse_bool_lenient(s)),
        _ => None,
    }
}

// ============================================================================
// Dates and times
// ============================================================================

enum Parsed {
    Offset(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

fn parse_any(s: &str) -> Result<Parsed, ParseError> {
    let trimmed = s.trim();

    let mut last_err = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => return Ok(Parsed::Offset(dt)),
        Err(e) => (e, "RFC 3339"),
    };

    for layout in DATETIME_LAYOUTS {
        match NaiveDateTime::parse_from_str(trimmed, layout) {
            Ok(dt) => return Ok(Parsed::Naive(dt)),
            Err(e) => last_err = (e, *layout),
        }
    }

    for layout in DATE_LAYOUTS {
        match NaiveDate::parse_from_str(trimmed, layout) {
            Ok(d) => return Ok(Parsed::Naive(d.and_time(chrono::NaiveTime::MIN))),
            Err(e) => last_err = (e, *layout),
        }
    }

    Err(ParseError::DateTime {
        input: s.to_string(),
        format: last_err.1.to_string(),
        source: last_err.0,
    })
}

fn local_to_utc(naive: &NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(naive))
}

/// Parse a date/time in local wall-clock terms.
///
/// Strings carrying an offset are converted to local time; strings without
/// one are taken as already local.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, ParseError> {
    Ok(match parse_any(s)? {
        Parsed::Offset(dt) => dt.with_timezone(&Local).naive_local(),
        Parsed::Naive(dt) => dt,
    })
}

/// Parse a date/time with an exact chrono layout.
///
/// Date-only layouts are accepted and yield midnight.
pub fn parse_datetime_exact(s: &str, format: &str) -> Result<NaiveDateTime, ParseError> {
    let trimmed = s.trim();
    match NaiveDateTime::parse_from_str(trimmed, format) {
        Ok(dt) => Ok(dt),
        Err(err) => NaiveDate::parse_from_str(trimmed, format)
            .map(|d| d.and_time(chrono::NaiveTime::MIN))
            .map_err(|_| ParseError::DateTime {
                input: s.to_string(),
                format: format.to_string(),
                source: err,
            }),
    }
}

/// Parse a date/time and convert it to UTC.
///
/// Strings without an offset are interpreted as local time.
pub fn parse_utc_datetime(s: &str) -> Result<DateTime<Utc>, ParseError> {
    Ok(match parse_any(s)? {
        Parsed::Offset(dt) => dt.with_timezone(&Utc),
        Parsed::Naive(dt) => local_to_utc(&dt),
    })
}

/// Parse a date/time with an exact layout and convert it from local time to UTC.
pub fn parse_utc_datetime_exact(s: &str, format: &str) -> Result<DateTime<Utc>, ParseError> {
    parse_datetime_exact(s, format).map(|dt| local_to_utc(&dt))
}

/// Parse a date/time and keep its wall-clock value, discarding any offset.
pub fn parse_datetime_ignore_offset(s: &str) -> Result<NaiveDateTime, ParseError> {
    Ok(match parse_any(s)? {
        Parsed::Offset(dt) => dt.naive_local(),
        Parsed::Naive(dt) => dt,
    })
}

/// Nullable [`parse_datetime`]: absent or blank input yields `Ok(None)`.
pub fn parse_datetime_nullable(s: Option<&str>) -> Result<Option<NaiveDateTime>, ParseError> {
    match s {
        Some(s) if s.is_valued() => parse_datetime(s).map(Some),
        _ => Ok(None),
    }
}

/// Nullable [`parse_utc_datetime`].
pub fn parse_utc_datetime_nullable(s: Option<&str>) -> Result<Option<DateTime<Utc>>, ParseError> {
    match s {
        Some(s) if s.is_valued() => parse_utc_datetime(s).map(Some),
        _ => Ok(None),
    }
}

/// Nullable [`parse_datetime_ignore_offset`].
pub fn parse_datetime_ignore_offset_nullable(
    s: Option<&str>,
) -> Result<Option<NaiveDateTime>, ParseError> {
    match s {
        Some(s) if s.is_valued() => parse_datetime_ignore_offset(s).map(Some),
        _ => Ok(None),
    }
}

/// True when `s` parses with [`parse_datetime`].
pub fn is_datetime(s: &str) -> bool {
    parse_any(s).is_ok()
}

/// True when `s` parses with [`parse_datetime_exact`].
pub fn is_datetime_exact(s: &str, format: &str) -> bool {
    parse_datetime_exact(s, format).is_ok()
}

// ============================================================================
// Identifiers and JSON
// ============================================================================

/// A stable, name-based UUID for `s`: equal strings always map to equal ids.
pub fn stable_uuid(s: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, s.as_bytes())
}

/// Serialize `value` as indented JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Deserialize `T` from JSON.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, ParseError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde::Deserialize;

    #[test]
    fn strict_parse_reports_input_and_type() {
        let err = parse_strict::<i32>("12x").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'12x'"));
        assert!(msg.contains("i32"));
    }

    #[test]
    fn strict_parse_trims() {
        assert_eq!(parse_strict::<i64>("  42 ").unwrap(), 42);
        assert_eq!(parse_strict::<f64>("1.5").unwrap(), 1.5);
    }

    #[test]
    fn lenient_parse_defaults() {
        assert_eq!(parse_lenient::<i32>("nope"), 0);
        assert_eq!(parse_lenient::<i16>("-7"), -7);
        assert_eq!(parse_lenient::<u8>("300"), 0);
    }

    #[test]
    fn nullable_parse() {
        assert_eq!(parse_nullable::<i32>(None), None);
        assert_eq!(parse_nullable::<i32>(Some("   ")), None);
        assert_eq!(parse_nullable::<i32>(Some("5")), Some(5));
        assert_eq!(parse_nullable::<i32>(Some("five")), Some(0));
    }

    #[test]
    fn parsable_checks() {
        assert!(is_parsable::<i16>("123"));
        assert!(!is_parsable::<i16>("70000"));
        assert!(is_parsable::<f32>("1e3"));
        assert!(!is_parsable::<i8>("x"));
    }

    #[test]
    fn bool_parsing() {
        assert!(parse_bool(" TRUE ").unwrap());
        assert!(!parse_bool("False").unwrap());
        assert!(parse_bool("yes").is_err());
        assert!(!parse_bool_lenient("yes"));
        assert_eq!(parse_bool_nullable(Some("")), None);
        assert_eq!(parse_bool_nullable(Some("true")), Some(true));
    }

    #[test]
    fn datetime_without_offset() {
        let dt = parse_datetime("2024-03-01 12:30:15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (12, 30, 15));
    }

    #[test]
    fn datetime_date_only_is_midnight() {
        let dt = parse_datetime("2024-03-01").unwrap();
        assert_eq!(dt.hour(), 0);
        let us = parse_datetime("03/01/2024").unwrap();
        assert_eq!(dt, us);
    }

    #[test]
    fn datetime_rejects_garbage() {
        assert!(parse_datetime("not a date").is_err());
        assert!(!is_datetime("2024-13-45"));
    }

    #[test]
    fn utc_conversion_applies_offset() {
        let dt = parse_utc_datetime("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn ignore_offset_keeps_wall_clock() {
        let dt = parse_datetime_ignore_offset("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn exact_layouts() {
        let dt = parse_datetime_exact("01-03-2024 08:15", "%d-%m-%Y %H:%M").unwrap();
        assert_eq!((dt.day(), dt.month(), dt.hour()), (1, 3, 8));
        let date_only = parse_datetime_exact("2024|03|01", "%Y|%m|%d").unwrap();
        assert_eq!(date_only.hour(), 0);
        assert!(!is_datetime_exact("2024-03-01", "%d/%m/%Y"));
    }

    #[test]
    fn nullable_datetimes() {
        assert!(parse_datetime_nullable(None).unwrap().is_none());
        assert!(parse_utc_datetime_nullable(Some(" ")).unwrap().is_none());
        assert!(parse_datetime_ignore_offset_nullable(Some("2024-03-01"))
            .unwrap()
            .is_some());
        assert!(parse_datetime_nullable(Some("garbage")).is_err());
    }

    #[test]
    fn stable_uuid_is_deterministic() {
        assert_eq!(stable_uuid("orders"), stable_uuid("orders"));
        assert_ne!(stable_uuid("orders"), stable_uuid("order"));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ingredient {
        name: String,
        grams: u32,
    }

    #[test]
    fn json_helpers() {
        let flour = Ingredient {
            name: "flour".to_string(),
            grams: 500,
        };
        let json = to_json(&flour).unwrap();
        assert!(json.contains('\n'));
        let back: Ingredient = from_json(&json).unwrap();
        assert_eq!(back, flour);
        assert!(from_json::<Ingredient>("{").is_err());
    }
}

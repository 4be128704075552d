//! Conversion of raw string literals into typed literals.

use crate::query::config::{describe_format, ProcessorConfig};
use crate::query::error::{QueryError, QueryResult};
use crate::query::expr::{DateLiteral, GlobLiteral, RegexLiteral, StringLiteral};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use regex::Regex;
use std::fmt::{Display, Write};

/// Whether `value` renders back to exactly `raw`; rejects unpadded fields
fn renders_as(value: impl Display, raw: &str) -> bool {
    let mut rendered = String::with_capacity(raw.len());
    write!(rendered, "{}", value).is_ok() && rendered == raw
}

fn parse_exact_date_time(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(raw, format).ok()?;
    renders_as(parsed.format(format), raw).then_some(parsed)
}

fn parse_exact_date(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDate::parse_from_str(raw, format).ok()?;
    if !renders_as(parsed.format(format), raw) {
        return None;
    }
    parsed.and_hms_opt(0, 0, 0)
}

/// Granularity used to walk out of a DST gap
const GAP_STEP_MINUTES: i64 = 15;
/// Longest gap walked for date-only input, in steps
const MAX_GAP_STEPS: i64 = 16;

/// Map a wall-clock time to an instant in `tz`.
///
/// An ambiguous time resolves to the earlier instant. A skipped time is
/// rejected unless `skip_gap` is set, in which case the first valid instant
/// after the gap is used.
fn resolve_local<Tz: TimeZone>(
    tz: &Tz,
    naive: NaiveDateTime,
    skip_gap: bool,
) -> Option<DateTime<Tz>> {
    if let Some(value) = tz.from_local_datetime(&naive).earliest() {
        return Some(value);
    }
    if !skip_gap {
        return None;
    }
    (1..=MAX_GAP_STEPS).find_map(|step| {
        let shifted = naive.checked_add_signed(Duration::minutes(step * GAP_STEP_MINUTES))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

/// Parse a date or date-time as wall-clock time in `tz`.
///
/// Date-only input resolves to the start of that day: midnight, or the first
/// valid instant when a DST transition skips midnight. A date-time skipped by
/// a DST transition is rejected; an ambiguous one resolves to the earlier
/// instant.
pub fn parse_date_in<Tz: TimeZone>(
    tz: &Tz,
    raw: &str,
    config: &ProcessorConfig,
) -> Option<DateTime<Tz>> {
    if let Some(naive) = parse_exact_date_time(raw, &config.date_time_format) {
        return resolve_local(tz, naive, false);
    }
    let naive = parse_exact_date(raw, &config.date_format)?;
    resolve_local(tz, naive, true)
}

/// Parse a date or date-time in local time; see [`parse_date_in`].
pub fn parse_date(raw: &str, config: &ProcessorConfig) -> Option<DateTime<Local>> {
    parse_date_in(&Local, raw, config)
}

/// Convert a string literal compared against a date field
pub fn to_date_literal(
    literal: &StringLiteral,
    config: &ProcessorConfig,
) -> QueryResult<DateLiteral> {
    match parse_date(&literal.raw, config) {
        Some(value) => Ok(DateLiteral {
            value,
            pos: literal.pos,
        }),
        None => Err(QueryError::InvalidDate {
            pos: literal.pos,
            raw: literal.raw.clone(),
            date_format: describe_format(&config.date_format),
            date_time_format: describe_format(&config.date_time_format),
        }),
    }
}

/// Convert a string literal used as a glob pattern.
///
/// The pattern is not validated here.
pub fn to_glob_literal(literal: StringLiteral) -> GlobLiteral {
    GlobLiteral {
        pattern: literal.raw,
        pos: literal.pos,
    }
}

/// Compile a string literal used as a regular expression
pub fn to_regex_literal(literal: &StringLiteral) -> QueryResult<RegexLiteral> {
    Regex::new(&literal.raw)
        .map(|regex| RegexLiteral {
            regex,
            pos: literal.pos,
        })
        .map_err(|err| QueryError::InvalidRegex {
            pos: literal.pos,
            raw: literal.raw.clone(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::position::Position;
    use chrono::{NaiveTime, Offset};
    use chrono_tz::America::Sao_Paulo;

    fn literal(raw: &str) -> StringLiteral {
        StringLiteral {
            raw: raw.to_string(),
            pos: Position::new(1, 14),
        }
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .earliest()
            .unwrap()
    }

    #[test]
    fn test_parse_date_only() {
        let config = ProcessorConfig::default();
        assert_eq!(
            parse_date("2017-07-16", &config),
            Some(local(2017, 7, 16, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_date_time() {
        let config = ProcessorConfig::default();
        assert_eq!(
            parse_date("2017-07-16 23:59:59", &config),
            Some(local(2017, 7, 16, 23, 59, 59))
        );
    }

    #[test]
    fn test_parse_date_rejects_other_shapes() {
        let config = ProcessorConfig::default();
        for raw in [
            "2017-09-1",
            "2017-9-01",
            "17-09-01",
            "2017-09-01T10:00:00",
            "2017-09-01 10:00",
            "2017-02-30",
            "yesterday",
            "",
        ] {
            assert_eq!(parse_date(raw, &config), None, "{:?} should be rejected", raw);
        }
    }

    #[test]
    fn test_parse_date_with_custom_formats() {
        let config = ProcessorConfig::with_date_formats("%d/%m/%Y", "%d/%m/%Y %H:%M");
        assert_eq!(
            parse_date("16/07/2017", &config),
            Some(local(2017, 7, 16, 0, 0, 0))
        );
        assert_eq!(
            parse_date("16/07/2017 08:30", &config),
            Some(local(2017, 7, 16, 8, 30, 0))
        );
        assert_eq!(parse_date("2017-07-16", &config), None);
    }

    #[test]
    fn test_date_only_in_dst_gap_starts_after_gap() {
        // Sao Paulo skipped 00:00-01:00 on 2018-11-04
        let config = ProcessorConfig::default();
        let date = parse_date_in(&Sao_Paulo, "2018-11-04", &config).unwrap();
        assert_eq!(
            date.naive_local(),
            NaiveDate::from_ymd_opt(2018, 11, 4)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        );

        let midnight = parse_date_in(&Sao_Paulo, "2018-11-05", &config).unwrap();
        assert_eq!(midnight.naive_local().time(), NaiveTime::MIN);
    }

    #[test]
    fn test_date_time_in_dst_gap_is_rejected() {
        let config = ProcessorConfig::default();
        assert_eq!(parse_date_in(&Sao_Paulo, "2018-11-04 00:30:00", &config), None);
        assert!(parse_date_in(&Sao_Paulo, "2018-11-04 01:30:00", &config).is_some());
    }

    #[test]
    fn test_ambiguous_date_time_takes_earlier_instant() {
        // Sao Paulo repeated 23:00-00:00 on 2019-02-16
        let config = ProcessorConfig::default();
        let date = parse_date_in(&Sao_Paulo, "2019-02-16 23:30:00", &config).unwrap();
        assert_eq!(date.offset().fix().local_minus_utc(), -2 * 3600);
    }

    #[test]
    fn test_invalid_date_error() {
        let err = to_date_literal(&literal("2017-09-1"), &ProcessorConfig::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "1:14: Invalid date: 2017-09-1. Format must be either YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"
        );
    }

    #[test]
    fn test_date_literal_keeps_position() {
        let date = to_date_literal(&literal("2017-07-16"), &ProcessorConfig::default()).unwrap();
        assert_eq!(date.pos, Position::new(1, 14));
        assert_eq!(date.value, local(2017, 7, 16, 0, 0, 0));
    }

    #[test]
    fn test_glob_literal() {
        let glob = to_glob_literal(literal("Added*"));
        assert_eq!(glob.pattern, "Added*");
        assert_eq!(glob.pos, Position::new(1, 14));

        // Malformed globs are left for the evaluator to reject
        assert_eq!(to_glob_literal(literal("[abc")).pattern, "[abc");
    }

    #[test]
    fn test_regex_literal() {
        let regex = to_regex_literal(&literal(r"^Added\s+.*$")).unwrap();
        assert_eq!(regex.source(), r"^Added\s+.*$");
        assert!(regex.regex.is_match("Added   support"));
    }

    #[test]
    fn test_invalid_regex_error() {
        let compile_error = Regex::new("[Invalid Regex").unwrap_err().to_string();
        let err = to_regex_literal(&literal("[Invalid Regex")).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("1:14: Invalid regex [Invalid Regex: {}", compile_error)
        );
        assert_eq!(err.position(), Some(Position::new(1, 14)));
    }
}

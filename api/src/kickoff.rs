//! Kickoff timestamps and the fixed display timezone.
//!
//! Upstream integrations disagree on whether a timestamp is already in
//! local time. A string with an explicit UTC marker (`T`, `Z`, `±HH:MM`) is
//! an instant and gets converted; a string without one is already wall-clock
//! time in the display timezone.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use serde_json::Value;

/// Turkey time, UTC+3, with no daylight saving.
pub const DISPLAY_OFFSET_SECS: i32 = 3 * 3600;

/// Unix timestamps above this are milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

const NAIVE_DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const NAIVE_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d-%m-%Y", "%Y/%m/%d"];

const ZONED_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

const UTC_NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn display_tz() -> FixedOffset {
    FixedOffset::east_opt(DISPLAY_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Kickoff from a JSON value: a Unix timestamp (number or digit string) or
/// any of the supported date-time strings.
pub fn from_value(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::Number(n) => n.as_i64().and_then(from_unix),
        Value::String(s) => parse(s),
        _ => None,
    }
}

pub fn from_unix(ts: i64) -> Option<DateTime<Utc>> {
    if ts <= 0 {
        return None;
    }
    if ts >= MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

/// Parse a kickoff string in any encoding we have seen upstream.
pub fn parse(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s.parse::<i64>().ok().and_then(from_unix);
    }

    if has_zone_marker(s) {
        return parse_zoned(s);
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    display_tz()
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Combine separate date and clock fields ("15.05.2024" + "18:00").
/// A clock that is not HH:MM (StatPal reuses the field for "FT") is ignored,
/// and so is any clock next to a date that already carries its own time.
pub fn parse_date_time(date: &str, time: Option<&str>) -> Option<DateTime<Utc>> {
    time.map(str::trim)
        .filter(|t| is_clock(t))
        .and_then(|clock| parse(&format!("{} {clock}", date.trim())))
        .or_else(|| parse(date))
}

/// Drop seconds and below. Output only carries `HH:MM`, so status decisions
/// must see the same instant a re-read of that output would.
pub fn truncate_to_minute(kickoff: DateTime<Utc>) -> DateTime<Utc> {
    kickoff
        .with_second(0)
        .and_then(|k| k.with_nanosecond(0))
        .unwrap_or(kickoff)
}

/// `YYYY-MM-DD` and `HH:MM` in the display timezone.
pub fn display_parts(kickoff: DateTime<Utc>) -> (String, String) {
    let local = kickoff.with_timezone(&display_tz());
    (local.format("%Y-%m-%d").to_string(), local.format("%H:%M").to_string())
}

fn has_zone_marker(s: &str) -> bool {
    // Only look past the date part; legacy dates use '-' as a separator.
    s.contains('T')
        || s.ends_with('Z')
        || s.ends_with('z')
        || s.get(10..).is_some_and(|rest| rest.contains('+') || rest.contains('-'))
}

fn parse_zoned(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(dt) = ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    // "2024-05-01T18:00:00" / "2024-05-01 18:00:00Z": a UTC marker with no offset.
    let bare = s.trim_end_matches(['Z', 'z']);
    let bare = bare.replacen(' ', "T", 1);
    UTC_NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&bare, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn is_clock(s: &str) -> bool {
    let mut parts = s.split(':');
    let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
        return false;
    };
    h.len() <= 2 && m.len() == 2 && h.parse::<u32>().is_ok_and(|h| h < 24) && m.parse::<u32>().is_ok_and(|m| m < 60)
}

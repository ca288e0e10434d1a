//! Display formatting for heatmap values, raw counts and timestamps

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Placeholder shown for values that cannot be displayed
pub const PLACEHOLDER: &str = "—";

/// Shown when the payload carries no timestamp
pub const NOT_AVAILABLE: &str = "Not available";

/// Maximum fraction digits shown for raw counts
const COUNT_FRACTION_DIGITS: usize = 3;

/// Format a heat value with two decimals, or the placeholder when non-finite.
pub fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        PLACEHOLDER.to_string()
    }
}

/// Format a raw count with thousands grouping, e.g. `1234567.5` -> `1,234,567.5`.
pub fn format_count(count: f64) -> String {
    if !count.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let fixed = format!("{:.*}", COUNT_FRACTION_DIGITS, count.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if count < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format the payload's `updated_at` for display in the local timezone.
pub fn format_updated_at(raw: Option<&str>) -> String {
    format_updated_at_in(raw, &Local)
}

/// Format `updated_at` in `tz`.
///
/// Missing or blank input gives "Not available"; input that does not parse as
/// a timestamp is shown as-is.
pub fn format_updated_at_in<Tz>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return NOT_AVAILABLE.to_string(),
    };

    match parse_timestamp(raw, tz) {
        Some(ts) => ts.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => raw.to_string(),
    }
}

/// Parse an ISO-style timestamp into `tz`.
///
/// Offsets may be written with or without a colon. Naive date-times are read
/// in `tz`; a bare date is midnight UTC.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(tz));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(tz));
    }

    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0.00");
        assert_eq!(format_value(3.14159), "3.14");
        assert_eq!(format_value(-1.005), "-1.00");
        assert_eq!(format_value(f64::NAN), "—");
        assert_eq!(format_value(f64::INFINITY), "—");
    }

    #[test]
    fn test_format_count_grouping() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(-98765.0), "-98,765");
    }

    #[test]
    fn test_format_count_fractions() {
        assert_eq!(format_count(1234.5), "1,234.5");
        assert_eq!(format_count(0.12345), "0.123");
        assert_eq!(format_count(-0.0001), "0");
        assert_eq!(format_count(f64::NAN), "—");
    }

    #[test]
    fn test_updated_at_missing() {
        assert_eq!(format_updated_at_in(None, &Utc), "Not available");
        assert_eq!(format_updated_at_in(Some("  "), &Utc), "Not available");
    }

    #[test]
    fn test_updated_at_unparseable_falls_back_to_raw() {
        assert_eq!(format_updated_at_in(Some("yesterday-ish"), &Utc), "yesterday-ish");
    }

    #[test]
    fn test_updated_at_rfc3339() {
        let formatted = format_updated_at_in(Some("2024-03-05T14:07:09Z"), &Utc);
        assert_eq!(formatted, "3/5/2024, 2:07:09 PM");

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let formatted = format_updated_at_in(Some("2024-03-05T23:30:00+00:00"), &plus_two);
        assert_eq!(formatted, "3/6/2024, 1:30:00 AM");
    }

    #[test]
    fn test_updated_at_naive_is_local() {
        let formatted = format_updated_at_in(Some("2024-12-31T08:00:00.250"), &Utc);
        assert_eq!(formatted, "12/31/2024, 8:00:00 AM");

        let formatted = format_updated_at_in(Some("2024-12-31 20:15:00"), &Utc);
        assert_eq!(formatted, "12/31/2024, 8:15:00 PM");
    }

    #[test]
    fn test_updated_at_offset_without_colon() {
        let formatted = format_updated_at_in(Some("2024-05-01T12:00:00+0000"), &Utc);
        assert_eq!(formatted, "5/1/2024, 12:00:00 PM");

        let formatted = format_updated_at_in(Some("2024-05-01T12:00:00.5-0230"), &Utc);
        assert_eq!(formatted, "5/1/2024, 2:30:00 PM");
    }

    #[test]
    fn test_updated_at_date_only_is_utc_midnight() {
        assert_eq!(format_updated_at_in(Some("2024-05-01"), &Utc), "5/1/2024, 12:00:00 AM");

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let formatted = format_updated_at_in(Some("2024-05-01"), &minus_five);
        assert_eq!(formatted, "4/30/2024, 7:00:00 PM");
    }
}

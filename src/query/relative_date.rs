use std::sync::LazyLock;

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use regex::Regex;

use crate::query::QueryServiceError;

/// Relative amounts at or above this are rejected to keep date math in range.
const MAX_RELATIVE_AMOUNT: u32 = 10_000;

static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?P<number>[0-9]+)(?P<interval>[a-z])$").expect("static regex is valid")
});

/// Parse a relative bound such as `-7d` into an instant before `now`.
///
/// Units: `h` hours, `d` days, `w` weeks, `m` months, `y` years.
/// Returns `None` if `value` is not a relative bound at all.
pub fn parse_relative(value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let caps = RELATIVE_DATE.captures(value)?;
    let number: u32 = caps["number"].parse().ok()?;
    if number >= MAX_RELATIVE_AMOUNT {
        return None;
    }

    match &caps["interval"] {
        "h" => now.checked_sub_signed(Duration::hours(number.into())),
        "d" => now.checked_sub_signed(Duration::days(number.into())),
        "w" => now.checked_sub_signed(Duration::weeks(number.into())),
        "m" => now.checked_sub_months(Months::new(number)),
        "y" => now.checked_sub_months(Months::new(number.checked_mul(12)?)),
        _ => None,
    }
}

/// Resolve one side of a date range to an absolute instant.
///
/// `None` and `"all"` mean unbounded. Accepts relative bounds, RFC 3339
/// timestamps and `YYYY-MM-DD` dates (midnight UTC).
pub fn resolve_bound(
    value: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, QueryServiceError> {
    let Some(value) = value.map(str::trim) else {
        return Ok(None);
    };
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    if let Some(instant) = parse_relative(value, now) {
        return Ok(Some(instant));
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        && let Some(midnight) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(Some(midnight.and_utc()));
    }

    Err(QueryServiceError::InvalidDate {
        value: value.to_string(),
        message: "expected -<n>[hdwmy], an RFC 3339 timestamp, YYYY-MM-DD or 'all'".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_relative_units() {
        assert_eq!(
            parse_relative("-7d", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap())
        );
        assert_eq!(
            parse_relative("-3h", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 31, 9, 0, 0).unwrap())
        );
        assert_eq!(
            parse_relative("-2w", now()),
            Some(Utc.with_ymd_and_hms(2024, 3, 17, 12, 0, 0).unwrap())
        );
        // Month arithmetic clamps to the end of the shorter month
        assert_eq!(
            parse_relative("-1m", now()),
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap())
        );
        assert_eq!(
            parse_relative("-1y", now()),
            Some(Utc.with_ymd_and_hms(2023, 3, 31, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_relative_without_sign() {
        assert_eq!(parse_relative("1d", now()), parse_relative("-1d", now()));
    }

    #[test]
    fn test_parse_relative_rejects_large_and_unknown() {
        assert_eq!(parse_relative("-10000d", now()), None);
        assert_eq!(parse_relative("-5x", now()), None);
        assert_eq!(parse_relative("-5dd", now()), None);
        assert!(parse_relative("-9999d", now()).is_some());
    }

    #[test]
    fn test_resolve_bound_forms() {
        assert_eq!(resolve_bound(None, now()), Ok(None));
        assert_eq!(resolve_bound(Some("all"), now()), Ok(None));
        assert_eq!(resolve_bound(Some(""), now()), Ok(None));
        assert_eq!(
            resolve_bound(Some("2024-01-15T12:30:00+02:00"), now()),
            Ok(Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()))
        );
        assert_eq!(
            resolve_bound(Some("2024-01-15"), now()),
            Ok(Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()))
        );
    }

    #[test]
    fn test_resolve_bound_invalid() {
        let err = resolve_bound(Some("yesterday"), now()).unwrap_err();
        assert!(matches!(err, QueryServiceError::InvalidDate { ref value, .. } if value == "yesterday"));
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Unix seconds for a loosely formatted date; `now` when absent or unparseable.
pub fn parse_timestamp(raw: Option<&str>, now: DateTime<Utc>) -> i64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(parse_any)
        .unwrap_or(now)
        .timestamp()
}

fn parse_any(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn long_month_names() {
        let expected = Utc.with_ymd_and_hms(2023, 12, 17, 0, 0, 0).unwrap().timestamp();
        assert_eq!(parse_timestamp(Some("December 17, 2023"), now()), expected);
        assert_eq!(parse_timestamp(Some("Dec 17, 2023"), now()), expected);
        assert_eq!(parse_timestamp(Some(" 2023-12-17 "), now()), expected);
    }

    #[test]
    fn rfc3339_with_offset() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap().timestamp();
        assert_eq!(
            parse_timestamp(Some("2024-03-01T12:00:00+02:00"), now()),
            expected
        );
    }

    #[test]
    fn garbage_and_missing_fall_back_to_now() {
        assert_eq!(parse_timestamp(Some("last tuesday"), now()), now().timestamp());
        assert_eq!(parse_timestamp(Some(""), now()), now().timestamp());
        assert_eq!(parse_timestamp(None, now()), now().timestamp());
    }
}

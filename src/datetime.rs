//! Timestamp parsing and humanized relative times.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::i18n::Localizer;

/// Produces a relative-duration string ("3 hours ago") from a stored timestamp.
pub trait Humanizer {
    /// Humanize `timestamp`. Unparsable input is returned unchanged.
    fn humanize(&self, timestamp: &str) -> String;
}

/// Parse a stored timestamp (RFC3339 or SQLite `YYYY-MM-DD HH:MM:SS`, UTC).
pub fn parse_timestamp(datetime_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(datetime_str, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a UTC time in the SQLite storage format.
pub fn to_storage(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Catalog-backed [`Humanizer`] measuring against a reference clock.
///
/// Uses the `time.*` keys of the catalog; one-count units use the singular
/// key (`time.hour`), others the plural (`time.hours`).
pub struct RelativeTime<'a> {
    localizer: &'a dyn Localizer,
    now: Option<DateTime<Utc>>,
}

impl<'a> RelativeTime<'a> {
    /// Measure against the wall clock.
    pub fn new(localizer: &'a dyn Localizer) -> Self {
        Self {
            localizer,
            now: None,
        }
    }

    /// Measure against a fixed reference time.
    pub fn at(localizer: &'a dyn Localizer, now: DateTime<Utc>) -> Self {
        Self {
            localizer,
            now: Some(now),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn unit(&self, count: i64, singular: &str, plural: &str) -> String {
        let key = if count == 1 { singular } else { plural };
        self.localizer
            .t_with(key, &[("count", count.to_string().as_str())])
    }
}

impl Humanizer for RelativeTime<'_> {
    fn humanize(&self, timestamp: &str) -> String {
        let Some(then) = parse_timestamp(timestamp) else {
            return timestamp.to_string();
        };

        let elapsed = self.now().signed_duration_since(then);
        let secs = elapsed.num_seconds();

        if secs < 0 {
            return self.localizer.t_with("time.in_future", &[]);
        }

        let days = elapsed.num_days();
        if days >= 365 {
            self.unit(days / 365, "time.year", "time.years")
        } else if days >= 30 {
            self.unit(days / 30, "time.month", "time.months")
        } else if days >= 1 {
            self.unit(days, "time.day", "time.days")
        } else if elapsed.num_hours() >= 1 {
            self.unit(elapsed.num_hours(), "time.hour", "time.hours")
        } else if elapsed.num_minutes() >= 1 {
            self.unit(elapsed.num_minutes(), "time.minute", "time.minutes")
        } else {
            self.localizer.t_with("time.just_now", &[])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::I18n;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        to_storage(&(reference() - d))
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let dt = parse_timestamp("2024-01-15T10:30:00+09:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_sqlite() {
        let dt = parse_timestamp("2024-01-15 10:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_invalid() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_to_storage() {
        assert_eq!(to_storage(&reference()), "2024-06-15 12:00:00");
    }

    #[test]
    fn test_humanize_units() {
        let i18n = I18n::builtin("en").unwrap();
        let rt = RelativeTime::at(&i18n, reference());

        assert_eq!(rt.humanize(&ago(Duration::seconds(20))), "just now");
        assert_eq!(rt.humanize(&ago(Duration::minutes(1))), "1 minute ago");
        assert_eq!(rt.humanize(&ago(Duration::minutes(45))), "45 minutes ago");
        assert_eq!(rt.humanize(&ago(Duration::hours(3))), "3 hours ago");
        assert_eq!(rt.humanize(&ago(Duration::days(1))), "1 day ago");
        assert_eq!(rt.humanize(&ago(Duration::days(12))), "12 days ago");
        assert_eq!(rt.humanize(&ago(Duration::days(65))), "2 months ago");
        assert_eq!(rt.humanize(&ago(Duration::days(400))), "1 year ago");
        assert_eq!(rt.humanize(&ago(Duration::days(365 * 3))), "3 years ago");
    }

    #[test]
    fn test_humanize_future() {
        let i18n = I18n::builtin("en").unwrap();
        let rt = RelativeTime::at(&i18n, reference());
        let later = to_storage(&(reference() + Duration::hours(2)));
        assert_eq!(rt.humanize(&later), "in the future");
    }

    #[test]
    fn test_humanize_unparsable_passthrough() {
        let i18n = I18n::builtin("en").unwrap();
        let rt = RelativeTime::at(&i18n, reference());
        assert_eq!(rt.humanize("not a date"), "not a date");
    }

    #[test]
    fn test_humanize_localized() {
        let i18n = I18n::builtin("ja").unwrap();
        let rt = RelativeTime::at(&i18n, reference());
        assert_eq!(rt.humanize(&ago(Duration::hours(5))), "5時間前");
    }
}

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::DashboardError;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve a configured timezone name. `"auto"` means the system timezone.
pub fn resolve_timezone(name: &str) -> Result<Tz, DashboardError> {
    let resolved = if name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        name.to_string()
    };
    resolved
        .parse::<Tz>()
        .map_err(|_| DashboardError::Config(format!("unknown timezone {}", resolved)))
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Naive layouts tried in order after RFC 3339. `%.f` accepts an optional
/// fractional part.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Offset-bearing layouts that RFC 3339 parsing rejects.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses `Time` cells into wall-clock timestamps of one dataset timezone.
///
/// Naive inputs are taken as already being in that timezone; inputs that
/// carry an offset are converted into it.
#[derive(Debug, Clone, Copy)]
pub struct TimestampParser {
    tz: Tz,
}

impl TimestampParser {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Parse one cell. Returns `None` for empty or unrecognised input.
    pub fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        let s = raw.trim();
        if s.is_empty() {
            return None;
        }

        let normalised = match s.strip_suffix('Z') {
            Some(stripped) => format!("{}+00:00", stripped),
            None => s.to_string(),
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&self.tz).naive_local());
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalised, fmt) {
                return Some(dt.with_timezone(&self.tz).naive_local());
            }
        }

        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        warn!("could not parse timestamp \"{}\"", s);
        None
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_iso_naive() {
        let p = TimestampParser::utc();
        assert_eq!(
            p.parse("2024-01-01T00:00:00"),
            Some(ymd_hms(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            p.parse("2024-01-01 01:30:15"),
            Some(ymd_hms(2024, 1, 1, 1, 30, 15))
        );
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let ts = TimestampParser::utc().parse("2024-03-05 10:00:00.250").unwrap();
        assert_eq!(ts.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_parse_minutes_only_and_slashes() {
        let p = TimestampParser::utc();
        assert_eq!(p.parse("2024-01-01 08:15"), Some(ymd_hms(2024, 1, 1, 8, 15, 0)));
        assert_eq!(
            p.parse("2024/01/02 08:15:00"),
            Some(ymd_hms(2024, 1, 2, 8, 15, 0))
        );
    }

    #[test]
    fn test_parse_date_only() {
        let p = TimestampParser::utc();
        assert_eq!(p.parse("2024-02-29"), Some(ymd_hms(2024, 2, 29, 0, 0, 0)));
    }

    #[test]
    fn test_parse_z_suffix_converts_into_dataset_timezone() {
        let bogota: Tz = "America/Bogota".parse().unwrap();
        let p = TimestampParser::new(bogota);
        // Bogotá is UTC-5 with no DST.
        assert_eq!(
            p.parse("2024-01-01T05:00:00Z"),
            Some(ymd_hms(2024, 1, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_space_separated_offset() {
        let p = TimestampParser::utc();
        assert_eq!(
            p.parse("2024-01-01 00:00:00-05:00"),
            Some(ymd_hms(2024, 1, 1, 5, 0, 0))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let p = TimestampParser::utc();
        assert_eq!(p.parse(""), None);
        assert_eq!(p.parse("   "), None);
        assert_eq!(p.parse("not-a-time"), None);
        assert_eq!(p.parse("2024-13-01 00:00:00"), None);
    }

    #[test]
    fn test_resolve_timezone() {
        assert_eq!(resolve_timezone("UTC").unwrap(), Tz::UTC);
        let err = resolve_timezone("Mars/Olympus").unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }
}

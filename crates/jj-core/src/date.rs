use chrono::{DateTime, NaiveDateTime, Utc};

/// An immutable date pattern, always interpreted in UTC and independent of
/// the process locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormat {
    pattern: &'static str,
}

impl DateFormat {
    /// `yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`: exactly three fractional digits and a
    /// literal `Z`.
    pub const RFC3339: DateFormat = DateFormat::new("%Y-%m-%dT%H:%M:%S.%3fZ");

    /// `pattern` uses `chrono` strftime syntax.
    pub const fn new(pattern: &'static str) -> Self {
        Self { pattern }
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn parse(&self, s: &str) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(s, self.pattern)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn format(&self, date: &DateTime<Utc>) -> String {
        date.format(self.pattern).to_string()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat::RFC3339
    }
}

/// Parse an RFC 3339 timestamp such as `2016-06-10T00:00:00.000Z`.
pub fn parse_rfc3339_date(s: &str) -> Option<DateTime<Utc>> {
    DateFormat::RFC3339.parse(s)
}

pub fn to_rfc3339_string(date: &DateTime<Utc>) -> String {
    DateFormat::RFC3339.format(date)
}

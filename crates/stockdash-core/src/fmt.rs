//! Shared rounding and date helpers.

use chrono::NaiveDate;

/// Date format used on the wire and in date controls.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rounds to 2 decimal places (slider bounds, labels).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD`, ignoring any time suffix (`2020-01-02 00:00:00`,
/// `2020-01-02T00:00:00Z`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.126), -0.13);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn parse_date_ignores_time_suffix() {
        let d = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
        assert_eq!(parse_date("2018-01-01"), Some(d));
        assert_eq!(parse_date("2018-01-01 09:30:00"), Some(d));
        assert_eq!(parse_date("2018-01-01T00:00:00Z"), Some(d));
        assert_eq!(parse_date("2018-13-01"), None);
        assert_eq!(parse_date("Jan 2018"), None);
    }
}

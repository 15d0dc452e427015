//! Timestamp utilities

use chrono::{DateTime, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar date (UTC), used for CAPA overdue checks
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(s: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| crate::Error::InvalidInput(format!("Invalid date '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // After 2000-01-01 and before 2100-01-01
        assert!(timestamp.timestamp() > 946_684_800);
        assert!(timestamp.timestamp() < 4_102_444_800);
    }

    #[test]
    fn test_today_matches_now() {
        let date = today();
        let stamp = now();
        // Straddling midnight between the two calls is the only way these differ
        assert!(stamp.date_naive() >= date);
    }

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2020-01-01").unwrap();
        assert_eq!(date.to_string(), "2020-01-01");

        let date = parse_date(" 2024-02-29 ").unwrap();
        assert_eq!(date.to_string(), "2024-02-29");
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("01/02/2020").is_err());
        assert!(parse_date("").is_err());
    }
}

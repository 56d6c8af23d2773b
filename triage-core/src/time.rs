//! Date helpers: "today" in the user's timezone and deadline arithmetic.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Calendar date right now in an IANA tz like "America/Chicago".
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// Parse an ISO `YYYY-MM-DD` deadline. Anything else is `None`.
pub fn parse_deadline(deadline: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(deadline.trim(), "%Y-%m-%d").ok()
}

/// Whole days from `today` until `deadline`; negative when overdue.
pub fn days_until(deadline: Option<&str>, today: NaiveDate) -> Option<i64> {
    let due = parse_deadline(deadline?)?;
    Some((due - today).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_days_until() {
        let today = d(2024, 5, 30);
        assert_eq!(days_until(Some("2024-06-01"), today), Some(2));
        assert_eq!(days_until(Some("2024-05-30"), today), Some(0));
        assert_eq!(days_until(Some("2024-05-27"), today), Some(-3));
    }

    #[test]
    fn test_bad_deadline_is_none() {
        let today = d(2024, 5, 30);
        assert_eq!(days_until(None, today), None);
        assert_eq!(days_until(Some("next friday"), today), None);
        assert_eq!(days_until(Some("2024-13-01"), today), None);
    }

    #[test]
    fn test_invalid_timezone() {
        assert!(today_in("Mars/Olympus").is_err());
        assert!(today_in("America/Chicago").is_ok());
    }
}

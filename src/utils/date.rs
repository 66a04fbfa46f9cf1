//! UTC date utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct for date handling in
//! sitemaps (`<lastmod>`) and structured data (`datePublished`).
//!
//! # Examples
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("2024-06-15").unwrap();
//! let dt = DateTimeUtc::parse("2024-06-15T14:30:45Z").unwrap();
//! assert_eq!(dt.to_iso_date(), "2024-06-15");
//! ```

use anyhow::{Result, bail};
use std::time::{SystemTime, UNIX_EPOCH};

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Current UTC time from the system clock.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(secs)
    }

    /// Convert seconds since the Unix epoch to a civil UTC datetime.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_unix(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;

        // Civil-from-days (proleptic Gregorian, era-based)
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);

        Self::new(
            year as u16,
            month as u8,
            day as u8,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Parse from "YYYY-MM-DD" or "YYYY-MM-DDTHH:MM:SSZ" format
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();

        // Minimum: "YYYY-MM-DD" (10 chars)
        if bytes.len() < 10 {
            return None;
        }

        let year = parse_u16(&bytes[0..4])?;
        if bytes[4] != b'-' {
            return None;
        }
        let month = parse_u8(&bytes[5..7])?;
        if bytes[7] != b'-' {
            return None;
        }
        let day = parse_u8(&bytes[8..10])?;

        // Check for time part (RFC3339)
        let (hour, minute, second) = if bytes.len() >= 20 && bytes[10] == b'T' && bytes[19] == b'Z'
        {
            if bytes[13] != b':' || bytes[16] != b':' {
                return None;
            }
            (
                parse_u8(&bytes[11..13])?,
                parse_u8(&bytes[14..16])?,
                parse_u8(&bytes[17..19])?,
            )
        } else if bytes.len() == 10 {
            (0, 0, 0)
        } else {
            return None;
        };

        let dt = Self::new(year, month, day, hour, minute, second);
        dt.validate().ok()?;
        Some(dt)
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    #[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
    const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    #[inline]
    const fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Format as the W3C date used by sitemaps: `YYYY-MM-DD`
    pub fn to_iso_date(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Parse 2-digit ASCII number
#[inline]
fn parse_u8(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = bytes[0].wrapping_sub(b'0');
    let d2 = bytes[1].wrapping_sub(b'0');
    if d1 > 9 || d2 > 9 {
        return None;
    }
    Some(d1 * 10 + d2)
}

/// Parse 4-digit ASCII number
#[inline]
fn parse_u16(bytes: &[u8]) -> Option<u16> {
    if bytes.len() != 4 {
        return None;
    }
    let mut result = 0u16;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let dt = DateTimeUtc::parse("2024-06-15").unwrap();
        assert_eq!(dt, DateTimeUtc::from_ymd(2024, 6, 15));
    }

    #[test]
    fn test_parse_with_time() {
        let dt = DateTimeUtc::parse("2024-06-15T14:30:45Z").unwrap();
        assert_eq!(dt, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DateTimeUtc::parse("").is_none());
        assert!(DateTimeUtc::parse("April 12, 2024").is_none());
        assert!(DateTimeUtc::parse("2024/06/15").is_none());
        assert!(DateTimeUtc::parse("2024-13-01").is_none());
        assert!(DateTimeUtc::parse("2024-06-15T14:30").is_none());
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(DateTimeUtc::from_ymd(2024, 2, 29).validate().is_ok());
        assert!(DateTimeUtc::from_ymd(2000, 2, 29).validate().is_ok());
        assert!(DateTimeUtc::from_ymd(2023, 2, 29).validate().is_err());
        assert!(DateTimeUtc::from_ymd(1900, 2, 29).validate().is_err());
    }

    #[test]
    fn test_validate_invalid_day() {
        assert!(DateTimeUtc::from_ymd(2024, 6, 0).validate().is_err());
        assert!(DateTimeUtc::from_ymd(2024, 4, 31).validate().is_err());
        assert!(DateTimeUtc::from_ymd(2024, 1, 32).validate().is_err());
    }

    #[test]
    fn test_from_unix_epoch() {
        assert_eq!(DateTimeUtc::from_unix(0), DateTimeUtc::from_ymd(1970, 1, 1));
    }

    #[test]
    fn test_from_unix_known_dates() {
        // 2000-03-01 00:00:00 UTC
        assert_eq!(
            DateTimeUtc::from_unix(951_868_800),
            DateTimeUtc::from_ymd(2000, 3, 1)
        );
        // 2024-02-29 12:34:56 UTC
        assert_eq!(
            DateTimeUtc::from_unix(1_709_210_096),
            DateTimeUtc::new(2024, 2, 29, 12, 34, 56)
        );
    }

    #[test]
    fn test_now_is_valid() {
        assert!(DateTimeUtc::now().validate().is_ok());
    }

    #[test]
    fn test_to_iso_date() {
        assert_eq!(DateTimeUtc::from_ymd(2025, 1, 5).to_iso_date(), "2025-01-05");
        assert_eq!(DateTimeUtc::new(2025, 1, 5, 9, 3, 7).to_iso_date(), "2025-01-05");
    }
}

//! UTC datetime utilities without timezone dependencies.
//!
//! Provides a lightweight `DateTimeUtc` struct covering exactly what feeds
//! need: second precision, UTC only, and the two textual forms the formats
//! use.
//!
//! # Features
//!
//! - Zero external dependencies for date parsing
//! - RFC 2822 (RSS) and RFC 3339 (Atom, JSON Feed) formatting
//! - Parses ISO 8601 with `Z` or numeric offsets, and RFC 2822 input
//! - Leap year handling
//!
//! # Examples
//!
//! ```ignore
//! let dt = DateTimeUtc::parse("2024-12-14T12:00:00Z").unwrap();
//! assert_eq!(dt.to_rfc2822(), "Sat, 14 Dec 2024 12:00:00 GMT");
//!
//! let dt = DateTimeUtc::parse("Sat, 14 Dec 2024 12:00:00 GMT").unwrap();
//! assert_eq!(dt.to_rfc3339(), "2024-12-14T12:00:00Z");
//! ```

use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr, time::SystemTime};

const WEEKDAYS: [&str; 7] = ["Sat", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// UTC datetime without timezone complexity
///
/// Field order makes the derived `Ord` chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
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

    /// Current wall-clock time, truncated to seconds.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix(i64::try_from(secs).unwrap_or(0))
    }

    /// Build from seconds since the Unix epoch.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Ranges checked by construction
    pub fn from_unix(secs: i64) -> Self {
        let days = secs.div_euclid(86_400);
        let rem = secs.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);
        Self::new(
            year.clamp(0, 9999) as u16,
            month,
            day,
            (rem / 3600) as u8,
            ((rem / 60) % 60) as u8,
            (rem % 60) as u8,
        )
    }

    /// Seconds since the Unix epoch.
    pub fn to_unix(self) -> i64 {
        let days = days_from_civil(i64::from(self.year), self.month, self.day);
        days * 86_400
            + i64::from(self.hour) * 3600
            + i64::from(self.minute) * 60
            + i64::from(self.second)
    }

    /// Parse ISO 8601 / RFC 3339 or RFC 2822 text.
    ///
    /// Accepted shapes:
    /// - `YYYY-MM-DD`
    /// - `YYYY-MM-DDTHH:MM:SS[.fff][Z|+HH:MM|-HH:MM]` (no zone means UTC)
    /// - `[Day, ]DD Mon YYYY HH:MM[:SS] (GMT|UT|UTC|Z|+HHMM|-HHMM)`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let first = s.as_bytes().first()?;
        if first.is_ascii_digit() && s.as_bytes().get(4) == Some(&b'-') {
            parse_iso(s)
        } else {
            parse_rfc2822(s)
        }
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

    /// Format as RFC 3339 (ISO 8601) for Atom and JSON Feed.
    ///
    /// Returns: `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// Format as RFC 2822 for RSS.
    ///
    /// Returns: `Sat, 14 Dec 2024 12:00:00 GMT`
    pub fn to_rfc2822(self) -> String {
        format!(
            "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
            WEEKDAYS[self.weekday_index()],
            self.day,
            MONTHS
                .get(usize::from(self.month).wrapping_sub(1))
                .unwrap_or(&"Jan"),
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }

    /// Zeller's congruence; 0 is Saturday.
    #[inline]
    #[allow(clippy::trivially_copy_pass_by_ref)] // Method style is more idiomatic
    #[allow(clippy::cast_sign_loss)] // Result of % 7 is always 0-6
    fn weekday_index(&self) -> usize {
        let (y, m) = if self.month < 3 {
            (i32::from(self.year) - 1, i32::from(self.month) + 12)
        } else {
            (i32::from(self.year), i32::from(self.month))
        };
        let d = i32::from(self.day);
        ((d + (13 * (m + 1)) / 5 + y + y / 4 - y / 100 + y / 400) % 7) as usize
    }

    /// Shift by a zone offset in seconds east of UTC (the local reading minus offset).
    fn shifted(self, offset_secs: i64) -> Self {
        if offset_secs == 0 {
            self
        } else {
            Self::from_unix(self.to_unix() - offset_secs)
        }
    }
}

impl fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for DateTimeUtc {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| anyhow!("invalid date `{s}`"))
    }
}

impl Serialize for DateTimeUtc {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for DateTimeUtc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_iso(s: &str) -> Option<DateTimeUtc> {
    let bytes = s.as_bytes();

    // Minimum: "YYYY-MM-DD" (10 chars)
    if bytes.len() < 10 {
        return None;
    }

    let year = parse_u16(&bytes[0..4])?;
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let month = parse_u8(&bytes[5..7])?;
    let day = parse_u8(&bytes[8..10])?;

    if bytes.len() == 10 {
        let dt = DateTimeUtc::from_ymd(year, month, day);
        return dt.validate().ok().map(|()| dt);
    }

    // "THH:MM:SS" (or a space separator)
    if bytes.len() < 19 || !matches!(bytes[10], b'T' | b't' | b' ') {
        return None;
    }
    if bytes[13] != b':' || bytes[16] != b':' {
        return None;
    }
    let hour = parse_u8(&bytes[11..13])?;
    let minute = parse_u8(&bytes[14..16])?;
    let second = parse_u8(&bytes[17..19])?;

    // Skip fractional seconds
    let mut rest = &s[19..];
    if let Some(frac) = rest.strip_prefix('.') {
        let digits = frac.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        rest = &frac[digits..];
    }

    let offset = match rest {
        "" | "Z" | "z" => 0,
        zone => parse_offset(zone)?,
    };

    let dt = DateTimeUtc::new(year, month, day, hour, minute, second);
    dt.validate().ok()?;
    Some(dt.shifted(offset))
}

fn parse_rfc2822(s: &str) -> Option<DateTimeUtc> {
    // Weekday is optional and not checked against the date
    let s = match s.split_once(',') {
        Some((_, rest)) => rest,
        None => s,
    };

    let mut parts = s.split_whitespace();
    let day: u8 = parts.next()?.parse().ok()?;
    let month_name = parts.next()?;
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month_name))?;
    let year: u16 = parts.next()?.parse().ok()?;

    let mut time = parts.next()?.split(':');
    let hour: u8 = time.next()?.parse().ok()?;
    let minute: u8 = time.next()?.parse().ok()?;
    let second: u8 = match time.next() {
        Some(sec) => sec.parse().ok()?,
        None => 0,
    };

    let offset = match parts.next() {
        None => 0,
        Some(zone) if ["GMT", "UT", "UTC", "Z"].contains(&zone) => 0,
        Some(zone) => parse_offset(zone)?,
    };
    if parts.next().is_some() {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)] // position() < 12
    let dt = DateTimeUtc::new(year, month as u8 + 1, day, hour, minute, second);
    dt.validate().ok()?;
    Some(dt.shifted(offset))
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `-HHMM` into seconds east of UTC.
fn parse_offset(zone: &str) -> Option<i64> {
    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    let digits = digits.replace(':', "");
    let bytes = digits.as_bytes();
    if bytes.len() != 4 {
        return None;
    }
    let hours = parse_u8(&bytes[0..2])?;
    let minutes = parse_u8(&bytes[2..4])?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (i64::from(hours) * 3600 + i64::from(minutes) * 60))
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

// ============================================================================
// Calendar arithmetic (proleptic Gregorian)
// ============================================================================

fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let (m, d) = (i64::from(month), i64::from(day));
    let y = if m <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = if m > 2 { m - 3 } else { m + 9 };
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // month/day are small
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

//! Expiration policy parsing and the minute-resolution timestamp codec

use crate::error::{Error, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::fmt;
use std::str::FromStr;

/// Timestamp format used in manifests and on the command line
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d_%H:%M";

/// Hour of day a relative (`+N`) expiration resolves to
const RELATIVE_EXPIRY_HOUR: u32 = 22;

/// Parse a `YYYY/MM/DD_hh:mm` timestamp
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

/// Format a timestamp as `YYYY/MM/DD_hh:mm`
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Expiration assigned to newly tracked entries
///
/// Parsed from either `+N` (N days from today, at 22:00) or an absolute
/// `YYYY/MM/DD_hh:mm` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// `+N`: N days from the invocation date
    Relative { days: i64 },
    /// Explicit timestamp
    Absolute(NaiveDateTime),
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::Relative { days: 30 }
    }
}

impl FromStr for ExpirationPolicy {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        if let Some(days) = spec.strip_prefix('+') {
            let days = days.parse::<i64>().map_err(|e| Error::InvalidExpiration {
                spec: spec.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Self::Relative { days });
        }
        match parse_timestamp(spec) {
            Some(ts) => Ok(Self::Absolute(ts)),
            None => Err(Error::InvalidExpiration {
                spec: spec.to_string(),
                reason: format!("expected +N or {TIMESTAMP_FORMAT}"),
            }),
        }
    }
}

impl fmt::Display for ExpirationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relative { days } => write!(f, "+{days}"),
            Self::Absolute(ts) => write!(f, "{}", format_timestamp(*ts)),
        }
    }
}

impl ExpirationPolicy {
    /// Resolve the policy to an absolute timestamp relative to `now`
    ///
    /// A day offset that overflows the calendar is rejected, not clamped.
    pub fn resolve(&self, now: NaiveDateTime) -> Result<NaiveDateTime> {
        match *self {
            Self::Relative { days } => {
                let at = NaiveTime::from_hms_opt(RELATIVE_EXPIRY_HOUR, 0, 0)
                    .expect("22:00 is a valid time of day");
                let offset = Duration::try_days(days)
                    .and_then(|d| now.date().checked_add_signed(d))
                    .ok_or_else(|| Error::InvalidExpiration {
                        spec: self.to_string(),
                        reason: "day offset out of range".to_string(),
                    })?;
                Ok(offset.and_time(at))
            }
            Self::Absolute(ts) => Ok(ts),
        }
    }

    /// Resolve, rejecting any result that is not strictly in the future
    pub fn resolve_future(&self, now: NaiveDateTime) -> Result<NaiveDateTime> {
        let resolved = self.resolve(now)?;
        if resolved <= now {
            return Err(Error::InvalidExpiration {
                spec: self.to_string(),
                reason: "expiration date is not in the future".to_string(),
            });
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn parses_relative_spec() {
        let policy: ExpirationPolicy = "+7".parse().unwrap();
        assert_eq!(policy, ExpirationPolicy::Relative { days: 7 });
    }

    #[test]
    fn parses_absolute_spec() {
        let policy: ExpirationPolicy = "2024/06/01_08:30".parse().unwrap();
        assert_eq!(policy, ExpirationPolicy::Absolute(dt(2024, 6, 1, 8, 30)));
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!("2024-06-01".parse::<ExpirationPolicy>().is_err());
        assert!("+ten".parse::<ExpirationPolicy>().is_err());
        assert!("".parse::<ExpirationPolicy>().is_err());
        assert!("2024/06/01".parse::<ExpirationPolicy>().is_err());
    }

    #[test]
    fn relative_resolves_to_22_00() {
        let now = dt(2024, 6, 1, 9, 15);
        let policy = ExpirationPolicy::Relative { days: 3 };
        assert_eq!(policy.resolve(now).unwrap(), dt(2024, 6, 4, 22, 0));
    }

    #[test]
    fn default_is_thirty_days() {
        let now = dt(2024, 6, 1, 9, 15);
        assert_eq!(
            ExpirationPolicy::default().resolve(now).unwrap(),
            dt(2024, 7, 1, 22, 0)
        );
    }

    #[test]
    fn out_of_range_day_offset_is_rejected_not_a_panic() {
        let now = dt(2024, 6, 1, 9, 15);
        let huge: ExpirationPolicy = "+999999999999".parse().unwrap();
        assert!(matches!(
            huge.resolve(now),
            Err(Error::InvalidExpiration { .. })
        ));
        assert!(huge.resolve_future(now).is_err());

        let negative_overflow = ExpirationPolicy::Relative {
            days: i64::MIN,
        };
        assert!(negative_overflow.resolve(now).is_err());
    }

    #[test]
    fn rejects_past_expiration() {
        let now = dt(2024, 6, 1, 9, 15);
        let past = ExpirationPolicy::Absolute(dt(2024, 1, 1, 22, 0));
        assert!(matches!(
            past.resolve_future(now),
            Err(Error::InvalidExpiration { .. })
        ));
    }

    #[test]
    fn rejects_expiration_equal_to_now() {
        let now = dt(2024, 6, 1, 9, 15);
        let same = ExpirationPolicy::Absolute(now);
        assert!(same.resolve_future(now).is_err());
    }

    #[test]
    fn timestamp_round_trip() {
        let ts = dt(2031, 12, 24, 23, 59);
        assert_eq!(parse_timestamp(&format_timestamp(ts)), Some(ts));
    }

    #[test]
    fn seconds_are_dropped_by_the_format() {
        let with_seconds = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 45)
            .unwrap();
        assert_eq!(format_timestamp(with_seconds), "2024/06/01_08:30");
    }
}

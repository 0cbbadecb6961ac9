//! Candle periods and bucket classification.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::PeriodError;

/// Fixed-length candle period.
///
/// Buckets are anchored to the UNIX epoch rather than to the first observed
/// tick, so a 10-minute bucket always starts on a 2-minute and a 1-minute
/// boundary as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    seconds: u32,
}

impl Period {
    /// One-minute candles.
    pub const MINUTE_1: Self = Self { seconds: 60 };
    /// Two-minute candles.
    pub const MINUTE_2: Self = Self { seconds: 120 };
    /// Ten-minute candles.
    pub const MINUTE_10: Self = Self { seconds: 600 };

    /// Creates a period from a length in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::Zero`] for a zero-length period.
    pub const fn from_seconds(seconds: u32) -> Result<Self, PeriodError> {
        if seconds == 0 {
            return Err(PeriodError::Zero);
        }
        Ok(Self { seconds })
    }

    /// Returns the default 1m / 2m / 10m chain.
    #[must_use]
    pub const fn reference_chain() -> [Self; 3] {
        [Self::MINUTE_1, Self::MINUTE_2, Self::MINUTE_10]
    }

    /// Returns the period length in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Returns the period length in milliseconds.
    #[must_use]
    pub const fn milliseconds(&self) -> i64 {
        self.seconds as i64 * 1000
    }

    /// Returns the period length as a [`TimeDelta`].
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.seconds as i64)
    }

    /// Returns the index of the bucket containing `timestamp`.
    ///
    /// Uses floor division so instants before the epoch land in negative
    /// buckets instead of sharing bucket zero.
    #[must_use]
    pub fn bucket_index(&self, timestamp: DateTime<Utc>) -> i64 {
        timestamp.timestamp_millis().div_euclid(self.milliseconds())
    }

    /// Returns the start instant of the bucket containing `timestamp`.
    #[must_use]
    pub fn bucket_start(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        let start_ms = self.bucket_index(timestamp) * self.milliseconds();
        // Only out of range within one period of the earliest representable instant.
        DateTime::from_timestamp_millis(start_ms).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Returns true if both instants fall into the same bucket.
    #[must_use]
    pub fn same_bucket(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.bucket_index(a) == self.bucket_index(b)
    }

    /// Returns true if every bucket of `coarser` is an exact union of buckets
    /// of this period.
    #[must_use]
    pub const fn nests_into(&self, coarser: Self) -> bool {
        coarser.seconds % self.seconds == 0
    }

    /// Returns the short label used in file names and logs (`1m`, `90s`, `1h`).
    #[must_use]
    pub fn label(&self) -> String {
        let s = self.seconds;
        if s % 3600 == 0 {
            format!("{}h", s / 3600)
        } else if s % 60 == 0 {
            format!("{}m", s / 60)
        } else {
            format!("{s}s")
        }
    }
}

/// Returns true if `a` and `b` belong to the same `period` bucket.
#[must_use]
pub fn same_bucket(a: DateTime<Utc>, b: DateTime<Utc>, period: Period) -> bool {
    period.same_bucket(a, b)
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let parse_err = || PeriodError::Parse(s.to_string());

        // Accept both `10m` and `m10`.
        let (digits, unit) = match lower.find(|c: char| !c.is_ascii_digit()) {
            Some(0) => {
                let split = lower
                    .find(|c: char| c.is_ascii_digit())
                    .ok_or_else(parse_err)?;
                (&lower[split..], &lower[..split])
            }
            Some(split) => (&lower[..split], &lower[split..]),
            None => (lower.as_str(), "s"),
        };

        let count: u32 = digits.parse().map_err(|_| parse_err())?;
        let scale = match unit {
            "s" | "sec" | "second" | "seconds" => 1,
            "m" | "min" | "minute" | "minutes" => 60,
            "h" | "hour" | "hours" => 3600,
            _ => return Err(parse_err()),
        };

        let seconds = count
            .checked_mul(scale)
            .ok_or_else(|| PeriodError::Overflow(s.to_string()))?;
        Self::from_seconds(seconds)
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_same_bucket_minute() {
        let p = Period::MINUTE_1;
        assert!(same_bucket(at(0), at(59), p));
        assert!(!same_bucket(at(59), at(60), p));
        assert!(same_bucket(at(61), at(119), p));
    }

    #[test]
    fn test_buckets_anchor_to_epoch() {
        let p = Period::MINUTE_10;
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 14, 37, 45).unwrap();
        assert_eq!(
            p.bucket_start(ts),
            Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap()
        );

        // A 2m bucket never straddles a 10m boundary.
        let two = Period::MINUTE_2;
        let two_start = two.bucket_start(ts);
        assert!(p.same_bucket(two_start, two_start + two.duration() - TimeDelta::seconds(1)));
    }

    #[test]
    fn test_pre_epoch_floor() {
        let p = Period::MINUTE_1;
        assert_eq!(p.bucket_index(at(-1)), -1);
        assert_eq!(p.bucket_start(at(-1)), at(-60));
        assert!(!same_bucket(at(-1), at(0), p));
    }

    #[test]
    fn test_sub_second_precision() {
        let p = Period::MINUTE_1;
        let late = at(59) + TimeDelta::milliseconds(999);
        assert!(p.same_bucket(at(0), late));
        assert_eq!(p.bucket_start(late), at(0));
    }

    #[test]
    fn test_nesting() {
        assert!(Period::MINUTE_1.nests_into(Period::MINUTE_2));
        assert!(Period::MINUTE_2.nests_into(Period::MINUTE_10));
        let three = Period::from_seconds(180).unwrap();
        assert!(!Period::MINUTE_2.nests_into(three));
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("1m".parse::<Period>().unwrap(), Period::MINUTE_1);
        assert_eq!("M2".parse::<Period>().unwrap(), Period::MINUTE_2);
        assert_eq!(" 10min ".parse::<Period>().unwrap(), Period::MINUTE_10);
        assert_eq!("90".parse::<Period>().unwrap().seconds(), 90);
        assert_eq!("1h".parse::<Period>().unwrap().seconds(), 3600);
        assert_eq!("0m".parse::<Period>().unwrap_err(), PeriodError::Zero);
        assert!("fortnight".parse::<Period>().is_err());
        assert!("m".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_label() {
        assert_eq!(Period::MINUTE_10.to_string(), "10m");
        assert_eq!(Period::from_seconds(90).unwrap().to_string(), "90s");
        assert_eq!(Period::from_seconds(7200).unwrap().to_string(), "2h");
    }

    #[test]
    fn test_period_serde() {
        let json = serde_json::to_string(&Period::MINUTE_2).unwrap();
        assert_eq!(json, "\"2m\"");
        let back: Period = serde_json::from_str("\"10m\"").unwrap();
        assert_eq!(back, Period::MINUTE_10);
        assert!(serde_json::from_str::<Period>("\"0s\"").is_err());
    }
}

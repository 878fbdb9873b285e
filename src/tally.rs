use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Offsets present in a fresh tally with a zero count.
pub const SEEDED_OFFSETS: RangeInclusive<i64> = 0..=3;

/// Histogram of timestamp offsets (seconds) between consecutive blocks.
///
/// Serializes as a JSON object keyed by the stringified offset, in ascending numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffsetTally(BTreeMap<i64, u64>);

impl Default for OffsetTally {
    fn default() -> Self {
        Self::new()
    }
}

impl OffsetTally {
    pub fn new() -> Self {
        Self(SEEDED_OFFSETS.map(|offset| (offset, 0)).collect())
    }

    pub fn record(&mut self, offset: i64) {
        *self.0.entry(offset).or_default() += 1;
    }

    pub fn count(&self, offset: i64) -> u64 {
        self.0.get(&offset).copied().unwrap_or_default()
    }

    /// Number of recorded intervals.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Offsets with their counts, ascending. Seeded offsets show up even when never recorded.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.0.iter().map(|(&offset, &count)| (offset, count))
    }

    /// Fraction of recorded intervals whose offset lies in `bucket`. Zero for an empty tally.
    pub fn share(&self, bucket: &Bucket) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let hits: u64 = self.0.range(bucket.min..=bucket.max).map(|(_, c)| c).sum();
        hits as f64 / total as f64
    }
}

/// An inclusive offset range, written `MIN..MAX` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid bucket `{0}`, expected `MIN..MAX` with MIN <= MAX")]
pub struct ParseBucketError(String);

impl FromStr for Bucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBucketError(s.into());
        let (min, max) = s.split_once("..").ok_or_else(err)?;
        let max = max.strip_prefix('=').unwrap_or(max);
        let min = min.trim().parse().map_err(|_| err())?;
        let max = max.trim().parse().map_err(|_| err())?;
        if min > max {
            return Err(err());
        }
        Ok(Self { min, max })
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn seeded() {
        let tally = OffsetTally::new();
        assert_eq!(tally.total(), 0);
        assert_eq!(
            serde_json::to_string(&tally).unwrap(),
            r#"{"0":0,"1":0,"2":0,"3":0}"#
        );
    }

    #[test]
    fn record() {
        let mut tally = OffsetTally::new();
        for offset in [5, 0, 5, -2, 13] {
            tally.record(offset);
        }
        assert_eq!(tally.count(5), 2);
        assert_eq!(tally.count(0), 1);
        assert_eq!(tally.count(-2), 1);
        assert_eq!(tally.count(1), 0);
        assert_eq!(tally.count(100), 0);
        assert_eq!(tally.total(), 5);
        assert_eq!(
            serde_json::to_string(&tally).unwrap(),
            r#"{"-2":1,"0":1,"1":0,"2":0,"3":0,"5":2,"13":1}"#
        );
    }

    #[test]
    fn read_back() {
        let tally: OffsetTally =
            serde_json::from_str(r#"{"0":3,"1":0,"2":0,"3":0,"14":7,"-1":1}"#).unwrap();
        assert_eq!(tally.count(14), 7);
        assert_eq!(tally.count(-1), 1);
        assert_eq!(tally.total(), 11);
    }

    #[test]
    fn share() {
        let mut tally = OffsetTally::new();
        assert_eq!(tally.share(&Bucket { min: 1, max: 9 }), 0.0);

        for offset in [0, 1, 9, 10, 4] {
            tally.record(offset);
        }
        assert_eq!(tally.share(&Bucket { min: 1, max: 9 }), 0.6);
        assert_eq!(tally.share(&Bucket { min: 0, max: 0 }), 0.2);
        assert_eq!(tally.share(&Bucket { min: -5, max: 100 }), 1.0);
    }

    #[test]
    fn parse_bucket() {
        assert_eq!("1..9".parse::<Bucket>(), Ok(Bucket { min: 1, max: 9 }));
        assert_eq!("1..=9".parse::<Bucket>(), Ok(Bucket { min: 1, max: 9 }));
        assert_eq!("-3..-1".parse::<Bucket>(), Ok(Bucket { min: -3, max: -1 }));
        assert_eq!("4..4".parse::<Bucket>(), Ok(Bucket { min: 4, max: 4 }));
        assert!("9..1".parse::<Bucket>().is_err());
        assert!("1-9".parse::<Bucket>().is_err());
        assert!("a..9".parse::<Bucket>().is_err());
        assert_eq!(Bucket { min: 1, max: 9 }.to_string(), "1..9");
    }
}

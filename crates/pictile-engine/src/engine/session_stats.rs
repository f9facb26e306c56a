use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whole seconds spent on a puzzle, displayed as `MM:SS`.
///
/// Seconds carry into minutes at 60. Minutes are not capped, so an hour
/// and a half shows as `90:00`.
///
/// # Example
///
/// ```
/// use pictile_engine::ElapsedTime;
///
/// let time = ElapsedTime::from_secs(61);
/// assert_eq!(time.minutes(), 1);
/// assert_eq!(time.seconds(), 1);
/// assert_eq!(time.to_string(), "01:01");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElapsedTime(u64);

impl ElapsedTime {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn minutes(self) -> u64 {
        self.0 / 60
    }

    #[must_use]
    pub const fn seconds(self) -> u64 {
        self.0 % 60
    }

    const fn incremented(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
    }
}

impl FromStr for ElapsedTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (minutes, seconds) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid time {s:?}: expected MM:SS"))?;
        let minutes = minutes
            .parse::<u64>()
            .map_err(|e| format!("invalid minutes in {s:?}: {e}"))?;
        let seconds = seconds
            .parse::<u64>()
            .map_err(|e| format!("invalid seconds in {s:?}: {e}"))?;
        if seconds >= 60 {
            return Err(format!("invalid time {s:?}: seconds must be below 60"));
        }
        minutes
            .checked_mul(60)
            .and_then(|secs| secs.checked_add(seconds))
            .map(Self)
            .ok_or_else(|| format!("invalid time {s:?}: too large"))
    }
}

impl Serialize for ElapsedTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ElapsedTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Counters of one play-through: moves made and time spent.
///
/// # Example
///
/// ```
/// use pictile_engine::SessionStats;
///
/// let mut stats = SessionStats::new();
/// stats.record_move();
/// stats.record_second();
///
/// assert_eq!(stats.move_count(), 1);
/// assert_eq!(stats.elapsed().as_secs(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    move_count: usize,
    elapsed: ElapsedTime,
}

impl SessionStats {
    /// Creates statistics with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            move_count: 0,
            elapsed: ElapsedTime::ZERO,
        }
    }

    /// Number of accepted swaps.
    #[must_use]
    pub const fn move_count(&self) -> usize {
        self.move_count
    }

    #[must_use]
    pub const fn elapsed(&self) -> ElapsedTime {
        self.elapsed
    }

    pub const fn record_move(&mut self) {
        self.move_count += 1;
    }

    pub const fn record_second(&mut self) {
        self.elapsed = self.elapsed.incremented();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_carry_into_minutes() {
        let mut stats = SessionStats::new();
        for _ in 0..59 {
            stats.record_second();
        }
        assert_eq!(stats.elapsed().to_string(), "00:59");
        stats.record_second();
        assert_eq!(stats.elapsed().to_string(), "01:00");
        assert_eq!(stats.elapsed().minutes(), 1);
        assert_eq!(stats.elapsed().seconds(), 0);
    }

    #[test]
    fn test_long_games_keep_counting_minutes() {
        assert_eq!(ElapsedTime::from_secs(90 * 60 + 5).to_string(), "90:05");
        assert_eq!(ElapsedTime::from_secs(100 * 60).to_string(), "100:00");
    }

    #[test]
    fn test_moves_are_independent_of_time() {
        let mut stats = SessionStats::new();
        stats.record_move();
        stats.record_move();
        assert_eq!(stats.move_count(), 2);
        assert_eq!(stats.elapsed(), ElapsedTime::ZERO);
    }

    #[test]
    fn test_serde_as_clock_string() {
        let time = ElapsedTime::from_secs(125);
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"02:05\"");
        let parsed: ElapsedTime = serde_json::from_str("\"02:05\"").unwrap();
        assert_eq!(parsed, time);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<ElapsedTime>().is_err());
        assert!("12".parse::<ElapsedTime>().is_err());
        assert!("01:60".parse::<ElapsedTime>().is_err());
        assert!("aa:10".parse::<ElapsedTime>().is_err());
        assert!("307445734561825861:00".parse::<ElapsedTime>().is_err());
        assert!(format!("{}:59", u64::MAX / 60).parse::<ElapsedTime>().is_err());
        assert_eq!("100:00".parse::<ElapsedTime>().unwrap().as_secs(), 6000);
    }
}

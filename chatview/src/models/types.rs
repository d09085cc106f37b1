use serde::{Deserialize, Serialize};

/// Wall-clock timestamp with millisecond resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(pub chrono::DateTime<chrono::Utc>);

impl DateTime {
    pub fn now() -> Self {
        Self(chrono::Utc::now())
    }

    pub fn from_millis(millis: i64) -> Option<Self> {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis).map(Self)
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Absolute distance between two timestamps in milliseconds.
    pub fn abs_diff_millis(&self, other: DateTime) -> u64 {
        self.timestamp_millis().abs_diff(other.timestamp_millis())
    }
}

impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.timestamp_millis())
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;
        let millis = i64::deserialize(deserializer)?;
        Self::from_millis(millis).ok_or(Error::custom("cannot deserialize DateTime from millis"))
    }
}

/// Source of the current time for components that compare against it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        DateTime::now()
    }
}

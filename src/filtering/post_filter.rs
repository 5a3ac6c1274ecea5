//! 時間帯の範囲とフィルター条件

use crate::models::EnrichedRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 時間帯の上限（23時）
pub const MAX_HOUR: u32 = 23;

/// フィルターエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid hour range {low}-{high}: expected 0 <= low <= high <= 23")]
    InvalidHourRange { low: u32, high: u32 },

    #[error("Cannot parse hour range '{0}': expected LOW-HIGH")]
    InvalidHourSyntax(String),

    #[error("Year {0} is not present in the dataset")]
    UnknownYear(i32),

    #[error("Source '{0}' is not present in the dataset")]
    UnknownSource(String),
}

/// 時間帯範囲（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct HourRange {
    low: u32,
    high: u32,
}

impl HourRange {
    /// 0時から23時まで
    pub const FULL: HourRange = HourRange {
        low: 0,
        high: MAX_HOUR,
    };

    pub fn new(low: u32, high: u32) -> Result<Self, FilterError> {
        if low > high || high > MAX_HOUR {
            return Err(FilterError::InvalidHourRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.low <= hour && hour <= self.high
    }
}

impl Default for HourRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<(u32, u32)> for HourRange {
    type Error = FilterError;

    fn try_from((low, high): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(low, high)
    }
}

impl From<HourRange> for (u32, u32) {
    fn from(range: HourRange) -> Self {
        (range.low, range.high)
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl std::str::FromStr for HourRange {
    type Err = FilterError;

    /// `"8-20"` 形式（単一の値 `"9"` は9時のみ）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| FilterError::InvalidHourSyntax(s.to_string()))
        };

        match s.split_once('-') {
            Some((low, high)) => Self::new(parse(low)?, parse(high)?),
            None => {
                let hour = parse(s)?;
                Self::new(hour, hour)
            }
        }
    }
}

/// 投稿フィルター条件
///
/// 年・投稿クライアント・時間帯の3条件をすべて満たす投稿だけが残ります。
/// 日時を解析できなかった投稿はどの条件にも一致しません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub year: i32,
    pub source: String,
    #[serde(default)]
    pub hour_range: HourRange,
}

impl FilterSpec {
    pub fn new(year: i32, source: impl Into<String>, hour_range: HourRange) -> Self {
        Self {
            year,
            source: source.into(),
            hour_range,
        }
    }

    /// 投稿がフィルター条件に合致するかチェック
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        // 年フィルター
        if record.year != Some(self.year) {
            return false;
        }

        // 投稿クライアントフィルター
        if record.source != self.source {
            return false;
        }

        // 時間帯フィルター
        match record.hour {
            Some(hour) => self.hour_range.contains(hour),
            None => false,
        }
    }

    /// フィルター適用して投稿リストを取得（元の順序を維持）
    pub fn apply(&self, records: &[EnrichedRecord]) -> Vec<EnrichedRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year={} source={} hours={}",
            self.year, self.source, self.hour_range
        )
    }
}

/// フィルター適用（[`FilterSpec::apply`] の関数版）
pub fn filter_records(records: &[EnrichedRecord], spec: &FilterSpec) -> Vec<EnrichedRecord> {
    spec.apply(records)
}

//! 投稿データモデル
//!
//! CSVから読み込んだ生の投稿（[`RawRecord`]）と、特徴量を付与した投稿
//! （[`EnrichedRecord`]）を定義します。

use chrono::{FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// データソースから受け取った1件の投稿
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 投稿ID（不透明な識別子）
    #[serde(default)]
    pub id: String,
    /// 投稿日時の文字列（形式は保証されない）
    #[serde(default)]
    pub created_at: String,
    /// 本文（空文字列を許容）
    #[serde(default)]
    pub text: String,
    /// 投稿クライアント
    #[serde(default)]
    pub source: String,
    /// リツイート数（欠損時はNone）
    #[serde(default, deserialize_with = "deserialize_count")]
    pub retweets_count: Option<u64>,
    /// いいね数（欠損時はNone）
    #[serde(default, deserialize_with = "deserialize_count")]
    pub favorite_count: Option<u64>,
}

/// 件数フィールドを寛容に読み込む
///
/// 空欄や数値でない値はNone、`"12.0"` のような整数値の浮動小数表記は受け付ける。
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_count))
}

pub(crate) fn parse_count(value: &str) -> Option<u64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<u64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u64)
    })
}

impl RawRecord {
    /// テストやデータ生成用の簡易コンストラクタ
    pub fn new(
        id: impl Into<String>,
        created_at: impl Into<String>,
        text: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
            text: text.into(),
            source: source.into(),
            retweets_count: None,
            favorite_count: None,
        }
    }

    pub fn with_counts(mut self, retweets: Option<u64>, likes: Option<u64>) -> Self {
        self.retweets_count = retweets;
        self.favorite_count = likes;
        self
    }
}

/// 解析済みの投稿日時
///
/// 元の文字列が表す壁時計の時刻をそのまま保持します。オフセットが含まれて
/// いた場合は記録しますが、タイムゾーン変換は一切行いません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostTimestamp {
    pub local: NaiveDateTime,
    pub offset: Option<FixedOffset>,
}

impl PostTimestamp {
    pub fn naive(local: NaiveDateTime) -> Self {
        Self {
            local,
            offset: None,
        }
    }

    pub fn with_offset(local: NaiveDateTime, offset: FixedOffset) -> Self {
        Self {
            local,
            offset: Some(offset),
        }
    }
}

impl Ord for PostTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.local.cmp(&other.local).then_with(|| {
            let a = self.offset.map(|o| o.local_minus_utc());
            let b = other.offset.map(|o| o.local_minus_utc());
            a.cmp(&b)
        })
    }
}

impl PartialOrd for PostTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// 表示形式の文字列としてシリアライズ
impl Serialize for PostTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for PostTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.local.format("%Y-%m-%d %H:%M:%S"))?;
        if let Some(offset) = self.offset {
            write!(f, "{}", offset)?;
        }
        Ok(())
    }
}

/// 暦月（カレンダー順）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// 1月から12月までの固定順序
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1始まりの月番号から変換
    pub fn from_number(month: u32) -> Option<Self> {
        month
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index as usize))
            .copied()
    }

    /// 英語の完全な月名
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

/// 特徴量付きの投稿
///
/// [`crate::features::derive`] によってのみ生成され、生成後は変更されません。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub id: String,
    pub created_at: String,
    pub text: String,
    pub source: String,
    pub retweets_count: Option<u64>,
    pub favorite_count: Option<u64>,

    /// 解析済み日時（解析失敗時はNone）
    pub timestamp: Option<PostTimestamp>,
    pub year: Option<i32>,
    pub month: Option<Month>,
    /// 0-23
    pub hour: Option<u32>,
    /// 文字数（バイト数ではない）
    pub text_length: usize,
    /// 感情スコア（-1.0 to 1.0）
    pub sentiment: f64,
    pub hashtags: Vec<String>,
    pub mentions: Vec<String>,
}

impl EnrichedRecord {
    pub fn month_name(&self) -> Option<&'static str> {
        self.month.as_ref().map(Month::name)
    }

    pub fn has_timestamp(&self) -> bool {
        self.timestamp.is_some()
    }
}

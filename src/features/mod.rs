//! 特徴量の導出
//!
//! 生の投稿1件から、日時・文字数・感情スコア・ハッシュタグ・メンションを
//! 導出します。導出は行ごとに独立した純粋関数で、失敗することはありません。

pub mod sentiment;
pub mod text;
pub mod timestamp;

pub use sentiment::SentimentAnalyzer;
pub use text::{extract_hashtags, extract_mentions};
pub use timestamp::parse_timestamp;

use crate::models::{EnrichedRecord, Month, RawRecord};
use chrono::{Datelike, Timelike};
use std::sync::LazyLock;
use tracing::debug;

static DEFAULT_DERIVER: LazyLock<FeatureDeriver> = LazyLock::new(FeatureDeriver::new);

/// 特徴量導出器
#[derive(Debug, Clone, Default)]
pub struct FeatureDeriver {
    sentiment_analyzer: SentimentAnalyzer,
}

impl FeatureDeriver {
    pub fn new() -> Self {
        Self {
            sentiment_analyzer: SentimentAnalyzer::new(),
        }
    }

    /// 感情分析エンジンを差し替えて作成
    pub fn with_sentiment_analyzer(sentiment_analyzer: SentimentAnalyzer) -> Self {
        Self { sentiment_analyzer }
    }

    /// 1件の投稿から特徴量付きの投稿を作成
    pub fn derive(&self, raw: RawRecord) -> EnrichedRecord {
        let timestamp = parse_timestamp(&raw.created_at);

        let (year, month, hour) = match &timestamp {
            Some(ts) => (
                Some(ts.local.year()),
                Month::from_number(ts.local.month()),
                Some(ts.local.hour()),
            ),
            None => (None, None, None),
        };

        let text_length = text::char_length(&raw.text);
        let sentiment = self.sentiment_analyzer.polarity(&raw.text);
        let hashtags = extract_hashtags(&raw.text);
        let mentions = extract_mentions(&raw.text);

        EnrichedRecord {
            id: raw.id,
            created_at: raw.created_at,
            text: raw.text,
            source: raw.source,
            retweets_count: raw.retweets_count,
            favorite_count: raw.favorite_count,
            timestamp,
            year,
            month,
            hour,
            text_length,
            sentiment,
            hashtags,
            mentions,
        }
    }

    /// 全件を順序を保ったまま変換
    pub fn derive_all(&self, raws: Vec<RawRecord>) -> Vec<EnrichedRecord> {
        let records: Vec<EnrichedRecord> = raws.into_iter().map(|raw| self.derive(raw)).collect();

        let unparsed = records.iter().filter(|r| !r.has_timestamp()).count();
        debug!(
            total = records.len(),
            unparsed_timestamps = unparsed,
            "🧮 Derived post features"
        );

        records
    }
}

/// 既定の導出器で1件を変換
pub fn derive(raw: RawRecord) -> EnrichedRecord {
    DEFAULT_DERIVER.derive(raw)
}

/// 既定の導出器で全件を変換
pub fn derive_all(raws: Vec<RawRecord>) -> Vec<EnrichedRecord> {
    DEFAULT_DERIVER.derive_all(raws)
}

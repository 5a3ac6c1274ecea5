use super::artifacts::rank_counts;
use crate::models::EnrichedRecord;
use serde::Serialize;

/// ハッシュタグが1つもない場合の表示値
pub const NO_DATA: &str = "N/A";

/// ダッシュボード上部の主要指標
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    /// 投稿数
    pub post_count: usize,
    /// 平均リツイート数
    pub average_retweets: f64,
    /// 平均いいね数
    pub average_likes: f64,
    /// 最頻出ハッシュタグ
    pub top_hashtag: Option<String>,
}

impl SummaryMetrics {
    pub fn compute(records: &[EnrichedRecord]) -> Self {
        Self {
            post_count: count(records),
            average_retweets: mean_retweets(records),
            average_likes: mean_likes(records),
            top_hashtag: top_hashtag(records),
        }
    }

    /// 最頻出ハッシュタグの表示用ラベル（なければ "N/A"）
    pub fn top_hashtag_label(&self) -> String {
        self.top_hashtag
            .as_ref()
            .map(|tag| format!("#{}", tag))
            .unwrap_or_else(|| NO_DATA.to_string())
    }
}

pub fn count(records: &[EnrichedRecord]) -> usize {
    records.len()
}

/// 欠損値を除いた算術平均（値が1つもなければ0.0）
fn mean_of<I>(values: I) -> f64
where
    I: IntoIterator<Item = Option<u64>>,
{
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0_f64, 0_usize), |(sum, n), v| (sum + v as f64, n + 1));

    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

pub fn mean_retweets(records: &[EnrichedRecord]) -> f64 {
    mean_of(records.iter().map(|r| r.retweets_count))
}

pub fn mean_likes(records: &[EnrichedRecord]) -> f64 {
    mean_of(records.iter().map(|r| r.favorite_count))
}

/// 最も多く使われたハッシュタグ（同数なら先に出現したもの）
pub fn top_hashtag(records: &[EnrichedRecord]) -> Option<String> {
    rank_counts(records.iter().flat_map(|r| r.hashtags.iter()), 1)
        .into_iter()
        .next()
        .map(|top| top.key.clone())
}

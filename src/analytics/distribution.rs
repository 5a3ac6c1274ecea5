use super::artifacts::{rank_counts, Counted, LabeledCount};
use crate::models::{EnrichedRecord, Month};
use serde::Serialize;
use std::collections::BTreeMap;

/// 月別投稿数（1月〜12月の12件、カレンダー順、該当なしは0）
pub fn month_histogram(records: &[EnrichedRecord]) -> Vec<LabeledCount> {
    let mut counts = [0usize; 12];
    for month in records.iter().filter_map(|r| r.month) {
        counts[month as usize] += 1;
    }

    Month::ALL
        .iter()
        .zip(counts)
        .map(|(month, count)| Counted::new(month.name().to_string(), count))
        .collect()
}

/// 時間帯別投稿数（出現した時間のみ、昇順）
pub fn hour_histogram(records: &[EnrichedRecord]) -> Vec<Counted<u32>> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for hour in records.iter().filter_map(|r| r.hour) {
        *counts.entry(hour).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(hour, count)| Counted::new(hour, count))
        .collect()
}

/// 文字数別投稿数（文字数の昇順）
pub fn text_length_distribution(records: &[EnrichedRecord]) -> Vec<Counted<usize>> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.text_length).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(length, count)| Counted::new(length, count))
        .collect()
}

/// 投稿クライアント別の件数（降順、同数は初出順）
///
/// 円グラフ用にフィルター前の全データに対して使います。
pub fn source_distribution(records: &[EnrichedRecord]) -> Vec<LabeledCount> {
    rank_counts(records.iter().map(|r| r.source.clone()), usize::MAX)
}

/// 感情の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn classify(score: f64) -> Self {
        if score > 0.0 {
            SentimentLabel::Positive
        } else if score < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// 感情分類ごとの件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBuckets {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentBuckets {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Positive, Negative, Neutral の順の系列
    pub fn as_series(&self) -> Vec<LabeledCount> {
        vec![
            Counted::new(SentimentLabel::Positive.to_string(), self.positive),
            Counted::new(SentimentLabel::Negative.to_string(), self.negative),
            Counted::new(SentimentLabel::Neutral.to_string(), self.neutral),
        ]
    }
}

pub fn sentiment_buckets(records: &[EnrichedRecord]) -> SentimentBuckets {
    records
        .iter()
        .fold(SentimentBuckets::default(), |mut buckets, record| {
            match SentimentLabel::classify(record.sentiment) {
                SentimentLabel::Positive => buckets.positive += 1,
                SentimentLabel::Negative => buckets.negative += 1,
                SentimentLabel::Neutral => buckets.neutral += 1,
            }
            buckets
        })
}

//! 時間軸に沿った集計と散布図・ワードクラウド用の集計

use super::artifacts::{rank_counts, HeatMatrix, LabeledCount};
use crate::features::text;
use crate::models::{EnrichedRecord, Month, PostTimestamp};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::LazyLock;

/// ワードクラウドから除外する語
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
        "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "can",
        "to", "of", "in", "for", "on", "with", "at", "by", "from", "as", "into", "about", "and",
        "but", "if", "or", "so", "than", "too", "very", "just", "this", "that", "these",
        "those", "i", "me", "my", "we", "our", "ours", "you", "your", "he", "him", "his", "she",
        "her", "it", "its", "they", "them", "their", "what", "which", "who", "whom", "all",
        "also", "am", "not", "no", "here", "there", "when", "where", "how", "up", "out",
        "http", "https", "co", "amp", "rt", "www",
    ]
    .into_iter()
    .collect()
});

/// 時間帯×月の投稿数ヒートマップ
///
/// 行は出現した時間帯の昇順、列は出現した月のカレンダー順で、該当のない
/// 組み合わせは0で埋めます。
pub fn hour_month_matrix(records: &[EnrichedRecord]) -> HeatMatrix {
    let mut cells: BTreeMap<(u32, Month), usize> = BTreeMap::new();
    for record in records {
        if let (Some(hour), Some(month)) = (record.hour, record.month) {
            *cells.entry((hour, month)).or_insert(0) += 1;
        }
    }

    let hours: BTreeSet<u32> = cells.keys().map(|(hour, _)| *hour).collect();
    let months: BTreeSet<Month> = cells.keys().map(|(_, month)| *month).collect();

    let values = hours
        .iter()
        .map(|hour| {
            months
                .iter()
                .map(|month| cells.get(&(*hour, *month)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    HeatMatrix {
        row_labels: hours.iter().map(u32::to_string).collect(),
        column_labels: months.iter().map(|m| m.name().to_string()).collect(),
        values,
    }
}

/// 同一時刻ごとのリツイート数・いいね数の合計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementPoint {
    pub timestamp: PostTimestamp,
    pub retweets: u64,
    pub likes: u64,
}

/// 投稿時刻ごとのエンゲージメント推移（時刻の昇順）
pub fn engagement_over_time(records: &[EnrichedRecord]) -> Vec<EngagementPoint> {
    let mut totals: BTreeMap<PostTimestamp, (u64, u64)> = BTreeMap::new();
    for record in records {
        let Some(timestamp) = record.timestamp else {
            continue;
        };
        let entry = totals.entry(timestamp).or_insert((0, 0));
        entry.0 += record.retweets_count.unwrap_or(0);
        entry.1 += record.favorite_count.unwrap_or(0);
    }

    totals
        .into_iter()
        .map(|(timestamp, (retweets, likes))| EngagementPoint {
            timestamp,
            retweets,
            likes,
        })
        .collect()
}

/// 1日分の頻出語
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyWords {
    pub date: NaiveDate,
    pub words: Vec<LabeledCount>,
}

/// 日付ごとの頻出語上位n件（日付の昇順、大文字小文字は区別）
pub fn word_trends(records: &[EnrichedRecord], n: usize) -> Vec<DailyWords> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&EnrichedRecord>> = BTreeMap::new();
    for record in records {
        if let Some(timestamp) = record.timestamp {
            by_date.entry(timestamp.local.date()).or_default().push(record);
        }
    }

    by_date
        .into_iter()
        .map(|(date, day_records)| DailyWords {
            date,
            words: rank_counts(
                day_records
                    .into_iter()
                    .flat_map(|r| text::words(&r.text).map(str::to_string)),
                n,
            ),
        })
        .collect()
}

/// 散布図の点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub retweets: u64,
    pub likes: u64,
    pub text: String,
}

/// リツイート数といいね数が両方ある投稿の散布図データ
pub fn retweet_like_points(records: &[EnrichedRecord]) -> Vec<ScatterPoint> {
    records
        .iter()
        .filter_map(|r| match (r.retweets_count, r.favorite_count) {
            (Some(retweets), Some(likes)) => Some(ScatterPoint {
                retweets,
                likes,
                text: r.text.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// タイムラインの1項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub timestamp: PostTimestamp,
    pub text: String,
}

/// 入力順のタイムライン（日時のない投稿は除外）
pub fn timeline_entries(records: &[EnrichedRecord]) -> Vec<TimelineEntry> {
    records
        .iter()
        .filter_map(|r| {
            r.timestamp.map(|timestamp| TimelineEntry {
                timestamp,
                text: r.text.clone(),
            })
        })
        .collect()
}

/// ワードクラウド用の語頻度（小文字化、ストップワードと1文字語を除外）
pub fn word_frequencies(records: &[EnrichedRecord], n: usize) -> Vec<LabeledCount> {
    rank_counts(
        records.iter().flat_map(|r| {
            text::words(&r.text)
                .map(str::to_lowercase)
                .filter(|w| w.chars().count() > 1 && !STOP_WORDS.contains(w.as_str()))
        }),
        n,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::derive;
    use crate::models::RawRecord;

    fn post(
        created_at: &str,
        text: &str,
        retweets: Option<u64>,
        likes: Option<u64>,
    ) -> EnrichedRecord {
        derive(RawRecord::new("id", created_at, text, "web").with_counts(retweets, likes))
    }

    #[test]
    fn test_hour_month_matrix_zero_fill() {
        let records = vec![
            post("2016-02-01 14:00:00", "", None, None),
            post("2016-01-01 09:00:00", "", None, None),
            post("2016-01-02 09:30:00", "", None, None),
            post("garbage", "", None, None),
        ];
        let matrix = hour_month_matrix(&records);

        assert_eq!(matrix.row_labels, vec!["9", "14"]);
        assert_eq!(matrix.column_labels, vec!["January", "February"]);
        assert_eq!(matrix.values, vec![vec![2, 0], vec![0, 1]]);
        assert_eq!(matrix.total(), 3);
    }

    #[test]
    fn test_hour_month_matrix_empty() {
        assert!(hour_month_matrix(&[]).is_empty());
    }

    #[test]
    fn test_engagement_over_time_groups_same_timestamp() {
        let records = vec![
            post("2016-01-02 10:00:00", "", Some(5), Some(10)),
            post("2016-01-01 10:00:00", "", Some(1), None),
            post("2016-01-02 10:00:00", "", None, Some(3)),
        ];
        let points = engagement_over_time(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp.to_string(), "2016-01-01 10:00:00");
        assert_eq!((points[0].retweets, points[0].likes), (1, 0));
        assert_eq!((points[1].retweets, points[1].likes), (5, 13));
    }

    #[test]
    fn test_word_trends_per_day() {
        let records = vec![
            post("2016-01-02 10:00:00", "Yoga yoga Yoga", None, None),
            post("2016-01-01 10:00:00", "India India rises", None, None),
            post("2016-01-01 22:00:00", "rises", None, None),
        ];
        let trends = word_trends(&records, 10);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].date, NaiveDate::from_ymd_opt(2016, 1, 1).unwrap());
        let first: Vec<(&str, usize)> = trends[0]
            .words
            .iter()
            .map(|c| (c.key.as_str(), c.count))
            .collect();
        assert_eq!(first, vec![("India", 2), ("rises", 2)]);
        // 大文字小文字は区別される
        assert_eq!(trends[1].words[0].key, "Yoga");
        assert_eq!(trends[1].words[0].count, 2);

        let limited = word_trends(&records, 1);
        assert!(limited.iter().all(|day| day.words.len() <= 1));
    }

    #[test]
    fn test_retweet_like_points_require_both_counts() {
        let records = vec![
            post("2016-01-01 10:00:00", "a", Some(1), Some(2)),
            post("2016-01-01 10:00:00", "b", None, Some(2)),
            post("2016-01-01 10:00:00", "c", Some(1), None),
        ];
        let points = retweet_like_points(&records);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].text, "a");
    }

    #[test]
    fn test_timeline_entries_keep_order() {
        let records = vec![
            post("2016-01-02 10:00:00", "second day", None, None),
            post("2016-01-01 10:00:00", "first day", None, None),
        ];
        let entries = timeline_entries(&records);
        let texts: Vec<&str> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["second day", "first day"]);
    }

    #[test]
    fn test_word_frequencies_skip_stop_words() {
        let records = vec![
            post("2016-01-01 10:00:00", "The Nation and the people", None, None),
            post("2016-01-01 10:00:00", "nation first a b", None, None),
        ];
        let words = word_frequencies(&records, 100);
        let pairs: Vec<(&str, usize)> = words.iter().map(|c| (c.key.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("nation", 2), ("people", 1), ("first", 1)]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(engagement_over_time(&[]).is_empty());
        assert!(word_trends(&[], 10).is_empty());
        assert!(retweet_like_points(&[]).is_empty());
        assert!(timeline_entries(&[]).is_empty());
        assert!(word_frequencies(&[], 100).is_empty());
    }
}

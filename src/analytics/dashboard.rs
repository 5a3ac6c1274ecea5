//! ダッシュボード全体の組み立て
//!
//! フィルター変更のたびに、フィルター後のデータから各集計を独立に作り直します。

use super::artifacts::{Counted, HeatMatrix, LabeledCount, PostRow};
use super::distribution::{
    hour_histogram, month_histogram, sentiment_buckets, source_distribution,
    text_length_distribution, SentimentBuckets,
};
use super::ranking::{top_by_likes, top_engaged, top_hashtags, top_mentions};
use super::summary::SummaryMetrics;
use super::timeline::{
    engagement_over_time, hour_month_matrix, retweet_like_points, timeline_entries,
    word_frequencies, word_trends, DailyWords, EngagementPoint, ScatterPoint, TimelineEntry,
};
use crate::filtering::{filter_records, FilterSpec};
use crate::io::Dataset;
use crate::models::EnrichedRecord;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 集計の件数設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOptions {
    /// ランキング系（ハッシュタグ、メンション、いいね、エンゲージメント）の件数
    pub top_n: usize,
    /// ワードクラウドの語数
    pub word_cloud_words: usize,
    /// 日別頻出語の語数
    pub word_trend_words: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            word_cloud_words: 100,
            word_trend_words: 10,
        }
    }
}

/// 表示層に渡す全集計結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub filter: FilterSpec,
    pub summary: SummaryMetrics,
    pub month_histogram: Vec<LabeledCount>,
    pub hour_histogram: Vec<Counted<u32>>,
    pub top_hashtags: Vec<LabeledCount>,
    pub top_mentions: Vec<LabeledCount>,
    pub retweet_like_points: Vec<ScatterPoint>,
    pub top_liked: Vec<PostRow>,
    /// フィルター前の全データに対する分布
    pub source_distribution: Vec<LabeledCount>,
    pub sentiment: SentimentBuckets,
    pub word_frequencies: Vec<LabeledCount>,
    pub text_length_distribution: Vec<Counted<usize>>,
    pub hour_month_matrix: HeatMatrix,
    pub engagement_over_time: Vec<EngagementPoint>,
    pub word_trends: Vec<DailyWords>,
    pub top_engaged: Vec<PostRow>,
    pub timeline: Vec<TimelineEntry>,
}

impl Dashboard {
    /// データセットをフィルターし、全集計を作成
    pub fn build(dataset: &Dataset, spec: &FilterSpec, options: &DashboardOptions) -> Self {
        let filtered = filter_records(dataset.records(), spec);
        Self::from_filtered(dataset.records(), &filtered, spec, options)
    }

    /// フィルター済みのデータから全集計を作成
    ///
    /// `all` は投稿クライアント分布にのみ使います。
    pub fn from_filtered(
        all: &[EnrichedRecord],
        filtered: &[EnrichedRecord],
        spec: &FilterSpec,
        options: &DashboardOptions,
    ) -> Self {
        info!(
            filter = %spec,
            matched = filtered.len(),
            total = all.len(),
            "📊 Building dashboard"
        );

        Self {
            filter: spec.clone(),
            summary: SummaryMetrics::compute(filtered),
            month_histogram: month_histogram(filtered),
            hour_histogram: hour_histogram(filtered),
            top_hashtags: top_hashtags(filtered, options.top_n),
            top_mentions: top_mentions(filtered, options.top_n),
            retweet_like_points: retweet_like_points(filtered),
            top_liked: top_by_likes(filtered, options.top_n),
            source_distribution: source_distribution(all),
            sentiment: sentiment_buckets(filtered),
            word_frequencies: word_frequencies(filtered, options.word_cloud_words),
            text_length_distribution: text_length_distribution(filtered),
            hour_month_matrix: hour_month_matrix(filtered),
            engagement_over_time: engagement_over_time(filtered),
            word_trends: word_trends(filtered, options.word_trend_words),
            top_engaged: top_engaged(filtered, options.top_n),
            timeline: timeline_entries(filtered),
        }
    }

    /// フィルター条件に一致する投稿がない
    pub fn is_empty(&self) -> bool {
        self.summary.post_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::artifacts::total_count;
    use crate::filtering::HourRange;
    use crate::models::RawRecord;

    fn dataset() -> Dataset {
        Dataset::from_raw(vec![
            RawRecord::new("1", "2016-01-05 09:00:00", "Great #Yoga day @PMO", "Android")
                .with_counts(Some(10), Some(100)),
            RawRecord::new("2", "2016-02-05 14:00:00", "#India rises", "Android")
                .with_counts(Some(5), Some(50)),
            RawRecord::new("3", "2016-01-20 09:30:00", "#Yoga again", "Android")
                .with_counts(Some(1), None),
            RawRecord::new("4", "2016-01-20 09:30:00", "from the web", "Web")
                .with_counts(Some(7), Some(70)),
            RawRecord::new("5", "2015-06-01 08:00:00", "last year", "Android"),
        ])
    }

    #[test]
    fn test_dashboard_default_options() {
        let options = DashboardOptions::default();
        assert_eq!(options.top_n, 10);
        assert_eq!(options.word_cloud_words, 100);
        assert_eq!(options.word_trend_words, 10);
    }

    #[test]
    fn test_dashboard_build() {
        let dataset = dataset();
        let spec = FilterSpec::new(2016, "Android", HourRange::FULL);
        let dashboard = Dashboard::build(&dataset, &spec, &DashboardOptions::default());

        assert!(!dashboard.is_empty());
        assert_eq!(dashboard.summary.post_count, 3);
        assert_eq!(dashboard.summary.average_retweets, 16.0 / 3.0);
        assert_eq!(dashboard.summary.average_likes, 75.0);
        assert_eq!(dashboard.summary.top_hashtag_label(), "#Yoga");

        assert_eq!(total_count(&dashboard.month_histogram), 3);
        assert_eq!(dashboard.month_histogram[0].count, 2);
        assert_eq!(
            dashboard.hour_histogram,
            vec![Counted::new(9, 2), Counted::new(14, 1)]
        );

        // 投稿クライアント分布はフィルター前の全件
        assert_eq!(total_count(&dashboard.source_distribution), 5);

        let liked: Vec<&str> = dashboard.top_liked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(liked, vec!["1", "2"]);
        assert_eq!(dashboard.retweet_like_points.len(), 2);
        assert_eq!(dashboard.timeline.len(), 3);
        assert_eq!(dashboard.sentiment.total(), 3);
    }

    #[test]
    fn test_dashboard_hour_range() {
        let dataset = dataset();
        let spec = FilterSpec::new(2016, "Android", HourRange::new(10, 23).unwrap());
        let dashboard = Dashboard::build(&dataset, &spec, &DashboardOptions::default());
        assert_eq!(dashboard.summary.post_count, 1);
        assert_eq!(dashboard.top_hashtags[0].key, "India");
    }

    #[test]
    fn test_dashboard_no_match() {
        let dataset = dataset();
        let spec = FilterSpec::new(2010, "Android", HourRange::FULL);
        let dashboard = Dashboard::build(&dataset, &spec, &DashboardOptions::default());

        assert!(dashboard.is_empty());
        assert_eq!(dashboard.summary.top_hashtag_label(), "N/A");
        assert_eq!(dashboard.month_histogram.len(), 12);
        assert!(dashboard.hour_histogram.is_empty());
        assert!(dashboard.top_liked.is_empty());
        assert!(dashboard.hour_month_matrix.is_empty());
        assert!(dashboard.word_trends.is_empty());
        assert_eq!(total_count(&dashboard.source_distribution), 5);
    }

    #[test]
    fn test_dashboard_respects_top_n() {
        let dataset = dataset();
        let spec = FilterSpec::new(2016, "Android", HourRange::FULL);
        let options = DashboardOptions {
            top_n: 1,
            ..DashboardOptions::default()
        };
        let dashboard = Dashboard::build(&dataset, &spec, &options);
        assert_eq!(dashboard.top_hashtags.len(), 1);
        assert_eq!(dashboard.top_liked.len(), 1);
        assert_eq!(dashboard.top_engaged.len(), 1);
        assert_eq!(dashboard.top_engaged[0].id, "1");
    }
}

pub mod artifacts;
pub mod dashboard;
pub mod distribution;
pub mod export;
pub mod ranking;
pub mod summary;
pub mod timeline;

pub use artifacts::{rank_counts, total_count, Counted, HeatMatrix, LabeledCount, PostRow};
pub use dashboard::{Dashboard, DashboardOptions};
pub use distribution::{
    hour_histogram, month_histogram, sentiment_buckets, source_distribution,
    text_length_distribution, SentimentBuckets, SentimentLabel,
};
pub use export::*;
pub use ranking::{top_by_likes, top_engaged, top_hashtags, top_mentions};
pub use summary::{mean_likes, mean_retweets, top_hashtag, SummaryMetrics, NO_DATA};
pub use timeline::{
    engagement_over_time, hour_month_matrix, retweet_like_points, timeline_entries,
    word_frequencies, word_trends, DailyWords, EngagementPoint, ScatterPoint, TimelineEntry,
};

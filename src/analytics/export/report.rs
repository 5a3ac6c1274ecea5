use crate::analytics::dashboard::{Dashboard, DashboardOptions};
use crate::filtering::{filter_records, FilterSpec};
use crate::io::Dataset;
use crate::models::EnrichedRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// レポートのメタデータ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    /// 読み込み元（ファイルパスまたはURL）
    pub data_source: Option<String>,
    pub filter: FilterSpec,
    /// フィルター前の投稿数
    pub total_posts: usize,
    /// フィルター後の投稿数
    pub matched_posts: usize,
    pub export_time: DateTime<Utc>,
    pub generator: String,
}

/// エクスポート対象のデータ
///
/// フィルター後の投稿と、それから作ったダッシュボードをまとめて持ちます。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub dashboard: Dashboard,
    /// フィルター後の投稿（CSV・Excelの行データ）
    #[serde(skip)]
    pub posts: Vec<EnrichedRecord>,
}

impl DashboardReport {
    /// データセットにフィルターを適用してレポートを作成
    pub fn build(dataset: &Dataset, spec: &FilterSpec, options: &DashboardOptions) -> Self {
        let posts = filter_records(dataset.records(), spec);
        let dashboard = Dashboard::from_filtered(dataset.records(), &posts, spec, options);

        Self {
            metadata: ReportMetadata {
                data_source: dataset.source().map(str::to_string),
                filter: spec.clone(),
                total_posts: dataset.len(),
                matched_posts: posts.len(),
                export_time: Utc::now(),
                generator: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            },
            dashboard,
            posts,
        }
    }

    /// 出力する投稿（`max_records` で件数を制限）
    pub fn limited_posts(&self, max_records: Option<usize>) -> &[EnrichedRecord] {
        match max_records {
            Some(max) if max < self.posts.len() => &self.posts[..max],
            _ => &self.posts,
        }
    }
}

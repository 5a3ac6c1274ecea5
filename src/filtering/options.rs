//! 選択可能な年・投稿クライアントの一覧

use super::post_filter::{FilterError, FilterSpec};
use crate::models::EnrichedRecord;
use serde::Serialize;
use std::collections::BTreeSet;

/// 閲覧者が選択できるフィルター値
///
/// 年は日時を解析できた投稿のみから集め、どちらも昇順に並べます。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub sources: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let years: BTreeSet<i32> = records.iter().filter_map(|r| r.year).collect();
        let sources: BTreeSet<&str> = records.iter().map(|r| r.source.as_str()).collect();

        Self {
            years: years.into_iter().collect(),
            sources: sources.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.sources.is_empty()
    }

    /// フィルター条件がデータ内の値を指しているか検証
    pub fn validate(&self, spec: &FilterSpec) -> Result<(), FilterError> {
        if !self.years.contains(&spec.year) {
            return Err(FilterError::UnknownYear(spec.year));
        }
        if !self.sources.iter().any(|s| s == &spec.source) {
            return Err(FilterError::UnknownSource(spec.source.clone()));
        }
        Ok(())
    }

    /// 最初に選択される既定値（最小の年と最初のクライアント）
    pub fn default_selection(&self) -> Option<(i32, &str)> {
        Some((*self.years.first()?, self.sources.first()?.as_str()))
    }
}

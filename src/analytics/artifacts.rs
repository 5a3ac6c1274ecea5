//! 集計結果（アーティファクト）の型
//!
//! 表示層へ渡す形は4種類です：スカラー値、(ラベル, 件数) の系列、
//! 2次元の行列、名前付き列を持つ表の行。

use crate::models::{EnrichedRecord, PostTimestamp};
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

/// キーと件数の組
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counted<K> {
    pub key: K,
    pub count: usize,
}

impl<K> Counted<K> {
    pub fn new(key: K, count: usize) -> Self {
        Self { key, count }
    }
}

/// 文字列ラベル付きの件数
pub type LabeledCount = Counted<String>;

/// 系列の合計件数
pub fn total_count<K>(series: &[Counted<K>]) -> usize {
    series.iter().map(|c| c.count).sum()
}

/// 出現回数で降順に並べ、同数は最初の出現順を維持して上位n件を返す
pub fn rank_counts<K, I>(items: I, n: usize) -> Vec<Counted<K>>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut ordered: Vec<Counted<K>> = Vec::new();

    for item in items {
        match index.get(&item) {
            Some(&position) => ordered[position].count += 1,
            None => {
                index.insert(item.clone(), ordered.len());
                ordered.push(Counted::new(item, 1));
            }
        }
    }

    // 安定ソートなので同数のキーは初出順のまま
    ordered.sort_by(|a, b| b.count.cmp(&a.count));
    ordered.truncate(n);
    ordered
}

/// ヒートマップ用の密な行列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeatMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// values[row][column]
    pub values: Vec<Vec<usize>>,
}

impl HeatMatrix {
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }

    pub fn get(&self, row_label: &str, column_label: &str) -> Option<usize> {
        let row = self.row_labels.iter().position(|l| l == row_label)?;
        let column = self.column_labels.iter().position(|l| l == column_label)?;
        self.values.get(row)?.get(column).copied()
    }

    pub fn total(&self) -> usize {
        self.values.iter().flatten().sum()
    }
}

/// 投稿ランキング表の1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRow {
    pub id: String,
    pub text: String,
    pub favorite_count: Option<u64>,
    pub retweets_count: Option<u64>,
    pub created_at: Option<PostTimestamp>,
}

impl From<&EnrichedRecord> for PostRow {
    fn from(record: &EnrichedRecord) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            favorite_count: record.favorite_count,
            retweets_count: record.retweets_count,
            created_at: record.timestamp,
        }
    }
}

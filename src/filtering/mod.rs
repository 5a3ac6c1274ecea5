//! 投稿フィルター
//!
//! 年・投稿クライアント・時間帯の条件を論理積で組み合わせて、特徴量付き
//! 投稿の部分列を取り出します。

pub mod options;
pub mod post_filter;

pub use options::FilterOptions;
pub use post_filter::{filter_records, FilterError, FilterSpec, HourRange, MAX_HOUR};

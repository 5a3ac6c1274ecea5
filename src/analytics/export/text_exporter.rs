use super::{DashboardReport, ExportConfig, ExportError, FormatHandler};
use crate::analytics::artifacts::{Counted, HeatMatrix, PostRow};
use crate::analytics::dashboard::Dashboard;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;
const TEXT_PREVIEW_CHARS: usize = 60;

/// 端末表示用のテキストレンダラー
pub struct TextExporter {
    bar_width: usize,
    timeline_entries: usize,
}

impl TextExporter {
    pub fn new() -> Self {
        Self {
            bar_width: BAR_WIDTH,
            timeline_entries: 10,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }

    pub fn with_timeline_entries(mut self, entries: usize) -> Self {
        self.timeline_entries = entries;
        self
    }

    /// ダッシュボード全体を文字列に変換
    pub fn render(&self, report: &DashboardReport, config: &ExportConfig) -> String {
        let mut out = String::new();
        let dashboard = &report.dashboard;

        if config.include_metadata {
            let metadata = &report.metadata;
            if let Some(source) = &metadata.data_source {
                let _ = writeln!(out, "Data source : {}", source);
            }
            let _ = writeln!(out, "Filter      : {}", metadata.filter);
            let _ = writeln!(
                out,
                "Posts       : {} of {}",
                metadata.matched_posts, metadata.total_posts
            );
            out.push('\n');
        }

        self.render_summary(&mut out, dashboard);

        if dashboard.is_empty() {
            out.push_str("No posts match the current filter.\n\n");
        }

        self.render_series(&mut out, "Posts per Month", &dashboard.month_histogram);
        self.render_series(&mut out, "Posts per Hour", &dashboard.hour_histogram);
        self.render_series(&mut out, "Top Hashtags", &dashboard.top_hashtags);
        self.render_series(&mut out, "Top Mentions", &dashboard.top_mentions);
        self.render_series(&mut out, "Sentiment", &dashboard.sentiment.as_series());
        self.render_series(
            &mut out,
            "Source Distribution (all posts)",
            &dashboard.source_distribution,
        );
        self.render_series(&mut out, "Frequent Words", &dashboard.word_frequencies);
        self.render_posts(&mut out, "Top Posts by Likes", &dashboard.top_liked);
        self.render_posts(&mut out, "Top Posts by Engagement", &dashboard.top_engaged);
        self.render_matrix(&mut out, "Posts by Hour and Month", &dashboard.hour_month_matrix);
        self.render_timeline(&mut out, dashboard);

        out
    }

    fn render_summary(&self, out: &mut String, dashboard: &Dashboard) {
        let summary = &dashboard.summary;
        let _ = writeln!(out, "== Summary ==");
        let _ = writeln!(out, "Total Posts      : {}", summary.post_count);
        let _ = writeln!(out, "Average Retweets : {:.2}", summary.average_retweets);
        let _ = writeln!(out, "Average Likes    : {:.2}", summary.average_likes);
        let _ = writeln!(out, "Top Hashtag      : {}", summary.top_hashtag_label());
        out.push('\n');
    }

    /// 系列を横棒グラフで表示（最大値を bar_width に合わせる）
    fn render_series<K: ToString>(&self, out: &mut String, title: &str, series: &[Counted<K>]) {
        let _ = writeln!(out, "== {} ==", title);
        if series.is_empty() {
            out.push_str("(none)\n\n");
            return;
        }

        let labels: Vec<String> = series.iter().map(|c| c.key.to_string()).collect();
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max = series.iter().map(|c| c.count).max().unwrap_or(0);

        for (label, entry) in labels.iter().zip(series) {
            let bar_len = if max == 0 {
                0
            } else {
                (entry.count * self.bar_width).div_ceil(max)
            };
            let padding = label_width - label.chars().count();
            let _ = writeln!(
                out,
                "{}{} | {:>6} {}",
                label,
                " ".repeat(padding),
                entry.count,
                "#".repeat(bar_len)
            );
        }
        out.push('\n');
    }

    fn render_posts(&self, out: &mut String, title: &str, rows: &[PostRow]) {
        let _ = writeln!(out, "== {} ==", title);
        if rows.is_empty() {
            out.push_str("(none)\n\n");
            return;
        }

        for (rank, row) in rows.iter().enumerate() {
            let likes = row.favorite_count.map_or("-".to_string(), |c| c.to_string());
            let retweets = row.retweets_count.map_or("-".to_string(), |c| c.to_string());
            let _ = writeln!(
                out,
                "{:>2}. likes={} retweets={} {}",
                rank + 1,
                likes,
                retweets,
                preview(&row.text)
            );
        }
        out.push('\n');
    }

    fn render_matrix(&self, out: &mut String, title: &str, matrix: &HeatMatrix) {
        let _ = writeln!(out, "== {} ==", title);
        if matrix.is_empty() {
            out.push_str("(none)\n\n");
            return;
        }

        let column_widths: Vec<usize> = matrix
            .column_labels
            .iter()
            .map(|l| l.chars().count().max(3))
            .collect();

        let _ = write!(out, "{:>4}", "hour");
        for (label, width) in matrix.column_labels.iter().zip(&column_widths) {
            let _ = write!(out, " {:>width$}", label, width = *width);
        }
        out.push('\n');

        for (label, row) in matrix.row_labels.iter().zip(&matrix.values) {
            let _ = write!(out, "{:>4}", label);
            for (value, width) in row.iter().zip(&column_widths) {
                let _ = write!(out, " {:>width$}", value, width = *width);
            }
            out.push('\n');
        }
        out.push('\n');
    }

    fn render_timeline(&self, out: &mut String, dashboard: &Dashboard) {
        let _ = writeln!(out, "== Timeline ==");
        if dashboard.timeline.is_empty() {
            out.push_str("(none)\n");
            return;
        }

        for entry in dashboard.timeline.iter().take(self.timeline_entries) {
            let _ = writeln!(out, "{}  {}", entry.timestamp, preview(&entry.text));
        }
        let remaining = dashboard.timeline.len().saturating_sub(self.timeline_entries);
        if remaining > 0 {
            let _ = writeln!(out, "... {} more", remaining);
        }
    }
}

/// 1行に収まるよう本文を短縮
fn preview(text: &str) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= TEXT_PREVIEW_CHARS {
        single_line
    } else {
        let truncated: String = single_line.chars().take(TEXT_PREVIEW_CHARS - 3).collect();
        format!("{}...", truncated)
    }
}

impl FormatHandler for TextExporter {
    fn export(
        &self,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        Ok(self.render(report, config).into_bytes())
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

impl Default for TextExporter {
    fn default() -> Self {
        Self::new()
    }
}

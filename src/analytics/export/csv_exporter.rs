use super::{DashboardReport, ExportConfig, ExportError, FormatHandler};
use crate::models::EnrichedRecord;

/// メタデータ行の先頭文字
const COMMENT_PREFIX: u8 = b'#';

const HEADERS: [&str; 10] = [
    "id",
    "created_at",
    "source",
    "text",
    "retweets_count",
    "favorite_count",
    "text_length",
    "sentiment",
    "hashtags",
    "mentions",
];

/// CSV形式エクスポーター
///
/// フィルター後の投稿を1行1件で出力します。
/// メタデータは `#` で始まるコメント行として先頭に置かれるため、
/// `csv::ReaderBuilder::comment(Some(b'#'))` で読み飛ばせます。
pub struct CsvExporter {
    delimiter: u8,
    include_headers: bool,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            include_headers: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, include_headers: bool) -> Self {
        self.include_headers = include_headers;
        self
    }

    /// 投稿をCSVレコードに変換
    fn post_to_record(post: &EnrichedRecord) -> [String; 10] {
        let created_at = post
            .timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| post.created_at.clone());

        [
            post.id.clone(),
            created_at,
            post.source.clone(),
            post.text.clone(),
            post.retweets_count.map_or(String::new(), |c| c.to_string()),
            post.favorite_count.map_or(String::new(), |c| c.to_string()),
            post.text_length.to_string(),
            format!("{:.4}", post.sentiment),
            post.hashtags.join("|"),
            post.mentions.join("|"),
        ]
    }

    /// メタデータのキーと値
    fn metadata_entries(report: &DashboardReport) -> Vec<(&'static str, String)> {
        let metadata = &report.metadata;
        let summary = &report.dashboard.summary;

        let mut entries = Vec::new();
        if let Some(source) = &metadata.data_source {
            entries.push(("Data Source", source.clone()));
        }
        entries.push(("Year", metadata.filter.year.to_string()));
        entries.push(("Source", metadata.filter.source.clone()));
        entries.push(("Hours", metadata.filter.hour_range.to_string()));
        entries.push(("Total Posts", metadata.total_posts.to_string()));
        entries.push(("Matched Posts", metadata.matched_posts.to_string()));
        entries.push(("Average Retweets", format!("{:.2}", summary.average_retweets)));
        entries.push(("Average Likes", format!("{:.2}", summary.average_likes)));
        entries.push(("Top Hashtag", summary.top_hashtag_label()));
        entries.push((
            "Export Time",
            metadata
                .export_time
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        ));
        entries
    }

    /// メタデータセクションを書き込み
    ///
    /// コメント行は改行で終わるため、値の中の改行は空白に置き換える。
    fn write_metadata_section(
        &self,
        buffer: Vec<u8>,
        report: &DashboardReport,
    ) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_writer(buffer);

        writer.write_record(["# Metadata"])?;
        for (key, value) in Self::metadata_entries(report) {
            let value = value.replace(['\r', '\n'], " ");
            writer.write_record([format!("# {}", key), value])?;
        }

        let mut buffer = writer.into_inner().map_err(|e| e.into_error())?;
        buffer.push(b'\n'); // 空行
        Ok(buffer)
    }
}

impl FormatHandler for CsvExporter {
    fn export(
        &self,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        let mut buffer = Vec::new();

        // メタデータセクション（オプション）
        if config.include_metadata {
            buffer = self.write_metadata_section(buffer, report)?;
        }

        // `#` で始まるフィールドは引用符で囲まれ、コメント行と区別される
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .comment(Some(COMMENT_PREFIX))
            .from_writer(buffer);

        if self.include_headers {
            writer.write_record(HEADERS)?;
        }

        for post in report.limited_posts(config.max_records) {
            writer.write_record(Self::post_to_record(post))?;
        }

        writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
    }

    fn file_extension(&self) -> &str {
        "csv"
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

// csv::ErrorをExportErrorに変換
impl From<csv::Error> for ExportError {
    fn from(error: csv::Error) -> Self {
        ExportError::Serialization(format!("CSV error: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::dashboard::DashboardOptions;
    use crate::analytics::export::ExportFormat;
    use crate::filtering::{FilterSpec, HourRange};
    use crate::io::Dataset;
    use crate::models::RawRecord;

    fn create_test_report() -> DashboardReport {
        let dataset = Dataset::from_raw(vec![
            RawRecord::new("1", "2016-01-05 09:00:00", "Hello, world! #Yoga", "Android")
                .with_counts(Some(3), Some(10)),
            RawRecord::new("2", "2016-01-06 10:00:00", "He said \"hi\" @PMO", "Android")
                .with_counts(None, Some(4)),
        ])
        .with_source("posts.csv");
        let spec = FilterSpec::new(2016, "Android", HourRange::FULL);
        DashboardReport::build(&dataset, &spec, &DashboardOptions::default())
    }

    fn config(include_metadata: bool) -> ExportConfig {
        ExportConfig {
            include_metadata,
            ..ExportConfig::new(ExportFormat::Csv)
        }
    }

    #[test]
    fn test_csv_export() {
        let exporter = CsvExporter::new();
        let csv_bytes = exporter.export(&create_test_report(), &config(true)).unwrap();
        let csv_str = String::from_utf8(csv_bytes).unwrap();

        assert!(csv_str.starts_with("# Metadata\n"));
        assert!(csv_str.contains("# Data Source,posts.csv"));
        assert!(csv_str.contains("# Top Hashtag,#Yoga"));
        assert!(csv_str.contains("id,created_at,source,text,retweets_count"));
        assert!(csv_str.contains("\"Hello, world! #Yoga\""));
        assert!(csv_str.contains("\"He said \"\"hi\"\" @PMO\""));
    }

    #[test]
    fn test_csv_export_without_metadata() {
        let exporter = CsvExporter::new();
        let csv_bytes = exporter.export(&create_test_report(), &config(false)).unwrap();
        let csv_str = String::from_utf8(csv_bytes).unwrap();

        assert!(!csv_str.contains("# Metadata"));
        let lines: Vec<&str> = csv_str.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,"));
        assert!(lines[2].starts_with("2,2016-01-06 10:00:00,Android,"));
        // リツイート数の欠損は空欄
        assert!(lines[2].contains(",,4,"));
    }

    #[test]
    fn test_csv_custom_delimiter_and_no_headers() {
        let exporter = CsvExporter::new().with_delimiter(b';').with_headers(false);
        let csv_bytes = exporter.export(&create_test_report(), &config(false)).unwrap();
        let csv_str = String::from_utf8(csv_bytes).unwrap();

        let first = csv_str.lines().next().unwrap();
        // `#` を含むフィールドは引用符で囲まれる
        let expected = "1;2016-01-05 09:00:00;Android;\"Hello, world! #Yoga\";3;10;";
        assert!(first.starts_with(expected));
        assert!(first.ends_with(";Yoga;"));
    }

    #[test]
    fn test_csv_delimiter_inside_numbers_is_quoted() {
        let exporter = CsvExporter::new().with_delimiter(b'.');
        let csv_bytes = exporter.export(&create_test_report(), &config(false)).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'.')
            .from_reader(csv_bytes.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), HEADERS.len());
        assert!(rows[0][7].parse::<f64>().is_ok());
    }

    #[test]
    fn test_csv_metadata_is_skipped_as_comments() {
        let dataset = Dataset::from_raw(vec![
            RawRecord::new("#1", "2016-01-05 09:00:00", "#Yoga first", "Android"),
            RawRecord::new("2", "2016-01-05 10:00:00", "second", "Android"),
        ])
        .with_source("multi\nline.csv");
        let spec = FilterSpec::new(2016, "Android", HourRange::FULL);
        let report = DashboardReport::build(&dataset, &spec, &DashboardOptions::default());

        let csv_bytes = CsvExporter::new().export(&report, &config(true)).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .from_reader(csv_bytes.as_slice());

        assert_eq!(reader.headers().unwrap().get(0), Some("id"));
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(0), Some("#1"));
        assert_eq!(rows[0].get(3), Some("#Yoga first"));
        assert_eq!(rows[1].get(0), Some("2"));
    }

    #[test]
    fn test_csv_max_records() {
        let exporter = CsvExporter::new();
        let config = ExportConfig {
            max_records: Some(1),
            ..config(false)
        };
        let csv_str = String::from_utf8(exporter.export(&create_test_report(), &config).unwrap())
            .unwrap();
        assert_eq!(csv_str.lines().count(), 2);
    }
}

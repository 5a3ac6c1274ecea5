//! CSV dataset loading.
//!
//! Reads the post export from a local file or over HTTP and deserializes each
//! row into a [`RawRecord`]. Any failure here is fatal for the session.

use crate::models::RawRecord;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &["created_at", "source"];

/// Comprehensive error types for dataset loading.
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O error when reading files
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV structure or decoding error
    #[error("CSV parsing error at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// Network operation failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP response
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Header row lacks a required column
    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },

    /// The source delivered no content at all
    #[error("No valid data found: {context}")]
    NoData { context: String },
}

impl LoadError {
    /// Create a missing column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a no data error
    pub fn no_data(context: impl Into<String>) -> Self {
        Self::NoData {
            context: context.into(),
        }
    }

    fn csv(error: csv::Error) -> Self {
        let line = error.position().map(|p| p.line()).unwrap_or(0);
        Self::Csv {
            line,
            source: error,
        }
    }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, everything else is a path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Parse CSV content into raw records.
///
/// Unknown columns are ignored, missing `id`/`text` columns default to empty
/// strings and malformed counts become `None`.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(LoadError::csv)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::missing_column(*column));
        }
    }

    let mut records = Vec::new();
    for result in csv_reader.deserialize::<RawRecord>() {
        let record = result.map_err(|e| {
            warn!("⚠️ Failed to decode CSV row: {}", e);
            LoadError::csv(e)
        })?;
        records.push(record);
    }

    debug!(rows = records.len(), "📄 Parsed CSV rows");
    Ok(records)
}

/// Parse a fully read body, rejecting one without any content.
///
/// A header row with no data rows is a valid, empty dataset.
fn parse_content(content: &[u8], location: &str) -> Result<Vec<RawRecord>, LoadError> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::no_data(format!("'{}' is empty", location)));
    }
    parse_csv(content)
}

/// Read a CSV dataset from a local file.
pub fn load_csv_file(path: &PathBuf) -> Result<Vec<RawRecord>, LoadError> {
    let content = fs::read(path)?;
    parse_content(&content, &path.display().to_string())
}

/// Fetch a CSV dataset over HTTP.
pub async fn fetch_csv(url: &str) -> Result<Vec<RawRecord>, LoadError> {
    info!("🌐 Fetching dataset from URL: {}", url);

    let response = reqwest::Client::new().get(url).send().await.map_err(|e| {
        error!("❌ Failed to fetch URL: {}", e);
        e
    })?;

    let status = response.status();
    debug!("📄 Received HTTP response with status: {}", status);
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    parse_content(&body, url)
}

/// Load raw records from either kind of source.
pub async fn load_raw_records(source: &DataSource) -> Result<Vec<RawRecord>, LoadError> {
    let records = match source {
        DataSource::File(path) => load_csv_file(path)?,
        DataSource::Url(url) => fetch_csv(url).await?,
    };

    if records.is_empty() {
        warn!(source = %source, "⚠️ Dataset has a header row but no posts");
    }

    info!(
        source = %source,
        rows = records.len(),
        "📥 Dataset loaded"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,created_at,text,source,retweets_count,favorite_count,lang
1,2016-01-05 09:00:00,Hello #India,Twitter for Android,10,100,en
2,2016-02-05 14:00:00,\"Quoted, with comma\",Twitter for Android,,5,en
3,not a date,,Twitter Web Client,abc,12.0,en
";

    #[test]
    fn test_parse_csv() {
        let records = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].text, "Hello #India");
        assert_eq!(records[0].retweets_count, Some(10));
        assert_eq!(records[0].favorite_count, Some(100));

        assert_eq!(records[1].text, "Quoted, with comma");
        assert_eq!(records[1].retweets_count, None);
        assert_eq!(records[1].favorite_count, Some(5));

        assert_eq!(records[2].created_at, "not a date");
        assert_eq!(records[2].text, "");
        assert_eq!(records[2].retweets_count, None);
        assert_eq!(records[2].favorite_count, Some(12));
    }

    #[test]
    fn test_parse_csv_optional_columns() {
        let csv = "created_at,source\n2016-01-05 09:00:00,web\n";
        let records = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "");
        assert_eq!(records[0].text, "");
        assert_eq!(records[0].retweets_count, None);
    }

    #[test]
    fn test_parse_csv_missing_required_column() {
        let csv = "id,text\n1,hello\n";
        let result = parse_csv(csv.as_bytes());
        assert!(matches!(
            result,
            Err(LoadError::MissingColumn { ref column }) if column == "created_at"
        ));
    }

    #[test]
    fn test_parse_csv_header_only() {
        let csv = "created_at,source,text\n";
        assert!(parse_csv(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_data_source_parse() {
        assert_eq!(
            DataSource::parse("https://example.com/posts.csv"),
            DataSource::Url("https://example.com/posts.csv".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/posts.csv "),
            DataSource::File(PathBuf::from("data/posts.csv"))
        );
    }

    #[test]
    fn test_load_csv_file_empty_content() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = load_csv_file(&file.path().to_path_buf());
        assert!(matches!(result, Err(LoadError::NoData { .. })));

        assert!(matches!(
            parse_content(b" \n\n", "blank.csv"),
            Err(LoadError::NoData { ref context }) if context == "'blank.csv' is empty"
        ));
        assert_eq!(
            parse_content(b"created_at,source\n", "header.csv").unwrap().len(),
            0
        );
    }

    #[test]
    fn test_load_csv_file_missing() {
        let result = load_csv_file(&PathBuf::from("/nonexistent/posts.csv"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            LoadError::missing_column("source").to_string(),
            "Missing required column 'source'"
        );
        assert_eq!(
            LoadError::no_data("empty").to_string(),
            "No valid data found: empty"
        );
    }
}

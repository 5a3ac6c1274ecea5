use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

pub mod csv_exporter;
pub mod excel_exporter;
pub mod json_exporter;
pub mod report;
pub mod text_exporter;

pub use csv_exporter::CsvExporter;
pub use excel_exporter::ExcelExporter;
pub use json_exporter::JsonExporter;
pub use report::{DashboardReport, ReportMetadata};
pub use text_exporter::TextExporter;

/// エクスポート形式
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[display("text")]
    Text,
    #[display("json")]
    Json,
    #[display("csv")]
    Csv,
    #[display("excel")]
    Excel,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => Err(ExportError::InvalidData {
                message: format!("unknown export format '{}'", other),
            }),
        }
    }
}

/// エクスポートエラー
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported format: {format:?}")]
    UnsupportedFormat { format: ExportFormat },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

/// エクスポート設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub include_metadata: bool,
    /// 投稿行の最大件数（CSV・Excel）
    pub max_records: Option<usize>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            include_metadata: true,
            max_records: None,
        }
    }
}

impl ExportConfig {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }
}

/// フォーマットハンドラートレイト
pub trait FormatHandler: Send + Sync {
    fn export(&self, report: &DashboardReport, config: &ExportConfig)
        -> Result<Vec<u8>, ExportError>;
    fn file_extension(&self) -> &str;
}

/// エクスポートマネージャー
pub struct ExportManager {
    format_handlers: HashMap<ExportFormat, Box<dyn FormatHandler>>,
}

impl ExportManager {
    /// 新しいエクスポートマネージャーを作成
    pub fn new() -> Self {
        let mut manager = Self {
            format_handlers: HashMap::new(),
        };

        // デフォルトハンドラーを登録
        manager.register_handler(ExportFormat::Text, Box::new(TextExporter::new()));
        manager.register_handler(ExportFormat::Json, Box::new(JsonExporter::new()));
        manager.register_handler(ExportFormat::Csv, Box::new(CsvExporter::new()));
        manager.register_handler(ExportFormat::Excel, Box::new(ExcelExporter::new()));

        manager
    }

    /// フォーマットハンドラーを登録
    pub fn register_handler(&mut self, format: ExportFormat, handler: Box<dyn FormatHandler>) {
        self.format_handlers.insert(format, handler);
    }

    /// レポートをエクスポート
    pub fn export(
        &self,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        self.validate_config(config)?;

        let handler =
            self.format_handlers
                .get(&config.format)
                .ok_or(ExportError::UnsupportedFormat {
                    format: config.format,
                })?;

        let bytes = handler.export(report, config)?;
        tracing::debug!(
            format = %config.format,
            bytes = bytes.len(),
            "📦 Export rendered"
        );
        Ok(bytes)
    }

    /// サポートされている形式を取得
    pub fn supported_formats(&self) -> Vec<ExportFormat> {
        self.format_handlers.keys().copied().collect()
    }

    /// 設定の妥当性を検証
    pub fn validate_config(&self, config: &ExportConfig) -> Result<(), ExportError> {
        if !self.format_handlers.contains_key(&config.format) {
            return Err(ExportError::UnsupportedFormat {
                format: config.format,
            });
        }

        if let Some(max_records) = config.max_records {
            if max_records == 0 {
                return Err(ExportError::InvalidData {
                    message: "max_records must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}

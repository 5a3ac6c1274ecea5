use super::{DashboardReport, ExportConfig, ExportError, FormatHandler};

/// JSON形式エクスポーター
pub struct JsonExporter {
    pretty_print: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// JSON構造を組み立て
    fn build_json_structure(
        &self,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<serde_json::Value, ExportError> {
        let mut json = serde_json::to_value(report)
            .map_err(|e| ExportError::Serialization(format!("JSON conversion failed: {}", e)))?;

        if let serde_json::Value::Object(ref mut map) = json {
            // メタデータを除外する場合
            if !config.include_metadata {
                map.remove("metadata");
            }

            // 投稿行の件数制限がある場合のみ投稿を含める
            if let Some(max_records) = config.max_records {
                let posts = serde_json::to_value(report.limited_posts(Some(max_records)))
                    .map_err(|e| ExportError::Serialization(e.to_string()))?;
                map.insert("posts".to_string(), posts);
            }
        }

        Ok(json)
    }
}

impl FormatHandler for JsonExporter {
    fn export(
        &self,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        let json = self.build_json_structure(report, config)?;

        let json_string = if self.pretty_print {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        }
        .map_err(|e| ExportError::Serialization(format!("JSON serialization failed: {}", e)))?;

        Ok(json_string.into_bytes())
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

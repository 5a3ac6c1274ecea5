use super::{DashboardReport, ExportConfig, ExportError, FormatHandler};
use crate::analytics::artifacts::{Counted, PostRow};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};

/// Excel形式エクスポーター
///
/// 主要指標・投稿一覧・各集計をそれぞれ別シートに書き出します。
pub struct ExcelExporter {
    multi_sheet: bool,
    cell_formatting: bool,
}

impl ExcelExporter {
    pub fn new() -> Self {
        Self {
            multi_sheet: true,
            cell_formatting: true,
        }
    }

    pub fn with_multi_sheet(mut self, multi_sheet: bool) -> Self {
        self.multi_sheet = multi_sheet;
        self
    }

    pub fn with_cell_formatting(mut self, cell_formatting: bool) -> Self {
        self.cell_formatting = cell_formatting;
        self
    }

    /// ワークブックを作成してデータを書き込み
    fn create_workbook(
        &self,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();

        if config.include_metadata {
            self.create_summary_sheet(&mut workbook, report)?;
        }

        // メインデータシート
        self.create_posts_sheet(&mut workbook, report, config)?;

        // 複数シート対応
        if self.multi_sheet {
            let dashboard = &report.dashboard;
            self.create_counts_sheet(&mut workbook, "Months", "Month", &dashboard.month_histogram)?;
            self.create_counts_sheet(&mut workbook, "Hours", "Hour", &dashboard.hour_histogram)?;
            self.create_counts_sheet(
                &mut workbook,
                "Hashtags",
                "Hashtag",
                &dashboard.top_hashtags,
            )?;
            self.create_counts_sheet(
                &mut workbook,
                "Mentions",
                "Mention",
                &dashboard.top_mentions,
            )?;
            self.create_counts_sheet(
                &mut workbook,
                "Sentiment",
                "Sentiment",
                &dashboard.sentiment.as_series(),
            )?;
            self.create_top_liked_sheet(&mut workbook, &dashboard.top_liked)?;
        }

        // ワークブックをバイト配列として取得
        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| ExportError::Serialization(format!("Excel generation failed: {}", e)))?;

        Ok(buffer)
    }

    fn header_format(&self) -> Option<Format> {
        self.cell_formatting.then(|| {
            Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0x4472C4))
                .set_font_color(Color::White)
                .set_border(FormatBorder::Thin)
        })
    }

    /// ヘッダー行を書き込み
    fn write_headers(&self, worksheet: &mut Worksheet, headers: &[&str]) -> Result<(), XlsxError> {
        let header_format = self.header_format();
        for (col, header) in headers.iter().enumerate() {
            match header_format {
                Some(ref format) => {
                    worksheet.write_string_with_format(0, col as u16, *header, format)?
                }
                None => worksheet.write_string(0, col as u16, *header)?,
            };
        }
        Ok(())
    }

    /// 主要指標シートを作成
    fn create_summary_sheet(
        &self,
        workbook: &mut Workbook,
        report: &DashboardReport,
    ) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet().set_name("Summary")?;
        self.write_headers(worksheet, &["Item", "Value"])?;

        let metadata = &report.metadata;
        let summary = &report.dashboard.summary;
        let rows: Vec<(&str, String)> = vec![
            (
                "Data Source",
                metadata.data_source.clone().unwrap_or_default(),
            ),
            ("Year", metadata.filter.year.to_string()),
            ("Source", metadata.filter.source.clone()),
            ("Hours", metadata.filter.hour_range.to_string()),
            ("Total Posts", metadata.total_posts.to_string()),
            ("Matched Posts", summary.post_count.to_string()),
            ("Average Retweets", format!("{:.2}", summary.average_retweets)),
            ("Average Likes", format!("{:.2}", summary.average_likes)),
            ("Top Hashtag", summary.top_hashtag_label()),
            (
                "Export Time",
                metadata
                    .export_time
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string(),
            ),
        ];

        for (row, (item, value)) in rows.iter().enumerate() {
            let row_idx = (row + 1) as u32;
            worksheet.write_string(row_idx, 0, *item)?;
            worksheet.write_string(row_idx, 1, value)?;
        }

        worksheet.set_column_width(0, 20.0)?;
        worksheet.set_column_width(1, 40.0)?;
        Ok(())
    }

    /// 投稿シートを作成
    fn create_posts_sheet(
        &self,
        workbook: &mut Workbook,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet().set_name("Posts")?;

        let headers = [
            "ID",
            "Created At",
            "Source",
            "Text",
            "Retweets",
            "Likes",
            "Length",
            "Sentiment",
            "Hashtags",
            "Mentions",
        ];
        self.write_headers(worksheet, &headers)?;

        for (row, post) in report.limited_posts(config.max_records).iter().enumerate() {
            let row_idx = (row + 1) as u32;
            let created_at = post
                .timestamp
                .map(|t| t.to_string())
                .unwrap_or_else(|| post.created_at.clone());

            worksheet.write_string(row_idx, 0, &post.id)?;
            worksheet.write_string(row_idx, 1, created_at)?;
            worksheet.write_string(row_idx, 2, &post.source)?;
            worksheet.write_string(row_idx, 3, &post.text)?;
            if let Some(retweets) = post.retweets_count {
                worksheet.write_number(row_idx, 4, retweets as f64)?;
            }
            if let Some(likes) = post.favorite_count {
                worksheet.write_number(row_idx, 5, likes as f64)?;
            }
            worksheet.write_number(row_idx, 6, post.text_length as f64)?;
            worksheet.write_number(row_idx, 7, post.sentiment)?;
            worksheet.write_string(row_idx, 8, post.hashtags.join(", "))?;
            worksheet.write_string(row_idx, 9, post.mentions.join(", "))?;
        }

        // 列幅
        for (col, width) in [12.0, 20.0, 20.0, 60.0, 10.0, 10.0, 8.0, 10.0, 20.0, 20.0]
            .into_iter()
            .enumerate()
        {
            worksheet.set_column_width(col as u16, width)?;
        }

        Ok(())
    }

    /// (ラベル, 件数) 系列のシートを作成
    fn create_counts_sheet<K: ToString>(
        &self,
        workbook: &mut Workbook,
        sheet_name: &str,
        label_header: &str,
        series: &[Counted<K>],
    ) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet().set_name(sheet_name)?;
        self.write_headers(worksheet, &[label_header, "Count"])?;

        for (row, entry) in series.iter().enumerate() {
            let row_idx = (row + 1) as u32;
            worksheet.write_string(row_idx, 0, entry.key.to_string())?;
            worksheet.write_number(row_idx, 1, entry.count as f64)?;
        }

        worksheet.set_column_width(0, 20.0)?;
        Ok(())
    }

    /// いいね数上位シートを作成
    fn create_top_liked_sheet(
        &self,
        workbook: &mut Workbook,
        rows: &[PostRow],
    ) -> Result<(), ExportError> {
        let worksheet = workbook.add_worksheet().set_name("Top Liked")?;
        self.write_headers(worksheet, &["ID", "Text", "Likes", "Retweets", "Created At"])?;

        for (row, post) in rows.iter().enumerate() {
            let row_idx = (row + 1) as u32;
            worksheet.write_string(row_idx, 0, &post.id)?;
            worksheet.write_string(row_idx, 1, &post.text)?;
            if let Some(likes) = post.favorite_count {
                worksheet.write_number(row_idx, 2, likes as f64)?;
            }
            if let Some(retweets) = post.retweets_count {
                worksheet.write_number(row_idx, 3, retweets as f64)?;
            }
            if let Some(created_at) = post.created_at {
                worksheet.write_string(row_idx, 4, created_at.to_string())?;
            }
        }

        worksheet.set_column_width(1, 60.0)?;
        Ok(())
    }
}

impl FormatHandler for ExcelExporter {
    fn export(
        &self,
        report: &DashboardReport,
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        self.create_workbook(report, config)
    }

    fn file_extension(&self) -> &str {
        "xlsx"
    }
}

impl Default for ExcelExporter {
    fn default() -> Self {
        Self::new()
    }
}

// XlsxErrorをExportErrorに変換
impl From<XlsxError> for ExportError {
    fn from(error: XlsxError) -> Self {
        ExportError::Serialization(format!("Excel error: {}", error))
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
            RawRecord::new("1", "2016-01-05 09:00:00", "Good #Yoga @PMO", "Android")
                .with_counts(Some(3), Some(10)),
            RawRecord::new("2", "not a date", "ignored", "Android"),
        ]);
        let spec = FilterSpec::new(2016, "Android", HourRange::FULL);
        DashboardReport::build(&dataset, &spec, &DashboardOptions::default())
    }

    fn is_xlsx(bytes: &[u8]) -> bool {
        // xlsx は ZIP コンテナ
        bytes.starts_with(b"PK")
    }

    #[test]
    fn test_excel_export() {
        let exporter = ExcelExporter::new();
        let config = ExportConfig::new(ExportFormat::Excel);
        let bytes = exporter.export(&create_test_report(), &config).unwrap();
        assert!(!bytes.is_empty());
        assert!(is_xlsx(&bytes));
    }

    #[test]
    fn test_excel_export_single_sheet() {
        let exporter = ExcelExporter::new().with_multi_sheet(false);
        let config = ExportConfig {
            include_metadata: false,
            ..ExportConfig::new(ExportFormat::Excel)
        };
        let bytes = exporter.export(&create_test_report(), &config).unwrap();
        assert!(is_xlsx(&bytes));
    }

    #[test]
    fn test_excel_export_without_formatting() {
        let exporter = ExcelExporter::new().with_cell_formatting(false);
        let config = ExportConfig::new(ExportFormat::Excel);
        let bytes = exporter.export(&create_test_report(), &config).unwrap();
        assert!(is_xlsx(&bytes));
    }

    #[test]
    fn test_excel_export_empty_report() {
        let dataset = Dataset::default();
        let spec = FilterSpec::new(2016, "Android", HourRange::FULL);
        let report = DashboardReport::build(&dataset, &spec, &DashboardOptions::default());
        let bytes = ExcelExporter::new()
            .export(&report, &ExportConfig::new(ExportFormat::Excel))
            .unwrap();
        assert!(is_xlsx(&bytes));
    }
}

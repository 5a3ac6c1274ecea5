//! ログ初期化
//!
//! 標準エラー出力へのコンパクト表示に加え、設定に応じて日次ローテーションの
//! ログファイルにも書き出します。

use crate::config::{project_dirs, LogConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "postlens.log";

/// ログ出力先ディレクトリ（設定がなければXDGデータディレクトリ配下）
pub fn resolve_log_dir(config: &LogConfig) -> Option<PathBuf> {
    config
        .log_dir
        .clone()
        .or_else(|| project_dirs().map(|dirs| dirs.data_local_dir().join("logs")))
}

/// `RUST_LOG` があればそれを優先し、なければ設定のログレベルを使う
fn build_env_filter(config: &LogConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("Invalid log level: {}", config.log_level))
}

/// ログを初期化
///
/// ファイル出力を有効にした場合は返された `WorkerGuard` をプロセス終了まで
/// 保持してください。破棄するとバッファ内のログが書き出されません。
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = build_env_filter(config)?;

    let (file_layer, guard, file_dir) = if config.enable_file_logging {
        let log_dir = resolve_log_dir(config).context("Failed to resolve log directory")?;
        fs::create_dir_all(&log_dir).with_context(|| {
            format!("Failed to create log directory: {}", log_dir.display())
        })?;

        let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_writer(writer);
        (Some(layer), Some(guard), Some(log_dir))
    } else {
        (None, None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(file_layer)
        .try_init()?;

    if let Some(dir) = file_dir {
        tracing::debug!("📝 File logging enabled: {}", dir.display());
    }

    Ok(guard)
}

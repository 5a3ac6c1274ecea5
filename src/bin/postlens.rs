//! postlens: 投稿データのダッシュボードCLI
//!
//! 使用例:
//! ```text
//! postlens options --data posts.csv
//! postlens show --year 2016 --source "Twitter for Android" --hours 8-20
//! postlens export --year 2016 --source "Twitter for Android" --format excel --output report.xlsx
//! postlens interactive
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use postlens::analytics::ExportConfig;
use postlens::config::{AppConfig, ConfigManager};
use postlens::filtering::{FilterOptions, FilterSpec, HourRange};
use postlens::io::{DataSource, Dataset};
use postlens::logging::init_logging;
use postlens::{DashboardOptions, DashboardReport, ExportFormat, ExportManager};
use std::fs;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Analytics dashboard over a CSV export of social-media posts")]
struct Cli {
    /// 設定ファイルのパス（省略時はXDG設定ディレクトリ）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// データセットのファイルパスまたはURL
    #[arg(long, global = true)]
    data: Option<String>,

    /// ログレベル (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 選択可能な年と投稿クライアントを表示
    Options,

    /// ダッシュボードを表示
    Show {
        #[command(flatten)]
        filter: FilterArgs,

        /// 出力形式 (text/json)
        #[arg(long, default_value = "text")]
        format: ExportFormat,
    },

    /// ダッシュボードをファイルに書き出し
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// 出力形式 (csv/json/excel)
        #[arg(long)]
        format: ExportFormat,

        /// 出力先（省略時は postlens_export.<拡張子>）
        #[arg(long)]
        output: Option<PathBuf>,

        /// 投稿行の最大件数
        #[arg(long)]
        max_records: Option<usize>,

        /// メタデータを含めない
        #[arg(long)]
        no_metadata: bool,
    },

    /// 対話モード（データセットは一度だけ読み込む）
    Interactive,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// 年（省略時はデータ中の最小の年）
    #[arg(long)]
    year: Option<i32>,

    /// 投稿クライアント（省略時は名前順で最初のもの）
    #[arg(long)]
    source: Option<String>,

    /// 時間帯 LOW-HIGH（両端を含む）
    #[arg(long, default_value = "0-23")]
    hours: HourRange,
}

impl FilterArgs {
    /// 省略された条件を既定値で補い、データ中の値か検証
    fn resolve(&self, options: &FilterOptions) -> Result<FilterSpec> {
        let (default_year, default_source) = options
            .default_selection()
            .context("The dataset has no selectable year or source")?;

        let spec = FilterSpec::new(
            self.year.unwrap_or(default_year),
            self.source.as_deref().unwrap_or(default_source),
            self.hours,
        );
        options.validate(&spec)?;
        Ok(spec)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(level) = &cli.log_level {
        config.log.log_level = level.clone();
    }
    if let Some(data) = &cli.data {
        config.data.source = data.clone();
    }

    // WorkerGuard はプロセス終了まで保持
    let _log_guard = init_logging(&config.log)?;

    info!("🎬 Starting postlens v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli.command, &config).await {
        error!("❌ {:#}", e);
        return Err(e);
    }

    info!("👋 postlens finished");
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => match ConfigManager::new() {
            Ok(manager) => manager,
            Err(e) => {
                // ログ初期化前なので標準エラーに直接出す
                eprintln!("Config directory unavailable, using defaults: {:#}", e);
                return Ok(AppConfig::default());
            }
        },
    };
    manager.load_config()
}

async fn run(command: Command, config: &AppConfig) -> Result<()> {
    let source = DataSource::parse(&config.data.source);
    let dataset = Dataset::load(&source)
        .await
        .with_context(|| format!("Failed to load dataset from {}", source))?;

    match command {
        Command::Options => {
            print_options(&dataset.filter_options());
        }
        Command::Show { filter, format } => {
            let spec = filter.resolve(&dataset.filter_options())?;
            let output = render(&dataset, &spec, &config.dashboard, format)?;
            print!("{}", output);
        }
        Command::Export {
            filter,
            format,
            output,
            max_records,
            no_metadata,
        } => {
            let spec = filter.resolve(&dataset.filter_options())?;
            let report = DashboardReport::build(&dataset, &spec, &config.dashboard);
            let export_config = ExportConfig {
                format,
                include_metadata: !no_metadata,
                max_records,
            };
            let bytes = ExportManager::new().export(&report, &export_config)?;

            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!("postlens_export.{}", format.file_extension()))
            });
            fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;

            info!(
                path = %path.display(),
                bytes = bytes.len(),
                posts = report.metadata.matched_posts,
                "💾 Export written"
            );
            println!("Wrote {} ({} bytes)", path.display(), bytes.len());
        }
        Command::Interactive => {
            run_interactive(&dataset, &config.dashboard).await?;
        }
    }

    Ok(())
}

/// ダッシュボードを text または json で描画
fn render(
    dataset: &Dataset,
    spec: &FilterSpec,
    options: &DashboardOptions,
    format: ExportFormat,
) -> Result<String> {
    if !matches!(format, ExportFormat::Text | ExportFormat::Json) {
        bail!("'{}' cannot be shown on the terminal, use the export command", format);
    }

    let report = DashboardReport::build(dataset, spec, options);
    let bytes = ExportManager::new().export(&report, &ExportConfig::new(format))?;
    let mut output = String::from_utf8(bytes).context("Rendered output is not UTF-8")?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn print_options(options: &FilterOptions) {
    let years: Vec<String> = options.years.iter().map(i32::to_string).collect();
    println!("Years   : {}", years.join(", "));
    println!("Sources :");
    for source in &options.sources {
        println!("  {}", source);
    }
}

/// 対話モードのコマンド
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    Year(i32),
    Source(String),
    Hours(HourRange),
    Show,
    Options,
    Help,
    Quit,
}

impl SessionCommand {
    fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((line, ""));

        let command = match name.to_ascii_lowercase().as_str() {
            "year" => SessionCommand::Year(
                rest.parse()
                    .with_context(|| format!("Invalid year: '{}'", rest))?,
            ),
            "source" if !rest.is_empty() => SessionCommand::Source(rest.to_string()),
            "source" => bail!("Usage: source NAME"),
            // "hours 8 20" と "hours 8-20" の両方を受け付ける
            "hours" => {
                let range = match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
                    [low, high] => format!("{}-{}", low, high),
                    _ => rest.to_string(),
                };
                SessionCommand::Hours(range.parse()?)
            }
            "show" => SessionCommand::Show,
            "options" => SessionCommand::Options,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => bail!("Unknown command '{}', type 'help'", other),
        };
        Ok(Some(command))
    }
}

/// 対話モードの現在の選択
struct Session<'a> {
    dataset: &'a Dataset,
    options: FilterOptions,
    spec: FilterSpec,
}

impl<'a> Session<'a> {
    fn new(dataset: &'a Dataset) -> Result<Self> {
        let options = dataset.filter_options();
        let (year, source) = options
            .default_selection()
            .context("The dataset has no selectable year or source")?;
        let spec = FilterSpec::new(year, source, HourRange::FULL);
        Ok(Self {
            dataset,
            options,
            spec,
        })
    }

    /// 選択を更新（データにない年・クライアントは拒否）
    fn apply(&mut self, command: &SessionCommand) -> Result<()> {
        let mut candidate = self.spec.clone();
        match command {
            SessionCommand::Year(year) => candidate.year = *year,
            SessionCommand::Source(source) => candidate.source = source.clone(),
            SessionCommand::Hours(range) => candidate.hour_range = *range,
            _ => return Ok(()),
        }
        self.options.validate(&candidate)?;
        self.spec = candidate;
        Ok(())
    }
}

const INTERACTIVE_HELP: &str = "\
Commands:
  year N            select a year
  source NAME       select a posting client
  hours LOW HIGH    select an hour range (inclusive)
  show              render the dashboard
  options           list selectable years and sources
  quit              leave the session";

async fn run_interactive(dataset: &Dataset, dashboard_options: &DashboardOptions) -> Result<()> {
    let mut session = Session::new(dataset)?;
    println!("{}", INTERACTIVE_HELP);
    println!("Current filter: {}", session.spec);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Help => println!("{}", INTERACTIVE_HELP),
            SessionCommand::Options => print_options(&session.options),
            SessionCommand::Show => {
                let output = render(
                    session.dataset,
                    &session.spec,
                    dashboard_options,
                    ExportFormat::Text,
                )?;
                print!("{}", output);
            }
            ref update => match session.apply(update) {
                Ok(()) => {
                    info!(filter = %session.spec, "🔄 Filter updated");
                    println!("Current filter: {}", session.spec);
                }
                Err(e) => {
                    warn!("⚠️ Rejected filter change: {}", e);
                    println!("{}", e);
                }
            },
        }
    }

    Ok(())
}

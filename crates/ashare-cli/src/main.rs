//! A주 일봉 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 국소 고점/저점 (30일 윈도우)
//! ashare extrema --file data/daily/比亚迪002594.csv
//!
//! # 7일 이상 연속 상승 종목 스캔
//! ashare scan --dir data/daily --min-length 7 --require-volume-increase
//!
//! # 종목 프로필 (주주 수, 공시 포함)
//! ashare profile --file data/daily/比亚迪002594.csv --holders data/holders.csv
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use ashare_analytics::{ExtremaParams, ProfileParams, RunScanParams};
use ashare_cli::commands::extrema::{run_extrema, ExtremaCommandConfig};
use ashare_cli::commands::output::OutputFormat;
use ashare_cli::commands::profile::{run_profile, ProfileCommandConfig};
use ashare_cli::commands::scan::{run_scan, ScanCommandConfig};
use ashare_core::{init_logging, AppConfig, LogConfig, LogFormat, PriceBasis};

#[derive(Parser)]
#[command(name = "ashare")]
#[command(about = "A-share daily series analysis - 극값 탐지, 연속 상승 스캔", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (없으면 config/default.toml, 그마저 없으면 기본값)
    #[arg(long, global = true)]
    config: Option<String>,

    /// 로그 형식 (pretty, json, compact)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 국소 고점/저점 탐지
    Extrema {
        /// 일봉 CSV 파일
        #[arg(short, long)]
        file: PathBuf,

        /// 양쪽 비교 윈도우 크기 (기본: 설정값)
        #[arg(short, long)]
        window: Option<usize>,

        /// 가격 기준 (close, high-low)
        #[arg(short, long)]
        basis: Option<String>,

        /// 출력 형식 (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 연속 상승 종목 스캔
    Scan {
        /// 일봉 CSV 디렉터리 (기본: 설정값)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// 최소 연속 상승 일수 (기본: 설정값)
        #[arg(short, long)]
        min_length: Option<usize>,

        /// 거래량 연속 증가 검사 (true/false, 기본: 설정값)
        #[arg(long)]
        check_volume: Option<bool>,

        /// 거래량 연속 증가 종목만 출력
        #[arg(long, default_value = "false")]
        require_volume_increase: bool,

        /// 출력 형식 (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// 진행률 표시 숨김
        #[arg(long, default_value = "false")]
        quiet: bool,
    },

    /// 종목 프로필 요약
    Profile {
        /// 일봉 CSV 파일
        #[arg(short, long)]
        file: PathBuf,

        /// 주주 수 CSV 파일 (기본: 설정값)
        #[arg(long)]
        holders: Option<PathBuf>,

        /// 공시 이벤트 CSV 파일
        #[arg(long)]
        events: Option<PathBuf>,

        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,

        /// 출력 파일 경로 (기본: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    config.validate()?;

    let mut log_config = LogConfig::from(&config.logging);
    if let Some(format) = &cli.log_format {
        let format: LogFormat = format.parse().map_err(|e: String| anyhow!(e))?;
        log_config = log_config.with_format(format);
    }
    init_logging(log_config).map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Extrema {
            file,
            window,
            basis,
            format,
            output,
        } => {
            let mut params = ExtremaParams::from(&config.extrema);
            if let Some(window) = window {
                params.window = window;
            }
            if let Some(basis) = basis {
                params.price_basis = basis.parse::<PriceBasis>().map_err(|e| anyhow!(e))?;
            }

            let count = run_extrema(ExtremaCommandConfig {
                file,
                params,
                format: OutputFormat::parse(&format)?,
                output,
            })?;
            info!("Detected {} extrema", count);
        }

        Commands::Scan {
            dir,
            min_length,
            check_volume,
            require_volume_increase,
            format,
            output,
            quiet,
        } => {
            let mut params = RunScanParams::from(&config.run_scan);
            if let Some(min_length) = min_length {
                params.min_length = min_length;
            }
            if let Some(check_volume) = check_volume {
                params.check_volume = check_volume;
            }

            let count = run_scan(ScanCommandConfig {
                dir: dir.unwrap_or_else(|| PathBuf::from(&config.data.dir)),
                params,
                require_volume_increase,
                format: OutputFormat::parse(&format)?,
                output,
                show_progress: !quiet,
            })?;
            info!("{} stocks matched", count);
        }

        Commands::Profile {
            file,
            holders,
            events,
            format,
            output,
        } => {
            run_profile(ProfileCommandConfig {
                file,
                holders: holders.or_else(|| config.data.holders_file.as_ref().map(PathBuf::from)),
                events,
                params: ProfileParams::from(&config),
                format: OutputFormat::parse(&format)?,
                output,
            })?;
        }
    }

    Ok(())
}

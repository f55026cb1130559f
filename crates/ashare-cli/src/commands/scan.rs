//! 연속 상승 종목 스캔 명령어.
//!
//! 디렉터리의 모든 일봉 파일을 읽어 최장 상승 구간이 임계값 이상인 종목을 찾습니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 7일 이상 연속 상승 종목
//! ashare scan --dir data/daily
//!
//! # 10일 이상 + 거래량 연속 증가 종목만
//! ashare scan --dir data/daily --min-length 10 --require-volume-increase
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use ashare_analytics::{RunScanParams, RunScanner, StockRun};
use ashare_core::StockSeries;
use ashare_data::OhlcvCsvReader;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::output::{to_csv, to_json, truncate, write_output, OutputFormat};

/// 스캔 설정.
#[derive(Debug, Clone)]
pub struct ScanCommandConfig {
    /// 일봉 CSV 디렉터리
    pub dir: PathBuf,
    /// 스캔 파라미터
    pub params: RunScanParams,
    /// 거래량 연속 증가 종목만 출력
    pub require_volume_increase: bool,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
    /// 진행률 표시 여부
    pub show_progress: bool,
}

/// 디렉터리를 스캔하고 조건을 만족한 종목 수를 반환합니다.
pub fn run_scan(config: ScanCommandConfig) -> Result<usize> {
    let mut params = config.params;
    if config.require_volume_increase {
        params.check_volume = true;
    }
    let scanner = RunScanner::new(params)?;

    let series = load_all(&config)?;
    let mut hits = scanner.scan_many(&series);
    if config.require_volume_increase {
        hits.retain(|hit| hit.run.volume_monotonic_increasing);
    }

    info!(
        loaded = series.len(),
        matched = hits.len(),
        min_length = params.min_length,
        "Scan completed"
    );

    let content = match config.format {
        OutputFormat::Table => format_table(&hits),
        OutputFormat::Csv => format_csv(&hits)?,
        OutputFormat::Json => to_json(&hits)?,
    };

    write_output(&content, config.output.as_deref())?;

    Ok(hits.len())
}

fn load_all(config: &ScanCommandConfig) -> Result<Vec<StockSeries>> {
    let pb = if config.show_progress {
        ProgressBar::new(0)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );

    let series = OhlcvCsvReader::new()
        .read_dir_with(&config.dir, |path, total| {
            pb.set_length(total as u64);
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                pb.set_message(stem.to_string());
            }
            pb.inc(1);
        })
        .with_context(|| format!("Failed to load {}", config.dir.display()))?;

    pb.finish_with_message("Load completed");

    Ok(series)
}

fn format_table(hits: &[StockRun]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<8} {:<16} {:<12} {:>6} {:<10}\n",
        "CODE", "NAME", "START", "DAYS", "VOLUME_UP"
    ));
    output.push_str(&"-".repeat(56));
    output.push('\n');

    for hit in hits {
        let volume = if !hit.run.volume_checked {
            "-"
        } else if hit.run.volume_monotonic_increasing {
            "✓"
        } else {
            "✗"
        };
        output.push_str(&format!(
            "{:<8} {:<16} {:<12} {:>6} {:<10}\n",
            hit.stock.code,
            truncate(&hit.stock.name, 16),
            hit.run.start_date,
            hit.run.length_in_days,
            volume
        ));
    }

    output.push('\n');
    output.push_str(&format!("Total: {} stocks", hits.len()));

    output
}

fn format_csv(hits: &[StockRun]) -> Result<String> {
    to_csv(
        &[
            "code",
            "name",
            "start_date",
            "length_in_days",
            "volume_checked",
            "volume_monotonic_increasing",
        ],
        hits.iter().map(|hit| {
            vec![
                hit.stock.code.clone(),
                hit.stock.name.clone(),
                hit.run.start_date.to_string(),
                hit.run.length_in_days.to_string(),
                hit.run.volume_checked.to_string(),
                hit.run.volume_monotonic_increasing.to_string(),
            ]
        }),
    )
}

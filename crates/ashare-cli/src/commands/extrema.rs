//! 극값 탐지 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 30일 윈도우로 종가 기준 고점/저점
//! ashare extrema --file data/daily/比亚迪002594.csv
//!
//! # 고점은 고가, 저점은 저가로 표기하고 JSON으로 저장
//! ashare extrema --file data/daily/比亚迪002594.csv --basis high-low --format json -o byd.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use ashare_analytics::{ExtremaDetector, ExtremaParams, ExtremaProfile};
use ashare_core::{PriceBasis, StockId};
use ashare_data::OhlcvCsvReader;
use serde::Serialize;
use tracing::info;

use super::output::{to_csv, to_json, write_output, OutputFormat};

/// 극값 탐지 설정.
#[derive(Debug, Clone)]
pub struct ExtremaCommandConfig {
    /// 일봉 CSV 파일
    pub file: PathBuf,
    /// 극값 파라미터
    pub params: ExtremaParams,
    /// 출력 형식
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExtremaReport<'a> {
    stock: &'a StockId,
    window: usize,
    price_basis: PriceBasis,
    #[serde(flatten)]
    profile: &'a ExtremaProfile,
}

/// 극값을 탐지하고 출력합니다. 탐지된 극값 수를 반환합니다.
pub fn run_extrema(config: ExtremaCommandConfig) -> Result<usize> {
    let series = OhlcvCsvReader::new()
        .read(&config.file)
        .with_context(|| format!("Failed to load {}", config.file.display()))?;

    let detector = ExtremaDetector::new(config.params)?;
    let profile = detector.detect(series.points())?;

    info!(
        stock = %series.stock,
        peaks = profile.peaks.len(),
        valleys = profile.valleys.len(),
        "Extrema detected"
    );

    let content = match config.format {
        OutputFormat::Table => format_table(&series.stock, &config.params, &profile),
        OutputFormat::Csv => format_csv(&profile)?,
        OutputFormat::Json => to_json(&ExtremaReport {
            stock: &series.stock,
            window: config.params.window,
            price_basis: config.params.price_basis,
            profile: &profile,
        })?,
    };

    write_output(&content, config.output.as_deref())?;

    Ok(profile.peaks.len() + profile.valleys.len())
}

fn format_table(stock: &StockId, params: &ExtremaParams, profile: &ExtremaProfile) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} [{}]  window={}  basis={:?}\n\n",
        stock,
        stock.qualified_code(),
        params.window,
        params.price_basis
    ));
    output.push_str(&format!("{:<8} {:<12} {:>12}\n", "KIND", "DATE", "PRICE"));
    output.push_str(&"-".repeat(34));
    output.push('\n');

    for point in profile.points() {
        output.push_str(&format!(
            "{:<8} {:<12} {:>12}\n",
            format!("{:?}", point.kind).to_lowercase(),
            point.date,
            point.price
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Total: {} peaks, {} valleys",
        profile.peaks.len(),
        profile.valleys.len()
    ));
    if let Some(high) = profile.highest_peak() {
        output.push_str(&format!("\nHighest peak: {} on {}", high.price, high.date));
    }
    if let Some(low) = profile.lowest_valley() {
        output.push_str(&format!("\nLowest valley: {} on {}", low.price, low.date));
    }

    output
}

fn format_csv(profile: &ExtremaProfile) -> Result<String> {
    to_csv(
        &["kind", "date", "price", "index"],
        profile.points().into_iter().map(|p| {
            vec![
                format!("{:?}", p.kind).to_lowercase(),
                p.date.to_string(),
                p.price.to_string(),
                p.index.to_string(),
            ]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("比亚迪002594.csv");
        let mut content = String::from("date,open,high,low,close,volume\n");
        for (i, close) in [10, 12, 11, 8, 11, 13, 12].iter().enumerate() {
            content.push_str(&format!(
                "2024-01-{:02},{c},{h},{l},{c},1000\n",
                i + 1,
                c = close,
                h = close + 1,
                l = close - 1
            ));
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn config(file: PathBuf, format: OutputFormat, output: Option<String>) -> ExtremaCommandConfig {
        ExtremaCommandConfig {
            file,
            params: ExtremaParams {
                window: 1,
                price_basis: PriceBasis::Close,
            },
            format,
            output,
        }
    }

    #[test]
    fn test_run_extrema_csv() {
        let dir = TempDir::new().unwrap();
        let file = write_sample(&dir);
        let out = dir.path().join("extrema.csv");

        let count = run_extrema(config(
            file,
            OutputFormat::Csv,
            Some(out.to_str().unwrap().to_string()),
        ))
        .unwrap();
        assert_eq!(count, 3);

        let written = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "kind,date,price,index");
        assert_eq!(lines[1], "peak,2024-01-02,12,1");
        assert_eq!(lines[2], "valley,2024-01-04,8,3");
    }

    #[test]
    fn test_run_extrema_json() {
        let dir = TempDir::new().unwrap();
        let file = write_sample(&dir);
        let out = dir.path().join("extrema.json");

        run_extrema(config(
            file,
            OutputFormat::Json,
            Some(out.to_str().unwrap().to_string()),
        ))
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["stock"]["code"], "002594");
        assert_eq!(json["window"], 1);
        assert_eq!(json["peaks"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_fails() {
        let result = run_extrema(config(
            PathBuf::from("/nonexistent/000001.csv"),
            OutputFormat::Table,
            None,
        ));
        assert!(result.is_err());
    }
}

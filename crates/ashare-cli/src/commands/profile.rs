//! 종목 프로필 명령어.
//!
//! 극값, 이동평균, 거래량 급증, 최장 상승 구간, 주주 수 추이, 공시 이벤트를
//! 한 종목에 대해 요약합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! ashare profile --file data/daily/比亚迪002594.csv --holders data/holders.csv
//! ashare profile --file data/daily/比亚迪002594.csv --events data/byd_events.csv --format json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use ashare_analytics::{ProfileBuilder, ProfileParams, StockProfile};
use ashare_core::DecimalExt;
use ashare_data::{read_events, read_holder_counts, OhlcvCsvReader};
use tracing::info;

use super::output::{to_json, write_output, OutputFormat};

/// 프로필 설정.
#[derive(Debug, Clone)]
pub struct ProfileCommandConfig {
    /// 일봉 CSV 파일
    pub file: PathBuf,
    /// 주주 수 CSV 파일 (여러 종목 혼합)
    pub holders: Option<PathBuf>,
    /// 공시 이벤트 CSV 파일
    pub events: Option<PathBuf>,
    /// 계산 파라미터
    pub params: ProfileParams,
    /// 출력 형식 (table, json)
    pub format: OutputFormat,
    /// 출력 파일 경로
    pub output: Option<String>,
}

/// 프로필을 계산하고 출력합니다.
pub fn run_profile(config: ProfileCommandConfig) -> Result<StockProfile> {
    if config.format == OutputFormat::Csv {
        bail!("Profile output supports table or json only");
    }

    let series = OhlcvCsvReader::new()
        .read(&config.file)
        .with_context(|| format!("Failed to load {}", config.file.display()))?;

    let holders = match &config.holders {
        Some(path) => read_holder_counts(path, &series.stock.name)
            .with_context(|| format!("Failed to load holders from {}", path.display()))?,
        None => Vec::new(),
    };
    let events = match &config.events {
        Some(path) => read_events(path)
            .with_context(|| format!("Failed to load events from {}", path.display()))?,
        None => Vec::new(),
    };

    let profile = ProfileBuilder::new(&series, config.params.clone())
        .with_holders(&holders)
        .with_events(&events)
        .build()?;

    info!(stock = %profile.stock, "Profile built");

    let content = match config.format {
        OutputFormat::Json => to_json(&profile)?,
        _ => format_table(&profile),
    };
    write_output(&content, config.output.as_deref())?;

    Ok(profile)
}

fn format_table(profile: &StockProfile) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} [{}]\n{} ~ {}  last close {}\n",
        profile.stock,
        profile.stock.qualified_code(),
        profile.first_date,
        profile.last_date,
        profile.last_close
    ));

    output.push_str("\n== Moving averages ==\n");
    for ma in &profile.moving_averages {
        let value = ma
            .latest
            .map(|v| v.round_half_up(2).to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("{:<8} {:>12}\n", ma.label, value));
    }
    for cross in &profile.ma_crosses {
        output.push_str(&format!(
            "{:?} cross {}/{} on {}\n",
            cross.kind, cross.short, cross.long, cross.date
        ));
    }

    output.push_str("\n== Extrema ==\n");
    for point in profile.extrema.points() {
        output.push_str(&format!(
            "{:<8} {:<12} {:>12}\n",
            format!("{:?}", point.kind).to_lowercase(),
            point.date,
            point.price
        ));
    }
    if profile.extrema.is_empty() {
        output.push_str("(none)\n");
    }

    output.push_str("\n== Volume spikes ==\n");
    for spike in &profile.volume_spikes {
        output.push_str(&format!(
            "{:<12} volume {:>14}  x{}\n",
            spike.date, spike.volume, spike.ratio
        ));
    }
    if profile.volume_spikes.is_empty() {
        output.push_str("(none)\n");
    }

    output.push_str("\n== Longest rise ==\n");
    match &profile.longest_run {
        Some(run) => output.push_str(&format!(
            "{} for {} days (volume increasing: {})\n",
            run.start_date,
            run.length_in_days,
            if run.volume_checked {
                run.volume_monotonic_increasing.to_string()
            } else {
                "-".to_string()
            }
        )),
        None => output.push_str("(below threshold)\n"),
    }

    if let Some(holders) = &profile.holder_counts {
        output.push_str("\n== Holders ==\n");
        output.push_str(&format!(
            "{} -> {} ({})\n",
            holders.first,
            holders.latest,
            holders
                .change_percent
                .map(|c| c.to_percent_string())
                .unwrap_or_else(|| "-".to_string())
        ));
    }

    if !profile.events.is_empty() {
        output.push_str("\n== Events ==\n");
        for event in &profile.events {
            output.push_str(&format!(
                "{:<12} {:>12}  {}\n",
                event.trading_date, event.close, event.label
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("比亚迪002594.csv");
        let mut content = String::from("日期,开盘,最高,最低,收盘,成交量\n");
        for (i, c) in [10, 11, 12, 13, 9, 8, 10].iter().enumerate() {
            content.push_str(&format!("2024-01-{:02},{c},{c},{c},{c},100\n", i + 1));
        }
        fs::write(&path, content).unwrap();

        fs::write(
            dir.path().join("holders.csv"),
            "股票名称,日期,股东人数\n比亚迪,2024-01-01,1000\n比亚迪,2024-01-07,900\n",
        )
        .unwrap();
        fs::write(dir.path().join("events.csv"), "date,label\n2024-01-03,业绩预告\n").unwrap();
        path
    }

    fn params() -> ProfileParams {
        let mut params = ProfileParams::default();
        params.extrema.window = 1;
        params.run_scan.min_length = 2;
        params.price_ma_periods = vec![2, 3];
        params
    }

    #[test]
    fn test_run_profile_json() {
        let dir = TempDir::new().unwrap();
        let file = setup(&dir);
        let out = dir.path().join("profile.json");

        let profile = run_profile(ProfileCommandConfig {
            file,
            holders: Some(dir.path().join("holders.csv")),
            events: Some(dir.path().join("events.csv")),
            params: params(),
            format: OutputFormat::Json,
            output: Some(out.to_str().unwrap().to_string()),
        })
        .unwrap();

        assert_eq!(profile.stock.code, "002594");
        assert_eq!(profile.holder_counts.as_ref().unwrap().latest, 900);
        assert_eq!(profile.events.len(), 1);
        assert_eq!(profile.longest_run.as_ref().unwrap().length_in_days, 3);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["stock"]["name"], "比亚迪");
    }

    #[test]
    fn test_table_sections() {
        let dir = TempDir::new().unwrap();
        let file = setup(&dir);
        let out = dir.path().join("profile.txt");

        run_profile(ProfileCommandConfig {
            file,
            holders: None,
            events: None,
            params: params(),
            format: OutputFormat::Table,
            output: Some(out.to_str().unwrap().to_string()),
        })
        .unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("比亚迪(002594) [002594.SZ]"));
        assert!(text.contains("MA2"));
        assert!(text.contains("== Extrema =="));
        assert!(!text.contains("== Holders =="));
    }

    #[test]
    fn test_csv_format_rejected() {
        let result = run_profile(ProfileCommandConfig {
            file: PathBuf::from("unused.csv"),
            holders: None,
            events: None,
            params: params(),
            format: OutputFormat::Csv,
            output: None,
        });
        assert!(result.is_err());
    }
}

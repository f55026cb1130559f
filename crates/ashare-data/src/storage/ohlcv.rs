//! 종목별 일봉 CSV 로더.
//!
//! 파일 하나가 한 종목이며, 파일 이름은 `{종목명}{6자리 코드}.csv` 형식입니다
//! (예: `比亚迪002594.csv`).
//!
//! # 지원 헤더
//!
//! | 필드 | 영문 | 중문 |
//! |------|------|------|
//! | 날짜 | date | 日期 |
//! | 시가 | open | 开盘 |
//! | 고가 | high | 最高 |
//! | 저가 | low | 最低 |
//! | 종가 | close | 收盘 |
//! | 거래량 | volume | 成交量 |
//! | 등락률 (선택) | change_percent | 涨跌幅 |
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use ashare_data::OhlcvCsvReader;
//!
//! let reader = OhlcvCsvReader::new();
//! let series = reader.read("data/daily/比亚迪002594.csv")?;
//! let all = reader.read_dir("data/daily")?;
//! ```

use std::path::{Path, PathBuf};

use ashare_core::{StockId, StockSeries, TimeSeriesPoint};
use csv::StringRecord;
use tracing::{debug, info, warn};

use super::{
    field, find_column, open_reader, parse_count, parse_date, parse_decimal, require_column,
};
use crate::error::{DataError, Result};

const DATE: &[&str] = &["date", "日期", "trade_date"];
const OPEN: &[&str] = &["open", "开盘"];
const HIGH: &[&str] = &["high", "最高"];
const LOW: &[&str] = &["low", "最低"];
const CLOSE: &[&str] = &["close", "收盘"];
const VOLUME: &[&str] = &["volume", "vol", "成交量"];
const CHANGE_PERCENT: &[&str] = &["change_percent", "pct_chg", "涨跌幅"];

/// 헤더에서 찾은 컬럼 위치.
#[derive(Debug, Clone, Copy)]
struct OhlcvColumns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    change_percent: Option<usize>,
}

impl OhlcvColumns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self> {
        Ok(Self {
            date: require_column(headers, DATE, path)?,
            open: require_column(headers, OPEN, path)?,
            high: require_column(headers, HIGH, path)?,
            low: require_column(headers, LOW, path)?,
            close: require_column(headers, CLOSE, path)?,
            volume: require_column(headers, VOLUME, path)?,
            change_percent: find_column(headers, CHANGE_PERCENT),
        })
    }

    fn parse(&self, record: &StringRecord, line: u64) -> Result<TimeSeriesPoint> {
        let point = TimeSeriesPoint::new(
            parse_date(field(record, self.date, line)?, line)?,
            parse_decimal(field(record, self.open, line)?, "open", line)?,
            parse_decimal(field(record, self.high, line)?, "high", line)?,
            parse_decimal(field(record, self.low, line)?, "low", line)?,
            parse_decimal(field(record, self.close, line)?, "close", line)?,
            parse_count(field(record, self.volume, line)?, "volume", line)?,
        );

        match self.change_percent {
            Some(index) => {
                let raw = field(record, index, line)?;
                if raw.is_empty() {
                    Ok(point)
                } else {
                    Ok(point.with_change_percent(parse_decimal(raw, "change_percent", line)?))
                }
            }
            None => Ok(point),
        }
    }
}

/// 일봉 CSV 로더.
#[derive(Debug, Clone, Default)]
pub struct OhlcvCsvReader;

impl OhlcvCsvReader {
    pub fn new() -> Self {
        Self
    }

    /// CSV 파일 하나를 종목 시계열로 읽습니다.
    ///
    /// 종목은 파일 이름에서 추론합니다. 행은 날짜순으로 정렬됩니다.
    ///
    /// # 에러
    ///
    /// - 파일이나 필수 컬럼이 없으면 `NotFound`
    /// - 필드 파싱에 실패하면 `ParseError`
    /// - 같은 날짜가 두 번 나오면 `InvalidData`
    pub fn read(&self, path: impl AsRef<Path>) -> Result<StockSeries> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DataError::InvalidData(format!("파일 이름 오류: {}", path.display())))?;
        let stock = StockId::from_file_stem(stem);

        let mut reader = open_reader(path)?;
        let columns = OhlcvColumns::resolve(reader.headers()?, path)?;

        let mut points = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            points.push(columns.parse(&record, line)?);
        }

        let series = StockSeries::from_unsorted(stock, points)
            .map_err(|e| DataError::InvalidData(format!("{}: {}", path.display(), e)))?;

        debug!(
            stock = %series.stock,
            rows = series.len(),
            path = %path.display(),
            "일봉 로드"
        );

        Ok(series)
    }

    /// 디렉터리의 모든 `*.csv` 파일을 읽습니다.
    ///
    /// 파일 이름순으로 처리하며, 읽지 못한 파일은 경고를 남기고 건너뜁니다.
    pub fn read_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<StockSeries>> {
        self.read_dir_with(dir, |_, _| {})
    }

    /// `read_dir`과 같지만 파일 하나를 처리할 때마다 `on_file(path, total)`을 호출합니다.
    ///
    /// `total`은 디렉터리의 CSV 파일 수로, 진행률 표시에 사용합니다.
    /// 건너뛴 파일에 대해서도 호출됩니다.
    pub fn read_dir_with<F>(
        &self,
        dir: impl AsRef<Path>,
        mut on_file: F,
    ) -> Result<Vec<StockSeries>>
    where
        F: FnMut(&Path, usize),
    {
        let paths = csv_files(dir.as_ref())?;

        let mut loaded = Vec::with_capacity(paths.len());
        for path in &paths {
            match self.read(path) {
                Ok(series) => loaded.push(series),
                Err(e) => warn!(path = %path.display(), error = %e, "일봉 파일 건너뜀"),
            }
            on_file(path, paths.len());
        }

        info!(
            dir = %dir.as_ref().display(),
            files = paths.len(),
            loaded = loaded.len(),
            "일봉 디렉터리 로드 완료"
        );

        Ok(loaded)
    }
}

/// 디렉터리 안의 CSV 파일 목록 (이름순).
pub(crate) fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DataError::NotFound(dir.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
        })
        .collect();
    paths.sort();

    Ok(paths)
}

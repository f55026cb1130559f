//! 일봉 시계열 타입.
//!
//! 이 모듈은 분석 입력이 되는 시계열 타입을 정의합니다:
//! - `TimeSeriesPoint` - 하루치 OHLCV 데이터
//! - `StockSeries` - 날짜 오름차순이 검증된 종목별 시계열
//!
//! 분석 컴포넌트는 입력을 재정렬하지 않습니다. 정렬은 로더의 책임이며,
//! 순서가 어긋난 시계열은 `validate_ascending`에서 거부됩니다.

use crate::error::{QuantError, QuantResult};
use crate::types::{percent_change, Percentage, Price, StockId, Volume};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 하루치 OHLCV 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Volume,
    /// 벤더가 제공한 등락률 (퍼센트 포인트)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Percentage>,
}

impl TimeSeriesPoint {
    /// 새 데이터 포인트를 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            change_percent: None,
        }
    }

    /// 벤더 등락률을 설정합니다.
    pub fn with_change_percent(mut self, change_percent: Percentage) -> Self {
        self.change_percent = Some(change_percent);
        self
    }
}

/// 극값을 표기할 때 사용할 가격.
///
/// 탐지는 항상 종가로 하며, 이 값은 보고되는 가격만 결정합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// 종가
    #[default]
    Close,
    /// 고점은 고가, 저점은 저가
    #[serde(alias = "high-low", alias = "highlow")]
    HighLow,
}

impl std::str::FromStr for PriceBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "close" => Ok(Self::Close),
            "high-low" | "high_low" | "highlow" => Ok(Self::HighLow),
            _ => Err(format!("Unknown price basis: {}", s)),
        }
    }
}

/// 날짜가 엄격한 오름차순(정렬 + 중복 없음)인지 검증합니다.
///
/// 위반이 발견되면 해당 인덱스를 포함한 `InvalidInput`을 반환합니다.
pub fn validate_ascending(points: &[TimeSeriesPoint]) -> QuantResult<()> {
    for (i, pair) in points.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(QuantError::InvalidInput(format!(
                "날짜가 오름차순이 아닙니다: index {} ({}) 이후 {}",
                i + 1,
                pair[0].date,
                pair[1].date
            )));
        }
    }
    Ok(())
}

/// 거래일 목록.
pub fn dates(points: &[TimeSeriesPoint]) -> Vec<NaiveDate> {
    points.iter().map(|p| p.date).collect()
}

/// 종가 목록.
pub fn closes(points: &[TimeSeriesPoint]) -> Vec<Price> {
    points.iter().map(|p| p.close).collect()
}

/// 거래량 목록.
pub fn volumes(points: &[TimeSeriesPoint]) -> Vec<Volume> {
    points.iter().map(|p| p.volume).collect()
}

/// 일별 등락률 (퍼센트 포인트).
///
/// 벤더 값이 있으면 그대로 사용하고, 없으면 전일 종가 대비로 계산합니다.
/// 전일이 없거나 전일 종가가 0이면 0을 사용하므로 연속 상승 구간을 끊습니다.
pub fn change_percents(points: &[TimeSeriesPoint]) -> Vec<Percentage> {
    let mut result = Vec::with_capacity(points.len());
    let mut prev_close: Option<Price> = None;

    for point in points {
        let change = point
            .change_percent
            .or_else(|| prev_close.and_then(|prev| percent_change(prev, point.close)))
            .unwrap_or(Decimal::ZERO);
        result.push(change);
        prev_close = Some(point.close);
    }

    result
}

/// 날짜 오름차순이 검증된 종목별 시계열.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSeries {
    /// 종목
    pub stock: StockId,
    points: Vec<TimeSeriesPoint>,
}

impl StockSeries {
    /// 이미 정렬된 데이터로 시계열을 생성합니다.
    ///
    /// # 에러
    ///
    /// 날짜가 엄격한 오름차순이 아니면 `InvalidInput`.
    pub fn new(stock: StockId, points: Vec<TimeSeriesPoint>) -> QuantResult<Self> {
        validate_ascending(&points)?;
        Ok(Self { stock, points })
    }

    /// 날짜순으로 정렬한 뒤 시계열을 생성합니다.
    ///
    /// 같은 날짜가 두 번 나오면 여전히 `InvalidInput`입니다.
    pub fn from_unsorted(stock: StockId, mut points: Vec<TimeSeriesPoint>) -> QuantResult<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(stock, points)
    }

    /// 데이터 포인트 슬라이스.
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// 데이터 포인트 개수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 첫 거래일.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    /// 마지막 데이터 포인트.
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }
}

//! 연속 상승 구간 스캐너.
//!
//! 일별 등락률이 엄격하게 양수인 날이 가장 길게 이어진 구간을 찾고,
//! 그 길이가 임계값 이상일 때만 결과를 보고합니다.
//!
//! - 같은 길이의 구간이 여러 개면 가장 먼저 나온 구간을 사용합니다.
//! - 등락률 0은 상승이 아니므로 구간을 끊습니다.
//! - 거래량 검사는 구간 내 거래량이 매일 엄격하게 증가했는지 확인합니다.
//!   비교할 쌍이 없는 1일 구간은 검사를 통과하지 못합니다.

use ashare_core::{
    change_percents, dates, validate_ascending, volumes, Percentage, RunScanConfig, StockId,
    StockSeries, TimeSeriesPoint, Volume,
};
use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ensure_same_len, AnalyticsError, AnalyticsResult};

/// 스캔 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunScanParams {
    /// 보고할 최소 구간 길이 (기본: 7).
    pub min_length: usize,
    /// 거래량 연속 증가 검사 여부.
    pub check_volume: bool,
}

impl Default for RunScanParams {
    fn default() -> Self {
        Self {
            min_length: 7,
            check_volume: true,
        }
    }
}

impl From<&RunScanConfig> for RunScanParams {
    fn from(config: &RunScanConfig) -> Self {
        Self {
            min_length: config.min_run_length,
            check_volume: config.check_volume,
        }
    }
}

/// 임계값을 넘은 연속 상승 구간.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// 구간 첫날
    pub start_date: NaiveDate,
    /// 구간 첫날의 인덱스
    pub start_index: usize,
    /// 구간 길이 (거래일 수)
    pub length_in_days: usize,
    /// 거래량 검사를 수행했는지 여부
    pub volume_checked: bool,
    /// 구간 내 거래량이 매일 증가했는지 여부 (검사하지 않았으면 false)
    pub volume_monotonic_increasing: bool,
}

impl RunResult {
    /// 구간 마지막 날의 인덱스.
    pub fn end_index(&self) -> usize {
        self.start_index + self.length_in_days - 1
    }

    /// 거래량 조건까지 통과했는지 확인합니다.
    ///
    /// 검사하지 않은 결과는 통과로 봅니다.
    pub fn passes_volume_check(&self) -> bool {
        !self.volume_checked || self.volume_monotonic_increasing
    }
}

/// 배치 스캔에서 조건을 만족한 종목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRun {
    /// 종목
    pub stock: StockId,
    /// 구간 정보
    pub run: RunResult,
}

/// 가장 긴 양수 구간의 `(시작 인덱스, 길이)`를 찾습니다.
///
/// 양수가 하나도 없으면 `None`. 길이가 같으면 먼저 나온 구간이 유지됩니다.
pub fn longest_positive_run(changes: &[Percentage]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut current_start = 0;
    let mut current_len = 0;

    for (i, change) in changes.iter().enumerate() {
        if *change > Decimal::ZERO {
            if current_len == 0 {
                current_start = i;
            }
            current_len += 1;
            if best.map_or(true, |(_, len)| current_len > len) {
                best = Some((current_start, current_len));
            }
        } else {
            current_len = 0;
        }
    }

    best
}

/// `volumes[start..start + len]`이 매일 엄격하게 증가했는지 확인합니다.
///
/// 길이가 2 미만이면 false.
pub fn volume_increasing(volumes: &[Volume], start: usize, len: usize) -> bool {
    if len < 2 {
        return false;
    }
    volumes
        .get(start..start + len)
        .is_some_and(|window| window.windows(2).all(|pair| pair[1] > pair[0]))
}

/// 연속 상승 구간 스캐너.
#[derive(Debug, Clone)]
pub struct RunScanner {
    params: RunScanParams,
}

impl RunScanner {
    /// 새 스캐너를 생성합니다.
    ///
    /// # 에러
    ///
    /// `min_length`가 0이면 `InvalidParameter`.
    pub fn new(params: RunScanParams) -> AnalyticsResult<Self> {
        if params.min_length == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "최소 구간 길이는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// 스캔 파라미터.
    pub fn params(&self) -> RunScanParams {
        self.params
    }

    /// 병렬 배열(날짜, 등락률, 거래량)을 스캔합니다.
    ///
    /// 거래량 검사를 켰다면 `volumes`가 필요합니다.
    ///
    /// # 에러
    ///
    /// - 배열 길이가 다르면 `LengthMismatch`
    /// - 날짜가 엄격한 오름차순이 아니면 `UnorderedSeries`
    /// - 거래량 검사를 켰는데 거래량이 없으면 `InvalidParameter`
    pub fn scan_changes(
        &self,
        dates: &[NaiveDate],
        changes: &[Percentage],
        volumes: Option<&[Volume]>,
    ) -> AnalyticsResult<Option<RunResult>> {
        ensure_same_len(dates.len(), changes.len())?;
        if let Some(volumes) = volumes {
            ensure_same_len(dates.len(), volumes.len())?;
        }
        if let Some(i) = dates.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(AnalyticsError::UnorderedSeries(format!(
                "index {} ({}) 이후 {}",
                i + 1,
                dates[i],
                dates[i + 1]
            )));
        }

        let Some((start, len)) = longest_positive_run(changes) else {
            return Ok(None);
        };

        if len < self.params.min_length {
            debug!(
                longest = len,
                threshold = self.params.min_length,
                "최장 상승 구간이 임계값 미만"
            );
            return Ok(None);
        }

        let volume_monotonic_increasing = if self.params.check_volume {
            let volumes = volumes.ok_or_else(|| {
                AnalyticsError::InvalidParameter(
                    "거래량 검사를 위해 거래량 시계열이 필요합니다".to_string(),
                )
            })?;
            volume_increasing(volumes, start, len)
        } else {
            false
        };

        Ok(Some(RunResult {
            start_date: dates[start],
            start_index: start,
            length_in_days: len,
            volume_checked: self.params.check_volume,
            volume_monotonic_increasing,
        }))
    }

    /// 일봉 시계열을 스캔합니다.
    ///
    /// 등락률은 벤더 값을 우선 사용하고, 없으면 전일 종가로 계산합니다.
    pub fn scan(&self, points: &[TimeSeriesPoint]) -> AnalyticsResult<Option<RunResult>> {
        validate_ascending(points)?;
        let volumes = volumes(points);
        self.scan_changes(&dates(points), &change_percents(points), Some(&volumes))
    }

    /// 여러 종목을 병렬로 스캔합니다.
    ///
    /// 입력 순서를 유지하며 조건을 만족한 종목만 반환합니다.
    /// 스캔에 실패한 종목은 경고를 남기고 건너뜁니다.
    pub fn scan_many(&self, series: &[StockSeries]) -> Vec<StockRun> {
        let hits: Vec<StockRun> = series
            .par_iter()
            .filter_map(|s| match self.scan(s.points()) {
                Ok(Some(run)) => Some(StockRun {
                    stock: s.stock.clone(),
                    run,
                }),
                Ok(None) => None,
                Err(e) => {
                    warn!(stock = %s.stock, error = %e, "스캔 실패, 건너뜀");
                    None
                }
            })
            .collect();

        info!(
            scanned = series.len(),
            matched = hits.len(),
            threshold = self.params.min_length,
            "배치 스캔 완료"
        );

        hits
    }
}

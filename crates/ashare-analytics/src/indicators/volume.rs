//! 거래량 지표 (Volume Indicators).
//!
//! ## 거래량 이동평균 (Volume MA)
//!
//! 일별 거래량의 단순 이동평균입니다. 기본 기간은 20일입니다.
//!
//! ## 거래량 급증 (Volume Spike)
//!
//! ### 판정 방식
//! - 거래량 > 배수 × 거래량 MA (엄격한 초과)
//! - MA가 아직 정의되지 않은 처음 period-1일은 판정하지 않음
//! - MA가 0인 날(장기 거래정지 등)은 기준이 없으므로 판정하지 않음

use ashare_core::{DecimalExt, IndicatorConfig, Price, TimeSeriesPoint, Volume};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::trend::{SmaParams, TrendIndicators};
use crate::error::{AnalyticsError, AnalyticsResult};

/// 거래량 급증 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeSpikeParams {
    /// 거래량 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 급증 배수 (기본: 3).
    pub multiplier: Decimal,
}

impl Default for VolumeSpikeParams {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: dec!(3),
        }
    }
}

impl From<&IndicatorConfig> for VolumeSpikeParams {
    fn from(config: &IndicatorConfig) -> Self {
        Self {
            period: config.volume_ma_period,
            multiplier: config.volume_spike_multiplier,
        }
    }
}

/// 거래량 급증 지점.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpike {
    /// 시계열 내 인덱스
    pub index: usize,
    /// 거래일
    pub date: NaiveDate,
    /// 해당일 종가
    pub close: Price,
    /// 해당일 거래량
    pub volume: Volume,
    /// 해당일 거래량 MA
    pub average: Decimal,
    /// 거래량 / MA (소수 둘째 자리 반올림)
    pub ratio: Decimal,
}

/// 거래량 지표 계산기.
#[derive(Debug, Default)]
pub struct VolumeIndicators {
    trend: TrendIndicators,
}

impl VolumeIndicators {
    /// 새로운 거래량 지표 계산기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 거래량 이동평균.
    pub fn volume_sma(&self, volumes: &[Volume], period: usize) -> AnalyticsResult<Vec<Option<Decimal>>> {
        let as_decimal: Vec<Decimal> = volumes.iter().map(|v| Decimal::from(*v)).collect();
        self.trend.sma(&as_decimal, SmaParams { period })
    }

    /// 거래량 급증일을 찾습니다.
    ///
    /// # 에러
    ///
    /// 기간이 0이거나 배수가 양수가 아니면 `InvalidParameter`.
    pub fn detect_spikes(
        &self,
        points: &[TimeSeriesPoint],
        params: VolumeSpikeParams,
    ) -> AnalyticsResult<Vec<VolumeSpike>> {
        if params.multiplier <= Decimal::ZERO {
            return Err(AnalyticsError::InvalidParameter(format!(
                "급증 배수는 양수여야 합니다: {}",
                params.multiplier
            )));
        }

        let volumes: Vec<Volume> = points.iter().map(|p| p.volume).collect();
        let averages = self.volume_sma(&volumes, params.period)?;

        let spikes = points
            .iter()
            .zip(averages)
            .enumerate()
            .filter_map(|(index, (point, average))| {
                let average = average.filter(|a| *a > Decimal::ZERO)?;
                let volume = Decimal::from(point.volume);
                (volume > params.multiplier * average).then(|| VolumeSpike {
                    index,
                    date: point.date,
                    close: point.close,
                    volume: point.volume,
                    average,
                    ratio: (volume / average).round_half_up(2),
                })
            })
            .collect();

        Ok(spikes)
    }
}

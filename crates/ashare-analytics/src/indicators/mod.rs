//! 기술적 지표 모듈.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (MA60 / MA90 / MA120)
//! - **골든/데드 크로스**: 이동평균선 교차
//!
//! ## 거래량 지표 (Volume Indicators)
//! - **Volume MA**: 거래량 이동평균 (기본 20일)
//! - **Volume Spike**: 거래량이 MA의 N배를 초과한 날
//!
//! # 사용 예시
//!
//! ```ignore
//! use ashare_analytics::indicators::{IndicatorEngine, SmaParams};
//!
//! let engine = IndicatorEngine::new();
//! let ma60 = engine.sma(&closes, SmaParams { period: 60 })?;
//! let spikes = engine.volume_spikes(series.points(), Default::default())?;
//! ```

pub mod trend;
pub mod volume;

use ashare_core::TimeSeriesPoint;
use rust_decimal::Decimal;

pub use trend::{MovingAverageLine, SmaParams, TrendIndicators};
pub use volume::{VolumeIndicators, VolumeSpike, VolumeSpikeParams};

use crate::error::AnalyticsResult;

/// 통합 지표 엔진.
///
/// 추세/거래량 지표 계산을 위한 단일 진입점입니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    volume: VolumeIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> AnalyticsResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 여러 기간의 이동평균선.
    pub fn moving_averages(
        &self,
        prices: &[Decimal],
        periods: &[usize],
    ) -> AnalyticsResult<Vec<MovingAverageLine>> {
        self.trend.moving_averages(prices, periods)
    }

    /// 골든 크로스 감지.
    ///
    /// 단기 이동평균이 장기 이동평균을 상향 돌파하는 시점을 감지합니다.
    pub fn detect_golden_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> AnalyticsResult<Vec<bool>> {
        self.trend.detect_golden_cross(short_ma, long_ma)
    }

    /// 데드 크로스 감지.
    ///
    /// 단기 이동평균이 장기 이동평균을 하향 돌파하는 시점을 감지합니다.
    pub fn detect_dead_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> AnalyticsResult<Vec<bool>> {
        self.trend.detect_dead_cross(short_ma, long_ma)
    }

    // ==================== 거래량 지표 ====================

    /// 거래량 급증일 탐지.
    pub fn volume_spikes(
        &self,
        points: &[TimeSeriesPoint],
        params: VolumeSpikeParams,
    ) -> AnalyticsResult<Vec<VolumeSpike>> {
        self.volume.detect_spikes(points, params)
    }
}

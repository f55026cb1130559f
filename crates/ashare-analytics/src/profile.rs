//! 종목 프로필.
//!
//! 한 종목의 일봉 시계열에 극값 탐지, 연속 상승 스캔, 이동평균, 거래량 급증,
//! 주주 수와 공시 이벤트 정렬을 모두 적용한 요약 결과를 만듭니다.

use ashare_core::{
    analysis_span, closes, percent_change, AnnouncementEvent, AppConfig, HolderCount, Percentage,
    Price, StockId, StockSeries,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alignment::{align_events, align_nearest, AlignedEvent};
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::extrema::{ExtremaDetector, ExtremaParams, ExtremaProfile};
use crate::indicators::{IndicatorEngine, MovingAverageLine, VolumeSpike, VolumeSpikeParams};
use crate::run_scanner::{RunResult, RunScanParams, RunScanner};

/// 프로필 계산 파라미터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileParams {
    /// 극값 탐지
    pub extrema: ExtremaParams,
    /// 연속 상승 스캔
    pub run_scan: RunScanParams,
    /// 종가 이동평균 기간 (짧은 순)
    pub price_ma_periods: Vec<usize>,
    /// 거래량 급증
    pub volume_spike: VolumeSpikeParams,
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ProfileParams {
    fn from(config: &AppConfig) -> Self {
        Self {
            extrema: ExtremaParams::from(&config.extrema),
            run_scan: RunScanParams::from(&config.run_scan),
            price_ma_periods: config.indicators.price_ma_periods.clone(),
            volume_spike: VolumeSpikeParams::from(&config.indicators),
        }
    }
}

/// 이동평균선의 마지막 값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSnapshot {
    /// 기간
    pub period: usize,
    /// 범례 이름 (예: "MA60")
    pub label: String,
    /// 마지막 거래일 값 (데이터가 기간보다 짧으면 None)
    pub latest: Option<Decimal>,
}

impl From<&MovingAverageLine> for MovingAverageSnapshot {
    fn from(line: &MovingAverageLine) -> Self {
        Self {
            period: line.period,
            label: line.label(),
            latest: line.latest(),
        }
    }
}

/// 이동평균 교차 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossKind {
    /// 단기선이 장기선을 상향 돌파
    Golden,
    /// 단기선이 장기선을 하향 돌파
    Dead,
}

/// 가장 짧은 두 이동평균선의 교차 시점.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaCross {
    /// 교차일
    pub date: NaiveDate,
    /// 교차 종류
    pub kind: CrossKind,
    /// 단기선 이름
    pub short: String,
    /// 장기선 이름
    pub long: String,
}

/// 거래일에 정렬한 주주 수 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolderSummary {
    /// 첫 거래일의 주주 수
    pub first: u64,
    /// 마지막 거래일의 주주 수
    pub latest: u64,
    /// 첫 거래일 대비 변화율 (%)
    pub change_percent: Option<Percentage>,
}

/// 종목 프로필.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockProfile {
    pub stock: StockId,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub last_close: Price,
    pub extrema: ExtremaProfile,
    pub moving_averages: Vec<MovingAverageSnapshot>,
    pub ma_crosses: Vec<MaCross>,
    pub volume_spikes: Vec<VolumeSpike>,
    /// 임계값을 넘은 최장 상승 구간
    pub longest_run: Option<RunResult>,
    pub holder_counts: Option<HolderSummary>,
    pub events: Vec<AlignedEvent>,
}

/// 종목 프로필 빌더.
///
/// ```ignore
/// let profile = ProfileBuilder::new(&series, ProfileParams::from(&config))
///     .with_holders(&holders)
///     .with_events(&events)
///     .build()?;
/// ```
#[derive(Debug)]
pub struct ProfileBuilder<'a> {
    series: &'a StockSeries,
    params: ProfileParams,
    holders: &'a [HolderCount],
    events: &'a [AnnouncementEvent],
    engine: IndicatorEngine,
}

impl<'a> ProfileBuilder<'a> {
    pub fn new(series: &'a StockSeries, params: ProfileParams) -> Self {
        Self {
            series,
            params,
            holders: &[],
            events: &[],
            engine: IndicatorEngine::new(),
        }
    }

    /// 주주 수 관측값 (기준일 오름차순).
    pub fn with_holders(mut self, holders: &'a [HolderCount]) -> Self {
        self.holders = holders;
        self
    }

    /// 공시 이벤트.
    pub fn with_events(mut self, events: &'a [AnnouncementEvent]) -> Self {
        self.events = events;
        self
    }

    /// 프로필을 계산합니다.
    ///
    /// # 에러
    ///
    /// 빈 시계열이거나 파라미터가 잘못되었으면 `InvalidParameter`.
    pub fn build(self) -> AnalyticsResult<StockProfile> {
        let stock = &self.series.stock;
        let _span = analysis_span!("build_profile", stock).entered();

        let points = self.series.points();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Err(AnalyticsError::InvalidParameter(format!(
                "{} 시계열이 비어 있습니다",
                stock
            )));
        };

        let extrema = ExtremaDetector::new(self.params.extrema)?.detect(points)?;
        let longest_run = RunScanner::new(self.params.run_scan)?.scan(points)?;

        let closes = closes(points);
        let lines = self
            .engine
            .moving_averages(&closes, &self.params.price_ma_periods)?;
        let ma_crosses = self.ma_crosses(&lines)?;
        let volume_spikes = self.engine.volume_spikes(points, self.params.volume_spike)?;
        let holder_counts = self.holder_summary()?;
        let events = align_events(points, self.events);

        info!(
            peaks = extrema.peaks.len(),
            valleys = extrema.valleys.len(),
            spikes = volume_spikes.len(),
            run = longest_run.as_ref().map(|r| r.length_in_days),
            "프로필 계산 완료"
        );

        Ok(StockProfile {
            stock: stock.clone(),
            first_date: first.date,
            last_date: last.date,
            last_close: last.close,
            extrema,
            moving_averages: lines.iter().map(MovingAverageSnapshot::from).collect(),
            ma_crosses,
            volume_spikes,
            longest_run,
            holder_counts,
            events,
        })
    }

    fn ma_crosses(&self, lines: &[MovingAverageLine]) -> AnalyticsResult<Vec<MaCross>> {
        let mut sorted: Vec<&MovingAverageLine> = lines.iter().collect();
        sorted.sort_by_key(|line| line.period);
        let [short, long, ..] = sorted.as_slice() else {
            return Ok(Vec::new());
        };

        let golden = self.engine.detect_golden_cross(&short.values, &long.values)?;
        let dead = self.engine.detect_dead_cross(&short.values, &long.values)?;

        let crosses = self
            .series
            .points()
            .iter()
            .zip(golden.iter().zip(&dead))
            .filter_map(|(point, (&is_golden, &is_dead))| {
                let kind = match (is_golden, is_dead) {
                    (true, _) => CrossKind::Golden,
                    (_, true) => CrossKind::Dead,
                    _ => return None,
                };
                Some(MaCross {
                    date: point.date,
                    kind,
                    short: short.label(),
                    long: long.label(),
                })
            })
            .collect();

        Ok(crosses)
    }

    fn holder_summary(&self) -> AnalyticsResult<Option<HolderSummary>> {
        let dates: Vec<NaiveDate> = self.series.points().iter().map(|p| p.date).collect();
        let observations: Vec<(NaiveDate, u64)> =
            self.holders.iter().map(|h| (h.date, h.holders)).collect();

        let aligned = align_nearest(&dates, &observations)?;
        let (Some(Some(first)), Some(Some(latest))) = (aligned.first(), aligned.last()) else {
            return Ok(None);
        };

        Ok(Some(HolderSummary {
            first: *first,
            latest: *latest,
            change_percent: percent_change(Decimal::from(*first), Decimal::from(*latest)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashare_core::TimeSeriesPoint;
    use rust_decimal_macros::dec;

    fn day(i: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
    }

    fn series(closes: &[i64], volumes: &[u64]) -> StockSeries {
        let points = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (c, v))| {
                let c = Decimal::from(*c);
                TimeSeriesPoint::new(day(i), c, c + Decimal::ONE, c - Decimal::ONE, c, *v)
            })
            .collect();
        StockSeries::new(StockId::new("002594", "比亚迪"), points).unwrap()
    }

    fn small_params() -> ProfileParams {
        ProfileParams {
            extrema: ExtremaParams {
                window: 1,
                ..Default::default()
            },
            run_scan: RunScanParams {
                min_length: 3,
                check_volume: true,
            },
            price_ma_periods: vec![3, 2],
            volume_spike: VolumeSpikeParams {
                period: 3,
                multiplier: dec!(2),
            },
        }
    }

    #[test]
    fn test_build_profile() {
        let s = series(
            &[10, 11, 12, 13, 9, 8, 10],
            &[100, 110, 120, 1000, 100, 100, 100],
        );
        let holders = vec![
            HolderCount {
                date: day(0),
                holders: 1000,
            },
            HolderCount {
                date: day(6),
                holders: 1200,
            },
        ];
        let events = vec![AnnouncementEvent::new(day(2), "业绩预告")];

        let profile = ProfileBuilder::new(&s, small_params())
            .with_holders(&holders)
            .with_events(&events)
            .build()
            .unwrap();

        assert_eq!(profile.first_date, day(0));
        assert_eq!(profile.last_date, day(6));
        assert_eq!(profile.last_close, dec!(10));

        assert_eq!(profile.extrema.peaks.len(), 1);
        assert_eq!(profile.extrema.peaks[0].index, 3);
        assert_eq!(profile.extrema.valleys[0].index, 5);

        let run = profile.longest_run.unwrap();
        assert_eq!(run.start_index, 1);
        assert_eq!(run.length_in_days, 3);
        assert!(run.volume_monotonic_increasing);

        assert_eq!(profile.moving_averages.len(), 2);
        assert_eq!(profile.moving_averages[0].label, "MA3");
        // (9 + 8 + 10) / 3 = 9
        assert_eq!(profile.moving_averages[0].latest, Some(dec!(9)));

        // MA3 at index 3 = (110 + 120 + 1000) / 3 = 410, 1000 > 820
        assert_eq!(profile.volume_spikes.len(), 1);
        assert_eq!(profile.volume_spikes[0].index, 3);

        let holders = profile.holder_counts.unwrap();
        assert_eq!(holders.first, 1000);
        assert_eq!(holders.latest, 1200);
        assert_eq!(holders.change_percent, Some(dec!(20)));

        assert_eq!(profile.events.len(), 1);
        assert_eq!(profile.events[0].close, dec!(12));
    }

    #[test]
    fn test_ma_crosses_use_two_shortest() {
        let s = series(&[10, 9, 8, 9, 11, 12, 10, 7], &[100; 8]);
        let profile = ProfileBuilder::new(&s, small_params()).build().unwrap();

        assert!(!profile.ma_crosses.is_empty());
        assert!(profile
            .ma_crosses
            .iter()
            .all(|c| c.short == "MA2" && c.long == "MA3"));
        assert_eq!(profile.ma_crosses[0].kind, CrossKind::Golden);
    }

    #[test]
    fn test_empty_series_rejected() {
        let s = StockSeries::new(StockId::new("600000", "浦发银行"), Vec::new()).unwrap();
        let result = ProfileBuilder::new(&s, small_params()).build();
        assert!(matches!(result, Err(AnalyticsError::InvalidParameter(_))));
    }

    #[test]
    fn test_without_holders() {
        let s = series(&[10, 11, 12], &[1, 2, 3]);
        let profile = ProfileBuilder::new(&s, small_params()).build().unwrap();
        assert!(profile.holder_counts.is_none());
        assert!(profile.events.is_empty());
    }

    #[test]
    fn test_profile_serializes() {
        let s = series(&[10, 11, 12], &[1, 2, 3]);
        let profile = ProfileBuilder::new(&s, small_params()).build().unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["stock"]["code"], "002594");
        assert!(json["extrema"]["peaks"].is_array());
    }
}

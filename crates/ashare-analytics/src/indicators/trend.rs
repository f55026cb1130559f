//! 추세 지표 (Trend Indicators).
//!
//! 종가 이동평균선(MA60/MA90/MA120 등)과 이동평균 교차를 제공합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_same_len, AnalyticsError, AnalyticsResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// 기간별 이동평균선.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageLine {
    /// 이동평균 기간
    pub period: usize,
    /// 각 시점의 값 (처음 period-1개는 None)
    pub values: Vec<Option<Decimal>>,
}

impl MovingAverageLine {
    /// 차트 범례용 이름 (예: "MA60").
    pub fn label(&self) -> String {
        format!("MA{}", self.period)
    }

    /// 마지막 시점의 값.
    pub fn latest(&self) -> Option<Decimal> {
        self.values.last().copied().flatten()
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 인자
    /// * `values` - 입력 데이터
    /// * `params` - SMA 파라미터
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None).
    /// 데이터가 기간보다 짧으면 전부 None입니다.
    pub fn sma(&self, values: &[Decimal], params: SmaParams) -> AnalyticsResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let mut result = Vec::with_capacity(values.len());
        let period_decimal = Decimal::from(period);
        let mut window_sum = Decimal::ZERO;

        for (i, value) in values.iter().enumerate() {
            window_sum += *value;
            if i >= period {
                window_sum -= values[i - period];
            }

            if i + 1 >= period {
                result.push(Some(window_sum / period_decimal));
            } else {
                result.push(None);
            }
        }

        Ok(result)
    }

    /// 여러 기간의 이동평균선을 한 번에 계산합니다.
    pub fn moving_averages(
        &self,
        values: &[Decimal],
        periods: &[usize],
    ) -> AnalyticsResult<Vec<MovingAverageLine>> {
        periods
            .iter()
            .map(|&period| {
                Ok(MovingAverageLine {
                    period,
                    values: self.sma(values, SmaParams { period })?,
                })
            })
            .collect()
    }

    /// 골든 크로스 감지.
    ///
    /// 이전: 단기 < 장기, 현재: 단기 > 장기
    pub fn detect_golden_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> AnalyticsResult<Vec<bool>> {
        crossings(short_ma, long_ma, |ps, pl, cs, cl| ps < pl && cs > cl)
    }

    /// 데드 크로스 감지.
    ///
    /// 이전: 단기 > 장기, 현재: 단기 < 장기
    pub fn detect_dead_cross(
        &self,
        short_ma: &[Option<Decimal>],
        long_ma: &[Option<Decimal>],
    ) -> AnalyticsResult<Vec<bool>> {
        crossings(short_ma, long_ma, |ps, pl, cs, cl| ps > pl && cs < cl)
    }
}

fn crossings<F>(
    short_ma: &[Option<Decimal>],
    long_ma: &[Option<Decimal>],
    crossed: F,
) -> AnalyticsResult<Vec<bool>>
where
    F: Fn(Decimal, Decimal, Decimal, Decimal) -> bool,
{
    ensure_same_len(short_ma.len(), long_ma.len())?;

    let mut result = vec![false; short_ma.len()];
    for i in 1..short_ma.len() {
        if let (Some(prev_short), Some(prev_long), Some(curr_short), Some(curr_long)) =
            (short_ma[i - 1], long_ma[i - 1], short_ma[i], long_ma[i])
        {
            result[i] = crossed(prev_short, prev_long, curr_short, curr_long);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
        ]
    }

    #[test]
    fn test_sma_calculation() {
        let trend = TrendIndicators::new();
        let sma = trend.sma(&sample_prices(), SmaParams { period: 3 }).unwrap();

        assert_eq!(sma.len(), 6);
        assert!(sma[0].is_none());
        assert!(sma[1].is_none());
        // (100 + 102 + 101) / 3 = 101
        assert_eq!(sma[2], Some(dec!(101)));
        // (103 + 105 + 104) / 3 = 104
        assert_eq!(sma[5], Some(dec!(104)));
    }

    #[test]
    fn test_sma_short_series_all_none() {
        let trend = TrendIndicators::new();
        let sma = trend.sma(&sample_prices(), SmaParams { period: 60 }).unwrap();
        assert_eq!(sma.len(), 6);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn test_sma_zero_period() {
        let trend = TrendIndicators::new();
        assert!(trend.sma(&sample_prices(), SmaParams { period: 0 }).is_err());
    }

    #[test]
    fn test_moving_averages_labels() {
        let trend = TrendIndicators::new();
        let lines = trend.moving_averages(&sample_prices(), &[2, 3]).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label(), "MA2");
        assert_eq!(lines[0].latest(), Some(dec!(104.5)));
        assert_eq!(lines[1].latest(), Some(dec!(104)));
    }

    #[test]
    fn test_cross_detection() {
        let trend = TrendIndicators::new();
        let short = vec![None, Some(dec!(9)), Some(dec!(11)), Some(dec!(12)), Some(dec!(8))];
        let long = vec![None, Some(dec!(10)), Some(dec!(10)), Some(dec!(10)), Some(dec!(10))];

        let golden = trend.detect_golden_cross(&short, &long).unwrap();
        assert_eq!(golden, vec![false, false, true, false, false]);

        let dead = trend.detect_dead_cross(&short, &long).unwrap();
        assert_eq!(dead, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_cross_length_mismatch() {
        let trend = TrendIndicators::new();
        let result = trend.detect_golden_cross(&[None, None], &[None]);
        assert!(matches!(
            result,
            Err(AnalyticsError::LengthMismatch { left: 2, right: 1 })
        ));
    }
}

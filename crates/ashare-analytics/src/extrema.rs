//! 국소 극값 탐지 (Peak / Valley).
//!
//! 종가 시계열에서 양쪽 `window`일 이웃보다 엄격하게 높은 지점(고점)과
//! 엄격하게 낮은 지점(저점)을 찾습니다.
//!
//! # 판정 규칙
//!
//! 인덱스 `i`는 다음을 만족할 때 고점입니다:
//!
//! ```text
//! P[i] > P[j]  for all j in [i-w, i+w], j != i
//! ```
//!
//! 저점은 부등호 방향만 반대입니다.
//!
//! - 양 끝에서 `w` 이내의 인덱스는 한쪽 이웃이 부족하므로 보고되지 않습니다.
//! - 길이가 `2w` 이하이면 결과는 비어 있습니다 (에러 아님).
//! - 같은 값이 이어지는 평탄 구간은 엄격 비교를 통과하지 못하므로 선택되지 않습니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use ashare_analytics::extrema::{ExtremaDetector, ExtremaParams};
//!
//! let detector = ExtremaDetector::new(ExtremaParams { window: 30, ..Default::default() })?;
//! let profile = detector.detect(series.points())?;
//!
//! for peak in &profile.peaks {
//!     println!("{} 고점 {}", peak.date, peak.price);
//! }
//! ```

use ashare_core::{closes, validate_ascending, ExtremaConfig, Price, PriceBasis, TimeSeriesPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, AnalyticsResult};

/// 극값 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtremumKind {
    /// 국소 최대
    Peak,
    /// 국소 최소
    Valley,
}

/// 탐지된 극값.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremumPoint {
    /// 시계열 내 인덱스
    pub index: usize,
    /// 거래일
    pub date: NaiveDate,
    /// 표기 가격 (`PriceBasis`에 따름)
    pub price: Price,
    /// 극값 종류
    pub kind: ExtremumKind,
}

/// 극값 탐지 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtremaParams {
    /// 양쪽 비교 윈도우 크기 (1 이상).
    pub window: usize,
    /// 보고 가격 기준.
    pub price_basis: PriceBasis,
}

impl Default for ExtremaParams {
    fn default() -> Self {
        Self {
            window: 30,
            price_basis: PriceBasis::Close,
        }
    }
}

impl From<&ExtremaConfig> for ExtremaParams {
    fn from(config: &ExtremaConfig) -> Self {
        Self {
            window: config.window,
            price_basis: config.price_basis,
        }
    }
}

/// 고점/저점 목록으로 구성된 가격 프로필.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtremaProfile {
    /// 고점 (날짜 오름차순)
    pub peaks: Vec<ExtremumPoint>,
    /// 저점 (날짜 오름차순)
    pub valleys: Vec<ExtremumPoint>,
}

impl ExtremaProfile {
    /// 극값이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty() && self.valleys.is_empty()
    }

    /// 가장 높은 고점. 같은 가격이면 먼저 나온 것.
    pub fn highest_peak(&self) -> Option<&ExtremumPoint> {
        self.peaks
            .iter()
            .reduce(|best, p| if p.price > best.price { p } else { best })
    }

    /// 가장 낮은 저점. 같은 가격이면 먼저 나온 것.
    pub fn lowest_valley(&self) -> Option<&ExtremumPoint> {
        self.valleys
            .iter()
            .reduce(|best, p| if p.price < best.price { p } else { best })
    }

    /// 고점과 저점을 날짜순으로 합친 목록.
    pub fn points(&self) -> Vec<&ExtremumPoint> {
        let mut all: Vec<&ExtremumPoint> = self.peaks.iter().chain(&self.valleys).collect();
        all.sort_by_key(|p| p.index);
        all
    }
}

/// 슬라이딩 윈도우 극값 탐지기.
#[derive(Debug, Clone)]
pub struct ExtremaDetector {
    params: ExtremaParams,
}

impl ExtremaDetector {
    /// 새 탐지기를 생성합니다.
    ///
    /// # 에러
    ///
    /// `window`가 0이면 `InvalidParameter`.
    pub fn new(params: ExtremaParams) -> AnalyticsResult<Self> {
        if params.window == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "윈도우 크기는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// 윈도우 크기.
    pub fn window(&self) -> usize {
        self.params.window
    }

    /// 가격 슬라이스에서 고점/저점 인덱스를 찾습니다.
    ///
    /// 반환값은 `(고점 인덱스, 저점 인덱스)`이며 각각 오름차순입니다.
    /// 계산량은 O(n·w)입니다.
    pub fn find_indices(&self, prices: &[Price]) -> (Vec<usize>, Vec<usize>) {
        let w = self.params.window;
        let n = prices.len();
        let mut peaks = Vec::new();
        let mut valleys = Vec::new();

        if n <= w.saturating_mul(2) {
            return (peaks, valleys);
        }

        for i in w..n - w {
            let p = prices[i];
            let neighbors = prices[i - w..i].iter().chain(&prices[i + 1..=i + w]);

            if neighbors.clone().all(|q| *q < p) {
                peaks.push(i);
            } else if neighbors.into_iter().all(|q| *q > p) {
                valleys.push(i);
            }
        }

        (peaks, valleys)
    }

    /// 일봉 시계열에서 극값 프로필을 계산합니다.
    ///
    /// 탐지는 종가로 하고, 보고 가격은 `price_basis`를 따릅니다.
    ///
    /// # 에러
    ///
    /// 날짜가 엄격한 오름차순이 아니면 `UnorderedSeries`. 입력을 재정렬하지 않습니다.
    pub fn detect(&self, points: &[TimeSeriesPoint]) -> AnalyticsResult<ExtremaProfile> {
        validate_ascending(points)?;

        let (peak_indices, valley_indices) = self.find_indices(&closes(points));

        let to_point = |index: usize, kind: ExtremumKind| {
            let point = &points[index];
            let price = match (self.params.price_basis, kind) {
                (PriceBasis::Close, _) => point.close,
                (PriceBasis::HighLow, ExtremumKind::Peak) => point.high,
                (PriceBasis::HighLow, ExtremumKind::Valley) => point.low,
            };
            ExtremumPoint {
                index,
                date: point.date,
                price,
                kind,
            }
        };

        let profile = ExtremaProfile {
            peaks: peak_indices
                .into_iter()
                .map(|i| to_point(i, ExtremumKind::Peak))
                .collect(),
            valleys: valley_indices
                .into_iter()
                .map(|i| to_point(i, ExtremumKind::Valley))
                .collect(),
        };

        debug!(
            window = self.params.window,
            len = points.len(),
            peaks = profile.peaks.len(),
            valleys = profile.valleys.len(),
            "극값 탐지 완료"
        );

        Ok(profile)
    }
}

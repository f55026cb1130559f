//! 불규칙 관측값을 거래일 축에 맞추는 유틸리티.
//!
//! - 휴장일 공시는 그 다음 첫 거래일로 옮겨집니다.
//! - 주주 수처럼 드문드문 관측되는 값은 거래일마다 가장 가까운 관측값을 사용합니다.
//!   앞뒤 관측값까지의 거리가 같으면 나중 관측값을 사용합니다.

use ashare_core::{AnnouncementEvent, Price, TimeSeriesPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, AnalyticsResult};

/// 거래일에 정렬된 공시 이벤트.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedEvent {
    /// 원래 공시일
    pub event_date: NaiveDate,
    /// 반영된 거래일
    pub trading_date: NaiveDate,
    /// 거래일 인덱스
    pub index: usize,
    /// 해당 거래일 종가
    pub close: Price,
    /// 이벤트 설명
    pub label: String,
}

/// `target` 이후(포함) 첫 거래일의 인덱스.
pub fn next_trading_index(dates: &[NaiveDate], target: NaiveDate) -> Option<usize> {
    let idx = dates.partition_point(|d| *d < target);
    (idx < dates.len()).then_some(idx)
}

/// `target` 이후(포함) 첫 거래일.
///
/// `dates`는 오름차순이어야 합니다. 마지막 거래일보다 늦으면 `None`.
pub fn next_trading_date(dates: &[NaiveDate], target: NaiveDate) -> Option<NaiveDate> {
    next_trading_index(dates, target).map(|i| dates[i])
}

/// 각 거래일에 가장 가까운 관측값을 배정합니다.
///
/// 관측값이 비어 있으면 모든 거래일이 `None`입니다.
///
/// # 에러
///
/// 관측 날짜가 엄격한 오름차순이 아니면 `UnorderedSeries`.
pub fn align_nearest<T: Clone>(
    dates: &[NaiveDate],
    observations: &[(NaiveDate, T)],
) -> AnalyticsResult<Vec<Option<T>>> {
    if let Some(i) = observations
        .windows(2)
        .position(|pair| pair[1].0 <= pair[0].0)
    {
        return Err(AnalyticsError::UnorderedSeries(format!(
            "관측값 index {} ({})",
            i + 1,
            observations[i + 1].0
        )));
    }

    if observations.is_empty() {
        return Ok(vec![None; dates.len()]);
    }

    let aligned = dates
        .iter()
        .map(|date| {
            let right = observations.partition_point(|(d, _)| d < date);
            let chosen = match (right.checked_sub(1), observations.get(right)) {
                (None, _) => right,
                (Some(left), None) => left,
                (Some(left), Some((right_date, _))) => {
                    let left_gap = *date - observations[left].0;
                    let right_gap = *right_date - *date;
                    if left_gap < right_gap {
                        left
                    } else {
                        right
                    }
                }
            };
            Some(observations[chosen].1.clone())
        })
        .collect();

    Ok(aligned)
}

/// 공시 이벤트를 다음 거래일로 옮깁니다.
///
/// 마지막 거래일 이후 이벤트는 버려집니다. 결과는 입력 순서를 따릅니다.
pub fn align_events(points: &[TimeSeriesPoint], events: &[AnnouncementEvent]) -> Vec<AlignedEvent> {
    let dates: Vec<NaiveDate> = points.iter().map(|p| p.date).collect();

    events
        .iter()
        .filter_map(|event| {
            let Some(index) = next_trading_index(&dates, event.date) else {
                debug!(date = %event.date, label = %event.label, "마지막 거래일 이후 이벤트 무시");
                return None;
            };
            Some(AlignedEvent {
                event_date: event.date,
                trading_date: dates[index],
                index,
                close: points[index].close,
                label: event.label.clone(),
            })
        })
        .collect()
}

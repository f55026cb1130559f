//! StockSeries 통합 테스트
//!
//! 로더가 만든 데이터가 분석 입력 조건(엄격한 날짜 오름차순)을 만족하는지 확인합니다.

use ashare_core::{change_percents, validate_ascending, StockId, StockSeries, TimeSeriesPoint};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 3).unwrap()
}

fn build_points(offsets: &[i64], closes: &[u32]) -> Vec<TimeSeriesPoint> {
    offsets
        .iter()
        .zip(closes)
        .map(|(offset, close)| {
            let close = Decimal::from(*close);
            TimeSeriesPoint::new(
                base_date() + Duration::days(*offset),
                close,
                close,
                close,
                close,
                10_000,
            )
        })
        .collect()
}

#[test]
fn test_byd_style_series() {
    let points = vec![
        TimeSeriesPoint::new(base_date(), dec!(260.0), dec!(265.5), dec!(258.1), dec!(263.2), 120_000)
            .with_change_percent(dec!(1.23)),
        TimeSeriesPoint::new(
            base_date() + Duration::days(1),
            dec!(263.0),
            dec!(270.0),
            dec!(262.0),
            dec!(268.5),
            150_000,
        ),
    ];

    let series = StockSeries::new(StockId::new("002594", "比亚迪"), points).unwrap();
    assert_eq!(series.len(), 2);

    let changes = change_percents(series.points());
    assert_eq!(changes[0], dec!(1.23));
    // (268.5 - 263.2) / 263.2 * 100 = 2.01367...
    assert_eq!(changes[1], dec!(2.0137));
}

proptest! {
    #[test]
    fn prop_sorted_unique_dates_validate(
        mut offsets in prop::collection::btree_set(0i64..2000, 0..60)
            .prop_map(|s| s.into_iter().collect::<Vec<_>>()),
    ) {
        let closes: Vec<u32> = (0..offsets.len() as u32).map(|i| 100 + i).collect();
        let points = build_points(&offsets, &closes);
        prop_assert!(validate_ascending(&points).is_ok());

        if offsets.len() >= 2 {
            offsets.swap(0, 1);
            let swapped = build_points(&offsets, &closes);
            prop_assert!(validate_ascending(&swapped).is_err());
        }
    }

    #[test]
    fn prop_change_percents_same_length(
        closes in prop::collection::vec(1u32..500, 0..80),
    ) {
        let offsets: Vec<i64> = (0..closes.len() as i64).collect();
        let points = build_points(&offsets, &closes);
        let changes = change_percents(&points);

        prop_assert_eq!(changes.len(), points.len());
        if let Some(first) = changes.first() {
            prop_assert_eq!(*first, Decimal::ZERO);
        }
        for i in 1..points.len() {
            let up = points[i].close > points[i - 1].close;
            prop_assert_eq!(changes[i] > Decimal::ZERO, up);
        }
    }
}

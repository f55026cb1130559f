//! 극값 탐지와 연속 상승 스캔의 성질 테스트.

use ashare_analytics::{
    longest_positive_run, ExtremaDetector, ExtremaParams, RunScanParams, RunScanner,
};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn detector(window: usize) -> ExtremaDetector {
    ExtremaDetector::new(ExtremaParams {
        window,
        ..Default::default()
    })
    .unwrap()
}

fn to_decimal(values: &[i32]) -> Vec<Decimal> {
    values.iter().map(|v| Decimal::from(*v)).collect()
}

fn volume_scanner(min_length: usize) -> RunScanner {
    RunScanner::new(RunScanParams {
        min_length,
        check_volume: true,
    })
    .unwrap()
}

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

proptest! {
    #[test]
    fn prop_short_series_has_no_extrema(
        (window, values) in (1usize..10).prop_flat_map(|w| {
            (Just(w), prop::collection::vec(-50i32..50, 0..=2 * w))
        }),
    ) {
        let prices = to_decimal(&values);
        let (peaks, valleys) = detector(window).find_indices(&prices);
        prop_assert!(peaks.is_empty());
        prop_assert!(valleys.is_empty());
    }

    #[test]
    fn prop_extrema_dominate_window(
        values in prop::collection::vec(-50i32..50, 0..120),
        window in 1usize..6,
    ) {
        let prices = to_decimal(&values);
        let (peaks, valleys) = detector(window).find_indices(&prices);
        let n = prices.len();

        for &i in &peaks {
            prop_assert!(i >= window && i + window < n);
            for j in i - window..=i + window {
                if j != i {
                    prop_assert!(prices[i] > prices[j]);
                }
            }
        }
        for &i in &valleys {
            prop_assert!(i >= window && i + window < n);
            for j in i - window..=i + window {
                if j != i {
                    prop_assert!(prices[i] < prices[j]);
                }
            }
        }
        prop_assert!(peaks.iter().all(|p| !valleys.contains(p)));
        prop_assert!(peaks.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(valleys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_wider_window_is_subset(
        values in prop::collection::vec(-50i32..50, 0..120),
        window in 1usize..5,
    ) {
        let prices = to_decimal(&values);
        let (narrow_peaks, narrow_valleys) = detector(window).find_indices(&prices);
        let (wide_peaks, wide_valleys) = detector(window + 1).find_indices(&prices);

        prop_assert!(wide_peaks.iter().all(|p| narrow_peaks.contains(p)));
        prop_assert!(wide_valleys.iter().all(|v| narrow_valleys.contains(v)));
    }

    #[test]
    fn prop_detection_is_deterministic(
        values in prop::collection::vec(-50i32..50, 0..80),
        window in 1usize..5,
    ) {
        let prices = to_decimal(&values);
        let d = detector(window);
        prop_assert_eq!(d.find_indices(&prices), d.find_indices(&prices));
    }

    #[test]
    fn prop_monotonic_series_has_no_extrema(
        start in -100i32..100,
        len in 0usize..100,
        window in 1usize..8,
        rising in any::<bool>(),
    ) {
        let values: Vec<i32> = (0..len as i32)
            .map(|i| if rising { start + i } else { start - i })
            .collect();
        let (peaks, valleys) = detector(window).find_indices(&to_decimal(&values));
        prop_assert!(peaks.is_empty());
        prop_assert!(valleys.is_empty());
    }

    #[test]
    fn prop_longest_run_is_maximal(values in prop::collection::vec(-3i32..4, 0..100)) {
        let changes = to_decimal(&values);
        match longest_positive_run(&changes) {
            None => prop_assert!(changes.iter().all(|c| *c <= Decimal::ZERO)),
            Some((start, len)) => {
                prop_assert!(changes[start..start + len].iter().all(|c| *c > Decimal::ZERO));
                prop_assert!(start == 0 || changes[start - 1] <= Decimal::ZERO);
                prop_assert!(start + len == changes.len() || changes[start + len] <= Decimal::ZERO);

                // 앞선 구간은 모두 더 짧고, 뒤 구간은 더 길지 않음
                let mut run = 0usize;
                for (i, c) in changes.iter().enumerate() {
                    run = if *c > Decimal::ZERO { run + 1 } else { 0 };
                    if i < start {
                        prop_assert!(run < len);
                    } else {
                        prop_assert!(run <= len);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_threshold_gates_result(
        values in prop::collection::vec(-3i32..4, 0..60),
        min_length in 1usize..10,
    ) {
        let changes = to_decimal(&values);
        let scanner = RunScanner::new(RunScanParams { min_length, check_volume: false }).unwrap();
        let result = scanner.scan_changes(&dates(changes.len()), &changes, None).unwrap();
        let longest = longest_positive_run(&changes).map_or(0, |(_, len)| len);

        match result {
            Some(run) => {
                prop_assert!(longest >= min_length);
                prop_assert_eq!(run.length_in_days, longest);
            }
            None => prop_assert!(longest < min_length),
        }
    }

    #[test]
    fn prop_run_scan_is_deterministic(
        days in prop::collection::vec((-3i32..4, 0u64..1000), 0..60),
        min_length in 1usize..6,
    ) {
        let (values, volumes): (Vec<i32>, Vec<u64>) = days.into_iter().unzip();
        let changes = to_decimal(&values);
        let dates = dates(changes.len());
        let scanner = volume_scanner(min_length);

        let first = scanner.scan_changes(&dates, &changes, Some(&volumes)).unwrap();
        let second = scanner.scan_changes(&dates, &changes, Some(&volumes)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_volume_flag_matches_daily_increase(
        days in prop::collection::vec((-3i32..4, 0u64..50), 0..60),
        min_length in 1usize..4,
    ) {
        let (values, volumes): (Vec<i32>, Vec<u64>) = days.into_iter().unzip();
        let changes = to_decimal(&values);
        let result = volume_scanner(min_length)
            .scan_changes(&dates(changes.len()), &changes, Some(&volumes))
            .unwrap();

        if let Some(run) = result {
            prop_assert!(run.volume_checked);
            let rising = run.length_in_days >= 2
                && (run.start_index + 1..=run.end_index()).all(|i| volumes[i] > volumes[i - 1]);
            prop_assert_eq!(run.volume_monotonic_increasing, rising);
        }
    }
}

//! # A-Share Analytics
//!
//! 일봉 시계열 스캔 분석 모듈.
//!
//! ## 주요 기능
//!
//! - **극값 탐지**: 슬라이딩 윈도우 기반 국소 고점/저점 ([`extrema`])
//! - **연속 상승 스캔**: 최장 상승 구간과 거래량 증가 검사 ([`run_scanner`])
//! - **기술적 지표**: 이동평균, 교차, 거래량 급증 ([`indicators`])
//! - **정렬**: 공시/주주 수를 거래일 축에 맞춤 ([`alignment`])
//! - **종목 프로필**: 위 결과를 한 번에 요약 ([`profile`])

pub mod alignment;
pub mod error;
pub mod extrema;
pub mod indicators;
pub mod profile;
pub mod run_scanner;

pub use alignment::{align_events, align_nearest, next_trading_date, AlignedEvent};
pub use error::{AnalyticsError, AnalyticsResult};
pub use extrema::{ExtremaDetector, ExtremaParams, ExtremaProfile, ExtremumKind, ExtremumPoint};
pub use indicators::{
    IndicatorEngine, MovingAverageLine, SmaParams, VolumeSpike, VolumeSpikeParams,
};
pub use profile::{
    CrossKind, HolderSummary, MaCross, MovingAverageSnapshot, ProfileBuilder, ProfileParams,
    StockProfile,
};
pub use run_scanner::{
    longest_positive_run, volume_increasing, RunResult, RunScanParams, RunScanner, StockRun,
};

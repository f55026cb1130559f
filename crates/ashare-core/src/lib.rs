//! # A-Share Core
//!
//! A주(중국 본토 주식) 일봉 분석의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 분석 도구 전반에서 사용되는 기본 타입을 제공합니다:
//! - 일봉 OHLCV 데이터 포인트 및 종목별 시계열
//! - 종목 코드 및 거래소 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;

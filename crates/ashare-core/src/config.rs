//! 설정 관리.
//!
//! 분석 파라미터와 데이터 위치를 정의합니다. 파일(TOML)과
//! `ASHARE__SECTION__KEY` 환경 변수를 차례로 적용합니다.

use crate::domain::PriceBasis;
use crate::error::{QuantError, QuantResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 데이터 위치 설정
    pub data: DataConfig,
    /// 극값 탐지 설정
    pub extrema: ExtremaConfig,
    /// 연속 상승 스캔 설정
    pub run_scan: RunScanConfig,
    /// 보조 지표 설정
    pub indicators: IndicatorConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 데이터 위치 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 종목별 일봉 CSV 디렉토리
    pub dir: String,
    /// 주주 수 통계 파일
    pub holders_file: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data/daily".to_string(),
            holders_file: None,
        }
    }
}

/// 극값 탐지 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtremaConfig {
    /// 양쪽 비교 윈도우 크기 (클수록 극값이 적게 탐지됨)
    pub window: usize,
    /// 극값 가격 표기 기준
    pub price_basis: PriceBasis,
}

impl Default for ExtremaConfig {
    fn default() -> Self {
        Self {
            window: 30,
            price_basis: PriceBasis::Close,
        }
    }
}

/// 연속 상승 스캔 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunScanConfig {
    /// 보고할 최소 연속 상승 일수
    pub min_run_length: usize,
    /// 구간 내 거래량 연속 증가 여부 검사
    pub check_volume: bool,
}

impl Default for RunScanConfig {
    fn default() -> Self {
        Self {
            min_run_length: 7,
            check_volume: true,
        }
    }
}

/// 보조 지표 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// 종가 이동평균 기간들
    pub price_ma_periods: Vec<usize>,
    /// 거래량 이동평균 기간
    pub volume_ma_period: usize,
    /// 거래량 급증 배수
    pub volume_spike_multiplier: Decimal,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            price_ma_periods: vec![60, 90, 120],
            volume_ma_period: 20,
            volume_spike_multiplier: Decimal::from(3),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 에러입니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        Self::load_from(path.as_ref(), true)
    }

    /// 기본 경로에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH), false)
    }

    fn load_from(path: &Path, required: bool) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path).required(required))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("ASHARE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 분석 파라미터를 검증합니다.
    pub fn validate(&self) -> QuantResult<()> {
        if self.extrema.window == 0 {
            return Err(QuantError::Config(
                "extrema.window는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.run_scan.min_run_length == 0 {
            return Err(QuantError::Config(
                "run_scan.min_run_length는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.indicators.price_ma_periods.iter().any(|p| *p == 0) {
            return Err(QuantError::Config(
                "indicators.price_ma_periods에 0이 포함될 수 없습니다".to_string(),
            ));
        }
        if self.indicators.volume_ma_period == 0 {
            return Err(QuantError::Config(
                "indicators.volume_ma_period는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.indicators.volume_spike_multiplier <= Decimal::ZERO {
            return Err(QuantError::Config(
                "indicators.volume_spike_multiplier는 양수여야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

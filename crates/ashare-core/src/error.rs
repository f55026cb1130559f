//! 분석 시스템의 에러 타입.
//!
//! 데이터 로딩, 설정, 입력 검증 과정에서 발생하는 에러를 정의합니다.
//! 결과가 비어 있는 것(극값 없음, 연속 상승 구간 없음)은 에러가 아닙니다.

use thiserror::Error;

/// 핵심 분석 에러.
#[derive(Debug, Error)]
pub enum QuantError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 잘못된 입력 (호출자 계약 위반)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 분석 작업을 위한 Result 타입.
pub type QuantResult<T> = Result<T, QuantError>;

impl From<::config::ConfigError> for QuantError {
    fn from(err: ::config::ConfigError) -> Self {
        QuantError::Config(err.to_string())
    }
}

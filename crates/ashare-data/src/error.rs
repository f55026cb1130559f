//! 데이터 모듈 오류 타입.

use ashare_core::QuantError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV 형식 오류
    #[error("CSV error: {0}")]
    CsvError(String),

    /// 파일 또는 컬럼을 찾을 수 없음
    #[error("Not found: {0}")]
    NotFound(String),

    /// 잘못된 데이터 (날짜 순서, 중복 등)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 필드 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::CsvError(err.to_string())
    }
}

impl From<QuantError> for DataError {
    fn from(err: QuantError) -> Self {
        match err {
            QuantError::Io(io) => DataError::IoError(io),
            QuantError::NotFound(msg) => DataError::NotFound(msg),
            other => DataError::InvalidData(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

//! 분석 계산 오류.

use ashare_core::QuantError;
use thiserror::Error;

/// 분석 계산 오류.
///
/// 모두 호출자 계약 위반입니다. 결과가 비어 있는 것은 오류가 아닙니다.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 날짜 순서 위반
    #[error("시계열이 날짜 오름차순이 아닙니다: {0}")]
    UnorderedSeries(String),

    /// 병렬 시계열 길이 불일치
    #[error("시계열 길이가 일치하지 않습니다: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// 분석 계산 결과 타입.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl From<QuantError> for AnalyticsError {
    fn from(err: QuantError) -> Self {
        match err {
            QuantError::InvalidInput(msg) => AnalyticsError::UnorderedSeries(msg),
            other => AnalyticsError::InvalidParameter(other.to_string()),
        }
    }
}

/// 두 시계열의 길이가 같은지 확인합니다.
pub(crate) fn ensure_same_len(left: usize, right: usize) -> AnalyticsResult<()> {
    if left != right {
        return Err(AnalyticsError::LengthMismatch { left, right });
    }
    Ok(())
}

//! 데이터 로딩.
//!
//! 이 crate는 다음을 제공합니다:
//! - 종목별 일봉 CSV 로더 (영문/중문 헤더 지원)
//! - 디렉터리 단위 일괄 로딩
//! - 주주 수, 공시 이벤트 CSV 로더

pub mod error;
pub mod storage;

pub use error::{DataError, Result};

pub use storage::disclosure::{read_events, read_holder_counts};
pub use storage::ohlcv::OhlcvCsvReader;

//! 공시 데이터 (주주 수, 공시 이벤트).
//!
//! 일봉과 달리 불규칙한 날짜에 관측되며, 분석 시 거래일에 맞춰 정렬됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 특정 기준일의 주주 수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderCount {
    /// 기준일
    pub date: NaiveDate,
    /// 주주 수
    pub holders: u64,
}

/// 공시 이벤트 (실적 발표, 증자 등).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementEvent {
    /// 공시일 (휴장일일 수 있음)
    pub date: NaiveDate,
    /// 이벤트 설명
    pub label: String,
}

impl AnnouncementEvent {
    /// 새 이벤트를 생성합니다.
    pub fn new(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            label: label.into(),
        }
    }
}

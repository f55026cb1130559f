//! 가격 및 변동률 계산을 위한 Decimal 유틸리티.

use rust_decimal::Decimal;

/// 가격 타입 (위안).
pub type Price = Decimal;

/// 퍼센트 포인트 타입 (3.5 = 3.5%).
///
/// 데이터 벤더의 涨跌幅 컬럼과 같은 단위입니다.
pub type Percentage = Decimal;

/// 거래량 타입 (주).
pub type Volume = u64;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 퍼센트 포인트 값을 문자열로 변환합니다 (예: "5.25%").
    fn to_percent_string(&self) -> String;

    /// 지정된 소수점 자릿수로 반올림합니다 (0.5는 0에서 멀어지는 방향).
    fn round_half_up(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn to_percent_string(&self) -> String {
        format!("{:.2}%", self)
    }

    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }
}

/// 이전 값 대비 변동률(퍼센트 포인트)을 계산합니다.
///
/// 이전 값이 0이면 `None`을 반환합니다.
pub fn percent_change(previous: Decimal, current: Decimal) -> Option<Percentage> {
    if previous.is_zero() {
        return None;
    }
    Some(((current - previous) / previous * Decimal::ONE_HUNDRED).round_half_up(4))
}

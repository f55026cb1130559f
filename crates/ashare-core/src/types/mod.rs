//! 분석 도구 전반에서 사용되는 공통 타입.

mod decimal;
mod stock;

pub use decimal::*;
pub use stock::*;

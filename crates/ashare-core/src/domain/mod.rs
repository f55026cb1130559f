//! 도메인 모델.

pub mod disclosure;
pub mod series;

pub use disclosure::*;
pub use series::*;

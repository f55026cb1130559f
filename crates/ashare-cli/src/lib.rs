//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 종목별 극값 탐지 출력
//! - 디렉터리 단위 연속 상승 스캔
//! - 종목 프로필 요약

pub mod commands;

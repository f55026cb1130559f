//! 종목 및 거래소 정의.
//!
//! - `Exchange` - 상하이, 선전, 베이징 증권거래소
//! - `StockId` - 6자리 종목 코드와 종목명

use serde::{Deserialize, Serialize};
use std::fmt;

/// A주 거래소.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exchange {
    /// 상하이 증권거래소 (SSE)
    Shanghai,
    /// 선전 증권거래소 (SZSE)
    Shenzhen,
    /// 베이징 증권거래소 (BSE)
    Beijing,
}

impl Exchange {
    /// 6자리 종목 코드의 접두어로 거래소를 추정합니다.
    pub fn from_code(code: &str) -> Option<Self> {
        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match code.as_bytes()[0] {
            b'6' | b'9' => Some(Self::Shanghai),
            b'0' | b'2' | b'3' => Some(Self::Shenzhen),
            b'4' | b'8' => Some(Self::Beijing),
            _ => None,
        }
    }

    /// 거래소 접미사를 반환합니다 (예: "SH").
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Shanghai => "SH",
            Self::Shenzhen => "SZ",
            Self::Beijing => "BJ",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// 분석 대상 종목.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockId {
    /// 6자리 종목 코드 (예: 002594)
    pub code: String,
    /// 종목명 (예: 比亚迪)
    pub name: String,
}

impl StockId {
    /// 새 종목 식별자를 생성합니다.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// 종목 코드로 추정한 거래소.
    pub fn exchange(&self) -> Option<Exchange> {
        Exchange::from_code(&self.code)
    }

    /// `{종목명}{코드}` 형식의 파일 이름에서 종목을 파싱합니다.
    ///
    /// 끝의 6자리 숫자를 코드로, 나머지를 종목명으로 사용합니다.
    /// 숫자 꼬리가 없으면 전체를 종목명으로 보고 코드는 비워 둡니다.
    pub fn from_file_stem(stem: &str) -> Self {
        let digits = stem
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .count();

        if digits >= 6 {
            let split = stem.len() - 6;
            let (name, code) = stem.split_at(split);
            Self::new(code, name.trim())
        } else {
            Self::new(String::new(), stem.trim())
        }
    }

    /// "002594.SZ" 형식 문자열을 반환합니다.
    pub fn qualified_code(&self) -> String {
        match self.exchange() {
            Some(exchange) => format!("{}.{}", self.code, exchange.suffix()),
            None => self.code.clone(),
        }
    }
}

impl fmt::Display for StockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}({})", self.name, self.code)
        }
    }
}

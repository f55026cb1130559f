//! CSV 저장소.
//!
//! 벤더 내보내기 파일은 영문 또는 중문 헤더를 사용하므로
//! 컬럼은 이름 별칭 목록으로 찾습니다.

pub mod disclosure;
pub mod ohlcv;

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;

use crate::error::{DataError, Result};

/// 지원하는 날짜 형식.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// 공백 제거 옵션을 켠 CSV 리더를 엽니다.
pub(crate) fn open_reader(path: &Path) -> Result<Reader<File>> {
    if !path.is_file() {
        return Err(DataError::NotFound(path.display().to_string()));
    }
    Ok(ReaderBuilder::new().trim(Trim::All).from_path(path)?)
}

/// 별칭 중 하나와 일치하는 컬럼 인덱스.
///
/// 대소문자와 UTF-8 BOM은 무시합니다.
pub(crate) fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim_start_matches('\u{feff}').trim();
        aliases.iter().any(|a| h.eq_ignore_ascii_case(a))
    })
}

/// 필수 컬럼 인덱스.
pub(crate) fn require_column(headers: &StringRecord, aliases: &[&str], path: &Path) -> Result<usize> {
    find_column(headers, aliases).ok_or_else(|| {
        DataError::NotFound(format!(
            "{}: '{}' 컬럼이 없습니다 (헤더: {:?})",
            path.display(),
            aliases.join("/"),
            headers.iter().collect::<Vec<_>>()
        ))
    })
}

/// 레코드에서 필드를 꺼냅니다.
pub(crate) fn field<'r>(record: &'r StringRecord, index: usize, line: u64) -> Result<&'r str> {
    record
        .get(index)
        .ok_or_else(|| DataError::ParseError(format!("line {}: 필드 {}가 없습니다", line, index)))
}

/// `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYYMMDD` 형식의 날짜를 파싱합니다.
pub(crate) fn parse_date(value: &str, line: u64) -> Result<NaiveDate> {
    // "2024-01-02 00:00:00"처럼 시간이 붙은 경우 날짜 부분만 사용
    let date_part = value.split_whitespace().next().unwrap_or(value);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .ok_or_else(|| DataError::ParseError(format!("line {}: 날짜 형식 오류 '{}'", line, value)))
}

pub(crate) fn parse_decimal(value: &str, name: &str, line: u64) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        DataError::ParseError(format!("line {}: {} 값 '{}' 파싱 실패: {}", line, name, value, e))
    })
}

/// 음이 아닌 정수를 파싱합니다. `12345.0`처럼 소수부가 0이면 허용합니다.
pub(crate) fn parse_count(value: &str, name: &str, line: u64) -> Result<u64> {
    use rust_decimal::prelude::ToPrimitive;

    let decimal = parse_decimal(value, name, line)?;
    if decimal.is_sign_negative() || !decimal.fract().is_zero() {
        return Err(DataError::ParseError(format!(
            "line {}: {} 값은 음이 아닌 정수여야 합니다: '{}'",
            line, name, value
        )));
    }
    decimal.to_u64().ok_or_else(|| {
        DataError::ParseError(format!("line {}: {} 값 범위 초과 '{}'", line, name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(parse_date("2024-01-02", 1).unwrap(), expected);
        assert_eq!(parse_date("2024/01/02", 1).unwrap(), expected);
        assert_eq!(parse_date("20240102", 1).unwrap(), expected);
        assert_eq!(parse_date("2024-01-02 00:00:00", 1).unwrap(), expected);
        assert!(parse_date("02.01.2024", 1).is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12345", "volume", 1).unwrap(), 12345);
        assert_eq!(parse_count("12345.0", "volume", 1).unwrap(), 12345);
        assert!(parse_count("12.5", "volume", 1).is_err());
        assert!(parse_count("-1", "volume", 1).is_err());
        assert!(parse_count("abc", "volume", 1).is_err());
    }

    #[test]
    fn test_find_column_aliases() {
        let headers = StringRecord::from(vec!["\u{feff}日期", "Close", "成交量"]);
        assert_eq!(find_column(&headers, &["date", "日期"]), Some(0));
        assert_eq!(find_column(&headers, &["close", "收盘"]), Some(1));
        assert_eq!(find_column(&headers, &["volume", "成交量"]), Some(2));
        assert_eq!(find_column(&headers, &["open", "开盘"]), None);
    }
}

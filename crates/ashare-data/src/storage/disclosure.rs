//! 주주 수 / 공시 이벤트 CSV 로더.

use std::path::Path;

use ashare_core::{AnnouncementEvent, HolderCount};
use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use super::{field, find_column, open_reader, parse_count, parse_date, require_column};
use crate::error::Result;

const STOCK_CODE: &[&str] = &["股票代码", "stock_code", "code"];
const STOCK_NAME: &[&str] = &["股票名称", "stock_name", "name"];
const DATE: &[&str] = &["日期", "date"];
const HOLDER_COUNT: &[&str] = &["股东人数", "holder_count", "holders"];
const LABEL: &[&str] = &["label", "event", "事件"];

/// 여러 종목이 섞인 주주 수 파일에서 한 종목의 관측값을 읽습니다.
///
/// 두 가지 레이아웃을 지원합니다:
/// - 와이드: `股票代码,股票名称,<기준일>,<기준일>,...` (종목당 한 행, 기준일마다 한 컬럼)
/// - 롱: `股票名称,日期,股东人数` (관측값마다 한 행)
///
/// `日期`/`date` 컬럼이 있으면 롱 형식으로 읽습니다. 와이드 형식의 빈 칸은
/// 해당 기준일에 관측값이 없다는 뜻이므로 건너뜁니다.
///
/// 결과는 기준일 오름차순입니다. 같은 기준일이 여러 번 나오면 마지막 값을 사용합니다.
pub fn read_holder_counts(path: impl AsRef<Path>, stock_name: &str) -> Result<Vec<HolderCount>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    let name_col = require_column(&headers, STOCK_NAME, path)?;

    let mut counts = Vec::new();
    match find_column(&headers, DATE) {
        Some(date_col) => {
            let count_col = require_column(&headers, HOLDER_COUNT, path)?;
            for result in reader.records() {
                let record = result?;
                let line = record.position().map_or(0, |p| p.line());
                if field(&record, name_col, line)? != stock_name {
                    continue;
                }
                counts.push(HolderCount {
                    date: parse_date(field(&record, date_col, line)?, line)?,
                    holders: parse_count(field(&record, count_col, line)?, "holder_count", line)?,
                });
            }
        }
        None => {
            let date_cols = wide_date_columns(&headers, name_col)?;
            for result in reader.records() {
                let record = result?;
                let line = record.position().map_or(0, |p| p.line());
                if field(&record, name_col, line)? != stock_name {
                    continue;
                }
                for (index, date) in &date_cols {
                    let raw = field(&record, *index, line)?;
                    if raw.is_empty() {
                        continue;
                    }
                    counts.push(HolderCount {
                        date: *date,
                        holders: parse_count(raw, "holder_count", line)?,
                    });
                }
            }
        }
    }

    // 안정 정렬 후 같은 날짜는 마지막 값만 남김
    counts.sort_by_key(|c| c.date);
    let mut deduped: Vec<HolderCount> = Vec::with_capacity(counts.len());
    for count in counts {
        match deduped.last_mut() {
            Some(last) if last.date == count.date => *last = count,
            _ => deduped.push(count),
        }
    }

    debug!(stock = stock_name, rows = deduped.len(), "주주 수 로드");
    Ok(deduped)
}

/// 와이드 형식 헤더에서 종목 식별 컬럼을 제외한 기준일 컬럼을 찾습니다.
fn wide_date_columns(headers: &StringRecord, name_col: usize) -> Result<Vec<(usize, NaiveDate)>> {
    let code_col = find_column(headers, STOCK_CODE);
    headers
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != name_col && Some(*index) != code_col)
        .map(|(index, header)| {
            let date = parse_date(header.trim_start_matches('\u{feff}'), 1)?;
            Ok((index, date))
        })
        .collect()
}

/// 공시 이벤트 파일을 읽습니다 (날짜순).
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<AnnouncementEvent>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    let date_col = require_column(&headers, DATE, path)?;
    let label_col = require_column(&headers, LABEL, path)?;

    let mut events = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        events.push(AnnouncementEvent::new(
            parse_date(field(&record, date_col, line)?, line)?,
            field(&record, label_col, line)?,
        ));
    }
    events.sort_by_key(|e| e.date);

    debug!(path = %path.display(), rows = events.len(), "공시 이벤트 로드");
    Ok(events)
}

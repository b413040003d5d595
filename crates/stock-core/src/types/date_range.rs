//! 조회 기간 정의.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 날짜 문자열 파싱 (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::InvalidInput(format!("Invalid date format: {}. Expected YYYY-MM-DD", s))
    })
}

/// 시작/종료일이 선택적인 조회 기간.
///
/// 양 끝 모두 포함(inclusive)입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// 시작일
    pub start: Option<NaiveDate>,
    /// 종료일
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// 새 조회 기간을 생성합니다. 시작일이 종료일보다 늦으면 에러.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, CoreError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(CoreError::InvalidInput(format!(
                    "Start date must be before end date: {} > {}",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// 선택적 문자열 인자에서 조회 기간을 파싱합니다.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, CoreError> {
        let start = start.map(parse_date).transpose()?;
        let end = end.map(parse_date).transpose()?;
        Self::new(start, end)
    }

    /// 비어있는 값을 채운 구체적인 기간을 반환합니다.
    ///
    /// 종료일 기본값은 `today`, 시작일 기본값은 종료일 - `lookback_days`.
    pub fn resolve(&self, today: NaiveDate, lookback_days: i64) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or(today);
        let start = self
            .start
            .unwrap_or_else(|| end - Duration::days(lookback_days));
        (start.min(end), end)
    }

    /// 주어진 시각이 기간 안에 있는지 확인합니다.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        let day = at.date();
        self.start.map_or(true, |s| day >= s) && self.end.map_or(true, |e| day <= e)
    }

    /// 양 끝이 모두 비어있는지 확인합니다.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

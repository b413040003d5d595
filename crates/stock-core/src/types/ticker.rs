//! 종목 티커 정의.
//!
//! 제공자에 전달되는 티커 문자열을 검증된 타입으로 감쌉니다.
//! 예: "AAPL", "005930.KS", "BRK-B", "^GSPC", "EURUSD=X".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 티커 최대 길이.
const MAX_TICKER_LEN: usize = 20;

/// 검증된 종목 티커 (항상 대문자).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// 티커를 파싱합니다.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput("빈 티커".to_string()));
        }

        if trimmed.len() > MAX_TICKER_LEN {
            return Err(CoreError::InvalidInput(format!(
                "티커가 너무 깁니다: {}",
                trimmed
            )));
        }

        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_'));
        if !valid {
            return Err(CoreError::InvalidInput(format!(
                "티커에 허용되지 않는 문자가 있습니다: {}",
                trimmed
            )));
        }

        Ok(Self(trimmed.to_uppercase()))
    }

    /// 쉼표로 구분된 티커 목록을 파싱합니다 (예: "AAPL,MSFT").
    ///
    /// 중복은 처음 등장한 순서만 유지됩니다.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, CoreError> {
        let mut tickers: Vec<Self> = Vec::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            let ticker = Self::parse(part)?;
            if !tickers.contains(&ticker) {
                tickers.push(ticker);
            }
        }

        if tickers.is_empty() {
            return Err(CoreError::InvalidInput("빈 티커".to_string()));
        }

        Ok(tickers)
    }

    /// 티커 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! 캔들스틱 데이터를 위한 간격 정의.
//!
//! 이 모듈은 히스토리 조회에 사용하는 캔들 간격 타입을 정의합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 캔들스틱 간격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    /// 1분봉
    M1,
    /// 5분봉
    M5,
    /// 15분봉
    M15,
    /// 30분봉
    M30,
    /// 1시간봉
    H1,
    /// 일봉
    #[default]
    D1,
    /// 주봉
    W1,
    /// 월봉
    MN1,
}

impl Interval {
    /// 지원되는 모든 간격.
    pub const ALL: [Interval; 8] = [
        Interval::M1,
        Interval::M5,
        Interval::M15,
        Interval::M30,
        Interval::H1,
        Interval::D1,
        Interval::W1,
        Interval::MN1,
    ];

    /// 일봉 미만(분봉/시간봉)인지 확인합니다.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::M1 | Interval::M5 | Interval::M15 | Interval::M30 | Interval::H1
        )
    }

    /// CLI에서 사용하는 표준 간격 문자열로 변환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
            Interval::MN1 => "1mo",
        }
    }

    /// 간격 문자열에서 파싱합니다.
    ///
    /// 표준 형식 외에 `60m`, `1w`, `daily` 같은 별칭도 허용합니다.
    /// `1m`은 항상 1분봉이며, 월봉은 `1mo`로 지정합니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "1min" => Some(Interval::M1),
            "5m" | "5min" => Some(Interval::M5),
            "15m" | "15min" => Some(Interval::M15),
            "30m" | "30min" => Some(Interval::M30),
            "1h" | "60m" | "1hour" | "hourly" => Some(Interval::H1),
            "1d" | "d" | "daily" => Some(Interval::D1),
            "1wk" | "1w" | "w" | "weekly" => Some(Interval::W1),
            "1mo" | "mo" | "monthly" => Some(Interval::MN1),
            _ => None,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let supported: Vec<&str> = Self::ALL.iter().map(|i| i.as_str()).collect();
            format!(
                "Invalid interval: {}. Supported: {}",
                s,
                supported.join(", ")
            )
        })
    }
}

impl TryFrom<String> for Interval {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}

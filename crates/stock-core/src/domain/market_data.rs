//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `Candle` - OHLCV 캔들스틱 데이터
//! - `Quote` - 현재 시세 스냅샷

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{percent_change, Price, Volume};

/// OHLCV 캔들스틱 데이터.
///
/// 일봉 이상의 캔들은 거래소 현지 날짜의 00:00 UTC로 정규화되어 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub date: DateTime<Utc>,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Volume,
    /// 수정 종가
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adj_close: Option<Price>,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        date: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            adj_close: None,
        }
    }

    /// 수정 종가를 설정합니다.
    pub fn with_adj_close(mut self, adj_close: Option<Price>) -> Self {
        self.adj_close = adj_close;
        self
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// 캔들 목록에서 가격 열을 분리합니다.
///
/// 지표 계산에 필요한 (고가, 저가, 종가) 벡터를 반환합니다.
pub fn split_hlc(candles: &[Candle]) -> (Vec<Decimal>, Vec<Decimal>, Vec<Decimal>) {
    let mut high = Vec::with_capacity(candles.len());
    let mut low = Vec::with_capacity(candles.len());
    let mut close = Vec::with_capacity(candles.len());
    for candle in candles {
        high.push(candle.high);
        low.push(candle.low);
        close.push(candle.close);
    }
    (high, low, close)
}

/// 현재 시세 스냅샷.
///
/// 제공자마다 제공하는 필드가 달라 `symbol`, `price` 외에는 선택 항목입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 종목 티커
    pub symbol: String,
    /// 종목명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 현재가
    pub price: Price,
    /// 전일 대비
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Decimal>,
    /// 전일 대비율 (%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Decimal>,
    /// 전일 종가
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<Price>,
    /// 시가
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<Price>,
    /// 당일 고가
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_high: Option<Price>,
    /// 당일 저가
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_low: Option<Price>,
    /// 거래량
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,
    /// 52주 최고가
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_high: Option<Price>,
    /// 52주 최저가
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_low: Option<Price>,
    /// 통화
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// 거래소
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// 시세 시각
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Quote {
    /// 티커와 현재가만 채운 시세를 생성합니다.
    pub fn new(symbol: impl Into<String>, price: Price) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            price,
            change: None,
            change_percent: None,
            previous_close: None,
            open: None,
            day_high: None,
            day_low: None,
            volume: None,
            year_high: None,
            year_low: None,
            currency: None,
            exchange: None,
            timestamp: None,
        }
    }

    /// 전일 종가를 설정하고, 비어 있는 변화량/변화율을 채웁니다.
    pub fn with_previous_close(mut self, previous_close: Option<Price>) -> Self {
        self.previous_close = previous_close;
        if let Some(prev) = previous_close {
            if self.change.is_none() {
                self.change = Some(self.price - prev);
            }
            if self.change_percent.is_none() {
                self.change_percent = percent_change(self.price, prev);
            }
        }
        self
    }
}

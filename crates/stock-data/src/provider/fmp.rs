//! Financial Modeling Prep (FMP) 제공자.
//!
//! REST API v3를 사용하며 모든 요청에 API 키가 필요합니다.
//!
//! - 시세: `/api/v3/quote/{symbol}`
//! - 일봉: `/api/v3/historical-price-full/{symbol}`
//! - 분봉/시간봉: `/api/v3/historical-chart/{interval}/{symbol}` (뉴욕 현지 시각)
//! - 뉴스: `/api/v3/stock_news?tickers={symbol}`
//!
//! 주봉/월봉은 제공하지 않습니다.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use stock_core::{
    decimal_from_f64, select_recent_news, Candle, FmpConfig, Interval, NewsArticle, Quote, Ticker,
};

use super::{HistoryRequest, MarketDataProvider, NewsRequest, DEFAULT_LOOKBACK_DAYS};
use crate::error::{DataError, Result};
use crate::http::read_json;

/// FMP 시장 데이터 제공자.
pub struct FmpProvider {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl FmpProvider {
    /// 제공자 이름.
    pub const NAME: &'static str = "fmp";

    /// 설정으로 제공자를 생성합니다.
    pub fn new(client: Client, config: &FmpConfig) -> Self {
        let api_key = config
            .api_key
            .as_ref()
            .map(|key| SecretString::new(key.expose_secret().into()));
        Self::with_base_url(client, &config.base_url, api_key)
    }

    /// 기본 URL을 지정하여 제공자를 생성합니다.
    pub fn with_base_url(client: Client, base_url: &str, api_key: Option<SecretString>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// 분봉/시간봉 간격을 FMP 경로 문자열로 변환.
    ///
    /// 일봉은 별도 엔드포인트, 주봉/월봉은 미지원이므로 `None`.
    pub fn intraday_path(interval: Interval) -> Option<&'static str> {
        match interval {
            Interval::M1 => Some("1min"),
            Interval::M5 => Some("5min"),
            Interval::M15 => Some("15min"),
            Interval::M30 => Some("30min"),
            Interval::H1 => Some("1hour"),
            Interval::D1 | Interval::W1 | Interval::MN1 => None,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DataError::Auth(
                    "FMP API key is not configured (set STOCK__PROVIDERS__FMP__API_KEY)"
                        .to_string(),
                )
            })
    }

    /// GET 요청 후 FMP 에러 본문을 확인하고 `T`로 디코딩합니다.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.base_url, path);
        debug!("Fetching from FMP: {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apikey", api_key)])
            .send()
            .await?;

        let value: serde_json::Value = read_json(response, context).await?;

        // FMP는 일부 에러를 200 상태로 반환
        if let Some(message) = value.get("Error Message").and_then(|m| m.as_str()) {
            return Err(DataError::Api {
                status: 200,
                message: format!("{} - {}", context, message),
            });
        }

        serde_json::from_value(value).map_err(|e| DataError::ParseError(format!("{}: {}", context, e)))
    }
}

#[async_trait]
impl MarketDataProvider for FmpProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn quote(&self, ticker: &Ticker) -> Result<Quote> {
        info!("FMP: quote for {}", ticker);

        let context = format!("FMP quote {}", ticker);
        let quotes: Vec<FmpQuote> = self
            .get(&format!("/api/v3/quote/{}", ticker), &[], &context)
            .await?;

        quotes
            .into_iter()
            .next()
            .ok_or_else(|| DataError::NotFound(context))
            .and_then(|q| q.into_quote(ticker))
    }

    async fn history(&self, request: &HistoryRequest) -> Result<Vec<Candle>> {
        if matches!(request.interval, Interval::W1 | Interval::MN1) {
            return Err(DataError::Unsupported(format!(
                "FMP does not provide {} candles",
                request.interval
            )));
        }

        let (start, end) = request
            .range
            .resolve(Utc::now().date_naive(), DEFAULT_LOOKBACK_DAYS);
        let query = [
            ("from", start.format("%Y-%m-%d").to_string()),
            ("to", end.format("%Y-%m-%d").to_string()),
        ];
        let context = format!("FMP history {}", request.ticker);

        info!(
            "FMP: history for {} (interval: {}, {} ~ {})",
            request.ticker, request.interval, start, end
        );

        let mut candles = match Self::intraday_path(request.interval) {
            Some(path) => {
                let bars: Vec<FmpIntradayBar> = self
                    .get(
                        &format!("/api/v3/historical-chart/{}/{}", path, request.ticker),
                        &query,
                        &context,
                    )
                    .await?;
                bars.into_iter()
                    .map(FmpIntradayBar::into_candle)
                    .collect::<Result<Vec<_>>>()?
            }
            None => {
                let full: FmpHistoricalFull = self
                    .get(
                        &format!("/api/v3/historical-price-full/{}", request.ticker),
                        &query,
                        &context,
                    )
                    .await?;
                full.historical
                    .into_iter()
                    .map(FmpDailyBar::into_candle)
                    .collect::<Result<Vec<_>>>()?
            }
        };

        // FMP는 최신순으로 반환하므로 오래된 것부터 재정렬
        candles.sort_by_key(|c| c.date);
        debug!("FMP: {} 캔들 {} 개 수신", request.ticker, candles.len());

        Ok(candles)
    }

    async fn news(&self, request: &NewsRequest) -> Result<Vec<NewsArticle>> {
        info!("FMP: news for {} (limit: {})", request.ticker, request.limit);

        let mut query = vec![
            ("tickers", request.ticker.to_string()),
            ("limit", request.limit.to_string()),
        ];
        if let Some(start) = request.range.start {
            query.push(("from", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = request.range.end {
            query.push(("to", end.format("%Y-%m-%d").to_string()));
        }

        let context = format!("FMP news {}", request.ticker);
        let items: Vec<FmpNews> = self.get("/api/v3/stock_news", &query, &context).await?;

        let articles = items
            .into_iter()
            .map(FmpNews::into_article)
            .collect::<Result<Vec<_>>>()?;

        Ok(select_recent_news(articles, &request.range, request.limit))
    }
}

/// 뉴욕 현지 시각 문자열 ("YYYY-MM-DD HH:MM:SS")을 UTC로 변환합니다.
fn parse_new_york_time(s: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| DataError::ParseError(format!("invalid FMP timestamp {}: {}", s, e)))?;
    New_York
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| DataError::InvalidData(format!("nonexistent New York time: {}", s)))
}

fn finite_price(value: f64, field: &str) -> Result<rust_decimal::Decimal> {
    decimal_from_f64(value)
        .ok_or_else(|| DataError::InvalidData(format!("non-finite {}: {}", field, value)))
}

// ==================== 응답 구조 ====================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: Option<String>,
    name: Option<String>,
    price: Option<f64>,
    changes_percentage: Option<f64>,
    change: Option<f64>,
    day_low: Option<f64>,
    day_high: Option<f64>,
    year_high: Option<f64>,
    year_low: Option<f64>,
    volume: Option<f64>,
    exchange: Option<String>,
    open: Option<f64>,
    previous_close: Option<f64>,
    timestamp: Option<i64>,
}

impl FmpQuote {
    fn into_quote(self, ticker: &Ticker) -> Result<Quote> {
        let price = self.price.and_then(decimal_from_f64).ok_or_else(|| {
            DataError::InvalidData(format!("FMP quote {} - missing price", ticker))
        })?;

        let mut quote = Quote::new(self.symbol.unwrap_or_else(|| ticker.to_string()), price);
        quote.name = self.name;
        quote.change = self.change.and_then(decimal_from_f64);
        quote.change_percent = self.changes_percentage.and_then(decimal_from_f64);
        quote.open = self.open.and_then(decimal_from_f64);
        quote.day_high = self.day_high.and_then(decimal_from_f64);
        quote.day_low = self.day_low.and_then(decimal_from_f64);
        quote.volume = self.volume.and_then(decimal_from_f64);
        quote.year_high = self.year_high.and_then(decimal_from_f64);
        quote.year_low = self.year_low.and_then(decimal_from_f64);
        quote.exchange = self.exchange;
        quote.timestamp = self.timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0));

        Ok(quote.with_previous_close(self.previous_close.and_then(decimal_from_f64)))
    }
}

#[derive(Debug, Deserialize)]
struct FmpHistoricalFull {
    #[serde(default)]
    historical: Vec<FmpDailyBar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpDailyBar {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    adj_close: Option<f64>,
    #[serde(default)]
    volume: f64,
}

impl FmpDailyBar {
    fn into_candle(self) -> Result<Candle> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| DataError::ParseError(format!("invalid FMP date {}: {}", self.date, e)))?;

        Ok(Candle::new(
            date.and_time(chrono::NaiveTime::default()).and_utc(),
            finite_price(self.open, "open")?,
            finite_price(self.high, "high")?,
            finite_price(self.low, "low")?,
            finite_price(self.close, "close")?,
            decimal_from_f64(self.volume).unwrap_or_default(),
        )
        .with_adj_close(self.adj_close.and_then(decimal_from_f64)))
    }
}

#[derive(Debug, Deserialize)]
struct FmpIntradayBar {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl FmpIntradayBar {
    fn into_candle(self) -> Result<Candle> {
        Ok(Candle::new(
            parse_new_york_time(&self.date)?,
            finite_price(self.open, "open")?,
            finite_price(self.high, "high")?,
            finite_price(self.low, "low")?,
            finite_price(self.close, "close")?,
            decimal_from_f64(self.volume).unwrap_or_default(),
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpNews {
    symbol: Option<String>,
    published_date: String,
    title: String,
    site: Option<String>,
    text: Option<String>,
    url: String,
}

impl FmpNews {
    fn into_article(self) -> Result<NewsArticle> {
        Ok(NewsArticle {
            date: parse_new_york_time(&self.published_date)?,
            title: self.title,
            url: self.url,
            source: self.site,
            symbols: self.symbol.into_iter().collect(),
            summary: self.text.filter(|t| !t.is_empty()),
            id: None,
        })
    }
}
